//! Markup tokenizer for line-oriented narrative text.
//!
//! Recognizes the small markup vocabulary shared by the generator output,
//! the fallback composer and both renderers:
//!
//! | Line                 | Token       |
//! |----------------------|-------------|
//! | empty or whitespace  | `Blank`     |
//! | `### text`           | `Heading3`  |
//! | `## text`            | `Heading2`  |
//! | `# text`             | `Heading1`  |
//! | `> text`             | `Quote`     |
//! | anything else        | `Paragraph` |
//!
//! Prefixes are matched against the untrimmed line, so an indented `# `
//! is plain paragraph text.

use serde::Serialize;

/// One typed line of narrative markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Token {
    Heading1(String),
    Heading2(String),
    Heading3(String),
    Quote(String),
    Blank,
    Paragraph(String),
}

/// Splits markup into one token per line, in order.
pub fn tokenize(markup: &str) -> Vec<Token> {
    markup.lines().map(tokenize_line).collect()
}

fn tokenize_line(line: &str) -> Token {
    if line.trim().is_empty() {
        return Token::Blank;
    }

    let prefixes: [(&str, fn(String) -> Token); 4] = [
        ("### ", Token::Heading3),
        ("## ", Token::Heading2),
        ("# ", Token::Heading1),
        ("> ", Token::Quote),
    ];

    for (prefix, make) in prefixes {
        if let Some(rest) = line.strip_prefix(prefix) {
            return make(rest.trim().to_string());
        }
    }

    Token::Paragraph(line.trim().to_string())
}
