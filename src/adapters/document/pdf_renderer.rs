//! Paginated renderer producing PDF 1.4 documents.
//!
//! Text is set in the standard Helvetica family with WinAnsi encoding, so
//! no fonts are embedded and every viewer can display the result. Lines are
//! wrapped against the Helvetica metrics below and flowed onto new pages
//! whenever the cursor reaches the bottom margin.
//!
//! Page geometry is US Letter (612 x 792 pt) with a 50 pt margin.

use std::io::Write;

use crate::domain::narrative::Token;
use crate::ports::{DocumentRenderer, ExportFormat, RenderError};

const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 50.0;
const LINE_HEIGHT: f32 = 1.2;

const TITLE_SIZE: f32 = 20.0;
const HEADING1_SIZE: f32 = 22.0;
const HEADING2_SIZE: f32 = 16.0;
const HEADING3_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;

/// Fill gray for quotes (#666666).
const QUOTE_GRAY: f32 = 0.4;

/// Fixed object numbers; pages follow from `FIRST_PAGE_OBJECT`.
const CATALOG_OBJECT: usize = 1;
const PAGES_OBJECT: usize = 2;
const INFO_OBJECT: usize = 6;
const FIRST_PAGE_OBJECT: usize = 7;

/// Renders narrative tokens into a paginated PDF.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, tokens: &[Token], title: &str) -> Result<Vec<u8>, RenderError> {
        let mut layout = Layout::new();

        layout.block(title, Font::Bold, TITLE_SIZE, Align::Center, None);
        layout.move_down(TITLE_SIZE);

        for token in tokens {
            match token {
                Token::Heading1(text) => {
                    layout.move_down(HEADING1_SIZE);
                    layout.block(text, Font::Bold, HEADING1_SIZE, Align::Left, None);
                }
                Token::Heading2(text) => {
                    layout.move_down(HEADING2_SIZE);
                    layout.block(text, Font::Bold, HEADING2_SIZE, Align::Left, None);
                }
                Token::Heading3(text) => {
                    layout.move_down(HEADING3_SIZE);
                    layout.block(text, Font::Bold, HEADING3_SIZE, Align::Left, None);
                }
                Token::Quote(text) => {
                    layout.move_down(BODY_SIZE);
                    layout.block(text, Font::Oblique, BODY_SIZE, Align::Center, Some(QUOTE_GRAY));
                }
                Token::Blank => layout.move_down(BODY_SIZE),
                Token::Paragraph(text) => {
                    layout.block(text, Font::Regular, BODY_SIZE, Align::Left, None);
                }
            }
        }

        write_document(&layout.finish(), title)
            .map_err(|e| RenderError::pdf_failed(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Layout
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
    Oblique,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
            Font::Oblique => "F3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Cursor-based text flow; collects one content stream per page.
struct Layout {
    pages: Vec<String>,
    current: String,
    /// Distance of the cursor from the page bottom.
    cursor: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - 2.0 * MARGIN
    }

    fn move_down(&mut self, size: f32) {
        self.cursor -= size * LINE_HEIGHT;
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn block(&mut self, text: &str, font: Font, size: f32, align: Align, gray: Option<f32>) {
        for line in wrap(text, font, size, Self::content_width()) {
            self.line(&line, font, size, align, gray);
        }
    }

    fn line(&mut self, text: &str, font: Font, size: f32, align: Align, gray: Option<f32>) {
        let height = size * LINE_HEIGHT;
        if self.cursor - height < MARGIN {
            self.new_page();
        }

        let encoded = encode_win_ansi(text);
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => {
                MARGIN + ((Self::content_width() - text_width(&encoded, font, size)) / 2.0).max(0.0)
            }
        };
        let baseline = self.cursor - size;

        self.current.push_str("BT\n");
        if let Some(gray) = gray {
            self.current.push_str(&format!("{:.2} g\n", gray));
        }
        self.current.push_str(&format!(
            "/{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            font.resource(),
            size,
            x,
            baseline,
            escape_string(&encoded)
        ));
        if gray.is_some() {
            self.current.push_str("0 g\n");
        }

        self.cursor -= height;
    }

    fn finish(mut self) -> Vec<String> {
        self.pages.push(self.current);
        self.pages
    }
}

/// Greedy word wrap; words wider than a full line are split by character.
fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let space = char_width(b' ', font) * size / 1000.0;
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;

    for word in text.split_whitespace() {
        let word_width = text_width(&encode_win_ansi(word), font, size);

        if word_width > max_width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            width = 0.0;
            for c in word.chars() {
                let w = text_width(&encode_win_ansi(&c.to_string()), font, size);
                if width + w > max_width && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    width = 0.0;
                }
                line.push(c);
                width += w;
            }
            continue;
        }

        if line.is_empty() {
            line.push_str(word);
            width = word_width;
        } else if width + space + word_width <= max_width {
            line.push(' ');
            line.push_str(word);
            width += space + word_width;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
            width = word_width;
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

// ════════════════════════════════════════════════════════════════════════════════
// Encoding and metrics
// ════════════════════════════════════════════════════════════════════════════════

/// Maps text onto WinAnsiEncoding bytes; unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\t' => b' ',
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

fn escape_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &byte in bytes {
        match byte {
            b'\\' | b'(' | b')' => {
                out.push('\\');
                out.push(byte as char);
            }
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\{:03o}", byte)),
        }
    }
    out
}

fn text_width(bytes: &[u8], font: Font, size: f32) -> f32 {
    bytes.iter().map(|&b| char_width(b, font)).sum::<f32>() * size / 1000.0
}

/// Glyph advance in thousandths of an em. Oblique shares the regular metrics.
fn char_width(byte: u8, font: Font) -> f32 {
    let table = match font {
        Font::Bold => &HELVETICA_BOLD_WIDTHS,
        Font::Regular | Font::Oblique => &HELVETICA_WIDTHS,
    };
    let width = match byte {
        0x20..=0x7e => table[(byte - 0x20) as usize],
        0x85 | 0x97 => 1000,
        0x91 | 0x92 if font == Font::Bold => 278,
        0x91 | 0x92 => 222,
        0x93 | 0x94 if font == Font::Bold => 500,
        0x93 | 0x94 => 333,
        0x95 => 350,
        _ => 556,
    };
    f32::from(width)
}

/// Helvetica advances for 0x20..=0x7E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold advances for 0x20..=0x7E.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

// ════════════════════════════════════════════════════════════════════════════════
// File structure
// ════════════════════════════════════════════════════════════════════════════════

/// Writes objects, cross-reference table and trailer.
fn write_document(pages: &[String], title: &str) -> std::io::Result<Vec<u8>> {
    let mut out: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = Vec::new();

    out.write_all(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n")?;

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_OBJECT + 2 * i))
        .collect();

    let mut objects: Vec<Vec<u8>> = vec![
        format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_OBJECT).into_bytes(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        )
        .into_bytes(),
        font_object("Helvetica"),
        font_object("Helvetica-Bold"),
        font_object("Helvetica-Oblique"),
        format!(
            "<< /Title ({}) /Producer ({}) >>",
            escape_string(&encode_win_ansi(title)),
            env!("CARGO_PKG_NAME")
        )
        .into_bytes(),
    ];

    for (i, content) in pages.iter().enumerate() {
        objects.push(
            format!(
                "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                 /Resources << /Font << /F1 3 0 R /F2 4 0 R /F3 5 0 R >> >> \
                 /Contents {} 0 R >>",
                PAGES_OBJECT,
                PAGE_WIDTH,
                PAGE_HEIGHT,
                FIRST_PAGE_OBJECT + 2 * i + 1
            )
            .into_bytes(),
        );
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content.as_bytes());
        stream.extend_from_slice(b"\nendstream");
        objects.push(stream);
    }

    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        writeln!(out, "{} 0 obj", index + 1)?;
        out.write_all(body)?;
        out.write_all(b"\nendobj\n")?;
    }

    let xref_offset = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1)?;
    for offset in &offsets {
        writeln!(out, "{:010} 00000 n ", offset)?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        CATALOG_OBJECT,
        INFO_OBJECT,
        xref_offset
    )?;

    Ok(out)
}

fn font_object(base_font: &str) -> Vec<u8> {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        base_font
    )
    .into_bytes()
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════
