//! Fallback composer: the document as it reads before any draft exists.

use crate::domain::biography::BiographyAggregate;

/// Placeholder printed under a section heading with no summary.
pub const EMPTY_SECTION_PLACEHOLDER: &str = "No content provided.";

/// Serializes the structured sections into narrative markup.
///
/// Line sequence: title heading, optional subtitle heading, then each life
/// section in display order as a blank line, a level-3 heading and its
/// summary, then an optional blank line and favorite quote.
pub fn compose(aggregate: &BiographyAggregate) -> String {
    let customization = aggregate.customization();
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", single_line(aggregate.display_title())));

    if let Some(subtitle) = non_blank(customization.subtitle.as_deref()) {
        lines.push(format!("## {}", single_line(subtitle)));
    }

    for (kind, section) in aggregate.sections() {
        lines.push(String::new());
        lines.push(format!("### {}", kind.display_label()));
        if section.is_blank() {
            lines.push(EMPTY_SECTION_PLACEHOLDER.to_string());
        } else {
            lines.extend(section.summary.trim().lines().map(as_body_line));
        }
    }

    if let Some(quote) = non_blank(customization.favorite_quote.as_deref()) {
        lines.push(String::new());
        lines.push(format!("> {}", single_line(quote)));
    }

    lines.join("\n")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Collapses embedded line breaks so a field stays on its own line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps user text from being read as markup by indenting marker lines.
fn as_body_line(line: &str) -> String {
    let is_marker = ["# ", "## ", "### ", "> "]
        .iter()
        .any(|prefix| line.starts_with(prefix));
    if is_marker {
        format!(" {}", line)
    } else {
        line.to_string()
    }
}
