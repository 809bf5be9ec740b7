//! Word-processor renderer producing Office Open XML (`.docx`) packages.
//!
//! The package is a zip archive holding the minimum set of parts Word,
//! LibreOffice and Pages need: content types, package relationships, the
//! main document, its style sheet and core properties. Paragraphs flow in
//! one continuous section; pagination is left to the reading application.
//!
//! | Token        | Paragraph                          |
//! |--------------|------------------------------------|
//! | `Heading1-3` | style `Heading1`..`Heading3`       |
//! | `Quote`      | italic run, spacing after          |
//! | `Blank`      | empty paragraph, spacing after     |
//! | `Paragraph`  | plain run, spacing after           |
//!
//! A `Title` paragraph carrying the display title is emitted unless the
//! narrative already opens with a level-1 heading.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::narrative::Token;
use crate::ports::{DocumentRenderer, ExportFormat, RenderError};

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Space after body paragraphs, in twentieths of a point.
const SPACING_AFTER: &str = "200";

/// Renders narrative tokens into a `.docx` package.
#[derive(Debug, Clone, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for DocxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, tokens: &[Token], title: &str) -> Result<Vec<u8>, RenderError> {
        let parts: [(&str, Vec<u8>); 6] = [
            ("[Content_Types].xml", content_types_xml()?),
            ("_rels/.rels", package_rels_xml()?),
            ("docProps/core.xml", core_properties_xml(title)?),
            ("word/_rels/document.xml.rels", document_rels_xml()?),
            ("word/styles.xml", styles_xml()?),
            ("word/document.xml", document_xml(tokens, title)?),
        ];

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in parts {
            zip.start_file(name, options)
                .map_err(|e| RenderError::docx_failed(format!("{}: {}", name, e)))?;
            zip.write_all(&bytes)
                .map_err(|e| RenderError::docx_failed(format!("{}: {}", name, e)))?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| RenderError::docx_failed(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// XML writing
// ════════════════════════════════════════════════════════════════════════════════

/// Thin wrapper over `quick_xml::Writer` that maps errors into `RenderError`.
struct Xml {
    writer: Writer<Vec<u8>>,
}

impl Xml {
    fn new() -> Result<Self, RenderError> {
        let mut xml = Self {
            writer: Writer::new(Vec::new()),
        };
        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(xml)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), RenderError> {
        self.writer
            .write_event(event)
            .map_err(|e| RenderError::docx_failed(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let empty = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.event(Event::Empty(empty))
    }

    fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), RenderError> {
        self.start(name, attrs)?;
        self.event(Event::Text(BytesText::new(&xml_safe(text))))?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Drops characters XML 1.0 cannot carry.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Package parts
// ════════════════════════════════════════════════════════════════════════════════

fn content_types_xml() -> Result<Vec<u8>, RenderError> {
    let mut xml = Xml::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
    xml.empty(
        "Override",
        &[
            ("PartName", "/word/document.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
            ),
        ],
    )?;
    xml.empty(
        "Override",
        &[
            ("PartName", "/word/styles.xml"),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
            ),
        ],
    )?;
    xml.empty(
        "Override",
        &[
            ("PartName", "/docProps/core.xml"),
            ("ContentType", "application/vnd.openxmlformats-package.core-properties+xml"),
        ],
    )?;
    xml.end("Types")?;
    Ok(xml.finish())
}

fn package_rels_xml() -> Result<Vec<u8>, RenderError> {
    let mut xml = Xml::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    xml.empty(
        "Relationship",
        &[("Id", "rId1"), ("Type", REL_OFFICE_DOCUMENT), ("Target", "word/document.xml")],
    )?;
    xml.empty(
        "Relationship",
        &[("Id", "rId2"), ("Type", REL_CORE_PROPERTIES), ("Target", "docProps/core.xml")],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn document_rels_xml() -> Result<Vec<u8>, RenderError> {
    let mut xml = Xml::new()?;
    xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    xml.empty(
        "Relationship",
        &[("Id", "rId1"), ("Type", REL_STYLES), ("Target", "styles.xml")],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn core_properties_xml(title: &str) -> Result<Vec<u8>, RenderError> {
    let mut xml = Xml::new()?;
    xml.start(
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
        ],
    )?;
    xml.text_element("dc:title", &[], title)?;
    xml.text_element("dc:creator", &[], env!("CARGO_PKG_NAME"))?;
    xml.end("cp:coreProperties")?;
    Ok(xml.finish())
}

/// Paragraph styles: (id, display name, size in half-points, bold, italic).
const STYLES: [(&str, &str, &str, bool, bool); 5] = [
    ("Title", "Title", "56", true, false),
    ("Heading1", "heading 1", "44", true, false),
    ("Heading2", "heading 2", "32", true, false),
    ("Heading3", "heading 3", "28", true, false),
    ("Quote", "Quote", "24", false, true),
];

fn styles_xml() -> Result<Vec<u8>, RenderError> {
    let mut xml = Xml::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_MAIN)])?;

    xml.start("w:style", &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")])?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.start("w:rPr", &[])?;
    xml.empty("w:sz", &[("w:val", "24")])?;
    xml.end("w:rPr")?;
    xml.end("w:style")?;

    for (id, name, size, bold, italic) in STYLES {
        xml.start("w:style", &[("w:type", "paragraph"), ("w:styleId", id)])?;
        xml.empty("w:name", &[("w:val", name)])?;
        xml.empty("w:basedOn", &[("w:val", "Normal")])?;
        xml.empty("w:next", &[("w:val", "Normal")])?;
        xml.empty("w:qFormat", &[])?;
        xml.start("w:pPr", &[])?;
        xml.empty("w:keepNext", &[])?;
        xml.empty("w:spacing", &[("w:before", "240"), ("w:after", "120")])?;
        if id == "Title" {
            xml.empty("w:jc", &[("w:val", "center")])?;
        }
        xml.end("w:pPr")?;
        xml.start("w:rPr", &[])?;
        if bold {
            xml.empty("w:b", &[])?;
        }
        if italic {
            xml.empty("w:i", &[])?;
        }
        xml.empty("w:sz", &[("w:val", size)])?;
        xml.end("w:rPr")?;
        xml.end("w:style")?;
    }

    xml.end("w:styles")?;
    Ok(xml.finish())
}

fn document_xml(tokens: &[Token], title: &str) -> Result<Vec<u8>, RenderError> {
    let mut xml = Xml::new()?;
    xml.start("w:document", &[("xmlns:w", NS_MAIN)])?;
    xml.start("w:body", &[])?;

    if !matches!(tokens.first(), Some(Token::Heading1(_))) {
        styled_paragraph(&mut xml, "Title", title)?;
    }

    for token in tokens {
        match token {
            Token::Heading1(text) => styled_paragraph(&mut xml, "Heading1", text)?,
            Token::Heading2(text) => styled_paragraph(&mut xml, "Heading2", text)?,
            Token::Heading3(text) => styled_paragraph(&mut xml, "Heading3", text)?,
            Token::Quote(text) => body_paragraph(&mut xml, Some(text), true)?,
            Token::Blank => body_paragraph(&mut xml, None, false)?,
            Token::Paragraph(text) => body_paragraph(&mut xml, Some(text), false)?,
        }
    }

    // US Letter with one-inch margins, in twentieths of a point.
    xml.start("w:sectPr", &[])?;
    xml.empty("w:pgSz", &[("w:w", "12240"), ("w:h", "15840")])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn styled_paragraph(xml: &mut Xml, style: &str, text: &str) -> Result<(), RenderError> {
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:pStyle", &[("w:val", style)])?;
    xml.end("w:pPr")?;
    run(xml, text, false)?;
    xml.end("w:p")
}

fn body_paragraph(xml: &mut Xml, text: Option<&str>, italic: bool) -> Result<(), RenderError> {
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:after", SPACING_AFTER)])?;
    xml.end("w:pPr")?;
    if let Some(text) = text {
        run(xml, text, italic)?;
    }
    xml.end("w:p")
}

fn run(xml: &mut Xml, text: &str, italic: bool) -> Result<(), RenderError> {
    xml.start("w:r", &[])?;
    if italic {
        xml.start("w:rPr", &[])?;
        xml.empty("w:i", &[])?;
        xml.end("w:rPr")?;
    }
    xml.text_element("w:t", &[("xml:space", "preserve")], text)?;
    xml.end("w:r")
}

// ════════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::narrative::tokenize;
    use std::io::Read;
    use zip::ZipArchive;

    fn unzip(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    fn render(markup: &str, title: &str) -> Vec<u8> {
        DocxRenderer::new().render(&tokenize(markup), title).unwrap()
    }

    #[test]
    fn package_contains_required_parts() {
        let bytes = render("# Title", "Title");
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        for part in [
            "[Content_Types].xml",
            "_rels/.rels",
            "word/document.xml",
            "word/styles.xml",
            "word/_rels/document.xml.rels",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&part), "missing {}", part);
        }
    }

    #[test]
    fn empty_tokens_produce_title_only_document() {
        let bytes = DocxRenderer::new().render(&[], "My Life").unwrap();
        let document = unzip(&bytes, "word/document.xml");

        assert!(document.contains(r#"<w:pStyle w:val="Title"/>"#));
        assert!(document.contains(">My Life</w:t>"));
        assert_eq!(document.matches("<w:p>").count(), 1);
    }

    #[test]
    fn maps_tokens_to_paragraph_kinds() {
        let bytes = render("# Book\n## Sub\n### Part\n> Wise words\n\nBody", "Book");
        let document = unzip(&bytes, "word/document.xml");

        assert!(!document.contains(r#"w:val="Title""#));
        assert!(document.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(document.contains(r#"<w:pStyle w:val="Heading2"/>"#));
        assert!(document.contains(r#"<w:pStyle w:val="Heading3"/>"#));
        assert!(document.contains("<w:rPr><w:i/></w:rPr><w:t xml:space=\"preserve\">Wise words</w:t>"));
        assert_eq!(document.matches(r#"<w:spacing w:after="200"/>"#).count(), 3);
    }

    #[test]
    fn escapes_markup_characters() {
        let bytes = render("Fish & <chips>", "Q&A");
        let document = unzip(&bytes, "word/document.xml");
        assert!(document.contains("Fish &amp; &lt;chips&gt;"));
        assert!(unzip(&bytes, "docProps/core.xml").contains("<dc:title>Q&amp;A</dc:title>"));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(render("# A\nbody", "A"), render("# A\nbody", "A"));
    }

    #[test]
    fn strips_control_characters() {
        let bytes = render("bell\u{7}here", "T");
        assert!(unzip(&bytes, "word/document.xml").contains(">bellhere</w:t>"));
    }
}
