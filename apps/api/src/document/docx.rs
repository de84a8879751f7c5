//! DOCX text extraction.
//!
//! A .docx is a zip archive whose body lives in `word/document.xml`. Paragraph
//! text is read from `w:t` runs; explicit page breaks and paragraph-level
//! section breaks split the body into sections. Text boxes nest whole
//! paragraphs inside a run; they are read in place, between the outer
//! paragraph's text before and after them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, EscapeError};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use crate::document::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
/// Legacy copy of an `mc:AlternateContent` choice (VML text boxes).
const FALLBACK: &[u8] = b"mc:Fallback";

/// Extracts one text per section, in document order. Paragraphs inside a
/// section are newline-joined.
pub fn extract_sections(path: &Path) -> Result<Vec<String>, ExtractError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    Ok(sections_from_xml(&xml)?)
}

/// A `w:p` that has started and not yet ended.
#[derive(Default)]
struct OpenParagraph {
    page_broken: bool,
    has_nested: bool,
}

#[derive(Default)]
struct SectionBuilder {
    sections: Vec<String>,
    paragraphs: Vec<String>,
    current: String,
    open: Vec<OpenParagraph>,
    in_text: bool,
    section_break_pending: bool,
    skipped_depth: usize,
}

impl SectionBuilder {
    fn in_paragraph(&self) -> bool {
        !self.open.is_empty()
    }

    fn start_paragraph(&mut self) {
        if let Some(outer) = self.open.last_mut() {
            // Outer text read so far stays ahead of the nested paragraph.
            outer.has_nested = true;
            if !self.current.is_empty() {
                self.paragraphs.push(std::mem::take(&mut self.current));
            }
        }
        self.open.push(OpenParagraph::default());
    }

    fn end_paragraph(&mut self) {
        let Some(closed) = self.open.pop() else {
            return;
        };
        // A paragraph that only carried a page break or a text box adds no blank line.
        if !self.current.is_empty() || !(closed.page_broken || closed.has_nested) {
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
        if self.section_break_pending && !self.in_paragraph() {
            self.section_break_pending = false;
            self.close_section();
        }
    }

    fn page_break(&mut self) {
        if !self.current.is_empty() {
            self.paragraphs.push(std::mem::take(&mut self.current));
        }
        if let Some(paragraph) = self.open.last_mut() {
            paragraph.page_broken = true;
        }
        self.close_section();
    }

    fn close_section(&mut self) {
        if !self.paragraphs.is_empty() {
            self.sections.push(self.paragraphs.join("\n"));
            self.paragraphs.clear();
        }
    }

    fn finish(mut self) -> Vec<String> {
        while self.in_paragraph() {
            self.end_paragraph();
        }
        self.close_section();
        self.sections
    }
}

fn is_page_break(element: &BytesStart<'_>) -> bool {
    element
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"w:type" && a.value.as_ref() == b"page")
}

/// Character references and the five predefined entities. Anything else is
/// an error: `word/document.xml` declares no DTD entities.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String, quick_xml::Error> {
    if let Some(ch) = reference.resolve_char_ref()? {
        return Ok(ch.to_string());
    }
    let name = reference.decode()?;
    match resolve_predefined_entity(&name) {
        Some(text) => Ok(text.to_string()),
        None => Err(quick_xml::Error::Escape(EscapeError::UnrecognizedEntity(
            0..name.len(),
            name.into_owned(),
        ))),
    }
}

/// Splits the body of `word/document.xml` into section texts.
pub fn sections_from_xml(xml: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut builder = SectionBuilder::default();

    loop {
        let event = reader.read_event()?;

        if builder.skipped_depth > 0 {
            match event {
                Event::Start(e) if e.name().as_ref() == FALLBACK => builder.skipped_depth += 1,
                Event::End(e) if e.name().as_ref() == FALLBACK => builder.skipped_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => builder.start_paragraph(),
                b"w:t" => builder.in_text = true,
                b"w:sectPr" if builder.in_paragraph() => builder.section_break_pending = true,
                FALLBACK => builder.skipped_depth = 1,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" => {
                    builder.start_paragraph();
                    builder.end_paragraph();
                }
                b"w:tab" if builder.in_paragraph() => builder.current.push('\t'),
                b"w:br" | b"w:cr" if builder.in_paragraph() => {
                    if is_page_break(&e) {
                        builder.page_break();
                    } else {
                        builder.current.push('\n');
                    }
                }
                b"w:sectPr" if builder.in_paragraph() => builder.section_break_pending = true,
                _ => {}
            },
            Event::Text(e) if builder.in_text => {
                builder.current.push_str(&e.decode()?);
            }
            Event::GeneralRef(r) if builder.in_text => {
                builder.current.push_str(&resolve_reference(&r)?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => builder.in_text = false,
                b"w:p" => builder.end_paragraph(),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    pub(crate) fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#
        )
    }

    pub(crate) fn paragraphs_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        document_xml(&body)
    }

    pub(crate) fn write_docx(path: &Path, document: &str) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
        zip.start_file(DOCUMENT_PART, options).unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_paragraphs_in_order() {
        let xml = paragraphs_xml(&["Jane Doe", "Software Engineer", "Skills: Rust"]);
        let sections = sections_from_xml(&xml).unwrap();
        assert_eq!(sections, vec!["Jane Doe\nSoftware Engineer\nSkills: Rust"]);
    }

    #[test]
    fn test_runs_concatenate_within_paragraph() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Led </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>5</w:t></w:r><w:r><w:t xml:space="preserve"> engineers</w:t></w:r></w:p>"#,
        );
        assert_eq!(sections_from_xml(&xml).unwrap(), vec!["Led 5 engineers"]);
    }

    #[test]
    fn test_page_break_starts_new_section() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Page one</w:t></w:r></w:p><w:p><w:r><w:br w:type="page"/></w:r></w:p><w:p><w:r><w:t>Page two</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            sections_from_xml(&xml).unwrap(),
            vec!["Page one", "Page two"]
        );
    }

    #[test]
    fn test_paragraph_section_break() {
        let xml = document_xml(
            r#"<w:p><w:pPr><w:sectPr><w:type w:val="nextPage"/></w:sectPr></w:pPr><w:r><w:t>Summary</w:t></w:r></w:p><w:p><w:r><w:t>Experience</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            sections_from_xml(&xml).unwrap(),
            vec!["Summary", "Experience"]
        );
    }

    #[test]
    fn test_tabs_line_breaks_and_entities() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>R&amp;D</w:t><w:tab/><w:t>2019&#8211;2021</w:t><w:br/><w:t>&lt;remote&gt;</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            sections_from_xml(&xml).unwrap(),
            vec!["R&D\t2019\u{2013}2021\n<remote>"]
        );
    }

    #[test]
    fn test_unknown_entity_is_an_xml_error() {
        let xml = document_xml(r#"<w:p><w:r><w:t>Caf&eacute;</w:t></w:r></w:p>"#);
        assert!(matches!(
            sections_from_xml(&xml).unwrap_err(),
            quick_xml::Error::Escape(EscapeError::UnrecognizedEntity(_, name)) if name == "eacute"
        ));
    }

    #[test]
    fn test_unknown_entity_surfaces_from_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entity.docx");
        write_docx(&path, &document_xml("<w:p><w:r><w:t>&nbsp;</w:t></w:r></w:p>"));
        assert!(matches!(
            extract_sections(&path).unwrap_err(),
            ExtractError::Xml(_)
        ));
    }

    #[test]
    fn test_text_box_keeps_outer_paragraph_text() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Senior Engineer</w:t></w:r> <w:r><w:drawing><w:txbxContent><w:p><w:r><w:t>Box</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r> <w:r><w:t xml:space="preserve"> at Acme</w:t></w:r></w:p><w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            sections_from_xml(&xml).unwrap(),
            vec!["Senior Engineer\nBox\n at Acme\nNext"]
        );
    }

    #[test]
    fn test_text_box_only_paragraph_adds_no_blank_line() {
        let xml = document_xml(
            r#"<w:p><w:r><w:drawing><w:txbxContent><w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p><w:p><w:r><w:t>+1 555 0100</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r></w:p><w:p><w:r><w:t>Experience</w:t></w:r></w:p>"#,
        );
        assert_eq!(
            sections_from_xml(&xml).unwrap(),
            vec!["jane@example.com\n+1 555 0100\nExperience"]
        );
    }

    #[test]
    fn test_alternate_content_fallback_is_read_once() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Jane Doe</w:t></w:r><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:drawing><wps:txbx><w:txbxContent><w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p></w:txbxContent></wps:txbx></w:drawing></mc:Choice><mc:Fallback><w:pict><v:textbox><w:txbxContent><w:p><w:r><w:t>jane@example.com</w:t></w:r></w:p></w:txbxContent></v:textbox></w:pict></mc:Fallback></mc:AlternateContent></w:r></w:p>"#,
        );
        assert_eq!(
            sections_from_xml(&xml).unwrap(),
            vec!["Jane Doe\njane@example.com"]
        );
    }

    #[test]
    fn test_empty_paragraphs_keep_blank_lines() {
        let xml = document_xml(
            r#"<w:p><w:r><w:t>Education</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>BSc</w:t></w:r></w:p>"#,
        );
        assert_eq!(sections_from_xml(&xml).unwrap(), vec!["Education\n\nBSc"]);
    }

    #[test]
    fn test_table_cells_follow_reading_order() {
        let xml = document_xml(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Rust</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Go</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(sections_from_xml(&xml).unwrap(), vec!["Rust\nGo"]);
    }

    #[test]
    fn test_field_instructions_are_skipped() {
        let xml = document_xml(
            r#"<w:p><w:r><w:instrText> HYPERLINK "https://example.com" </w:instrText></w:r><w:r><w:t>portfolio</w:t></w:r></w:p>"#,
        );
        assert_eq!(sections_from_xml(&xml).unwrap(), vec!["portfolio"]);
    }

    #[test]
    fn test_empty_body_yields_no_sections() {
        let xml = document_xml("");
        assert!(sections_from_xml(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_extract_from_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(&path, &paragraphs_xml(&["A", "B"]));
        assert_eq!(extract_sections(&path).unwrap(), vec!["A\nB"]);
    }

    #[test]
    fn test_not_a_zip_propagates_zip_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, b"plain text pretending to be docx").unwrap();
        assert!(matches!(
            extract_sections(&path).unwrap_err(),
            ExtractError::Zip(_)
        ));
    }

    #[test]
    fn test_archive_without_document_part() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(CONTENT_TYPES.as_bytes()).unwrap();
        zip.finish().unwrap();

        assert!(matches!(
            extract_sections(&path).unwrap_err(),
            ExtractError::Zip(zip::result::ZipError::FileNotFound)
        ));
    }
}
