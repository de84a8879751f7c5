use std::path::Path;

use crate::document::ExtractError;

/// Extracts one text per page, in page order.
///
/// Surrounding whitespace on each page is trimmed: the text layer pads pages
/// with leading and trailing newlines that would otherwise pile up at the joins.
pub fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractError> {
    let pages = pdf_extract::extract_text_by_pages(path)?;
    Ok(pages.iter().map(|page| page.trim().to_string()).collect())
}
