//! PDF outline entries for rendered sections, built on top of `lopdf`.
//!
//! The outline is flat: one entry per emitted section, in document order, each pointing at the
//! page that holds the section header.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use crate::sections::SectionMark;

/// Errors that can occur while embedding bookmarks into a rendered PDF document.
#[derive(Error, Debug)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed by `lopdf`.
    #[error("failed to process PDF bytes")]
    Pdf(#[from] lopdf::Error),

    /// Serializing the document with its outline failed.
    #[error("failed to write PDF bytes")]
    Io(#[from] std::io::Error),

    /// The trailer has no usable `/Root` entry.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,

    /// The catalog object was not a dictionary, preventing outline injection.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,

    /// A section refers to a page the document does not have.
    #[error("section `{title}` refers to missing page {page}")]
    MissingPage { title: String, page: usize },
}

/// Adds an `/Outlines` tree with one entry per section mark.
///
/// Each entry gets a `/Dest [page /Fit]` pointing at the section's first page and carries the
/// section identifier as its `/NM`.  Without marks the bytes are returned unchanged.
pub fn apply_section_bookmarks(
    pdf_bytes: &[u8],
    marks: &[SectionMark],
) -> Result<Vec<u8>, BookmarkError> {
    if marks.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let entries = collect_outline_entries(&mut document, marks, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &entries);
    insert_outlines_root(outlines_id, &mut document, &entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
    name: String,
}

fn collect_outline_entries(
    document: &mut Document,
    marks: &[SectionMark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, BookmarkError> {
    marks
        .iter()
        .map(|mark| {
            let page_ref = u32::try_from(mark.page)
                .ok()
                .and_then(|page| pages.get(&page).copied())
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: mark.title.clone(),
                    page: mark.page,
                })?;
            Ok(OutlineEntry {
                object_id: document.new_object_id(),
                page_ref,
                title: mark.title.clone(),
                name: mark.id.to_string(),
            })
        })
        .collect()
}

fn link_outline_entries(outlines_id: ObjectId, document: &mut Document, entries: &[OutlineEntry]) {
    for (index, entry) in entries.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", Object::string_literal(entry.title.as_str()));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entry.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));
        dictionary.set("NM", Object::string_literal(entry.name.as_str()));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }
        if let Some(next) = entries.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }

        document
            .objects
            .insert(entry.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document as Layout;
    use crate::serialize::to_pdf_bytes;
    use crate::tier::SectionId;

    fn two_page_pdf() -> Vec<u8> {
        let mut layout = Layout::new(210.0, 297.0);
        layout.add_page();
        to_pdf_bytes(&layout, "Bookmarks").unwrap()
    }

    fn mark(id: SectionId, title: &str, page: usize) -> SectionMark {
        SectionMark {
            id,
            title: title.to_string(),
            page,
        }
    }

    #[test]
    fn outline_lists_every_section() {
        let marks = [
            mark(SectionId::Overview, "Product Overview", 2),
            mark(
                SectionId::Vulnerabilities,
                "Vulnerabilities & CVE Analysis",
                2,
            ),
        ];
        let bytes = apply_section_bookmarks(&two_page_pdf(), &marks).unwrap();
        let document = Document::load_mem(&bytes).unwrap();

        let root = document
            .trailer
            .get(b"Root")
            .unwrap()
            .as_reference()
            .unwrap();
        let catalog = document.get_dictionary(root).unwrap();
        let outlines = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
        let outlines = document.get_dictionary(outlines).unwrap();
        assert_eq!(outlines.get(b"Count").unwrap().as_i64().unwrap(), 2);
    }

    #[test]
    fn outline_entries_point_at_their_pages() {
        let marks = [mark(SectionId::Overview, "Product Overview", 2)];
        let bytes = apply_section_bookmarks(&two_page_pdf(), &marks).unwrap();
        let document = Document::load_mem(&bytes).unwrap();
        let second_page = document.get_pages()[&2];

        let root = document
            .trailer
            .get(b"Root")
            .unwrap()
            .as_reference()
            .unwrap();
        let catalog = document.get_dictionary(root).unwrap();
        let outlines = catalog.get(b"Outlines").unwrap().as_reference().unwrap();
        let first = document
            .get_dictionary(outlines)
            .unwrap()
            .get(b"First")
            .unwrap()
            .as_reference()
            .unwrap();
        let entry = document.get_dictionary(first).unwrap();
        let dest = entry.get(b"Dest").unwrap().as_array().unwrap();
        assert_eq!(dest[0].as_reference().unwrap(), second_page);
    }

    #[test]
    fn write_failures_keep_their_source() {
        let err = BookmarkError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(matches!(err, BookmarkError::Io(_)));
        assert_eq!(err.to_string(), "failed to write PDF bytes");
        let source = std::error::Error::source(&err).expect("io source");
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn missing_page_is_reported() {
        let marks = [mark(SectionId::Sources, "Information Sources", 9)];
        let err = apply_section_bookmarks(&two_page_pdf(), &marks).unwrap_err();
        assert!(matches!(err, BookmarkError::MissingPage { page: 9, .. }));
    }
}
