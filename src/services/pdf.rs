// src/services/pdf.rs
//! PDF text extraction and first-page overlay

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, StringFormat};
use tracing::warn;

use crate::enhance::models::EnhancedSections;

/// Name under which the overlay font is registered in the page resources
const OVERLAY_FONT: &str = "FEnh";

const HEADER_FONT_SIZE: f32 = 11.0;
const BODY_FONT_SIZE: f32 = 10.0;
const LEFT_MARGIN: f32 = 50.0;
const EXPERIENCE_INDENT: f32 = 55.0;
const TOP_Y: f32 = 720.0;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    #[error("PDF overlay error: {0}")]
    Overlay(String),
}

impl From<lopdf::Error> for PdfError {
    fn from(e: lopdf::Error) -> Self {
        PdfError::Overlay(e.to_string())
    }
}

/// PDF service: extracts résumé text and stamps rewritten sections onto a
/// copy of the original document.
#[derive(Debug, Clone, Default)]
pub struct PdfService;

impl PdfService {
    pub fn new() -> Self {
        Self
    }

    /// Extract plain text from every page, joining non-empty pages with
    /// newlines in page order. A PDF with no extractable text (a scanned
    /// image, say) yields an empty string rather than an error.
    pub fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, PdfError> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| PdfError::Extraction(e.to_string()))?;

        let text = pages
            .into_iter()
            .filter(|page| !page.trim().is_empty())
            .map(|page| page.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            warn!("No extractable text found in uploaded PDF");
        }

        Ok(text)
    }

    /// Stamp the enhanced sections onto page one of the original document.
    ///
    /// Fixed layout: the cursor starts near the top of the page and walks
    /// down by a fixed amount per line. Content that runs past the page
    /// bottom is not paginated.
    pub fn overlay_sections(
        &self,
        pdf_bytes: &[u8],
        sections: &EnhancedSections,
    ) -> Result<Vec<u8>, PdfError> {
        let mut doc = Document::load_mem(pdf_bytes)?;

        let page_id = *doc
            .get_pages()
            .values()
            .next()
            .ok_or_else(|| PdfError::Overlay("document has no pages".to_string()))?;

        let mut ops = Vec::new();
        let mut y = TOP_Y;

        if let Some(summary) = &sections.summary {
            push_text(&mut ops, "Updated SUMMARY:", HEADER_FONT_SIZE, LEFT_MARGIN, y);
            y -= 15.0;
            push_text(&mut ops, summary, BODY_FONT_SIZE, LEFT_MARGIN, y);
            y -= 30.0;
        }

        if let Some(skills) = &sections.skills {
            push_text(
                &mut ops,
                "Updated TECHNICAL SKILLS:",
                HEADER_FONT_SIZE,
                LEFT_MARGIN,
                y,
            );
            y -= 15.0;
            push_text(&mut ops, &skills.join(", "), BODY_FONT_SIZE, LEFT_MARGIN, y);
            y -= 30.0;
        }

        if let Some(experience) = &sections.experience {
            push_text(
                &mut ops,
                "Updated EXPERIENCE:",
                HEADER_FONT_SIZE,
                LEFT_MARGIN,
                y,
            );
            y -= 15.0;
            for item in experience {
                push_text(&mut ops, item, BODY_FONT_SIZE, EXPERIENCE_INDENT, y);
                y -= 12.0;
            }
        }

        if !ops.is_empty() {
            self.append_to_page(&mut doc, page_id, ops)?;
        }

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| PdfError::Overlay(e.to_string()))?;
        Ok(out)
    }

    /// Append text operations to the page's content stream, registering the
    /// overlay font in the page resources first.
    fn append_to_page(
        &self,
        doc: &mut Document,
        page_id: lopdf::ObjectId,
        ops: Vec<Operation>,
    ) -> Result<(), PdfError> {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        // The Font entry in the page resources may be inline or a reference
        let font_dict_id = match doc.get_or_create_resources(page_id)?.as_dict_mut()?.get(b"Font") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };
        match font_dict_id {
            Some(id) => {
                doc.get_object_mut(id)?
                    .as_dict_mut()?
                    .set(OVERLAY_FONT, Object::Reference(font_id));
            }
            None => {
                let resources = doc.get_or_create_resources(page_id)?.as_dict_mut()?;
                if matches!(resources.get(b"Font"), Ok(Object::Dictionary(_))) {
                    resources
                        .get_mut(b"Font")?
                        .as_dict_mut()?
                        .set(OVERLAY_FONT, Object::Reference(font_id));
                } else {
                    let mut fonts = Dictionary::new();
                    fonts.set(OVERLAY_FONT, Object::Reference(font_id));
                    resources.set("Font", fonts);
                }
            }
        }

        let existing = doc.get_page_content(page_id)?;
        let mut content =
            Content::decode(&existing).map_err(|e| PdfError::Overlay(e.to_string()))?;
        content.operations.extend(ops);
        let encoded = content
            .encode()
            .map_err(|e| PdfError::Overlay(e.to_string()))?;
        doc.change_page_content(page_id, encoded)?;

        Ok(())
    }
}

fn push_text(ops: &mut Vec<Operation>, text: &str, size: f32, x: f32, y: f32) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(OVERLAY_FONT.as_bytes().to_vec()), size.into()],
    ));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(
            text.as_bytes().to_vec(),
            StringFormat::Literal,
        )],
    ));
    ops.push(Operation::new("ET", vec![]));
}

#[cfg(test)]
pub mod test_fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream, StringFormat};

    /// Build a minimal PDF with one text line per page
    pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(
                            text.as_bytes().to_vec(),
                            StringFormat::Literal,
                        )],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().unwrap(),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(Object::Reference(page_id));
        }

        let kids_len = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => kids_len,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
