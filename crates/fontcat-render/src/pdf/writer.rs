//! Document assembly: pages, resources, outline and catalog

use std::collections::BTreeMap;
use std::path::Path;

use fontcat_text::{FontDatabase, FontFace};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, encode_utf16_be, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::encoding::winansi_encode;
use super::fonts::{FontRegistry, StandardFont};
use crate::layout::{Bookmark, TITLE};
use crate::{RenderError, Result};

fn name(s: &str) -> Object {
    Object::Name(s.as_bytes().to_vec())
}

fn real(v: f32) -> Object {
    v.into()
}

/// Content and resources of the page being drawn
#[derive(Default)]
pub struct PageBuilder {
    operations: Vec<Operation>,
    fonts: BTreeMap<String, ObjectId>,
    images: BTreeMap<String, ObjectId>,
}

impl PageBuilder {
    fn show(&mut self, font: &str, size: f32, x: f32, y: f32, operator: &str, operand: Object) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![name(font), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new(operator, vec![operand]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Number of operators so far
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Incremental catalogue document writer
pub struct CatalogWriter {
    doc: Document,
    page_width: f32,
    page_height: f32,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    standard_fonts: BTreeMap<StandardFont, ObjectId>,
    fonts: FontRegistry,
    image_count: usize,
}

impl CatalogWriter {
    pub fn new(page_width: f32, page_height: f32) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let standard_fonts = StandardFont::ALL
            .iter()
            .map(|font| (*font, doc.add_object(font.dictionary())))
            .collect();
        Self {
            doc,
            page_width,
            page_height,
            pages_id,
            page_ids: Vec::new(),
            standard_fonts,
            fonts: FontRegistry::new(),
            image_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Embedded fonts registered so far
    pub fn embedded_fonts(&self) -> usize {
        self.fonts.len()
    }

    /// Text in a standard font at baseline `(x, y)`
    pub fn draw_text(&self, page: &mut PageBuilder, font: StandardFont, size: f32, x: f32, y: f32, text: &str) {
        if let Some(&id) = self.standard_fonts.get(&font) {
            page.fonts.insert(font.resource_name().to_string(), id);
        }
        let encoded = Object::String(winansi_encode(text), StringFormat::Hexadecimal);
        page.show(font.resource_name(), size, x, y, "Tj", encoded);
    }

    /// Sample text in the face's own embedded font
    #[allow(clippy::too_many_arguments)]
    pub fn draw_glyphs(
        &mut self,
        page: &mut PageBuilder,
        db: &mut FontDatabase,
        face: &FontFace,
        size: f32,
        x: f32,
        y: f32,
        text: &str,
    ) -> Result<()> {
        let font = self.fonts.register(&mut self.doc, db, face)?;
        let items = font.shape_tj(db, face, text)?;
        page.fonts.insert(font.resource.clone(), font.font_id);
        let resource = font.resource.clone();
        page.show(&resource, size, x, y, "TJ", Object::Array(items));
        Ok(())
    }

    /// 8-bit grayscale image with its lower-left corner at `(x, y)`
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image(
        &mut self,
        page: &mut PageBuilder,
        gray: Vec<u8>,
        width_px: u32,
        height_px: u32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let expected = width_px as usize * height_px as usize;
        if gray.len() != expected {
            return Err(RenderError::Pdf(format!(
                "image data is {} bytes, expected {}",
                gray.len(),
                expected
            )));
        }

        self.image_count += 1;
        let resource = format!("Im{}", self.image_count);
        let id = self.doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width_px as i64,
                "Height" => height_px as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8i64,
            },
            gray,
        ));
        page.images.insert(resource.clone(), id);
        page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
            ),
            Operation::new("Do", vec![name(&resource)]),
            Operation::new("Q", vec![]),
        ]);
        Ok(())
    }

    /// Write the page's content stream and dictionary
    pub fn end_page(&mut self, page: PageBuilder) -> Result<ObjectId> {
        let content = Content { operations: page.operations };
        let bytes = content.encode().map_err(|e| RenderError::Pdf(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), bytes));

        let mut fonts = Dictionary::new();
        for (resource, id) in page.fonts {
            fonts.set(resource, id);
        }
        let mut images = Dictionary::new();
        for (resource, id) in page.images {
            images.set(resource, id);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => fonts,
                "XObject" => images,
            },
        });
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// One outline item per bookmark, anchored with `/XYZ`
    fn write_outline(&mut self, bookmarks: &[Bookmark], left: f32) -> Option<ObjectId> {
        let targets: Vec<(&Bookmark, ObjectId)> = bookmarks
            .iter()
            .filter_map(|b| match self.page_ids.get(b.page) {
                Some(&page) => Some((b, page)),
                None => {
                    tracing::warn!("Bookmark {:?} points past the last page", b.letter);
                    None
                }
            })
            .collect();
        if targets.is_empty() {
            return None;
        }

        let outline_id = self.doc.new_object_id();
        let item_ids: Vec<ObjectId> = targets.iter().map(|_| self.doc.new_object_id()).collect();

        for (i, (bookmark, page)) in targets.iter().enumerate() {
            let mut item = dictionary! {
                "Title" => Object::String(encode_utf16_be(&bookmark.letter), StringFormat::Hexadecimal),
                "Parent" => outline_id,
                "Dest" => vec![
                    Object::Reference(*page),
                    name("XYZ"),
                    real(left),
                    real(bookmark.top),
                    Object::Null,
                ],
            };
            if i > 0 {
                item.set("Prev", item_ids[i - 1]);
            }
            if let Some(&next) = item_ids.get(i + 1) {
                item.set("Next", next);
            }
            self.doc.objects.insert(item_ids[i], Object::Dictionary(item));
        }

        let (first, last) = (item_ids[0], item_ids[item_ids.len() - 1]);
        self.doc.objects.insert(
            outline_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => first,
                "Last" => last,
                "Count" => item_ids.len() as i64,
            }),
        );
        Some(outline_id)
    }

    /// Close the document: fonts, page tree, outline, catalog and info
    pub fn finish(mut self, bookmarks: &[Bookmark], outline_left: f32) -> Document {
        let fonts = std::mem::take(&mut self.fonts);
        fonts.finish(&mut self.doc);

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
                "MediaBox" => vec![real(0.0), real(0.0), real(self.page_width), real(self.page_height)],
            }),
        );

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        };
        if let Some(outline_id) = self.write_outline(bookmarks, outline_left) {
            catalog.set("Outlines", outline_id);
            catalog.set("PageMode", name("UseOutlines"));
        }
        let catalog_id = self.doc.add_object(catalog);
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::String(encode_utf16_be(TITLE), StringFormat::Hexadecimal),
            "Producer" => Object::string_literal(concat!("fontcat ", env!("CARGO_PKG_VERSION"))),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        self.doc
    }

    /// Finish and write the document to `path`
    pub fn save(self, bookmarks: &[Bookmark], outline_left: f32, path: &Path) -> Result<()> {
        let mut doc = self.finish(bookmarks, outline_left);
        doc.save(path).map_err(|e| RenderError::Pdf(format!("{}: {e}", path.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline_titles(doc: &Document) -> Vec<Vec<u8>> {
        doc.objects
            .values()
            .filter_map(|obj| obj.as_dict().ok())
            .filter(|dict| dict.has(b"Dest"))
            .filter_map(|dict| dict.get(b"Title").ok())
            .filter_map(|title| title.as_str().ok().map(|s| s.to_vec()))
            .collect()
    }

    #[test]
    fn test_empty_document() {
        let mut writer = CatalogWriter::new(595.28, 841.89);
        let mut page = PageBuilder::default();
        writer.draw_text(&mut page, StandardFont::HelveticaBold, 16.0, 42.5, 799.0, TITLE);
        assert_eq!(page.len(), 5);
        writer.end_page(page).unwrap();
        assert_eq!(writer.page_count(), 1);

        let doc = writer.finish(&[], 42.5);
        assert_eq!(doc.get_pages().len(), 1);
        assert!(outline_titles(&doc).is_empty());
    }

    #[test]
    fn test_outline_items() {
        let mut writer = CatalogWriter::new(595.28, 841.89);
        for _ in 0..3 {
            writer.end_page(PageBuilder::default()).unwrap();
        }
        let bookmarks = vec![
            Bookmark { letter: "A".into(), page: 0, top: 700.0 },
            Bookmark { letter: "B".into(), page: 2, top: 799.0 },
            Bookmark { letter: "Z".into(), page: 9, top: 799.0 },
        ];
        let doc = writer.finish(&bookmarks, 42.5);

        let mut titles = outline_titles(&doc);
        titles.sort();
        assert_eq!(titles, vec![encode_utf16_be("A"), encode_utf16_be("B")]);
    }

    #[test]
    fn test_image_size_checked() {
        let mut writer = CatalogWriter::new(100.0, 100.0);
        let mut page = PageBuilder::default();
        assert!(writer.draw_image(&mut page, vec![0; 5], 2, 2, 0.0, 0.0, 1.0, 1.0).is_err());
        assert!(writer.draw_image(&mut page, vec![255; 4], 2, 2, 0.0, 0.0, 1.0, 1.0).is_ok());
        assert_eq!(page.images.len(), 1);
    }
}
