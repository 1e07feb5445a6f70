//! Rebuilding a document's page tree from rasterized and vector pages.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use tracing::trace;

use crate::error::{CompressionError, PdfError};
use crate::pdf::codec::JpegImage;
use crate::pdf::structure;

/// Builds a fresh page tree inside the source document's object table.
///
/// Fresh pages can reference the source's fonts and images, and everything
/// that only the old page tree used becomes unreachable once `finish`
/// installs the new catalog.
pub struct PageAssembler {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl PageAssembler {
    pub fn new(mut doc: Document) -> Self {
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages placed so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append a page showing `jpeg` stretched over `width` x `height` points.
    pub fn place_raster_page(
        &mut self,
        width: f32,
        height: f32,
        jpeg: JpegImage,
    ) -> Result<ObjectId, CompressionError> {
        let image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => jpeg.width as i64,
                "Height" => jpeg.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg.data,
        )
        .with_compression(false);
        let image_id = self.doc.add_object(image);

        let content = draw_xobject("Im0", [width, 0.0, 0.0, height, 0.0, 0.0])?;
        let resources = dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        };

        trace!("Placed {}x{} raster page", jpeg.width, jpeg.height);
        Ok(self.push_page(width, height, 0, resources, content))
    }

    /// Append a page that embeds the source page as a Form XObject.
    ///
    /// Text stays text; only the page's own content and resources are kept.
    /// A single content stream lopdf cannot decode is embedded still encoded,
    /// with its filter; split content in that state is an error.
    pub fn place_vector_page(&mut self, source_page: ObjectId) -> Result<ObjectId, CompressionError> {
        let bbox = structure::page_box(&self.doc, source_page).ok_or_else(|| {
            CompressionError::Assemble(format!("page {:?} has no usable MediaBox", source_page))
        })?;
        let rotation = structure::page_rotation(&self.doc, source_page);
        let resources = structure::page_resources(&self.doc, source_page).unwrap_or_default();

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "FormType" => 1,
            "BBox" => rect_array(bbox.x0, bbox.y0, bbox.x1, bbox.y1),
            "Resources" => resources,
        };
        let content = match structure::page_content(&self.doc, source_page) {
            Ok(content) => content,
            Err(PdfError::UndecodableContent(reason)) => {
                let stored = structure::single_content_stream(&self.doc, source_page)
                    .ok_or(CompressionError::Assemble(reason))?;
                for key in [b"Filter".as_slice(), b"DecodeParms".as_slice()] {
                    if let Ok(value) = stored.dict.get(key) {
                        dict.set(key, value.clone());
                    }
                }
                trace!("Embedding encoded content of {:?}", source_page);
                stored.content.clone()
            }
            Err(e) => return Err(CompressionError::Assemble(e.to_string())),
        };

        let form_id = self.doc.add_object(Stream::new(dict, content));

        // Shift the visible box to the origin of the new page.
        let content = draw_xobject("Fm0", [1.0, 0.0, 0.0, 1.0, -bbox.x0, -bbox.y0])?;
        let resources = dictionary! {
            "XObject" => dictionary! {
                "Fm0" => form_id,
            },
        };

        trace!("Placed vector page from {:?}", source_page);
        Ok(self.push_page(bbox.width(), bbox.height(), rotation, resources, content))
    }

    /// Install the new page tree and catalog, returning the document.
    pub fn finish(mut self) -> Result<Document, CompressionError> {
        if self.kids.is_empty() {
            return Err(CompressionError::Assemble("no pages were placed".to_string()));
        }

        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        Ok(self.doc)
    }

    fn push_page(
        &mut self,
        width: f32,
        height: f32,
        rotation: i64,
        resources: Dictionary,
        content: Vec<u8>,
    ) -> ObjectId {
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => rect_array(0.0, 0.0, width, height),
            "Resources" => resources,
            "Contents" => content_id,
        };
        if rotation != 0 {
            page.set("Rotate", rotation);
        }

        let page_id = self.doc.add_object(page);
        self.kids.push(Object::Reference(page_id));
        page_id
    }
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn rect_array(x0: f32, y0: f32, x1: f32, y1: f32) -> Object {
    Object::Array(vec![real(x0), real(y0), real(x1), real(y1)])
}

/// `q <matrix> cm /<name> Do Q`
fn draw_xobject(name: &str, matrix: [f32; 6]) -> Result<Vec<u8>, CompressionError> {
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("cm", matrix.iter().copied().map(real).collect()),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    content
        .encode()
        .map_err(|e| CompressionError::Assemble(format!("failed to encode page content: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::structure::{load_document, page_box, page_ids};
    use crate::pdf::testing::{ascii_hex, build_pdf, with_page_content};
    use crate::models::Rect;

    fn tiny_jpeg() -> JpegImage {
        let image = image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        crate::pdf::codec::encode_jpeg(&image, 80).unwrap()
    }

    #[test]
    fn test_finish_requires_pages() {
        let doc = load_document(&build_pdf(&[(100.0, 100.0)])).unwrap();
        assert!(matches!(
            PageAssembler::new(doc).finish(),
            Err(CompressionError::Assemble(_))
        ));
    }

    #[test]
    fn test_raster_and_vector_pages() {
        let doc = load_document(&build_pdf(&[(612.0, 792.0), (300.0, 400.0)])).unwrap();
        let sources = page_ids(&doc);

        let mut assembler = PageAssembler::new(doc);
        assembler.place_raster_page(612.0, 792.0, tiny_jpeg()).unwrap();
        assembler.place_vector_page(sources[1]).unwrap();
        assert_eq!(assembler.page_count(), 2);

        let doc = assembler.finish().unwrap();
        let pages = page_ids(&doc);
        assert_eq!(pages.len(), 2);
        assert_eq!(page_box(&doc, pages[0]), Some(Rect::from_size(612.0, 792.0)));
        assert_eq!(page_box(&doc, pages[1]), Some(Rect::from_size(300.0, 400.0)));

        let xobjects = |page_id| {
            let resources = structure::page_resources(&doc, page_id).unwrap();
            resources.get(b"XObject").unwrap().as_dict().unwrap().clone()
        };
        let raster = xobjects(pages[0]);
        let image_id = raster.get(b"Im0").unwrap().as_reference().unwrap();
        let image = doc.get_object(image_id).unwrap().as_stream().unwrap();
        assert_eq!(image.dict.get(b"Filter").unwrap().as_name().unwrap(), b"DCTDecode");

        let vector = xobjects(pages[1]);
        let form_id = vector.get(b"Fm0").unwrap().as_reference().unwrap();
        let form = doc.get_object(form_id).unwrap().as_stream().unwrap();
        assert_eq!(form.dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Form");
        assert!(form.dict.get(b"Resources").unwrap().as_dict().unwrap().has(b"Font"));
        assert!(String::from_utf8_lossy(&form.content).contains("Page 2"));
    }

    #[test]
    fn test_vector_page_keeps_rotation_and_crop() {
        let mut doc = load_document(&build_pdf(&[(612.0, 792.0)])).unwrap();
        let source = page_ids(&doc)[0];
        {
            let page = doc.get_dictionary_mut(source).unwrap();
            page.set("Rotate", 90);
            page.set("CropBox", vec![100.into(), 100.into(), 400.into(), 600.into()]);
        }

        let mut assembler = PageAssembler::new(doc);
        let placed = assembler.place_vector_page(source).unwrap();
        let doc = assembler.finish().unwrap();

        assert_eq!(page_box(&doc, placed), Some(Rect::from_size(300.0, 500.0)));
        assert_eq!(structure::page_rotation(&doc, placed), 90);
    }

    #[test]
    fn test_vector_page_keeps_undecodable_filter() {
        let encoded = ascii_hex(b"BT /F1 12 Tf 40 40 Td (Hex) Tj ET");
        let data = with_page_content(
            &build_pdf(&[(612.0, 792.0)]),
            0,
            vec![Stream::new(
                dictionary! { "Filter" => "ASCIIHexDecode" },
                encoded.clone(),
            )],
        );
        let doc = load_document(&data).unwrap();
        let source = page_ids(&doc)[0];

        let mut assembler = PageAssembler::new(doc);
        let placed = assembler.place_vector_page(source).unwrap();
        let doc = assembler.finish().unwrap();

        let resources = structure::page_resources(&doc, placed).unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        let form_id = xobjects.get(b"Fm0").unwrap().as_reference().unwrap();
        let form = doc.get_object(form_id).unwrap().as_stream().unwrap();
        assert_eq!(form.dict.get(b"Filter").unwrap().as_name().unwrap(), b"ASCIIHexDecode");
        assert_eq!(form.content, encoded);
    }

    #[test]
    fn test_vector_page_rejects_split_undecodable_content() {
        let data = with_page_content(
            &build_pdf(&[(612.0, 792.0)]),
            0,
            vec![
                Stream::new(
                    dictionary! { "Filter" => "ASCIIHexDecode" },
                    ascii_hex(b"0 0 m"),
                ),
                Stream::new(dictionary! {}, b"10 10 l S".to_vec()),
            ],
        );
        let doc = load_document(&data).unwrap();
        let source = page_ids(&doc)[0];

        let mut assembler = PageAssembler::new(doc);
        assert!(matches!(
            assembler.place_vector_page(source),
            Err(CompressionError::Assemble(_))
        ));
    }
}
