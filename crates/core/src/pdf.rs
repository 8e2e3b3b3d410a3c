//! PDF canvas backend.
//!
//! Serializes the interpreter's draw calls into a letter-size PDF with
//! the registered check fonts embedded as TrueType programs. The canvas
//! exposes the top-left-origin convention the layout commands are written
//! in; Y values flip to the PDF's bottom-up space at emission time.

use std::collections::BTreeMap;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::encoding::encode_lossy;
use crate::error::{Result, YCheckError};
use crate::font::{FontFace, FontLibrary};
use crate::interp::Canvas;

/// Letter page, in points.
pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;

struct EmbeddedFont {
    /// Resource name inside the page font dictionary ("F1", "F2", ...).
    resource: String,
    object_id: ObjectId,
}

/// A canvas that accumulates page content streams and serializes the
/// finished document with `save`.
pub struct PdfCanvas {
    doc: Document,
    library: FontLibrary,
    embedded: BTreeMap<String, EmbeddedFont>,
    finished_pages: Vec<Vec<Operation>>,
    operations: Vec<Operation>,
    active_font: Option<(String, f64)>,
}

impl PdfCanvas {
    /// Create a canvas and embed every face of the library into the
    /// document up front; both pages share the embedded set.
    pub fn new(library: FontLibrary) -> Result<PdfCanvas> {
        let mut doc = Document::with_version("1.5");
        let mut embedded = BTreeMap::new();
        for (index, face) in library.faces().enumerate() {
            let object_id = embed_font(&mut doc, face);
            embedded.insert(
                face.family.clone(),
                EmbeddedFont {
                    resource: format!("F{}", index + 1),
                    object_id,
                },
            );
        }
        Ok(PdfCanvas {
            doc,
            library,
            embedded,
            finished_pages: Vec::new(),
            operations: Vec::new(),
            active_font: None,
        })
    }

    /// Finish the in-progress page and write the document to `path`.
    pub fn save(mut self, path: &Path) -> Result<()> {
        let pages: Vec<Vec<Operation>> = self
            .finished_pages
            .drain(..)
            .chain(std::iter::once(std::mem::take(&mut self.operations)))
            .collect();

        let pages_id = self.doc.new_object_id();

        let mut font_dict = Dictionary::new();
        for font in self.embedded.values() {
            font_dict.set(font.resource.clone(), Object::Reference(font.object_id));
        }
        let resources_id = self.doc.add_object(dictionary! {
            "Font" => Object::Dictionary(font_dict),
        });

        let mut kids = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations };
            let content_id = self
                .doc
                .add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "Contents" => Object::Reference(content_id),
                "Resources" => Object::Reference(resources_id),
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(PAGE_WIDTH as f32),
                    Object::Real(PAGE_HEIGHT as f32),
                ],
            });
            kids.push(Object::Reference(page_id));
        }

        let page_count = kids.len() as i64;
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));
        self.doc.compress();
        self.doc.save(path)?;
        Ok(())
    }

    fn active(&self) -> Result<(&EmbeddedFont, &FontFace, f64)> {
        let (family, size) = self
            .active_font
            .as_ref()
            .ok_or(YCheckError::NoFontSelected)?;
        let font = self
            .embedded
            .get(family)
            .ok_or_else(|| YCheckError::UnknownFont(family.clone()))?;
        let face = self
            .library
            .get(family)
            .ok_or_else(|| YCheckError::UnknownFont(family.clone()))?;
        Ok((font, face, *size))
    }

    fn emit_text(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        let (font, _, size) = self.active()?;
        let resource = font.resource.clone();
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(resource.into_bytes()),
                Object::Real(size as f32),
            ],
        ));
        self.operations.push(Operation::new(
            "Td",
            vec![
                Object::Real(x as f32),
                Object::Real((PAGE_HEIGHT - y) as f32),
            ],
        ));
        self.operations.push(Operation::new(
            "Tj",
            vec![Object::String(encode_lossy(text), StringFormat::Literal)],
        ));
        self.operations.push(Operation::new("ET", vec![]));
        Ok(())
    }
}

impl Canvas for PdfCanvas {
    fn select_font(&mut self, family: &str, size: f64) -> Result<()> {
        if !self.embedded.contains_key(family) {
            return Err(YCheckError::UnknownFont(family.to_string()));
        }
        self.active_font = Some((family.to_string(), size));
        Ok(())
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        self.emit_text(x, y, text)
    }

    fn draw_string_right(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        let (_, face, size) = self.active()?;
        let width = face.string_width(size, text);
        self.emit_text(x - width, y, text)
    }

    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.operations.push(Operation::new(
            "re",
            vec![
                Object::Real(x as f32),
                Object::Real((PAGE_HEIGHT - y - height) as f32),
                Object::Real(width as f32),
                Object::Real(height as f32),
            ],
        ));
        self.operations.push(Operation::new("S", vec![]));
        Ok(())
    }

    fn next_page(&mut self) -> Result<()> {
        self.finished_pages
            .push(std::mem::take(&mut self.operations));
        Ok(())
    }
}

/// Embed one TrueType face: font program stream, descriptor, and the
/// WinAnsi-encoded simple font dictionary referencing both.
fn embed_font(doc: &mut Document, face: &FontFace) -> ObjectId {
    // PDF name objects cannot contain spaces.
    let base_name = face.family.replace(' ', "");

    let program_id = doc.add_object(Stream::new(
        dictionary! { "Length1" => face.data.len() as i64 },
        face.data.clone(),
    ));

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => Object::Name(base_name.clone().into_bytes()),
        "Flags" => 32,
        "FontBBox" => face
            .bbox
            .iter()
            .map(|&v| Object::Integer(face.to_milliem(v)))
            .collect::<Vec<_>>(),
        "ItalicAngle" => Object::Real(face.italic_angle),
        "Ascent" => face.to_milliem(face.ascent),
        "Descent" => face.to_milliem(face.descent),
        "CapHeight" => face.to_milliem(face.cap_height),
        "StemV" => 80,
        "FontFile2" => Object::Reference(program_id),
    });

    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "TrueType",
        "BaseFont" => Object::Name(base_name.into_bytes()),
        "FirstChar" => 32,
        "LastChar" => 255,
        "Widths" => face
            .widths_1000()
            .into_iter()
            .map(Object::Integer)
            .collect::<Vec<_>>(),
        "FontDescriptor" => Object::Reference(descriptor_id),
        "Encoding" => "WinAnsiEncoding",
    })
}
