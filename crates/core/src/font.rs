//! Check font loading and metrics.
//!
//! Check layouts reference a fixed set of TrueType families that must be
//! registered before rendering. Each face is parsed once at load time;
//! the metrics the PDF embedder and the right-anchor math need (units per
//! em, per-code advances, descriptor values) are captured up front so the
//! raw font bytes can be stored without keeping a parsed borrow alive.

use std::path::Path;

use crate::encoding::from_winansi;
use crate::error::{Result, YCheckError};

/// Font families a check layout may select, loaded as `<family>.ttf`.
pub const CHECK_FAMILIES: [&str; 5] = [
    "Courier New",
    "Courier New Bold",
    "Arial",
    "Arial Bold",
    "AdvMICR",
];

const FIRST_CODE: u8 = 32;

/// One loaded TrueType face with the metrics rendering needs.
#[derive(Debug, Clone)]
pub struct FontFace {
    pub family: String,
    /// Raw TrueType program, embedded verbatim into the document.
    pub data: Vec<u8>,
    pub units_per_em: u16,
    /// Font-unit metrics for the descriptor.
    pub ascent: i16,
    pub descent: i16,
    pub cap_height: i16,
    pub italic_angle: f32,
    pub bbox: [i16; 4],
    /// Horizontal advances in font units for WinAnsi codes 32..=255.
    pub advances: Vec<u16>,
}

impl FontFace {
    /// Parse a TrueType program and capture its metrics.
    pub fn parse(family: &str, data: Vec<u8>) -> Result<FontFace> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| YCheckError::FontLoad {
            family: family.to_string(),
            reason: e.to_string(),
        })?;

        let units_per_em = face.units_per_em().max(1);
        let ascent = face.ascender();
        let descent = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascent);
        let italic_angle = face.italic_angle().unwrap_or(0.0);
        let rect = face.global_bounding_box();
        let bbox = [rect.x_min, rect.y_min, rect.x_max, rect.y_max];

        let advances = (FIRST_CODE..=255u8)
            .map(|code| {
                from_winansi(code)
                    .and_then(|c| face.glyph_index(c))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .unwrap_or(0)
            })
            .collect();

        Ok(FontFace {
            family: family.to_string(),
            data,
            units_per_em,
            ascent,
            descent,
            cap_height,
            italic_angle,
            bbox,
            advances,
        })
    }

    /// Advance in font units for one WinAnsi byte code.
    pub fn advance(&self, code: u8) -> u16 {
        if code < FIRST_CODE {
            return 0;
        }
        self.advances
            .get((code - FIRST_CODE) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Glyph widths for codes 32..=255 scaled to a 1000-unit em, as the
    /// font dictionary's Widths array expects.
    pub fn widths_1000(&self) -> Vec<i64> {
        let scale = 1000.0 / f64::from(self.units_per_em);
        self.advances
            .iter()
            .map(|&advance| (f64::from(advance) * scale).round() as i64)
            .collect()
    }

    /// Scale a font-unit value to a 1000-unit em.
    pub fn to_milliem(&self, value: i16) -> i64 {
        (f64::from(value) * 1000.0 / f64::from(self.units_per_em)).round() as i64
    }

    /// Rendered width of `text` at `size` points, WinAnsi-encoded the way
    /// the canvas will draw it.
    pub fn string_width(&self, size: f64, text: &str) -> f64 {
        let scale = size / f64::from(self.units_per_em);
        crate::encoding::encode_lossy(text)
            .iter()
            .map(|&code| f64::from(self.advance(code)) * scale)
            .sum()
    }
}

/// The set of registered faces for one rendering run.
#[derive(Debug, Default)]
pub struct FontLibrary {
    faces: Vec<FontFace>,
}

impl FontLibrary {
    /// Library with no registered faces. Selecting any family fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every check family from `dir`, failing on the first family
    /// whose file is missing or unparsable.
    pub fn load_dir(dir: &Path) -> Result<FontLibrary> {
        let mut library = FontLibrary::default();
        for family in CHECK_FAMILIES {
            let path = dir.join(format!("{family}.ttf"));
            let data = std::fs::read(&path).map_err(|e| YCheckError::FontLoad {
                family: family.to_string(),
                reason: format!("{}: {e}", path.display()),
            })?;
            library.faces.push(FontFace::parse(family, data)?);
        }
        Ok(library)
    }

    pub fn get(&self, family: &str) -> Option<&FontFace> {
        self.faces.iter().find(|face| face.family == family)
    }

    pub fn faces(&self) -> impl Iterator<Item = &FontFace> {
        self.faces.iter()
    }

    /// Register a pre-built face. Used by tests; production loading goes
    /// through `load_dir`.
    pub fn insert(&mut self, face: FontFace) {
        self.faces.push(face);
    }
}
