//! One-call conversion API.
//!
//! Ties the layers together: archive extraction, command parsing, font
//! registration, two-pass interpretation, document serialization.

use std::path::{Path, PathBuf};

use crate::archive::extract_command_file;
use crate::command::read_commands;
use crate::error::Result;
use crate::font::FontLibrary;
use crate::interp::render_document;
use crate::pdf::PdfCanvas;

/// Options for a conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Directory holding the check font files (`<family>.ttf`).
    pub fonts_dir: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("fonts"),
        }
    }
}

/// Convert a yCheck2 archive into a two-page check/copy PDF at `output`.
pub fn convert_archive(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let data = extract_command_file(input)?;
    let commands = read_commands(&data)?;
    let library = FontLibrary::load_dir(&options.fonts_dir)?;
    let mut canvas = PdfCanvas::new(library)?;
    render_document(&commands, &mut canvas)?;
    canvas.save(output)
}
