//! Drawing surface interface for command interpretation.
//!
//! The interpreter renders through the `Canvas` trait so the same dispatch
//! drives the production PDF backend and the recording backend used by
//! tests and diagnostics. Coordinates are page points with the origin at
//! the top-left corner; y grows downward.

use crate::error::Result;

/// A stateful 2-D page surface.
///
/// Font families must be registered with the concrete implementation
/// before the first `select_font` call for them.
pub trait Canvas {
    /// Make (family, size) the active font for subsequent draws.
    fn select_font(&mut self, family: &str, size: f64) -> Result<()>;

    /// Draw `text` left-anchored at (x, y) in the active font.
    fn draw_string(&mut self, x: f64, y: f64, text: &str) -> Result<()>;

    /// Draw `text` ending at x, i.e. right-anchored, at (x, y).
    fn draw_string_right(&mut self, x: f64, y: f64, text: &str) -> Result<()>;

    /// Stroke a rectangle with top-left corner (x, y) and the given extent.
    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()>;

    /// Finish the current page and start a new one.
    fn next_page(&mut self) -> Result<()>;
}

/// One captured canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    SelectFont { family: String, size: f64 },
    Text { x: f64, y: f64, text: String },
    TextRight { x: f64, y: f64, text: String },
    Rect { x: f64, y: f64, width: f64, height: f64 },
    PageBreak,
}

/// Canvas that records every call instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls that put ink on the page (everything except font selection
    /// and page breaks).
    pub fn draw_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| {
                matches!(
                    call,
                    DrawCall::Text { .. } | DrawCall::TextRight { .. } | DrawCall::Rect { .. }
                )
            })
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn select_font(&mut self, family: &str, size: f64) -> Result<()> {
        self.calls.push(DrawCall::SelectFont {
            family: family.to_string(),
            size,
        });
        Ok(())
    }

    fn draw_string(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        self.calls.push(DrawCall::Text {
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }

    fn draw_string_right(&mut self, x: f64, y: f64, text: &str) -> Result<()> {
        self.calls.push(DrawCall::TextRight {
            x,
            y,
            text: text.to_string(),
        });
        Ok(())
    }

    fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn next_page(&mut self) -> Result<()> {
        self.calls.push(DrawCall::PageBreak);
        Ok(())
    }
}
