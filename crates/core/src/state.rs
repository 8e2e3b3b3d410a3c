//! Mutable layout state threaded through command interpretation.

use std::ops::BitOrAssign;

/// The MICR font family. Gets a fixed size multiplier and drives the
/// check/copy suppression rules.
pub const MICR_FONT: &str = "AdvMICR";

/// Font display style bit flags.
///
/// Only the bold bit changes the active font family; italic, underline and
/// strikeout are recorded state with no rendering consequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontStyle(u8);

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle(0);
    pub const BOLD: FontStyle = FontStyle(1);
    pub const ITALIC: FontStyle = FontStyle(2);
    pub const UNDERLINE: FontStyle = FontStyle(4);
    pub const STRIKEOUT: FontStyle = FontStyle(8);

    /// Check whether every bit of `other` is set.
    pub fn contains(self, other: FontStyle) -> bool {
        self.0 & other.0 == other.0
    }

    /// Numeric code as it appears in style-flag command arguments.
    pub fn code(self) -> u8 {
        self.0
    }
}

impl BitOrAssign for FontStyle {
    fn bitor_assign(&mut self, rhs: FontStyle) {
        self.0 |= rhs.0;
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        FontStyle::REGULAR
    }
}

/// Coordinate scaling mode for positioning commands.
///
/// Governs how raw coordinate values convert to page points; changing it
/// never reconverts an already-assigned cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Raster twips, 1/20 of a point.
    #[default]
    Twips,
    /// Page points, used verbatim.
    Points,
}

impl ScaleMode {
    /// Map a ScaleMode command code to a mode. Codes other than 1 and 2
    /// are ignored by the caller.
    pub fn from_code(code: i64) -> Option<ScaleMode> {
        match code {
            1 => Some(ScaleMode::Twips),
            2 => Some(ScaleMode::Points),
            _ => None,
        }
    }
}

/// The single mutable context threaded through command dispatch.
///
/// One instance is constructed per run and mutated in place by every
/// command across both rendering passes; it is never reset in between.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    /// Active font family; composed with a `" Bold"` suffix for the bold
    /// variant.
    pub font_name: String,
    /// Active font size in points.
    pub font_size: f64,
    pub font_style: FontStyle,
    pub scale_mode: ScaleMode,
    /// Cursor position in page points, margin offsets already applied.
    pub current_x: f64,
    pub current_y: f64,
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            font_name: String::new(),
            font_size: 0.0,
            font_style: FontStyle::REGULAR,
            scale_mode: ScaleMode::Twips,
            current_x: 0.0,
            current_y: 0.0,
        }
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_bits_accumulate() {
        let mut style = FontStyle::REGULAR;
        style |= FontStyle::ITALIC;
        style |= FontStyle::UNDERLINE;
        assert!(style.contains(FontStyle::ITALIC));
        assert!(style.contains(FontStyle::UNDERLINE));
        assert!(!style.contains(FontStyle::BOLD));
    }

    #[test]
    fn scale_mode_codes() {
        assert_eq!(ScaleMode::from_code(1), Some(ScaleMode::Twips));
        assert_eq!(ScaleMode::from_code(2), Some(ScaleMode::Points));
        assert_eq!(ScaleMode::from_code(0), None);
        assert_eq!(ScaleMode::from_code(3), None);
    }

    #[test]
    fn default_state() {
        let state = LayoutState::new();
        assert_eq!(state.scale_mode, ScaleMode::Twips);
        assert_eq!(state.font_style, FontStyle::REGULAR);
        assert!(state.font_name.is_empty());
        assert_eq!(state.font_size, 0.0);
    }
}
