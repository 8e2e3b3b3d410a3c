//! The layout command interpreter.
//!
//! A `CommandInterpreter` owns the mutable `LayoutState` and applies one
//! command at a time: a state mutation, a drawing side effect on the
//! borrowed canvas, or both. Dispatch is an exhaustive match over the
//! closed opcode set; the inert opcodes are accepted and traced but have
//! no effect.
//!
//! The same interpreter instance serves both rendering passes. Replaying
//! an identical stream makes the state converge to the same values either
//! way, but the state is intentionally never reset between passes.

use tracing::{debug, error};

use crate::command::{Command, Opcode};
use crate::error::{Result, YCheckError};
use crate::interp::device::Canvas;
use crate::state::{FontStyle, LayoutState, MICR_FONT, ScaleMode};

/// Fixed horizontal offset added to every cursor X assignment, in points.
const SIDE_MARGIN: f64 = 5.0;
/// Vertical offset for cursor Y assignments in the lower page region.
const TOP_MARGIN: f64 = 50.0;
/// Vertical offset for cursor Y assignments near the top of the page.
const TOP_MARGIN_NEAR: f64 = 30.0;
/// Raw Y value below which the near offset applies. Compared against the
/// incoming value before any twips conversion.
const TOP_MARGIN_SWITCH: f64 = 493.2;

/// Which of the two replays of the command stream is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// The plain check view, rendered first.
    Check,
    /// The audit copy view, rendered second with different suppression
    /// rules for a handful of opcodes.
    Copy,
}

impl RenderPass {
    pub fn is_copy(self) -> bool {
        matches!(self, RenderPass::Copy)
    }
}

/// Stateful interpreter for one run over a command stream.
pub struct CommandInterpreter<'a, C: Canvas> {
    state: LayoutState,
    canvas: &'a mut C,
}

impl<'a, C: Canvas> CommandInterpreter<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        Self {
            state: LayoutState::new(),
            canvas,
        }
    }

    /// Current interpreter state (read-only).
    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        self.canvas
    }

    /// Apply every command of the stream in order for one pass.
    pub fn run(&mut self, commands: &[Command], pass: RenderPass) -> Result<()> {
        for command in commands {
            self.execute(command, pass)?;
        }
        Ok(())
    }

    /// Apply a single command.
    ///
    /// Unknown opcodes are reported and skipped; a malformed numeric
    /// argument or a missing required argument aborts the run.
    pub fn execute(&mut self, command: &Command, pass: RenderPass) -> Result<()> {
        match &command.opcode {
            Opcode::FontName => self.do_font_name(command.arg(0)?),
            Opcode::FontSize => {
                let size = self.number(command, 0)?;
                self.do_font_size(size);
            }
            Opcode::FontBold => {
                let flag = self.integer(command, 0)?;
                self.do_font_bold(flag);
            }
            Opcode::FontItalic => {
                let flag = self.integer(command, 0)?;
                self.do_font_italic(flag);
            }
            Opcode::FontUnderline => {
                let flag = self.integer(command, 0)?;
                self.do_font_underline(flag);
            }
            Opcode::FontStrikethru => {
                let flag = self.integer(command, 0)?;
                self.do_font_strikethru(flag);
            }
            Opcode::ScaleMode => {
                let code = self.integer(command, 0)?;
                self.do_scale_mode(code);
            }
            Opcode::CurrentX => {
                let value = self.number(command, 0)?;
                self.do_current_x(value);
            }
            Opcode::CurrentY => {
                let value = self.number(command, 0)?;
                self.do_current_y(value);
            }
            Opcode::Print | Opcode::Print2 => {
                let text = command.arg(0)?.to_string();
                self.do_print(&text, pass)?;
            }
            Opcode::PrintR => {
                let text = command.arg(0)?.to_string();
                self.do_print_right(&text, pass)?;
            }
            Opcode::NonNegotiable => {
                let text = command.arg(0)?.to_string();
                self.do_non_negotiable(&text, pass)?;
            }
            // Accepted without effect: sizing, raster, line and fill
            // attributes the check layouts carry but the renderer does not
            // honor.
            Opcode::PaperSize => debug!("ignoring page size change"),
            Opcode::PaintPicture | Opcode::PaintPicture2 => {
                debug!("ignoring image raster draw");
            }
            Opcode::Orientation => debug!("ignoring orientation change"),
            Opcode::ForeColor => debug!("ignoring foreground color change"),
            Opcode::Line
            | Opcode::Line2
            | Opcode::Line3
            | Opcode::Line4
            | Opcode::Line5
            | Opcode::Line6 => debug!("ignoring line element"),
            Opcode::DrawStyle => debug!("ignoring draw style change"),
            Opcode::FillStyle => debug!("ignoring fill style change"),
            Opcode::FillColor => debug!("ignoring fill color change"),
            Opcode::DrawMode => debug!("ignoring draw mode change"),
            Opcode::DrawWidth => debug!("ignoring stroke width change"),
            Opcode::PaperBin => debug!("ignoring paper bin change"),
            Opcode::AuditInfo => debug!("ignoring audit information"),
            // Logical end marker; the stream may physically continue.
            Opcode::EndDoc => debug!("end of document marker"),
            Opcode::Unknown(name) => error!("unknown operation of type: {name}"),
        }
        Ok(())
    }

    // ========================================================================
    // Font state
    // ========================================================================

    fn do_font_name(&mut self, name: &str) {
        debug!("changing font to {name}");
        self.state.font_name = name.to_string();
        self.state.font_style = FontStyle::REGULAR;
    }

    fn do_font_size(&mut self, size: f64) {
        debug!("changing font size to {size}");
        if self.state.font_name == MICR_FONT {
            self.state.font_size = size * 1.5;
        } else {
            self.state.font_size = size;
        }
    }

    /// Toggle bold. -1 turns it on; every other flag value turns it off
    /// and strips the bold suffix from the family name.
    fn do_font_bold(&mut self, flag: i64) {
        debug!("changing font bold flag to {flag}");
        if flag != -1 {
            self.state.font_style = FontStyle::REGULAR;
            self.state.font_name = self
                .state
                .font_name
                .split("Bold")
                .next()
                .unwrap_or("")
                .trim()
                .to_string();
        } else {
            self.state.font_style |= FontStyle::BOLD;
            if !self.state.font_name.ends_with("Bold") {
                self.state.font_name = format!("{} Bold", self.state.font_name);
            }
        }
    }

    // The remaining style toggles are recorded only; nothing downstream
    // reads the italic, underline or strikeout bits. -1 ORs the bit in;
    // otherwise the flag must repeat the style's own code to set it.

    fn do_font_italic(&mut self, flag: i64) {
        debug!("changing font italic flag to {flag}");
        if flag == -1 {
            self.state.font_style |= FontStyle::ITALIC;
        } else if flag == i64::from(FontStyle::ITALIC.code()) {
            self.state.font_style = FontStyle::ITALIC;
        }
    }

    fn do_font_underline(&mut self, flag: i64) {
        debug!("changing font underline flag to {flag}");
        if flag == -1 {
            self.state.font_style |= FontStyle::UNDERLINE;
        } else if flag == i64::from(FontStyle::UNDERLINE.code()) {
            self.state.font_style = FontStyle::UNDERLINE;
        }
    }

    fn do_font_strikethru(&mut self, flag: i64) {
        debug!("changing font strikeout flag to {flag}");
        if flag == -1 {
            self.state.font_style |= FontStyle::STRIKEOUT;
        } else if flag == i64::from(FontStyle::STRIKEOUT.code()) {
            self.state.font_style = FontStyle::STRIKEOUT;
        }
    }

    // ========================================================================
    // Positioning
    // ========================================================================

    fn do_scale_mode(&mut self, code: i64) {
        match ScaleMode::from_code(code) {
            Some(mode) => {
                debug!("changing scaling mode to {mode:?}");
                self.state.scale_mode = mode;
            }
            None => debug!("ignoring scaling mode code {code}"),
        }
    }

    fn do_current_x(&mut self, value: f64) {
        debug!("changing cursor x to {value}");
        self.state.current_x = match self.state.scale_mode {
            ScaleMode::Twips => value / 20.0 + SIDE_MARGIN,
            ScaleMode::Points => value + SIDE_MARGIN,
        };
    }

    fn do_current_y(&mut self, value: f64) {
        debug!("changing cursor y to {value}");
        let offset = if value < TOP_MARGIN_SWITCH {
            TOP_MARGIN_NEAR
        } else {
            TOP_MARGIN
        };
        self.state.current_y = match self.state.scale_mode {
            ScaleMode::Twips => value / 20.0 + offset,
            ScaleMode::Points => value + offset,
        };
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Left-anchored text. The MICR line is drawn on the check pass only.
    fn do_print(&mut self, text: &str, pass: RenderPass) -> Result<()> {
        if pass.is_copy() && self.state.font_name == MICR_FONT {
            debug!("suppressing MICR text on copy pass");
            return Ok(());
        }
        debug!("writing text {text:?} to canvas");
        self.canvas
            .select_font(&self.state.font_name, self.state.font_size)?;
        let rise = if self.state.font_name == MICR_FONT {
            self.state.font_size / 2.0
        } else {
            self.state.font_size
        };
        self.canvas
            .draw_string(self.state.current_x, self.state.current_y + rise, text)
    }

    /// Right-anchored text with its bounding rectangle. Unlike `do_print`,
    /// the copy pass draws this only when the active font IS the MICR
    /// font.
    fn do_print_right(&mut self, text: &str, pass: RenderPass) -> Result<()> {
        if pass.is_copy() && self.state.font_name != MICR_FONT {
            debug!("suppressing boxed text on copy pass");
            return Ok(());
        }
        debug!("writing boxed text {text:?} to canvas");
        self.canvas
            .select_font(&self.state.font_name, self.state.font_size)?;
        self.canvas.draw_rect(
            10.0,
            10.0,
            80.0 + self.state.current_x.round(),
            self.state.current_y.round(),
        )?;
        self.canvas.draw_string_right(
            self.state.current_x,
            self.state.current_y + self.state.font_size,
            text,
        )
    }

    /// The non-negotiable marker appears on the audit copy only, in a
    /// fixed Arial 14 regardless of interpreter font state. Under twips
    /// scaling the cursor is scaled back up for this one draw.
    fn do_non_negotiable(&mut self, text: &str, pass: RenderPass) -> Result<()> {
        if !pass.is_copy() {
            return Ok(());
        }
        debug!("writing non-negotiable marker to canvas");
        self.canvas.select_font("Arial", 14.0)?;
        let (x, y) = match self.state.scale_mode {
            ScaleMode::Twips => (self.state.current_x * 20.0, self.state.current_y * 20.0),
            ScaleMode::Points => (self.state.current_x, self.state.current_y),
        };
        self.canvas.draw_string(x, y, text)
    }

    // ========================================================================
    // Argument parsing
    // ========================================================================

    fn number(&self, command: &Command, index: usize) -> Result<f64> {
        let raw = command.arg(index)?;
        raw.trim()
            .parse()
            .map_err(|_| YCheckError::InvalidNumber {
                opcode: command.opcode.name().to_string(),
                value: raw.to_string(),
            })
    }

    fn integer(&self, command: &Command, index: usize) -> Result<i64> {
        let raw = command.arg(index)?;
        raw.trim()
            .parse()
            .map_err(|_| YCheckError::InvalidNumber {
                opcode: command.opcode.name().to_string(),
                value: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::device::{DrawCall, RecordingCanvas};

    fn cmd(name: &str, args: &[&str]) -> Command {
        Command::new(
            Opcode::from_name(name),
            args.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn run_check(commands: &[Command]) -> (LayoutState, RecordingCanvas) {
        let mut canvas = RecordingCanvas::new();
        let mut interp = CommandInterpreter::new(&mut canvas);
        interp.run(commands, RenderPass::Check).unwrap();
        let state = interp.state().clone();
        (state, canvas)
    }

    #[test]
    fn micr_font_size_gets_multiplier() {
        let (state, _) = run_check(&[cmd("FontName", &["AdvMICR"]), cmd("FontSize", &["10"])]);
        assert_eq!(state.font_size, 15.0);

        let (state, _) = run_check(&[cmd("FontName", &["Arial"]), cmd("FontSize", &["10"])]);
        assert_eq!(state.font_size, 10.0);
    }

    #[test]
    fn bold_toggle_composes_family_name() {
        let (state, _) = run_check(&[cmd("FontName", &["Courier New"]), cmd("FontBold", &["-1"])]);
        assert_eq!(state.font_name, "Courier New Bold");
        assert!(state.font_style.contains(FontStyle::BOLD));

        // Already-bold names are not suffixed twice.
        let (state, _) = run_check(&[
            cmd("FontName", &["Courier New"]),
            cmd("FontBold", &["-1"]),
            cmd("FontBold", &["-1"]),
        ]);
        assert_eq!(state.font_name, "Courier New Bold");

        // Any flag other than -1 turns bold off and strips the suffix.
        let (state, _) = run_check(&[
            cmd("FontName", &["Courier New"]),
            cmd("FontBold", &["-1"]),
            cmd("FontBold", &["0"]),
        ]);
        assert_eq!(state.font_name, "Courier New");
        assert_eq!(state.font_style, FontStyle::REGULAR);
    }

    #[test]
    fn font_name_resets_style_but_keeps_suffix() {
        let (state, _) = run_check(&[
            cmd("FontName", &["Arial"]),
            cmd("FontBold", &["-1"]),
            cmd("FontName", &["Arial Bold"]),
        ]);
        assert_eq!(state.font_name, "Arial Bold");
        assert_eq!(state.font_style, FontStyle::REGULAR);
    }

    #[test]
    fn italic_flag_sentinels() {
        let (state, _) = run_check(&[cmd("FontItalic", &["-1"])]);
        assert!(state.font_style.contains(FontStyle::ITALIC));

        let (state, _) = run_check(&[cmd("FontItalic", &["2"])]);
        assert_eq!(state.font_style, FontStyle::ITALIC);

        let (state, _) = run_check(&[cmd("FontItalic", &["5"])]);
        assert_eq!(state.font_style, FontStyle::REGULAR);
    }

    #[test]
    fn cursor_x_scaling() {
        let (state, _) = run_check(&[cmd("CurrentX", &["100"])]);
        assert_eq!(state.current_x, 10.0);

        let (state, _) = run_check(&[cmd("ScaleMode", &["2"]), cmd("CurrentX", &["100"])]);
        assert_eq!(state.current_x, 105.0);
    }

    #[test]
    fn cursor_y_margin_depends_on_raw_value() {
        // Below the switch threshold the near offset applies.
        let (state, _) = run_check(&[cmd("CurrentY", &["400"])]);
        assert_eq!(state.current_y, 400.0 / 20.0 + 30.0);

        // At or above it, the deep offset applies, still on the raw value.
        let (state, _) = run_check(&[cmd("CurrentY", &["500"])]);
        assert_eq!(state.current_y, 500.0 / 20.0 + 50.0);

        // Points mode keeps the value but the threshold logic is the same.
        let (state, _) = run_check(&[cmd("ScaleMode", &["2"]), cmd("CurrentY", &["100"])]);
        assert_eq!(state.current_y, 130.0);
    }

    #[test]
    fn scale_mode_unknown_code_is_ignored() {
        let (state, _) = run_check(&[cmd("ScaleMode", &["2"]), cmd("ScaleMode", &["7"])]);
        assert_eq!(state.scale_mode, ScaleMode::Points);
    }

    #[test]
    fn unknown_opcode_is_nonfatal_and_inert() {
        let (state, canvas) = run_check(&[cmd("Sparkle", &["1", "2"])]);
        assert_eq!(state, LayoutState::new());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn inert_opcodes_accepted_without_drawing() {
        let commands = [
            cmd("PaperSize", &["1"]),
            cmd("PaintPicture", &[]),
            cmd("Orientation", &["2"]),
            cmd("ForeColor", &["0"]),
            cmd("Line3", &["0", "0", "10", "10"]),
            cmd("FillStyle", &["1"]),
            cmd("DrawWidth", &["3"]),
            cmd("AuditInfo", &["x"]),
            cmd("EndDoc", &[]),
        ];
        let (state, canvas) = run_check(&commands);
        assert_eq!(state, LayoutState::new());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn bad_numeric_argument_aborts() {
        let mut canvas = RecordingCanvas::new();
        let mut interp = CommandInterpreter::new(&mut canvas);
        let err = interp
            .execute(&cmd("FontSize", &["ten"]), RenderPass::Check)
            .unwrap_err();
        assert!(matches!(err, YCheckError::InvalidNumber { .. }));
    }

    #[test]
    fn missing_argument_aborts() {
        let mut canvas = RecordingCanvas::new();
        let mut interp = CommandInterpreter::new(&mut canvas);
        let err = interp
            .execute(&cmd("Print", &[]), RenderPass::Check)
            .unwrap_err();
        assert!(matches!(err, YCheckError::MissingArgument { .. }));
    }

    #[test]
    fn print_vertical_offset_halves_for_micr() {
        let (_, canvas) = run_check(&[
            cmd("FontName", &["AdvMICR"]),
            cmd("FontSize", &["10"]),
            cmd("CurrentX", &["0"]),
            cmd("CurrentY", &["0"]),
            cmd("Print", &["12345"]),
        ]);
        // Size is 15 after the MICR multiplier; the draw rises by size/2.
        assert_eq!(
            canvas.calls.last().unwrap(),
            &DrawCall::Text {
                x: 5.0,
                y: 30.0 + 7.5,
                text: "12345".to_string(),
            }
        );
    }

    #[test]
    fn print_right_draws_rect_from_rounded_cursor() {
        let (_, canvas) = run_check(&[
            cmd("FontName", &["Arial"]),
            cmd("FontSize", &["10"]),
            cmd("ScaleMode", &["2"]),
            cmd("CurrentX", &["100.4"]),
            cmd("CurrentY", &["600.6"]),
            cmd("PrintR", &["VOID"]),
        ]);
        assert_eq!(
            canvas.calls[1],
            DrawCall::Rect {
                x: 10.0,
                y: 10.0,
                width: 80.0 + 105.0,
                height: 651.0,
            }
        );
        assert_eq!(
            canvas.calls[2],
            DrawCall::TextRight {
                x: 105.4,
                y: 650.6 + 10.0,
                text: "VOID".to_string(),
            }
        );
    }
}
