//! Command interpretation and pass orchestration.

pub mod device;
pub mod interpreter;

pub use device::{Canvas, DrawCall, RecordingCanvas};
pub use interpreter::{CommandInterpreter, RenderPass};

use crate::command::Command;
use crate::error::Result;

/// Render a command stream as a two-page check document.
///
/// The in-memory sequence is replayed exactly twice against the same
/// canvas: the check pass, one page advance, then the copy pass. The
/// interpreter state carries over from the first pass into the second.
/// The canvas is not finalized here; that is the caller's job.
pub fn render_document<C: Canvas>(commands: &[Command], canvas: &mut C) -> Result<()> {
    let mut interpreter = CommandInterpreter::new(canvas);
    interpreter.run(commands, RenderPass::Check)?;
    interpreter.canvas_mut().next_page()?;
    interpreter.run(commands, RenderPass::Copy)?;
    Ok(())
}
