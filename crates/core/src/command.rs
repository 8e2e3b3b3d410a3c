//! Command stream parsing.
//!
//! A yCheck2 layout file is a headerless CSV where each row is one drawing
//! or layout command: an opcode name followed by its positional string
//! arguments. Rows are read in full before interpretation begins and the
//! resulting sequence is replayed once per rendering pass.

use crate::error::{Result, YCheckError};

/// The closed set of command opcodes.
///
/// Every opcode the format defines gets its own variant, including the ones
/// that are deliberately inert, so dispatch stays an exhaustive match.
/// Names that are not part of the format land in `Unknown` with the raw
/// opcode string preserved for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
    FontName,
    FontSize,
    FontBold,
    FontItalic,
    FontUnderline,
    FontStrikethru,
    ScaleMode,
    PaperSize,
    CurrentX,
    CurrentY,
    Print,
    Print2,
    PrintR,
    NonNegotiable,
    PaintPicture,
    PaintPicture2,
    Orientation,
    ForeColor,
    Line,
    Line2,
    Line3,
    Line4,
    Line5,
    Line6,
    DrawStyle,
    FillStyle,
    FillColor,
    DrawMode,
    DrawWidth,
    PaperBin,
    AuditInfo,
    EndDoc,
    Unknown(String),
}

impl Opcode {
    /// Map an opcode name from the command file onto the closed set.
    pub fn from_name(name: &str) -> Opcode {
        match name {
            "FontName" => Opcode::FontName,
            "FontSize" => Opcode::FontSize,
            "FontBold" => Opcode::FontBold,
            "FontItalic" => Opcode::FontItalic,
            "FontUnderline" => Opcode::FontUnderline,
            "FontStrikethru" => Opcode::FontStrikethru,
            "ScaleMode" => Opcode::ScaleMode,
            "PaperSize" => Opcode::PaperSize,
            "CurrentX" => Opcode::CurrentX,
            "CurrentY" => Opcode::CurrentY,
            "Print" => Opcode::Print,
            "Print2" => Opcode::Print2,
            "PrintR" => Opcode::PrintR,
            "NonNegotiable" => Opcode::NonNegotiable,
            "PaintPicture" => Opcode::PaintPicture,
            "PaintPicture2" => Opcode::PaintPicture2,
            "Orientation" => Opcode::Orientation,
            "ForeColor" => Opcode::ForeColor,
            "Line" => Opcode::Line,
            "Line2" => Opcode::Line2,
            "Line3" => Opcode::Line3,
            "Line4" => Opcode::Line4,
            "Line5" => Opcode::Line5,
            "Line6" => Opcode::Line6,
            "DrawStyle" => Opcode::DrawStyle,
            "FillStyle" => Opcode::FillStyle,
            "FillColor" => Opcode::FillColor,
            "DrawMode" => Opcode::DrawMode,
            "DrawWidth" => Opcode::DrawWidth,
            "PaperBin" => Opcode::PaperBin,
            "AuditInfo" => Opcode::AuditInfo,
            "EndDoc" => Opcode::EndDoc,
            other => Opcode::Unknown(other.to_string()),
        }
    }

    /// The opcode's name as it appears in the command file.
    pub fn name(&self) -> &str {
        match self {
            Opcode::FontName => "FontName",
            Opcode::FontSize => "FontSize",
            Opcode::FontBold => "FontBold",
            Opcode::FontItalic => "FontItalic",
            Opcode::FontUnderline => "FontUnderline",
            Opcode::FontStrikethru => "FontStrikethru",
            Opcode::ScaleMode => "ScaleMode",
            Opcode::PaperSize => "PaperSize",
            Opcode::CurrentX => "CurrentX",
            Opcode::CurrentY => "CurrentY",
            Opcode::Print => "Print",
            Opcode::Print2 => "Print2",
            Opcode::PrintR => "PrintR",
            Opcode::NonNegotiable => "NonNegotiable",
            Opcode::PaintPicture => "PaintPicture",
            Opcode::PaintPicture2 => "PaintPicture2",
            Opcode::Orientation => "Orientation",
            Opcode::ForeColor => "ForeColor",
            Opcode::Line => "Line",
            Opcode::Line2 => "Line2",
            Opcode::Line3 => "Line3",
            Opcode::Line4 => "Line4",
            Opcode::Line5 => "Line5",
            Opcode::Line6 => "Line6",
            Opcode::DrawStyle => "DrawStyle",
            Opcode::FillStyle => "FillStyle",
            Opcode::FillColor => "FillColor",
            Opcode::DrawMode => "DrawMode",
            Opcode::DrawWidth => "DrawWidth",
            Opcode::PaperBin => "PaperBin",
            Opcode::AuditInfo => "AuditInfo",
            Opcode::EndDoc => "EndDoc",
            Opcode::Unknown(name) => name,
        }
    }
}

/// One command record: opcode plus positional string arguments.
///
/// Argument count and meaning are opcode-specific; handlers validate only
/// what they consume.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub opcode: Opcode,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(opcode: Opcode, args: Vec<String>) -> Self {
        Self { opcode, args }
    }

    /// Positional argument by index; absence is fatal to the run.
    pub fn arg(&self, index: usize) -> Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| YCheckError::MissingArgument {
                opcode: self.opcode.name().to_string(),
                index,
            })
    }
}

/// Read an entire command file into an ordered command sequence.
///
/// Blank records are skipped; everything else is kept, including commands
/// with unknown opcodes (the interpreter reports those per-record).
pub fn read_commands(data: &[u8]) -> Result<Vec<Command>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut commands = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let Some(name) = fields.next() else {
            continue;
        };
        if name.is_empty() && record.len() == 1 {
            continue;
        }
        let args = fields.map(str::to_string).collect();
        commands.push(Command::new(Opcode::from_name(name), args));
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_opcodes_round_trip() {
        for name in ["FontName", "Print", "CurrentX", "Line4", "EndDoc"] {
            let opcode = Opcode::from_name(name);
            assert_eq!(opcode.name(), name);
            assert!(!matches!(opcode, Opcode::Unknown(_)));
        }
    }

    #[test]
    fn unknown_opcode_keeps_raw_name() {
        let opcode = Opcode::from_name("Sparkle");
        assert_eq!(opcode, Opcode::Unknown("Sparkle".to_string()));
        assert_eq!(opcode.name(), "Sparkle");
    }

    #[test]
    fn reads_rows_in_order() {
        let data = b"FontName,Arial\nFontSize,10\nPrint,Hello\n";
        let commands = read_commands(data).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].opcode, Opcode::FontName);
        assert_eq!(commands[0].args, vec!["Arial"]);
        assert_eq!(commands[2].arg(0).unwrap(), "Hello");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let data = b"Print,\"One, two, three\"\n";
        let commands = read_commands(data).unwrap();
        assert_eq!(commands[0].arg(0).unwrap(), "One, two, three");
    }

    #[test]
    fn blank_rows_are_skipped() {
        let data = b"FontName,Arial\n\nEndDoc\n";
        let commands = read_commands(data).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1].opcode, Opcode::EndDoc);
    }

    #[test]
    fn missing_argument_is_reported() {
        let command = Command::new(Opcode::Print, Vec::new());
        let err = command.arg(0).unwrap_err();
        assert!(matches!(
            err,
            crate::error::YCheckError::MissingArgument { index: 0, .. }
        ));
    }
}
