use color_print::cprintln;
use m11asm::error::{Warning, WarningKind};

#[derive(Debug)]
pub enum Msg {
    Warn(String),
    Note(String),
}

impl Msg {
    /// `text` is the command as the listing shows it.
    pub fn diag(&self, file: &str, line: usize, text: Option<&str>) {
        match self {
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
        if let Some(text) = text {
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", line, text);
            cprintln!("      <blue>|</>");
        }
    }
}

/// The warning itself plus a note pointing at related code, if any.
pub fn from_warning(warning: &Warning) -> (Msg, Option<(Msg, usize)>) {
    let note = match &warning.kind {
        WarningKind::RedefinedLabel { previous_line, .. } => Some((
            Msg::Note(
                "Already defined here. The value has been overridden. If this is not intentional, please reorder the program."
                    .to_string(),
            ),
            *previous_line,
        )),
        WarningKind::BranchOutOfRange { .. } => None,
    };
    (Msg::Warn(warning.kind.to_string()), note)
}
