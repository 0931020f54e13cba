//! Serialize records in the current format version
//!
//! The output is read back by `parse::extract` without any loss.

use std::fmt;

use crate::lib::record::Record;
use crate::load::parse::VERSION;

/// Data file contents for a sequence of records
pub struct Encoded<'r>(pub &'r [Record]);

pub fn encode(records: &[Record]) -> String {
    Encoded(records).to_string()
}

impl fmt::Display for Encoded<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@tracker v{}", VERSION)?;
        for rec in self.0 {
            write!(f, "{} {}", rec.category(), quote(rec.text()))?;
            if let Some(due) = rec.due() {
                write!(f, " due={}", due)?;
            }
            write!(f, " priority={}", rec.priority())?;
            if let Some(progress) = rec.progress() {
                write!(
                    f,
                    " progress={}/{} unit={}",
                    progress.current,
                    progress.target(),
                    quote(&progress.unit),
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Quoted and escaped so that the text stays on a single line
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '\r' => quoted.push_str("\\r"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
