//! Pretty-printing facility for problems found in the data file
//!
//! In fairness, this is mostly a wrapper around `pest::error::Error::new_from_span`,
//! the difficult part of the formatting is handled and `Error` only adds aggregation
//! of messages as well as colored output.
//!
//! # Example
//!
//! ```rust
//! errs.make("Duplicate field definition")
//!     .nonfatal()
//!     .span(&loc, "attempt to override due")
//!     .text("Each field may only be defined once")
//!     .hint("remove one of the field definitions");
//! ```
//!
//! ```txt
//! --> Warning: Duplicate field definition
//!  |     --> tracker.txt:3:27
//!  |      |
//!  |    3 | task "pay rent" due=01/11/2026 due=02/11/2026
//!  |      |                                ^------------^
//!  |      |
//!  |      = attempt to override due
//!  |  Each field may only be defined once
//!  |      ? hint: remove one of the field definitions
//! ```

use std::fmt;

use crate::load::parse::Rule;

/// Location of an error
///
/// Contains information on the file in which the error
/// occured and the precise span within that file
pub type Loc<'i> = (&'i str, pest::Span<'i>);

/// Report for a single error
///
/// All messages (`label` passed with `make`, arguments of `hint`
/// and `text`) should fit in a single line.
#[must_use]
#[derive(Debug)]
pub struct Error {
    /// determines the error label (warning/error) and the color (yellow/red)
    fatal: bool,
    /// name of the error
    label: String,
    /// contents of the error
    items: Vec<Item>,
}

/// Kinds of items that can be added to an error report
#[derive(Debug)]
enum Item {
    /// code block
    Block(pest::error::Error<Rule>),
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

/// A collection of errors
///
/// Typically to keep record of all errors detected in one file,
/// but the structure itself makes no assumption regarding the
/// spatial or semantic relationship between these errors
#[must_use]
#[derive(Debug, Default)]
pub struct Record {
    /// how many are errors, the rest are warnings
    /// counts only `contents[..contents.len()-1]`
    fatal: usize,
    contents: Vec<Error>,
    /// print without terminal escapes
    plain: bool,
}

impl Error {
    fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Add a pre-existing error (e.g. to build from a parsing error)
    pub fn from(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.items.push(Item::Block(err.renamed_rules(rule_rename)));
        self
    }

    /// Mark as a warning rather that a fatal error
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Add a code block and its associated message
    pub fn span<S>(&mut self, loc: &Loc, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Block(
            pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError {
                    message: msg.to_string(),
                },
                loc.1.clone(),
            )
            .with_path(loc.0),
        ));
        self
    }

    /// Add an important note
    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }

    #[cfg(test)]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Record {
    /// Initialize a new pool of errors (e.g. to record errors from another file)
    pub fn new() -> Self {
        Self::default()
    }

    /// Print with or without terminal colors, colors are on by default
    pub fn colored(&mut self, color: bool) -> &mut Self {
        self.plain = !color;
        self
    }

    /// Checks if any of the recorded errors are fatal
    pub fn is_fatal(&self) -> bool {
        self.fatal > 0 || self.last_is_fatal()
    }

    fn last_is_fatal(&self) -> bool {
        self.contents.last().map(|e| e.fatal).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Number of fatal errors
    pub fn count_errors(&self) -> usize {
        self.fatal + if self.last_is_fatal() { 1 } else { 0 }
    }

    /// Number of nonfatal errors
    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    /// All reports, in the order they were emitted
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.contents.iter()
    }

    /// Add a new error to the pool
    ///
    /// The error is fatal unless `nonfatal` is called on it.
    pub fn make<S>(&mut self, msg: S) -> &mut Error
    where
        S: ToString,
    {
        if self.last_is_fatal() {
            self.fatal += 1;
        }
        let idx = self.contents.len();
        self.contents.push(Error::new(msg));
        &mut self.contents[idx]
    }
}

/// Escape sequences used by the reports
struct Colors {
    red: &'static str,
    yellow: &'static str,
    blue: &'static str,
    white: &'static str,
    none: &'static str,
}

const ANSI: Colors = Colors {
    red: "\x1b[0;91;1m",
    yellow: "\x1b[0;93;1m",
    blue: "\x1b[0;96;1m",
    white: "\x1b[0;1m",
    none: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    red: "",
    yellow: "",
    blue: "",
    white: "",
    none: "",
};

impl Error {
    fn write(&self, f: &mut fmt::Formatter<'_>, c: &Colors) -> fmt::Result {
        let (color, header) = if self.fatal {
            (c.red, "--> Error")
        } else {
            (c.yellow, "--> Warning")
        };
        writeln!(f, "{}{}:{} {}{}", color, header, c.white, self.label, c.none)?;
        for item in &self.items {
            match item {
                Item::Block(err) => {
                    let mut align = "   ".to_string();
                    let mut align_found = false;
                    for line in format!("{}", err).split('\n') {
                        write!(
                            f,
                            " {}|{}  {}",
                            color,
                            if align_found { &align } else { "" },
                            c.blue
                        )?;
                        for ch in line.chars() {
                            match ch {
                                '-' if !align_found => {
                                    align_found = true;
                                    write!(f, "{}-", align)?;
                                }
                                ' ' if !align_found => {
                                    align.pop();
                                    write!(f, " ")?;
                                }
                                '|' => write!(f, "|{}", c.none)?,
                                '=' => write!(f, "={}", c.none)?,
                                '^' => write!(f, "{}^", color)?,
                                '␊' => (), // pest displays line endings as a visible symbol
                                _ => write!(f, "{}", ch)?,
                            }
                        }
                        writeln!(f)?;
                    }
                }
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", color, c.white, txt, c.none)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", color, c.blue, c.none, txt)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contents.is_empty() {
            return Ok(());
        }
        let fatal = self.is_fatal();
        let count = if fatal {
            self.count_errors()
        } else {
            self.count_warnings()
        };
        let c = if self.plain { &PLAIN } else { &ANSI };
        let color = if fatal { c.red } else { c.yellow };
        let trunc = 10;
        for err in self
            .contents
            .iter()
            .filter(|err| err.fatal == fatal)
            .take(trunc)
        {
            // only print errors with the maximum fatality
            err.write(f, c)?;
            writeln!(f)?;
        }
        if count > trunc {
            writeln!(f, "{} And {} more.", color, count - trunc)?;
        }
        let plural = if count > 1 { "s" } else { "" };
        if fatal {
            writeln!(
                f,
                "{}Fatal: {}{} error{} emitted{}",
                color, c.white, count, plural, c.none
            )?;
        } else {
            writeln!(
                f,
                "{}Nonfatal: {}{} warning{} emitted{}",
                color, c.white, count, plural, c.none
            )?;
        }
        Ok(())
    }
}

/// Convert rule names to user-friendly information about their purpose
fn rule_rename(r: &Rule) -> String {
    String::from(match r {
        Rule::EOI => "end of file",
        Rule::version => "a format version number",
        Rule::header => "a header '@tracker v1'",
        Rule::category => "a category (task, habit, expense)",
        Rule::priority => "a priority (High, Medium, Low)",
        Rule::number => "a number",
        Rule::date => "a date DD/MM/YYYY",
        Rule::escape => "an escaped character",
        Rule::string => "a string of non-'\"' characters",
        Rule::text => "a quoted description ('\"foo\"')",
        Rule::due_field => "a 'due' field descriptor",
        Rule::priority_field => "a 'priority' field descriptor",
        Rule::progress_field => "a 'progress' field descriptor",
        Rule::unit_field => "a 'unit' field descriptor",
        Rule::record => "a record",
        Rule::malformed => "an unrecognized line",
        Rule::file => "a tracker data file",
        _ => "a separator",
    })
}
