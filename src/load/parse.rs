//! Convert the contents of a data file into records
//!
//! Grammar errors in a single line never interrupt the parsing of the file:
//! the line is reported and skipped.

#![allow(clippy::upper_case_acronyms)]

use pest::Parser;
use pest_derive::*;

/// Wrapper around Pest's `Pair`
type Pair<'i> = pest::iterators::Pair<'i, Rule>;
/// Wrapper around Pest's `Pairs`
type Pairs<'i> = pest::iterators::Pairs<'i, Rule>;

use crate::lib::{
    date::Date,
    record::{infer_unit, Category, Priority, Progress, Record},
};
use crate::load::error;

/// Format version written by this program
pub const VERSION: u32 = 1;

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "load/tracker.pest"]
pub struct TrackerParser;

/// A field that may be given at most once per record
struct Once<'i, T> {
    name: &'i str,
    valid: bool,
    data: Option<T>,
}

impl<'i, T> Once<'i, T> {
    fn new(name: &'i str) -> Self {
        Self {
            name,
            valid: true,
            data: None,
        }
    }

    fn try_set(&mut self, val: T, loc: &error::Loc, errs: &mut error::Record) {
        if self.data.is_some() {
            errs.make("Duplicate field definition")
                .nonfatal()
                .span(loc, format!("attempt to override {}", self.name))
                .text("Each field may only be defined once, the record is skipped")
                .hint("remove one of the field definitions");
            self.valid = false;
        }
        self.data = Some(val);
    }

    /// `None` if the field was defined several times
    fn try_get(self) -> Option<Option<T>> {
        if self.valid {
            Some(self.data)
        } else {
            None
        }
    }
}

// extract contents of wrapper rule
macro_rules! subrule {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No subrule"));
        if items.next().is_some() {
            panic!("Several subrules");
        }
        fst
    }};
}

// extract two-element inner
macro_rules! pair {
    ( $node:expr ) => {{
        let mut items = $node.into_inner();
        let fst = items.next().unwrap_or_else(|| panic!("No 1st"));
        let snd = items.next().unwrap_or_else(|| panic!("No 2nd"));
        assert!(items.next().is_none());
        (fst, snd)
    }};
}

/// Does the file start with a format header
///
/// Files without one are legacy files.
pub fn is_versioned(contents: &str) -> bool {
    contents
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.starts_with("@tracker"))
        .unwrap_or(false)
}

/// Get the records of a versioned file
///
/// The return value contains all records that were read successfully,
/// problems are reported in `errs`. Caller should check `errs.is_fatal()`
/// before trusting the result.
pub fn extract(path: &str, errs: &mut error::Record, contents: &str) -> Vec<Record> {
    match TrackerParser::parse(Rule::file, contents) {
        Ok(mut pairs) => match pairs.next() {
            Some(file) => validate(path, errs, file.into_inner()),
            None => Vec::new(),
        },
        Err(e) => {
            errs.make("Parsing failure")
                .from(e.with_path(path))
                .hint(format!("the first line of the file should be '@tracker v{}'", VERSION));
            Vec::new()
        }
    }
}

/// Check all lines
///
/// Sequentially validates each record, records errors, accumulates the
/// correct ones into the return value.
fn validate<'i>(path: &'i str, errs: &mut error::Record, pairs: Pairs<'i>) -> Vec<Record> {
    let mut records = Vec::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::header => {
                if !validate_header(path, errs, pair) {
                    return Vec::new();
                }
            }
            Rule::record => {
                if let Some(rec) = validate_record(path, errs, pair) {
                    records.push(rec);
                }
            }
            Rule::malformed => {
                let loc = (path, pair.as_span());
                errs.make("Unrecognized line")
                    .nonfatal()
                    .span(&loc, "skipped")
                    .text("This line does not have the shape of a record")
                    .hint("records look like: task \"Pay the rent\" due=01/11/2026 priority=High");
            }
            Rule::EOI => break,
            _ => unreachable!(),
        }
    }
    records
}

/// Only the current format version is understood
fn validate_header(path: &str, errs: &mut error::Record, pair: Pair) -> bool {
    let loc = (path, pair.as_span());
    let version = subrule!(pair);
    match version.as_str().parse::<u32>() {
        Ok(VERSION) => true,
        _ => {
            errs.make("Unsupported format version")
                .span(&loc, "declared here")
                .text(format!("This program reads format v{} only", VERSION))
                .hint("the file was probably written by a newer version of the tracker");
            false
        }
    }
}

/// Build a record from its fields
///
/// The grammar guarantees the category and description come first,
/// everything after that is checked here.
fn validate_record(path: &str, errs: &mut error::Record, pair: Pair) -> Option<Record> {
    let loc = (path, pair.as_span());
    let mut items = pair.into_inner();
    let category = validate_category(path, errs, items.next()?)?;
    let text = read_text(items.next()?);
    let mut due = Once::new("due");
    let mut priority = Once::new("priority");
    let mut progress = Once::new("progress");
    let mut unit = Once::new("unit");
    for field in items {
        let field_loc = (path, field.as_span());
        match field.as_rule() {
            Rule::due_field => {
                let date = validate_date(path, errs, subrule!(field));
                due.try_set(date, &field_loc, errs);
            }
            Rule::priority_field => {
                let prio = validate_priority(path, errs, subrule!(field));
                priority.try_set(prio, &field_loc, errs);
            }
            Rule::progress_field => {
                let (current, target) = pair!(field);
                let counters = (read_counter(path, errs, current)?, read_counter(path, errs, target)?);
                progress.try_set(counters, &field_loc, errs);
            }
            Rule::unit_field => {
                unit.try_set(read_text(subrule!(field)), &field_loc, errs);
            }
            _ => unreachable!(),
        }
    }
    let due = due.try_get()?.flatten();
    let priority = priority.try_get()?.unwrap_or_default();
    let progress = progress.try_get()?;
    let unit = unit.try_get()?;
    let rec = Record::new(category, &text).with_due(due).with_priority(priority);
    if category != Category::Habit {
        if progress.is_some() || unit.is_some() {
            errs.make("Unexpected field")
                .nonfatal()
                .span(&loc, format!("{} has no progress", category))
                .text("'progress' and 'unit' only apply to habits, they are ignored")
                .hint("remove the fields or change the category to habit");
        }
        return Some(rec);
    }
    let (current, target) = match progress {
        Some(counters) => counters,
        None => {
            errs.make("Missing field definition")
                .nonfatal()
                .span(&loc, "'progress' may not be omitted")
                .text("Every habit has a progress, the record is skipped")
                .hint("add definition for the missing field: 'progress=0/1'");
            return None;
        }
    };
    let unit = unit.unwrap_or_else(|| infer_unit(&text).to_string());
    match Progress::new(current, target, unit) {
        Some(progress) => Some(rec.with_progress(progress)),
        None => {
            errs.make("Invalid target")
                .nonfatal()
                .span(&loc, "target is 0")
                .text("A habit needs a target of at least 1, the record is skipped")
                .hint(format!("use 'progress={}/1'", current));
            None
        }
    }
}

/// Parse a record category
fn validate_category(path: &str, errs: &mut error::Record, pair: Pair) -> Option<Category> {
    let loc = (path, pair.as_span());
    match pair.as_str().parse::<Category>() {
        Ok(category) => Some(category),
        Err(()) => {
            errs.make("Invalid category")
                .nonfatal()
                .span(&loc, "provided here")
                .text(format!("'{}' is not a valid category, the record is skipped", pair.as_str()))
                .hint("use one of task, habit, expense");
            None
        }
    }
}

/// Parse a priority, unknown ones fall back to Medium
fn validate_priority(path: &str, errs: &mut error::Record, pair: Pair) -> Priority {
    let loc = (path, pair.as_span());
    match pair.as_str().parse::<Priority>() {
        Ok(priority) => priority,
        Err(()) => {
            errs.make("Invalid priority")
                .nonfatal()
                .span(&loc, "provided here")
                .text(format!("'{}' is not a valid priority, using Medium", pair.as_str()))
                .hint("use one of High, Medium, Low");
            Priority::Medium
        }
    }
}

/// Parse a due date, invalid ones are dropped
fn validate_date(path: &str, errs: &mut error::Record, pair: Pair) -> Option<Date> {
    let loc = (path, pair.as_span());
    match pair.as_str().parse::<Date>() {
        Ok(date) => Some(date),
        Err(e) => {
            errs.make("Invalid date")
                .nonfatal()
                .span(&loc, "provided here")
                .text(format!("{}, the due date is dropped", e))
                .hint("choose a date that exists")
                .hint(e.fix_hint());
            None
        }
    }
}

/// Parse a progress counter
///
/// Grammar ensures these are digits, only the range can be wrong
fn read_counter(path: &str, errs: &mut error::Record, pair: Pair) -> Option<u32> {
    let loc = (path, pair.as_span());
    match pair.as_str().parse::<u32>() {
        Ok(n) => Some(n),
        Err(_) => {
            errs.make("Counter out of range")
                .nonfatal()
                .span(&loc, "provided here")
                .text(format!("counters may not exceed {}, the record is skipped", u32::MAX))
                .hint("use a smaller number");
            None
        }
    }
}

/// Unescape a quoted description
///
/// Grammar ensures every backslash is followed by the character it escapes
fn read_text(pair: Pair) -> String {
    let raw = subrule!(pair).as_str();
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('r') => text.push('\r'),
                Some('n') => text.push('\n'),
                escaped => text.extend(escaped),
            },
            c => text.push(c),
        }
    }
    text
}
