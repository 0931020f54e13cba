//! Pipe-delimited data files without a format header
//!
//! ```txt
//! task | Pay the rent | 01/11/2026
//! habit | drink water |  | 3 | 8
//! ```
//!
//! Priority and unit are not part of this format and take their default values.
//! Lines that do not fit are skipped without a warning.

use log::debug;

use crate::lib::{
    date::Date,
    record::{Category, Progress, Record, DEFAULT_UNIT},
};

const DELIMITER: &str = " | ";

pub fn decode(path: &str, contents: &str) -> Vec<Record> {
    let mut records = Vec::new();
    for (n, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match read_line(line) {
            Some(rec) => records.push(rec),
            None => debug!("event=legacy_skip path={} line={}", path, n + 1),
        }
    }
    records
}

/// Five fields make a habit, three fields anything else
///
/// `line` is already trimmed, so a blank last field loses its delimiter and
/// the line no longer has enough fields.
fn read_line(line: &str) -> Option<Record> {
    let fields = line.split(DELIMITER).collect::<Vec<_>>();
    match fields.as_slice() {
        [category, text, due, current, target] => {
            let category = category.parse::<Category>().ok().filter(|c| *c == Category::Habit)?;
            let current = current.parse::<u32>().ok()?;
            let target = target.parse::<u32>().ok()?;
            let progress = Progress::new(current, target, DEFAULT_UNIT)?;
            Some(Record::new(category, text).with_due(read_due(due)).with_progress(progress))
        }
        [category, text, due] => {
            let category = category.parse::<Category>().ok().filter(|c| *c != Category::Habit)?;
            Some(Record::new(category, text).with_due(read_due(due)))
        }
        _ => None,
    }
}

/// Unparsable dates count as absent
fn read_due(due: &str) -> Option<Date> {
    due.parse::<Date>().ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::record::Priority;

    #[test]
    fn three_and_five_fields() {
        let records = decode("old.txt", "task | Pay the rent | 01/11/2026\nhabit | drink water |  | 3 | 8\nexpense | food | 02/11/2026\n");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].text(), "Pay the rent");
        assert_eq!(records[0].due(), "01/11/2026".parse().ok());
        assert_eq!(records[0].priority(), Priority::Medium);
        let progress = records[1].progress().unwrap();
        assert_eq!((progress.current, progress.target()), (3, 8));
        // unit is not inferred for legacy habits
        assert_eq!(progress.unit, "times");
        assert_eq!(records[1].due(), None);
        assert_eq!(records[2].category(), Category::Expense);
    }

    #[test]
    fn other_shapes_are_skipped() {
        let contents = "\n========== TASKS 📝 ==========\n\
            ───────────────────────────────\n\
            Description : Pay the rent 📝\n\
            task | only two\n\
            task | a | b | c\n\
            task | a | b | c | d | e\n\
            task | kept | 01/01/2020\n";
        let records = decode("old.txt", contents);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "kept");
    }

    #[test]
    fn invalid_values_are_skipped_or_dropped() {
        let records = decode("old.txt", "chore | a | \n\
            habit | b |  | x | 3\n\
            habit | c |  | 1 | 0\n\
            task | d |  | 1 | 2\n\
            habit | e | \n\
            expense | f | 45/45/2020\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text(), "f");
        assert_eq!(records[0].due(), None);
    }

    #[test]
    fn blank_trailing_due_is_skipped() {
        assert!(decode("old.txt", "task | a | \n").is_empty());
        assert!(decode("old.txt", "expense | food | ").is_empty());
        // a blank due in the middle of a habit line is fine
        assert_eq!(decode("old.txt", "  habit | gym |  | 1 | 3  \n").len(), 1);
    }
}
