//! Grouped, decorated export of the records
//!
//! Meant to be read by a human, it is never parsed back.

use std::fmt;

use crate::lib::{
    date::Date,
    record::{Category, Record},
    view::{category_icon, icon, is_overdue, priority_icon, progress_bar, BAR_LENGTH, OVERDUE},
};

const HLINE: &str = "───────────────────────────────";
const BANNER: &str = "==========";

/// Records grouped by category (task, habit, expense), empty groups omitted
pub struct Report<'r> {
    pub records: &'r [Record],
    pub today: Date,
}

pub fn render(records: &[Record], today: Date) -> String {
    Report { records, today }.to_string()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cat in Category::ALL {
            let mut group = self.records.iter().filter(|rec| rec.category() == cat).peekable();
            if group.peek().is_none() {
                continue;
            }
            writeln!(
                f,
                "\n{} {}S {} {}",
                BANNER,
                cat.name().to_uppercase(),
                category_icon(cat),
                BANNER,
            )?;
            for rec in group {
                self.block(f, rec)?;
            }
        }
        Ok(())
    }
}

impl Report<'_> {
    fn block(&self, f: &mut fmt::Formatter<'_>, rec: &Record) -> fmt::Result {
        writeln!(f, "{}", HLINE)?;
        writeln!(f, "Description : {} {}", rec.text(), icon(rec.category(), rec.text()))?;
        if let Some(due) = rec.due() {
            if is_overdue(Some(due), self.today) {
                writeln!(f, "Due Date : {} {}", due, OVERDUE)?;
            } else {
                writeln!(f, "Due Date : {}", due)?;
            }
        }
        if let Some(progress) = rec.progress() {
            writeln!(
                f,
                "Progress : {} {}",
                progress_bar(progress.current, progress.target(), BAR_LENGTH),
                progress.unit,
            )?;
        }
        writeln!(f, "Priority : {} ({})", rec.priority(), priority_icon(rec.priority()))?;
        writeln!(f, "{}\n", HLINE)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::record::{Priority, Progress};

    #[test]
    fn grouped_layout() {
        let today = "16/10/2026".parse::<Date>().unwrap();
        let records = vec![
            Record::new(Category::Habit, "drink water")
                .with_progress(Progress::new(3, 10, "glasses").unwrap()),
            Record::new(Category::Task, "old chore")
                .with_due("01/01/2000".parse().ok())
                .with_priority(Priority::High),
            Record::new(Category::Task, "future chore")
                .with_due("01/01/2030".parse().ok()),
        ];
        assert_eq!(
            render(&records, today),
            "\n========== TASKS 📝 ==========\n\
            ───────────────────────────────\n\
            Description : old chore 📝\n\
            Due Date : 01/01/2000 ⚠️ Overdue\n\
            Priority : High (🔴)\n\
            ───────────────────────────────\n\
            \n\
            ───────────────────────────────\n\
            Description : future chore 📝\n\
            Due Date : 01/01/2030\n\
            Priority : Medium (🟡)\n\
            ───────────────────────────────\n\
            \n\
            \n========== HABITS 💪 ==========\n\
            ───────────────────────────────\n\
            Description : drink water 💧\n\
            Progress : [███-------] 3/10 glasses\n\
            Priority : Medium (🟡)\n\
            ───────────────────────────────\n\
            \n",
        );
    }

    #[test]
    fn nothing_to_report() {
        let today = "16/10/2026".parse::<Date>().unwrap();
        assert_eq!(render(&[], today), "");
    }
}
