//! Operations reachable from the main menu

use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::cli::{table::Table, Session};
use crate::lib::{
    date::Date,
    record::{infer_unit, Category, Priority, Progress, Record},
    view::Line,
};

/// Entries of the delete menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteChoice {
    Single,
    Multiple,
    All,
    Back,
}

impl FromStr for DeleteChoice {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        use DeleteChoice::*;
        match s.trim() {
            "1" => Ok(Single),
            "2" => Ok(Multiple),
            "3" => Ok(All),
            "4" => Ok(Back),
            _ => Err(()),
        }
    }
}

const DELETE_MENU: &str = "\n🗑️ DELETE MENU\n1. Delete Single Item\n2. Delete Multiple Items\n3. Delete All Items\n4. Back to Main Menu";

/// Comma-separated 1-based indices, entries that are not plain numbers are ignored
pub fn parse_indices(input: &str) -> Vec<usize> {
    input
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|n| n.parse::<usize>().ok())
        .collect()
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Add a batch of records sharing a category
    pub(super) fn add(&mut self) -> io::Result<()> {
        let category = loop {
            let input = self.console.ask("Enter category (Task/Habit/Expense): ")?;
            match input.parse::<Category>() {
                Ok(category) => break category,
                Err(()) => self.console.warn("Invalid category! Please enter Task, Habit, or Expense.")?,
            }
        };
        self.console.say("Enter item(s). Type one per line, Enter blank to finish:")?;
        let mut batch = Vec::new();
        loop {
            let text = self.console.ask("> ")?;
            if text.is_empty() {
                break;
            }
            let due = self.ask_due()?;
            let priority = Priority::coerce(&self.console.ask("Enter priority (High/Medium/Low, default Medium): ")?);
            let mut rec = Record::new(category, &text).with_due(due).with_priority(priority);
            if category == Category::Habit {
                rec = rec.with_progress(self.ask_progress(&text)?);
            }
            batch.push(rec);
        }
        if batch.is_empty() {
            return self.console.say("❌ No items entered.");
        }
        let count = batch.len();
        let added = self.tracker.extend(batch);
        info!("event=add category={} count={}", category, count);
        for index in added {
            if let Some(line) = self.line(index).map(|l| l.to_string()) {
                self.console.say(format!("✅ Added: {}", line))?;
            }
        }
        self.persist()
    }

    /// Invalid dates are dropped with a warning
    fn ask_due(&mut self) -> io::Result<Option<Date>> {
        let input = self.console.ask("Enter due date (DD/MM/YYYY) or leave blank: ")?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<Date>() {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                self.console.warn(format!("Invalid date format! Skipping due date. ({}, {})", e, e.fix_hint()))?;
                Ok(None)
            }
        }
    }

    /// Target then current progress, falling back to `0/1` on invalid input
    fn ask_progress(&mut self, text: &str) -> io::Result<Progress> {
        let unit = infer_unit(text);
        let target = self.console.ask(format!("Enter target ({}): ", unit))?.parse::<u32>();
        let progress = match target {
            Ok(target) if target > 0 => {
                let current = self.console.ask(format!("Enter current progress (default 0 {}): ", unit))?;
                if current.is_empty() {
                    Progress::new(0, target, unit)
                } else {
                    current.parse::<u32>().ok().and_then(|current| Progress::new(current, target, unit))
                }
            }
            _ => None,
        };
        match progress {
            Some(progress) => Ok(progress),
            None => {
                self.console.warn(format!("Invalid number! Setting current=0, target=1 {}", unit))?;
                Ok(Progress::initial(unit))
            }
        }
    }

    pub(super) fn list(&mut self) -> io::Result<()> {
        if self.tracker.is_empty() {
            return self.console.say("📂 No items yet!");
        }
        self.show_all()
    }

    /// Replace the description, the progress of habits and the priority
    pub(super) fn update(&mut self) -> io::Result<()> {
        self.list()?;
        if self.tracker.is_empty() {
            return Ok(());
        }
        let index = match self.console.ask("Enter item number to update: ")?.parse::<usize>() {
            Ok(index) => index,
            Err(_) => return self.console.warn("Enter a valid number"),
        };
        let target = match self.tracker.get(index) {
            Some(rec) => rec.progress().map(|p| p.target()),
            None => return self.console.warn("Invalid number"),
        };
        let text = self.console.ask("Enter new description: ")?;
        let current = match target {
            Some(target) => {
                let input = self.console.ask(format!("Enter current progress (0-{}): ", target))?;
                match input.parse::<u32>() {
                    Ok(current) => Some(current),
                    Err(_) => {
                        self.console.warn("Invalid input, keeping previous progress.")?;
                        None
                    }
                }
            }
            None => None,
        };
        let priority = self.console.ask("Enter priority (High/Medium/Low, default Medium): ")?.parse::<Priority>().ok();
        if let Some(rec) = self.tracker.get_mut(index) {
            rec.set_text(text);
            if let Some(current) = current {
                rec.set_current(current);
            }
            if let Some(priority) = priority {
                rec.set_priority(priority);
            }
        }
        info!("event=update index={}", index);
        self.console.say("✅ Item updated!")?;
        self.persist()
    }

    /// Sub-menu for removing one, several or all records
    pub(super) fn delete(&mut self) -> io::Result<()> {
        if self.tracker.is_empty() {
            return self.console.say("📂 No items to delete!");
        }
        loop {
            self.console.say(DELETE_MENU)?;
            match self.console.ask("Choose option (1-4): ")?.parse::<DeleteChoice>() {
                Ok(DeleteChoice::Single) => self.delete_single()?,
                Ok(DeleteChoice::Multiple) => self.delete_multiple()?,
                Ok(DeleteChoice::All) => self.delete_all()?,
                Ok(DeleteChoice::Back) => return Ok(()),
                Err(()) => self.console.warn("Invalid choice, try again!")?,
            }
        }
    }

    fn delete_single(&mut self) -> io::Result<()> {
        self.show_all()?;
        let index = match self.console.ask("Enter item number to delete: ")?.parse::<usize>() {
            Ok(index) => index,
            Err(_) => return self.console.warn("Enter a valid number"),
        };
        match self.tracker.remove(index) {
            Some(removed) => {
                info!("event=delete index={} count=1", index);
                self.persist()?;
                self.console.say(format!("🗑️ Deleted: {}", removed.text()))
            }
            None => self.console.warn("Invalid number"),
        }
    }

    fn delete_multiple(&mut self) -> io::Result<()> {
        self.show_all()?;
        let input = self.console.ask("Enter numbers to delete (comma-separated): ")?;
        let removed = self.tracker.remove_many(&parse_indices(&input));
        info!("event=delete count={}", removed.len());
        for rec in &removed {
            self.console.say(format!("🗑️ Deleted: {}", rec.text()))?;
        }
        self.persist()
    }

    fn delete_all(&mut self) -> io::Result<()> {
        let confirm = self.console.ask("⚠️ Are you sure you want to delete ALL items? (Y/N): ")?;
        if confirm.to_lowercase() != "y" {
            return Ok(());
        }
        let count = self.tracker.clear();
        info!("event=delete count={} all=true", count);
        self.persist()?;
        self.console.say("🗑️ All items deleted!")
    }

    /// Case-insensitive search in descriptions, shown with their index
    pub(super) fn search(&mut self) -> io::Result<()> {
        let keyword = self.console.ask("Enter keyword to search: ")?;
        let today = (self.today)();
        let lines = self
            .tracker
            .search(&keyword)
            .map(|(index, record)| {
                Line { index, record, today, palette: self.console.palette }.to_string()
            })
            .collect::<Vec<_>>();
        debug!("event=search matches={}", lines.len());
        if lines.is_empty() {
            return self.console.say("❌ No match found.");
        }
        for line in lines {
            self.console.say(line)?;
        }
        Ok(())
    }

    pub(super) fn stats(&mut self) -> io::Result<()> {
        let stats = self.tracker.stats((self.today)());
        self.console.say(format!(
            "Total Records: {} | Tasks: {} | Habits: {} | Expenses: {}",
            stats.total(),
            stats.count(Category::Task),
            stats.count(Category::Habit),
            stats.count(Category::Expense),
        ))?;
        self.console.say(Table::from(&stats))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cli::prompt::Console;
    use crate::lib::{tracker::Tracker, view::Palette};
    use crate::load::{error, Store};
    use crate::lib::date::Month;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Run {
        tracker: Tracker,
        out: String,
        saved: Vec<Record>,
    }

    fn fixed_today() -> Date {
        "16/10/2026".parse().unwrap()
    }

    fn task(text: &str) -> Record {
        Record::new(Category::Task, text)
    }

    /// Play `script` on the menu, starting from `records`
    fn run(records: Vec<Record>, script: &str) -> Run {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("tracker.txt");
        let store = Store::new(path.clone(), Some(dir.path().join("report.txt")));
        let console = Console::new(Cursor::new(script.to_string()), Vec::new(), Palette::plain());
        let mut session = Session::new(Tracker::from(records), store.clone(), console, fixed_today);
        session.run().unwrap();
        let (tracker, out) = session.into_parts();
        let mut errs = error::Record::new();
        let saved = store.load(&mut errs).unwrap();
        Run { tracker, out: String::from_utf8(out).unwrap(), saved }
    }

    fn texts(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.text()).collect()
    }

    #[test]
    fn add_a_batch_of_habits() {
        let res = run(vec![], "\
            1\nhobby\nhabit\n\
            drink water\n\nhigh\n8\n3\n\
            go to the gym\n31/02/2026\n\n4\n\n\
            read\n\nlow\nmany\n\
            \n7\n");
        assert!(res.out.contains("Invalid category!"));
        assert!(res.out.contains("Enter target (glasses): "));
        assert!(res.out.contains("Enter target (sessions): "));
        assert!(res.out.contains("Invalid date format! Skipping due date."));
        assert!(res.out.contains("Invalid number! Setting current=0, target=1 times"));
        assert!(res.out.contains("✅ Added: 1. 💧 drink water (Due: ) [████------] 3/8 glasses Priority: 🔴 High"));
        let records = res.tracker.records();
        assert_eq!(records.len(), 3);
        let water = records[0].progress().unwrap();
        assert_eq!((water.current, water.target(), water.unit.as_str()), (3, 8, "glasses"));
        let gym = records[1].progress().unwrap();
        assert_eq!((gym.current, gym.target(), gym.unit.as_str()), (0, 4, "sessions"));
        assert_eq!(records[1].due(), None);
        assert_eq!(records[1].priority(), Priority::Medium);
        let read = records[2].progress().unwrap();
        assert_eq!((read.current, read.target()), (0, 1));
        assert_eq!(records[2].priority(), Priority::Low);
        assert_eq!(res.saved, records);
    }

    #[test]
    fn add_nothing() {
        let res = run(vec![task("a")], "1\ntask\n\n7\n");
        assert!(res.out.contains("❌ No items entered."));
        assert_eq!(res.tracker.len(), 1);
    }

    #[test]
    fn add_tasks_with_dates() {
        let res = run(vec![task("a")], "1\nTask\nold\n1/1/2000\n\nnew\n01/01/2030\nLow\n\n7\n");
        assert!(res.out.contains("✅ Added: 2. 📝 old (Due: 01/01/2000 ⚠️ Overdue) Priority: 🟡 Medium"));
        assert!(res.out.contains("✅ Added: 3. 📝 new (Due: 01/01/2030) Priority: 🟢 Low"));
        assert_eq!(texts(&res.saved), ["a", "old", "new"]);
    }

    #[test]
    fn list_empty_and_full() {
        let res = run(vec![], "2\n7\n");
        assert!(res.out.contains("📂 No items yet!"));
        let res = run(vec![task("a"), task("b")], "2\n7\n");
        assert!(res.out.contains("1. 📝 a (Due: ) Priority: 🟡 Medium\n2. 📝 b (Due: ) Priority: 🟡 Medium\n"));
    }

    #[test]
    fn update_habit() {
        let habit = Record::new(Category::Habit, "drink water")
            .with_progress(Progress::new(1, 8, "glasses").unwrap())
            .with_priority(Priority::High);
        let res = run(vec![task("a"), habit], "3\n2\nwater\n5\nnonsense\n7\n");
        assert!(res.out.contains("Enter current progress (0-8): "));
        assert!(res.out.contains("✅ Item updated!"));
        let rec = &res.saved[1];
        assert_eq!(rec.text(), "water");
        assert_eq!(rec.progress().unwrap().current, 5);
        // unrecognized priority keeps the previous one
        assert_eq!(rec.priority(), Priority::High);
    }

    #[test]
    fn update_rejects_bad_input() {
        let res = run(vec![task("a")], "3\nfirst\n3\n9\n3\n1\nb\nlow\n7\n");
        assert!(res.out.contains("Enter a valid number"));
        assert!(res.out.contains("⚠️ Invalid number"));
        // tasks are not asked for progress
        assert!(!res.out.contains("Enter current progress"));
        assert_eq!(res.saved[0].text(), "b");
        assert_eq!(res.saved[0].priority(), Priority::Low);
    }

    #[test]
    fn update_habit_keeps_progress_on_bad_number() {
        let habit = Record::new(Category::Habit, "gym").with_progress(Progress::new(2, 3, "sessions").unwrap());
        let res = run(vec![habit], "3\n1\ngym\nlots\n\n7\n");
        assert!(res.out.contains("Invalid input, keeping previous progress."));
        assert_eq!(res.saved[0].progress().unwrap().current, 2);
    }

    #[test]
    fn delete_single() {
        let res = run(vec![task("a"), task("b"), task("c")], "4\n1\n2\n1\n0\n1\nx\n4\n7\n");
        assert!(res.out.contains("🗑️ Deleted: b"));
        assert!(res.out.contains("⚠️ Invalid number"));
        assert!(res.out.contains("Enter a valid number"));
        assert_eq!(texts(&res.saved), ["a", "c"]);
    }

    #[test]
    fn delete_multiple() {
        let records = ["1", "2", "3", "4", "5"].iter().map(|t| task(t)).collect();
        let res = run(records, "4\n2\n2, 4,x,4,,9\n4\n7\n");
        assert!(res.out.contains("🗑️ Deleted: 4\n🗑️ Deleted: 2\n"));
        assert_eq!(texts(&res.saved), ["1", "3", "5"]);
    }

    #[test]
    fn delete_all_needs_confirmation() {
        let res = run(vec![task("a"), task("b")], "4\n3\nn\n4\n7\n");
        assert_eq!(res.saved.len(), 2);
        let res = run(vec![task("a"), task("b")], "4\n3\nY\n5\n4\n7\n");
        assert!(res.out.contains("🗑️ All items deleted!"));
        assert!(res.out.contains("Invalid choice, try again!"));
        assert!(res.saved.is_empty());
    }

    #[test]
    fn delete_nothing() {
        let res = run(vec![], "4\n7\n");
        assert!(res.out.contains("📂 No items to delete!"));
    }

    #[test]
    fn search() {
        let records = vec![task("Buy MILK"), task("bread"), Record::new(Category::Expense, "milkshake")];
        let res = run(records.clone(), "5\nmilk\n7\n");
        assert!(res.out.contains("1. 📝 Buy MILK"));
        assert!(res.out.contains("3. 💰 milkshake"));
        assert!(!res.out.contains("bread (Due"));
        let res = run(records.clone(), "5\n\n7\n");
        assert!(res.out.contains("2. 📝 bread"));
        let res = run(records, "5\ncheese\n7\n");
        assert!(res.out.contains("❌ No match found."));
    }

    #[test]
    fn stats() {
        let records = vec![task("a"), task("b"), Record::new(Category::Habit, "c")];
        let res = run(records, "6\n7\n");
        assert!(res.out.contains("Total Records: 3 | Tasks: 2 | Habits: 1 | Expenses: 0\n┌"));
    }

    static CLOCK_READS: AtomicUsize = AtomicUsize::new(0);

    /// 16/10/2026 on the first read, 17/10/2026 afterwards
    fn midnight_passes() -> Date {
        let day = if CLOCK_READS.fetch_add(1, Ordering::SeqCst) == 0 { 16 } else { 17 };
        Date::from(2026, Month::Oct, day).unwrap()
    }

    #[test]
    fn clock_is_read_at_every_render() {
        let rec = task("call mom").with_due("16/10/2026".parse().ok());
        let console = Console::new(Cursor::new("2\n2\n7\n"), Vec::new(), Palette::plain());
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("tracker.txt"), None);
        let mut session = Session::new(Tracker::from(vec![rec]), store, console, midnight_passes);
        session.run().unwrap();
        let out = String::from_utf8(session.into_parts().1).unwrap();
        assert!(out.contains("1. 📝 call mom (Due: 16/10/2026) Priority"), "{}", out);
        assert!(out.contains("1. 📝 call mom (Due: 16/10/2026 ⚠️ Overdue) Priority"), "{}", out);
    }

    #[test]
    fn parse_index_lists() {
        assert_eq!(parse_indices("2,4"), [2, 4]);
        assert_eq!(parse_indices(" 1 , x, -3, 7,"), [1, 7]);
        assert!(parse_indices("").is_empty());
    }
}
