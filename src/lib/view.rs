//! Derived views of a record: progress bars, icons, overdue markers
//! and the colored one-line summary shown in the menu.

use std::fmt;

use crate::lib::{
    date::Date,
    record::{Category, Priority, Record},
};

pub const BAR_LENGTH: usize = 10;
const BAR_FILLED: char = '█';
const BAR_EMPTY: char = '-';

/// Fixed-width gauge `[███-------] 3/10`
///
/// The number of filled cells is `length * current / target` rounded to the
/// nearest integer (ties to even) and clamped to `length`.
/// A zero `target` counts as complete.
pub fn progress_bar(current: u32, target: u32, length: usize) -> String {
    let filled = filled_cells(current, target, length);
    let mut bar = String::with_capacity(length * 3 + 16);
    bar.push('[');
    bar.extend(std::iter::repeat(BAR_FILLED).take(filled));
    bar.extend(std::iter::repeat(BAR_EMPTY).take(length - filled));
    bar.push(']');
    format!("{} {}/{}", bar, current, target)
}

fn filled_cells(current: u32, target: u32, length: usize) -> usize {
    if target == 0 {
        return length;
    }
    let num = length as u64 * current as u64;
    let den = target as u64;
    let (quot, rem) = (num / den, num % den);
    let rounded = match (2 * rem).cmp(&den) {
        std::cmp::Ordering::Less => quot,
        std::cmp::Ordering::Greater => quot + 1,
        std::cmp::Ordering::Equal => quot + quot % 2,
    };
    (rounded as usize).min(length)
}

/// Default icon of each category
pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Task => "📝",
        Category::Habit => "💪",
        Category::Expense => "💰",
    }
}

/// Icon chosen from keywords in the description
pub fn icon(category: Category, text: &str) -> &'static str {
    let text = text.to_lowercase();
    let keywords: &[(&str, &'static str)] = match category {
        Category::Habit => &[("alcohol", "🍺"), ("water", "💧"), ("gym", "🏋️")],
        Category::Expense => &[("food", "🍔"), ("bill", "💡"), ("transport", "🚗")],
        Category::Task => &[],
    };
    keywords
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, icon)| *icon)
        .unwrap_or_else(|| category_icon(category))
}

pub fn priority_icon(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "🔴",
        Priority::Medium => "🟡",
        Priority::Low => "🟢",
    }
}

/// Absent due dates are never overdue
pub fn is_overdue(due: Option<Date>, today: Date) -> bool {
    due.map(|due| due < today).unwrap_or(false)
}

pub const OVERDUE: &str = "⚠️ Overdue";

/// Terminal escape sequences, empty when colors are disabled
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub blue: &'static str,
    pub cyan: &'static str,
    pub none: &'static str,
}

impl Palette {
    pub fn ansi() -> Self {
        Self {
            red: "\x1b[31m",
            green: "\x1b[32m",
            yellow: "\x1b[33m",
            blue: "\x1b[34m",
            cyan: "\x1b[36m",
            none: "\x1b[0m",
        }
    }

    pub fn plain() -> Self {
        Self {
            red: "",
            green: "",
            yellow: "",
            blue: "",
            cyan: "",
            none: "",
        }
    }

    pub fn new(color: bool) -> Self {
        if color { Self::ansi() } else { Self::plain() }
    }

    fn category(&self, category: Category) -> &'static str {
        match category {
            Category::Task => self.cyan,
            Category::Habit => self.green,
            Category::Expense => self.yellow,
        }
    }

    fn priority(&self, priority: Priority) -> &'static str {
        match priority {
            Priority::High => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.green,
        }
    }
}

/// One-line colored summary of a record, numbered from 1
pub struct Line<'r> {
    pub index: usize,
    pub record: &'r Record,
    pub today: Date,
    pub palette: Palette,
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.palette;
        let rec = self.record;
        write!(
            f,
            "{}{}. {} {} (Due: ",
            p.category(rec.category()),
            self.index,
            icon(rec.category(), rec.text()),
            rec.text(),
        )?;
        if let Some(due) = rec.due() {
            write!(f, "{}", due)?;
            if is_overdue(Some(due), self.today) {
                write!(f, " {}{}{}", p.red, OVERDUE, p.none)?;
            }
        }
        write!(f, ")")?;
        if let Some(progress) = rec.progress() {
            write!(
                f,
                " {}{} {}{}",
                p.blue,
                progress_bar(progress.current, progress.target(), BAR_LENGTH),
                progress.unit,
                p.none,
            )?;
        }
        write!(
            f,
            " Priority: {}{}{} {}{}",
            p.priority(rec.priority()),
            priority_icon(rec.priority()),
            p.none,
            rec.priority(),
            p.none,
        )
    }
}
