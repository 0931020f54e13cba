use std::fmt;
use std::str::FromStr;

use crate::lib::date::Date;

/// The three kinds of records that can be tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Task = 0,
    Habit,
    Expense,
}

impl Category {
    pub const COUNT: usize = 3;
    /// Fixed order used for grouping and statistics
    pub const ALL: [Category; Category::COUNT] = [Category::Task, Category::Habit, Category::Expense];

    /// Lowercase name, as written in the data file
    pub fn name(self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Habit => "habit",
            Category::Expense => "expense",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s.trim().to_lowercase().as_str() {
            "task" => Ok(Category::Task),
            "habit" => Ok(Category::Habit),
            "expense" => Ok(Category::Expense),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Read a priority from user input, falling back to `Medium`
    pub fn coerce(s: &str) -> Self {
        s.parse::<Priority>().unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Priority {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(()),
        }
    }
}

/// Keywords that determine the unit of a habit, first match wins
const HABIT_UNITS: [(&str, &str); 3] = [
    ("water", "glasses"),
    ("gym", "sessions"),
    ("alcohol", "drinks"),
];

pub const DEFAULT_UNIT: &str = "times";

/// Guess how a habit is counted from its description
pub fn infer_unit(text: &str) -> &'static str {
    let text = text.to_lowercase();
    HABIT_UNITS
        .iter()
        .find(|(key, _)| text.contains(key))
        .map(|(_, unit)| *unit)
        .unwrap_or(DEFAULT_UNIT)
}

/// Counters of a habit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    target: u32,
    pub unit: String,
}

impl Progress {
    /// `target` must be at least 1
    pub fn new<S>(current: u32, target: u32, unit: S) -> Option<Self>
    where
        S: ToString,
    {
        if target == 0 {
            None
        } else {
            Some(Self { current, target, unit: unit.to_string() })
        }
    }

    /// Nothing done yet out of a single repetition
    pub fn initial<S>(unit: S) -> Self
    where
        S: ToString,
    {
        Self { current: 0, target: 1, unit: unit.to_string() }
    }

    pub fn target(&self) -> u32 {
        self.target
    }
}

/// One tracked item
///
/// Only habits carry a `Progress`, and every habit carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    category: Category,
    text: String,
    due: Option<Date>,
    priority: Priority,
    progress: Option<Progress>,
}

impl Record {
    /// Create a record with default priority and no due date
    ///
    /// Habits start at `0/1`, counted in the unit inferred from `text`.
    pub fn new<S>(category: Category, text: S) -> Self
    where
        S: ToString,
    {
        let text = text.to_string();
        let progress = match category {
            Category::Habit => Some(Progress::initial(infer_unit(&text))),
            _ => None,
        };
        Self {
            category,
            text,
            due: None,
            priority: Priority::default(),
            progress,
        }
    }

    pub fn with_due(mut self, due: Option<Date>) -> Self {
        self.due = due;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the counters of a habit, no effect on other categories
    pub fn with_progress(mut self, progress: Progress) -> Self {
        if self.progress.is_some() {
            self.progress = Some(progress);
        }
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn due(&self) -> Option<Date> {
        self.due
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn progress(&self) -> Option<&Progress> {
        self.progress.as_ref()
    }

    pub fn set_text<S>(&mut self, text: S)
    where
        S: ToString,
    {
        self.text = text.to_string();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Update the current progress of a habit
    ///
    /// Returns `false` for records that have no progress to update.
    pub fn set_current(&mut self, current: u32) -> bool {
        match &mut self.progress {
            Some(progress) => {
                progress.current = current;
                true
            }
            None => false,
        }
    }

    /// Case-insensitive substring search in the description
    pub fn matches(&self, keyword: &str) -> bool {
        self.text.to_lowercase().contains(&keyword.to_lowercase())
    }
}
