//! The collection of records owned by a session
//!
//! Indices exposed here are 1-based, as shown to the user.

use std::ops::Range;

use crate::lib::{
    date::Date,
    record::{Category, Priority, Record},
    view::is_overdue,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tracker {
    records: Vec<Record>,
}

impl From<Vec<Record>> for Tracker {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl Tracker {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a batch, returns the indices given to the new records
    pub fn extend(&mut self, batch: Vec<Record>) -> Range<usize> {
        let start = self.records.len() + 1;
        self.records.extend(batch);
        start..self.records.len() + 1
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        index.checked_sub(1).and_then(|i| self.records.get(i))
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        index.checked_sub(1).and_then(move |i| self.records.get_mut(i))
    }

    pub fn remove(&mut self, index: usize) -> Option<Record> {
        if (1..=self.records.len()).contains(&index) {
            Some(self.records.remove(index - 1))
        } else {
            None
        }
    }

    /// Remove several records at once
    ///
    /// Indices are deduplicated and processed from the highest down so that
    /// earlier removals do not shift later ones. Out of range indices are
    /// ignored. Removed records are returned in the order they were removed.
    pub fn remove_many(&mut self, indices: &[usize]) -> Vec<Record> {
        let mut indices = indices.to_vec();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .rev()
            .filter_map(|index| self.remove(index))
            .collect()
    }

    /// Remove everything, returns how many records were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.records.len();
        self.records.clear();
        count
    }

    /// Records whose description contains `keyword`, with their index
    pub fn search<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = (usize, &'a Record)> + 'a {
        self.records
            .iter()
            .enumerate()
            .filter(move |(_, rec)| rec.matches(keyword))
            .map(|(i, rec)| (i + 1, rec))
    }

    pub fn stats(&self, today: Date) -> Stats {
        let mut stats = Stats::default();
        for rec in &self.records {
            let idx = rec.category() as usize;
            stats.records[idx] += 1;
            if is_overdue(rec.due(), today) {
                stats.overdue[idx] += 1;
            }
            if rec.priority() == Priority::High {
                stats.high[idx] += 1;
            }
        }
        stats
    }
}

/// Record counts per category
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub records: [usize; Category::COUNT],
    pub overdue: [usize; Category::COUNT],
    pub high: [usize; Category::COUNT],
}

impl Stats {
    pub fn count(&self, cat: Category) -> usize {
        self.records[cat as usize]
    }

    pub fn total(&self) -> usize {
        self.records.iter().sum()
    }
}
