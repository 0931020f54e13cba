//! Interactive menu over the records of a session

pub mod ops;
pub mod prompt;
pub mod table;

use log::{error, info};
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::lib::{date::Date, tracker::Tracker, view::Line};
use crate::load::Store;
use prompt::Console;

const MENU: &str = "\n1. Add Item(s)\n2. List items\n3. Update item\n4. Delete item\n5. Search items\n6. View Stats\n7. Exit";

/// Entries of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Add,
    List,
    Update,
    Delete,
    Search,
    Stats,
    Exit,
}

impl FromStr for Choice {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, ()> {
        use Choice::*;
        match s.trim() {
            "1" => Ok(Add),
            "2" => Ok(List),
            "3" => Ok(Update),
            "4" => Ok(Delete),
            "5" => Ok(Search),
            "6" => Ok(Stats),
            "7" => Ok(Exit),
            _ => Err(()),
        }
    }
}

/// Everything the menu operates on
///
/// The session owns the records, every operation borrows them through it.
pub struct Session<R, W> {
    tracker: Tracker,
    store: Store,
    console: Console<R, W>,
    /// read again at every render so that long sessions see the date change
    today: fn() -> Date,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(tracker: Tracker, store: Store, console: Console<R, W>, today: fn() -> Date) -> Self {
        Self { tracker, store, console, today }
    }

    /// Show the menu until the user exits or input runs out
    ///
    /// Only console failures are returned as errors, the records are saved
    /// on the way out in every other case.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.console.say(MENU)?;
            let outcome = match self.console.ask("Choose option (1-7): ") {
                Ok(input) => match input.parse::<Choice>() {
                    Ok(Choice::Exit) => break,
                    Ok(choice) => self.dispatch(choice),
                    Err(()) => self.console.warn("Invalid option, try again!"),
                },
                Err(e) => Err(e),
            };
            match outcome {
                Ok(()) => (),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    info!("event=input_closed");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        self.persist()?;
        self.console.say("💾 Data saved. Goodbye!")
    }

    fn dispatch(&mut self, choice: Choice) -> io::Result<()> {
        match choice {
            Choice::Add => self.add(),
            Choice::List => self.list(),
            Choice::Update => self.update(),
            Choice::Delete => self.delete(),
            Choice::Search => self.search(),
            Choice::Stats => self.stats(),
            Choice::Exit => Ok(()),
        }
    }

    /// Write all records, failures are shown but do not end the session
    fn persist(&mut self) -> io::Result<()> {
        match self.store.save(self.tracker.records(), (self.today)()) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("event=save status=failed error={}", e);
                self.console.warn(format!("Could not save: {}", e))
            }
        }
    }

    fn line(&self, index: usize) -> Option<Line<'_>> {
        self.tracker.get(index).map(|record| Line {
            index,
            record,
            today: (self.today)(),
            palette: self.console.palette,
        })
    }

    /// Print every record, numbered
    fn show_all(&mut self) -> io::Result<()> {
        let lines = (1..=self.tracker.len())
            .filter_map(|i| self.line(i).map(|l| l.to_string()))
            .collect::<Vec<_>>();
        for line in lines {
            self.console.say(line)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_parts(self) -> (Tracker, W) {
        (self.tracker, self.console.into_output())
    }
}
