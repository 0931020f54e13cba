mod cli;
mod config;
mod lib;
mod load;
mod logging;

use log::{error, info};
use std::io;

use cli::{prompt::Console, Session};
use config::Config;
use lib::{date::Date, tracker::Tracker, view::Palette};
use load::{error::Record, Store};

fn main() {
    let cfg = Config::from_args();
    // flushes the log files when dropped
    let _logger = match &cfg.log_dir {
        Some(dir) => match logging::init_logging(cfg.log_level, dir) {
            Ok(handle) => Some(handle),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let store = Store::new(cfg.data_file.clone(), cfg.report_file.clone());
    info!(
        "event=startup data={} report={}",
        store.data_path().display(),
        store.report_path().map(|p| p.display().to_string()).unwrap_or_default(),
    );
    let mut errs = Record::new();
    let records = store.load(&mut errs);
    if !errs.is_empty() {
        println!("{}", errs.colored(cfg.color));
    }
    let records = match records {
        Some(records) => records,
        None => {
            error!("event=load status=fatal path={}", store.data_path().display());
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout(), Palette::new(cfg.color));
    let mut session = Session::new(Tracker::from(records), store, console, Date::today);
    match session.run() {
        Ok(()) => info!("event=exit status=ok"),
        Err(e) => {
            error!("event=exit status=failed error={}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
