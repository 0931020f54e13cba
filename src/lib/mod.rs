//! Implementations that are useful accross the whole project
//!
//! Date management, record definition, derived views and the record collection

pub mod date;
pub mod record;
pub mod tracker;
pub mod view;
