// Service module exports

pub mod ai;
pub mod formatter;
pub mod icalendar;
pub mod input;
pub mod prompt;
pub mod settings;
pub mod study;
