// Module exports for models

pub mod event;
pub mod request;
pub mod settings;
pub mod timetable;
