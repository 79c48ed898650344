// Test fixtures - reusable test data
// Timetables, dates and a canned text generator shared across test files

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use smartgrind::error::StudyError;
use smartgrind::services::ai::{AiResponse, TextGenerator};

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday Jan 6, 2025
    pub fn week_of_jan_6_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
    }

    /// Wednesday Jan 8, 2025; same week as above
    pub fn midweek_jan_8_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 8).unwrap()
    }

    pub fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }
}

/// Sample timetable CSVs
pub mod timetables {
    /// One valid row and one with start after end
    pub const MIXED: &str = "Day,Start,End,Subject,Location\n\
Mon,09:00,10:00,Math,Room 101\n\
Tue,14:00,13:00,Chem,Lab 2\n";

    /// A full week with mixed time formats and optional columns
    pub const FULL_WEEK: &str = "Day,Start,End,Subject,Location,Notes\n\
Monday,9:00,10:30,Math,Room 101,Bring calculator\n\
Tuesday,2:00 PM,3:30 PM,Physics,\"Block A, Room 2\",\n\
Wed,11:00,12:00,History,,Essay due\n\
Thu,08:00,09:00,Biology,Lab 1,\n\
Fri,1PM,2PM,Art,Studio,\n";

    /// Every row has its start after its end
    pub const ALL_BACKWARDS: &str = "Day,Start,End,Subject\n\
Mon,10:00,09:00,Math\n\
Tue,15:00,14:00,Chem\n";

    pub const MISSING_END: &str = "Day,Start,Subject\nMon,09:00,Math\n";

    pub const UNKNOWN_DAY: &str = "Day,Start,End,Subject\nMon,09:00,10:00,Math\nFunday,09:00,10:00,Art\n";
}

/// Generator returning a fixed reply and remembering the prompts it saw
pub struct CannedGenerator {
    reply: Result<String, StudyError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, u32)>>,
}

impl CannedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: StudyError) -> Self {
        Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<(String, u32)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl TextGenerator for CannedGenerator {
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<AiResponse, StudyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_output_tokens));
        match &self.reply {
            Ok(text) => Ok(AiResponse::new(text.clone())),
            Err(err) => Err(err.clone()),
        }
    }
}
