//! Per-action pipeline: input adapter, prompt builder, AI client, formatter.
//!
//! Each call is one synchronous round trip with no state kept between calls.

use std::sync::Arc;

use crate::error::StudyError;
use crate::models::request::{Mode, StudyRequest};
use crate::services::ai::TextGenerator;
use crate::services::formatter::{self, FormattedText};
use crate::services::icalendar::{CalendarBuild, ICalendarService};
use crate::services::input;
use crate::services::prompt::{self, Prompt};

/// Result of one study action
#[derive(Debug, Clone)]
pub enum StudyOutcome {
    Text(FormattedText),
    Calendar(CalendarBuild),
}

impl StudyOutcome {
    /// Short description kept in the display history
    pub fn summary(&self) -> String {
        match self {
            StudyOutcome::Text(text) => text.body.clone(),
            StudyOutcome::Calendar(build) => format!(
                "{} events, {} rows rejected",
                build.event_count(),
                build.rejections.len()
            ),
        }
    }
}

#[derive(Clone)]
pub struct StudyService {
    generator: Arc<dyn TextGenerator>,
    calendar: ICalendarService,
}

impl StudyService {
    pub fn new(generator: Arc<dyn TextGenerator>, calendar: ICalendarService) -> Self {
        Self {
            generator,
            calendar,
        }
    }

    /// Run one request through the pipeline.
    ///
    /// Notes are normalized and roadmap options validated before the model is
    /// called; timetables never reach the model.
    pub fn handle(&self, request: StudyRequest) -> Result<StudyOutcome, StudyError> {
        let mode = request.mode();
        log::info!("Handling {} request", mode.label());
        let outcome = self.run(request);
        log_outcome(mode, &outcome);
        outcome
    }

    fn run(&self, request: StudyRequest) -> Result<StudyOutcome, StudyError> {
        match request {
            StudyRequest::Summarize { notes, style } => {
                let notes = input::normalize_text(&notes)?;
                self.generate_text(&StudyRequest::Summarize { notes, style })
                    .map(StudyOutcome::Text)
            }
            StudyRequest::ScheduleFromCsv { rows, options } => {
                log::debug!("Building calendar from {} rows", rows.len());
                self.calendar
                    .build_calendar(&rows, &options)
                    .map(StudyOutcome::Calendar)
            }
            StudyRequest::Roadmap(options) => {
                options.validate()?;
                self.generate_text(&StudyRequest::Roadmap(options))
                    .map(StudyOutcome::Text)
            }
        }
    }

    fn generate_text(&self, request: &StudyRequest) -> Result<FormattedText, StudyError> {
        let Some(Prompt {
            text,
            max_output_tokens,
        }) = prompt::build_prompt(request)
        else {
            return Err(StudyError::InvalidInput(format!(
                "{} does not use the AI model",
                request.mode().label()
            )));
        };

        let response = self.generator.generate(&text, max_output_tokens)?;
        Ok(match request.mode() {
            Mode::Roadmap => formatter::format_roadmap(&response),
            _ => formatter::format_summary(&response),
        })
    }
}

fn log_outcome<T>(mode: Mode, outcome: &Result<T, StudyError>) {
    match outcome {
        Ok(_) => log::info!("{} request completed", mode.label()),
        Err(StudyError::Service(e)) => log::error!("{} request failed: {}", mode.label(), e),
        Err(e) => log::warn!("{} request rejected: {}", mode.label(), e),
    }
}
