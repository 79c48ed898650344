//! HTTP request handlers for the study page

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use uuid::Uuid;

use super::session::{session_cookie, session_id, HistoryEntry};
use super::types::{ErrorResponse, HealthResponse, TextResponse, TimetableResponse};
use super::AppState;
use crate::error::StudyError;
use crate::models::request::{Mode, RoadmapOptions, StudyRequest, SummaryStyle, TimetableOptions};
use crate::services::icalendar::{CALENDAR_FILE_NAME, CALENDAR_MIME};
use crate::services::input::{extract_document_text, parse_timetable_csv};
use crate::services::study::StudyOutcome;

pub const DOWNLOAD_PATH: &str = "/api/timetable/download";
const INPUT_PREVIEW_CHARS: usize = 80;

const INDEX_HTML: &str = include_str!("index.html");

struct Upload {
    file_name: String,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Default)]
struct FormData {
    fields: HashMap<String, String>,
    file: Option<Upload>,
}

impl FormData {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Serve the single-page UI
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_configured: state.ai_configured,
    })
}

/// Summarize pasted notes or an uploaded PDF/TXT document
pub async fn summarize(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let session = session_id(&headers);

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => return finish(&state, session, Mode::Summarize, String::new(), Err(err)).await,
    };
    let style = SummaryStyle::from_form(form.field("style").unwrap_or_default());
    let study = state.study.clone();

    let (input, result) = match form.file {
        Some(upload) => {
            let input = upload.file_name.clone();
            let result = run_blocking(move || {
                let notes = extract_document_text(
                    &upload.file_name,
                    upload.content_type.as_deref(),
                    &upload.data,
                )?;
                study.handle(StudyRequest::Summarize { notes, style })
            })
            .await;
            (input, result)
        }
        None => {
            let notes = form.fields.get("text").cloned().unwrap_or_default();
            let input = preview(&notes);
            let result =
                run_blocking(move || study.handle(StudyRequest::Summarize { notes, style })).await;
            (input, result)
        }
    };

    finish(&state, session, Mode::Summarize, input, result).await
}

/// Convert an uploaded CSV timetable into a downloadable calendar
pub async fn timetable(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let session = session_id(&headers);
    let mut input = String::new();

    let result = async {
        let form = read_form(multipart).await?;
        let options = timetable_options(&form, state.default_alarm_minutes)?;
        let upload = form.file.ok_or_else(|| {
            StudyError::InvalidInput("Please upload a CSV timetable first.".to_string())
        })?;
        input = upload.file_name.clone();

        let rows = parse_timetable_csv(&upload.data)?;
        state
            .study
            .handle(StudyRequest::ScheduleFromCsv { rows, options })
    }
    .await;

    finish(&state, session, Mode::ScheduleFromCsv, input, result).await
}

/// Download the calendar most recently built in this session
pub async fn download_calendar(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_id(&headers);
    match state.sessions.calendar(session).await {
        Some(ics) => (
            [
                (header::CONTENT_TYPE, format!("{}; charset=utf-8", CALENDAR_MIME)),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", CALENDAR_FILE_NAME),
                ),
            ],
            ics,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "not_found".to_string(),
                message: "No calendar generated yet. Upload a timetable first.".to_string(),
                rejections: Vec::new(),
            }),
        )
            .into_response(),
    }
}

/// Generate a study roadmap from a goal
pub async fn roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RoadmapOptions>, JsonRejection>,
) -> Response {
    let session = session_id(&headers);

    let options = match payload {
        Ok(Json(options)) => options,
        Err(rejection) => {
            let err = StudyError::InvalidInput(format!(
                "Invalid roadmap request: {}",
                rejection.body_text()
            ));
            return finish(&state, session, Mode::Roadmap, String::new(), Err(err)).await;
        }
    };
    let input = preview(&options.goal);
    let study = state.study.clone();

    let result = run_blocking(move || study.handle(StudyRequest::Roadmap(options))).await;
    finish(&state, session, Mode::Roadmap, input, result).await
}

/// Display history for this browser session
pub async fn history(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_id(&headers);
    let entries = state.sessions.history(session).await;
    with_cookie(session, Json(entries).into_response())
}

/// Forget the session's history and calendar
pub async fn reset(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_id(&headers);
    state.sessions.reset(session).await;
    log::info!("Session {} reset", session);
    with_cookie(session, StatusCode::NO_CONTENT.into_response())
}

/// Record the outcome in the session and render it
async fn finish(
    state: &AppState,
    session: Uuid,
    mode: Mode,
    input: String,
    result: Result<StudyOutcome, StudyError>,
) -> Response {
    let response = match result {
        Ok(outcome) => {
            state
                .sessions
                .record(session, HistoryEntry::success(mode, input, outcome.summary()))
                .await;
            match outcome {
                StudyOutcome::Text(text) => Json(TextResponse::new(mode, text)).into_response(),
                StudyOutcome::Calendar(build) => {
                    state.sessions.set_calendar(session, build.ics.clone()).await;
                    Json(TimetableResponse {
                        file_name: CALENDAR_FILE_NAME.to_string(),
                        download_url: DOWNLOAD_PATH.to_string(),
                        event_count: build.event_count(),
                        rejections: build.rejections,
                    })
                    .into_response()
                }
            }
        }
        Err(err) => {
            if mode == Mode::ScheduleFromCsv {
                state.sessions.clear_calendar(session).await;
            }
            state
                .sessions
                .record(session, HistoryEntry::failure(mode, input, err.to_string()))
                .await;
            err.into_response()
        }
    };
    with_cookie(session, response)
}

fn with_cookie(session: Uuid, response: Response) -> Response {
    ([(header::SET_COOKIE, session_cookie(session))], response).into_response()
}

/// Run a blocking pipeline call off the async executor
async fn run_blocking<T, F>(f: F) -> Result<T, StudyError>
where
    F: FnOnce() -> Result<T, StudyError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        log::error!("Study worker failed: {}", e);
        StudyError::Service(format!("request worker failed: {}", e))
    })?
}

async fn read_form(mut multipart: Multipart) -> Result<FormData, StudyError> {
    let mut form = FormData::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(malformed)?;
            if !data.is_empty() {
                form.file = Some(Upload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
        } else {
            let value = field.text().await.map_err(malformed)?;
            form.fields.insert(name, value);
        }
    }
    Ok(form)
}

fn malformed(err: axum::extract::multipart::MultipartError) -> StudyError {
    StudyError::InvalidInput(format!("Malformed upload: {}", err))
}

fn timetable_options(form: &FormData, default_alarm: u32) -> Result<TimetableOptions, StudyError> {
    let week_of = match form.field("week_start") {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            StudyError::InvalidInput(format!("Invalid week start date '{}'", value))
        })?,
        None => Local::now().date_naive(),
    };

    let alarm_minutes = match form.field("alarm_minutes") {
        Some(value) => value.parse::<u32>().map_err(|_| {
            StudyError::InvalidInput(format!("Invalid alarm minutes '{}'", value))
        })?,
        None => default_alarm,
    };

    let repeat_weeks = form
        .field("repeat_weeks")
        .map(|value| {
            value.parse::<u32>().map_err(|_| {
                StudyError::InvalidInput(format!("Invalid repeat weeks '{}'", value))
            })
        })
        .transpose()?;

    let options = TimetableOptions {
        week_of,
        alarm_minutes,
        repeat_weeks,
    };
    options.validate()?;
    Ok(options)
}

fn preview(text: &str) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(INPUT_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
