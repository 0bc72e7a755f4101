use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AttendanceStatus, ClassEntry, Day, DaySchedule, Forecast, PendingAssignment, SemesterError,
    Slot, SlotConflict, SlotError, SlotKind, Subject, SubjectError, TIME_SLOTS, Tracker,
    TrackerError,
};

#[derive(Clone)]
pub struct AppState {
    tracker: Arc<RwLock<Tracker>>,
}

impl AppState {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker: Arc::new(RwLock::new(tracker)),
        }
    }

    fn tracker(&self) -> Arc<RwLock<Tracker>> {
        self.tracker.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<TrackerError> for ApiError {
    fn from(value: TrackerError) -> Self {
        match value {
            TrackerError::Semester(SemesterError::SubjectNotFound(_))
            | TrackerError::Semester(SemesterError::Subject(SubjectError::AssignmentNotFound(
                _,
            ))) => ApiError::NotFound(value.to_string()),
            TrackerError::Semester(err) => ApiError::Invalid(err.to_string()),
            TrackerError::Persistence(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<SemesterError> for ApiError {
    fn from(value: SemesterError) -> Self {
        ApiError::from(TrackerError::Semester(value))
    }
}

impl From<SlotError> for ApiError {
    fn from(value: SlotError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// A subject plus the figures a card needs to render it.
#[derive(Debug, Serialize)]
pub struct SubjectView {
    pub index: usize,
    #[serde(flatten)]
    pub subject: Subject,
    pub percentage: f64,
    pub attendance: AttendanceStatus,
    pub message: String,
}

impl SubjectView {
    fn new(index: usize, subject: &Subject) -> Self {
        let attendance = subject.status();
        Self {
            index,
            subject: subject.clone(),
            percentage: subject.percentage(),
            attendance,
            message: attendance.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SlotInfo {
    label: &'static str,
    time: &'static str,
    kind: SlotKind,
}

#[derive(Debug, Deserialize)]
struct NewSubjectPayload {
    name: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    professor: String,
}

#[derive(Debug, Deserialize)]
struct SlotPayload {
    day: String,
    time: String,
}

#[derive(Debug, Deserialize)]
struct NewAssignmentPayload {
    title: String,
    deadline: String,
}

#[derive(Debug, Serialize)]
struct SummaryBody {
    forecast: Forecast,
    message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/slots", get(list_slots))
        .route("/subjects", get(list_subjects).post(create_subject))
        .route(
            "/subjects/:index",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route("/subjects/:index/present", post(mark_present))
        .route("/subjects/:index/absent", post(mark_absent))
        .route("/subjects/:index/schedule", put(replace_schedule))
        .route("/subjects/:index/assignments", post(add_assignment))
        .route(
            "/subjects/:index/assignments/:assignment/complete",
            post(complete_assignment),
        )
        .route("/summary", get(summary))
        .route("/days/:day/classes", get(classes_on_day))
        .route("/timetable", get(timetable))
        .route("/assignments/pending", get(pending_assignments))
        .route("/conflicts", get(conflicts))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, tracker: Tracker) -> std::io::Result<()> {
    let state = AppState::new(tracker);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_slots() -> impl IntoResponse {
    let times: Vec<SlotInfo> = TIME_SLOTS
        .iter()
        .map(|t| SlotInfo {
            label: t.label(),
            time: t.display(),
            kind: t.kind(),
        })
        .collect();
    Json(json!({ "days": Day::ALL, "times": times }))
}

fn view_of(tracker: &Tracker, index: usize) -> Result<SubjectView, ApiError> {
    let subject = tracker.semester().subject(index)?;
    Ok(SubjectView::new(index, subject))
}

async fn list_subjects(State(state): State<AppState>) -> Json<Vec<SubjectView>> {
    let tracker = state.tracker();
    let views = {
        let guard = tracker.read();
        guard
            .subjects()
            .iter()
            .enumerate()
            .map(|(index, subject)| SubjectView::new(index, subject))
            .collect()
    };
    Json(views)
}

async fn get_subject(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SubjectView>, ApiError> {
    let tracker = state.tracker();
    let guard = tracker.read();
    Ok(Json(view_of(&guard, index)?))
}

async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<NewSubjectPayload>,
) -> Result<(StatusCode, Json<SubjectView>), ApiError> {
    let tracker = state.tracker();
    let mut guard = tracker.write();
    let index = guard.add_subject(payload.name, payload.code, payload.professor)?;
    Ok((StatusCode::CREATED, Json(view_of(&guard, index)?)))
}

async fn update_subject(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<NewSubjectPayload>,
) -> Result<Json<SubjectView>, ApiError> {
    let tracker = state.tracker();
    let mut guard = tracker.write();
    guard.edit_details(index, payload.name, payload.code, payload.professor)?;
    Ok(Json(view_of(&guard, index)?))
}

async fn delete_subject(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, ApiError> {
    let tracker = state.tracker();
    tracker.write().remove_subject(index)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn mark_present(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SubjectView>, ApiError> {
    let tracker = state.tracker();
    let mut guard = tracker.write();
    guard.mark_present(index)?;
    Ok(Json(view_of(&guard, index)?))
}

async fn mark_absent(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<SubjectView>, ApiError> {
    let tracker = state.tracker();
    let mut guard = tracker.write();
    guard.mark_absent(index)?;
    Ok(Json(view_of(&guard, index)?))
}

async fn replace_schedule(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<Vec<SlotPayload>>,
) -> Result<Json<SubjectView>, ApiError> {
    let slots = payload
        .iter()
        .map(|entry| Slot::parse(&entry.day, &entry.time))
        .collect::<Result<Vec<_>, _>>()?;
    let tracker = state.tracker();
    let mut guard = tracker.write();
    guard.set_schedule(index, slots)?;
    Ok(Json(view_of(&guard, index)?))
}

async fn add_assignment(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(payload): Json<NewAssignmentPayload>,
) -> Result<(StatusCode, Json<SubjectView>), ApiError> {
    let tracker = state.tracker();
    let mut guard = tracker.write();
    guard.add_assignment(index, payload.title, payload.deadline)?;
    Ok((StatusCode::CREATED, Json(view_of(&guard, index)?)))
}

async fn complete_assignment(
    State(state): State<AppState>,
    Path((index, assignment)): Path<(usize, usize)>,
) -> Result<Json<SubjectView>, ApiError> {
    let tracker = state.tracker();
    let mut guard = tracker.write();
    guard.complete_assignment(index, assignment)?;
    Ok(Json(view_of(&guard, index)?))
}

async fn summary(State(state): State<AppState>) -> Json<SummaryBody> {
    let forecast = state.tracker().read().forecast();
    let message = forecast.to_string();
    Json(SummaryBody { forecast, message })
}

async fn classes_on_day(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> Result<Json<Vec<ClassEntry>>, ApiError> {
    let day: Day = day
        .parse()
        .map_err(|err: SlotError| ApiError::invalid(err.to_string()))?;
    let classes = state.tracker().read().semester().classes_on(day);
    Ok(Json(classes))
}

async fn timetable(State(state): State<AppState>) -> Json<Vec<DaySchedule>> {
    Json(state.tracker().read().semester().timetable())
}

async fn pending_assignments(State(state): State<AppState>) -> Json<Vec<PendingAssignment>> {
    Json(state.tracker().read().semester().pending_assignments())
}

async fn conflicts(State(state): State<AppState>) -> Json<Vec<SlotConflict>> {
    Json(state.tracker().read().semester().conflicts())
}
