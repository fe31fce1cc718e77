use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::calendar::Calendar;
use crate::data::{
    ClassGrid, ClassGroup, ClassId, Classroom, ClassroomId, Course, CourseId, EntryId,
    GenerationReport, Suggestion, Teacher, TeacherId, TimeSlot, TimetableEntry,
};
use crate::error::ScheduleError;
use crate::store::Store;
use crate::{queries, reschedule, solver};

/// Shared store. Mutating handlers take the write lock, queries the read
/// lock, so a query never sees a half-finished generate or reschedule.
pub type AppState = Arc<RwLock<Store>>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ScheduleError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScheduleError::NotFound(_)
            | ScheduleError::UnknownCourse(_)
            | ScheduleError::UnknownTeacher(_)
            | ScheduleError::UnknownClassroom(_)
            | ScheduleError::UnknownName { .. } => StatusCode::NOT_FOUND,
            ScheduleError::Conflict { .. }
            | ScheduleError::DuplicateName { .. }
            | ScheduleError::DuplicateAssignment { .. } => StatusCode::CONFLICT,
            ScheduleError::EmptyCalendar | ScheduleError::Json(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ScheduleError>;

/// JSON request body. Unlike `axum::Json`, a body that fails to parse is
/// answered with the same `{error, message}` shape as every other failure.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        serde_json::from_slice(&body)
            .map(JsonBody)
            .map_err(|e| ScheduleError::from(e).into_response())
    }
}

#[derive(Debug, Deserialize)]
pub struct NewClassroom {
    pub name: String,
    pub capacity: u32,
}

#[derive(Debug, Deserialize)]
pub struct NewCourse {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewTeacher {
    pub name: String,
    pub subject: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseTeacher {
    pub course_id: CourseId,
    pub teacher_id: TeacherId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    #[serde(default)]
    pub course_teachers: Vec<CourseTeacher>,
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub day: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub day: String,
    pub start: String,
    pub end: String,
    pub classroom_id: Option<ClassroomId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub class_id: ClassId,
    pub course_id: CourseId,
    pub exclude_entry_id: Option<EntryId>,
}

async fn add_classroom_handler(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewClassroom>,
) -> ApiResult<(StatusCode, Json<Classroom>)> {
    let classroom = state.write().await.add_classroom(&input.name, input.capacity)?;
    Ok((StatusCode::CREATED, Json(classroom)))
}

async fn add_course_handler(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewCourse>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    let course = state.write().await.add_course(&input.name)?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn add_teacher_handler(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewTeacher>,
) -> ApiResult<(StatusCode, Json<Teacher>)> {
    let teacher = state.write().await.add_teacher(&input.name, &input.subject)?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

async fn add_class_handler(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<NewClass>,
) -> ApiResult<(StatusCode, Json<ClassGroup>)> {
    let pairs: Vec<(CourseId, TeacherId)> = input
        .course_teachers
        .iter()
        .map(|ct| (ct.course_id, ct.teacher_id))
        .collect();
    let class = state.write().await.add_class(&input.name, &pairs)?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// An empty body generates over the weekly calendar.
async fn generate_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<GenerationReport>> {
    let calendar = if body.is_empty() {
        Calendar::weekly()
    } else {
        serde_json::from_slice(&body)?
    };
    let report = solver::generate(&mut *state.write().await, &calendar)?;
    Ok(Json(report))
}

async fn list_handler(State(state): State<AppState>) -> Json<Vec<TimetableEntry>> {
    Json(state.read().await.entries().cloned().collect())
}

async fn grid_handler(State(state): State<AppState>) -> Json<Vec<ClassGrid>> {
    Json(queries::grid(&*state.read().await, &Calendar::weekly()))
}

async fn available_handler(
    State(state): State<AppState>,
    JsonBody(query): JsonBody<SlotQuery>,
) -> Json<Vec<Classroom>> {
    let slot = TimeSlot::new(query.start, query.end);
    Json(queries::available_rooms(&*state.read().await, &query.day, &slot))
}

async fn reschedule_handler(
    State(state): State<AppState>,
    Path(entry_id): Path<EntryId>,
    JsonBody(request): JsonBody<RescheduleRequest>,
) -> ApiResult<Json<TimetableEntry>> {
    let slot = TimeSlot::new(request.start, request.end);
    let entry = reschedule::reschedule(
        &mut *state.write().await,
        entry_id,
        &request.day,
        &slot,
        request.classroom_id,
    )?;
    Ok(Json(entry))
}

async fn suggest_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SuggestRequest>,
) -> Json<Vec<Suggestion>> {
    Json(queries::suggest(
        &*state.read().await,
        &Calendar::suggestion(),
        request.class_id,
        request.course_id,
        request.exclude_entry_id,
    ))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/classrooms", post(add_classroom_handler))
        .route("/v1/courses", post(add_course_handler))
        .route("/v1/teachers", post(add_teacher_handler))
        .route("/v1/classes", post(add_class_handler))
        .route("/v1/timetable", get(list_handler))
        .route("/v1/timetable/grid", get(grid_handler))
        .route("/v1/timetable/generate", post(generate_handler))
        .route("/v1/timetable/suggest", post(suggest_handler))
        .route("/v1/timetable/:id/reschedule", post(reschedule_handler))
        .route("/v1/rooms/available", post(available_handler))
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, store: Store) -> std::io::Result<()> {
    let app = router(Arc::new(RwLock::new(store)));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
