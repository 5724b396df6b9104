//! Handlers for profiles, courses, and sections.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/profiles` | Admin. Optional `?role=faculty` |
//! | `POST` | `/profiles` | Admin. The id is the identity provider's user id |
//! | `GET`  | `/profiles/:id` | Admin |
//! | `GET`  | `/courses` | Ordered by code |
//! | `POST` | `/courses` | Admin |
//! | `GET`  | `/sections` | Joined with course and faculty name, newest first |
//! | `POST` | `/sections` | Admin. 404 if the course does not exist |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use facultas_core::{
  Error as CoreError,
  roster::{
    Course, NewCourse, NewProfile, NewSection, Profile, SectionView, UserRole,
  },
  store::EvaluationStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{caller::CurrentCaller, error::ApiError};

/// Trim and drop blank optional text.
fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ProfileParams {
  pub role: Option<UserRole>,
}

/// `GET /profiles[?role=<role>]`
pub async fn list_profiles<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Query(params): Query<ProfileParams>,
) -> Result<Json<Vec<Profile>>, ApiError> {
  caller.require_admin()?;
  let profiles = store
    .list_profiles(params.role)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profiles))
}

/// `GET /profiles/:id`
pub async fn get_profile<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  Path(id): Path<Uuid>,
) -> Result<Json<Profile>, ApiError> {
  caller.require_admin()?;
  store
    .get_profile(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("profile {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct ProfileBody {
  pub profile_id: Uuid,
  pub full_name:  Option<String>,
  pub email:      Option<String>,
  pub role:       UserRole,
}

/// `POST /profiles`
pub async fn create_profile<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<ProfileBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let profile = store
    .add_profile(NewProfile {
      profile_id: body.profile_id,
      full_name:  non_blank(body.full_name),
      email:      non_blank(body.email),
      role:       body.role,
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::BadRequest(format!("profile {} already exists", body.profile_id))
    })?;
  Ok((StatusCode::CREATED, Json(profile)))
}

// ─── Courses ─────────────────────────────────────────────────────────────────

/// `GET /courses`
pub async fn list_courses<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(_caller): CurrentCaller,
) -> Result<Json<Vec<Course>>, ApiError> {
  Ok(Json(store.list_courses().await.map_err(ApiError::store)?))
}

#[derive(Debug, Deserialize)]
pub struct CourseBody {
  pub code:  String,
  pub title: String,
}

/// `POST /courses`
pub async fn create_course<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<CourseBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let (code, title) = (body.code.trim(), body.title.trim());
  if code.is_empty() || title.is_empty() {
    return Err(CoreError::Invalid("course code and title are required".into()).into());
  }

  let course = store
    .add_course(NewCourse { code: code.to_owned(), title: title.to_owned() })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(course)))
}

// ─── Sections ────────────────────────────────────────────────────────────────

/// `GET /sections`
pub async fn list_sections<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(_caller): CurrentCaller,
) -> Result<Json<Vec<SectionView>>, ApiError> {
  Ok(Json(store.list_sections().await.map_err(ApiError::store)?))
}

#[derive(Debug, Deserialize)]
pub struct SectionBody {
  pub course_id:     Uuid,
  pub faculty_id:    Option<Uuid>,
  pub term:          Option<String>,
  pub academic_year: Option<String>,
  pub schedule:      Option<String>,
}

/// `POST /sections`
pub async fn create_section<S: EvaluationStore>(
  State(store): State<Arc<S>>,
  CurrentCaller(caller): CurrentCaller,
  body: Result<Json<SectionBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  caller.require_admin()?;
  let Json(body) = body?;

  let section = store
    .add_section(NewSection {
      course_id:     body.course_id,
      faculty_id:    body.faculty_id,
      term:          non_blank(body.term),
      academic_year: non_blank(body.academic_year),
      schedule:      non_blank(body.schedule),
    })
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!("course {} not found", body.course_id))
    })?;
  Ok((StatusCode::CREATED, Json(section)))
}
