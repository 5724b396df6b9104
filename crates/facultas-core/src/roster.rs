//! People, courses, and sections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a signed-in user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  Admin,
  Faculty,
  Evaluator,
  Student,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id: Uuid,
  pub full_name:  Option<String>,
  pub email:      Option<String>,
  pub role:       UserRole,
}

/// Input to [`crate::store::EvaluationStore::add_profile`]. The id is chosen
/// by the caller so it can match the identity provider's user id.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub profile_id: Uuid,
  pub full_name:  Option<String>,
  pub email:      Option<String>,
  pub role:       UserRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
  pub course_id: Uuid,
  pub code:      String,
  pub title:     String,
}

impl Course {
  /// `"CS101 Intro to Programming"`
  pub fn label(&self) -> String { format!("{} {}", self.code, self.title) }
}

#[derive(Debug, Clone)]
pub struct NewCourse {
  pub code:  String,
  pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
  pub section_id:    Uuid,
  pub course_id:     Uuid,
  pub faculty_id:    Option<Uuid>,
  pub term:          Option<String>,
  pub academic_year: Option<String>,
  pub schedule:      Option<String>,
  pub created_at:    DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSection {
  pub course_id:     Uuid,
  pub faculty_id:    Option<Uuid>,
  pub term:          Option<String>,
  pub academic_year: Option<String>,
  pub schedule:      Option<String>,
}

/// A section joined with its course and teaching faculty member.
///
/// Either side of the join may be absent (a deleted course, an unstaffed
/// section); the shape is fixed regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionView {
  pub section:      Section,
  pub course:       Option<Course>,
  pub faculty_name: Option<String>,
}

impl SectionView {
  pub fn course_label(&self) -> String {
    self.course.as_ref().map(Course::label).unwrap_or_default()
  }
}
