//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates `YYYY-MM-DD`, enums their
//! lowercase serde names, UUIDs hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use facultas_core::{
  assignment::{EvaluatorAssignment, EvaluatorRole},
  evaluation::{Evaluation, EvaluationResponse, EvaluationStatus},
  period::{EvaluationPeriod, PeriodStatus},
  roster::{Course, Profile, Section, SectionView, UserRole},
  rubric::{RubricCategory, RubricItem},
  sentiment::{Sentiment, StudentSentiment},
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn unknown(column: &'static str, value: &str) -> Error {
  Error::UnknownVariant { column, value: value.to_owned() }
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_period_status(s: PeriodStatus) -> &'static str {
  match s {
    PeriodStatus::Draft => "draft",
    PeriodStatus::Open => "open",
    PeriodStatus::Closed => "closed",
  }
}

pub fn decode_period_status(s: &str) -> Result<PeriodStatus> {
  match s {
    "draft" => Ok(PeriodStatus::Draft),
    "open" => Ok(PeriodStatus::Open),
    "closed" => Ok(PeriodStatus::Closed),
    other => Err(unknown("status", other)),
  }
}

pub fn encode_user_role(r: UserRole) -> &'static str {
  match r {
    UserRole::Admin => "admin",
    UserRole::Faculty => "faculty",
    UserRole::Evaluator => "evaluator",
    UserRole::Student => "student",
  }
}

pub fn decode_user_role(s: &str) -> Result<UserRole> {
  match s {
    "admin" => Ok(UserRole::Admin),
    "faculty" => Ok(UserRole::Faculty),
    "evaluator" => Ok(UserRole::Evaluator),
    "student" => Ok(UserRole::Student),
    other => Err(unknown("role", other)),
  }
}

pub fn encode_evaluator_role(r: EvaluatorRole) -> &'static str {
  match r {
    EvaluatorRole::SelfReview => "self",
    EvaluatorRole::Peer => "peer",
    EvaluatorRole::Supervisor => "supervisor",
    EvaluatorRole::Student => "student",
  }
}

pub fn decode_evaluator_role(s: &str) -> Result<EvaluatorRole> {
  match s {
    "self" => Ok(EvaluatorRole::SelfReview),
    "peer" => Ok(EvaluatorRole::Peer),
    "supervisor" => Ok(EvaluatorRole::Supervisor),
    "student" => Ok(EvaluatorRole::Student),
    other => Err(unknown("role", other)),
  }
}

pub fn encode_evaluation_status(s: EvaluationStatus) -> &'static str {
  match s {
    EvaluationStatus::Draft => "draft",
    EvaluationStatus::Submitted => "submitted",
  }
}

pub fn decode_evaluation_status(s: &str) -> Result<EvaluationStatus> {
  match s {
    "draft" => Ok(EvaluationStatus::Draft),
    "submitted" => Ok(EvaluationStatus::Submitted),
    other => Err(unknown("status", other)),
  }
}

pub fn encode_sentiment(s: Sentiment) -> &'static str {
  match s {
    Sentiment::Positive => "positive",
    Sentiment::Neutral => "neutral",
    Sentiment::Negative => "negative",
  }
}

pub fn decode_sentiment(s: &str) -> Result<Sentiment> {
  match s {
    "positive" => Ok(Sentiment::Positive),
    "neutral" => Ok(Sentiment::Neutral),
    "negative" => Ok(Sentiment::Negative),
    other => Err(unknown("sentiment", other)),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` holds the column strings exactly as read; `from_row` runs inside
// the connection thread, the `into_*` conversion runs back on the caller.

pub const CATEGORY_COLUMNS: &str = "category_id, label, description, order_index";

pub struct RawCategory {
  pub category_id: String,
  pub label:       String,
  pub description: Option<String>,
  pub order_index: i64,
}

impl RawCategory {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      category_id: row.get(0)?,
      label:       row.get(1)?,
      description: row.get(2)?,
      order_index: row.get(3)?,
    })
  }

  pub fn into_category(self, items: Vec<RubricItem>) -> Result<RubricCategory> {
    Ok(RubricCategory {
      category_id: decode_uuid(&self.category_id)?,
      label: self.label,
      description: self.description,
      ordinal: self.order_index,
      items,
    })
  }
}

pub const ITEM_COLUMNS: &str =
  "item_id, category_id, prompt, max_score, order_index";

pub struct RawItem {
  pub item_id:     String,
  pub category_id: String,
  pub prompt:      String,
  pub max_score:   u32,
  pub order_index: i64,
}

impl RawItem {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      category_id: row.get(1)?,
      prompt:      row.get(2)?,
      max_score:   row.get(3)?,
      order_index: row.get(4)?,
    })
  }

  pub fn into_item(self) -> Result<RubricItem> {
    Ok(RubricItem {
      item_id:     decode_uuid(&self.item_id)?,
      category_id: decode_uuid(&self.category_id)?,
      prompt:      self.prompt,
      max_score:   self.max_score,
      ordinal:     self.order_index,
    })
  }
}

pub const PERIOD_COLUMNS: &str = "period_id, name, status, start_date, end_date";

pub struct RawPeriod {
  pub period_id:  String,
  pub name:       String,
  pub status:     String,
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
}

impl RawPeriod {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      period_id:  row.get(0)?,
      name:       row.get(1)?,
      status:     row.get(2)?,
      start_date: row.get(3)?,
      end_date:   row.get(4)?,
    })
  }

  pub fn into_period(self) -> Result<EvaluationPeriod> {
    Ok(EvaluationPeriod {
      period_id:  decode_uuid(&self.period_id)?,
      name:       self.name,
      status:     decode_period_status(&self.status)?,
      start_date: self.start_date.as_deref().map(decode_date).transpose()?,
      end_date:   self.end_date.as_deref().map(decode_date).transpose()?,
    })
  }
}

pub const PROFILE_COLUMNS: &str = "profile_id, full_name, email, role";

pub struct RawProfile {
  pub profile_id: String,
  pub full_name:  Option<String>,
  pub email:      Option<String>,
  pub role:       String,
}

impl RawProfile {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      full_name:  row.get(1)?,
      email:      row.get(2)?,
      role:       row.get(3)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id: decode_uuid(&self.profile_id)?,
      full_name:  self.full_name,
      email:      self.email,
      role:       decode_user_role(&self.role)?,
    })
  }
}

pub const COURSE_COLUMNS: &str = "course_id, code, title";

pub struct RawCourse {
  pub course_id: String,
  pub code:      String,
  pub title:     String,
}

impl RawCourse {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      course_id: row.get(0)?,
      code:      row.get(1)?,
      title:     row.get(2)?,
    })
  }

  pub fn into_course(self) -> Result<Course> {
    Ok(Course {
      course_id: decode_uuid(&self.course_id)?,
      code:      self.code,
      title:     self.title,
    })
  }
}

pub const SECTION_COLUMNS: &str =
  "section_id, course_id, faculty_id, term, academic_year, schedule, created_at";

pub struct RawSection {
  pub section_id:    String,
  pub course_id:     String,
  pub faculty_id:    Option<String>,
  pub term:          Option<String>,
  pub academic_year: Option<String>,
  pub schedule:      Option<String>,
  pub created_at:    String,
}

impl RawSection {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      section_id:    row.get(0)?,
      course_id:     row.get(1)?,
      faculty_id:    row.get(2)?,
      term:          row.get(3)?,
      academic_year: row.get(4)?,
      schedule:      row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_section(self) -> Result<Section> {
    Ok(Section {
      section_id:    decode_uuid(&self.section_id)?,
      course_id:     decode_uuid(&self.course_id)?,
      faculty_id:    decode_opt_uuid(self.faculty_id)?,
      term:          self.term,
      academic_year: self.academic_year,
      schedule:      self.schedule,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// A `sections` row left-joined with `courses` and `profiles`.
pub struct RawSectionView {
  pub section:      RawSection,
  pub course_code:  Option<String>,
  pub course_title: Option<String>,
  pub faculty_name: Option<String>,
}

impl RawSectionView {
  /// Expects [`SECTION_COLUMNS`] followed by course code, course title and
  /// faculty name.
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      section:      RawSection::from_row(row)?,
      course_code:  row.get(7)?,
      course_title: row.get(8)?,
      faculty_name: row.get(9)?,
    })
  }

  pub fn into_view(self) -> Result<SectionView> {
    let section = self.section.into_section()?;
    let course = match (self.course_code, self.course_title) {
      (Some(code), Some(title)) => Some(Course {
        course_id: section.course_id,
        code,
        title,
      }),
      _ => None,
    };
    Ok(SectionView { section, course, faculty_name: self.faculty_name })
  }
}

pub const ASSIGNMENT_COLUMNS: &str =
  "assignment_id, period_id, faculty_id, evaluator_id, role, section_id, created_at";

pub struct RawAssignment {
  pub assignment_id: String,
  pub period_id:     String,
  pub faculty_id:    String,
  pub evaluator_id:  String,
  pub role:          String,
  pub section_id:    Option<String>,
  pub created_at:    String,
}

impl RawAssignment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      assignment_id: row.get(0)?,
      period_id:     row.get(1)?,
      faculty_id:    row.get(2)?,
      evaluator_id:  row.get(3)?,
      role:          row.get(4)?,
      section_id:    row.get(5)?,
      created_at:    row.get(6)?,
    })
  }

  pub fn into_assignment(self) -> Result<EvaluatorAssignment> {
    Ok(EvaluatorAssignment {
      assignment_id: decode_uuid(&self.assignment_id)?,
      period_id:     decode_uuid(&self.period_id)?,
      faculty_id:    decode_uuid(&self.faculty_id)?,
      evaluator_id:  decode_uuid(&self.evaluator_id)?,
      role:          decode_evaluator_role(&self.role)?,
      section_id:    decode_opt_uuid(self.section_id)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const EVALUATION_COLUMNS: &str =
  "evaluation_id, assignment_id, status, submitted_at, overall_comment";

pub struct RawEvaluation {
  pub evaluation_id:   String,
  pub assignment_id:   String,
  pub status:          String,
  pub submitted_at:    Option<String>,
  pub overall_comment: Option<String>,
}

impl RawEvaluation {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      evaluation_id:   row.get(0)?,
      assignment_id:   row.get(1)?,
      status:          row.get(2)?,
      submitted_at:    row.get(3)?,
      overall_comment: row.get(4)?,
    })
  }

  pub fn into_evaluation(self) -> Result<Evaluation> {
    Ok(Evaluation {
      evaluation_id:   decode_uuid(&self.evaluation_id)?,
      assignment_id:   decode_uuid(&self.assignment_id)?,
      status:          decode_evaluation_status(&self.status)?,
      submitted_at:    self.submitted_at.as_deref().map(decode_dt).transpose()?,
      overall_comment: self.overall_comment,
    })
  }
}

pub const RESPONSE_COLUMNS: &str = "evaluation_id, rubric_item_id, score, comment";

pub struct RawResponse {
  pub evaluation_id:  String,
  pub rubric_item_id: String,
  pub score:          u32,
  pub comment:        Option<String>,
}

impl RawResponse {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      evaluation_id:  row.get(0)?,
      rubric_item_id: row.get(1)?,
      score:          row.get(2)?,
      comment:        row.get(3)?,
    })
  }

  pub fn into_response(self) -> Result<EvaluationResponse> {
    Ok(EvaluationResponse {
      evaluation_id: decode_uuid(&self.evaluation_id)?,
      item_id:       decode_uuid(&self.rubric_item_id)?,
      score:         self.score,
      comment:       self.comment,
    })
  }
}

pub const SENTIMENT_COLUMNS: &str =
  "sentiment_id, period_id, section_id, faculty_id, sentiment, comments, created_at";

pub struct RawSentiment {
  pub sentiment_id: String,
  pub period_id:    Option<String>,
  pub section_id:   Option<String>,
  pub faculty_id:   Option<String>,
  pub sentiment:    String,
  pub comments:     String,
  pub created_at:   String,
}

impl RawSentiment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      sentiment_id: row.get(0)?,
      period_id:    row.get(1)?,
      section_id:   row.get(2)?,
      faculty_id:   row.get(3)?,
      sentiment:    row.get(4)?,
      comments:     row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn into_sentiment(self) -> Result<StudentSentiment> {
    Ok(StudentSentiment {
      sentiment_id: decode_uuid(&self.sentiment_id)?,
      period_id:    decode_opt_uuid(self.period_id)?,
      section_id:   decode_opt_uuid(self.section_id)?,
      faculty_id:   decode_opt_uuid(self.faculty_id)?,
      sentiment:    decode_sentiment(&self.sentiment)?,
      comments:     self.comments,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
