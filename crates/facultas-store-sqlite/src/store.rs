//! [`SqliteStore`]: the SQLite implementation of [`EvaluationStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, params};
use uuid::Uuid;

use facultas_core::{
  assignment::{AssignmentQuery, EvaluatorAssignment, NewAssignment},
  evaluation::{
    Evaluation, EvaluationResponse, EvaluationStatus, SectionScore,
    SubmissionReceipt, SubmissionRecord,
  },
  period::{EvaluationPeriod, NewPeriod, PeriodStatus},
  roster::{
    Course, NewCourse, NewProfile, NewSection, Profile, Section, SectionView,
    UserRole,
  },
  rubric::{NewCategory, NewItem, RubricCategory, RubricItem},
  sentiment::{NewSentiment, StudentSentiment},
  store::{DashboardMetrics, EvaluationStore},
};

use crate::{
  Result,
  encode::{
    ASSIGNMENT_COLUMNS, CATEGORY_COLUMNS, COURSE_COLUMNS, EVALUATION_COLUMNS,
    ITEM_COLUMNS, PERIOD_COLUMNS, PROFILE_COLUMNS, RESPONSE_COLUMNS,
    SECTION_COLUMNS, SENTIMENT_COLUMNS, RawAssignment, RawCategory, RawCourse,
    RawEvaluation, RawItem, RawPeriod, RawProfile, RawResponse, RawSection,
    RawSectionView, RawSentiment, decode_uuid, encode_date, encode_dt,
    encode_evaluation_status, encode_evaluator_role, encode_period_status,
    encode_sentiment, encode_user_role, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An evaluation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised");
    Ok(())
  }

  /// Run a single-row `DELETE`/`UPDATE` and report whether it matched.
  async fn execute_one(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, params![id_str])?))
      .await?;
    Ok(affected > 0)
  }
}

// ─── EvaluationStore impl ────────────────────────────────────────────────────

impl EvaluationStore for SqliteStore {
  type Error = crate::Error;

  // ── Rubric ────────────────────────────────────────────────────────────────

  async fn list_categories(&self) -> Result<Vec<RubricCategory>> {
    let (raw_categories, raw_items) = self
      .conn
      .call(|conn| {
        let categories = conn
          .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM rubric_categories ORDER BY rowid"
          ))?
          .query_map([], RawCategory::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let items = conn
          .prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM rubric_items ORDER BY rowid"
          ))?
          .query_map([], RawItem::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((categories, items))
      })
      .await?;

    let mut items_by_category: HashMap<Uuid, Vec<RubricItem>> = HashMap::new();
    for raw in raw_items {
      let item = raw.into_item()?;
      items_by_category.entry(item.category_id).or_default().push(item);
    }

    raw_categories
      .into_iter()
      .map(|raw| {
        let id = decode_uuid(&raw.category_id)?;
        let items = items_by_category.remove(&id).unwrap_or_default();
        raw.into_category(items)
      })
      .collect()
  }

  async fn add_category(&self, input: NewCategory) -> Result<RubricCategory> {
    let category_id = Uuid::new_v4();
    let id_str = encode_uuid(category_id);
    let label = input.label.clone();
    let description = input.description.clone();

    let ordinal = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let ordinal: i64 = tx.query_row(
          "SELECT COALESCE(MAX(order_index) + 1, 0) FROM rubric_categories",
          [],
          |r| r.get(0),
        )?;
        tx.execute(
          "INSERT INTO rubric_categories (category_id, label, description, order_index)
           VALUES (?1, ?2, ?3, ?4)",
          params![id_str, label, description, ordinal],
        )?;
        tx.commit()?;
        Ok(ordinal)
      })
      .await?;

    Ok(RubricCategory {
      category_id,
      label: input.label,
      description: input.description,
      ordinal,
      items: Vec::new(),
    })
  }

  async fn delete_category(&self, category_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM rubric_categories WHERE category_id = ?1",
        category_id,
      )
      .await
  }

  async fn add_item(&self, input: NewItem) -> Result<Option<RubricItem>> {
    let item_id = Uuid::new_v4();
    let id_str = encode_uuid(item_id);
    let category_str = encode_uuid(input.category_id);
    let prompt = input.prompt.clone();
    let max_score = input.max_score;

    let ordinal: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row(
            "SELECT 1 FROM rubric_categories WHERE category_id = ?1",
            params![category_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }

        let ordinal: i64 = tx.query_row(
          "SELECT COALESCE(MAX(order_index) + 1, 0) FROM rubric_items
           WHERE category_id = ?1",
          params![category_str],
          |r| r.get(0),
        )?;
        tx.execute(
          "INSERT INTO rubric_items (item_id, category_id, prompt, max_score, order_index)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![id_str, category_str, prompt, max_score, ordinal],
        )?;
        tx.commit()?;
        Ok(Some(ordinal))
      })
      .await?;

    Ok(ordinal.map(|ordinal| RubricItem {
      item_id,
      category_id: input.category_id,
      prompt: input.prompt,
      max_score,
      ordinal,
    }))
  }

  async fn delete_item(&self, item_id: Uuid) -> Result<bool> {
    self
      .execute_one("DELETE FROM rubric_items WHERE item_id = ?1", item_id)
      .await
  }

  // ── Periods ───────────────────────────────────────────────────────────────

  async fn add_period(&self, input: NewPeriod) -> Result<EvaluationPeriod> {
    let period = EvaluationPeriod {
      period_id:  Uuid::new_v4(),
      name:       input.name,
      status:     input.status,
      start_date: input.start_date,
      end_date:   input.end_date,
    };

    let id_str     = encode_uuid(period.period_id);
    let name       = period.name.clone();
    let status_str = encode_period_status(period.status);
    let start_str  = period.start_date.map(encode_date);
    let end_str    = period.end_date.map(encode_date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO evaluation_periods (period_id, name, status, start_date, end_date)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          params![id_str, name, status_str, start_str, end_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(period)
  }

  async fn get_period(&self, period_id: Uuid) -> Result<Option<EvaluationPeriod>> {
    let id_str = encode_uuid(period_id);

    let raw: Option<RawPeriod> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PERIOD_COLUMNS} FROM evaluation_periods WHERE period_id = ?1"
              ),
              params![id_str],
              RawPeriod::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPeriod::into_period).transpose()
  }

  async fn list_periods(&self, limit: usize) -> Result<Vec<EvaluationPeriod>> {
    let limit_val = limit as i64;

    let raws: Vec<RawPeriod> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERIOD_COLUMNS} FROM evaluation_periods
           ORDER BY start_date IS NULL, start_date DESC, rowid DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(params![limit_val], RawPeriod::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPeriod::into_period).collect()
  }

  async fn set_period_status(
    &self,
    period_id: Uuid,
    status: PeriodStatus,
  ) -> Result<Option<EvaluationPeriod>> {
    let id_str     = encode_uuid(period_id);
    let status_str = encode_period_status(status);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE evaluation_periods SET status = ?2 WHERE period_id = ?1",
          params![id_str, status_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Ok(None);
    }
    self.get_period(period_id).await
  }

  async fn delete_period(&self, period_id: Uuid) -> Result<bool> {
    self
      .execute_one("DELETE FROM evaluation_periods WHERE period_id = ?1", period_id)
      .await
  }

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn add_profile(&self, input: NewProfile) -> Result<Option<Profile>> {
    let profile = Profile {
      profile_id: input.profile_id,
      full_name:  input.full_name,
      email:      input.email,
      role:       input.role,
    };

    let id_str    = encode_uuid(profile.profile_id);
    let full_name = profile.full_name.clone();
    let email     = profile.email.clone();
    let role_str  = encode_user_role(profile.role);

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO profiles (profile_id, full_name, email, role)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (profile_id) DO NOTHING",
          params![id_str, full_name, email, role_str],
        )?)
      })
      .await?;

    Ok((inserted > 0).then_some(profile))
  }

  async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(profile_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE profile_id = ?1"),
              params![id_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_profiles(&self, role: Option<UserRole>) -> Result<Vec<Profile>> {
    let role_str = role.map(encode_user_role);

    let raws: Vec<RawProfile> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PROFILE_COLUMNS} FROM profiles
           WHERE ?1 IS NULL OR role = ?1
           ORDER BY full_name, rowid"
        ))?;
        let rows = stmt
          .query_map(params![role_str], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn add_course(&self, input: NewCourse) -> Result<Course> {
    let course = Course {
      course_id: Uuid::new_v4(),
      code:      input.code,
      title:     input.title,
    };

    let id_str = encode_uuid(course.course_id);
    let code   = course.code.clone();
    let title  = course.title.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO courses (course_id, code, title) VALUES (?1, ?2, ?3)",
          params![id_str, code, title],
        )?;
        Ok(())
      })
      .await?;

    Ok(course)
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    let raws: Vec<RawCourse> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COURSE_COLUMNS} FROM courses ORDER BY code, rowid"
        ))?;
        let rows = stmt
          .query_map([], RawCourse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCourse::into_course).collect()
  }

  async fn add_section(&self, input: NewSection) -> Result<Option<Section>> {
    let section = Section {
      section_id:    Uuid::new_v4(),
      course_id:     input.course_id,
      faculty_id:    input.faculty_id,
      term:          input.term,
      academic_year: input.academic_year,
      schedule:      input.schedule,
      created_at:    Utc::now(),
    };

    let id_str      = encode_uuid(section.section_id);
    let course_str  = encode_uuid(section.course_id);
    let faculty_str = section.faculty_id.map(encode_uuid);
    let term        = section.term.clone();
    let year        = section.academic_year.clone();
    let schedule    = section.schedule.clone();
    let at_str      = encode_dt(section.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let course_exists = tx
          .query_row(
            "SELECT 1 FROM courses WHERE course_id = ?1",
            params![course_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !course_exists {
          return Ok(false);
        }
        // A faculty id without a profile row is kept as NULL rather than
        // tripping the foreign key.
        let faculty_str = match faculty_str {
          Some(f) => tx
            .query_row(
              "SELECT profile_id FROM profiles WHERE profile_id = ?1",
              params![f],
              |r| r.get::<_, String>(0),
            )
            .optional()?,
          None => None,
        };
        tx.execute(
          "INSERT INTO sections (
             section_id, course_id, faculty_id, term, academic_year, schedule, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![id_str, course_str, faculty_str, term, year, schedule, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Ok(None);
    }
    self.get_section(section.section_id).await
  }

  async fn get_section(&self, section_id: Uuid) -> Result<Option<Section>> {
    let id_str = encode_uuid(section_id);

    let raw: Option<RawSection> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SECTION_COLUMNS} FROM sections WHERE section_id = ?1"),
              params![id_str],
              RawSection::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSection::into_section).transpose()
  }

  async fn list_sections(&self) -> Result<Vec<SectionView>> {
    let raws: Vec<RawSectionView> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             s.section_id, s.course_id, s.faculty_id, s.term,
             s.academic_year, s.schedule, s.created_at,
             c.code, c.title, p.full_name
           FROM sections s
           LEFT JOIN courses  c ON c.course_id  = s.course_id
           LEFT JOIN profiles p ON p.profile_id = s.faculty_id
           ORDER BY s.created_at DESC, s.rowid DESC",
        )?;
        let rows = stmt
          .query_map([], RawSectionView::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSectionView::into_view).collect()
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn add_assignment(
    &self,
    input: NewAssignment,
  ) -> Result<Option<EvaluatorAssignment>> {
    let assignment = EvaluatorAssignment {
      assignment_id: Uuid::new_v4(),
      period_id:     input.period_id,
      faculty_id:    input.faculty_id,
      evaluator_id:  input.evaluator_id,
      role:          input.role,
      section_id:    input.section_id,
      created_at:    Utc::now(),
    };

    let id_str        = encode_uuid(assignment.assignment_id);
    let period_str    = encode_uuid(assignment.period_id);
    let faculty_str   = encode_uuid(assignment.faculty_id);
    let evaluator_str = encode_uuid(assignment.evaluator_id);
    let role_str      = encode_evaluator_role(assignment.role);
    let section_str   = assignment.section_id.map(encode_uuid);
    let at_str        = encode_dt(assignment.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let period_exists = tx
          .query_row(
            "SELECT 1 FROM evaluation_periods WHERE period_id = ?1",
            params![period_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        let section_exists = match &section_str {
          Some(s) => tx
            .query_row(
              "SELECT 1 FROM sections WHERE section_id = ?1",
              params![s],
              |_| Ok(()),
            )
            .optional()?
            .is_some(),
          None => true,
        };
        if !(period_exists && section_exists) {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO evaluator_assignments (
             assignment_id, period_id, faculty_id, evaluator_id, role, section_id, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            id_str,
            period_str,
            faculty_str,
            evaluator_str,
            role_str,
            section_str,
            at_str,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(inserted.then_some(assignment))
  }

  async fn get_assignment(
    &self,
    assignment_id: Uuid,
  ) -> Result<Option<EvaluatorAssignment>> {
    let id_str = encode_uuid(assignment_id);

    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ASSIGNMENT_COLUMNS} FROM evaluator_assignments
                 WHERE assignment_id = ?1"
              ),
              params![id_str],
              RawAssignment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }

  async fn find_assignments(
    &self,
    query: AssignmentQuery,
  ) -> Result<Vec<EvaluatorAssignment>> {
    let evaluator_str = query.evaluator_id.map(encode_uuid);
    let period_str    = query.period_id.map(encode_uuid);
    let section_str   = query.section_id.map(encode_uuid);
    let faculty_str   = query.faculty_id.map(encode_uuid);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSIGNMENT_COLUMNS} FROM evaluator_assignments
           WHERE (?1 IS NULL OR evaluator_id = ?1)
             AND (?2 IS NULL OR period_id    = ?2)
             AND (?3 IS NULL OR section_id   = ?3)
             AND (?4 IS NULL OR faculty_id   = ?4)
           ORDER BY created_at, rowid"
        ))?;
        let rows = stmt
          .query_map(
            params![evaluator_str, period_str, section_str, faculty_str],
            RawAssignment::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn delete_assignment(&self, assignment_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM evaluator_assignments WHERE assignment_id = ?1",
        assignment_id,
      )
      .await
  }

  // ── Evaluations ───────────────────────────────────────────────────────────

  async fn get_evaluation(&self, evaluation_id: Uuid) -> Result<Option<Evaluation>> {
    let id_str = encode_uuid(evaluation_id);

    let raw: Option<RawEvaluation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE evaluation_id = ?1"
              ),
              params![id_str],
              RawEvaluation::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvaluation::into_evaluation).transpose()
  }

  async fn find_evaluation(&self, assignment_id: Uuid) -> Result<Option<Evaluation>> {
    let id_str = encode_uuid(assignment_id);

    let raw: Option<RawEvaluation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {EVALUATION_COLUMNS} FROM evaluations WHERE assignment_id = ?1"
              ),
              params![id_str],
              RawEvaluation::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvaluation::into_evaluation).transpose()
  }

  async fn replace_evaluation(
    &self,
    record: SubmissionRecord,
  ) -> Result<SubmissionReceipt> {
    let assignment_str = encode_uuid(record.assignment_id);
    let submitted_str  = encode_dt(record.submitted_at);
    let status_str     = encode_evaluation_status(EvaluationStatus::Submitted);
    let comment        = record.overall_comment.clone();
    let fresh_id_str   = encode_uuid(Uuid::new_v4());
    let rows: Vec<(String, u32, Option<String>)> = record
      .responses
      .iter()
      .map(|r| (encode_uuid(r.item_id), r.score, r.comment.clone()))
      .collect();

    let (id_str, created) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing: Option<String> = tx
          .query_row(
            "SELECT evaluation_id FROM evaluations WHERE assignment_id = ?1",
            params![assignment_str],
            |r| r.get(0),
          )
          .optional()?;

        let (id_str, created) = match existing {
          Some(id_str) => {
            tx.execute(
              "UPDATE evaluations
               SET status = ?2, submitted_at = ?3, overall_comment = ?4
               WHERE evaluation_id = ?1",
              params![id_str, status_str, submitted_str, comment],
            )?;
            tx.execute(
              "DELETE FROM evaluation_responses WHERE evaluation_id = ?1",
              params![id_str],
            )?;
            (id_str, false)
          }
          None => {
            tx.execute(
              "INSERT INTO evaluations (
                 evaluation_id, assignment_id, status, submitted_at, overall_comment
               ) VALUES (?1, ?2, ?3, ?4, ?5)",
              params![fresh_id_str, assignment_str, status_str, submitted_str, comment],
            )?;
            (fresh_id_str, true)
          }
        };

        {
          let mut insert = tx.prepare(
            "INSERT INTO evaluation_responses (evaluation_id, rubric_item_id, score, comment)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (item_str, score, item_comment) in &rows {
            insert.execute(params![id_str, item_str, score, item_comment])?;
          }
        }

        tx.commit()?;
        Ok((id_str, created))
      })
      .await?;

    Ok(SubmissionReceipt {
      evaluation: Evaluation {
        evaluation_id:   decode_uuid(&id_str)?,
        assignment_id:   record.assignment_id,
        status:          EvaluationStatus::Submitted,
        submitted_at:    Some(record.submitted_at),
        overall_comment: record.overall_comment,
      },
      created,
    })
  }

  async fn list_responses(&self, evaluation_id: Uuid) -> Result<Vec<EvaluationResponse>> {
    let id_str = encode_uuid(evaluation_id);

    let raws: Vec<RawResponse> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RESPONSE_COLUMNS} FROM evaluation_responses
           WHERE evaluation_id = ?1
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(params![id_str], RawResponse::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawResponse::into_response).collect()
  }

  async fn count_responses(&self, evaluation_id: Uuid) -> Result<usize> {
    let id_str = encode_uuid(evaluation_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM evaluation_responses WHERE evaluation_id = ?1",
          params![id_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }

  async fn list_section_scores(&self) -> Result<Vec<SectionScore>> {
    let status_str = encode_evaluation_status(EvaluationStatus::Submitted);

    let raws: Vec<(String, u32)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT a.section_id, r.score
           FROM evaluation_responses r
           JOIN evaluations           e ON e.evaluation_id = r.evaluation_id
           JOIN evaluator_assignments a ON a.assignment_id = e.assignment_id
           WHERE e.status = ?1
             AND a.section_id IS NOT NULL",
        )?;
        let rows = stmt
          .query_map(params![status_str], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(section_str, score)| {
        Ok(SectionScore { section_id: decode_uuid(&section_str)?, score })
      })
      .collect()
  }

  // ── Sentiments ────────────────────────────────────────────────────────────

  async fn add_sentiment(&self, input: NewSentiment) -> Result<StudentSentiment> {
    let sentiment = StudentSentiment {
      sentiment_id: Uuid::new_v4(),
      period_id:    input.period_id,
      section_id:   input.section_id,
      faculty_id:   input.faculty_id,
      sentiment:    input.sentiment,
      comments:     input.comments,
      created_at:   Utc::now(),
    };

    let id_str        = encode_uuid(sentiment.sentiment_id);
    let period_str    = sentiment.period_id.map(encode_uuid);
    let section_str   = sentiment.section_id.map(encode_uuid);
    let faculty_str   = sentiment.faculty_id.map(encode_uuid);
    let sentiment_str = encode_sentiment(sentiment.sentiment);
    let comments      = sentiment.comments.clone();
    let at_str        = encode_dt(sentiment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO student_sentiments (
             sentiment_id, period_id, section_id, faculty_id, sentiment, comments, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          params![
            id_str,
            period_str,
            section_str,
            faculty_str,
            sentiment_str,
            comments,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(sentiment)
  }

  async fn list_sentiments(&self, limit: usize) -> Result<Vec<StudentSentiment>> {
    let limit_val = limit as i64;

    let raws: Vec<RawSentiment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SENTIMENT_COLUMNS} FROM student_sentiments
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?1"
        ))?;
        let rows = stmt
          .query_map(params![limit_val], RawSentiment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSentiment::into_sentiment).collect()
  }

  // ── Reporting ─────────────────────────────────────────────────────────────

  async fn metrics(&self) -> Result<DashboardMetrics> {
    let counts: [i64; 4] = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<i64> {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        };
        Ok([
          count("evaluation_periods")?,
          count("rubric_items")?,
          count("sections")?,
          count("student_sentiments")?,
        ])
      })
      .await?;

    Ok(DashboardMetrics {
      periods:      counts[0] as usize,
      rubric_items: counts[1] as usize,
      sections:     counts[2] as usize,
      sentiments:   counts[3] as usize,
    })
  }
}
