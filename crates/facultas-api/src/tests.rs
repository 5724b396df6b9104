//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use facultas_core::{
  assignment::{EvaluatorAssignment, EvaluatorRole, NewAssignment},
  identity::Caller,
  period::{NewPeriod, PeriodStatus},
  roster::{NewCourse, NewSection, UserRole},
  rubric::{NewCategory, NewItem, RubricItem},
  store::EvaluationStore,
};
use facultas_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

// ─── Harness ─────────────────────────────────────────────────────────────────

struct Fixture {
  store:      Arc<SqliteStore>,
  items:      Vec<RubricItem>,
  period_id:  Uuid,
  admin:      Caller,
  evaluator:  Caller,
  faculty:    Caller,
  assignment: EvaluatorAssignment,
}

impl Fixture {
  fn app(&self) -> Router { api_router(self.store.clone()) }

  /// Every rubric item scored `score`.
  fn full_scores(&self, score: i64) -> Value {
    let map: serde_json::Map<String, Value> = self
      .items
      .iter()
      .map(|i| (i.item_id.to_string(), json!(score)))
      .collect();
    Value::Object(map)
  }
}

fn caller(role: UserRole) -> Caller { Caller { user_id: Uuid::new_v4(), role } }

async fn fixture(status: PeriodStatus) -> Fixture {
  let store = SqliteStore::open_in_memory().await.unwrap();

  let category = store
    .add_category(NewCategory { label: "Teaching".into(), description: None })
    .await
    .unwrap();
  let mut items = Vec::new();
  for prompt in ["Clarity", "Preparation", "Engagement"] {
    items.push(
      store
        .add_item(NewItem::new(category.category_id, prompt))
        .await
        .unwrap()
        .unwrap(),
    );
  }

  let period = store
    .add_period(NewPeriod { name: "Fall".into(), status, ..Default::default() })
    .await
    .unwrap();

  let admin = caller(UserRole::Admin);
  let evaluator = caller(UserRole::Evaluator);
  let faculty = caller(UserRole::Faculty);

  let assignment = store
    .add_assignment(NewAssignment {
      period_id:    period.period_id,
      faculty_id:   faculty.user_id,
      evaluator_id: evaluator.user_id,
      role:         EvaluatorRole::Peer,
      section_id:   None,
    })
    .await
    .unwrap()
    .unwrap();

  Fixture {
    store: Arc::new(store),
    items,
    period_id: period.period_id,
    admin,
    evaluator,
    faculty,
    assignment,
  }
}

async fn send(
  app: Router,
  method: &str,
  uri: &str,
  caller: Option<Caller>,
  body: Option<&str>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(c) = caller {
    builder = builder.extension(c);
  }
  let req = match body {
    Some(b) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(b.to_owned()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let resp = app.oneshot(req).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, headers, value)
}

async fn send_json(
  app: Router,
  method: &str,
  uri: &str,
  caller: Caller,
  body: Value,
) -> (StatusCode, Value) {
  let (status, _, value) =
    send(app, method, uri, Some(caller), Some(&body.to_string())).await;
  (status, value)
}

// ─── Identity & roles ────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_caller_is_401_with_challenge() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, headers, body) = send(f.app(), "GET", "/rubric", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(headers.contains_key(header::WWW_AUTHENTICATE));
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn admin_endpoints_reject_other_roles() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, body) = send_json(
    f.app(),
    "POST",
    "/rubric/categories",
    f.evaluator,
    json!({ "label": "Research" }),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert!(body["error"].is_string());

  let (status, _, _) =
    send(f.app(), "GET", "/reports/metrics", Some(f.faculty), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── Administration ──────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_builds_rubric_and_period() {
  let f = fixture(PeriodStatus::Draft).await;

  let (status, category) = send_json(
    f.app(),
    "POST",
    "/rubric/categories",
    f.admin,
    json!({ "label": "Research", "description": "Publications" }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(category["ordinal"], 1);

  let (status, item) = send_json(
    f.app(),
    "POST",
    "/rubric/items",
    f.admin,
    json!({ "category_id": category["category_id"], "prompt": "Output" }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(item["max_score"], 5);

  let (status, _, rubric) =
    send(f.app(), "GET", "/rubric", Some(f.evaluator), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(rubric["categories"].as_array().unwrap().len(), 2);

  let (status, period) = send_json(
    f.app(),
    "PUT",
    &format!("/periods/{}/status", f.period_id),
    f.admin,
    json!({ "status": "open" }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(period["status"], "open");
}

#[tokio::test]
async fn item_for_unknown_category_is_404() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, _) = send_json(
    f.app(),
    "POST",
    "/rubric/items",
    f.admin,
    json!({ "category_id": Uuid::new_v4(), "prompt": "Orphan" }),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_profile_is_400() {
  let f = fixture(PeriodStatus::Open).await;
  let body = json!({
    "profile_id": f.faculty.user_id,
    "full_name": "Ada Lovelace",
    "role": "faculty",
  });
  let (status, _) =
    send_json(f.app(), "POST", "/profiles", f.admin, body.clone()).await;
  assert_eq!(status, StatusCode::CREATED);

  let (status, err) = send_json(f.app(), "POST", "/profiles", f.admin, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(err["error"].as_str().unwrap().contains("already exists"));

  let uri = format!("/profiles/{}", f.faculty.user_id);
  let (status, _, profile) = send(f.app(), "GET", &uri, Some(f.admin), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(profile["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn evaluators_only_list_their_own_assignments() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, created) = send_json(
    f.app(),
    "POST",
    "/assignments",
    f.admin,
    json!({
      "period_id": f.period_id,
      "faculty_id": f.faculty.user_id,
      "evaluator_id": Uuid::new_v4(),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["role"], "peer");

  let (_, _, all) =
    send(f.app(), "GET", "/assignments", Some(f.admin), None).await;
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, _, mine) =
    send(f.app(), "GET", "/assignments", Some(f.evaluator), None).await;
  let mine = mine.as_array().unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0]["assignment_id"], json!(f.assignment.assignment_id));
}

// ─── Submission ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_by_assignment_id() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, body) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "assignmentId": f.assignment.assignment_id,
      "overallComment": "Good term",
      "responses": f.full_scores(4),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["success"], true);

  let evaluation_id: Uuid =
    serde_json::from_value(body["evaluationId"].clone()).unwrap();
  assert_eq!(f.store.count_responses(evaluation_id).await.unwrap(), 3);
}

#[tokio::test]
async fn submit_resolves_assignment_from_period() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, body) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "periodId": f.period_id,
      "facultyId": f.faculty.user_id,
      "responses": f.full_scores(3),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let stored = f
    .store
    .find_evaluation(f.assignment.assignment_id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(body["evaluationId"], json!(stored.evaluation_id));
}

#[tokio::test]
async fn ambiguous_period_submission_is_400() {
  let f = fixture(PeriodStatus::Open).await;
  let other_faculty = caller(UserRole::Faculty);
  f.store
    .add_assignment(NewAssignment {
      period_id:    f.period_id,
      faculty_id:   other_faculty.user_id,
      evaluator_id: f.evaluator.user_id,
      role:         EvaluatorRole::Peer,
      section_id:   None,
    })
    .await
    .unwrap()
    .unwrap();

  let (status, _) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({ "periodId": f.period_id, "responses": f.full_scores(3) }),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(
    f.store
      .find_evaluation(f.assignment.assignment_id)
      .await
      .unwrap()
      .is_none()
  );

  let (status, _) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "periodId": f.period_id,
      "facultyId": f.faculty.user_id,
      "responses": f.full_scores(3),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn submit_with_conflicting_period_is_403() {
  let f = fixture(PeriodStatus::Open).await;
  let (status, _) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "assignmentId": f.assignment.assignment_id,
      "periodId": Uuid::new_v4(),
      "responses": f.full_scores(3),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submit_without_assignment_is_403() {
  let f = fixture(PeriodStatus::Open).await;
  let stranger = caller(UserRole::Evaluator);
  let (status, _) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    stranger,
    json!({ "periodId": f.period_id, "responses": f.full_scores(3) }),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn submit_into_closed_period_is_403() {
  let f = fixture(PeriodStatus::Closed).await;
  let (status, body) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "assignmentId": f.assignment.assignment_id,
      "responses": f.full_scores(3),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["error"], "evaluation period is not open");
}

#[tokio::test]
async fn invalid_submissions_are_400() {
  let f = fixture(PeriodStatus::Open).await;
  let first = f.items[0].item_id.to_string();

  let cases = [
    // No scores at all.
    json!({ "assignmentId": f.assignment.assignment_id, "responses": {} }),
    // Missing two items.
    json!({ "assignmentId": f.assignment.assignment_id, "responses": { first.clone(): 3 } }),
    // Out of range.
    json!({ "assignmentId": f.assignment.assignment_id, "responses": f.full_scores(9) }),
    // Neither assignment nor period.
    json!({ "responses": f.full_scores(3) }),
    // Not a number.
    json!({ "assignmentId": f.assignment.assignment_id, "responses": { first: "five" } }),
  ];

  for case in cases {
    let (status, body) =
      send_json(f.app(), "POST", "/evaluations", f.evaluator, case.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "case {case}: {body}");
  }
  assert!(
    f.store
      .find_evaluation(f.assignment.assignment_id)
      .await
      .unwrap()
      .is_none()
  );
}

// ─── Read back ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn evaluation_visible_to_participants_only() {
  let f = fixture(PeriodStatus::Open).await;
  let (_, body) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "assignmentId": f.assignment.assignment_id,
      "responses": f.full_scores(5),
    }),
  )
  .await;
  let uri = format!("/evaluations/{}", body["evaluationId"].as_str().unwrap());

  for who in [f.admin, f.evaluator, f.faculty] {
    let (status, _, detail) = send(f.app(), "GET", &uri, Some(who), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["responses"].as_array().unwrap().len(), 3);
  }

  let (status, _, _) =
    send(f.app(), "GET", &uri, Some(caller(UserRole::Faculty)), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _, averages) =
    send(f.app(), "GET", &format!("{uri}/averages"), Some(f.faculty), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(averages[0]["label"], "Teaching");
  assert_eq!(averages[0]["average"], 5.0);

  let (status, _, _) = send(
    f.app(),
    "GET",
    &format!("/evaluations/{}", Uuid::new_v4()),
    Some(f.admin),
    None,
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluator_reads_evaluation_through_assignment() {
  let f = fixture(PeriodStatus::Open).await;
  let uri = format!("/assignments/{}/evaluation", f.assignment.assignment_id);

  let (status, _, _) = send(f.app(), "GET", &uri, Some(f.evaluator), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "assignmentId": f.assignment.assignment_id,
      "overallComment": "Solid",
      "responses": f.full_scores(4),
    }),
  )
  .await;

  let (_, _, mine) =
    send(f.app(), "GET", "/assignments", Some(f.evaluator), None).await;
  let assignment_id = mine[0]["assignment_id"].as_str().unwrap();
  let uri = format!("/assignments/{assignment_id}/evaluation");

  for who in [f.evaluator, f.faculty, f.admin] {
    let (status, _, detail) = send(f.app(), "GET", &uri, Some(who), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["evaluation"]["status"], "submitted");
    assert!(detail["evaluation"]["submitted_at"].is_string());
    assert_eq!(detail["evaluation"]["overall_comment"], "Solid");
    let responses = detail["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 3);
    assert!(responses.iter().all(|r| r["score"] == 4));
  }

  let (status, _, _) =
    send(f.app(), "GET", &uri, Some(caller(UserRole::Evaluator)), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let missing = format!("/assignments/{}/evaluation", Uuid::new_v4());
  let (status, _, _) = send(f.app(), "GET", &missing, Some(f.admin), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _, _) =
    send(f.app(), "GET", &missing, Some(f.evaluator), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
}

// ─── Reports & sentiments ────────────────────────────────────────────────────

#[tokio::test]
async fn section_report_lists_scored_sections() {
  let f = fixture(PeriodStatus::Open).await;
  let course = f
    .store
    .add_course(NewCourse { code: "CS1".into(), title: "Basics".into() })
    .await
    .unwrap();
  let section = f
    .store
    .add_section(NewSection {
      course_id:     course.course_id,
      faculty_id:    None,
      term:          None,
      academic_year: None,
      schedule:      Some("TTh 1pm".into()),
    })
    .await
    .unwrap()
    .unwrap();
  let assignment = f
    .store
    .add_assignment(NewAssignment {
      period_id:    f.period_id,
      faculty_id:   f.faculty.user_id,
      evaluator_id: f.evaluator.user_id,
      role:         EvaluatorRole::Student,
      section_id:   Some(section.section_id),
    })
    .await
    .unwrap()
    .unwrap();

  let (status, _) = send_json(
    f.app(),
    "POST",
    "/evaluations",
    f.evaluator,
    json!({
      "assignmentId": assignment.assignment_id,
      "responses": f.full_scores(4),
    }),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, _, report) =
    send(f.app(), "GET", "/reports/sections", Some(f.admin), None).await;
  assert_eq!(status, StatusCode::OK);
  let rows = report.as_array().unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0]["course_label"], "CS1 Basics");
  assert_eq!(rows[0]["average"], 4.0);
  assert_eq!(rows[0]["responses"], 3);
}

#[tokio::test]
async fn students_post_sentiments_admin_reads_them() {
  let f = fixture(PeriodStatus::Open).await;
  let student = caller(UserRole::Student);

  let (status, created) = send_json(
    f.app(),
    "POST",
    "/sentiments",
    student,
    json!({ "period_id": f.period_id, "comments": "Helpful lectures" }),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["sentiment"], "positive");

  let (status, _) = send_json(
    f.app(),
    "POST",
    "/sentiments",
    f.faculty,
    json!({ "comments": "Self praise" }),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _) =
    send_json(f.app(), "POST", "/sentiments", student, json!({ "comments": "" }))
      .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _, listed) =
    send(f.app(), "GET", "/sentiments", Some(f.admin), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let (_, _, metrics) =
    send(f.app(), "GET", "/reports/metrics", Some(f.admin), None).await;
  assert_eq!(metrics["sentiments"], 1);
  assert_eq!(metrics["rubric_items"], 3);
}
