//! SQL schema for the Facultas SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY,
    full_name   TEXT,
    email       TEXT,
    role        TEXT NOT NULL    -- 'admin' | 'faculty' | 'evaluator' | 'student'
);

CREATE TABLE IF NOT EXISTS courses (
    course_id   TEXT PRIMARY KEY,
    code        TEXT NOT NULL,
    title       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sections (
    section_id    TEXT PRIMARY KEY,
    course_id     TEXT NOT NULL REFERENCES courses(course_id) ON DELETE CASCADE,
    faculty_id    TEXT REFERENCES profiles(profile_id) ON DELETE SET NULL,
    term          TEXT,
    academic_year TEXT,
    schedule      TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rubric_categories (
    category_id TEXT PRIMARY KEY,
    label       TEXT NOT NULL,
    description TEXT,
    order_index INTEGER NOT NULL
);

-- Items go with their category.
CREATE TABLE IF NOT EXISTS rubric_items (
    item_id     TEXT PRIMARY KEY,
    category_id TEXT NOT NULL REFERENCES rubric_categories(category_id) ON DELETE CASCADE,
    prompt      TEXT NOT NULL,
    max_score   INTEGER NOT NULL DEFAULT 5 CHECK (max_score > 0),
    order_index INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS evaluation_periods (
    period_id   TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'draft',   -- 'draft' | 'open' | 'closed'
    start_date  TEXT,                            -- YYYY-MM-DD
    end_date    TEXT
);

-- faculty_id and evaluator_id are identity-provider user ids; a profile row
-- is not required.
CREATE TABLE IF NOT EXISTS evaluator_assignments (
    assignment_id TEXT PRIMARY KEY,
    period_id     TEXT NOT NULL REFERENCES evaluation_periods(period_id) ON DELETE CASCADE,
    faculty_id    TEXT NOT NULL,
    evaluator_id  TEXT NOT NULL,
    role          TEXT NOT NULL,   -- 'self' | 'peer' | 'supervisor' | 'student'
    section_id    TEXT REFERENCES sections(section_id) ON DELETE SET NULL,
    created_at    TEXT NOT NULL
);

-- One evaluation per assignment.
CREATE TABLE IF NOT EXISTS evaluations (
    evaluation_id   TEXT PRIMARY KEY,
    assignment_id   TEXT NOT NULL UNIQUE
                    REFERENCES evaluator_assignments(assignment_id) ON DELETE CASCADE,
    status          TEXT NOT NULL DEFAULT 'draft',   -- 'draft' | 'submitted'
    submitted_at    TEXT,
    overall_comment TEXT
);

-- Replaced wholesale on every resubmission.
CREATE TABLE IF NOT EXISTS evaluation_responses (
    evaluation_id  TEXT NOT NULL REFERENCES evaluations(evaluation_id) ON DELETE CASCADE,
    rubric_item_id TEXT NOT NULL REFERENCES rubric_items(item_id) ON DELETE CASCADE,
    score          INTEGER NOT NULL CHECK (score >= 1),
    comment        TEXT,
    PRIMARY KEY (evaluation_id, rubric_item_id)
);

CREATE TABLE IF NOT EXISTS student_sentiments (
    sentiment_id TEXT PRIMARY KEY,
    period_id    TEXT REFERENCES evaluation_periods(period_id) ON DELETE SET NULL,
    section_id   TEXT REFERENCES sections(section_id) ON DELETE SET NULL,
    faculty_id   TEXT,
    sentiment    TEXT NOT NULL,   -- 'positive' | 'neutral' | 'negative'
    comments     TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS items_category_idx       ON rubric_items(category_id);
CREATE INDEX IF NOT EXISTS assignments_evaluator_idx ON evaluator_assignments(evaluator_id, period_id);
CREATE INDEX IF NOT EXISTS assignments_section_idx   ON evaluator_assignments(section_id);
CREATE INDEX IF NOT EXISTS sentiments_created_idx    ON student_sentiments(created_at);

PRAGMA user_version = 1;
";
