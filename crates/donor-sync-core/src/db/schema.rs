//! SQLite schema definition.

/// Schema for local session state.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Session State (replaces browser local storage)
-- ============================================================================

CREATE TABLE IF NOT EXISTS session_state (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
