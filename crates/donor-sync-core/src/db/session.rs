//! Session persistence.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbResult};
use crate::models::SessionContext;

const SESSION_KEY: &str = "session";

impl Database {
    /// Get a raw session value.
    pub fn get_session_value(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM session_state WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Set a raw session value.
    pub fn set_session_value(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO session_state (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the persisted session, if someone is signed in.
    pub fn load_session(&self) -> DbResult<Option<SessionContext>> {
        match self.get_session_value(SESSION_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_session(&self, session: &SessionContext) -> DbResult<()> {
        let json = serde_json::to_string(session)?;
        self.set_session_value(SESSION_KEY, &json)
    }

    /// Remove all session state. Returns whether anything was stored.
    pub fn clear_session(&self) -> DbResult<bool> {
        let rows = self.conn.execute("DELETE FROM session_state", [])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_empty_session() {
        let db = setup_db();
        assert_eq!(db.load_session().unwrap(), None);
    }

    #[test]
    fn test_save_and_load_session() {
        let db = setup_db();
        let session = SessionContext::new(5).with_donor(42);
        db.save_session(&session).unwrap();
        assert_eq!(db.load_session().unwrap(), Some(session));

        // Overwrite
        db.save_session(&SessionContext::new(6)).unwrap();
        assert_eq!(db.load_session().unwrap(), Some(SessionContext::new(6)));
    }

    #[test]
    fn test_clear_session() {
        let db = setup_db();
        assert!(!db.clear_session().unwrap());

        db.save_session(&SessionContext::new(5)).unwrap();
        assert!(db.clear_session().unwrap());
        assert_eq!(db.load_session().unwrap(), None);
    }
}
