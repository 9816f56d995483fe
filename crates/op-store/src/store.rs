use std::path::Path;

use rusqlite::{Connection, params};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::schema;
use crate::selections::Selections;

/// One saved snapshot of a profile's selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub profile: String,
    pub created_at: String,
    pub selections: Selections,
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        tracing::info!("opened store at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Selections ---

    /// Replace the profile's selections and append a history entry.
    /// Returns the history entry's id.
    pub fn save_selections(&self, profile: &str, selections: &Selections) -> Result<Uuid> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute("DELETE FROM selections WHERE profile = ?1", [profile])?;
        for (key, value) in selections.entries() {
            tx.execute(
                "INSERT INTO selections (profile, key, value) VALUES (?1, ?2, ?3)",
                params![profile, key, value],
            )?;
        }

        let id = Uuid::new_v4();
        let payload = serde_json::to_string(selections)?;
        tx.execute(
            "INSERT INTO selection_history (id, profile, payload) VALUES (?1, ?2, ?3)",
            params![id.to_string(), profile, payload],
        )?;

        tx.commit()?;
        tracing::debug!(
            "saved {} selections for profile '{profile}'",
            selections.entries().len()
        );
        Ok(id)
    }

    /// The profile's current selections, or `None` if it has never been saved.
    pub fn load_selections(&self, profile: &str) -> Result<Option<Selections>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM selections WHERE profile = ?1")?;
        let rows: Vec<(String, String)> = stmt
            .query_map([profile], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<_, _>>()?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut selections = Selections::default();
        for (key, value) in rows {
            selections.set(&key, value)?;
        }
        Ok(Some(selections))
    }

    pub fn list_profiles(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT profile FROM selections ORDER BY profile")?;
        let profiles = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;
        Ok(profiles)
    }

    /// Drop a profile's selections and history. Returns whether it existed.
    pub fn delete_profile(&self, profile: &str) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM selections WHERE profile = ?1", [profile])?;
        tx.execute(
            "DELETE FROM selection_history WHERE profile = ?1",
            [profile],
        )?;
        tx.commit()?;
        Ok(removed > 0)
    }

    /// Saved snapshots for a profile, newest first.
    pub fn history(&self, profile: &str) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile, payload, created_at FROM selection_history
             WHERE profile = ?1 ORDER BY rowid DESC",
        )?;
        let rows: Vec<(String, String, String, String)> = stmt
            .query_map([profile], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<std::result::Result<_, _>>()?;

        rows.into_iter()
            .map(|(id, profile, payload, created_at)| {
                Ok(HistoryEntry {
                    id: parse_uuid(&id)?,
                    profile,
                    created_at,
                    selections: serde_json::from_str(&payload)?,
                })
            })
            .collect()
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| StoreError::InvalidData(format!("invalid UUID '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gamma() -> Selections {
        let mut s = Selections::default();
        s.set("observer", "Se").unwrap();
        s.set("decider", "Fi").unwrap();
        s.set("modality", "FM").unwrap();
        s.set("animals", "CS/B(P)").unwrap();
        s.set("social", "#1").unwrap();
        s
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        store.save_selections("default", &gamma()).unwrap();
        assert_eq!(store.load_selections("default").unwrap(), Some(gamma()));
    }

    #[test]
    fn test_load_missing_profile() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.load_selections("nobody").unwrap(), None);
    }

    #[test]
    fn test_partial_selections_are_kept() {
        let store = Store::open_in_memory().unwrap();
        let mut s = Selections::default();
        s.set("observer", "N").unwrap();
        store.save_selections("draft", &s).unwrap();
        let loaded = store.load_selections("draft").unwrap().unwrap();
        assert_eq!(loaded.get("observer"), Some("N"));
        assert!(loaded.to_seed().is_err());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let store = Store::open_in_memory().unwrap();
        store.save_selections("p", &gamma()).unwrap();

        let mut smaller = Selections::default();
        smaller.set("decider", "Ti").unwrap();
        store.save_selections("p", &smaller).unwrap();

        assert_eq!(store.load_selections("p").unwrap(), Some(smaller));
    }

    #[test]
    fn test_history_newest_first() {
        let store = Store::open_in_memory().unwrap();
        let first = store.save_selections("p", &gamma()).unwrap();
        let mut edited = gamma();
        edited.set("social", "#3").unwrap();
        let second = store.save_selections("p", &edited).unwrap();

        let history = store.history("p").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second);
        assert_eq!(history[0].selections, edited);
        assert_eq!(history[1].id, first);
        assert!(!history[1].created_at.is_empty());
        assert!(store.history("other").unwrap().is_empty());
    }

    #[test]
    fn test_profiles_are_isolated() {
        let store = Store::open_in_memory().unwrap();
        store.save_selections("b", &gamma()).unwrap();
        let mut other = Selections::default();
        other.set("observer", "Ni").unwrap();
        store.save_selections("a", &other).unwrap();

        assert_eq!(store.list_profiles().unwrap(), vec!["a", "b"]);
        assert_eq!(store.load_selections("b").unwrap(), Some(gamma()));

        assert!(store.delete_profile("a").unwrap());
        assert!(!store.delete_profile("a").unwrap());
        assert_eq!(store.list_profiles().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_metadata() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get_metadata("missing").unwrap(), None);
        store.set_metadata("last_profile", "work").unwrap();
        assert_eq!(
            store.get_metadata("last_profile").unwrap(),
            Some("work".to_string())
        );
    }
}
