//! File-backed store of per-user shopping lists.
//!
//! The full mapping is written back to disk on every mutation. Last writer
//! wins; there is no locking and no atomic rename, which is fine for a
//! single bot process.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Errors a list mutation can signal. Both are translated to reply text at
/// the engine boundary, never propagated further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListError {
    /// Add or remove was called with an empty item.
    EmptyItem,
    /// Remove target is not in the list.
    NotFound,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyItem => write!(f, "no item given"),
            Self::NotFound => write!(f, "item not in list"),
        }
    }
}

impl std::error::Error for ListError {}

/// Per-user shopping lists, mirrored to a JSON snapshot file.
pub struct ListStore {
    lists: HashMap<i64, Vec<String>>,
    path: Option<PathBuf>,
}

impl ListStore {
    /// Create an in-memory store with no backing file.
    pub fn new() -> Self {
        Self {
            lists: HashMap::new(),
            path: None,
        }
    }

    /// Load from file if it exists, otherwise start empty. Subsequent
    /// mutations are saved back to the same path.
    pub fn load_or_new(path: &Path) -> Self {
        let mut store = if path.exists() {
            match Self::load(path) {
                Ok(store) => store,
                Err(e) => {
                    warn!("Failed to load shopping lists: {e}");
                    Self::new()
                }
            }
        } else {
            info!("No shopping list file, starting fresh");
            Self::new()
        };
        store.path = Some(path.to_path_buf());
        store
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let json = std::fs::read_to_string(path).map_err(|e| format!("Failed to read: {e}"))?;

        // Keys are stored as strings (JSON object keys); convert back to user ids.
        let raw: HashMap<String, Vec<String>> =
            serde_json::from_str(&json).map_err(|e| format!("Failed to parse: {e}"))?;

        let mut lists = HashMap::new();
        for (key, items) in raw {
            match key.parse::<i64>() {
                Ok(user_id) => {
                    lists.insert(user_id, items);
                }
                Err(_) => warn!("Skipping non-numeric user key in store: {key}"),
            }
        }

        info!("🛒 Loaded shopping lists from {:?} ({} user(s))", path, lists.len());
        Ok(Self { lists, path: None })
    }

    pub fn save(&self) -> Result<(), String> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        let raw: HashMap<String, &Vec<String>> = self
            .lists
            .iter()
            .map(|(user_id, items)| (user_id.to_string(), items))
            .collect();

        let json = serde_json::to_string_pretty(&raw)
            .map_err(|e| format!("Failed to serialize: {e}"))?;

        std::fs::write(path, json).map_err(|e| format!("Failed to write: {e}"))?;

        debug!("💾 Saved shopping lists ({} user(s))", self.lists.len());
        Ok(())
    }

    /// Full-snapshot write after a mutation. Failures keep the in-memory
    /// state authoritative.
    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save shopping lists: {e}");
        }
    }

    /// Append an item to the user's list, creating the list if absent.
    pub fn add(&mut self, user_id: i64, item: &str) -> Result<(), ListError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(ListError::EmptyItem);
        }

        self.lists.entry(user_id).or_default().push(item.to_string());
        self.persist();
        Ok(())
    }

    /// Remove the first exact match of `item` from the user's list.
    pub fn remove(&mut self, user_id: i64, item: &str) -> Result<(), ListError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(ListError::EmptyItem);
        }

        let list = self.lists.get_mut(&user_id).ok_or(ListError::NotFound)?;
        let pos = list.iter().position(|x| x == item).ok_or(ListError::NotFound)?;
        list.remove(pos);
        self.persist();
        Ok(())
    }

    /// Empty the user's list. The key stays in the mapping.
    pub fn clear(&mut self, user_id: i64) {
        self.lists.insert(user_id, Vec::new());
        self.persist();
    }

    /// The user's items in insertion order. Empty for unknown users.
    pub fn items(&self, user_id: i64) -> &[String] {
        self.lists.get(&user_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}
