//! Per-user menu interaction state.
//!
//! Tracks whether the bot is waiting for a user to type the item they want
//! to add after pressing the "Add Item" button. In-memory only; a restart
//! puts everyone back to [`SessionState::Idle`].

use std::collections::HashMap;

/// Where a user is in the menu-driven add flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    /// "Add Item" was pressed; the next text message is the item.
    AwaitingItem,
}

/// Session state per user id.
#[derive(Debug, Default)]
pub struct Sessions {
    states: HashMap<i64, SessionState>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the add flow: the user's next text message becomes an item.
    pub fn begin_awaiting(&mut self, user_id: i64) {
        self.states.insert(user_id, SessionState::AwaitingItem);
    }

    pub fn is_awaiting(&self, user_id: i64) -> bool {
        matches!(self.states.get(&user_id), Some(SessionState::AwaitingItem))
    }

    /// Consume an armed add flow. Returns true exactly once per
    /// [`begin_awaiting`](Self::begin_awaiting); the state goes back to Idle.
    pub fn take_awaiting(&mut self, user_id: i64) -> bool {
        matches!(
            self.states.insert(user_id, SessionState::Idle),
            Some(SessionState::AwaitingItem)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_users_start_idle() {
        let sessions = Sessions::new();
        assert!(!sessions.is_awaiting(1));
    }

    #[test]
    fn test_begin_then_take() {
        let mut sessions = Sessions::new();
        sessions.begin_awaiting(1);

        assert!(sessions.is_awaiting(1));
        assert!(sessions.take_awaiting(1));
    }

    #[test]
    fn test_take_fires_only_once() {
        let mut sessions = Sessions::new();
        sessions.begin_awaiting(1);

        assert!(sessions.take_awaiting(1));
        assert!(!sessions.take_awaiting(1));
        assert!(!sessions.is_awaiting(1));
    }

    #[test]
    fn test_states_are_per_user() {
        let mut sessions = Sessions::new();
        sessions.begin_awaiting(1);

        assert!(!sessions.is_awaiting(2));
        assert!(!sessions.take_awaiting(2));
        assert!(sessions.take_awaiting(1));
    }
}
