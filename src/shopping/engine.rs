//! Event handling core: consumes normalized chat events, produces reply actions.
//!
//! The engine knows nothing about teloxide types. The Telegram handlers in
//! main.rs convert updates into [`Event`]s and apply the returned [`Action`].

use crate::shopping::menu::{self, MenuAction, MenuButton};
use crate::shopping::replies;
use crate::shopping::session::Sessions;
use crate::shopping::store::{ListError, ListStore};

/// A normalized inbound event with the user it came from.
#[derive(Debug, Clone)]
pub enum Event {
    /// A slash command, already split into lowercase name and raw args.
    Command {
        name: String,
        args: String,
        user_id: i64,
    },
    /// A plain text message.
    Text { body: String, user_id: i64 },
    /// An inline button press with its callback payload.
    ButtonPress { payload: String, user_id: i64 },
}

/// What the bot should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a new message, optionally with the inline menu attached.
    Reply {
        text: String,
        menu: Option<Vec<Vec<MenuButton>>>,
    },
    /// Edit the message that spawned the button press in place.
    EditOrigin {
        text: String,
        menu: Option<Vec<Vec<MenuButton>>>,
    },
}

impl Action {
    fn reply(text: impl Into<String>) -> Self {
        Self::Reply {
            text: text.into(),
            menu: None,
        }
    }

    fn reply_with_menu(text: impl Into<String>) -> Self {
        Self::Reply {
            text: text.into(),
            menu: Some(menu::main_menu()),
        }
    }

    fn edit(text: impl Into<String>) -> Self {
        Self::EditOrigin {
            text: text.into(),
            menu: None,
        }
    }

    fn edit_with_menu(text: impl Into<String>) -> Self {
        Self::EditOrigin {
            text: text.into(),
            menu: Some(menu::main_menu()),
        }
    }
}

/// Split `/name args` into a lowercase command name and trimmed args.
///
/// A `@BotUsername` suffix on the name is accepted (case-insensitively) only
/// when it matches this bot; commands addressed to other bots return `None`,
/// as do commands with an unverifiable target.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<(String, String)> {
    let rest = text.trim().strip_prefix('/')?;
    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args),
        None => (rest, ""),
    };

    let name = match head.split_once('@') {
        Some((name, target)) => match bot_username {
            Some(me) if target.eq_ignore_ascii_case(me) => name,
            _ => return None,
        },
        None => head,
    };

    if name.is_empty() {
        return None;
    }

    Some((name.to_lowercase(), args.trim().to_string()))
}

/// The per-event handler. Owns the list store and the session map; the
/// hosting runtime serializes calls to [`handle`](Self::handle).
pub struct ShoppingEngine {
    store: ListStore,
    sessions: Sessions,
}

impl ShoppingEngine {
    pub fn new(store: ListStore) -> Self {
        Self {
            store,
            sessions: Sessions::new(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Action {
        match event {
            Event::Command { name, args, user_id } => self.handle_command(&name, &args, user_id),
            Event::Text { body, user_id } => self.handle_text(&body, user_id),
            Event::ButtonPress { payload, user_id } => self.handle_button(&payload, user_id),
        }
    }

    fn handle_command(&mut self, name: &str, args: &str, user_id: i64) -> Action {
        match name {
            "start" | "help" => Action::reply_with_menu(replies::WELCOME),
            "menu" => Action::reply_with_menu(replies::MENU_PROMPT),
            "add" => match self.store.add(user_id, args) {
                Ok(()) => Action::reply(replies::added(args.trim())),
                Err(_) => Action::reply(replies::MISSING_ADD_ARG),
            },
            "list" => Action::reply(replies::list(self.store.items(user_id))),
            "remove" => match self.store.remove(user_id, args) {
                Ok(()) => Action::reply(replies::removed(args.trim())),
                Err(ListError::EmptyItem) => Action::reply(replies::MISSING_REMOVE_ARG),
                Err(ListError::NotFound) => Action::reply(replies::not_in_list(args.trim())),
            },
            "clear" => {
                self.store.clear(user_id);
                Action::reply(replies::CLEARED)
            }
            _ => Action::reply(replies::UNRECOGNIZED),
        }
    }

    fn handle_text(&mut self, body: &str, user_id: i64) -> Action {
        if !self.sessions.take_awaiting(user_id) {
            return Action::reply(replies::UNRECOGNIZED);
        }

        match self.store.add(user_id, body) {
            Ok(()) => Action::reply(replies::added(body.trim())),
            Err(_) => Action::reply(replies::MISSING_ADD_ARG),
        }
    }

    fn handle_button(&mut self, payload: &str, user_id: i64) -> Action {
        match MenuAction::from_payload(payload) {
            Some(MenuAction::AddItem) => {
                self.sessions.begin_awaiting(user_id);
                Action::edit(replies::ASK_ITEM)
            }
            Some(MenuAction::ShowList) => {
                Action::edit_with_menu(replies::list(self.store.items(user_id)))
            }
            Some(MenuAction::ClearList) => {
                self.store.clear(user_id);
                Action::edit_with_menu(replies::CLEARED)
            }
            None => Action::reply(replies::UNRECOGNIZED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_command() {
        assert_eq!(
            parse_command("/add milk", None),
            Some(("add".to_string(), "milk".to_string()))
        );
    }

    #[test]
    fn test_parse_command_without_args() {
        assert_eq!(
            parse_command("/list", None),
            Some(("list".to_string(), String::new()))
        );
    }

    #[test]
    fn test_parse_preserves_multi_word_args() {
        assert_eq!(
            parse_command("/add milk and honey", None),
            Some(("add".to_string(), "milk and honey".to_string()))
        );
    }

    #[test]
    fn test_parse_lowercases_name_but_not_args() {
        assert_eq!(
            parse_command("/Add Milk", None),
            Some(("add".to_string(), "Milk".to_string()))
        );
    }

    #[test]
    fn test_parse_strips_own_username_suffix() {
        assert_eq!(
            parse_command("/list@CartBot", Some("CartBot")),
            Some(("list".to_string(), String::new()))
        );
        assert_eq!(
            parse_command("/list@cartbot", Some("CartBot")),
            Some(("list".to_string(), String::new()))
        );
    }

    #[test]
    fn test_parse_ignores_commands_for_other_bots() {
        assert_eq!(parse_command("/list@OtherBot", Some("CartBot")), None);
        assert_eq!(parse_command("/list@OtherBot", None), None);
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert_eq!(parse_command("milk", None), None);
        assert_eq!(parse_command("/", None), None);
        assert_eq!(parse_command("", None), None);
    }
}
