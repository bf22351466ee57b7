//! User-facing reply text.
//!
//! Everything the bot says lives here so the wording stays in one place.
//! Messages are sent with HTML parse mode, so item text is escaped before
//! interpolation.

pub const WELCOME: &str = "🛒 Welcome to the Shopping List Bot!\n\
    Use /add &lt;item&gt; to add an item\n\
    Use /list to view items\n\
    Use /remove &lt;item&gt; to delete an item\n\
    Use /clear to empty the list\n\
    Or tap a button below.";

pub const MENU_PROMPT: &str = "What would you like to do?";
pub const ASK_ITEM: &str = "✏️ Send me the item you want to add.";

pub const EMPTY_LIST: &str = "🛒 Your shopping list is empty.";
pub const CLEARED: &str = "🧹 Shopping list cleared.";

pub const MISSING_ADD_ARG: &str = "⚠️ Please specify an item to add.";
pub const MISSING_REMOVE_ARG: &str = "⚠️ Please specify an item to remove.";

pub const UNRECOGNIZED: &str = "🤔 I didn't understand that. Use /start to see what I can do.";

pub fn added(item: &str) -> String {
    format!("✅ Added '{}' to the list.", escape(item))
}

pub fn removed(item: &str) -> String {
    format!("🗑️ Removed '{}' from the list.", escape(item))
}

pub fn not_in_list(item: &str) -> String {
    format!("❌ '{}' is not in the list.", escape(item))
}

/// Render the list 1-indexed, one item per line.
pub fn list(items: &[String]) -> String {
    if items.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let lines: Vec<String> = items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, escape(item)))
        .collect();

    format!("📝 <b>Your Shopping List:</b>\n{}", lines.join("\n"))
}

/// Escape a string for safe inclusion in Telegram HTML.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            _ => result.push(c),
        }
    }
    result
}
