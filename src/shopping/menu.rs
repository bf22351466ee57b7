//! Inline menu layout and callback payloads.

/// One button in the inline menu: the label shown to the user and the
/// callback payload Telegram sends back when it is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuButton {
    pub label: &'static str,
    pub payload: &'static str,
}

/// Actions reachable from the inline menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    AddItem,
    ShowList,
    ClearList,
}

impl MenuAction {
    pub const fn payload(self) -> &'static str {
        match self {
            Self::AddItem => "menu:add",
            Self::ShowList => "menu:list",
            Self::ClearList => "menu:clear",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AddItem => "➕ Add Item",
            Self::ShowList => "📝 Show List",
            Self::ClearList => "🧹 Clear List",
        }
    }

    pub fn from_payload(payload: &str) -> Option<Self> {
        match payload {
            "menu:add" => Some(Self::AddItem),
            "menu:list" => Some(Self::ShowList),
            "menu:clear" => Some(Self::ClearList),
            _ => None,
        }
    }

    const fn button(self) -> MenuButton {
        MenuButton {
            label: self.label(),
            payload: self.payload(),
        }
    }
}

/// The main menu: Add Item on its own row, Show and Clear below it.
pub fn main_menu() -> Vec<Vec<MenuButton>> {
    vec![
        vec![MenuAction::AddItem.button()],
        vec![MenuAction::ShowList.button(), MenuAction::ClearList.button()],
    ]
}
