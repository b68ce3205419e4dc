//! Action items shown in the top bar.
//!
//! The menu is keyed by [`ItemId`], an integer derived from a button's string
//! id. Items are kept sorted by their `order`; items sharing an order keep
//! insertion order.

use crate::icon::Icon;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

lazy_static! {
    static ref ITEM_IDS: Mutex<HashMap<String, u32>> = Mutex::new(HashMap::new());
}

/// Menu-internal key of a button.
///
/// Ids are interned for the lifetime of the process: the same button id
/// always maps to the same value and distinct ids never share one.
///
/// The table is never pruned. It holds one entry per distinct button id seen
/// by the process, which stays small for button sets declared by the
/// application; generating unbounded ids (e.g. per record) grows it without
/// limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    pub fn for_button(button_id: &str) -> ItemId {
        let mut ids = ITEM_IDS.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(&value) = ids.get(button_id) {
            return ItemId(value);
        }

        let value = ids.len() as u32 + 1;
        ids.insert(button_id.to_string(), value);
        ItemId(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowAsAction {
    Never,
    IfRoom,
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    item_id: ItemId,
    order: usize,
    title: String,
    icon: Option<Icon>,
    enabled: bool,
    show_as_action: ShowAsAction,
}

impl MenuItem {
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> Option<&Icon> {
        self.icon.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn show_as_action(&self) -> ShowAsAction {
        self.show_as_action
    }

    pub fn set_icon(&mut self, icon: Icon) -> &mut Self {
        self.icon = Some(icon);
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled = enabled;
        self
    }

    pub fn set_show_as_action(&mut self, show_as_action: ShowAsAction) -> &mut Self {
        self.show_as_action = show_as_action;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Menu::default()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, item_id: ItemId) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Removes the item with the given id, returning whether one was present.
    pub fn remove_item(&mut self, item_id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.item_id != item_id);
        self.items.len() != before
    }

    /// Adds an item at its ordinal position and returns it for configuration.
    ///
    /// An existing item with the same id is replaced.
    pub fn add(&mut self, item_id: ItemId, order: usize, title: impl Into<String>) -> &mut MenuItem {
        self.remove_item(item_id);

        let index = self
            .items
            .iter()
            .position(|item| item.order > order)
            .unwrap_or(self.items.len());

        self.items.insert(
            index,
            MenuItem {
                item_id,
                order,
                title: title.into(),
                icon: None,
                enabled: true,
                show_as_action: ShowAsAction::Never,
            },
        );

        &mut self.items[index]
    }
}
