//! Menu-tree sink: user-facing toggles and buttons keyed by
//! slash-delimited paths.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::machine::ParamId;

/// Slash-delimited menu location, e.g. `Zones/Options/Stealth`.
/// Unlike node paths, menu segments may contain spaces (they are labels).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuPath(pub String);

impl MenuPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn join(&self, label: &str) -> MenuPath {
        if self.0.is_empty() {
            MenuPath(label.to_string())
        } else {
            MenuPath(format!("{}/{}", self.0, label))
        }
    }
}

impl fmt::Display for MenuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MenuItem {
    /// Checkbox bound to a boolean parameter.
    Toggle(ParamId),
    /// Informational button with no bound parameter.
    Button,
}

/// Flat, insertion-ordered menu sink. Folder structure is implied by the
/// paths; generic tree editing is an external concern.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuTree {
    pub items: Vec<(MenuPath, MenuItem)>,
}

impl MenuTree {
    pub fn new_toggle(&mut self, path: MenuPath, param: ParamId) {
        self.items.push((path, MenuItem::Toggle(param)));
    }

    pub fn new_button(&mut self, path: MenuPath) {
        self.items.push((path, MenuItem::Button));
    }

    pub fn get(&self, path: &str) -> Option<&MenuItem> {
        self.items
            .iter()
            .find(|(p, _)| p.0 == path)
            .map(|(_, item)| item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_and_lookup() {
        let mut menu = MenuTree::default();
        let root = MenuPath::new("Zones");
        menu.new_toggle(root.join("Left Hand"), ParamId(3));
        assert!(matches!(
            menu.get("Zones/Left Hand"),
            Some(MenuItem::Toggle(ParamId(3)))
        ));
        assert!(menu.get("Zones/Other").is_none());
    }
}
