//! Item data carried by collectables and the inventory

use serde::{Deserialize, Serialize};

use crate::types::PrefabId;

/// How an item behaves once it is in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Used from the inventory, applying its effect
    Consumable,
    /// Held in the hand and used on world objects
    Equippable,
    /// A note that can be re-read
    Inspectable,
}

/// Effect applied when a consumable is used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Restore (or drain, if negative) sanity
    Sanity(f32),
}

/// Use-time behavior of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAction {
    pub kind: ItemKind,
    /// Consumed after a successful use on a world object
    pub one_time_use: bool,
    /// Feedback text shown after a successful use
    pub success_text: Option<String>,
    pub effect: Option<ItemEffect>,
}

/// Data describing a collectable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub description: String,
    /// Template used to respawn the item when dropped or equipped
    pub prefab: Option<PrefabId>,
    pub action: ItemAction,
}

impl ItemData {
    /// Create a consumable item
    pub fn consumable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prefab: None,
            action: ItemAction {
                kind: ItemKind::Consumable,
                one_time_use: false,
                success_text: None,
                effect: None,
            },
        }
    }

    /// Create an equippable item
    pub fn equippable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prefab: None,
            action: ItemAction {
                kind: ItemKind::Equippable,
                one_time_use: false,
                success_text: None,
                effect: None,
            },
        }
    }

    /// Create an inspectable note item
    pub fn inspectable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prefab: None,
            action: ItemAction {
                kind: ItemKind::Inspectable,
                one_time_use: false,
                success_text: None,
                effect: None,
            },
        }
    }

    /// Set the respawn template
    pub fn with_prefab(mut self, prefab: PrefabId) -> Self {
        self.prefab = Some(prefab);
        self
    }

    /// Set the use effect
    pub fn with_effect(mut self, effect: ItemEffect) -> Self {
        self.action.effect = Some(effect);
        self
    }

    /// Mark the item as consumed on a successful use
    pub fn one_time_use(mut self) -> Self {
        self.action.one_time_use = true;
        self
    }

    /// Set the success feedback text
    pub fn with_success_text(mut self, text: impl Into<String>) -> Self {
        self.action.success_text = Some(text.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builders() {
        let key = ItemData::equippable("Cellar Key")
            .one_time_use()
            .with_success_text("The lock clicks open.");
        assert_eq!(key.action.kind, ItemKind::Equippable);
        assert!(key.action.one_time_use);

        let tonic = ItemData::consumable("Nerve Tonic").with_effect(ItemEffect::Sanity(25.0));
        assert_eq!(tonic.action.effect, Some(ItemEffect::Sanity(25.0)));
    }
}
