//! Inventory items other than equipment.

/// Item categories. Only a few of them do anything inside a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ItemKind {
    Medicine,
    Clue,
    BuffPotion,
    DebuffPotion,
    Poison,
    ControlItem,
    Antidote,
    Special,
    Other,
}

impl ItemKind {
    /// Whether the item can be used as a battle action.
    pub const fn usable_in_battle(self) -> bool {
        matches!(
            self,
            Self::Medicine | Self::BuffPotion | Self::Antidote | Self::Poison
        )
    }

    /// Whether the item must be aimed at an enemy.
    pub const fn targets_enemy(self) -> bool {
        matches!(self, Self::Poison)
    }
}

/// A stackless inventory item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub kind: ItemKind,
    /// Magnitude: hp healed, potion strength, poison strength.
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: u32,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind, effect: u32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            effect,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
