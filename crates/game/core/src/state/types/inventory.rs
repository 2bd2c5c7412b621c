//! Player-owned items and equipment.

use super::{Equipment, EquipmentKind, Item};

/// Reasons an equip/unequip request is refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("no equipment in slot {0}")]
    NoSuchEquipment(usize),

    #[error("{0} cannot be equipped")]
    NotEquippable(String),

    #[error("{0} is not equipped")]
    NotEquipped(String),
}

impl crate::error::GameError for InventoryError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoSuchEquipment(_) => "INVENTORY_NO_SUCH_EQUIPMENT",
            Self::NotEquippable(_) => "INVENTORY_NOT_EQUIPPABLE",
            Self::NotEquipped(_) => "INVENTORY_NOT_EQUIPPED",
        }
    }
}

/// Items and equipment carried by the player.
///
/// Only one weapon and one armor piece can be equipped at a time; equipping
/// a second one of the same kind unequips the first.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: Vec<Item>,
    gear: Vec<Equipment>,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`.
    pub fn take_item(&mut self, index: usize) -> Option<Item> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Index of the first item named `name`.
    pub fn find_item(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    pub fn gear(&self) -> &[Equipment] {
        &self.gear
    }

    pub fn equipment(&self, index: usize) -> Option<&Equipment> {
        self.gear.get(index)
    }

    pub fn equipment_mut(&mut self, index: usize) -> Option<&mut Equipment> {
        self.gear.get_mut(index)
    }

    /// Adds a piece of equipment and returns its slot index.
    pub fn add_equipment(&mut self, equipment: Equipment) -> usize {
        self.gear.push(equipment);
        self.gear.len() - 1
    }

    /// Equips the item at `index`, returning the slot of the item it replaced.
    pub fn equip(&mut self, index: usize) -> Result<Option<usize>, InventoryError> {
        let kind = {
            let target = self
                .gear
                .get(index)
                .ok_or(InventoryError::NoSuchEquipment(index))?;
            if target.kind() == EquipmentKind::Other {
                return Err(InventoryError::NotEquippable(target.name().to_owned()));
            }
            target.kind()
        };

        let replaced = self
            .gear
            .iter()
            .position(|e| e.is_equipped() && e.kind() == kind)
            .filter(|&slot| slot != index);
        if let Some(slot) = replaced {
            self.gear[slot].equipped = false;
        }
        self.gear[index].equipped = true;
        Ok(replaced)
    }

    pub fn unequip(&mut self, index: usize) -> Result<(), InventoryError> {
        let target = self
            .gear
            .get_mut(index)
            .ok_or(InventoryError::NoSuchEquipment(index))?;
        if !target.is_equipped() {
            return Err(InventoryError::NotEquipped(target.name().to_owned()));
        }
        target.equipped = false;
        Ok(())
    }

    /// Sum of bonuses from equipped items of `kind`.
    pub fn bonus(&self, kind: EquipmentKind) -> i32 {
        self.gear
            .iter()
            .filter(|e| e.kind() == kind)
            .map(Equipment::bonus)
            .sum()
    }
}
