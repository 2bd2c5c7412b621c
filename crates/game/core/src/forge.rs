//! Equipment upgrade and repair economy.
//!
//! Both operations are all-or-nothing against the caller's currency balance
//! and report their result as a value. A refused request leaves the item and
//! the balance untouched.

use crate::config::EquipmentConfig;
use crate::env::RandomSource;
use crate::state::Equipment;

/// How an upgrade attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UpgradeOutcome {
    Upgraded { level: u32 },
    /// Trial failed; the cost was still paid.
    Failed { durability_lost: u32 },
    MaxLevel,
    Broken,
    InsufficientFunds { required: u32, available: u32 },
}

impl UpgradeOutcome {
    /// Whether currency was spent.
    pub const fn attempted(self) -> bool {
        matches!(self, Self::Upgraded { .. } | Self::Failed { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeResult {
    pub success: bool,
    pub outcome: UpgradeOutcome,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RepairOutcome {
    Repaired { cost: u32 },
    AlreadyIntact,
    InsufficientFunds { required: u32, available: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairResult {
    pub success: bool,
    pub outcome: RepairOutcome,
    pub message: String,
}

/// Upgrade/repair rules over a single item and a currency balance.
#[derive(Clone, Copy, Debug)]
pub struct Forge<'a> {
    config: &'a EquipmentConfig,
}

impl<'a> Forge<'a> {
    pub fn new(config: &'a EquipmentConfig) -> Self {
        Self { config }
    }

    /// Attempts one upgrade.
    ///
    /// Refused at max level, at zero durability, or when `currency` cannot
    /// cover the cost. Otherwise the cost is debited and one Bernoulli trial
    /// at the item's success rate decides: success raises the level and
    /// costs a little durability, failure costs more durability and nothing
    /// else.
    pub fn upgrade(
        &self,
        equipment: &mut Equipment,
        currency: &mut u32,
        rng: &mut (impl RandomSource + ?Sized),
    ) -> UpgradeResult {
        let name = equipment.name().to_owned();

        if equipment.is_max_level() {
            return UpgradeResult {
                success: false,
                outcome: UpgradeOutcome::MaxLevel,
                message: format!("{name} 已达到最高等级 {}", equipment.max_level()),
            };
        }
        if equipment.durability() == 0 {
            return UpgradeResult {
                success: false,
                outcome: UpgradeOutcome::Broken,
                message: format!("{name} 耐久度为 0，请先修理"),
            };
        }
        let cost = equipment.upgrade_cost();
        let Some(rest) = currency.checked_sub(cost) else {
            return UpgradeResult {
                success: false,
                outcome: UpgradeOutcome::InsufficientFunds {
                    required: cost,
                    available: *currency,
                },
                message: format!("金币不足，升级需要 {cost}，当前 {currency}"),
            };
        };
        *currency = rest;

        if rng.chance(equipment.success_rate()) {
            equipment.level_up(self.config);
            equipment.wear(self.config.success_durability_loss);
            let level = equipment.level();
            UpgradeResult {
                success: true,
                outcome: UpgradeOutcome::Upgraded { level },
                message: format!("升级成功！{name} 提升至 {level} 级"),
            }
        } else {
            let before = equipment.durability();
            equipment.wear(self.config.failure_durability_loss);
            let durability_lost = before - equipment.durability();
            UpgradeResult {
                success: false,
                outcome: UpgradeOutcome::Failed { durability_lost },
                message: format!("升级失败，{name} 耐久度下降 {durability_lost}"),
            }
        }
    }

    /// Restores full durability for `(max − current) × repair cost per point`.
    pub fn repair(&self, equipment: &mut Equipment, currency: &mut u32) -> RepairResult {
        let name = equipment.name().to_owned();

        if equipment.durability() >= equipment.max_durability() {
            return RepairResult {
                success: false,
                outcome: RepairOutcome::AlreadyIntact,
                message: format!("{name} 无需修理"),
            };
        }
        let cost = equipment.repair_cost();
        let Some(rest) = currency.checked_sub(cost) else {
            return RepairResult {
                success: false,
                outcome: RepairOutcome::InsufficientFunds {
                    required: cost,
                    available: *currency,
                },
                message: format!("金币不足，修理需要 {cost}，当前 {currency}"),
            };
        };

        *currency = rest;
        equipment.restore_durability();
        RepairResult {
            success: true,
            outcome: RepairOutcome::Repaired { cost },
            message: format!("{name} 修理完成，花费 {cost} 金币"),
        }
    }
}
