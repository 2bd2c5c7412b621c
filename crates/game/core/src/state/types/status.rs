//! Status effect state carried by combatants.
//!
//! Effects are kept in application order and identical kinds stack as
//! independent entries. Each entry ages by one per battle turn and is dropped
//! the moment its remaining turns reach zero.
//!
//! Attack/defense modifiers granted by an effect are recorded on the entry so
//! they can be handed back when the effect expires or is cleansed.

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    // ========================================================================
    // Buffs
    // ========================================================================
    AttackBoost,
    DefenseBoost,
    SpeedBoost,
    CritBoost,
    /// Heals a little every turn.
    Regeneration,

    // ========================================================================
    // Debuffs
    // ========================================================================
    Poison,
    Bleed,
    /// Holder loses its action while active.
    Stun,
    /// Drains temporary attack.
    Weak,
    Slow,
    Burn,
    Freeze,
    Curse,

    // ========================================================================
    // Special States
    // ========================================================================
    Invincible,
    Berserk,
    Stealth,
}

impl StatusKind {
    /// Kinds a player hit may inflict on its target.
    pub const ON_HIT: [StatusKind; 3] = [Self::Poison, Self::Bleed, Self::Burn];

    /// Kinds an enemy hex special may inflict.
    pub const HEX: [StatusKind; 3] = [Self::Poison, Self::Bleed, Self::Weak];

    /// In-game display name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::AttackBoost => "攻击强化",
            Self::DefenseBoost => "防御强化",
            Self::SpeedBoost => "速度强化",
            Self::CritBoost => "暴击强化",
            Self::Regeneration => "生命回复",
            Self::Poison => "中毒",
            Self::Bleed => "流血",
            Self::Stun => "眩晕",
            Self::Weak => "虚弱",
            Self::Slow => "减速",
            Self::Burn => "燃烧",
            Self::Freeze => "冰冻",
            Self::Curse => "诅咒",
            Self::Invincible => "无敌",
            Self::Berserk => "狂暴",
            Self::Stealth => "隐身",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::AttackBoost => "⚔️",
            Self::DefenseBoost => "🛡️",
            Self::SpeedBoost => "💨",
            Self::CritBoost => "💥",
            Self::Regeneration => "💚",
            Self::Poison => "☠️",
            Self::Bleed => "🩸",
            Self::Stun => "😵",
            Self::Weak => "😰",
            Self::Slow => "🐌",
            Self::Burn => "🔥",
            Self::Freeze => "❄️",
            Self::Curse => "👻",
            Self::Invincible => "✨",
            Self::Berserk => "😡",
            Self::Stealth => "👤",
        }
    }

    /// Whether the effect benefits its holder. Cleansing removes the rest.
    pub const fn is_positive(self) -> bool {
        matches!(
            self,
            Self::AttackBoost
                | Self::DefenseBoost
                | Self::SpeedBoost
                | Self::CritBoost
                | Self::Regeneration
                | Self::Invincible
                | Self::Berserk
                | Self::Stealth
        )
    }

    /// Turns an effect of this kind lasts unless overridden.
    pub const fn default_duration(self) -> u32 {
        match self {
            Self::AttackBoost
            | Self::DefenseBoost
            | Self::SpeedBoost
            | Self::CritBoost
            | Self::Weak
            | Self::Slow
            | Self::Berserk => 3,
            Self::Regeneration | Self::Poison => 5,
            Self::Bleed | Self::Burn => 4,
            Self::Stun | Self::Freeze | Self::Stealth => 2,
            Self::Curse => 6,
            Self::Invincible => 1,
        }
    }
}

/// A single active effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    kind: StatusKind,
    intensity: u32,
    remaining_turns: u32,
    /// Temporary attack this entry has added to (or removed from) its holder.
    atk_granted: i32,
    /// Temporary defense this entry has added to its holder.
    def_granted: i32,
}

impl StatusEffect {
    /// Creates an effect lasting the kind's default duration.
    pub fn new(kind: StatusKind, intensity: u32) -> Self {
        Self::with_duration(kind, intensity, kind.default_duration())
    }

    /// Creates an effect with an explicit duration.
    ///
    /// # Panics
    ///
    /// Panics if `turns` is zero; an effect must live for at least one turn.
    pub fn with_duration(kind: StatusKind, intensity: u32, turns: u32) -> Self {
        assert!(turns > 0, "status effect duration must be at least one turn");
        Self {
            kind,
            intensity,
            remaining_turns: turns,
            atk_granted: 0,
            def_granted: 0,
        }
    }

    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    pub fn intensity(&self) -> u32 {
        self.intensity
    }

    pub fn remaining_turns(&self) -> u32 {
        self.remaining_turns
    }

    pub fn is_active(&self) -> bool {
        self.remaining_turns > 0
    }

    /// Temporary attack/defense currently attributed to this entry.
    pub fn granted(&self) -> (i32, i32) {
        (self.atk_granted, self.def_granted)
    }

    pub(crate) fn record_grant(&mut self, atk: i32, def: i32) {
        self.atk_granted += atk;
        self.def_granted += def;
    }

    /// Ages the effect by one turn. Returns true once it has run out.
    pub(crate) fn age(&mut self) -> bool {
        self.remaining_turns = self.remaining_turns.saturating_sub(1);
        self.remaining_turns == 0
    }
}

/// Ordered list of effects on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Appends an effect. Duplicates of the same kind stack independently.
    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn count(&self, kind: StatusKind) -> usize {
        self.effects.iter().filter(|e| e.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Removes and returns every effect matching `predicate`, preserving order.
    pub(crate) fn drain_where(
        &mut self,
        mut predicate: impl FnMut(&StatusEffect) -> bool,
    ) -> Vec<StatusEffect> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.effects.len());
        for effect in self.effects.drain(..) {
            if predicate(&effect) {
                removed.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_kind_has_positive_default_duration() {
        for kind in StatusKind::iter() {
            assert!(kind.default_duration() > 0, "{kind} has zero duration");
        }
    }

    #[test]
    fn polarity_matches_catalogue() {
        let positive: Vec<_> = StatusKind::iter().filter(|k| k.is_positive()).collect();
        assert_eq!(positive.len(), 8);
        assert!(!StatusKind::Poison.is_positive());
        assert!(StatusKind::Regeneration.is_positive());
        assert!(StatusKind::ON_HIT.iter().all(|k| !k.is_positive()));
    }

    #[test]
    fn identical_effects_stack() {
        let mut effects = StatusEffects::empty();
        effects.push(StatusEffect::new(StatusKind::Poison, 1));
        effects.push(StatusEffect::new(StatusKind::Poison, 2));
        assert_eq!(effects.count(StatusKind::Poison), 2);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn aging_is_monotonic_until_expiry() {
        let mut effect = StatusEffect::with_duration(StatusKind::Burn, 1, 2);
        assert!(!effect.age());
        assert_eq!(effect.remaining_turns(), 1);
        assert!(effect.age());
        assert_eq!(effect.remaining_turns(), 0);
        assert!(!effect.is_active());
    }

    #[test]
    #[should_panic(expected = "at least one turn")]
    fn zero_duration_is_rejected() {
        StatusEffect::with_duration(StatusKind::Stun, 1, 0);
    }

    #[test]
    fn drain_where_keeps_order() {
        let mut effects = StatusEffects::empty();
        effects.push(StatusEffect::new(StatusKind::Poison, 1));
        effects.push(StatusEffect::new(StatusKind::AttackBoost, 1));
        effects.push(StatusEffect::new(StatusKind::Weak, 1));

        let removed = effects.drain_where(|e| !e.kind().is_positive());
        let kinds: Vec<_> = removed.iter().map(StatusEffect::kind).collect();
        assert_eq!(kinds, vec![StatusKind::Poison, StatusKind::Weak]);
        assert_eq!(effects.len(), 1);
        assert!(effects.has(StatusKind::AttackBoost));
    }
}
