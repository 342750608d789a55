use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data::types::Type;

pub const MAX_BOOST: i8 = 6;
pub const MIN_BOOST: i8 = -6;

/// Normalize a display name into the id form used throughout the engine:
/// lowercase alphanumeric ("Stealth Rock" -> "stealthrock").
pub fn normalize_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Which of the two sides an instruction or action refers to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideRef {
    Bot,
    Opponent,
}

impl SideRef {
    pub fn other(self) -> SideRef {
        match self {
            SideRef::Bot => SideRef::Opponent,
            SideRef::Opponent => SideRef::Bot,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boost {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Boost {
    pub const ALL: [Boost; 7] = [
        Boost::Attack,
        Boost::Defense,
        Boost::SpecialAttack,
        Boost::SpecialDefense,
        Boost::Speed,
        Boost::Accuracy,
        Boost::Evasion,
    ];

    pub fn index(self) -> usize {
        match self {
            Boost::Attack => 0,
            Boost::Defense => 1,
            Boost::SpecialAttack => 2,
            Boost::SpecialDefense => 3,
            Boost::Speed => 4,
            Boost::Accuracy => 5,
            Boost::Evasion => 6,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Burn,
    Paralysis,
    Poison,
    Toxic,
    Sleep,
    Freeze,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatileStatus {
    Confusion,
    Flinch,
    Substitute,
    LeechSeed,
    Protect,
    SpikyShield,
    BanefulBunker,
    Roost,
    PartiallyTrapped,
    Taunt,
}

impl VolatileStatus {
    /// Volatiles that block protected moves when present on the defender.
    pub fn is_protect_effect(self) -> bool {
        matches!(
            self,
            VolatileStatus::Protect | VolatileStatus::SpikyShield | VolatileStatus::BanefulBunker
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Sun,
    Rain,
    Sand,
    Hail,
    HarshSun,
    HeavyRain,
}

impl Weather {
    /// Ability-induced weathers that ordinary weather moves cannot replace.
    pub fn is_irreversible(self) -> bool {
        matches!(self, Weather::HarshSun | Weather::HeavyRain)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Electric,
    Grassy,
    Misty,
    Psychic,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideCondition {
    Spikes,
    StealthRock,
    StickyWeb,
    ToxicSpikes,
    Reflect,
    LightScreen,
    AuroraVeil,
    Tailwind,
    /// Escalation counter for toxic damage, reset on switch-out.
    ToxicCount,
    /// Consecutive-use counter; Protect-class moves fail while it is set.
    Protect,
}

impl SideCondition {
    pub fn is_hazard(self) -> bool {
        matches!(
            self,
            SideCondition::Spikes
                | SideCondition::StealthRock
                | SideCondition::StickyWeb
                | SideCondition::ToxicSpikes
        )
    }

    pub fn max_layers(self) -> i8 {
        match self {
            SideCondition::Spikes => 3,
            SideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonStats {
    pub attack: i16,
    pub defense: i16,
    pub special_attack: i16,
    pub special_defense: i16,
    pub speed: i16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    pub id: String,
    pub pp: u8,
    #[serde(default)]
    pub disabled: bool,
}

impl MoveSlot {
    pub fn new(id: &str) -> MoveSlot {
        MoveSlot {
            id: normalize_id(id),
            pp: 32,
            disabled: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: String,
    pub level: u8,
    pub types: [Type; 2],
    pub hp: i16,
    pub max_hp: i16,
    pub stats: PokemonStats,
    /// Stage boosts indexed by [`Boost::index`].
    #[serde(default)]
    pub boosts: [i8; 7],
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub volatile_statuses: HashSet<VolatileStatus>,
    pub ability: String,
    #[serde(default)]
    pub item: Option<String>,
    pub moves: Vec<MoveSlot>,
    #[serde(default = "default_weight")]
    pub weight_kg: f32,
}

fn default_weight() -> f32 {
    50.0
}

impl Pokemon {
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp as f32
    }

    pub fn at_full_health(&self) -> bool {
        self.hp == self.max_hp
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.types[0] == t || self.types[1] == t
    }

    pub fn has_volatile(&self, v: VolatileStatus) -> bool {
        self.volatile_statuses.contains(&v)
    }

    pub fn ability_is(&self, id: &str) -> bool {
        self.ability == id
    }

    pub fn item_is(&self, id: &str) -> bool {
        self.item.as_deref() == Some(id)
    }

    pub fn boost(&self, b: Boost) -> i8 {
        self.boosts[b.index()]
    }

    /// Room left before a boost change clips at +-6.
    pub fn boost_headroom(&self, b: Boost, delta: i8) -> i8 {
        let current = self.boost(b);
        if delta > 0 {
            delta.min(MAX_BOOST - current)
        } else {
            delta.max(MIN_BOOST - current)
        }
    }

    pub fn move_slot(&self, id: &str) -> Option<&MoveSlot> {
        self.moves.iter().find(|m| m.id == id)
    }

    /// An attack or defense stat after stage boosts.
    pub fn boosted_stat(&self, b: Boost) -> i16 {
        let base = match b {
            Boost::Attack => self.stats.attack,
            Boost::Defense => self.stats.defense,
            Boost::SpecialAttack => self.stats.special_attack,
            Boost::SpecialDefense => self.stats.special_defense,
            Boost::Speed => self.stats.speed,
            Boost::Accuracy | Boost::Evasion => return 0,
        };
        let stage = self.boost(b);
        let boosted = if stage >= 0 {
            base as f32 * (2 + stage) as f32 / 2.0
        } else {
            base as f32 * 2.0 / (2 - stage) as f32
        };
        boosted as i16
    }

    /// Grounded Pokemon are affected by Spikes, Toxic Spikes and terrain.
    pub fn is_grounded(&self) -> bool {
        if self.has_type(Type::Flying) || self.ability_is("levitate") || self.item_is("airballoon")
        {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Side {
    pub active: Pokemon,
    #[serde(default)]
    pub reserve: HashMap<String, Pokemon>,
    #[serde(default)]
    pub side_conditions: HashMap<SideCondition, i8>,
    /// (turns remaining, heal amount); (0, _) when no Wish is pending.
    #[serde(default)]
    pub wish: (i8, i16),
}

impl Side {
    pub fn condition_count(&self, c: SideCondition) -> i8 {
        self.side_conditions.get(&c).copied().unwrap_or(0)
    }

    pub fn alive_reserve_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .reserve
            .values()
            .filter(|p| p.is_alive())
            .map(|p| p.id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn alive_count(&self) -> usize {
        let reserve = self.reserve.values().filter(|p| p.is_alive()).count();
        reserve + usize::from(self.active.is_alive())
    }

    /// Sleep clause: only one Pokemon per side may be put to sleep by an
    /// opposing move at a time.
    pub fn has_sleeping_pokemon(&self) -> bool {
        self.active.status == Some(Status::Sleep)
            || self
                .reserve
                .values()
                .any(|p| p.status == Some(Status::Sleep) && p.is_alive())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub bot: Side,
    pub opponent: Side,
    #[serde(default)]
    pub weather: Option<Weather>,
    #[serde(default)]
    pub terrain: Option<Terrain>,
    #[serde(default)]
    pub trick_room: bool,
}

impl State {
    pub fn side(&self, r: SideRef) -> &Side {
        match r {
            SideRef::Bot => &self.bot,
            SideRef::Opponent => &self.opponent,
        }
    }

    pub fn side_mut(&mut self, r: SideRef) -> &mut Side {
        match r {
            SideRef::Bot => &mut self.bot,
            SideRef::Opponent => &mut self.opponent,
        }
    }

    /// Both sides at once, acting side first.
    pub fn sides_mut(&mut self, acting: SideRef) -> (&mut Side, &mut Side) {
        match acting {
            SideRef::Bot => (&mut self.bot, &mut self.opponent),
            SideRef::Opponent => (&mut self.opponent, &mut self.bot),
        }
    }

    pub fn battle_is_over(&self) -> bool {
        self.bot.alive_count() == 0 || self.opponent.alive_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_id_strips_punctuation() {
        assert_eq!(normalize_id("Stealth Rock"), "stealthrock");
        assert_eq!(normalize_id("King's Shield"), "kingsshield");
        assert_eq!(normalize_id("U-turn"), "uturn");
    }

    #[test]
    fn boosted_stat_stage_ratios() {
        let mut p = test_util::dummy("p");
        p.stats.attack = 100;
        p.boosts[Boost::Attack.index()] = 2;
        assert_eq!(p.boosted_stat(Boost::Attack), 200);
        p.boosts[Boost::Attack.index()] = -2;
        assert_eq!(p.boosted_stat(Boost::Attack), 50);
        p.boosts[Boost::Attack.index()] = 0;
        assert_eq!(p.boosted_stat(Boost::Attack), 100);
    }

    #[test]
    fn boost_headroom_clips_at_six() {
        let mut p = test_util::dummy("p");
        p.boosts[Boost::Speed.index()] = 5;
        assert_eq!(p.boost_headroom(Boost::Speed, 2), 1);
        p.boosts[Boost::Defense.index()] = -6;
        assert_eq!(p.boost_headroom(Boost::Defense, -1), 0);
    }

    #[test]
    fn grounded_checks() {
        let mut p = test_util::dummy("p");
        assert!(p.is_grounded());
        p.item = Some("airballoon".to_string());
        assert!(!p.is_grounded());
        p.item = None;
        p.types = [Type::Flying, Type::Normal];
        assert!(!p.is_grounded());
    }
}
