use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::data::types::Type;
use crate::sim::state::{Boost, SideCondition, Status, Terrain, VolatileStatus, Weather};

pub const FLAG_CONTACT: u32 = 1 << 0;
/// Blocked by Protect-class volatiles.
pub const FLAG_PROTECT: u32 = 1 << 1;
pub const FLAG_SOUND: u32 = 1 << 2;
pub const FLAG_POWDER: u32 = 1 << 3;
pub const FLAG_PUNCH: u32 = 1 << 4;
pub const FLAG_BITE: u32 = 1 << 5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveTarget {
    User,
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Accuracy {
    Always,
    Percent(f32),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatBoosts {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatBoosts {
    pub fn entries(&self) -> [(Boost, i8); 7] {
        [
            (Boost::Attack, self.attack),
            (Boost::Defense, self.defense),
            (Boost::SpecialAttack, self.special_attack),
            (Boost::SpecialDefense, self.special_defense),
            (Boost::Speed, self.speed),
            (Boost::Accuracy, self.accuracy),
            (Boost::Evasion, self.evasion),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SecondaryKind {
    Status(Status),
    VolatileStatus(VolatileStatus),
    Boosts(StatBoosts),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecondaryEffect {
    pub chance: f32,
    pub target: MoveTarget,
    pub effect: SecondaryKind,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealEffect {
    pub target: MoveTarget,
    /// Fraction of the target's max HP restored.
    pub fraction: f32,
}

/// One move's static battle data. Generator-side transforms copy and mutate
/// these records per use, so everything here is `Copy`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveData {
    pub move_type: Type,
    pub category: MoveCategory,
    pub power: f32,
    pub accuracy: Accuracy,
    pub priority: i8,
    pub flags: u32,
    /// Primary status effect, rolled against the move's accuracy.
    pub status: Option<(MoveTarget, Status)>,
    /// Primary stat changes, rolled against the move's accuracy.
    pub boosts: Option<(MoveTarget, StatBoosts)>,
    /// Stat changes applied to the user after a successful hit.
    pub self_boosts: Option<StatBoosts>,
    /// Secondary effect with its own proc chance, rolled after a hit.
    pub secondary: Option<SecondaryEffect>,
    pub volatile_status: Option<(MoveTarget, VolatileStatus)>,
    pub heal: Option<HealEffect>,
    /// Fraction of damage dealt taken as recoil.
    pub recoil: Option<f32>,
    /// Fraction of the user's max HP lost when the move misses.
    pub crash: Option<f32>,
    /// Fraction of damage dealt restored to the user.
    pub drain: Option<f32>,
    pub side_condition: Option<(MoveTarget, SideCondition)>,
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
    pub trick_room: bool,
    /// Forces the defender out (Roar class).
    pub drag: bool,
    /// The user switches out after a successful hit (U-turn class).
    pub switch_after: bool,
}

impl MoveData {
    /// Neutral record used for unknown move ids: a status move with no
    /// effects, so the engine degrades to a no-op rather than failing.
    pub fn inert() -> MoveData {
        MoveData {
            move_type: Type::Normal,
            category: MoveCategory::Status,
            power: 0.0,
            accuracy: Accuracy::Always,
            priority: 0,
            flags: 0,
            status: None,
            boosts: None,
            self_boosts: None,
            secondary: None,
            volatile_status: None,
            heal: None,
            recoil: None,
            crash: None,
            drain: None,
            side_condition: None,
            weather: None,
            terrain: None,
            trick_room: false,
            drag: false,
            switch_after: false,
        }
    }

    fn attack(move_type: Type, category: MoveCategory, power: f32, accuracy: f32) -> MoveData {
        MoveData {
            move_type,
            category,
            power,
            accuracy: Accuracy::Percent(accuracy),
            flags: FLAG_PROTECT,
            ..MoveData::inert()
        }
    }

    fn physical(move_type: Type, power: f32, accuracy: f32) -> MoveData {
        MoveData::attack(move_type, MoveCategory::Physical, power, accuracy)
    }

    fn special(move_type: Type, power: f32, accuracy: f32) -> MoveData {
        MoveData::attack(move_type, MoveCategory::Special, power, accuracy)
    }

    fn status_move(move_type: Type) -> MoveData {
        MoveData {
            move_type,
            ..MoveData::inert()
        }
    }

    fn contact(mut self) -> MoveData {
        self.flags |= FLAG_CONTACT;
        self
    }

    fn flag(mut self, f: u32) -> MoveData {
        self.flags |= f;
        self
    }

    fn accuracy(mut self, pct: f32) -> MoveData {
        self.accuracy = Accuracy::Percent(pct);
        self
    }

    fn protect_blocked(mut self) -> MoveData {
        self.flags |= FLAG_PROTECT;
        self
    }

    fn priority(mut self, p: i8) -> MoveData {
        self.priority = p;
        self
    }

    fn status(mut self, target: MoveTarget, s: Status) -> MoveData {
        self.status = Some((target, s));
        self
    }

    fn boosts(mut self, target: MoveTarget, b: StatBoosts) -> MoveData {
        self.boosts = Some((target, b));
        self
    }

    fn self_boosts(mut self, b: StatBoosts) -> MoveData {
        self.self_boosts = Some(b);
        self
    }

    fn secondary(mut self, chance: f32, target: MoveTarget, effect: SecondaryKind) -> MoveData {
        self.secondary = Some(SecondaryEffect {
            chance,
            target,
            effect,
        });
        self
    }

    fn volatile(mut self, target: MoveTarget, v: VolatileStatus) -> MoveData {
        self.volatile_status = Some((target, v));
        self
    }

    fn heal(mut self, target: MoveTarget, fraction: f32) -> MoveData {
        self.heal = Some(HealEffect { target, fraction });
        self
    }

    fn recoil(mut self, fraction: f32) -> MoveData {
        self.recoil = Some(fraction);
        self
    }

    fn crash(mut self, fraction: f32) -> MoveData {
        self.crash = Some(fraction);
        self
    }

    fn drain(mut self, fraction: f32) -> MoveData {
        self.drain = Some(fraction);
        self
    }

    fn side_condition(mut self, target: MoveTarget, c: SideCondition) -> MoveData {
        self.side_condition = Some((target, c));
        self
    }

    fn weather(mut self, w: Weather) -> MoveData {
        self.weather = Some(w);
        self
    }

    fn terrain(mut self, t: Terrain) -> MoveData {
        self.terrain = Some(t);
        self
    }

    fn trick_room(mut self) -> MoveData {
        self.trick_room = true;
        self
    }

    fn drag(mut self) -> MoveData {
        self.drag = true;
        self
    }

    fn pivot(mut self) -> MoveData {
        self.switch_after = true;
        self
    }
}

pub fn get_move(id: &str) -> Option<&'static MoveData> {
    MOVES.get(id)
}

static MOVES: Lazy<HashMap<&'static str, MoveData>> = Lazy::new(build_move_table);

fn build_move_table() -> HashMap<&'static str, MoveData> {
    use MoveTarget::{Opponent, User};
    use Type::*;

    let flinch = |chance: f32| {
        move |m: MoveData| {
            m.secondary(
                chance,
                Opponent,
                SecondaryKind::VolatileStatus(VolatileStatus::Flinch),
            )
        }
    };

    let mut t: HashMap<&'static str, MoveData> = HashMap::new();

    // Plain attacks.
    t.insert("tackle", MoveData::physical(Normal, 40.0, 100.0).contact());
    t.insert("quickattack", MoveData::physical(Normal, 40.0, 100.0).contact().priority(1));
    t.insert("extremespeed", MoveData::physical(Normal, 80.0, 100.0).contact().priority(2));
    t.insert("return", MoveData::physical(Normal, 102.0, 100.0).contact());
    t.insert("doubleedge", MoveData::physical(Normal, 120.0, 100.0).contact().recoil(1.0 / 3.0));
    t.insert("bodyslam", MoveData::physical(Normal, 85.0, 100.0).contact()
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Paralysis)));
    t.insert("hypervoice", MoveData::special(Normal, 90.0, 100.0).flag(FLAG_SOUND));
    t.insert("boomburst", MoveData::special(Normal, 140.0, 100.0).flag(FLAG_SOUND));
    t.insert("facade", MoveData::physical(Normal, 70.0, 100.0).contact());

    t.insert("flamethrower", MoveData::special(Fire, 90.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Burn)));
    t.insert("fireblast", MoveData::special(Fire, 110.0, 85.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Burn)));
    t.insert("eruption", MoveData::special(Fire, 150.0, 100.0));
    t.insert("flareblitz", MoveData::physical(Fire, 120.0, 100.0).contact().recoil(1.0 / 3.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Burn)));
    t.insert("firepunch", MoveData::physical(Fire, 75.0, 100.0).contact().flag(FLAG_PUNCH)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Burn)));
    t.insert("sacredfire", MoveData::physical(Fire, 100.0, 95.0)
        .secondary(0.5, Opponent, SecondaryKind::Status(Status::Burn)));

    t.insert("surf", MoveData::special(Water, 90.0, 100.0));
    t.insert("hydropump", MoveData::special(Water, 110.0, 80.0));
    t.insert("waterspout", MoveData::special(Water, 150.0, 100.0));
    t.insert("scald", MoveData::special(Water, 80.0, 100.0)
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Burn)));
    t.insert("aquajet", MoveData::physical(Water, 40.0, 100.0).contact().priority(1));
    t.insert("fishiousrend", MoveData::physical(Water, 85.0, 100.0).contact().flag(FLAG_BITE));

    t.insert("thunderbolt", MoveData::special(Electric, 90.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Paralysis)));
    t.insert("thunder", MoveData::special(Electric, 110.0, 70.0)
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Paralysis)));
    t.insert("discharge", MoveData::special(Electric, 80.0, 100.0)
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Paralysis)));
    t.insert("voltswitch", MoveData::special(Electric, 70.0, 100.0).pivot());
    t.insert("boltbeak", MoveData::physical(Electric, 85.0, 100.0).contact());
    t.insert("thunderpunch", MoveData::physical(Electric, 75.0, 100.0).contact().flag(FLAG_PUNCH)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Paralysis)));
    t.insert("electroball", MoveData::special(Electric, 0.0, 100.0));

    t.insert("energyball", MoveData::special(Grass, 90.0, 100.0).secondary(
        0.1,
        Opponent,
        SecondaryKind::Boosts(StatBoosts { special_defense: -1, ..Default::default() }),
    ));
    t.insert("gigadrain", MoveData::special(Grass, 75.0, 100.0).drain(0.5));
    t.insert("leafstorm", MoveData::special(Grass, 130.0, 90.0)
        .self_boosts(StatBoosts { special_attack: -2, ..Default::default() }));
    t.insert("powerwhip", MoveData::physical(Grass, 120.0, 85.0).contact());
    t.insert("woodhammer", MoveData::physical(Grass, 120.0, 100.0).contact().recoil(1.0 / 3.0));
    t.insert("grassknot", MoveData::special(Grass, 0.0, 100.0).contact());

    t.insert("icebeam", MoveData::special(Ice, 90.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Freeze)));
    t.insert("blizzard", MoveData::special(Ice, 110.0, 70.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Freeze)));
    t.insert("icepunch", MoveData::physical(Ice, 75.0, 100.0).contact().flag(FLAG_PUNCH)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Freeze)));
    t.insert("iceshard", MoveData::physical(Ice, 40.0, 100.0).priority(1));
    t.insert("freezedry", MoveData::special(Ice, 70.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Status(Status::Freeze)));
    t.insert("icefang", flinch(0.1)(MoveData::physical(Ice, 65.0, 95.0).contact().flag(FLAG_BITE)));
    t.insert("avalanche", MoveData::physical(Ice, 60.0, 100.0).contact().priority(-4));

    t.insert("closecombat", MoveData::physical(Fighting, 120.0, 100.0).contact()
        .self_boosts(StatBoosts { defense: -1, special_defense: -1, ..Default::default() }));
    t.insert("superpower", MoveData::physical(Fighting, 120.0, 100.0).contact()
        .self_boosts(StatBoosts { attack: -1, defense: -1, ..Default::default() }));
    t.insert("drainpunch", MoveData::physical(Fighting, 75.0, 100.0).contact().flag(FLAG_PUNCH).drain(0.5));
    t.insert("machpunch", MoveData::physical(Fighting, 40.0, 100.0).contact().flag(FLAG_PUNCH).priority(1));
    t.insert("highjumpkick", MoveData::physical(Fighting, 130.0, 90.0).contact().crash(0.5));
    t.insert("jumpkick", MoveData::physical(Fighting, 100.0, 95.0).contact().crash(0.5));
    t.insert("lowkick", MoveData::physical(Fighting, 0.0, 100.0).contact());
    t.insert("focusblast", MoveData::special(Fighting, 120.0, 70.0)
        .secondary(0.1, Opponent, SecondaryKind::Boosts(StatBoosts { special_defense: -1, ..Default::default() })));

    t.insert("sludgebomb", MoveData::special(Poison, 90.0, 100.0)
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Poison)));
    t.insert("gunkshot", MoveData::physical(Poison, 120.0, 80.0)
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Poison)));
    t.insert("poisonjab", MoveData::physical(Poison, 80.0, 100.0).contact()
        .secondary(0.3, Opponent, SecondaryKind::Status(Status::Poison)));

    t.insert("earthquake", MoveData::physical(Ground, 100.0, 100.0));
    t.insert("earthpower", MoveData::special(Ground, 90.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Boosts(StatBoosts { special_defense: -1, ..Default::default() })));

    t.insert("bravebird", MoveData::physical(Flying, 120.0, 100.0).contact().recoil(1.0 / 3.0));
    t.insert("hurricane", MoveData::special(Flying, 110.0, 70.0)
        .secondary(0.3, Opponent, SecondaryKind::VolatileStatus(VolatileStatus::Confusion)));
    t.insert("airslash", flinch(0.3)(MoveData::special(Flying, 75.0, 95.0)));
    t.insert("acrobatics", MoveData::physical(Flying, 55.0, 100.0).contact());

    t.insert("psychic", MoveData::special(Psychic, 90.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Boosts(StatBoosts { special_defense: -1, ..Default::default() })));
    t.insert("psyshock", MoveData::special(Psychic, 80.0, 100.0));
    t.insert("zenheadbutt", flinch(0.2)(MoveData::physical(Psychic, 80.0, 90.0).contact()));

    t.insert("xscissor", MoveData::physical(Bug, 80.0, 100.0).contact());
    t.insert("megahorn", MoveData::physical(Bug, 120.0, 85.0).contact());
    t.insert("uturn", MoveData::physical(Bug, 70.0, 100.0).contact().pivot());
    t.insert("flipturn", MoveData::physical(Water, 60.0, 100.0).contact().pivot());

    t.insert("stoneedge", MoveData::physical(Rock, 100.0, 80.0));
    t.insert("rockslide", flinch(0.3)(MoveData::physical(Rock, 75.0, 90.0)));
    t.insert("headsmash", MoveData::physical(Rock, 150.0, 80.0).contact().recoil(0.5));

    t.insert("shadowball", MoveData::special(Ghost, 80.0, 100.0)
        .secondary(0.2, Opponent, SecondaryKind::Boosts(StatBoosts { special_defense: -1, ..Default::default() })));
    t.insert("shadowsneak", MoveData::physical(Ghost, 40.0, 100.0).contact().priority(1));
    t.insert("hex", MoveData::special(Ghost, 65.0, 100.0));

    t.insert("dracometeor", MoveData::special(Dragon, 130.0, 90.0)
        .self_boosts(StatBoosts { special_attack: -2, ..Default::default() }));
    t.insert("dragonpulse", MoveData::special(Dragon, 85.0, 100.0));
    t.insert("dragonclaw", MoveData::physical(Dragon, 80.0, 100.0).contact());
    t.insert("outrage", MoveData::physical(Dragon, 120.0, 100.0).contact());
    t.insert("dragontail", MoveData::physical(Dragon, 60.0, 90.0).contact().priority(-6).drag());

    t.insert("knockoff", MoveData::physical(Dark, 65.0, 100.0).contact());
    t.insert("darkpulse", flinch(0.2)(MoveData::special(Dark, 80.0, 100.0)));
    t.insert("crunch", MoveData::physical(Dark, 80.0, 100.0).contact().flag(FLAG_BITE)
        .secondary(0.2, Opponent, SecondaryKind::Boosts(StatBoosts { defense: -1, ..Default::default() })));
    t.insert("suckerpunch", MoveData::physical(Dark, 70.0, 100.0).contact().priority(1));
    t.insert("foulplay", MoveData::physical(Dark, 95.0, 100.0).contact());
    t.insert("partingshot", MoveData::status_move(Dark).protect_blocked().accuracy(100.0)
        .boosts(Opponent, StatBoosts { attack: -1, special_attack: -1, ..Default::default() })
        .pivot());

    t.insert("ironhead", flinch(0.3)(MoveData::physical(Steel, 80.0, 100.0).contact()));
    t.insert("bulletpunch", MoveData::physical(Steel, 40.0, 100.0).contact().flag(FLAG_PUNCH).priority(1));
    t.insert("heavyslam", MoveData::physical(Steel, 0.0, 100.0).contact());
    t.insert("heatcrash", MoveData::physical(Fire, 0.0, 100.0).contact());
    t.insert("gyroball", MoveData::physical(Steel, 0.0, 100.0).contact());
    t.insert("flashcannon", MoveData::special(Steel, 80.0, 100.0)
        .secondary(0.1, Opponent, SecondaryKind::Boosts(StatBoosts { special_defense: -1, ..Default::default() })));

    t.insert("moonblast", MoveData::special(Fairy, 95.0, 100.0)
        .secondary(0.3, Opponent, SecondaryKind::Boosts(StatBoosts { special_attack: -1, ..Default::default() })));
    t.insert("playrough", MoveData::physical(Fairy, 90.0, 90.0).contact()
        .secondary(0.1, Opponent, SecondaryKind::Boosts(StatBoosts { attack: -1, ..Default::default() })));
    t.insert("dazzlinggleam", MoveData::special(Fairy, 80.0, 100.0));

    // Status: major status infliction.
    t.insert("toxic", MoveData::status_move(Poison).protect_blocked().accuracy(90.0)
        .status(Opponent, Status::Toxic));
    t.insert("willowisp", MoveData::status_move(Fire).protect_blocked().accuracy(85.0)
        .status(Opponent, Status::Burn));
    t.insert("thunderwave", MoveData::status_move(Electric).protect_blocked().accuracy(90.0)
        .status(Opponent, Status::Paralysis));
    t.insert("glare", MoveData::status_move(Normal).protect_blocked().accuracy(100.0)
        .status(Opponent, Status::Paralysis));
    t.insert("spore", MoveData::status_move(Grass).protect_blocked().flag(FLAG_POWDER).accuracy(100.0)
        .status(Opponent, Status::Sleep));
    t.insert("sleeppowder", MoveData::status_move(Grass).protect_blocked().flag(FLAG_POWDER).accuracy(75.0)
        .status(Opponent, Status::Sleep));
    t.insert("stunspore", MoveData::status_move(Grass).protect_blocked().flag(FLAG_POWDER).accuracy(75.0)
        .status(Opponent, Status::Paralysis));
    t.insert("hypnosis", MoveData::status_move(Psychic).protect_blocked().accuracy(60.0)
        .status(Opponent, Status::Sleep));

    // Status: boosts.
    t.insert("swordsdance", MoveData::status_move(Normal)
        .boosts(User, StatBoosts { attack: 2, ..Default::default() }));
    t.insert("nastyplot", MoveData::status_move(Dark)
        .boosts(User, StatBoosts { special_attack: 2, ..Default::default() }));
    t.insert("calmmind", MoveData::status_move(Psychic)
        .boosts(User, StatBoosts { special_attack: 1, special_defense: 1, ..Default::default() }));
    t.insert("quiverdance", MoveData::status_move(Bug)
        .boosts(User, StatBoosts { special_attack: 1, special_defense: 1, speed: 1, ..Default::default() }));
    t.insert("dragondance", MoveData::status_move(Dragon)
        .boosts(User, StatBoosts { attack: 1, speed: 1, ..Default::default() }));
    t.insert("bulkup", MoveData::status_move(Fighting)
        .boosts(User, StatBoosts { attack: 1, defense: 1, ..Default::default() }));
    t.insert("shellsmash", MoveData::status_move(Normal)
        .boosts(User, StatBoosts {
            attack: 2, special_attack: 2, speed: 2, defense: -1, special_defense: -1,
            ..Default::default()
        }));
    t.insert("agility", MoveData::status_move(Psychic)
        .boosts(User, StatBoosts { speed: 2, ..Default::default() }));
    t.insert("irondefense", MoveData::status_move(Steel)
        .boosts(User, StatBoosts { defense: 2, ..Default::default() }));
    t.insert("charm", MoveData::status_move(Fairy).protect_blocked().accuracy(100.0)
        .boosts(Opponent, StatBoosts { attack: -2, ..Default::default() }));
    t.insert("growl", MoveData::status_move(Normal).protect_blocked().flag(FLAG_SOUND).accuracy(100.0)
        .boosts(Opponent, StatBoosts { attack: -1, ..Default::default() }));

    // Status: recovery.
    t.insert("recover", MoveData::status_move(Normal).heal(User, 0.5));
    t.insert("softboiled", MoveData::status_move(Normal).heal(User, 0.5));
    t.insert("slackoff", MoveData::status_move(Normal).heal(User, 0.5));
    t.insert("roost", MoveData::status_move(Flying).heal(User, 0.5)
        .volatile(User, VolatileStatus::Roost));
    t.insert("synthesis", MoveData::status_move(Grass).heal(User, 0.5));
    t.insert("moonlight", MoveData::status_move(Fairy).heal(User, 0.5));
    t.insert("morningsun", MoveData::status_move(Normal).heal(User, 0.5));
    t.insert("wish", MoveData::status_move(Normal));

    // Status: protection and other volatiles.
    t.insert("protect", MoveData::status_move(Normal).priority(4)
        .volatile(User, VolatileStatus::Protect));
    t.insert("spikyshield", MoveData::status_move(Grass).priority(4)
        .volatile(User, VolatileStatus::SpikyShield));
    t.insert("banefulbunker", MoveData::status_move(Poison).priority(4)
        .volatile(User, VolatileStatus::BanefulBunker));
    t.insert("substitute", MoveData::status_move(Normal)
        .volatile(User, VolatileStatus::Substitute));
    t.insert("leechseed", MoveData::status_move(Grass).protect_blocked().accuracy(90.0)
        .volatile(Opponent, VolatileStatus::LeechSeed));
    t.insert("confuseray", MoveData::status_move(Ghost).protect_blocked().accuracy(100.0)
        .volatile(Opponent, VolatileStatus::Confusion));
    t.insert("taunt", MoveData::status_move(Dark).protect_blocked().accuracy(100.0)
        .volatile(Opponent, VolatileStatus::Taunt));
    t.insert("splash", MoveData::status_move(Normal));

    // Status: side conditions.
    t.insert("spikes", MoveData::status_move(Ground)
        .side_condition(Opponent, SideCondition::Spikes));
    t.insert("stealthrock", MoveData::status_move(Rock)
        .side_condition(Opponent, SideCondition::StealthRock));
    t.insert("stickyweb", MoveData::status_move(Bug)
        .side_condition(Opponent, SideCondition::StickyWeb));
    t.insert("toxicspikes", MoveData::status_move(Poison)
        .side_condition(Opponent, SideCondition::ToxicSpikes));
    t.insert("reflect", MoveData::status_move(Psychic)
        .side_condition(User, SideCondition::Reflect));
    t.insert("lightscreen", MoveData::status_move(Psychic)
        .side_condition(User, SideCondition::LightScreen));
    t.insert("auroraveil", MoveData::status_move(Ice)
        .side_condition(User, SideCondition::AuroraVeil));
    t.insert("tailwind", MoveData::status_move(Flying)
        .side_condition(User, SideCondition::Tailwind));
    t.insert("rapidspin", MoveData::physical(Normal, 50.0, 100.0).contact()
        .self_boosts(StatBoosts { speed: 1, ..Default::default() }));
    t.insert("defog", MoveData::status_move(Flying).protect_blocked().accuracy(100.0)
        .boosts(Opponent, StatBoosts { evasion: -1, ..Default::default() }));

    // Status: field.
    t.insert("sunnyday", MoveData::status_move(Fire).weather(Weather::Sun));
    t.insert("raindance", MoveData::status_move(Water).weather(Weather::Rain));
    t.insert("sandstorm", MoveData::status_move(Rock).weather(Weather::Sand));
    t.insert("hail", MoveData::status_move(Ice).weather(Weather::Hail));
    t.insert("electricterrain", MoveData::status_move(Electric).terrain(Terrain::Electric));
    t.insert("grassyterrain", MoveData::status_move(Grass).terrain(Terrain::Grassy));
    t.insert("mistyterrain", MoveData::status_move(Fairy).terrain(Terrain::Misty));
    t.insert("psychicterrain", MoveData::status_move(Psychic).terrain(Terrain::Psychic));
    t.insert("trickroom", MoveData::status_move(Psychic).priority(-7).trick_room());
    t.insert("trick", MoveData::status_move(Psychic).protect_blocked().accuracy(100.0));
    t.insert("switcheroo", MoveData::status_move(Dark).protect_blocked().accuracy(100.0));

    // Phazing.
    t.insert("roar", MoveData::status_move(Normal).protect_blocked().flag(FLAG_SOUND)
        .priority(-6).drag());
    t.insert("whirlwind", MoveData::status_move(Normal).protect_blocked().priority(-6).drag());
    t.insert("circlethrow", MoveData::physical(Fighting, 60.0, 90.0).contact().priority(-6).drag());

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_move_lookup() {
        let tackle = get_move("tackle").unwrap();
        assert_eq!(tackle.power, 40.0);
        assert_eq!(tackle.category, MoveCategory::Physical);
        assert!(tackle.flags & FLAG_CONTACT != 0);
        assert!(get_move("not-a-real-move").is_none());
    }

    #[test]
    fn priority_and_effects() {
        assert_eq!(get_move("protect").unwrap().priority, 4);
        assert_eq!(get_move("trickroom").unwrap().priority, -7);
        assert!(get_move("uturn").unwrap().switch_after);
        assert!(get_move("roar").unwrap().drag);
        let scald = get_move("scald").unwrap();
        let sec = scald.secondary.unwrap();
        assert_eq!(sec.chance, 0.3);
        assert_eq!(sec.effect, SecondaryKind::Status(Status::Burn));
    }
}
