//! Pre-damage move transforms. Each entry rewrites a copied [`MoveData`]
//! based on the battle situation (conditional power, accuracy, targets)
//! before the damage and effect steps run.

use phf::phf_map;

use crate::data::moves::{Accuracy, MoveCategory, MoveData};
use crate::data::types::Type;
use crate::sim::state::{Boost, Pokemon, Terrain, Weather};

pub struct AttackContext<'a> {
    pub attacker: &'a Pokemon,
    pub defender: &'a Pokemon,
    /// The defender chose to switch out this turn.
    pub defender_switching: bool,
    /// Static data of the move the defender chose, if it chose one.
    pub defender_move: Option<&'a MoveData>,
    /// The attacker acts before the defender this turn.
    pub moving_first: bool,
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
}

pub type MoveTransform = fn(&mut MoveData, &AttackContext);

pub fn apply_move_transform(move_id: &str, m: &mut MoveData, ctx: &AttackContext) {
    if let Some(transform) = TRANSFORMS.get(move_id) {
        transform(m, ctx);
    }
}

static TRANSFORMS: phf::Map<&'static str, MoveTransform> = phf_map! {
    "suckerpunch" => sucker_punch as MoveTransform,
    "eruption" => hp_scaled_power as MoveTransform,
    "waterspout" => hp_scaled_power as MoveTransform,
    "hex" => hex as MoveTransform,
    "facade" => facade as MoveTransform,
    "gyroball" => gyro_ball as MoveTransform,
    "electroball" => electro_ball as MoveTransform,
    "lowkick" => weight_scaled_power as MoveTransform,
    "grassknot" => weight_scaled_power as MoveTransform,
    "heavyslam" => weight_ratio_power as MoveTransform,
    "heatcrash" => weight_ratio_power as MoveTransform,
    "boltbeak" => double_if_first as MoveTransform,
    "fishiousrend" => double_if_first as MoveTransform,
    "avalanche" => avalanche as MoveTransform,
    "knockoff" => knock_off as MoveTransform,
    "acrobatics" => acrobatics as MoveTransform,
    "hurricane" => rain_accuracy as MoveTransform,
    "thunder" => rain_accuracy as MoveTransform,
    "blizzard" => blizzard as MoveTransform,
    "toxic" => toxic as MoveTransform,
    "freezedry" => freeze_dry as MoveTransform,
    "synthesis" => weather_heal as MoveTransform,
    "moonlight" => weather_heal as MoveTransform,
    "morningsun" => weather_heal as MoveTransform,
};

/// Fails unless the defender is about to use a damaging move this turn.
fn sucker_punch(m: &mut MoveData, ctx: &AttackContext) {
    let defender_attacking = ctx
        .defender_move
        .map(|d| d.category != MoveCategory::Status)
        .unwrap_or(false);
    if ctx.defender_switching || !defender_attacking || !ctx.moving_first {
        m.power = 0.0;
    }
}

fn hp_scaled_power(m: &mut MoveData, ctx: &AttackContext) {
    m.power *= ctx.attacker.hp_fraction();
}

fn hex(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.defender.status.is_some() {
        m.power *= 2.0;
    }
}

fn facade(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.attacker.status.is_some() {
        m.power *= 2.0;
    }
}

fn gyro_ball(m: &mut MoveData, ctx: &AttackContext) {
    let attacker_speed = ctx.attacker.boosted_stat(Boost::Speed).max(1) as f32;
    let defender_speed = ctx.defender.boosted_stat(Boost::Speed) as f32;
    m.power = (25.0 * defender_speed / attacker_speed + 1.0).min(150.0);
}

fn electro_ball(m: &mut MoveData, ctx: &AttackContext) {
    let attacker_speed = ctx.attacker.boosted_stat(Boost::Speed) as f32;
    let defender_speed = ctx.defender.boosted_stat(Boost::Speed).max(1) as f32;
    let ratio = attacker_speed / defender_speed;
    m.power = if ratio >= 4.0 {
        150.0
    } else if ratio >= 3.0 {
        120.0
    } else if ratio >= 2.0 {
        80.0
    } else if ratio >= 1.0 {
        60.0
    } else {
        40.0
    };
}

fn weight_scaled_power(m: &mut MoveData, ctx: &AttackContext) {
    let kg = ctx.defender.weight_kg;
    m.power = if kg >= 200.0 {
        120.0
    } else if kg >= 100.0 {
        100.0
    } else if kg >= 50.0 {
        80.0
    } else if kg >= 25.0 {
        60.0
    } else if kg >= 10.0 {
        40.0
    } else {
        20.0
    };
}

fn weight_ratio_power(m: &mut MoveData, ctx: &AttackContext) {
    let ratio = ctx.attacker.weight_kg / ctx.defender.weight_kg.max(0.1);
    m.power = if ratio >= 5.0 {
        120.0
    } else if ratio >= 4.0 {
        100.0
    } else if ratio >= 3.0 {
        80.0
    } else if ratio >= 2.0 {
        60.0
    } else {
        40.0
    };
}

fn double_if_first(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.moving_first || ctx.defender_switching {
        m.power *= 2.0;
    }
}

/// Doubled after taking a hit; approximated by the defender attacking first.
fn avalanche(m: &mut MoveData, ctx: &AttackContext) {
    let defender_attacking = ctx
        .defender_move
        .map(|d| d.category != MoveCategory::Status)
        .unwrap_or(false);
    if !ctx.moving_first && defender_attacking {
        m.power *= 2.0;
    }
}

fn knock_off(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.defender.item.is_some() {
        m.power *= 1.5;
    }
}

fn acrobatics(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.attacker.item.is_none() {
        m.power *= 2.0;
    }
}

fn rain_accuracy(m: &mut MoveData, ctx: &AttackContext) {
    match ctx.weather {
        Some(Weather::Rain) | Some(Weather::HeavyRain) => m.accuracy = Accuracy::Always,
        Some(Weather::Sun) | Some(Weather::HarshSun) => m.accuracy = Accuracy::Percent(50.0),
        _ => {}
    }
}

fn blizzard(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.weather == Some(Weather::Hail) {
        m.accuracy = Accuracy::Always;
    }
}

fn toxic(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.attacker.has_type(Type::Poison) {
        m.accuracy = Accuracy::Always;
    }
}

/// Treated as super effective against water.
fn freeze_dry(m: &mut MoveData, ctx: &AttackContext) {
    if ctx.defender.has_type(Type::Water) {
        m.power *= 4.0;
    }
}

fn weather_heal(m: &mut MoveData, ctx: &AttackContext) {
    if let Some(heal) = m.heal.as_mut() {
        heal.fraction = match ctx.weather {
            Some(Weather::Sun) | Some(Weather::HarshSun) => 2.0 / 3.0,
            Some(_) => 0.25,
            None => 0.5,
        };
    }
}
