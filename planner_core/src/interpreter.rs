//! Step notation interpreter.
//!
//! Turns one notation line such as `"1000m @P(4:30-4:50) @C(170-180)"` into a
//! [`StepDetail`]. Tokens are read left to right and classified by what they
//! contain:
//!
//! 1. `sec` -> time end-condition in seconds
//! 2. `min` -> time end-condition, minutes converted to seconds
//! 3. `m` -> distance end-condition in meters
//! 4. `lap` -> lap-button end-condition
//! 5. `@` -> target, stroke, equipment or drill, dispatched on the tag
//!
//! Anything else is ignored. A token that fails to parse is logged and
//! skipped; only an unknown `@EQUIP` value fails the whole line.

use crate::grammar::{split_tag, to_minutes, to_seconds};
use crate::types::*;
use crate::{Error, Result};

/// Converts a min/km pace into the speed unit the workout service stores
pub const PACE_CONST: f64 = 16.66666;

/// Swim paces are written per 100 meters
const SWIM_PACE_METERS: f64 = 100.0;

/// Interpret one notation line for the given sport
pub fn interpret(line: &str, sport: SportType) -> Result<StepDetail> {
    let mut detail = StepDetail::default();

    for token in line.split(' ') {
        match apply_token(&mut detail, token, sport) {
            Ok(()) => {}
            Err(e @ Error::InvalidEquipment(_)) => return Err(e),
            Err(e) => {
                tracing::warn!("Skipping token '{}' in '{}': {}", token, line, e);
            }
        }
    }

    tracing::debug!("Interpreted '{}' as {:?}", line, detail);
    Ok(detail)
}

fn apply_token(detail: &mut StepDetail, token: &str, sport: SportType) -> Result<()> {
    if token.contains("sec") {
        let seconds = parse_count(&token.replace("sec", ""))?;
        detail.set_end_condition(ConditionType::Time, seconds);
        return Ok(());
    }

    if token.contains("min") {
        let minutes = parse_count(&token.replace("min", ""))?;
        let seconds = minutes
            .checked_mul(60)
            .ok_or_else(|| Error::Format(format!("duration '{}' is too large", token)))?;
        detail.set_end_condition(ConditionType::Time, seconds);
        return Ok(());
    }

    if token.contains('m') {
        let meters = parse_count(&token.replace('m', ""))?;
        detail.set_end_condition(ConditionType::Distance, meters);
        return Ok(());
    }

    if token.contains("lap") {
        detail.set_end_condition(ConditionType::LapButton, 1);
        return Ok(());
    }

    if token.contains('@') {
        return apply_tagged(detail, token, sport);
    }

    Ok(())
}

fn apply_tagged(detail: &mut StepDetail, token: &str, sport: SportType) -> Result<()> {
    let (Some(tag), Some(value)) = split_tag(token) else {
        tracing::debug!("Ignoring '{}': no tag parameter", token);
        return Ok(());
    };

    match tag.as_str() {
        "@p" if sport == SportType::Swimming => {
            let seconds = to_seconds(&value)?;
            if seconds == 0 {
                return Err(Error::Format(format!("swim pace '{}' must be positive", value)));
            }
            let speed = SWIM_PACE_METERS / seconds as f64;
            detail.target = Some(Target::NoTarget);
            detail.secondary_target = Some(Target::Range {
                kind: TargetType::Pace,
                low: speed,
                high: speed,
            });
        }
        "@p" => {
            let (floor, top) = split_range(&value)?;
            detail.push_target(Target::Range {
                kind: TargetType::Pace,
                low: pace_to_speed(floor)?,
                high: pace_to_speed(top)?,
            });
        }
        "@s" => {
            let speed = parse_decimal(&value)?;
            detail.push_target(Target::Range {
                kind: TargetType::Speed,
                low: speed,
                high: speed,
            });
        }
        "@c" => {
            let (low, high) = match value.split_once('-') {
                Some((low, high)) => (parse_count(low)?, parse_count(high)?),
                None => {
                    let cadence = parse_count(&value)?;
                    (cadence, cadence)
                }
            };
            detail.push_target(Target::Range {
                kind: TargetType::Cadence,
                low: low as f64,
                high: high as f64,
            });
        }
        "@h" => detail.push_target(Target::Zone {
            kind: TargetType::HeartRateZone,
            zone: parse_zone(&value)?,
        }),
        "@w" => detail.push_target(Target::Zone {
            kind: TargetType::PowerZone,
            zone: parse_zone(&value)?,
        }),
        "@style" => detail.stroke_type = Some(parse_stroke(&value)),
        "@equip" => detail.equipment_type = Some(parse_equipment(&value)?),
        "@execution" => match parse_drill(&value) {
            Some(drill) => detail.drill_type = Some(drill),
            None => tracing::warn!("Unknown EXECUTION value '{}', leaving drill unset", value),
        },
        other => tracing::debug!("Ignoring unknown tag '{}'", other),
    }

    Ok(())
}

fn parse_count(text: &str) -> Result<u32> {
    text.trim()
        .parse::<u32>()
        .map_err(|e| Error::Format(format!("invalid number '{}': {}", text, e)))
}

fn parse_decimal(text: &str) -> Result<f64> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::Format(format!("invalid decimal '{}': {}", text, e)))?;
    if !value.is_finite() {
        return Err(Error::Format(format!("decimal '{}' must be finite", text)));
    }
    Ok(value)
}

fn split_range(value: &str) -> Result<(&str, &str)> {
    value
        .split_once('-')
        .ok_or_else(|| Error::Format(format!("expected a 'low-high' range, got '{}'", value)))
}

fn pace_to_speed(pace: &str) -> Result<f64> {
    let minutes = to_minutes(pace)?;
    if minutes <= 0.0 {
        return Err(Error::Format(format!("pace '{}' must be positive", pace)));
    }
    Ok(PACE_CONST / minutes)
}

/// `z3`, `Z3` and `3` all mean zone 3; zones start at 1
fn parse_zone(value: &str) -> Result<u32> {
    let lowered = value.trim().to_lowercase();
    match parse_count(lowered.strip_prefix('z').unwrap_or(&lowered))? {
        0 => Err(Error::Format(format!("zone '{}' must be 1 or higher", value))),
        zone => Ok(zone),
    }
}

// Unknown strokes fall back to freestyle.
fn parse_stroke(value: &str) -> StrokeType {
    match value.to_lowercase().as_str() {
        "back" => StrokeType::Backstroke,
        "breast" => StrokeType::Breaststroke,
        _ => StrokeType::Freestyle,
    }
}

fn parse_equipment(value: &str) -> Result<EquipmentType> {
    match value.to_lowercase().as_str() {
        "fins" => Ok(EquipmentType::Fins),
        "pull_buoy" => Ok(EquipmentType::PullBuoy),
        "kickboard" => Ok(EquipmentType::Kickboard),
        "snorkel" => Ok(EquipmentType::Snorkel),
        other => Err(Error::InvalidEquipment(other.to_string())),
    }
}

fn parse_drill(value: &str) -> Option<DrillType> {
    match value.to_lowercase().as_str() {
        "drill" => Some(DrillType::Drill),
        "pull" => Some(DrillType::Pull),
        "kick" => Some(DrillType::Kick),
        _ => None,
    }
}
