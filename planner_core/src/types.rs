//! Core domain types for the workout planner.
//!
//! The workout service expects every enumerated value as its full attribute
//! map (`{"stepTypeId": 1, "stepTypeKey": "warmup", "displayOrder": 1}`),
//! so each enum here carries its id/key/display order as const accessors and
//! serializes itself into that shape.

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Implements `Serialize` as `{<id_field>: id, <key_field>: key, displayOrder: n}`
macro_rules! serialize_as_attributes {
    ($ty:ident, $name:literal, $id_field:literal, $key_field:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut s = serializer.serialize_struct($name, 3)?;
                s.serialize_field($id_field, &self.id())?;
                s.serialize_field($key_field, self.key())?;
                s.serialize_field("displayOrder", &self.display_order())?;
                s.end()
            }
        }
    };
}

// ============================================================================
// Sport and Step Types
// ============================================================================

/// Sport of a workout (and of its single segment)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SportType {
    #[default]
    Running,
    Cycling,
    Swimming,
}

impl SportType {
    pub const fn id(self) -> u32 {
        match self {
            SportType::Running => 1,
            SportType::Cycling => 2,
            SportType::Swimming => 4,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            SportType::Running => "running",
            SportType::Cycling => "cycling",
            SportType::Swimming => "swimming",
        }
    }

    pub const fn display_order(self) -> u32 {
        match self {
            SportType::Running => 1,
            SportType::Cycling => 2,
            SportType::Swimming => 3,
        }
    }

    /// Parse a sport name as written in a plan document
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "running" | "run" => Some(SportType::Running),
            "cycling" | "bike" | "ride" => Some(SportType::Cycling),
            "swimming" | "swim" => Some(SportType::Swimming),
            _ => None,
        }
    }
}

serialize_as_attributes!(SportType, "SportType", "sportTypeId", "sportTypeKey");

/// Kind of a workout step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepType {
    Warmup,
    Cooldown,
    Interval,
    Recovery,
    Repeat,
}

impl StepType {
    pub const fn id(self) -> u32 {
        match self {
            StepType::Warmup => 1,
            StepType::Cooldown => 2,
            StepType::Interval => 3,
            StepType::Recovery => 4,
            StepType::Repeat => 6,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            StepType::Warmup => "warmup",
            StepType::Cooldown => "cooldown",
            StepType::Interval => "interval",
            StepType::Recovery => "recovery",
            StepType::Repeat => "repeat",
        }
    }

    pub const fn display_order(self) -> u32 {
        self.id()
    }
}

serialize_as_attributes!(StepType, "StepType", "stepTypeId", "stepTypeKey");

// ============================================================================
// End Conditions and Targets
// ============================================================================

/// What terminates a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionType {
    LapButton,
    Time,
    Distance,
    IterationsEnd,
}

impl ConditionType {
    pub const fn id(self) -> u32 {
        match self {
            ConditionType::LapButton => 1,
            ConditionType::Time => 2,
            ConditionType::Distance => 3,
            ConditionType::IterationsEnd => 7,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            ConditionType::LapButton => "lap.button",
            ConditionType::Time => "time",
            ConditionType::Distance => "distance",
            ConditionType::IterationsEnd => "iterations",
        }
    }

    pub const fn display_order(self) -> u32 {
        self.id()
    }

    pub const fn displayable(self) -> bool {
        !matches!(self, ConditionType::IterationsEnd)
    }
}

impl Serialize for ConditionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ConditionType", 4)?;
        s.serialize_field("conditionTypeId", &self.id())?;
        s.serialize_field("conditionTypeKey", self.key())?;
        s.serialize_field("displayOrder", &self.display_order())?;
        s.serialize_field("displayable", &self.displayable())?;
        s.end()
    }
}

/// Intensity guidance attached to a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetType {
    NoTarget,
    PowerZone,
    Cadence,
    HeartRateZone,
    Speed,
    Pace,
}

impl TargetType {
    pub const fn id(self) -> u32 {
        match self {
            TargetType::NoTarget => 1,
            TargetType::PowerZone => 2,
            TargetType::Cadence => 3,
            TargetType::HeartRateZone => 4,
            TargetType::Speed => 5,
            TargetType::Pace => 6,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            TargetType::NoTarget => "no.target",
            TargetType::PowerZone => "power.zone",
            TargetType::Cadence => "cadence",
            TargetType::HeartRateZone => "heart.rate.zone",
            TargetType::Speed => "speed.zone",
            TargetType::Pace => "pace.zone",
        }
    }

    pub const fn display_order(self) -> u32 {
        self.id()
    }
}

serialize_as_attributes!(
    TargetType,
    "TargetType",
    "workoutTargetTypeId",
    "workoutTargetTypeKey"
);

// ============================================================================
// Swim Types
// ============================================================================

/// Swim stroke
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeType {
    Freestyle,
    Backstroke,
    Breaststroke,
}

impl StrokeType {
    pub const fn id(self) -> u32 {
        match self {
            StrokeType::Freestyle => 6,
            StrokeType::Backstroke => 2,
            StrokeType::Breaststroke => 3,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            StrokeType::Freestyle => "free",
            StrokeType::Backstroke => "backstroke",
            StrokeType::Breaststroke => "breaststroke",
        }
    }

    pub const fn display_order(self) -> u32 {
        self.id()
    }
}

serialize_as_attributes!(StrokeType, "StrokeType", "strokeTypeId", "strokeTypeKey");

/// Swim equipment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EquipmentType {
    Fins,
    Kickboard,
    PullBuoy,
    Snorkel,
}

impl EquipmentType {
    pub const fn id(self) -> u32 {
        match self {
            EquipmentType::Fins => 1,
            EquipmentType::Kickboard => 2,
            EquipmentType::PullBuoy => 4,
            EquipmentType::Snorkel => 5,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            EquipmentType::Fins => "fins",
            EquipmentType::Kickboard => "kickboard",
            EquipmentType::PullBuoy => "pull_buoy",
            EquipmentType::Snorkel => "snorkel",
        }
    }

    pub const fn display_order(self) -> u32 {
        self.id()
    }
}

serialize_as_attributes!(
    EquipmentType,
    "EquipmentType",
    "swimEquipmentId",
    "swimEquipmentKey"
);

/// Swim drill execution
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillType {
    Kick,
    Pull,
    Drill,
}

impl DrillType {
    pub const fn id(self) -> u32 {
        match self {
            DrillType::Kick => 1,
            DrillType::Pull => 2,
            DrillType::Drill => 3,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            DrillType::Kick => "kick",
            DrillType::Pull => "pull",
            DrillType::Drill => "drill",
        }
    }

    pub const fn display_order(self) -> u32 {
        self.id()
    }
}

serialize_as_attributes!(DrillType, "DrillType", "drillTypeId", "drillTypeKey");

/// Unit for distance estimates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceUnit {
    Kilometer,
    Mile,
}

impl DistanceUnit {
    pub const fn key(self) -> &'static str {
        match self {
            DistanceUnit::Kilometer => "kilometer",
            DistanceUnit::Mile => "mile",
        }
    }
}

impl Serialize for DistanceUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DistanceUnit", 1)?;
        s.serialize_field("unitKey", self.key())?;
        s.end()
    }
}

// ============================================================================
// Step Detail
// ============================================================================

/// One intensity target: either a value range or a zone number, never both
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    /// Target without any value (swim pace steps force this into the primary slot)
    NoTarget,
    Range { kind: TargetType, low: f64, high: f64 },
    Zone { kind: TargetType, zone: u32 },
}

impl Target {
    pub fn kind(&self) -> TargetType {
        match self {
            Target::NoTarget => TargetType::NoTarget,
            Target::Range { kind, .. } | Target::Zone { kind, .. } => *kind,
        }
    }

    pub fn values(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Target::Range { low, high, .. } => (Some(*low), Some(*high)),
            _ => (None, None),
        }
    }

    pub fn zone(&self) -> Option<u32> {
        match self {
            Target::Zone { zone, .. } => Some(*zone),
            _ => None,
        }
    }
}

/// Everything one notation line says about a step
///
/// Built token by token; a later end-condition replaces an earlier one and a
/// target goes to the secondary slot once the primary slot is taken.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepDetail {
    pub end_condition: Option<ConditionType>,
    pub end_condition_value: Option<u32>,
    pub target: Option<Target>,
    pub secondary_target: Option<Target>,
    pub stroke_type: Option<StrokeType>,
    pub equipment_type: Option<EquipmentType>,
    pub drill_type: Option<DrillType>,
}

impl StepDetail {
    pub fn set_end_condition(&mut self, condition: ConditionType, value: u32) {
        self.end_condition = Some(condition);
        self.end_condition_value = Some(value);
    }

    /// Place a target in the first free slot, overwriting the secondary when both are taken
    pub fn push_target(&mut self, target: Target) {
        if self.target.is_none() {
            self.target = Some(target);
        } else {
            self.secondary_target = Some(target);
        }
    }
}
