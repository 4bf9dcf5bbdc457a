//! Compiled workout document, serialized in the shape the workout service imports.

use crate::types::*;
use crate::Result;
use serde::Serialize;

/// A single executable step
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStep {
    #[serde(rename = "type")]
    pub dto_type: &'static str,
    pub step_id: u32,
    pub step_order: u32,
    pub step_type: StepType,
    pub end_condition: Option<ConditionType>,
    pub end_condition_value: Option<u32>,
    pub preferred_end_condition_unit: Option<DistanceUnit>,
    pub target_type: Option<TargetType>,
    pub target_value_one: Option<f64>,
    pub target_value_two: Option<f64>,
    pub zone_number: Option<u32>,
    pub secondary_target_type: Option<TargetType>,
    pub secondary_target_value_one: Option<f64>,
    pub secondary_target_value_two: Option<f64>,
    pub secondary_zone_number: Option<u32>,
    pub target_value_unit: Option<String>,
    pub step_audio_note: Option<String>,
    pub stroke_type: Option<StrokeType>,
    pub equipment_type: Option<EquipmentType>,
    pub drill_type: Option<DrillType>,
}

impl WorkoutStep {
    pub const DTO_TYPE: &'static str = "ExecutableStepDTO";

    /// Flatten a parsed line into a step at the given order slot
    pub fn new(order: u32, step_type: StepType, detail: StepDetail) -> Self {
        let target = detail.target;
        let secondary = detail.secondary_target;
        let (target_value_one, target_value_two) =
            target.map(|t| t.values()).unwrap_or((None, None));
        let (secondary_target_value_one, secondary_target_value_two) =
            secondary.map(|t| t.values()).unwrap_or((None, None));

        Self {
            dto_type: Self::DTO_TYPE,
            step_id: order,
            step_order: order,
            step_type,
            end_condition: detail.end_condition,
            end_condition_value: detail.end_condition_value,
            preferred_end_condition_unit: None,
            target_type: target.map(|t| t.kind()),
            target_value_one,
            target_value_two,
            zone_number: target.and_then(|t| t.zone()),
            secondary_target_type: secondary.map(|t| t.kind()),
            secondary_target_value_one,
            secondary_target_value_two,
            secondary_zone_number: secondary.and_then(|t| t.zone()),
            target_value_unit: None,
            step_audio_note: None,
            stroke_type: detail.stroke_type,
            equipment_type: detail.equipment_type,
            drill_type: detail.drill_type,
        }
    }
}

/// A repeat group; children continue the parent's order numbering
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepeatStep {
    #[serde(rename = "type")]
    pub dto_type: &'static str,
    pub step_id: u32,
    pub step_order: u32,
    pub step_type: StepType,
    pub number_of_iterations: u32,
    pub workout_steps: Vec<StepNode>,
    pub smart_repeat: bool,
    pub child_step_id: u32,
    pub skip_last_rest_step: bool,
    pub end_condition: ConditionType,
}

impl RepeatStep {
    pub const DTO_TYPE: &'static str = "RepeatGroupDTO";

    pub fn new(order: u32, number_of_iterations: u32, workout_steps: Vec<StepNode>) -> Self {
        Self {
            dto_type: Self::DTO_TYPE,
            step_id: order,
            step_order: order,
            step_type: StepType::Repeat,
            number_of_iterations,
            workout_steps,
            smart_repeat: false,
            child_step_id: 1,
            skip_last_rest_step: false,
            end_condition: ConditionType::IterationsEnd,
        }
    }
}

/// Either kind of node in the step tree
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StepNode {
    Step(WorkoutStep),
    Repeat(RepeatStep),
}

impl StepNode {
    pub fn step_order(&self) -> u32 {
        match self {
            StepNode::Step(step) => step.step_order,
            StepNode::Repeat(group) => group.step_order,
        }
    }

    /// Number of nodes in this subtree, the node itself included
    pub fn count(&self) -> usize {
        match self {
            StepNode::Step(_) => 1,
            StepNode::Repeat(group) => {
                1 + group.workout_steps.iter().map(StepNode::count).sum::<usize>()
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSegment {
    pub segment_order: u32,
    pub sport_type: SportType,
    pub workout_steps: Vec<StepNode>,
}

/// The terminal artifact handed to the workout service
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutModel {
    pub workout_name: String,
    pub sport_type: SportType,
    pub sub_sport_type: Option<String>,
    pub workout_segments: Vec<WorkoutSegment>,
    // Estimates are not computed yet; the service fills them in.
    pub avg_training_speed: Option<f64>,
    pub estimated_distance_unit: Option<DistanceUnit>,
    pub estimated_duration_in_secs: Option<u32>,
    pub estimated_distance_in_meters: Option<f64>,
    pub estimate_type: Option<String>,
}

impl WorkoutModel {
    /// Wrap a compiled step list into a single-segment workout
    pub fn single_segment(name: &str, sport_type: SportType, steps: Vec<StepNode>) -> Self {
        Self {
            workout_name: name.to_string(),
            sport_type,
            sub_sport_type: None,
            workout_segments: vec![WorkoutSegment {
                segment_order: 1,
                sport_type,
                workout_steps: steps,
            }],
            avg_training_speed: None,
            estimated_distance_unit: None,
            estimated_duration_in_secs: None,
            estimated_distance_in_meters: None,
            estimate_type: None,
        }
    }

    /// Total steps and repeat groups across every segment and depth
    pub fn step_count(&self) -> usize {
        self.workout_segments
            .iter()
            .flat_map(|segment| segment.workout_steps.iter())
            .map(StepNode::count)
            .sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
