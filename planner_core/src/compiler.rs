//! Workout tree compiler.
//!
//! Walks a named step list depth-first in declaration order and numbers every
//! step and repeat group from one shared counter, so children of a repeat
//! continue from the group's own order value.

use crate::grammar::split_tag;
use crate::interpreter::interpret;
use crate::model::{RepeatStep, StepNode, WorkoutModel, WorkoutStep};
use crate::types::{SportType, StepType};
use crate::{Error, Result};

/// One entry of a step list: `warmup: "10min @H(z2)"` or `repeat(4): [...]`
#[derive(Clone, Debug, PartialEq)]
pub struct StepEntry {
    pub key: String,
    pub body: StepBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StepBody {
    Line(String),
    Nested(Vec<StepEntry>),
}

impl StepEntry {
    pub fn line(key: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            body: StepBody::Line(line.into()),
        }
    }

    pub fn nested(key: impl Into<String>, steps: Vec<StepEntry>) -> Self {
        Self {
            key: key.into(),
            body: StepBody::Nested(steps),
        }
    }
}

/// Compile a step list, advancing `counter` once per emitted step or group
///
/// Unknown keys are logged and dropped. A repeat with a missing or
/// non-numeric count, or an unknown `@EQUIP` value, fails the whole list.
pub fn compile(
    entries: &[StepEntry],
    sport: SportType,
    counter: &mut u32,
) -> Result<Vec<StepNode>> {
    let mut nodes = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(node) = compile_entry(entry, sport, counter)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn compile_entry(
    entry: &StepEntry,
    sport: SportType,
    counter: &mut u32,
) -> Result<Option<StepNode>> {
    let (tag, parameter) = split_tag(&entry.key);

    let step_type = match tag.as_deref() {
        // `run` shares the warmup step type
        Some("warmup") | Some("run") => StepType::Warmup,
        Some("cooldown") => StepType::Cooldown,
        Some("recovery") => StepType::Recovery,
        Some("repeat") => {
            return compile_repeat(entry, parameter.as_deref(), sport, counter).map(Some);
        }
        _ => {
            tracing::error!("Unknown step '{}', leaving it out", entry.key);
            return Ok(None);
        }
    };

    let line = match &entry.body {
        StepBody::Line(line) => line,
        StepBody::Nested(_) => {
            tracing::error!(
                "Step '{}' has nested steps but is not a repeat, leaving it out",
                entry.key
            );
            return Ok(None);
        }
    };

    let detail = interpret(line, sport)?;
    *counter += 1;
    Ok(Some(StepNode::Step(WorkoutStep::new(*counter, step_type, detail))))
}

fn compile_repeat(
    entry: &StepEntry,
    parameter: Option<&str>,
    sport: SportType,
    counter: &mut u32,
) -> Result<StepNode> {
    let iterations = parse_iterations(&entry.key, parameter)?;

    let StepBody::Nested(children) = &entry.body else {
        return Err(Error::Format(format!("'{}' must contain a list of steps", entry.key)));
    };

    *counter += 1;
    let order = *counter;
    let steps = compile(children, sport, counter)?;
    Ok(StepNode::Repeat(RepeatStep::new(order, iterations, steps)))
}

fn parse_iterations(key: &str, parameter: Option<&str>) -> Result<u32> {
    let count = parameter
        .map(str::trim)
        .and_then(|p| p.parse::<u32>().ok())
        .ok_or_else(|| {
            Error::Format(format!(
                "'{}' needs a numeric iteration count like repeat(4)",
                key
            ))
        })?;

    if count == 0 {
        return Err(Error::Format(format!(
            "'{}' must repeat at least once",
            key
        )));
    }
    Ok(count)
}

/// Compile a running workout into its document
pub fn build_workout_model(name: &str, entries: &[StepEntry]) -> Result<WorkoutModel> {
    build_workout_model_for(name, entries, SportType::Running)
}

/// Compile a workout for an explicit sport
///
/// Each call starts its own counter, so workouts never share order numbers.
pub fn build_workout_model_for(
    name: &str,
    entries: &[StepEntry],
    sport: SportType,
) -> Result<WorkoutModel> {
    let mut counter = 0;
    let steps = compile(entries, sport, &mut counter).map_err(|e| e.in_workout(name))?;
    tracing::debug!("Compiled workout '{}' with {} steps", name, counter);
    Ok(WorkoutModel::single_segment(name, sport, steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConditionType, TargetType};

    fn as_step(node: &StepNode) -> &WorkoutStep {
        match node {
            StepNode::Step(step) => step,
            StepNode::Repeat(_) => panic!("expected a step, got a repeat group"),
        }
    }

    fn as_repeat(node: &StepNode) -> &RepeatStep {
        match node {
            StepNode::Repeat(group) => group,
            StepNode::Step(_) => panic!("expected a repeat group, got a step"),
        }
    }

    #[test]
    fn test_siblings_numbered_in_declaration_order() {
        let entries = vec![
            StepEntry::line("warmup", "10min"),
            StepEntry::line("cooldown", "5min"),
        ];
        let mut counter = 0;
        let nodes = compile(&entries, SportType::Running, &mut counter).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(as_step(&nodes[0]).step_order, 1);
        assert_eq!(as_step(&nodes[0]).step_type, StepType::Warmup);
        assert_eq!(as_step(&nodes[1]).step_order, 2);
        assert_eq!(as_step(&nodes[1]).step_type, StepType::Cooldown);
        assert_eq!(counter, 2);
    }

    #[test]
    fn test_repeat_children_continue_parent_order() {
        let entries = vec![
            StepEntry::line("warmup", "10min"),
            StepEntry::nested(
                "repeat(4)",
                vec![
                    StepEntry::line("run", "1000m @P(4:30-4:50)"),
                    StepEntry::line("recovery", "2min"),
                ],
            ),
            StepEntry::line("cooldown", "5min"),
        ];
        let mut counter = 0;
        let nodes = compile(&entries, SportType::Running, &mut counter).unwrap();

        let group = as_repeat(&nodes[1]);
        assert_eq!(group.number_of_iterations, 4);
        assert_eq!(group.step_order, 2);
        assert_eq!(group.step_id, 2);
        assert_eq!(group.workout_steps.len(), 2);
        assert_eq!(group.workout_steps[0].step_order(), 3);
        assert_eq!(group.workout_steps[1].step_order(), 4);
        assert_eq!(nodes[2].step_order(), 5);
    }

    #[test]
    fn test_nested_repeats_share_counter() {
        let entries = vec![StepEntry::nested(
            "repeat(2)",
            vec![
                StepEntry::nested("repeat(3)", vec![StepEntry::line("run", "200m")]),
                StepEntry::line("recovery", "lap"),
            ],
        )];
        let mut counter = 0;
        let nodes = compile(&entries, SportType::Running, &mut counter).unwrap();

        let outer = as_repeat(&nodes[0]);
        let inner = as_repeat(&outer.workout_steps[0]);
        assert_eq!(outer.step_order, 1);
        assert_eq!(inner.step_order, 2);
        assert_eq!(inner.number_of_iterations, 3);
        assert_eq!(inner.workout_steps[0].step_order(), 3);
        assert_eq!(outer.workout_steps[1].step_order(), 4);
        assert_eq!(counter, 4);
    }

    #[test]
    fn test_repeat_without_count_fails() {
        for key in ["repeat()", "repeat(abc)", "repeat", "repeat(0)"] {
            let entries = vec![StepEntry::nested(key, vec![StepEntry::line("run", "1min")])];
            let mut counter = 0;
            let result = compile(&entries, SportType::Running, &mut counter);
            assert!(matches!(result, Err(Error::Format(_))), "{} should fail", key);
        }
    }

    #[test]
    fn test_repeat_with_line_body_fails() {
        let entries = vec![StepEntry::line("repeat(3)", "1min")];
        let mut counter = 0;
        let result = compile(&entries, SportType::Running, &mut counter);
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_unknown_step_is_dropped() {
        let entries = vec![
            StepEntry::line("stretch", "5min"),
            StepEntry::line("warmup", "10min"),
        ];
        let mut counter = 0;
        let nodes = compile(&entries, SportType::Running, &mut counter).unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].step_order(), 1);
    }

    #[test]
    fn test_key_is_case_insensitive() {
        let entries = vec![StepEntry::line("Recovery", "90sec")];
        let mut counter = 0;
        let nodes = compile(&entries, SportType::Running, &mut counter).unwrap();

        let step = as_step(&nodes[0]);
        assert_eq!(step.step_type, StepType::Recovery);
        assert_eq!(step.end_condition, Some(ConditionType::Time));
        assert_eq!(step.end_condition_value, Some(90));
    }

    #[test]
    fn test_build_model_wraps_single_running_segment() {
        let entries = vec![
            StepEntry::line("warmup", "10min @H(z2)"),
            StepEntry::nested(
                "repeat(4)",
                vec![
                    StepEntry::line("run", "400m @P(4:00-4:10) @C(170-180)"),
                    StepEntry::line("recovery", "lap"),
                ],
            ),
        ];
        let model = build_workout_model("Intervals", &entries).unwrap();

        assert_eq!(model.workout_name, "Intervals");
        assert_eq!(model.sport_type, SportType::Running);
        assert_eq!(model.workout_segments.len(), 1);
        assert_eq!(model.workout_segments[0].segment_order, 1);
        assert_eq!(model.step_count(), 4);

        let group = as_repeat(&model.workout_segments[0].workout_steps[1]);
        let run = as_step(&group.workout_steps[0]);
        assert_eq!(run.target_type, Some(TargetType::Pace));
        assert_eq!(run.secondary_target_type, Some(TargetType::Cadence));
        assert_eq!(run.secondary_target_value_one, Some(170.0));
    }

    #[test]
    fn test_build_model_names_failing_workout() {
        let entries = vec![StepEntry::nested("repeat(x)", vec![])];
        match build_workout_model("Broken", &entries) {
            Err(Error::Workout { name, source }) => {
                assert_eq!(name, "Broken");
                assert!(matches!(*source, Error::Format(_)));
            }
            other => panic!("expected Workout error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_equipment_fails_workout() {
        let entries = vec![StepEntry::line("warmup", "100m @EQUIP(towel)")];
        let result = build_workout_model_for("Swim", &entries, SportType::Swimming);
        match result {
            Err(Error::Workout { source, .. }) => {
                assert!(matches!(*source, Error::InvalidEquipment(_)))
            }
            other => panic!("expected Workout error, got {:?}", other),
        }
    }

    #[test]
    fn test_each_workout_starts_numbering_at_one() {
        let entries = vec![StepEntry::line("warmup", "10min")];
        let first = build_workout_model("a", &entries).unwrap();
        let second = build_workout_model("b", &entries).unwrap();
        assert_eq!(first.workout_segments[0].workout_steps[0].step_order(), 1);
        assert_eq!(second.workout_segments[0].workout_steps[0].step_order(), 1);
    }
}
