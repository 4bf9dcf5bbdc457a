//! Training plan documents.
//!
//! A plan is a YAML file with `settings`, `definitions`, `workouts` and
//! `schedulePlan` sections:
//!
//! ```yaml
//! settings:
//!   deleteSameNameWorkout: true
//! definitions:
//!   easy: "@H(z2)"
//! workouts:
//!   intervals:
//!     - warmup: 10min $easy
//!     - repeat(4):
//!       - run: 1000m @P(4:30-4:50)
//!       - recovery: 2min $easy
//!     - cooldown: 5min
//!   pool:
//!     sport: swimming
//!     steps:
//!       - warmup: 200m @STYLE(free)
//! schedulePlan:
//!   start_from: 2024-10-07
//!   workouts:
//!     - intervals
//!     - pool, intervals
//! ```

use crate::compiler::{build_workout_model_for, StepEntry};
use crate::model::WorkoutModel;
use crate::types::SportType;
use crate::{Error, Result};
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::Path;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\w+)").expect("variable pattern is a valid regex"));

/// Plan file layout after `$name` substitution
#[derive(Debug, Default, Deserialize)]
struct PlanFile {
    #[serde(default)]
    settings: SettingsFile,
    #[serde(default)]
    workouts: Mapping,
    #[serde(default, rename = "schedulePlan")]
    schedule_plan: Option<ScheduleFile>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default, rename = "deleteSameNameWorkout")]
    delete_same_name_workout: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ScheduleFile {
    start_from: String,
    #[serde(default)]
    workouts: Vec<Value>,
}

/// Plan-level settings; unset fields defer to the application config
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanSettings {
    pub delete_same_name_workout: Option<bool>,
}

/// One named workout from the plan
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedWorkout {
    pub name: String,
    pub sport: SportType,
    pub steps: Vec<StepEntry>,
}

impl PlannedWorkout {
    pub fn compile(&self) -> Result<WorkoutModel> {
        build_workout_model_for(&self.name, &self.steps, self.sport)
    }
}

/// Workouts to put on one calendar day
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub workouts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SchedulePlan {
    pub start_from: NaiveDate,
    pub days: Vec<ScheduleDay>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingPlan {
    pub settings: PlanSettings,
    pub workouts: Vec<PlannedWorkout>,
    pub schedule: Option<SchedulePlan>,
}

impl TrainingPlan {
    /// Load and parse a plan file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let plan = Self::from_yaml_str(&contents)?;
        tracing::info!(
            "Loaded plan {:?} with {} workouts",
            path,
            plan.workouts.len()
        );
        Ok(plan)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let mut document: Value = serde_yaml::from_str(text)?;
        match &document {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(_) => {}
            _ => return Err(Error::Format("plan must be a mapping at the top level".into())),
        }

        let definitions = read_definitions(&document)?;
        if !definitions.is_empty() {
            substitute(&mut document, &definitions);
        }

        let file: PlanFile = serde_yaml::from_value(document)?;

        let mut workouts = Vec::with_capacity(file.workouts.len());
        for (key, value) in &file.workouts {
            let name = scalar_text(key)
                .ok_or_else(|| Error::Format(format!("workout name {:?} is not text", key)))?;
            let workout = read_workout(&name, value).map_err(|e| e.in_workout(&name))?;
            workouts.push(workout);
        }

        let schedule = file.schedule_plan.map(read_schedule).transpose()?;

        Ok(Self {
            settings: PlanSettings {
                delete_same_name_workout: file.settings.delete_same_name_workout,
            },
            workouts,
            schedule,
        })
    }

    pub fn find_workout(&self, name: &str) -> Option<&PlannedWorkout> {
        self.workouts.iter().find(|w| w.name == name)
    }

    /// Compile every workout in declaration order, stopping at the first failure
    pub fn compile_all(&self) -> Result<Vec<WorkoutModel>> {
        self.workouts.iter().map(PlannedWorkout::compile).collect()
    }
}

fn read_definitions(document: &Value) -> Result<HashMap<String, String>> {
    let Some(section) = document.get("definitions") else {
        return Ok(HashMap::new());
    };
    let Value::Mapping(entries) = section else {
        return Err(Error::Format("definitions must be a mapping".into()));
    };

    let mut definitions = HashMap::with_capacity(entries.len());
    for (key, value) in entries {
        match (scalar_text(key), scalar_text(value)) {
            (Some(name), Some(text)) => {
                definitions.insert(name, text);
            }
            _ => tracing::warn!("Ignoring definition {:?}: not a scalar", key),
        }
    }
    Ok(definitions)
}

/// Replace `$name` in every string value; unknown names stay as written
fn substitute(value: &mut Value, definitions: &HashMap<String, String>) {
    match value {
        Value::String(text) => {
            let replaced = VARIABLE_PATTERN
                .replace_all(text.as_str(), |caps: &Captures| {
                    definitions
                        .get(&caps[1])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned();
            *text = replaced;
        }
        Value::Sequence(items) => {
            for item in items {
                substitute(item, definitions);
            }
        }
        Value::Mapping(entries) => {
            for (_, item) in entries.iter_mut() {
                substitute(item, definitions);
            }
        }
        Value::Tagged(tagged) => substitute(&mut tagged.value, definitions),
        _ => {}
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read_workout(name: &str, value: &Value) -> Result<PlannedWorkout> {
    let (sport, steps) = match value {
        Value::Sequence(_) => (SportType::Running, value),
        Value::Mapping(fields) => {
            let sport = match fields.get("sport") {
                None => SportType::Running,
                Some(sport) => scalar_text(sport)
                    .as_deref()
                    .and_then(SportType::parse)
                    .ok_or_else(|| Error::Format(format!("unknown sport {:?}", sport)))?,
            };
            let steps = fields
                .get("steps")
                .ok_or_else(|| Error::Format("workout mapping needs a 'steps' list".into()))?;
            (sport, steps)
        }
        _ => {
            return Err(Error::Format(
                "workout must be a list of steps or a mapping with 'steps'".into(),
            ))
        }
    };

    Ok(PlannedWorkout {
        name: name.to_string(),
        sport,
        steps: read_steps(steps)?,
    })
}

/// A step list is a sequence of single-key mappings; extra keys become further entries
fn read_steps(value: &Value) -> Result<Vec<StepEntry>> {
    let Value::Sequence(items) = value else {
        return Err(Error::Format(format!("expected a list of steps, got {:?}", value)));
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Value::Mapping(fields) = item else {
            return Err(Error::Format(format!(
                "step {:?} must be written as 'kind: notation'",
                item
            )));
        };
        for (key, body) in fields {
            let key = scalar_text(key)
                .ok_or_else(|| Error::Format(format!("step name {:?} is not text", key)))?;
            let entry = match body {
                Value::Sequence(_) => StepEntry::nested(key, read_steps(body)?),
                Value::Null => StepEntry::line(key, ""),
                other => match scalar_text(other) {
                    Some(line) => StepEntry::line(key, line),
                    None => {
                        return Err(Error::Format(format!(
                            "step '{}' must be a notation line or a list of steps",
                            key
                        )))
                    }
                },
            };
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn read_schedule(file: ScheduleFile) -> Result<SchedulePlan> {
    let start_from = NaiveDate::parse_from_str(file.start_from.trim(), DATE_FORMAT).map_err(|e| {
        Error::Format(format!(
            "invalid start_from '{}' ({}), expected e.g. 2024-10-06",
            file.start_from, e
        ))
    })?;

    let mut days = Vec::with_capacity(file.workouts.len());
    for (offset, entry) in file.workouts.iter().enumerate() {
        let date = start_from
            .checked_add_days(Days::new(offset as u64))
            .ok_or_else(|| Error::Format("schedule runs past the supported date range".into()))?;

        // A bad entry still uses up its day
        let Value::String(names) = entry else {
            tracing::error!("Invalid schedule entry {:?} for {}, skipping", entry, date);
            continue;
        };

        let workouts = names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        days.push(ScheduleDay { date, workouts });
    }

    Ok(SchedulePlan { start_from, days })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StepBody;
    use crate::model::StepNode;
    use crate::types::TargetType;

    const PLAN: &str = r#"
settings:
  deleteSameNameWorkout: true
definitions:
  easy: "@H(z2)"
  threshold: "@P(4:10-4:20)"
workouts:
  intervals:
    - warmup: 10min $easy
    - repeat(3):
      - run: 1000m $threshold
      - recovery: 2min $easy
    - cooldown: 5min $unknown
  pool:
    sport: swimming
    steps:
      - warmup: 200m @P(1:50) @EQUIP(fins)
schedulePlan:
  start_from: 2024-10-07
  workouts:
    - intervals
    - pool, intervals
    - 42
    - pool
"#;

    #[test]
    fn test_parse_plan_sections() {
        let plan = TrainingPlan::from_yaml_str(PLAN).unwrap();

        assert_eq!(plan.settings.delete_same_name_workout, Some(true));
        assert_eq!(plan.workouts.len(), 2);
        assert_eq!(plan.workouts[0].name, "intervals");
        assert_eq!(plan.workouts[0].sport, SportType::Running);
        assert_eq!(plan.workouts[1].name, "pool");
        assert_eq!(plan.workouts[1].sport, SportType::Swimming);
    }

    #[test]
    fn test_definitions_are_substituted() {
        let plan = TrainingPlan::from_yaml_str(PLAN).unwrap();
        let steps = &plan.workouts[0].steps;

        assert_eq!(steps[0], StepEntry::line("warmup", "10min @H(z2)"));
        match &steps[1].body {
            StepBody::Nested(children) => {
                assert_eq!(children[0], StepEntry::line("run", "1000m @P(4:10-4:20)"));
            }
            other => panic!("expected nested steps, got {:?}", other),
        }
        assert_eq!(steps[2], StepEntry::line("cooldown", "5min $unknown"));
    }

    #[test]
    fn test_schedule_days_advance_past_bad_entries() {
        let plan = TrainingPlan::from_yaml_str(PLAN).unwrap();
        let schedule = plan.schedule.unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2024, 10, d).unwrap();

        assert_eq!(schedule.start_from, day(7));
        assert_eq!(schedule.days.len(), 3);
        assert_eq!(schedule.days[0].date, day(7));
        assert_eq!(schedule.days[0].workouts, vec!["intervals"]);
        assert_eq!(schedule.days[1].date, day(8));
        assert_eq!(schedule.days[1].workouts, vec!["pool", "intervals"]);
        assert_eq!(schedule.days[2].date, day(10));
        assert_eq!(schedule.days[2].workouts, vec!["pool"]);
    }

    #[test]
    fn test_compile_all() {
        let plan = TrainingPlan::from_yaml_str(PLAN).unwrap();
        let models = plan.compile_all().unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].step_count(), 5);

        let pool = &models[1];
        assert_eq!(pool.sport_type, SportType::Swimming);
        match &pool.workout_segments[0].workout_steps[0] {
            StepNode::Step(step) => {
                assert_eq!(step.target_type, Some(TargetType::NoTarget));
                assert_eq!(step.secondary_target_type, Some(TargetType::Pace));
            }
            other => panic!("expected a step, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_document() {
        let plan = TrainingPlan::from_yaml_str("").unwrap();
        assert!(plan.workouts.is_empty());
        assert!(plan.schedule.is_none());
        assert_eq!(plan.settings.delete_same_name_workout, None);
    }

    #[test]
    fn test_invalid_start_date() {
        let text = "schedulePlan:\n  start_from: 07/10/2024\n  workouts: [a]\n";
        assert!(matches!(
            TrainingPlan::from_yaml_str(text),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_bad_step_shape_names_workout() {
        let text = "workouts:\n  broken:\n    - warmup\n";
        match TrainingPlan::from_yaml_str(text) {
            Err(Error::Workout { name, .. }) => assert_eq!(name, "broken"),
            other => panic!("expected Workout error, got {:?}", other),
        }
    }

    #[test]
    fn test_multi_key_step_mapping_keeps_order() {
        let text = "workouts:\n  w:\n    - warmup: 5min\n      cooldown: 3min\n";
        let plan = TrainingPlan::from_yaml_str(text).unwrap();
        let keys: Vec<_> = plan.workouts[0].steps.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["warmup", "cooldown"]);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("plan.yaml");
        std::fs::write(&path, PLAN).unwrap();

        let plan = TrainingPlan::load(&path).unwrap();
        assert!(plan.find_workout("pool").is_some());
        assert!(plan.find_workout("missing").is_none());
    }
}
