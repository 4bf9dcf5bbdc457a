//! Pushing a training plan to the workout service.
//!
//! Import compiles each workout and uploads it, optionally replacing
//! workouts of the same name first. Scheduling maps plan names to the
//! service's workout ids and books them day by day.

use crate::client::{WorkoutService, WorkoutSummary};
use crate::plan::{SchedulePlan, TrainingPlan};
use crate::Result;
use std::collections::HashMap;

/// Outcome of a scheduling run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    pub scheduled: usize,
    pub missing: Vec<String>,
    pub failed: usize,
}

/// Compile and upload every workout in the plan
///
/// Returns `(name, id)` for each imported workout in declaration order. A
/// workout that fails to compile aborts the run before anything else is sent.
pub fn import_workouts(
    plan: &TrainingPlan,
    delete_previous: bool,
    service: &mut dyn WorkoutService,
) -> Result<Vec<(String, u64)>> {
    let models = plan.compile_all()?;

    let existing: Vec<WorkoutSummary> = if delete_previous {
        service.list_workouts()?
    } else {
        Vec::new()
    };

    let mut imported = Vec::with_capacity(models.len());
    for model in models {
        if delete_previous {
            for old in existing.iter().filter(|w| w.name == model.workout_name) {
                if service.delete_workout(old.id)? {
                    tracing::info!("Deleted previous workout '{}' ({})", old.name, old.id);
                } else {
                    tracing::warn!("Could not delete previous workout '{}' ({})", old.name, old.id);
                }
            }
        }

        let id = service.import_workout(&model)?;
        tracing::info!("Imported workout '{}' as {}", model.workout_name, id);
        imported.push((model.workout_name, id));
    }

    Ok(imported)
}

/// Book every scheduled workout on its day
///
/// Names that are not on the service are skipped with a warning.
pub fn schedule_workouts(
    schedule: &SchedulePlan,
    service: &mut dyn WorkoutService,
) -> Result<ScheduleReport> {
    let ids: HashMap<String, u64> = service
        .list_workouts()?
        .into_iter()
        .map(|w| (w.name, w.id))
        .collect();
    tracing::debug!("Workouts on service: {:?}", ids);

    let mut report = ScheduleReport::default();
    for day in &schedule.days {
        for name in &day.workouts {
            let Some(&id) = ids.get(name) else {
                tracing::warn!("Workout '{}' not found on the service, skipping", name);
                report.missing.push(name.clone());
                continue;
            };

            if service.schedule_workout(id, day.date)? {
                tracing::info!("Scheduled workout '{}' on {}", name, day.date);
                report.scheduled += 1;
            } else {
                tracing::error!("Failed to schedule workout '{}' on {}", name, day.date);
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
