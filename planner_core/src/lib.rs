#![forbid(unsafe_code)]

//! Core library for the Garmin workout planner.
//!
//! This crate provides:
//! - Step notation grammar and interpreter (`10min @P(4:30-4:50)`)
//! - Workout tree compiler (repeat groups, step ordering)
//! - Workout document model in the service's JSON shape
//! - YAML training plan loading with `$name` definitions
//! - Workout service client and import/schedule orchestration

pub mod types;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod compiler;
pub mod model;
pub mod plan;
pub mod config;
pub mod logging;
pub mod client;
pub mod sync;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use compiler::{build_workout_model, build_workout_model_for, compile, StepBody, StepEntry};
pub use interpreter::interpret;
pub use model::{RepeatStep, StepNode, WorkoutModel, WorkoutSegment, WorkoutStep};
pub use plan::{PlannedWorkout, ScheduleDay, SchedulePlan, TrainingPlan};
pub use config::Config;
pub use client::{ConnectClient, WorkoutService, WorkoutSummary};
pub use sync::{import_workouts, schedule_workouts, ScheduleReport};
