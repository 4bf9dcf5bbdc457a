//! Remote workout service.
//!
//! [`WorkoutService`] is the seam the import/schedule logic talks to;
//! [`ConnectClient`] is the HTTP implementation.

use crate::config::ConnectConfig;
use crate::model::WorkoutModel;
use crate::plan::DATE_FORMAT;
use crate::{Error, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;

/// A workout already stored on the service
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WorkoutSummary {
    #[serde(rename = "workoutId")]
    pub id: u64,
    #[serde(rename = "workoutName")]
    pub name: String,
}

/// Operations the planner needs from the workout service
pub trait WorkoutService {
    fn list_workouts(&mut self) -> Result<Vec<WorkoutSummary>>;

    /// Upload a compiled workout, returning its new id
    fn import_workout(&mut self, workout: &WorkoutModel) -> Result<u64>;

    fn delete_workout(&mut self, id: u64) -> Result<bool>;

    fn schedule_workout(&mut self, id: u64, date: NaiveDate) -> Result<bool>;
}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    #[serde(rename = "workoutId")]
    workout_id: u64,
}

/// Blocking HTTP client for the Connect workout endpoints
pub struct ConnectClient {
    http: Client,
    base_url: String,
}

impl ConnectClient {
    pub fn new(config: &ConnectConfig) -> Result<Self> {
        let token = config.require_token()?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| Error::Config(format!("access token is not a valid header: {}", e)))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base_url, path)
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/workout-service/{}", base_url, path)
}

fn schedule_body(date: NaiveDate) -> serde_json::Value {
    serde_json::json!({ "date": date.format(DATE_FORMAT).to_string() })
}

impl WorkoutService for ConnectClient {
    fn list_workouts(&mut self) -> Result<Vec<WorkoutSummary>> {
        let response = self
            .http
            .get(self.url("workouts"))
            .query(&[("start", "1"), ("limit", "999")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Service(format!("listing workouts failed: {}", status)));
        }

        let workouts: Vec<WorkoutSummary> = response.json()?;
        tracing::debug!("Service has {} workouts", workouts.len());
        Ok(workouts)
    }

    fn import_workout(&mut self, workout: &WorkoutModel) -> Result<u64> {
        let response = self
            .http
            .post(self.url("workout"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(workout.to_json()?)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::Service(format!(
                "importing '{}' failed: {} {}",
                workout.workout_name, status, detail
            )));
        }

        let created: ImportResponse = response.json()?;
        Ok(created.workout_id)
    }

    fn delete_workout(&mut self, id: u64) -> Result<bool> {
        let response = self.http.delete(self.url(&format!("workout/{}", id))).send()?;
        Ok(response.status().is_success())
    }

    fn schedule_workout(&mut self, id: u64, date: NaiveDate) -> Result<bool> {
        let response = self
            .http
            .post(self.url(&format!("schedule/{}", id)))
            .json(&schedule_body(date))
            .send()?;
        Ok(response.status().is_success())
    }
}
