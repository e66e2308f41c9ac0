use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Half-hour slots in a day.
pub const INTERVALS_PER_DAY: usize = 48;
pub const INTERVAL_MINUTES: u32 = 30;
pub const HOURS_PER_DAY: usize = 24;

// Default thermal rates sent with every request.
pub const HEAT_UP_RATE: f64 = 0.5535;
pub const COOL_DOWN_RATE: f64 = 1.9335;

/// Body of `POST /generate_schedule`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub home_size: u32,
    pub home_temperature: f64,
    pub location: u8,
    pub time_away: String,
    pub time_home: String,
    pub savings_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_schedule: Option<TemperatureSchedule>,
    pub heat_up_rate: f64,
    pub cool_down_rate: f64,
}

/// Comfort bounds for each of the 48 intervals of a day.
///
/// Both arrays always hold exactly [`INTERVALS_PER_DAY`] entries; deserialization
/// goes through the same check as [`TemperatureSchedule::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTemperatureSchedule")]
pub struct TemperatureSchedule {
    high_temperatures: Vec<f64>,
    low_temperatures: Vec<f64>,
    interval_minutes: u32,
    total_intervals: u32,
}

impl TemperatureSchedule {
    pub fn new(high: Vec<f64>, low: Vec<f64>) -> Result<Self, ValidationError> {
        check_len("high temperature", &high)?;
        check_len("low temperature", &low)?;
        Ok(Self {
            high_temperatures: high,
            low_temperatures: low,
            interval_minutes: INTERVAL_MINUTES,
            total_intervals: INTERVALS_PER_DAY as u32,
        })
    }

    pub fn from_intervals(high: [f64; INTERVALS_PER_DAY], low: [f64; INTERVALS_PER_DAY]) -> Self {
        Self {
            high_temperatures: high.to_vec(),
            low_temperatures: low.to_vec(),
            interval_minutes: INTERVAL_MINUTES,
            total_intervals: INTERVALS_PER_DAY as u32,
        }
    }

    pub fn high(&self) -> &[f64] {
        &self.high_temperatures
    }

    pub fn low(&self) -> &[f64] {
        &self.low_temperatures
    }
}

fn check_len(what: &'static str, values: &[f64]) -> Result<(), ValidationError> {
    if values.len() != INTERVALS_PER_DAY {
        return Err(ValidationError::Length {
            what,
            expected: INTERVALS_PER_DAY,
            actual: values.len(),
        });
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemperatureSchedule {
    high_temperatures: Vec<f64>,
    low_temperatures: Vec<f64>,
}

impl TryFrom<RawTemperatureSchedule> for TemperatureSchedule {
    type Error = ValidationError;

    fn try_from(raw: RawTemperatureSchedule) -> Result<Self, Self::Error> {
        TemperatureSchedule::new(raw.high_temperatures, raw.low_temperatures)
    }
}

/// The basic settings form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicSettings {
    pub home_size: u32,
    pub target_temp: f64,
    pub location: u8,
    pub time_away: String,
    pub time_home: String,
    pub savings_level: u8,
}

impl Default for BasicSettings {
    // Sample data the demo page starts with.
    fn default() -> Self {
        Self {
            home_size: 2000,
            target_temp: 72.0,
            location: 1,
            time_away: "08:00".to_string(),
            time_home: "17:00".to_string(),
            savings_level: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyBounds {
    pub high: f64,
    pub low: f64,
}

/// Per-hour comfort bounds entered in advanced mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourlySchedule(pub Vec<HourlyBounds>);

/// The optimizer's answer. Nothing in it is trusted: every field may be
/// missing, and numeric cells may arrive as numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    #[serde(default, deserialize_with = "lenient_number")]
    pub cost_savings: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub percent_savings: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub co2_avoided: f64,
    #[serde(rename = "HourlyTemperature", default)]
    pub hourly_temperature: Vec<Value>,
    #[serde(default)]
    pub best_temp_actual: Vec<Value>,
}

impl ScheduleResult {
    /// Row `index` of `HourlyTemperature` as numbers, `None` when the row is absent.
    pub fn hourly_row(&self, index: usize) -> Option<Vec<Option<f64>>> {
        self.hourly_temperature
            .get(index)
            .and_then(Value::as_array)
            .map(|row| row.iter().map(number).collect())
    }

    pub fn optimized_temperatures(&self) -> Vec<Option<f64>> {
        self.best_temp_actual.iter().map(number).collect()
    }
}

/// Reads a JSON number, or a string holding one.
pub fn number(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|x: &f64| x.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(number(&v).unwrap_or(0.0))
}
