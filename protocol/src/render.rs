use std::fmt;
use std::fmt::Formatter;

use serde::Serialize;

use crate::error::RenderError;
use crate::model::{ScheduleResult, INTERVALS_PER_DAY};
use crate::prices::location_prices;

/// intervals, high bounds, low bounds; prices are optional
pub const REQUIRED_ROWS: usize = 3;
const PRICE_ROW: usize = 3;

/// Every 4th half-hour point is shown.
const STRIDE: usize = 4;

/// Savings figures formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub cost_savings: String,
    pub percent_savings: String,
    pub co2_avoided: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisId {
    Temperature,
    Price,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub id: AxisId,
    pub title: &'static str,
    pub position: &'static str,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: &'static str,
    pub axis: AxisId,
    pub color: &'static str,
    pub dashed: bool,
    pub fill: bool,
    pub data: Vec<Option<f64>>,
}

/// Chart description: one label per point, series share the labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub labels: Vec<String>,
    pub axes: Vec<Axis>,
    pub series: Vec<Series>,
}

pub fn summarize(result: &ScheduleResult) -> Summary {
    Summary {
        cost_savings: format_currency(result.cost_savings),
        percent_savings: format!("{}%", result.percent_savings),
        co2_avoided: format!("{:.2}", result.co2_avoided),
    }
}

/// Builds the chart for a result.
///
/// Fails when `HourlyTemperature` is too short to hold the bound rows; the
/// caller keeps whatever chart it had. Prices come from the result when the
/// optimizer supplies them, otherwise from the static table of `location`.
pub fn chart(result: &ScheduleResult, location: u8) -> Result<Chart, RenderError> {
    let rows = result.hourly_temperature.len();
    if rows < REQUIRED_ROWS {
        return Err(RenderError::ShortPayload { rows, required: REQUIRED_ROWS });
    }

    let high = result.hourly_row(1).unwrap_or_default();
    let low = result.hourly_row(2).unwrap_or_default();
    let prices = result
        .hourly_row(PRICE_ROW)
        .unwrap_or_else(|| location_prices(location).into_iter().map(Some).collect());
    let optimized = result.optimized_temperatures();

    let mut labels: Vec<String> = interval_labels().into_iter().step_by(STRIDE).collect();
    labels.push("00:00".to_string());

    Ok(Chart {
        labels,
        axes: vec![
            Axis { id: AxisId::Temperature, title: "Temperature (°F)", position: "left", min: 0.0, max: 100.0 },
            Axis { id: AxisId::Price, title: "Price ($/kWh)", position: "right", min: 0.0, max: 1.0 },
        ],
        series: vec![
            Series {
                name: "Optimized Temperature",
                axis: AxisId::Temperature,
                color: "#667eea",
                dashed: false,
                fill: false,
                data: downsample(&optimized),
            },
            Series {
                name: "High Limit",
                axis: AxisId::Temperature,
                color: "#ff6b6b",
                dashed: true,
                fill: false,
                data: downsample(&high),
            },
            Series {
                name: "Low Limit",
                axis: AxisId::Temperature,
                color: "#4ecdc4",
                dashed: true,
                fill: false,
                data: downsample(&low),
            },
            Series {
                name: "Electricity Price",
                axis: AxisId::Price,
                color: "#feca57",
                dashed: false,
                fill: true,
                data: downsample(&prices),
            },
        ],
    })
}

/// `00:00`, `00:30`, ... `23:30`
pub fn interval_labels() -> Vec<String> {
    (0..INTERVALS_PER_DAY)
        .map(|i| format!("{:02}:{:02}", i / 2, (i % 2) * 30))
        .collect()
}

/// Keeps every 4th of the first 48 points and repeats the first point at the
/// end so the day closes on itself.
fn downsample(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out: Vec<Option<f64>> = values
        .iter()
        .take(INTERVALS_PER_DAY)
        .step_by(STRIDE)
        .copied()
        .collect();
    out.push(values.first().copied().flatten());
    out
}

/// Dollar amount the way the demo shows it: `$1,234.5`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') { "-" } else { "" };
    if frac.is_empty() {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{}", sign, grouped, frac)
    }
}

pub fn format_temperature(value: f64) -> String {
    format!("{:.1}°F", value)
}

pub fn format_price(value: f64) -> String {
    format!("${:.3}/kWh", value)
}

impl Series {
    fn cell(&self, index: usize) -> String {
        match (self.data.get(index).copied().flatten(), self.axis) {
            (Some(v), AxisId::Temperature) => format_temperature(v),
            (Some(v), AxisId::Price) => format_price(v),
            (None, _) => "-".to_string(),
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:>6}", "time")?;
        for s in &self.series {
            write!(f, " | {:>22}", s.name)?;
        }
        writeln!(f)?;

        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "{:>6}", label)?;
            for s in &self.series {
                write!(f, " | {:>22}", s.cell(i))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
