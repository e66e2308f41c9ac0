use chrono::{NaiveTime, Timelike};
use log::warn;

use crate::error::ValidationError;
use crate::model::{
    BasicSettings, HourlyBounds, HourlySchedule, ScheduleRequest, TemperatureSchedule,
    COOL_DOWN_RATE, HEAT_UP_RATE, HOURS_PER_DAY, INTERVALS_PER_DAY,
};

// --- Comfort Band Constants ---
pub const DEADBAND_OFFSET: f64 = 1.4; // Always applied, home or away

const OFFSET_CONSERVATIVE: f64 = 2.0;
const OFFSET_BALANCED: f64 = 6.0;
const OFFSET_AGGRESSIVE: f64 = 12.0;

// --- Form Limits ---
pub const HOME_SIZE_RANGE: (u32, u32) = (500, 10_000);
pub const TEMPERATURE_RANGE: (f64, f64) = (60.0, 85.0);

// --- Advanced Mode Defaults ---
// Points are (first_hour, last_hour_exclusive, high, low)
const DEFAULT_HOURLY: &[(usize, usize, f64, f64)] = &[
    (0, 10, 72.0, 69.0),  // Sleep / early morning
    (10, 18, 78.0, 65.0), // Away / work hours, wider range
    (18, 24, 72.0, 69.0), // Evening at home
];

/// Converts `HH:MM` to the half-hour interval it falls into, 0..48.
pub fn time_to_interval(time: &str) -> Result<usize, ValidationError> {
    let t = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| ValidationError::TimeOfDay(time.to_string()))?;
    Ok(t.hour() as usize * 2 + usize::from(t.minute() >= 30))
}

/// Width added to the deadband while nobody is home.
pub fn savings_offset(savings_level: u8) -> f64 {
    match savings_level {
        1 => OFFSET_CONSERVATIVE,
        2 => OFFSET_BALANCED,
        3 => OFFSET_AGGRESSIVE,
        _ => OFFSET_BALANCED,
    }
}

/// Builds the 48 comfort bounds for a basic-mode request.
///
/// Intervals `away..=home` get the widened band, every other interval gets
/// the deadband only. An away window that wraps midnight (`away > home`)
/// selects no interval at all.
pub fn generate(base_temp: f64, away: usize, home: usize, savings_level: u8) -> TemperatureSchedule {
    let offset = savings_offset(savings_level) + DEADBAND_OFFSET;
    let mut high = [base_temp + DEADBAND_OFFSET; INTERVALS_PER_DAY];
    let mut low = [base_temp - DEADBAND_OFFSET; INTERVALS_PER_DAY];

    for i in 0..INTERVALS_PER_DAY {
        if away <= i && i <= home {
            high[i] = base_temp + offset;
            low[i] = base_temp - offset;
        }
    }

    TemperatureSchedule::from_intervals(high, low)
}

/// Range checks the basic form applies before anything is sent.
pub fn validate(settings: &BasicSettings) -> Result<(), ValidationError> {
    let (min_size, max_size) = HOME_SIZE_RANGE;
    if settings.home_size < min_size || settings.home_size > max_size {
        return Err(ValidationError::HomeSize(settings.home_size));
    }
    let (min_temp, max_temp) = TEMPERATURE_RANGE;
    if !(min_temp..=max_temp).contains(&settings.target_temp) {
        return Err(ValidationError::Temperature(settings.target_temp));
    }
    Ok(())
}

/// Request for basic mode: the schedule is generated from the away window.
pub fn basic_request(settings: &BasicSettings) -> Result<ScheduleRequest, ValidationError> {
    let away = time_to_interval(&settings.time_away)?;
    let home = time_to_interval(&settings.time_home)?;
    if away > home {
        warn!(
            "away window {}..{} wraps midnight, no interval will use the away band",
            settings.time_away, settings.time_home
        );
    }

    let schedule = generate(settings.target_temp, away, home, settings.savings_level);

    Ok(ScheduleRequest {
        home_size: settings.home_size,
        home_temperature: settings.target_temp,
        location: settings.location,
        time_away: settings.time_away.clone(),
        time_home: settings.time_home.clone(),
        savings_level: settings.savings_level,
        temperature_schedule: Some(schedule),
        heat_up_rate: HEAT_UP_RATE,
        cool_down_rate: COOL_DOWN_RATE,
    })
}

/// Request for advanced mode: the basic request with the hourly bounds swapped in.
pub fn advanced_request(
    settings: &BasicSettings,
    hourly: &HourlySchedule,
) -> Result<ScheduleRequest, ValidationError> {
    let mut request = basic_request(settings)?;
    request.temperature_schedule = Some(hourly.expand()?);
    Ok(request)
}

impl HourlySchedule {
    /// Each hour covers two half-hour intervals.
    pub fn expand(&self) -> Result<TemperatureSchedule, ValidationError> {
        if self.0.len() != HOURS_PER_DAY {
            return Err(ValidationError::Length {
                what: "hourly bound",
                expected: HOURS_PER_DAY,
                actual: self.0.len(),
            });
        }
        let high = self.0.iter().flat_map(|b| [b.high, b.high]).collect();
        let low = self.0.iter().flat_map(|b| [b.low, b.low]).collect();
        TemperatureSchedule::new(high, low)
    }
}

impl Default for HourlySchedule {
    fn default() -> Self {
        let bounds = (0..HOURS_PER_DAY)
            .map(|hour| {
                let &(_, _, high, low) = DEFAULT_HOURLY
                    .iter()
                    .find(|&&(from, to, _, _)| from <= hour && hour < to)
                    .unwrap_or(&DEFAULT_HOURLY[0]);
                HourlyBounds { high, low }
            })
            .collect();
        HourlySchedule(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn interval_conversion() -> anyhow::Result<()> {
        assert_eq!(time_to_interval("00:00")?, 0);
        assert_eq!(time_to_interval("08:00")?, 16);
        assert_eq!(time_to_interval("08:29")?, 16);
        assert_eq!(time_to_interval("08:30")?, 17);
        assert_eq!(time_to_interval("23:59")?, 47);
        Ok(())
    }

    #[test]
    fn bad_time_is_rejected() {
        assert_eq!(
            time_to_interval("25:00"),
            Err(ValidationError::TimeOfDay("25:00".to_string()))
        );
        assert!(time_to_interval("noon").is_err());
    }

    #[test]
    fn savings_offsets() {
        assert_eq!(savings_offset(1), 2.0);
        assert_eq!(savings_offset(2), 6.0);
        assert_eq!(savings_offset(3), 12.0);
        assert_eq!(savings_offset(0), 6.0);
        assert_eq!(savings_offset(9), 6.0);
    }

    #[test]
    fn balanced_workday() -> anyhow::Result<()> {
        let req = basic_request(&BasicSettings::default())?;
        let s = req.temperature_schedule.expect("basic request carries a schedule");
        for i in 16..=34 {
            assert_close(s.high()[i], 79.4);
            assert_close(s.low()[i], 64.6);
        }
        for i in [0, 15, 35, 47] {
            assert_close(s.high()[i], 73.4);
            assert_close(s.low()[i], 70.6);
        }
        Ok(())
    }

    #[test]
    fn outside_window_is_deadband_only() {
        for base in [60.0, 68.5, 85.0] {
            for level in 0..5 {
                let s = generate(base, 20, 30, level);
                assert_eq!(s.high().len(), 48);
                assert_eq!(s.low().len(), 48);
                for i in (0..20).chain(31..48) {
                    assert_eq!(s.high()[i], base + 1.4);
                    assert_eq!(s.low()[i], base - 1.4);
                }
            }
        }
    }

    #[test]
    fn wrapped_window_selects_nothing() {
        let s = generate(70.0, 44, 4, 3);
        assert!(s.high().iter().all(|&h| h == 70.0 + 1.4));
        assert!(s.low().iter().all(|&l| l == 70.0 - 1.4));
    }

    #[test]
    fn form_ranges() {
        let mut settings = BasicSettings::default();
        assert!(validate(&settings).is_ok());
        settings.home_size = 499;
        assert_eq!(validate(&settings), Err(ValidationError::HomeSize(499)));
        settings.home_size = 10_000;
        settings.target_temp = 85.5;
        assert_eq!(validate(&settings), Err(ValidationError::Temperature(85.5)));
    }

    #[test]
    fn hourly_defaults_and_expansion() -> anyhow::Result<()> {
        let hourly = HourlySchedule::default();
        assert_eq!(hourly.0.len(), 24);
        assert_eq!(hourly.0[9], HourlyBounds { high: 72.0, low: 69.0 });
        assert_eq!(hourly.0[10], HourlyBounds { high: 78.0, low: 65.0 });
        assert_eq!(hourly.0[18], HourlyBounds { high: 72.0, low: 69.0 });

        let s = hourly.expand()?;
        assert_eq!(s.high()[20], 78.0);
        assert_eq!(s.high()[21], 78.0);
        assert_eq!(s.low()[19], 69.0);
        assert_eq!(s.low()[47], 69.0);
        Ok(())
    }

    #[test]
    fn advanced_request_uses_hourly_bounds() -> anyhow::Result<()> {
        let mut hourly = HourlySchedule::default();
        hourly.0[0] = HourlyBounds { high: 80.0, low: 60.0 };
        let req = advanced_request(&BasicSettings::default(), &hourly)?;
        let s = req.temperature_schedule.expect("advanced request carries a schedule");
        assert_eq!(s.high()[0..2], [80.0, 80.0]);
        assert_eq!(s.low()[1], 60.0);

        hourly.0.pop();
        assert!(advanced_request(&BasicSettings::default(), &hourly).is_err());
        Ok(())
    }
}
