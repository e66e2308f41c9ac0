use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use curve_protocol::client::{OptimizerClient, DEFAULT_BACKEND_URL};
use curve_protocol::error::GENERIC_FAILURE_MESSAGE;
use curve_protocol::model::{BasicSettings, HourlySchedule, ScheduleRequest};
use curve_protocol::prices::{is_known_location, location_prices};
use curve_protocol::render::{chart, format_price, format_temperature, interval_labels, summarize};
use curve_protocol::schedule::{advanced_request, basic_request, validate};
use log::{error, warn};

#[derive(Parser)]
#[command(author, version, about = "Ask the schedule optimizer for a temperature plan")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate bounds from the away window and optimize
    Basic {
        #[command(flatten)]
        form: Form,
        #[command(flatten)]
        backend: Backend,
    },
    /// Optimize with hourly bounds read from YAML (defaults if omitted)
    Advanced {
        #[command(flatten)]
        form: Form,
        #[arg(long)]
        schedule: Option<PathBuf>,
        #[command(flatten)]
        backend: Backend,
    },
    /// Print the generated comfort bounds without contacting the optimizer
    Schedule {
        #[command(flatten)]
        form: Form,
    },
    /// Print the price table of a location in $/kWh
    Prices {
        #[arg(long, default_value_t = 1)]
        location: u8,
    },
}

#[derive(ClapArgs)]
struct Form {
    #[arg(long, default_value_t = 2000)]
    home_size: u32,
    #[arg(long, default_value_t = 72.0)]
    target_temp: f64,
    #[arg(long, default_value_t = 1)]
    location: u8,
    #[arg(long, default_value = "08:00")]
    away: String,
    #[arg(long, default_value = "17:00")]
    home: String,
    /// 1 conservative, 2 balanced, 3 aggressive
    #[arg(long, default_value_t = 2)]
    savings: u8,
}

#[derive(ClapArgs)]
struct Backend {
    #[arg(long, default_value = DEFAULT_BACKEND_URL)]
    backend_url: String,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print the request instead of sending it
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

impl From<&Form> for BasicSettings {
    fn from(form: &Form) -> Self {
        BasicSettings {
            home_size: form.home_size,
            target_temp: form.target_temp,
            location: form.location,
            time_away: form.away.clone(),
            time_home: form.home.clone(),
            savings_level: form.savings,
        }
    }
}

fn load_hourly(path: &Path) -> Result<HourlySchedule> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading hourly schedule {}", path.display()))?;
    let hourly: HourlySchedule = serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing hourly schedule {}", path.display()))?;
    Ok(hourly)
}

async fn optimize(request: ScheduleRequest, backend: &Backend) -> Result<()> {
    if backend.dry_run {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let client = OptimizerClient::new(&backend.backend_url, backend.timeout_secs.map(Duration::from_secs))?;
    let result = match client.submit(&request).await {
        Ok(result) => result,
        Err(e) => {
            error!("optimization failed: {}", e);
            bail!(GENERIC_FAILURE_MESSAGE);
        }
    };

    let summary = summarize(&result);
    println!("Cost savings:    {}", summary.cost_savings);
    println!("Percent savings: {}", summary.percent_savings);
    println!("CO2 avoided:     {}", summary.co2_avoided);

    match chart(&result, request.location) {
        Ok(chart) => print!("\n{}", chart),
        Err(e) => error!("invalid chart data: {}", e),
    }
    Ok(())
}

fn print_schedule(settings: &BasicSettings) -> Result<()> {
    let request = basic_request(settings)?;
    if let Some(schedule) = &request.temperature_schedule {
        for ((label, high), low) in interval_labels().iter().zip(schedule.high()).zip(schedule.low()) {
            println!("{}  {:>8}  {:>8}", label, format_temperature(*high), format_temperature(*low));
        }
    }
    Ok(())
}

fn print_prices(location: u8) {
    if !is_known_location(location) {
        warn!("unknown location {}, showing location 1", location);
    }
    for (label, price) in interval_labels().iter().zip(location_prices(location)) {
        println!("{}  {}", label, format_price(price));
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Basic { form, backend } => {
            let settings = BasicSettings::from(&form);
            validate(&settings)?;
            optimize(basic_request(&settings)?, &backend).await
        }
        Command::Advanced { form, schedule, backend } => {
            let hourly = match schedule {
                Some(path) => load_hourly(&path)?,
                None => HourlySchedule::default(),
            };
            optimize(advanced_request(&BasicSettings::from(&form), &hourly)?, &backend).await
        }
        Command::Schedule { form } => print_schedule(&BasicSettings::from(&form)),
        Command::Prices { location } => {
            print_prices(location);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn form_defaults_match_sample_data() {
        let cli = Cli::parse_from(["curve-cli", "basic"]);
        match cli.command {
            Command::Basic { form, backend } => {
                assert_eq!(BasicSettings::from(&form), BasicSettings::default());
                assert_eq!(backend.backend_url, DEFAULT_BACKEND_URL);
                assert!(!backend.dry_run);
            }
            _ => panic!("expected basic"),
        }
    }

    #[test]
    fn hourly_schedule_from_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        for _ in 0..24 {
            temp.write_all(b"- high: 76\n  low: 66\n").unwrap();
        }
        let path = temp.into_temp_path();
        let hourly = load_hourly(&path).unwrap();
        assert_eq!(hourly.0.len(), 24);
        assert_eq!(hourly.expand().unwrap().high()[47], 76.0);
    }

    #[test]
    fn bad_yaml_names_the_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"not: [a, list").unwrap();
        let path = temp.into_temp_path();
        let err = load_hourly(&path).unwrap_err();
        assert!(err.to_string().starts_with("parsing hourly schedule"));
    }

    #[tokio::test]
    async fn dry_run_skips_network() {
        let backend = Backend {
            backend_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: None,
            dry_run: true,
        };
        let request = basic_request(&BasicSettings::default()).unwrap();
        assert!(optimize(request, &backend).await.is_ok());
    }
}
