//! Command-line access to the diagnosis backend.

use clap::{Args, Parser, Subcommand};
use qdiag::api::ApiClient;
use qdiag::config::{self, ApiSettings};
use qdiag::diagnosis::{FeatureRecord, FormValues, Preset, Sex};
use qdiag::logging::{self, ConsoleTarget};
use serde::Serialize;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "qdiag-cli",
    version,
    about = "Query, train and run predictions against the diagnosis backend."
)]
struct Cli {
    /// Backend base URL; overrides config and QDIAG_API_BASE.
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Training key sent as x-api-key; overrides config and QDIAG_API_KEY.
    #[arg(long, global = true)]
    api_key: Option<String>,
    /// Per-request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check backend liveness.
    Health,
    /// Show whether a model is trained and its metrics.
    Status,
    /// Retrain the model (requires an API key).
    Train,
    /// Run a prediction for one patient record.
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Start from a canned record: `low` or `high`.
    #[arg(long)]
    preset: Option<String>,
    /// Age in years (1-120).
    #[arg(long)]
    age: Option<u32>,
    /// male, female or other.
    #[arg(long)]
    sex: Option<String>,
    #[arg(long)]
    chest_pain: bool,
    #[arg(long)]
    high_bp: bool,
    #[arg(long)]
    high_cholesterol: bool,
    #[arg(long)]
    smoking: bool,
    #[arg(long)]
    diabetes: bool,
}

impl PredictArgs {
    /// Build and validate the record before any request is made.
    fn record(&self) -> Result<FeatureRecord, String> {
        let base = match &self.preset {
            Some(preset) => preset.parse::<Preset>()?.record(),
            None => FeatureRecord::default(),
        };
        let mut values = FormValues::from(base);
        if let Some(age) = self.age {
            values.age = age;
        }
        if let Some(sex) = &self.sex {
            values.sex = Some(sex.parse::<Sex>()?);
        }
        values.chest_pain |= self.chest_pain;
        values.high_bp |= self.high_bp;
        values.high_cholesterol |= self.high_cholesterol;
        values.smoking |= self.smoking;
        values.diabetes |= self.diabetes;
        values.validate().map_err(|errors| {
            errors
                .age
                .into_iter()
                .chain(errors.sex)
                .collect::<Vec<_>>()
                .join("; ")
        })
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    if let Err(err) = logging::init(ConsoleTarget::Stderr) {
        eprintln!("Logging disabled: {err}");
    }
    let settings = resolve_settings(&cli)?;
    let client = ApiClient::new(&settings);
    match &cli.command {
        Command::Health => print_json(&client.check_health().map_err(|err| err.to_string())?),
        Command::Status => print_json(&client.model_status().map_err(|err| err.to_string())?),
        Command::Train => print_json(&client.train_model().map_err(|err| err.to_string())?),
        Command::Predict(args) => {
            let record = args.record()?;
            print_json(&client.predict(&record).map_err(|err| err.to_string())?)
        }
    }
}

fn resolve_settings(cli: &Cli) -> Result<ApiSettings, String> {
    let mut config = config::load_or_default().map_err(|err| err.to_string())?;
    config::apply_overrides(&mut config, cli.base_url.clone(), cli.api_key.clone());
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }
    config.api.normalized().map_err(|err| err.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{text}");
    Ok(())
}
