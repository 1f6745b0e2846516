use std::{fs, io::Read, path::Path, process::ExitCode};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fitr_core::{
    Config, ErrorResponse,
    handler::{
        GET_OUTFIT_RECOMMENDATION, GET_WEATHER_DATA, get_outfit_recommendation, get_weather_data,
    },
};
use inquire::{Password, PasswordDisplayMode};
use serde_json::{Value, json};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "fitr", version, about = "Weather-aware outfit picker")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Fetch current weather for a city or a coordinate pair.
    Weather {
        #[arg(long)]
        city: Option<String>,

        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Recommend an outfit from a weather snapshot and a wardrobe.
    Outfit {
        #[arg(long)]
        user: String,

        /// Path to a weather snapshot JSON file, or `-` for stdin.
        #[arg(long)]
        weather: String,

        /// Path to a JSON list of clothing items, or `-` for stdin.
        #[arg(long)]
        wardrobe: String,
    },

    /// Invoke a handler by name with a raw JSON payload.
    Invoke {
        /// `get_weather_data` or `get_outfit_recommendation`.
        function: String,

        /// Inline JSON payload; read from stdin when absent or `-`.
        payload: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Weather { city, lat, lon } => {
                let config = load_config()?;
                let payload = json!({ "city": city, "lat": lat, "lon": lon });
                Ok(print_outcome(get_weather_data(&config, payload).await))
            }
            Command::Outfit { user, weather, wardrobe } => {
                if weather == "-" && wardrobe == "-" {
                    bail!("only one of --weather and --wardrobe can be read from stdin");
                }

                let payload = json!({
                    "user_id": user,
                    "weather": read_json(&weather)?,
                    "clothing_items": read_json(&wardrobe)?,
                });
                Ok(print_outcome(get_outfit_recommendation(payload)))
            }
            Command::Invoke { function, payload } => {
                let payload = match payload.as_deref() {
                    None | Some("-") => read_json("-")?,
                    Some(inline) => {
                        serde_json::from_str(inline).context("Payload is not valid JSON")?
                    }
                };
                debug!(%function, "invoking handler");

                let outcome = match function.as_str() {
                    GET_WEATHER_DATA => get_weather_data(&load_config()?, payload).await,
                    GET_OUTFIT_RECOMMENDATION => get_outfit_recommendation(payload),
                    other => bail!(
                        "Unknown function '{other}'. Supported: {GET_WEATHER_DATA}, {GET_OUTFIT_RECOMMENDATION}."
                    ),
                };
                Ok(print_envelope(outcome))
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    Ok(Config::load()?.with_env_overrides())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;
    eprintln!("Saved configuration to {}", path.display());

    Ok(())
}

fn read_json(source: &str) -> anyhow::Result<Value> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read JSON from stdin")?;
        buf
    } else {
        let path = Path::new(source);
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {source}"))
}

/// Pretty-print a successful result to stdout, or the structured error to stderr.
fn print_outcome(outcome: Result<Value, ErrorResponse>) -> ExitCode {
    match outcome {
        Ok(value) => {
            println!("{}", pretty(&value));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", pretty(&json!(err)));
            ExitCode::FAILURE
        }
    }
}

/// Print the callable-style envelope on stdout.
fn print_envelope(outcome: Result<Value, ErrorResponse>) -> ExitCode {
    let code = if outcome.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    println!("{}", pretty(&envelope(outcome)));
    code
}

/// `{"result": ...}` on success, `{"error": ...}` otherwise.
fn envelope(outcome: Result<Value, ErrorResponse>) -> Value {
    match outcome {
        Ok(value) => json!({ "result": value }),
        Err(err) => json!({ "error": err }),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
