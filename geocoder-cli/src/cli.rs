use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use geocoder_core::{
    Config, Geocoder, NameForm, Ordinal, ProviderId, ResultAccessor,
    provider::{default_provider_from_config, provider_from_config},
};
use inquire::Password;
use serde_json::json;
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geocode", version, about = "Geocoding CLI")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "google".
        provider: String,
    },

    /// Look up a free-form address.
    Address {
        address: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Look up a latitude/longitude pair.
    #[command(allow_negative_numbers = true)]
    Coords {
        lat: f64,
        lng: f64,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Which result to show: an ordinal name ("second") or a 1-based number.
    #[arg(long, default_value = "first")]
    pub result: String,

    /// Print short names (e.g. "CA" instead of "California").
    #[arg(long)]
    pub short: bool,

    /// Print the selected result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Provider to use instead of the configured default.
    #[arg(long)]
    pub provider: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Address { address, output } => {
                let mut geocoder = build_geocoder(&output)?;
                geocoder.set_address(&address);
                show(&geocoder, &output).await
            }
            Command::Coords { lat, lng, output } => {
                let mut geocoder = build_geocoder(&output)?;
                geocoder.set_coordinates(lat, lng);
                show(&geocoder, &output).await
            }
        }
    }
}

fn configure(provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    config.save()?;

    println!(
        "Saved credentials for '{id}' to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn build_geocoder(output: &OutputArgs) -> Result<Geocoder> {
    let config = Config::load()?;
    let provider = match &output.provider {
        Some(name) => provider_from_config(ProviderId::try_from(name.as_str())?, &config)?,
        None => default_provider_from_config(&config)?,
    };
    Ok(Geocoder::new(provider))
}

async fn show(geocoder: &Geocoder, output: &OutputArgs) -> Result<()> {
    let index = parse_result_index(&output.result)?;
    let form = if output.short { NameForm::Short } else { NameForm::Long };

    let mut result = geocoder.lookup().await?;
    result.select(index);
    debug!(
        selected = index,
        count = result.len(),
        active = result.has_active(),
        "selected geocode result"
    );

    if output.json {
        println!("{}", serde_json::to_string_pretty(&to_json(&result, form))?);
    } else {
        print!("{}", render(&result, form));
    }
    Ok(())
}

/// Accepts "first".."tenth" or a 1-based position.
fn parse_result_index(value: &str) -> Result<usize> {
    if let Ok(n) = value.parse::<usize>() {
        anyhow::ensure!(n >= 1, "Result positions start at 1");
        return Ok(n - 1);
    }
    Ok(value.parse::<Ordinal>()?.index())
}

fn render(result: &ResultAccessor, form: NameForm) -> String {
    let Some(index) = result.active_index() else {
        return format!("No result selected ({} result(s) returned).\n", result.len());
    };

    let field = |v: Option<&str>| v.unwrap_or("-").to_string();
    let coord = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |c| c.to_string());

    let mut out = format!("Result {} of {}\n", index + 1, result.len());
    out.push_str(&format!("  Address: {}\n", field(result.address())));
    out.push_str(&format!("  Number:  {}\n", field(result.number(form))));
    out.push_str(&format!("  Street:  {}\n", field(result.street(form))));
    out.push_str(&format!("  City:    {}\n", field(result.city(form))));
    out.push_str(&format!("  State:   {}\n", field(result.state(form))));
    out.push_str(&format!("  Country: {}\n", field(result.country(form))));
    out.push_str(&format!("  Lat/Lng: {}, {}\n", coord(result.lat()), coord(result.lng())));
    if let Some(vp) = result.viewport() {
        out.push_str(&format!(
            "  Viewport: NE ({}, {}) SW ({}, {})\n",
            vp.ne_lat, vp.ne_lng, vp.sw_lat, vp.sw_lng
        ));
    }
    out
}

fn to_json(result: &ResultAccessor, form: NameForm) -> serde_json::Value {
    json!({
        "result": result.active_index().map(|i| i + 1),
        "count": result.len(),
        "address": result.address(),
        "number": result.number(form),
        "street": result.street(form),
        "city": result.city(form),
        "state": result.state(form),
        "country": result.country(form),
        "lat": result.lat(),
        "lng": result.lng(),
        "viewport": result.viewport(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUPERTINO: &str = include_str!("../../geocoder-core/tests/fixtures/cupertino.json");

    #[test]
    fn result_index_accepts_names_and_numbers() {
        assert_eq!(parse_result_index("first").unwrap(), 0);
        assert_eq!(parse_result_index("Third").unwrap(), 2);
        assert_eq!(parse_result_index("2").unwrap(), 1);
        assert!(parse_result_index("0").is_err());
        assert!(parse_result_index("eleventh").is_err());
    }

    #[test]
    fn render_lists_selected_fields() {
        let result = ResultAccessor::from_json(CUPERTINO).unwrap();
        let text = render(&result, NameForm::Short);

        assert!(text.starts_with("Result 1 of 1"));
        assert!(text.contains("State:   CA"));
        assert!(text.contains("Lat/Lng: 37.33, -122.03"));
    }

    #[test]
    fn render_reports_missing_selection() {
        let mut result = ResultAccessor::from_json(CUPERTINO).unwrap();
        result.second();
        assert_eq!(render(&result, NameForm::Long), "No result selected (1 result(s) returned).\n");
    }

    #[test]
    fn json_output_has_null_for_absent_fields() {
        let mut result = ResultAccessor::from_json(CUPERTINO).unwrap();
        let value = to_json(&result, NameForm::Long);
        assert_eq!(value["city"], "Cupertino");
        assert_eq!(value["viewport"]["ne_lat"], 37.3314);

        result.second();
        let value = to_json(&result, NameForm::Long);
        assert!(value["address"].is_null());
        assert!(value["viewport"].is_null());
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli = Cli::try_parse_from(["geocode", "coords", "37.33", "-122.03", "--short"]).unwrap();
        match cli.command {
            Command::Coords { lat, lng, output } => {
                assert_eq!(lat, 37.33);
                assert_eq!(lng, -122.03);
                assert!(output.short);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
