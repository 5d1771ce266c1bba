use clap::{Parser, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::io::BufWriter;
use std::path::PathBuf;
use tap_appfigures::{cli, config::TapConfig, singer::SingerWriter};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// tap-appfigures: extract Appfigures products and subscription reports as a Singer tap
#[derive(Parser)]
#[command(name = "tap-appfigures", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source TAP_APPFIGURES_* settings from, if present
    #[arg(short, long, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long)]
    debug: bool,

    /// Config file (JSON, or YAML with a .yml/.yaml extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file from a previous sync
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Catalog file selecting the streams to sync
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Print the stream catalog and exit
    #[arg(long, conflicts_with = "about")]
    discover: bool,

    /// Print the tap's capabilities and settings and exit
    #[arg(long)]
    about: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if std::path::Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if cli.about {
        println!("{}", serde_json::to_string_pretty(&cli::about())?);
        return Ok(());
    }
    if cli.discover {
        log::info!("Discovering streams");
        println!(
            "{}",
            serde_json::to_string_pretty(&cli::discover())?
        );
        return Ok(());
    }

    let config = TapConfig::load(cli.config.as_deref())?;
    log::info!(
        "Syncing from {} starting {}",
        config.api_url.bright_black(),
        config.start_date.to_rfc3339().cyan()
    );

    let (state, catalog) = cli::load_inputs(cli.state.as_deref(), cli.catalog.as_deref())?;
    let streams = cli::selected_streams(catalog.as_ref());
    log::info!(
        "Selected streams: {}",
        streams
            .iter()
            .map(|s| s.name)
            .collect::<Vec<_>>()
            .join(", ")
            .green()
    );

    let client = cli::load_client(&config)?;
    let writer = SingerWriter::new(BufWriter::new(std::io::stdout()), state);
    let count = cli::sync(&client, &config, &streams, &writer).await?;

    log::info!("✓ Sync complete: {} record(s)", count.green());
    Ok(())
}
