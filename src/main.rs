mod canvas;
mod cities;
mod colors;
mod config;
mod error;
mod geo;
mod globe;
mod interaction;
mod logging;
mod overlay;
mod settings;
mod stocks;
mod terminal;
mod view;
mod visibility;

use clap::{Args, Parser, Subcommand};
use config::{GlobeConfig, StockConfig, API_KEY_ENV};
use error::GlobeError;
use geo::BorderBuilder;
use settings::Settings;
use std::path::PathBuf;
use stocks::{PriceCache, PriceSource, StockService};
use terminal::Terminal;
use tracing::{info, warn};

const FRAME_STEP: f32 = 0.03;

#[derive(Parser)]
#[command(name = "termglobe")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal globe of places lived: country borders, city markers and hover cards", long_about = None)]
struct Cli {
    /// Write logs here instead of the default cache location
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive globe (default)
    Globe(GlobeArgs),

    /// Render one frame to stdout with ANSI colours
    Print {
        /// Width in columns (defaults to the terminal width)
        #[arg(short = 'W', long)]
        width: Option<u16>,

        /// Height in rows (defaults to the terminal height)
        #[arg(short = 'H', long)]
        height: Option<u16>,

        /// Virtual scroll offset in rows
        #[arg(short, long, default_value = "0")]
        scroll: f32,

        /// Fetch border data before rendering
        #[arg(short, long)]
        borders: bool,

        /// Characters only, without colour codes
        #[arg(long)]
        plain: bool,
    },

    /// List the places lived
    Cities,

    /// Show a year of weekly closing prices as sparklines
    Stocks {
        /// Ticker symbols (defaults to settings, then CRM CSCO IBM)
        tickers: Vec<String>,

        /// Sparkline width in columns
        #[arg(short, long, default_value = "40")]
        width: usize,
    },
}

#[derive(Args)]
struct GlobeArgs {
    /// Animation speed (seconds per frame)
    #[arg(short, long, default_value = "0.03")]
    time: f32,

    /// Skip the border data download
    #[arg(long)]
    no_borders: bool,

    /// Initial camera tilt in radians (clamped to +-pi/6)
    #[arg(long, allow_hyphen_values = true)]
    tilt: Option<f32>,
}

impl Default for GlobeArgs {
    fn default() -> Self {
        Self { time: FRAME_STEP, no_borders: false, tilt: None }
    }
}

fn main() -> Result<(), GlobeError> {
    let cli = Cli::parse();

    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };
    logging::init(config::log_path(cli.log_file, &settings).as_deref());
    if let Some(err) = settings_error {
        warn!(
            path = %Settings::config_path().display(),
            error = %err,
            "ignoring unreadable settings file"
        );
    }

    match cli.command.unwrap_or(Commands::Globe(GlobeArgs::default())) {
        Commands::Globe(args) => {
            let config = GlobeConfig::new(args.time, !args.no_borders, args.tilt, &settings);
            let mut term = Terminal::new()?;
            globe::run(&mut term, &config)?;
        }
        Commands::Print { width, height, scroll, borders, plain } => {
            let (tw, th) = crossterm::terminal::size().unwrap_or((80, 24));
            let lines = if borders {
                geo::loader::load_borders_or_empty(&config::data_sources(&settings), &BorderBuilder::default())
            } else {
                Vec::new()
            };
            let term = globe::render_still(width.unwrap_or(tw).max(1), height.unwrap_or(th).max(1), scroll, lines);
            if plain {
                println!("{}", term.to_plain());
            } else {
                print!("{}", term.to_ansi());
            }
        }
        Commands::Cities => {
            for city in &cities::CITIES {
                let marker = if city.current { "*" } else { " " };
                println!(
                    "{} {:<10} {:<16} {:<22} {:>8.4} {:>9.4}",
                    marker, city.name, city.country, city.years, city.location.lat, city.location.lng
                );
            }
        }
        Commands::Stocks { tickers, width } => {
            let config = StockConfig::new(tickers, width, &settings, std::env::var(API_KEY_ENV).ok());
            let service = StockService::new(config.api_key.clone(), PriceCache::default_location());
            info!(tickers = config.tickers.len() as u64, "listing stock prices");

            for history in service.histories(&config.tickers) {
                let last = history.prices.last().copied().unwrap_or(0.0);
                let change = history.change_percent().unwrap_or(0.0);
                let note = match history.source {
                    PriceSource::Live => "",
                    PriceSource::Cache => " (cached)",
                    PriceSource::Fallback => " (sample data)",
                };
                println!(
                    "{:<6} {} {:>9.2} {:>+7.1}%{}",
                    history.ticker,
                    stocks::sparkline(&history.prices, config.width),
                    last,
                    change,
                    note
                );
            }
        }
    }

    Ok(())
}
