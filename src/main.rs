mod api;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod refresh;
mod session;
mod store;
mod ui;

use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::refresh::{PageSize, PollInterval};
use crate::session::{SessionOptions, run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Watch the pending tasks of a queue
    Watch {
        /// Name of the queue to watch
        #[arg(long, short = 'q', value_name = "QUEUE")]
        queue: String,

        /// Seconds between automatic refreshes (overrides the config file)
        #[arg(long, value_name = "SECS")]
        poll_interval: Option<u64>,

        /// Rows per page: 10, 20, 30, 60 or 100 (overrides the config file)
        #[arg(long, value_name = "ROWS")]
        page_size: Option<usize>,

        /// Base URL of the monitoring API, or `local` (overrides the config file)
        #[arg(long, value_name = "URL", env = "QUEUE_MONITOR_ENV")]
        api_url: Option<String>,

        /// Print refresh activity instead of showing the dashboard
        #[arg(long, default_value_t = false)]
        headless: bool,

        /// Draw a dark background behind the dashboard
        #[arg(long, default_value_t = false)]
        with_background: bool,
    },
    /// Show or change the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Set the base URL of the monitoring API
    SetApiUrl {
        /// `local` or an http(s) URL
        url: String,
    },
    /// Set the seconds between automatic refreshes
    SetPollInterval {
        secs: u64,
    },
    /// Set the rows per page used when the dashboard opens
    SetPageSize {
        rows: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init_max_level();

    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Watch {
            queue,
            poll_interval,
            page_size,
            api_url,
            headless,
            with_background,
        } => {
            let config = Config::load_or_default(&config_path)?;
            let options = resolve_options(
                &config,
                queue,
                poll_interval,
                page_size,
                api_url,
            )?;
            let session = setup_session(options)?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, with_background).await
            }
        }
        Command::Config { action } => {
            let mut config = Config::load_or_default(&config_path)?;
            match action {
                ConfigAction::Show => {
                    print_cmd_info!("Configuration file", "{}", config_path.display());
                    println!("{}", serde_json::to_string_pretty(&config)?);
                    return Ok(());
                }
                ConfigAction::SetApiUrl { url } => {
                    let environment = url.parse::<Environment>()?;
                    config.api_url = match environment {
                        Environment::Local => None,
                        Environment::Custom { api_url } => Some(api_url),
                    };
                }
                ConfigAction::SetPollInterval { secs } => {
                    config.poll_interval_secs = secs;
                }
                ConfigAction::SetPageSize { rows } => {
                    config.default_page_size = rows;
                }
            }
            if let Err(e) = config.save(&config_path) {
                print_cmd_error!("Failed to save configuration", e.to_string().as_str());
                return Err(e.into());
            }
            print_cmd_success!(
                "Configuration saved",
                "{}",
                config_path.display()
            );
            Ok(())
        }
    }
}

/// Merges CLI flags with the config file. `api_url` already carries
/// `QUEUE_MONITOR_ENV` when the flag is absent.
fn resolve_options(
    config: &Config,
    queue: String,
    poll_interval: Option<u64>,
    page_size: Option<usize>,
    api_url: Option<String>,
) -> Result<SessionOptions, Box<dyn Error>> {
    let environment = match api_url {
        Some(url) => url.parse::<Environment>()?,
        None => config.environment()?.unwrap_or_default(),
    };

    let poll_interval = match poll_interval {
        Some(secs) => PollInterval::from_secs(secs)?,
        None => config.poll_interval()?,
    };

    let page_size = match page_size {
        Some(rows) => PageSize::new(rows)?,
        None => config.page_size()?,
    };

    Ok(SessionOptions {
        queue,
        environment,
        poll_interval,
        page_size,
    })
}
