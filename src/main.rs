use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use fallcent_audit::config::Config;
use fallcent_audit::extract::{ExtractMode, extract_products};
use fallcent_audit::fetch;
use fallcent_audit::report::{CompareReport, CountReport, VerifyReport};
use fallcent_audit::snapshot::load_snapshot;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Snapshot file, overriding SNAPSHOT_PATH
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarise the server snapshot
    Count,
    /// Compare fast-shipping products with a saved page capture
    Compare {
        /// Capture to read instead of the newest one in CAPTURE_DIR
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Fetch the live page and check the crawler's collection rate
    Verify {
        /// Keep the fetched page as a capture file
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.snapshot {
        config.snapshot_path = path;
    }

    let server = load_snapshot(&config.snapshot_path)
        .with_context(|| format!("loading snapshot {}", config.snapshot_path.display()))?;
    log::info!(
        "loaded {} products from {}",
        server.len(),
        config.snapshot_path.display()
    );

    match cli.command {
        Command::Count => {
            print!("{}", CountReport { products: &server });
        }
        Command::Compare { html } => {
            let path = match html {
                Some(path) => path,
                None => fetch::latest_capture(&config.capture_dir)?,
            };
            log::info!("analysing capture {}", path.display());
            let html = fetch::read_capture(&path)?;
            let page = extract_products(&html, ExtractMode::FastShippingOnly);
            print!(
                "{}",
                CompareReport {
                    server: &server,
                    page: &page,
                }
            );
        }
        Command::Verify { save } => {
            let client = fetch::build_client(&config)?;
            let html = fetch::fetch_html(&client, &config.fallcent_url, &config.user_agent).await?;
            if save {
                fetch::save_capture(&config.capture_dir, &html, chrono::Local::now())?;
            }
            let page = extract_products(&html, ExtractMode::All);
            print!(
                "{}",
                VerifyReport {
                    server: &server,
                    page: &page,
                    threshold: config.match_rate_threshold,
                }
            );
        }
    }

    Ok(())
}
