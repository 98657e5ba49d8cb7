use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};

use image_scraper::{normalize_url, DownloadReport, ImageScraper, ScrapeError, ScraperConfig};

/// Saved files listed in the text summary.
const SHOWN_FILES: usize = 8;

#[derive(Parser, Debug)]
#[command(author, version, about = "Download every image of a web page", long_about = None)]
struct Args {
    /// Page to scrape; `https://` is added when no scheme is given
    url: String,
    /// JSON configuration file
    #[arg(short = 'c', long, default_value = image_scraper::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Directory for the numbered scrapping folders
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,
    /// Maximum number of simultaneous image downloads
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,
    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ScrapeError> {
    let config = load_config(args)?;
    debug!("Using {:?}", config);

    let url = normalize_url(&args.url).map_err(ScrapeError::PageFetch)?;

    let scraper = ImageScraper::new(&config);

    let report = scraper.run(&url, |completed, total| {
        eprint!("\r[{}/{}]", completed, total);
        std::io::stderr().flush().ok();
    })?;

    eprintln!();

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(ScrapeError::Report)?;
        println!("{}", json);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<ScraperConfig, ScrapeError> {
    let mut config = ScraperConfig::load_or_default(&args.config)?;

    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }

    if let Some(concurrency) = args.concurrency {
        config.max_concurrent_downloads = concurrency;
    }

    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }

    config.validate()?;

    Ok(config)
}

fn print_summary(report: &DownloadReport) {
    println!(
        "Downloaded {} of {} images ({} bytes) to {}",
        report.successful.len(),
        report.total_count,
        report.total_bytes(),
        report.folder_path.display()
    );

    for outcome in report.successful.iter().take(SHOWN_FILES) {
        println!(
            "  {} ({} bytes)",
            outcome.filename().unwrap_or_default(),
            outcome.size_bytes().unwrap_or_default()
        );
    }

    if report.successful.len() > SHOWN_FILES {
        println!("  ... and {} more", report.successful.len() - SHOWN_FILES);
    }

    if report.failed.is_empty() {
        return;
    }

    println!("{} failed:", report.failed.len());

    for outcome in &report.failed {
        println!("  {} - {}", outcome.url(), outcome.error().unwrap_or_default());
    }
}
