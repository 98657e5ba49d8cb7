//! Downloads every image referenced by a web page into a numbered folder.
//!
//! ```no_run
//! use image_scraper::{ImageScraper, ScraperConfig};
//!
//! let config = ScraperConfig::default();
//! let scraper = ImageScraper::new(&config);
//!
//! let report = scraper.run("https://www.rust-lang.org", |completed, total| {
//!     println!("{completed}/{total}");
//! })?;
//!
//! println!("{} images in {:?}", report.successful.len(), report.folder_path);
//! # Ok::<(), image_scraper::ScrapeError>(())
//! ```

pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod scraper;

pub use config::ScraperConfig;
pub use downloader::{
    DownloadOutcome, DownloadReport, Downloader, FileDownloader, ImageDescriptor, Response,
    UReqFetcher,
};
pub use error::{FetchError, ItemDownloadError, ScrapeError};
pub use scraper::{normalize_url, ImageScraper};
