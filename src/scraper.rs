use log::info;

use crate::config::ScraperConfig;
use crate::downloader::{
    parse_url, DownloadReport, Downloader, FileDownloader, ImageDescriptor, UReqFetcher,
};
use crate::error::{FetchError, ScrapeError};
use crate::extractor::extract_images;

/// One page in, one folder of images out.
pub struct ImageScraper<T: FileDownloader> {
    downloader: Downloader<T>,
    max_concurrent_downloads: usize,
}

impl ImageScraper<UReqFetcher> {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            downloader: Downloader::new(config.output_dir.clone(), config.timeout()),
            max_concurrent_downloads: config.max_concurrent_downloads,
        }
    }
}

impl<T> ImageScraper<T>
where
    T: FileDownloader + Sync,
{
    pub fn with_fetcher(config: &ScraperConfig, fetcher: T) -> Self {
        Self {
            downloader: Downloader::with_fetcher(config.output_dir.clone(), fetcher),
            max_concurrent_downloads: config.max_concurrent_downloads,
        }
    }

    /// Fetches the page and lists the images it references.
    pub fn extract_images(&self, url: &str) -> Result<Vec<ImageDescriptor>, ScrapeError> {
        let page_url = parse_url(url).map_err(ScrapeError::PageFetch)?;

        let body = self
            .downloader
            .fetcher()
            .fetch_page(page_url.as_str())
            .map_err(ScrapeError::PageFetch)?;

        let html = String::from_utf8_lossy(&body);

        Ok(extract_images(&html, &page_url))
    }

    pub fn download_images<F>(
        &self,
        images: &[ImageDescriptor],
        on_progress: F,
    ) -> Result<DownloadReport, ScrapeError>
    where
        F: FnMut(usize, usize),
    {
        self.downloader
            .download_all(images, self.max_concurrent_downloads, on_progress)
    }

    /// Extracts and downloads. A page without images is an error and no
    /// output folder is allocated for it.
    pub fn run<F>(&self, url: &str, on_progress: F) -> Result<DownloadReport, ScrapeError>
    where
        F: FnMut(usize, usize),
    {
        info!("Scraping images from {}", url);

        let images = self.extract_images(url)?;

        if images.is_empty() {
            return Err(ScrapeError::NoImagesFound {
                url: url.to_string(),
            });
        }

        self.download_images(&images, on_progress)
    }
}

/// Trims the input and adds `https://` when no scheme is given.
pub fn normalize_url(input: &str) -> Result<String, FetchError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(FetchError::InvalidUrl {
            url: input.to_string(),
            message: "empty URL".to_string(),
        });
    }

    let url = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else if let Some(rest) = input.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!("https://{}", input)
    };

    parse_url(&url).map(String::from)
}
