mod fetcher;
mod folder;
mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use url::Url;

use crate::error::{FetchError, ItemDownloadError, ScrapeError};

pub use fetcher::{UReqFetcher, USER_AGENT};
pub use folder::next_output_folder;
pub use report::{DownloadOutcome, DownloadReport, ImageDescriptor};

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    Ok(Vec<u8>),
    Status(u16),
    InvalidBody(String),
    NetworkError(String),
}

impl Response {
    pub fn ok(body: Vec<u8>) -> Self {
        Self::Ok(body)
    }

    pub fn status(status: u16) -> Self {
        Self::Status(status)
    }

    pub fn not_found() -> Self {
        Self::Status(404)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody(message.into())
    }

    pub fn network_error(message: impl Into<String>) -> Self {
        Self::NetworkError(message.into())
    }

    pub fn into_result(self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = url.to_string();

        match self {
            Response::Ok(body) => Ok(body),
            Response::Status(status) => Err(FetchError::Status { url, status }),
            Response::InvalidBody(message) => Err(FetchError::InvalidBody { url, message }),
            Response::NetworkError(message) => Err(FetchError::Network { url, message }),
        }
    }
}

/// A single blocking HTTP GET. Implementations own their timeout.
pub trait FileDownloader {
    fn fetch(&self, url: &str) -> Response;

    fn fetch_page(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = parse_url(url)?;
        self.fetch(url.as_str()).into_result(url.as_str())
    }

    fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = parse_url(url)?;
        self.fetch(url.as_str()).into_result(url.as_str())
    }
}

pub(crate) fn parse_url(url: &str) -> Result<Url, FetchError> {
    Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Downloads batches of images into numbered folders under `path`.
pub struct Downloader<T: FileDownloader> {
    fetcher: T,
    path: PathBuf,
}

impl<T> Downloader<T>
where
    T: FileDownloader + Sync,
{
    pub fn with_fetcher(path: impl Into<PathBuf>, fetcher: T) -> Self {
        Downloader {
            path: path.into(),
            fetcher,
        }
    }

    pub fn fetcher(&self) -> &T {
        &self.fetcher
    }

    /// Downloads every descriptor into a fresh output folder using at most
    /// `concurrency_limit` simultaneous fetches.
    ///
    /// A failing item is recorded in [`DownloadReport::failed`] and never
    /// stops its siblings. `on_progress(completed, total)` runs on the calling
    /// thread, once per finished item, in completion order.
    ///
    /// The only error is failing to create the output folder.
    pub fn download_all<F>(
        &self,
        descriptors: &[ImageDescriptor],
        concurrency_limit: usize,
        mut on_progress: F,
    ) -> Result<DownloadReport, ScrapeError>
    where
        F: FnMut(usize, usize),
    {
        let folder = next_output_folder(&self.path)?;
        let total = descriptors.len();

        if total == 0 {
            info!("Nothing to download into {:?}", folder);
            return Ok(DownloadReport::empty(folder));
        }

        let workers = concurrency_limit.clamp(1, total);
        info!("Downloading {} images with {} workers", total, workers);

        let next = AtomicUsize::new(0);
        let (sender, receiver) = mpsc::channel::<DownloadOutcome>();
        let mut outcomes = Vec::with_capacity(total);

        thread::scope(|scope| {
            for _ in 0..workers {
                let sender = sender.clone();
                let next = &next;
                let folder = folder.as_path();

                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::SeqCst);

                    let Some(descriptor) = descriptors.get(index) else {
                        break;
                    };

                    let outcome = self.download_one(descriptor, folder);

                    if sender.send(outcome).is_err() {
                        break;
                    }
                });
            }

            // Workers hold the remaining senders, so the loop ends once the
            // last of them is done.
            drop(sender);

            for outcome in receiver {
                outcomes.push(outcome);
                on_progress(outcomes.len(), total);
            }
        });

        let report = DownloadReport::from_outcomes(folder, outcomes);

        info!(
            "Saved {} of {} images to {:?}",
            report.successful.len(),
            report.total_count,
            report.folder_path
        );

        Ok(report)
    }

    fn download_one(&self, descriptor: &ImageDescriptor, folder: &Path) -> DownloadOutcome {
        debug!("Fetching {}", descriptor.url);

        match self.save(descriptor, folder) {
            Ok((filename, size_bytes)) => {
                debug!("Saved {} ({} bytes)", filename, size_bytes);
                DownloadOutcome::succeeded(&descriptor.url, filename, size_bytes)
            }

            Err(e) => {
                warn!("Failed to download {}: {}", descriptor.url, e);
                DownloadOutcome::failed(&descriptor.url, e)
            }
        }
    }

    fn save(
        &self,
        descriptor: &ImageDescriptor,
        folder: &Path,
    ) -> Result<(String, u64), ItemDownloadError> {
        let filename = file_name_for(descriptor);

        let body = self.fetcher.fetch_image(&descriptor.url)?;

        let file_path = folder.join(&filename);

        fs::write(&file_path, &body).map_err(|source| ItemDownloadError::Write {
            path: file_path,
            source,
        })?;

        Ok((filename, body.len() as u64))
    }
}

impl Downloader<UReqFetcher> {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Downloader::with_fetcher(path, UReqFetcher::new(timeout))
    }
}

/// Last path segment of the URL, or `image_<unix seconds>.<extension>` when
/// that segment is empty or has no `.`.
///
/// Synthesized names can repeat within the same second; the later write
/// replaces the earlier file.
pub fn file_name_for(descriptor: &ImageDescriptor) -> String {
    let segment = match Url::parse(&descriptor.url) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("")
            .to_string(),
        Err(_) => descriptor
            .url
            .split('/')
            .last()
            .unwrap_or("")
            .to_string(),
    };

    if !segment.is_empty() && segment.contains('.') {
        return segment;
    }

    let extension = if descriptor.extension.is_empty() {
        DEFAULT_EXTENSION
    } else {
        descriptor.extension.as_str()
    };

    let synthesized = format!("image_{}.{}", Utc::now().timestamp(), extension);
    debug!("No usable file name in {}, using {}", descriptor.url, synthesized);

    synthesized
}

#[cfg(test)]
pub(crate) use fetcher::MockFetcher;
