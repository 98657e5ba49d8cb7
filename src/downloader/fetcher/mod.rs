mod ureq_fetcher;

use super::{FileDownloader, Response};

pub use ureq_fetcher::{UReqFetcher, USER_AGENT};

#[cfg(test)]
mod mock_fetcher;

#[cfg(test)]
pub use mock_fetcher::MockFetcher;
