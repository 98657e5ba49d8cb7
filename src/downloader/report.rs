use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An image reference discovered on a page, before it is downloaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub url: String,
    pub extension: String,
    pub alt_text: String,
}

impl ImageDescriptor {
    pub fn new(url: &str, extension: &str, alt_text: &str) -> Self {
        Self {
            url: url.to_string(),
            extension: extension.to_string(),
            alt_text: alt_text.to_string(),
        }
    }
}

/// Result of downloading one descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    Succeeded {
        url: String,
        filename: String,
        size_bytes: u64,
    },
    Failed {
        url: String,
        error: String,
    },
}

impl DownloadOutcome {
    pub fn succeeded(url: &str, filename: String, size_bytes: u64) -> Self {
        Self::Succeeded {
            url: url.to_string(),
            filename,
            size_bytes,
        }
    }

    pub fn failed(url: &str, error: impl ToString) -> Self {
        Self::Failed {
            url: url.to_string(),
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Succeeded { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        match self {
            Self::Succeeded { filename, .. } => Some(filename),
            Self::Failed { .. } => None,
        }
    }

    pub fn size_bytes(&self) -> Option<u64> {
        match self {
            Self::Succeeded { size_bytes, .. } => Some(*size_bytes),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }
}

/// Aggregate result of one run. Both lists are in completion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadReport {
    pub folder_path: PathBuf,
    pub successful: Vec<DownloadOutcome>,
    pub failed: Vec<DownloadOutcome>,
    pub total_count: usize,
}

impl DownloadReport {
    pub fn from_outcomes(folder_path: PathBuf, outcomes: Vec<DownloadOutcome>) -> Self {
        let total_count = outcomes.len();

        let (successful, failed) = outcomes
            .into_iter()
            .partition(DownloadOutcome::is_success);

        Self {
            folder_path,
            successful,
            failed,
            total_count,
        }
    }

    pub fn empty(folder_path: PathBuf) -> Self {
        Self::from_outcomes(folder_path, Vec::new())
    }

    pub fn total_bytes(&self) -> u64 {
        self.successful
            .iter()
            .filter_map(DownloadOutcome::size_bytes)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DownloadOutcome, DownloadReport};

    #[test]
    fn test_partition_keeps_completion_order() {
        let outcomes = vec![
            DownloadOutcome::succeeded("https://x/b.png", "b.png".to_string(), 3),
            DownloadOutcome::failed("https://x/bad.png", "HTTP status 404"),
            DownloadOutcome::succeeded("https://x/a.png", "a.png".to_string(), 4),
        ];

        let report = DownloadReport::from_outcomes(PathBuf::from("scrap/scrapping1"), outcomes);

        assert_eq!(report.total_count, 3);
        assert_eq!(report.successful.len(), 2);
        assert_eq!(report.successful[0].url(), "https://x/b.png");
        assert_eq!(report.successful[1].url(), "https://x/a.png");
        assert_eq!(report.failed[0].error(), Some("HTTP status 404"));
        assert_eq!(report.total_bytes(), 7);
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let outcome = DownloadOutcome::failed("https://x/bad.png", "boom");

        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["url"], "https://x/bad.png");
        assert_eq!(json["error"], "boom");
    }
}
