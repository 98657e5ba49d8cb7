use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::ScrapeError;

const FOLDER_PREFIX: &str = "scrapping";

/// Allocates `<root>/scrapping<N>` for the lowest `N >= 1` that does not
/// exist yet, creating `root` if needed.
///
/// The scan is not atomic across processes. When the final create finds the
/// folder already present the scan moves on to the next number instead of
/// reusing it.
pub fn next_output_folder(root: &Path) -> Result<PathBuf, ScrapeError> {
    fs::create_dir_all(root).map_err(|source| ScrapeError::OutputFolder {
        path: root.to_path_buf(),
        source,
    })?;

    let mut counter: u64 = 1;

    loop {
        let candidate = root.join(format!("{FOLDER_PREFIX}{counter}"));

        if candidate.exists() {
            counter += 1;
            continue;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => {
                info!("Saving images to {:?}", candidate);
                return Ok(candidate);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("{:?} appeared while scanning, trying the next number", candidate);
                counter += 1;
            }
            Err(source) => {
                return Err(ScrapeError::OutputFolder {
                    path: candidate,
                    source,
                });
            }
        }
    }
}
