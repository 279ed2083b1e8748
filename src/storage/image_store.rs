use crate::state::DownloadedSet;
use crate::storage::{StorageError, StorageResult};
use crate::url::{has_allowed_extension, image_filename};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Result of a single download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The image was written to the given path
    Saved(PathBuf),

    /// The image was already saved earlier in this run; nothing was fetched
    AlreadyDownloaded,

    /// The URL does not name an allowed image; nothing was fetched
    Rejected(String),

    /// The request or the write failed; the URL stays eligible for later
    Failed(String),
}

impl DownloadOutcome {
    /// Returns true only when this call wrote the image to disk
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved(_))
    }
}

/// Writes images into a flat output directory, one file per URL basename
///
/// Downloads are single best-effort GET requests streamed straight to disk.
/// They are not retried and are not delayed. A file with the same name is
/// overwritten. The output directory must already exist.
pub struct ImageStore {
    client: Client,
    output_dir: PathBuf,
    downloaded: DownloadedSet,
}

impl ImageStore {
    /// Creates a store writing into `output_dir`
    pub fn new(client: Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            downloaded: DownloadedSet::new(),
        }
    }

    /// Images saved so far in this run
    pub fn downloaded(&self) -> &DownloadedSet {
        &self.downloaded
    }

    /// Downloads an image unless it is disallowed or already saved
    ///
    /// # Returns
    ///
    /// * `Saved(path)` - the image was streamed to `path` and recorded
    /// * `AlreadyDownloaded` - skipped without a request
    /// * `Rejected(reason)` - extension or filename not acceptable, no request
    /// * `Failed(reason)` - transport, status or write failure, not recorded
    pub async fn download(&mut self, image_url: &Url) -> DownloadOutcome {
        if !has_allowed_extension(image_url) {
            return DownloadOutcome::Rejected(format!(
                "{} does not have an allowed image extension",
                image_url
            ));
        }

        if self.downloaded.contains(image_url) {
            return DownloadOutcome::AlreadyDownloaded;
        }

        let Some(filename) = image_filename(image_url) else {
            return DownloadOutcome::Rejected(format!("{} has no usable filename", image_url));
        };
        let path = self.output_dir.join(filename);

        match self.stream_to_file(image_url, &path).await {
            Ok(()) => {
                self.downloaded.record(image_url.clone());
                DownloadOutcome::Saved(path)
            }
            Err(e) => DownloadOutcome::Failed(e.to_string()),
        }
    }

    /// Streams the image into a hidden partial file, then renames it over `path`
    ///
    /// `path` is only touched once the whole body has arrived, so a failure
    /// never disturbs an image already stored under the same name.
    async fn stream_to_file(&self, url: &Url, path: &Path) -> StorageResult<()> {
        let mut response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status(status.as_u16()));
        }

        let partial = partial_path(path);
        let written = async {
            let mut file = tokio::fs::File::create(&partial).await?;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            tokio::fs::rename(&partial, path).await?;
            Ok::<(), StorageError>(())
        }
        .await;

        if written.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        written
    }
}

/// Sibling path used while an image is still downloading
fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.part", name))
}
