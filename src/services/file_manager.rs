use crate::config::FileLimits;
use crate::constants::files::{
    ALLOWED_EXTENSIONS, CLEANUP_MAX_AGE_MS, DEFAULT_EXTENSION, FILENAME_PREFIX,
};
use crate::services::api_client::{ImageSource, OperationResult};
use crate::services::logger::Logger;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::io::AsyncWriteExt;
use url::Url;

static LAST_STAMP: AtomicI64 = AtomicI64::new(0);

/// Millisecond stamp that never repeats inside one process, even when two
/// batches start within the same millisecond.
pub fn next_stamp() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut previous = LAST_STAMP.load(Ordering::SeqCst);
    loop {
        let candidate = now.max(previous + 1);
        match LAST_STAMP.compare_exchange(previous, candidate, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => return candidate,
            Err(actual) => previous = actual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadItem {
    pub source_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub succeeded: bool,
}

impl DownloadItem {
    fn ok(source_url: &str, path: PathBuf, size: u64) -> Self {
        Self {
            source_url: source_url.to_string(),
            destination_path: Some(path),
            byte_size: Some(size),
            failure_reason: None,
            succeeded: true,
        }
    }

    fn failed(source_url: &str, reason: impl Into<String>) -> Self {
        Self {
            source_url: source_url.to_string(),
            destination_path: None,
            byte_size: None,
            failure_reason: Some(reason.into()),
            succeeded: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadCounts {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchDownloadReport {
    pub overall_succeeded: bool,
    pub items: Vec<DownloadItem>,
    pub counts: DownloadCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl BatchDownloadReport {
    fn aborted(reason: String) -> Self {
        Self {
            overall_succeeded: false,
            items: Vec::new(),
            counts: DownloadCounts::default(),
            failure_reason: Some(reason),
        }
    }

    fn from_items(items: Vec<DownloadItem>) -> Self {
        let total = items.len();
        let succeeded = items.iter().filter(|item| item.succeeded).count();
        let failed = total - succeeded;
        Self {
            overall_succeeded: succeeded > 0,
            counts: DownloadCounts {
                total,
                succeeded,
                failed,
            },
            failure_reason: (total > 0 && failed == total)
                .then(|| "All downloads failed".to_string()),
            items,
        }
    }
}

pub struct FileManager {
    logger: Logger,
    source: Arc<dyn ImageSource>,
    limits: FileLimits,
}

impl FileManager {
    pub fn new(logger: &Logger, source: Arc<dyn ImageSource>, limits: FileLimits) -> Self {
        Self {
            logger: logger.child("files"),
            source,
            limits,
        }
    }

    pub fn limits(&self) -> FileLimits {
        self.limits
    }

    pub async fn download_images(&self, urls: &[String], destination: &Path) -> BatchDownloadReport {
        if let Err(err) = tokio::fs::create_dir_all(destination).await {
            let reason = format!("Failed to create output directory: {}", err);
            self.logger.warn(
                &reason,
                Some(&serde_json::json!({ "dir": destination.display().to_string() })),
            );
            return BatchDownloadReport::aborted(reason);
        }

        let stamp = next_stamp();
        let items: Vec<DownloadItem> = stream::iter(urls.iter().cloned().enumerate())
            .map(|(index, url)| async move {
                self.download_one(index, &url, destination, stamp).await
            })
            .buffered(self.limits.download_concurrency.max(1))
            .collect()
            .await;

        let report = BatchDownloadReport::from_items(items);
        self.logger.info(
            "Batch download finished",
            Some(&serde_json::to_value(report.counts).unwrap_or_default()),
        );
        report
    }

    async fn download_one(&self, index: usize, url: &str, dir: &Path, stamp: i64) -> DownloadItem {
        let path = dir.join(generate_filename(url, index, stamp));

        let body = match self.source.fetch(url).await {
            OperationResult::Success { value, .. } => value,
            OperationResult::Failure { reason, .. } => {
                self.logger
                    .debug("Download failed", Some(&serde_json::json!({ "url": url, "reason": reason })));
                return DownloadItem::failed(url, reason);
            }
        };

        let expected = body.len() as u64;
        if expected > self.limits.max_file_bytes {
            return DownloadItem::failed(url, too_large(expected, self.limits.max_file_bytes));
        }

        if let Err(err) = write_new_file(&path, &body).await {
            return DownloadItem::failed(url, err.to_string());
        }

        verify_written(url, path, expected).await
    }

    pub async fn read_image_file(&self, raw_path: &str) -> OperationResult<Vec<u8>> {
        let path = expand_home(raw_path);
        let ext = extension_of(&path);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            let shown = if ext.is_empty() { "(none)" } else { ext.as_str() };
            return OperationResult::failure(format!(
                "Unsupported file type: {}. Allowed: {}",
                shown,
                ALLOWED_EXTENSIONS.join(", ")
            ));
        }

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta,
            _ => return OperationResult::failure(format!("File not found: {}", raw_path)),
        };
        if meta.len() > self.limits.max_file_bytes {
            return OperationResult::failure(too_large(meta.len(), self.limits.max_file_bytes));
        }

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(err) => return OperationResult::failure(err.to_string()),
        };
        if data.is_empty() {
            return OperationResult::failure("File is empty");
        }
        if data.len() as u64 > self.limits.max_file_bytes {
            return OperationResult::failure(too_large(data.len() as u64, self.limits.max_file_bytes));
        }
        OperationResult::success(data)
    }

    /// Removes regular files in `dir` last modified more than `max_age` ago
    /// (24 hours when `None`). Errors are swallowed; the return value is the
    /// number of files removed.
    pub async fn cleanup_old_files(&self, dir: &Path, max_age: Option<Duration>) -> usize {
        let max_age = max_age.unwrap_or(Duration::from_millis(CLEANUP_MAX_AGE_MS));
        let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
            return 0;
        };
        let now = SystemTime::now();
        let mut removed = 0;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            let expired = meta
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age);
            if expired && tokio::fs::remove_file(entry.path()).await.is_ok() {
                removed += 1;
            }
        }
        if removed > 0 {
            self.logger.info(
                "Removed old files",
                Some(&serde_json::json!({ "dir": dir.display().to_string(), "removed": removed })),
            );
        }
        removed
    }
}

async fn write_new_file(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(body).await?;
    file.flush().await?;
    file.sync_all().await
}

fn too_large(size: u64, max: u64) -> String {
    format!("File too large: {} bytes (max: {})", size, max)
}

/// Lowercased extension with its leading dot, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

pub fn generate_filename(url: &str, index: usize, stamp: i64) -> String {
    let ext = Url::parse(url)
        .ok()
        .map(|parsed| extension_of(Path::new(parsed.path())))
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    format!("{}_{}_{}{}", FILENAME_PREFIX, index, stamp, ext)
}

pub fn mime_type_for(path: &Path) -> &'static str {
    match extension_of(path).as_str() {
        ".png" => "image/png",
        ".webp" => "image/webp",
        ".gif" => "image/gif",
        _ => "image/jpeg",
    }
}

/// Re-stats a freshly written file. A length mismatch fails the item but
/// leaves the file on disk.
async fn verify_written(url: &str, path: PathBuf, expected: u64) -> DownloadItem {
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.len() == expected => DownloadItem::ok(url, path, expected),
        Ok(meta) => DownloadItem::failed(
            url,
            format!(
                "File write validation failed: wrote {} of {} bytes",
                meta.len(),
                expected
            ),
        ),
        Err(err) => DownloadItem::failed(url, err.to_string()),
    }
}

pub fn expand_home(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(trimmed)
}
