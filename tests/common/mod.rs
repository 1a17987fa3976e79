#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use ideogram_mcp::config::{FileLimits, RequestConfig};
use ideogram_mcp::services::api_client::{IdeogramClient, ImageSource, OperationResult};
use ideogram_mcp::services::file_manager::FileManager;
use ideogram_mcp::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Serializes tests that touch process environment variables.
pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const TEST_API_KEY: &str = "test-key-123456";

pub fn quiet_logger() -> Logger {
    let mut logger = Logger::new("test");
    logger.set_level(LogLevel::Error);
    logger
}

pub fn client_for(base_url: &str) -> Arc<IdeogramClient> {
    let config = RequestConfig {
        api_key: TEST_API_KEY.to_string(),
        base_url: base_url.trim_end_matches('/').to_string(),
    };
    Arc::new(IdeogramClient::new(config, &quiet_logger()).expect("client"))
}

struct Canned {
    result: OperationResult<Bytes>,
    delay: Duration,
}

/// In-memory image source: fixed answers per URL, optional per-URL delay,
/// and a record of the highest number of fetches in flight at once.
#[derive(Default)]
pub struct StubSource {
    answers: HashMap<String, Canned>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, url: &str, body: &[u8]) -> Self {
        self.answers.insert(
            url.to_string(),
            Canned {
                result: OperationResult::success(Bytes::copy_from_slice(body)),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn fail(mut self, url: &str, reason: &str) -> Self {
        self.answers.insert(
            url.to_string(),
            Canned {
                result: OperationResult::failure(reason),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn delayed(mut self, url: &str, delay: Duration) -> Self {
        if let Some(canned) = self.answers.get_mut(url) {
            canned.delay = delay;
        }
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for StubSource {
    async fn fetch(&self, url: &str) -> OperationResult<Bytes> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let answer = self.answers.get(url);
        if let Some(delay) = answer.map(|c| c.delay).filter(|d| !d.is_zero()) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        answer
            .map(|c| c.result.clone())
            .unwrap_or_else(|| OperationResult::failure("HTTP 404 Not Found"))
    }
}

pub fn file_manager(source: Arc<dyn ImageSource>, limits: FileLimits) -> FileManager {
    FileManager::new(&quiet_logger(), source, limits)
}

pub fn limits(max_file_bytes: u64, download_concurrency: usize) -> FileLimits {
    FileLimits {
        max_file_bytes,
        download_concurrency,
    }
}
