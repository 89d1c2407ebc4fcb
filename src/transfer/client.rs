//! Resumable single-file transfers.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use super::installer::install_blocking;
use super::retry::{RetryConfig, with_retry};
use super::validator::{SNIPPET_LEN, validate};
use crate::cancel::CancellationFlag;
use crate::telemetry;
use crate::transport::{BodyStream, FetchRequest, Transport};
use crate::types::DownloadTask;
use crate::{HuginnError, Result};

/// Result of a successful [`TransferClient::download`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// The destination already held a file of the expected size.
    AlreadyPresent,
    /// The file was fetched and installed.
    Downloaded {
        /// Bytes received over the network in the final attempt.
        bytes: u64,
        /// Offset the final attempt resumed from (0 for a full download).
        resumed_from: u64,
    },
}

impl TransferOutcome {
    pub fn is_downloaded(&self) -> bool {
        matches!(self, TransferOutcome::Downloaded { .. })
    }
}

/// Downloads one file at a time through a [`Transport`], with resume,
/// content validation, retry and atomic installation.
#[derive(Clone)]
pub struct TransferClient {
    transport: Arc<dyn Transport>,
    retry: RetryConfig,
}

impl TransferClient {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryConfig) -> Self {
        Self { transport, retry }
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Fetch `task.url` into `task.destination`.
    ///
    /// Returns immediately, without touching the network, when the
    /// destination already has the expected size. Otherwise streams into
    /// `destination.download`, resuming from its current length, and moves it
    /// into place once the body is complete.
    pub async fn download(
        &self,
        task: &DownloadTask,
        cancel: &CancellationFlag,
    ) -> Result<TransferOutcome> {
        if task.is_complete() {
            debug!(path = %task.remote_path, "already downloaded, skipping");
            metrics::counter!(telemetry::DOWNLOADS_TOTAL, "status" => "present").increment(1);
            return Ok(TransferOutcome::AlreadyPresent);
        }

        info!(
            path = %task.remote_path,
            expected_size = task.expected_size,
            "downloading"
        );
        let result = with_retry(&self.retry, "download", cancel, || {
            self.attempt(task, cancel)
        })
        .await;

        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::DOWNLOADS_TOTAL, "status" => status).increment(1);
        result
    }

    async fn attempt(
        &self,
        task: &DownloadTask,
        cancel: &CancellationFlag,
    ) -> Result<TransferOutcome> {
        let temp = task.temp_path();
        if let Some(parent) = temp.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut offset = task.resume_offset();
        if task.expected_size > 0 && offset >= task.expected_size {
            if offset == task.expected_size {
                debug!(path = %task.remote_path, "partial download already complete");
                install_blocking(temp.clone(), task.destination.clone()).await?;
                return Ok(TransferOutcome::Downloaded {
                    bytes: 0,
                    resumed_from: offset,
                });
            }
            warn!(
                path = %task.remote_path,
                offset,
                expected_size = task.expected_size,
                "partial download larger than expected, discarding"
            );
            fs::remove_file(&temp).await?;
            offset = 0;
        }
        if offset > 0 {
            debug!(path = %task.remote_path, offset, "resuming partial download");
        }

        let request = FetchRequest::download(&task.url).resume_from(offset);
        let mut response = cancel.or_cancelled(self.transport.fetch(&request)).await??;

        if offset > 0 && response.status == 416 {
            remove_if_exists(&temp).await?;
            return Err(HuginnError::InvalidResponse(
                "range not satisfiable, restarting from zero".to_string(),
            ));
        }
        let resumed = offset > 0 && response.status == 206;
        if offset > 0 && !resumed && response.is_success() {
            debug!(path = %task.remote_path, "server ignored range, restarting from zero");
        }
        let start = if resumed { offset } else { 0 };

        let head = cancel
            .or_cancelled(read_prefix(&mut response.body, SNIPPET_LEN))
            .await??;
        let empty_file = head.is_empty() && task.expected_size == 0 && response.is_success();
        if !empty_file {
            validate(response.status, response.content_type.as_deref(), &head)?;
        }

        let mut file = if resumed {
            OpenOptions::new().append(true).open(&temp).await?
        } else {
            fs::File::create(&temp).await?
        };
        file.write_all(&head).await?;
        let mut written = head.len() as u64;

        while let Some(chunk) = cancel.or_cancelled(response.body.next()).await? {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        let final_size = start + written;
        if final_size != task.expected_size {
            warn!(
                path = %task.remote_path,
                expected_size = task.expected_size,
                actual_size = final_size,
                "downloaded size differs from listing"
            );
        }

        install_blocking(temp.clone(), task.destination.clone()).await?;
        metrics::counter!(telemetry::DOWNLOAD_BYTES_TOTAL).increment(written);
        debug!(path = %task.remote_path, bytes = written, resumed_from = start, "installed");

        Ok(TransferOutcome::Downloaded {
            bytes: written,
            resumed_from: start,
        })
    }
}

/// Pull chunks until at least `limit` bytes are buffered or the body ends.
async fn read_prefix(body: &mut BodyStream, limit: usize) -> Result<Vec<u8>> {
    let mut head = Vec::new();
    while head.len() < limit {
        match body.next().await {
            Some(chunk) => head.extend_from_slice(&chunk?),
            None => break,
        }
    }
    Ok(head)
}

async fn remove_if_exists(path: &std::path::Path) -> Result<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
