//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `huginn_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `status`: outcome: "ok", "error", or "present" (already on disk)
//! - `operation`: what was retried (e.g. "download")

/// Files handled by the transfer client.
///
/// Labels: `status` ("ok" | "error" | "present").
pub const DOWNLOADS_TOTAL: &str = "huginn_downloads_total";

/// Bytes written to disk by the transfer client.
pub const DOWNLOAD_BYTES_TOTAL: &str = "huginn_download_bytes_total";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `operation`.
pub const RETRIES_TOTAL: &str = "huginn_retries_total";

/// Tree listing calls.
///
/// Labels: `status` ("ok" | "error").
pub const LISTINGS_TOTAL: &str = "huginn_listings_total";

/// Repositories wiped and re-downloaded after a failed load.
pub const CACHE_HEALS_TOTAL: &str = "huginn_cache_heals_total";
