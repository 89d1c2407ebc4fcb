//! Response content validation.
//!
//! Hubs and the proxies in front of them sometimes answer a file request with
//! an HTML page and a 2xx status (outage banners, login walls, CDN error
//! pages). Size and status alone cannot catch that, so every download is
//! sniffed before its bytes are written.

use crate::{HuginnError, Result};

/// Number of leading body bytes inspected for an HTML signature.
pub const SNIFF_LEN: usize = 128;

/// Number of leading body bytes kept as a diagnostic snippet.
pub const SNIPPET_LEN: usize = 256;

/// Check a response before any of its body is persisted.
///
/// `body_prefix` should hold at least [`SNIPPET_LEN`] bytes when the body is
/// that long, so that a rejection carries a useful snippet.
pub fn validate(status: u16, content_type: Option<&str>, body_prefix: &[u8]) -> Result<()> {
    match status {
        429 | 503 => return Err(HuginnError::RateLimited { status }),
        401 | 403 => return Err(HuginnError::Unauthorized { status }),
        200..=299 => {}
        _ => return Err(HuginnError::InvalidResponse(format!("HTTP {status}"))),
    }

    if content_type.is_some_and(is_html_mime) || looks_like_html(body_prefix) {
        return Err(HuginnError::UnexpectedContent {
            snippet: snippet(body_prefix),
        });
    }

    if body_prefix.is_empty() {
        return Err(HuginnError::InvalidResponse("empty response body".to_string()));
    }

    Ok(())
}

/// `text/html`, ignoring case, surrounding whitespace and parameters.
fn is_html_mime(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
}

/// First [`SNIFF_LEN`] bytes start with an HTML document marker.
pub fn looks_like_html(body_prefix: &[u8]) -> bool {
    let head = &body_prefix[..body_prefix.len().min(SNIFF_LEN)];
    let text = String::from_utf8_lossy(head).trim().to_ascii_lowercase();
    text.starts_with("<!doctype html") || text.starts_with("<html")
}

fn snippet(body_prefix: &[u8]) -> String {
    let head = &body_prefix[..body_prefix.len().min(SNIPPET_LEN)];
    String::from_utf8_lossy(head)
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
