//! How the finished PDF reaches the user. Desktop browsers get a download;
//! mobile browsers get the PDF inline so it opens in a new tab and can be
//! saved from there.

use crate::config::DEFAULT_MOBILE_UA_PATTERN;
use axum::http::{header, HeaderMap, HeaderValue};
use regex::{Regex, RegexBuilder};
use tracing::warn;

pub trait Delivery: Send + Sync {
    fn name(&self) -> &'static str;
    /// `Content-Disposition` type: `attachment` or `inline`.
    fn disposition_type(&self) -> &'static str;

    fn headers(&self, filename: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
        let value = content_disposition(self.disposition_type(), filename);
        match HeaderValue::from_str(&value) {
            Ok(v) => { headers.insert(header::CONTENT_DISPOSITION, v); }
            Err(e) => warn!("Dropping Content-Disposition {:?}: {}", value, e),
        }
        headers
    }
}

/// Desktop: the browser saves the file straight away.
pub struct Download;

impl Delivery for Download {
    fn name(&self) -> &'static str { "download" }
    fn disposition_type(&self) -> &'static str { "attachment" }
}

/// Mobile: the PDF opens in a tab for manual saving.
pub struct OpenInTab;

impl Delivery for OpenInTab {
    fn name(&self) -> &'static str { "open-in-tab" }
    fn disposition_type(&self) -> &'static str { "inline" }
}

/// ASCII `filename=` for old clients plus the exact name as RFC 5987 `filename*`.
fn content_disposition(kind: &str, filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' { c } else { '_' })
        .collect();
    format!("{kind}; filename=\"{fallback}\"; filename*=UTF-8''{}", urlencoding::encode(filename))
}

pub struct PlatformDetector {
    mobile: Option<Regex>,
}

impl PlatformDetector {
    /// Falls back to the default pattern when `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Self {
        let build = |p: &str| RegexBuilder::new(p).case_insensitive(true).build();
        let mobile = build(pattern).or_else(|e| {
            warn!("Invalid mobile user-agent pattern {:?} ({}), using default", pattern, e);
            build(DEFAULT_MOBILE_UA_PATTERN)
        });
        Self { mobile: mobile.ok() }
    }

    pub fn is_mobile(&self, user_agent: Option<&str>) -> bool {
        match (&self.mobile, user_agent) {
            (Some(re), Some(ua)) => re.is_match(ua),
            _ => false,
        }
    }

    pub fn delivery(&self, user_agent: Option<&str>) -> &'static dyn Delivery {
        if self.is_mobile(user_agent) { &OpenInTab } else { &Download }
    }
}

impl Default for PlatformDetector {
    fn default() -> Self { Self::new(DEFAULT_MOBILE_UA_PATTERN) }
}
