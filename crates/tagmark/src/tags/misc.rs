//! `time`, `debug` and the optional raw template tag.

use sha2::{Digest, Sha256};

use crate::context::Binding;
use crate::error::TagResult;
use crate::format::escape_html;

/// `<ion:time />`: a cache-busting token that changes every second.
pub fn time(_b: &mut Binding<'_>) -> TagResult {
    Ok(cache_token(chrono::Utc::now().timestamp()))
}

/// Hex token derived from a Unix timestamp.
pub fn cache_token(timestamp: i64) -> String {
    let digest = Sha256::digest(timestamp.to_string().as_bytes());
    let mut token = hex::encode(digest);
    token.truncate(32);
    token
}

/// `<ion:debug name="page" />` dumps a local value as pretty JSON.
pub fn debug(b: &mut Binding<'_>) -> TagResult {
    let Some(name) = b.attr_non_empty("name") else {
        return Ok(String::new());
    };
    let Some(value) = b.locals().get(name) else {
        return Ok(String::new());
    };

    tracing::debug!(local = name, value = %value, "Local dump");
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    Ok(format!("<pre class=\"tag-debug\">{}</pre>", escape_html(&pretty)))
}

/// `<ion:php>...</ion:php>`: renders the expanded body as a MiniJinja
/// template against the globals.
#[cfg(feature = "raw-tag")]
pub fn raw(b: &mut Binding<'_>) -> TagResult {
    use crate::error::TagError;

    let source = b.expand()?;
    let data = b.globals().to_value();
    minijinja::Environment::new()
        .render_str(&source, data)
        .map_err(|e| TagError::Raw(e.to_string()))
}
