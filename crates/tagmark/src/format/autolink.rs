//! Turns bare URLs and e-mail addresses into links.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?P<lead>^|[\s(])(?:(?P<url>(?:[a-z][a-z0-9+.\-]*://|www\.)[^\s()<>;"']+[\w/#=])|(?P<email>[\w.+\-]+@[a-z0-9\-]+(?:\.[a-z0-9\-]+)+))"#,
    )
    .expect("link pattern is valid")
});

/// Links every URL and e-mail address in `text`.
///
/// Only addresses at the start of the text or after whitespace or `(` are
/// linked, so markup such as `href="http://..."` is left alone. URLs open in
/// a new window; `www.` addresses get an `http://` scheme.
pub fn auto_link(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let lead = caps.name("lead").map_or("", |m| m.as_str());
            let link = if let Some(url) = caps.name("url") {
                let url = url.as_str();
                let href = if url.to_ascii_lowercase().starts_with("www.") {
                    format!("http://{}", url)
                } else {
                    url.to_string()
                };
                format!("<a href=\"{}\" target=\"_blank\">{}</a>", href, url)
            } else if let Some(email) = caps.name("email") {
                let email = email.as_str();
                format!("<a href=\"mailto:{}\">{}</a>", email, email)
            } else {
                return caps[0].to_string();
            };
            format!("{}{}", lead, link)
        })
        .into_owned()
}
