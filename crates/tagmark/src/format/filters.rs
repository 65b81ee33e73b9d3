//! Named value filters and helper functions.
//!
//! Two kinds of post-processing can be requested from a tag:
//!
//! - `function="trim,upper"`: a comma list of filters applied in order.
//!   Unknown names are skipped.
//! - `helper="text:word_limiter"`: one function from a helper group. An
//!   unknown helper is reported inline as a tag error.
//!
//! [`FilterRegistry::with_builtins`] provides the usual string functions.
//! Applications add their own with [`add_filter`](FilterRegistry::add_filter)
//! and [`add_helper`](FilterRegistry::add_helper).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

/// A string-to-string function.
pub type Filter = Arc<dyn Fn(&str) -> String + Send + Sync>;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));
static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w]+").expect("separator pattern is valid"));

const ELLIPSIS: &str = "&#8230;";
const WORD_LIMIT: usize = 100;
const CHARACTER_LIMIT: usize = 500;

/// Filters and helper groups available to `enclose`.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Filter>,
    helpers: HashMap<String, HashMap<String, Filter>>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in filters and helper groups.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtin_filters(&mut registry);
        register_builtin_helpers(&mut registry);
        registry
    }

    pub fn add_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn add_helper<F>(&mut self, group: impl Into<String>, name: impl Into<String>, helper: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.helpers
            .entry(group.into())
            .or_default()
            .insert(name.into(), Arc::new(helper));
    }

    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    pub fn helper(&self, group: &str, name: &str) -> Option<&Filter> {
        self.helpers.get(group)?.get(name)
    }

    /// Pipes `value` through a comma-separated filter list.
    pub fn apply_pipeline(&self, value: &str, functions: &str) -> String {
        functions
            .split(',')
            .map(str::trim)
            .filter_map(|name| self.filter(name))
            .fold(value.to_string(), |acc, filter| filter(&acc))
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut filters: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        filters.sort_unstable();
        let mut groups: Vec<&str> = self.helpers.keys().map(String::as_str).collect();
        groups.sort_unstable();
        f.debug_struct("FilterRegistry")
            .field("filters", &filters)
            .field("helpers", &groups)
            .finish()
    }
}

fn register_builtin_filters(r: &mut FilterRegistry) {
    r.add_filter("trim", |s| s.trim().to_string());
    r.add_filter("upper", str::to_uppercase);
    r.add_filter("strtoupper", str::to_uppercase);
    r.add_filter("lower", str::to_lowercase);
    r.add_filter("strtolower", str::to_lowercase);
    r.add_filter("ucfirst", ucfirst);
    r.add_filter("ucwords", ucwords);
    r.add_filter("nl2br", |s| s.replace('\n', "<br />\n"));
    r.add_filter("htmlspecialchars", escape_html);
    r.add_filter("escape", escape_html);
    r.add_filter("strip_tags", strip_tags);
    r.add_filter("urlencode", urlencode);
}

fn register_builtin_helpers(r: &mut FilterRegistry) {
    r.add_helper("text", "word_limiter", |s| word_limiter(s, WORD_LIMIT));
    r.add_helper("text", "character_limiter", |s| {
        character_limiter(s, CHARACTER_LIMIT)
    });
    r.add_helper("url", "url_title", url_title);
}

pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn ucwords(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

pub fn strip_tags(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Form-style URL encoding: spaces become `+`.
pub fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => out.push(byte as char),
            b' ' => out.push('+'),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

/// Keeps the first `limit` words, marking the cut with an ellipsis.
pub fn word_limiter(s: &str, limit: usize) -> String {
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() <= limit {
        return s.to_string();
    }
    format!("{}{}", words[..limit].join(" "), ELLIPSIS)
}

/// Cuts after the word that reaches `limit` characters.
pub fn character_limiter(s: &str, limit: usize) -> String {
    if s.chars().count() < limit {
        return s.to_string();
    }
    let words: Vec<&str> = s.split_whitespace().collect();
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word);
        if out.chars().count() >= limit && i + 1 < words.len() {
            return format!("{}{}", out, ELLIPSIS);
        }
    }
    out
}

/// Turns a title into a URL segment: tags stripped, separators collapsed to `-`.
pub fn url_title(s: &str) -> String {
    let text = strip_tags(s);
    NON_WORD_RE
        .replace_all(&text, "-")
        .trim_matches('-')
        .to_string()
}
