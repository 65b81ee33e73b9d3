//! Namespaced tag parser for CMS page templates.
//!
//! This crate parses `<ion:tag attr="value">content</ion:tag>` style markup
//! into a tree of [`Node`]s. Everything that is not a namespaced tag is kept
//! as text, so ordinary HTML passes through untouched.
//!
//! # Example
//!
//! ```rust
//! use tagmark_parser::{Node, TagParser};
//!
//! let parser = TagParser::new("ion");
//! let nodes = parser.parse(r#"<h1><ion:field from="page" name="title" /></h1>"#);
//!
//! assert_eq!(nodes.len(), 3);
//! match &nodes[1] {
//!     Node::Tag(tag) => {
//!         assert_eq!(tag.name, "field");
//!         assert_eq!(tag.attributes.get("name"), Some("title"));
//!         assert!(tag.self_closing);
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! # Tag Name Syntax
//!
//! A tag name is one or more segments joined by `:`. Each segment follows
//! CSS identifier rules:
//! - Starts with a lowercase letter (`a-z`) or underscore (`_`)
//! - Followed by lowercase letters, digits (`0-9`), underscores, or hyphens (`-`)
//!
//! Pattern: `[a-z_][a-z0-9_-]*(:[a-z_][a-z0-9_-]*)*`
//!
//! Multi-segment names are how module tags are written: `<ion:gallery:photos />`.
//!
//! # Leniency
//!
//! The parser never fails:
//! - Malformed tags (bad name, unterminated quote, missing `>`) are literal text
//! - A close tag with no open tag is literal text
//! - An open tag with no matching close tag becomes a tag without a body
//! - Overlapping tags close the inner tags when the outer one closes

use std::fmt;

/// Ordered attribute list, as written in the template.
///
/// Order matters: some tags pass attribute values positionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Creates an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Returns the value of the named attribute, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the value only when the attribute is present and non-empty.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Returns true if the attribute is present, even with an empty value.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Iterates `(name, value)` pairs in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Iterates values in template order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// A parsed template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, including any non-namespaced markup.
    Text(String),
    /// A namespaced tag.
    Tag(TagNode),
}

impl Node {
    /// Rebuilds the original source text of this node.
    pub fn source(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Tag(tag) => tag.source(),
        }
    }
}

/// A namespaced tag with its attributes and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    /// Tag selector without the namespace prefix (e.g. `field`, `gallery:photos`).
    pub name: String,
    /// Attributes in template order.
    pub attributes: Attributes,
    /// Body nodes. Empty for self-closing tags.
    pub children: Vec<Node>,
    /// True when written as `<ion:name ... />`.
    pub self_closing: bool,
    /// The opening tag exactly as written.
    pub open_raw: String,
    /// The closing tag exactly as written, if one was matched.
    pub close_raw: Option<String>,
}

impl TagNode {
    /// Rebuilds the original source text of the tag, body included.
    pub fn source(&self) -> String {
        let mut out = self.open_raw.clone();
        out.push_str(&self.body_source());
        if let Some(close) = &self.close_raw {
            out.push_str(close);
        }
        out
    }

    /// Rebuilds the source text of the body only.
    pub fn body_source(&self) -> String {
        self.children.iter().map(Node::source).collect()
    }
}

impl fmt::Display for TagNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source())
    }
}

/// Parser for namespaced tags.
///
/// The prefix is the namespace written before the colon: with prefix `ion`,
/// the parser recognizes `<ion:...>` and `</ion:...>`.
#[derive(Debug, Clone)]
pub struct TagParser {
    prefix: String,
    open_marker: String,
    close_marker: String,
}

impl Default for TagParser {
    fn default() -> Self {
        Self::new("ion")
    }
}

impl TagParser {
    /// Creates a parser for the given namespace prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            open_marker: format!("<{}:", prefix),
            close_marker: format!("</{}:", prefix),
            prefix,
        }
    }

    /// Returns the namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Parses the input into a node tree.
    pub fn parse(&self, input: &str) -> Vec<Node> {
        let tokens = Tokenizer::new(input, &self.open_marker, &self.close_marker)
            .collect::<Vec<_>>();
        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Text(text) | Token::InvalidTag(text) => {
                    push_text(current_children(&mut root, &mut stack), text);
                }
                Token::OpenTag {
                    name,
                    attrs,
                    self_closing,
                    raw,
                } => {
                    let attributes: Attributes = attrs.iter().copied().collect();
                    if !*self_closing && has_matching_close(&tokens[i + 1..], name) {
                        stack.push(Frame {
                            name: *name,
                            attributes,
                            open_raw: *raw,
                            children: Vec::new(),
                        });
                    } else {
                        current_children(&mut root, &mut stack).push(Node::Tag(TagNode {
                            name: name.to_string(),
                            attributes,
                            children: Vec::new(),
                            self_closing: *self_closing,
                            open_raw: raw.to_string(),
                            close_raw: None,
                        }));
                    }
                }
                Token::CloseTag { name, raw } => {
                    if stack.last().map(|f| f.name) == Some(*name) {
                        close_top(&mut root, &mut stack, Some(*raw));
                    } else if stack.iter().any(|f| f.name == *name) {
                        // Mismatched nesting - close everything up to and including this one
                        while let Some(top) = stack.last() {
                            if top.name == *name {
                                close_top(&mut root, &mut stack, Some(*raw));
                                break;
                            }
                            close_top(&mut root, &mut stack, None);
                        }
                    } else {
                        // Orphan close tag - treat as literal text
                        push_text(current_children(&mut root, &mut stack), raw);
                    }
                }
            }
        }

        while !stack.is_empty() {
            close_top(&mut root, &mut stack, None);
        }

        root
    }
}

/// An open tag waiting for its close tag.
struct Frame<'a> {
    name: &'a str,
    attributes: Attributes,
    open_raw: &'a str,
    children: Vec<Node>,
}

fn current_children<'s>(root: &'s mut Vec<Node>, stack: &'s mut [Frame<'_>]) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.children,
        None => root,
    }
}

fn close_top(root: &mut Vec<Node>, stack: &mut Vec<Frame<'_>>, close_raw: Option<&str>) {
    if let Some(frame) = stack.pop() {
        let node = Node::Tag(TagNode {
            name: frame.name.to_string(),
            attributes: frame.attributes,
            children: frame.children,
            self_closing: false,
            open_raw: frame.open_raw.to_string(),
            close_raw: close_raw.map(str::to_string),
        });
        current_children(root, stack).push(node);
    }
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// Checks if there's a matching close tag in the remaining tokens.
fn has_matching_close(tokens: &[Token<'_>], tag: &str) -> bool {
    let mut depth = 1;
    for token in tokens {
        match token {
            Token::OpenTag {
                name,
                self_closing: false,
                ..
            } if *name == tag => depth += 1,
            Token::CloseTag { name, .. } if *name == tag => {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Plain text content.
    Text(&'a str),
    /// Opening tag: `<ion:name a="b">` or `<ion:name a="b" />`
    OpenTag {
        name: &'a str,
        attrs: Vec<(&'a str, &'a str)>,
        self_closing: bool,
        raw: &'a str,
    },
    /// Closing tag: `</ion:name>`
    CloseTag { name: &'a str, raw: &'a str },
    /// Invalid tag syntax (passed through as text).
    InvalidTag(&'a str),
}

/// Tokenizer for namespaced tags.
struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    open_marker: &'a str,
    close_marker: &'a str,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str, open_marker: &'a str, close_marker: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            open_marker,
            close_marker,
        }
    }

    /// Checks if a string is a valid tag name (colon-joined CSS identifiers).
    fn is_valid_tag_name(s: &str) -> bool {
        !s.is_empty() && s.split(':').all(Self::is_valid_segment)
    }

    fn is_valid_segment(s: &str) -> bool {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() || first == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    }

    /// Finds the next byte offset in `remaining` where a tag marker starts.
    fn find_marker(&self, remaining: &str) -> Option<usize> {
        let mut offset = 0;
        while let Some(idx) = remaining[offset..].find('<') {
            let at = offset + idx;
            let rest = &remaining[at..];
            if rest.starts_with(self.open_marker) || rest.starts_with(self.close_marker) {
                return Some(at);
            }
            offset = at + 1;
        }
        None
    }

    /// Parses a close tag at the start of `remaining`.
    fn close_tag(&mut self, remaining: &'a str) -> Token<'a> {
        match remaining.find('>') {
            Some(end) => {
                let raw = &remaining[..=end];
                let name = remaining[self.close_marker.len()..end].trim();
                self.pos += end + 1;
                if Self::is_valid_tag_name(name) {
                    Token::CloseTag { name, raw }
                } else {
                    Token::InvalidTag(raw)
                }
            }
            None => self.literal_lt(remaining),
        }
    }

    /// Parses an open tag at the start of `remaining`.
    fn open_tag(&mut self, remaining: &'a str) -> Token<'a> {
        let body = &remaining[self.open_marker.len()..];
        let name_len = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')))
            .unwrap_or(body.len());
        let name = &body[..name_len];
        if !Self::is_valid_tag_name(name) {
            return self.literal_lt(remaining);
        }

        let mut cursor = self.open_marker.len() + name_len;
        let mut attrs = Vec::new();

        loop {
            let rest = &remaining[cursor..];
            let trimmed = rest.trim_start();
            cursor += rest.len() - trimmed.len();

            if trimmed.starts_with("/>") {
                let end = cursor + 2;
                self.pos += end;
                return Token::OpenTag {
                    name,
                    attrs,
                    self_closing: true,
                    raw: &remaining[..end],
                };
            }
            if trimmed.starts_with('>') {
                let end = cursor + 1;
                self.pos += end;
                return Token::OpenTag {
                    name,
                    attrs,
                    self_closing: false,
                    raw: &remaining[..end],
                };
            }

            match Self::attribute(trimmed) {
                Some((key, value, consumed)) => {
                    attrs.push((key, value));
                    cursor += consumed;
                }
                None => return self.literal_lt(remaining),
            }
        }
    }

    /// Parses one `key`, `key="v"`, `key='v'` or `key=v` attribute.
    ///
    /// Returns the key, value and number of bytes consumed.
    fn attribute(input: &'a str) -> Option<(&'a str, &'a str, usize)> {
        let key_len = input
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')))
            .unwrap_or(input.len());
        if key_len == 0 {
            return None;
        }
        let key = &input[..key_len];

        let after_key = &input[key_len..];
        let after_ws = after_key.trim_start();
        if !after_ws.starts_with('=') {
            // Bare attribute: present with an empty value
            return Some((key, "", key_len));
        }

        let eq_pos = key_len + (after_key.len() - after_ws.len());
        let value_part = &input[eq_pos + 1..];
        let value_trimmed = value_part.trim_start();
        let value_start = eq_pos + 1 + (value_part.len() - value_trimmed.len());

        match value_trimmed.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &value_trimmed[1..];
                let close = inner.find(quote)?;
                Some((key, &inner[..close], value_start + close + 2))
            }
            Some(_) => {
                // `/` belongs to the value unless it closes the tag.
                let len = value_trimmed
                    .char_indices()
                    .find(|&(i, c)| {
                        c.is_whitespace()
                            || c == '>'
                            || (c == '/' && value_trimmed[i + 1..].starts_with('>'))
                    })
                    .map_or(value_trimmed.len(), |(i, _)| i);
                if len == 0 {
                    return None;
                }
                Some((key, &value_trimmed[..len], value_start + len))
            }
            None => None,
        }
    }

    /// Emits a lone `<` as text so scanning resumes right after it.
    fn literal_lt(&mut self, remaining: &'a str) -> Token<'a> {
        self.pos += 1;
        Token::InvalidTag(&remaining[..1])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.pos..];

        match self.find_marker(remaining) {
            Some(0) => {
                if remaining.starts_with(self.close_marker) {
                    Some(self.close_tag(remaining))
                } else {
                    Some(self.open_tag(remaining))
                }
            }
            Some(marker_pos) => {
                self.pos += marker_pos;
                Some(Token::Text(&remaining[..marker_pos]))
            }
            None => {
                self.pos = self.input.len();
                Some(Token::Text(remaining))
            }
        }
    }
}
