//! Render context and tag bindings.
//!
//! A [`Context`] is one render pass: it owns the tag table, the global scope
//! and the else-pending frames. Every tag found in the markup is dispatched to
//! its [`TagHandler`] with a [`Binding`], the handler's view of the invocation:
//!
//! - the tag's name and attributes
//! - a local [`Scope`] copied from the enclosing tag, so writes only reach this
//!   tag's body
//! - the render-wide [`Globals`]
//! - the [`Services`] bundle
//! - [`expand`](Binding::expand) to render the body and
//!   [`parse_as_nested`](Binding::parse_as_nested) to render other markup
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tagmark::{Context, Services};
//! use tagmark::services::{MemoryTheme, SiteConfig};
//!
//! let site = Arc::new(SiteConfig::from_yaml("theme: demo").unwrap());
//! let services = Services::new(site, Arc::new(MemoryTheme::new("demo")));
//!
//! let mut ctx = Context::new(services);
//! ctx.tag("shout", |b| Ok(b.expand()?.to_uppercase()));
//!
//! let out = ctx.render("<p><ion:shout>hello</ion:shout></p>").unwrap();
//! assert_eq!(out, "<p>HELLO</p>");
//! ```
//!
//! # Else frames
//!
//! Every body expansion opens a frame holding an else-pending counter. A
//! failed `if` increments the counter of the frame it sits in and an `else`
//! consumes from that same frame, so an `else` only pairs with `if` tags among
//! its siblings. Nested blocks never see each other's pending state.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tagmark_parser::{Attributes, Node, TagNode, TagParser};

use crate::error::{RenderError, TagError, TagResult};
use crate::options::{TagOptions, UnknownTagBehavior};
use crate::pages;
use crate::services::Services;
use crate::value::{Globals, Scope};

/// A tag callback.
pub type TagHandler = Arc<dyn Fn(&mut Binding<'_>) -> TagResult + Send + Sync>;

/// Wraps a closure or function as a [`TagHandler`].
pub fn handler<F>(f: F) -> TagHandler
where
    F: Fn(&mut Binding<'_>) -> TagResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// State of one render pass.
pub struct Context {
    tags: HashMap<String, TagHandler>,
    globals: Globals,
    services: Services,
    parser: TagParser,
    else_frames: Vec<usize>,
    depth: usize,
}

impl Context {
    /// Creates an empty context: no tags, no globals.
    ///
    /// Use [`Context::bound`] for a context ready to render site templates.
    pub fn new(services: Services) -> Self {
        let parser = TagParser::new(services.options.prefix.clone());
        Self {
            tags: HashMap::new(),
            globals: Globals::new(),
            services,
            parser,
            else_frames: Vec::new(),
            depth: 0,
        }
    }

    /// Attaches a handler to a selector, replacing any previous one.
    pub fn define_tag(&mut self, selector: impl Into<String>, handler: TagHandler) {
        let selector = selector.into();
        if self.tags.insert(selector.clone(), handler).is_some() {
            tracing::debug!(%selector, "Tag redefined");
        }
    }

    /// Closure form of [`define_tag`](Self::define_tag).
    pub fn tag<F>(&mut self, selector: impl Into<String>, f: F)
    where
        F: Fn(&mut Binding<'_>) -> TagResult + Send + Sync + 'static,
    {
        self.define_tag(selector, Arc::new(f));
    }

    pub fn has_tag(&self, selector: &str) -> bool {
        self.tags.contains_key(selector)
    }

    /// All defined selectors, sorted.
    pub fn selectors(&self) -> Vec<&str> {
        let mut selectors: Vec<&str> = self.tags.keys().map(String::as_str).collect();
        selectors.sort_unstable();
        selectors
    }

    pub fn globals(&self) -> &Globals {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.globals
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn options(&self) -> &TagOptions {
        &self.services.options
    }

    /// Pending else count of the innermost open frame (0 between renders).
    pub fn pending_else(&self) -> usize {
        self.else_frames.last().copied().unwrap_or(0)
    }

    /// Renders markup with empty locals.
    pub fn render(&mut self, template: &str) -> Result<String, RenderError> {
        self.render_with_locals(template, &Scope::new())
    }

    /// Renders markup with the given locals (typically the current `page`).
    pub fn render_with_locals(
        &mut self,
        template: &str,
        locals: &Scope,
    ) -> Result<String, RenderError> {
        let nodes = self.parser.parse(template);
        Ok(self.expand_nodes(&nodes, locals)?)
    }

    fn expand_nodes(&mut self, nodes: &[Node], locals: &Scope) -> TagResult {
        let max_depth = self.services.options.max_depth;
        if self.depth >= max_depth {
            return Err(TagError::RecursionLimit(max_depth));
        }

        self.depth += 1;
        self.else_frames.push(0);
        let result = self.render_nodes(nodes, locals);
        self.else_frames.pop();
        self.depth -= 1;
        result
    }

    fn render_nodes(&mut self, nodes: &[Node], locals: &Scope) -> TagResult {
        let mut out = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Tag(tag) => out.push_str(&self.render_tag(tag, locals)?),
            }
        }
        Ok(out)
    }

    fn render_tag(&mut self, tag: &TagNode, locals: &Scope) -> TagResult {
        let Some(handler) = self.tags.get(&tag.name).cloned() else {
            return self.render_unknown(tag, locals);
        };

        tracing::debug!(tag = %tag.name, "Dispatching tag");
        let mut binding = Binding {
            ctx: self,
            tag,
            locals: locals.clone(),
        };
        handler(&mut binding)
    }

    fn render_unknown(&mut self, tag: &TagNode, locals: &Scope) -> TagResult {
        let body = self.expand_nodes(&tag.children, locals)?;
        Ok(match &self.services.options.unknown_tags {
            UnknownTagBehavior::Passthrough => format!(
                "{}{}{}",
                tag.open_raw,
                body,
                tag.close_raw.as_deref().unwrap_or("")
            ),
            UnknownTagBehavior::Strip => body,
            UnknownTagBehavior::Indicate(marker) => format!("{}{}", marker, body),
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("tags", &self.selectors())
            .field("globals", &self.globals)
            .field("services", &self.services)
            .field("depth", &self.depth)
            .finish()
    }
}

/// A tag invocation, as seen by its handler.
pub struct Binding<'a> {
    ctx: &'a mut Context,
    tag: &'a TagNode,
    locals: Scope,
}

impl<'a> Binding<'a> {
    /// Selector the tag was written with (`field`, `gallery:photos`).
    pub fn name(&self) -> &str {
        &self.tag.name
    }

    pub fn node(&self) -> &TagNode {
        self.tag
    }

    pub fn attrs(&self) -> &Attributes {
        &self.tag.attributes
    }

    /// Attribute value, including empty values.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.tag.attributes.get(name)
    }

    /// Attribute value when present and non-empty.
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.tag.attributes.get_non_empty(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.tag.attributes.contains(name)
    }

    pub fn locals(&self) -> &Scope {
        &self.locals
    }

    /// Local scope of this tag. Changes are visible to the body only.
    pub fn locals_mut(&mut self) -> &mut Scope {
        &mut self.locals
    }

    pub fn globals(&self) -> &Globals {
        &self.ctx.globals
    }

    pub fn globals_mut(&mut self) -> &mut Globals {
        &mut self.ctx.globals
    }

    pub fn services(&self) -> &Services {
        &self.ctx.services
    }

    /// Page record rendered for `name`; see [`pages::current_page`].
    pub fn current_page(&self, name: &str) -> Option<&Map<String, Value>> {
        pages::current_page(&self.ctx.globals, name)
    }

    pub fn options(&self) -> &TagOptions {
        &self.ctx.services.options
    }

    /// Renders the tag body with this tag's locals.
    pub fn expand(&mut self) -> TagResult {
        self.ctx.expand_nodes(&self.tag.children, &self.locals)
    }

    /// Renders arbitrary markup as if it were this tag's body.
    pub fn parse_as_nested(&mut self, source: &str) -> TagResult {
        let nodes = self.ctx.parser.parse(source);
        self.ctx.expand_nodes(&nodes, &self.locals)
    }

    /// Pending else count of the frame this tag sits in.
    pub fn pending_else(&self) -> usize {
        self.ctx.pending_else()
    }

    /// Records a failed `if` in the current frame.
    pub fn defer_else(&mut self) {
        if let Some(count) = self.ctx.else_frames.last_mut() {
            *count += 1;
        }
    }

    /// Consumes one pending else from the current frame.
    ///
    /// Returns false when nothing is pending; the count never goes negative.
    pub fn take_else(&mut self) -> bool {
        match self.ctx.else_frames.last_mut() {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MemoryTheme, SiteConfig};
    use serde_json::json;

    fn context() -> Context {
        let site = Arc::new(SiteConfig::from_yaml("theme: demo").unwrap());
        Context::new(Services::new(site, Arc::new(MemoryTheme::new("demo"))))
    }

    fn context_with(options: TagOptions) -> Context {
        let site = Arc::new(SiteConfig::from_yaml("theme: demo").unwrap());
        Context::new(
            Services::new(site, Arc::new(MemoryTheme::new("demo"))).with_options(options),
        )
    }

    #[test]
    fn text_passes_through() {
        let mut ctx = context();
        assert_eq!(ctx.render("<p>plain</p>").unwrap(), "<p>plain</p>");
    }

    #[test]
    fn dispatches_to_handler() {
        let mut ctx = context();
        ctx.tag("hello", |b| Ok(format!("Hello {}", b.attr("who").unwrap_or("?"))));
        assert_eq!(ctx.render("<ion:hello who=\"you\"/>!").unwrap(), "Hello you!");
    }

    #[test]
    fn later_definition_wins() {
        let mut ctx = context();
        ctx.tag("t", |_| Ok("first".into()));
        ctx.tag("t", |_| Ok("second".into()));
        assert_eq!(ctx.render("<ion:t/>").unwrap(), "second");
    }

    #[test]
    fn locals_do_not_leak_to_siblings() {
        let mut ctx = context();
        ctx.tag("with", |b| {
            let value = b.attr("value").unwrap_or_default().to_string();
            b.locals_mut().set("x", json!(value));
            b.expand()
        });
        ctx.tag("x", |b| {
            Ok(b.locals().get("x").and_then(|v| v.as_str()).unwrap_or("-").to_string())
        });
        let out = ctx
            .render("<ion:with value=\"1\"><ion:x/></ion:with><ion:x/>")
            .unwrap();
        assert_eq!(out, "1-");
    }

    #[test]
    fn render_with_locals_exposes_page() {
        let mut ctx = context();
        ctx.tag("title", |b| {
            Ok(b.locals()
                .record("page")
                .and_then(|p| p.get("title"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string())
        });
        let locals = Scope::new().with("page", json!({"title": "Home"}));
        assert_eq!(ctx.render_with_locals("<ion:title/>", &locals).unwrap(), "Home");
    }

    #[test]
    fn globals_are_shared() {
        let mut ctx = context();
        ctx.tag("put", |b| {
            b.globals_mut().set("k", json!("v"));
            Ok(String::new())
        });
        ctx.tag("read", |b| Ok(b.globals().get_text("k").unwrap_or_default()));
        assert_eq!(ctx.render("<ion:put/><ion:read/>").unwrap(), "v");
    }

    #[test]
    fn current_page_reads_pages_global() {
        let mut ctx = context();
        ctx.globals_mut().set(
            "pages",
            json!([
                {"id_menu": 1, "url": "home", "title": "Welcome", "home": 1},
                {"id_menu": 1, "url": "news", "title": "News"},
            ]),
        );
        ctx.tag("page_title", |b| {
            let name = b.attr("name").unwrap_or("page");
            Ok(b.current_page(name)
                .and_then(|p| p.get("title"))
                .and_then(Value::as_str)
                .unwrap_or("-")
                .to_string())
        });
        let out = ctx
            .render(r#"<ion:page_title/>|<ion:page_title name="news"/>|<ion:page_title name="gone"/>"#)
            .unwrap();
        assert_eq!(out, "Welcome|News|-");
    }

    #[test]
    fn parse_as_nested_uses_current_locals() {
        let mut ctx = context();
        ctx.tag("inner", |b| {
            Ok(b.locals().get("n").map(|v| v.to_string()).unwrap_or_default())
        });
        ctx.tag("outer", |b| {
            b.locals_mut().set("n", json!(5));
            b.parse_as_nested("[<ion:inner/>]")
        });
        assert_eq!(ctx.render("<ion:outer/>").unwrap(), "[5]");
    }

    #[test]
    fn recursion_is_bounded() {
        let mut ctx = context_with(TagOptions::new().max_depth(4));
        ctx.tag("loop", |b| b.parse_as_nested("<ion:loop/>"));
        let err = ctx.render("<ion:loop/>").unwrap_err();
        assert!(matches!(err, RenderError::TagError(TagError::RecursionLimit(4))));
    }

    #[test]
    fn else_frames_are_per_body() {
        let mut ctx = context();
        ctx.tag("defer", |b| {
            b.defer_else();
            Ok(String::new())
        });
        ctx.tag("pending", |b| Ok(b.pending_else().to_string()));
        ctx.tag("block", |b| b.expand());

        let out = ctx
            .render("<ion:defer/><ion:pending/>|<ion:block><ion:pending/></ion:block>|<ion:pending/>")
            .unwrap();
        assert_eq!(out, "1|0|1");
        assert_eq!(ctx.pending_else(), 0);
    }

    #[test]
    fn take_else_never_goes_negative() {
        let mut ctx = context();
        ctx.tag("take", |b| Ok(b.take_else().to_string()));
        ctx.tag("defer", |b| {
            b.defer_else();
            Ok(String::new())
        });
        let out = ctx.render("<ion:take/><ion:defer/><ion:take/><ion:take/>").unwrap();
        assert_eq!(out, "falsetruefalse");
    }

    mod unknown_tags {
        use super::*;

        #[test]
        fn passthrough_keeps_markup() {
            let mut ctx = context();
            ctx.tag("x", |_| Ok("X".into()));
            let out = ctx.render("<ion:nope a=\"1\"><ion:x/></ion:nope>").unwrap();
            assert_eq!(out, "<ion:nope a=\"1\">X</ion:nope>");
        }

        #[test]
        fn strip_keeps_body() {
            let mut ctx = context_with(TagOptions::new().unknown_tags(UnknownTagBehavior::Strip));
            assert_eq!(ctx.render("<ion:nope>body</ion:nope>").unwrap(), "body");
        }

        #[test]
        fn indicate_marks_tag() {
            let mut ctx = context_with(
                TagOptions::new().unknown_tags(UnknownTagBehavior::Indicate("?".into())),
            );
            assert_eq!(ctx.render("<ion:nope/>").unwrap(), "?");
        }
    }

    #[test]
    fn custom_prefix() {
        let mut ctx = context_with(TagOptions::new().prefix("cms"));
        ctx.tag("t", |_| Ok("T".into()));
        assert_eq!(ctx.render("<cms:t/><ion:t/>").unwrap(), "T<ion:t/>");
    }
}
