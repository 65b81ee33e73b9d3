//! Property-based tests for the rendering contract.

mod common;

use common::{context, render, render_page};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tagmark::Scope;

// Values that are non-empty exactly when they have characters ("0" excluded).
fn text() -> impl Strategy<Value = String> {
    "[a-z ]{0,8}".prop_filter("not blank", |s| s.is_empty() || !s.trim().is_empty())
}

// Operand tokens that never collide with a seeded global.
fn token() -> impl Strategy<Value = String> {
    "x[a-z]{0,4}"
}

proptest! {
    /// The extended value wins when present, then the core value, then nothing.
    #[test]
    fn field_prefers_extended_then_core(
        core in prop::option::of(text()),
        extended in prop::option::of(text()),
    ) {
        let mut page = Map::new();
        if let Some(core) = &core {
            page.insert("title".into(), json!(core));
        }
        if let Some(extended) = &extended {
            page.insert("ion_title".into(), json!(extended));
        }

        let expected = extended
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| core.clone().filter(|s| !s.is_empty()))
            .unwrap_or_default();

        let out = render_page(r#"<ion:field from="page" name="title"/>"#, Value::Object(page));
        prop_assert_eq!(out, expected);
    }

    /// A value stored with `set` is read back by `get` in the same pass.
    #[test]
    fn set_then_get_round_trips(var in "[a-z_]{1,8}", value in "[A-Za-z0-9][A-Za-z0-9 ]{0,11}") {
        let template = format!(
            r#"<ion:set var="{var}" value="{value}"/>|<ion:get var="{var}"/>"#
        );
        prop_assert_eq!(render(&template), format!("{value}|{value}"));
    }

    /// Variables are never visible before they are set.
    #[test]
    fn get_of_unset_var_is_empty(var in "zz[a-z_]{1,6}") {
        prop_assert_eq!(render(&format!(r#"[<ion:get var="{var}"/>]"#)), "[]");
    }

    /// Exactly one branch of an if / else pair renders, and a second else never does.
    #[test]
    fn if_else_pairs(a in token(), b in token()) {
        let mut ctx = context();
        ctx.tag("pending", |binding| Ok(binding.pending_else().to_string()));

        let template = format!(
            r#"<ion:if condition="{a} == {b}">T</ion:if><ion:pending/><ion:else>E</ion:else><ion:pending/><ion:else>F</ion:else>"#
        );
        let out = ctx.render(&template).unwrap();
        let expected = if a == b { "T00" } else { "1E0" };
        prop_assert_eq!(out, expected);
        prop_assert_eq!(ctx.pending_else(), 0);
    }

    /// A date that cannot be parsed renders the tag body unchanged.
    #[test]
    fn unparseable_date_renders_body(date in "[a-z]{1,10}", body in "[A-Za-z ]{1,12}") {
        let page = json!({ "date": date });
        let out = render_page(
            &format!(r#"<ion:field from="page" name="date" format="Y">{body}</ion:field>"#),
            page,
        );
        prop_assert_eq!(out, body);
    }

    /// Untranslated terms render as `#term`.
    #[test]
    fn missing_translation_is_marked(term in "t[a-z_]{1,10}") {
        prop_assert_eq!(
            render(&format!(r#"<ion:translation term="{term}"/>"#)),
            format!("#{term}")
        );
    }

    /// Locals set inside a tag never leak to the caller's scope.
    #[test]
    fn locals_are_copied_per_tag(title in "[A-Za-z]{1,8}") {
        let mut ctx = context();
        ctx.tag("retitle", |b| {
            b.locals_mut().set("page", json!({"title": "inner"}));
            b.expand()
        });
        let locals = Scope::new().with("page", json!({ "title": title.clone() }));
        let out = ctx
            .render_with_locals(
                r#"<ion:retitle><ion:field from="page" name="title"/></ion:retitle>|<ion:field from="page" name="title"/>"#,
                &locals,
            )
            .unwrap();
        prop_assert_eq!(out, format!("inner|{title}"));
    }
}

#[test]
fn get_of_unset_var_after_other_sets() {
    assert_eq!(
        render(r#"<ion:set var="a" value="1"/>[<ion:get var="b"/>]"#),
        "1[]"
    );
}
