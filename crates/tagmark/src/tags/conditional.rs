//! `if` / `else`.
//!
//! ```text
//! <ion:if condition="page:id == 3">three</ion:if>
//! <ion:else>not three</ion:else>
//! ```
//!
//! A failed `if` leaves one pending else in the current frame; the next
//! `else` among its siblings consumes it. See [`crate::context`] for frames.

use crate::condition::Condition;
use crate::context::Binding;
use crate::error::TagResult;

/// Expands the body when the condition holds, otherwise defers to `else`.
///
/// A malformed condition renders an inline error naming the tag.
pub fn if_tag(b: &mut Binding<'_>) -> TagResult {
    let text = b.attr("condition").unwrap_or_default().to_string();
    let condition = match Condition::parse(&text) {
        Ok(condition) => condition,
        Err(err) => {
            tracing::debug!(condition = %text, error = %err, "Malformed condition");
            return Ok(format!(
                "Error in your conditional expression : {}:{}",
                b.name(),
                text
            ));
        }
    };

    let holds = condition.evaluate(b.locals(), b.globals(), &b.options().extend_field_prefix);
    if holds {
        b.expand()
    } else {
        b.defer_else();
        Ok(String::new())
    }
}

/// Expands the body when an `if` before it failed.
pub fn else_tag(b: &mut Binding<'_>) -> TagResult {
    if b.take_else() {
        b.expand()
    } else {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{context, render, render_page};
    use serde_json::json;

    #[test]
    fn true_condition_expands_and_skips_else() {
        let mut ctx = context();
        ctx.tag("pending", |b| Ok(b.pending_else().to_string()));
        let out = ctx
            .render(r#"<ion:if condition="a == a">yes</ion:if><ion:else>no</ion:else>[<ion:pending/>]"#)
            .unwrap();
        assert_eq!(out, "yes[0]");
    }

    #[test]
    fn false_condition_defers_to_else() {
        let mut ctx = context();
        ctx.tag("pending", |b| Ok(b.pending_else().to_string()));
        let out = ctx
            .render(concat!(
                r#"<ion:if condition="a == b">yes</ion:if>[<ion:pending/>]"#,
                r#"<ion:else>no</ion:else>[<ion:pending/>]"#,
                r#"<ion:else>again</ion:else>"#,
            ))
            .unwrap();
        assert_eq!(out, "[1]no[0]");
    }

    #[test]
    fn else_without_if_is_noop() {
        assert_eq!(render("<ion:else>x</ion:else>"), "");
    }

    #[test]
    fn malformed_condition() {
        assert_eq!(
            render(r#"<ion:if condition="a ==">x</ion:if>"#),
            "Error in your conditional expression : if:a =="
        );
        assert_eq!(
            render(r#"<ion:if>x</ion:if>"#),
            "Error in your conditional expression : if:"
        );
    }

    #[test]
    fn unknown_operator_is_malformed() {
        assert_eq!(
            render(r#"<ion:if condition="a =~ b">x</ion:if>"#),
            "Error in your conditional expression : if:a =~ b"
        );
    }

    #[test]
    fn page_fields() {
        let page = json!({"id": 3, "title": "Home"});
        assert_eq!(
            render_page(
                r#"<ion:if condition="page:id >= 3">big</ion:if><ion:else>small</ion:else>"#,
                page.clone()
            ),
            "big"
        );
        assert_eq!(
            render_page(
                r#"<ion:if condition="page:title != 'Home'">other</ion:if><ion:else>home</ion:else>"#,
                page
            ),
            "home"
        );
    }

    #[test]
    fn global_operands() {
        // current_lang is seeded from the site languages
        assert_eq!(
            render(r#"<ion:if condition="current_lang == en">english</ion:if>"#),
            "english"
        );
    }

    mod nesting {
        use super::*;

        #[test]
        fn nested_failure_does_not_leak_outward() {
            let out = render(concat!(
                r#"<ion:if condition="a == a">"#,
                r#"<ion:if condition="a == b">inner</ion:if>"#,
                r#"</ion:if>"#,
                r#"<ion:else>outer-else</ion:else>"#,
            ));
            assert_eq!(out, "");
        }

        #[test]
        fn nested_else_pairs_with_nested_if() {
            let out = render(concat!(
                r#"<ion:if condition="a == a">"#,
                r#"<ion:if condition="a == b">inner</ion:if><ion:else>inner-else</ion:else>"#,
                r#"</ion:if>"#,
            ));
            assert_eq!(out, "inner-else");
        }

        #[test]
        fn outer_failure_reaches_outer_else_only() {
            let out = render(concat!(
                r#"<ion:if condition="a == b">skipped</ion:if>"#,
                r#"<ion:else><ion:else>nested</ion:else>outer</ion:else>"#,
            ));
            assert_eq!(out, "outer");
        }

        #[test]
        fn two_failures_feed_two_elses() {
            let out = render(concat!(
                r#"<ion:if condition="1 > 2">a</ion:if>"#,
                r#"<ion:if condition="2 > 3">b</ion:if>"#,
                r#"<ion:else>x</ion:else><ion:else>y</ion:else><ion:else>z</ion:else>"#,
            ));
            assert_eq!(out, "xy");
        }
    }
}
