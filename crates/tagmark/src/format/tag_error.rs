use minijinja::{context, Environment};
use once_cell::sync::Lazy;

static ENV: Lazy<Environment<'static>> = Lazy::new(Environment::new);

/// Renders an inline error block for a misused tag.
///
/// `template` is MiniJinja source receiving `tag` and `messages`. If the
/// template itself is broken the messages are emitted as plain paragraphs.
pub fn show_tag_error<S: AsRef<str>>(template: &str, tag: &str, messages: &[S]) -> String {
    let messages: Vec<&str> = messages.iter().map(AsRef::as_ref).collect();
    match ENV.render_str(template, context! { tag => tag, messages => &messages }) {
        Ok(block) => block,
        Err(err) => {
            tracing::warn!(error = %err, "Tag error template failed to render");
            format!("<p>{}</p>", messages.join("</p><p>"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_ERROR_TEMPLATE;

    #[test]
    fn default_template() {
        let out = show_tag_error(DEFAULT_ERROR_TEMPLATE, "field", &["first", "second"]);
        assert_eq!(
            out,
            "<div class=\"tag-error\"><strong>field</strong><p>first</p><p>second</p></div>"
        );
    }

    #[test]
    fn custom_template() {
        let out = show_tag_error("[{{ tag }}: {{ messages | join(', ') }}]", "if", &["bad"]);
        assert_eq!(out, "[if: bad]");
    }

    #[test]
    fn broken_template_falls_back() {
        let out = show_tag_error("{% if %}", "if", &["a", "b"]);
        assert_eq!(out, "<p>a</p><p>b</p>");
    }
}
