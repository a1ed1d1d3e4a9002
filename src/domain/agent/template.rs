//! `{{variable}}` substitution in agent texts.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("placeholder pattern is valid"));

/// Replaces `{{name}}` with the matching variable value.
///
/// Unknown placeholders are left as written so a typo stays visible in
/// the instruction instead of silently vanishing.
pub fn render_template(text: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of every placeholder referenced in `text`, in order of appearance.
pub fn placeholders(text: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> HashMap<String, String> {
        HashMap::from([
            ("user-name".to_string(), "Ada".to_string()),
            ("project-name".to_string(), "Thesis".to_string()),
        ])
    }

    #[test]
    fn substitutes_known_variables() {
        let rendered = render_template("Hello {{user-name}}, welcome to {{ project-name }}.", &vars());
        assert_eq!(rendered, "Hello Ada, welcome to Thesis.");
    }

    #[test]
    fn leaves_unknown_placeholders_verbatim() {
        let rendered = render_template("Due {{deadline}}", &vars());
        assert_eq!(rendered, "Due {{deadline}}");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(render_template("plain", &vars()), "plain");
    }

    #[test]
    fn lists_placeholders_in_order() {
        assert_eq!(
            placeholders("{{b}} then {{a}} then {{b}}"),
            vec!["b".to_string(), "a".to_string(), "b".to_string()]
        );
    }
}
