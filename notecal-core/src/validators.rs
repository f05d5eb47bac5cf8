//! Checks applied to user-supplied settings.

use std::sync::LazyLock;

use regex::Regex;

use crate::template::Template;

static CALENDAR_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid calendar id regex"));

/// Google's alias for the account's main calendar
const PRIMARY_CALENDAR: &str = "primary";

/// Calendar ids look like email addresses (the account address for the
/// main calendar, `...@group.calendar.google.com` for shared ones), or are
/// the `primary` alias.
pub fn validate_calendar_id(calendar_id: &str) -> bool {
    calendar_id == PRIMARY_CALENDAR || CALENDAR_ID.is_match(calendar_id)
}

/// A template is valid when it is non-blank and the renderer can parse it.
/// Stray `}}` outside a tag is plain text, as in rendering.
pub fn validate_template_syntax(template: &str) -> bool {
    !template.trim().is_empty() && Template::parse(template).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_ids() {
        assert!(validate_calendar_id("someone@example.com"));
        assert!(validate_calendar_id("abc123@group.calendar.google.com"));
        assert!(validate_calendar_id("primary"));
        assert!(!validate_calendar_id(""));
        assert!(!validate_calendar_id("   "));
        assert!(!validate_calendar_id("not-an-address"));
        assert!(!validate_calendar_id("two words@example.com"));
        assert!(!validate_calendar_id("user@localhost"));
    }

    #[test]
    fn test_template_syntax() {
        assert!(validate_template_syntax("- {{startTime}}-{{endTime}}: {{title}}"));
        assert!(validate_template_syntax("plain text"));
        assert!(!validate_template_syntax(""));
        assert!(!validate_template_syntax("  "));
        assert!(!validate_template_syntax("{{title}"));
        assert!(!validate_template_syntax("- {{title"));
        assert!(!validate_template_syntax("{{ }}"));
        assert!(!validate_template_syntax("{{#title}}{{/title}}"));
    }

    #[test]
    fn test_template_syntax_agrees_with_parser() {
        for template in ["a }} b", "{{title}} }}", "}} {{title}} }}", "{{{title}}}", "{{! note }}x"] {
            assert!(validate_template_syntax(template), "{template}");
            assert!(Template::parse(template).is_ok(), "{template}");
        }
    }
}
