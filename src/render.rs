//! HTML rendering for facts
//!
//! Titles are escaped as plain text. Content is cleaned with `ammonia`, which
//! keeps ordinary post markup (paragraphs, emphasis, lists, links, images) and
//! strips scripts, event handlers and other unsafe constructs.

use serde::{Deserialize, Serialize};

use crate::config::DisplayMode;
use crate::data::Fact;

/// Placeholder a host page uses to embed a fact
pub const SHORTCODE: &str = "[digifacts]";

/// Message shown in place of a fact when none can be loaded
pub const UNAVAILABLE_MESSAGE: &str = "No DigiFacts available at the moment.";

/// Base stylesheet for rendered fragments
pub const BASE_STYLES: &str = "\
.digibyte-digifact .digifact-title { font-size: 24px; color: #333; }
.digibyte-digifact .digifact-content { font-size: 16px; color: #666; }
";

/// Extra rules applied when facts are shown in a box
pub const BOX_STYLES: &str = "\
.digibyte-digifact.with-box { border: 1px solid #ccc; border-radius: 4px; padding: 1em; }
";

/// A fact whose fields are safe to insert into a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeFact {
    /// Escaped title text
    pub title: String,
    /// Sanitized content markup
    pub content: String,
}

impl From<&Fact> for SafeFact {
    fn from(fact: &Fact) -> Self {
        Self {
            title: escape_html(&fact.title),
            content: sanitize_content(&fact.content),
        }
    }
}

/// Escapes text for use in HTML element content or attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Removes unsafe markup from fact content
pub fn sanitize_content(content: &str) -> String {
    ammonia::clean(content)
}

/// CSS class list for the fragment wrapper
pub fn wrapper_class(display: DisplayMode) -> &'static str {
    match display {
        DisplayMode::Box => "digibyte-digifact with-box",
        DisplayMode::Text => "digibyte-digifact",
    }
}

/// Stylesheet for the given display mode
pub fn stylesheet(display: DisplayMode) -> String {
    match display {
        DisplayMode::Box => format!("{}{}", BASE_STYLES, BOX_STYLES),
        DisplayMode::Text => BASE_STYLES.to_string(),
    }
}

/// Wraps already-safe title and content markup in the fragment container
fn fragment(display: DisplayMode, title: &str, content: &str) -> String {
    format!(
        "<div class=\"{}\">\n    <h5 class=\"digifact-title\">{}</h5>\n    <div class=\"digifact-content\">{}</div>\n</div>",
        wrapper_class(display),
        title,
        content
    )
}

/// Renders a fact into an embeddable fragment
pub fn render(fact: &Fact, display: DisplayMode) -> String {
    let safe = SafeFact::from(fact);
    fragment(display, &safe.title, &safe.content)
}

/// Renders the unavailable message inside the usual container
///
/// The empty title and content slots let a later refresh fill in a fact.
pub fn render_unavailable(display: DisplayMode) -> String {
    fragment(display, "", UNAVAILABLE_MESSAGE)
}

/// Replaces every shortcode in `page`, calling `fragment` once per occurrence
pub fn expand_with<F>(page: &str, mut fragment: F) -> String
where
    F: FnMut() -> String,
{
    let mut pieces = page.split(SHORTCODE);
    let mut out = String::with_capacity(page.len());
    if let Some(first) = pieces.next() {
        out.push_str(first);
    }
    for piece in pieces {
        out.push_str(&fragment());
        out.push_str(piece);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(title: &str, content: &str) -> Fact {
        Fact {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_box_fragment_has_box_class() {
        let html = render(&fact("T1", "<p>C1</p>"), DisplayMode::Box);

        assert!(html.contains("class=\"digibyte-digifact with-box\""));
        assert!(html.contains("<h5 class=\"digifact-title\">T1</h5>"));
        assert!(html.contains("<div class=\"digifact-content\"><p>C1</p></div>"));
    }

    #[test]
    fn test_unavailable_fragment_keeps_container() {
        let html = render_unavailable(DisplayMode::Box);

        assert!(html.starts_with("<div class=\"digibyte-digifact with-box\">"));
        assert!(html.contains("<h5 class=\"digifact-title\"></h5>"));
        assert!(html.contains(&format!(
            "<div class=\"digifact-content\">{}</div>",
            UNAVAILABLE_MESSAGE
        )));
        assert!(!render_unavailable(DisplayMode::Text).contains("with-box"));
    }

    #[test]
    fn test_text_fragment_has_no_box_class() {
        let html = render(&fact("T1", "<p>C1</p>"), DisplayMode::Text);

        assert!(html.contains("class=\"digibyte-digifact\""));
        assert!(!html.contains("with-box"));
    }

    #[test]
    fn test_title_markup_is_escaped() {
        let html = render(&fact("<b>Bold</b> & \"quoted\"", "x"), DisplayMode::Text);

        assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt; &amp; &quot;quoted&quot;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_content_scripts_are_removed() {
        let cleaned = sanitize_content("<p>Safe</p><script>alert(1)</script>");
        assert_eq!(cleaned, "<p>Safe</p>");
    }

    #[test]
    fn test_content_event_handlers_are_removed() {
        let cleaned = sanitize_content("<p onclick=\"steal()\">Hi <strong>there</strong></p>");
        assert!(!cleaned.contains("onclick"));
        assert!(cleaned.contains("<strong>there</strong>"));
    }

    #[test]
    fn test_safe_fact_from_fact() {
        let safe = SafeFact::from(&fact("A < B", "<em>ok</em>"));
        assert_eq!(safe.title, "A &lt; B");
        assert_eq!(safe.content, "<em>ok</em>");
    }

    #[test]
    fn test_escape_html_apostrophe() {
        assert_eq!(escape_html("DigiByte's"), "DigiByte&#39;s");
    }

    #[test]
    fn test_expand_replaces_each_occurrence() {
        let mut n = 0;
        let page = expand_with("<p>[digifacts]</p><p>[digifacts]</p>", || {
            n += 1;
            format!("F{}", n)
        });
        assert_eq!(page, "<p>F1</p><p>F2</p>");
    }

    #[test]
    fn test_expand_without_shortcode_is_unchanged() {
        let page = expand_with("<p>nothing here</p>", || panic!("should not render"));
        assert_eq!(page, "<p>nothing here</p>");
    }

    #[test]
    fn test_stylesheet_box_adds_border() {
        assert!(stylesheet(DisplayMode::Box).contains("with-box"));
        assert!(!stylesheet(DisplayMode::Text).contains("with-box"));
    }
}
