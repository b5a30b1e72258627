//! Structural text extraction
//!
//! Flattens a cleaned document tree into plain text. Markup disappears, but
//! the structure a downstream reader cares about survives as markers:
//!
//! | Element | Marker |
//! |---------|--------|
//! | `h1`, `h2` | `【Ability】` on its own line |
//! | `h3`, `h4` | `[Examples]` on its own line |
//! | `pre` | `> 范例: ...` on its own line |
//! | `li` | `- item` |
//! | `p` | trailing line break |
//!
//! Everything else is a transparent container.

use scraper::{ElementRef, Node};

/// Prefix marking a worked example
pub const EXAMPLE_PREFIX: &str = "> 范例: ";

/// The closed set of node categories the extractor distinguishes
#[derive(Debug, Clone, Copy)]
enum Block<'a> {
    Text(&'a str),
    MajorHeading(ElementRef<'a>),
    MinorHeading(ElementRef<'a>),
    Example(ElementRef<'a>),
    ListItem(ElementRef<'a>),
    Paragraph(ElementRef<'a>),
    Container(ElementRef<'a>),
}

impl<'a> Block<'a> {
    fn of_element(element: ElementRef<'a>) -> Self {
        match element.value().name() {
            "h1" | "h2" => Self::MajorHeading(element),
            "h3" | "h4" => Self::MinorHeading(element),
            "pre" => Self::Example(element),
            "li" => Self::ListItem(element),
            "p" => Self::Paragraph(element),
            _ => Self::Container(element),
        }
    }

    fn render(self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::MajorHeading(el) => {
                out.push_str("\n【");
                out.push_str(&flat_text(el));
                out.push_str("】\n");
            }
            Self::MinorHeading(el) => {
                out.push_str("\n[");
                out.push_str(&flat_text(el));
                out.push_str("]\n");
            }
            Self::Example(el) => {
                out.push('\n');
                out.push_str(EXAMPLE_PREFIX);
                out.push_str(&flat_text(el));
                out.push('\n');
            }
            Self::ListItem(el) => {
                out.push_str("- ");
                out.push_str(&flat_text(el));
                out.push('\n');
            }
            Self::Paragraph(el) => {
                render_children(el, out);
                out.push('\n');
            }
            Self::Container(el) => render_children(el, out),
        }
    }
}

fn render_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        let block = match ElementRef::wrap(child) {
            Some(el) => Block::of_element(el),
            None => match child.value() {
                Node::Text(text) => Block::Text(&**text),
                // Comments, doctypes and processing instructions carry no content
                _ => continue,
            },
        };
        block.render(out);
    }
}

/// All descendant text with whitespace runs collapsed to one space, trimmed
fn flat_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the subtree rooted at `element` without line normalization
pub fn extract_raw(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    Block::of_element(element).render(&mut out);
    out
}

/// Extracts marker-annotated plain text from the subtree rooted at `element`
///
/// # Example
///
/// ```
/// use scraper::{Html, Selector};
/// use wiki_distill::crawler::extract;
///
/// let html = Html::parse_fragment("<div><h2>Ability</h2><p>Each night, choose a player.</p></div>");
/// let div = html.select(&Selector::parse("div").unwrap()).next().unwrap();
/// assert_eq!(extract(div), "【Ability】\nEach night, choose a player.");
/// ```
pub fn extract(element: ElementRef<'_>) -> String {
    normalize_lines(&extract_raw(element))
}

/// Trims every line, drops empty ones and joins the rest with single newlines
pub fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
