//! List marker codec.
//!
//! # Responsibility
//! - Recognize the fixed marker prefixes `• `, `N. `, `☐ ` and `☑ `.
//! - Decode them into `ListStyle`/checked state and encode them back.
//!
//! # Invariants
//! - A marker is only recognized when followed by one space or end of text,
//!   so `1.5 cups` stays plain text.
//! - Numbers in the text are not trusted; numbered lines are renumbered on
//!   output.
//! - A plain line whose text would read as a marker, starts with `\` or is
//!   empty is written with one leading `\`, which decoding strips again.

use super::forest::Outline;
use crate::model::outline::{ListStyle, OutlineNode};
use once_cell::sync::Lazy;
use regex::Regex;

pub const BULLET_GLYPH: &str = "•";
pub const UNCHECKED_GLYPH: &str = "☐";
pub const CHECKED_GLYPH: &str = "☑";
pub const PLAIN_ESCAPE: char = '\\';

static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<bullet>•)|(?P<number>\d+)\.|(?P<unchecked>☐)|(?P<checked>☑))(?: |$)")
        .expect("valid list marker regex")
});

/// Marker decoded from the start of a line's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub style: ListStyle,
    pub checked: bool,
    /// The number written in the text, for numbered markers.
    pub number: Option<u32>,
}

/// Splits a leading marker off `text`.
///
/// Returns the marker and the remaining text with leading spaces removed,
/// or `None` when the text does not start with a marker.
pub fn split_marker(text: &str) -> Option<(Marker, &str)> {
    let caps = MARKER_RE.captures(text)?;
    let marker = if caps.name("bullet").is_some() {
        Marker {
            style: ListStyle::Bulleted,
            checked: false,
            number: None,
        }
    } else if let Some(number) = caps.name("number") {
        Marker {
            style: ListStyle::Numbered,
            checked: false,
            number: number.as_str().parse().ok(),
        }
    } else {
        Marker {
            style: ListStyle::Checkbox,
            checked: caps.name("checked").is_some(),
            number: None,
        }
    };
    let rest = &text[caps.get(0).map_or(0, |m| m.end())..];
    Some((marker, rest.trim_start()))
}

/// Line prefix for a style, including the trailing space.
///
/// `number` is only used by `ListStyle::Numbered`.
pub fn marker_prefix(style: ListStyle, checked: bool, number: usize) -> String {
    match style {
        ListStyle::None => String::new(),
        ListStyle::Bulleted => format!("{BULLET_GLYPH} "),
        ListStyle::Numbered => format!("{number}. "),
        ListStyle::Checkbox if checked => format!("{CHECKED_GLYPH} "),
        ListStyle::Checkbox => format!("{UNCHECKED_GLYPH} "),
    }
}

/// Whether plain text needs [`PLAIN_ESCAPE`] to survive a marked round trip.
pub fn needs_plain_escape(text: &str) -> bool {
    text.is_empty() || text.starts_with(PLAIN_ESCAPE) || split_marker(text).is_some()
}

/// Number a numbered node displays: one past the numbered siblings before it.
pub fn ordinal_of(siblings: &[OutlineNode], index: usize) -> usize {
    1 + siblings[..index]
        .iter()
        .filter(|node| node.list_style() == ListStyle::Numbered)
        .count()
}

/// Marker-aware decoration pass over a structurally parsed outline.
///
/// Strips recognized markers from every node's text and sets the node's
/// list style and checked state from them. Unmarked nodes are untouched.
pub fn decorate(outline: &mut Outline) {
    outline.visit_mut(decorate_node);
}

fn decorate_node(node: &mut OutlineNode) {
    if let Some(escaped) = node.text().strip_prefix(PLAIN_ESCAPE) {
        let plain = escaped.to_string();
        node.set_text(plain);
        return;
    }
    let Some((marker, rest)) = split_marker(node.text()) else {
        return;
    };
    let rest = rest.to_string();
    node.set_text(rest);
    node.set_list_style(marker.style);
    if marker.checked {
        node.set_checked(true);
    }
}

#[cfg(test)]
mod tests {
    use super::{decorate, marker_prefix, needs_plain_escape, split_marker};
    use crate::model::outline::ListStyle;
    use crate::outline::parse;

    #[test]
    fn recognizes_each_marker() {
        let (bullet, rest) = split_marker("• milk").unwrap();
        assert_eq!(bullet.style, ListStyle::Bulleted);
        assert_eq!(rest, "milk");

        let (numbered, rest) = split_marker("12. eggs").unwrap();
        assert_eq!(numbered.style, ListStyle::Numbered);
        assert_eq!(numbered.number, Some(12));
        assert_eq!(rest, "eggs");

        let (open, _) = split_marker("☐ call mom").unwrap();
        assert_eq!(open.style, ListStyle::Checkbox);
        assert!(!open.checked);

        let (done, _) = split_marker("☑ call mom").unwrap();
        assert!(done.checked);
    }

    #[test]
    fn bare_marker_counts_with_empty_text() {
        let (marker, rest) = split_marker("•").unwrap();
        assert_eq!(marker.style, ListStyle::Bulleted);
        assert_eq!(rest, "");
    }

    #[test]
    fn marker_needs_separator() {
        assert!(split_marker("1.5 cups").is_none());
        assert!(split_marker("•bold").is_none());
        assert!(split_marker("plain").is_none());
    }

    #[test]
    fn prefixes_round_trip_through_split() {
        for (style, checked) in [
            (ListStyle::Bulleted, false),
            (ListStyle::Numbered, false),
            (ListStyle::Checkbox, false),
            (ListStyle::Checkbox, true),
        ] {
            let line = format!("{}text", marker_prefix(style, checked, 3));
            let (marker, rest) = split_marker(&line).unwrap();
            assert_eq!(marker.style, style);
            assert_eq!(marker.checked, checked);
            assert_eq!(rest, "text");
        }
        assert_eq!(marker_prefix(ListStyle::None, false, 1), "");
    }

    #[test]
    fn escaped_line_stays_plain() {
        let mut outline = parse("\\1. not a list\n\\\\path\n\\");
        decorate(&mut outline);

        let nodes: Vec<_> = outline
            .iter()
            .map(|node| (node.text(), node.list_style()))
            .collect();
        assert_eq!(
            nodes,
            [
                ("1. not a list", ListStyle::None),
                ("\\path", ListStyle::None),
                ("", ListStyle::None),
            ]
        );
    }

    #[test]
    fn escape_needed_only_for_ambiguous_text() {
        assert!(needs_plain_escape("☑ done"));
        assert!(needs_plain_escape("•"));
        assert!(needs_plain_escape("\\x"));
        assert!(needs_plain_escape(""));
        assert!(!needs_plain_escape("1.5 cups"));
        assert!(!needs_plain_escape("plain"));
    }
}
