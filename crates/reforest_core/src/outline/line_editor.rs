//! Line-level helpers for a freeform text editor showing marked outline text.
//!
//! # Responsibility
//! - Compute list continuation, marker insertion and checkbox toggles on raw
//!   lines, without building a tree.
//! - Keep numbering consistent with `serialize_marked`.
//!
//! # Invariants
//! - Indentation is counted in leading tabs only.
//! - Blank lines never affect numbering.

use super::markers::{marker_prefix, split_marker, CHECKED_GLYPH, UNCHECKED_GLYPH};
use super::serializer::LINE_SEPARATOR;
use crate::model::outline::ListStyle;
use once_cell::sync::Lazy;
use regex::Regex;

static CHECKBOX_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\t ]*)(☐|☑) ").expect("valid checkbox line regex"));
static EXISTING_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\t ]*)(?:(?:•|\d+\.|☐|☑)(?: |$))?").expect("valid existing marker regex")
});
static OUTDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\t| {4})").expect("valid outdent regex"));

/// Number of leading tab characters.
pub fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| *c == '\t').count()
}

/// Prefix for the line typed after `line` when the user presses return.
///
/// Keeps the indentation and continues the list: bullets stay bullets,
/// `N.` becomes `N+1.`, and either checkbox glyph continues as unchecked.
pub fn continuation_prefix(line: &str) -> String {
    let indent = indent_of(line);
    let mut prefix = "\t".repeat(indent);
    let body = line[indent..].trim_start_matches(' ');
    if let Some((marker, _)) = split_marker(body) {
        let next = marker.number.map_or(1, |number| number as usize + 1);
        prefix.push_str(&marker_prefix(marker.style, false, next));
    }
    prefix
}

/// Replaces the marker of line `line_index` in `block` with `style`'s marker.
///
/// A numbered line continues from the nearest previous numbered line at the
/// same indent; a shallower line in between starts again at 1.
/// `ListStyle::None` removes the marker. Returns `None` when the index is
/// out of range.
pub fn apply_list_marker(block: &str, line_index: usize, style: ListStyle) -> Option<String> {
    let mut lines: Vec<String> = block.split(LINE_SEPARATOR).map(str::to_string).collect();
    let line = lines.get(line_index)?;
    let indent = indent_of(line);

    let mut number = 1;
    for previous in lines[..line_index].iter().rev() {
        if previous.trim().is_empty() {
            continue;
        }
        let previous_indent = indent_of(previous);
        if previous_indent == indent {
            if let Some((marker, _)) = split_marker(previous[previous_indent..].trim_start()) {
                if let Some(previous_number) = marker.number {
                    number = previous_number as usize + 1;
                }
            }
            break;
        }
        if previous_indent < indent {
            break;
        }
    }

    let prefix = marker_prefix(style, false, number);
    let updated = EXISTING_MARKER_RE
        .replace(line, |caps: &regex::Captures<'_>| format!("{}{prefix}", &caps[1]))
        .into_owned();
    lines[line_index] = updated;
    Some(lines.join(LINE_SEPARATOR))
}

/// Flips `☐ ` ⇄ `☑ ` after leading whitespace; `None` without a checkbox.
pub fn toggle_checkbox_line(line: &str) -> Option<String> {
    let caps = CHECKBOX_LINE_RE.captures(line)?;
    let whole = caps.get(0)?;
    let flipped = if &caps[2] == UNCHECKED_GLYPH {
        CHECKED_GLYPH
    } else {
        UNCHECKED_GLYPH
    };
    Some(format!("{}{flipped} {}", &caps[1], &line[whole.end()..]))
}

pub fn indent_line(line: &str) -> String {
    format!("\t{line}")
}

/// Removes one leading tab or four leading spaces.
pub fn outdent_line(line: &str) -> String {
    OUTDENT_RE.replace(line, "").into_owned()
}

/// Renumbers numbered lines per indent level.
///
/// Only the digits of a numbered marker change; the rest of the line,
/// including its spacing, is kept as written. Numbering continues across
/// deeper lines and unnumbered siblings, and restarts at 1 when a level is re-entered from a shallower line.
pub fn renumber_lines(block: &str) -> String {
    let mut counters: Vec<(usize, usize)> = Vec::new();
    let renumbered: Vec<String> = block
        .split(LINE_SEPARATOR)
        .map(|line| {
            if line.trim().is_empty() {
                return line.to_string();
            }
            let indent = indent_of(line);
            while counters.last().is_some_and(|(level, _)| *level > indent) {
                counters.pop();
            }

            let body = &line[indent..];
            let Some((marker, _)) = split_marker(body) else {
                return line.to_string();
            };
            if marker.style != ListStyle::Numbered {
                return line.to_string();
            }

            let number = match counters.last_mut() {
                Some((level, count)) if *level == indent => {
                    *count += 1;
                    *count
                }
                _ => {
                    counters.push((indent, 1));
                    1
                }
            };
            let digits = body.bytes().take_while(u8::is_ascii_digit).count();
            format!("{}{number}{}", &line[..indent], &body[digits..])
        })
        .collect();
    renumbered.join(LINE_SEPARATOR)
}

/// Number of consecutive lines after `index` indented deeper than it.
///
/// Drives the fold arrow and guide line next to a parent line.
pub fn child_line_count(block: &str, index: usize) -> usize {
    let lines: Vec<&str> = block.split(LINE_SEPARATOR).collect();
    let Some(line) = lines.get(index) else {
        return 0;
    };
    let indent = indent_of(line);
    lines[index + 1..]
        .iter()
        .take_while(|next| indent_of(next) > indent)
        .count()
}

#[cfg(test)]
mod tests {
    use super::{child_line_count, indent_of, outdent_line};

    #[test]
    fn indent_counts_tabs_only() {
        assert_eq!(indent_of("\t\t• a"), 2);
        assert_eq!(indent_of("    a"), 0);
    }

    #[test]
    fn outdent_strips_tab_or_four_spaces() {
        assert_eq!(outdent_line("\t\ta"), "\ta");
        assert_eq!(outdent_line("      a"), "  a");
        assert_eq!(outdent_line("a"), "a");
    }

    #[test]
    fn child_line_count_stops_at_sibling() {
        let block = "a\n\tb\n\t\tc\nd";
        assert_eq!(child_line_count(block, 0), 2);
        assert_eq!(child_line_count(block, 1), 1);
        assert_eq!(child_line_count(block, 3), 0);
        assert_eq!(child_line_count(block, 9), 0);
    }
}
