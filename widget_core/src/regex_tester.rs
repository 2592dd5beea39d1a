//! Regular expression tester: runs a pattern over sample text and reports
//! matches with JS-compatible (UTF-16) offsets plus highlight segments.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{WidgetError, WidgetResult};

// Keep pathological patterns such as `a*` on large inputs from flooding the UI.
const MAX_MATCHES: usize = 10_000;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegexFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
}

impl Default for RegexFlags {
    fn default() -> Self {
        Self {
            global: true,
            ignore_case: false,
            multiline: false,
            dot_all: false,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegexMatch {
    #[serde(rename = "match")]
    pub text: String,
    /// Offset in UTF-16 code units, as the page indexes strings.
    pub index: usize,
    pub byte_index: usize,
    pub groups: Vec<Option<String>>,
    pub named_groups: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegexTestResult {
    pub pattern: String,
    pub flags: String,
    pub matches: Vec<RegexMatch>,
    pub segments: Vec<Segment>,
    pub truncated: bool,
}

/// Splits `/body/flags` literals; anything else is a bare pattern.
fn split_literal(pattern: &str, mut flags: RegexFlags) -> WidgetResult<(String, RegexFlags)> {
    let Some(rest) = pattern.strip_prefix('/') else {
        return Ok((pattern.to_string(), flags));
    };
    let Some(end) = rest.rfind('/') else {
        return Ok((pattern.to_string(), flags));
    };
    let (body, suffix) = (&rest[..end], &rest[end + 1..]);
    if !suffix.is_empty() {
        // Literal flags replace the checkbox state entirely.
        flags = RegexFlags {
            global: false,
            ignore_case: false,
            multiline: false,
            dot_all: false,
        };
    }
    for flag in suffix.chars() {
        match flag {
            'g' => flags.global = true,
            'i' => flags.ignore_case = true,
            'm' => flags.multiline = true,
            's' => flags.dot_all = true,
            other => return Err(WidgetError::unsupported("regex flag", other.to_string())),
        }
    }
    Ok((body.to_string(), flags))
}

fn flag_string(flags: RegexFlags) -> String {
    [
        (flags.global, 'g'),
        (flags.ignore_case, 'i'),
        (flags.multiline, 'm'),
        (flags.dot_all, 's'),
    ]
    .iter()
    .filter(|(on, _)| *on)
    .map(|(_, ch)| *ch)
    .collect()
}

pub fn compile_pattern(pattern: &str, flags: RegexFlags) -> WidgetResult<(Regex, RegexFlags)> {
    if pattern.trim().is_empty() {
        return Err(WidgetError::EmptyInput("regex pattern"));
    }
    let (body, flags) = split_literal(pattern, flags)?;
    if body.is_empty() {
        return Err(WidgetError::EmptyInput("regex pattern"));
    }
    let regex = RegexBuilder::new(&body)
        .case_insensitive(flags.ignore_case)
        .multi_line(flags.multiline)
        .dot_matches_new_line(flags.dot_all)
        .build()
        .map_err(|err| WidgetError::Regex(err.to_string()))?;
    Ok((regex, flags))
}

pub fn test_regex_internal(
    pattern: &str,
    text: &str,
    flags: RegexFlags,
) -> WidgetResult<RegexTestResult> {
    let (regex, flags) = compile_pattern(pattern, flags)?;
    let names: Vec<Option<&str>> = regex.capture_names().skip(1).collect();

    let mut matches = Vec::new();
    let mut truncated = false;
    let mut utf16_cursor = (0usize, 0usize);
    for caps in regex.captures_iter(text) {
        if matches.len() == MAX_MATCHES {
            truncated = true;
            break;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let (byte_pos, utf16_pos) = utf16_cursor;
        let index = utf16_pos + text[byte_pos..whole.start()].encode_utf16().count();
        utf16_cursor = (whole.start(), index);

        let groups = (1..caps.len())
            .map(|idx| caps.get(idx).map(|m| m.as_str().to_string()))
            .collect();
        let named_groups = names
            .iter()
            .enumerate()
            .filter_map(|(offset, name)| {
                name.map(|n| {
                    (
                        n.to_string(),
                        caps.get(offset + 1).map(|m| m.as_str().to_string()),
                    )
                })
            })
            .collect();
        matches.push(RegexMatch {
            text: whole.as_str().to_string(),
            index,
            byte_index: whole.start(),
            groups,
            named_groups,
        });
        if !flags.global {
            break;
        }
    }
    log::debug!("regex {pattern:?} matched {} time(s)", matches.len());

    let segments = highlight_segments(text, &matches);
    Ok(RegexTestResult {
        pattern: regex.as_str().to_string(),
        flags: flag_string(flags),
        matches,
        segments,
        truncated,
    })
}

/// Alternating plain/matched runs covering the whole text. Empty matches add
/// no segment.
fn highlight_segments(text: &str, matches: &[RegexMatch]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in matches {
        if m.text.is_empty() || m.byte_index < last {
            continue;
        }
        if m.byte_index > last {
            segments.push(Segment {
                text: text[last..m.byte_index].to_string(),
                matched: false,
            });
        }
        segments.push(Segment {
            text: m.text.clone(),
            matched: true,
        });
        last = m.byte_index + m.text.len();
    }
    if last < text.len() || segments.is_empty() {
        segments.push(Segment {
            text: text[last..].to_string(),
            matched: false,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_search_finds_every_match_with_groups() {
        let result =
            test_regex_internal(r"(\w+)@(\w+)\.com", "a@b.com, c@d.com", RegexFlags::default())
                .unwrap();
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[1].text, "c@d.com");
        assert_eq!(result.matches[1].index, 9);
        assert_eq!(
            result.matches[0].groups,
            vec![Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn non_global_stops_after_first_match() {
        let flags = RegexFlags {
            global: false,
            ..RegexFlags::default()
        };
        let result = test_regex_internal(r"\d", "a1b2", flags).unwrap();
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.flags, "");
    }

    #[test]
    fn literal_syntax_overrides_checkbox_flags() {
        let result = test_regex_internal("/HELLO/i", "hello Hello", RegexFlags::default()).unwrap();
        assert_eq!(result.flags, "i");
        assert_eq!(result.matches.len(), 1);
        let result = test_regex_internal("/HELLO/gi", "hello Hello", RegexFlags::default()).unwrap();
        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn multiline_anchors_each_line() {
        let flags = RegexFlags {
            multiline: true,
            ..RegexFlags::default()
        };
        let result = test_regex_internal("^x", "x\nx\ny", flags).unwrap();
        assert_eq!(result.matches.len(), 2);
    }

    #[test]
    fn empty_matches_do_not_loop_forever() {
        let result = test_regex_internal("a*", "baa", RegexFlags::default()).unwrap();
        assert!(result.matches.len() >= 2);
        assert!(!result.truncated);
        let joined: String = result.segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, "baa");
    }

    #[test]
    fn indexes_count_utf16_units() {
        let result = test_regex_internal("x", "😀x", RegexFlags::default()).unwrap();
        assert_eq!(result.matches[0].index, 2);
        assert_eq!(result.matches[0].byte_index, 4);
    }

    #[test]
    fn unmatched_optional_group_is_none() {
        let result = test_regex_internal("(?P<word>a)(b)?", "a", RegexFlags::default()).unwrap();
        assert_eq!(result.matches[0].groups, vec![Some("a".to_string()), None]);
        assert_eq!(
            result.matches[0].named_groups.get("word"),
            Some(&Some("a".to_string()))
        );
    }

    #[test]
    fn segments_cover_text() {
        let result = test_regex_internal("b", "abc", RegexFlags::default()).unwrap();
        let shape: Vec<_> = result
            .segments
            .iter()
            .map(|s| (s.text.as_str(), s.matched))
            .collect();
        assert_eq!(shape, vec![("a", false), ("b", true), ("c", false)]);
    }

    #[test]
    fn invalid_patterns_report_errors() {
        assert_eq!(
            test_regex_internal("  ", "x", RegexFlags::default()).unwrap_err(),
            WidgetError::EmptyInput("regex pattern")
        );
        assert!(matches!(
            test_regex_internal("(", "x", RegexFlags::default()).unwrap_err(),
            WidgetError::Regex(_)
        ));
        assert!(test_regex_internal("/a/y", "a", RegexFlags::default()).is_err());
        assert!(test_regex_internal("/a/u", "a", RegexFlags::default()).is_err());
    }
}
