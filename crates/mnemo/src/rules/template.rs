//! Placeholder templates for rule patterns
//!
//! A template such as `"if {A} then {B}"` is split into literal and
//! placeholder segments. Matching is done by a small backtracking matcher
//! rather than a regex dialect:
//!
//! - [`Template::captures`] is anchored at both ends, case-insensitive,
//!   and non-greedy: each placeholder takes the shortest non-empty run of
//!   text that lets the rest of the template match.
//! - [`Template::loosely_matches`] treats placeholders as wildcards and
//!   only checks that the literal segments occur in order somewhere.

use std::collections::HashSet;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed placeholder at offset {offset} in {template:?}")]
    Unclosed { offset: usize, template: String },

    #[error("unexpected '}}' at offset {offset} in {template:?}")]
    StrayBrace { offset: usize, template: String },

    #[error("invalid placeholder name {name:?} in {template:?}")]
    InvalidName { name: String, template: String },

    #[error("placeholder {name:?} appears more than once in {template:?}")]
    DuplicateName { name: String, template: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(Vec<char>),
    Placeholder(String),
}

/// A compiled pattern template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal: Vec<char> = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut chars = source.char_indices();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed {
                            offset,
                            template: source.to_string(),
                        });
                    }
                    if !is_valid_name(&name) {
                        return Err(TemplateError::InvalidName {
                            name,
                            template: source.to_string(),
                        });
                    }
                    if names.contains(&name) {
                        return Err(TemplateError::DuplicateName {
                            name,
                            template: source.to_string(),
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    names.push(name.clone());
                    segments.push(Segment::Placeholder(name));
                }
                '}' => {
                    return Err(TemplateError::StrayBrace {
                        offset,
                        template: source.to_string(),
                    });
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match the whole text, returning `(name, captured text)` pairs in
    /// template order
    pub fn captures(&self, text: &str) -> Option<Vec<(String, String)>> {
        let chars: Vec<char> = text.chars().collect();
        let mut spans = Vec::new();
        let mut dead_ends = HashSet::new();
        if !self.match_from(&chars, 0, 0, &mut spans, &mut dead_ends) {
            return None;
        }

        let values = spans
            .into_iter()
            .map(|(start, end)| chars[start..end].iter().collect::<String>());
        Some(self.names().map(str::to_string).zip(values).collect())
    }

    /// Whether `segments[segment..]` matches `text[pos..]`. A failed
    /// `(segment, pos)` never succeeds later, so it is recorded in
    /// `dead_ends` to keep matching polynomial.
    fn match_from(
        &self,
        text: &[char],
        segment: usize,
        pos: usize,
        spans: &mut Vec<(usize, usize)>,
        dead_ends: &mut HashSet<(usize, usize)>,
    ) -> bool {
        let Some(current) = self.segments.get(segment) else {
            return pos == text.len();
        };
        if dead_ends.contains(&(segment, pos)) {
            return false;
        }

        let matched = match current {
            Segment::Literal(lit) => {
                starts_with_ci(&text[pos..], lit)
                    && self.match_from(text, segment + 1, pos + lit.len(), spans, dead_ends)
            }
            Segment::Placeholder(_) => (pos + 1..=text.len()).any(|end| {
                spans.push((pos, end));
                let found = self.match_from(text, segment + 1, end, spans, dead_ends);
                if !found {
                    spans.pop();
                }
                found
            }),
        };

        if !matched {
            dead_ends.insert((segment, pos));
        }
        matched
    }

    /// Unanchored check with placeholders as wildcards
    pub fn loosely_matches(&self, text: &str) -> bool {
        let chars: Vec<char> = text.chars().collect();
        let mut pos = 0;
        for segment in &self.segments {
            if let Segment::Literal(lit) = segment {
                match find_ci(&chars[pos..], lit) {
                    Some(found) => pos += found + lit.len(),
                    None => return false,
                }
            }
        }
        true
    }
}

/// Replace each `{Name}` in `template` with its captured value.
///
/// Unknown placeholders and stray braces are left as written.
pub fn substitute(template: &str, vars: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match vars.iter().find(|(n, _)| n == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn chars_eq_ci(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn starts_with_ci(text: &[char], prefix: &[char]) -> bool {
    text.len() >= prefix.len() && text.iter().zip(prefix).all(|(a, b)| chars_eq_ci(*a, *b))
}

fn find_ci(text: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > text.len() {
        return None;
    }
    (0..=text.len() - needle.len()).find(|&i| starts_with_ci(&text[i..], needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(template: &str, text: &str) -> Option<Vec<(String, String)>> {
        Template::compile(template).unwrap().captures(text)
    }

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_modus_ponens_capture() {
        assert_eq!(
            caps("if {A} then {B}", "if rain then wet"),
            Some(vec![pair("A", "rain"), pair("B", "wet")])
        );
    }

    #[test]
    fn test_captures_are_non_greedy() {
        assert_eq!(
            caps("{A} and {B}", "salt and pepper and vinegar"),
            Some(vec![pair("A", "salt"), pair("B", "pepper and vinegar")])
        );
    }

    #[test]
    fn test_case_insensitive_literals_keep_original_capture() {
        assert_eq!(
            caps("if {A} then {B}", "IF Rain THEN Wet"),
            Some(vec![pair("A", "Rain"), pair("B", "Wet")])
        );
    }

    #[test]
    fn test_anchored_match_requires_exact_literals() {
        assert!(caps("if {A} then {B}", "maybe if rain then wet").is_none());
        assert!(caps("{A} is mortal", "socrates is mortal!").is_none());
        assert!(caps("if {A} then {B}", "if  then wet").is_none());
    }

    #[test]
    fn test_single_placeholder_takes_everything() {
        assert_eq!(caps("{A}", "anything at all"), Some(vec![pair("A", "anything at all")]));
        assert!(caps("{A}", "").is_none());
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            Template::compile("if {A then"),
            Err(TemplateError::Unclosed { offset: 3, .. })
        ));
        assert!(matches!(
            Template::compile("a } b"),
            Err(TemplateError::StrayBrace { offset: 2, .. })
        ));
        assert!(matches!(
            Template::compile("{}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            Template::compile("{a b}"),
            Err(TemplateError::InvalidName { .. })
        ));
        assert!(matches!(
            Template::compile("{A} and {A}"),
            Err(TemplateError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_adjacent_placeholders_match_quickly() {
        let t = Template::compile("{A}{B}{C}{D}{E}{F}{G}{H}x").unwrap();
        let text = "a".repeat(200);
        assert_eq!(t.captures(&text), None);

        let hit = t.captures(&format!("{text}x")).unwrap();
        assert_eq!(hit[0], pair("A", "a"));
        assert_eq!(hit[7].1.len(), 193);
    }

    #[test]
    fn test_loose_matching() {
        let t = Template::compile("if {A} then {B}").unwrap();
        assert!(t.loosely_matches("so if it rains then the ground is wet"));
        assert!(t.loosely_matches("IF x THEN y"));
        assert!(!t.loosely_matches("then if"));
        assert!(Template::compile("{A}").unwrap().loosely_matches(""));
    }

    #[test]
    fn test_names() {
        let t = Template::compile("{X} causes {Y}").unwrap();
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert_eq!(t.source(), "{X} causes {Y}");
    }

    #[test]
    fn test_substitute() {
        let vars = vec![pair("A", "rain"), pair("B", "wet")];
        assert_eq!(substitute("{B} because {A}", &vars), "wet because rain");
        assert_eq!(substitute("{B} and {B}", &vars), "wet and wet");
        assert_eq!(substitute("{C} stays", &vars), "{C} stays");
        assert_eq!(substitute("open { brace", &vars), "open { brace");
    }
}
