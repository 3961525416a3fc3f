use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::matching::skills::extract_skills;

static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x09\x0b-\x1f\x7f-\x9f]").unwrap());
static INLINE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Resume text plus the attributes derived from it.
#[derive(Debug, Clone)]
pub struct Resume {
    pub text: String,
    /// `text` lower-cased once, for the substring heuristics.
    pub lowered: String,
    pub skills: BTreeSet<String>,
}

impl Resume {
    /// Cleans raw text and derives the skill set. Empty input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = clean_text(raw);
        if text.is_empty() {
            return None;
        }
        let skills = extract_skills(&text);
        Some(Self {
            lowered: text.to_lowercase(),
            skills,
            text,
        })
    }
}

/// Strips control characters and collapses inline whitespace while keeping
/// the line structure the experience heuristics depend on.
pub fn clean_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let tabs_as_spaces = normalized.replace('\t', " ");
    let stripped = CONTROL_CHARS.replace_all(&tabs_as_spaces, "");
    let lines: Vec<String> = stripped
        .lines()
        .map(|line| INLINE_WHITESPACE.replace_all(line, " ").trim().to_string())
        .collect();
    let joined = lines.join("\n");
    BLANK_RUNS.replace_all(&joined, "\n\n").trim().to_string()
}
