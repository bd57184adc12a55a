use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::{CoreError, CoreResult};

/// A BCP 47 language tag with canonical casing. Underscores are accepted as
/// separators so POSIX-style names such as `pt_BR` parse too.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageTag {
    normalized: String,
    match_subtags: Vec<String>,
}

impl LanguageTag {
    pub fn parse(input: &str) -> CoreResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput("language tag is empty"));
        }

        let mut normalized = Vec::new();
        let mut match_subtags = Vec::new();
        let mut seen_script = false;
        let mut seen_region = false;
        // Cleared by the first singleton; extension and private-use subtags
        // are kept in the tag but never matched.
        let mut matching = true;

        for (position, subtag) in trimmed.split(['-', '_']).enumerate() {
            if subtag.is_empty() {
                return Err(CoreError::InvalidInput("language tag has empty subtag"));
            }
            if !subtag.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
                return Err(CoreError::InvalidInput("language tag has invalid characters"));
            }

            let canonical = if position == 0 {
                if !is_alpha(subtag) || !(2..=8).contains(&subtag.len()) {
                    return Err(CoreError::InvalidInput("invalid language subtag"));
                }
                subtag.to_ascii_lowercase()
            } else if subtag.len() == 1 {
                matching = false;
                subtag.to_ascii_lowercase()
            } else if matching && !seen_script && subtag.len() == 4 && is_alpha(subtag) {
                seen_script = true;
                titlecase(subtag)
            } else if matching && !seen_region && is_region(subtag) {
                seen_region = true;
                subtag.to_ascii_uppercase()
            } else {
                subtag.to_ascii_lowercase()
            };

            if matching {
                match_subtags.push(canonical.clone());
            }
            normalized.push(canonical);
        }

        Ok(Self {
            normalized: normalized.join("-"),
            match_subtags,
        })
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn language(&self) -> &str {
        self.match_subtags
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Subtags used for lookup; extensions and private-use parts are excluded.
    pub fn match_subtags(&self) -> &[String] {
        &self.match_subtags
    }
}

impl FromStr for LanguageTag {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        LanguageTag::parse(value)
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

fn is_alpha(value: &str) -> bool {
    value.chars().all(|ch| ch.is_ascii_alphabetic())
}

fn is_region(value: &str) -> bool {
    (value.len() == 2 && is_alpha(value))
        || (value.len() == 3 && value.chars().all(|ch| ch.is_ascii_digit()))
}

fn titlecase(value: &str) -> String {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut output = first.to_ascii_uppercase().to_string();
    output.extend(chars.map(|ch| ch.to_ascii_lowercase()));
    output
}
