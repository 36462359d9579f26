//! Part-number gating of directive entries.

use std::collections::HashMap;

use log::warn;
use regex::Regex;
use socgen_model::{AddedControl, ControlRef, DefaultOverride};

/// A directive entry that may be restricted to parts matching `partRegexp`.
pub trait PartQualified {
    fn part_regexp(&self) -> Option<&str>;

    /// Whether this entry applies to the part named `soc_name`.
    fn applies_to(&self, soc_name: &str) -> bool {
        part_matches(self.part_regexp(), soc_name)
    }
}

impl PartQualified for ControlRef {
    fn part_regexp(&self) -> Option<&str> {
        self.part_regexp.as_deref()
    }
}

impl PartQualified for AddedControl {
    fn part_regexp(&self) -> Option<&str> {
        self.part_regexp.as_deref()
    }
}

impl PartQualified for DefaultOverride {
    fn part_regexp(&self) -> Option<&str> {
        self.part_regexp.as_deref()
    }
}

/// An absent pattern matches every part. The pattern is unanchored, so
/// `"MAX326"` matches `"MAX32690"` and `"XMAX326"`.
///
/// An invalid pattern matches nothing.
pub fn part_matches(pattern: Option<&str>, soc_name: &str) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    match Regex::new(pattern) {
        Ok(re) => re.is_match(soc_name),
        Err(e) => {
            warn!("ignoring directive entry with invalid partRegexp '{pattern}': {e}");
            false
        }
    }
}

/// [`part_matches`] for one part, remembering each pattern's verdict so a
/// directive compiles every distinct `partRegexp` once.
#[derive(Debug, Clone)]
pub struct PartMatcher<'s> {
    soc_name: &'s str,
    verdicts: HashMap<String, bool>,
}

impl<'s> PartMatcher<'s> {
    pub fn new(soc_name: &'s str) -> Self {
        Self {
            soc_name,
            verdicts: HashMap::new(),
        }
    }

    pub fn matches(&mut self, pattern: Option<&str>) -> bool {
        let Some(pattern) = pattern else {
            return true;
        };
        if let Some(&verdict) = self.verdicts.get(pattern) {
            return verdict;
        }
        let verdict = part_matches(Some(pattern), self.soc_name);
        self.verdicts.insert(pattern.to_string(), verdict);
        verdict
    }

    pub fn applies(&mut self, entry: &impl PartQualified) -> bool {
        self.matches(entry.part_regexp())
    }
}
