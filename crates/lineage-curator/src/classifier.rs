//! Keyword-based occupation classifier

use crate::error::CuratorError;
use lineage_domain::DomainClassifier;
use std::collections::{BTreeMap, BTreeSet};

/// Maps occupation labels to domain tags by whole-word keyword matching
///
/// A keyword matches when its words appear as a contiguous run of words in
/// the label, so `"painter"` matches `"court painter"` but not
/// `"painterly"`. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<(String, Vec<Vec<String>>)>,
}

impl KeywordClassifier {
    /// Build a classifier from `domain → keywords` rules
    pub fn new(rules: &BTreeMap<String, Vec<String>>) -> Result<Self, CuratorError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for (domain, keywords) in rules {
            let domain = domain.trim().to_lowercase();
            if domain.is_empty() {
                return Err(CuratorError::InvalidRule("blank domain".to_string()));
            }

            let phrases: Vec<Vec<String>> = keywords
                .iter()
                .map(|keyword| words(keyword))
                .filter(|phrase| !phrase.is_empty())
                .collect();
            if phrases.is_empty() {
                return Err(CuratorError::InvalidRule(format!("{} has no keywords", domain)));
            }

            compiled.push((domain, phrases));
        }

        Ok(Self { rules: compiled })
    }

    /// Number of domains with rules
    pub fn domain_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        let rules = default_rules()
            .into_iter()
            .map(|(domain, keywords)| (domain, keywords.iter().map(|k| words(k)).collect()))
            .collect();
        Self { rules }
    }
}

impl DomainClassifier for KeywordClassifier {
    fn classify(&self, label: &str) -> BTreeSet<String> {
        let label = words(label);

        self.rules
            .iter()
            .filter(|(_, phrases)| phrases.iter().any(|phrase| contains_run(&label, phrase)))
            .map(|(domain, _)| domain.clone())
            .collect()
    }
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}

/// Built-in classifier rules
pub(crate) fn default_rules() -> BTreeMap<String, Vec<String>> {
    let table: [(&str, &[&str]); 12] = [
        ("art", &["painter", "sculptor", "architect", "artist", "photographer", "illustrator"]),
        ("business", &["entrepreneur", "businessperson", "merchant", "banker", "industrialist"]),
        ("exploration", &["explorer", "navigator", "astronaut"]),
        ("literature", &["writer", "poet", "novelist", "playwright", "author", "essayist"]),
        ("medicine", &["physician", "surgeon", "nurse", "pharmacologist"]),
        ("military", &["military officer", "army officer", "soldier", "admiral", "military leader"]),
        ("music", &["composer", "musician", "singer", "pianist", "conductor", "violinist"]),
        ("philosophy", &["philosopher", "theologian"]),
        ("politics", &["politician", "statesman", "monarch", "emperor", "president", "diplomat"]),
        ("religion", &["priest", "monk", "bishop", "prophet", "religious leader"]),
        (
            "science",
            &[
                "scientist", "physicist", "chemist", "mathematician", "astronomer", "biologist",
                "botanist", "geologist", "naturalist", "inventor", "engineer",
            ],
        ),
        ("sports", &["athlete", "footballer", "chess player", "sprinter"]),
    ];

    table
        .into_iter()
        .map(|(domain, keywords)| {
            (domain.to_string(), keywords.iter().map(|k| k.to_string()).collect())
        })
        .collect()
}
