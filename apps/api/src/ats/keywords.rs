//! Job-description keyword extraction and the fixed skill vocabulary.

use std::collections::{HashMap, HashSet};

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};

use crate::ats::normalize::{normalize, tokenize};

/// Upper bound on keywords kept from a single JD.
pub const MAX_KEYWORDS: usize = 50;

/// Words that carry no signal in a JD even when longer than 3 characters.
pub const STOPWORDS: &[&str] = &[
    "about", "above", "across", "after", "also", "among", "and", "applicants", "apply", "are",
    "based", "been", "being", "best", "both", "candidate", "candidates", "company", "could",
    "daily", "each", "ensure", "every", "experience", "from", "have", "help", "here", "highly",
    "ideal", "including", "into", "join", "just", "knowledge", "like", "looking", "make", "more",
    "most", "must", "need", "needs", "other", "over", "plus", "position", "preferred",
    "required", "requirements", "responsibilities", "role", "should", "skills", "some",
    "strong", "such", "team", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "those", "through", "using", "very", "what", "when", "where", "which",
    "while", "will", "with", "within", "work", "working", "would", "year", "years", "your",
    "ability", "able", "opportunity", "people", "well",
];

/// Fixed skill vocabulary. Multi-word entries are matched as phrases.
pub const SKILL_KEYWORDS: &[&str] = &[
    // languages
    "javascript", "typescript", "python", "java", "c++", "c#", "go", "golang", "rust", "ruby",
    "php", "kotlin", "swift", "scala", "sql", "html", "css",
    // frameworks and runtimes
    "react", "angular", "vue", "node.js", "express", "django", "flask", "spring", "next.js",
    "asp.net", "graphql", "rest",
    // data and infrastructure
    "postgresql", "mysql", "mongodb", "redis", "kafka", "aws", "azure", "gcp", "docker",
    "kubernetes", "terraform", "linux", "git", "ci/cd", "microservices",
    // practices and analysis
    "agile", "scrum", "machine learning", "data analysis", "testing", "devops", "excel",
    "tableau", "figma",
    // soft skills
    "leadership", "communication", "teamwork", "problem solving", "collaboration",
    "project management", "mentoring",
];

/// A single keyword from the JD with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JdKeyword {
    pub keyword: String,
    pub frequency: u32,
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// Matches the skill vocabulary against normalized text.
/// Built once at startup and shared by the scorer.
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    matcher: AhoCorasick,
    /// Normalized vocabulary, indexed by pattern id.
    normalized: Vec<String>,
    /// Original vocabulary entries, indexed by pattern id.
    entries: Vec<&'static str>,
}

impl SkillMatcher {
    pub fn new() -> Result<Self, aho_corasick::BuildError> {
        let mut pairs: Vec<(&'static str, String)> = SKILL_KEYWORDS
            .iter()
            .map(|s| (*s, normalize(s)))
            .filter(|(_, n)| !n.is_empty())
            .collect();
        // Longest first so "javascript" wins over "java".
        pairs.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

        let (entries, normalized): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&normalized)?;

        Ok(Self {
            matcher,
            normalized,
            entries,
        })
    }

    /// Whether a normalized token is itself an entry of the skill vocabulary.
    pub fn is_skill(&self, token: &str) -> bool {
        self.normalized.iter().any(|n| n == token)
    }

    /// Skill vocabulary entries present in `text`, in vocabulary order.
    /// A hit counts only when it starts and ends on a word boundary.
    pub fn skills_in(&self, text: &str) -> Vec<&'static str> {
        let normalized = normalize(text);
        let bytes = normalized.as_bytes();
        let mut found: HashSet<usize> = HashSet::new();

        for mat in self.matcher.find_iter(&normalized) {
            let starts_word = mat.start() == 0 || bytes[mat.start() - 1] == b' ';
            let ends_word = mat.end() == bytes.len() || bytes[mat.end()] == b' ';
            if starts_word && ends_word {
                found.insert(mat.pattern().as_usize());
            }
        }

        SKILL_KEYWORDS
            .iter()
            .copied()
            .filter(|skill| {
                self.entries
                    .iter()
                    .position(|e| e == skill)
                    .map(|id| found.contains(&id))
                    .unwrap_or(false)
            })
            .collect()
    }
}

/// Extracts JD keywords: tokens longer than 3 characters that are not
/// stopwords or numbers, plus short tokens that are vocabulary skills.
/// Ordered by frequency desc, then alphabetically.
pub fn extract_keywords(jd: &str, skills: &SkillMatcher) -> Vec<JdKeyword> {
    let mut counts: HashMap<String, u32> = HashMap::new();

    for token in tokenize(jd) {
        let long_enough = token.chars().count() > 3;
        let numeric = token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '+');
        if numeric || is_stopword(&token) {
            continue;
        }
        if long_enough || skills.is_skill(&token) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut keywords: Vec<JdKeyword> = counts
        .into_iter()
        .map(|(keyword, frequency)| JdKeyword { keyword, frequency })
        .collect();
    keywords.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.keyword.cmp(&b.keyword))
    });
    keywords.truncate(MAX_KEYWORDS);
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills() -> SkillMatcher {
        SkillMatcher::new().unwrap()
    }

    const JD: &str = "Senior Backend Engineer. We need Rust and PostgreSQL expertise. \
        You will design distributed services in Rust, deploy on AWS with Docker, \
        and mentor engineers. 5+ years experience required.";

    #[test]
    fn test_extract_keywords_filters_short_words_and_stopwords() {
        let keywords = extract_keywords(JD, &skills());
        let words: Vec<&str> = keywords.iter().map(|k| k.keyword.as_str()).collect();
        assert!(words.contains(&"postgresql"));
        assert!(words.contains(&"distributed"));
        assert!(!words.contains(&"will"));
        assert!(!words.contains(&"experience"));
        assert!(!words.contains(&"and"));
    }

    #[test]
    fn test_extract_keywords_keeps_short_skills() {
        let words: Vec<String> = extract_keywords(JD, &skills()).into_iter().map(|k| k.keyword).collect();
        assert!(words.contains(&"aws".to_string()));
        assert!(words.contains(&"rust".to_string()));
    }

    #[test]
    fn test_extract_keywords_orders_by_frequency() {
        let keywords = extract_keywords(JD, &skills());
        assert_eq!(keywords[0].keyword, "rust");
        assert_eq!(keywords[0].frequency, 2);
    }

    #[test]
    fn test_extract_keywords_ignores_numbers() {
        let keywords = extract_keywords("2024 10000 kubernetes", &skills());
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "kubernetes");
    }

    #[test]
    fn test_extract_keywords_caps_at_max() {
        let jd: String = (0..120).map(|i| format!("keyword{i} ")).collect();
        assert_eq!(extract_keywords(&jd, &skills()).len(), MAX_KEYWORDS);
    }

    #[test]
    fn test_extract_keywords_empty_jd() {
        assert!(extract_keywords("", &skills()).is_empty());
    }

    #[test]
    fn test_skills_in_matches_tokens_and_phrases() {
        let skills = skills().skills_in("Led Machine Learning work in Python and C++; strong leadership.");
        assert!(skills.contains(&"machine learning"));
        assert!(skills.contains(&"python"));
        assert!(skills.contains(&"c++"));
        assert!(skills.contains(&"leadership"));
        assert!(!skills.contains(&"java"));
    }

    #[test]
    fn test_skills_in_does_not_match_substrings() {
        // "javascript" must not count as "java"
        let skills = skills().skills_in("javascript");
        assert_eq!(skills, vec!["javascript"]);
    }

    #[test]
    fn test_skills_in_requires_word_boundaries() {
        let matcher = skills();
        // "go" inside "google" and "rest" inside "restaurant" are not skills
        assert!(matcher.skills_in("Google restaurant reviews").is_empty());
        assert_eq!(matcher.skills_in("Go, REST and node.js"), vec!["go", "node.js", "rest"]);
    }

    #[test]
    fn test_is_skill_uses_normalized_entries() {
        let matcher = skills();
        assert!(matcher.is_skill("c#"));
        assert!(!matcher.is_skill("ci/cd"));
        assert!(matcher.is_skill("asp.net"));
        assert!(!matcher.is_skill("net"));
    }
}
