use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletIssue {
    pub bullet: String,
    pub reason: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletCheck {
    pub passed: bool,
    pub issues: Vec<BulletIssue>,
    pub suggestions: Vec<String>,
}

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible for",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "great",
    "many",
    "numerous",
    "various",
    "several",
];

/// Openers that read as weak even when the bullet is quantified.
const WEAK_OPENERS: &[&str] = &["i ", "my ", "was ", "duties ", "tasks "];

/// Checks one resume bullet for a quantified outcome.
///
/// PASS conditions:
/// - Contains a digit
/// - Contains `%`, `$`, `€`, `£`, `₹`
/// - Contains a `~N` estimate
///
/// FAIL conditions:
/// - Vague verbs or vague scale words without a number
/// - No measurable outcome at all
///
/// A weak opener ("I", "My", "Duties") adds an advisory issue without failing.
pub fn validate_bullet(text: &str) -> BulletCheck {
    let text = text.trim();
    let text_lower = text.to_lowercase();

    let mut issues = Vec::new();
    let mut suggestions = Vec::new();

    if let Some(opener) = WEAK_OPENERS.iter().find(|o| text_lower.starts_with(*o)) {
        issues.push(BulletIssue {
            bullet: text.to_string(),
            reason: format!("Starts with '{}' instead of an action verb", opener.trim()),
            suggestion: "Lead with a strong verb such as Built, Led, Reduced or Launched"
                .to_string(),
        });
        suggestions.push("Start each bullet with an action verb.".to_string());
    }

    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = ['$', '€', '£', '₹'].iter().any(|c| text.contains(*c));

    if has_digit || has_percent || has_currency {
        return BulletCheck {
            passed: true,
            issues,
            suggestions,
        };
    }

    let mut quantification_flagged = false;

    if let Some(vague) = VAGUE_VERBS.iter().find(|v| text_lower.contains(*v)) {
        issues.push(BulletIssue {
            bullet: text.to_string(),
            reason: format!("Contains vague verb '{vague}' without quantified impact"),
            suggestion: format!("Say how much: '{vague}' by X%, saving Y hours, for Z users"),
        });
        suggestions.push(format!(
            "Quantify '{vague}': add a number, percentage, or time saved."
        ));
        quantification_flagged = true;
    }

    if let Some(vague) = VAGUE_SCALE_WORDS.iter().find(|v| contains_word(&text_lower, v)) {
        issues.push(BulletIssue {
            bullet: text.to_string(),
            reason: format!("Uses vague scale word '{vague}' without a number"),
            suggestion: format!("Replace '{vague}' with a specific figure: '5x', '40%', '3 weeks'"),
        });
        suggestions.push(format!("Replace '{vague}' with a specific number or percentage."));
        quantification_flagged = true;
    }

    if !quantification_flagged {
        issues.push(BulletIssue {
            bullet: text.to_string(),
            reason: "No quantified outcome found".to_string(),
            suggestion: "Add a metric: a number, percentage, amount or time".to_string(),
        });
        suggestions.push("Add a specific number, percentage, or time metric.".to_string());
    }

    BulletCheck {
        passed: false,
        issues,
        suggestions,
    }
}

/// Validates a batch of bullets, collecting every issue.
pub fn validate_bullets(bullets: &[String]) -> BulletCheck {
    let mut all_issues = Vec::new();
    let mut all_suggestions = Vec::new();
    let mut any_failed = false;

    for bullet in bullets.iter().filter(|b| !b.trim().is_empty()) {
        let result = validate_bullet(bullet);
        any_failed |= !result.passed;
        all_issues.extend(result.issues);
        for s in result.suggestions {
            if !all_suggestions.contains(&s) {
                all_suggestions.push(s);
            }
        }
    }

    BulletCheck {
        passed: !any_failed,
        issues: all_issues,
        suggestions: all_suggestions,
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_with_percentage() {
        assert!(validate_bullet("Reduced latency by 40% through caching").passed);
    }

    #[test]
    fn test_pass_with_currency() {
        assert!(validate_bullet("Saved $50,000 annually by optimizing queries").passed);
        assert!(validate_bullet("Generated €200k in new revenue").passed);
    }

    #[test]
    fn test_pass_with_count() {
        assert!(validate_bullet("Trained 15 engineers on the release process").passed);
    }

    #[test]
    fn test_pass_with_tilde_estimate() {
        assert!(validate_bullet("Cut deployment time by ~2 hours").passed);
    }

    #[test]
    fn test_fail_improved_without_metrics() {
        let r = validate_bullet("Improved the user experience");
        assert!(!r.passed);
        assert!(r.issues[0].reason.contains("vague verb"));
    }

    #[test]
    fn test_fail_responsible_for() {
        assert!(!validate_bullet("Responsible for backend services").passed);
    }

    #[test]
    fn test_fail_vague_scale_word() {
        let r = validate_bullet("Delivered significant performance gains");
        assert!(!r.passed);
        assert!(r.issues[0].reason.contains("vague scale word"));
    }

    #[test]
    fn test_scale_word_must_be_whole_word() {
        // "greatly" is not "great", "manycore" is not "many"
        let r = validate_bullet("Architected manycore scheduler");
        assert!(!r.passed);
        assert_eq!(r.issues[0].reason, "No quantified outcome found");
    }

    #[test]
    fn test_weak_opener_is_advisory_when_quantified() {
        let r = validate_bullet("I reduced build time by 30%");
        assert!(r.passed);
        assert_eq!(r.issues.len(), 1);
        assert!(r.issues[0].reason.contains("action verb"));
    }

    #[test]
    fn test_validate_bullets_mixed() {
        let bullets = vec![
            "Reduced latency by 40%".to_string(),
            "Improved the user experience".to_string(),
        ];
        let r = validate_bullets(&bullets);
        assert!(!r.passed);
        assert_eq!(r.issues.len(), 1);
    }

    #[test]
    fn test_validate_bullets_skips_blank_and_dedups_suggestions() {
        let bullets = vec![
            "Built the billing service".to_string(),
            "   ".to_string(),
            "Wrote the onboarding docs".to_string(),
        ];
        let r = validate_bullets(&bullets);
        assert!(!r.passed);
        assert_eq!(r.issues.len(), 2);
        assert_eq!(r.suggestions.len(), 1);
    }

    #[test]
    fn test_validate_bullets_empty() {
        assert!(validate_bullets(&[]).passed);
    }
}
