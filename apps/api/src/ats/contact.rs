use regex::Regex;

/// Compiled patterns for contact details and experience years.
/// Built once at startup and shared by the scorer, parser and validator.
#[derive(Debug, Clone)]
pub struct TextPatterns {
    pub email: Regex,
    pub phone: Regex,
    pub linkedin: Regex,
    pub url: Regex,
    pub years: Regex,
}

impl TextPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b")?,
            phone: Regex::new(r"[+(]?\d[\d ().-]{6,22}\d")?,
            linkedin: Regex::new(r"(?i)\b(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[a-z0-9_-]+/?")?,
            url: Regex::new(r"(?i)\b(?:https?://|www\.)[^\s,;|]+|\bgithub\.com/[^\s,;|]+")?,
            years: Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b")?,
        })
    }

    pub fn find_email<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.email.find(text).map(|m| m.as_str())
    }

    pub fn find_phone<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.phone
            .find_iter(text)
            .find(|m| on_word_boundary(text, m.start(), m.end()) && looks_like_phone(m.as_str()))
            .map(|m| m.as_str())
    }

    pub fn find_linkedin<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.linkedin.find(text).map(|m| m.as_str())
    }

    /// First non-LinkedIn URL.
    pub fn find_website<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.url
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|u| !u.to_ascii_lowercase().contains("linkedin.com"))
    }

    /// Largest "N years" / "N+ yrs" figure in the text.
    pub fn max_years(&self, text: &str) -> Option<u32> {
        self.years
            .captures_iter(text)
            .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
            .max()
    }

    /// Whole-string email check, used by field validation.
    pub fn is_email(&self, value: &str) -> bool {
        self.email
            .find(value.trim())
            .map(|m| m.as_str().len() == value.trim().len())
            .unwrap_or(false)
    }

    /// Whole-string phone check, used by field validation.
    pub fn is_phone(&self, value: &str) -> bool {
        let value = value.trim();
        self.phone
            .find(value)
            .map(|m| m.as_str().len() == value.len() && looks_like_phone(value))
            .unwrap_or(false)
    }
}

/// Digits a phone number may carry, country code included.
const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=15;

/// A digit run reads as a phone number when it has 10 to 15 digits and a
/// phone shape: a leading `+` or `(`, or separated groups that are not all years.
fn looks_like_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if !PHONE_DIGITS.contains(&digits) {
        return false;
    }
    if candidate.starts_with(['+', '(']) {
        return true;
    }

    let groups: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    let all_years = groups
        .iter()
        .all(|g| g.len() == 4 && matches!(g.parse::<u32>(), Ok(1900..=2099)));
    groups.len() >= 2 && !all_years
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns() -> TextPatterns {
        TextPatterns::new().unwrap()
    }

    #[test]
    fn test_find_email() {
        let p = patterns();
        assert_eq!(
            p.find_email("Contact: jane.doe+jobs@mail.example.com | 555"),
            Some("jane.doe+jobs@mail.example.com")
        );
        assert_eq!(p.find_email("no email here"), None);
    }

    #[test]
    fn test_find_phone_formats() {
        let p = patterns();
        assert!(p.find_phone("Call (555) 123-4567 today").is_some());
        assert!(p.find_phone("+44 20 7946 0958").is_some());
        assert!(p.find_phone("555.123.4567").is_some());
        assert_eq!(p.find_phone("Rust, Go, SQL"), None);
        assert_eq!(
            p.find_phone("jane@example.com | (555) 123-4567 | linkedin"),
            Some("(555) 123-4567")
        );
    }

    #[test]
    fn test_digit_runs_and_years_are_not_phones() {
        let p = patterns();
        assert_eq!(
            p.find_phone("Processed 25000000 records across 2019 2020 2021 audits"),
            None
        );
        assert_eq!(p.find_phone("Order 5551234567 shipped"), None);
        assert_eq!(p.find_phone("ID5551234567"), None);
        assert_eq!(p.find_phone("call 555-12"), None);
        assert!(p.find_phone("+15551234567").is_some());
    }

    #[test]
    fn test_find_linkedin_and_website() {
        let p = patterns();
        let text = "linkedin.com/in/jane-doe | https://janedoe.dev";
        assert_eq!(p.find_linkedin(text), Some("linkedin.com/in/jane-doe"));
        assert_eq!(p.find_website(text), Some("https://janedoe.dev"));
    }

    #[test]
    fn test_max_years() {
        let p = patterns();
        assert_eq!(p.max_years("3 years of Go and 7+ yrs of Java"), Some(7));
        assert_eq!(p.max_years("5+ Years required"), Some(5));
        assert_eq!(p.max_years("no figures"), None);
    }

    #[test]
    fn test_is_email_requires_whole_value() {
        let p = patterns();
        assert!(p.is_email("  a@b.io "));
        assert!(!p.is_email("mail me at a@b.io"));
        assert!(!p.is_email("not-an-email"));
    }

    #[test]
    fn test_is_phone_requires_whole_value() {
        let p = patterns();
        assert!(p.is_phone("+1 555 123 4567"));
        assert!(!p.is_phone("call 555 123 4567"));
        assert!(!p.is_phone("2019 2020 2021"));
    }
}
