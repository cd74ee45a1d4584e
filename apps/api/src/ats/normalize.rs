//! Text normalization shared by every scorer.

/// Lowercases and strips punctuation while keeping tokens like `c++`, `c#`
/// and `node.js` intact. Whitespace is collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() || c == '+' || c == '#' || c == '.' {
            cleaned.extend(c.to_lowercase());
        } else {
            cleaned.push(' ');
        }
    }

    cleaned
        .split_whitespace()
        .map(|token| token.trim_matches('.'))
        .filter(|token| !token.is_empty() && token.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hello, World!"), "hello world");
    }

    #[test]
    fn test_normalize_keeps_language_names() {
        assert_eq!(normalize("C++, C# and Node.js."), "c++ c# and node.js");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  rust \n\t  go  "), "rust go");
    }

    #[test]
    fn test_normalize_drops_lone_symbols() {
        assert_eq!(normalize("design + build ..."), "design build");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_tokenize_splits_words() {
        assert_eq!(tokenize("Built REST APIs (Rust)"), vec!["built", "rest", "apis", "rust"]);
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("one two\nthree"), 3);
    }
}
