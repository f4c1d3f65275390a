//! Common utility functions

pub fn truncate_display(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// True when the text has hiragana, katakana or CJK unified ideographs.
pub fn contains_japanese(s: &str) -> bool {
    s.chars().any(|c| {
        matches!(c,
            '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}')
    })
}

pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_japanese() {
        assert!(contains_japanese("Hello こんにちは"));
        assert!(contains_japanese("カタカナ"));
        assert!(contains_japanese("漢字"));
        assert!(!contains_japanese("Plain English, 123!"));
        assert!(!contains_japanese(""));
    }

    #[test]
    fn test_truncate_and_mask() {
        assert_eq!(truncate_display("ウマ娘です", 3), "ウマ娘...");
        assert_eq!(truncate_display("short", 10), "short");
        assert_eq!(mask_key("sk-1234567890"), "sk-1...7890");
        assert_eq!(mask_key("abc"), "***");
    }
}
