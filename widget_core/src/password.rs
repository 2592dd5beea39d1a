//! Password strength heuristic: length and character-class bonuses minus
//! penalties for repeats and well-known sequences, bucketed into five levels.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

const LABELS: [&str; 5] = ["Very Weak", "Weak", "Fair", "Good", "Strong"];

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterChecks {
    pub min_length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digit: bool,
    pub symbol: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StrengthReport {
    /// 0 (very weak) through 4 (strong).
    pub score: u8,
    pub label: &'static str,
    pub feedback: Vec<&'static str>,
    pub checks: CharacterChecks,
}

fn regex_sequence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)123|abc|qwe|password").unwrap())
}

fn regex_common_password() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)password|123456|qwerty").unwrap())
}

/// Three or more identical characters in a row.
fn has_repeat_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

pub fn password_strength_internal(password: &str) -> StrengthReport {
    let length = password.encode_utf16().count();
    let checks = CharacterChecks {
        min_length: length >= 8,
        lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
        uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
        digit: password.chars().any(|c| c.is_ascii_digit()),
        symbol: password.chars().any(|c| !c.is_ascii_alphanumeric()),
    };
    if password.is_empty() {
        return StrengthReport {
            score: 0,
            label: "Empty",
            feedback: Vec::new(),
            checks,
        };
    }

    // Half points are tallied as integers to keep the arithmetic exact.
    let mut half_points: i32 = 0;
    let mut feedback = Vec::new();
    if checks.min_length {
        half_points += 2;
    } else {
        feedback.push("Use at least 8 characters");
    }
    if length >= 12 {
        half_points += 2;
    }
    if length >= 16 {
        half_points += 1;
    }
    let classes = [
        (checks.lowercase, "Add lowercase letters"),
        (checks.uppercase, "Add uppercase letters"),
        (checks.digit, "Add numbers"),
        (checks.symbol, "Add special characters (!@#$%^&*)"),
    ];
    for (present, hint) in classes {
        if present {
            half_points += 1;
        } else {
            feedback.push(hint);
        }
    }
    if has_repeat_run(password) {
        half_points -= 1;
        feedback.push("Avoid repeating characters");
    }
    if regex_sequence().is_match(password) {
        half_points -= 2;
        feedback.push("Avoid common sequences");
    }
    if regex_common_password().is_match(password) {
        half_points -= 4;
        feedback.push("Avoid common passwords");
    }

    let score = round_half_points(half_points).clamp(0, 4) as u8;
    StrengthReport {
        score,
        label: LABELS[usize::from(score)],
        feedback,
        checks,
    }
}

/// Rounds `half_points / 2` with ties toward positive infinity.
fn round_half_points(half_points: i32) -> i32 {
    (half_points + 1).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_has_no_feedback() {
        let report = password_strength_internal("");
        assert_eq!(report.score, 0);
        assert_eq!(report.label, "Empty");
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn long_mixed_password_is_strong() {
        let report = password_strength_internal("Tr0ub4dor&Horse!");
        assert_eq!(report.score, 4);
        assert_eq!(report.label, "Strong");
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn common_password_is_penalised() {
        // 12 chars with every class would be 4, the penalties pull it to 1.
        let report = password_strength_internal("Password123!");
        assert_eq!(report.score, 1);
        assert_eq!(report.label, "Weak");
        assert!(report.feedback.contains(&"Avoid common passwords"));
        assert!(report.feedback.contains(&"Avoid common sequences"));
    }

    #[test]
    fn short_lowercase_password_gets_hints() {
        let report = password_strength_internal("abcd");
        assert_eq!(report.score, 0);
        assert_eq!(
            report.feedback,
            vec![
                "Use at least 8 characters",
                "Add uppercase letters",
                "Add numbers",
                "Add special characters (!@#$%^&*)",
                "Avoid common sequences",
            ]
        );
        assert!(report.checks.lowercase);
        assert!(!report.checks.min_length);
    }

    #[test]
    fn half_scores_round_up() {
        // 8 chars (+1), lower + upper + digit (+1.5) = 2.5 -> 3
        let report = password_strength_internal("Xkcdpl9z");
        assert_eq!(report.score, 3);
        assert_eq!(report.label, "Good");
    }

    #[test]
    fn repeats_are_flagged() {
        let report = password_strength_internal("zzzX9!mnb");
        assert!(report.feedback.contains(&"Avoid repeating characters"));
    }

    #[test]
    fn rounding_matches_ties_up() {
        assert_eq!(round_half_points(5), 3);
        assert_eq!(round_half_points(4), 2);
        assert_eq!(round_half_points(-1), 0);
        assert_eq!(round_half_points(-3), -1);
    }
}
