use std::collections::BTreeSet;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Inverse of [`sigmoid`]. Callers keep `p` strictly inside (0, 1).
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Replace NaN/infinity with `fallback`, then clamp to `[lo, hi]`.
pub fn sanitize(value: f64, fallback: f64, lo: f64, hi: f64) -> f64 {
    let value = if value.is_finite() { value } else { fallback };
    value.clamp(lo, hi)
}

pub const RIGOR_CAP: u32 = 12;

/// AP/IB course load normalized to [0, 1], saturating at 12 courses.
pub fn rigor_norm(ap_count: u32) -> f64 {
    (ap_count.min(RIGOR_CAP) as f64 / RIGOR_CAP as f64).clamp(0.0, 1.0)
}

/// Extracurricular tier mapped to [0, 1]. Tier 1 is the strongest;
/// unknown tiers count as average.
pub fn ec_norm(tier: u8) -> f64 {
    match tier {
        1 => 1.0,
        2 => 0.75,
        3 => 0.5,
        4 => 0.25,
        _ => 0.5,
    }
}

/// Lowercase words longer than three letters, in order of appearance.
/// Anything that is not a letter separates words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| word.chars().count() > 3)
        .map(str::to_string)
        .collect()
}

/// Number of distinct words of `a` that also appear in `b`.
pub fn token_overlap(a: &[String], b: &[String]) -> usize {
    let b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
    a.iter()
        .map(String::as_str)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .filter(|word| b.contains(word))
        .count()
}

pub const FIT_STRONG: f64 = 0.85;
pub const FIT_PARTIAL: f64 = 0.70;
pub const FIT_NEUTRAL: f64 = 0.55;

/// Lexical fit between an intended major and a school's strengths text.
///
/// Each shared word is a hit, and the full major phrase appearing verbatim
/// in the strengths counts as one more. Two or more hits is a strong fit,
/// one is partial. A blank major is neutral.
pub fn major_fit_score(major: &str, strengths: &str) -> f64 {
    if major.trim().is_empty() {
        return FIT_NEUTRAL;
    }

    let major_tokens = tokenize(major);
    let strength_tokens = tokenize(strengths);
    let mut hits = token_overlap(&major_tokens, &strength_tokens);

    if !major_tokens.is_empty() {
        let phrase = format!(" {} ", major_tokens.join(" "));
        let haystack = format!(" {} ", strength_tokens.join(" "));
        if haystack.contains(&phrase) {
            hits += 1;
        }
    }

    match hits {
        0 => FIT_NEUTRAL,
        1 => FIT_PARTIAL,
        _ => FIT_STRONG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sigmoid_logit_inverse() {
        assert_eq!(sigmoid(0.0), 0.5);
        for p in [0.01, 0.08, 0.5, 0.9] {
            assert!((sigmoid(logit(p)) - p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f64::NAN, 2.0, 2.0, 4.0), 2.0);
        assert_eq!(sanitize(f64::INFINITY, 0.2, 0.005, 0.95), 0.2);
        assert_eq!(sanitize(5.0, 2.0, 2.0, 4.0), 4.0);
        assert_eq!(sanitize(3.3, 2.0, 2.0, 4.0), 3.3);
    }

    #[test]
    fn test_rigor_norm_saturates() {
        assert_eq!(rigor_norm(0), 0.0);
        assert_eq!(rigor_norm(6), 0.5);
        assert_eq!(rigor_norm(12), 1.0);
        assert_eq!(rigor_norm(30), 1.0);
    }

    #[test]
    fn test_ec_norm_tiers() {
        assert_eq!(ec_norm(1), 1.0);
        assert_eq!(ec_norm(2), 0.75);
        assert_eq!(ec_norm(3), 0.5);
        assert_eq!(ec_norm(4), 0.25);
        assert_eq!(ec_norm(0), 0.5);
        assert_eq!(ec_norm(9), 0.5);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Biology, Chemistry & Pre-Med Research"),
            words(&["biology", "chemistry", "research"])
        );
        assert_eq!(tokenize("Art, Law, Film"), words(&["film"]));
        assert_eq!(tokenize("Computer-Science"), words(&["computer", "science"]));
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_token_overlap_counts_distinct() {
        let a = words(&["biology", "biology", "marine"]);
        let b = words(&["biology", "chemistry"]);
        assert_eq!(token_overlap(&a, &b), 1);
        assert_eq!(token_overlap(&b, &a), 1);
        assert_eq!(token_overlap(&[], &b), 0);
    }

    #[test]
    fn test_major_fit_blank_major() {
        assert_eq!(major_fit_score("", "Biology"), FIT_NEUTRAL);
        assert_eq!(major_fit_score("   ", "Biology"), FIT_NEUTRAL);
    }

    #[test]
    fn test_major_fit_exact_single_word_is_strong() {
        assert_eq!(
            major_fit_score("Biology", "Biology, Chemistry, Research"),
            FIT_STRONG
        );
    }

    #[test]
    fn test_major_fit_two_shared_words() {
        assert_eq!(
            major_fit_score("Computer Science", "Science, Engineering, Computer Architecture"),
            FIT_STRONG
        );
    }

    #[test]
    fn test_major_fit_one_shared_word() {
        assert_eq!(
            major_fit_score("Political Science", "Physics, Computer Science"),
            FIT_PARTIAL
        );
    }

    #[test]
    fn test_major_fit_no_overlap() {
        assert_eq!(major_fit_score("History", "Engineering, Physics"), FIT_NEUTRAL);
        // Short words never count
        assert_eq!(major_fit_score("Art", "Art, Music"), FIT_NEUTRAL);
    }

    #[test]
    fn test_major_fit_phrase_needs_whole_words() {
        // "biology" inside "microbiology" is neither a shared word nor a phrase match
        assert_eq!(major_fit_score("Biology", "Microbiology, Chemistry"), FIT_NEUTRAL);
    }
}
