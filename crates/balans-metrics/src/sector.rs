//! Activity-code classification.

/// NACE patterns of the construction sector.
pub const CONSTRUCTION_PATTERNS: [&str; 3] = ["41*", "42*", "43*"];

/// Match an activity code against a wildcard pattern.
///
/// `*` matches any run of characters (including none) and `?` exactly one.
/// Dots in the code are ignored, so `41.201` and `41201` are the same code.
pub fn matches_pattern(code: &str, pattern: &str) -> bool {
    let code: Vec<char> = code.trim().chars().filter(|c| *c != '.').collect();
    let pattern: Vec<char> = pattern.trim().chars().collect();
    glob(&code, &pattern)
}

fn glob(code: &[char], pattern: &[char]) -> bool {
    match pattern.split_first() {
        None => code.is_empty(),
        Some((&'*', rest)) => (0..=code.len()).any(|skip| glob(&code[skip..], rest)),
        Some((&'?', rest)) => !code.is_empty() && glob(&code[1..], rest),
        Some((c, rest)) => code.first() == Some(c) && glob(&code[1..], rest),
    }
}

/// True when the activity code falls in the construction sector.
///
/// An unknown activity code is not construction.
pub fn is_construction(activity_code: Option<&str>) -> bool {
    activity_code.is_some_and(|code| {
        CONSTRUCTION_PATTERNS
            .iter()
            .any(|pattern| matches_pattern(code, pattern))
    })
}
