use std::collections::HashSet;

/// Characters that break a bank description into tokens.
const DELIMITERS: &[char] = &[
    ' ', '\t', '\r', '\n', ',', '.', '-', '/', '\\', '(', ')', '[', ']', ':', ';', '!', '?', '"',
    '\'',
];

/// Trims and uppercases a description so differently-cased statements of the
/// same payee compare equal.
pub fn normalize_description(description: &str) -> String {
    description.trim().to_uppercase()
}

/// Token-set similarity between two descriptions: the size of the shared
/// token set over the size of the combined one, in [0.0, 1.0]. Tokens of one
/// or two characters are dropped so words like "of" and "to" carry no
/// weight. Blank input scores 0.0 against anything.
pub fn description_similarity(a: &str, b: &str) -> f64 {
    if a.trim().is_empty() || b.trim().is_empty() {
        return 0.0;
    }

    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();

    intersection as f64 / union as f64
}

fn tokenize(s: &str) -> HashSet<String> {
    s.to_lowercase()
        .split(DELIMITERS)
        .filter(|token| token.chars().count() > 2)
        .map(|token| token.to_string())
        .collect()
}
