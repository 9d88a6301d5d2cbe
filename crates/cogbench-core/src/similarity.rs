//! Partial-credit evaluator for the spelling game.
//!
//! Two similarity formulas coexist. The blended one feeds the
//! auditory scorer's partial credit, the positional-only one is what the
//! phonics game stores as a session's phoneme accuracy and shows as live
//! feedback. They return different numbers for the same input.

/// Blended similarity in `[0, 1]`: 70% positional accuracy, 30% letter presence.
///
/// Case-insensitive. An exact match is 1.0 and an empty attempt is 0.0.
pub fn phoneme_accuracy(correct: &str, attempt: &str) -> f64 {
    let correct: Vec<char> = correct.to_lowercase().chars().collect();
    let attempt: Vec<char> = attempt.to_lowercase().chars().collect();

    if correct == attempt {
        return 1.0;
    }
    if attempt.is_empty() {
        return 0.0;
    }

    let positional = positional_ratio(&correct, &attempt);

    // Multiset intersection: each correct letter consumes at most one match.
    let mut correct_letters = correct.clone();
    correct_letters.sort_unstable();
    let mut attempt_letters = attempt.clone();
    attempt_letters.sort_unstable();

    let mut common = 0usize;
    for letter in &correct_letters {
        if let Some(idx) = attempt_letters.iter().position(|c| c == letter) {
            common += 1;
            attempt_letters.remove(idx);
        }
    }

    let letter_presence = if correct.is_empty() {
        0.0
    } else {
        common as f64 / correct.len() as f64
    };

    positional * 0.7 + letter_presence * 0.3
}

/// Positional-only similarity, used for live accuracy display.
///
/// Same exact-match and empty-attempt shortcuts as [`phoneme_accuracy`].
pub fn positional_accuracy(correct: &str, attempt: &str) -> f64 {
    let correct: Vec<char> = correct.to_lowercase().chars().collect();
    let attempt: Vec<char> = attempt.to_lowercase().chars().collect();

    if correct == attempt {
        return 1.0;
    }
    if attempt.is_empty() {
        return 0.0;
    }

    positional_ratio(&correct, &attempt)
}

/// Bucketed partial credit: 1.0 on an exact match, otherwise the blended
/// accuracy is snapped down to 0.8/0.6/0.4/0.2/0.0 with strict thresholds.
pub fn partial_credit(correct: &str, attempt: &str) -> f64 {
    if correct.to_lowercase() == attempt.to_lowercase() {
        return 1.0;
    }

    let accuracy = phoneme_accuracy(correct, attempt);
    if accuracy > 0.8 {
        0.8
    } else if accuracy > 0.6 {
        0.6
    } else if accuracy > 0.4 {
        0.4
    } else if accuracy > 0.2 {
        0.2
    } else {
        0.0
    }
}

fn positional_ratio(correct: &[char], attempt: &[char]) -> f64 {
    let max_len = correct.len().max(attempt.len());
    if max_len == 0 {
        return 0.0;
    }
    let matches = correct
        .iter()
        .zip(attempt.iter())
        .filter(|(c, a)| c == a)
        .count();
    matches as f64 / max_len as f64
}
