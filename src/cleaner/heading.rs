// file: src/cleaner/heading.rs
// description: heading repair for duplicated and concatenated heading text
// reference: ordered strategy cascade, first match wins

/// Upper bound on cascade re-runs for a single heading.
const MAX_PASSES: usize = 32;

/// Longest word n-gram considered when looking for an immediate repeat.
const MAX_HEADING_NGRAM: usize = 10;

/// Only words longer than this are candidates for concatenation repair.
const MIN_CONCATENATED_LEN: usize = 10;

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("char_mirror", char_mirror),
    ("repeated_word_pattern", repeated_word_pattern),
    ("word_mirror", word_mirror),
    ("repeated_ngram", repeated_ngram),
    ("concatenation_split", concatenation_split),
];

/// Normalize the text of a heading (markers already stripped).
///
/// The cascade is re-run on its own output until nothing changes, which
/// covers headings carrying several embedded repeats and keeps the result
/// stable under repeated cleaning.
pub fn normalize_heading(text: &str) -> String {
    let mut current = text.trim().to_string();

    for _ in 0..MAX_PASSES {
        let next = apply_cascade(&current);
        if next == current {
            break;
        }
        current = next;
    }

    current
}

fn apply_cascade(text: &str) -> String {
    for (name, strategy) in STRATEGIES {
        if let Some(repaired) = strategy(text) {
            tracing::trace!(strategy = *name, before = text, after = %repaired, "heading repaired");
            return repaired;
        }
    }
    collapse_consecutive_words(text)
}

/// "Farlig svingFarlig sving" style: the space-free text is two equal halves.
pub fn char_mirror(text: &str) -> Option<String> {
    let compact: Vec<char> = text.chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() || compact.len() % 2 != 0 {
        return None;
    }

    let half = compact.len() / 2;
    if compact[..half] != compact[half..] {
        return None;
    }

    let original: Vec<char> = text.chars().collect();
    let cut: String = original[..original.len() / 2].iter().collect();
    Some(cut.trim().to_string())
}

/// A single word made of one shorter unit repeated, e.g. "StoppStoppStopp".
pub fn repeated_word_pattern(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() != 1 {
        return None;
    }

    let chars: Vec<char> = words[0].chars().collect();
    let len = chars.len();

    (1..=len / 2)
        .filter(|unit| len % unit == 0)
        .find(|&unit| {
            chars
                .chunks(unit)
                .all(|chunk| chunk == &chars[..unit])
        })
        .map(|unit| chars[..unit].iter().collect())
}

/// The first half of the word sequence equals the second half.
pub fn word_mirror(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    mirrored_half(&words)
}

/// A word n-gram immediately followed by an identical copy; one copy goes.
pub fn repeated_ngram(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let longest = MAX_HEADING_NGRAM.min(words.len() / 2);

    for size in (2..=longest).rev() {
        for start in 0..words.len() - size {
            let next = start + size;
            if next + size > words.len() {
                break;
            }
            if words[start..next] == words[next..next + size] {
                let mut kept = words[..next].to_vec();
                kept.extend_from_slice(&words[next + size..]);
                return Some(kept.join(" "));
            }
        }
    }

    None
}

/// Splits a long word at an interior capital ("reaksjonerOffentlige") and
/// accepts the first split that makes the word sequence mirror itself.
pub fn concatenation_split(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    for (index, word) in words.iter().enumerate() {
        if word.chars().count() <= MIN_CONCATENATED_LEN {
            continue;
        }

        for (offset, ch) in word.char_indices().skip(1) {
            if !ch.is_uppercase() {
                continue;
            }

            let (head, tail) = word.split_at(offset);
            let mut candidate: Vec<&str> = words[..index].to_vec();
            candidate.push(head);
            candidate.push(tail);
            candidate.extend_from_slice(&words[index + 1..]);

            if let Some(half) = mirrored_half(&candidate) {
                return Some(half);
            }
        }
    }

    None
}

/// Drops words that repeat the previous word, ignoring case.
pub fn collapse_consecutive_words(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut previous: Option<String> = None;

    for word in text.split_whitespace() {
        let lowered = word.to_lowercase();
        if previous.as_deref() != Some(lowered.as_str()) {
            kept.push(word);
        }
        previous = Some(lowered);
    }

    kept.join(" ")
}

fn mirrored_half(words: &[&str]) -> Option<String> {
    if words.len() < 2 || words.len() % 2 != 0 {
        return None;
    }
    let half = words.len() / 2;
    if words[..half] == words[half..] {
        Some(words[..half].join(" "))
    } else {
        None
    }
}
