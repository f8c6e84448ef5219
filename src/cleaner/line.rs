// file: src/cleaner/line.rs
// description: removes repeated sentences and repeated word runs inside one body line
// reference: sentence split on terminal punctuation, word n-gram scan

use super::patterns::{SENTENCE_BREAK, WHITESPACE_RUN};
use std::collections::HashSet;

const MAX_PASSES: usize = 64;

/// Word n-gram dedup only looks at lines with more words than this.
const MIN_NGRAM_LINE_WORDS: usize = 4;
const MAX_LINE_NGRAM: usize = 8;
const MIN_LINE_NGRAM: usize = 3;

pub fn normalize_line(line: &str) -> String {
    let mut current = line.to_string();

    for _ in 0..MAX_PASSES {
        let next = dedupe_ngrams(&dedupe_sentences(&current));
        if next == current {
            break;
        }
        current = next;
    }

    current
}

/// Drops sentences whose normalized form already appeared earlier in the line.
/// Surviving sentences keep their original text and order.
pub fn dedupe_sentences(line: &str) -> String {
    let sentences: Vec<&str> = SENTENCE_BREAK
        .split(line)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() < 2 {
        return line.to_string();
    }

    let mut seen = HashSet::new();
    let unique: Vec<&str> = sentences
        .iter()
        .copied()
        .filter(|sentence| seen.insert(sentence_key(sentence)))
        .collect();

    if unique.len() == sentences.len() {
        return line.to_string();
    }

    let mut rebuilt = unique.join(". ");
    if !rebuilt.is_empty() && !rebuilt.ends_with(TERMINALS) {
        rebuilt.push('.');
    }
    rebuilt
}

const TERMINALS: [char; 3] = ['.', '!', '?'];

fn sentence_key(sentence: &str) -> String {
    let lowered = sentence.to_lowercase();
    WHITESPACE_RUN
        .replace_all(lowered.trim_end_matches(TERMINALS), " ")
        .into_owned()
}

/// Removes a later copy of a repeated word run, longest runs first, until
/// the line holds no repeated run of three or more words.
pub fn dedupe_ngrams(line: &str) -> String {
    let mut current = line.to_string();

    for _ in 0..MAX_PASSES {
        match remove_repeated_run(&current) {
            Some(shorter) => current = shorter,
            None => break,
        }
    }

    current
}

fn remove_repeated_run(line: &str) -> Option<String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() <= MIN_NGRAM_LINE_WORDS {
        return None;
    }

    let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let longest = MAX_LINE_NGRAM.min(words.len() / 2);

    for size in (MIN_LINE_NGRAM..=longest).rev() {
        for start in 0..words.len() - size {
            let pattern = &lowered[start..start + size];
            let rest_start = start + size;

            let repeat = (rest_start..=words.len() - size)
                .find(|&candidate| &lowered[candidate..candidate + size] == pattern);

            if let Some(found) = repeat {
                let mut kept: Vec<&str> = words[..found].to_vec();
                kept.extend_from_slice(&words[found + size..]);
                return Some(kept.join(" "));
            }
        }
    }

    None
}
