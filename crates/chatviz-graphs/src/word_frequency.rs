//! Word frequency analysis for the word cloud

use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

/// Tokens: a word character followed by word characters or apostrophes
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w[\w']*").expect("Failed to compile token regex")
});

/// Common English words left out of the cloud
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't",
    "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during", "each",
    "else", "ever", "few", "for", "from", "further", "get", "had", "hadn't", "has", "hasn't",
    "have", "haven't", "having", "he", "he'd", "he'll", "he's", "hence", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "however", "http",
    "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's",
    "its", "itself", "just", "k", "let's", "like", "me", "more", "most", "mustn't", "my",
    "myself", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own", "r", "same",
    "shall", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "since",
    "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "therefore", "these", "they", "they'd",
    "they'll", "they're", "they've", "this", "those", "through", "to", "too", "under",
    "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
    "weren't", "what", "what's", "when", "when's", "where", "where's", "which", "while",
    "who", "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't", "www",
    "you", "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// One word of the cloud with its raw count and weight relative to the top word
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordFrequency {
    pub word: String,
    pub count: u64,
    pub weight: f64,
}

/// Word pairs scoring above this are kept as a single entry
const COLLOCATION_THRESHOLD: f64 = 30.0;

/// Spellings of one case-folded word, in first-seen order
#[derive(Debug, Default)]
struct CaseCounts {
    spellings: Vec<(String, u64)>,
}

impl CaseCounts {
    fn add(&mut self, spelling: &str, count: u64) {
        match self.spellings.iter_mut().find(|(s, _)| s == spelling) {
            Some((_, n)) => *n += count,
            None => self.spellings.push((spelling.to_string(), count)),
        }
    }

    fn total(&self) -> u64 {
        self.spellings.iter().map(|(_, n)| n).sum()
    }

    /// Most frequent spelling; earliest wins ties
    fn representative(&self) -> &str {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.spellings {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map_or("", |(s, _)| s.as_str())
    }
}

/// Case-folded tallies of a token stream
#[derive(Debug, Default)]
struct FoldedCounts {
    /// Representative spelling and count, in first-seen order
    entries: Vec<(String, u64)>,
    /// Lowercase form (merged plurals included) to representative spelling
    standard: HashMap<String, String>,
}

/// Word frequency analyzer with a configurable stop list
#[derive(Debug, Clone)]
pub struct WordFrequencyAnalyzer {
    stopwords: HashSet<String>,
    max_words: usize,
    collocations: bool,
}

impl WordFrequencyAnalyzer {
    /// Analyzer using the built-in stop words plus `extra`
    pub fn new(extra: &[String], max_words: usize) -> Self {
        let stopwords = STOPWORDS
            .iter()
            .map(|w| (*w).to_string())
            .chain(extra.iter().map(|w| w.to_lowercase()))
            .collect();
        Self {
            stopwords,
            max_words,
            collocations: true,
        }
    }

    /// Enable or disable counting word pairs as collocations
    pub fn with_collocations(mut self, collocations: bool) -> Self {
        self.collocations = collocations;
        self
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Tokenize `text` and drop possessives, numbers and stop words
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        words(text)
            .into_iter()
            .filter(|word| !self.is_stopword(word))
            .collect()
    }

    /// Ranked word frequencies, at most `max_words`, largest first.
    ///
    /// With collocations on, an entry may be a pair of words joined by a
    /// space. Empty when nothing survives filtering.
    pub fn frequencies(&self, text: &str) -> Vec<WordFrequency> {
        let words = words(text);
        let unigrams: Vec<&str> = words
            .iter()
            .copied()
            .filter(|word| !self.is_stopword(word))
            .collect();
        let folded = fold_tokens(&unigrams);

        let mut counts = if self.collocations {
            self.promote_collocations(&words, &folded, unigrams.len() as u64)
        } else {
            folded.entries
        };
        // Stable: ties keep first-seen order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(self.max_words);

        let max = counts.first().map_or(1, |(_, count)| *count).max(1) as f64;
        let result: Vec<WordFrequency> = counts
            .into_iter()
            .map(|(word, count)| WordFrequency {
                word,
                count,
                weight: count as f64 / max,
            })
            .collect();

        debug!(tokens = unigrams.len(), words = result.len(), "Computed word frequencies");
        result
    }

    /// Add adjacent word pairs whose likelihood ratio clears the threshold.
    ///
    /// A promoted pair's count is taken from both of its words; words left
    /// with nothing are dropped. Pairs touching a stop word never count.
    fn promote_collocations(
        &self,
        words: &[&str],
        unigrams: &FoldedCounts,
        n_words: u64,
    ) -> Vec<(String, u64)> {
        let pairs: Vec<String> = words
            .windows(2)
            .filter(|pair| !pair.iter().any(|word| self.is_stopword(word)))
            .map(|pair| format!("{} {}", pair[0], pair[1]))
            .collect();
        let bigrams = fold_tokens(&pairs);

        let totals: HashMap<&str, u64> = unigrams
            .entries
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        let index: HashMap<&str, usize> = unigrams
            .entries
            .iter()
            .enumerate()
            .map(|(i, (word, _))| (word.as_str(), i))
            .collect();
        let mut counts: Vec<(String, i64)> = unigrams
            .entries
            .iter()
            .map(|(word, count)| (word.clone(), *count as i64))
            .collect();

        let mut promoted = 0usize;
        for (pair, count) in bigrams.entries {
            let Some((first, second)) = pair.split_once(' ') else {
                continue;
            };
            let (Some(first), Some(second)) = (
                unigrams.standard.get(&first.to_lowercase()),
                unigrams.standard.get(&second.to_lowercase()),
            ) else {
                continue;
            };
            let (Some(&c1), Some(&c2), Some(&i1), Some(&i2)) = (
                totals.get(first.as_str()),
                totals.get(second.as_str()),
                index.get(first.as_str()),
                index.get(second.as_str()),
            ) else {
                continue;
            };

            if collocation_score(count, c1, c2, n_words) > COLLOCATION_THRESHOLD {
                // One word may sit in several pairs and go negative
                counts[i1].1 -= count as i64;
                counts[i2].1 -= count as i64;
                counts.push((pair, count as i64));
                promoted += 1;
            }
        }

        debug!(pairs = promoted, "Promoted collocations");
        counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(word, count)| (word, count as u64))
            .collect()
    }
}

/// Tokens with possessives and pure numbers dropped; stop words kept
fn words(text: &str) -> Vec<&str> {
    TOKEN_REGEX
        .find_iter(text)
        .map(|m| strip_possessive(m.as_str()))
        .filter(|word| !word.is_empty() && !word.chars().all(|c| c.is_numeric()))
        .collect()
}

fn strip_possessive(word: &str) -> &str {
    let lower_tail = word
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| &word[i..]);
    match lower_tail {
        Some(tail) if tail.eq_ignore_ascii_case("'s") => &word[..word.len() - tail.len()],
        _ => word,
    }
}

/// Fold tokens by case, merge plurals and pick each word's spelling
fn fold_tokens<S: AsRef<str>>(tokens: &[S]) -> FoldedCounts {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, CaseCounts> = HashMap::new();
    for token in tokens {
        let token = token.as_ref();
        let key = token.to_lowercase();
        if !by_key.contains_key(&key) {
            order.push(key.clone());
        }
        by_key.entry(key).or_default().add(token, 1);
    }

    let merged = merge_plurals(&mut by_key);

    let mut folded = FoldedCounts::default();
    for key in order {
        if let Some(counts) = by_key.get(&key) {
            let representative = counts.representative().to_string();
            folded.entries.push((representative.clone(), counts.total()));
            folded.standard.insert(key, representative);
        }
    }
    for (plural, singular) in merged {
        if let Some(representative) = folded.standard.get(&singular).cloned() {
            folded.standard.insert(plural, representative);
        }
    }
    folded
}

/// Fold "votes" into "vote" when both occur; "ss" endings are left alone.
///
/// Returns the merged (plural, singular) keys.
fn merge_plurals(by_key: &mut HashMap<String, CaseCounts>) -> Vec<(String, String)> {
    let plurals: Vec<String> = by_key
        .keys()
        .filter(|key| key.ends_with('s') && !key.ends_with("ss"))
        .filter(|key| by_key.contains_key(&key[..key.len() - 1]))
        .cloned()
        .collect();

    let mut merged = Vec::with_capacity(plurals.len());
    for plural in plurals {
        let singular = plural[..plural.len() - 1].to_string();
        let Some(plural_counts) = by_key.remove(&plural) else {
            continue;
        };
        if let Some(singular_counts) = by_key.get_mut(&singular) {
            for (spelling, count) in plural_counts.spellings {
                let mut chars = spelling.chars();
                chars.next_back();
                singular_counts.add(chars.as_str(), count);
            }
            merged.push((plural, singular));
        }
    }
    merged
}

/// Dunning log-likelihood ratio for `first second` occurring `pair` times
fn collocation_score(pair: u64, first: u64, second: u64, n_words: u64) -> f64 {
    // One word makes up the whole corpus
    if n_words <= first || n_words <= second {
        return 0.0;
    }
    let (c12, c1, c2, n) = (pair as f64, first as f64, second as f64, n_words as f64);
    let p = c2 / n;
    let p1 = c12 / c1;
    let p2 = (c2 - c12) / (n - c1);

    let ratio = log_likelihood(c12, c1, p) + log_likelihood(c2 - c12, n - c1, p)
        - log_likelihood(c12, c1, p1)
        - log_likelihood(c2 - c12, n - c1, p2);
    -2.0 * ratio
}

fn log_likelihood(k: f64, n: f64, x: f64) -> f64 {
    k * x.max(1e-10).ln() + (n - k) * (1.0 - x).max(1e-10).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> WordFrequencyAnalyzer {
        WordFrequencyAnalyzer::new(&[], 200)
    }

    fn counts(freqs: &[WordFrequency]) -> Vec<(&str, u64)> {
        freqs.iter().map(|f| (f.word.as_str(), f.count)).collect()
    }

    #[test]
    fn test_hello_world() {
        let freqs = analyzer().frequencies("hello world");
        assert_eq!(counts(&freqs), [("hello", 1), ("world", 1)]);
        assert!(freqs.iter().all(|f| (f.weight - 1.0).abs() < f64::EPSILON));
    }

    #[test]
    fn test_stopwords_and_numbers_removed() {
        let tokens = analyzer().tokenize("The economy and 2024 THE jobs in 3rd place");
        assert_eq!(tokens, ["economy", "jobs", "3rd", "place"]);
    }

    #[test]
    fn test_possessive_stripped() {
        let tokens = analyzer().tokenize("Biden's plan vs Trump'S plan");
        assert_eq!(tokens, ["Biden", "plan", "vs", "Trump", "plan"]);
    }

    #[test]
    fn test_case_folding_uses_most_common_spelling() {
        let freqs = analyzer()
            .with_collocations(false)
            .frequencies("Economy economy jobs ECONOMY economy");
        assert_eq!(counts(&freqs), [("economy", 4), ("jobs", 1)]);
        assert!((freqs[1].weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_plurals_merge_into_singular() {
        let freqs = analyzer().frequencies("vote votes votes class glass");
        assert_eq!(counts(&freqs), [("vote", 3), ("class", 1), ("glass", 1)]);

        // No singular present: the plural stays
        let freqs = analyzer().frequencies("taxes taxes");
        assert_eq!(counts(&freqs), [("taxes", 2)]);
    }

    #[test]
    fn test_extra_stopwords_case_insensitive() {
        let analyzer = WordFrequencyAnalyzer::new(&["Debate".to_string()], 200);
        let freqs = analyzer.frequencies("debate DEBATE moderator");
        assert_eq!(counts(&freqs), [("moderator", 1)]);
    }

    #[test]
    fn test_max_words_and_tie_order() {
        let analyzer = WordFrequencyAnalyzer::new(&[], 2);
        let freqs = analyzer.frequencies("gamma alpha beta beta");
        assert_eq!(counts(&freqs), [("beta", 2), ("gamma", 1)]);
    }

    #[test]
    fn test_collocation_replaces_its_words() {
        let text = format!("{}jobs", "health care and ".repeat(20));

        let freqs = analyzer().frequencies(&text);
        assert_eq!(counts(&freqs), [("health care", 20), ("jobs", 1)]);
        assert!((freqs[1].weight - 0.05).abs() < 1e-12);

        let freqs = analyzer().with_collocations(false).frequencies(&text);
        assert_eq!(counts(&freqs), [("health", 20), ("care", 20), ("jobs", 1)]);
    }

    #[test]
    fn test_pairs_across_stopwords_never_collocate() {
        let text = "health and care and ".repeat(20);

        let freqs = analyzer().frequencies(&text);

        assert_eq!(counts(&freqs), [("health", 20), ("care", 20)]);
    }

    #[test]
    fn test_collocation_score() {
        // Independent words score zero
        assert!(collocation_score(1, 3, 3, 9).abs() < 1e-9);
        // A word filling the whole corpus cannot collocate
        assert_eq!(collocation_score(5, 10, 10, 10), 0.0);
        // Words that only ever appear together
        let score = collocation_score(20, 20, 20, 41);
        assert!(score > COLLOCATION_THRESHOLD);
        assert!((score - 56.8).abs() < 0.1, "score = {score}");
    }

    #[test]
    fn test_empty_corpus() {
        assert!(analyzer().frequencies("").is_empty());
        assert!(analyzer().frequencies("the and of 123").is_empty());
    }

    #[test]
    fn test_unicode_words() {
        let freqs = analyzer().frequencies("café café naïve");
        assert_eq!(counts(&freqs), [("café", 2), ("naïve", 1)]);
    }
}
