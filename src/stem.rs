//! Stemming and stopword support for the text miner
//!
//! The miner depends on a stateless [`Stemmer`] capability rather than a
//! concrete algorithm, so tests can swap in a fake. The default
//! implementation is a classic Porter stemmer.

/// Stateless word-stemming capability
pub trait Stemmer: Send + Sync {
    /// Reduce a lowercase word to its root form
    fn stem(&self, word: &str) -> String;
}

/// Words excluded from frequency analysis. Fixed, closed list.
pub const STOPWORDS: &[&str] = &[
    "about", "after", "again", "all", "also", "and", "any", "are", "back", "because", "been",
    "before", "being", "but", "came", "can", "come", "could", "day", "did", "does", "doing",
    "down", "each", "even", "feel", "felt", "few", "for", "from", "get", "got", "had", "has",
    "have", "her", "here", "him", "his", "how", "into", "its", "just", "like", "little", "made",
    "make", "many", "more", "most", "much", "myself", "not", "now", "off", "one", "only", "other",
    "our", "out", "over", "own", "pretty", "really", "said", "same", "she", "should", "some",
    "still", "such", "than", "that", "the", "their", "them", "then", "there", "these", "they",
    "thing", "things", "this", "those", "though", "through", "time", "today", "too", "under",
    "until", "very", "was", "way", "went", "were", "what", "when", "where", "which", "while",
    "who", "why", "will", "with", "would", "you", "your",
];

/// True when the lowercase word is on the stopword list
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Porter stemming algorithm (Porter, 1980).
///
/// Operates on lowercase words; words of two characters or fewer pass
/// through unchanged.
pub struct PorterStemmer;

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        if word.chars().count() <= 2 {
            return word.to_string();
        }

        let mut w: Vec<char> = word.chars().collect();
        step_1a(&mut w);
        step_1b(&mut w);
        step_1c(&mut w);
        step_2(&mut w);
        step_3(&mut w);
        step_4(&mut w);
        step_5(&mut w);
        w.into_iter().collect()
    }
}

/// A letter is a consonant unless it is a,e,i,o,u or a `y` preceded by a
/// consonant.
fn is_consonant(w: &[char], i: usize) -> bool {
    match w[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => {
            if i == 0 {
                true
            } else {
                !is_consonant(w, i - 1)
            }
        }
        _ => true,
    }
}

/// Porter's measure: the number of vowel-consonant sequences in the word
fn measure(w: &[char]) -> usize {
    let n = w.len();
    let mut i = 0;
    while i < n && is_consonant(w, i) {
        i += 1;
    }

    let mut m = 0;
    loop {
        while i < n && !is_consonant(w, i) {
            i += 1;
        }
        if i >= n {
            break;
        }
        while i < n && is_consonant(w, i) {
            i += 1;
        }
        m += 1;
    }
    m
}

fn contains_vowel(w: &[char]) -> bool {
    (0..w.len()).any(|i| !is_consonant(w, i))
}

fn ends_with(w: &[char], suffix: &str) -> bool {
    let suffix: Vec<char> = suffix.chars().collect();
    w.len() >= suffix.len() && w[w.len() - suffix.len()..] == suffix[..]
}

fn ends_double_consonant(w: &[char]) -> bool {
    let n = w.len();
    n >= 2 && w[n - 1] == w[n - 2] && is_consonant(w, n - 1)
}

/// consonant-vowel-consonant ending where the final consonant is not w, x,
/// or y (the *o condition)
fn ends_cvc(w: &[char]) -> bool {
    let n = w.len();
    n >= 3
        && is_consonant(w, n - 3)
        && !is_consonant(w, n - 2)
        && is_consonant(w, n - 1)
        && !matches!(w[n - 1], 'w' | 'x' | 'y')
}

fn set_suffix(w: &mut Vec<char>, suffix_len: usize, replacement: &str) {
    let keep = w.len() - suffix_len;
    w.truncate(keep);
    w.extend(replacement.chars());
}

fn step_1a(w: &mut Vec<char>) {
    if ends_with(w, "sses") {
        set_suffix(w, 4, "ss");
    } else if ends_with(w, "ies") {
        set_suffix(w, 3, "i");
    } else if ends_with(w, "ss") {
        // unchanged
    } else if ends_with(w, "s") {
        set_suffix(w, 1, "");
    }
}

fn step_1b(w: &mut Vec<char>) {
    if ends_with(w, "eed") {
        if measure(&w[..w.len() - 3]) > 0 {
            set_suffix(w, 3, "ee");
        }
        return;
    }

    let removed = if ends_with(w, "ed") && contains_vowel(&w[..w.len() - 2]) {
        set_suffix(w, 2, "");
        true
    } else if ends_with(w, "ing") && contains_vowel(&w[..w.len() - 3]) {
        set_suffix(w, 3, "");
        true
    } else {
        false
    };

    if !removed {
        return;
    }

    if ends_with(w, "at") || ends_with(w, "bl") || ends_with(w, "iz") {
        w.push('e');
    } else if ends_double_consonant(w) && !matches!(w[w.len() - 1], 'l' | 's' | 'z') {
        w.truncate(w.len() - 1);
    } else if measure(w) == 1 && ends_cvc(w) {
        w.push('e');
    }
}

fn step_1c(w: &mut Vec<char>) {
    if ends_with(w, "y") && contains_vowel(&w[..w.len() - 1]) {
        set_suffix(w, 1, "i");
    }
}

/// Apply the first matching suffix rule whose stem satisfies the measure
/// threshold; stop at the first suffix match either way.
fn apply_rules(w: &mut Vec<char>, rules: &[(&str, &str)], min_measure: usize) {
    for (suffix, replacement) in rules {
        if ends_with(w, suffix) {
            let stem_len = w.len() - suffix.chars().count();
            if measure(&w[..stem_len]) > min_measure {
                set_suffix(w, suffix.chars().count(), replacement);
            }
            return;
        }
    }
}

fn step_2(w: &mut Vec<char>) {
    apply_rules(
        w,
        &[
            ("ational", "ate"),
            ("tional", "tion"),
            ("enci", "ence"),
            ("anci", "ance"),
            ("izer", "ize"),
            ("abli", "able"),
            ("alli", "al"),
            ("entli", "ent"),
            ("eli", "e"),
            ("ousli", "ous"),
            ("ization", "ize"),
            ("ation", "ate"),
            ("ator", "ate"),
            ("alism", "al"),
            ("iveness", "ive"),
            ("fulness", "ful"),
            ("ousness", "ous"),
            ("aliti", "al"),
            ("iviti", "ive"),
            ("biliti", "ble"),
        ],
        0,
    );
}

fn step_3(w: &mut Vec<char>) {
    apply_rules(
        w,
        &[
            ("icate", "ic"),
            ("ative", ""),
            ("alize", "al"),
            ("iciti", "ic"),
            ("ical", "ic"),
            ("ful", ""),
            ("ness", ""),
        ],
        0,
    );
}

fn step_4(w: &mut Vec<char>) {
    // "ion" only drops after s or t; handled before the generic table would
    // shadow it
    if ends_with(w, "ion") {
        let stem_len = w.len() - 3;
        if stem_len >= 1
            && matches!(w[stem_len - 1], 's' | 't')
            && measure(&w[..stem_len]) > 1
        {
            w.truncate(stem_len);
        }
        return;
    }

    apply_rules(
        w,
        &[
            ("al", ""),
            ("ance", ""),
            ("ence", ""),
            ("er", ""),
            ("ic", ""),
            ("able", ""),
            ("ible", ""),
            ("ant", ""),
            ("ement", ""),
            ("ment", ""),
            ("ent", ""),
            ("ou", ""),
            ("ism", ""),
            ("ate", ""),
            ("iti", ""),
            ("ous", ""),
            ("ive", ""),
            ("ize", ""),
        ],
        1,
    );
}

fn step_5(w: &mut Vec<char>) {
    // 5a: drop a trailing e
    if ends_with(w, "e") {
        let m = measure(&w[..w.len() - 1]);
        if m > 1 || (m == 1 && !ends_cvc(&w[..w.len() - 1])) {
            w.truncate(w.len() - 1);
        }
    }

    // 5b: ll -> l
    if measure(w) > 1 && ends_double_consonant(w) && w[w.len() - 1] == 'l' {
        w.truncate(w.len() - 1);
    }
}
