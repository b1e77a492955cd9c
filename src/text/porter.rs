//! Porter suffix-stripping stemmer, with the NLTK extensions the classifier's
//! training corpus was stemmed with (irregular forms, `ies`/`ied` on four-letter
//! words, the `alli` and `logi` rules, and `y` → `i` only after a consonant).

type Rule = (&'static str, &'static str, fn(&[char]) -> bool);

const STEP1A: &[Rule] = &[
    ("sses", "ss", always),
    ("ies", "i", always),
    ("ss", "ss", always),
    ("s", "", always),
];

const STEP1C: &[Rule] = &[("y", "i", ends_after_consonant)];

const STEP2: &[Rule] = &[
    ("ational", "ate", positive_measure),
    ("tional", "tion", positive_measure),
    ("enci", "ence", positive_measure),
    ("anci", "ance", positive_measure),
    ("izer", "ize", positive_measure),
    ("bli", "ble", positive_measure),
    ("alli", "al", positive_measure),
    ("entli", "ent", positive_measure),
    ("eli", "e", positive_measure),
    ("ousli", "ous", positive_measure),
    ("ization", "ize", positive_measure),
    ("ation", "ate", positive_measure),
    ("ator", "ate", positive_measure),
    ("alism", "al", positive_measure),
    ("iveness", "ive", positive_measure),
    ("fulness", "ful", positive_measure),
    ("ousness", "ous", positive_measure),
    ("aliti", "al", positive_measure),
    ("iviti", "ive", positive_measure),
    ("biliti", "ble", positive_measure),
    ("fulli", "ful", positive_measure),
    // The `l` stays with the stem so short stems like `geo` and `theo` qualify.
    ("logi", "log", positive_measure_with_l),
];

const STEP3: &[Rule] = &[
    ("icate", "ic", positive_measure),
    ("ative", "", positive_measure),
    ("alize", "al", positive_measure),
    ("iciti", "ic", positive_measure),
    ("ical", "ic", positive_measure),
    ("ful", "", positive_measure),
    ("ness", "", positive_measure),
];

const STEP4: &[Rule] = &[
    ("al", "", measure_above_one),
    ("ance", "", measure_above_one),
    ("ence", "", measure_above_one),
    ("er", "", measure_above_one),
    ("ic", "", measure_above_one),
    ("able", "", measure_above_one),
    ("ible", "", measure_above_one),
    ("ant", "", measure_above_one),
    ("ement", "", measure_above_one),
    ("ment", "", measure_above_one),
    ("ent", "", measure_above_one),
    ("ion", "", measure_above_one_after_s_or_t),
    ("ou", "", measure_above_one),
    ("ism", "", measure_above_one),
    ("ate", "", measure_above_one),
    ("iti", "", measure_above_one),
    ("ous", "", measure_above_one),
    ("ive", "", measure_above_one),
    ("ize", "", measure_above_one),
];

const STEP5B: &[Rule] = &[("ll", "l", measure_above_one_with_l)];

pub fn stem(word: &str) -> String {
    let lowered = word.to_lowercase();
    if let Some(base) = irregular_form(&lowered) {
        return base.to_string();
    }

    let chars: Vec<char> = lowered.chars().collect();
    if chars.len() <= 2 {
        return lowered;
    }

    let chars = step1a(chars);
    let chars = step1b(chars);
    let chars = apply_rules(chars, STEP1C);
    let chars = step2(chars);
    let chars = apply_rules(chars, STEP3);
    let chars = apply_rules(chars, STEP4);
    let chars = step5a(chars);
    apply_rules(chars, STEP5B).into_iter().collect()
}

fn irregular_form(word: &str) -> Option<&'static str> {
    let base = match word {
        "sky" | "skies" => "sky",
        "dying" => "die",
        "lying" => "lie",
        "tying" => "tie",
        "news" => "news",
        "inning" | "innings" => "inning",
        "outing" | "outings" => "outing",
        "canning" | "cannings" => "canning",
        "howe" => "howe",
        "proceed" => "proceed",
        "exceed" => "exceed",
        "succeed" => "succeed",
        _ => return None,
    };
    Some(base)
}

fn step1a(word: Vec<char>) -> Vec<char> {
    if word.len() == 4 {
        if let Some(stem) = strip_suffix(&word, "ies") {
            return with_suffix(stem, "ie");
        }
    }
    apply_rules(word, STEP1A)
}

fn step1b(word: Vec<char>) -> Vec<char> {
    if let Some(stem) = strip_suffix(&word, "ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return with_suffix(stem, replacement);
    }

    if let Some(stem) = strip_suffix(&word, "eed") {
        return if measure(stem) > 0 {
            with_suffix(stem, "ee")
        } else {
            word
        };
    }

    let stem_len = ["ed", "ing"]
        .iter()
        .filter_map(|suffix| strip_suffix(&word, suffix))
        .find(|stem| contains_vowel(stem))
        .map(<[char]>::len);
    let Some(stem_len) = stem_len else {
        return word;
    };
    let stem = &word[..stem_len];

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = strip_suffix(stem, suffix) {
            return with_suffix(base, replacement);
        }
    }

    if ends_double_consonant(stem) {
        let last = stem[stem.len() - 1];
        return if matches!(last, 'l' | 's' | 'z') {
            stem.to_vec()
        } else {
            stem[..stem.len() - 1].to_vec()
        };
    }

    if measure(stem) == 1 && ends_cvc(stem) {
        with_suffix(stem, "e")
    } else {
        stem.to_vec()
    }
}

fn step2(word: Vec<char>) -> Vec<char> {
    if let Some(stem) = strip_suffix(&word, "alli") {
        if positive_measure(stem) {
            return step2(with_suffix(stem, "al"));
        }
    }
    apply_rules(word, STEP2)
}

fn step5a(word: Vec<char>) -> Vec<char> {
    if let Some(stem) = strip_suffix(&word, "e") {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_vec();
        }
    }
    word
}

/// The first rule whose suffix matches decides; a failed condition leaves the word as is.
fn apply_rules(word: Vec<char>, rules: &[Rule]) -> Vec<char> {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = strip_suffix(&word, suffix) {
            return if condition(stem) {
                with_suffix(stem, replacement)
            } else {
                word
            };
        }
    }
    word
}

fn strip_suffix<'w>(word: &'w [char], suffix: &str) -> Option<&'w [char]> {
    let suffix: Vec<char> = suffix.chars().collect();
    word.ends_with(&suffix)
        .then(|| &word[..word.len() - suffix.len()])
}

fn with_suffix(stem: &[char], suffix: &str) -> Vec<char> {
    let mut out = stem.to_vec();
    out.extend(suffix.chars());
    out
}

fn is_consonant(word: &[char], i: usize) -> bool {
    match word[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-run/consonant-run pairs, Porter's `m`.
fn measure(stem: &[char]) -> usize {
    let mut m = 0;
    let mut after_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && after_vowel {
            m += 1;
        }
        after_vowel = !consonant;
    }
    m
}

fn contains_vowel(stem: &[char]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_double_consonant(word: &[char]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

fn ends_cvc(word: &[char]) -> bool {
    let n = word.len();
    (n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], 'w' | 'x' | 'y'))
        || (n == 2 && !is_consonant(word, 0) && is_consonant(word, 1))
}

fn always(_: &[char]) -> bool {
    true
}

fn ends_after_consonant(stem: &[char]) -> bool {
    stem.len() > 1 && is_consonant(stem, stem.len() - 1)
}

fn positive_measure(stem: &[char]) -> bool {
    measure(stem) > 0
}

fn positive_measure_with_l(stem: &[char]) -> bool {
    positive_measure(&with_suffix(stem, "l"))
}

fn measure_above_one(stem: &[char]) -> bool {
    measure(stem) > 1
}

fn measure_above_one_after_s_or_t(stem: &[char]) -> bool {
    measure(stem) > 1 && matches!(stem.last(), Some('s' | 't'))
}

fn measure_above_one_with_l(stem: &[char]) -> bool {
    measure_above_one(&with_suffix(stem, "l"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_stems(pairs: &[(&str, &str)]) {
        for (word, expected) in pairs {
            assert_eq!(stem(word), *expected, "stem({word:?})");
        }
    }

    #[test]
    fn plurals_and_participles() {
        assert_stems(&[
            ("caresses", "caress"),
            ("ponies", "poni"),
            ("ties", "tie"),
            ("cats", "cat"),
            ("agreed", "agre"),
            ("hopping", "hop"),
            ("running", "run"),
            ("falling", "fall"),
            ("filing", "file"),
            ("connected", "connect"),
        ]);
    }

    #[test]
    fn derivational_suffixes() {
        assert_stems(&[
            ("generate", "gener"),
            ("generously", "gener"),
            ("relational", "relat"),
            ("happy", "happi"),
            ("fairly", "fairli"),
            ("tutorial", "tutori"),
            ("community", "commun"),
        ]);
    }

    #[test]
    fn irregular_and_short_words() {
        assert_stems(&[("dying", "die"), ("skies", "sky"), ("news", "news"), ("is", "is")]);
    }

    #[test]
    fn measure_counts_vc_pairs() {
        let m = |w: &str| measure(&w.chars().collect::<Vec<_>>());
        assert_eq!(m("tr"), 0);
        assert_eq!(m("tree"), 0);
        assert_eq!(m("trouble"), 1);
        assert_eq!(m("oats"), 1);
        assert_eq!(m("troubles"), 2);
        assert_eq!(m("private"), 2);
    }
}
