use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^a-z0-9\s-]").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","the","and","or","but","in","on","at","to","for",
            "of","with","by","from","is","are","was","were","be","been",
            "being","have","has","had","do","does","did","will","would",
            "could","should","may","might","shall","can","need","dare",
            "it","its","this","that","these","those","i","you","he","she",
            "we","they","me","him","her","us","them","my","your","his",
            "our","their","what","which","who","whom","where","when","how",
            "not","no","nor","as","if","then","than","so","such","both",
            "each","all","any","few","more","most","other","some","only",
            "same","too","very","just","about","above","after","before",
            "between","into","through","during","out","up","down","over",
            "under","again","further","once","here","there","also",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenize text: lowercase, blank out everything except `[a-z0-9]`, whitespace
/// and hyphens, split on whitespace, then drop stopwords and single-character
/// tokens. Order of the surviving tokens is preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    cleaned
        .split_whitespace()
        .filter(|t| t.len() > 1 && !is_stopword(t))
        .map(str::to_string)
        .collect()
}
