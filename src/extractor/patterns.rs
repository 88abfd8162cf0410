// file: src/extractor/patterns.rs
// description: compiled regex patterns for question tokenization
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Word tokens, keeping hyphenated compounds and contractions together.
    pub static ref WORD_TOKEN: Regex = Regex::new(
        r"\w+(?:[-'’]\w+)*"
    ).expect("WORD_TOKEN regex is valid");

    pub static ref APOSTROPHE: Regex = Regex::new(
        r"['’]"
    ).expect("APOSTROPHE regex is valid");
}
