// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Best-effort redaction of card numbers, SSNs and PIN-looking digits
//! from text before it leaves the device.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

pub const CARD_PLACEHOLDER: &str = "[possible card number]";
pub const SSN_PLACEHOLDER: &str = "[possible SSN]";
pub const PIN_PLACEHOLDER: &str = "[possible PIN]";

/// Characters inspected on each side of a 4-digit run.
const PIN_WINDOW: usize = 10;

// A pattern that fails to compile leaves the text untouched.
static CARD_RUN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b[0-9]{12,19}\b").ok());
static CARD_GROUPED: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"\b[0-9]{4}[\s-]?[0-9]{4}[\s-]?[0-9]{4}[\s-]?[0-9]{4}\b").ok()
});
static SSN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b").ok());
static FOUR_DIGITS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b[0-9]{4}\b").ok());
static YEAR: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b(19|20)[0-9]{2}\b").ok());
static CLOCK: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[0-9]{1,2}:[0-9]{2}").ok());

pub fn sanitize_input(text: &str) -> String {
    let text = replace(&CARD_RUN, text, CARD_PLACEHOLDER);
    let text = replace(&CARD_GROUPED, &text, CARD_PLACEHOLDER);
    let text = replace(&SSN, &text, SSN_PLACEHOLDER);
    redact_pins(&text)
}

pub fn was_redacted(original: &str) -> bool {
    sanitize_input(original) != original
}

fn replace<'a>(re: &Lazy<Option<Regex>>, text: &'a str, placeholder: &str) -> Cow<'a, str> {
    match re.as_ref() {
        Some(re) => re.replace_all(text, regex::NoExpand(placeholder)),
        None => Cow::Borrowed(text),
    }
}

fn redact_pins(text: &str) -> String {
    let Some(re) = FOUR_DIGITS.as_ref() else {
        return text.to_string();
    };
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&text[last..m.start()]);
        if looks_like_date_or_time(text, m.start(), m.end()) {
            out.push_str(m.as_str());
        } else {
            out.push_str(PIN_PLACEHOLDER);
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

fn looks_like_date_or_time(text: &str, start: usize, end: usize) -> bool {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(PIN_WINDOW)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let to = text[end..]
        .char_indices()
        .nth(PIN_WINDOW)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    let context = text[from..to].to_lowercase();
    let hit = |re: &Lazy<Option<Regex>>| re.as_ref().is_some_and(|re| re.is_match(&context));
    hit(&YEAR) || hit(&CLOCK)
}
