// src/sort/mod.rs
//
// Total ordering over size labels. Labels mix plain numbers ("5", "16.5"),
// fractions ("1/2", "10+1/4", "½"), and free text ("J", "Z10"); humans
// expect the numeric ones ascending first and the rest in natural
// alphanumeric order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

static MIXED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*\+\s*(\d+)\s*/\s*(\d+)\s*$").expect("pattern parses"));

static BARE_FRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*/\s*(\d+)\s*$").expect("pattern parses"));

/// One run of a textual label. `Number` sorts before `Text` (variant
/// order), digit runs compare as integers, text runs are stored lowercased
/// so comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TextToken {
    Number(u64),
    Text(String),
}

/// Sort key for a size label. `Numeric` always orders before `Textual`, so
/// every numeric label precedes every free-text one.
#[derive(Debug, Clone)]
pub enum SizeKey {
    Numeric(f64),
    Textual(Vec<TextToken>),
}

impl Ord for SizeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Keys only ever hold finite values, so total_cmp matches the
            // usual numeric order here.
            (SizeKey::Numeric(a), SizeKey::Numeric(b)) => a.total_cmp(b),
            (SizeKey::Numeric(_), SizeKey::Textual(_)) => Ordering::Less,
            (SizeKey::Textual(_), SizeKey::Numeric(_)) => Ordering::Greater,
            (SizeKey::Textual(a), SizeKey::Textual(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SizeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SizeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SizeKey {}

/// Replace the fraction glyphs the source is known to use with their ASCII
/// `num/den` spelling: the fraction slash U+2044 and the precomposed
/// half/quarter/three-quarter characters.
fn normalize_fraction_glyphs(label: &str) -> String {
    label
        .replace('\u{2044}', "/")
        .replace('½', "1/2")
        .replace('¼', "1/4")
        .replace('¾', "3/4")
}

/// Numeric value of a label, if it has one. Tried in order: direct decimal
/// parse, mixed number `whole+num/den`, bare fraction `num/den`. A zero
/// denominator falls through to `None` rather than erroring.
fn parse_numeric(label: &str) -> Option<f64> {
    let normalized = normalize_fraction_glyphs(label);

    if let Ok(value) = normalized.trim().parse::<f64>() {
        return Some(value);
    }

    if let Some(caps) = MIXED_NUMBER.captures(&normalized) {
        let whole: u64 = caps[1].parse().ok()?;
        let num: u64 = caps[2].parse().ok()?;
        let den: u64 = caps[3].parse().ok()?;
        if den != 0 {
            return Some(whole as f64 + num as f64 / den as f64);
        }
        return None;
    }

    if let Some(caps) = BARE_FRACTION.captures(&normalized) {
        let num: u64 = caps[1].parse().ok()?;
        let den: u64 = caps[2].parse().ok()?;
        if den != 0 {
            return Some(num as f64 / den as f64);
        }
    }

    None
}

/// Split a label into alternating digit and non-digit runs. Digit runs too
/// long for u64 stay textual, which keeps the function infallible.
fn tokenize(label: &str) -> Vec<TextToken> {
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut run_is_digits = false;

    let mut flush = |run: &mut String, is_digits: bool, tokens: &mut Vec<TextToken>| {
        if run.is_empty() {
            return;
        }
        if is_digits {
            match run.parse::<u64>() {
                Ok(n) => tokens.push(TextToken::Number(n)),
                Err(_) => tokens.push(TextToken::Text(run.clone())),
            }
        } else {
            tokens.push(TextToken::Text(run.to_lowercase()));
        }
        run.clear();
    };

    for ch in label.chars() {
        let is_digit = ch.is_ascii_digit();
        if !run.is_empty() && is_digit != run_is_digits {
            flush(&mut run, run_is_digits, &mut tokens);
        }
        run_is_digits = is_digit;
        run.push(ch);
    }
    flush(&mut run, run_is_digits, &mut tokens);

    tokens
}

/// Total, deterministic sort key for a size label. Never fails: labels that
/// do not parse numerically get the natural-alphanumeric textual key.
pub fn sort_key(label: &str) -> SizeKey {
    match parse_numeric(label) {
        Some(value) => SizeKey::Numeric(value),
        None => SizeKey::Textual(tokenize(label)),
    }
}
