//! # Text Tools
//!
//! Word counting, case conversion, password generation and hashing.

use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Word counter
// ============================================================================

/// Silent reading speed used for the reading-time estimate
pub const READING_WORDS_PER_MINUTE: f64 = 200.0;

/// Word counter result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordCountResult {
    pub words: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub reading_time_minutes: f64,
}

/// Count words, characters, sentences and paragraphs. Blank text counts as zero
/// everywhere except `characters`.
pub fn count_words(text: &str) -> WordCountResult {
    let words = text.split_whitespace().count();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();

    // Paragraphs are separated by one or more blank lines
    let mut paragraphs = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            paragraphs += 1;
            in_paragraph = true;
        }
    }

    WordCountResult {
        words,
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        sentences,
        paragraphs,
        reading_time_minutes: words as f64 / READING_WORDS_PER_MINUTE,
    }
}

// ============================================================================
// Case conversion
// ============================================================================

/// Target letter case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCase {
    Upper,
    Lower,
    Title,
    Sentence,
    Snake,
    Kebab,
}

impl TextCase {
    pub const ALL: &'static [TextCase] = &[
        TextCase::Upper,
        TextCase::Lower,
        TextCase::Title,
        TextCase::Sentence,
        TextCase::Snake,
        TextCase::Kebab,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            TextCase::Upper => "upper",
            TextCase::Lower => "lower",
            TextCase::Title => "title",
            TextCase::Sentence => "sentence",
            TextCase::Snake => "snake",
            TextCase::Kebab => "kebab",
        }
    }
}

impl FromStr for TextCase {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let key = key
            .strip_suffix("case")
            .unwrap_or(key.as_str())
            .trim_end_matches(['_', '-', ' ']);
        match key {
            "upper" | "uppercase" => Ok(TextCase::Upper),
            "lower" | "lowercase" => Ok(TextCase::Lower),
            "title" => Ok(TextCase::Title),
            "sentence" => Ok(TextCase::Sentence),
            "snake" => Ok(TextCase::Snake),
            "kebab" => Ok(TextCase::Kebab),
            _ => Err(CalcError::unknown_key("text case", s)),
        }
    }
}

impl fmt::Display for TextCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Case conversion input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseInput {
    pub text: String,
    pub case: TextCase,
}

/// Case conversion result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub case: TextCase,
    pub converted: String,
}

/// Split into lowercase words on non-alphanumerics and camelCase humps.
fn identifier_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in text.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_numeric();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;
    for c in text.chars() {
        if c.is_alphabetic() && capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.extend(c.to_lowercase());
            if matches!(c, '.' | '!' | '?') {
                capitalize_next = true;
            } else if c.is_alphanumeric() {
                capitalize_next = false;
            }
        }
    }
    out
}

/// Convert text to another letter case.
pub fn convert_case(input: &CaseInput) -> CalcResult<CaseResult> {
    if input.text.trim().is_empty() {
        return Err(CalcError::missing_field("text"));
    }
    let text = input.text.as_str();
    let converted = match input.case {
        TextCase::Upper => text.to_uppercase(),
        TextCase::Lower => text.to_lowercase(),
        TextCase::Title => title_case(text),
        TextCase::Sentence => sentence_case(text),
        TextCase::Snake => identifier_words(text).join("_"),
        TextCase::Kebab => identifier_words(text).join("-"),
    };
    Ok(CaseResult {
        case: input.case,
        converted,
    })
}

// ============================================================================
// Password generator
// ============================================================================

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Password generator input
///
/// ## JSON Example
///
/// ```json
/// { "length": 16, "uppercase": true, "lowercase": true, "numbers": true, "symbols": false }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordInput {
    pub length: u32,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

impl Default for PasswordInput {
    fn default() -> Self {
        PasswordInput {
            length: 12,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: false,
        }
    }
}

impl PasswordInput {
    pub const MIN_LENGTH: u32 = 4;
    pub const MAX_LENGTH: u32 = 128;

    fn classes(&self) -> Vec<&'static [u8]> {
        [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter_map(|(on, set)| on.then_some(set))
        .collect()
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&self.length) {
            return Err(CalcError::invalid_input(
                "length",
                self.length.to_string(),
                format!(
                    "Password length must be between {} and {} characters",
                    Self::MIN_LENGTH,
                    Self::MAX_LENGTH
                ),
            ));
        }
        if self.classes().is_empty() {
            return Err(CalcError::invalid_input(
                "character_types",
                "none",
                "Please select at least one character type",
            ));
        }
        Ok(())
    }
}

/// Password generator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordResult {
    pub password: String,
    pub length: u32,
    pub charset_size: usize,
    /// `length · log2(charset_size)`
    pub entropy_bits: f64,
    pub strength: String,
}

fn strength_label(entropy_bits: f64) -> &'static str {
    if entropy_bits < 40.0 {
        "Weak"
    } else if entropy_bits < 60.0 {
        "Fair"
    } else if entropy_bits < 80.0 {
        "Strong"
    } else {
        "Very strong"
    }
}

/// Generate a password with the thread-local RNG.
pub fn generate_password(input: &PasswordInput) -> CalcResult<PasswordResult> {
    generate_password_with(input, &mut rand::thread_rng())
}

/// Generate a password from the given RNG.
///
/// Every selected character class appears at least once.
pub fn generate_password_with<R: Rng + ?Sized>(input: &PasswordInput, rng: &mut R) -> CalcResult<PasswordResult> {
    input.validate()?;
    let classes = input.classes();
    let charset: Vec<u8> = classes.iter().flat_map(|set| set.iter().copied()).collect();

    let mut bytes: Vec<u8> = Vec::with_capacity(input.length as usize);
    for set in &classes {
        if let Some(&c) = set.choose(rng) {
            bytes.push(c);
        }
    }
    while bytes.len() < input.length as usize {
        if let Some(&c) = charset.choose(rng) {
            bytes.push(c);
        }
    }
    bytes.shuffle(rng);

    let entropy_bits = f64::from(input.length) * (charset.len() as f64).log2();
    Ok(PasswordResult {
        password: bytes.iter().map(|&b| char::from(b)).collect(),
        length: input.length,
        charset_size: charset.len(),
        entropy_bits,
        strength: strength_label(entropy_bits).to_string(),
    })
}

// ============================================================================
// Hash generator
// ============================================================================

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: &'static [HashAlgorithm] = &[HashAlgorithm::Sha256, HashAlgorithm::Sha384, HashAlgorithm::Sha512];

    pub fn key(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        }
    }

    /// Digest length in bits
    pub fn bits(&self) -> u32 {
        match self {
            HashAlgorithm::Sha256 => 256,
            HashAlgorithm::Sha384 => 384,
            HashAlgorithm::Sha512 => 512,
        }
    }

    /// Lowercase hex digest of `data`
    pub fn hex_digest(&self, data: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
            HashAlgorithm::Sha384 => hex::encode(Sha384::digest(data)),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            _ => Err(CalcError::unknown_key("hash algorithm", s)),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Hash generator input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashInput {
    pub text: String,
    pub algorithm: HashAlgorithm,
}

/// Hash generator result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashResult {
    pub algorithm: HashAlgorithm,
    pub digest: String,
    pub bits: u32,
}

/// Hex digest of the UTF-8 bytes of `text`.
pub fn generate_hash(input: &HashInput) -> HashResult {
    HashResult {
        algorithm: input.algorithm,
        digest: input.algorithm.hex_digest(input.text.as_bytes()),
        bits: input.algorithm.bits(),
    }
}
