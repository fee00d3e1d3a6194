//! Deterministic, human-friendly heading anchors.
//!
//! Bridges ASCII slugification (`slug` crate) with Chinese transliteration
//! (`pinyin` crate) so headings like “基线对齐” become `ji-xian-dui-qi`.

use std::collections::HashMap;

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Errors that can occur while deriving a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Deterministically generate unique anchor slugs within a single document.
///
/// Headings processed in order receive monotonic suffixes when duplicates
/// occur (`overview`, `overview-1`, `overview-2`).
#[derive(Default, Debug)]
pub struct HeadingSlugger {
    occurrences: HashMap<String, usize>,
}

impl HeadingSlugger {
    pub fn new() -> Self {
        Self {
            occurrences: HashMap::new(),
        }
    }

    /// Generate a slug for the provided heading text, ensuring uniqueness
    /// within this slugger. Returns an error when the heading cannot produce
    /// a slug (empty or unrepresentable input).
    pub fn anchor_for(&mut self, heading: &str) -> Result<String, SlugError> {
        let base = derive_slug(heading)?;
        let count = self.occurrences.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            Ok(base)
        } else {
            Ok(format!("{base}-{}", *count - 1))
        }
    }
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            None => {
                // Preserve unhandled characters so slugify can decide how to filter them.
                output.push(ch);
            }
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
}
