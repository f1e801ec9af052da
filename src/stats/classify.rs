//! Per-message classification.
//!
//! The predicates are plain functions over a message body so they can be
//! used and tested on their own. [`Classifier`] bundles them with the
//! configurable word and placeholder lists and produces an [`Annotation`]
//! for each record without touching the record itself.

use std::sync::LazyLock;

use regex::Regex;

use super::error::AnalysisError;
use crate::transcript::MessageRecord;

/// Bodies the exporter writes in place of an attachment.
pub const MEDIA_PLACEHOLDERS: &[&str] = &[
    "<Media omitted>",
    "<Medien ausgelassen>",
    "<Multimedia omitido>",
    "<Médias omis>",
    "<Mídia oculta>",
    "<Media weggelaten>",
    "<Media omessi>",
    "image omitted",
    "video omitted",
    "audio omitted",
    "sticker omitted",
    "GIF omitted",
    "document omitted",
    "Contact card omitted",
];

/// Bodies left behind when a message was deleted.
pub const DELETED_MESSAGES: &[&str] = &["This message was deleted", "You deleted this message"];

/// Apology words matched when nothing else is configured.
pub const DEFAULT_APOLOGY_WORDS: &[&str] = &["sorry"];

static LINK_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: http://x.y, https://x.y/path, www.x.y
    Regex::new(r"(?i)https?://\S+|\bwww\.\S+").ok()
});

static SORRY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| build_apology_pattern(DEFAULT_APOLOGY_WORDS).ok().flatten());

/// Inclusive code point ranges counted as emoji.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F1E6, 0x1F1FF), // Regional indicators (flags)
    (0x1F300, 0x1F5FF), // Misc symbols and pictographs
    (0x1F600, 0x1F64F), // Emoticons
    (0x1F680, 0x1F6FF), // Transport and map
    (0x1F900, 0x1F9FF), // Supplemental symbols and pictographs
    (0x1FA70, 0x1FAFF), // Symbols and pictographs extended-A
    (0x2600, 0x26FF),   // Misc symbols
    (0x2700, 0x27BF),   // Dingbats
];

/// Skin tone modifiers sit inside the pictograph block but only modify the
/// preceding emoji.
const SKIN_TONE_MODIFIERS: (u32, u32) = (0x1F3FB, 0x1F3FF);

// ============================================================================
// Predicates
// ============================================================================

/// Body is exactly a known attachment placeholder (ignoring case).
pub fn is_media_placeholder(body: &str) -> bool {
    matches_placeholder(body, MEDIA_PLACEHOLDERS.iter().copied())
}

/// Body contains an `http://`, `https://` or `www.` link.
pub fn contains_link(body: &str) -> bool {
    LINK_PATTERN.as_ref().is_some_and(|re| re.is_match(body))
}

/// Body contains "sorry" as a whole word (ignoring case).
pub fn contains_sorry(body: &str) -> bool {
    SORRY_PATTERN.as_ref().is_some_and(|re| re.is_match(body))
}

/// Body is a deleted-message tombstone.
pub fn is_deleted(body: &str) -> bool {
    let body = body.trim();
    DELETED_MESSAGES.iter().any(|tombstone| body == *tombstone)
}

/// Whether a single code point counts as an emoji.
pub fn is_emoji(c: char) -> bool {
    let code = c as u32;
    let (tone_start, tone_end) = SKIN_TONE_MODIFIERS;
    if (tone_start..=tone_end).contains(&code) {
        return false;
    }
    EMOJI_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Number of emoji code points in the body. Repeats count every time.
pub fn count_emoji(body: &str) -> usize {
    body.chars().filter(|&c| is_emoji(c)).count()
}

fn matches_placeholder<'p>(body: &str, mut placeholders: impl Iterator<Item = &'p str>) -> bool {
    let body = body.trim().to_lowercase();
    placeholders.any(|placeholder| placeholder.to_lowercase() == body)
}

/// Escape `word` and anchor it with `\b` on each edge that is a word
/// character. Punctuation edges are left unanchored so `my bad!` can match.
fn bounded_word(word: &str) -> String {
    let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
    let start = if word.starts_with(is_word_char) { r"\b" } else { "" };
    let end = if word.ends_with(is_word_char) { r"\b" } else { "" };
    format!("{}{}{}", start, regex::escape(word), end)
}

/// Build a case-insensitive whole-word pattern for the given words.
///
/// Returns `Ok(None)` for an empty list, which never matches.
pub fn build_apology_pattern<S: AsRef<str>>(words: &[S]) -> Result<Option<Regex>, AnalysisError> {
    if words.is_empty() {
        return Ok(None);
    }

    let joined = || {
        words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut alternatives = Vec::with_capacity(words.len());
    for word in words {
        let word = word.as_ref().trim();
        if word.is_empty() {
            return Err(AnalysisError::InvalidPattern {
                words: joined(),
                reason: "words must not be empty".to_string(),
            });
        }
        alternatives.push(bounded_word(word));
    }

    let pattern = format!("(?i)(?:{})", alternatives.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| AnalysisError::InvalidPattern {
            words: joined(),
            reason: e.to_string(),
        })
}

// ============================================================================
// Classifier
// ============================================================================

/// Read-only facts about one message body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotation {
    pub is_media: bool,
    pub is_link: bool,
    pub is_sorry: bool,
    pub is_deleted: bool,
    pub emoji_count: usize,
}

/// Applies the predicates with configured word and placeholder lists.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Built-in plus configured placeholders, lowercased.
    media_placeholders: Vec<String>,
    apology: Option<Regex>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            media_placeholders: lowercase_placeholders(&[] as &[String]),
            apology: SORRY_PATTERN.clone(),
        }
    }
}

impl Classifier {
    /// Create a classifier matching `apology_words` and recognizing
    /// `extra_placeholders` on top of [`MEDIA_PLACEHOLDERS`].
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidPattern`] if a word is blank.
    pub fn new<S: AsRef<str>>(
        apology_words: &[S],
        extra_placeholders: &[S],
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            media_placeholders: lowercase_placeholders(extra_placeholders),
            apology: build_apology_pattern(apology_words)?,
        })
    }

    /// Annotate a single record.
    pub fn classify(&self, record: &MessageRecord) -> Annotation {
        let body = record.body.as_str();
        Annotation {
            is_media: matches_placeholder(
                body,
                self.media_placeholders.iter().map(String::as_str),
            ),
            is_link: contains_link(body),
            is_sorry: self.apology.as_ref().is_some_and(|re| re.is_match(body)),
            is_deleted: is_deleted(body),
            emoji_count: count_emoji(body),
        }
    }
}

fn lowercase_placeholders<S: AsRef<str>>(extra: &[S]) -> Vec<String> {
    MEDIA_PLACEHOLDERS
        .iter()
        .copied()
        .chain(extra.iter().map(|p| p.as_ref().trim()))
        .filter(|p| !p.is_empty())
        .map(str::to_lowercase)
        .collect()
}
