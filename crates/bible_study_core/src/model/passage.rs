//! Passage, verse and language models.
//!
//! # Responsibility
//! - Describe the scripture excerpt a lesson is built on.
//! - Carry fetched verse text between scripture providers and study logic.
//!
//! # Invariants
//! - `chapter_start >= 1` and `chapter_start <= chapter_end`.
//! - For single-chapter passages, `verse_start <= verse_end` when both are set.
//! - A `Passage` is immutable once constructed; deserialization re-validates.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// UI/content language used to choose translations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageVariant {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh-hans")]
    ChineseSimplified,
    #[serde(rename = "zh-hant")]
    ChineseTraditional,
}

impl LanguageVariant {
    /// Parses a language code. Unknown codes fall back to `None`.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::English),
            "zh-hans" => Some(Self::ChineseSimplified),
            "zh-hant" => Some(Self::ChineseTraditional),
            _ => None,
        }
    }

    /// Stable wire code (`en|zh-hans|zh-hant`).
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::ChineseSimplified => "zh-hans",
            Self::ChineseTraditional => "zh-hant",
        }
    }

    pub fn is_chinese(self) -> bool {
        matches!(self, Self::ChineseSimplified | Self::ChineseTraditional)
    }
}

impl Default for LanguageVariant {
    fn default() -> Self {
        Self::English
    }
}

impl Display for LanguageVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One numbered line of scripture text.
///
/// Text is plain: markup stripped and whitespace collapsed by the provider
/// clients before a `Verse` is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl Verse {
    pub fn new(chapter: u32, verse: u32, text: impl Into<String>) -> Self {
        Self {
            chapter,
            verse,
            text: text.into(),
        }
    }

    /// Position of this verse as a `VerseRef`.
    pub fn reference(&self) -> VerseRef {
        VerseRef::new(self.chapter, self.verse)
    }
}

/// `chapter:verse` coordinate inside one book.
///
/// Ordering is `(chapter, verse)` ascending, i.e. reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseRef {
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self { chapter, verse }
    }
}

impl Display for VerseRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

/// Error returned when a `c:v` reference cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceParseError(pub String);

impl Display for ReferenceParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid verse reference `{}`", self.0)
    }
}

impl Error for ReferenceParseError {}

impl FromStr for VerseRef {
    type Err = ReferenceParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (chapter, verse) = trimmed
            .split_once(':')
            .ok_or_else(|| ReferenceParseError(trimmed.to_string()))?;
        let chapter = chapter
            .trim()
            .parse::<u32>()
            .map_err(|_| ReferenceParseError(trimmed.to_string()))?;
        let verse = verse
            .trim()
            .parse::<u32>()
            .map_err(|_| ReferenceParseError(trimmed.to_string()))?;
        Ok(Self::new(chapter, verse))
    }
}

/// Validation errors for `Passage` construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassageValidationError {
    EmptyBook,
    ZeroChapter,
    ReversedChapters { start: u32, end: u32 },
    ReversedVerses { start: u32, end: u32 },
}

impl Display for PassageValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBook => write!(f, "passage book cannot be empty"),
            Self::ZeroChapter => write!(f, "passage chapters start at 1"),
            Self::ReversedChapters { start, end } => {
                write!(f, "chapter_end ({end}) must be >= chapter_start ({start})")
            }
            Self::ReversedVerses { start, end } => {
                write!(f, "verse_end ({end}) must be >= verse_start ({start})")
            }
        }
    }
}

impl Error for PassageValidationError {}

/// Contiguous scripture excerpt: one book, a chapter span and optional verse bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PassageRecord", into = "PassageRecord")]
pub struct Passage {
    book: String,
    chapter_start: u32,
    chapter_end: u32,
    verse_start: Option<u32>,
    verse_end: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PassageRecord {
    book: String,
    chapter_start: u32,
    chapter_end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verse_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    verse_end: Option<u32>,
}

impl TryFrom<PassageRecord> for Passage {
    type Error = PassageValidationError;

    fn try_from(value: PassageRecord) -> Result<Self, Self::Error> {
        Passage::new(
            value.book,
            value.chapter_start,
            value.chapter_end,
            value.verse_start,
            value.verse_end,
        )
    }
}

impl From<Passage> for PassageRecord {
    fn from(value: Passage) -> Self {
        Self {
            book: value.book,
            chapter_start: value.chapter_start,
            chapter_end: value.chapter_end,
            verse_start: value.verse_start,
            verse_end: value.verse_end,
        }
    }
}

impl Passage {
    /// Builds a validated passage.
    ///
    /// # Errors
    /// - `EmptyBook` for a blank book name.
    /// - `ZeroChapter` when `chapter_start == 0`.
    /// - `ReversedChapters` / `ReversedVerses` for reversed bounds.
    pub fn new(
        book: impl Into<String>,
        chapter_start: u32,
        chapter_end: u32,
        verse_start: Option<u32>,
        verse_end: Option<u32>,
    ) -> Result<Self, PassageValidationError> {
        let book = book.into().trim().to_string();
        if book.is_empty() {
            return Err(PassageValidationError::EmptyBook);
        }
        if chapter_start == 0 {
            return Err(PassageValidationError::ZeroChapter);
        }
        if chapter_start > chapter_end {
            return Err(PassageValidationError::ReversedChapters {
                start: chapter_start,
                end: chapter_end,
            });
        }
        if chapter_start == chapter_end {
            if let (Some(start), Some(end)) = (verse_start, verse_end) {
                if start > end {
                    return Err(PassageValidationError::ReversedVerses { start, end });
                }
            }
        }

        Ok(Self {
            book,
            chapter_start,
            chapter_end,
            verse_start,
            verse_end,
        })
    }

    /// Whole chapters `chapter_start..=chapter_end`.
    pub fn chapters(
        book: impl Into<String>,
        chapter_start: u32,
        chapter_end: u32,
    ) -> Result<Self, PassageValidationError> {
        Self::new(book, chapter_start, chapter_end, None, None)
    }

    pub fn book(&self) -> &str {
        &self.book
    }

    pub fn chapter_start(&self) -> u32 {
        self.chapter_start
    }

    pub fn chapter_end(&self) -> u32 {
        self.chapter_end
    }

    pub fn verse_start(&self) -> Option<u32> {
        self.verse_start
    }

    pub fn verse_end(&self) -> Option<u32> {
        self.verse_end
    }

    pub fn is_single_chapter(&self) -> bool {
        self.chapter_start == self.chapter_end
    }

    /// Returns whether `chapter:verse` lies inside the passage bounds.
    pub fn contains(&self, chapter: u32, verse: u32) -> bool {
        if chapter < self.chapter_start || chapter > self.chapter_end {
            return false;
        }
        if chapter == self.chapter_start && self.verse_start.is_some_and(|start| verse < start) {
            return false;
        }
        if chapter == self.chapter_end && self.verse_end.is_some_and(|end| verse > end) {
            return false;
        }
        true
    }

    /// Range notation understood by the range-oriented provider.
    ///
    /// A single-chapter passage with only one verse bound requests the whole
    /// chapter (or `c:1-end`); callers trim the result client-side.
    pub fn range_string(&self) -> String {
        let (cs, ce) = (self.chapter_start, self.chapter_end);
        if self.is_single_chapter() {
            return match (self.verse_start, self.verse_end) {
                (Some(start), Some(end)) => format!("{cs}:{start}-{end}"),
                (None, Some(end)) => format!("{cs}:1-{end}"),
                _ => cs.to_string(),
            };
        }

        let start = match self.verse_start {
            Some(verse) => format!("{cs}:{verse}"),
            None => cs.to_string(),
        };
        let end = match self.verse_end {
            Some(verse) => format!("{ce}:{verse}"),
            None => ce.to_string(),
        };
        format!("{start}-{end}")
    }

    /// Human-readable heading for the passage in the given language.
    pub fn label(&self, lang: LanguageVariant) -> String {
        let book = self.book.as_str();
        let (cs, ce) = (self.chapter_start, self.chapter_end);
        let verses = match (self.verse_start, self.verse_end) {
            (Some(start), Some(end)) => Some(format!("{start}-{end}")),
            (Some(start), None) => Some(start.to_string()),
            (None, Some(end)) => Some(format!("1-{end}")),
            (None, None) => None,
        };

        if lang.is_chinese() {
            if self.is_single_chapter() {
                return match verses {
                    Some(verses) => format!("{book} 第 {cs} 章 {verses}"),
                    None => format!("{book} 第 {cs} 章"),
                };
            }
            return format!("{book} 第 {cs} 章 至 第 {ce} 章");
        }

        if self.is_single_chapter() {
            return match verses {
                Some(verses) => format!("{book} {cs}:{verses}"),
                None => format!("{book} {cs}"),
            };
        }
        format!("{book} Chapters {cs}-{ce}")
    }
}
