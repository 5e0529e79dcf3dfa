//! Multi-provider passage retrieval with ordered fallback.
//!
//! # Responsibility
//! - Walk the language's `FallbackTable` entry in order, one attempt at a time.
//! - Validate every attempt as a whole before accepting it.
//!
//! # Invariants
//! - Requests are strictly sequential; chapter `n + 1` is requested only after
//!   chapter `n` succeeded.
//! - An attempt either yields the whole passage or nothing. Verses from two
//!   attempts are never mixed.
//! - Returned verses are contiguous: they start at `verse_start` (or verse 1)
//!   of `chapter_start`, end at `verse_end` of `chapter_end` when one is
//!   given, and step by one verse, or to verse 1 of the next chapter.
//! - `fetch` never fails; total failure is an empty list.

use crate::config::{ScriptureConfig, ScriptureConfigError};
use crate::model::passage::{LanguageVariant, Passage, Verse};
use crate::scripture::books::BookTable;
use crate::scripture::chapter_client::ChapterClient;
use crate::scripture::plan::{FallbackTable, ProviderAttempt};
use crate::scripture::range_client::RangeClient;
use crate::scripture::registry::SourceRegistry;
use crate::scripture::source::{FetchError, ScriptureSource, SourceMode};
use log::{error, info, warn};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Instant;

/// Verses plus the attempt that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub verses: Vec<Verse>,
    /// `None` when every attempt failed.
    pub served_by: Option<ProviderAttempt>,
    /// Number of attempts abandoned before the result was found.
    pub failed_attempts: usize,
}

#[derive(Debug)]
enum AttemptFailure {
    UnknownProvider,
    UnmappedBook,
    Provider {
        chapter: Option<u32>,
        error: FetchError,
    },
    EmptyChapter(u32),
    Empty,
    Gap,
}

impl AttemptFailure {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownProvider => "unknown_provider",
            Self::UnmappedBook => "unmapped_book",
            Self::Provider { error, .. } => error.code(),
            Self::EmptyChapter(_) => "empty_chapter",
            Self::Empty => "empty_result",
            Self::Gap => "verse_gap",
        }
    }
}

impl Display for AttemptFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownProvider => write!(f, "provider is not registered"),
            Self::UnmappedBook => write!(f, "book has no provider id"),
            Self::Provider {
                chapter: Some(chapter),
                error,
            } => write!(f, "chapter {chapter}: {error}"),
            Self::Provider {
                chapter: None,
                error,
            } => write!(f, "{error}"),
            Self::EmptyChapter(chapter) => write!(f, "chapter {chapter} returned no verses"),
            Self::Empty => write!(f, "no verses inside passage bounds"),
            Self::Gap => write!(f, "verses do not cover the passage without gaps"),
        }
    }
}

/// Passage retrieval over registered scripture sources.
#[derive(Clone)]
pub struct PassageFetcher {
    registry: SourceRegistry,
    books: BookTable,
    plan: FallbackTable,
}

impl PassageFetcher {
    pub fn new(registry: SourceRegistry, books: BookTable, plan: FallbackTable) -> Self {
        Self {
            registry,
            books,
            plan,
        }
    }

    /// Production fetcher: both HTTP providers on one shared client, the
    /// standard book table and the standard fallback table.
    pub fn from_config(config: &ScriptureConfig) -> Result<Self, ScriptureConfigError> {
        let client = config.build_http_client()?;
        let mut registry = SourceRegistry::new();
        let sources: [Arc<dyn ScriptureSource>; 2] = [
            Arc::new(ChapterClient::new(
                client.clone(),
                config.chapter_base_url.as_str(),
            )),
            Arc::new(RangeClient::new(client, config.range_base_url.as_str())),
        ];
        for source in sources {
            registry.register(source)?;
        }

        Ok(Self::new(
            registry,
            BookTable::standard(),
            FallbackTable::standard(),
        ))
    }

    pub fn plan(&self) -> &FallbackTable {
        &self.plan
    }

    /// Returns the passage verses, or an empty list when every attempt fails.
    pub async fn fetch(&self, passage: &Passage, lang: LanguageVariant) -> Vec<Verse> {
        self.fetch_with_report(passage, lang).await.verses
    }

    /// Same as `fetch`, also reporting which attempt served the verses.
    pub async fn fetch_with_report(
        &self,
        passage: &Passage,
        lang: LanguageVariant,
    ) -> FetchOutcome {
        let started_at = Instant::now();
        info!(
            "event=passage_fetch module=scripture status=start book={} range={} lang={}",
            passage.book(),
            passage.range_string(),
            lang
        );

        let attempts = self.plan.attempts_for(lang);
        let mut failed_attempts = 0;
        for attempt in attempts {
            match self.run_attempt(attempt, passage).await {
                Ok(verses) => {
                    info!(
                        "event=passage_fetch module=scripture status=ok provider={} translation={} verse_count={} failed_attempts={} duration_ms={}",
                        attempt.provider_id,
                        attempt.translation,
                        verses.len(),
                        failed_attempts,
                        started_at.elapsed().as_millis()
                    );
                    return FetchOutcome {
                        verses,
                        served_by: Some(attempt.clone()),
                        failed_attempts,
                    };
                }
                Err(failure) => {
                    failed_attempts += 1;
                    warn!(
                        "event=passage_fetch module=scripture status=fallback provider={} translation={} error_code={} error={}",
                        attempt.provider_id,
                        attempt.translation,
                        failure.code(),
                        failure
                    );
                }
            }
        }

        error!(
            "event=passage_fetch module=scripture status=error attempts={} duration_ms={} error_code=all_providers_failed",
            attempts.len(),
            started_at.elapsed().as_millis()
        );
        FetchOutcome {
            verses: Vec::new(),
            served_by: None,
            failed_attempts,
        }
    }

    async fn run_attempt(
        &self,
        attempt: &ProviderAttempt,
        passage: &Passage,
    ) -> Result<Vec<Verse>, AttemptFailure> {
        let source = self
            .registry
            .get(&attempt.provider_id)
            .ok_or(AttemptFailure::UnknownProvider)?;

        let verses = match source.mode() {
            SourceMode::Chapter => {
                self.fetch_by_chapters(source.as_ref(), &attempt.translation, passage)
                    .await?
            }
            SourceMode::Range => source
                .fetch_range(&attempt.translation, passage.book(), &passage.range_string())
                .await
                .map_err(|error| AttemptFailure::Provider {
                    chapter: None,
                    error,
                })?
                .into_iter()
                .filter(|verse| passage.contains(verse.chapter, verse.verse))
                .collect(),
        };

        if verses.is_empty() {
            return Err(AttemptFailure::Empty);
        }
        if !is_contiguous(&verses, passage) {
            return Err(AttemptFailure::Gap);
        }
        Ok(verses)
    }

    async fn fetch_by_chapters(
        &self,
        source: &dyn ScriptureSource,
        translation: &str,
        passage: &Passage,
    ) -> Result<Vec<Verse>, AttemptFailure> {
        let book_id = self
            .books
            .id_of(passage.book())
            .ok_or(AttemptFailure::UnmappedBook)?;

        let mut results = Vec::new();
        for chapter in passage.chapter_start()..=passage.chapter_end() {
            let verses = source
                .fetch_chapter(translation, book_id, chapter)
                .await
                .map_err(|error| AttemptFailure::Provider {
                    chapter: Some(chapter),
                    error,
                })?;
            if verses.is_empty() {
                return Err(AttemptFailure::EmptyChapter(chapter));
            }
            results.extend(
                verses
                    .into_iter()
                    .filter(|verse| passage.contains(verse.chapter, verse.verse)),
            );
        }
        Ok(results)
    }
}

/// Checks that a non-empty, bounds-trimmed list covers the passage with no
/// gap, duplicate or reversal.
fn is_contiguous(verses: &[Verse], passage: &Passage) -> bool {
    let (Some(first), Some(last)) = (verses.first(), verses.last()) else {
        return false;
    };
    if first.chapter != passage.chapter_start()
        || first.verse != passage.verse_start().unwrap_or(1)
    {
        return false;
    }
    if last.chapter != passage.chapter_end()
        || passage.verse_end().is_some_and(|end| last.verse != end)
    {
        return false;
    }

    verses.windows(2).all(|pair| {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.chapter == prev.chapter {
            next.verse == prev.verse + 1
        } else {
            next.chapter == prev.chapter + 1 && next.verse == 1
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{is_contiguous, PassageFetcher};
    use crate::model::passage::{LanguageVariant, Passage, Verse};
    use crate::scripture::books::BookTable;
    use crate::scripture::plan::{FallbackTable, ProviderAttempt};
    use crate::scripture::registry::SourceRegistry;
    use crate::scripture::source::{FetchError, FetchResult, ScriptureSource, SourceMode};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    enum Reply {
        Verses(u32),
        Empty,
        Status(u16),
    }

    /// Scripted source recording every call in order.
    struct ScriptedSource {
        provider_id: &'static str,
        mode: SourceMode,
        replies: HashMap<(String, u32), Reply>,
        range_replies: HashMap<String, Vec<Verse>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSource {
        fn chapter(provider_id: &'static str, calls: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                provider_id,
                mode: SourceMode::Chapter,
                replies: HashMap::new(),
                range_replies: HashMap::new(),
                calls,
            }
        }

        fn range(provider_id: &'static str, calls: Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                mode: SourceMode::Range,
                ..Self::chapter(provider_id, calls)
            }
        }

        fn reply(mut self, translation: &str, chapter: u32, reply: Reply) -> Self {
            self.replies.insert((translation.to_string(), chapter), reply);
            self
        }

        fn range_reply(mut self, translation: &str, verses: Vec<Verse>) -> Self {
            self.range_replies.insert(translation.to_string(), verses);
            self
        }
    }

    #[async_trait]
    impl ScriptureSource for ScriptedSource {
        fn provider_id(&self) -> &str {
            self.provider_id
        }

        fn mode(&self) -> SourceMode {
            self.mode
        }

        async fn fetch_chapter(
            &self,
            translation: &str,
            _book_id: u32,
            chapter: u32,
        ) -> FetchResult<Vec<Verse>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}/{translation}/{chapter}", self.provider_id));
            match self.replies.get(&(translation.to_string(), chapter)) {
                Some(Reply::Verses(count)) => Ok((1..=*count)
                    .map(|verse| Verse::new(chapter, verse, format!("{translation} {chapter}:{verse}")))
                    .collect()),
                Some(Reply::Status(status)) => Err(FetchError::Status(*status)),
                Some(Reply::Empty) | None => Ok(Vec::new()),
            }
        }

        async fn fetch_range(
            &self,
            translation: &str,
            _book: &str,
            range: &str,
        ) -> FetchResult<Vec<Verse>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}/{translation}/{range}", self.provider_id));
            Ok(self
                .range_replies
                .get(translation)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn fetcher(sources: Vec<ScriptedSource>, plan: FallbackTable) -> PassageFetcher {
        let mut registry = SourceRegistry::new();
        for source in sources {
            registry.register(Arc::new(source)).unwrap();
        }
        PassageFetcher::new(registry, BookTable::standard(), plan)
    }

    fn english_plan() -> FallbackTable {
        FallbackTable::default().with_attempts(
            LanguageVariant::English,
            vec![
                ProviderAttempt::new("chapters", "ESV"),
                ProviderAttempt::new("chapters", "WEB"),
                ProviderAttempt::new("ranges", "esv"),
            ],
        )
    }

    #[tokio::test]
    async fn trims_single_chapter_to_verse_bounds() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let source = ScriptedSource::chapter("chapters", calls.clone()).reply("ESV", 3, Reply::Verses(36));
        let fetcher = fetcher(vec![source], english_plan());

        let passage = Passage::new("John", 3, 3, Some(16), Some(18)).unwrap();
        let verses = fetcher.fetch(&passage, LanguageVariant::English).await;

        let numbers: Vec<u32> = verses.iter().map(|v| v.verse).collect();
        assert_eq!(numbers, vec![16, 17, 18]);
        assert_eq!(calls.lock().unwrap().as_slice(), ["chapters/ESV/3"]);
    }

    #[tokio::test]
    async fn empty_middle_chapter_abandons_attempt_and_refetches_whole_range() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let source = ScriptedSource::chapter("chapters", calls.clone())
            .reply("ESV", 1, Reply::Verses(3))
            .reply("ESV", 2, Reply::Empty)
            .reply("ESV", 3, Reply::Verses(3))
            .reply("WEB", 1, Reply::Verses(2))
            .reply("WEB", 2, Reply::Verses(2))
            .reply("WEB", 3, Reply::Verses(2));
        let fetcher = fetcher(vec![source], english_plan());

        let passage = Passage::chapters("Ruth", 1, 3).unwrap();
        let outcome = fetcher
            .fetch_with_report(&passage, LanguageVariant::English)
            .await;

        assert_eq!(
            calls.lock().unwrap().as_slice(),
            [
                "chapters/ESV/1",
                "chapters/ESV/2",
                "chapters/WEB/1",
                "chapters/WEB/2",
                "chapters/WEB/3"
            ]
        );
        assert_eq!(outcome.failed_attempts, 1);
        assert_eq!(
            outcome.served_by,
            Some(ProviderAttempt::new("chapters", "WEB"))
        );
        assert_eq!(outcome.verses.len(), 6);
        assert!(outcome.verses.iter().all(|v| v.text.starts_with("WEB")));
    }

    #[tokio::test]
    async fn http_error_falls_through_to_range_provider() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chapters = ScriptedSource::chapter("chapters", calls.clone())
            .reply("ESV", 1, Reply::Status(500))
            .reply("WEB", 1, Reply::Status(404));
        let ranges = ScriptedSource::range("ranges", calls.clone()).range_reply(
            "esv",
            vec![
                Verse::new(1, 1, "a"),
                Verse::new(1, 2, "b"),
                Verse::new(1, 3, "c"),
            ],
        );
        let fetcher = fetcher(vec![chapters, ranges], english_plan());

        let passage = Passage::new("Ruth", 1, 1, Some(2), Some(3)).unwrap();
        let verses = fetcher.fetch(&passage, LanguageVariant::English).await;

        assert_eq!(
            calls.lock().unwrap().as_slice(),
            ["chapters/ESV/1", "chapters/WEB/1", "ranges/esv/1:2-3"]
        );
        assert_eq!(verses, vec![Verse::new(1, 2, "b"), Verse::new(1, 3, "c")]);
    }

    #[tokio::test]
    async fn returns_empty_when_every_attempt_fails() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chapters = ScriptedSource::chapter("chapters", calls.clone());
        let ranges = ScriptedSource::range("ranges", calls.clone());
        let fetcher = fetcher(vec![chapters, ranges], english_plan());

        let passage = Passage::chapters("Ruth", 1, 2).unwrap();
        let outcome = fetcher
            .fetch_with_report(&passage, LanguageVariant::English)
            .await;

        assert!(outcome.verses.is_empty());
        assert!(outcome.served_by.is_none());
        assert_eq!(outcome.failed_attempts, 3);
    }

    #[tokio::test]
    async fn unmapped_book_skips_chapter_attempts() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chapters = ScriptedSource::chapter("chapters", calls.clone()).reply("ESV", 1, Reply::Verses(3));
        let ranges = ScriptedSource::range("ranges", calls.clone())
            .range_reply("esv", vec![Verse::new(1, 1, "a")]);
        let fetcher = fetcher(vec![chapters, ranges], english_plan());

        let passage = Passage::chapters("Tobit", 1, 1).unwrap();
        let verses = fetcher.fetch(&passage, LanguageVariant::English).await;

        assert_eq!(verses.len(), 1);
        assert_eq!(calls.lock().unwrap().as_slice(), ["ranges/esv/1"]);
    }

    #[tokio::test]
    async fn unknown_provider_in_plan_is_a_failed_attempt() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let chapters = ScriptedSource::chapter("chapters", calls.clone()).reply("ESV", 1, Reply::Verses(2));
        let plan = FallbackTable::default().with_attempts(
            LanguageVariant::English,
            vec![
                ProviderAttempt::new("missing", "ESV"),
                ProviderAttempt::new("chapters", "ESV"),
            ],
        );
        let fetcher = fetcher(vec![chapters], plan);

        let passage = Passage::chapters("Ruth", 1, 1).unwrap();
        let outcome = fetcher
            .fetch_with_report(&passage, LanguageVariant::English)
            .await;
        assert_eq!(outcome.failed_attempts, 1);
        assert_eq!(outcome.verses.len(), 2);
    }

    #[tokio::test]
    async fn range_result_skipping_a_chapter_is_rejected() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let ranges = ScriptedSource::range("ranges", calls.clone())
            .range_reply("esv", vec![Verse::new(1, 1, "a"), Verse::new(3, 1, "c")]);
        let plan = FallbackTable::default().with_attempts(
            LanguageVariant::English,
            vec![ProviderAttempt::new("ranges", "esv")],
        );
        let fetcher = fetcher(vec![ranges], plan);

        let passage = Passage::chapters("Ruth", 1, 3).unwrap();
        assert!(fetcher
            .fetch(&passage, LanguageVariant::English)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn attempt_with_missing_verse_falls_back_to_complete_one() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let ranges = ScriptedSource::range("ranges", calls.clone())
            .range_reply("esv", vec![Verse::new(3, 17, "b"), Verse::new(3, 18, "c")])
            .range_reply(
                "web",
                vec![
                    Verse::new(3, 16, "a"),
                    Verse::new(3, 17, "b"),
                    Verse::new(3, 18, "c"),
                ],
            );
        let plan = FallbackTable::default().with_attempts(
            LanguageVariant::English,
            vec![
                ProviderAttempt::new("ranges", "esv"),
                ProviderAttempt::new("ranges", "web"),
            ],
        );
        let fetcher = fetcher(vec![ranges], plan);

        let passage = Passage::new("John", 3, 3, Some(16), Some(18)).unwrap();
        let outcome = fetcher
            .fetch_with_report(&passage, LanguageVariant::English)
            .await;

        let numbers: Vec<u32> = outcome.verses.iter().map(|v| v.verse).collect();
        assert_eq!(numbers, vec![16, 17, 18]);
        assert_eq!(outcome.served_by, Some(ProviderAttempt::new("ranges", "web")));
        assert_eq!(outcome.failed_attempts, 1);
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            ["ranges/esv/3:16-18", "ranges/web/3:16-18"]
        );
    }

    #[tokio::test]
    async fn short_chapter_fails_attempt_when_verse_end_is_missing() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let source = ScriptedSource::chapter("chapters", calls.clone())
            .reply("ESV", 3, Reply::Verses(17))
            .reply("WEB", 3, Reply::Verses(36));
        let fetcher = fetcher(vec![source], english_plan());

        let passage = Passage::new("John", 3, 3, Some(16), Some(18)).unwrap();
        let outcome = fetcher
            .fetch_with_report(&passage, LanguageVariant::English)
            .await;

        assert_eq!(outcome.served_by, Some(ProviderAttempt::new("chapters", "WEB")));
        assert_eq!(outcome.verses.len(), 3);
    }

    #[test]
    fn contiguity_check_rejects_gaps_duplicates_and_reversals() {
        let passage = Passage::chapters("Ruth", 1, 2).unwrap();
        let ok = vec![Verse::new(1, 1, ""), Verse::new(1, 2, ""), Verse::new(2, 1, "")];
        assert!(is_contiguous(&ok, &passage));

        let duplicate = vec![Verse::new(1, 1, ""), Verse::new(1, 1, ""), Verse::new(2, 1, "")];
        assert!(!is_contiguous(&duplicate, &passage));

        let reversed = vec![Verse::new(1, 2, ""), Verse::new(1, 1, ""), Verse::new(2, 1, "")];
        assert!(!is_contiguous(&reversed, &passage));

        let short = vec![Verse::new(1, 1, "")];
        assert!(!is_contiguous(&short, &passage));

        let middle_gap = vec![Verse::new(1, 1, ""), Verse::new(1, 3, ""), Verse::new(2, 1, "")];
        assert!(!is_contiguous(&middle_gap, &passage));

        let late_chapter_start = vec![Verse::new(1, 1, ""), Verse::new(2, 2, "")];
        assert!(!is_contiguous(&late_chapter_start, &passage));

        let bounded = Passage::new("Ruth", 1, 1, Some(2), Some(4)).unwrap();
        let missing_first = vec![Verse::new(1, 3, ""), Verse::new(1, 4, "")];
        assert!(!is_contiguous(&missing_first, &bounded));
        let missing_last = vec![Verse::new(1, 2, ""), Verse::new(1, 3, "")];
        assert!(!is_contiguous(&missing_last, &bounded));
    }

    #[test]
    fn standard_plan_is_exposed_for_inspection() {
        let fetcher = PassageFetcher::from_config(&crate::config::ScriptureConfig::default()).unwrap();
        assert_eq!(fetcher.plan().attempts_for(LanguageVariant::English).len(), 4);
        assert_eq!(
            fetcher.plan().attempts_for(LanguageVariant::ChineseTraditional)[0],
            ProviderAttempt::new("bolls", "CUV")
        );
    }
}
