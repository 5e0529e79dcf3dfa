//! Chapter-oriented HTTP provider.
//!
//! `GET {base}/get-chapter/{translation}/{book_id}/{chapter}/` returns a JSON
//! array of `{ verse, text }` objects for the whole chapter.

use crate::config::{ScriptureConfig, ScriptureConfigError};
use crate::model::passage::Verse;
use crate::scripture::source::{FetchError, FetchResult, ScriptureSource, SourceMode};
use crate::scripture::text::clean_verse_text;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

/// Registry id of the chapter-oriented provider.
pub const CHAPTER_PROVIDER_ID: &str = "bolls";

#[derive(Debug, Deserialize)]
struct ChapterVerse {
    verse: u32,
    text: String,
}

/// Client for the chapter-oriented provider.
pub struct ChapterClient {
    client: Client,
    base_url: String,
}

impl ChapterClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ScriptureConfig) -> Result<Self, ScriptureConfigError> {
        Ok(Self::new(
            config.build_http_client()?,
            config.chapter_base_url.as_str(),
        ))
    }

    fn chapter_url(&self, translation: &str, book_id: u32, chapter: u32) -> String {
        format!(
            "{}/get-chapter/{}/{}/{}/",
            self.base_url, translation, book_id, chapter
        )
    }
}

#[async_trait]
impl ScriptureSource for ChapterClient {
    fn provider_id(&self) -> &str {
        CHAPTER_PROVIDER_ID
    }

    fn mode(&self) -> SourceMode {
        SourceMode::Chapter
    }

    async fn fetch_chapter(
        &self,
        translation: &str,
        book_id: u32,
        chapter: u32,
    ) -> FetchResult<Vec<Verse>> {
        debug!(
            "event=chapter_request module=scripture status=start provider={} translation={} book_id={} chapter={}",
            CHAPTER_PROVIDER_ID, translation, book_id, chapter
        );

        let response = self
            .client
            .get(self.chapter_url(translation, book_id, chapter))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let verses: Vec<ChapterVerse> = serde_json::from_str(&body)
            .map_err(|err| FetchError::Malformed(format!("expected verse array: {err}")))?;

        Ok(verses
            .into_iter()
            .map(|item| Verse::new(chapter, item.verse, clean_verse_text(&item.text)))
            .collect())
    }
}
