//! Range-oriented HTTP provider.
//!
//! `GET {base}/{book} {range}?translation={code}` returns
//! `{ "verses": [{ "chapter", "verse", "text" }] }`. A missing `verses` key is
//! read as an empty list.

use crate::config::{ScriptureConfig, ScriptureConfigError};
use crate::model::passage::Verse;
use crate::scripture::source::{FetchError, FetchResult, ScriptureSource, SourceMode};
use crate::scripture::text::clean_verse_text;
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;

/// Registry id of the range-oriented provider.
pub const RANGE_PROVIDER_ID: &str = "bible_api";

#[derive(Debug, Deserialize)]
struct RangeResponse {
    #[serde(default)]
    verses: Vec<RangeVerse>,
}

#[derive(Debug, Deserialize)]
struct RangeVerse {
    chapter: u32,
    verse: u32,
    text: String,
}

/// Client for the range-oriented provider.
pub struct RangeClient {
    client: Client,
    base_url: String,
}

impl RangeClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ScriptureConfig) -> Result<Self, ScriptureConfigError> {
        Ok(Self::new(
            config.build_http_client()?,
            config.range_base_url.as_str(),
        ))
    }

    fn range_url(&self, translation: &str, book: &str, range: &str) -> FetchResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| FetchError::InvalidRequest(format!("bad base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidRequest("base url cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(&format!("{book} {range}"));
        url.query_pairs_mut().append_pair("translation", translation);
        Ok(url)
    }
}

#[async_trait]
impl ScriptureSource for RangeClient {
    fn provider_id(&self) -> &str {
        RANGE_PROVIDER_ID
    }

    fn mode(&self) -> SourceMode {
        SourceMode::Range
    }

    async fn fetch_range(
        &self,
        translation: &str,
        book: &str,
        range: &str,
    ) -> FetchResult<Vec<Verse>> {
        debug!(
            "event=range_request module=scripture status=start provider={} translation={} range={}",
            RANGE_PROVIDER_ID, translation, range
        );

        let url = self.range_url(translation, book, range)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let payload: RangeResponse = serde_json::from_str(&body)
            .map_err(|err| FetchError::Malformed(format!("expected verses object: {err}")))?;

        Ok(payload
            .verses
            .into_iter()
            .map(|item| Verse::new(item.chapter, item.verse, clean_verse_text(&item.text)))
            .collect())
    }
}
