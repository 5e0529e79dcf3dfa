//! Language-keyed provider fallback table.
//!
//! # Invariants
//! - Attempt order is the trust ranking: native-script translations before
//!   others, chapter provider before range provider.
//! - Every language variant has an entry in `FallbackTable::standard()`.

use crate::model::passage::LanguageVariant;
use crate::scripture::chapter_client::CHAPTER_PROVIDER_ID;
use crate::scripture::range_client::RANGE_PROVIDER_ID;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// One `(provider, translation)` pair to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAttempt {
    pub provider_id: String,
    pub translation: String,
}

impl ProviderAttempt {
    pub fn new(provider_id: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            translation: translation.into(),
        }
    }
}

impl Display for ProviderAttempt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider_id, self.translation)
    }
}

/// Ordered attempts per language variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackTable {
    entries: BTreeMap<LanguageVariant, Vec<ProviderAttempt>>,
}

impl FallbackTable {
    /// Production ordering.
    ///
    /// - `zh-hans`: chapter CUVS, chapter CUV, range cuv.
    /// - `zh-hant`: chapter CUV, chapter CUVS, range cuv.
    /// - `en`: chapter ESV, chapter WEB, range esv, range web.
    pub fn standard() -> Self {
        let chinese = |primary: &str, secondary: &str| {
            vec![
                ProviderAttempt::new(CHAPTER_PROVIDER_ID, primary),
                ProviderAttempt::new(CHAPTER_PROVIDER_ID, secondary),
                ProviderAttempt::new(RANGE_PROVIDER_ID, "cuv"),
            ]
        };

        Self::default()
            .with_attempts(
                LanguageVariant::English,
                vec![
                    ProviderAttempt::new(CHAPTER_PROVIDER_ID, "ESV"),
                    ProviderAttempt::new(CHAPTER_PROVIDER_ID, "WEB"),
                    ProviderAttempt::new(RANGE_PROVIDER_ID, "esv"),
                    ProviderAttempt::new(RANGE_PROVIDER_ID, "web"),
                ],
            )
            .with_attempts(LanguageVariant::ChineseSimplified, chinese("CUVS", "CUV"))
            .with_attempts(LanguageVariant::ChineseTraditional, chinese("CUV", "CUVS"))
    }

    /// Replaces the attempt list for one language.
    pub fn with_attempts(mut self, lang: LanguageVariant, attempts: Vec<ProviderAttempt>) -> Self {
        self.entries.insert(lang, attempts);
        self
    }

    /// Attempts for `lang`; languages without an entry use the English list.
    pub fn attempts_for(&self, lang: LanguageVariant) -> &[ProviderAttempt] {
        self.entries
            .get(&lang)
            .or_else(|| self.entries.get(&LanguageVariant::English))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
