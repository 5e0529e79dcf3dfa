//! Scripture text retrieval.
//!
//! # Responsibility
//! - Adapt the chapter-oriented and range-oriented HTTP providers.
//! - Resolve a passage into an ordered verse list through a language-keyed
//!   fallback chain.
//!
//! # Invariants
//! - Provider failures never escape `PassageFetcher::fetch`.
//! - Verse text leaving this module is plain text.

pub mod books;
pub mod chapter_client;
pub mod fetcher;
pub mod plan;
pub mod range_client;
pub mod registry;
pub mod source;
pub mod text;

pub use books::BookTable;
pub use chapter_client::{ChapterClient, CHAPTER_PROVIDER_ID};
pub use fetcher::{FetchOutcome, PassageFetcher};
pub use plan::{FallbackTable, ProviderAttempt};
pub use range_client::{RangeClient, RANGE_PROVIDER_ID};
pub use registry::{SourceRegistry, SourceRegistryError};
pub use source::{FetchError, FetchResult, ScriptureSource, SourceMode};
