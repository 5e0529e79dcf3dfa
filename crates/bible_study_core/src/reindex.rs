//! Verse-range recalculation for observation items and segments.
//!
//! # Responsibility
//! - Partition a passage's verse list across observation items keyed by
//!   each item's end verse.
//! - Suggest the start verse of a newly added segment.
//!
//! # Invariants
//! - Output items are ordered by end position in the verse list; ties keep
//!   input order.
//! - Item `0` starts at `verses[0]`; item `i` starts at the verse after item
//!   `i - 1`'s end, or at that same end when it is the last verse.
//! - The whole list is recomputed on every membership change. Starts depend
//!   on the predecessor's end, so no item is patched in isolation.
//! - An end verse missing from `verses` sorts first and still gets a range
//!   starting at `verses[0]`. It is kept and logged, not rejected.

use crate::model::observation::{ObservationItem, ObservationRef};
use crate::model::passage::{Verse, VerseRef};
use crate::model::study::Segment;
use log::{debug, warn};

/// Zero-based index of `at` in `verses`, by linear `(chapter, verse)` match.
pub fn position_of(verses: &[Verse], at: VerseRef) -> Option<usize> {
    verses
        .iter()
        .position(|verse| verse.chapter == at.chapter && verse.verse == at.verse)
}

/// Recomputes every item's start so the items partition `verses`.
///
/// Returns `items` unchanged when `verses` is empty.
pub fn reindex(items: Vec<ObservationItem>, verses: &[Verse]) -> Vec<ObservationItem> {
    let Some(first_verse) = verses.first() else {
        return items;
    };

    // `None` orders before every `Some`, which places unresolved ends first.
    let mut positioned: Vec<(Option<usize>, ObservationItem)> = items
        .into_iter()
        .map(|item| (position_of(verses, item.reference.end), item))
        .collect();
    positioned.sort_by_key(|(end_idx, _)| *end_idx);

    let unresolved = positioned
        .iter()
        .filter(|(end_idx, _)| end_idx.is_none())
        .count();
    if unresolved > 0 {
        warn!(
            "event=observation_reindex module=reindex status=unresolved unresolved_count={} item_count={} verse_count={}",
            unresolved,
            positioned.len(),
            verses.len()
        );
    }

    let last_idx = verses.len() - 1;
    let mut previous_end: Option<Option<usize>> = None;
    let reindexed: Vec<ObservationItem> = positioned
        .into_iter()
        .map(|(end_idx, mut item)| {
            let start = match previous_end {
                None | Some(None) => first_verse,
                Some(Some(prev)) if prev < last_idx => &verses[prev + 1],
                Some(Some(prev)) => &verses[prev],
            };
            item.reference = ObservationRef::resolved(start.reference(), item.reference.end);
            previous_end = Some(end_idx);
            item
        })
        .collect();

    debug!(
        "event=observation_reindex module=reindex status=ok item_count={}",
        reindexed.len()
    );
    reindexed
}

/// Default start of a segment appended after `segments`.
///
/// - No segments: first verse of the passage.
/// - Otherwise the verse after the last segment's end; when that end is the
///   final verse, the end itself.
/// - A last end missing from `verses` falls back to the first verse of its
///   chapter, or of the passage when the chapter is absent too.
/// - `1:1` when `verses` is empty.
pub fn next_segment_start(segments: &[Segment], verses: &[Verse]) -> VerseRef {
    let Some(first_verse) = verses.first() else {
        return VerseRef::new(1, 1);
    };
    let Some(last) = segments.last() else {
        return first_verse.reference();
    };

    let end = last.end();
    match position_of(verses, end) {
        Some(idx) if idx + 1 < verses.len() => verses[idx + 1].reference(),
        Some(_) => end,
        None => verses
            .iter()
            .find(|verse| verse.chapter == end.chapter)
            .unwrap_or(first_verse)
            .reference(),
    }
}
