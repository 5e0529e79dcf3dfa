//! Domain model for the study workbook.
//!
//! # Responsibility
//! - Define passages, verses and the references that anchor user notes.
//! - Define the per-lesson homework record and local identity.
//!
//! # Invariants
//! - Verse sequences are ordered by `(chapter, verse)` ascending.
//! - Invalid passages cannot be constructed or deserialized.

pub mod lesson;
pub mod observation;
pub mod passage;
pub mod study;
