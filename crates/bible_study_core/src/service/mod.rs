//! Study use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into wizard-level operations.
//! - Keep callers decoupled from storage details.

pub mod study_service;
pub mod validation;
