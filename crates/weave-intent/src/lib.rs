//! # Weave Intent
//!
//! Intent Synthesizer (C8): turns a sampled [`weave_core::TaskSkeleton`]
//! into a concrete [`weave_core::UserIntent`] via one `Chat` round-trip,
//! validated for flatness, query grounding, and no intermediate-parameter
//! leakage before being accepted.

pub mod prompt;
pub mod synthesize;
pub mod validate;

pub use prompt::build_prompt;
pub use synthesize::{synthesize_intent, IntentError, MAX_PARSE_RETRIES};
