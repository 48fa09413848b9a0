//! # Weave LLM
//!
//! The two narrow capabilities the task factory depends on: [`EmbeddingProvider`]
//! and [`ChatProvider`]. Concrete backends (OpenAI, a local model server, …)
//! are deliberately out of scope here — only the trait boundary, mock
//! implementations for testing, and shared resilience/concurrency helpers
//! live in this crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use weave_llm::{ChatProvider, MockChatProvider};
//!
//! # tokio_test::block_on(async {
//! let chat = MockChatProvider::constant(r#"{"valid": true}"#);
//! let reply = chat.chat("system", "user", None).await.unwrap();
//! assert_eq!(reply, r#"{"valid": true}"#);
//! # });
//! ```

pub mod mock;
pub mod parse;
pub mod provider;
pub mod resilience;
pub mod workers;

pub use mock::{MockChatProvider, MockEmbeddingProvider};
pub use parse::{extract_json_object, parse_json_response};
pub use provider::{ChatProvider, EmbeddingProvider, ProviderError};
pub use resilience::{with_retry, CallPolicy};
pub use workers::bounded_for_each;
