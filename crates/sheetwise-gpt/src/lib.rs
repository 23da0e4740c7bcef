//! Asynchronous chat-completion service for the sheetwise `GPT()` function.
//!
//! Formula evaluation is synchronous, but a completion takes a network round
//! trip. [`GptService`] bridges the two: the evaluator asks it for a request,
//! immediately gets back a [`GptHandle`] whose placeholder text is shown in the
//! cell, and the actual HTTP call runs on a tokio runtime in the background.
//!
//! # Architecture
//!
//! ```text
//! GPT("prompt") in a formula
//!     └── GptService::request       (dedup against pending prompts)
//!           ├── GptHandle           (placeholder + per-request wait)
//!           └── spawned task
//!                 └── ChatClient    (HttpChatClient: POST {messages:[...]})
//!                       └── CompletionSignal broadcast to subscribers
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetwise_gpt::{GptConfig, GptService};
//!
//! # async fn example() -> sheetwise_gpt::Result<()> {
//! let service = GptService::http(GptConfig::from_env()?, tokio::runtime::Handle::current())?;
//! let mut completions = service.subscribe();
//!
//! let handle = service.request("Summarize Q3 revenue");
//! println!("cell shows: {}", handle.placeholder());
//!
//! let signal = completions.recv().await.expect("completion");
//! println!("{} -> {}", signal.request_id, signal.result);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod service;

pub use client::{extract_reply, ChatClient, ChatFuture, HttpChatClient, NO_RESPONSE};
pub use config::GptConfig;
pub use error::{GptError, Result};
pub use request::{
    placeholder, placeholder_request_id, CompletionSignal, GptRequest, RequestStatus,
};
pub use service::{GptHandle, GptService};
