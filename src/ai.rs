//! Summarization of the dataset profile.
//!
//! The pipeline only sees the [`Summarizer`] trait. [`OpenAiSummarizer`]
//! calls a chat completion model, [`PassthroughSummarizer`] returns the
//! text as is, and [`summarize_or_fallback`] guarantees a usable text
//! whatever the collaborator does.

#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod summarizer;

pub use client::OpenAiSummarizer;
pub use summarizer::{PassthroughSummarizer, Summarizer, SummaryOutcome, summarize_or_fallback};
