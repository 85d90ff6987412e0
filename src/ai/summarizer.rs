//! The summarization seam and its fail-open wrapper.

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Text in, rewritten text out.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Returns its input. Used when summarization is disabled or unconfigured.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughSummarizer;

#[async_trait]
impl Summarizer for PassthroughSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        Ok(text.to_owned())
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryOutcome {
    pub text: String,
    /// Set when the original text was used because the summarizer failed.
    pub fallback_reason: Option<String>,
}

impl SummaryOutcome {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Makes exactly one summarization attempt bounded by `timeout`.
///
/// An error, an empty response or a timeout all yield `text` unchanged with
/// the reason recorded.
pub async fn summarize_or_fallback(
    summarizer: &dyn Summarizer,
    text: &str,
    timeout: Duration,
) -> SummaryOutcome {
    let reason = match tokio::time::timeout(timeout, summarizer.summarize(text)).await {
        Ok(Ok(summary)) if !summary.trim().is_empty() => {
            info!("Summary produced by {}", summarizer.name());
            return SummaryOutcome {
                text: summary,
                fallback_reason: None,
            };
        }
        Ok(Ok(_)) => "summarizer returned an empty response".to_owned(),
        Ok(Err(e)) => format!("{e:#}"),
        Err(_) => format!("summarizer timed out after {}s", timeout.as_secs_f32()),
    };

    warn!(
        "Summarization via {} failed, using raw profile: {reason}",
        summarizer.name()
    );
    SummaryOutcome {
        text: text.to_owned(),
        fallback_reason: Some(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Fixed(&'static str);

    #[async_trait]
    impl Summarizer for Fixed {
        async fn summarize(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_owned())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct Failing {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Summarizer for Failing {
        async fn summarize(&self, _text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("quota exceeded")
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Slow;

    #[async_trait]
    impl Summarizer for Slow {
        async fn summarize(&self, text: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(text.to_owned())
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    const LONG: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_success_replaces_text() {
        let outcome = summarize_or_fallback(&Fixed("polished"), "raw", LONG).await;
        assert_eq!(outcome.text, "polished");
        assert!(!outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_error_falls_back_after_one_attempt() {
        let failing = Failing::default();
        let outcome = summarize_or_fallback(&failing, "raw", LONG).await;
        assert_eq!(outcome.text, "raw");
        assert!(outcome.fallback_reason.as_deref().is_some_and(|r| r.contains("quota")));
        assert_eq!(failing.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_response_falls_back() {
        let outcome = summarize_or_fallback(&Fixed("   "), "raw", LONG).await;
        assert_eq!(outcome.text, "raw");
        assert!(outcome.is_fallback());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let outcome = summarize_or_fallback(&Slow, "raw", Duration::from_millis(50)).await;
        assert_eq!(outcome.text, "raw");
        assert!(outcome.fallback_reason.as_deref().is_some_and(|r| r.contains("timed out")));
    }

    #[tokio::test]
    async fn test_passthrough() -> Result<()> {
        assert_eq!(PassthroughSummarizer.summarize("same").await?, "same");
        Ok(())
    }
}
