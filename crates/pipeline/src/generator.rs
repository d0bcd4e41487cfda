//! Draft generation and the conditional review pass.

use std::sync::Arc;
use std::time::Duration;

use ledgerbrief_config::GenerationConfig;
use ledgerbrief_core::error::ProviderError;
use ledgerbrief_core::provider::{Provider, ProviderRequest};
use ledgerbrief_core::Enquiry;
use regex_lite::Regex;
use tracing::{debug, info};

use crate::prompt::{self, CONTEXT_HEADING};

/// Produces the final answer text for an enquiry via the configured
/// provider: one draft call, then a review call unless the draft is long
/// enough to use verbatim.
pub struct Generator {
    provider: Arc<dyn Provider>,
    config: GenerationConfig,
}

impl Generator {
    pub fn new(provider: Arc<dyn Provider>, config: GenerationConfig) -> Self {
        Self { provider, config }
    }

    /// Compose the prompt, draft an answer, review it when short enough,
    /// and scrub any echoed query section from the result.
    pub async fn respond(
        &self,
        enquiry: &Enquiry,
        context: &str,
    ) -> Result<String, ProviderError> {
        let prompt = prompt::compose(enquiry, context);
        debug!(model = %self.config.model, "Sending draft prompt");

        let request = ProviderRequest::single_turn(
            &self.config.model,
            prompt,
            self.config.temperature,
            self.config.max_tokens,
        );
        let response = self.provider.complete(request).await?;
        let draft = response.message.content.trim().to_string();
        debug!(chars = draft.chars().count(), "Draft received");

        let reviewed = self.review(&enquiry.discipline, draft).await?;
        Ok(strip_echoed_query(&reviewed))
    }

    /// Rewrite the draft under a domain review instruction.
    ///
    /// Drafts over the skip threshold are returned verbatim; this is a
    /// cost and latency guard, not a quality judgement. The review call
    /// runs under a hard timeout and a tighter token budget than the draft.
    async fn review(&self, discipline: &str, draft: String) -> Result<String, ProviderError> {
        if draft.chars().count() > self.config.review_skip_threshold {
            info!(
                chars = draft.chars().count(),
                "Skipping review, draft over threshold"
            );
            return Ok(draft);
        }

        let trimmed = strip_sign_off(&draft);
        // The model sometimes echoes the context block back; cut there.
        let trimmed = trimmed.split(CONTEXT_HEADING).next().unwrap_or("").trim();
        let input: String = trimmed.chars().take(self.config.review_input_limit).collect();

        let request = ProviderRequest::single_turn(
            &self.config.model,
            review_prompt(discipline, &input),
            self.config.temperature,
            self.config.review_max_tokens,
        );

        let budget = Duration::from_secs(self.config.review_timeout_secs);
        let response = tokio::time::timeout(budget, self.provider.complete(request))
            .await
            .map_err(|_| {
                ProviderError::Timeout(format!(
                    "review call exceeded {}s",
                    self.config.review_timeout_secs
                ))
            })??;

        Ok(response.message.content.trim().to_string())
    }
}

/// Cut the draft at the leftmost polite sign-off, if any.
fn strip_sign_off(draft: &str) -> String {
    let sign_off = Regex::new(r"(?i)(best regards,|yours sincerely,|kind regards,)")
        .expect("literal pattern");
    match sign_off.find(draft) {
        Some(m) => draft[..m.start()].trim().to_string(),
        None => draft.trim().to_string(),
    }
}

fn review_prompt(discipline: &str, draft: &str) -> String {
    if discipline == "Accounting" {
        format!(
            r#"You are acting as a UK Chartered Accountant.

Review and formally rewrite the following draft according to:
- UK GAAP
- UK Accounting Standards
- UK Companies Act 2006
- UK Corporate Governance Code
- Other relevant UK company law and governance standards
- UK Financial Practices Code
- IFRS
- Insolvency Act 1986
- Other relevant UK accounting regulations
Maintain strict professional tone, British English spelling, and correct accounting terminology.

--- START RESPONSE ---
{draft}
--- END RESPONSE ---
"#
        )
    } else {
        format!(
            "Please clean and improve the following structured response while maintaining professional tone and factual accuracy.\n\n--- START RESPONSE ---\n{draft}\n--- END RESPONSE ---\n"
        )
    }
}

/// Remove any "### ORIGINAL QUERY" section the model echoed back, leaving
/// the heading that follows it (or the end of text) intact.
pub fn strip_echoed_query(text: &str) -> String {
    let heading = Regex::new(r"(?i)### ORIGINAL QUERY\s*\n").expect("literal pattern");
    let mut out = text.to_string();
    while let Some(m) = heading.find(&out) {
        let end = out[m.end()..]
            .find("###")
            .map(|rel| m.end() + rel)
            .unwrap_or(out.len());
        out.replace_range(m.start()..end, "");
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingProvider, SequentialMockProvider};
    use ledgerbrief_core::provider::ProviderResponse;
    use std::sync::Mutex;

    fn accounting_enquiry() -> Enquiry {
        let mut e = Enquiry::new("When must small company accounts be filed?");
        e.discipline = "Accounting".to_string();
        e
    }

    fn config() -> GenerationConfig {
        GenerationConfig::default()
    }

    #[tokio::test]
    async fn short_draft_goes_through_review() {
        let provider = Arc::new(SequentialMockProvider::scripted(&[
            "Draft answer.",
            "Reviewed answer.",
        ]));
        let generator = Generator::new(provider.clone(), config());

        let out = generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap();

        assert_eq!(out, "Reviewed answer.");
        assert_eq!(provider.call_count(), 2);

        let requests = provider.requests();
        assert_eq!(requests[0].max_tokens, Some(1800));
        assert_eq!(requests[1].max_tokens, Some(700));
        assert!(requests[1].messages[0]
            .content
            .contains("UK Chartered Accountant"));
        assert!(requests[1].messages[0]
            .content
            .contains("--- START RESPONSE ---\nDraft answer.\n--- END RESPONSE ---"));
    }

    #[tokio::test]
    async fn long_draft_bypasses_review() {
        let long_draft = "x".repeat(1600);
        let provider = Arc::new(SequentialMockProvider::single_text(&long_draft));
        let generator = Generator::new(provider.clone(), config());

        let out = generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap();

        assert_eq!(out, long_draft);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn other_disciplines_get_the_generic_review_prompt() {
        let provider = Arc::new(SequentialMockProvider::scripted(&["Draft.", "Clean."]));
        let mut enquiry = accounting_enquiry();
        enquiry.discipline = "Not specified".to_string();
        let generator = Generator::new(provider.clone(), config());

        generator.respond(&enquiry, "ctx").await.unwrap();

        let review = &provider.requests()[1].messages[0].content;
        assert!(review.contains("Please clean and improve"));
        assert!(!review.contains("UK Chartered Accountant"));
    }

    #[tokio::test]
    async fn sign_off_is_stripped_before_review() {
        let provider = Arc::new(SequentialMockProvider::scripted(&[
            "The answer.\n\nKind Regards,\nThe Model",
            "Reviewed.",
        ]));
        let generator = Generator::new(provider.clone(), config());

        generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap();

        let review = &provider.requests()[1].messages[0].content;
        assert!(review.contains("The answer."));
        assert!(!review.contains("Kind Regards"));
        assert!(!review.contains("The Model"));
    }

    #[tokio::test]
    async fn echoed_context_is_cut_before_review() {
        let provider = Arc::new(SequentialMockProvider::scripted(&[
            "The answer.\n\n### Context from Knowledge Index:\nleaked chunk text",
            "Reviewed.",
        ]));
        let generator = Generator::new(provider.clone(), config());

        generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap();

        let review = &provider.requests()[1].messages[0].content;
        assert!(review.contains("The answer."));
        assert!(!review.contains("leaked chunk text"));
    }

    #[tokio::test]
    async fn review_input_truncation_counts_chars_not_bytes() {
        let provider = Arc::new(SequentialMockProvider::scripted(&["£1,200 due now", "ok"]));
        let mut cfg = config();
        cfg.review_input_limit = 6;
        let generator = Generator::new(provider.clone(), cfg);

        generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap();

        let review = &provider.requests()[1].messages[0].content;
        assert!(review.contains("--- START RESPONSE ---\n£1,200\n--- END RESPONSE ---"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let provider = Arc::new(FailingProvider::new(ProviderError::ApiError {
            status_code: 500,
            message: "boom".to_string(),
        }));
        let generator = Generator::new(provider, config());

        let err = generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_review_call_times_out() {
        struct DraftThenHang {
            calls: Mutex<usize>,
        }

        #[async_trait::async_trait]
        impl Provider for DraftThenHang {
            fn name(&self) -> &str {
                "draft_then_hang"
            }

            async fn complete(
                &self,
                _request: ProviderRequest,
            ) -> Result<ProviderResponse, ProviderError> {
                let first = {
                    let mut calls = self.calls.lock().unwrap();
                    *calls += 1;
                    *calls == 1
                };
                if first {
                    Ok(crate::test_support::make_text_response("Short draft."))
                } else {
                    std::future::pending().await
                }
            }
        }

        let provider = Arc::new(DraftThenHang {
            calls: Mutex::new(0),
        });
        let generator = Generator::new(provider, config());

        let err = generator
            .respond(&accounting_enquiry(), "ctx")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout(_)));
    }

    #[test]
    fn strip_echoed_query_removes_the_echoed_section() {
        let text = "Answer text.\n### ORIGINAL QUERY\nWhat was asked?\n### Action Sheet\n1. X";
        assert_eq!(
            strip_echoed_query(text),
            "Answer text.\n### Action Sheet\n1. X"
        );
    }

    #[test]
    fn strip_echoed_query_handles_trailing_section() {
        let text = "Answer text.\n### original query\nWhat was asked?\nMore echo.";
        assert_eq!(strip_echoed_query(text), "Answer text.");
    }

    #[test]
    fn strip_echoed_query_is_noop_without_marker() {
        assert_eq!(strip_echoed_query("Plain answer."), "Plain answer.");
    }

    #[test]
    fn strip_sign_off_cuts_at_leftmost_match() {
        let draft = "Body.\nYours sincerely,\nA\nBest regards,\nB";
        assert_eq!(strip_sign_off(draft), "Body.");
    }

    #[test]
    fn strip_sign_off_keeps_clean_drafts() {
        assert_eq!(strip_sign_off("  Body.  "), "Body.");
    }
}
