//! The generate → parse → check → correct loop shared by the Scripter (C5,
//! ±2% per-chapter tolerance) and the Editor (C7, ±5% final tolerance)
//! (spec §4.1 "shared retry/deviation-feedback utility", §4.5, §4.7).

use podforge_core::traits::{Message, ModelBackend};
use podforge_core::{Error, Result};
use podforge_llm::retry_with_backoff;

pub struct ConvergenceOutcome<T> {
    pub value: T,
    pub revisions: u32,
}

/// Runs at most `max_revisions + 1` generate attempts. Each attempt calls
/// `backend.generate` (itself retried against transient backend failures by
/// `retry_with_backoff`), parses the raw text via `parse`, and stops as soon
/// as `converged` is satisfied or the revision budget is spent — a chapter
/// or final script that never converges is accepted as-is rather than
/// failing the job (spec §4.5, §4.7: "accepted as-is, over or under
/// budget").
pub async fn run_convergence_loop<B, T>(
    backend: &B,
    stage: &'static str,
    max_revisions: u32,
    mut messages: Vec<Message>,
    mut parse: impl FnMut(String, u32) -> Result<T>,
    converged: impl Fn(&T) -> bool,
    correction: impl Fn(&T) -> String,
) -> Result<ConvergenceOutcome<T>>
where
    B: ModelBackend,
{
    let mut revisions = 0;
    loop {
        let raw = retry_with_backoff(stage, || backend.generate(&messages))
            .await
            .map_err(|e| Error::agent(stage, e.to_string()))?;
        let value = parse(raw.clone(), revisions)?;

        if converged(&value) || revisions >= max_revisions {
            if revisions >= max_revisions && !converged(&value) {
                tracing::warn!(stage, revisions, "exhausted revision budget still out of tolerance, accepting as-is");
            }
            return Ok(ConvergenceOutcome { value, revisions });
        }

        revisions += 1;
        messages.push(Message::assistant(raw));
        messages.push(Message::user(correction(&value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct ScriptedBackend {
        replies: Vec<&'static str>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ModelBackend for ScriptedBackend {
        async fn generate(&self, _messages: &[Message]) -> Result<String> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
            Ok(self.replies[idx.min(self.replies.len() - 1)].to_string())
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn stops_as_soon_as_converged() {
        let backend = ScriptedBackend {
            replies: vec!["short", "this one is long enough to pass"],
            calls: AtomicU32::new(0),
        };
        let outcome = run_convergence_loop(
            &backend,
            "test",
            3,
            vec![Message::user("go")],
            |raw, _| Ok(raw),
            |value: &String| value.split_whitespace().count() >= 5,
            |_| "try again, longer".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.revisions, 1);
        assert_eq!(outcome.value, "this one is long enough to pass");
    }

    #[tokio::test]
    async fn accepts_as_is_after_exhausting_revisions() {
        let backend = ScriptedBackend {
            replies: vec!["always short"],
            calls: AtomicU32::new(0),
        };
        let outcome = run_convergence_loop(
            &backend,
            "test",
            2,
            vec![Message::user("go")],
            |raw, _| Ok(raw),
            |_: &String| false,
            |_| "try again".to_string(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.revisions, 2);
    }
}
