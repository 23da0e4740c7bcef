//! Request records, ids, placeholders and completion signals.

use chrono::{DateTime, Utc};
use rand::Rng;

const PLACEHOLDER_PREFIX: &str = "Loading... (";
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Lifecycle of a completion request. Leaves `Pending` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Pending,
    Completed,
    Error,
}

/// One entry of the service's request table.
#[derive(Debug, Clone, PartialEq)]
pub struct GptRequest {
    pub id: String,
    pub prompt: String,
    pub status: RequestStatus,
    /// Reply text once completed, `#API_ERROR!` once failed.
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl GptRequest {
    pub(crate) fn pending(id: String, prompt: &str) -> Self {
        Self {
            id,
            prompt: prompt.to_string(),
            status: RequestStatus::Pending,
            result: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub(crate) fn finish(&mut self, status: RequestStatus, result: String) {
        debug_assert_eq!(self.status, RequestStatus::Pending);
        self.status = status;
        self.result = Some(result);
        self.finished_at = Some(Utc::now());
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Delivered once per request when it completes or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSignal {
    pub request_id: String,
    pub result: String,
    pub prompt: String,
}

impl CompletionSignal {
    /// Whether a host cell showing `value` for `formula` is waiting on this
    /// completion: the formula calls `GPT(` and either the displayed value
    /// carries the request id or the formula quotes the prompt.
    pub fn matches_cell(&self, formula: &str, value: &str) -> bool {
        if value.is_empty() || !formula.to_ascii_uppercase().contains("GPT(") {
            return false;
        }

        value.contains(&self.request_id)
            || formula.contains(&format!("\"{}\"", self.prompt))
            || formula.contains(&format!("'{}'", self.prompt))
    }
}

/// Fresh id of the form `gpt_<unix millis>_<9 base-36 chars>`.
pub(crate) fn generate_request_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("gpt_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Text shown in a cell while its request is in flight.
pub fn placeholder(request_id: &str) -> String {
    format!("{PLACEHOLDER_PREFIX}{request_id})")
}

/// Find the request id embedded in a placeholder, anywhere in `text`.
pub fn placeholder_request_id(text: &str) -> Option<&str> {
    let start = text.find(PLACEHOLDER_PREFIX)? + PLACEHOLDER_PREFIX.len();
    let len = text[start..].find(')')?;
    let id = &text[start..start + len];
    (!id.is_empty()).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signal() -> CompletionSignal {
        CompletionSignal {
            request_id: "gpt_1700000000000_abc123xyz".into(),
            result: "Paris".into(),
            prompt: "Capital of France?".into(),
        }
    }

    #[test]
    fn test_request_id_shape() {
        let id = generate_request_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "gpt");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| ID_ALPHABET.contains(&b)));
        assert_ne!(generate_request_id(), generate_request_id());
    }

    #[test]
    fn test_placeholder_round_trip() {
        let text = placeholder("gpt_1_abc");
        assert_eq!(text, "Loading... (gpt_1_abc)");
        assert_eq!(placeholder_request_id(&text), Some("gpt_1_abc"));
        assert_eq!(
            placeholder_request_id("Answer: Loading... (gpt_2_def)!"),
            Some("gpt_2_def")
        );
        assert_eq!(placeholder_request_id("Loading..."), None);
        assert_eq!(placeholder_request_id("Loading... ()"), None);
    }

    #[test]
    fn test_matches_cell_by_request_id() {
        let s = signal();
        assert!(s.matches_cell("=GPT(A1)", "Loading... (gpt_1700000000000_abc123xyz)"));
        assert!(!s.matches_cell("=GPT(A1)", "Loading... (gpt_other)"));
    }

    #[test]
    fn test_matches_cell_by_quoted_prompt() {
        let s = signal();
        assert!(s.matches_cell("=gpt(\"Capital of France?\")", "stale"));
        assert!(s.matches_cell("=GPT('Capital of France?')", "stale"));
        assert!(!s.matches_cell("=GPT(\"Capital of Spain?\")", "stale"));
    }

    #[test]
    fn test_matches_cell_requires_gpt_formula_and_value() {
        let s = signal();
        assert!(!s.matches_cell("=SUM(\"Capital of France?\")", "x"));
        assert!(!s.matches_cell("=GPT(\"Capital of France?\")", ""));
    }

    #[test]
    fn test_finish_transitions_once() {
        let mut request = GptRequest::pending("gpt_1_a".into(), "hi");
        assert!(request.is_pending());
        request.finish(RequestStatus::Completed, "hello".into());
        assert_eq!(request.status, RequestStatus::Completed);
        assert_eq!(request.result.as_deref(), Some("hello"));
        assert!(request.finished_at.is_some());
    }
}
