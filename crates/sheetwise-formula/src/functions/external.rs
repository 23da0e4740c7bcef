//! Functions backed by external services

use super::FunctionArg;
use crate::error::FormulaResult;
use crate::evaluator::{EvaluationContext, FormulaValue};
use sheetwise_core::CellError;

/// GPT function
///
/// Hands the prompt to the attached completion service and returns its
/// `Loading... (<id>)` placeholder at once. A blank prompt, or no attached
/// service, is `#ERROR!`.
pub fn fn_gpt(args: &[FunctionArg], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let prompt = match args.first() {
        Some(FunctionArg::Cell(cell)) => ctx.get_cell_value(*cell),
        Some(FunctionArg::Value(FormulaValue::Error(e))) => return Ok(FormulaValue::Error(*e)),
        Some(FunctionArg::Value(value)) => value.as_string(),
        Some(FunctionArg::Range(_)) | None => return Ok(FormulaValue::Error(CellError::Error)),
    };

    let prompt = strip_quotes(&prompt);
    if prompt.trim().is_empty() {
        return Ok(FormulaValue::Error(CellError::Error));
    }

    let Some(gpt) = ctx.gpt() else {
        tracing::debug!("GPT() called without a completion service");
        return Ok(FormulaValue::Error(CellError::Error));
    };

    let handle = gpt.request(prompt);
    let placeholder = handle.placeholder();
    ctx.track_request(handle);

    Ok(FormulaValue::String(placeholder))
}

/// Drop one pair of surrounding double quotes, as cell text often carries them
fn strip_quotes(prompt: &str) -> &str {
    if prompt.starts_with('"') && prompt.ends_with('"') {
        prompt.get(1..prompt.len() - 1).unwrap_or("")
    } else {
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::strip_quotes;
    use crate::{evaluate_formula, Engine};
    use pretty_assertions::assert_eq;
    use sheetwise_gpt::{placeholder_request_id, ChatClient, ChatFuture, GptError, GptService};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    /// Answers every prompt with its upper-cased text, or fails
    #[derive(Clone, Default)]
    struct ShoutClient {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ChatClient for ShoutClient {
        fn complete(&self, prompt: String) -> ChatFuture {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            Box::pin(async move {
                if fail {
                    Err(GptError::Config("offline".into()))
                } else {
                    Ok(prompt.to_uppercase())
                }
            })
        }
    }

    fn sheet(cells: &[(&str, &str)]) -> HashMap<String, String> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"hi\""), "hi");
        assert_eq!(strip_quotes("\""), "");
        assert_eq!(strip_quotes("\"hi"), "\"hi");
        assert_eq!(strip_quotes("hi"), "hi");
    }

    #[test]
    fn test_gpt_without_service_is_error() {
        let cells = HashMap::new();
        assert_eq!(evaluate_formula("=GPT(\"hello\")", &cells), "#ERROR!");
    }

    #[tokio::test]
    async fn test_gpt_returns_placeholder_and_resolves() {
        let client = ShoutClient::default();
        let engine = Engine::with_gpt(GptService::new(client.clone(), Handle::current()));
        let cells = HashMap::new();

        let evaluation = engine.evaluate("=GPT(\"make it loud\")", &cells);
        assert_eq!(evaluation.requests.len(), 1);
        let handle = evaluation.requests[0].clone();
        assert_eq!(evaluation.display, handle.placeholder());
        assert_eq!(
            placeholder_request_id(&evaluation.display),
            Some(handle.request_id())
        );

        let signal = handle.wait().await.unwrap();
        assert_eq!(signal.result, "MAKE IT LOUD");
        assert_eq!(signal.prompt, "make it loud");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gpt_prompt_from_cell_keeps_case() {
        let engine = Engine::with_gpt(GptService::new(ShoutClient::default(), Handle::current()));
        let cells = sheet(&[("A1", "\"Quoted Question\"")]);

        let evaluation = engine.evaluate("=gpt(a1)", &cells);
        let signal = evaluation.requests[0].clone().wait().await.unwrap();
        assert_eq!(signal.prompt, "Quoted Question");
    }

    #[tokio::test]
    async fn test_gpt_blank_prompt_is_error_without_call() {
        let client = ShoutClient::default();
        let engine = Engine::with_gpt(GptService::new(client.clone(), Handle::current()));
        let cells = sheet(&[("A1", "   ")]);

        for formula in ["=GPT(A1)", "=GPT(\"\")", "=GPT(\"  \")", "=GPT(A1:A2)"] {
            let evaluation = engine.evaluate(formula, &cells);
            assert_eq!(evaluation.display, "#ERROR!", "{formula}");
            assert!(evaluation.requests.is_empty());
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gpt_same_prompt_twice_in_one_formula() {
        let client = ShoutClient::default();
        let engine = Engine::with_gpt(GptService::new(client.clone(), Handle::current()));
        let cells = HashMap::new();

        let evaluation =
            engine.evaluate("=CONCATENATE(GPT(\"x\"),\"|\",GPT(\"x\"))", &cells);
        assert_eq!(evaluation.requests.len(), 1);
        let placeholder = evaluation.requests[0].placeholder();
        assert_eq!(evaluation.display, format!("{placeholder}|{placeholder}"));

        evaluation.requests[0].clone().wait().await.unwrap();
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gpt_failure_resolves_to_api_error() {
        let client = ShoutClient {
            fail: true,
            ..Default::default()
        };
        let engine = Engine::with_gpt(GptService::new(client, Handle::current()));
        let cells = HashMap::new();

        let evaluation = engine.evaluate("=GPT(\"anything\")", &cells);
        assert!(evaluation.display.starts_with("Loading... ("));

        let signal = evaluation.requests[0].clone().wait().await.unwrap();
        assert_eq!(signal.result, "#API_ERROR!");
    }
}
