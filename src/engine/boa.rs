//! PAC evaluation on the pure-Rust Boa JavaScript engine.

use boa_engine::{js_string, Context, JsError, JsValue, Source};

use crate::engine::{EvaluationRequest, ScriptEvaluator};
use crate::error::EvaluationError;

const ENTRY_POINT: &str = "FindProxyForURL";

/// Evaluator backed by `boa_engine`.
///
/// Boa contexts are neither `Send` nor `Sync`, so the evaluator keeps only
/// the script text and builds a fresh context for every call. That makes
/// `evaluate` freely reentrant at the cost of re-parsing the script.
pub struct BoaEvaluator {
    script: String,
}

impl BoaEvaluator {
    pub fn new(script: String) -> Result<Self, EvaluationError> {
        let evaluator = BoaEvaluator { script };
        // Run the script once now so syntax errors and a missing entry point
        // surface at bind time.
        evaluator.prepared_context()?;
        Ok(evaluator)
    }

    /// Fresh context with the script evaluated and the entry point verified.
    fn prepared_context(&self) -> Result<Context, EvaluationError> {
        let mut context = Context::default();
        context
            .eval(Source::from_bytes(self.script.as_bytes()))
            .map_err(engine_error)?;

        let global = context.global_object();
        let entry = global
            .get(js_string!(ENTRY_POINT), &mut context)
            .map_err(engine_error)?;
        if entry.as_callable().is_none() {
            return Err(EvaluationError::MissingEntryPoint);
        }
        Ok(context)
    }
}

impl ScriptEvaluator for BoaEvaluator {
    fn name(&self) -> &'static str {
        "boa"
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
        let mut context = self.prepared_context()?;

        let global = context.global_object();
        let entry = global
            .get(js_string!(ENTRY_POINT), &mut context)
            .map_err(engine_error)?;
        let function = entry
            .as_callable()
            .ok_or(EvaluationError::MissingEntryPoint)?;

        let args = [
            JsValue::from(js_string!(request.url.as_str())),
            JsValue::from(js_string!(request.host.as_str())),
        ];
        let result = function
            .call(&JsValue::undefined(), &args, &mut context)
            .map_err(engine_error)?;

        if !result.is_string() {
            return Err(EvaluationError::Engine(format!(
                "{} returned a non-string value",
                ENTRY_POINT
            )));
        }
        let js_str = result.to_string(&mut context).map_err(engine_error)?;
        Ok(js_str.to_std_string().unwrap_or_default())
    }
}

fn engine_error(err: JsError) -> EvaluationError {
    EvaluationError::Engine(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EvaluationRequest {
        EvaluationRequest {
            url: "http://www.example.com/".to_string(),
            host: "www.example.com".to_string(),
        }
    }

    #[test]
    fn evaluates_find_proxy_for_url() {
        let script = r#"
            function FindProxyForURL(url, host) {
                return "PROXY " + host + ":3128";
            }
        "#;
        let evaluator = BoaEvaluator::new(script.to_string()).unwrap();
        assert_eq!(
            evaluator.evaluate(&request()).unwrap(),
            "PROXY www.example.com:3128"
        );
    }

    #[test]
    fn syntax_error_fails_at_bind_time() {
        assert!(BoaEvaluator::new("function FindProxyForURL(".to_string()).is_err());
    }

    #[test]
    fn missing_entry_point_fails_at_bind_time() {
        let result = BoaEvaluator::new("var x = 1;".to_string());
        assert!(matches!(result, Err(EvaluationError::MissingEntryPoint)));
    }

    #[test]
    fn thrown_script_error_is_an_engine_error() {
        let script = r#"function FindProxyForURL(url, host) { throw "boom"; }"#;
        let evaluator = BoaEvaluator::new(script.to_string()).unwrap();
        assert!(matches!(
            evaluator.evaluate(&request()),
            Err(EvaluationError::Engine(_))
        ));
    }

    #[test]
    fn non_string_result_is_an_engine_error() {
        let script = r#"function FindProxyForURL(url, host) { return 42; }"#;
        let evaluator = BoaEvaluator::new(script.to_string()).unwrap();
        assert!(matches!(
            evaluator.evaluate(&request()),
            Err(EvaluationError::Engine(_))
        ));
    }
}
