//! PAC evaluation on the QuickJS engine via `rquickjs`.

use rquickjs::{Context, Ctx, Error, Function, Runtime};

use crate::engine::{EvaluationRequest, ScriptEvaluator};
use crate::error::EvaluationError;

const ENTRY_POINT: &str = "FindProxyForURL";

/// Evaluator backed by a single QuickJS context.
///
/// The script is evaluated once at construction and the context is reused
/// for every call. Built against rquickjs's `parallel` feature, whose
/// runtime locks internally on each context access, so sharing the
/// evaluator across threads is safe.
pub struct QuickJsEvaluator {
    context: Context,
}

impl QuickJsEvaluator {
    pub fn new(script: String) -> Result<Self, EvaluationError> {
        let runtime = Runtime::new().map_err(|e| EvaluationError::Engine(e.to_string()))?;
        let context =
            Context::full(&runtime).map_err(|e| EvaluationError::Engine(e.to_string()))?;

        context.with(|ctx| -> Result<(), EvaluationError> {
            ctx.eval::<(), _>(script.as_bytes().to_vec())
                .map_err(|e| engine_error(&ctx, e))?;
            ctx.globals()
                .get::<_, Function>(ENTRY_POINT)
                .map_err(|_| EvaluationError::MissingEntryPoint)?;
            Ok(())
        })?;

        Ok(QuickJsEvaluator { context })
    }
}

impl ScriptEvaluator for QuickJsEvaluator {
    fn name(&self) -> &'static str {
        "quickjs"
    }

    fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError> {
        self.context.with(|ctx| {
            let entry: Function = ctx
                .globals()
                .get(ENTRY_POINT)
                .map_err(|_| EvaluationError::MissingEntryPoint)?;
            entry
                .call((request.url.as_str(), request.host.as_str()))
                .map_err(|e| engine_error(&ctx, e))
        })
    }
}

fn engine_error(ctx: &Ctx<'_>, err: Error) -> EvaluationError {
    match err {
        Error::Exception => EvaluationError::Engine(format!("{:?}", ctx.catch())),
        other => EvaluationError::Engine(other.to_string()),
    }
}
