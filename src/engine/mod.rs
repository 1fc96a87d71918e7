//! Script engine backends and the construction-time engine choice.

pub mod boa;
#[cfg(feature = "quickjs")]
pub mod quickjs;

use url::Url;

use crate::error::EvaluationError;
use crate::log_info;
use crate::source::PacScriptSource;

/// The inputs handed to `FindProxyForURL`, derived once per resolution call.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub url: String,
    pub host: String,
}

impl EvaluationRequest {
    pub fn from_uri(uri: &str) -> Result<Self, EvaluationError> {
        let parsed = Url::parse(uri).map_err(|e| EvaluationError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        let host = parsed
            .host_str()
            .ok_or_else(|| EvaluationError::InvalidUri {
                uri: uri.to_string(),
                reason: "URI has no host".to_string(),
            })?
            .to_string();
        Ok(EvaluationRequest {
            url: uri.to_string(),
            host,
        })
    }
}

/// One call of the PAC decision function.
///
/// Implementations must be safe to share across threads: either the engine
/// state is rebuilt per call, or access to a shared engine is serialized
/// internally.
pub trait ScriptEvaluator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs `FindProxyForURL(url, host)` and returns its raw string result.
    fn evaluate(&self, request: &EvaluationRequest) -> Result<String, EvaluationError>;
}

/// Binds the script from `source` to an engine, chosen once per selector.
///
/// With the `quickjs` feature compiled in, the general-purpose QuickJS engine
/// is used; otherwise the dedicated pure-Rust Boa engine. Binding evaluates
/// the script and verifies it defines a callable `FindProxyForURL`, so a
/// broken script fails here rather than on every later call.
pub fn bind_evaluator(
    source: &dyn PacScriptSource,
) -> Result<Box<dyn ScriptEvaluator>, EvaluationError> {
    let script = source.script_text()?;

    #[cfg(feature = "quickjs")]
    {
        log_info!("Using QuickJS engine for PAC script {}", source.identity());
        Ok(Box::new(quickjs::QuickJsEvaluator::new(script)?))
    }
    #[cfg(not(feature = "quickjs"))]
    {
        log_info!("Using Boa engine for PAC script {}", source.identity());
        Ok(Box::new(boa::BoaEvaluator::new(script)?))
    }
}
