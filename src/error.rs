use thiserror::Error;

/// Failures while loading, binding, or evaluating a PAC script.
///
/// None of these ever reach a caller of [`PacProxySelector::select`]: the
/// selector logs them and falls back to a DIRECT connection.
///
/// [`PacProxySelector::select`]: crate::selector::PacProxySelector::select
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("PAC script source unavailable: {0}")]
    Source(String),

    #[error("PAC engine error: {0}")]
    Engine(String),

    #[error("PAC script does not define a callable FindProxyForURL function")]
    MissingEntryPoint,

    #[error("invalid target URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid proxy port '{0}' in PAC result")]
    InvalidPort(String),
}
