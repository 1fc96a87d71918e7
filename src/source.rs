//! Where PAC script text comes from: a string, a file, or a download.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::EvaluationError;
use crate::{log_error, log_info};

/// Supplier of PAC script text.
///
/// `identity` is a stable description of where the script came from (its URL,
/// file path, ...). The selector compares it against requested hosts to avoid
/// re-entering proxy resolution while the PAC script itself is being fetched.
/// Caching the text, if desired, is the source's job; the selector never
/// stores it.
pub trait PacScriptSource: Send + Sync {
    fn script_text(&self) -> Result<String, EvaluationError>;
    fn identity(&self) -> String;
}

/// In-memory PAC script, for embedders that already hold the text.
pub struct StringScriptSource {
    script: String,
    identity: String,
}

impl StringScriptSource {
    pub fn new(script: impl Into<String>, identity: impl Into<String>) -> Self {
        StringScriptSource {
            script: script.into(),
            identity: identity.into(),
        }
    }
}

impl PacScriptSource for StringScriptSource {
    fn script_text(&self) -> Result<String, EvaluationError> {
        Ok(self.script.clone())
    }

    fn identity(&self) -> String {
        self.identity.clone()
    }
}

/// PAC script downloaded over HTTP, cached after the first fetch.
pub struct UrlScriptSource {
    url: String,
    cache: Mutex<Option<String>>,
}

impl UrlScriptSource {
    pub fn new(url: impl Into<String>) -> Self {
        UrlScriptSource {
            url: url.into(),
            cache: Mutex::new(None),
        }
    }

    fn download(&self) -> Result<String, EvaluationError> {
        log_info!("Downloading PAC script from: {}", self.url);

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| EvaluationError::Source(e.to_string()))?;

        let response = client
            .get(&self.url)
            .send()
            .map_err(|e| EvaluationError::Source(e.to_string()))?;

        if !response.status().is_success() {
            log_error!("PAC download failed: HTTP {}", response.status());
            return Err(EvaluationError::Source(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let text = response
            .text()
            .map_err(|e| EvaluationError::Source(e.to_string()))?;
        log_info!("PAC script downloaded successfully ({} bytes)", text.len());
        Ok(text)
    }
}

impl PacScriptSource for UrlScriptSource {
    fn script_text(&self) -> Result<String, EvaluationError> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(script) = cache.as_ref() {
            return Ok(script.clone());
        }
        let script = self.download()?;
        *cache = Some(script.clone());
        Ok(script)
    }

    fn identity(&self) -> String {
        self.url.clone()
    }
}

/// PAC script read from the local filesystem.
pub struct FileScriptSource {
    path: PathBuf,
}

impl FileScriptSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileScriptSource { path: path.into() }
    }
}

impl PacScriptSource for FileScriptSource {
    fn script_text(&self) -> Result<String, EvaluationError> {
        fs::read_to_string(&self.path).map_err(|e| {
            EvaluationError::Source(format!("cannot read {}: {}", self.path.display(), e))
        })
    }

    fn identity(&self) -> String {
        self.path.display().to_string()
    }
}
