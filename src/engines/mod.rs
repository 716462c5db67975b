//! Recognition engine implementations
//!
//! Engines are conditionally compiled behind feature flags; `create` builds
//! the one selected at compile time.

#[cfg(feature = "engine-ocrs")]
pub mod ocrs;

use std::sync::Arc;

use crate::config::Config;
use crate::engine::RecognitionEngine;
use crate::error::OcrError;

/// Build the recognition engine for this binary.
pub fn create(config: &Config) -> Result<Arc<dyn RecognitionEngine>, OcrError> {
    let mut engine: Option<Arc<dyn RecognitionEngine>> = None;

    #[cfg(feature = "engine-ocrs")]
    {
        engine = Some(Arc::new(ocrs::OcrsEngine::new(config)?));
    }

    let _ = config;
    engine.ok_or_else(|| {
        OcrError::InitFailed(
            "no recognition engine compiled in; build with --features engine-ocrs".to_string(),
        )
    })
}
