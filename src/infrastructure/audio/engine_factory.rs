use std::sync::Arc;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{TranscriptionProvider, TranscriptionSettings};

use super::remote_whisper_engine::RemoteWhisperEngine;
use super::scaffold_engine::ScaffoldEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match settings.provider {
            TranscriptionProvider::Remote => {
                let key = settings.api_key.clone().ok_or_else(|| {
                    TranscriptionError::ConstructionFailed(
                        "api key required for the remote whisper provider".to_string(),
                    )
                })?;
                let engine =
                    RemoteWhisperEngine::new(key, settings.base_url.clone(), settings.model.clone());
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::Scaffold => {
                Ok(Arc::new(ScaffoldEngine::new(settings.scaffold_delay_ms)))
            }
        }
    }
}
