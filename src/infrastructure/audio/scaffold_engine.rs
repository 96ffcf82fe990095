use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// No-model engine for local development. Returns a deterministic description
/// of the received waveform so the full request path can be exercised without
/// any recognition backend.
pub struct ScaffoldEngine {
    response_delay_ms: u64,
}

impl ScaffoldEngine {
    pub fn new(response_delay_ms: u64) -> Self {
        Self { response_delay_ms }
    }
}

#[async_trait]
impl TranscriptionEngine for ScaffoldEngine {
    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, TranscriptionError> {
        if self.response_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
        }

        let duration_secs = samples.len() as f32 / sample_rate as f32;
        Ok(format!(
            "[scaffold] {} samples at {} Hz ({:.3}s)",
            samples.len(),
            sample_rate,
            duration_secs
        ))
    }
}
