use async_trait::async_trait;

/// Boundary to the speech recognition capability. Implementations receive a
/// flat mono waveform in [-1.0, 1.0] and the rate it should be interpreted
/// at; how the transcript is produced lives entirely behind this trait.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio encoding failed: {0}")]
    EncodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("engine construction failed: {0}")]
    ConstructionFailed(String),
}
