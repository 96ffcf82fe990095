use std::io::Cursor;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Transcription over an OpenAI-compatible `/audio/transcriptions` endpoint.
/// The waveform is packaged as an in-memory 16-bit WAV before upload.
pub struct RemoteWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl RemoteWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            model,
        }
    }

    fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, TranscriptionError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| TranscriptionError::EncodingFailed(format!("wav header: {}", e)))?;

        for &sample in samples {
            let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            writer
                .write_sample(quantized)
                .map_err(|e| TranscriptionError::EncodingFailed(format!("wav sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| TranscriptionError::EncodingFailed(format!("wav finalize: {}", e)))?;

        Ok(cursor.into_inner())
    }
}

#[async_trait]
impl TranscriptionEngine for RemoteWhisperEngine {
    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let wav_data = Self::encode_wav(samples, sample_rate)?;

        let file_part = multipart::Part::bytes(wav_data)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model = %self.model, sample_rate, "Sending audio to whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(TranscriptionError::ApiRequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let transcript = response
            .text()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)))?;

        tracing::info!(chars = transcript.len(), "Remote transcription completed");

        Ok(transcript.trim().to_string())
    }
}
