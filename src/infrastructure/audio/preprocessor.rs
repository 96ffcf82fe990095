use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Rate the inference pipeline expects its input at.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Rate long inputs are assumed to have been captured at.
pub const ASSUMED_SOURCE_RATE: u32 = 8_000;

#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("empty sample sequence")]
    EmptyInput,
    #[error("resampling failed: {0}")]
    ResampleFailed(String),
}

/// Normalizes raw 16-bit PCM into a flat mono waveform and decides whether it
/// needs resampling before inference.
///
/// The resampling decision is a policy, not a rate probe: inputs longer than
/// one second at 8 kHz are treated as 8 kHz telephony audio and upsampled to
/// 16 kHz; anything at or under the threshold passes through untouched and is
/// interpreted at the pipeline's native 16 kHz. The comparison is strictly
/// greater-than, so exactly 8000 samples is never resampled.
///
/// Pure function of its input: same samples, same waveform, same decision.
pub fn prepare(raw: &[i16]) -> Result<(Vec<f32>, u32), PreprocessError> {
    if raw.is_empty() {
        return Err(PreprocessError::EmptyInput);
    }

    let waveform: Vec<f32> = raw.iter().map(|&s| f32::from(s) / 32768.0).collect();

    let duration_secs = waveform.len() as f64 / f64::from(ASSUMED_SOURCE_RATE);
    if duration_secs > 1.0 {
        let resampled = resample_to_target(&waveform)?;
        return Ok((resampled, TARGET_SAMPLE_RATE));
    }

    Ok((waveform, TARGET_SAMPLE_RATE))
}

/// Band-limited 8 kHz → 16 kHz upsampling.
fn resample_to_target(samples: &[f32]) -> Result<Vec<f32>, PreprocessError> {
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(TARGET_SAMPLE_RATE) / f64::from(ASSUMED_SOURCE_RATE);
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| PreprocessError::ResampleFailed(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let result = resampler
            .process(&[input], None)
            .map_err(|e| PreprocessError::ResampleFailed(format!("resample: {}", e)))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // Trim the zero padding back off the tail.
    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}
