use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::infrastructure::audio::preprocessor::{self, PreprocessError};

/// One in-flight transcription request. The reply sender is owned exclusively
/// by this task and is consumed exactly once by the worker.
pub struct TranscriptionTask {
    pub samples: Vec<i16>,
    pub reply: oneshot::Sender<Result<String, TaskError>>,
}

/// Failure produced while servicing a task. Delivered in-band through the
/// reply channel; never escapes the worker loop.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("preprocessing: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("transcription: {0}")]
    Engine(#[from] TranscriptionError),
}

/// Cloneable submission side of the dispatcher queue.
///
/// The channel is unbounded: `submit` never blocks and never rejects, so
/// arrival bursts translate into queueing latency rather than errors.
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::UnboundedSender<TranscriptionTask>,
}

impl DispatcherHandle {
    pub fn submit(&self, task: TranscriptionTask) {
        // The receiver lives for the process lifetime; if it is gone the
        // process is shutting down and the caller's reply channel closing
        // surfaces the failure.
        if self.sender.send(task).is_err() {
            tracing::error!("Transcription worker is gone; task dropped");
        }
    }
}

/// Single-consumer worker that serializes every inference call.
///
/// Exactly one worker runs per process, giving the engine structurally
/// single-threaded access: no two transcriptions ever execute concurrently,
/// and tasks are serviced in strict submission order.
pub struct TranscriptionWorker {
    receiver: mpsc::UnboundedReceiver<TranscriptionTask>,
    engine: Arc<dyn TranscriptionEngine>,
}

impl TranscriptionWorker {
    pub fn new(engine: Arc<dyn TranscriptionEngine>) -> (Self, DispatcherHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { receiver, engine }, DispatcherHandle { sender })
    }

    pub async fn run(mut self) {
        tracing::info!("Transcription worker started");
        while let Some(task) = self.receiver.recv().await {
            let span = tracing::info_span!("transcription_task", samples = task.samples.len());
            let _guard = span.enter();

            let result = self.process(&task.samples).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "Transcription task failed");
            }

            // A caller that disconnected mid-wait drops its receiver; the
            // computed result is discarded, which is the documented baseline
            // behavior (no cancellation).
            if task.reply.send(result).is_err() {
                tracing::debug!("Caller went away before result delivery");
            }
        }
        tracing::info!("Transcription worker stopped: channel closed");
    }

    async fn process(&self, samples: &[i16]) -> Result<String, TaskError> {
        let (waveform, sample_rate) = preprocessor::prepare(samples)?;

        tracing::debug!(
            waveform_len = waveform.len(),
            sample_rate = sample_rate,
            "Waveform prepared"
        );

        let text = self.engine.transcribe(&waveform, sample_rate).await?;

        tracing::info!(chars = text.len(), "Transcription completed");
        Ok(text)
    }
}
