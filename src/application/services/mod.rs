mod dispatch;

pub use dispatch::{DispatcherHandle, TaskError, TranscriptionTask, TranscriptionWorker};
