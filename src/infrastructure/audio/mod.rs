mod engine_factory;
pub mod preprocessor;
mod remote_whisper_engine;
mod scaffold_engine;

pub use engine_factory::TranscriptionEngineFactory;
pub use remote_whisper_engine::RemoteWhisperEngine;
pub use scaffold_engine::ScaffoldEngine;
