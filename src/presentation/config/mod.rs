mod settings;

pub use settings::{
    AuthSettings, LoggingSettings, ServerSettings, Settings, SettingsError,
    TranscriptionProvider, TranscriptionSettings,
};
