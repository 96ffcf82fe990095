use crate::application::services::DispatcherHandle;
use crate::presentation::auth::AuthGate;

/// Shared per-request state: the submission side of the dispatcher queue and
/// the authentication gate. Both are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: DispatcherHandle,
    pub auth: AuthGate,
}
