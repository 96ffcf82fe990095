/// Validates inbound bearer tokens against the configured shared secret.
#[derive(Clone)]
pub struct AuthGate {
    api_key: String,
}

impl AuthGate {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }

    /// True iff the header carries a scheme-prefixed token whose second
    /// whitespace-delimited segment equals the shared secret exactly.
    /// Missing header, missing token segment, and mismatch are all plain
    /// `false`; this gate never produces an error.
    pub fn validate(&self, header_value: Option<&str>) -> bool {
        header_value
            .and_then(|value| value.split_whitespace().nth(1))
            .is_some_and(|token| token == self.api_key)
    }
}
