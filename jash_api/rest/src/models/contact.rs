use jash_core_contact_contracts::ContactStatus;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiContactStatus {
    /// Whether the upstream answered the probe successfully
    pub ok: bool,
    /// Whether an upstream is configured at all
    pub configured: bool,
}

impl From<ContactStatus> for ApiContactStatus {
    fn from(value: ContactStatus) -> Self {
        Self {
            ok: value.is_ok(),
            configured: value.configured,
        }
    }
}
