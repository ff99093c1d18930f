//! Response types returned by the Elastic Email v2 API.
use serde::{Deserialize, Serialize};

use crate::Error;

/// JSON API response from Elastic Email.
///
/// Indicates if the send was accepted. On success, `data` identifies the
/// queued message; on failure, `error` carries the provider's reason.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<SendResult>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SendResult {
    pub transactionid: Option<String>,
    pub messageid: Option<String>,
}

impl ApiResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(body).map_err(|e| e.into())
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.transactionid.as_deref())
    }
}
