//! Body of `GET /me`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeStatus {
    Success,
    Error,
}

/// API key check result: the organization name on success, a reason otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub status: MeStatus,
    #[serde(rename = "orgName", default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MeResponse {
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: MeStatus::Error,
            org_name: None,
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == MeStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        let me: MeResponse =
            serde_json::from_value(json!({"status": "success", "orgName": "Acme"})).unwrap();
        assert!(me.is_success());
        assert_eq!(me.org_name.as_deref(), Some("Acme"));

        assert_eq!(
            serde_json::to_value(MeResponse::error("Invalid API key")).unwrap(),
            json!({"status": "error", "error": "Invalid API key"})
        );
    }
}
