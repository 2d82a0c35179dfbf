use serde::{Deserialize, Serialize};

/// Identity record returned by the auth service alongside the token pair.
/// All fields beyond the id are optional: the auth service omits nulls from
/// its JSON, and older gateway versions return a reduced shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Principal {
    /// Label used in log lines; never the token, never the full record.
    pub fn display_label(&self) -> &str {
        self.email
            .as_deref()
            .or(self.full_name.as_deref())
            .unwrap_or("<unnamed>")
    }
}
