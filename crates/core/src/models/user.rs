//! Authenticated user profiles from the login endpoint.

use serde::{Deserialize, Serialize};

use crate::types::UserId;

/// The user profile returned on login and persisted alongside the token.
///
/// Only `isAdmin` matters to the panel's access checks; the rest is carried
/// through for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl AdminUser {
    /// Name to show in the navigation header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

/// Raw (unenveloped) response body of the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AdminUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_deserializes() {
        let json = serde_json::json!({
            "token": "eyJhbGciOiJIUzI1NiJ9.payload.sig",
            "user": {"_id": "u1", "name": "Store Admin", "email": "admin@loomworks.shop", "isAdmin": true}
        });

        let response: LoginResponse = serde_json::from_value(json).expect("deserialize");
        assert!(response.user.is_admin);
        assert_eq!(response.user.display_name(), "Store Admin");
    }

    #[test]
    fn test_missing_admin_flag_defaults_to_false() {
        let json = serde_json::json!({"email": "shopper@example.com"});
        let user: AdminUser = serde_json::from_value(json).expect("deserialize");
        assert!(!user.is_admin);
        assert_eq!(user.display_name(), "shopper@example.com");
    }
}
