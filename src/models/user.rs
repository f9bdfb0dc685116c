use serde::{Deserialize, Serialize};

/// Identity record returned by the account endpoints.
///
/// The server owns this shape; everything beyond the id is optional so
/// that additions on the backend don't break deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Response envelope for `/register` and `/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Response envelope for `/get-user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub user: Option<User>,
}

/// Bare acknowledgement envelope (`/logout`, `/delete-product/{id}`).
#[derive(Debug, Clone, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Registration form collected by the signup view.
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_with_mongo_id() {
        let json = r#"{"_id":"64af","name":"Ada","email":"ada@example.com","role":"admin","__v":0}"#;
        let user: User = serde_json::from_str(json).expect("user should parse");
        assert_eq!(user.id, "64af");
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_parse_auth_payload_failure() {
        let json = r#"{"success":false,"msg":"Email already registered"}"#;
        let payload: AuthPayload = serde_json::from_str(json).expect("payload should parse");
        assert!(!payload.success);
        assert!(payload.user.is_none());
        assert_eq!(payload.msg.as_deref(), Some("Email already registered"));
    }
}
