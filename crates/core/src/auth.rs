use serde::{Deserialize, Serialize};

/// Identity cached next to the bearer token of the current session.
///
/// Serializes with the wire field names used by the login response and by
/// durable storage (`email`, `is_admin`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    email: String,
    #[serde(default)]
    is_admin: bool,
}

impl UserIdentity {
    /// Creates an identity from the signed-in email and admin flag.
    #[must_use]
    pub fn new(email: impl Into<String>, is_admin: bool) -> Self {
        Self {
            email: email.into(),
            is_admin,
        }
    }

    /// Returns the email of the signed-in user.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns whether the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

#[cfg(test)]
mod tests {
    use super::UserIdentity;

    #[test]
    fn missing_admin_flag_defaults_to_false() {
        let identity = serde_json::from_str::<UserIdentity>(r#"{"email":"a@b.com"}"#);
        assert!(identity.is_ok());

        let identity = identity.unwrap_or_else(|_| UserIdentity::new("", true));
        assert_eq!(identity.email(), "a@b.com");
        assert!(!identity.is_admin());
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let value = serde_json::to_value(UserIdentity::new("ops@example.com", true));
        assert!(value.is_ok());
        assert_eq!(
            value.unwrap_or_default(),
            serde_json::json!({ "email": "ops@example.com", "is_admin": true })
        );
    }
}
