//! Per-route validation rules.
//!
//! Both validators are pure: the same credentials against the same store
//! always yield the same list.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::store::RecordStore;
use crate::validation::Credentials;

/// A single rejected field, serialized as `{"<field>": "<message>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub const DUPLICATE_EMAIL: FieldError = FieldError {
        field: "email",
        message: "email must be unique",
    };

    pub const PASSWORD_MISMATCH: FieldError = FieldError {
        field: "password",
        message: "passwords do not match",
    };

    pub const UNKNOWN_EMAIL: FieldError = FieldError {
        field: "email",
        message: "Email not found",
    };

    pub const STORE_UNAVAILABLE: FieldError = FieldError {
        field: "file",
        message: "Server Error",
    };
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field, self.message)?;
        map.end()
    }
}

/// Registration checks. Both always run, email first.
///
/// Passwords are compared as sent, so `123` and `"123"` differ.
pub fn validate_registration(credentials: &Credentials, store: &RecordStore) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if credentials
        .email()
        .is_some_and(|email| store.contains_email(email))
    {
        errors.push(FieldError::DUPLICATE_EMAIL);
    }

    if credentials.password != credentials.confirm_password {
        errors.push(FieldError::PASSWORD_MISMATCH);
    }

    errors
}

/// Login check. `None` means the store could not be read, which replaces
/// the email lookup entirely.
pub fn validate_login(credentials: &Credentials, store: Option<&RecordStore>) -> Vec<FieldError> {
    let Some(store) = store else {
        return vec![FieldError::STORE_UNAVAILABLE];
    };

    let known = credentials
        .email()
        .is_some_and(|email| store.contains_email(email));

    if known {
        Vec::new()
    } else {
        vec![FieldError::UNKNOWN_EMAIL]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        RecordStore::from_slice(br#"{"1": "taken@x.com", "2": {"email": "other@x.com"}}"#).unwrap()
    }

    fn creds(email: &str, password: &str, confirm: &str) -> Credentials {
        Credentials {
            email: Some(email.into()),
            password: Some(password.into()),
            confirm_password: Some(confirm.into()),
        }
    }

    #[test]
    fn test_registration_accepts_new_matching() {
        assert!(validate_registration(&creds("new@x.com", "p", "p"), &store()).is_empty());
    }

    #[test]
    fn test_registration_duplicate_email() {
        let errors = validate_registration(&creds("taken@x.com", "p", "p"), &store());
        assert_eq!(errors, vec![FieldError::DUPLICATE_EMAIL]);
    }

    #[test]
    fn test_registration_password_mismatch() {
        let errors = validate_registration(&creds("new@x.com", "p1", "p2"), &store());
        assert_eq!(errors, vec![FieldError::PASSWORD_MISMATCH]);
    }

    #[test]
    fn test_registration_reports_both_in_order() {
        let errors = validate_registration(&creds("other@x.com", "p1", "p2"), &store());
        assert_eq!(
            errors,
            vec![FieldError::DUPLICATE_EMAIL, FieldError::PASSWORD_MISMATCH]
        );
    }

    #[test]
    fn test_registration_is_repeatable() {
        let request = creds("taken@x.com", "p1", "p2");
        let store = store();
        assert_eq!(
            validate_registration(&request, &store),
            validate_registration(&request, &store)
        );
    }

    #[test]
    fn test_registration_missing_passwords_match() {
        let request = Credentials {
            email: Some("new@x.com".into()),
            ..Credentials::default()
        };
        assert!(validate_registration(&request, &store()).is_empty());
    }

    #[test]
    fn test_registration_compares_password_values_strictly() {
        let matching = Credentials {
            email: Some(123.into()),
            password: Some(123.into()),
            confirm_password: Some(123.into()),
        };
        assert!(validate_registration(&matching, &store()).is_empty());

        let mixed = Credentials {
            password: Some(123.into()),
            confirm_password: Some("123".into()),
            ..Credentials::default()
        };
        assert_eq!(
            validate_registration(&mixed, &store()),
            vec![FieldError::PASSWORD_MISMATCH]
        );

        let null_vs_absent = Credentials {
            password: Some(serde_json::Value::Null),
            ..Credentials::default()
        };
        assert_eq!(
            validate_registration(&null_vs_absent, &store()),
            vec![FieldError::PASSWORD_MISMATCH]
        );
    }

    #[test]
    fn test_login_non_string_email_is_unknown() {
        let request = Credentials {
            email: Some(42.into()),
            ..Credentials::default()
        };
        assert_eq!(
            validate_login(&request, Some(&store())),
            vec![FieldError::UNKNOWN_EMAIL]
        );
    }

    #[test]
    fn test_login_known_email() {
        let request = creds("other@x.com", "", "");
        assert!(validate_login(&request, Some(&store())).is_empty());
    }

    #[test]
    fn test_login_unknown_email() {
        let request = creds("ghost@x.com", "", "");
        assert_eq!(
            validate_login(&request, Some(&store())),
            vec![FieldError::UNKNOWN_EMAIL]
        );
        assert_eq!(
            validate_login(&Credentials::default(), Some(&store())),
            vec![FieldError::UNKNOWN_EMAIL]
        );
    }

    #[test]
    fn test_login_store_failure_replaces_email_check() {
        let request = creds("ghost@x.com", "", "");
        assert_eq!(validate_login(&request, None), vec![FieldError::STORE_UNAVAILABLE]);
    }

    #[test]
    fn test_field_error_serializes_as_single_key_object() {
        let body = serde_json::to_string(&vec![
            FieldError::DUPLICATE_EMAIL,
            FieldError::PASSWORD_MISMATCH,
        ])
        .unwrap();
        assert_eq!(
            body,
            r#"[{"email":"email must be unique"},{"password":"passwords do not match"}]"#
        );
    }
}
