use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};

/// Account record as it is stored in the `users` document collection.
///
/// Every field starts unset and can be replaced independently, so a mapper can
/// build the record with [`UserAccount::default`] and fill it in any order.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccount {
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(rename = "pwd", skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(rename = "userName", skip_serializing_if = "Option::is_none")]
    user_name: Option<String>,
}

impl UserAccount {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            password: Some(password.into()),
            user_name: Some(user_name.into()),
        }
    }

    /// Like [`UserAccount::new`] but any field may be passed as absent.
    pub fn with_fields(
        user_id: Option<String>,
        password: Option<String>,
        user_name: Option<String>,
    ) -> Self {
        Self {
            user_id,
            password,
            user_name,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
    }

    /// Stored verbatim, no hashing happens here.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(password.into());
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, user_name: impl Into<String>) {
        self.user_name = Some(user_name.into());
    }
}

impl Display for UserAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!(
            "User {}",
            self.user_id.as_deref().unwrap_or("<unset>")
        ))
    }
}

impl Debug for UserAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("user_id", &self.user_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("user_name", &self.user_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::UserAccount;
    use claims::{assert_none, assert_some_eq};
    use proptest::prelude::*;

    #[test]
    fn empty_record_has_every_field_unset() {
        let account = UserAccount::default();
        assert_none!(account.user_id());
        assert_none!(account.password());
        assert_none!(account.user_name());
    }

    #[test]
    fn constructor_stores_values_verbatim() {
        let account = UserAccount::new("u1", "secret", "Alice");
        assert_some_eq!(account.user_id(), "u1");
        assert_some_eq!(account.password(), "secret");
        assert_some_eq!(account.user_name(), "Alice");
    }

    #[test]
    fn constructor_keeps_whitespace_and_empty_strings() {
        let account = UserAccount::new("  u1 ", "", "\tAlice\n");
        assert_some_eq!(account.user_id(), "  u1 ");
        assert_some_eq!(account.password(), "");
        assert_some_eq!(account.user_name(), "\tAlice\n");
    }

    #[test]
    fn absent_constructor_arguments_stay_unset() {
        let account = UserAccount::with_fields(Some("u1".to_owned()), None, None);
        assert_some_eq!(account.user_id(), "u1");
        assert_none!(account.password());
        assert_none!(account.user_name());
    }

    #[test]
    fn setting_name_on_empty_record_leaves_id_unset() {
        let mut account = UserAccount::default();
        account.set_user_name("Bob");
        assert_some_eq!(account.user_name(), "Bob");
        assert_none!(account.user_id());
        assert_none!(account.password());
    }

    #[test]
    fn display_names_the_user_without_the_password() {
        let account = UserAccount::new("u1", "secret", "Alice");
        assert_eq!(account.to_string(), "User u1");
        assert_eq!(UserAccount::default().to_string(), "User <unset>");
    }

    #[test]
    fn debug_redacts_the_password() {
        let rendered = format!("{:?}", UserAccount::new("u1", "hunter2", "Alice"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("Alice"));

        let rendered = format!("{:?}", UserAccount::default());
        assert!(!rendered.contains("[REDACTED]"));
    }

    #[test]
    fn serializes_with_document_field_names() {
        let json = serde_json::to_value(UserAccount::new("u1", "secret", "Alice"))
            .expect("Failed to serialize account");
        assert_eq!(
            json,
            serde_json::json!({ "userId": "u1", "pwd": "secret", "userName": "Alice" })
        );

        let json = serde_json::to_value(UserAccount::default()).expect("Failed to serialize");
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn deserializes_missing_and_null_fields_as_unset() {
        let account: UserAccount =
            serde_json::from_str(r#"{ "userName": "Bob", "pwd": null }"#)
                .expect("Failed to deserialize account");
        assert_eq!(account, UserAccount::with_fields(None, None, Some("Bob".to_owned())));
    }

    proptest! {
        #[test]
        fn getters_return_constructor_arguments(a in ".*", b in ".*", c in ".*") {
            let account = UserAccount::new(a.clone(), b.clone(), c.clone());
            prop_assert_eq!(account.user_id(), Some(a.as_str()));
            prop_assert_eq!(account.password(), Some(b.as_str()));
            prop_assert_eq!(account.user_name(), Some(c.as_str()));
        }

        #[test]
        fn setting_one_field_leaves_the_others_alone(
            a in ".*", b in ".*", c in ".*", v in ".*"
        ) {
            let mut account = UserAccount::new(a.clone(), b.clone(), c.clone());
            account.set_user_id(v.clone());
            prop_assert_eq!(account.user_id(), Some(v.as_str()));
            prop_assert_eq!(account.password(), Some(b.as_str()));
            prop_assert_eq!(account.user_name(), Some(c.as_str()));

            let mut account = UserAccount::new(a.clone(), b.clone(), c.clone());
            account.set_password(v.clone());
            prop_assert_eq!(account.user_id(), Some(a.as_str()));
            prop_assert_eq!(account.password(), Some(v.as_str()));
            prop_assert_eq!(account.user_name(), Some(c.as_str()));

            let mut account = UserAccount::new(a.clone(), b.clone(), c.clone());
            account.set_user_name(v.clone());
            prop_assert_eq!(account.user_id(), Some(a.as_str()));
            prop_assert_eq!(account.password(), Some(b.as_str()));
            prop_assert_eq!(account.user_name(), Some(v.as_str()));
        }

        #[test]
        fn setters_are_independent_on_partly_unset_records(
            user_id in proptest::option::of(".*"),
            password in proptest::option::of(".*"),
            user_name in proptest::option::of(".*"),
            v in ".*",
        ) {
            let record = UserAccount::with_fields(user_id, password, user_name);

            let mut account = record.clone();
            account.set_user_id(v.clone());
            prop_assert_eq!(account.user_id(), Some(v.as_str()));
            prop_assert_eq!(account.password(), record.password());
            prop_assert_eq!(account.user_name(), record.user_name());

            let mut account = record.clone();
            account.set_password(v.clone());
            prop_assert_eq!(account.user_id(), record.user_id());
            prop_assert_eq!(account.password(), Some(v.as_str()));
            prop_assert_eq!(account.user_name(), record.user_name());

            let mut account = record.clone();
            account.set_user_name(v.clone());
            prop_assert_eq!(account.user_id(), record.user_id());
            prop_assert_eq!(account.password(), record.password());
            prop_assert_eq!(account.user_name(), Some(v.as_str()));
        }

        #[test]
        fn setting_the_same_value_twice_keeps_it(v in ".*") {
            let mut account = UserAccount::default();
            account.set_user_id(v.clone());
            account.set_user_id(v.clone());
            prop_assert_eq!(account.user_id(), Some(v.as_str()));
        }

        #[test]
        fn records_built_alike_are_independent(a in ".*", b in ".*", c in ".*", v in ".*") {
            let first = UserAccount::new(a.clone(), b.clone(), c.clone());
            let mut second = UserAccount::new(a.clone(), b.clone(), c.clone());
            second.set_user_id(v.clone());
            second.set_password(v.clone());
            second.set_user_name(v);
            prop_assert_eq!(first.user_id(), Some(a.as_str()));
            prop_assert_eq!(first.password(), Some(b.as_str()));
            prop_assert_eq!(first.user_name(), Some(c.as_str()));
        }
    }
}
