//! Property-based tests for Vault client wire handling.

use proptest::prelude::*;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::collections::HashMap;
use vault_client::VaultError;
use vault_client::secrets::{ErrorResponse, KvResponse, flatten};

fn field_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

fn secret_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*:]{1,64}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// String fields come back exactly as stored.
    #[test]
    fn prop_flatten_keeps_string_values(
        fields in prop::collection::hash_map(field_name_strategy(), secret_value_strategy(), 1..8),
    ) {
        let raw: HashMap<String, Value> = fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        prop_assert_eq!(flatten(raw), fields);
    }

    /// Every KV v2 payload with data parses and keeps all keys.
    #[test]
    fn prop_kv_response_roundtrip(
        fields in prop::collection::hash_map(field_name_strategy(), secret_value_strategy(), 1..8),
        version in 1u32..1000,
    ) {
        let body = json!({
            "data": { "data": fields, "metadata": { "version": version, "destroyed": false } }
        });
        let parsed: KvResponse = serde_json::from_value(body).unwrap();
        prop_assert_eq!(parsed.data.metadata.unwrap().version, version);
        prop_assert_eq!(parsed.data.data.unwrap().len(), fields.len());
    }

    /// Vault error lists are reported verbatim.
    #[test]
    fn prop_error_response_joins_messages(
        errors in prop::collection::vec("[a-z ]{1,30}", 1..4),
    ) {
        let body = json!({ "errors": errors }).to_string();
        prop_assert_eq!(ErrorResponse::describe(&body), errors.join("; "));
    }

    /// Only unavailability is classified as retryable.
    #[test]
    fn prop_error_classification(msg in "[a-zA-Z0-9 ]{1,40}") {
        prop_assert!(VaultError::unavailable(msg.clone()).is_retryable());
        prop_assert!(!VaultError::invalid_path(msg.clone()).is_retryable());
        prop_assert!(!VaultError::auth_failed(msg.clone()).is_retryable());
        prop_assert!(!VaultError::InvalidRequest(msg.clone()).is_retryable());
        prop_assert!(!VaultError::PermissionDenied(msg).is_retryable());
    }

    /// Tokens wrapped in SecretString never show up in debug output.
    #[test]
    fn prop_token_not_exposed_in_debug(token in "s\\.[A-Za-z0-9]{16,32}") {
        let secret = SecretString::from(token.clone());
        let debug = format!("{secret:?}");
        prop_assert!(!debug.contains(&token));
        prop_assert_eq!(secret.expose_secret(), token.as_str());
    }
}
