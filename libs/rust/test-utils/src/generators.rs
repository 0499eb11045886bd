//! Shared proptest generators.

use proptest::prelude::*;

/// Generate SMTP logins. Logins never contain `:`.
pub fn login_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9._-]{0,20}",
        "[a-z][a-z0-9._-]{0,10}@[a-z]{2,10}\\.[a-z]{2,4}",
    ]
}

/// Generate passwords. Passwords may contain `:` anywhere, but never
/// leading or trailing whitespace.
pub fn password_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*:]{1,48}"
}

/// Generate `(login, password)` pairs.
pub fn credential_pair_strategy() -> impl Strategy<Value = (String, String)> {
    (login_strategy(), password_strategy())
}

/// Generate email addresses.
pub fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.]{0,15}@[a-z]{2,10}\\.(com|org|test)".prop_filter(
        "no consecutive or trailing dots in local part",
        |s| !s.contains("..") && !s.contains(".@"),
    )
}

/// Generate attachment file names.
pub fn file_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,12}\\.(txt|pdf|csv|bin)"
}

/// Generate a list of distinct attachment file names.
pub fn file_names_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(file_name_strategy(), 0..=max)
        .prop_map(|set| set.into_iter().collect())
}
