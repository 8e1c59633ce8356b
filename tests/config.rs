use chorus_pro_rs::{AccountCredentials, Error, KeyPair};
use serial_test::serial;

const VARS: [&str; 4] = ["OAUTH_ID", "OAUTH_SECRET", "CHORUS_LOGIN", "CHORUS_PASSWORD"];

struct EnvGuard(Vec<(&'static str, Option<String>)>);

impl EnvGuard {
    fn capture() -> Self {
        Self(VARS.iter().map(|var| (*var, std::env::var(var).ok())).collect())
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (var, value) in &self.0 {
            // SAFETY: tests touching the environment are serialized
            unsafe {
                match value {
                    Some(value) => std::env::set_var(var, value),
                    None => std::env::remove_var(var),
                }
            }
        }
    }
}

#[test]
#[serial]
fn credentials_are_read_from_environment() {
    let _guard = EnvGuard::capture();
    // SAFETY: tests touching the environment are serialized
    unsafe {
        std::env::set_var("OAUTH_ID", "client");
        std::env::set_var("OAUTH_SECRET", "secret");
        std::env::set_var("CHORUS_LOGIN", "user");
        std::env::set_var("CHORUS_PASSWORD", "password");
    }

    let key_pair = KeyPair::from_env().unwrap();
    assert_eq!(key_pair.client_id(), "client");

    let account = AccountCredentials::from_env().unwrap();
    assert_eq!(account, AccountCredentials::new("user", "password"));
}

#[test]
#[serial]
fn missing_variables_are_reported_by_name() {
    let _guard = EnvGuard::capture();
    // SAFETY: tests touching the environment are serialized
    unsafe {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    match KeyPair::from_env() {
        Err(Error::Environment(var)) => assert_eq!(var, "OAUTH_ID"),
        other => panic!("expected Environment error, got {other:?}"),
    }
    match AccountCredentials::from_env() {
        Err(Error::Environment(var)) => assert_eq!(var, "CHORUS_LOGIN"),
        other => panic!("expected Environment error, got {other:?}"),
    }
}
