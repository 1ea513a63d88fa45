//! Test helpers: build state and router from an in-memory `Config`.
//!
//! Run from workspace root: `cargo test -p imgrelay-api`.

use axum_test::TestServer;
use imgrelay_api::setup::{build_state, routes};
use imgrelay_api::HmacPathValidator;
use imgrelay_core::{Config, Presets};

pub const TEST_KEY: &[u8] = b"secret";
pub const TEST_SALT: &[u8] = b"hello";

/// base64url of `http://example.com/a.jpg`
pub const SOURCE_B64: &str = "aHR0cDovL2V4YW1wbGUuY29tL2EuanBn";

pub fn insecure_config() -> Config {
    Config {
        allow_insecure: true,
        ..Config::default()
    }
}

pub fn secure_config() -> Config {
    Config {
        key: TEST_KEY.to_vec(),
        salt: TEST_SALT.to_vec(),
        ..Config::default()
    }
}

pub fn with_presets(config: Config, presets: &[&str]) -> Config {
    Config {
        presets: Presets::parse(presets.iter().copied()).expect("valid presets"),
        ..config
    }
}

pub fn test_server(config: Config) -> TestServer {
    let state = build_state(config).expect("valid test configuration");
    TestServer::new(routes::setup_routes(state)).expect("test server")
}

/// Prefix `path` with a valid signature for the test key and salt.
pub fn signed(path: &str) -> String {
    let validator = HmacPathValidator::new(TEST_KEY.to_vec(), TEST_SALT.to_vec(), 32);
    format!("/{}{}", validator.sign_path(path), path)
}
