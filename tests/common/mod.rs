//! Shared helpers for the integration tests.

#![allow(dead_code)]

use apollo_arrow::{ApiClient, Auth, Session};
use std::path::PathBuf;

pub const USERNAME: &str = "admin@local.host";
pub const PASSWORD: &str = "secret";

pub fn password_client(server: &mockito::Server) -> ApiClient {
    let session = Session::new(
        server.url(),
        Auth::Password {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        },
    )
    .unwrap();
    ApiClient::new(session).unwrap()
}

pub fn api_key_client(server: &mockito::Server, key: &str) -> ApiClient {
    let session = Session::new(server.url(), Auth::ApiKey(key.to_string())).unwrap();
    ApiClient::new(session).unwrap()
}

/// Write a small stand-in archive. Its content is never unpacked by the
/// client, so plain text is enough to check what goes over the wire.
pub fn archive(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
