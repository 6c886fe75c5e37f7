//! Mock server infrastructure for testing
//!
//! A single shared mockito server serves release archives to every test in a
//! binary. Tests keep their mocks apart by using distinct version paths.

use lazy_static::lazy_static;
use mockito::{Server, ServerGuard};
use std::sync::Mutex;

lazy_static! {
    /// Global shared mockito server for all tests
    pub static ref SHARED_MOCK_SERVER: Mutex<ServerGuard> = Mutex::new(Server::new());
}

/// Get reference to shared mock server
///
/// Acquire the lock only while creating mocks, not for the whole test, so other
/// tests can keep talking to the server. Mocks are removed when dropped.
///
/// # Examples
///
/// ```no_run
/// use aspensqlplus_testkit::get_shared_mock_server;
///
/// // Example test function (not executed in doctest)
/// fn test_with_shared_server() {
///     let mock = {
///         let mut server = get_shared_mock_server();
///         server.mock("GET", "/v0.7.0/aspensqlplus-fmt-0.7.0-linux-x86_64.zip")
///             .with_status(404)
///             .create()
///     }; // Lock released here
///
///     // ...
/// }
/// ```
pub fn get_shared_mock_server() -> std::sync::MutexGuard<'static, ServerGuard> {
    SHARED_MOCK_SERVER.lock().unwrap_or_else(|poisoned| {
        // The server keeps working after a panic; the lock only serializes mock setup.
        poisoned.into_inner()
    })
}

/// Base URL of the shared mock server, e.g. `http://127.0.0.1:34567`
pub fn shared_mock_url() -> String {
    get_shared_mock_server().url()
}
