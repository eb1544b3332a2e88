//! Integration tests for cloudpush-graph
//!
//! Uses wiremock to simulate the Microsoft Graph API and the Microsoft
//! identity platform, and verifies end-to-end behavior of downloads and
//! the device-code credential provider.

mod common;

mod test_credential_provider;
mod test_download;
