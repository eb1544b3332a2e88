//! CloudPush Core - Domain types, ports and configuration
//!
//! This crate contains the pieces shared by every CloudPush adapter:
//! - **Domain types** - `LocalFile`, `RemoteFileInfo`, `DomainError`
//! - **Port definitions** - Traits for adapters: `CredentialProvider`, `RemoteFolder`
//! - **Configuration** - YAML `Config` and the line-oriented `AuthSettings` file
//!
//! # Architecture
//!
//! Ports define trait interfaces that adapter crates implement
//! (`cloudpush-graph` for OneDrive, `cloudpush-sync` for mounted iCloud
//! folders). The push dispatcher only ever talks to these traits.

pub mod config;
pub mod domain;
pub mod ports;
