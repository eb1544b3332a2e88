pub mod auth;
pub mod check;
pub mod download;
pub mod push;
pub mod upload;
