//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC, Base64)
//! - Password hashing (Argon2id) for the credential directory
//! - Cookie management
//! - Outbound call spacing (minimum interval rate limiting)
//! - A JSON key/value store standing in for browser local storage

pub mod cookie;
pub mod crypto;
pub mod password;
pub mod rate_limit;
pub mod storage;
