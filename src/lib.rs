//! Tappio - NFC business cards and review plaques
//!
//! Each physical NFC tag carries a short code. Scanning it hits `/c/{code}`,
//! which sends the visitor to the owner's profile page, to a review site,
//! or to the activation flow for codes nobody has claimed yet.
//!
//! # Architecture
//! - `storage`: SeaORM entities and queries (SQLite / MySQL / PostgreSQL)
//! - `services`: business logic shared by HTTP handlers and the CLI
//! - `api`: HTTP handlers, sessions and middleware
//! - `interfaces`: command-line interface
//! - `config`: TOML + environment configuration
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging and session events

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
