//! Episode Streaming Server
//!
//! Catalog backend for episode playback and downloads. Decides which quality
//! tiers each viewer may stream and download, and meters top-tier downloads.

pub mod access;
pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod episodes;
pub mod quota;
pub mod storage;
