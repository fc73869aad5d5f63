//! Platform-independent logic for the glancefin now-playing overlay.
//!
//! Everything here is natively testable: wire models for the media server's
//! session and item endpoints, credential-blob parsing, the enrichment
//! pipeline, and the derivation of display records the browser crate renders.
//! The browser boundary (fetch, DOM) lives in `glancefin-web` behind the
//! [`gateway::MediaGateway`] trait.

pub mod config;
pub mod credentials;
pub mod display;
pub mod enrich;
pub mod error;
pub mod gateway;
pub mod models;
