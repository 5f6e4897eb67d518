//! # lmnotes-agent
//!
//! HTTP client for the external LMNotes indexing agent.
//!
//! The agent indexes uploaded source content and answers chat questions
//! grounded in it. This crate provides:
//! - [`HttpAgentClient`] — the reqwest-based production client
//! - [`mock::MockAgentClient`] — a recording mock for workflow tests
//!
//! The client implements the [`AgentClient`] trait from `lmnotes-core`, so
//! the database workflows depend only on the interface.

pub mod client;
pub mod mock;

pub use client::HttpAgentClient;
pub use mock::{MockAgentClient, RecordedCall};

// Re-export the trait so consumers don't need a direct core dependency
// just to name the interface.
pub use lmnotes_core::AgentClient;
