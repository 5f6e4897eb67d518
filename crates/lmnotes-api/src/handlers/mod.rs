//! HTTP handler modules for lmnotes-api.

pub mod chat;
pub mod notebooks;
pub mod sources;
