//! Modules layer - Infrastructure components for external integrations
//!
//! Contains clients and adapters for photo storage and the vision assistant.

pub mod storage;
pub mod vision;
