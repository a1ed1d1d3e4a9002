//! Agent Editor - AI-assisted document editing
//!
//! This crate runs conversations between a writer and configurable AI
//! agents about a document. Agents answer in prose and may embed
//! line-anchored change proposals, which the writer accepts (rewriting
//! the document) or rejects.
//!
//! Layers:
//! - `domain` - proposals, agents, conversations and the context window
//! - `ports` - provider, agent store and document store seams
//! - `adapters` - mock provider and in-memory stores
//! - `application` - conversation manager and orchestrator
//! - `config` - environment/file configuration and tracing setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
