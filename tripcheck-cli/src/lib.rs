//! tripcheck - Vehicle pre-trip inspection scoring
//!
//! Turns a trip description into a structured inspection checklist,
//! scores the answers recorded against it and assembles an inspection
//! report with group pass rates, resolution advice and a narrative
//! summary.
//!
//! The scoring engine ([`scoring`]) is pure and never fails. LLM access
//! ([`ai`]) and file loading ([`sources`]) sit at the edges.

pub mod ai;
pub mod cli;
pub mod config;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod session;
pub mod sources;
