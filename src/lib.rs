// Litmus: content quality and fraud risk assessment for creator platforms.
//
// This is the library root. Each module corresponds to a major subsystem
// of the assessment pipeline.

pub mod cache;
pub mod config;
pub mod features;
pub mod fraud;
pub mod models;
pub mod oracle;
pub mod output;
pub mod probe;
pub mod scoring;
pub mod service;
pub mod web;
