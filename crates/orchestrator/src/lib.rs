//! The Orchestrator (C10) and Job Registry (C11): wires every pipeline
//! stage to a concrete backend, drives a submitted Brief through them in
//! order, and tracks job lifecycle for the transport layer to query.

pub mod backends;
pub mod orchestrator;
pub mod registry;
pub mod validation;
pub mod voices;

pub use backends::{build_chooser_for_stage, build_tts_backend};
pub use orchestrator::Orchestrator;
pub use registry::JobRegistry;
pub use validation::{validate_brief, Estimates, ValidationReport};
pub use voices::ConfiguredVoices;
