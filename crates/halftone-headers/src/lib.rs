//! Artifact header reading and writing

pub mod artifact;

pub use artifact::{ArtifactHeader, HEADER_SIZE};
