//! Helm execution
//!
//! Rendering is delegated entirely to the `helm` binary; this module only
//! builds its argument list and collects the output.

mod template;

pub use template::{write_manifest, HelmTemplate};
