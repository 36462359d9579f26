//! Generators for socgen plugin features.
//!
//! A plugin manifest declares, per scope, files copied verbatim and templates
//! rendered against the generation context. [`Generator`] runs one scope's
//! feature; [`copy_files`] and [`render_templates`] are the underlying
//! services.

pub mod copy;
pub mod dest;
pub mod error;
pub mod generator;
pub mod glob;
pub mod render;

pub use copy::copy_files;
pub use dest::Destination;
pub use error::{GenerateError, Result};
pub use generator::Generator;
pub use render::render_templates;
