//! Plugin control directives and properties.
//!
//! [`SocControlsOverride`] turns the canonical control schema of a SoC data
//! model into the control lists a plugin exposes for one feature scope.
//! [`PropertyProvider`] wraps it together with the manifest's UI properties,
//! filtering them by condition and resolving templated defaults.
//!
//! Everything here is synchronous and pure: no I/O, and the data model is
//! never modified.

pub mod board;
pub mod build_system;
pub mod directive;
pub mod override_engine;
pub mod part;
pub mod provider;

pub use board::{zephyr_board_name, ZephyrBoardName};
pub use build_system::BuildSystemFilter;
pub use directive::apply_directive;
pub use override_engine::{is_dfg_group, SocControlsOverride};
pub use part::{part_matches, PartMatcher, PartQualified};
pub use provider::{PropertyPostProcessor, PropertyProvider};
