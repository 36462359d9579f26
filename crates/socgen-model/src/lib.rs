//! Data model for the socgen project generator.
//!
//! Three documents drive every generation request:
//! - **SoC data model:** the canonical, read-only hardware description
//!   (controls, clock nodes, registers) of one part
//! - **Plugin manifest:** the `.cfsplugin` document declaring per-scope
//!   properties, control directives, and the files/templates of each feature
//! - **Context:** an arbitrary JSON object describing the workspace or
//!   project being generated
//!
//! This crate holds the typed form of the first two and the JSON loaders.

pub mod error;
pub mod parse;
pub mod plugin;
pub mod scope;
pub mod soc;

pub use error::{ModelError, Result};
pub use plugin::{
    AddedControl, ControlDirective, ControlPatch, ControlRef, DefaultOverride, Feature, FileMap,
    ModifiedControl, PluginInfo, PluginProperty, PropertyOption, ScopedProperties, SocInfo,
};
pub use scope::FeatureScope;
pub use soc::{
    ClockNode, Control, ControlMap, EnumValue, Package, Peripheral, Register, RegisterField,
    SocDataModel,
};
