//! Canonical SoC data model.
//!
//! The data model is read-only input: consumers that need to change controls
//! clone the relevant group first. Field names follow the PascalCase spelling
//! of the data model documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Control groups keyed by group name (`"SPI0"`, `"PinConfig"`, a clock node name...).
pub type ControlMap = BTreeMap<String, Vec<Control>>;

/// One entry of an enumerated control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnumValue {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: Value,
}

/// A single configurable hardware setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Control {
    /// Unique within its control group.
    pub id: String,
    #[serde(default)]
    pub description: String,
    /// `"enum"`, `"boolean"`, `"integer"`, ...
    #[serde(default, rename = "Type")]
    pub control_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValue>,
    /// String or number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_value: Option<Value>,
    /// Expression deciding whether the control is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    /// True when a plugin directive injected this control.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub plugin_option: bool,
    /// Remaining fields (`Units`, `Hint`, `Pattern`, ...), carried verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Control {
    /// Create a control with the given id and type and nothing else set.
    pub fn new(id: impl Into<String>, control_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            control_type: control_type.into(),
            enum_values: Vec::new(),
            default: None,
            minimum_value: None,
            maximum_value: None,
            condition: None,
            plugin_option: false,
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style description setter.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style default setter.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// One clock source, divider, or mux.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClockNode {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "Type")]
    pub node_type: String,
    /// Display and application order of this node's `ClockConfig` controls.
    /// Nodes without an order expose no controls.
    #[serde(
        default,
        rename = "ConfigUIOrder",
        skip_serializing_if = "Option::is_none"
    )]
    pub config_ui_order: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A bitfield within a register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterField {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Bit offset of the least significant bit.
    pub position: u32,
    /// Width in bits.
    pub length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<Value>,
}

impl RegisterField {
    /// Unshifted mask covering `length` bits.
    pub fn mask(&self) -> u32 {
        if self.length >= 32 {
            u32::MAX
        } else {
            (1u32 << self.length) - 1
        }
    }
}

/// A memory-mapped register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Register {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default)]
    pub fields: Vec<RegisterField>,
}

impl Register {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&RegisterField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A peripheral block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Peripheral {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A physical package of the part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_pins: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The canonical hardware description of one part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SocDataModel {
    /// Part number, matched against directive `partRegexp` patterns.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub controls: ControlMap,
    #[serde(default)]
    pub clock_nodes: Vec<ClockNode>,
    #[serde(default)]
    pub registers: Vec<Register>,
    #[serde(default)]
    pub peripherals: Vec<Peripheral>,
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl SocDataModel {
    /// An empty model for the named part.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: String::new(),
            controls: ControlMap::new(),
            clock_nodes: Vec::new(),
            registers: Vec::new(),
            peripherals: Vec::new(),
            packages: Vec::new(),
        }
    }

    /// Controls of one group, if the group exists.
    pub fn control_group(&self, group: &str) -> Option<&[Control]> {
        self.controls.get(group).map(Vec::as_slice)
    }

    /// Look up a register by name.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers.iter().find(|r| r.name == name)
    }

    /// Look up a clock node by name.
    pub fn clock_node(&self, name: &str) -> Option<&ClockNode> {
        self.clock_nodes.iter().find(|n| n.name == name)
    }

    /// Whether the part belongs to the ADSP family, whose register macros
    /// are spelled `*pREG_<name>`.
    pub fn is_adsp(&self) -> bool {
        self.name.to_lowercase().contains("adsp")
    }
}
