//! Feature scopes partitioning plugin properties and the control space.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A feature area of a generation request.
///
/// The first three scopes carry UI properties and generator features; the
/// remaining five select a branch of the control override engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureScope {
    #[serde(rename = "workspace")]
    Workspace,
    #[serde(rename = "project")]
    Project,
    #[serde(rename = "codegen")]
    CodeGen,
    #[serde(rename = "memory")]
    Memory,
    #[serde(rename = "peripheral")]
    Peripheral,
    #[serde(rename = "pinConfig")]
    PinConfig,
    #[serde(rename = "clockConfig")]
    ClockConfig,
    #[serde(rename = "dfg")]
    Dfg,
}

impl FeatureScope {
    /// Every scope, in manifest declaration order.
    pub const ALL: [FeatureScope; 8] = [
        FeatureScope::Workspace,
        FeatureScope::Project,
        FeatureScope::CodeGen,
        FeatureScope::Memory,
        FeatureScope::Peripheral,
        FeatureScope::PinConfig,
        FeatureScope::ClockConfig,
        FeatureScope::Dfg,
    ];

    /// The manifest spelling of this scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureScope::Workspace => "workspace",
            FeatureScope::Project => "project",
            FeatureScope::CodeGen => "codegen",
            FeatureScope::Memory => "memory",
            FeatureScope::Peripheral => "peripheral",
            FeatureScope::PinConfig => "pinConfig",
            FeatureScope::ClockConfig => "clockConfig",
            FeatureScope::Dfg => "dfg",
        }
    }

    /// The scope name with its first letter upper-cased (`pinConfig` → `PinConfig`).
    ///
    /// Used as the control group key for single-group scopes.
    pub fn group_name(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether this scope is handled by the control override engine.
    pub fn is_control_scope(&self) -> bool {
        matches!(
            self,
            FeatureScope::Memory
                | FeatureScope::Peripheral
                | FeatureScope::PinConfig
                | FeatureScope::ClockConfig
                | FeatureScope::Dfg
        )
    }
}

impl fmt::Display for FeatureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureScope {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureScope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| ModelError::UnknownScope(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_every_scope() {
        for scope in FeatureScope::ALL {
            assert_eq!(scope.as_str().parse::<FeatureScope>().unwrap(), scope);
        }
    }

    #[test]
    fn parse_unknown_scope() {
        let err = "network".parse::<FeatureScope>().unwrap_err();
        assert!(matches!(err, ModelError::UnknownScope(ref s) if s == "network"));
    }

    #[test]
    fn group_name_capitalizes() {
        assert_eq!(FeatureScope::PinConfig.group_name(), "PinConfig");
        assert_eq!(FeatureScope::ClockConfig.group_name(), "ClockConfig");
        assert_eq!(FeatureScope::Memory.group_name(), "Memory");
    }

    #[test]
    fn serde_uses_manifest_spelling() {
        let json = serde_json::to_string(&FeatureScope::ClockConfig).unwrap();
        assert_eq!(json, "\"clockConfig\"");
        let scope: FeatureScope = serde_json::from_str("\"dfg\"").unwrap();
        assert_eq!(scope, FeatureScope::Dfg);
    }

    #[test]
    fn control_scopes() {
        assert!(FeatureScope::Peripheral.is_control_scope());
        assert!(FeatureScope::Memory.is_control_scope());
        assert!(!FeatureScope::Project.is_control_scope());
        assert!(!FeatureScope::CodeGen.is_control_scope());
    }
}
