//! Scope-specific control override policies.
//!
//! The engine never mutates the SoC model: each policy clones the groups it
//! returns before a directive touches them.

use std::collections::BTreeMap;

use log::debug;
use socgen_model::{Control, ControlDirective, ControlMap, FeatureScope, PluginInfo, SocDataModel};

use crate::directive::apply_directive;

const CLOCK_CONFIG_GROUP: &str = "ClockConfig";
const PIN_CONFIG_GROUP: &str = "PinConfig";

/// Whether a group holds data-flow-graph stream or gasket controls.
pub fn is_dfg_group(name: &str) -> bool {
    name.contains(" DFGStreamConfig") || name.contains(" DFGGasketConfig")
}

/// Applies a plugin's control directives to a SoC data model.
#[derive(Debug, Clone)]
pub struct SocControlsOverride<'p> {
    plugin: &'p PluginInfo,
}

impl<'p> SocControlsOverride<'p> {
    pub fn new(plugin: &'p PluginInfo) -> Self {
        Self { plugin }
    }

    /// The final control lists of `scope`, keyed by group or clock node name.
    ///
    /// Scopes without control policies yield an empty map.
    pub fn override_controls(&self, scope: FeatureScope, soc: &SocDataModel) -> ControlMap {
        debug!("overriding {scope} controls for {}", soc.name);
        match scope {
            FeatureScope::Peripheral => self.grouped(scope, soc, |name| !is_dfg_group(name)),
            FeatureScope::Dfg => self.grouped(scope, soc, is_dfg_group),
            FeatureScope::Memory => self.memory(),
            FeatureScope::PinConfig => self.pin_config(soc),
            FeatureScope::ClockConfig => self.clock_config(soc),
            FeatureScope::Workspace | FeatureScope::Project | FeatureScope::CodeGen => ControlMap::new(),
        }
    }

    /// Peripheral and DFG policy: every group other than the clock and pin
    /// groups that passes `keep`, with its directive applied when non-empty.
    fn grouped(&self, scope: FeatureScope, soc: &SocDataModel, keep: impl Fn(&str) -> bool) -> ControlMap {
        let directives = self.plugin.properties.directives(scope);
        soc.controls
            .iter()
            .filter(|(name, _)| name.as_str() != CLOCK_CONFIG_GROUP && name.as_str() != PIN_CONFIG_GROUP)
            .filter(|(name, _)| keep(name.as_str()))
            .map(|(name, controls)| {
                let mut controls = controls.clone();
                if let Some(directive) = non_empty(directives, name) {
                    debug!("applying {scope} directive to {name}");
                    apply_directive(&mut controls, directive, &soc.name);
                }
                (name.clone(), controls)
            })
            .collect()
    }

    /// Memory policy: only the directive's added controls, never the model's.
    fn memory(&self) -> ControlMap {
        let scope = FeatureScope::Memory;
        let controls: Vec<Control> = self
            .plugin
            .properties
            .directive(scope)
            .and_then(|d| d.added_controls.as_ref())
            .into_iter()
            .flatten()
            .map(|added| {
                let mut control = added.control.clone();
                control.plugin_option = true;
                control
            })
            .collect();
        ControlMap::from([(scope.to_string(), controls)])
    }

    fn pin_config(&self, soc: &SocDataModel) -> ControlMap {
        let scope = FeatureScope::PinConfig;
        let group = scope.group_name();
        let mut controls = soc.control_group(&group).map(<[Control]>::to_vec).unwrap_or_default();
        if let Some(directive) = self.plugin.properties.directive(scope) {
            apply_directive(&mut controls, directive, &soc.name);
        }
        ControlMap::from([(group, controls)])
    }

    /// Clock policy: one entry per clock node that declares a `ConfigUIOrder`,
    /// its controls taken from the `ClockConfig` group in that order.
    fn clock_config(&self, soc: &SocDataModel) -> ControlMap {
        let directives = self.plugin.properties.directives(FeatureScope::ClockConfig);
        let pool = soc.control_group(CLOCK_CONFIG_GROUP).unwrap_or_default();
        let mut result = BTreeMap::new();

        for node in &soc.clock_nodes {
            let Some(order) = &node.config_ui_order else {
                continue;
            };

            let mut controls: Vec<Control> = order
                .iter()
                .filter_map(|id| pool.iter().find(|c| &c.id == id))
                .cloned()
                .collect();

            if let Some(directive) = non_empty(directives, &node.name) {
                debug!("applying clockConfig directive to {}", node.name);
                apply_directive(&mut controls, directive, &soc.name);
            }

            if controls.is_empty() {
                debug!("clock node {} has no controls", node.name);
            } else {
                result.insert(node.name.clone(), controls);
            }
        }
        result
    }
}

fn non_empty<'d>(
    directives: Option<&'d BTreeMap<String, ControlDirective>>,
    name: &str,
) -> Option<&'d ControlDirective> {
    directives
        .and_then(|map| map.get(name))
        .filter(|directive| !directive.is_empty())
}
