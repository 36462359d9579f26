//! Application of one [`ControlDirective`] to a control list.

use log::debug;
use socgen_model::{Control, ControlDirective};

use crate::part::PartMatcher;

/// Apply `directive` to `controls` in place.
///
/// Steps run in a fixed order, each on the result of the previous one:
/// 1. `supportedControls` filter, or `removedControls` when no filter is given
/// 2. `addedControls` appended with `PluginOption` set
/// 3. `modifiedControls` merged over existing controls by id
/// 4. `defaultOverrides`
///
/// Entries naming an id that is not in the list are ignored.
pub fn apply_directive(controls: &mut Vec<Control>, directive: &ControlDirective, soc_name: &str) {
    let mut parts = PartMatcher::new(soc_name);

    if let Some(supported) = &directive.supported_controls {
        controls.retain(|control| {
            supported
                .iter()
                .any(|entry| entry.id == control.id && parts.applies(entry))
        });
    } else if let Some(removed) = &directive.removed_controls {
        for entry in removed {
            if parts.applies(entry) {
                controls.retain(|control| control.id != entry.id);
            }
        }
    }

    for added in directive.added_controls.iter().flatten() {
        if !parts.applies(added) {
            debug!("skipping added control {} for {soc_name}", added.control.id);
            continue;
        }
        let mut control = added.control.clone();
        control.plugin_option = true;
        controls.push(control);
    }

    for modified in directive.modified_controls.iter().flatten() {
        if let Some(control) = controls.iter_mut().find(|c| c.id == modified.id) {
            modified.patch.apply_to(control);
        }
    }

    for entry in directive.default_overrides.iter().flatten() {
        if !parts.applies(entry) {
            continue;
        }
        if let Some(control) = controls.iter_mut().find(|c| c.id == entry.id) {
            control.default = Some(entry.value.clone());
        }
    }
}
