//! Zephyr board identifiers.

use serde_json::Value;
use socgen_model::{FeatureScope, PluginProperty};

use crate::provider::PropertyPostProcessor;

const PROPERTY_ID: &str = "ZephyrBoardName";

/// Fills an empty `ZephyrBoardName` default from the `boardId` and `soc`
/// context fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZephyrBoardName;

impl PropertyPostProcessor for ZephyrBoardName {
    fn process(&self, _scope: FeatureScope, context: Option<&Value>, properties: &mut Vec<PluginProperty>) {
        let field = |name: &str| {
            context
                .and_then(|c| c.get(name))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };
        let (Some(board), Some(soc)) = (field("boardId"), field("soc")) else {
            return;
        };

        if let Some(property) = properties
            .iter_mut()
            .find(|p| p.id == PROPERTY_ID && p.default_str() == Some(""))
        {
            property.default = Some(Value::String(zephyr_board_name(board, soc)));
        }
    }
}

/// Zephyr's name for `board` fitted with `soc`, or an empty string for
/// boards Zephyr does not know.
pub fn zephyr_board_name(board: &str, soc: &str) -> String {
    let soc = soc.to_lowercase();
    match board.to_lowercase().as_str() {
        "ad-apard32690-sl" => "apard32690/max32690/m4".to_string(),
        "evkit_v1" if soc == "max32675c" => "max32675evkit/max32675".to_string(),
        "evkit_v1" => {
            let core = match soc.as_str() {
                "max32666" => "/cpu0",
                "max78000" | "max78002" | "max32690" | "max32655" => "/m4",
                _ => "",
            };
            format!("{soc}evkit/{soc}{core}")
        }
        "evsys" => format!("{soc}evsys"),
        "fthr" | "fthr_reva" => {
            let core = match soc.as_str() {
                "max32666" => "/cpu0",
                "max32657" | "max32672" | "max32650" => "",
                _ => "/m4",
            };
            format!("{soc}fthr/{soc}{core}")
        }
        "fthr_apps_p1" => {
            let core = if soc == "max32657" { "" } else { "/m4" };
            format!("{soc}fthr_apps/{soc}{core}")
        }
        "ad-swiot1l-sl" => "ad_swiot1l_sl".to_string(),
        _ => String::new(),
    }
}
