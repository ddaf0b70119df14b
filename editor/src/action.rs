use jems_shared::{ColorLegend, MapDocument, Region};
use serde::{Deserialize, Serialize};

/// Everything the edit page can ask the controller to do.
///
/// On the wire an action is a JSON object tagged by `"type"`. Unknown tags
/// decode to [`EditAction::Unknown`], which the reducer ignores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EditAction {
    /// A freshly loaded document; `None` installs the fallback document.
    InitMap {
        #[serde(default)]
        map: Option<MapDocument>,
    },
    ChangeModal {
        #[serde(default)]
        modal: String,
    },
    /// Coarse top-level edits (toggles, color mode, name).
    UpdateMap {
        #[serde(default)]
        map: Option<MapDocument>,
    },
    SelectRegion {
        group_name: String,
        i: usize,
    },
    /// Field edits for the selected region. A different `group_name` moves
    /// the region into that group; `hue` becomes the choropleth hue.
    UpdateSelectedRegionInfo {
        group_name: String,
        region: Region,
        hue: String,
    },
    UpdateColorLegend {
        color_legend: ColorLegend,
    },
    UpdateChoroplethLegend {
        hue: String,
    },
    #[serde(other)]
    Unknown,
}

impl EditAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InitMap { .. } => "init_map",
            Self::ChangeModal { .. } => "change_modal",
            Self::UpdateMap { .. } => "update_map",
            Self::SelectRegion { .. } => "select_region",
            Self::UpdateSelectedRegionInfo { .. } => "update_selected_region_info",
            Self::UpdateColorLegend { .. } => "update_color_legend",
            Self::UpdateChoroplethLegend { .. } => "update_choropleth_legend",
            Self::Unknown => "unknown",
        }
    }
}
