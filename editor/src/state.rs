use jems_shared::{MapDocument, Region};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Modal dialogs the edit page can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditModal {
    #[default]
    None,
    Download,
    Duplicate,
    Delete,
}

impl EditModal {
    pub const ALL: [Self; 4] = [Self::None, Self::Download, Self::Duplicate, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Download => "DOWNLOAD",
            Self::Duplicate => "DUPLICATE",
            Self::Delete => "DELETE",
        }
    }

    /// Resolve a modal name; anything outside the known set is `None`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|modal| modal.as_str() == name)
            .unwrap_or(Self::None)
    }
}

/// Position of the region being edited. The region itself is looked up
/// from the document on read, so it can never drift out of sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRegion {
    pub group_name: String,
    pub i: usize,
}

/// Selected position plus the region stored there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRegionView<'a> {
    pub group_name: &'a str,
    pub i: usize,
    pub region: &'a Region,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditPageState {
    pub map: MapDocument,
    pub selected_region: Option<SelectedRegion>,
    pub modal: EditModal,
}

impl EditPageState {
    pub fn new(map: MapDocument) -> Self {
        Self {
            map,
            selected_region: None,
            modal: EditModal::None,
        }
    }

    /// The selected region, if the selection points at an existing region.
    pub fn selected(&self) -> Option<SelectedRegionView<'_>> {
        let selected = self.selected_region.as_ref()?;
        let region = self.map.regions.get(&selected.group_name, selected.i)?;
        Some(SelectedRegionView {
            group_name: &selected.group_name,
            i: selected.i,
            region,
        })
    }
}

impl Default for EditPageState {
    fn default() -> Self {
        Self::new(MapDocument::error())
    }
}

impl Serialize for EditPageState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("EditPageState", 3)?;
        state.serialize_field("map", &self.map)?;
        state.serialize_field("selectedRegion", &self.selected())?;
        state.serialize_field("modal", &self.modal)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use jems_shared::{MapDocument, Region, RegionGroups};

    use super::{EditModal, EditPageState, SelectedRegion};

    fn state_with_region() -> EditPageState {
        let mut map = MapDocument::error();
        map.regions = [(
            "West".to_string(),
            vec![Region {
                region_name: "Oregon".to_string(),
                numeric_label: "4".to_string(),
                ..Region::default()
            }],
        )]
        .into_iter()
        .collect::<RegionGroups>();
        EditPageState {
            map,
            selected_region: Some(SelectedRegion {
                group_name: "West".to_string(),
                i: 0,
            }),
            modal: EditModal::None,
        }
    }

    #[test]
    fn modal_names_round_trip() {
        for modal in EditModal::ALL {
            assert_eq!(EditModal::from_name(modal.as_str()), modal);
        }
    }

    #[test]
    fn unknown_modal_names_coerce_to_none() {
        assert_eq!(EditModal::from_name("SETTINGS"), EditModal::None);
        assert_eq!(EditModal::from_name("delete"), EditModal::None);
        assert_eq!(EditModal::from_name(""), EditModal::None);
    }

    #[test]
    fn selected_reads_region_from_document() {
        let state = state_with_region();
        let view = state.selected().expect("selection should resolve");
        assert_eq!(view.group_name, "West");
        assert_eq!(view.i, 0);
        assert_eq!(view.region.region_name, "Oregon");
    }

    #[test]
    fn dangling_selection_resolves_to_none() {
        let mut state = state_with_region();
        state.selected_region = Some(SelectedRegion {
            group_name: "East".to_string(),
            i: 0,
        });
        assert!(state.selected().is_none());
    }

    #[test]
    fn serialized_state_includes_denormalized_selection() {
        let value = serde_json::to_value(state_with_region()).expect("serialize");
        assert_eq!(value["selectedRegion"]["groupName"], "West");
        assert_eq!(value["selectedRegion"]["i"], 0);
        assert_eq!(value["selectedRegion"]["region"]["regionName"], "Oregon");
        assert_eq!(value["modal"], "NONE");
        assert!(value["map"]["regions"]["West"].is_array());
    }

    #[test]
    fn default_state_has_nothing_selected() {
        let value = serde_json::to_value(EditPageState::default()).expect("serialize");
        assert!(value["selectedRegion"].is_null());
        assert_eq!(value["map"]["id"], "error");
    }
}
