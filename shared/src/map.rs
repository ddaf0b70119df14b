use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::legend::{ChoroplethItems, build_choropleth_items};

/// Hue used by the fallback document when nothing better is configured.
pub const DEFAULT_HUE: &str = "#3b82f6";

/// How regions are colored when the map is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorType {
    #[default]
    None,
    Choropleth,
    Color,
}

/// A geographic feature reference with its user-editable attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub string_label: String,
    /// Kept as text so empty and non-numeric values survive round trips.
    #[serde(default)]
    pub numeric_label: String,
    #[serde(default)]
    pub numeric_unit: String,
    #[serde(default)]
    pub color: String,
}

impl Region {
    /// Numeric label as a finite number, if it parses.
    ///
    /// Empty and whitespace-only labels never parse.
    pub fn numeric_value(&self) -> Option<f64> {
        let label = self.numeric_label.trim();
        if label.is_empty() {
            return None;
        }
        label.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

/// Group name -> ordered regions. Groups are shared between document
/// revisions until a transition touches them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionGroups(HashMap<String, Arc<Vec<Region>>>);

impl RegionGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.0.contains_key(group)
    }

    pub fn group(&self, group: &str) -> Option<&[Region]> {
        self.0.get(group).map(|regions| regions.as_slice())
    }

    /// The shared storage behind a group. Revisions that leave a group
    /// untouched hand out the same handle.
    pub fn group_handle(&self, group: &str) -> Option<&Arc<Vec<Region>>> {
        self.0.get(group)
    }

    pub fn get(&self, group: &str, i: usize) -> Option<&Region> {
        self.0.get(group).and_then(|regions| regions.get(i))
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &[Region])> {
        self.0
            .iter()
            .map(|(name, regions)| (name.as_str(), regions.as_slice()))
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.0.values().flat_map(|regions| regions.iter())
    }

    pub fn total_regions(&self) -> usize {
        self.0.values().map(|regions| regions.len()).sum()
    }

    /// Append a region to a group, creating the group if needed.
    /// Returns the region's index within the group.
    pub fn push(&mut self, group: impl Into<String>, region: Region) -> usize {
        let regions = Arc::make_mut(self.0.entry(group.into()).or_default());
        regions.push(region);
        regions.len() - 1
    }

    /// Overwrite the region at `(group, i)`. Returns false if there is none.
    pub fn replace(&mut self, group: &str, i: usize, region: Region) -> bool {
        let Some(regions) = self.0.get_mut(group) else {
            return false;
        };
        if i >= regions.len() {
            return false;
        }
        Arc::make_mut(regions)[i] = region;
        true
    }

    /// Move the region at `(from, i)` to the end of `to`, replacing its
    /// contents with `region`. A group emptied by the move is removed.
    ///
    /// Returns the region's new index in `to`, or `None` if `(from, i)`
    /// does not exist. Moving within the same group is an in-place replace.
    pub fn move_region(&mut self, from: &str, i: usize, to: &str, region: Region) -> Option<usize> {
        if from == to {
            return self.replace(from, i, region).then_some(i);
        }
        let source = self.0.get_mut(from)?;
        if i >= source.len() {
            return None;
        }
        Arc::make_mut(source).remove(i);
        if source.is_empty() {
            self.0.remove(from);
        }
        Some(self.push(to, region))
    }

    /// Drop groups that hold no regions. Returns how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.0.len();
        self.0.retain(|_, regions| !regions.is_empty());
        before - self.0.len()
    }
}

impl FromIterator<(String, Vec<Region>)> for RegionGroups {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Region>)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, regions)| (name, Arc::new(regions)))
                .collect(),
        )
    }
}

/// Graduated legend derived from the regions' numeric labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethLegend {
    pub hue: String,
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub items: ChoroplethItems,
}

/// Fixed color assignments. The editing core never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorLegend(pub serde_json::Map<String, serde_json::Value>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Legend {
    pub choropleth_legend: ChoroplethLegend,
    #[serde(default)]
    pub color_legend: ColorLegend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub color_type: ColorType,
    #[serde(default)]
    pub display_legend: bool,
    #[serde(default)]
    pub display_numerics: bool,
    #[serde(default)]
    pub display_strings: bool,
    pub legend: Legend,
    #[serde(default)]
    pub regions: RegionGroups,
}

impl MapDocument {
    /// Placeholder shown until a real document loads, using `hue` for its
    /// legend. An unparsable hue falls back to [`DEFAULT_HUE`].
    pub fn error_with_hue(hue: &str) -> Self {
        let (hue, items) = match build_choropleth_items(hue, 0.0, 0.0) {
            Ok(items) => (hue.to_string(), items),
            Err(_) => (
                DEFAULT_HUE.to_string(),
                build_choropleth_items(DEFAULT_HUE, 0.0, 0.0).unwrap_or_default(),
            ),
        };
        Self {
            id: "error".to_string(),
            name: "Error".to_string(),
            description: "The map could not be loaded.".to_string(),
            is_public: false,
            color_type: ColorType::None,
            display_legend: false,
            display_numerics: false,
            display_strings: false,
            legend: Legend {
                choropleth_legend: ChoroplethLegend {
                    hue,
                    min: 0.0,
                    max: 0.0,
                    items,
                },
                color_legend: ColorLegend::default(),
            },
            regions: RegionGroups::new(),
        }
    }

    pub fn error() -> Self {
        Self::error_with_hue(DEFAULT_HUE)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ColorType, MapDocument, Region, RegionGroups};

    fn region(name: &str, numeric: &str) -> Region {
        Region {
            region_name: name.to_string(),
            numeric_label: numeric.to_string(),
            ..Region::default()
        }
    }

    fn groups() -> RegionGroups {
        [
            ("A".to_string(), vec![region("a0", "1")]),
            (
                "B".to_string(),
                vec![region("b0", "2"), region("b1", "3")],
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn numeric_value_skips_empty_and_garbage() {
        assert_eq!(region("x", "").numeric_value(), None);
        assert_eq!(region("x", "   ").numeric_value(), None);
        assert_eq!(region("x", "abc").numeric_value(), None);
        assert_eq!(region("x", "inf").numeric_value(), None);
        assert_eq!(region("x", "NaN").numeric_value(), None);
        assert_eq!(region("x", " 12.5 ").numeric_value(), Some(12.5));
        assert_eq!(region("x", "-3").numeric_value(), Some(-3.0));
    }

    #[test]
    fn move_region_into_existing_group_appends() {
        let mut g = groups();
        let moved = region("a0", "9");
        let i = g.move_region("A", 0, "B", moved.clone()).expect("source exists");
        assert_eq!(i, 2);
        assert!(!g.contains_group("A"));
        assert_eq!(g.get("B", 2), Some(&moved));
        assert_eq!(g.total_regions(), 3);
    }

    #[test]
    fn move_region_into_new_group_creates_it() {
        let mut g = groups();
        let i = g
            .move_region("B", 0, "C", region("b0", "2"))
            .expect("source exists");
        assert_eq!(i, 0);
        assert_eq!(g.group("C").map(<[Region]>::len), Some(1));
        assert_eq!(g.group("B").map(<[Region]>::len), Some(1));
        assert_eq!(g.get("B", 0).map(|r| r.region_name.as_str()), Some("b1"));
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn move_region_within_group_replaces_in_place() {
        let mut g = groups();
        let i = g
            .move_region("B", 1, "B", region("renamed", "4"))
            .expect("source exists");
        assert_eq!(i, 1);
        assert_eq!(
            g.get("B", 1).map(|r| r.region_name.as_str()),
            Some("renamed")
        );
    }

    #[test]
    fn move_region_rejects_missing_source() {
        let mut g = groups();
        assert_eq!(g.move_region("A", 5, "B", Region::default()), None);
        assert_eq!(g.move_region("Z", 0, "B", Region::default()), None);
        assert_eq!(g, groups());
    }

    #[test]
    fn untouched_groups_stay_shared_after_clone_and_edit() {
        let before = groups();
        let mut after = before.clone();
        after.replace("B", 0, region("edited", "7"));
        let a_before = before.group_handle("A").expect("A");
        let a_after = after.group_handle("A").expect("A");
        assert!(Arc::ptr_eq(a_before, a_after));
        let b_before = before.group_handle("B").expect("B");
        let b_after = after.group_handle("B").expect("B");
        assert!(!Arc::ptr_eq(b_before, b_after));
        assert_eq!(before.get("B", 0).map(|r| r.region_name.as_str()), Some("b0"));
    }

    #[test]
    fn prune_empty_drops_only_empty_groups() {
        let mut g: RegionGroups = [
            ("A".to_string(), vec![]),
            ("B".to_string(), vec![region("b0", "")]),
        ]
        .into_iter()
        .collect();
        assert_eq!(g.prune_empty(), 1);
        assert!(!g.contains_group("A"));
        assert!(g.contains_group("B"));
    }

    #[test]
    fn document_deserializes_with_missing_items_and_regions() {
        let json = r##"{
            "id": "m1",
            "name": "Lunch spots",
            "colorType": "CHOROPLETH",
            "legend": {
                "choroplethLegend": { "hue": "#ff0000", "min": 1, "max": 4 }
            }
        }"##;
        let doc: MapDocument = serde_json::from_str(json).expect("document should parse");
        assert_eq!(doc.color_type, ColorType::Choropleth);
        assert!(doc.regions.is_empty());
        assert!(doc.legend.choropleth_legend.items.is_empty());
        assert!(doc.legend.color_legend.0.is_empty());
    }

    #[test]
    fn region_serializes_camel_case() {
        let value = serde_json::to_value(region("Ohio", "12")).expect("serialize");
        assert_eq!(value["regionName"], "Ohio");
        assert_eq!(value["numericLabel"], "12");
        assert!(value.get("numericUnit").is_some());
    }

    #[test]
    fn error_document_has_valid_legend() {
        let doc = MapDocument::error();
        assert_eq!(doc.id, "error");
        assert!(doc.regions.is_empty());
        let items = &doc.legend.choropleth_legend.items;
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn error_document_rejects_bad_hue() {
        let doc = MapDocument::error_with_hue("definitely not a color");
        assert_eq!(doc.legend.choropleth_legend.hue, super::DEFAULT_HUE);
    }
}
