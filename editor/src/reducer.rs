use std::sync::Arc;

use jems_shared::{
    ColorLegend, DEFAULT_HUE, MapDocument, Region, build_choropleth_items,
    compute_global_numeric_range, parse_color,
};
use tracing::{debug, warn};

use crate::action::EditAction;
use crate::state::{EditModal, EditPageState, SelectedRegion};

/// Apply one action to the edit page state.
///
/// Transitions never mutate `state`; they return a new state that shares
/// untouched region groups with it. Rejected and unknown actions return
/// `state` itself, so callers can detect a no-op with [`Arc::ptr_eq`].
pub fn edit_reducer(state: Arc<EditPageState>, action: EditAction) -> Arc<EditPageState> {
    match action {
        EditAction::InitMap { map } => {
            let map = prepare_loaded_map(map.unwrap_or_else(MapDocument::error));
            with_map(&state, map)
        }
        EditAction::ChangeModal { modal } => change_modal(state, &modal),
        EditAction::UpdateMap { map } => with_map(&state, map.unwrap_or_else(MapDocument::error)),
        EditAction::SelectRegion { group_name, i } => select_region(state, group_name, i),
        EditAction::UpdateSelectedRegionInfo {
            group_name,
            region,
            hue,
        } => update_selected_region_info(state, group_name, region, hue),
        EditAction::UpdateColorLegend { color_legend } => update_color_legend(&state, color_legend),
        EditAction::UpdateChoroplethLegend { hue } => update_choropleth_legend(state, hue),
        EditAction::Unknown => state,
    }
}

/// Normalize a document coming from the loader: drop empty groups and
/// derive legend items when the document arrives without them.
pub fn prepare_loaded_map(mut map: MapDocument) -> MapDocument {
    let pruned = map.regions.prune_empty();
    if pruned > 0 {
        debug!(pruned, map_id = %map.id, "dropped empty region groups from loaded map");
    }

    let legend = &mut map.legend.choropleth_legend;
    if legend.items.is_empty() {
        match build_choropleth_items(&legend.hue, legend.min, legend.max) {
            Ok(items) => legend.items = items,
            Err(e) => {
                warn!(error = %e, "loaded map has an unusable hue, using {DEFAULT_HUE}");
                legend.hue = DEFAULT_HUE.to_string();
                legend.items =
                    build_choropleth_items(DEFAULT_HUE, legend.min, legend.max).unwrap_or_default();
            }
        }
    }
    map
}

fn with_map(state: &EditPageState, map: MapDocument) -> Arc<EditPageState> {
    Arc::new(EditPageState {
        map,
        selected_region: state.selected_region.clone(),
        modal: state.modal,
    })
}

fn change_modal(state: Arc<EditPageState>, requested: &str) -> Arc<EditPageState> {
    let modal = EditModal::from_name(requested);
    if modal == EditModal::None && requested != EditModal::None.as_str() {
        debug!(requested, "unknown modal requested, closing modals");
    }
    if modal == state.modal {
        return state;
    }
    Arc::new(EditPageState {
        map: state.map.clone(),
        selected_region: state.selected_region.clone(),
        modal,
    })
}

fn select_region(state: Arc<EditPageState>, group_name: String, i: usize) -> Arc<EditPageState> {
    if state.map.regions.get(&group_name, i).is_none() {
        warn!(group = %group_name, i, "ignoring selection of a region that does not exist");
        return state;
    }
    Arc::new(EditPageState {
        map: state.map.clone(),
        selected_region: Some(SelectedRegion { group_name, i }),
        modal: state.modal,
    })
}

fn update_selected_region_info(
    state: Arc<EditPageState>,
    new_group: String,
    region: Region,
    hue: String,
) -> Arc<EditPageState> {
    let Some(selected) = state.selected_region.as_ref() else {
        warn!("update_selected_region_info dispatched without a selected region");
        return state;
    };
    let old_group = selected.group_name.as_str();
    if state.map.regions.get(old_group, selected.i).is_none() {
        warn!(group = %old_group, i = selected.i, "selected region no longer exists");
        return state;
    }
    if new_group.is_empty() {
        warn!(from = %old_group, "moving region into a group with an empty name");
    }

    let mut map = state.map.clone();
    let creates_group = !map.regions.contains_group(&new_group);
    let Some(i) = map
        .regions
        .move_region(old_group, selected.i, &new_group, region)
    else {
        return state;
    };
    if old_group != new_group {
        if creates_group {
            debug!(group = %new_group, "created region group");
        }
        if !map.regions.contains_group(old_group) {
            debug!(group = %old_group, "removed empty region group");
        }
    }

    let legend = &mut map.legend.choropleth_legend;
    let range = compute_global_numeric_range(&map.regions).or(legend.min, legend.max);
    legend.min = range.min;
    legend.max = range.max;

    let hue = if parse_color(&hue).is_some() {
        hue
    } else {
        warn!(hue = %hue, "ignoring unusable hue in region update");
        legend.hue.clone()
    };
    match build_choropleth_items(&hue, range.min, range.max) {
        Ok(items) => {
            legend.hue = hue;
            legend.items = items;
        }
        Err(e) => warn!(error = %e, "keeping previous legend items"),
    }

    Arc::new(EditPageState {
        map,
        selected_region: Some(SelectedRegion {
            group_name: new_group,
            i,
        }),
        modal: state.modal,
    })
}

fn update_color_legend(state: &EditPageState, color_legend: ColorLegend) -> Arc<EditPageState> {
    let mut map = state.map.clone();
    map.legend.color_legend = color_legend;
    with_map(state, map)
}

fn update_choropleth_legend(state: Arc<EditPageState>, hue: String) -> Arc<EditPageState> {
    let legend = &state.map.legend.choropleth_legend;
    let items = match build_choropleth_items(&hue, legend.min, legend.max) {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "ignoring choropleth legend update");
            return state;
        }
    };
    let mut map = state.map.clone();
    map.legend.choropleth_legend.hue = hue;
    map.legend.choropleth_legend.items = items;
    with_map(&state, map)
}
