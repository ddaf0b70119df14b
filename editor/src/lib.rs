pub mod action;
pub mod config;
pub mod reducer;
pub mod replay;
pub mod state;
pub mod store;

pub use action::EditAction;
pub use reducer::{edit_reducer, prepare_loaded_map};
pub use replay::{apply_line, render_state, replay};
pub use state::{EditModal, EditPageState, SelectedRegion, SelectedRegionView};
pub use store::EditStore;
