use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, warn};

use crate::action::EditAction;
use crate::state::EditPageState;
use crate::store::EditStore;

/// Dispatch one JSON-encoded action. Blank lines are ignored; malformed
/// lines are logged and skipped. Returns whether an action was dispatched.
pub fn apply_line(store: &EditStore, line_no: usize, line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    match serde_json::from_str::<EditAction>(line) {
        Ok(action) => {
            store.dispatch(action);
            true
        }
        Err(e) => {
            warn!(error = %e, line = line_no, "skipping malformed action");
            false
        }
    }
}

/// Replay every line of `reader` into `store`, one action per line.
/// Returns how many actions were dispatched.
pub async fn replay<R: AsyncBufRead + Unpin>(store: &EditStore, reader: R) -> usize {
    let mut lines = reader.lines();
    let mut line_no = 0usize;
    let mut applied = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read actions");
                break;
            }
        };
        line_no += 1;
        if apply_line(store, line_no, &line) {
            applied += 1;
        }
        // Let subscribers see this revision before the next one lands.
        tokio::task::yield_now().await;
    }
    applied
}

pub fn render_state(state: &EditPageState, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    }
}

#[cfg(test)]
mod tests {
    use jems_shared::{MapDocument, Region, RegionGroups};

    use super::{apply_line, render_state, replay};
    use crate::config::{PRETTY_OUTPUT_ENV, pretty_output};
    use crate::state::{EditModal, EditPageState};
    use crate::store::EditStore;

    fn store_with_region() -> EditStore {
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
        EditStore::with_state(EditPageState::new(map))
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        let store = store_with_region();
        let before = store.state();
        assert!(!apply_line(&store, 1, "   "));
        assert!(!apply_line(&store, 2, "{\"type\":"));
        assert!(std::sync::Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn unknown_actions_count_as_dispatched() {
        let store = store_with_region();
        assert!(apply_line(&store, 1, r#"{"type":"publish_map"}"#));
        assert_eq!(store.state().modal, EditModal::None);
    }

    #[tokio::test]
    async fn replay_applies_valid_lines_in_order() {
        let store = store_with_region();
        let input = concat!(
            "{\"type\":\"select_region\",\"groupName\":\"West\",\"i\":0}\n",
            "not json at all\n",
            "\n",
            "{\"type\":\"change_modal\",\"modal\":\"DELETE\"}\n",
        );
        let applied = replay(&store, input.as_bytes()).await;
        assert_eq!(applied, 2);

        let state = store.state();
        assert_eq!(state.modal, EditModal::Delete);
        let view = state.selected().expect("region selected");
        assert_eq!(view.region.region_name, "Oregon");
    }

    #[tokio::test]
    async fn replay_of_empty_input_applies_nothing() {
        let store = store_with_region();
        assert_eq!(replay(&store, &b""[..]).await, 0);
    }

    #[test]
    fn render_state_follows_pretty_setting() {
        let store = store_with_region();
        apply_line(&store, 1, r#"{"type":"change_modal","modal":"DOWNLOAD"}"#);
        let state = store.state();

        let compact = temp_env::with_var_unset(PRETTY_OUTPUT_ENV, || {
            render_state(&state, pretty_output()).expect("serialize")
        });
        assert!(!compact.contains('\n'));

        let pretty = temp_env::with_var(PRETTY_OUTPUT_ENV, Some("1"), || {
            render_state(&state, pretty_output()).expect("serialize")
        });
        assert!(pretty.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&pretty).expect("valid json");
        assert_eq!(parsed["modal"], "DOWNLOAD");
        assert_eq!(parsed, serde_json::from_str::<serde_json::Value>(&compact).expect("valid json"));
    }
}
