//! Applying user interactions to the selection state.

use depriv_map_domains::DomainRegistry;
use depriv_map_filter::input::{parse_deciles, parse_percent};
use depriv_map_geography::GeoStore;
use depriv_map_index_models::{DistrictSelection, Geography, SelectionState};
use depriv_map_server_models::SelectionEvent;
use serde_json::Value;

/// Applies `event` to `state` and reports whether anything changed.
///
/// The event is applied to a copy which replaces `state` only once it is
/// complete, so a rejected click leaves no partial update behind. Every
/// panel's domain is re-validated afterwards, falling back to
/// `"combined"` where the key does not exist for the panel's geography
/// and dataset.
pub fn apply_event(
    state: &mut SelectionState,
    event: &SelectionEvent,
    store: &GeoStore,
    registry: &DomainRegistry,
) -> bool {
    let mut next = state.clone();

    match event {
        SelectionEvent::SetGeography { geography } => {
            next.geography = *geography;
            if *geography == Geography::Lad {
                next.district = None;
            }
        }
        SelectionEvent::SetDataset { dataset } => next.single.dataset = *dataset,
        SelectionEvent::SetDomain { panel, domain } => {
            next.panel_mut(*panel).domain.clone_from(domain);
        }
        SelectionEvent::SetDeciles { panel, value } => {
            next.panel_mut(*panel).deciles = parse_deciles(value);
        }
        SelectionEvent::SetPercent { panel, value } => {
            next.panel_mut(*panel).percent = parse_percent(value);
        }
        SelectionEvent::ClickFeature { location } => {
            let Some(district) = drill_down_target(&next, location, store) else {
                log::debug!("Ignoring click on {location}");
                return false;
            };
            log::info!("Drilling down into {} ({})", district.name, district.code);
            next.district = Some(district);
            next.geography = Geography::Lsoa;
        }
        SelectionEvent::ClearDistrict => next.district = None,
    }

    revalidate_domains(&mut next, registry);

    if next == *state {
        return false;
    }
    *state = next;
    true
}

/// The district a click drills into: only LAD-level clicks on a known
/// district code count.
fn drill_down_target(
    state: &SelectionState,
    location: &Value,
    store: &GeoStore,
) -> Option<DistrictSelection> {
    if state.geography != Geography::Lad {
        return None;
    }

    let code = location.as_str()?.trim().to_ascii_uppercase();
    if code.is_empty() {
        return None;
    }

    store.district(&code).map(|district| DistrictSelection {
        code: district.code.clone(),
        name: district.name.clone(),
    })
}

fn revalidate_domains(state: &mut SelectionState, registry: &DomainRegistry) {
    let geography = state.geography;
    for panel in [&mut state.single, &mut state.left, &mut state.right] {
        let valid = registry.validate_key(geography, panel.dataset, &panel.domain);
        if valid != panel.domain {
            log::debug!(
                "Domain '{}' not available for {geography}/{}, resetting",
                panel.domain,
                panel.dataset
            );
            panel.domain = valid.to_string();
        }
    }
}
