//! Cross-zone mutual exclusion wiring.

use rigzone_api_core::{FxGraph, LayerId, ParamId, ParamValue, StateId};

/// One exclusivity participant: a zone's enabled flag and its OnLocal
/// entry state.
#[derive(Copy, Clone, Debug)]
pub struct ExclusiveTrigger {
    pub enabled: ParamId,
    pub layer: LayerId,
    pub on_local: StateId,
}

/// For every ordered pair of exclusive zones (i, j), i != j, entering
/// zone i's OnLocal state drives zone j's enabled flag false. Activating
/// any single zone therefore clears every other stored flag within one
/// evaluation step, regardless of declaration order. O(n²) over n zones,
/// emitting exactly n·(n−1) drive actions.
pub fn wire_exclusive_resets(fx: &mut FxGraph, triggers: &[ExclusiveTrigger]) {
    for (i, trigger) in triggers.iter().enumerate() {
        for (j, other) in triggers.iter().enumerate() {
            if i == j {
                continue;
            }
            fx.state_mut(trigger.layer, trigger.on_local)
                .drive(other.enabled, ParamValue::Bool(false));
        }
    }
}
