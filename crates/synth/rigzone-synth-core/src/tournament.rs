//! Round-robin "nearest zone wins" arbitration layer.
//!
//! The machine orbits the currently-seated zone i, comparing it against
//! every challenger j in fixed ascending pair-index order. A challenger
//! whose blended distance contrast strictly exceeds the handoff threshold
//! unseats the incumbent; ties do not. After a full ring with no handoff,
//! an incumbent whose own reading has dropped to zero is cleared and the
//! machine returns to Start.

use rigzone_api_core::{
    BlendKind, BlendTree, Cond, CurveBinding, FxGraph, Guard, LayerId, Motion, ParamId,
    ParamValue, StateId, StateTag, Transition, TreeChild,
};

use crate::baker::AutoEntry;

/// Blended contrast above which the challenger is considered strictly
/// closer than the incumbent.
pub const HANDOFF_THRESHOLD: f32 = 0.51;

/// Dense index table for the tournament's per-zone and per-pair states.
/// Pair states are stored row-major with the `j == i` slot elided, so the
/// pair `(i, j)` lives at `i * (n - 1) + (j or j - 1)`; pushing in the
/// same ascending order the creation loop runs keeps every slot filled
/// and iteration reproducible.
struct PairTable {
    n: usize,
    trigger_on: Vec<StateId>,
    trigger_off: Vec<StateId>,
    comparisons: Vec<StateId>,
}

impl PairTable {
    fn new(n: usize) -> Self {
        Self {
            n,
            trigger_on: Vec::with_capacity(n),
            trigger_off: Vec::with_capacity(n),
            comparisons: Vec::with_capacity(n * (n - 1)),
        }
    }

    fn comparison(&self, i: usize, j: usize) -> StateId {
        let col = if j < i { j } else { j - 1 };
        self.comparisons[i * (self.n - 1) + col]
    }

    fn push_comparison(&mut self, state: StateId) {
        self.comparisons.push(state);
    }

    /// The first comparison slot for incumbent i: ascending j, skipping i.
    fn first_challenger(&self, i: usize) -> usize {
        if i == 0 {
            1
        } else {
            0
        }
    }
}

/// Build the arbitration layer over the auto-eligible zones. Caller
/// guarantees `entries.len() >= 2`.
pub fn build_tournament(
    fx: &mut FxGraph,
    auto_mode: ParamId,
    is_local: ParamId,
    entries: &[AutoEntry],
) -> LayerId {
    debug_assert!(entries.len() >= 2);
    let n = entries.len();

    let layer = fx.new_layer("Auto Zone Arbitration");

    // Remote replicas park here forever; only the local copy arbitrates.
    let remote_trap = fx.new_state(layer, "Remote trap");
    fx.state_mut(layer, remote_trap).tag = Some(StateTag::RemoteTrap);
    let stopped = fx.new_state(layer, "Stopped");
    fx.state_mut(layer, stopped).tag = Some(StateTag::Stopped);
    fx.state_mut(layer, remote_trap).transition(Transition::when(
        stopped,
        Guard::when(Cond::BoolIs(is_local, true)),
    ));

    let start = fx.new_state(layer, "Start");
    fx.state_mut(layer, start).tag = Some(StateTag::Start);
    fx.state_mut(layer, stopped).transition(Transition::when(
        start,
        Guard::when(Cond::BoolIs(auto_mode, true)),
    ));

    // Turning auto mode off drains through Stop, clearing every seat.
    let stop = fx.new_state(layer, "Stop");
    fx.state_mut(layer, stop).tag = Some(StateTag::Stopping);
    fx.state_mut(layer, start).transition(Transition::when(
        stop,
        Guard::when(Cond::BoolIs(auto_mode, false)),
    ));
    for entry in entries {
        fx.state_mut(layer, stop)
            .drive(entry.enabled, ParamValue::Bool(false));
    }
    fx.state_mut(layer, stop)
        .transition(Transition::when(stopped, Guard::always()));

    // Scratch clips writing the comparison output: each pairwise blend
    // mixes these two constants by the contestants' distance readings.
    let comparison = fx.new_float("comparison", false);
    let comparison_name = fx.param(comparison).name.clone();
    let vs0 = fx.new_clip("vs0");
    fx.clip_mut(vs0)
        .set_constant(CurveBinding::animator_param(&comparison_name), 0.0);
    let vs1 = fx.new_clip("vs1");
    fx.clip_mut(vs1)
        .set_constant(CurveBinding::animator_param(&comparison_name), 1.0);

    let mut table = PairTable::new(n);
    for (i, a) in entries.iter().enumerate() {
        let trigger_on = fx.new_state(layer, &format!("Start {}", a.name));
        fx.state_mut(layer, trigger_on).tag = Some(StateTag::TriggerOn(i));
        fx.state_mut(layer, trigger_on)
            .drive(a.enabled, ParamValue::Bool(true));
        table.trigger_on.push(trigger_on);

        let trigger_off = fx.new_state(layer, &format!("Stop {}", a.name));
        fx.state_mut(layer, trigger_off).tag = Some(StateTag::TriggerOff(i));
        fx.state_mut(layer, trigger_off)
            .drive(a.enabled, ParamValue::Bool(false));
        fx.state_mut(layer, trigger_off)
            .transition(Transition::when(start, Guard::always()));
        table.trigger_off.push(trigger_off);

        for (j, b) in entries.iter().enumerate() {
            if i == j {
                continue;
            }
            let vs = fx.new_state(layer, &format!("{} vs {}", a.name, b.name));
            fx.state_mut(layer, vs).tag = Some(StateTag::Comparison(i, j));
            let tree = fx.new_tree(BlendTree {
                name: format!("{} vs {}", a.name, b.name),
                kind: BlendKind::FreeformCartesian2D,
                param_x: a.distance,
                param_y: Some(b.distance),
                children: vec![
                    TreeChild {
                        motion: Motion::Clip(vs0),
                        position: [1.0, 0.0],
                    },
                    TreeChild {
                        motion: Motion::Clip(vs1),
                        position: [0.0, 1.0],
                    },
                ],
            });
            fx.state_mut(layer, vs).motion = Some(Motion::Tree(tree));
            table.push_comparison(vs);
        }
    }

    for (i, entry) in entries.iter().enumerate() {
        let first = table.comparison(i, table.first_challenger(i));
        // Ascending i order keeps Start's dispatch deterministic; when no
        // zone is seated the machine stays at Start.
        fx.state_mut(layer, start).transition(Transition::when(
            first,
            Guard::when(Cond::BoolIs(entry.enabled, true)),
        ));
        fx.state_mut(layer, table.trigger_on[i])
            .transition(Transition::when(first, Guard::always()));

        for j in 0..n {
            if i == j {
                continue;
            }
            let current = table.comparison(i, j);
            fx.state_mut(layer, current).transition(Transition::when(
                table.trigger_on[j],
                Guard::when(Cond::FloatAbove(comparison, HANDOFF_THRESHOLD)),
            ));

            let mut next_j = j + 1;
            if next_j == i {
                next_j += 1;
            }
            if next_j == n {
                // Ring complete: clear a seat whose reading has died,
                // otherwise loop and defend again.
                fx.state_mut(layer, current).transition(Transition::when(
                    table.trigger_off[i],
                    Guard::when(Cond::FloatAtMost(entry.distance, 0.0)),
                ));
                fx.state_mut(layer, current)
                    .transition(Transition::when(start, Guard::always()));
            } else {
                fx.state_mut(layer, current).transition(Transition::when(
                    table.comparison(i, next_j),
                    Guard::always(),
                ));
            }
        }
    }

    layer
}
