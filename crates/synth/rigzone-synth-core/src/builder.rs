//! Whole-avatar synthesis: one pass from the zone snapshot to a complete
//! `FxGraph`. Single-threaded, single-pass; identical inputs in identical
//! order produce an identical graph. Nothing is committed on failure:
//! the graph is built locally and only returned on success.

use log::debug;

use rigzone_api_core::{Cond, FxGraph, Guard, MenuPath, Motion, NodePath, Transition};

use crate::baker::{bake_zone, AutoEntry, GlobalToggles, ZoneArtifacts};
use crate::coldstart::build_cold_start;
use crate::depth::attach_depth_actions;
use crate::descriptors::Zone;
use crate::error::SynthError;
use crate::exclusivity::{wire_exclusive_resets, ExclusiveTrigger};
use crate::names::NameRegistry;
use crate::rig::RigService;
use crate::skeleton::SkeletonIndex;
use crate::tournament::build_tournament;

/// Build-wide knobs. Menu layout only; behavior is not configurable.
#[derive(Clone, Debug)]
pub struct SynthOptions {
    /// Menu folder holding the per-zone toggles.
    pub menu_root: String,
    /// Subfolder holding the global mode toggles.
    pub options_folder: String,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            menu_root: "Zones".to_string(),
            options_folder: "Options".to_string(),
        }
    }
}

/// Synthesize the layered state machine for one avatar build.
pub fn synthesize(
    zones: &[Zone],
    rig: &mut dyn RigService,
    skeleton: &SkeletonIndex,
    opts: &SynthOptions,
) -> Result<FxGraph, SynthError> {
    let mut fx = FxGraph::new();
    let mut names = NameRegistry::new();
    // Zone names double as parameter names, so the fixed synthesis
    // parameters are off limits to claimants.
    for reserved in ["IsLocal", "comparison", "autoMode", "stealth", "multi"] {
        names.reserve(reserved);
    }

    let is_local = fx.new_bool("IsLocal", false);
    let menu_root = MenuPath::new(opts.menu_root.as_str());
    let options = menu_root.join(&opts.options_folder);

    let menu_zones = zones.iter().filter(|z| z.add_menu_item).count();
    let auto_zones = zones.iter().filter(|z| z.auto_eligible()).count();
    debug!(
        "synthesizing {} zones ({menu_zones} menu, {auto_zones} auto-eligible)",
        zones.len()
    );

    // Auto arbitration only makes sense with at least two contestants.
    let auto = if auto_zones >= 2 {
        let auto_on = fx.new_bool("autoMode", true);
        fx.menu.new_toggle(options.join("Auto Mode"), auto_on);
        let auto_clip = fx.new_clip("EnableAutoReceivers");

        let layer = fx.new_layer("Auto - Enable Receivers");
        let off = fx.new_state(layer, "Off");
        let on = fx.new_state(layer, "On");
        fx.state_mut(layer, on).motion = Some(Motion::Clip(auto_clip));
        let when_on = Guard::when(Cond::BoolIs(auto_on, true)).and(Cond::BoolIs(is_local, true));
        fx.state_mut(layer, off)
            .transition(Transition::when(on, when_on.clone()));
        for guard in when_on.negate() {
            fx.state_mut(layer, on)
                .transition(Transition::when(off, guard));
        }
        Some((auto_on, auto_clip))
    } else {
        None
    };

    let stealth = if menu_zones >= 1 {
        let stealth_on = fx.new_bool("stealth", true);
        fx.menu.new_toggle(options.join("Stealth Mode"), stealth_on);
        Some(stealth_on)
    } else {
        None
    };

    let multi = if menu_zones >= 2 {
        let multi_on = fx.new_bool("multi", true);
        let folder = options.join("Dual Mode");
        fx.menu.new_toggle(folder.join("Enable"), multi_on);
        fx.menu
            .new_button(folder.join("Warning: partners need ranged sensors"));
        fx.menu
            .new_button(folder.join("Warning: do not enable more than 2"));
        Some(multi_on)
    } else {
        None
    };

    let globals = GlobalToggles {
        is_local,
        stealth,
        multi,
        auto,
    };

    let mut artifacts: Vec<ZoneArtifacts> = Vec::with_capacity(zones.len());
    for zone in zones {
        let baked = bake_zone(
            &mut fx, zone, rig, skeleton, &mut names, &globals, &menu_root,
        )?;
        attach_depth_actions(&mut fx, zone, &baked.name, &baked.bake, rig, &mut names);
        artifacts.push(baked);
    }

    let triggers: Vec<ExclusiveTrigger> = artifacts
        .iter()
        .filter_map(|a| {
            Some(ExclusiveTrigger {
                enabled: a.enabled?,
                layer: a.layer?,
                on_local: a.on_local?,
            })
        })
        .collect();
    debug!("wiring exclusivity over {} zones", triggers.len());
    wire_exclusive_resets(&mut fx, &triggers);

    if let Some((auto_on, _)) = globals.auto {
        let entries: Vec<AutoEntry> = artifacts.iter().filter_map(|a| a.auto.clone()).collect();
        if entries.len() >= 2 {
            debug!("building arbitration tournament over {} zones", entries.len());
            build_tournament(&mut fx, auto_on, is_local, &entries);
        }
    }

    let suppress: Vec<NodePath> = artifacts
        .iter()
        .flat_map(|a| a.bake.receiver_nodes.iter().cloned())
        .collect();
    let force_enable: Vec<NodePath> = artifacts
        .iter()
        .filter(|a| a.enabled.is_some())
        .map(|a| a.bake.root.clone())
        .collect();
    if build_cold_start(&mut fx, &suppress, &force_enable).is_some() {
        debug!("cold-start suppression covers {} receivers", suppress.len());
    }

    Ok(fx)
}
