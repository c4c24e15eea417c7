//! Per-zone resource instantiation: sensors, clips, the synced enabled
//! parameter, the menu toggle and the per-zone visibility layer.

use rigzone_api_core::{
    ClipId, Cond, FxGraph, Guard, LayerId, MenuPath, Motion, ParamId, StateId,
};

use crate::descriptors::{Placement, Zone};
use crate::error::SynthError;
use crate::names::NameRegistry;
use crate::rig::{BakeRoot, ReceiverKind, ReceiverSpec, RigService};
use crate::skeleton::SkeletonIndex;

/// Build-wide parameters shared by every zone layer.
#[derive(Clone, Debug)]
pub struct GlobalToggles {
    /// True only on the viewpoint owner's copy of the machine.
    pub is_local: ParamId,
    pub stealth: Option<ParamId>,
    pub multi: Option<ParamId>,
    /// Auto-mode flag and the clip that turns distance receivers on,
    /// present only when auto arbitration is being built.
    pub auto: Option<(ParamId, ClipId)>,
}

/// One auto-eligible zone's handles into the arbitration tournament.
#[derive(Clone, Debug)]
pub struct AutoEntry {
    pub name: String,
    pub enabled: ParamId,
    pub distance: ParamId,
}

/// Everything later passes need from one baked zone.
#[derive(Debug)]
pub struct ZoneArtifacts {
    pub name: String,
    pub bake: BakeRoot,
    /// Present only for menu-exposed zones.
    pub enabled: Option<ParamId>,
    pub layer: Option<LayerId>,
    pub on_local: Option<StateId>,
    pub auto: Option<AutoEntry>,
}

/// Bake one zone in declaration order. Claims a disambiguated name,
/// instantiates sensors through the rig service, and (for menu-exposed
/// zones) emits the Local/Remote/Stealth clips and the five-state
/// visibility layer with its priority cascade.
pub fn bake_zone(
    fx: &mut FxGraph,
    zone: &Zone,
    rig: &mut dyn RigService,
    skeleton: &SkeletonIndex,
    names: &mut NameRegistry,
    globals: &GlobalToggles,
    menu_root: &MenuPath,
) -> Result<ZoneArtifacts, SynthError> {
    let name = names.claim(&zone.name);

    let placement = match &zone.placement {
        Placement::Node(path) => path.clone(),
        Placement::Bone(bone) => {
            skeleton
                .resolve(bone)?
                .ok_or_else(|| SynthError::ZoneBakeFailure {
                    zone: name.clone(),
                    reason: format!("placement bone '{bone}' not found on the rig"),
                })?
        }
    };

    let bake = rig.bake_zone(zone, &name, &placement)?;

    let mut artifacts = ZoneArtifacts {
        name: name.clone(),
        bake,
        enabled: None,
        layer: None,
        on_local: None,
        auto: None,
    };
    if !zone.add_menu_item {
        return Ok(artifacts);
    }

    // The zone root must stay on so the layer alone decides visibility;
    // the cold-start pass re-asserts this against stale user toggles.
    rig.set_initial_active(&artifacts.bake.root, true);
    for group in artifacts.bake.groups().cloned().collect::<Vec<_>>() {
        rig.set_initial_active(&group, false);
    }

    let local_clip = fx.new_clip(&format!("{name} (Local)"));
    for path in [
        artifacts.bake.emitters.clone(),
        artifacts.bake.receivers.clone(),
        artifacts.bake.visuals.clone(),
        artifacts.bake.local_marker.clone(),
    ]
    .into_iter()
    .flatten()
    {
        fx.clip_mut(local_clip).enable(path, true);
    }

    let remote_clip = fx.new_clip(&format!("{name} (Remote)"));
    for path in [
        artifacts.bake.emitters.clone(),
        artifacts.bake.visuals.clone(),
        artifacts.bake.beacon.clone(),
    ]
    .into_iter()
    .flatten()
    {
        fx.clip_mut(remote_clip).enable(path, true);
    }

    let stealth_clip = fx.new_clip(&format!("{name} (Stealth)"));
    for path in [
        artifacts.bake.receivers.clone(),
        artifacts.bake.local_marker.clone(),
    ]
    .into_iter()
    .flatten()
    {
        fx.clip_mut(stealth_clip).enable(path, true);
    }

    let enabled = fx.new_bool(&name, true);
    fx.menu.new_toggle(menu_root.join(&name), enabled);

    let layer = fx.new_layer(&name);
    let off = fx.new_state(layer, "Off");
    let on_stealth = fx.new_state(layer, "On Local Stealth");
    fx.state_mut(layer, on_stealth).motion = Some(Motion::Clip(stealth_clip));
    let on_local_multi = fx.new_state(layer, "On Local Multi");
    fx.state_mut(layer, on_local_multi).motion = Some(Motion::Clip(local_clip));
    let on_local = fx.new_state(layer, "On Local");
    fx.state_mut(layer, on_local).motion = Some(Motion::Clip(local_clip));
    let on_remote = fx.new_state(layer, "On Remote");
    fx.state_mut(layer, on_remote).motion = Some(Motion::Clip(remote_clip));

    let when_on = Cond::BoolIs(enabled, true);
    let when_local = Cond::BoolIs(globals.is_local, true);

    // Priority cascade, first satisfied guard wins, Off is the fallback.
    let stealth_guard = match globals.stealth {
        Some(p) => Guard::when(when_on)
            .and(when_local)
            .and(Cond::BoolIs(p, true)),
        None => Guard::never(),
    };
    let multi_guard = match globals.multi {
        Some(p) => Guard::when(when_on)
            .and(when_local)
            .and(Cond::BoolIs(p, true)),
        None => Guard::never(),
    };
    let remote_guard = match globals.stealth {
        Some(p) => Guard::when(when_on).and(Cond::BoolIs(p, false)),
        None => Guard::when(when_on),
    };
    fx.layer_mut(layer).dispatch = vec![
        (stealth_guard, on_stealth),
        (multi_guard, on_local_multi),
        (Guard::when(when_on).and(when_local), on_local),
        (remote_guard, on_remote),
        (Guard::always(), off),
    ];

    artifacts.enabled = Some(enabled);
    artifacts.layer = Some(layer);
    artifacts.on_local = Some(on_local);

    if zone.enable_auto {
        if let Some((_, auto_clip)) = globals.auto {
            // Derived names are claimed too; an authored zone name could
            // shadow them otherwise.
            let distance_name = names.claim(&format!("{name}/AutoDistance"));
            let distance = fx.new_float(&distance_name, false);
            let receiver = rig.add_receiver(
                &artifacts.bake,
                &ReceiverSpec {
                    offset: 0.0,
                    param: &distance_name,
                    label: "AutoDistance",
                    radius: 0.3,
                    allow_self: false,
                    kind: ReceiverKind::Proximity,
                },
            );
            rig.set_initial_active(&receiver, false);
            fx.clip_mut(auto_clip).enable(receiver, true);
            artifacts.auto = Some(AutoEntry {
                name,
                enabled,
                distance,
            });
        }
    }

    Ok(artifacts)
}
