//! Placement/instantiation service boundary.
//!
//! Sensor sub-objects, geometry and asset writes are the rig service's
//! business; synthesis only needs the node paths it hands back. The
//! service is assumed synchronous and deterministic for a given snapshot.

use rigzone_api_core::NodePath;

use crate::descriptors::Zone;
use crate::error::SynthError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReceiverKind {
    /// Continuous 0..1 reading over the receiver's radius.
    Proximity,
    /// Boolean contact reading.
    Constant,
}

/// Request for one proximity receiver under a zone's bake root.
#[derive(Clone, Debug)]
pub struct ReceiverSpec<'a> {
    /// Offset along the zone's sensed axis, in normalized depth units.
    pub offset: f32,
    /// Animator parameter the receiver writes.
    pub param: &'a str,
    /// Node label under the bake root.
    pub label: &'a str,
    pub radius: f32,
    pub allow_self: bool,
    pub kind: ReceiverKind,
}

/// Instantiated per-zone scene structure, reported back by the service.
/// Group paths are None when the zone kind does not produce that group.
#[derive(Clone, Debug, Default)]
pub struct BakeRoot {
    pub root: NodePath,
    /// Short-range contact emitters.
    pub emitters: Option<NodePath>,
    /// Contact receivers (the local sensing side).
    pub receivers: Option<NodePath>,
    /// Visual markers shown to other viewers.
    pub visuals: Option<NodePath>,
    /// Marker advertising local-capable sensing.
    pub local_marker: Option<NodePath>,
    /// Long-range beacon advertised to remote viewers.
    pub beacon: Option<NodePath>,
    /// Individual receiver nodes needing cold-start suppression.
    pub receiver_nodes: Vec<NodePath>,
}

impl BakeRoot {
    /// Present groups in a fixed order, for deactivate-then-animate wiring.
    pub fn groups(&self) -> impl Iterator<Item = &NodePath> {
        [
            self.emitters.as_ref(),
            self.receivers.as_ref(),
            self.visuals.as_ref(),
            self.local_marker.as_ref(),
            self.beacon.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// Opaque skeleton/placement collaborator. Implementations own scene
/// mutation and may fail; failures abort the zone bake.
pub trait RigService {
    /// Instantiate sensor sub-objects for `zone` at `placement`.
    fn bake_zone(
        &mut self,
        zone: &Zone,
        name: &str,
        placement: &NodePath,
    ) -> Result<BakeRoot, SynthError>;

    /// Create a receiver node under the bake root; returns its path.
    fn add_receiver(&mut self, root: &BakeRoot, spec: &ReceiverSpec<'_>) -> NodePath;

    /// Set the initial (scene-load) active flag on an instantiated node.
    fn set_initial_active(&mut self, path: &NodePath, active: bool);
}
