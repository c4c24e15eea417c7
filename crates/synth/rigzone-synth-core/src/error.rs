//! Errors produced during synthesis. All of these abort the current build;
//! none are transient, so there is no retry path.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    /// A single-frame merge source contributed more than one keyframe for
    /// one property.
    #[error("source clip has {count} keyframes for '{binding}'; single-frame merge requires exactly 0 or 1")]
    MalformedSourceClip { binding: String, count: usize },

    /// Per-zone resource instantiation failed (unresolvable placement,
    /// missing geometry, rig service failure).
    #[error("failed to bake zone '{zone}': {reason}")]
    ZoneBakeFailure { zone: String, reason: String },

    /// The skeleton index found more than one plausible node for a name.
    #[error("found {candidates} possible matching '{name}' nodes on the rig")]
    AmbiguousNodeResolution { name: String, candidates: usize },
}
