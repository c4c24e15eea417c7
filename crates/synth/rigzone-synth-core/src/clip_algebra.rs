//! Keyframe-track merge/split/classification primitives.
//!
//! These operate purely on the api clip model; nothing here touches the
//! rig or the state-machine sink.

use rigzone_api_core::{Clip, CurveBinding, Keyframe, ObjectKeyframe};

use crate::error::SynthError;
use crate::skeleton::NodeScope;

/// Externally-supplied default values for properties a merge source does
/// not animate. A binding with no default available is skipped entirely.
pub trait BindingDefaults {
    fn float_default(&self, binding: &CurveBinding) -> Option<f32>;
    fn object_default(&self, binding: &CurveBinding) -> Option<String>;
}

fn distinct_bindings<'a>(bindings: impl Iterator<Item = &'a CurveBinding>) -> Vec<CurveBinding> {
    let mut out: Vec<CurveBinding> = Vec::new();
    for b in bindings {
        if !out.contains(b) {
            out.push(b.clone());
        }
    }
    out
}

/// Merge single-frame source clips onto `target`, one keyframe per source
/// at the source's assigned time.
///
/// Every animated property appearing in any source must be animated by
/// each source with exactly 0 or 1 keyframes; 0 keyframes falls back to
/// the property's default value. A source with more than one keyframe for
/// a property is malformed and aborts the merge.
pub fn merge_single_frame(
    target: &mut Clip,
    sources: &[(f32, &Clip)],
    defaults: &dyn BindingDefaults,
) -> Result<(), SynthError> {
    let float_bindings = distinct_bindings(
        sources
            .iter()
            .flat_map(|(_, clip)| clip.float_curves.iter().map(|(b, _)| b)),
    );
    for binding in float_bindings {
        let default = match defaults.float_default(&binding) {
            Some(v) => v,
            None => continue,
        };
        let mut out = Vec::with_capacity(sources.len());
        for (time, clip) in sources {
            match clip.float_curve(&binding) {
                Some([key]) => out.push(Keyframe::new(*time, key.value)),
                None | Some([]) => out.push(Keyframe::new(*time, default)),
                Some(keys) => {
                    return Err(SynthError::MalformedSourceClip {
                        binding: format!("{}.{}", binding.path, binding.property),
                        count: keys.len(),
                    })
                }
            }
        }
        target.set_curve(binding, out);
    }

    let object_bindings = distinct_bindings(
        sources
            .iter()
            .flat_map(|(_, clip)| clip.object_curves.iter().map(|(b, _)| b)),
    );
    for binding in object_bindings {
        let default = match defaults.object_default(&binding) {
            Some(v) => v,
            None => continue,
        };
        let mut out = Vec::with_capacity(sources.len());
        for (time, clip) in sources {
            match clip.object_curve(&binding) {
                Some([key]) => out.push(ObjectKeyframe {
                    time: *time,
                    value: key.value.clone(),
                }),
                None | Some([]) => out.push(ObjectKeyframe {
                    time: *time,
                    value: default.clone(),
                }),
                Some(keys) => {
                    return Err(SynthError::MalformedSourceClip {
                        binding: format!("{}.{}", binding.path, binding.property),
                        count: keys.len(),
                    })
                }
            }
        }
        target.set_object_curve(binding, out);
    }
    Ok(())
}

/// Split a clip whose keyframes occupy exactly two distinct times, one of
/// them zero, into a (start, end) pair of single-keyframe clips. Returns
/// None when the clip is not shaped like a two-point range.
pub fn split_range(clip: &Clip) -> Option<(Clip, Clip)> {
    let times = clip.key_times();
    if times.len() != 2 || times[0] != 0.0 {
        return None;
    }

    let mut start = Clip::new(format!("{} (start)", clip.name));
    let mut end = Clip::new(format!("{} (end)", clip.name));
    for (binding, keys) in &clip.float_curves {
        for key in keys {
            let dest = if key.time == 0.0 { &mut start } else { &mut end };
            dest.set_constant(binding.clone(), key.value);
        }
    }
    for (binding, keys) in &clip.object_curves {
        for key in keys {
            let dest = if key.time == 0.0 { &mut start } else { &mut end };
            dest.set_object_curve(
                binding.clone(),
                vec![ObjectKeyframe {
                    time: 0.0,
                    value: key.value.clone(),
                }],
            );
        }
    }
    Some((start, end))
}

/// True when the clip holds a single pose: for every animated property,
/// all keyframes sit at time zero or all share one identical value, and
/// nothing is a pass-through binding.
pub fn is_static(clip: &Clip) -> bool {
    for (binding, keys) in &clip.float_curves {
        if binding.is_proxy() {
            return false;
        }
        let all_at_zero = keys.iter().all(|k| k.time == 0.0);
        let one_value = keys.windows(2).all(|w| w[0].value == w[1].value);
        if !all_at_zero && !one_value {
            return false;
        }
    }
    for (binding, keys) in &clip.object_curves {
        if binding.is_proxy() {
            return false;
        }
        let all_at_zero = keys.iter().all(|k| k.time == 0.0);
        let one_value = keys.windows(2).all(|w| w[0].value == w[1].value);
        if !all_at_zero && !one_value {
            return false;
        }
    }
    true
}

/// True when the clip animates nothing that exists under `scope` and has
/// no pass-through bindings; such a clip is a no-op on this rig.
pub fn is_empty_motion(clip: &Clip, scope: &dyn NodeScope) -> bool {
    if clip.bindings().any(CurveBinding::is_proxy) {
        return false;
    }
    for binding in clip.bindings() {
        if scope.contains(&binding.path) {
            return false;
        }
    }
    true
}
