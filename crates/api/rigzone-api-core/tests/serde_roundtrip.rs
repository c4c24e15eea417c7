use rigzone_api_core::{
    Cond, CurveBinding, FxGraph, Guard, Motion, NodePath, ParamValue, Transition,
};

#[test]
fn node_paths_serialize_as_plain_strings() {
    let path = NodePath::parse("Armature/Hips/Spine").unwrap();
    let json = serde_json::to_string(&path).unwrap();
    assert_eq!(json, "\"Armature/Hips/Spine\"");
    let back: NodePath = serde_json::from_str(&json).unwrap();
    assert_eq!(back, path);

    assert!(serde_json::from_str::<NodePath>("\"a//b\"").is_err());
}

#[test]
fn graph_roundtrips_through_json() {
    let mut fx = FxGraph::new();
    let on = fx.new_bool("Plug", true);
    let depth = fx.new_float("Plug/AnimDepth", false);

    let clip = fx.new_clip("Plug (Local)");
    fx.clip_mut(clip)
        .enable(NodePath::parse("Zone_Plug/Receivers").unwrap(), true);
    fx.clip_mut(clip)
        .set_constant(CurveBinding::animator_param("comparison"), 0.0);

    let layer = fx.new_layer("Plug");
    let off = fx.new_state(layer, "Off");
    let active = fx.new_state(layer, "On");
    fx.state_mut(layer, active).motion = Some(Motion::Clip(clip));
    fx.state_mut(layer, active)
        .drive(on, ParamValue::Bool(false));
    fx.state_mut(layer, off).transition(Transition::when(
        active,
        Guard::when(Cond::BoolIs(on, true)).and(Cond::FloatAbove(depth, 0.0)),
    ));

    let json = serde_json::to_string(&fx).unwrap();
    let back: FxGraph = serde_json::from_str(&json).unwrap();
    assert_eq!(back, fx);
}
