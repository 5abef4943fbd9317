//! Integration tests for keyframe sampling
//!
//! These tests verify that:
//! - Sampling clamps before the first and after the last keyframe
//! - Linear segments interpolate exactly
//! - Bezier easing meets its endpoints
//! - Empty properties fall back to their default value
//! - Sampling is pure

use kinema_animation::{evaluate, AnimatedProperty, AnimationClip, Easing, LoopMode, Playhead};

fn two_keyframes(easing: Easing) -> AnimatedProperty {
    let mut property = AnimatedProperty::new(-1.0);
    property.insert(500.0, 10.0, Easing::Linear).unwrap();
    property.insert(100.0, 0.0, easing).unwrap();
    property
}

#[test]
fn test_boundary_clamp() {
    let property = two_keyframes(Easing::EaseInOut);
    assert_eq!(evaluate(&property, 0.0), 0.0);
    assert_eq!(evaluate(&property, 1000.0), 10.0);
    assert_eq!(evaluate(&property, 100.0), 0.0);
    assert_eq!(evaluate(&property, 500.0), 10.0);
}

#[test]
fn test_linear_midpoint_is_exact() {
    let mut property = AnimatedProperty::new(0.0);
    property.insert(0.0, 0.0, Easing::Linear).unwrap();
    property.insert(1000.0, 100.0, Easing::Linear).unwrap();
    assert_eq!(evaluate(&property, 500.0), 50.0);
}

#[test]
fn test_bezier_endpoints() {
    let curves = [
        Easing::CubicBezier(0.25, 0.1, 0.25, 1.0),
        Easing::CubicBezier(0.42, 0.0, 1.0, 1.0),
        Easing::CubicBezier(0.0, 0.0, 0.58, 1.0),
        Easing::CubicBezier(0.68, -0.55, 0.27, 1.55),
        Easing::CubicBezier(0.3, 0.3, 0.7, 0.7),
    ];
    for easing in curves {
        assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?}");
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");

        // Just inside the unit interval the solver itself runs
        assert!(easing.apply(1e-9).abs() < 1e-6, "{easing:?}");
        assert!((easing.apply(1.0 - 1e-9) - 1.0).abs() < 1e-6, "{easing:?}");
    }
}

#[test]
fn test_bezier_with_overshooting_x_stays_on_curve() {
    // x1 > 1 and x2 < 0 make x(u) non-monotonic; Newton must keep u in [0, 1]
    let curves = [
        Easing::CubicBezier(1.5, 0.0, 0.5, 1.0),
        Easing::CubicBezier(2.0, 0.3, -1.0, 0.8),
    ];
    for easing in curves {
        for i in 0..=100 {
            let t = i as f64 / 100.0;
            let y = easing.apply(t);
            assert!(y.is_finite(), "{easing:?} at {t}");
            // y control points lie in [0, 1], so any u in [0, 1] maps there
            assert!((0.0..=1.0).contains(&y), "{easing:?} at {t} gave {y}");
        }
    }
}

#[test]
fn test_empty_property_returns_default() {
    let property = AnimatedProperty::new(42.0);
    for time in [-1e6, 0.0, 123.4, f64::NAN, f64::INFINITY] {
        assert_eq!(evaluate(&property, time), 42.0);
    }
}

#[test]
fn test_reevaluation_is_identical() {
    let property = AnimatedProperty::from_keyframes(
        0.0,
        [
            (0.0, 0.0, Easing::CubicBezier(0.17, 0.67, 0.83, 0.67)),
            (333.0, 80.0, Easing::EaseOutQuart),
            (1000.0, -20.0, Easing::Linear),
        ],
    );
    for i in 0..=100 {
        let time = i as f64 * 10.7;
        let first = evaluate(&property, time);
        let second = evaluate(&property, time);
        assert_eq!(first.to_bits(), second.to_bits());
    }
}

#[test]
fn test_edits_keep_sampling_consistent() {
    let mut property = two_keyframes(Easing::Linear);
    let middle = property.insert(300.0, 50.0, Easing::Linear).unwrap();
    assert_eq!(property.evaluate(200.0), 25.0);

    property.set_value(middle, 100.0).unwrap();
    assert_eq!(property.evaluate(200.0), 50.0);

    property.remove(middle).unwrap();
    assert_eq!(property.evaluate(300.0), 5.0);
}

#[test]
fn test_easing_from_json() {
    let named: Easing = serde_json::from_str("\"ease-out\"").unwrap();
    assert_eq!(named, Easing::EaseOut);

    let bezier: Easing = serde_json::from_str("[0.4, 0.0, 0.2, 1.0]").unwrap();
    assert_eq!(bezier, Easing::CubicBezier(0.4, 0.0, 0.2, 1.0));

    let short: Easing = serde_json::from_str("[0.4, 0.0]").unwrap();
    assert_eq!(short, Easing::Linear);

    let unknown: Easing = serde_json::from_str("\"wobble\"").unwrap();
    assert_eq!(unknown, Easing::Linear);

    assert_eq!(serde_json::to_string(&Easing::EaseInOutQuad).unwrap(), "\"ease-in-out-quad\"");
    assert_eq!(
        serde_json::to_string(&Easing::CubicBezier(0.5, 0.0, 0.5, 1.0)).unwrap(),
        "[0.5,0.0,0.5,1.0]"
    );
}

#[test]
fn test_playhead_drives_clip() {
    let clip = AnimationClip::new().with_property(
        "x",
        AnimatedProperty::from_keyframes(0.0, [(0.0, 0.0, Easing::Linear), (100.0, 100.0, Easing::Linear)]),
    );
    let mut head = Playhead::for_clip(&clip).looping(LoopMode::PingPong);
    head.play();

    let mut values = Vec::new();
    for _ in 0..8 {
        head.tick(25.0);
        values.push(clip.value("x", head.time()).unwrap());
    }
    assert_eq!(values, vec![25.0, 50.0, 75.0, 100.0, 75.0, 50.0, 25.0, 0.0]);
}
