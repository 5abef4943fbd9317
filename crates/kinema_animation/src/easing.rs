//! Easing functions for keyframe segments

use serde::{Deserialize, Serialize};

/// Newton-Raphson iterations for cubic bezier easing
const NEWTON_ITERATIONS: usize = 8;

/// Below this slope a Newton step would blow up
const MIN_SLOPE: f64 = 1e-12;

/// Easing function type
///
/// Serializes as a name (`"ease-in-out"`) or as four bezier control
/// coordinates (`[0.25, 0.1, 0.25, 1.0]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "EasingRepr", into = "EasingRepr")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    /// Control points `(x1, y1, x2, y2)` with implicit endpoints (0,0) and (1,1)
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    ///
    /// Progress outside the unit interval is clamped to exactly 0 or 1.
    pub fn apply(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        if t.is_nan() {
            return 0.0;
        }

        match *self {
            Easing::Linear => t,
            Easing::EaseIn | Easing::EaseInCubic => t * t * t,
            Easing::EaseOut | Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut | Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    /// Look up a named curve.
    ///
    /// Accepts CSS-style names in any case with `-`, `_`, or no separator
    /// (`ease-in-out`, `easeInOut`, `EASE_IN_OUT`) and `cubic-bezier(a, b, c, d)`.
    /// Anything unrecognised is `Linear`.
    pub fn from_name(name: &str) -> Self {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let easing = match normalized.as_str() {
            "linear" => Some(Easing::Linear),
            "easein" => Some(Easing::EaseIn),
            "easeout" => Some(Easing::EaseOut),
            "easeinout" => Some(Easing::EaseInOut),
            "easeinquad" => Some(Easing::EaseInQuad),
            "easeoutquad" => Some(Easing::EaseOutQuad),
            "easeinoutquad" => Some(Easing::EaseInOutQuad),
            "easeincubic" => Some(Easing::EaseInCubic),
            "easeoutcubic" => Some(Easing::EaseOutCubic),
            "easeinoutcubic" => Some(Easing::EaseInOutCubic),
            "easeinquart" => Some(Easing::EaseInQuart),
            "easeoutquart" => Some(Easing::EaseOutQuart),
            "easeinoutquart" => Some(Easing::EaseInOutQuart),
            _ => parse_cubic_bezier(name),
        };

        easing.unwrap_or_else(|| {
            tracing::warn!(name, "unknown easing, falling back to linear");
            Easing::Linear
        })
    }

    /// Build a bezier easing from `[x1, y1, x2, y2]`. Any other length is `Linear`.
    pub fn from_control_points(points: &[f64]) -> Self {
        match *points {
            [x1, y1, x2, y2] => Easing::CubicBezier(x1, y1, x2, y2),
            _ => {
                tracing::warn!(len = points.len(), "malformed bezier easing, falling back to linear");
                Easing::Linear
            }
        }
    }

    /// Canonical kebab-case name, `None` for bezier curves
    pub fn name(&self) -> Option<&'static str> {
        Some(match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
            Easing::EaseInQuad => "ease-in-quad",
            Easing::EaseOutQuad => "ease-out-quad",
            Easing::EaseInOutQuad => "ease-in-out-quad",
            Easing::EaseInCubic => "ease-in-cubic",
            Easing::EaseOutCubic => "ease-out-cubic",
            Easing::EaseInOutCubic => "ease-in-out-cubic",
            Easing::EaseInQuart => "ease-in-quart",
            Easing::EaseOutQuart => "ease-out-quart",
            Easing::EaseInOutQuart => "ease-in-out-quart",
            Easing::CubicBezier(..) => return None,
        })
    }
}

/// `cubic-bezier(a, b, c, d)`
fn parse_cubic_bezier(name: &str) -> Option<Easing> {
    let name = name.trim().to_ascii_lowercase();
    let args = name
        .strip_prefix("cubic-bezier(")
        .or_else(|| name.strip_prefix("cubicbezier("))?
        .strip_suffix(')')?;
    let points: Vec<f64> = args
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    match *points {
        [x1, y1, x2, y2] => Some(Easing::CubicBezier(x1, y1, x2, y2)),
        _ => None,
    }
}

/// Cubic bezier easing for progress strictly inside (0, 1).
///
/// Solves `bezier_x(u) == t` with Newton-Raphson from `u = t`, clamping `u`
/// to [0, 1] after every step, then samples `bezier_y(u)`. A flat slope ends
/// the search with the last `u`.
fn cubic_bezier_ease(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Control points on the diagonal make the curve the identity
    if x1 == y1 && x2 == y2 {
        return t;
    }

    let mut u = t;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier_sample(u, x1, x2) - t;
        if err.abs() < 1e-9 {
            break;
        }
        let slope = bezier_slope(u, x1, x2);
        if slope.abs() < MIN_SLOPE {
            break;
        }
        u = (u - err / slope).clamp(0.0, 1.0);
    }

    bezier_sample(u, y1, y2)
}

/// Evaluate a 1D cubic bezier with P0 = 0, P3 = 1 at parameter u
#[inline]
fn bezier_sample(u: f64, p1: f64, p2: f64) -> f64 {
    let (a, b, c) = bezier_coefficients(p1, p2);
    ((a * u + b) * u + c) * u
}

/// Derivative of [`bezier_sample`] with respect to u
#[inline]
fn bezier_slope(u: f64, p1: f64, p2: f64) -> f64 {
    let (a, b, c) = bezier_coefficients(p1, p2);
    (3.0 * a * u + 2.0 * b) * u + c
}

#[inline]
fn bezier_coefficients(p1: f64, p2: f64) -> (f64, f64, f64) {
    (3.0 * p1 - 3.0 * p2 + 1.0, 3.0 * p2 - 6.0 * p1, 3.0 * p1)
}

/// Wire form of [`Easing`]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum EasingRepr {
    Named(String),
    Points(Vec<f64>),
}

impl From<EasingRepr> for Easing {
    fn from(repr: EasingRepr) -> Self {
        match repr {
            EasingRepr::Named(name) => Easing::from_name(&name),
            EasingRepr::Points(points) => Easing::from_control_points(&points),
        }
    }
}

impl From<Easing> for EasingRepr {
    fn from(easing: Easing) -> Self {
        match easing {
            Easing::CubicBezier(x1, y1, x2, y2) => EasingRepr::Points(vec![x1, y1, x2, y2]),
            named => EasingRepr::Named(named.name().unwrap_or("linear").to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMED: [Easing; 13] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
    ];

    #[test]
    fn test_named_curves_hit_endpoints() {
        for easing in NAMED {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn test_named_curve_values() {
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
        assert!((Easing::EaseIn.apply(0.5) - 0.125).abs() < 1e-12);
        assert!((Easing::EaseOut.apply(0.5) - 0.875).abs() < 1e-12);
        assert!((Easing::EaseInOut.apply(0.25) - 0.0625).abs() < 1e-12);
        assert!((Easing::EaseInOut.apply(0.75) - 0.9375).abs() < 1e-12);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_in_out_curves_are_symmetric() {
        for easing in [
            Easing::EaseInOut,
            Easing::EaseInOutQuad,
            Easing::EaseInOutQuart,
        ] {
            for i in 1..10 {
                let t = i as f64 / 10.0;
                let sum = easing.apply(t) + easing.apply(1.0 - t);
                assert!((sum - 1.0).abs() < 1e-12, "{easing:?} at {t}");
            }
        }
    }

    #[test]
    fn test_bezier_diagonal_is_identity() {
        let easing = Easing::CubicBezier(0.3, 0.3, 0.7, 0.7);
        for i in 1..10 {
            let t = i as f64 / 10.0;
            assert_eq!(easing.apply(t), t);
        }
    }

    #[test]
    fn test_bezier_matches_css_ease() {
        // CSS `ease`; reference values to four places
        let ease = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);
        assert!((ease.apply(0.25) - 0.4085).abs() < 1e-3);
        assert!((ease.apply(0.5) - 0.8024).abs() < 1e-3);
        assert!((ease.apply(0.75) - 0.9604).abs() < 1e-3);
    }

    #[test]
    fn test_bezier_is_monotonic_for_unit_controls() {
        let easing = Easing::CubicBezier(0.42, 0.0, 0.58, 1.0);
        let mut last = 0.0;
        for i in 1..100 {
            let y = easing.apply(i as f64 / 100.0);
            assert!(y >= last);
            last = y;
        }
    }

    #[test]
    fn test_bezier_flat_slope_does_not_blow_up() {
        // x'(0) == 0 and x'(1) == 0
        let easing = Easing::CubicBezier(0.0, 0.5, 1.0, 0.5);
        for i in 0..=100 {
            let y = easing.apply(i as f64 / 100.0);
            assert!(y.is_finite());
        }
    }

    #[test]
    fn test_from_name_variants() {
        assert_eq!(Easing::from_name("ease-in-out"), Easing::EaseInOut);
        assert_eq!(Easing::from_name("easeInOut"), Easing::EaseInOut);
        assert_eq!(Easing::from_name("EASE_OUT_QUART"), Easing::EaseOutQuart);
        assert_eq!(
            Easing::from_name("cubic-bezier(0.1, 0.7, 1.0, 0.1)"),
            Easing::CubicBezier(0.1, 0.7, 1.0, 0.1)
        );
        assert_eq!(
            Easing::from_name("cubic-bezier(0.5, -0.5, 0.5, 1.5)"),
            Easing::CubicBezier(0.5, -0.5, 0.5, 1.5)
        );
    }

    #[test]
    fn test_unknown_inputs_fall_back_to_linear() {
        assert_eq!(Easing::from_name("bounce"), Easing::Linear);
        assert_eq!(Easing::from_name("cubic-bezier(0.1, 0.7)"), Easing::Linear);
        assert_eq!(Easing::from_control_points(&[0.1, 0.2, 0.3]), Easing::Linear);
        assert_eq!(Easing::from_control_points(&[]), Easing::Linear);
    }

    #[test]
    fn test_names_round_trip() {
        for easing in NAMED {
            let name = easing.name().unwrap();
            assert_eq!(Easing::from_name(name), easing);
        }
        assert_eq!(Easing::CubicBezier(0.0, 0.0, 1.0, 1.0).name(), None);
    }
}
