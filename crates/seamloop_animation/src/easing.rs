//! Easing functions
//!
//! Polynomial families named the way site scripts name them: `power1` is
//! quadratic, `power2` cubic, `power3` quartic and `power4` quintic. A bare
//! family name means the `out` variant, and `none` is linear.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Easing curve applied to normalized progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    QuintIn,
    QuintOut,
    QuintInOut,
}

/// Returned when an easing name is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown easing: {0}")]
pub struct EasingParseError(pub String);

#[derive(Clone, Copy)]
enum Variant {
    In,
    Out,
    InOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to `[0, 1]`
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => ease_in(t, 2),
            Easing::QuadOut => ease_out(t, 2),
            Easing::QuadInOut => ease_in_out(t, 2),
            Easing::CubicIn => ease_in(t, 3),
            Easing::CubicOut => ease_out(t, 3),
            Easing::CubicInOut => ease_in_out(t, 3),
            Easing::QuartIn => ease_in(t, 4),
            Easing::QuartOut => ease_out(t, 4),
            Easing::QuartInOut => ease_in_out(t, 4),
            Easing::QuintIn => ease_in(t, 5),
            Easing::QuintOut => ease_out(t, 5),
            Easing::QuintInOut => ease_in_out(t, 5),
        }
    }

    fn from_power(power: u8, variant: Variant) -> Option<Self> {
        let easing = match (power, variant) {
            (1, Variant::In) => Easing::QuadIn,
            (1, Variant::Out) => Easing::QuadOut,
            (1, Variant::InOut) => Easing::QuadInOut,
            (2, Variant::In) => Easing::CubicIn,
            (2, Variant::Out) => Easing::CubicOut,
            (2, Variant::InOut) => Easing::CubicInOut,
            (3, Variant::In) => Easing::QuartIn,
            (3, Variant::Out) => Easing::QuartOut,
            (3, Variant::InOut) => Easing::QuartInOut,
            (4, Variant::In) => Easing::QuintIn,
            (4, Variant::Out) => Easing::QuintOut,
            (4, Variant::InOut) => Easing::QuintInOut,
            _ => return None,
        };
        Some(easing)
    }

    fn power_name(self) -> Option<(u8, &'static str)> {
        match self {
            Easing::Linear => None,
            Easing::QuadIn => Some((1, "in")),
            Easing::QuadOut => Some((1, "out")),
            Easing::QuadInOut => Some((1, "inOut")),
            Easing::CubicIn => Some((2, "in")),
            Easing::CubicOut => Some((2, "out")),
            Easing::CubicInOut => Some((2, "inOut")),
            Easing::QuartIn => Some((3, "in")),
            Easing::QuartOut => Some((3, "out")),
            Easing::QuartInOut => Some((3, "inOut")),
            Easing::QuintIn => Some((4, "in")),
            Easing::QuintOut => Some((4, "out")),
            Easing::QuintInOut => Some((4, "inOut")),
        }
    }
}

fn ease_in(t: f32, power: i32) -> f32 {
    t.powi(power)
}

fn ease_out(t: f32, power: i32) -> f32 {
    1.0 - (1.0 - t).powi(power)
}

fn ease_in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        ease_in(t * 2.0, power) / 2.0
    } else {
        1.0 - ease_in((1.0 - t) * 2.0, power) / 2.0
    }
}

impl FromStr for Easing {
    type Err = EasingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if matches!(name, "none" | "linear") {
            return Ok(Easing::Linear);
        }

        let (family, variant) = match name.split_once('.') {
            Some((family, "in")) => (family, Variant::In),
            Some((family, "out")) => (family, Variant::Out),
            Some((family, "inOut")) => (family, Variant::InOut),
            Some(_) => return Err(EasingParseError(s.to_string())),
            None => (name, Variant::Out),
        };

        let power = match family {
            "power1" | "quad" => 1,
            "power2" | "cubic" => 2,
            "power3" | "quart" => 3,
            "power4" | "quint" => 4,
            _ => return Err(EasingParseError(s.to_string())),
        };

        Easing::from_power(power, variant).ok_or_else(|| EasingParseError(s.to_string()))
    }
}

impl TryFrom<String> for Easing {
    type Error = EasingParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.power_name() {
            None => write!(f, "none"),
            Some((power, variant)) => write!(f, "power{}.{}", power, variant),
        }
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 13] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::QuintIn,
        Easing::QuintOut,
        Easing::QuintInOut,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing} at 1");
        }
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::QuartOut.apply(-1.0), 0.0);
        assert_eq!(Easing::QuartOut.apply(2.0), 1.0);
    }

    #[test]
    fn test_out_curves_lead_linear() {
        assert!(Easing::QuadOut.apply(0.25) > 0.25);
        assert!(Easing::QuartOut.apply(0.25) > Easing::QuadOut.apply(0.25));
        assert!(Easing::CubicIn.apply(0.25) < 0.25);
    }

    #[test]
    fn test_in_out_is_symmetric() {
        let a = Easing::CubicInOut.apply(0.2);
        let b = Easing::CubicInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("none".parse::<Easing>(), Ok(Easing::Linear));
        assert_eq!("power3".parse::<Easing>(), Ok(Easing::QuartOut));
        assert_eq!("power1.inOut".parse::<Easing>(), Ok(Easing::QuadInOut));
        assert_eq!("cubic.in".parse::<Easing>(), Ok(Easing::CubicIn));
        assert!("power9".parse::<Easing>().is_err());
        assert!("power2.sideways".parse::<Easing>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for easing in ALL {
            assert_eq!(easing.to_string().parse::<Easing>(), Ok(easing));
        }
    }

    #[test]
    fn test_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Vars {
            ease: Easing,
        }

        let vars: Vars = toml::from_str("ease = \"power3\"").unwrap();
        assert_eq!(vars.ease, Easing::QuartOut);
        assert!(toml::from_str::<Vars>("ease = \"bounce\"").is_err());
    }
}
