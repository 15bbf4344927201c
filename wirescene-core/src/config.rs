/// Scene configuration: ranges, presets for each viewer variant, and validation
use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::color::{Hsl, BLUE, RED, YELLOW};

/// Number of shapes generated by the random-shape variants
pub const SHAPE_COUNT: usize = 50;

/// Delay between the end of a drag and the return to autorotation
pub const COOLDOWN: Duration = Duration::from_millis(1000);

/// Per-axis bound of a resampled rotation rate (radians per frame)
pub const ROTATION_RATE_BOUND: f32 = 0.0025;

/// Prism height as a fraction of its size
pub const PRISM_HEIGHT_RATIO: f32 = 0.3;

/// Minimum angle between adjacent faces for a shared edge to be outlined
pub const EDGE_THRESHOLD_DEGREES: f32 = 1.0;

/// Rate used by the fixed-rate variant
pub const FIXED_ROTATION_RATE: [f32; 3] = [0.001, 0.002, 0.0];

/// Errors raised while validating or parsing configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} range: [{min}, {max}]")]
    InvalidSpan { name: &'static str, min: f32, max: f32 },
    #[error("{name} range [{min}, {max}] lies outside [{lower}, {upper}]")]
    OutOfBounds {
        name: &'static str,
        min: f32,
        max: f32,
        lower: f32,
        upper: f32,
    },
    #[error("rotation rate bound must be finite and non-negative, got {0}")]
    NegativeRateBound(f32),
    #[error("distortion offset must be finite and non-negative, got {0}")]
    NegativeOffset(f32),
    #[error("unknown variant '{0}' (expected distorted-boxes, random-shapes or drifting-shapes)")]
    UnknownVariant(String),
    #[error("unknown cooldown policy '{0}' (expected cancel or uncancelable)")]
    UnknownPolicy(String),
}

/// Closed range sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidSpan {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    fn check_within(&self, name: &'static str, lower: f32, upper: f32) -> Result<(), ConfigError> {
        self.check(name)?;
        if self.min < lower || self.max > upper {
            return Err(ConfigError::OutOfBounds {
                name,
                min: self.min,
                max: self.max,
                lower,
                upper,
            });
        }
        Ok(())
    }
}

/// Ranges every random shape field is drawn from
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRanges {
    pub position: Span,
    pub rotation: Span,
    pub size: Span,
    /// Degrees
    pub hue: Span,
    pub saturation: Span,
    pub lightness: Span,
    pub outline_width: Span,
}

impl Default for ShapeRanges {
    fn default() -> Self {
        Self {
            position: Span::new(-8.0, 8.0),
            rotation: Span::new(0.0, TAU),
            size: Span::new(0.5, 3.0),
            hue: Span::new(0.0, 360.0),
            saturation: Span::new(0.6, 1.0),
            lightness: Span::new(0.45, 0.65),
            outline_width: Span::new(1.0, 3.0),
        }
    }
}

impl ShapeRanges {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.position.check("position")?;
        self.rotation.check("rotation")?;
        self.size.check_within("size", f32::MIN_POSITIVE, f32::MAX)?;
        self.hue.check_within("hue", 0.0, 360.0)?;
        self.saturation.check_within("saturation", 0.0, 1.0)?;
        self.lightness.check_within("lightness", 0.0, 1.0)?;
        self.outline_width
            .check_within("outline width", f32::MIN_POSITIVE, f32::MAX)?;
        Ok(())
    }
}

/// A fixed, hand-placed box of the first viewer iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistortedBox {
    pub size: f32,
    pub color: Hsl,
    pub offset: f32,
}

/// Red > yellow > blue, largest to smallest
pub const DISTORTED_BOXES: [DistortedBox; 3] = [
    DistortedBox {
        size: 3.0,
        color: RED,
        offset: 0.8,
    },
    DistortedBox {
        size: 2.0,
        color: YELLOW,
        offset: 0.6,
    },
    DistortedBox {
        size: 1.0,
        color: BLUE,
        offset: 0.4,
    },
];

/// The three successive iterations of the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Nested jittered boxes, camera orbit only
    DistortedBoxes,
    /// Random shapes turning at a constant rate while idle
    RandomShapes,
    /// Random shapes with a fresh rate after every interaction
    #[default]
    DriftingShapes,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::DistortedBoxes => "distorted-boxes",
            Variant::RandomShapes => "random-shapes",
            Variant::DriftingShapes => "drifting-shapes",
        };
        f.write_str(name)
    }
}

impl FromStr for Variant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "distorted-boxes" | "1" => Ok(Variant::DistortedBoxes),
            "random-shapes" | "2" => Ok(Variant::RandomShapes),
            "drifting-shapes" | "3" => Ok(Variant::DriftingShapes),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

/// What happens to a pending cooldown when the user drags again before it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CooldownPolicy {
    /// The pending cooldown is cancelled; autorotation stays frozen
    #[default]
    CancelOnReengage,
    /// The pending cooldown still fires and forces the idle state
    Uncancelable,
}

impl fmt::Display for CooldownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CooldownPolicy::CancelOnReengage => f.write_str("cancel"),
            CooldownPolicy::Uncancelable => f.write_str("uncancelable"),
        }
    }
}

impl FromStr for CooldownPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cancel" | "cancel-on-reengage" => Ok(CooldownPolicy::CancelOnReengage),
            "uncancelable" | "legacy" => Ok(CooldownPolicy::Uncancelable),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Initial camera placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: Point3<f32>,
    pub fov_degrees: f32,
}

/// Everything needed to build a [`crate::Scene`]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub variant: Variant,
    pub shape_count: usize,
    pub ranges: ShapeRanges,
    pub boxes: Vec<DistortedBox>,
    pub cooldown: Duration,
    pub rate_bound: f32,
    pub fixed_rate: Vector3<f32>,
    pub policy: CooldownPolicy,
    pub camera: CameraConfig,
    pub damping_factor: f32,
}

impl SceneConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let camera = match variant {
            Variant::DistortedBoxes => CameraConfig {
                position: Point3::new(5.0, 5.0, 5.0),
                fov_degrees: 50.0,
            },
            Variant::RandomShapes | Variant::DriftingShapes => CameraConfig {
                position: Point3::new(12.0, 12.0, 12.0),
                fov_degrees: 50.0,
            },
        };

        Self {
            variant,
            shape_count: SHAPE_COUNT,
            ranges: ShapeRanges::default(),
            boxes: DISTORTED_BOXES.to_vec(),
            cooldown: COOLDOWN,
            rate_bound: ROTATION_RATE_BOUND,
            fixed_rate: Vector3::from(FIXED_ROTATION_RATE),
            policy: CooldownPolicy::default(),
            camera,
            damping_factor: 0.05,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ranges.validate()?;
        if !self.rate_bound.is_finite() || self.rate_bound < 0.0 {
            return Err(ConfigError::NegativeRateBound(self.rate_bound));
        }
        for b in &self.boxes {
            if !b.offset.is_finite() || b.offset < 0.0 {
                return Err(ConfigError::NegativeOffset(b.offset));
            }
            if !(b.size.is_finite() && b.size > 0.0) {
                return Err(ConfigError::InvalidSpan {
                    name: "box size",
                    min: b.size,
                    max: b.size,
                });
            }
        }
        Span::new(self.damping_factor, self.damping_factor).check_within(
            "damping factor",
            0.0,
            1.0,
        )?;
        Ok(())
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::for_variant(Variant::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults_are_valid() {
        for variant in [
            Variant::DistortedBoxes,
            Variant::RandomShapes,
            Variant::DriftingShapes,
        ] {
            assert!(SceneConfig::for_variant(variant).validate().is_ok());
        }
    }

    #[test]
    fn test_inverted_span_rejected() {
        let mut config = SceneConfig::default();
        config.ranges.size = Span::new(3.0, 0.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpan { name: "size", .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut config = SceneConfig::default();
        config.ranges.saturation = Span::new(0.5, 1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfBounds {
                name: "saturation",
                ..
            })
        ));

        let mut config = SceneConfig::default();
        config.ranges.size = Span::new(0.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut config = SceneConfig::default();
        config.rate_bound = -0.1;
        assert_eq!(config.validate(), Err(ConfigError::NegativeRateBound(-0.1)));

        let mut config = SceneConfig::for_variant(Variant::DistortedBoxes);
        config.boxes[1].offset = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::NegativeOffset(-1.0)));
    }

    #[test]
    fn test_span_sample_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let span = Span::new(0.5, 3.0);
        for _ in 0..1000 {
            assert!(span.contains(span.sample(&mut rng)));
        }
        assert_eq!(Span::new(2.0, 2.0).sample(&mut rng), 2.0);
    }

    #[test]
    fn test_parse_variant_and_policy() {
        assert_eq!("random-shapes".parse::<Variant>(), Ok(Variant::RandomShapes));
        assert_eq!("1".parse::<Variant>(), Ok(Variant::DistortedBoxes));
        assert_eq!(
            "spheres".parse::<Variant>(),
            Err(ConfigError::UnknownVariant("spheres".to_string()))
        );
        assert_eq!(
            "legacy".parse::<CooldownPolicy>(),
            Ok(CooldownPolicy::Uncancelable)
        );
        assert_eq!(
            CooldownPolicy::CancelOnReengage
                .to_string()
                .parse::<CooldownPolicy>(),
            Ok(CooldownPolicy::CancelOnReengage)
        );
    }
}
