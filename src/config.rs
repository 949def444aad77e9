//! Tuning configuration.
//!
//! Every "feel" constant of the runner lives here instead of being baked into
//! the algorithms: track padding, viewport scaling, skyline ranges, jump
//! physics and gait shaping. `Default` carries the reference tuning. Values
//! are expressed at world scale 1.0; the `scaled` helpers apply the current
//! viewport's world scale.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Things that can be wrong with a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `[min, max]` pair where `min > max`.
    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    /// A value that may be zero but not below it.
    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// A length/rate that must be strictly positive.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    /// A probability outside `[0, 1]`.
    #[error("`{field}` must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },

    #[cfg(feature = "serde_json")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// World and character scale for one viewport class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub world: f64,     // multiplies track pad, building ranges and physics
    pub character: f64, // render scale of the pose
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ScaleConfig {
    /// Viewports narrower than this use the compact scales.
    pub compact_breakpoint: f64,
    pub compact_world: f64,
    pub compact_character: f64,
    pub world: f64,
    pub character: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            compact_breakpoint: 600.0,
            compact_world: 0.4,
            // A third of half the compact world scale keeps phones readable.
            compact_character: 0.4 * 0.5 / 3.0,
            world: 1.0,
            character: 0.5,
        }
    }
}

impl ScaleConfig {
    pub fn for_width(&self, width: f64) -> Scale {
        if width < self.compact_breakpoint {
            Scale {
                world: self.compact_world,
                character: self.compact_character,
            }
        } else {
            Scale {
                world: self.world,
                character: self.character,
            }
        }
    }
}

/// Skyline content ranges. Widths and heights are track-distance units.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SkylineConfig {
    pub min_width: f64,
    pub max_width: f64,
    pub min_width_floor: f64, // lower bound after scaling
    pub max_width_floor: f64,
    pub min_height: f64, // roof altitude above the track line
    pub max_height: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub window_width_floor: f64,
    pub window_height_floor: f64,
    pub lit_probability: f64,
    pub flat_roof_bias: f64,
    pub band_spacing: f64,
    pub roof_detail: f64,
    pub max_segments: usize,
}

impl Default for SkylineConfig {
    fn default() -> Self {
        Self {
            min_width: 15.0,
            max_width: 35.0,
            min_width_floor: 10.0,
            max_width_floor: 20.0,
            min_height: 0.0,
            max_height: 50.0,
            window_width: 8.0,
            window_height: 10.0,
            window_width_floor: 3.0,
            window_height_floor: 4.0,
            lit_probability: 0.5,
            flat_roof_bias: 0.4,
            band_spacing: 1.2,
            roof_detail: 10.0,
            max_segments: 10_000,
        }
    }
}

impl SkylineConfig {
    pub fn width_range(&self, world: f64) -> (f64, f64) {
        (
            self.min_width_floor.max(self.min_width * world),
            self.max_width_floor.max(self.max_width * world),
        )
    }

    pub fn height_range(&self, world: f64) -> (f64, f64) {
        (self.min_height * world, self.max_height * world)
    }

    /// Window grid cell (width, height) used both when laying out and drawing.
    pub fn window_cell(&self, world: f64) -> (f64, f64) {
        (
            self.window_width_floor.max(self.window_width * world),
            self.window_height_floor.max(self.window_height * world),
        )
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("skyline.width", self.min_width, self.max_width)?;
        check_range(
            "skyline.width_floor",
            self.min_width_floor,
            self.max_width_floor,
        )?;
        check_positive("skyline.min_width_floor", self.min_width_floor)?;
        check_non_negative("skyline.min_height", self.min_height)?;
        check_range("skyline.height", self.min_height, self.max_height)?;
        check_positive("skyline.window_width", self.window_width)?;
        check_positive("skyline.window_height", self.window_height)?;
        check_positive("skyline.band_spacing", self.band_spacing)?;
        check_probability("skyline.lit_probability", self.lit_probability)?;
        check_probability("skyline.flat_roof_bias", self.flat_roof_bias)?;
        if self.max_segments == 0 {
            return Err(ConfigError::NonPositive {
                field: "skyline.max_segments",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Auto-jump kinematics, per tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PhysicsConfig {
    pub lookahead: f64,
    pub jump_margin: f64,
    pub jump_impulse: f64,
    pub gravity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            lookahead: 40.0,
            jump_margin: 5.0,
            jump_impulse: 12.0,
            gravity: 0.8,
        }
    }
}

impl PhysicsConfig {
    pub fn scaled(&self, world: f64) -> Self {
        Self {
            lookahead: self.lookahead * world,
            jump_margin: self.jump_margin * world,
            jump_impulse: self.jump_impulse * world,
            gravity: self.gravity * world,
        }
    }

    /// Apex height of a jump from rest.
    pub fn jump_apex(&self) -> f64 {
        self.jump_impulse * self.jump_impulse / (2.0 * self.gravity)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("physics.lookahead", self.lookahead)?;
        check_positive("physics.jump_impulse", self.jump_impulse)?;
        check_positive("physics.gravity", self.gravity)?;
        check_non_negative("physics.jump_margin", self.jump_margin)?;
        Ok(())
    }
}

/// `min(cap, base + per_speed * speed)`, floored at `base`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpeedCurve {
    pub base: f64,
    pub per_speed: f64,
    pub cap: f64,
}

impl SpeedCurve {
    pub const fn new(base: f64, per_speed: f64, cap: f64) -> Self {
        Self {
            base,
            per_speed,
            cap,
        }
    }

    pub fn at(&self, speed: f64) -> f64 {
        (self.base + self.per_speed * speed.max(0.0)).min(self.cap)
    }
}

/// Running gait shape in the character's unscaled local frame.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GaitConfig {
    /// Distance travelled per full stride.
    pub cycle_length: f64,
    pub lean: SpeedCurve,
    pub stride: SpeedCurve,
    pub lift: SpeedCurve,
    pub hip_bob: f64,
    pub foot_forward: f64,
    pub torso: f64,
    pub neck: f64,
    pub arm_swing: f64,
    pub arm_bob: f64,
    pub arm_drop: f64,
    pub elbow_offset: (f64, f64),
    pub ik_epsilon: f64,
}

impl Default for GaitConfig {
    fn default() -> Self {
        Self {
            cycle_length: 22.0,
            lean: SpeedCurve::new(0.0, 1.5, 20.0),
            stride: SpeedCurve::new(14.0, 1.0, 30.0),
            lift: SpeedCurve::new(12.0, 1.0, 26.0),
            hip_bob: 2.0,
            foot_forward: 5.0,
            torso: 18.0,
            neck: 8.0,
            arm_swing: 12.0,
            arm_bob: 5.0,
            arm_drop: 10.0,
            elbow_offset: (-4.0, 4.0),
            ik_epsilon: 0.01,
        }
    }
}

impl GaitConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive("gait.cycle_length", self.cycle_length)?;
        check_positive("gait.ik_epsilon", self.ik_epsilon)?;
        for (field, curve) in [
            ("gait.lean", &self.lean),
            ("gait.stride", &self.stride),
            ("gait.lift", &self.lift),
        ] {
            check_range(field, curve.base, curve.cap)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SpeedConfig {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            initial: 6.0,
            min: 0.0,
            max: 20.0,
        }
    }
}

impl SpeedConfig {
    pub fn clamp(&self, speed: f64) -> f64 {
        if speed.is_nan() {
            return self.min;
        }
        speed.clamp(self.min, self.max)
    }
}

/// Root configuration handed to [`crate::game::GameState`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct GameConfig {
    /// Margin between the screen edge and the altitude-0 track line.
    pub track_pad: f64,
    pub scale: ScaleConfig,
    pub skyline: SkylineConfig,
    pub physics: PhysicsConfig,
    pub gait: GaitConfig,
    pub speed: SpeedConfig,
    /// Random mode reshuffles the appearance on every lap divisible by this.
    pub reshuffle_every_laps: u64,
    /// Chance that a reshuffle lands on a rare archetype.
    pub rare_character_chance: f64,
    pub backgrounds: usize,
    pub building_styles: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            track_pad: 40.0,
            scale: ScaleConfig::default(),
            skyline: SkylineConfig::default(),
            physics: PhysicsConfig::default(),
            gait: GaitConfig::default(),
            speed: SpeedConfig::default(),
            reshuffle_every_laps: 5,
            rare_character_chance: 0.05,
            backgrounds: 5,
            building_styles: 6,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("track_pad", self.track_pad)?;
        check_positive("scale.world", self.scale.world)?;
        check_positive("scale.compact_world", self.scale.compact_world)?;
        check_positive("scale.character", self.scale.character)?;
        check_positive("scale.compact_character", self.scale.compact_character)?;
        self.skyline.validate()?;
        self.physics.validate()?;
        self.gait.validate()?;
        check_range("speed", self.speed.min, self.speed.max)?;
        check_non_negative("speed.min", self.speed.min)?;
        check_probability("rare_character_chance", self.rare_character_chance)?;
        for (field, count) in [
            ("reshuffle_every_laps", self.reshuffle_every_laps as usize),
            ("backgrounds", self.backgrounds),
            ("building_styles", self.building_styles),
        ] {
            if count == 0 {
                return Err(ConfigError::NonPositive { field, value: 0.0 });
            }
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON document; absent fields keep defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max || min.is_nan() || max.is_nan() {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value > 0.0) {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Probability { field, value });
    }
    Ok(())
}
