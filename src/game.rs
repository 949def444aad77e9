//! Session state driven by the frame loop.
//!
//! `GameState` owns everything that used to be module-level mutable state:
//! viewport geometry, the skyline, the runner, the speed and the selected
//! look. The host calls [`GameState::resize`] when the viewport changes and
//! [`GameState::tick`] once per frame, then reads the query surface
//! ([`GameState::skyline`], [`GameState::pose`], [`GameState::project`]) to
//! draw.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::character::{self, ARCHETYPES, Pose};
use crate::config::{ConfigError, GameConfig, PhysicsConfig, Scale};
use crate::physics::{self, PlayerState, StepEvents};
use crate::skyline::{Skyline, WindowGrid};
use crate::track::{ScreenPoint, Track};

/// Selected look. Indices wrap into their ranges on selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Appearance {
    pub character: usize,
    pub background: usize,
    pub building_style: usize,
}

impl Appearance {
    /// Backgrounds the runner is drawn light on.
    pub fn dark_background(&self) -> bool {
        matches!(self.background, 1 | 3)
    }
}

/// Result of one frame tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub step: StepEvents,
    /// Set when the runner started a new lap this tick.
    pub lap: Option<u64>,
    pub reshuffled: bool,
}

pub struct GameState {
    config: GameConfig,
    scale: Scale,
    physics: PhysicsConfig,
    track: Track,
    skyline: Skyline,
    player: PlayerState,
    speed: f64,
    appearance: Appearance,
    random_mode: bool,
    last_lap: u64,
    rng: StdRng,
}

impl GameState {
    /// New session with an unsized viewport; call [`GameState::resize`] before
    /// expecting anything on screen.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let scale = config.scale.for_width(0.0);
        Ok(Self {
            physics: config.physics.scaled(scale.world),
            speed: config.speed.clamp(config.speed.initial),
            scale,
            config,
            track: Track::unset(),
            skyline: Skyline::empty(),
            player: PlayerState::default(),
            appearance: Appearance::default(),
            random_mode: false,
            last_lap: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Recompute scales and track geometry for a new viewport and rebuild the
    /// skyline. A zero-sized viewport keeps the previous world.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            tracing::warn!(width, height, "ignoring resize to an empty viewport");
            return;
        }
        self.scale = self.config.scale.for_width(width);
        self.physics = self.config.physics.scaled(self.scale.world);
        self.track = Track::new(width, height, self.config.track_pad * self.scale.world);
        self.rebuild_skyline();
        self.last_lap = self.player.laps(self.track.perimeter());
        tracing::debug!(
            width,
            height,
            world = self.scale.world,
            perimeter = self.track.perimeter(),
            "viewport resized"
        );
    }

    /// Swap in a new configuration and rebuild the world with it.
    pub fn reconfigure(&mut self, config: GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        self.speed = self.config.speed.clamp(self.speed);
        let (w, h) = (self.track.width(), self.track.height());
        if w > 0.0 && h > 0.0 {
            self.resize(w, h);
        } else {
            self.physics = self.config.physics.scaled(self.scale.world);
        }
        Ok(())
    }

    /// Advance one frame.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let perimeter = self.skyline.perimeter();
        if perimeter <= 0.0 {
            return report;
        }
        report.step = physics::advance(&mut self.player, self.speed, &self.skyline, &self.physics);

        let lap = self.player.laps(perimeter);
        if lap > self.last_lap {
            tracing::debug!(lap, "lap completed");
            if self.random_mode && lap % self.config.reshuffle_every_laps == 0 {
                self.randomize_appearance();
                report.reshuffled = true;
            }
            self.last_lap = lap;
            report.lap = Some(lap);
        }
        report
    }

    /// Redraw character, background and building style at random.
    pub fn randomize_appearance(&mut self) {
        let rare = self.rng.r#gen::<f64>() < self.config.rare_character_chance;
        let pool: Vec<usize> = ARCHETYPES
            .iter()
            .enumerate()
            .filter(|(_, a)| a.rare == rare)
            .map(|(i, _)| i)
            .collect();
        let character = if pool.is_empty() {
            self.rng.gen_range(0..ARCHETYPES.len())
        } else {
            pool[self.rng.gen_range(0..pool.len())]
        };
        self.appearance = Appearance {
            character,
            background: self.rng.gen_range(0..self.config.backgrounds),
            building_style: self.rng.gen_range(0..self.config.building_styles),
        };
        tracing::debug!(appearance = ?self.appearance, "appearance reshuffled");
    }

    fn rebuild_skyline(&mut self) {
        // Built aside and swapped in whole.
        let skyline = Skyline::generate(
            &self.track,
            &self.config.skyline,
            self.scale.world,
            &mut self.rng,
        );
        self.skyline = skyline;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = self.config.speed.clamp(speed);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn select_character(&mut self, index: usize) {
        self.appearance.character = index % ARCHETYPES.len();
    }

    pub fn select_background(&mut self, index: usize) {
        self.appearance.background = index % self.config.backgrounds;
    }

    pub fn select_building_style(&mut self, index: usize) {
        self.appearance.building_style = index % self.config.building_styles;
    }

    pub fn set_random_mode(&mut self, on: bool) {
        self.random_mode = on;
    }

    pub fn random_mode(&self) -> bool {
        self.random_mode
    }

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn skyline(&self) -> &Skyline {
        &self.skyline
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn window_grid(&self) -> WindowGrid {
        WindowGrid::new(&self.config.skyline, self.scale.world)
    }

    /// Roof ornament height at the current world scale.
    pub fn roof_detail(&self) -> f64 {
        self.config.skyline.roof_detail * self.scale.world
    }

    /// Pose of the selected character for the current frame.
    pub fn pose(&self) -> Pose {
        character::pose(
            self.player.distance,
            self.speed,
            self.appearance.character,
            &self.config.gait,
        )
    }

    pub fn project(&self, distance: f64, altitude: f64) -> ScreenPoint {
        self.track.project(distance, altitude)
    }

    /// Where the runner's feet are on screen.
    pub fn player_position(&self) -> ScreenPoint {
        self.track.project(self.player.distance, self.player.altitude)
    }
}
