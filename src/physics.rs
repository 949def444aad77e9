//! Runner kinematics over the skyline.
//!
//! The runner moves forward by `speed` every tick and integrates a constant
//! gravity unconditionally; standing on a roof is enforced by clamping to the
//! ground height, not by switching integration off. A look-ahead check fires
//! the jump before a taller building is reached so the arc clears it.

use crate::config::PhysicsConfig;
use crate::skyline::Skyline;

/// Runner position and vertical motion. Created zeroed at session start.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    pub distance: f64,
    /// Height above the track line, toward the screen centre.
    pub altitude: f64,
    pub vertical_velocity: f64,
    pub airborne: bool,
}

impl PlayerState {
    /// Laps completed on a loop of `perimeter` length.
    pub fn laps(&self, perimeter: f64) -> u64 {
        if perimeter > 0.0 && self.distance > 0.0 {
            (self.distance / perimeter).floor() as u64
        } else {
            0
        }
    }
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub jumped: bool,
    pub landed: bool,
}

/// Advance the runner by one tick.
///
/// `physics` must already be scaled to the current world scale. A skyline
/// built for a zero-length track leaves the runner untouched.
pub fn advance(
    player: &mut PlayerState,
    speed: f64,
    skyline: &Skyline,
    physics: &PhysicsConfig,
) -> StepEvents {
    let mut events = StepEvents::default();
    if skyline.perimeter() <= 0.0 {
        return events;
    }

    player.distance += speed;

    let ground = skyline.height_at(player.distance);
    let ahead = skyline.height_at(player.distance + physics.lookahead);

    if !player.airborne && ahead > player.altitude + physics.jump_margin {
        player.vertical_velocity = physics.jump_impulse;
        player.airborne = true;
        events.jumped = true;
        tracing::trace!(distance = player.distance, ahead, "auto-jump");
    }

    player.altitude += player.vertical_velocity;
    player.vertical_velocity -= physics.gravity;

    if player.altitude < ground {
        events.landed = player.airborne;
        player.altitude = ground;
        player.vertical_velocity = 0.0;
        player.airborne = false;
    }
    events
}
