//! Procedural running character.
//!
//! The pose is a pure function of travelled distance, speed and archetype.
//! Driving the gait cycle by distance instead of wall-clock time keeps the
//! feet locked to the ground whatever the frame rate. Legs follow a
//! stance/swing split and are solved with analytic two-bone IK; arms swing
//! opposite to the legs with a simple offset elbow.
//!
//! All coordinates are in the character's local, unscaled frame: the runner
//! faces +x, the ground is `y = 0` and up is -y (canvas convention).

use std::f64::consts::{PI, TAU};

use crate::config::GaitConfig;

mod archetypes;

pub use archetypes::ARCHETYPES;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadStyle {
    Outline,
    Filled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrnamentKind {
    None,
    Scarf,
    Visor,
    Spike,
    Lens,
}

/// Static description of one selectable character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Archetype {
    pub name: &'static str,
    pub thigh: f64,
    pub shin: f64,
    /// Hip height above the ground at rest.
    pub hip_height: f64,
    /// +1 or -1: side the knee bends toward.
    pub knee_bend: f64,
    pub head_radius: f64,
    pub torso_width: f64,
    pub limb_width: f64,
    pub head: HeadStyle,
    pub ornament: OrnamentKind,
    pub shows_left_arm: bool,
    /// Kept off the regular random-mode rotation.
    pub rare: bool,
}

/// Archetype for `id`; unknown ids fall back to the first entry.
pub fn archetype(id: usize) -> &'static Archetype {
    ARCHETYPES.get(id).unwrap_or(&ARCHETYPES[0])
}

/// Speed-dependent gait shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gait {
    pub lean: f64,
    pub stride: f64,
    pub lift: f64,
}

impl Gait {
    pub fn at(config: &GaitConfig, speed: f64) -> Self {
        Self {
            lean: config.lean.at(speed),
            stride: config.stride.at(speed),
            lift: config.lift.at(speed),
        }
    }
}

/// Two joints and an end point, root first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limb {
    pub root: Point,
    pub joint: Point,
    pub end: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Head {
    pub center: Point,
    pub radius: f64,
    pub filled: bool,
}

/// Archetype decoration resolved for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ornament {
    /// Quadratic curve trailing from the shoulder.
    Scarf {
        start: Point,
        control: Point,
        end: Point,
    },
    /// Filled square over the face.
    Visor { center: Point, half: f64 },
    Spike { base: Point, tip: Point },
    /// Tilted ellipse outline over the face.
    Lens {
        center: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
    },
}

/// Full skeleton for one frame. Left limbs are drawn in front of the torso,
/// right limbs behind it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub phase: f64,
    pub gait: Gait,
    pub hip: Point,
    pub shoulder: Point,
    pub head: Head,
    pub left_leg: Limb,
    pub right_leg: Limb,
    pub left_arm: Option<Limb>,
    pub right_arm: Limb,
    pub ornament: Option<Ornament>,
    pub torso_width: f64,
    pub limb_width: f64,
}

/// Gait cycle angle for a travelled distance.
pub fn phase(distance: f64, cycle_length: f64) -> f64 {
    if cycle_length > 0.0 {
        distance / cycle_length * TAU
    } else {
        0.0
    }
}

/// Foot target for a leg whose cycle is shifted by `offset`.
///
/// The first half of the cycle is stance (foot on the ground sliding
/// backward), the second half is swing (foot lifted on a half-sine while it
/// sweeps forward again).
pub fn foot_position(t: f64, offset: f64, gait: &Gait, forward: f64) -> Point {
    let phase = (t + offset).rem_euclid(TAU);
    let x = forward + phase.cos() * gait.stride;
    if phase < PI {
        Point::new(x, 0.0)
    } else {
        let swing = (phase - PI) / PI;
        Point::new(x, -(swing * PI).sin() * gait.lift)
    }
}

/// Hip-to-foot distance fed to the law of cosines.
///
/// Capped at `thigh + shin - eps`. A foot closer than `|thigh - shin|`
/// (including one sitting on the hip) has no triangle either, and is solved
/// as a fully extended leg pointing at it.
pub fn reach(distance: f64, thigh: f64, shin: f64, epsilon: f64) -> f64 {
    let max = thigh + shin - epsilon;
    if distance < (thigh - shin).abs() {
        return max;
    }
    distance.min(max)
}

/// Knee position by analytic two-bone IK.
pub fn solve_knee(
    hip: Point,
    foot: Point,
    thigh: f64,
    shin: f64,
    bend: f64,
    epsilon: f64,
) -> Point {
    let dx = foot.x - hip.x;
    let dy = foot.y - hip.y;
    let d = reach(dx.hypot(dy), thigh, shin, epsilon);
    let cos_alpha = (thigh * thigh + d * d - shin * shin) / (2.0 * thigh * d);
    let alpha = cos_alpha.clamp(-1.0, 1.0).acos();
    let angle = dy.atan2(dx) + alpha * bend;
    hip.offset(angle.cos() * thigh, angle.sin() * thigh)
}

/// Leg from hip to `target`. A target out of reach is pulled in along the
/// hip-foot line so the leg never stretches past its bones.
pub fn solve_leg(hip: Point, target: Point, arch: &Archetype, epsilon: f64) -> Limb {
    let knee = solve_knee(hip, target, arch.thigh, arch.shin, arch.knee_bend, epsilon);
    let dist = hip.distance_to(target);
    let max = arch.thigh + arch.shin - epsilon;
    let end = if dist > max {
        let k = max / dist;
        hip.offset((target.x - hip.x) * k, (target.y - hip.y) * k)
    } else {
        target
    };
    Limb {
        root: hip,
        joint: knee,
        end,
    }
}

/// Arm swinging half a cycle out of step with the leg of the same side.
pub fn arm(shoulder: Point, t: f64, offset: f64, config: &GaitConfig) -> Limb {
    let phase = (t + offset + PI).rem_euclid(TAU);
    let hand = shoulder.offset(
        phase.cos() * config.arm_swing,
        config.arm_drop + phase.sin() * config.arm_bob,
    );
    let (ex, ey) = config.elbow_offset;
    let elbow = Point::new(
        (shoulder.x + hand.x) / 2.0 + ex,
        (shoulder.y + hand.y) / 2.0 + ey,
    );
    Limb {
        root: shoulder,
        joint: elbow,
        end: hand,
    }
}

/// Compute the running pose for `archetype_id` at `distance` and `speed`.
pub fn pose(distance: f64, speed: f64, archetype_id: usize, config: &GaitConfig) -> Pose {
    let arch = archetype(archetype_id);
    let speed = speed.max(0.0);
    let gait = Gait::at(config, speed);
    let t = phase(distance, config.cycle_length);

    let hip = Point::new(0.0, -arch.hip_height + t.cos() * config.hip_bob);
    let shoulder = hip.offset(gait.lean / 2.0, -config.torso);
    let head = Head {
        center: shoulder.offset(gait.lean / 3.0, -config.neck),
        radius: arch.head_radius,
        filled: arch.head == HeadStyle::Filled,
    };

    let left_foot = foot_position(t, 0.0, &gait, config.foot_forward);
    let right_foot = foot_position(t, PI, &gait, config.foot_forward);

    let left_arm = arm(shoulder, t, 0.0, config);
    let right_arm = arm(shoulder, t, PI, config);

    Pose {
        phase: t,
        gait,
        hip,
        shoulder,
        head,
        left_leg: solve_leg(hip, left_foot, arch, config.ik_epsilon),
        right_leg: solve_leg(hip, right_foot, arch, config.ik_epsilon),
        left_arm: arch.shows_left_arm.then_some(left_arm),
        right_arm,
        ornament: ornament(arch, &head, shoulder, t, speed),
        torso_width: arch.torso_width,
        limb_width: arch.limb_width,
    }
}

fn ornament(arch: &Archetype, head: &Head, shoulder: Point, t: f64, speed: f64) -> Option<Ornament> {
    let c = head.center;
    let r = head.radius;
    match arch.ornament {
        OrnamentKind::None => None,
        OrnamentKind::Scarf => {
            let flow = speed * 2.0;
            Some(Ornament::Scarf {
                start: shoulder,
                control: shoulder.offset(-10.0 - flow, (t * 3.0).sin() * 5.0),
                end: shoulder.offset(-20.0 - flow, 10.0),
            })
        }
        OrnamentKind::Visor => Some(Ornament::Visor {
            center: c,
            half: r * 2.0 / 3.0,
        }),
        OrnamentKind::Spike => Some(Ornament::Spike {
            base: c.offset(0.0, -r),
            tip: c.offset(-r * 5.0 / 6.0, -2.0 * r),
        }),
        OrnamentKind::Lens => Some(Ornament::Lens {
            center: c,
            rx: r * 2.0 / 3.0,
            ry: r,
            rotation: 0.2,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_straight_leg_knee_at_midpoint() {
        let knee = solve_knee(
            Point::new(0.0, 0.0),
            Point::new(22.0, 0.0),
            11.0,
            11.0,
            1.0,
            0.01,
        );
        assert!(close(knee.x, 11.0, 0.05), "{knee:?}");
        assert!(close(knee.y, 0.0, 0.5), "{knee:?}");
    }

    #[test]
    fn test_reach_clamps_both_ends() {
        assert_eq!(reach(100.0, 11.0, 11.0, 0.01), 22.0 - 0.01);
        assert_eq!(reach(15.0, 11.0, 11.0, 0.01), 15.0);
        // Inside |thigh - shin| there is no triangle: fully extended.
        assert_eq!(reach(0.5, 13.0, 14.0, 0.01), 13.0 + 14.0 - 0.01);
        assert_eq!(reach(0.0, 13.0, 14.0, 0.01), 13.0 + 14.0 - 0.01);
        // Exactly |thigh - shin| still folds normally.
        assert_eq!(reach(1.0, 13.0, 14.0, 0.01), 1.0);
    }

    #[test]
    fn test_too_close_foot_straightens_leg_toward_it() {
        let hip = Point::new(0.0, -20.0);
        let foot = Point::new(0.0, -19.5);
        let knee = solve_knee(hip, foot, 13.0, 14.0, 1.0, 0.01);
        assert!(knee.x.is_finite() && knee.y.is_finite());
        assert!(close(hip.distance_to(knee), 13.0, 1e-9));
        // Nearly straight: the knee sits on the hip-foot line, below the hip.
        assert!(knee.y > hip.y + 12.0, "{knee:?}");
    }

    #[test]
    fn test_degenerate_targets_stay_finite() {
        let hip = Point::new(3.0, -20.0);
        for foot in [hip, Point::new(500.0, 300.0), Point::new(3.0, -19.999)] {
            let knee = solve_knee(hip, foot, 11.0, 11.0, 1.0, 0.01);
            assert!(knee.x.is_finite() && knee.y.is_finite());
            assert!(close(hip.distance_to(knee), 11.0, 1e-9));
        }
    }

    #[test]
    fn test_reachable_target_keeps_bone_lengths() {
        let hip = Point::new(0.0, -22.0);
        let foot = Point::new(6.0, -4.0);
        for bend in [1.0, -1.0] {
            let knee = solve_knee(hip, foot, 11.0, 11.0, bend, 0.01);
            assert!(close(hip.distance_to(knee), 11.0, 1e-9));
            assert!(close(knee.distance_to(foot), 11.0, 1e-9));
        }
    }

    #[test]
    fn test_knee_bend_sign_mirrors_knee() {
        let hip = Point::new(0.0, -22.0);
        let foot = Point::new(0.0, -6.0);
        let a = solve_knee(hip, foot, 11.0, 11.0, 1.0, 0.01);
        let b = solve_knee(hip, foot, 11.0, 11.0, -1.0, 0.01);
        assert!(close(a.x, -b.x, 1e-9) && close(a.y, b.y, 1e-9));
        assert!(a.x < 0.0);
    }

    #[test]
    fn test_unreachable_foot_is_pulled_in() {
        let arch = archetype(0);
        let hip = Point::new(0.0, -22.0);
        let leg = solve_leg(hip, Point::new(30.0, 0.0), arch, 0.01);
        assert!(close(hip.distance_to(leg.end), 22.0 - 0.01, 1e-9));
        assert!(leg.joint.distance_to(leg.end) <= 11.0 + 1e-6);
    }

    #[test]
    fn test_stance_on_ground_swing_lifted() {
        let gait = Gait {
            lean: 0.0,
            stride: 20.0,
            lift: 18.0,
        };
        for i in 0..100 {
            let t = i as f64 / 100.0 * PI;
            assert_eq!(foot_position(t, 0.0, &gait, 5.0).y, 0.0);
            let swing = foot_position(t + PI + 1e-9, 0.0, &gait, 5.0);
            assert!(swing.y <= 0.0);
        }
        let peak = foot_position(1.5 * PI, 0.0, &gait, 5.0);
        assert!(close(peak.y, -18.0, 1e-9));
        assert!(close(peak.x, 5.0, 1e-9));
    }

    #[test]
    fn test_stance_moves_backward_swing_forward() {
        let gait = Gait {
            lean: 0.0,
            stride: 20.0,
            lift: 18.0,
        };
        let a = foot_position(0.2, 0.0, &gait, 0.0);
        let b = foot_position(0.4, 0.0, &gait, 0.0);
        assert!(b.x < a.x);
        let c = foot_position(PI + 0.2, 0.0, &gait, 0.0);
        let d = foot_position(PI + 0.4, 0.0, &gait, 0.0);
        assert!(d.x > c.x);
    }

    #[test]
    fn test_legs_half_a_cycle_apart() {
        let gait = Gait::at(&GaitConfig::default(), 6.0);
        for i in 0..64 {
            let t = i as f64 * 0.1;
            let left = foot_position(t + PI, 0.0, &gait, 5.0);
            let right = foot_position(t, PI, &gait, 5.0);
            assert!(close(left.x, right.x, 1e-9) && close(left.y, right.y, 1e-9));
        }
    }

    #[test]
    fn test_gait_grows_with_speed_and_caps() {
        let cfg = GaitConfig::default();
        let slow = Gait::at(&cfg, 0.0);
        let mid = Gait::at(&cfg, 6.0);
        let fast = Gait::at(&cfg, 1000.0);
        assert_eq!(slow, Gait { lean: 0.0, stride: 14.0, lift: 12.0 });
        assert_eq!(mid, Gait { lean: 9.0, stride: 20.0, lift: 18.0 });
        assert_eq!(fast, Gait { lean: 20.0, stride: 30.0, lift: 26.0 });
    }

    #[test]
    fn test_pose_is_distance_driven() {
        let cfg = GaitConfig::default();
        let a = pose(37.0, 6.0, 0, &cfg);
        let b = pose(37.0, 6.0, 0, &cfg);
        assert_eq!(a, b);
        let next_cycle = pose(37.0 + cfg.cycle_length, 6.0, 0, &cfg);
        assert!(close(a.left_leg.end.x, next_cycle.left_leg.end.x, 1e-9));
        assert!(close(a.left_leg.end.y, next_cycle.left_leg.end.y, 1e-9));
    }

    #[test]
    fn test_zero_speed_pose_is_finite() {
        let p = pose(0.0, 0.0, 0, &GaitConfig::default());
        assert_eq!(p.gait.lean, 0.0);
        for pt in [p.hip, p.shoulder, p.left_leg.joint, p.right_leg.joint, p.right_arm.end] {
            assert!(pt.x.is_finite() && pt.y.is_finite());
        }
    }

    #[test]
    fn test_upper_body_layout() {
        let cfg = GaitConfig::default();
        let p = pose(0.0, 6.0, 0, &cfg);
        // cos(0) bob raises the hip to -20.
        assert_eq!(p.hip, Point::new(0.0, -20.0));
        assert_eq!(p.shoulder, Point::new(4.5, -38.0));
        assert_eq!(p.head.center, Point::new(7.5, -46.0));
    }

    #[test]
    fn test_arm_elbow_is_offset_midpoint() {
        let cfg = GaitConfig::default();
        let a = arm(Point::new(0.0, 0.0), 0.0, 0.0, &cfg);
        // phase = PI: hand swung back.
        assert!(close(a.end.x, -12.0, 1e-9));
        assert!(close(a.end.y, 10.0, 1e-9));
        assert!(close(a.joint.x, -10.0, 1e-9));
        assert!(close(a.joint.y, 9.0, 1e-9));
    }

    #[test]
    fn test_archetype_ornaments() {
        let cfg = GaitConfig::default();
        let ninja = pose(10.0, 6.0, 1, &cfg);
        assert!(ninja.head.filled);
        assert!(ninja.left_arm.is_none());
        assert_eq!(ninja.torso_width, 4.0);
        match ninja.ornament {
            Some(Ornament::Scarf { start, end, .. }) => {
                assert_eq!(start, ninja.shoulder);
                assert!(close(end.x, ninja.shoulder.x - 32.0, 1e-9));
            }
            other => panic!("expected scarf, got {other:?}"),
        }
        let punk = pose(10.0, 6.0, 3, &cfg);
        match punk.ornament {
            Some(Ornament::Spike { base, tip }) => {
                assert!(close(base.y, punk.head.center.y - 6.0, 1e-9));
                assert!(close(tip.x, punk.head.center.x - 5.0, 1e-9));
                assert!(close(tip.y, punk.head.center.y - 12.0, 1e-9));
            }
            other => panic!("expected spike, got {other:?}"),
        }
        assert!(pose(10.0, 6.0, 0, &cfg).ornament.is_none());
    }

    #[test]
    fn test_unknown_archetype_falls_back() {
        assert_eq!(archetype(99).name, "Stickman");
        let cfg = GaitConfig::default();
        assert_eq!(pose(5.0, 6.0, 99, &cfg), pose(5.0, 6.0, 0, &cfg));
    }

    #[test]
    fn test_strider_bends_knees_the_other_way() {
        let cfg = GaitConfig::default();
        let strider = ARCHETYPES.iter().position(|a| a.knee_bend < 0.0).unwrap();
        let p = pose(0.0, 0.0, strider, &cfg);
        let hip = p.hip;
        // The knee lands on the opposite side of the hip-foot line.
        let foot = p.left_leg.end;
        let cross = (foot.x - hip.x) * (p.left_leg.joint.y - hip.y)
            - (foot.y - hip.y) * (p.left_leg.joint.x - hip.x);
        assert!(cross < 0.0);
        let std = pose(0.0, 0.0, 0, &cfg);
        let foot = std.left_leg.end;
        let cross = (foot.x - std.hip.x) * (std.left_leg.joint.y - std.hip.y)
            - (foot.y - std.hip.y) * (std.left_leg.joint.x - std.hip.x);
        assert!(cross > 0.0);
    }
}
