// Character archetype table.
// Every archetype runs on the same gait and IK machinery; entries only change
// proportions, knee direction, line weights and the ornament drawn on top.
use super::{Archetype, HeadStyle, OrnamentKind};

pub static ARCHETYPES: [Archetype; 6] = [
    Archetype {
        name: "Stickman",
        thigh: 11.0,
        shin: 11.0,
        hip_height: 22.0,
        knee_bend: 1.0,
        head_radius: 6.0,
        torso_width: 3.0,
        limb_width: 3.0,
        head: HeadStyle::Outline,
        ornament: OrnamentKind::None,
        shows_left_arm: true,
        rare: false,
    },
    Archetype {
        name: "Ninja",
        thigh: 11.0,
        shin: 11.0,
        hip_height: 22.0,
        knee_bend: 1.0,
        head_radius: 6.0,
        torso_width: 4.0,
        limb_width: 3.0,
        head: HeadStyle::Filled,
        ornament: OrnamentKind::Scarf,
        // Arm tucked behind the body, only the trailing scarf shows.
        shows_left_arm: false,
        rare: false,
    },
    Archetype {
        name: "Robot",
        thigh: 11.0,
        shin: 11.0,
        hip_height: 22.0,
        knee_bend: 1.0,
        head_radius: 6.0,
        torso_width: 3.0,
        limb_width: 3.0,
        head: HeadStyle::Outline,
        ornament: OrnamentKind::Visor,
        shows_left_arm: true,
        rare: false,
    },
    Archetype {
        name: "Punk",
        thigh: 11.0,
        shin: 11.0,
        hip_height: 22.0,
        knee_bend: 1.0,
        head_radius: 6.0,
        torso_width: 3.0,
        limb_width: 3.0,
        head: HeadStyle::Outline,
        ornament: OrnamentKind::Spike,
        shows_left_arm: true,
        rare: false,
    },
    Archetype {
        name: "Diver",
        thigh: 11.0,
        shin: 11.0,
        hip_height: 22.0,
        knee_bend: 1.0,
        head_radius: 6.0,
        torso_width: 3.0,
        limb_width: 3.0,
        head: HeadStyle::Outline,
        ornament: OrnamentKind::Lens,
        shows_left_arm: true,
        rare: false,
    },
    // Rare: long digitigrade legs, knees bending the other way.
    Archetype {
        name: "Strider",
        thigh: 13.0,
        shin: 14.0,
        hip_height: 27.0,
        knee_bend: -1.0,
        head_radius: 5.0,
        torso_width: 3.0,
        limb_width: 2.5,
        head: HeadStyle::Outline,
        ornament: OrnamentKind::None,
        shows_left_arm: true,
        rare: true,
    },
];
