// Sanity checks for the static tables shipped with the crate.

use std::collections::HashSet;

use rooftop_runner::character::{HeadStyle, OrnamentKind};
use rooftop_runner::{ARCHETYPES, GameConfig};
use rooftop_runner::{BACKGROUND_COLORS, CITY_COLORS, WINDOW_COLORS};

fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[test]
fn palettes_are_unique_hex_colors() {
    for palette in [CITY_COLORS, WINDOW_COLORS, BACKGROUND_COLORS] {
        assert!(!palette.is_empty());
        let unique: HashSet<_> = palette.iter().map(|c| c.to_ascii_uppercase()).collect();
        assert_eq!(unique.len(), palette.len(), "{palette:?}");
        for color in palette {
            assert!(is_hex_color(color), "{color}");
        }
    }
}

#[test]
fn window_palette_has_strip_and_band_colors() {
    // Vertical strips and horizontal bands read indices 2 and 3.
    assert!(WINDOW_COLORS.len() >= 4);
}

#[test]
fn one_backdrop_per_background_choice() {
    assert_eq!(BACKGROUND_COLORS.len(), GameConfig::default().backgrounds);
}

#[test]
fn archetype_table_is_consistent() {
    let names: HashSet<_> = ARCHETYPES.iter().map(|a| a.name).collect();
    assert_eq!(names.len(), ARCHETYPES.len());

    for arch in ARCHETYPES.iter() {
        assert!(arch.thigh > 0.0 && arch.shin > 0.0, "{}", arch.name);
        assert!(arch.head_radius > 0.0, "{}", arch.name);
        assert!(arch.torso_width > 0.0 && arch.limb_width > 0.0, "{}", arch.name);
        assert!(arch.knee_bend == 1.0 || arch.knee_bend == -1.0, "{}", arch.name);
        // Standing hip sits at full leg length.
        assert!((arch.hip_height - (arch.thigh + arch.shin)).abs() < 1e-9, "{}", arch.name);
    }
}

#[test]
fn archetype_roster_matches_the_menu() {
    let stickman = &ARCHETYPES[0];
    assert_eq!(stickman.name, "Stickman");
    assert_eq!(stickman.ornament, OrnamentKind::None);

    let ninja = &ARCHETYPES[1];
    assert_eq!(ninja.head, HeadStyle::Filled);
    assert_eq!(ninja.ornament, OrnamentKind::Scarf);
    assert!(!ninja.shows_left_arm);
    assert!(ninja.torso_width > stickman.torso_width);

    let ornaments: Vec<_> = ARCHETYPES[2..5].iter().map(|a| a.ornament).collect();
    assert_eq!(
        ornaments,
        vec![OrnamentKind::Visor, OrnamentKind::Spike, OrnamentKind::Lens]
    );

    // Exactly one archetype bends its knees the other way, and it is the rare one.
    assert_eq!(ARCHETYPES.iter().filter(|a| a.knee_bend < 0.0).count(), 1);
    let rare: Vec<_> = ARCHETYPES.iter().filter(|a| a.rare).collect();
    assert_eq!(rare.len(), 1);
    assert!(rare[0].knee_bend < 0.0);
    assert!(ARCHETYPES[..5].iter().all(|a| !a.rare));
}
