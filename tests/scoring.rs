//! Tests for the pairwise scorers: tempo, key, vibe and energy curve.

use harmonic_set::camelot::WHEEL_POSITIONS;
use harmonic_set::energy::{CurveError, IN_RANGE_BONUS, MAX_PENALTY};
use harmonic_set::harmony::{self, CREATIVE_ICON, INVALID_ICON, MOOD_SWAP_ICON};
use harmonic_set::tempo::within_tolerance;
use harmonic_set::{
    analyze_key_strings, analyze_transition, energy_bonus, tempo_score, CamelotKey, EnergyCurve,
    Library, Mode, Segment, Track, TransitionLabel, VibeAnnotation, VibeWeights,
};
use std::collections::HashSet;

const EPS: f64 = 1e-9;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn key(s: &str) -> CamelotKey {
    s.parse().unwrap()
}

fn all_keys() -> Vec<CamelotKey> {
    (1..=WHEEL_POSITIONS)
        .flat_map(|p| [Mode::Minor, Mode::Major].map(|m| CamelotKey::new(p, m).unwrap()))
        .collect()
}

#[test]
fn tempo_linear_decay() {
    assert_close(tempo_score(120.0, 121.0, 5), 0.8);
    assert_close(tempo_score(121.0, 120.0, 5), 0.8);
    assert_close(tempo_score(120.0, 120.0, 5), 1.0);
    assert_close(tempo_score(120.0, 125.0, 5), 0.0);
    assert_close(tempo_score(120.0, 126.0, 5), 0.0);
}

#[test]
fn tempo_zero_tolerance() {
    assert_close(tempo_score(128.0, 128.0, 0), 1.0);
    assert_close(tempo_score(128.0, 128.5, 0), 0.0);
    assert!(within_tolerance(128.0, 128.0, 0));
    assert!(!within_tolerance(128.0, 129.0, 0));
}

#[test]
fn tempo_invalid_bpm_scores_zero() {
    assert_close(tempo_score(f64::NAN, 120.0, 8), 0.0);
    assert_close(tempo_score(120.0, f64::INFINITY, 8), 0.0);
    assert_close(tempo_score(0.0, 0.0, 8), 0.0);
    assert_close(tempo_score(-120.0, -120.0, 8), 0.0);
}

#[test]
fn tempo_score_bounds() {
    for tolerance in 1..=12u32 {
        for a in 100..=120 {
            for b in 100..=120 {
                let (a, b) = (f64::from(a), f64::from(b));
                let s = tempo_score(a, b, tolerance);
                let diff = (a - b).abs();
                assert!((0.0..=1.0).contains(&s));
                assert_eq!(s == 1.0, diff == 0.0, "a={a} b={b} tol={tolerance}");
                assert_eq!(
                    s == 0.0,
                    diff >= f64::from(tolerance),
                    "a={a} b={b} tol={tolerance}"
                );
            }
        }
    }
}

#[test]
fn same_key_is_perfect() {
    for k in all_keys() {
        let a = analyze_transition(k, k);
        assert_eq!(a.jump, 0);
        assert!(!a.flip);
        assert!(a.compatible);
        assert_close(a.key_score, 1.0);
        assert_eq!(a.label, TransitionLabel::PerfectVibe);
        assert_eq!(a.label.to_string(), "Perfect Vibe");
        assert_eq!(a.effect, "Perfect Harmony");
        assert_eq!(a.icon, "🎯");
    }
}

#[test]
fn mode_flip_in_place() {
    let a = analyze_transition(key("1A"), key("1B"));
    assert_eq!(a.jump, 0);
    assert!(a.flip);
    assert_eq!(a.label.to_string(), "Vibe Change");
    assert_eq!(a.icon, MOOD_SWAP_ICON);
    assert_close(a.key_score, 0.98);
}

#[test]
fn five_steps_clockwise() {
    let a = analyze_transition(key("1A"), key("6A"));
    assert_eq!(a.jump, 5);
    assert!(!a.flip);
    assert_eq!(a.label.to_string(), "Vibe+5");
    assert_eq!(a.effect, "Sharp Dissonance");
    assert!((a.key_score - 0.441).abs() < 1e-3);
    assert_close(a.key_score, 1.0 - 5f64.powf(1.5) * 0.05);
}

#[test]
fn counter_clockwise_labels_are_negative() {
    let a = analyze_transition(key("8A"), key("5A"));
    assert_eq!(a.jump, 9);
    assert_eq!(a.label, TransitionLabel::Vibe { step: -3, creative: false });
    assert_eq!(a.label.to_string(), "Vibe-3");
    assert_eq!(a.effect, "Deep Energy Drop");
    assert_close(a.key_score, 1.0 - 3f64.powf(1.5) * 0.05);

    let wrap = analyze_transition(key("12B"), key("1B"));
    assert_eq!(wrap.jump, 1);
    assert_eq!(wrap.label.to_string(), "Vibe+1");

    let back = analyze_transition(key("1B"), key("12B"));
    assert_eq!(back.jump, 11);
    assert_eq!(back.label.to_string(), "Vibe-1");
}

#[test]
fn creative_flip_across_wheel() {
    let a = analyze_transition(key("8A"), key("2B"));
    assert_eq!(a.jump, 6);
    assert!(a.flip);
    assert_eq!(a.label.to_string(), "Creative Vibe+6");
    assert_eq!(a.icon, CREATIVE_ICON);
    assert_eq!(a.effect, "Super Boost");
    assert_close(a.key_score, 1.0 - (6f64.powf(1.5) * 0.05 + 0.05));

    let down = analyze_transition(key("8B"), key("6A"));
    assert_eq!(down.label.to_string(), "Creative Vibe-2");
    assert_eq!(down.icon, CREATIVE_ICON);
}

#[test]
fn key_score_properties_over_the_wheel() {
    for from in all_keys() {
        for to in all_keys() {
            let a = analyze_transition(from, to);
            assert!(a.jump < WHEEL_POSITIONS);
            assert!((0.0..=1.0).contains(&a.key_score));
            assert_eq!(a.key_score == 1.0, a.jump == 0 && !a.flip);
            assert_eq!(a.flip, from.mode() != to.mode());
            assert_eq!(
                a.effect,
                harmony::jump_effect(a.jump).unwrap().description
            );
        }
    }
}

#[test]
fn twenty_four_distinct_labels() {
    let from = key("4A");
    let labels: HashSet<String> = all_keys()
        .into_iter()
        .map(|to| analyze_transition(from, to).label.to_string())
        .collect();
    assert_eq!(labels.len(), 24);
    assert!(labels.contains("Creative Vibe-5"));
    assert!(labels.contains("Vibe+6"));
}

#[test]
fn invalid_keys_degrade() {
    for (from, to) in [("13A", "8A"), ("8A", "8C"), ("", "1B"), ("A8", "8A")] {
        let a = analyze_key_strings(from, to);
        assert!(!a.compatible);
        assert_eq!(a.label, TransitionLabel::InvalidKey);
        assert_eq!(a.label.to_string(), "Invalid Key");
        assert_eq!(a.icon, INVALID_ICON);
        assert_close(a.key_score, 0.0);
    }

    let ok = analyze_key_strings("8a", " 9A ");
    assert!(ok.compatible);
    assert_eq!(ok.label.to_string(), "Vibe+1");
}

fn library(rows: &[(&str, f64, &str)]) -> Library {
    Library::new(
        rows.iter()
            .map(|&(title, bpm, k)| Track::new(title, "Someone", bpm, key(k)))
            .collect(),
    )
    .unwrap()
}

#[test]
fn vibe_blends_tempo_and_mode() {
    let lib = library(&[("a", 100.0, "8A"), ("b", 110.0, "8B"), ("c", 120.0, "8A")]);
    let vibes = VibeAnnotation::compute(&lib, VibeWeights { bpm: 0.6, key: 0.4 });
    assert_close(vibes.get(0).unwrap(), 0.34);
    assert_close(vibes.get(1).unwrap(), 0.7);
    assert_close(vibes.get(2).unwrap(), 0.94);
    assert!(vibes.get(3).is_none());
}

#[test]
fn vibe_depends_on_weights() {
    let lib = library(&[("a", 100.0, "8A"), ("b", 120.0, "8B")]);
    let tempo_only = VibeAnnotation::compute(&lib, VibeWeights { bpm: 1.0, key: 0.0 });
    let key_only = VibeAnnotation::compute(&lib, VibeWeights { bpm: 0.0, key: 1.0 });
    assert_eq!(tempo_only.values(), &[0.0, 1.0]);
    assert_eq!(key_only.values(), &[0.85, 1.0]);
    assert_ne!(tempo_only, key_only);
}

#[test]
fn vibe_with_single_tempo_is_neutral() {
    let lib = library(&[("a", 124.0, "8A"), ("b", 124.0, "3B")]);
    let vibes = VibeAnnotation::compute(&lib, VibeWeights { bpm: 0.6, key: 0.4 });
    assert_close(vibes.get(0).unwrap(), 0.6 * 0.5 + 0.4 * 0.85);
    assert_close(vibes.get(1).unwrap(), 0.6 * 0.5 + 0.4);
    assert!(vibes.values().iter().all(|v| v.is_finite()));
}

#[test]
fn vibe_stays_in_unit_range() {
    let lib = library(&[
        ("a", 90.0, "1A"),
        ("b", 100.0, "2B"),
        ("c", 128.0, "3A"),
        ("d", 174.0, "4B"),
    ]);
    for step in 0..=20 {
        let bpm = f64::from(step) / 20.0;
        let vibes = VibeAnnotation::compute(&lib, VibeWeights { bpm, key: 1.0 - bpm });
        assert!(vibes
            .values()
            .iter()
            .all(|v| (-EPS..=1.0 + EPS).contains(v)));
    }
}

#[test]
fn energy_bonus_in_and_out_of_range() {
    assert_close(energy_bonus(0.5, &Segment::Mid), IN_RANGE_BONUS);
    assert_close(energy_bonus(0.4, &Segment::Down), IN_RANGE_BONUS);
    assert_close(energy_bonus(0.4, &Segment::Mid), IN_RANGE_BONUS);
    assert_close(energy_bonus(1.0, &Segment::Up), IN_RANGE_BONUS);
    assert_close(energy_bonus(0.9, &Segment::Mid), -0.2);
    assert_close(energy_bonus(0.3, &Segment::Up), -0.4);
    assert_close(energy_bonus(1.5, &Segment::Down), MAX_PENALTY);
}

#[test]
fn unknown_segment_accepts_everything() {
    let other = Segment::Other("sideways".to_string());
    for step in 0..=10 {
        assert_close(energy_bonus(f64::from(step) / 10.0, &other), IN_RANGE_BONUS);
    }
}

#[test]
fn energy_bonus_bounds() {
    for segment in [Segment::Down, Segment::Mid, Segment::Up] {
        for step in -20..=40 {
            let b = energy_bonus(f64::from(step) / 20.0, &segment);
            assert!((MAX_PENALTY..=IN_RANGE_BONUS).contains(&b));
        }
    }
}

#[test]
fn curve_parsing() {
    let curve: EnergyCurve = " Up - MID-down ".parse().unwrap();
    assert_eq!(curve.segments(), &[Segment::Up, Segment::Mid, Segment::Down]);
    assert_eq!(curve.to_string(), "up-mid-down");

    let odd: EnergyCurve = "up-wild".parse().unwrap();
    assert_eq!(odd.segments()[1], Segment::Other("wild".to_string()));

    assert_eq!("".parse::<EnergyCurve>(), Err(CurveError::Empty));
    assert_eq!(
        "up--down".parse::<EnergyCurve>(),
        Err(CurveError::EmptySegment { index: 1 })
    );
    assert_eq!(EnergyCurve::new(Vec::new()), Err(CurveError::Empty));
    assert_eq!(EnergyCurve::default().to_string(), "up-down-mid-up");
}

#[test]
fn curve_plan_splits_positions() {
    let curve: EnergyCurve = "up-down".parse().unwrap();
    let plan = curve.plan(10).unwrap();
    assert_eq!(plan.segment_size(), 5);
    for p in 0..5 {
        assert_eq!(plan.segment_at(p), &Segment::Up);
    }
    for p in 5..10 {
        assert_eq!(plan.segment_at(p), &Segment::Down);
    }
}

#[test]
fn curve_plan_remainder_goes_to_last_segment() {
    let curve: EnergyCurve = "up-down-mid".parse().unwrap();
    let plan = curve.plan(10).unwrap();
    assert_eq!(plan.segment_size(), 3);
    assert_eq!(plan.segment_index(8), 2);
    assert_eq!(plan.segment_index(9), 2);
    assert_eq!(plan.segment_at(9), &Segment::Mid);
}

#[test]
fn curve_plan_rejects_short_sets() {
    let curve: EnergyCurve = "up-down-mid".parse().unwrap();
    assert_eq!(
        curve.plan(2).unwrap_err(),
        CurveError::TooManySegments {
            segments: 3,
            target_length: 2
        }
    );
}
