// Host-side tests for the hourglass fluid surface.

use chrono_dream::fluid::{compute_surface, tilt_influence, PhaseAccumulators};
use chrono_dream::{TiltVector, TimeSample};

// sum of the three wave amplitudes
const MAX_WAVE: f32 = 16.0;

#[test]
fn level_surface_sits_at_day_progress() {
    let s = compute_surface(
        &TimeSample::at(12, 0, 0),
        TiltVector::ZERO,
        [0.0; 3],
        200.0,
        400.0,
        0,
    );
    assert!((s.fluid_top - 200.0).abs() < 1e-3);
    assert_eq!(s.samples.len(), 41);
    assert_eq!(s.percent(), 50);
    for &y in &s.samples {
        assert!((y - s.fluid_top).abs() <= MAX_WAVE + 1e-3, "y {y}");
    }
}

#[test]
fn fill_rises_through_the_day() {
    let at = |h| {
        let t = TimeSample::at(h, 0, 0);
        compute_surface(&t, TiltVector::ZERO, [0.0; 3], 100.0, 400.0, 0)
    };
    let morning = at(6);
    let evening = at(18);
    assert_eq!(morning.percent(), 25);
    assert_eq!(evening.percent(), 75);
    assert!(evening.fluid_top < morning.fluid_top);
}

#[test]
fn tilt_slopes_the_surface() {
    let t = TimeSample::at(12, 0, 0);
    let s = compute_surface(&t, TiltVector::new(0.0, 1.0), [0.0; 3], 200.0, 400.0, 0);
    assert!((s.tilt_influence - 50.0).abs() < 1e-4);
    let left = s.samples[0];
    let right = *s.samples.last().unwrap();
    // waves are damped to 40% at full tilt
    assert!(left - right > 100.0 - 2.0 * MAX_WAVE * 0.4 - 1e-3);
    assert!(left - right < 100.0 + 2.0 * MAX_WAVE * 0.4 + 1e-3);
}

#[test]
fn tilt_influence_is_limited() {
    assert_eq!(tilt_influence(TiltVector { pitch: 0.0, roll: 2.0 }), 60.0);
    assert_eq!(tilt_influence(TiltVector { pitch: 0.0, roll: -2.0 }), -60.0);
    assert_eq!(tilt_influence(TiltVector::ZERO), 0.0);
}

#[test]
fn top_y_interpolates_between_samples() {
    let s = compute_surface(
        &TimeSample::at(9, 30, 0),
        TiltVector::new(0.2, -0.4),
        [0.7, 1.3, 2.9],
        203.0,
        300.0,
        0,
    );
    assert_eq!(s.top_y(0.0), s.samples[0]);
    assert!((s.top_y(203.0) - *s.samples.last().unwrap()).abs() < 1e-3);
    let mid = s.top_y(7.5);
    let (a, b) = (s.samples[1], s.samples[2]);
    assert!(mid >= a.min(b) - 1e-4 && mid <= a.max(b) + 1e-4);
    assert_eq!(s.sample_x(s.samples.len() - 1), 203.0);
}

#[test]
fn bubbles_stay_under_the_surface() {
    for step in 0..50 {
        let phases = [step as f64 * 0.3, step as f64 * 0.5, step as f64 * 0.7];
        let t = TimeSample::at(8, 0, 0);
        let s = compute_surface(&t, TiltVector::new(0.0, 0.5), phases, 200.0, 400.0, 15);
        assert!(s.bubbles.len() <= 15);
        for b in &s.bubbles {
            assert!(b.y > s.fluid_top && b.y <= 400.0, "bubble at {}", b.y);
        }
    }
}

#[test]
fn bubbles_drift_with_tilt_more_at_depth() {
    let t = TimeSample::at(12, 0, 0);
    let phases = [0.4, 0.9, 2.0];
    let flat = compute_surface(&t, TiltVector::ZERO, phases, 200.0, 400.0, 15);
    let tilted = compute_surface(&t, TiltVector::new(0.0, 0.8), phases, 200.0, 400.0, 15);
    assert!((tilted.tilt_influence - 40.0).abs() < 1e-4);
    assert_eq!(flat.bubbles.len(), tilted.bubbles.len());
    assert!(flat.bubbles.len() > 3);

    let depth = tilted.height - tilted.fluid_top;
    let mut shifts: Vec<(f32, f32)> = flat
        .bubbles
        .iter()
        .zip(&tilted.bubbles)
        .map(|(a, b)| {
            assert_eq!(a.y, b.y);
            (b.y, b.x - a.x)
        })
        .collect();
    for &(y, shift) in &shifts {
        // drift follows the tilt and grows from the surface to the bottom
        let expected = 40.0 * 0.8 * (y - tilted.fluid_top) / depth;
        assert!((shift - expected).abs() < 1e-3, "y {y}: shift {shift}, expected {expected}");
        assert!(shift >= 0.0);
    }
    shifts.sort_by(|a, b| a.0.total_cmp(&b.0));
    for w in shifts.windows(2) {
        assert!(w[1].1 >= w[0].1 - 1e-3, "{:?} then {:?}", w[0], w[1]);
    }
    let deepest = shifts.last().unwrap();
    let shallowest = shifts.first().unwrap();
    assert!(deepest.1 > shallowest.1);

    let against = compute_surface(&t, TiltVector::new(0.0, -0.8), phases, 200.0, 400.0, 15);
    for (a, b) in flat.bubbles.iter().zip(&against.bubbles) {
        assert!(b.x <= a.x);
    }
}

#[test]
fn phases_only_move_forward() {
    let mut p = PhaseAccumulators::new();
    p.advance(1.0);
    let first = p.phases();
    p.advance(0.0);
    p.advance(-3.0);
    p.advance(f64::NAN);
    assert_eq!(p.phases(), first);
    p.advance(0.5);
    for (a, b) in first.iter().zip(p.phases()) {
        assert!(b > *a);
    }
    // 3 s period: one full turn per 3 s
    let mut q = PhaseAccumulators::new();
    q.advance(3.0);
    assert!((q.phases()[0] - std::f64::consts::TAU).abs() < 1e-9);
}

#[test]
fn huge_phases_stay_finite() {
    let phases = [1e12, 3e12, 7e12];
    let s = compute_surface(&TimeSample::at(20, 0, 0), TiltVector::ZERO, phases, 120.0, 240.0, 15);
    assert!(s.samples.iter().all(|y| y.is_finite()));
    assert!(s.bubbles.iter().all(|b| b.x.is_finite() && b.y.is_finite()));
}

#[test]
fn zero_width_gives_a_single_sample() {
    let s = compute_surface(&TimeSample::at(12, 0, 0), TiltVector::ZERO, [0.0; 3], 0.0, 100.0, 5);
    assert_eq!(s.samples.len(), 1);
    assert_eq!(s.top_y(50.0), s.samples[0]);
}
