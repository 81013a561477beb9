// Host-side tests for the particle pools.

use chrono_dream::constants::{
    BG_ALPHA_RANGE, BG_PULSE_SCALE, BG_RESPAWN_Y, FG_ALPHA_FLOOR, FG_ALPHA_RANGE, FG_PULSE_SCALE,
    FG_RESPAWN_Y,
};
use chrono_dream::error::ConfigError;
use chrono_dream::particles::{
    background_spawn_color, foreground_spawn_color, init_pool, pulse_target, render, tick,
    LayerKind, ParticleConfig, ParticleShape,
};

fn background(count: usize, seed: u64) -> chrono_dream::particles::Pool {
    init_pool(
        ParticleConfig::background(count, 400.0, 800.0),
        seed,
        background_spawn_color,
    )
    .unwrap()
}

fn foreground(count: usize, seed: u64) -> chrono_dream::particles::Pool {
    init_pool(
        ParticleConfig::foreground(count, 400.0, 800.0),
        seed,
        foreground_spawn_color,
    )
    .unwrap()
}

#[test]
fn same_seed_gives_the_same_pool() {
    let mut a = background(25, 7);
    let mut b = background(25, 7);
    assert_eq!(a.particles(), b.particles());
    for _ in 0..300 {
        a.advance(1.0 / 60.0);
        b.advance(1.0 / 60.0);
    }
    assert_eq!(a.particles(), b.particles());
    assert_ne!(background(25, 8).particles(), background(25, 7).particles());
}

#[test]
fn particles_spawn_below_the_visible_area() {
    let pool = background(25, 1);
    for p in pool.particles() {
        assert!(p.y >= 800.0 && p.y <= 1000.0, "y {}", p.y);
        assert!(p.x >= 0.0 && p.x <= 400.0);
        assert!((10.0..=50.0).contains(&p.size));
    }
    let fg = foreground(10, 1);
    for p in fg.particles() {
        assert!(ParticleShape::FOREGROUND.contains(&p.shape));
    }
}

#[test]
fn background_pool_keeps_its_count_and_bounds() {
    let mut pool = background(25, 3);
    for _ in 0..2000 {
        pool.advance(1.0 / 60.0);
        assert_eq!(pool.len(), 25);
        for p in pool.particles() {
            assert!(p.y >= BG_RESPAWN_Y, "y {}", p.y);
            assert!(p.alpha >= BG_ALPHA_RANGE.0 && p.alpha <= BG_ALPHA_RANGE.1);
            assert!((0.0..=360.0).contains(&p.rotation));
        }
    }
    let mut ids: Vec<usize> = pool.particles().iter().map(|p| p.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (0..25).collect::<Vec<_>>());
}

#[test]
fn foreground_alpha_fades_to_its_floor() {
    let mut pool = foreground(10, 4);
    for _ in 0..2000 {
        pool.advance(1.0 / 60.0);
        for p in pool.particles() {
            assert!(p.y >= FG_RESPAWN_Y);
            assert!(p.alpha >= FG_ALPHA_FLOOR && p.alpha <= FG_ALPHA_RANGE.1);
        }
    }
}

#[test]
fn zero_or_invalid_dt_changes_nothing() {
    let mut pool = background(25, 5);
    let before = pool.particles().to_vec();
    pool.advance(0.0);
    pool.advance(-1.0);
    pool.advance(f32::NAN);
    assert_eq!(pool.particles(), before.as_slice());
}

#[test]
fn tick_matches_in_place_advance() {
    let mut a = foreground(10, 9);
    let b = tick(foreground(10, 9), 0.032);
    a.advance(0.032);
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn empty_pool_is_valid() {
    let mut pool = background(0, 1);
    pool.advance(1.0);
    assert!(pool.is_empty());
    assert!(render(&pool, 1.0).is_empty());
}

#[test]
fn negative_count_is_a_config_error() {
    let err = ParticleConfig::background(0, 100.0, 100.0)
        .with_signed_count(-3)
        .unwrap_err();
    assert_eq!(err, ConfigError::NegativeParticleCount(-3));
}

#[test]
fn negative_speed_is_a_config_error() {
    let config = ParticleConfig::background(5, 100.0, 100.0).with_speed_range(-1.0, 2.0);
    let err = init_pool(config, 1, background_spawn_color).unwrap_err();
    assert_eq!(err, ConfigError::InvalidSpeed { min: -1.0, max: 2.0 });
}

#[test]
fn zero_canvas_is_a_config_error() {
    let config = ParticleConfig::foreground(5, 0.0, 100.0);
    assert!(matches!(
        init_pool(config, 1, foreground_spawn_color),
        Err(ConfigError::InvalidCanvas { .. })
    ));
}

#[test]
fn pulse_scales_output_only() {
    let pool = background(25, 6);
    let sizes: Vec<f32> = pool.particles().iter().map(|p| p.size).collect();
    let pulsed = render(&pool, BG_PULSE_SCALE);
    for (inst, size) in pulsed.iter().zip(&sizes) {
        assert!((inst.size - size * BG_PULSE_SCALE).abs() < 1e-4);
    }
    let after: Vec<f32> = pool.particles().iter().map(|p| p.size).collect();
    assert_eq!(after, sizes);
    let rest = render(&pool, 1.0);
    for (inst, size) in rest.iter().zip(&sizes) {
        assert_eq!(inst.size, *size);
    }
}

#[test]
fn render_folds_alpha_into_color() {
    let pool = foreground(10, 2);
    for (inst, p) in render(&pool, 1.0).iter().zip(pool.particles()) {
        assert!((inst.color[3] - p.color[3] * p.alpha).abs() < 1e-6);
        assert!((inst.rotation - p.rotation.to_radians()).abs() < 1e-6);
    }
}

#[test]
fn pulse_targets_enlarge_on_even_seconds() {
    assert_eq!(pulse_target(LayerKind::Background, true), BG_PULSE_SCALE);
    assert_eq!(pulse_target(LayerKind::Foreground, true), FG_PULSE_SCALE);
    assert_eq!(pulse_target(LayerKind::Background, false), 1.0);
    assert_eq!(pulse_target(LayerKind::Foreground, false), 1.0);
}

#[test]
fn resize_moves_future_spawns_only() {
    let mut pool = background(25, 11);
    let before = pool.particles().to_vec();
    pool.resize(100.0, 200.0);
    assert_eq!(pool.particles(), before.as_slice());
    assert_eq!(pool.config().width, 100.0);
    pool.resize(-1.0, 50.0);
    assert_eq!(pool.config().width, 100.0);
}
