/// Simulation, compositing and interaction tuning constants.
///
/// These constants express intended behavior (periods, clamp limits, alpha
/// ranges) and keep magic numbers out of the renderers and simulators.

// Clock polling
pub const CLOCK_POLL_INTERVAL_MS: u64 = 50;
pub const FRAME_INTERVAL_MS: u64 = 16; // nominal particle tick period (~60fps)

// Tilt normalisation
pub const STANDARD_GRAVITY: f32 = 9.8;

// Tilt smoothing spring (low bounciness, low stiffness)
pub const TILT_SPRING_STIFFNESS: f32 = 200.0; // k, per unit mass
pub const TILT_SPRING_DAMPING_RATIO: f32 = 0.75; // < 1 overshoots before settling
pub const SPRING_MAX_SUBSTEP_SEC: f32 = 1.0 / 240.0;
pub const CARD_SPRING_STIFFNESS: f32 = 200.0;
pub const CARD_SPRING_DAMPING_RATIO: f32 = 0.5;
pub const PULSE_SPRING_STIFFNESS: f32 = 1500.0;
pub const PULSE_SPRING_DAMPING_RATIO: f32 = 1.0; // critically damped, no overshoot

// Background particle layer
pub const BG_PARTICLE_COUNT: usize = 25;
pub const BG_RESPAWN_Y: f32 = -100.0;
pub const BG_SPAWN_Y_JITTER: f32 = 200.0; // spawn this far below the bottom edge at most
pub const BG_SIZE_RANGE: (f32, f32) = (10.0, 50.0);
pub const BG_SPEED_RANGE: (f32, f32) = (0.3, 1.8);
pub const BG_ROTATION_SPEED_RANGE: (f32, f32) = (-1.0, 1.0);
pub const BG_ALPHA_RANGE: (f32, f32) = (0.1, 0.7);
pub const BG_ALPHA_WAVELENGTH: f32 = 200.0;
pub const BG_PULSE_SCALE: f32 = 1.1;

// Foreground particle layer
pub const FG_PARTICLE_COUNT: usize = 10;
pub const FG_RESPAWN_Y: f32 = -50.0;
pub const FG_SPAWN_Y_JITTER: f32 = 100.0;
pub const FG_SIZE_RANGE: (f32, f32) = (2.0, 10.0);
pub const FG_SPEED_RANGE: (f32, f32) = (2.0, 6.0);
pub const FG_ROTATION_SPEED_RANGE: (f32, f32) = (-2.0, 2.0);
pub const FG_ALPHA_RANGE: (f32, f32) = (0.4, 0.8);
pub const FG_ALPHA_DECAY: f32 = 0.998; // multiplicative fade per tick
pub const FG_ALPHA_FLOOR: f32 = 0.2;
pub const FG_DRIFT_WAVELENGTH: f32 = 100.0;
pub const FG_DRIFT_AMPLITUDE: f32 = 0.5;
pub const FG_PULSE_SCALE: f32 = 1.15;

// Matrix rain (leet mode)
pub const MATRIX_DROP_COUNT: usize = 40;
pub const MATRIX_SPEED_RANGE: (f32, f32) = (2.0, 7.0);
pub const MATRIX_RESPAWN_Y: f32 = -20.0;
pub const MATRIX_TICK_MS: u64 = 50;
pub const MATRIX_ALPHA_RANGE: (f32, f32) = (0.2, 0.7);
pub const MATRIX_TRAIL_LEN: usize = 5;
pub const MATRIX_TRAIL_SPACING: f32 = 15.0;

// Fluid hourglass
pub const FLUID_TILT_GAIN: f32 = 50.0;
pub const FLUID_TILT_LIMIT: f32 = 60.0;
pub const FLUID_WAVE_DAMPING: f32 = 0.6; // fraction of wave amplitude removed at |tilt| = 1
pub const FLUID_SAMPLE_STEP: f32 = 5.0; // px between surface samples
pub const FLUID_PHASE_PERIODS_SEC: [f64; 3] = [3.0, 2.0, 5.0];
// (amplitude px, spatial frequency rad/px) per wave
pub const FLUID_WAVES: [(f32, f32); 3] = [(8.0, 0.03), (5.0, 0.05), (3.0, 0.08)];
pub const BUBBLE_COUNT: usize = 15;
pub const BUBBLE_DRIFT_GAIN: f32 = 0.8;
pub const BUBBLE_JITTER_PX: f32 = 6.0;

// Background generator
pub const BACKGROUND_TIME_PER_SEC: f64 = 10.0; // shader time units per wall-clock second
pub const GRADIENT_DRIFT_X: (f32, f64) = (100.0, 20.0); // (px, seconds per sweep)
pub const GRADIENT_DRIFT_Y: (f32, f64) = (80.0, 15.0);
pub const BREATH_BASE: f32 = 0.8;
pub const BREATH_SPAN: f32 = 0.2;
pub const SATURATION_BOOST: f32 = 1.25;
pub const BRIGHTNESS_BOOST: f32 = 1.15;

// Seconds pulse applied to the background layer
pub const PULSE_ALPHA_EVEN: f32 = 1.0;
pub const PULSE_ALPHA_ODD: f32 = 0.85;

// Parallax (px per unit tilt)
pub const PARALLAX_GAIN: f32 = 25.0;
pub const PARALLAX_GAIN_COMPACT: f32 = 15.0;
pub const REFLECTION_GAIN: f32 = 200.0;
pub const REFLECTION_SHIMMER_PERIOD_SEC: f64 = 3.0;

// Glass card
pub const GLASS_MIN_CONTRAST: f32 = 4.5;
pub const LIQUID_GLASS_SCRIM: f32 = 0.18;
pub const NEON_GLASS_SCRIM: f32 = 0.75;
pub const LIQUID_BLUR_RADIUS: f32 = 24.0;
pub const NEON_BLUR_RADIUS: f32 = 16.0;

// Page transition
pub const PAGE_SCALE_SHRINK: f32 = 0.12;
pub const PAGE_STRETCH_Y: f32 = 0.03;
pub const PAGE_FADE: f32 = 0.6;
pub const PAGE_ROTATION_DEG: f32 = -8.0;
pub const PAGE_TRANSLATE_Y: f32 = 50.0;
pub const CARD_SCALE_SCROLLING: f32 = 0.92;

// Gestures
pub const DRAG_STEP_THRESHOLD: f32 = 30.0;
pub const SCROLL_DETENTS: [f32; 4] = [0.15, 0.35, 0.55, 0.75];
pub const SCROLL_DETENT_HALF_WIDTH: f32 = 0.05;
pub const SCROLL_REST_THRESHOLD: f32 = 0.05;

// Canvas size below which the compact parallax gain applies
pub const COMPACT_WIDTH: f32 = 360.0;
pub const COMPACT_HEIGHT: f32 = 640.0;

// Glass surface tint layers
pub const GLASS_FROST: f32 = 0.125; // white veil under the scrim
pub const GLASS_SCRIM_STEP: f32 = 0.02;
pub const GLASS_CORNER_RADIUS: f32 = 32.0;
pub const CARD_MAX_SIZE: [f32; 2] = [420.0, 460.0];
pub const CARD_PADDING: f32 = 24.0;

// Frame loop
pub const MAX_FRAME_DT_SEC: f32 = 0.25; // longer gaps (suspend, debugger) are capped
