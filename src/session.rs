//! Display session: the attach/detach lifecycle and the per-frame pipeline.
//!
//! While attached the session owns the clock and tilt sources, both particle
//! pools, the fluid phases and every spring. Each call to
//! [`DreamSession::frame`] reads exactly one `TimeSample` and hands it to
//! every renderer. Detaching stops the clock thread, releases the sensor and
//! drops all simulation state, so the next attach starts cold.

use std::time::Duration;

use crate::background::{breath_scale, BackgroundAlgorithm};
use crate::compositor::{self, background_fill_for, CardRect, Frame, Scene};
use crate::constants::*;
use crate::controller::{Controller, Gesture, HapticEvent, HapticSink, ModeConfig, Settings};
use crate::error::{ConfigError, SessionError};
use crate::fluid::PhaseAccumulators;
use crate::modes::{self, BerlinThud, ClockMode, ModeInputs, SynesthesiaAnimator};
use crate::particles::{
    self, background_spawn_color, foreground_spawn_color, init_pool, pulse_target, LayerKind,
    ParticleConfig, Pool,
};
use crate::rain::MatrixRain;
use crate::spring::{Spring, SpringProfile};
use crate::tilt::{TiltSensor, TiltSource, TiltSpring};
use crate::time::ClockSource;

#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    pub canvas: [f32; 2],
    pub background_particles: usize,
    pub foreground_particles: usize,
    pub seed: u64,
    pub poll_interval: Duration,
    pub bubble_count: usize,
    pub background: BackgroundAlgorithm,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas: [1080.0, 1920.0],
            background_particles: BG_PARTICLE_COUNT,
            foreground_particles: FG_PARTICLE_COUNT,
            seed: 0x5EED,
            poll_interval: Duration::from_millis(CLOCK_POLL_INTERVAL_MS),
            bubble_count: BUBBLE_COUNT,
            background: BackgroundAlgorithm::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_canvas(self.canvas)?;
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

fn validate_canvas([width, height]: [f32; 2]) -> Result<(), ConfigError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidCanvas { width, height })
    }
}

/// Per-attach state. Dropping it releases everything the session started.
struct Attached {
    clock: ClockSource,
    tilt: TiltSource,
    canvas: [f32; 2],
    background: Pool,
    foreground: Pool,
    rain: MatrixRain,
    phases: PhaseAccumulators,
    tilt_spring: TiltSpring,
    card_scale: Spring,
    pulse_alpha: Spring,
    bg_pulse: Spring,
    fg_pulse: Spring,
    berlin: BerlinThud,
    synesthesia: SynesthesiaAnimator,
    last_second: Option<i64>,
    elapsed: f64,
}

pub struct DreamSession {
    config: SessionConfig,
    settings: Settings,
    controller: Controller,
    haptics: Option<Box<dyn HapticSink>>,
    attached: Option<Attached>,
}

impl DreamSession {
    pub fn new(config: SessionConfig, settings: Settings) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            controller: Controller::new(ModeConfig::default(), settings),
            config,
            settings,
            haptics: None,
            attached: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_haptic_sink(&mut self, sink: Box<dyn HapticSink>) {
        self.haptics = Some(sink);
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.controller.apply_settings(settings);
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn mode_config(&self) -> &ModeConfig {
        self.controller.config()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn is_tilt_registered(&self) -> bool {
        self.attached.as_ref().is_some_and(|a| a.tilt.is_registered())
    }

    /// The running clock, e.g. to drive a manual clock from a host or test.
    pub fn clock(&self) -> Option<&ClockSource> {
        self.attached.as_ref().map(|a| &a.clock)
    }

    /// Attach to a surface of `canvas` px, polling the local clock.
    pub fn attach(
        &mut self,
        canvas: [f32; 2],
        sensor: Option<Box<dyn TiltSensor>>,
    ) -> Result<(), SessionError> {
        validate_canvas(canvas)?;
        let clock = ClockSource::start(self.config.poll_interval)?;
        self.attach_with_clock(canvas, sensor, clock)
    }

    /// Attach with a caller-supplied clock, typically [`ClockSource::manual`].
    /// Attaching while attached restarts the session.
    pub fn attach_with_clock(
        &mut self,
        canvas: [f32; 2],
        sensor: Option<Box<dyn TiltSensor>>,
        clock: ClockSource,
    ) -> Result<(), SessionError> {
        validate_canvas(canvas)?;
        if self.attached.is_some() {
            log::info!("[session] re-attach; restarting");
            self.detach();
        }
        let c = &self.config;
        let background = init_pool(
            ParticleConfig::background(c.background_particles, canvas[0], canvas[1]),
            c.seed,
            background_spawn_color,
        )?;
        let foreground = init_pool(
            ParticleConfig::foreground(c.foreground_particles, canvas[0], canvas[1]),
            c.seed.wrapping_add(1),
            foreground_spawn_color,
        )?;
        let rain = MatrixRain::new(MATRIX_DROP_COUNT, canvas[0], canvas[1], c.seed.wrapping_add(2));

        let mut tilt = TiltSource::new(sensor);
        tilt.start();

        self.controller = Controller::new(ModeConfig::default(), self.settings);
        self.attached = Some(Attached {
            clock,
            tilt,
            canvas,
            background,
            foreground,
            rain,
            phases: PhaseAccumulators::new(),
            tilt_spring: TiltSpring::default(),
            card_scale: Spring::new(SpringProfile::CARD, 1.0),
            pulse_alpha: Spring::new(SpringProfile::PULSE, PULSE_ALPHA_EVEN),
            bg_pulse: Spring::new(SpringProfile::PULSE, 1.0),
            fg_pulse: Spring::new(SpringProfile::PULSE, 1.0),
            berlin: BerlinThud::new(),
            synesthesia: SynesthesiaAnimator::new(),
            last_second: None,
            elapsed: 0.0,
        });
        log::info!(
            "[session] attached {}x{} ({:?} background)",
            canvas[0],
            canvas[1],
            self.config.background
        );
        Ok(())
    }

    /// Stop every loop and release the sensor. A second call does nothing.
    pub fn detach(&mut self) {
        let Some(mut a) = self.attached.take() else {
            log::debug!("[session] detach while detached");
            return;
        };
        a.tilt.stop();
        a.clock.stop();
        log::info!("[session] detached after {:.1} s", a.elapsed);
    }

    pub fn resize(&mut self, canvas: [f32; 2]) {
        if validate_canvas(canvas).is_err() {
            log::warn!("[session] ignoring resize to {}x{}", canvas[0], canvas[1]);
            return;
        }
        if let Some(a) = self.attached.as_mut() {
            a.canvas = canvas;
            a.background.resize(canvas[0], canvas[1]);
            a.foreground.resize(canvas[0], canvas[1]);
            a.rain.resize(canvas[0], canvas[1]);
        }
    }

    /// Route a gesture to the controller. Ignored while detached.
    pub fn handle(&mut self, gesture: Gesture) {
        let Some(a) = self.attached.as_ref() else {
            return;
        };
        let now = a.clock.current_sample();
        self.controller.handle(gesture, &now);
        self.flush_haptics();
    }

    fn flush_haptics(&mut self) {
        let sink = &mut self.haptics;
        for event in self.controller.drain_haptics() {
            if let Some(s) = sink.as_mut() {
                s.emit(event);
            }
        }
    }

    /// Advance all simulators by `dt_sec` and compose one frame. Returns
    /// `None` once detached.
    pub fn frame(&mut self, dt_sec: f32) -> Option<Frame> {
        let a = self.attached.as_mut()?;
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT_SEC)
        } else {
            0.0
        };
        let t = a.clock.current_sample();
        a.elapsed += f64::from(dt);

        let second = t.epoch_millis.div_euclid(1000);
        if a.last_second.is_some_and(|prev| prev != second) {
            self.controller.emit(HapticEvent::Tick);
        }
        a.last_second = Some(second);

        a.phases.advance(f64::from(dt));
        let tilt = a.tilt_spring.step(a.tilt.current_tilt(), dt);

        let even = t.is_even_second();
        a.background.advance(dt);
        a.foreground.advance(dt);
        let bg_scale = a.bg_pulse.step(pulse_target(LayerKind::Background, even), dt);
        let fg_scale = a.fg_pulse.step(pulse_target(LayerKind::Foreground, even), dt);
        let pulse_alpha = a.pulse_alpha.step(
            if even { PULSE_ALPHA_EVEN } else { PULSE_ALPHA_ODD },
            dt,
        );
        let scrolling = self.controller.is_scrolling();
        let card_scale = a
            .card_scale
            .step(if scrolling { CARD_SCALE_SCROLLING } else { 1.0 }, dt);

        let mode = self.controller.config().mode();
        let variant = self.controller.config().current_variant();
        let ui = *self.controller.ui();

        if mode == ClockMode::Berlin {
            if a.berlin.observe(&t) {
                self.controller.emit(HapticEvent::Thud);
            }
        } else {
            a.berlin.reset();
        }
        let synesthesia_colors =
            (mode == ClockMode::Synesthesia).then(|| a.synesthesia.update(&t, dt));

        let inputs = ModeInputs {
            time: t,
            tilt,
            variant,
            canvas: CardRect::for_canvas(a.canvas).content_size(),
            phases: a.phases.phases(),
            bubble_count: self.config.bubble_count,
            binary_reveal: self.controller.binary_reveal(),
            synesthesia_colors,
        };
        let visual = modes::render(mode, &inputs);

        let mid = if ui.leet_mode_active {
            a.rain.tick(dt);
            a.rain.render()
        } else {
            particles::render(&a.background, bg_scale)
        };
        let scene = Scene {
            canvas: a.canvas,
            time: t,
            variant,
            visual,
            fill: background_fill_for(mode, &t, ui.leet_mode_active),
            algorithm: self.config.background,
            background_time: (a.elapsed * BACKGROUND_TIME_PER_SEC) as f32,
            breath: breath_scale(t.second, t.millisecond),
            pulse_alpha,
            mid,
            foreground: particles::render(&a.foreground, fg_scale),
            tilt,
            clock_sec: a.elapsed,
            page_offset: self.controller.scroll_offset(),
            card_scale,
            ui,
        };
        let frame = compositor::compose(scene);
        self.flush_haptics();
        Some(frame)
    }
}

impl Drop for DreamSession {
    fn drop(&mut self) {
        self.detach();
    }
}
