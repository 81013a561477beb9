//! Page and gesture handling.
//!
//! The controller owns selection and configuration state only: which page is
//! showing, each mode's variant, and the UI toggles. It never touches the
//! simulators. Side effects leave as semantic [`HapticEvent`]s.

use crate::constants::{
    DRAG_STEP_THRESHOLD, SCROLL_DETENTS, SCROLL_DETENT_HALF_WIDTH, SCROLL_REST_THRESHOLD,
};
use crate::error::ConfigError;
use crate::modes::{BinaryReveal, ClockMode};
use crate::time::TimeSample;

pub const THEME_COUNT: u8 = 4;

/// Read-only input from the settings collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub haptic_enabled: bool,
    pub sound_enabled: bool,
    pub theme_index: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            haptic_enabled: true,
            sound_enabled: false,
            theme_index: 0,
        }
    }
}

impl Settings {
    pub fn with_theme(mut self, theme_index: u8) -> Result<Self, ConfigError> {
        if theme_index >= THEME_COUNT {
            return Err(ConfigError::InvalidRange {
                name: "theme",
                min: 0.0,
                max: f32::from(THEME_COUNT - 1),
            });
        }
        self.theme_index = theme_index;
        Ok(self)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub focus_mode: bool,
    pub settings_open: bool,
    pub leet_mode_active: bool,
    /// Cleared after the first page change; drives the swipe hint.
    pub has_swiped: bool,
    pub settings: Settings,
}

/// Current page plus one variant per mode. Updates return a new value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeConfig {
    mode: ClockMode,
    variants: [usize; ClockMode::COUNT],
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            mode: ClockMode::Standard,
            variants: [0; ClockMode::COUNT],
        }
    }
}

impl ModeConfig {
    /// Strict constructor; out-of-range indices are configuration errors.
    pub fn new(mode_index: usize, variant: usize) -> Result<Self, ConfigError> {
        let mode = ClockMode::from_index(mode_index)
            .ok_or(ConfigError::ModeOutOfRange(mode_index))?;
        let max = mode.max_variants();
        if variant >= max {
            return Err(ConfigError::VariantOutOfRange {
                mode: mode_index,
                variant,
                max: max - 1,
            });
        }
        let mut variants = [0; ClockMode::COUNT];
        variants[mode_index] = variant;
        Ok(Self { mode, variants })
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn with_mode(self, mode: ClockMode) -> Self {
        Self { mode, ..self }
    }

    /// Clamp `value` into the mode's variant range; other modes untouched.
    pub fn set_clock_config(self, mode: ClockMode, value: i64) -> Self {
        let max = mode.max_variants() as i64 - 1;
        let mut variants = self.variants;
        variants[mode.index()] = value.clamp(0, max) as usize;
        Self { variants, ..self }
    }

    pub fn clock_config(&self, mode: ClockMode) -> usize {
        self.variants[mode.index()]
    }

    pub fn current_variant(&self) -> usize {
        self.clock_config(self.mode)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HapticEvent {
    /// Every wall-clock second change.
    Tick,
    /// A page switch finished.
    PageSettle,
    /// A variant was stepped.
    ConfigStep,
    /// Berlin five-hour rollover.
    Thud,
    ScrollDetent,
    FocusToggle,
    SettingsOpened,
    LeetToggle,
}

/// Receiver of semantic haptic events; decides the actual vibration.
pub trait HapticSink {
    fn emit(&mut self, event: HapticEvent);
}

impl HapticSink for Vec<HapticEvent> {
    fn emit(&mut self, event: HapticEvent) {
        self.push(event);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Tap,
    DoubleTap,
    LongPress,
    /// Horizontal drag inside the card, px (positive = rightward).
    Drag { amount: f32 },
    /// Pager position: settled page index and offset fraction in `[-1, 1]`.
    PageScroll { page: usize, offset: f32 },
    PageSettled { page: usize },
    TapBinaryColumn { column: usize },
    CloseSettings,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ScrollState {
    offset: f32,
    last_band: Option<usize>,
}

/// Index of the detent band `abs_offset` sits in, if any.
pub fn detent_band(abs_offset: f32) -> Option<usize> {
    SCROLL_DETENTS
        .iter()
        .position(|d| (abs_offset - d).abs() <= SCROLL_DETENT_HALF_WIDTH)
}

#[derive(Clone, Debug, Default)]
pub struct Controller {
    config: ModeConfig,
    ui: UiState,
    scroll: ScrollState,
    binary: BinaryReveal,
    pending: Vec<HapticEvent>,
}

impl Controller {
    pub fn new(config: ModeConfig, settings: Settings) -> Self {
        Self {
            config,
            ui: UiState {
                settings,
                ..UiState::default()
            },
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ModeConfig {
        &self.config
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.offset.abs() > f32::EPSILON
    }

    pub fn binary_reveal(&self) -> Option<usize> {
        self.binary.column()
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.ui.settings = settings;
    }

    /// Queue an event if haptics are enabled.
    pub fn emit(&mut self, event: HapticEvent) {
        if self.ui.settings.haptic_enabled {
            self.pending.push(event);
        }
    }

    pub fn drain_haptics(&mut self) -> std::vec::Drain<'_, HapticEvent> {
        self.pending.drain(..)
    }

    pub fn handle(&mut self, gesture: Gesture, now: &TimeSample) {
        match gesture {
            Gesture::LongPress => {
                self.ui.focus_mode = !self.ui.focus_mode;
                log::debug!("[controller] focus mode {}", self.ui.focus_mode);
                self.emit(HapticEvent::FocusToggle);
            }
            Gesture::DoubleTap => {
                if self.ui.focus_mode && !self.ui.settings_open {
                    self.ui.settings_open = true;
                    self.emit(HapticEvent::SettingsOpened);
                }
            }
            Gesture::CloseSettings => self.ui.settings_open = false,
            Gesture::Tap => {
                if now.hour == 13 && now.minute == 37 {
                    self.ui.leet_mode_active = !self.ui.leet_mode_active;
                    log::info!("[controller] leet mode {}", self.ui.leet_mode_active);
                    self.emit(HapticEvent::LeetToggle);
                }
            }
            Gesture::Drag { amount } => {
                if amount.abs() > DRAG_STEP_THRESHOLD {
                    self.step_variant(if amount > 0.0 { 1 } else { -1 });
                }
            }
            Gesture::TapBinaryColumn { column } => {
                if self.config.mode() == ClockMode::Binary {
                    self.binary.toggle(column);
                }
            }
            Gesture::PageScroll { page, offset } => self.on_scroll(page, offset),
            Gesture::PageSettled { page } => self.settle(page),
        }
    }

    fn step_variant(&mut self, delta: i64) {
        let mode = self.config.mode();
        let before = self.config.clock_config(mode);
        self.config = self
            .config
            .set_clock_config(mode, before as i64 + delta);
        if self.config.clock_config(mode) != before {
            log::debug!(
                "[controller] {} variant {} -> {}",
                mode.name(),
                before,
                self.config.clock_config(mode)
            );
            self.emit(HapticEvent::ConfigStep);
        }
    }

    fn on_scroll(&mut self, page: usize, offset: f32) {
        let offset = if offset.is_finite() {
            offset.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.scroll.offset = offset;
        let abs = offset.abs();
        if abs < SCROLL_REST_THRESHOLD {
            self.scroll.last_band = None;
        } else if let Some(band) = detent_band(abs) {
            if self.scroll.last_band != Some(band) {
                self.scroll.last_band = Some(band);
                self.emit(HapticEvent::ScrollDetent);
            }
        }
        if page != self.config.mode().index() && abs < f32::EPSILON {
            self.settle(page);
        }
    }

    fn settle(&mut self, page: usize) {
        self.scroll = ScrollState::default();
        let Some(mode) = ClockMode::from_index(page) else {
            log::warn!("[controller] ignoring page index {page}");
            return;
        };
        if mode == self.config.mode() {
            return;
        }
        self.config = self.config.with_mode(mode);
        self.ui.has_swiped = true;
        log::info!("[controller] mode -> {}", mode.name());
        self.emit(HapticEvent::PageSettle);
    }
}
