// Host-side tests for mode configuration, gestures and haptic events.

use chrono_dream::controller::{detent_band, Controller};
use chrono_dream::error::ConfigError;
use chrono_dream::{ClockMode, Gesture, HapticEvent, ModeConfig, Settings, TimeSample};

fn controller() -> Controller {
    Controller::new(ModeConfig::default(), Settings::default())
}

fn drain(c: &mut Controller) -> Vec<HapticEvent> {
    c.drain_haptics().collect()
}

fn noon() -> TimeSample {
    TimeSample::at(12, 0, 0)
}

#[test]
fn strict_constructor_rejects_out_of_range_values() {
    assert_eq!(ModeConfig::new(9, 0), Err(ConfigError::ModeOutOfRange(9)));
    assert_eq!(
        ModeConfig::new(0, 3),
        Err(ConfigError::VariantOutOfRange {
            mode: 0,
            variant: 3,
            max: 2
        })
    );
    let hex = ModeConfig::new(1, 1).unwrap();
    assert_eq!(hex.mode(), ClockMode::Hex);
    assert_eq!(hex.current_variant(), 1);
    assert_eq!(hex.clock_config(ClockMode::Standard), 0);
}

#[test]
fn set_clock_config_clamps_and_touches_one_mode() {
    let base = ModeConfig::default().set_clock_config(ClockMode::Unix, 1);
    let low = base.set_clock_config(ClockMode::Standard, -5);
    assert_eq!(low.clock_config(ClockMode::Standard), 0);
    let high = base.set_clock_config(ClockMode::Standard, 99);
    assert_eq!(high.clock_config(ClockMode::Standard), 2);
    assert_eq!(high.clock_config(ClockMode::Unix), 1);
    assert_eq!(high.mode(), ClockMode::Standard);
    // value semantics: the original is untouched
    assert_eq!(base.clock_config(ClockMode::Standard), 0);
    for mode in ClockMode::ALL {
        let c = base.set_clock_config(mode, i64::MAX);
        assert!(c.clock_config(mode) < mode.max_variants());
    }
}

#[test]
fn long_press_toggles_focus() {
    let mut c = controller();
    c.handle(Gesture::LongPress, &noon());
    assert!(c.ui().focus_mode);
    c.handle(Gesture::LongPress, &noon());
    assert!(!c.ui().focus_mode);
    assert_eq!(drain(&mut c), vec![HapticEvent::FocusToggle, HapticEvent::FocusToggle]);
}

#[test]
fn double_tap_opens_settings_only_in_focus_mode() {
    let mut c = controller();
    c.handle(Gesture::DoubleTap, &noon());
    assert!(!c.ui().settings_open);
    assert!(drain(&mut c).is_empty());

    c.handle(Gesture::LongPress, &noon());
    c.handle(Gesture::DoubleTap, &noon());
    assert!(c.ui().settings_open);
    c.handle(Gesture::DoubleTap, &noon());
    assert_eq!(
        drain(&mut c),
        vec![HapticEvent::FocusToggle, HapticEvent::SettingsOpened]
    );
    c.handle(Gesture::CloseSettings, &noon());
    assert!(!c.ui().settings_open);
}

#[test]
fn tap_toggles_leet_mode_only_at_1337() {
    let mut c = controller();
    c.handle(Gesture::Tap, &TimeSample::at(13, 38, 0));
    assert!(!c.ui().leet_mode_active);
    c.handle(Gesture::Tap, &TimeSample::at(13, 37, 12));
    assert!(c.ui().leet_mode_active);
    c.handle(Gesture::Tap, &TimeSample::at(13, 37, 40));
    assert!(!c.ui().leet_mode_active);
    assert_eq!(drain(&mut c), vec![HapticEvent::LeetToggle, HapticEvent::LeetToggle]);
}

#[test]
fn drag_steps_the_variant_and_stops_at_the_ends() {
    let mut c = controller();
    c.handle(Gesture::Drag { amount: 20.0 }, &noon());
    assert_eq!(c.config().current_variant(), 0);
    c.handle(Gesture::Drag { amount: 31.0 }, &noon());
    assert_eq!(c.config().current_variant(), 1);
    c.handle(Gesture::Drag { amount: 80.0 }, &noon());
    assert_eq!(c.config().current_variant(), 2);
    c.handle(Gesture::Drag { amount: 31.0 }, &noon());
    assert_eq!(c.config().current_variant(), 2);
    c.handle(Gesture::Drag { amount: -31.0 }, &noon());
    assert_eq!(c.config().current_variant(), 1);
    assert_eq!(drain(&mut c), vec![HapticEvent::ConfigStep; 3]);
}

#[test]
fn drag_does_nothing_for_single_variant_modes() {
    let mut c = Controller::new(ModeConfig::new(2, 0).unwrap(), Settings::default());
    c.handle(Gesture::Drag { amount: 100.0 }, &noon());
    assert_eq!(c.config().current_variant(), 0);
    assert!(drain(&mut c).is_empty());
}

#[test]
fn binary_column_taps_only_apply_in_binary_mode() {
    let mut c = controller();
    c.handle(Gesture::TapBinaryColumn { column: 3 }, &noon());
    assert_eq!(c.binary_reveal(), None);

    let mut c = Controller::new(ModeConfig::new(3, 0).unwrap(), Settings::default());
    c.handle(Gesture::TapBinaryColumn { column: 3 }, &noon());
    assert_eq!(c.binary_reveal(), Some(3));
    c.handle(Gesture::TapBinaryColumn { column: 3 }, &noon());
    assert_eq!(c.binary_reveal(), None);
}

#[test]
fn detent_bands() {
    assert_eq!(detent_band(0.15), Some(0));
    assert_eq!(detent_band(0.33), Some(1));
    assert_eq!(detent_band(0.25), None);
    assert_eq!(detent_band(0.58), Some(2));
    assert_eq!(detent_band(0.78), Some(3));
    assert_eq!(detent_band(0.95), None);
}

#[test]
fn scroll_detents_fire_once_per_band() {
    let mut c = controller();
    for offset in [0.02, 0.14, 0.16, 0.25, 0.35, 0.36, 0.55] {
        c.handle(Gesture::PageScroll { page: 0, offset }, &noon());
    }
    assert_eq!(drain(&mut c), vec![HapticEvent::ScrollDetent; 3]);
    assert!(c.is_scrolling());

    // back to rest forgets the band
    c.handle(Gesture::PageScroll { page: 0, offset: -0.01 }, &noon());
    c.handle(Gesture::PageScroll { page: 0, offset: -0.15 }, &noon());
    assert_eq!(drain(&mut c), vec![HapticEvent::ScrollDetent]);
}

#[test]
fn scroll_offset_is_clamped() {
    let mut c = controller();
    c.handle(Gesture::PageScroll { page: 0, offset: 3.0 }, &noon());
    assert_eq!(c.scroll_offset(), 1.0);
    c.handle(Gesture::PageScroll { page: 0, offset: f32::NAN }, &noon());
    assert_eq!(c.scroll_offset(), 0.0);
}

#[test]
fn settling_on_a_new_page_switches_mode() {
    let mut c = controller();
    assert!(!c.ui().has_swiped);
    c.handle(Gesture::PageScroll { page: 0, offset: 0.4 }, &noon());
    c.handle(Gesture::PageSettled { page: 3 }, &noon());
    assert_eq!(c.config().mode(), ClockMode::Binary);
    assert!(c.ui().has_swiped);
    assert_eq!(c.scroll_offset(), 0.0);
    assert!(!c.is_scrolling());
    assert_eq!(drain(&mut c), vec![HapticEvent::PageSettle]);

    c.handle(Gesture::PageSettled { page: 3 }, &noon());
    assert!(drain(&mut c).is_empty());
}

#[test]
fn scroll_at_rest_on_another_page_settles() {
    let mut c = controller();
    c.handle(Gesture::PageScroll { page: 5, offset: 0.0 }, &noon());
    assert_eq!(c.config().mode(), ClockMode::Unix);
    assert_eq!(drain(&mut c), vec![HapticEvent::PageSettle]);
}

#[test]
fn invalid_page_is_ignored() {
    let mut c = controller();
    c.handle(Gesture::PageSettled { page: 42 }, &noon());
    assert_eq!(c.config().mode(), ClockMode::Standard);
    assert!(!c.ui().has_swiped);
    assert!(drain(&mut c).is_empty());
}

#[test]
fn variants_survive_page_changes() {
    let mut c = controller();
    c.handle(Gesture::Drag { amount: 40.0 }, &noon());
    c.handle(Gesture::PageSettled { page: 1 }, &noon());
    c.handle(Gesture::Drag { amount: 40.0 }, &noon());
    c.handle(Gesture::PageSettled { page: 0 }, &noon());
    assert_eq!(c.config().current_variant(), 1);
    assert_eq!(c.config().clock_config(ClockMode::Hex), 1);
}

#[test]
fn disabled_haptics_emit_nothing() {
    let settings = Settings {
        haptic_enabled: false,
        ..Settings::default()
    };
    let mut c = Controller::new(ModeConfig::default(), settings);
    c.handle(Gesture::LongPress, &noon());
    c.handle(Gesture::Drag { amount: 50.0 }, &noon());
    c.handle(Gesture::PageSettled { page: 2 }, &noon());
    assert!(drain(&mut c).is_empty());
    assert!(c.ui().focus_mode);
    assert_eq!(c.config().mode(), ClockMode::Berlin);

    c.apply_settings(Settings::default());
    c.handle(Gesture::LongPress, &noon());
    assert_eq!(drain(&mut c), vec![HapticEvent::FocusToggle]);
}

#[test]
fn theme_index_is_validated() {
    assert!(Settings::default().with_theme(3).is_ok());
    assert!(matches!(
        Settings::default().with_theme(4),
        Err(ConfigError::InvalidRange { name: "theme", .. })
    ));
}
