// Host-side tests for the nine clock encodings.

use chrono_dream::color::{Rgb, BERLIN_RED, BERLIN_YELLOW};
use chrono_dream::modes::{
    self, berlin, binary, hex, hourglass, solar, standard, swatch, synesthesia, unix, BerlinThud,
    BinaryReveal, ClockMode, ModeInputs, ModeVisual, SolarPhase, StandardLayout,
    SynesthesiaAnimator,
};
use chrono_dream::TimeSample;

const HOUR_MS: i64 = 3_600_000;

#[test]
fn every_mode_renders_its_own_visual() {
    let inputs = ModeInputs::new(TimeSample::at(10, 11, 12));
    for mode in ClockMode::ALL {
        let visual = modes::render(mode, &inputs);
        assert_eq!(visual.mode(), mode);
        assert!(!visual.headline().is_empty(), "{mode:?}");
    }
    assert_eq!(ClockMode::from_index(9), None);
    assert_eq!(ClockMode::from_index(4), Some(ClockMode::Swatch));
}

#[test]
fn standard_variants() {
    let t = TimeSample::new(13, 5, 9, 250, 0);
    let stacked = standard::render(&t, 0);
    assert_eq!(stacked.layout, StandardLayout::Stacked);
    assert_eq!(stacked.primary, "13:05");
    assert_eq!(stacked.secondary.as_deref(), Some("09"));

    let inline = standard::render(&t, 1);
    assert_eq!(inline.primary, "13:05:09");
    assert_eq!(inline.progress, Some(0.25));

    let twelve = standard::render(&t, 2);
    assert_eq!(twelve.primary, "1:05");
    assert_eq!(twelve.secondary.as_deref(), Some("PM"));
}

#[test]
fn twelve_hour_edges() {
    let midnight = standard::render(&TimeSample::at(0, 0, 0), 2);
    assert_eq!(midnight.headline(), "12:00 AM");
    let noon = standard::render(&TimeSample::at(12, 30, 0), 2);
    assert_eq!(noon.headline(), "12:30 PM");
    let late = standard::render(&TimeSample::at(23, 59, 0), 2);
    assert_eq!(late.headline(), "11:59 PM");
}

#[test]
fn variant_is_clamped_not_wrapped() {
    let mut inputs = ModeInputs::new(TimeSample::at(8, 0, 0));
    inputs.variant = 7;
    match modes::render(ClockMode::Standard, &inputs) {
        ModeVisual::Standard(v) => assert_eq!(v.layout, StandardLayout::TwelveHour),
        other => panic!("unexpected {other:?}"),
    }
    match modes::render(ClockMode::Unix, &inputs) {
        ModeVisual::Unix(v) => assert!(v.millis),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn weights_grow_over_the_minute_and_hour() {
    let start = standard::render(&TimeSample::at(7, 0, 0), 0);
    let end = standard::render(&TimeSample::at(7, 59, 59), 0);
    assert_eq!(start.seconds_weight, 400.0);
    assert_eq!(start.hour_weight, 500.0);
    assert!(end.seconds_weight > 880.0 && end.seconds_weight < 900.0);
    assert!(end.hour_weight > 890.0 && end.hour_weight < 900.0);
}

#[test]
fn hex_uses_raw_fields_as_bytes() {
    let t = TimeSample::at(23, 59, 59);
    assert_eq!(hex::hex_string(&t), "#173B3B");
    assert_eq!(hex::decimal_string(&t), "#235959");

    let v = hex::render(&TimeSample::at(10, 20, 30), 0);
    assert_eq!(v.text, "#0A141E");
    assert_eq!(v.color, Rgb::from_u32(0x0A141E));
    assert!(!v.decimal);

    let d = hex::render(&TimeSample::at(10, 20, 30), 1);
    assert_eq!(d.text, "#102030");
    assert!(d.decimal);
}

#[test]
fn hex_strings_are_always_seven_chars() {
    for h in 0..24 {
        for m in (0..60).step_by(7) {
            let t = TimeSample::at(h, m, m);
            let s = hex::hex_string(&t);
            assert_eq!(s.len(), 7);
            assert!(s.starts_with('#'));
            assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}

#[test]
fn berlin_rows_reconstruct_the_time() {
    for h in 0..24 {
        for m in 0..60 {
            let v = berlin::render(&TimeSample::at(h, m, 0));
            let [a, b, c, d] = v.counts();
            assert_eq!(5 * a + b, h as usize);
            assert_eq!(5 * c + d, m as usize);
            // lamps fill left to right
            for row in [&v.five_minutes[..], &v.minutes[..]] {
                let lit = row.iter().take_while(|l| l.on).count();
                assert_eq!(lit, row.iter().filter(|l| l.on).count());
            }
        }
    }
}

#[test]
fn berlin_lamp_colors() {
    let v = berlin::render(&TimeSample::at(13, 17, 2));
    assert_eq!(v.counts(), [2, 3, 3, 2]);
    assert!(v.seconds.on);
    assert!(!berlin::render(&TimeSample::at(13, 17, 3)).seconds.on);
    assert_eq!(v.five_minutes[2].color, BERLIN_RED);
    assert_eq!(v.five_minutes[5].color, BERLIN_RED);
    assert_eq!(v.five_minutes[0].color, BERLIN_YELLOW);
    assert!(v.five_hours.iter().all(|l| l.color == BERLIN_RED));
    assert!(v.minutes.iter().all(|l| l.color == BERLIN_YELLOW));
}

#[test]
fn berlin_thud_fires_on_five_hour_rollover_only() {
    let mut thud = BerlinThud::new();
    assert!(!thud.observe(&TimeSample::at(4, 59, 59)));
    assert!(thud.observe(&TimeSample::at(5, 0, 0)));
    assert!(!thud.observe(&TimeSample::at(5, 0, 1)));
    assert!(!thud.observe(&TimeSample::at(9, 59, 59)));
    assert!(thud.observe(&TimeSample::at(10, 0, 0)));
    assert!(thud.observe(&TimeSample::at(20, 0, 0)));
    // rolling back to zero lamps is silent
    assert!(!thud.observe(&TimeSample::at(23, 59, 59)));
    assert!(!thud.observe(&TimeSample::at(0, 0, 0)));
}

#[test]
fn berlin_thud_does_not_fire_after_reset() {
    let mut thud = BerlinThud::new();
    thud.observe(&TimeSample::at(4, 0, 0));
    thud.reset();
    assert!(!thud.observe(&TimeSample::at(15, 0, 0)));
}

#[test]
fn binary_columns_have_fixed_widths() {
    let v = binary::render(&TimeSample::at(23, 59, 48), None);
    let widths: Vec<usize> = v.columns.iter().map(|c| c.bits.len()).collect();
    assert_eq!(widths, vec![2, 4, 3, 4, 3, 4]);
    assert_eq!(v.columns[0].bits.as_slice(), &[true, false]);
    assert_eq!(v.columns[3].bits.as_slice(), &[true, false, false, true]);
    assert!(v.columns.iter().all(|c| !c.revealed));
}

#[test]
fn binary_bits_reconstruct_each_digit() {
    for h in 0..24 {
        for m in 0..60 {
            let t = TimeSample::at(h, m, 59 - m);
            let v = binary::render(&t, None);
            for (col, digit) in v.columns.iter().zip(t.digits()) {
                let value = col.bits.iter().fold(0u8, |acc, &b| (acc << 1) | u8::from(b));
                assert_eq!(value, digit);
                assert_eq!(col.digit, digit);
            }
        }
    }
}

#[test]
fn binary_headline_groups_pairs() {
    let v = binary::render(&TimeSample::at(12, 34, 56), None);
    assert_eq!(v.headline(), "01 0010:011 0100:101 0110");
}

#[test]
fn binary_reveal_toggles_one_column() {
    let mut r = BinaryReveal::default();
    r.toggle(2);
    assert_eq!(r.column(), Some(2));
    r.toggle(4);
    assert_eq!(r.column(), Some(4));
    r.toggle(4);
    assert_eq!(r.column(), None);
    r.toggle(9);
    assert_eq!(r.column(), None);

    let v = binary::render(&TimeSample::at(1, 2, 3), Some(1));
    assert!(v.columns[1].revealed);
    assert!(!v.columns[0].revealed);
}

#[test]
fn swatch_uses_biel_mean_time() {
    // UTC midnight is 01:00 BMT
    assert_eq!(swatch::format_beats(swatch::beats(0)), "@041");
    // UTC 23:00 is BMT midnight
    assert_eq!(swatch::beats(23 * HOUR_MS), 0.0);
    assert_eq!(swatch::format_beats(swatch::beats(23 * HOUR_MS)), "@000");
    // one millisecond before BMT midnight truncates to @999
    assert_eq!(swatch::format_beats(swatch::beats(23 * HOUR_MS - 1)), "@999");
    // UTC 11:00 is BMT noon
    assert_eq!(swatch::beats(11 * HOUR_MS), 500.0);
}

#[test]
fn swatch_beats_stay_in_range() {
    let day = 24 * HOUR_MS;
    for i in -50..50i64 {
        let ms = i * 7_777_777 + 1_700_000_000_000 * (i % 2);
        let b = swatch::beats(ms);
        assert!((0.0..1000.0).contains(&b), "{ms} -> {b}");
        assert_eq!(swatch::beats(ms), swatch::beats(ms + day));
    }
}

#[test]
fn swatch_variants_and_bar() {
    let noon = TimeSample::new(12, 0, 0, 0, 11 * HOUR_MS);
    let v0 = swatch::render(&noon, 0);
    assert_eq!(v0.text, "@500");
    assert_eq!(v0.filled_segments, 10);
    let v1 = swatch::render(&noon, 1);
    assert_eq!(v1.text, "@500.00");
    assert_eq!(swatch::format_centibeats(12.345), "@012.34");
    assert_eq!(swatch::filled_segments(0.0), 0);
    assert_eq!(swatch::filled_segments(999.99), 19);
}

#[test]
fn unix_seconds_and_millis() {
    let t = TimeSample::new(0, 0, 0, 123, 1_700_000_000_123);
    let secs = unix::render(&t, 0);
    assert_eq!(secs.text, "1700000000");
    assert_eq!(secs.label, "EPOCH_TIMESTAMP");
    assert!(!secs.millis);
    assert_eq!(unix::render(&t, 1).text, "1700000000123");
    assert_eq!(unix::epoch_seconds(-1), -1);
    assert_eq!(unix::epoch_seconds(999), 0);
}

#[test]
fn synesthesia_maps_each_digit() {
    let t = TimeSample::at(12, 34, 56);
    let v = synesthesia::render(&t, None);
    assert_eq!(v.digits, [1, 2, 3, 4, 5, 6]);
    assert_eq!(v.colors, v.targets);
    assert_eq!(v.targets[0], synesthesia::digit_color(1));
    assert_eq!(v.headline(), "12:34:56");
    assert_eq!(synesthesia::digit_color(42), Rgb::NEUTRAL);
}

#[test]
fn synesthesia_tweens_changed_slots() {
    let mut anim = SynesthesiaAnimator::new();
    let before = TimeSample::at(10, 0, 8);
    let after = TimeSample::at(10, 0, 9);
    let first = anim.update(&before, 0.016);
    assert_eq!(first, synesthesia::target_colors(&before));

    // the change starts from the colour on screen
    let start = anim.update(&after, 0.0);
    assert_eq!(start[5], synesthesia::digit_color(8));
    assert_eq!(start[0], synesthesia::digit_color(1));

    let halfway = anim.update(&after, 0.1);
    assert_ne!(halfway[5], synesthesia::digit_color(8));
    assert_ne!(halfway[5], synesthesia::digit_color(9));

    let done = anim.update(&after, 0.3);
    let target = synesthesia::digit_color(9);
    assert!((done[5].r - target.r).abs() < 1e-5);
    assert!((done[5].g - target.g).abs() < 1e-5);
    assert!((done[5].b - target.b).abs() < 1e-5);
}

#[test]
fn solar_phase_bands() {
    let expected = [
        (0, SolarPhase::Night),
        (4, SolarPhase::Night),
        (5, SolarPhase::BlueHourDawn),
        (6, SolarPhase::GoldenHourDawn),
        (7, SolarPhase::Day),
        (16, SolarPhase::Day),
        (17, SolarPhase::GoldenHourDusk),
        (18, SolarPhase::BlueHourDusk),
        (19, SolarPhase::Night),
        (23, SolarPhase::Night),
    ];
    for (hour, phase) in expected {
        assert_eq!(SolarPhase::from_hour(hour), phase, "hour {hour}");
    }
}

#[test]
fn sun_moves_along_the_arc() {
    assert_eq!(solar::sun_angle(6, 0), 0.0);
    assert_eq!(solar::sun_angle(12, 0), 90.0);
    assert_eq!(solar::sun_angle(18, 0), 180.0);
    assert_eq!(solar::sun_angle(3, 0), 0.0);
    assert_eq!(solar::sun_angle(22, 0), 180.0);
    let top = solar::arc_point(90.0);
    assert!(top[0].abs() < 1e-6 && (top[1] - 1.0).abs() < 1e-6);
    let rise = solar::arc_point(0.0);
    assert!((rise[0] + 1.0).abs() < 1e-6 && rise[1].abs() < 1e-6);

    let v = solar::render(&TimeSample::at(12, 0, 0));
    assert_eq!(v.phase, SolarPhase::Day);
    assert_eq!(v.markers.map(|(h, _)| h), solar::HOUR_MARKERS);
    assert_eq!(v.headline(), "Tag 90°");
}

#[test]
fn hourglass_remaining_time() {
    let t = TimeSample::at(10, 0, 0);
    assert_eq!(hourglass::naive_remaining(&t), (13, 59));
    assert_eq!(hourglass::true_remaining(&t), (14, 0, 0));
    assert_eq!(hourglass::true_remaining(&TimeSample::at(23, 59, 59)), (0, 0, 1));

    let t = TimeSample::at(6, 0, 0);
    let v = hourglass::render(&t, Default::default(), [0.0; 3], [200.0, 300.0], 0);
    assert_eq!(v.percent, 25);
    assert_eq!(v.remaining_text(), "17:59");
    assert_eq!(v.headline(), "25% · 17:59 verbleibend");
}

#[test]
fn mode_metadata() {
    assert_eq!(ClockMode::Standard.max_variants(), 3);
    assert_eq!(ClockMode::Hex.max_variants(), 2);
    assert_eq!(ClockMode::Berlin.max_variants(), 1);
    for (i, mode) in ClockMode::ALL.iter().enumerate() {
        assert_eq!(mode.index(), i);
        assert!(!mode.name().is_empty());
        assert!(!mode.tagline().is_empty());
    }
}
