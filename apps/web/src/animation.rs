/// Whether the focused-country marker pulses.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum PulseMode {
    Running,
    Paused,
}

const PULSE_SPEED: f64 = 3.0;
const PULSE_MAX_FRAME_DELTA: f64 = 0.25;
const PULSE_PERIOD: f64 = 2.0 * std::f64::consts::PI;

/// Marker radius range for the focused country, in degrees.
pub const PULSE_MIN_RADIUS: f64 = 3.5;
pub const PULSE_MAX_RADIUS: f64 = 6.0;

/// Advances the pulse phase by the wall-clock time since the last frame.
///
/// Returns the new phase and the time to remember as the last frame.
pub fn advance_pulse(
    phase: f64,
    last_frame: Option<f64>,
    now_seconds: f64,
    mode: PulseMode,
) -> (f64, Option<f64>) {
    let delta = last_frame
        .map(|last| (now_seconds - last).max(0.0).min(PULSE_MAX_FRAME_DELTA))
        .unwrap_or(0.0);

    let next_phase = match mode {
        PulseMode::Running => (phase + delta * PULSE_SPEED).rem_euclid(PULSE_PERIOD),
        PulseMode::Paused => phase.rem_euclid(PULSE_PERIOD),
    };

    (next_phase, Some(now_seconds))
}

pub fn pulse_radius(phase: f64) -> f64 {
    let t = (phase.sin() + 1.0) / 2.0;
    (PULSE_MAX_RADIUS - PULSE_MIN_RADIUS).mul_add(t, PULSE_MIN_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::{
        advance_pulse, pulse_radius, PulseMode, PULSE_MAX_RADIUS, PULSE_MIN_RADIUS, PULSE_PERIOD,
        PULSE_SPEED,
    };

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual}, diff {diff}"
        );
    }

    #[test]
    fn first_frame_records_time_without_advancing() {
        let (phase, last_frame) = advance_pulse(1.2345, None, 10.0, PulseMode::Running);

        assert_close(phase, 1.2345);
        assert_eq!(last_frame, Some(10.0));
    }

    #[test]
    fn running_pulse_advances_and_wraps() {
        let start = PULSE_PERIOD - 0.1;
        let (phase, last_frame) = advance_pulse(start, Some(4.0), 4.2, PulseMode::Running);

        assert_close(phase, (start + 0.2 * PULSE_SPEED).rem_euclid(PULSE_PERIOD));
        assert_eq!(last_frame, Some(4.2));
    }

    #[test]
    fn paused_pulse_holds_phase() {
        let (phase, last_frame) = advance_pulse(2.25, Some(1.0), 1.2, PulseMode::Paused);

        assert_close(phase, 2.25);
        assert_eq!(last_frame, Some(1.2));
    }

    #[test]
    fn background_tab_gap_is_clamped() {
        let (phase, _) = advance_pulse(0.0, Some(3.0), 30.0, PulseMode::Running);
        assert_close(phase, 0.25 * PULSE_SPEED);
    }

    #[test]
    fn clock_going_backwards_does_not_reverse_pulse() {
        let (phase, _) = advance_pulse(3.5, Some(10.0), 9.0, PulseMode::Running);
        assert_close(phase, 3.5);
    }

    #[test]
    fn radius_stays_in_range() {
        for step in 0..64 {
            let radius = pulse_radius(f64::from(step) * 0.1);
            assert!((PULSE_MIN_RADIUS..=PULSE_MAX_RADIUS).contains(&radius));
        }
    }
}
