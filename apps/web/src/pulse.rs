//! Frame-rate independent phase for the selected-marker pulse and the
//! loading spinner.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PulseMode {
    Running,
    Paused,
}

const PULSE_SPEED: f64 = 3.0;
const PULSE_MAX_FRAME_DELTA: f64 = 0.25;
const PULSE_PERIOD: f64 = 2.0 * std::f64::consts::PI;

const SPINNER: [&str; 6] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴"];

/// Advances `phase` by the time elapsed since `last_tick`. Long gaps (a
/// background tab) are clamped so the pulse does not jump.
pub fn advance_pulse(
    phase: f64,
    last_tick: Option<f64>,
    now_seconds: f64,
    mode: PulseMode,
) -> (f64, Option<f64>) {
    let delta = last_tick.map_or(0.0, |last| {
        (now_seconds - last).clamp(0.0, PULSE_MAX_FRAME_DELTA)
    });

    let next = match mode {
        PulseMode::Running => (delta.mul_add(PULSE_SPEED, phase)).rem_euclid(PULSE_PERIOD),
        PulseMode::Paused => phase.rem_euclid(PULSE_PERIOD),
    };

    (next, Some(now_seconds))
}

/// Marker glyph for the selected stop: large for the first half of the
/// period, small for the second.
pub fn pulse_marker(phase: f64) -> &'static str {
    if phase.rem_euclid(PULSE_PERIOD) < PULSE_PERIOD / 2.0 {
        "◉"
    } else {
        "●"
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn spinner_frame(phase: f64) -> &'static str {
    let step = PULSE_PERIOD / SPINNER.len() as f64;
    let index = (phase.rem_euclid(PULSE_PERIOD) / step) as usize;
    SPINNER[index.min(SPINNER.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn first_tick_only_records_time() {
        let (phase, last_tick) = advance_pulse(1.5, None, 10.0, PulseMode::Running);
        assert_close(phase, 1.5);
        assert_eq!(last_tick, Some(10.0));
    }

    #[test]
    fn running_pulse_wraps() {
        let start = PULSE_PERIOD - 0.1;
        let (phase, _) = advance_pulse(start, Some(4.0), 4.2, PulseMode::Running);
        assert_close(phase, (start + 0.2 * PULSE_SPEED).rem_euclid(PULSE_PERIOD));
    }

    #[test]
    fn long_gaps_are_clamped_and_time_never_reverses() {
        let (phase, _) = advance_pulse(0.0, Some(3.0), 30.0, PulseMode::Running);
        assert_close(phase, PULSE_MAX_FRAME_DELTA * PULSE_SPEED);

        let (phase, last_tick) = advance_pulse(2.0, Some(10.0), 9.0, PulseMode::Running);
        assert_close(phase, 2.0);
        assert_eq!(last_tick, Some(9.0));
    }

    #[test]
    fn paused_pulse_holds() {
        let (phase, _) = advance_pulse(2.25, Some(1.0), 1.2, PulseMode::Paused);
        assert_close(phase, 2.25);
    }

    #[test]
    fn glyphs_cover_the_period() {
        assert_eq!(pulse_marker(0.1), "◉");
        assert_eq!(pulse_marker(PULSE_PERIOD - 0.1), "●");
        assert_eq!(spinner_frame(0.0), "⠋");
        assert_eq!(spinner_frame(PULSE_PERIOD - 1e-6), "⠴");
    }
}
