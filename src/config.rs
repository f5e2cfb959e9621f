//! Compile-time tunables, grouped into one typed record rather than scattered free constants,
//! following this codebase's `settings.rs` convention of naming each tunable alongside its valid
//! range.

use crate::error::ConfigError;

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Slowest (start/stop) inter-pulse interval.
    pub initial_pulse_delay_us: u32,
    /// Per-step ramp quantum base.
    pub pulse_delay_step_us: u32,
    /// Informational tick period; the host drives the actual cadence.
    pub timer_us: u32,
    /// Fixed jog rate.
    pub jog_pulse_delay_us: u32,
    /// Stepper pulses per revolution.
    pub stepper_ppr: u32,
    /// Mechanical conversion, steps per millimeter.
    pub steps_per_mm: f32,
    /// Whether deceleration also factors in the configured soft stops. Default `false` preserves
    /// the plain distance-to-target predicate.
    pub stops_influence_deceleration: bool,
}

impl Config {
    /// Build a validated `Config`. Rejects zero durations and a non-positive `steps_per_mm`.
    pub fn new(
        initial_pulse_delay_us: u32,
        pulse_delay_step_us: u32,
        timer_us: u32,
        jog_pulse_delay_us: u32,
        stepper_ppr: u32,
        steps_per_mm: f32,
    ) -> Result<Config, ConfigError> {
        if initial_pulse_delay_us == 0 {
            return Err(ConfigError::ZeroDuration("initial_pulse_delay_us"));
        }
        if pulse_delay_step_us == 0 {
            return Err(ConfigError::ZeroDuration("pulse_delay_step_us"));
        }
        if timer_us == 0 {
            return Err(ConfigError::ZeroDuration("timer_us"));
        }
        if jog_pulse_delay_us == 0 {
            return Err(ConfigError::ZeroDuration("jog_pulse_delay_us"));
        }
        if stepper_ppr == 0 {
            return Err(ConfigError::ZeroDuration("stepper_ppr"));
        }
        // Deliberately negated rather than `<= 0.0`: also rejects NaN.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        if !(steps_per_mm > 0.0) {
            return Err(ConfigError::NonPositiveStepsPerMm);
        }
        Ok(Config {
            initial_pulse_delay_us,
            pulse_delay_step_us,
            timer_us,
            jog_pulse_delay_us,
            stepper_ppr,
            steps_per_mm,
            stops_influence_deceleration: false,
        })
    }

    /// A reasonable set of defaults for host testing and bring-up.
    pub fn scenario_defaults() -> Config {
        Config::new(1000, 10, 5, 500, 200, 100.0).expect("scenario defaults are valid")
    }

    pub fn with_stops_influence_deceleration(mut self, enabled: bool) -> Config {
        self.stops_influence_deceleration = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_zero_durations() {
        assert_eq!(
            Config::new(0, 10, 5, 500, 200, 100.0),
            Err(ConfigError::ZeroDuration("initial_pulse_delay_us"))
        );
        assert_eq!(
            Config::new(1000, 0, 5, 500, 200, 100.0),
            Err(ConfigError::ZeroDuration("pulse_delay_step_us"))
        );
    }

    #[test]
    fn rejects_non_positive_steps_per_mm() {
        assert_eq!(
            Config::new(1000, 10, 5, 500, 200, 0.0),
            Err(ConfigError::NonPositiveStepsPerMm)
        );
        assert_eq!(
            Config::new(1000, 10, 5, 500, 200, -1.0),
            Err(ConfigError::NonPositiveStepsPerMm)
        );
    }

    #[test]
    fn scenario_defaults_are_stable() {
        let cfg = Config::scenario_defaults();
        assert_eq!(cfg.initial_pulse_delay_us, 1000);
        assert_eq!(cfg.pulse_delay_step_us, 10);
        assert_eq!(cfg.timer_us, 5);
        assert_eq!(cfg.jog_pulse_delay_us, 500);
    }
}
