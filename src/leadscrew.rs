use crate::config::Config;
use crate::error::RatioError;
use crate::pin::{Level, PinIo};
use crate::sensor::LeadAxisSensor;
use crate::state::{GlobalState, MotionMode, ThreadSyncState};

/// Direction of leadscrew travel. `Unknown` only holds at rest with zero position error.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Left,
    Right,
    Unknown,
}

impl Direction {
    fn from_sign(value: i32) -> Direction {
        if value > 0 {
            Direction::Right
        } else if value < 0 {
            Direction::Left
        } else {
            Direction::Unknown
        }
    }

    fn sign(self) -> i32 {
        match self {
            Direction::Right => 1,
            Direction::Left => -1,
            Direction::Unknown => 0,
        }
    }
}

/// Which soft stop a `set_stop_position`/`unset_stop_position`/`stop_position` call targets.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopEnd {
    Left,
    Right,
}

// Round half away from zero; `core` alone doesn't give us this in no_std.
fn round_position(lead_position: i32, ratio: f32) -> i32 {
    libm::roundf(lead_position as f32 * ratio) as i32
}

/// Owns the pin I/O exclusively. The lead-axis sensor and global state are only borrowed for the
/// duration of an `update()` call, since both are shared with the UI foreground.
pub struct Leadscrew<P: PinIo> {
    pins: P,
    config: Config,
    ratio: f32,
    current_position: i32,
    accumulator: f32,
    current_pulse_delay_us: u32,
    // Timestamp of the most recently completed pulse edge. Recomputed from `PinIo::micros()`
    // each tick; never cached across ticks.
    last_pulse_edge_micros: u32,
    last_full_pulse_duration_us: u32,
    current_direction: Direction,
    // Set whenever `current_pulse_delay_us` reaches `initial_pulse_delay_us` (construction, zero
    // error, or fully decelerated for a reversal), cleared once the resulting "entering motion
    // from rest" step has latched a direction and reset the pulse clock. Without this latch the
    // entry step would re-fire, and re-zero the pulse clock, on every tick spent waiting for the
    // first pulse of a move, so it would never become due.
    at_rest: bool,
    left_stop: Option<i32>,
    right_stop: Option<i32>,
}

impl<P: PinIo> Leadscrew<P> {
    /// A controller at rest: ratio 1.0, zero position, both stops unset, pulse delay at its
    /// slowest.
    pub fn new(pins: P, config: Config) -> Leadscrew<P> {
        Leadscrew {
            pins,
            current_pulse_delay_us: config.initial_pulse_delay_us,
            config,
            ratio: 1.0,
            current_position: 0,
            accumulator: 0.0,
            last_pulse_edge_micros: 0,
            last_full_pulse_duration_us: 0,
            current_direction: Direction::Unknown,
            at_rest: true,
            left_stop: None,
            right_stop: None,
        }
    }

    /// Called once per tick by the tick driver.
    pub fn update<S: LeadAxisSensor>(&mut self, lead: &S, global: &mut GlobalState) {
        let expected_position = round_position(lead.position(), self.ratio);
        let position_error = expected_position - self.current_position;

        match global.motion_mode() {
            MotionMode::Disabled => self.current_position = expected_position,
            MotionMode::Jog => self.update_jog(position_error, global),
            MotionMode::Enabled => self.update_enabled(position_error, global),
        }
    }

    fn update_jog(&mut self, position_error: i32, global: &mut GlobalState) {
        let now = self.pins.micros();
        let last_pulse_micros = now.wrapping_sub(self.last_pulse_edge_micros);
        if last_pulse_micros < self.config.jog_pulse_delay_us {
            return;
        }
        if position_error == 0 {
            global.set_motion_mode(MotionMode::Disabled);
            return;
        }

        let next_direction = Direction::from_sign(position_error);
        if self.current_direction != next_direction {
            self.pins.write_dir_pin(next_direction == Direction::Right);
            self.current_direction = next_direction;
        }

        if self.send_pulse() {
            self.last_full_pulse_duration_us = last_pulse_micros;
            self.last_pulse_edge_micros = now;
            self.current_position += self.current_direction.sign();
        }
    }

    fn update_enabled(&mut self, position_error: i32, global: &mut GlobalState) {
        if position_error == 0 {
            self.current_direction = Direction::Unknown;
            self.at_rest = true;
            global.set_thread_sync_state(ThreadSyncState::Sync);
            return;
        }
        let next_direction = Direction::from_sign(position_error);

        let now = self.pins.micros();
        let mut last_pulse_micros = now.wrapping_sub(self.last_pulse_edge_micros);

        // Entering motion from rest: latch the new direction and reset the pulse clock.
        if self.at_rest {
            self.pins.write_dir_pin(next_direction == Direction::Right);
            self.current_direction = next_direction;
            self.last_pulse_edge_micros = now;
            last_pulse_micros = 0;
            self.at_rest = false;
        }

        let accel_change = if last_pulse_micros == 0 {
            self.config.pulse_delay_step_us
        } else {
            self.config
                .pulse_delay_step_us
                .saturating_mul(last_pulse_micros)
        };

        // Missed our schedule: slow down, we can't meet the rate.
        if last_pulse_micros
            > self
                .current_pulse_delay_us
                .saturating_add(self.config.pulse_delay_step_us)
            && self.current_pulse_delay_us < self.config.initial_pulse_delay_us
        {
            self.current_pulse_delay_us = self
                .current_pulse_delay_us
                .saturating_add(accel_change)
                .min(self.config.initial_pulse_delay_us);
            if self.current_pulse_delay_us == self.config.initial_pulse_delay_us {
                self.at_rest = true;
            }
        }

        // Not yet due.
        if last_pulse_micros < self.current_pulse_delay_us {
            return;
        }

        if self.send_pulse() {
            self.last_full_pulse_duration_us = last_pulse_micros;
            self.last_pulse_edge_micros = now;

            let accumulator_unit =
                (self.config.steps_per_mm * self.ratio) / self.config.stepper_ppr as f32;
            self.accumulator += self.current_direction.sign() as f32 * accumulator_unit;

            let stopping_distance_in_pulses =
                (self.config.initial_pulse_delay_us - self.current_pulse_delay_us) / accel_change;

            let mut should_stop = position_error.unsigned_abs() <= stopping_distance_in_pulses
                || next_direction != self.current_direction;

            if self.config.stops_influence_deceleration
                && self.would_cross_stop(stopping_distance_in_pulses)
            {
                should_stop = true;
            }

            if should_stop {
                self.current_pulse_delay_us = self
                    .current_pulse_delay_us
                    .saturating_add(accel_change)
                    .min(self.config.initial_pulse_delay_us);
                if self.current_pulse_delay_us == self.config.initial_pulse_delay_us {
                    self.at_rest = true;
                }
            } else {
                self.current_pulse_delay_us =
                    self.current_pulse_delay_us.saturating_sub(accel_change);
            }

            if libm::fabsf(self.accumulator) > 1.0 {
                self.accumulator -= self.current_direction.sign() as f32;
                self.current_position += self.current_direction.sign();
            }
        }
    }

    /// Whether, at the current ramp rate, continuing would carry the leadscrew past a
    /// configured soft stop before it could decelerate to rest.
    fn would_cross_stop(&self, stopping_distance_in_pulses: u32) -> bool {
        let projected = self.current_position
            + self.current_direction.sign() * stopping_distance_in_pulses as i32;
        match self.current_direction {
            Direction::Right => self.right_stop.is_some_and(|stop| projected >= stop),
            Direction::Left => self.left_stop.is_some_and(|stop| projected <= stop),
            Direction::Unknown => false,
        }
    }

    /// Two-tick pulse; returns `true` on the falling edge that completes a pulse.
    fn send_pulse(&mut self) -> bool {
        if self.pins.read_step_pin().is_high() {
            self.pins.write_step_pin(Level::Low);
            true
        } else {
            self.pins.write_step_pin(Level::High);
            false
        }
    }

    /// Re-syncs `current_position` to the lead axis under a new ratio. Rejects non-finite or
    /// non-positive ratios, leaving the previous ratio and position untouched.
    pub fn set_ratio<S: LeadAxisSensor>(&mut self, ratio: f32, lead: &S) -> Result<(), RatioError> {
        if !ratio.is_finite() {
            return Err(RatioError::NotFinite);
        }
        if ratio <= 0.0 {
            return Err(RatioError::NotPositive);
        }
        self.ratio = ratio;
        self.current_position = round_position(lead.position(), ratio);
        Ok(())
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn current_position(&self) -> i32 {
        self.current_position
    }

    pub fn expected_position<S: LeadAxisSensor>(&self, lead: &S) -> i32 {
        round_position(lead.position(), self.ratio)
    }

    pub fn position_error<S: LeadAxisSensor>(&self, lead: &S) -> i32 {
        self.expected_position(lead) - self.current_position
    }

    pub fn current_direction(&self) -> Direction {
        self.current_direction
    }

    pub fn current_pulse_delay_us(&self) -> u32 {
        self.current_pulse_delay_us
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Set an explicit soft limit.
    pub fn set_stop_position(&mut self, end: StopEnd, position: i32) {
        match end {
            StopEnd::Left => self.left_stop = Some(position),
            StopEnd::Right => self.right_stop = Some(position),
        }
    }

    /// Return a soft limit to its unbounded default.
    pub fn unset_stop_position(&mut self, end: StopEnd) {
        match end {
            StopEnd::Left => self.left_stop = None,
            StopEnd::Right => self.right_stop = None,
        }
    }

    /// Returns the configured stop, or `i32::MIN`/`i32::MAX` when unset.
    pub fn stop_position(&self, end: StopEnd) -> i32 {
        match end {
            StopEnd::Left => self.left_stop.unwrap_or(i32::MIN),
            StopEnd::Right => self.right_stop.unwrap_or(i32::MAX),
        }
    }

    /// For display only; never fed back into control.
    pub fn estimated_velocity_pulses_per_second(&self) -> f32 {
        if self.last_full_pulse_duration_us == 0 {
            0.0
        } else {
            1.0e6 / self.last_full_pulse_duration_us as f32
        }
    }

    pub fn estimated_velocity_mm_per_s(&self) -> f32 {
        self.estimated_velocity_pulses_per_second() / self.config.steps_per_mm
    }
}
