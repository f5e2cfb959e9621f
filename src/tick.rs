//! The tick driver: the thinnest possible wrapper around `Leadscrew::update`, with no scheduling
//! or interrupt plumbing of its own. The embedding binary is responsible for calling `tick()` at
//! its own cadence, from a timer interrupt or a bare loop.

use crate::leadscrew::Leadscrew;
use crate::pin::PinIo;
use crate::sensor::LeadAxisSensor;
use crate::state::GlobalState;

/// Drives a [`Leadscrew`] once per tick. Carries no state of its own; it exists so the
/// embedding binary has a single named call site to invoke from its timer interrupt or
/// scheduler, rather than reaching into the controller directly.
pub struct TickDriver;

impl TickDriver {
    pub fn new() -> TickDriver {
        TickDriver
    }

    /// Run one control tick. Call this from whatever fires at `Config::timer_us` cadence.
    pub fn tick<P: PinIo, S: LeadAxisSensor>(
        &mut self,
        leadscrew: &mut Leadscrew<P>,
        lead: &S,
        global: &mut GlobalState,
    ) {
        leadscrew.update(lead, global);
    }
}

impl Default for TickDriver {
    fn default() -> TickDriver {
        TickDriver::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pin::test_double::MockPins;
    use crate::sensor::test_double::MockSensor;
    use crate::state::MotionMode;
    use pretty_assertions::assert_eq;

    #[test]
    fn tick_delegates_to_the_controller() {
        let mut driver = TickDriver::new();
        let mut leadscrew = Leadscrew::new(MockPins::new(), Config::scenario_defaults());
        let lead = MockSensor::new(3);
        let mut global = GlobalState::new();
        global.set_motion_mode(MotionMode::Disabled);

        driver.tick(&mut leadscrew, &lead, &mut global);

        assert_eq!(leadscrew.current_position(), 3);
    }
}
