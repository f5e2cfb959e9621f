//! The mode that gates the controller's behavior, the thread-sync flag it reports back, and the
//! ratio-preset table the UI/CLI layer selects from.

/// Motion mode, gating what `Leadscrew::update` does each tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    /// No stepping; current position tracks the expected position exactly.
    Disabled,
    /// Fixed-rate motion to close out the position error, then auto-reverts to `Disabled`.
    Jog,
    /// Ramped tracking of the lead axis.
    Enabled,
}

/// Whether the leadscrew is currently tracking the lead axis within one quantum.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThreadSyncState {
    Unsync,
    Sync,
}

/// A fixed table of common ratios the UI/CLI can step through.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct RatioPreset {
    pub label: &'static str,
    pub ratio: f32,
}

/// Illustrative presets a UI layer can offer; not semantics the core depends on.
pub const DEFAULT_RATIO_PRESETS: &[RatioPreset] = &[
    RatioPreset {
        label: "1:1",
        ratio: 1.0,
    },
    RatioPreset {
        label: "1:2",
        ratio: 0.5,
    },
    RatioPreset {
        label: "2:1",
        ratio: 2.0,
    },
    RatioPreset {
        label: "1:4",
        ratio: 0.25,
    },
];

/// Process-wide motion/sync state, single-writer from the tick driver and the UI. Modeled as an
/// ordinary value the embedding binary owns and hands a reference to both, rather than a
/// `static`, so no interior-mutability or locking discipline is baked into the type itself.
pub struct GlobalState {
    motion_mode: MotionMode,
    thread_sync_state: ThreadSyncState,
    ratio_preset_cursor: usize,
}

impl GlobalState {
    /// Initial state is `Disabled`, `Unsync`.
    pub fn new() -> GlobalState {
        GlobalState {
            motion_mode: MotionMode::Disabled,
            thread_sync_state: ThreadSyncState::Unsync,
            ratio_preset_cursor: 0,
        }
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.motion_mode
    }

    /// Set the motion mode from the UI/CLI foreground. Becomes visible to the next `update()`
    /// tick.
    pub fn set_motion_mode(&mut self, mode: MotionMode) {
        #[cfg(feature = "defmt")]
        if mode != self.motion_mode {
            defmt::debug!("motion mode: {} -> {}", self.motion_mode, mode);
        }
        self.motion_mode = mode;
    }

    pub fn thread_sync_state(&self) -> ThreadSyncState {
        self.thread_sync_state
    }

    /// Called by the controller, never by the UI.
    pub(crate) fn set_thread_sync_state(&mut self, state: ThreadSyncState) {
        self.thread_sync_state = state;
    }

    /// Currently selected ratio preset.
    pub fn ratio_preset(&self) -> RatioPreset {
        DEFAULT_RATIO_PRESETS[self.ratio_preset_cursor]
    }

    /// Move the preset cursor to the next entry, wrapping around. Returns the new preset so the
    /// caller can feed it straight into `Leadscrew::set_ratio`.
    pub fn next_ratio_preset(&mut self) -> RatioPreset {
        self.ratio_preset_cursor = (self.ratio_preset_cursor + 1) % DEFAULT_RATIO_PRESETS.len();
        self.ratio_preset()
    }
}

impl Default for GlobalState {
    fn default() -> GlobalState {
        GlobalState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_disabled_unsync() {
        let state = GlobalState::new();
        assert_eq!(state.motion_mode(), MotionMode::Disabled);
        assert_eq!(state.thread_sync_state(), ThreadSyncState::Unsync);
    }

    #[test]
    fn ratio_preset_cursor_wraps() {
        let mut state = GlobalState::new();
        let first = state.ratio_preset();
        for _ in 0..DEFAULT_RATIO_PRESETS.len() - 1 {
            state.next_ratio_preset();
        }
        assert_eq!(state.next_ratio_preset().ratio, first.ratio);
    }

    #[test]
    fn mode_write_is_visible_immediately_to_the_next_read() {
        let mut state = GlobalState::new();
        state.set_motion_mode(MotionMode::Jog);
        assert_eq!(state.motion_mode(), MotionMode::Jog);
    }
}
