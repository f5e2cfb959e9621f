//! Lead axis sensor capability interface.

/// Exposes the signed accumulated position of the driven (lead) axis, typically the lathe
/// spindle. The sensor is updated asynchronously by its own encoder ISR; the controller only
/// ever reads it.
pub trait LeadAxisSensor {
    fn position(&self) -> i32;
}

#[cfg(test)]
pub(crate) mod test_double {
    use super::LeadAxisSensor;
    use core::cell::Cell;

    /// A sensor double whose position is set directly by the test.
    pub struct MockSensor {
        position: Cell<i32>,
    }

    impl MockSensor {
        pub fn new(position: i32) -> Self {
            MockSensor {
                position: Cell::new(position),
            }
        }

        pub fn set(&self, position: i32) {
            self.position.set(position);
        }

        pub fn advance(&self, delta: i32) {
            self.position.set(self.position.get() + delta);
        }
    }

    impl LeadAxisSensor for MockSensor {
        fn position(&self) -> i32 {
            self.position.get()
        }
    }
}
