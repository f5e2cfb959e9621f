//! Narrow by design: the tick path (`Leadscrew::update`) stays infallible, so only the UI-facing
//! setters below can fail.

/// Rejected [`crate::config::Config`] construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The named duration field was zero.
    ZeroDuration(&'static str),
    /// `steps_per_mm` was not a positive value.
    NonPositiveStepsPerMm,
}

/// Rejected [`crate::leadscrew::Leadscrew::set_ratio`] call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RatioError {
    /// `ratio` was NaN or infinite.
    NotFinite,
    /// `ratio` was zero or negative; direction would be undefined.
    NotPositive,
}
