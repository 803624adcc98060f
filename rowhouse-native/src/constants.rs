/// Hard cap on a single length-prefixed payload read from the wire.
pub(crate) const MAX_STRING_SIZE: usize = 1 << 30;

/// Upper bound on the fractional-second digits a `DateTime64` column keeps.
pub const MAX_PRECISION: usize = 9;

// Canonical text layouts shared by the date/time codecs.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const SECONDS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const SUBSECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
