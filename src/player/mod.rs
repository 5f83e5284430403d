pub mod clock;

pub use clock::{ClockCommand, PlaybackClock};
