// Tests drive the session with explicit instants taken from a mock clock, so no
// test depends on wall-clock timing.
#[cfg(test)]
pub use mock_instant::Instant;
#[cfg(not(test))]
pub use std::time::Instant;
