// Random Source Port (secure randomness, injectable for tests)

/// Random source interface
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `0..upper` (0 when `upper` is 0)
    fn below(&self, upper: u64) -> u64;

    /// Random string of ASCII letters and digits
    fn alphanumeric(&self, len: usize) -> String;
}

pub mod mocks {
    use super::*;

    /// Always draws the lowest value; zero jitter in tests
    pub struct ZeroRandom;

    impl RandomSource for ZeroRandom {
        fn below(&self, _upper: u64) -> u64 {
            0
        }

        fn alphanumeric(&self, len: usize) -> String {
            "0".repeat(len)
        }
    }
}
