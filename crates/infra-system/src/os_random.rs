// OS CSPRNG-backed random source

use adversim_core::port::RandomSource;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Random source drawing from the operating system's CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn below(&self, upper: u64) -> u64 {
        if upper == 0 {
            return 0;
        }
        OsRng.gen_range(0..upper)
    }

    fn alphanumeric(&self, len: usize) -> String {
        OsRng
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_stays_in_range() {
        let random = OsRandom;
        for _ in 0..200 {
            assert!(random.below(5) < 5);
        }
        assert_eq!(random.below(0), 0);
    }

    #[test]
    fn test_alphanumeric_token() {
        let token = OsRandom.alphanumeric(32);
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, OsRandom.alphanumeric(32));
    }
}
