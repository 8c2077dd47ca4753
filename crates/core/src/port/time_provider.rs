// Time Provider Port (for testability)

use chrono::{DateTime, Utc};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub mod mocks {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Clock that advances a fixed step on every read
    pub struct SteppingClock {
        current: Mutex<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        pub fn new(step_millis: i64) -> Self {
            Self::starting_at(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                step_millis,
            )
        }

        pub fn starting_at(start: DateTime<Utc>, step_millis: i64) -> Self {
            Self {
                current: Mutex::new(start),
                step: chrono::Duration::milliseconds(step_millis),
            }
        }
    }

    impl TimeProvider for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut current = self.current.lock().unwrap();
            let now = *current;
            *current = now + self.step;
            now
        }
    }
}
