use chrono::Duration;

use crate::{api::Time, KvStore, Settings};

pub const OTP_RESEND_SECS: i64 = 60;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CountdownState {
    Idle,
    Counting { remaining_secs: i64 },
    Expired,
}

impl CountdownState {
    pub fn is_counting(&self) -> bool {
        matches!(self, CountdownState::Counting { .. })
    }

    /// `mm:ss` while counting
    pub fn label(&self) -> Option<String> {
        match self {
            CountdownState::Counting { remaining_secs } => Some(format!(
                "{:02}:{:02}",
                remaining_secs / 60,
                remaining_secs % 60
            )),
            CountdownState::Idle | CountdownState::Expired => None,
        }
    }
}

/// A countdown whose deadline survives page reloads
///
/// The state is derived from the persisted deadline every time, so any number
/// of views sharing a key agree on it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Countdown {
    key: String,
    length: Duration,
}

impl Countdown {
    pub fn new(key: impl Into<String>, length: Duration) -> Countdown {
        Countdown {
            key: key.into(),
            length,
        }
    }

    pub fn otp(key: impl Into<String>) -> Countdown {
        Countdown::new(key, Duration::seconds(OTP_RESEND_SECS))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// (Re)starts counting from `now`, returning the deadline
    pub fn start<S: KvStore>(&self, settings: &Settings<S>, now: Time) -> Time {
        let deadline = now + self.length;
        settings.set_countdown_deadline(&self.key, deadline);
        deadline
    }

    pub fn state<S: KvStore>(&self, settings: &Settings<S>, now: Time) -> CountdownState {
        match settings.countdown_deadline(&self.key) {
            None => CountdownState::Idle,
            Some(deadline) if deadline > now => {
                let millis = (deadline - now).num_milliseconds();
                CountdownState::Counting {
                    remaining_secs: (millis + 999) / 1000,
                }
            }
            Some(_) => CountdownState::Expired,
        }
    }

    pub fn reset<S: KvStore>(&self, settings: &Settings<S>) {
        settings.clear_countdown(&self.key);
    }
}
