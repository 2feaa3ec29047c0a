use std::{collections::VecDeque, fmt};

use chrono::Duration;

use crate::api::{Error, Time};

pub const TOAST_LIFETIME_SECS: i64 = 3;

/// A message meant for the user, typically shown as a toast
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice(pub String);

impl From<Error> for Notice {
    fn from(e: Error) -> Notice {
        Notice(e.user_message())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Time,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Toasts {
    next_id: u64,
    lifetime: Duration,
    shown: VecDeque<Toast>,
}

impl Default for Toasts {
    fn default() -> Toasts {
        Toasts::new(Duration::seconds(TOAST_LIFETIME_SECS))
    }
}

impl Toasts {
    pub fn new(lifetime: Duration) -> Toasts {
        Toasts {
            next_id: 0,
            lifetime,
            shown: VecDeque::new(),
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Time) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.shown.push_back(Toast {
            id,
            kind,
            message: message.into(),
            expires_at: now + self.lifetime,
        });
        id
    }

    pub fn error(&mut self, notice: Notice, now: Time) -> u64 {
        self.push(ToastKind::Error, notice.0, now)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.shown.retain(|t| t.id != id);
    }

    /// Drops expired toasts, returning whether anything changed
    pub fn expire(&mut self, now: Time) -> bool {
        let before = self.shown.len();
        self.shown.retain(|t| t.expires_at > now);
        before != self.shown.len()
    }

    pub fn shown(&self) -> impl Iterator<Item = &Toast> {
        self.shown.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn toasts_expire_in_order() {
        let t0 = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let mut toasts = Toasts::default();
        toasts.push(ToastKind::Success, "saved", t0);
        let second = toasts.error(Notice::from(Error::NotFound), t0 + Duration::seconds(2));
        assert!(!toasts.expire(t0 + Duration::seconds(1)));
        assert!(toasts.expire(t0 + Duration::seconds(3)));
        assert_eq!(toasts.shown().map(|t| t.id).collect::<Vec<_>>(), vec![second]);
        toasts.dismiss(second);
        assert!(toasts.is_empty());
    }
}
