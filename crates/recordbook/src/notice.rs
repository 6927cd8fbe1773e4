//! Transient success notifications.
//!
//! Every successful create, update, and delete produces a [`Notice`]. The
//! [`NoticeBoard`] keeps them until they expire.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// What a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A record was added.
    Created,
    /// A record was changed.
    Updated,
    /// A record was deleted.
    Deleted,
}

impl NoticeKind {
    /// The message shown to the user.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "Record added successfully.",
            Self::Updated => "Record updated successfully.",
            Self::Deleted => "Record deleted successfully.",
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// What happened.
    pub kind: NoticeKind,
    /// When it was raised.
    pub issued_at: DateTime<Utc>,
    /// When it disappears on its own.
    pub expires_at: DateTime<Utc>,
}

impl Notice {
    /// Raise a notice at `now` that lives for `ttl`.
    #[must_use]
    pub fn new(kind: NoticeKind, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            kind,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    /// Whether the notice has dismissed itself by `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.message())
    }
}

/// Active notices, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    /// Add a notice.
    pub fn post(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Drop expired notices and return the number removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.notices.len();
        self.notices.retain(|n| !n.is_expired(now));
        before - self.notices.len()
    }

    /// Notices still showing at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| !n.is_expired(now))
    }

    /// Number of notices held, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether the board is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::new(NoticeKind::Created, t0(), Duration::milliseconds(1000));
        assert!(!notice.is_expired(t0()));
        assert!(!notice.is_expired(t0() + Duration::milliseconds(999)));
        assert!(notice.is_expired(t0() + Duration::seconds(1)));
    }

    #[test]
    fn test_notice_display() {
        let notice = Notice::new(NoticeKind::Deleted, t0(), Duration::seconds(1));
        assert_eq!(notice.to_string(), "Record deleted successfully.");
    }

    #[test]
    fn test_board_auto_dismiss() {
        let mut board = NoticeBoard::default();
        board.post(Notice::new(NoticeKind::Created, t0(), Duration::seconds(1)));
        board.post(Notice::new(
            NoticeKind::Updated,
            t0() + Duration::milliseconds(500),
            Duration::seconds(1),
        ));

        let later = t0() + Duration::milliseconds(1200);
        let showing: Vec<NoticeKind> = board.active(later).map(|n| n.kind).collect();
        assert_eq!(showing, vec![NoticeKind::Updated]);

        assert_eq!(board.prune(later), 1);
        assert_eq!(board.len(), 1);

        assert_eq!(board.prune(t0() + Duration::seconds(2)), 1);
        assert!(board.is_empty());
    }

    #[test]
    fn test_notice_kind_serialization() {
        let json = serde_json::to_string(&NoticeKind::Updated).unwrap();
        assert_eq!(json, "\"updated\"");
    }
}
