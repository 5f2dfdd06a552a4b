use std::fmt::Display;
use uuid::Uuid;

/// A short user-visible message raised by the session
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub id: Uuid,
    pub message: String,
    pub kind: NoticeKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::new(message, NoticeKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::new(message, NoticeKind::Error)
    }

    fn new(message: impl Into<String>, kind: NoticeKind) -> Self {
        Notice {
            id: Uuid::new_v4(),
            message: message.into(),
            kind,
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "{}", self.message),
            NoticeKind::Error => write!(f, "error: {}", self.message),
        }
    }
}
