//! One-shot notices surfaced to the user on their next request.
//!
//! Operations push notices into a [`FlashSink`] supplied by the caller. The
//! HTTP adapter drains a [`FlashBuffer`] into the session once the operation
//! returns.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Severity of a flash notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Info,
    Error,
}

/// A single notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashNotice {
    kind: FlashKind,
    message: String,
}

impl FlashNotice {
    /// Build a notice of the given kind.
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Error, message)
    }

    pub fn kind(&self) -> FlashKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Destination for notices raised during an operation.
pub trait FlashSink: Send + Sync {
    /// Record a notice.
    fn push(&self, notice: FlashNotice);
}

/// Collects notices in memory for the duration of one request.
#[derive(Debug, Default)]
pub struct FlashBuffer {
    notices: Mutex<Vec<FlashNotice>>,
}

impl FlashBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every buffered notice in push order.
    pub fn drain(&self) -> Vec<FlashNotice> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl FlashSink for FlashBuffer {
    fn push(&self, notice: FlashNotice) {
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice),
            Err(poisoned) => poisoned.into_inner().push(notice),
        }
    }
}
