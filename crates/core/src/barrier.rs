//! Barrier documents for the two physical gates.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Which physical gate a barrier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarrierKind {
    Entry,
    Exit,
}

impl BarrierKind {
    /// Document id within the `barriers` collection.
    pub fn doc_id(self) -> &'static str {
        match self {
            BarrierKind::Entry => "entry",
            BarrierKind::Exit => "exit",
        }
    }
}

impl std::fmt::Display for BarrierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.doc_id())
    }
}

/// A physical gate with a digitally observable open/closed flag.
///
/// `is_open == true` is transient: the safety closer forces it back to
/// false a fixed delay after any transition to open, regardless of what
/// opened it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    pub id: BarrierKind,
    pub is_open: bool,
    /// Last time the barrier transitioned to open.
    pub opened_at: Option<Timestamp>,
}

impl Barrier {
    /// A closed barrier for the given gate.
    pub fn closed(id: BarrierKind) -> Self {
        Self {
            id,
            is_open: false,
            opened_at: None,
        }
    }

    /// Open the barrier, stamping the open time.
    pub fn open(&mut self, now: Timestamp) {
        self.is_open = true;
        self.opened_at = Some(now);
    }
}
