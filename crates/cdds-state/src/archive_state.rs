//! # Archive Lifecycle State Machine
//!
//! Every datestamped version of a variable in MASS lives in exactly one
//! state directory. The state decides whether files may still be written
//! into the version and whether downstream consumers are told about it.
//!
//! ## States
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!                 ▼                              │
//! Embargoed ──▶ Available ──▶ Withdrawn ◀── Superseded
//!                 │                              ▲
//!                 └──────────────────────────────┘
//! ```
//!
//! | state      | can be put | informs | may come from         |
//! |------------|------------|---------|-----------------------|
//! | Embargoed  | yes        | no      | (initial only)        |
//! | Available  | no         | yes     | Embargoed, Withdrawn  |
//! | Withdrawn  | no         | yes     | Available, Superseded |
//! | Superseded | no         | no      | Available             |
//!
//! Nothing ever moves *into* Embargoed: new data always arrives in a fresh
//! embargoed datestamp directory.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use cdds_core::{StateTransitionError, ValidationError};

// ─── Archive State ───────────────────────────────────────────────────

/// The lifecycle state of one datestamped version in MASS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveState {
    /// Visible internally, not yet public. The only writable state.
    Embargoed,
    /// Published and immutable.
    Available,
    /// Removed from public availability, retained for the record.
    Withdrawn,
    /// Replaced by a newer version. Its datestamp can never be reused.
    Superseded,
}

impl ArchiveState {
    /// All states, in MASS listing order.
    pub const ALL: [ArchiveState; 4] = [
        Self::Embargoed,
        Self::Available,
        Self::Withdrawn,
        Self::Superseded,
    ];

    /// The state directory name in MASS.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Embargoed => "embargoed",
            Self::Available => "available",
            Self::Withdrawn => "withdrawn",
            Self::Superseded => "superseded",
        }
    }

    /// Resolve a state directory name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }

    /// Whether new files may be written into a version in this state.
    pub fn can_be_put(&self) -> bool {
        matches!(self, Self::Embargoed)
    }

    /// Whether moves into this state are announced to downstream consumers.
    pub fn informs(&self) -> bool {
        matches!(self, Self::Available | Self::Withdrawn)
    }

    /// Embargoed and Available versions are active; at most one of each may
    /// exist per variable.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Embargoed | Self::Available)
    }

    /// The states a version may move into this state from.
    pub fn valid_predecessors(&self) -> &'static [ArchiveState] {
        match self {
            Self::Embargoed => &[],
            Self::Available => &[Self::Embargoed, Self::Withdrawn],
            Self::Withdrawn => &[Self::Available, Self::Superseded],
            Self::Superseded => &[Self::Available],
        }
    }

    /// The states a version in this state may move to.
    pub fn valid_successors(&self) -> Vec<ArchiveState> {
        Self::ALL
            .iter()
            .copied()
            .filter(|to| to.valid_predecessors().contains(self))
            .collect()
    }

    /// Whether a version in `state` may move into this state.
    pub fn can_come_from(&self, state: ArchiveState) -> bool {
        self.valid_predecessors().contains(&state)
    }

    /// Whether a version in this state may move into `state`.
    pub fn can_move_to(&self, state: ArchiveState) -> bool {
        state.can_come_from(*self)
    }

    /// Whether `from → to` is a legal lifecycle move.
    pub fn can_transition(from: ArchiveState, to: ArchiveState) -> bool {
        from.can_move_to(to)
    }

    /// Like [`ArchiveState::can_transition`], but as a `Result` for callers
    /// that must not proceed with an illegal move.
    pub fn ensure_transition(from: ArchiveState, to: ArchiveState) -> Result<(), StateTransitionError> {
        if Self::can_transition(from, to) {
            return Ok(());
        }
        let allowed: Vec<&str> = from.valid_successors().iter().map(|s| s.as_str()).collect();
        Err(StateTransitionError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
            reason: if allowed.is_empty() {
                format!("{from} has no legal successor states")
            } else {
                format!("{from} may only move to {}", allowed.join(", "))
            },
        })
    }
}

// ─── Parsing and Display ─────────────────────────────────────────────

impl FromStr for ArchiveState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ValidationError::UnknownArchiveState(s.to_string()))
    }
}

impl std::fmt::Display for ArchiveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ArchiveState::*;

    #[test]
    fn only_embargoed_can_be_put() {
        assert!(Embargoed.can_be_put());
        assert!(!Available.can_be_put());
        assert!(!Withdrawn.can_be_put());
        assert!(!Superseded.can_be_put());
    }

    #[test]
    fn informs_available_and_withdrawn() {
        assert!(!Embargoed.informs());
        assert!(Available.informs());
        assert!(Withdrawn.informs());
        assert!(!Superseded.informs());
    }

    #[test]
    fn transition_table() {
        assert!(ArchiveState::can_transition(Embargoed, Available));
        assert!(!ArchiveState::can_transition(Available, Embargoed));
        assert!(ArchiveState::can_transition(Superseded, Withdrawn));
        assert!(ArchiveState::can_transition(Withdrawn, Available));
        assert!(ArchiveState::can_transition(Available, Superseded));
        assert!(ArchiveState::can_transition(Available, Withdrawn));
        assert!(!ArchiveState::can_transition(Embargoed, Superseded));
        assert!(!ArchiveState::can_transition(Superseded, Available));
        assert!(!ArchiveState::can_transition(Withdrawn, Embargoed));
    }

    #[test]
    fn nothing_moves_into_embargoed() {
        for from in ArchiveState::ALL {
            assert!(!ArchiveState::can_transition(from, Embargoed), "{from} -> embargoed");
        }
    }

    #[test]
    fn successors_mirror_predecessors() {
        for from in ArchiveState::ALL {
            for to in ArchiveState::ALL {
                assert_eq!(
                    from.valid_successors().contains(&to),
                    to.valid_predecessors().contains(&from)
                );
            }
        }
    }

    #[test]
    fn ensure_transition_reports_allowed_targets() {
        let err = ArchiveState::ensure_transition(Available, Embargoed).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("available"));
        assert!(msg.contains("withdrawn"));
        assert!(ArchiveState::ensure_transition(Embargoed, Available).is_ok());
    }

    #[test]
    fn names_roundtrip() {
        for state in ArchiveState::ALL {
            assert_eq!(state.as_str().parse::<ArchiveState>().unwrap(), state);
        }
        assert!("published".parse::<ArchiveState>().is_err());
        assert_eq!(serde_json::to_string(&Superseded).unwrap(), "\"superseded\"");
    }
}
