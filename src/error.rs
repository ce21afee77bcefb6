use slottable::SlotId;
use thiserror::Error;

/// Ways in which the two tables of an `AliasMap` can disagree with
/// each other.  These are only ever produced by `AliasMap::validate`;
/// a lookup that finds nothing is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("an alias resolves to {slot}, which holds no group")]
    DanglingAlias { slot: SlotId },
    #[error("an alias listed by {slot} is not registered")]
    UnregisteredAlias { slot: SlotId },
    #[error("an alias listed by {slot} resolves to {resolved}")]
    MisroutedAlias { slot: SlotId, resolved: SlotId },
    #[error("an alias is listed more than once by {slot}")]
    DuplicateAlias { slot: SlotId },
    #[error("{slot} holds a group with no aliases")]
    EmptyGroup { slot: SlotId },
    #[error("{slot} is at or beyond the next id to be minted, {next}")]
    StaleSlot { slot: SlotId, next: SlotId },
    #[error("{registered} aliases are registered but groups list {listed}")]
    AliasCountMismatch { registered: usize, listed: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
