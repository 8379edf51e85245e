use splitledger_domain::{ExpenseId, GroupId, Money, MoneyError, ParticipantId, SplitError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Group {0} does not exist")]
    UnknownGroup(GroupId),
    #[error("Participant {participant} is not part of group {group}")]
    UnknownParticipant {
        group: GroupId,
        participant: ParticipantId,
    },
    #[error("Expense {expense} does not exist in group {group}")]
    UnknownExpense { group: GroupId, expense: ExpenseId },
    #[error("Splits add up to {actual} but the expense amount is {expected}")]
    SplitMismatch { expected: Money, actual: Money },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] SplitError),
    #[error(transparent)]
    Money(#[from] MoneyError),
    #[error("Participant {participant} does not belong to group {group}")]
    NotInGroup {
        group: GroupId,
        participant: ParticipantId,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// True for errors caused by user input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Money(_) | Self::NotInGroup { .. }
        )
    }
}
