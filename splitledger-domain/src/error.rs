use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{Money, ParticipantId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("Amount {0} cannot be represented in cents")]
    OutOfRange(Decimal),
    #[error("Amount {0} has more than two decimal places")]
    SubCent(Decimal),
}

/// Rejections raised while turning a split rule into per-participant amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitError {
    #[error("Expense amount must be positive (found {0})")]
    NonPositiveTotal(Money),
    #[error("At least one participant must be selected")]
    EmptySelection,
    #[error("Participant {0} is selected more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("Split amount for participant {participant} must not be negative (found {value})")]
    NegativeShare {
        participant: ParticipantId,
        value: Decimal,
    },
    #[error("Custom splits must add up to {expected} (found {actual})")]
    CustomSumMismatch { expected: Money, actual: Decimal },
    #[error("Percentages must add up to 100 (found {actual})")]
    PercentageSumMismatch { actual: Decimal },
    #[error(transparent)]
    Money(#[from] MoneyError),
}
