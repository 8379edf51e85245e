use fxhash::FxHashSet;
use rust_decimal::Decimal;

use crate::{
    error::SplitError,
    model::{Money, ParticipantId},
};

/// Largest accepted gap between a percentage vector and 100 (exclusive).
pub const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

const HUNDRED_PERCENT: Decimal = Decimal::ONE_HUNDRED;
const HALF: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Returns true when `amounts` add up to `total` once the gap is rounded to
/// whole cents (halves rounded up).
///
/// The accepted sums are those in `(total - 0.005, total + 0.005]`.
pub fn validate_custom_split(total: Money, amounts: &[Decimal]) -> bool {
    checked_sum(amounts)
        .and_then(|sum| total.as_decimal().checked_sub(sum))
        .and_then(|gap| gap.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|gap_cents| gap_cents.checked_add(HALF))
        .is_some_and(|shifted| shifted.floor().is_zero())
}

/// Returns true when `percentages` add up to 100 within 0.01 percentage points.
pub fn validate_percentage_split(percentages: &[Decimal]) -> bool {
    checked_sum(percentages)
        .and_then(|sum| sum.checked_sub(HUNDRED_PERCENT))
        .is_some_and(|gap| gap.abs() < PERCENTAGE_TOLERANCE)
}

pub(crate) fn checked_sum(values: &[Decimal]) -> Option<Decimal> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value))
}

/// Rejects empty selections and participants listed twice.
pub(crate) fn check_selection(participants: &[ParticipantId]) -> Result<(), SplitError> {
    if participants.is_empty() {
        return Err(SplitError::EmptySelection);
    }
    let mut seen = FxHashSet::default();
    for participant in participants {
        if !seen.insert(*participant) {
            return Err(SplitError::DuplicateParticipant(*participant));
        }
    }
    Ok(())
}

pub(crate) fn check_non_negative(entries: &[(ParticipantId, Decimal)]) -> Result<(), SplitError> {
    match entries.iter().find(|(_, value)| value.is_sign_negative() && !value.is_zero()) {
        Some((participant, value)) => Err(SplitError::NegativeShare {
            participant: *participant,
            value: *value,
        }),
        None => Ok(()),
    }
}
