use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::{category::ExpenseCategory, error::MoneyError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpenseId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signed amount of money held as an exact number of cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Self = Self(0);
    pub const CENT: Self = Self(1);
    /// Largest accepted magnitude: one trillion currency units.
    pub const MAX: Self = Self(100_000_000_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Rounds `value` to the cent (half away from zero).
    ///
    /// Magnitudes above [`Money::MAX`] are rejected, which keeps sums of
    /// amounts far from the `i64` limits.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .filter(|cents| cents.unsigned_abs() <= Self::MAX.0.unsigned_abs())
            .map(Self)
            .ok_or(MoneyError::OutOfRange(value))
    }

    /// Like [`Money::try_from_decimal`], but rejects values with digits below the cent.
    pub fn try_from_exact_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.round_dp(2) != value {
            return Err(MoneyError::SubCent(value));
        }
        Self::try_from_decimal(value)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub color: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitMode {
    Equal,
    Custom,
    Percentage,
}

impl SplitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Custom => "custom",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an expense total is divided, with the selected participants in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SplitRule {
    Equal(Vec<ParticipantId>),
    /// Explicit amount per participant.
    Custom(Vec<(ParticipantId, Decimal)>),
    /// Percentage of the total per participant.
    Percentage(Vec<(ParticipantId, Decimal)>),
}

impl SplitRule {
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::Equal(_) => SplitMode::Equal,
            Self::Custom(_) => SplitMode::Custom,
            Self::Percentage(_) => SplitMode::Percentage,
        }
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        match self {
            Self::Equal(ids) => ids.clone(),
            Self::Custom(entries) | Self::Percentage(entries) => {
                entries.iter().map(|(id, _)| *id).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Equal(ids) => ids.len(),
            Self::Custom(entries) | Self::Percentage(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    pub participant: ParticipantId,
    pub amount: Money,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub payer: ParticipantId,
    pub split_mode: SplitMode,
    pub category: ExpenseCategory,
    pub splits: Vec<Split>,
}

impl Expense {
    pub fn split_total(&self) -> Money {
        self.splits.iter().map(|split| split.amount).sum()
    }

    pub fn involves(&self, participant: ParticipantId) -> bool {
        self.payer == participant
            || self
                .splits
                .iter()
                .any(|split| split.participant == participant)
    }
}

/// Net position of one participant: positive is owed to them, negative is owed by them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Balance {
    pub participant: ParticipantId,
    pub name: String,
    pub net: Money,
}

impl Balance {
    pub fn is_settled(&self) -> bool {
        self.net.is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub from: ParticipantId,
    pub from_name: String,
    pub to: ParticipantId,
    pub to_name: String,
    pub amount: Money,
}

/// Pairwise debt between one debtor and one creditor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwedAmount {
    pub from: ParticipantId,
    pub from_name: String,
    pub to: ParticipantId,
    pub to_name: String,
    pub amount: Money,
}

/// An expense whose splits do not add up to its amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegrityWarning {
    pub expense: ExpenseId,
    pub expected: Money,
    pub actual: Money,
}

impl IntegrityWarning {
    pub fn difference(&self) -> Money {
        self.actual - self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case::whole("100", 10_000)]
    #[case::cents("33.33", 3_333)]
    #[case::half_cent_up("0.005", 1)]
    #[case::half_cent_negative("-0.005", -1)]
    #[case::below_half("12.344", 1_234)]
    #[case::zero("0", 0)]
    fn money_rounds_decimal_to_cents(#[case] input: &str, #[case] expected_cents: i64) {
        let value = Decimal::from_str(input).unwrap();
        assert_eq!(
            Money::try_from_decimal(value).unwrap(),
            Money::from_cents(expected_cents)
        );
    }

    #[rstest]
    #[case::decimal_max(Decimal::MAX)]
    #[case::fits_i64_cents(Decimal::from(90_000_000_000_000_000_i64))]
    #[case::just_above_cap(Decimal::from_str("1000000000000.01").unwrap())]
    #[case::negative(Decimal::from(-90_000_000_000_000_000_i64))]
    fn money_out_of_range_is_rejected(#[case] value: Decimal) {
        assert_eq!(
            Money::try_from_decimal(value),
            Err(MoneyError::OutOfRange(value))
        );
    }

    #[test]
    fn money_cap_is_inclusive() {
        let value = Decimal::from(1_000_000_000_000_i64);
        assert_eq!(Money::try_from_decimal(value), Ok(Money::MAX));
        assert_eq!(Money::try_from_decimal(-value), Ok(-Money::MAX));
    }

    #[rstest]
    #[case::whole("10", Ok(Money::from_cents(1_000)))]
    #[case::trailing_zeros("10.000", Ok(Money::from_cents(1_000)))]
    #[case::cents("6.01", Ok(Money::from_cents(601)))]
    #[case::sub_cent("10.005", Err(MoneyError::SubCent(Decimal::from_str("10.005").unwrap())))]
    fn exact_conversion_keeps_cents(
        #[case] input: &str,
        #[case] expected: Result<Money, MoneyError>,
    ) {
        let value = Decimal::from_str(input).unwrap();
        assert_eq!(Money::try_from_exact_decimal(value), expected);
    }

    #[rstest]
    #[case::positive(1_234, "12.34")]
    #[case::negative(-350, "-3.50")]
    #[case::zero(0, "0.00")]
    fn money_displays_two_decimals(#[case] cents: i64, #[case] expected: &str) {
        assert_eq!(Money::from_cents(cents).to_string(), expected);
    }

    #[test]
    fn split_rule_reports_participants_in_order() {
        let rule = SplitRule::Percentage(vec![
            (ParticipantId(3), Decimal::from(50)),
            (ParticipantId(1), Decimal::from(50)),
        ]);
        assert_eq!(rule.participants(), vec![ParticipantId(3), ParticipantId(1)]);
        assert_eq!(rule.mode(), SplitMode::Percentage);
        assert_eq!(rule.len(), 2);
    }
}
