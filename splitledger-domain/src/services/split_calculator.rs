use rust_decimal::Decimal;

use crate::{
    error::{MoneyError, SplitError},
    model::{Money, ParticipantId, Split, SplitRule},
    services::validation::{
        check_non_negative, check_selection, checked_sum, validate_custom_split,
        validate_percentage_split,
    },
};

/// Turns an expense total and a split rule into per-participant splits.
pub struct SplitCalculator;

impl SplitCalculator {
    /// Computes one split per selected participant, in rule order.
    ///
    /// The returned amounts always add up to `total` exactly. Equal splits give
    /// one extra cent to each of the first participants. Percentage splits give
    /// the whole rounding residual to the first participant. Custom amounts must
    /// already be whole cents and are stored as given.
    ///
    /// A negative residual can push the first percentage share below zero, for
    /// instance a leading `0%` entry on a few cents. Such rules are rejected
    /// with [`SplitError::NegativeShare`] rather than moving the residual to
    /// another participant.
    pub fn compute(&self, total: Money, rule: &SplitRule) -> Result<Vec<Split>, SplitError> {
        if !total.is_positive() {
            return Err(SplitError::NonPositiveTotal(total));
        }
        let participants = rule.participants();
        check_selection(&participants)?;

        let amounts = match rule {
            SplitRule::Equal(ids) => split_equally(total, ids.len()),
            SplitRule::Custom(entries) => custom_amounts(total, entries)?,
            SplitRule::Percentage(entries) => percentage_amounts(total, entries)?,
        };

        if let Some((participant, amount)) = participants
            .iter()
            .zip(&amounts)
            .find(|(_, amount)| amount.is_negative())
        {
            return Err(SplitError::NegativeShare {
                participant: *participant,
                value: amount.as_decimal(),
            });
        }

        tracing::debug!(
            mode = %rule.mode(),
            participant_count = participants.len(),
            total = %total,
            "Split computed"
        );

        Ok(participants
            .into_iter()
            .zip(amounts)
            .map(|(participant, amount)| Split {
                participant,
                amount,
            })
            .collect())
    }
}

/// Divides `total` into `participant_count` shares that differ by at most one cent.
///
/// Every share starts at the floored cent quotient; the leftover cents go to the
/// first participants in input order.
pub fn split_equally(total: Money, participant_count: usize) -> Vec<Money> {
    if participant_count == 0 {
        return Vec::new();
    }
    let count = participant_count as i64;
    let base = total.cents().div_euclid(count);
    let leftover = total.cents() - base * count;

    (0..count)
        .map(|idx| {
            let share = if idx < leftover { base + 1 } else { base };
            Money::from_cents(share)
        })
        .collect()
}

/// Converts percentages of `total` to amounts rounded to the cent, adding the
/// rounding residual to the first amount.
pub fn calculate_from_percentages(
    total: Money,
    percentages: &[Decimal],
) -> Result<Vec<Money>, MoneyError> {
    let total_decimal = total.as_decimal();
    let mut amounts = percentages
        .iter()
        .map(|percentage| {
            let share = total_decimal
                .checked_mul(*percentage)
                .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(MoneyError::OutOfRange(*percentage))?;
            Money::try_from_decimal(share)
        })
        .collect::<Result<Vec<_>, _>>()?;
    assign_residual(total, &mut amounts);
    Ok(amounts)
}

fn custom_amounts(
    total: Money,
    entries: &[(ParticipantId, Decimal)],
) -> Result<Vec<Money>, SplitError> {
    check_non_negative(entries)?;
    let values: Vec<Decimal> = entries.iter().map(|(_, value)| *value).collect();
    if !validate_custom_split(total, &values) {
        let actual = checked_sum(&values).ok_or(MoneyError::OutOfRange(Decimal::MAX))?;
        return Err(SplitError::CustomSumMismatch {
            expected: total,
            actual,
        });
    }

    Ok(values
        .into_iter()
        .map(Money::try_from_exact_decimal)
        .collect::<Result<Vec<_>, _>>()?)
}

fn percentage_amounts(
    total: Money,
    entries: &[(ParticipantId, Decimal)],
) -> Result<Vec<Money>, SplitError> {
    check_non_negative(entries)?;
    let percentages: Vec<Decimal> = entries.iter().map(|(_, value)| *value).collect();
    if !validate_percentage_split(&percentages) {
        let actual = checked_sum(&percentages).ok_or(MoneyError::OutOfRange(Decimal::MAX))?;
        return Err(SplitError::PercentageSumMismatch { actual });
    }
    Ok(calculate_from_percentages(total, &percentages)?)
}

fn assign_residual(total: Money, amounts: &mut [Money]) {
    let residual = total - amounts.iter().sum::<Money>();
    if let Some(first) = amounts.first_mut() {
        *first += residual;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::str::FromStr;

    #[fixture]
    fn calculator() -> SplitCalculator {
        SplitCalculator
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn cents(values: &[i64]) -> Vec<Money> {
        values.iter().copied().map(Money::from_cents).collect()
    }

    fn ids(count: u64) -> Vec<ParticipantId> {
        (1..=count).map(ParticipantId).collect()
    }

    fn entries(values: &[&str]) -> Vec<(ParticipantId, Decimal)> {
        ids(values.len() as u64)
            .into_iter()
            .zip(values.iter().map(|v| dec(v)))
            .collect()
    }

    fn custom(values: &[&str]) -> SplitRule {
        SplitRule::Custom(entries(values))
    }

    fn percentage(values: &[&str]) -> SplitRule {
        SplitRule::Percentage(entries(values))
    }

    #[rstest]
    #[case::ten_by_three(1_000, 3, &[334, 333, 333])]
    #[case::hundred_by_three(10_000, 3, &[3_334, 3_333, 3_333])]
    #[case::even(1_000, 4, &[250, 250, 250, 250])]
    #[case::single(1_234, 1, &[1_234])]
    #[case::two_leftover(1_001, 3, &[334, 334, 333])]
    #[case::fewer_cents_than_people(2, 3, &[1, 1, 0])]
    #[case::nobody(1_000, 0, &[])]
    fn split_equally_cases(#[case] total: i64, #[case] count: usize, #[case] expected: &[i64]) {
        assert_eq!(split_equally(Money::from_cents(total), count), cents(expected));
    }

    #[rstest]
    #[case::thirds(10_000, &["33.33", "33.33", "33.34"], &[3_333, 3_333, 3_334])]
    #[case::residual_to_first(1_000, &["33.33", "33.33", "33.34"], &[334, 333, 333])]
    #[case::halves(999, &["50", "50"], &[499, 500])]
    #[case::whole(4_200, &["100"], &[4_200])]
    fn calculate_from_percentages_cases(
        #[case] total: i64,
        #[case] percentages: &[&str],
        #[case] expected: &[i64],
    ) {
        let percentages: Vec<Decimal> = percentages.iter().map(|p| dec(p)).collect();
        let amounts = calculate_from_percentages(Money::from_cents(total), &percentages).unwrap();
        assert_eq!(amounts, cents(expected));
    }

    #[rstest]
    fn equal_rule_keeps_input_order(calculator: SplitCalculator) {
        let rule = SplitRule::Equal(vec![ParticipantId(7), ParticipantId(2), ParticipantId(5)]);
        let splits = calculator.compute(Money::from_cents(10_000), &rule).unwrap();
        assert_eq!(
            splits,
            vec![
                Split {
                    participant: ParticipantId(7),
                    amount: Money::from_cents(3_334),
                },
                Split {
                    participant: ParticipantId(2),
                    amount: Money::from_cents(3_333),
                },
                Split {
                    participant: ParticipantId(5),
                    amount: Money::from_cents(3_333),
                },
            ]
        );
    }

    #[rstest]
    #[case::whole(1_000, &["4", "6"], &[400, 600])]
    #[case::cents(10_000, &["33.33", "33.33", "33.34"], &[3_333, 3_333, 3_334])]
    #[case::trailing_zeros(1_000, &["4.000", "6.00"], &[400, 600])]
    #[case::zero_share(1_000, &["0", "10"], &[0, 1_000])]
    fn custom_rule_keeps_amounts(
        calculator: SplitCalculator,
        #[case] total: i64,
        #[case] values: &[&str],
        #[case] expected: &[i64],
    ) {
        let splits = calculator
            .compute(Money::from_cents(total), &custom(values))
            .unwrap();
        let amounts: Vec<Money> = splits.iter().map(|split| split.amount).collect();
        assert_eq!(amounts, cents(expected));
    }

    #[rstest]
    #[case::non_positive(
        0,
        SplitRule::Equal(ids(2)),
        SplitError::NonPositiveTotal(Money::ZERO)
    )]
    #[case::negative_total(
        -100,
        SplitRule::Equal(ids(2)),
        SplitError::NonPositiveTotal(Money::from_cents(-100))
    )]
    #[case::empty(1_000, SplitRule::Equal(Vec::new()), SplitError::EmptySelection)]
    #[case::duplicate(
        1_000,
        SplitRule::Equal(vec![ParticipantId(1), ParticipantId(1)]),
        SplitError::DuplicateParticipant(ParticipantId(1))
    )]
    #[case::custom_mismatch(
        10_000,
        custom(&["40", "50"]),
        SplitError::CustomSumMismatch {
            expected: Money::from_cents(10_000),
            actual: dec("90"),
        }
    )]
    #[case::custom_sub_cent_over(
        1_000,
        custom(&["4", "6.007"]),
        SplitError::CustomSumMismatch {
            expected: Money::from_cents(1_000),
            actual: dec("10.007"),
        }
    )]
    #[case::custom_sub_cent_amounts(
        1_000,
        custom(&["3.335", "6.665"]),
        SplitError::Money(MoneyError::SubCent(dec("3.335")))
    )]
    #[case::custom_negative(
        10_000,
        custom(&["110", "-10"]),
        SplitError::NegativeShare {
            participant: ParticipantId(2),
            value: dec("-10"),
        }
    )]
    #[case::percentage_mismatch(
        10_000,
        percentage(&["33.33", "33.33"]),
        SplitError::PercentageSumMismatch {
            actual: dec("66.66"),
        }
    )]
    #[case::percentage_negative(
        10_000,
        percentage(&["120", "-20"]),
        SplitError::NegativeShare {
            participant: ParticipantId(2),
            value: dec("-20"),
        }
    )]
    #[case::zero_first_percentage(
        5,
        percentage(&["0", "50", "50"]),
        SplitError::NegativeShare {
            participant: ParticipantId(1),
            value: dec("-0.01"),
        }
    )]
    fn rejected_rules(
        calculator: SplitCalculator,
        #[case] total: i64,
        #[case] rule: SplitRule,
        #[case] expected: SplitError,
    ) {
        assert_eq!(
            calculator.compute(Money::from_cents(total), &rule),
            Err(expected)
        );
    }

    #[rstest]
    fn compute_is_idempotent(calculator: SplitCalculator) {
        let rule = SplitRule::Percentage(vec![
            (ParticipantId(1), dec("12.5")),
            (ParticipantId(2), dec("87.5")),
        ]);
        let first = calculator.compute(Money::from_cents(3_333), &rule);
        let second = calculator.compute(Money::from_cents(3_333), &rule);
        assert_eq!(first, second);
    }
}
