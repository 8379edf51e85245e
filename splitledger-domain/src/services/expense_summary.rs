use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    category::ExpenseCategory,
    model::{Balance, Expense, Money, ParticipantId},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub amount: Money,
    /// Share of the group total in percent, one decimal place.
    pub share_percent: Decimal,
}

/// Group-level figures derived from a ledger snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseSummary {
    pub expense_count: usize,
    pub total_spent: Money,
    /// Largest category first; ties keep first-seen order.
    pub categories: Vec<CategoryTotal>,
    /// Sum of all positive balances.
    pub total_owed_to_creditors: Money,
    /// Sum of the magnitudes of all negative balances.
    pub total_owed_by_debtors: Money,
}

impl ExpenseSummary {
    pub fn build(expenses: &[Expense], balances: &[Balance]) -> Self {
        let total_spent: Money = expenses.iter().map(|expense| expense.amount).sum();

        let mut totals: Vec<(ExpenseCategory, Money)> = Vec::new();
        for expense in expenses {
            match totals.iter_mut().find(|(category, _)| *category == expense.category) {
                Some((_, amount)) => *amount += expense.amount,
                None => totals.push((expense.category, expense.amount)),
            }
        }
        totals.sort_by(|(_, a), (_, b)| b.cmp(a));

        let categories = if total_spent.is_zero() {
            Vec::new()
        } else {
            totals
                .into_iter()
                .map(|(category, amount)| CategoryTotal {
                    category,
                    amount,
                    share_percent: share_percent(amount, total_spent),
                })
                .collect()
        };

        let total_owed_to_creditors = balances
            .iter()
            .filter(|balance| balance.net.is_positive())
            .map(|balance| balance.net)
            .sum();
        let total_owed_by_debtors = balances
            .iter()
            .filter(|balance| balance.net.is_negative())
            .map(|balance| -balance.net)
            .sum();

        Self {
            expense_count: expenses.len(),
            total_spent,
            categories,
            total_owed_to_creditors,
            total_owed_by_debtors,
        }
    }
}

/// Expenses a participant paid for or has a split in, in ledger order.
pub fn expenses_involving(
    expenses: &[Expense],
    participant: ParticipantId,
) -> impl Iterator<Item = &Expense> + '_ {
    expenses
        .iter()
        .filter(move |expense| expense.involves(participant))
}

fn share_percent(amount: Money, total: Money) -> Decimal {
    (Decimal::from(amount.cents()) * Decimal::ONE_HUNDRED / Decimal::from(total.cents()))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseId, Split, SplitMode};
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::str::FromStr;

    fn expense(id: u64, payer: u64, amount: i64, category: ExpenseCategory) -> Expense {
        Expense {
            id: ExpenseId(id),
            description: format!("expense {id}"),
            amount: Money::from_cents(amount),
            date: NaiveDate::default(),
            payer: ParticipantId(payer),
            split_mode: SplitMode::Equal,
            category,
            splits: vec![Split {
                participant: ParticipantId(3),
                amount: Money::from_cents(amount),
            }],
        }
    }

    fn balance(id: u64, net: i64) -> Balance {
        Balance {
            participant: ParticipantId(id),
            name: format!("P{id}"),
            net: Money::from_cents(net),
        }
    }

    #[test]
    fn categories_are_sorted_by_amount_with_shares() {
        let expenses = vec![
            expense(1, 1, 2_000, ExpenseCategory::Travel),
            expense(2, 1, 6_000, ExpenseCategory::Food),
            expense(3, 2, 1_000, ExpenseCategory::Travel),
            expense(4, 2, 1_000, ExpenseCategory::Gifts),
        ];
        let summary = ExpenseSummary::build(&expenses, &[]);

        assert_eq!(summary.expense_count, 4);
        assert_eq!(summary.total_spent, Money::from_cents(10_000));
        let listed: Vec<(ExpenseCategory, i64, Decimal)> = summary
            .categories
            .iter()
            .map(|c| (c.category, c.amount.cents(), c.share_percent))
            .collect();
        assert_eq!(
            listed,
            vec![
                (ExpenseCategory::Food, 6_000, Decimal::from(60)),
                (ExpenseCategory::Travel, 3_000, Decimal::from(30)),
                (ExpenseCategory::Gifts, 1_000, Decimal::from(10)),
            ]
        );
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let expenses = vec![
            expense(1, 1, 500, ExpenseCategory::Internet),
            expense(2, 1, 500, ExpenseCategory::Health),
        ];
        let summary = ExpenseSummary::build(&expenses, &[]);
        let order: Vec<ExpenseCategory> = summary.categories.iter().map(|c| c.category).collect();
        assert_eq!(order, vec![ExpenseCategory::Internet, ExpenseCategory::Health]);
    }

    #[rstest]
    #[case::third(1_000, 3_000, "33.3")]
    #[case::two_thirds(2_000, 3_000, "66.7")]
    #[case::all(3_000, 3_000, "100")]
    fn share_is_rounded_to_one_decimal(
        #[case] amount: i64,
        #[case] total: i64,
        #[case] expected: &str,
    ) {
        assert_eq!(
            share_percent(Money::from_cents(amount), Money::from_cents(total)),
            Decimal::from_str(expected).unwrap()
        );
    }

    #[test]
    fn empty_ledger_has_no_categories() {
        let summary = ExpenseSummary::build(&[], &[balance(1, 0)]);
        assert_eq!(summary.total_spent, Money::ZERO);
        assert!(summary.categories.is_empty());
        assert_eq!(summary.total_owed_to_creditors, Money::ZERO);
    }

    #[test]
    fn owed_totals_split_positive_and_negative() {
        let balances = vec![balance(1, 6_666), balance(2, -3_333), balance(3, -3_333)];
        let summary = ExpenseSummary::build(&[], &balances);
        assert_eq!(summary.total_owed_to_creditors, Money::from_cents(6_666));
        assert_eq!(summary.total_owed_by_debtors, Money::from_cents(6_666));
    }

    #[test]
    fn filter_matches_payer_or_split_participant() {
        let expenses = vec![
            expense(1, 1, 100, ExpenseCategory::Other),
            expense(2, 2, 100, ExpenseCategory::Other),
        ];
        let ids: Vec<u64> = expenses_involving(&expenses, ParticipantId(2))
            .map(|e| e.id.0)
            .collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(expenses_involving(&expenses, ParticipantId(3)).count(), 2);
        assert_eq!(expenses_involving(&expenses, ParticipantId(9)).count(), 0);
    }
}
