use fxhash::FxHashMap;

use crate::model::{Balance, Expense, IntegrityWarning, Money, Participant, ParticipantId};

/// Folds expenses into one net balance per participant.
pub struct BalanceAggregator;

/// Balances in participant input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceSheet {
    balances: Vec<Balance>,
}

impl BalanceAggregator {
    /// Credits each payer and debits each split participant by the split amount.
    ///
    /// A split line whose participant is also the payer is applied as an
    /// explicit zero delta. Lines naming someone outside `participants` only
    /// move the known side; the resulting imbalance shows up in
    /// [`BalanceSheet::net_total`].
    pub fn compute(&self, participants: &[Participant], expenses: &[Expense]) -> BalanceSheet {
        let mut index: FxHashMap<ParticipantId, usize> =
            FxHashMap::with_capacity_and_hasher(participants.len(), Default::default());
        for (idx, participant) in participants.iter().enumerate() {
            index.entry(participant.id).or_insert(idx);
        }
        let mut running = vec![Money::ZERO; participants.len()];

        for expense in expenses {
            for split in &expense.splits {
                let delta = if split.participant == expense.payer {
                    split.amount - split.amount
                } else {
                    split.amount
                };

                match index.get(&expense.payer) {
                    Some(&idx) => running[idx] += delta,
                    None => tracing::warn!(
                        expense_id = expense.id.0,
                        participant_id = expense.payer.0,
                        "Payer is not a participant of this group"
                    ),
                }
                match index.get(&split.participant) {
                    Some(&idx) => running[idx] -= delta,
                    None => tracing::warn!(
                        expense_id = expense.id.0,
                        participant_id = split.participant.0,
                        "Split references a participant outside this group"
                    ),
                }
            }
        }

        let balances = participants
            .iter()
            .zip(running)
            .map(|(participant, net)| Balance {
                participant: participant.id,
                name: participant.name.clone(),
                net,
            })
            .collect();

        BalanceSheet { balances }
    }
}

impl BalanceSheet {
    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn into_balances(self) -> Vec<Balance> {
        self.balances
    }

    pub fn net_total(&self) -> Money {
        self.balances.iter().map(|balance| balance.net).sum()
    }

    /// True when the sheet nets to zero within one cent.
    pub fn is_zero_sum(&self) -> bool {
        self.net_total().abs() <= Money::CENT
    }
}

/// Convenience wrapper returning the balances of [`BalanceAggregator::compute`].
pub fn compute_balances(participants: &[Participant], expenses: &[Expense]) -> Vec<Balance> {
    BalanceAggregator
        .compute(participants, expenses)
        .into_balances()
}

/// Lists expenses whose splits miss their amount by more than one cent.
pub fn check_integrity(expenses: &[Expense]) -> Vec<IntegrityWarning> {
    expenses
        .iter()
        .filter_map(|expense| {
            let actual = expense.split_total();
            ((actual - expense.amount).abs() > Money::CENT).then_some(IntegrityWarning {
                expense: expense.id,
                expected: expense.amount,
                actual,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        category::ExpenseCategory,
        model::{ExpenseId, Split, SplitMode},
    };
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    fn participant(id: u64, name: &str) -> Participant {
        Participant {
            id: ParticipantId(id),
            name: name.to_string(),
            color: None,
        }
    }

    fn expense(id: u64, payer: u64, amount: i64, splits: &[(u64, i64)]) -> Expense {
        Expense {
            id: ExpenseId(id),
            description: String::new(),
            amount: Money::from_cents(amount),
            date: NaiveDate::default(),
            payer: ParticipantId(payer),
            split_mode: SplitMode::Custom,
            category: ExpenseCategory::Other,
            splits: splits
                .iter()
                .map(|&(participant, amount)| Split {
                    participant: ParticipantId(participant),
                    amount: Money::from_cents(amount),
                })
                .collect(),
        }
    }

    #[fixture]
    fn abc() -> Vec<Participant> {
        vec![participant(1, "A"), participant(2, "B"), participant(3, "C")]
    }

    fn nets(sheet: &BalanceSheet) -> Vec<i64> {
        sheet.balances().iter().map(|b| b.net.cents()).collect()
    }

    #[rstest]
    #[case::no_expenses(vec![], &[0, 0, 0])]
    #[case::equal_dinner(
        vec![expense(1, 1, 10_000, &[(1, 3_334), (2, 3_333), (3, 3_333)])],
        &[6_666, -3_333, -3_333]
    )]
    #[case::self_pay_only(vec![expense(1, 2, 500, &[(2, 500)])], &[0, 0, 0])]
    #[case::offsetting(
        vec![
            expense(1, 1, 1_000, &[(2, 1_000)]),
            expense(2, 2, 400, &[(1, 400)]),
        ],
        &[600, -600, 0]
    )]
    #[case::chain(
        vec![
            expense(1, 1, 2_000, &[(2, 2_000)]),
            expense(2, 2, 2_000, &[(3, 2_000)]),
        ],
        &[2_000, 0, -2_000]
    )]
    fn balance_cases(
        abc: Vec<Participant>,
        #[case] expenses: Vec<Expense>,
        #[case] expected: &[i64],
    ) {
        let sheet = BalanceAggregator.compute(&abc, &expenses);
        assert_eq!(nets(&sheet), expected);
        assert!(sheet.is_zero_sum());
    }

    #[rstest]
    fn output_follows_participant_order(abc: Vec<Participant>) {
        let mut reversed = abc;
        reversed.reverse();
        let expenses = vec![expense(1, 1, 900, &[(2, 300), (3, 600)])];
        let sheet = BalanceAggregator.compute(&reversed, &expenses);
        let order: Vec<u64> = sheet.balances().iter().map(|b| b.participant.0).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(nets(&sheet), vec![-600, -300, 900]);
        assert_eq!(sheet.balances()[2].name, "A");
    }

    #[rstest]
    fn unknown_participant_breaks_zero_sum(abc: Vec<Participant>) {
        let expenses = vec![expense(1, 1, 1_000, &[(2, 500), (99, 500)])];
        let sheet = BalanceAggregator.compute(&abc, &expenses);
        assert_eq!(nets(&sheet), vec![1_000, -500, 0]);
        assert_eq!(sheet.net_total(), Money::from_cents(500));
        assert!(!sheet.is_zero_sum());
    }

    #[rstest]
    fn empty_group_has_no_balances() {
        let sheet = BalanceAggregator.compute(&[], &[expense(1, 1, 100, &[(1, 100)])]);
        assert!(sheet.balances().is_empty());
        assert!(sheet.is_zero_sum());
    }

    #[test]
    fn integrity_flags_mismatched_expenses_only() {
        let expenses = vec![
            expense(1, 1, 1_000, &[(1, 500), (2, 500)]),
            expense(2, 1, 1_000, &[(1, 500), (2, 499)]),
            expense(3, 1, 1_000, &[(1, 500)]),
        ];
        assert_eq!(
            check_integrity(&expenses),
            vec![IntegrityWarning {
                expense: ExpenseId(3),
                expected: Money::from_cents(1_000),
                actual: Money::from_cents(500),
            }]
        );
    }
}
