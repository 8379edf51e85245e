use crate::model::{Balance, Money, OwedAmount, Settlement};

/// Greedy max-creditor / max-debtor settlement planning.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Plans transfers that bring every balance to zero.
    ///
    /// Each round pairs the largest creditor with the largest debtor (first
    /// occurrence wins on ties) and moves the smaller of the two magnitudes
    /// from debtor to creditor. For a zero-sum input this yields at most
    /// `n - 1` transfers for `n` nonzero balances. The plan is not guaranteed
    /// to use the fewest possible transfers.
    pub fn plan(&self, balances: &[Balance]) -> Vec<Settlement> {
        if balances.is_empty() {
            return Vec::new();
        }

        let mut working: Vec<Money> = balances.iter().map(|balance| balance.net).collect();
        let mut settlements = Vec::new();

        // Every round zeroes the creditor or the debtor and lowers the sum of
        // absolute balances by 2 * amount, so a zeroed entry is never picked
        // again as a counterparty and the loop runs at most n times.
        loop {
            let creditor = first_max(&working);
            let debtor = first_min(&working);
            let credit = working[creditor];
            let debt = working[debtor];

            if credit.abs() < Money::CENT && debt.abs() < Money::CENT {
                break;
            }

            let amount = credit.min(-debt);
            if amount < Money::CENT {
                break;
            }

            settlements.push(Settlement {
                from: balances[debtor].participant,
                from_name: balances[debtor].name.clone(),
                to: balances[creditor].participant,
                to_name: balances[creditor].name.clone(),
                amount,
            });

            working[creditor] -= amount;
            working[debtor] += amount;
        }

        debug_assert!(settlements.len() <= balances.len());
        tracing::debug!(
            member_count = balances.len(),
            settlement_count = settlements.len(),
            "Settlement plan computed"
        );

        settlements
    }
}

/// Convenience wrapper around [`SettlementPlanner::plan`].
pub fn compute_settlements(balances: &[Balance]) -> Vec<Settlement> {
    SettlementPlanner.plan(balances)
}

/// Pairwise breakdown: for every pair `i < j` made of one creditor and one
/// debtor, the debtor owes the creditor the smaller of the two magnitudes.
/// Amounts of one cent or less are dropped as rounding noise.
///
/// Pairs overlap, so the amounts are informational and do not form a
/// settlement plan.
pub fn calculate_owed_amounts(balances: &[Balance]) -> Vec<OwedAmount> {
    let mut owed = Vec::new();

    for (i, first) in balances.iter().enumerate() {
        for second in &balances[i + 1..] {
            let (debtor, creditor) = if first.net.is_positive() && second.net.is_negative() {
                (second, first)
            } else if first.net.is_negative() && second.net.is_positive() {
                (first, second)
            } else {
                continue;
            };

            let amount = creditor.net.min(-debtor.net);
            if amount > Money::CENT {
                owed.push(OwedAmount {
                    from: debtor.participant,
                    from_name: debtor.name.clone(),
                    to: creditor.participant,
                    to_name: creditor.name.clone(),
                    amount,
                });
            }
        }
    }

    owed
}

fn first_max(values: &[Money]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (idx, value)| if *value > values[best] { idx } else { best })
}

fn first_min(values: &[Money]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (idx, value)| if *value < values[best] { idx } else { best })
}
