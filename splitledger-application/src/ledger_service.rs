use crate::{
    error::LedgerError,
    model::{ExpenseDraft, GroupReport},
    ports::{ExpenseStore, NewExpense, NewParticipant},
};
use fxhash::FxHashSet;
use splitledger_domain::{
    BalanceAggregator, Expense, ExpenseId, ExpenseSummary, Group, GroupId, Money, Participant,
    ParticipantId, SettlementPlanner, SplitCalculator,
    services::{calculate_owed_amounts, check_integrity, expenses_involving},
};

/// Entry point for the surrounding application: writes expenses through the
/// split calculator and builds reports from store snapshots.
#[derive(Clone, Copy)]
pub struct LedgerService<'a> {
    store: &'a dyn ExpenseStore,
}

impl<'a> LedgerService<'a> {
    pub fn new(store: &'a dyn ExpenseStore) -> Self {
        Self { store }
    }

    pub fn create_group(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Group, LedgerError> {
        let group = self.store.create_group(name, description)?;
        tracing::info!(group_id = group.id.0, name = %group.name, "Group created");
        Ok(group)
    }

    pub fn add_participant(
        &self,
        group: GroupId,
        name: &str,
        color: Option<&str>,
    ) -> Result<Participant, LedgerError> {
        let participant = self.store.add_participant(
            group,
            NewParticipant {
                name: name.to_string(),
                color: color.map(str::to_string),
            },
        )?;
        tracing::debug!(
            group_id = group.0,
            participant_id = participant.id.0,
            name = %participant.name,
            "Participant added"
        );
        Ok(participant)
    }

    /// Validates the draft, splits it and persists expense and splits together.
    ///
    /// The amount must be whole cents; `10.005` is rejected, not rounded.
    pub fn record_expense(
        &self,
        group: GroupId,
        draft: ExpenseDraft,
    ) -> Result<Expense, LedgerError> {
        let amount = Money::try_from_exact_decimal(draft.amount)?;
        let members: FxHashSet<ParticipantId> = self
            .store
            .participants(group)?
            .into_iter()
            .map(|participant| participant.id)
            .collect();

        let outsider = std::iter::once(draft.payer)
            .chain(draft.rule.participants())
            .find(|participant| !members.contains(participant));
        if let Some(participant) = outsider {
            return Err(LedgerError::NotInGroup { group, participant });
        }

        let splits = SplitCalculator.compute(amount, &draft.rule)?;
        let expense = self.store.insert_expense(
            group,
            NewExpense {
                description: draft.description,
                amount,
                date: draft.date,
                payer: draft.payer,
                split_mode: draft.rule.mode(),
                category: draft.category,
                splits,
            },
        )?;

        tracing::info!(
            group_id = group.0,
            expense_id = expense.id.0,
            amount = %expense.amount,
            split_mode = %expense.split_mode,
            split_count = expense.splits.len(),
            "Expense recorded"
        );
        Ok(expense)
    }

    pub fn remove_expense(&self, group: GroupId, expense: ExpenseId) -> Result<(), LedgerError> {
        self.store.delete_expense(group, expense)?;
        tracing::info!(group_id = group.0, expense_id = expense.0, "Expense removed");
        Ok(())
    }

    /// Expenses the participant paid for or shares in.
    pub fn participant_expenses(
        &self,
        group: GroupId,
        participant: ParticipantId,
    ) -> Result<Vec<Expense>, LedgerError> {
        let expenses = self.store.expenses(group)?;
        Ok(expenses_involving(&expenses, participant)
            .cloned()
            .collect())
    }

    /// Computes balances, settlements and summaries from the current snapshot.
    ///
    /// Inconsistent stored data does not fail the report; it is logged and
    /// returned in [`GroupReport::integrity_warnings`].
    pub fn group_report(&self, group: GroupId) -> Result<GroupReport, LedgerError> {
        let group_record = self.store.group(group)?;
        let participants = self.store.participants(group)?;
        let expenses = self.store.expenses(group)?;

        let integrity_warnings = check_integrity(&expenses);
        for warning in &integrity_warnings {
            tracing::warn!(
                group_id = group.0,
                expense_id = warning.expense.0,
                expected = %warning.expected,
                actual = %warning.actual,
                "Expense splits do not add up to the expense amount"
            );
        }

        let balances = BalanceAggregator.compute(&participants, &expenses);
        if !balances.is_zero_sum() {
            tracing::warn!(
                group_id = group.0,
                net_total = %balances.net_total(),
                "Balance sheet does not net to zero"
            );
        }

        let settlements = SettlementPlanner.plan(balances.balances());
        let owed = calculate_owed_amounts(balances.balances());
        let summary = ExpenseSummary::build(&expenses, balances.balances());

        tracing::debug!(
            group_id = group.0,
            member_count = participants.len(),
            expense_count = expenses.len(),
            settlement_count = settlements.len(),
            "Group report built"
        );

        Ok(GroupReport {
            group: group_record,
            participants,
            expenses,
            balances,
            settlements,
            owed,
            summary,
            integrity_warnings,
        })
    }
}
