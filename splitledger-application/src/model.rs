use chrono::NaiveDate;
use rust_decimal::Decimal;
use splitledger_domain::{
    BalanceSheet, Expense, ExpenseCategory, ExpenseSummary, Group, IntegrityWarning, OwedAmount,
    Participant, ParticipantId, Settlement, SplitRule,
};

/// User input for a new expense, before splitting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub payer: ParticipantId,
    pub category: ExpenseCategory,
    pub rule: SplitRule,
}

/// Everything derived from one group snapshot.
#[derive(Clone, Debug)]
pub struct GroupReport {
    pub group: Group,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
    pub balances: BalanceSheet,
    pub settlements: Vec<Settlement>,
    pub owed: Vec<OwedAmount>,
    pub summary: ExpenseSummary,
    pub integrity_warnings: Vec<IntegrityWarning>,
}

impl GroupReport {
    /// False when stored splits are inconsistent or the sheet does not net to zero.
    pub fn is_healthy(&self) -> bool {
        self.integrity_warnings.is_empty() && self.balances.is_zero_sum()
    }
}
