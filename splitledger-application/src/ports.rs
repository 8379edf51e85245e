use crate::error::StoreError;
use chrono::NaiveDate;
use splitledger_domain::{
    Expense, ExpenseCategory, ExpenseId, Group, GroupId, Money, Participant, ParticipantId,
    Split, SplitMode,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewParticipant {
    pub name: String,
    pub color: Option<String>,
}

/// An expense together with its computed splits, not yet assigned an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub payer: ParticipantId,
    pub split_mode: SplitMode,
    pub category: ExpenseCategory,
    pub splits: Vec<Split>,
}

/// Persistence for groups, participants, expenses and splits.
pub trait ExpenseStore: Send + Sync {
    fn create_group(&self, name: &str, description: Option<&str>) -> Result<Group, StoreError>;

    fn group(&self, group: GroupId) -> Result<Group, StoreError>;

    fn add_participant(
        &self,
        group: GroupId,
        participant: NewParticipant,
    ) -> Result<Participant, StoreError>;

    /// Participants in creation order.
    fn participants(&self, group: GroupId) -> Result<Vec<Participant>, StoreError>;

    /// Expenses with their splits, in creation order.
    fn expenses(&self, group: GroupId) -> Result<Vec<Expense>, StoreError>;

    /// Writes the expense and all of its splits, or nothing.
    fn insert_expense(&self, group: GroupId, expense: NewExpense) -> Result<Expense, StoreError>;

    /// Removes the expense and its splits.
    fn delete_expense(&self, group: GroupId, expense: ExpenseId) -> Result<(), StoreError>;
}
