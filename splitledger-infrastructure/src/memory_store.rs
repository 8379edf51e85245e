use dashmap::DashMap;
use indexmap::IndexMap;
use splitledger_application::{ExpenseStore, NewExpense, NewParticipant, StoreError};
use splitledger_domain::{Expense, ExpenseId, Group, GroupId, Money, Participant, ParticipantId};
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-local [`ExpenseStore`].
///
/// Each group lives in one map entry, and every write to a group holds that
/// entry's lock for its whole duration, so an expense and its splits become
/// visible together. Ids are unique across groups.
#[derive(Default)]
pub struct InMemoryExpenseStore {
    groups: DashMap<GroupId, GroupRecord>,
    next_id: AtomicU64,
}

struct GroupRecord {
    group: Group,
    participants: IndexMap<ParticipantId, Participant>,
    expenses: IndexMap<ExpenseId, Expense>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn with_group<T>(
        &self,
        group: GroupId,
        read: impl FnOnce(&GroupRecord) -> T,
    ) -> Result<T, StoreError> {
        self.groups
            .get(&group)
            .map(|record| read(&record))
            .ok_or(StoreError::UnknownGroup(group))
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn create_group(&self, name: &str, description: Option<&str>) -> Result<Group, StoreError> {
        let group = Group {
            id: GroupId(self.allocate_id()),
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        self.groups.insert(
            group.id,
            GroupRecord {
                group: group.clone(),
                participants: IndexMap::new(),
                expenses: IndexMap::new(),
            },
        );
        Ok(group)
    }

    fn group(&self, group: GroupId) -> Result<Group, StoreError> {
        self.with_group(group, |record| record.group.clone())
    }

    fn add_participant(
        &self,
        group: GroupId,
        participant: NewParticipant,
    ) -> Result<Participant, StoreError> {
        let mut record = self
            .groups
            .get_mut(&group)
            .ok_or(StoreError::UnknownGroup(group))?;
        let participant = Participant {
            id: ParticipantId(self.allocate_id()),
            name: participant.name,
            color: participant.color,
        };
        record
            .participants
            .insert(participant.id, participant.clone());
        Ok(participant)
    }

    fn participants(&self, group: GroupId) -> Result<Vec<Participant>, StoreError> {
        self.with_group(group, |record| {
            record.participants.values().cloned().collect()
        })
    }

    fn expenses(&self, group: GroupId) -> Result<Vec<Expense>, StoreError> {
        self.with_group(group, |record| record.expenses.values().cloned().collect())
    }

    fn insert_expense(&self, group: GroupId, expense: NewExpense) -> Result<Expense, StoreError> {
        let mut record = self
            .groups
            .get_mut(&group)
            .ok_or(StoreError::UnknownGroup(group))?;

        let unknown = std::iter::once(expense.payer)
            .chain(expense.splits.iter().map(|split| split.participant))
            .find(|participant| !record.participants.contains_key(participant));
        if let Some(participant) = unknown {
            return Err(StoreError::UnknownParticipant { group, participant });
        }

        let actual: Money = expense.splits.iter().map(|split| split.amount).sum();
        if (actual - expense.amount).abs() > Money::CENT {
            tracing::warn!(
                group_id = group.0,
                expected = %expense.amount,
                actual = %actual,
                "Rejected expense whose splits do not add up"
            );
            return Err(StoreError::SplitMismatch {
                expected: expense.amount,
                actual,
            });
        }

        let stored = Expense {
            id: ExpenseId(self.allocate_id()),
            description: expense.description,
            amount: expense.amount,
            date: expense.date,
            payer: expense.payer,
            split_mode: expense.split_mode,
            category: expense.category,
            splits: expense.splits,
        };
        record.expenses.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn delete_expense(&self, group: GroupId, expense: ExpenseId) -> Result<(), StoreError> {
        let mut record = self
            .groups
            .get_mut(&group)
            .ok_or(StoreError::UnknownGroup(group))?;
        record
            .expenses
            .shift_remove(&expense)
            .map(|_| ())
            .ok_or(StoreError::UnknownExpense { group, expense })
    }
}
