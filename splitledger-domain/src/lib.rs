#![warn(clippy::uninlined_format_args)]

pub mod category;
pub mod error;
pub mod model;
pub mod services;

pub use category::{CategoryDescriptor, ExpenseCategory};
pub use error::{MoneyError, SplitError};
pub use model::{
    Balance, Expense, ExpenseId, Group, GroupId, IntegrityWarning, Money, OwedAmount,
    Participant, ParticipantId, Settlement, Split, SplitMode, SplitRule,
};
pub use services::{
    BalanceAggregator, BalanceSheet, ExpenseSummary, SettlementPlanner, SplitCalculator,
};
