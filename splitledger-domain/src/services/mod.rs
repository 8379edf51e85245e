pub mod balance_aggregator;
pub mod expense_summary;
pub mod settlement_planner;
pub mod split_calculator;
pub mod validation;

pub use balance_aggregator::{BalanceAggregator, BalanceSheet, check_integrity, compute_balances};
pub use expense_summary::{CategoryTotal, ExpenseSummary, expenses_involving};
pub use settlement_planner::{SettlementPlanner, calculate_owed_amounts, compute_settlements};
pub use split_calculator::{SplitCalculator, calculate_from_percentages, split_equally};
pub use validation::{PERCENTAGE_TOLERANCE, validate_custom_split, validate_percentage_split};
