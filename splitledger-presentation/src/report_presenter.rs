use crate::text_table::{Alignment, TextTableBuilder};
use splitledger_application::GroupReport;
use splitledger_domain::Money;
use std::{borrow::Cow, fmt::Write as _};

const PARTICIPANT: &str = "Participant";
const BALANCE: &str = "Balance";
const FROM: &str = "From";
const TO: &str = "To";
const AMOUNT: &str = "Amount";
const CATEGORY: &str = "Category";
const SHARE: &str = "Share";

/// Renders [`GroupReport`] sections as plain text.
pub struct ReportPresenter<'a> {
    currency: &'a str,
}

impl<'a> ReportPresenter<'a> {
    pub fn new(currency: &'a str) -> Self {
        Self { currency }
    }

    pub fn render_full(&self, report: &GroupReport) -> String {
        let mut sections = vec![
            self.render_balances(report),
            self.render_settlements(report),
            self.render_owed(report),
            self.render_summary(report),
        ];
        if !report.is_healthy() {
            sections.push(self.render_integrity(report));
        }
        sections.join("\n")
    }

    pub fn render_balances(&self, report: &GroupReport) -> String {
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(PARTICIPANT), Cow::Borrowed(BALANCE)])
            .rows(report.balances.balances().iter().map(|balance| {
                [
                    Cow::Borrowed(balance.name.as_str()),
                    Cow::Owned(self.signed(balance.net)),
                ]
            }))
            .build();
        format!("Balances\n{table}")
    }

    pub fn render_settlements(&self, report: &GroupReport) -> String {
        if report.settlements.is_empty() {
            return "Settlements\nAll settled up.\n".to_string();
        }
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(FROM), Cow::Borrowed(TO), Cow::Borrowed(AMOUNT)])
            .rows(report.settlements.iter().map(|settlement| {
                [
                    Cow::Borrowed(settlement.from_name.as_str()),
                    Cow::Borrowed(settlement.to_name.as_str()),
                    Cow::Owned(self.amount(settlement.amount)),
                ]
            }))
            .build();
        format!("Settlements\n{table}")
    }

    pub fn render_owed(&self, report: &GroupReport) -> String {
        if report.owed.is_empty() {
            return "Who owes whom\nNobody owes anything.\n".to_string();
        }
        let table = TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&[Cow::Borrowed(FROM), Cow::Borrowed(TO), Cow::Borrowed(AMOUNT)])
            .rows(report.owed.iter().map(|owed| {
                [
                    Cow::Borrowed(owed.from_name.as_str()),
                    Cow::Borrowed(owed.to_name.as_str()),
                    Cow::Owned(self.amount(owed.amount)),
                ]
            }))
            .build();
        format!("Who owes whom\n{table}")
    }

    pub fn render_summary(&self, report: &GroupReport) -> String {
        let summary = &report.summary;
        let mut reply = String::with_capacity(256);
        let _ = writeln!(&mut reply, "Summary");
        let _ = writeln!(&mut reply, "Expenses: {}", summary.expense_count);
        let _ = writeln!(&mut reply, "Total spent: {}", self.amount(summary.total_spent));
        let _ = writeln!(
            &mut reply,
            "Owed to creditors: {}",
            self.amount(summary.total_owed_to_creditors)
        );
        let _ = writeln!(
            &mut reply,
            "Owed by debtors: {}",
            self.amount(summary.total_owed_by_debtors)
        );

        if !summary.categories.is_empty() {
            let table = TextTableBuilder::new()
                .alignments(&[Alignment::Left, Alignment::Right, Alignment::Right])
                .headers(&[
                    Cow::Borrowed(CATEGORY),
                    Cow::Borrowed(AMOUNT),
                    Cow::Borrowed(SHARE),
                ])
                .rows(summary.categories.iter().map(|total| {
                    [
                        Cow::Borrowed(total.category.name()),
                        Cow::Owned(self.amount(total.amount)),
                        Cow::Owned(format!("{:.1}%", total.share_percent)),
                    ]
                }))
                .build();
            reply.push_str(&table);
        }

        reply
    }

    pub fn render_integrity(&self, report: &GroupReport) -> String {
        let mut reply = String::from("Integrity warnings\n");
        for warning in &report.integrity_warnings {
            let _ = writeln!(
                &mut reply,
                "- expense {}: splits add up to {} but the amount is {} ({})",
                warning.expense,
                self.amount(warning.actual),
                self.amount(warning.expected),
                self.signed(warning.difference())
            );
        }
        if !report.balances.is_zero_sum() {
            let _ = writeln!(
                &mut reply,
                "- balances are off by {}",
                self.signed(report.balances.net_total())
            );
        }
        reply
    }

    fn amount(&self, money: Money) -> String {
        if money.is_negative() {
            format!("-{}{}", self.currency, money.abs())
        } else {
            format!("{}{money}", self.currency)
        }
    }

    fn signed(&self, money: Money) -> String {
        if money.is_positive() {
            format!("+{}", self.amount(money))
        } else {
            self.amount(money)
        }
    }
}
