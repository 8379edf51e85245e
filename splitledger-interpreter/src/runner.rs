use fxhash::FxHashMap;
use splitledger_application::{
    ExpenseDraft, ExpenseStore, GroupReport, LedgerError, LedgerService,
};
use splitledger_domain::{ExpenseCategory, GroupId, ParticipantId, SplitRule};
use splitledger_parser::{Command, ExpenseLine, Program, ShareList, Statement};
use splitledger_presentation::ReportPresenter;

const GROUP_NAME: &str = "ledger";

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Undefined participant '{name}' at line {line}")]
    UndefinedParticipant { name: String, line: usize },
    #[error("Participant '{name}' is declared twice (line {line})")]
    DuplicateParticipant { name: String, line: usize },
    #[error("Line {line}: {source}")]
    Statement { line: usize, source: LedgerError },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Rendered output of a script run.
#[derive(Debug)]
pub struct ScriptOutcome {
    pub sections: Vec<String>,
    /// Report for the whole script, after the last statement.
    pub final_report: GroupReport,
}

/// Executes a parsed ledger script against a fresh group in `store`.
pub struct ScriptRunner<'a, 's> {
    service: LedgerService<'a>,
    presenter: &'a ReportPresenter<'a>,
    group: GroupId,
    participants: FxHashMap<&'s str, ParticipantId>,
}

impl<'a, 's> ScriptRunner<'a, 's> {
    pub fn new(
        store: &'a dyn ExpenseStore,
        presenter: &'a ReportPresenter<'a>,
    ) -> Result<Self, ScriptError> {
        let service = LedgerService::new(store);
        let group = service.create_group(GROUP_NAME, None)?.id;
        Ok(Self {
            service,
            presenter,
            group,
            participants: FxHashMap::default(),
        })
    }

    pub fn run(mut self, program: &Program<'s>) -> Result<ScriptOutcome, ScriptError> {
        let mut sections = Vec::new();

        for stmt in &program.statements {
            let line = stmt.line;
            match &stmt.statement {
                Statement::Participants(names) => self.declare(names, line)?,
                Statement::Expense(expense) => self.record(expense, line)?,
                Statement::Command(command) => {
                    let report = self.service.group_report(self.group)?;
                    sections.push(self.render(*command, &report));
                }
            }
        }

        let final_report = self.service.group_report(self.group)?;
        if !program.has_commands() {
            sections.push(self.presenter.render_full(&final_report));
        } else if !final_report.is_healthy() {
            sections.push(self.presenter.render_integrity(&final_report));
        }

        Ok(ScriptOutcome {
            sections,
            final_report,
        })
    }

    fn declare(&mut self, names: &[&'s str], line: usize) -> Result<(), ScriptError> {
        for &name in names {
            if self.participants.contains_key(name) {
                return Err(ScriptError::DuplicateParticipant {
                    name: name.to_string(),
                    line,
                });
            }
            let participant = self
                .service
                .add_participant(self.group, name, None)
                .map_err(|source| ScriptError::Statement { line, source })?;
            self.participants.insert(name, participant.id);
        }
        Ok(())
    }

    fn record(&self, expense: &ExpenseLine<'s>, line: usize) -> Result<(), ScriptError> {
        let payer = self.resolve(expense.payer, line)?;
        let rule = match &expense.shares {
            ShareList::Equal(names) => SplitRule::Equal(
                names
                    .iter()
                    .map(|name| self.resolve(name, line))
                    .collect::<Result<_, _>>()?,
            ),
            ShareList::Custom(shares) => SplitRule::Custom(self.resolve_values(shares, line)?),
            ShareList::Percentage(shares) => {
                SplitRule::Percentage(self.resolve_values(shares, line)?)
            }
        };

        let category = expense
            .category
            .map(ExpenseCategory::from_id)
            .unwrap_or_default();
        if let Some(id) = expense.category
            && !category.id().eq_ignore_ascii_case(id)
        {
            tracing::debug!(line, category = id, "Unknown category; using Other");
        }

        let draft = ExpenseDraft {
            description: expense.description.unwrap_or_default().to_string(),
            amount: expense.amount,
            date: expense.date,
            payer,
            category,
            rule,
        };
        self.service
            .record_expense(self.group, draft)
            .map(|_| ())
            .map_err(|source| ScriptError::Statement { line, source })
    }

    fn resolve(&self, name: &str, line: usize) -> Result<ParticipantId, ScriptError> {
        self.participants
            .get(name)
            .copied()
            .ok_or_else(|| ScriptError::UndefinedParticipant {
                name: name.to_string(),
                line,
            })
    }

    fn resolve_values<V: Copy>(
        &self,
        shares: &[(&str, V)],
        line: usize,
    ) -> Result<Vec<(ParticipantId, V)>, ScriptError> {
        shares
            .iter()
            .map(|(name, value)| Ok((self.resolve(name, line)?, *value)))
            .collect()
    }

    fn render(&self, command: Command, report: &GroupReport) -> String {
        match command {
            Command::Balances => self.presenter.render_balances(report),
            Command::Settle => self.presenter.render_settlements(report),
            Command::Owed => self.presenter.render_owed(report),
            Command::Summary => self.presenter.render_summary(report),
        }
    }
}
