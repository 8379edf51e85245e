#![warn(clippy::uninlined_format_args)]

use chrono::NaiveDate;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while1, take_while_m_n},
    character::complete::{char, digit1, multispace1},
    combinator::{map_res, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded},
};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Who shares an expense, and how.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareList<'a> {
    Equal(Vec<&'a str>),
    Custom(Vec<(&'a str, Decimal)>),
    Percentage(Vec<(&'a str, Decimal)>),
}

impl<'a> ShareList<'a> {
    pub fn names(&self) -> Vec<&'a str> {
        match self {
            Self::Equal(names) => names.clone(),
            Self::Custom(shares) | Self::Percentage(shares) => {
                shares.iter().map(|(name, _)| *name).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseLine<'a> {
    pub payer: &'a str,
    pub amount: Decimal,
    pub shares: ShareList<'a>,
    pub date: NaiveDate,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Balances,
    Settle,
    Owed,
    Summary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Participants(Vec<&'a str>),
    Expense(ExpenseLine<'a>),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatementWithLine<'a> {
    pub line: usize,
    pub statement: Statement<'a>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program<'a> {
    pub statements: Vec<StatementWithLine<'a>>,
}

impl Program<'_> {
    pub fn has_commands(&self) -> bool {
        self.statements
            .iter()
            .any(|stmt| matches!(stmt.statement, Statement::Command(_)))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("Share list at line {line} mixes plain names, amounts and percentages.")]
    MixedShares { line: usize },
    #[error("Invalid date '{value}' at line {line}.")]
    InvalidDate { line: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Share<'a> {
    Plain(&'a str),
    Amount(&'a str, Decimal),
    Percent(&'a str, Decimal),
}

/// Expense line as written, before share kinds and the date are checked.
#[derive(Debug, Clone, PartialEq)]
struct RawExpense<'a> {
    payer: &'a str,
    amount: Decimal,
    shares: Vec<Share<'a>>,
    date: Option<&'a str>,
    category: Option<&'a str>,
    description: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
enum RawStatement<'a> {
    Participants(Vec<&'a str>),
    Expense(RawExpense<'a>),
    Command(Command),
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, comment, line_comment)))).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_' || c == '-').parse(input)
}

fn decimal(input: &str) -> IResult<&str, Decimal> {
    map_res(
        recognize((opt(char('-')), digit1, opt((char('.'), digit1)))),
        Decimal::from_str,
    )
    .parse(input)
}

fn money(input: &str) -> IResult<&str, Decimal> {
    preceded(opt(char('$')), decimal).parse(input)
}

// participants := alice bob, carol
fn participants(input: &str) -> IResult<&str, Vec<&str>> {
    (
        tag_no_case("participants"),
        sp,
        tag(":="),
        sp,
        separated_list1(
            alt((recognize((sp, char(','), sp)), multispace1)),
            identifier,
        ),
    )
        .map(|(_, _, _, _, names)| names)
        .parse(input)
}

fn share(input: &str) -> IResult<&str, Share<'_>> {
    (
        identifier,
        opt((sp, char('='), sp, money, opt(char('%')))),
    )
        .map(|(name, value)| match value {
            None => Share::Plain(name),
            Some((_, _, _, amount, None)) => Share::Amount(name, amount),
            Some((_, _, _, amount, Some(_))) => Share::Percent(name, amount),
        })
        .parse(input)
}

fn shares(input: &str) -> IResult<&str, Vec<Share<'_>>> {
    separated_list1((sp, char(','), sp), share).parse(input)
}

fn iso_date(input: &str) -> IResult<&str, &str> {
    let digits = |count| take_while_m_n(count, count, |c: char| c.is_ascii_digit());
    recognize((digits(4), char('-'), digits(2), char('-'), digits(2))).parse(input)
}

fn category(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), identifier).parse(input)
}

fn description(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c| c == '"'), char('"')).parse(input)
}

// {payer} paid {amount} for {shares} [on {date}] [#{category}] ["{description}"]
fn expense(input: &str) -> IResult<&str, RawExpense<'_>> {
    (
        identifier,
        sp,
        tag_no_case("paid"),
        sp,
        money,
        sp,
        tag_no_case("for"),
        sp,
        shares,
        opt(preceded((sp, tag_no_case("on"), sp), iso_date)),
        opt(preceded(sp, category)),
        opt(preceded(sp, description)),
    )
        .map(
            |(payer, _, _, _, amount, _, _, _, shares, date, category, description)| RawExpense {
                payer,
                amount,
                shares,
                date,
                category,
                description,
            },
        )
        .parse(input)
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        tag_no_case("!balances").map(|_| Command::Balances),
        tag_no_case("!settle").map(|_| Command::Settle),
        tag_no_case("!owed").map(|_| Command::Owed),
        tag_no_case("!summary").map(|_| Command::Summary),
    ))
    .parse(input)
}

fn statement(input: &str) -> IResult<&str, RawStatement<'_>> {
    alt((
        participants.map(RawStatement::Participants),
        command.map(RawStatement::Command),
        expense.map(RawStatement::Expense),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, RawStatement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

fn classify_shares<'a>(shares: &[Share<'a>], line: usize) -> Result<ShareList<'a>, ParseError> {
    match shares.first() {
        Some(Share::Amount(..)) => shares
            .iter()
            .map(|share| match share {
                Share::Amount(name, amount) => Some((*name, *amount)),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(ShareList::Custom),
        Some(Share::Percent(..)) => shares
            .iter()
            .map(|share| match share {
                Share::Percent(name, percent) => Some((*name, *percent)),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(ShareList::Percentage),
        _ => shares
            .iter()
            .map(|share| match share {
                Share::Plain(name) => Some(*name),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(ShareList::Equal),
    }
    .ok_or(ParseError::MixedShares { line })
}

fn finish_statement(raw: RawStatement<'_>, line: usize) -> Result<Statement<'_>, ParseError> {
    let expense = match raw {
        RawStatement::Participants(names) => return Ok(Statement::Participants(names)),
        RawStatement::Command(command) => return Ok(Statement::Command(command)),
        RawStatement::Expense(expense) => expense,
    };

    let shares = classify_shares(&expense.shares, line)?;
    let date = match expense.date {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            ParseError::InvalidDate {
                line,
                value: value.to_string(),
            }
        })?,
        // 1970-01-01
        None => NaiveDate::default(),
    };

    Ok(Statement::Expense(ExpenseLine {
        payer: expense.payer,
        amount: expense.amount,
        shares,
        date,
        category: expense.category,
        description: expense.description,
    }))
}

// Parse the entire ledger script, one statement per line
pub fn parse_program(input: &str) -> Result<Program<'_>, ParseError> {
    let mut statements = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: idx + 1,
            detail: e.to_string(),
        })?;
        if rest.trim().is_empty() {
            continue;
        }
        match statement_with_sp(rest) {
            Ok((rest, raw)) => {
                if !rest.trim().is_empty() {
                    return Err(ParseError::SyntaxError {
                        line: idx + 1,
                        detail: format!("Unparsed input: {}", rest.trim()),
                    });
                }
                statements.push(StatementWithLine {
                    line: idx + 1,
                    statement: finish_statement(raw, idx + 1)?,
                });
            }
            Err(e) => {
                return Err(ParseError::SyntaxError {
                    line: idx + 1,
                    detail: e.to_string(),
                });
            }
        }
    }

    Ok(Program { statements })
}
