//! Command-line front end for the JSON loan book, budget journal and
//! savings goals
//!
//! Reports loan positions as of a date, exports the book to CSV, and records
//! or reverses payments. The budget and goals commands keep the other two
//! files up to date.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use loan_ledger::calendar::parse_date;
use loan_ledger::report::{write_rows, BudgetRow, ExportRow, SnapshotRow};
use loan_ledger::{Budget, EntryKind, GoalBook, LedgerConfig, LoanBook, NewEntry};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ledger", about = "Track installment loans, late fees and payments")]
struct Cli {
    /// Loan book (JSON array of loans)
    #[arg(long, global = true, default_value = "loans.json")]
    book: PathBuf,

    /// Optional JSON configuration (penalty policy, due-soon window)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Budget journal (JSON array of income and expense entries)
    #[arg(long, global = true, default_value = "budget.json")]
    budget: PathBuf,

    /// Savings goals (JSON array)
    #[arg(long, global = true, default_value = "goals.json")]
    goals: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write every loan's position as of a date to CSV
    Report {
        /// Reporting date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,
        #[arg(long, default_value = "ledger_report.csv")]
        output: PathBuf,
    },
    /// Export the book as flat CSV rows
    Export {
        #[arg(long, default_value = "ledger_export.csv")]
        output: PathBuf,
    },
    /// Record a payment against a loan
    Pay {
        #[arg(long)]
        loan: u64,
        #[arg(long)]
        amount: i64,
        /// Payment date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_as_of)]
        as_of: Option<NaiveDate>,
    },
    /// Undo the most recent payment on a loan
    Reverse {
        #[arg(long)]
        loan: u64,
    },
    /// Add an income or expense entry to the budget
    Record {
        /// `income` or `expense`
        #[arg(long, value_parser = parse_entry_kind)]
        kind: EntryKind,
        #[arg(long)]
        amount: i64,
        #[arg(long)]
        description: String,
        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_as_of)]
        date: Option<NaiveDate>,
    },
    /// Print budget totals, optionally exporting the entries to CSV
    Budget {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List savings goals and their progress
    Goals,
    /// Create a savings goal
    AddGoal {
        #[arg(long)]
        name: String,
        #[arg(long)]
        target: i64,
    },
    /// Put money towards a savings goal
    Save {
        #[arg(long)]
        goal: u64,
        #[arg(long)]
        amount: i64,
    },
}

fn parse_as_of(text: &str) -> Result<NaiveDate, String> {
    parse_date(text).ok_or_else(|| format!("expected YYYY-MM-DD, got '{text}'"))
}

fn parse_entry_kind(text: &str) -> Result<EntryKind, String> {
    match text.trim().to_lowercase().as_str() {
        "income" => Ok(EntryKind::Income),
        "expense" => Ok(EntryKind::Expense),
        _ => Err(format!("expected 'income' or 'expense', got '{text}'")),
    }
}

fn open_book(path: &Path) -> Result<LoanBook> {
    LoanBook::load_json(path)
        .with_context(|| format!("Failed to load loan book from {}", path.display()))
}

fn open_budget(path: &Path) -> Result<Budget> {
    Budget::load_json(path).with_context(|| format!("Failed to load budget from {}", path.display()))
}

fn open_goals(path: &Path) -> Result<GoalBook> {
    GoalBook::load_json(path)
        .with_context(|| format!("Failed to load savings goals from {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<LedgerConfig> {
    match path {
        Some(path) => LedgerConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(LedgerConfig::default()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let today = Local::now().date_naive();

    match cli.command {
        Command::Report { as_of, output } => {
            let as_of = as_of.unwrap_or(today);
            let book = open_book(&cli.book)?;
            let rows: Vec<SnapshotRow> = book
                .loans()
                .par_iter()
                .map(|loan| SnapshotRow::build(loan, as_of, &config))
                .collect();

            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_rows(BufWriter::new(file), &rows)?;

            let totals = book.outstanding_totals();
            let overdue = rows.iter().filter(|r| r.overdue_installments > 0).count();
            let penalties: i64 = rows.iter().map(|r| r.penalty_amount).sum();

            println!("Loan book as of {}", as_of);
            println!("  Loans:        {} ({} active)", book.len(), book.active().count());
            println!("  Receivable:   {}", totals.receivable);
            println!("  Payable:      {}", totals.payable);
            println!("  Net:          {}", totals.net());
            println!("  Overdue:      {} loans, {} in late fees", overdue, penalties);
            println!("Report written to {}", output.display());
        }
        Command::Export { output } => {
            let book = open_book(&cli.book)?;
            let rows: Vec<ExportRow> = book.loans().iter().map(ExportRow::from_loan).collect();
            let file = File::create(&output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            write_rows(BufWriter::new(file), &rows)?;
            println!("Exported {} loans to {}", rows.len(), output.display());
        }
        Command::Pay { loan, amount, as_of } => {
            let as_of = as_of.unwrap_or(today);
            let mut book = open_book(&cli.book)?;
            let allocation = book
                .record_payment(loan, amount, as_of, &config.penalty)
                .with_context(|| format!("Payment of {amount} on loan {loan} was not recorded"))?;
            book.save_json(&cli.book)?;

            println!("Payment recorded on loan {} ({})", loan, as_of);
            println!("  Late fees:    {}", allocation.penalty_portion);
            println!(
                "  Installments: {} ({} overdue, {} upcoming) = {}",
                allocation.installments_covered,
                allocation.overdue_installments_covered,
                allocation.upcoming_installments_covered,
                allocation.principal_portion
            );
            println!("  Unapplied:    {}", allocation.remainder);
            if allocation.settled {
                println!("Loan {} is now settled", loan);
            }
        }
        Command::Reverse { loan } => {
            let mut book = open_book(&cli.book)?;
            let payment = book
                .reverse_last_payment(loan)
                .with_context(|| format!("Nothing reversed on loan {loan}"))?;
            book.save_json(&cli.book)?;
            println!(
                "Reversed payment of {} from {} on loan {}",
                payment.total(),
                payment.date,
                loan
            );
        }
        Command::Record { kind, amount, description, date } => {
            let mut budget = open_budget(&cli.budget)?;
            let id = budget
                .record(NewEntry { kind, amount, description, date: date.unwrap_or(today) })
                .context("Budget entry was not recorded")?;
            budget.save_json(&cli.budget)?;
            println!("Recorded {} entry {} ({})", kind.as_str(), id, amount);
        }
        Command::Budget { output } => {
            let budget = open_budget(&cli.budget)?;
            let totals = budget.totals();
            println!("Budget ({} entries)", budget.len());
            println!("  Income:       {}", totals.income);
            println!("  Expense:      {}", totals.expense);
            println!("  Balance:      {}", totals.balance());

            if let Some(output) = output {
                let rows: Vec<BudgetRow> = budget.entries().iter().map(BudgetRow::from_entry).collect();
                let file = File::create(&output)
                    .with_context(|| format!("Failed to create {}", output.display()))?;
                write_rows(BufWriter::new(file), &rows)?;
                println!("Exported {} entries to {}", rows.len(), output.display());
            }
        }
        Command::Goals => {
            let goals = open_goals(&cli.goals)?;
            for goal in goals.goals() {
                println!(
                    "  [{}] {}: {} / {} ({}%)",
                    goal.id,
                    goal.name,
                    goal.saved,
                    goal.target,
                    goal.progress_percent()
                );
            }
            let totals = goals.totals();
            println!("{} goals, {} saved of {}", goals.len(), totals.saved, totals.target);
        }
        Command::AddGoal { name, target } => {
            let mut goals = open_goals(&cli.goals)?;
            let id = goals
                .add_goal(&name, target)
                .context("Savings goal was not created")?;
            goals.save_json(&cli.goals)?;
            println!("Created goal {} ({})", id, name.trim());
        }
        Command::Save { goal, amount } => {
            let mut goals = open_goals(&cli.goals)?;
            let updated = goals
                .add_savings(goal, amount)
                .with_context(|| format!("Deposit of {amount} to goal {goal} was not recorded"))?;
            let progress = updated.progress_percent();
            goals.save_json(&cli.goals)?;
            println!("Goal {} is at {}%", goal, progress);
        }
    }

    Ok(())
}
