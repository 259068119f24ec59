mod account;
mod command;
mod ledger;
mod scheduler;
mod transaction;

pub use self::{
    command::{process, Command, CommandError, Outcome},
    ledger::{Ledger, LedgerError},
    scheduler::{InterestConfig, InterestScheduler},
    transaction::CustomerId,
};
