use super::transaction::{CustomerId, Record, RecordKind};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error(
        "You cannot withdraw {requested}. It is more than {available} available in your account"
    )]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Adding {amount} to a balance of {balance} exceeds what the account can hold")]
    BalanceOverflow { balance: Decimal, amount: Decimal },
}

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Accrues interest on every scheduler tick
    #[default]
    Savings,
    Other,
}

/// Balance and history change together, so they live behind one lock.
#[derive(Debug)]
struct Holdings {
    balance: Decimal,
    history: Vec<Record>,
}

/// Customer Account
///
/// Every operation takes the account's own lock, so deposits, withdrawals and
/// interest on the same account are applied one at a time while different
/// accounts never contend with each other.
#[derive(Debug)]
pub struct Account {
    id: CustomerId,
    name: String,
    account_type: AccountType,
    holdings: Mutex<Holdings>,
}

/// Point-in-time view of an account, used for export
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub id: CustomerId,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(serialize_with = "round_serialize")]
    pub balance: Decimal,
    #[serde(rename = "interest", serialize_with = "round_serialize")]
    pub interest_earned: Decimal,
    pub records: usize,
}

fn round_serialize<S>(amount: &Decimal, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Serialize to 2 decimal
    let rounded_amount = format!("{:.2}", amount.round_dp(2));
    s.serialize_str(rounded_amount.as_str())
}

fn credit(balance: Decimal, amount: Decimal) -> AccountResult<Decimal> {
    balance
        .checked_add(amount)
        .ok_or(AccountError::BalanceOverflow { balance, amount })
}

fn ensure_positive(amount: Decimal) -> AccountResult<()> {
    if amount <= dec!(0) {
        return Err(AccountError::InvalidAmount(amount));
    }
    Ok(())
}

impl Account {
    pub(crate) fn new(
        id: CustomerId,
        name: impl Into<String>,
        balance: Decimal,
        account_type: AccountType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            account_type,
            holdings: Mutex::new(Holdings {
                balance,
                history: Vec::new(),
            }),
        }
    }

    // Holdings are only written after validation passes, so a panic elsewhere
    // can't leave them half-updated.
    fn holdings(&self) -> MutexGuard<'_, Holdings> {
        self.holdings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Credit `amount` and return the new balance.
    pub fn deposit(&self, amount: Decimal) -> AccountResult<Decimal> {
        ensure_positive(amount)?;

        let mut holdings = self.holdings();
        holdings.balance = credit(holdings.balance, amount)?;
        holdings.history.push(Record::deposit(amount));
        Ok(holdings.balance)
    }

    /// Debit `amount` and return the new balance. The check against the
    /// balance happens under the same lock as the debit.
    pub fn withdraw(&self, amount: Decimal) -> AccountResult<Decimal> {
        ensure_positive(amount)?;

        let mut holdings = self.holdings();
        if holdings.balance < amount {
            return Err(AccountError::InsufficientFunds {
                requested: amount,
                available: holdings.balance,
            });
        }
        holdings.balance -= amount;
        holdings.history.push(Record::withdrawal(amount));
        Ok(holdings.balance)
    }

    /// Credit `rate_percent` of the current balance on savings accounts.
    /// Returns the interest credited, or `None` when the account does not
    /// accrue interest. A credit the balance cannot hold leaves the account
    /// untouched.
    pub fn apply_interest(&self, rate_percent: Decimal) -> AccountResult<Option<Decimal>> {
        if self.account_type != AccountType::Savings {
            return Ok(None);
        }

        let mut holdings = self.holdings();
        let interest = (rate_percent / dec!(100))
            .checked_mul(holdings.balance)
            .ok_or(AccountError::BalanceOverflow {
                balance: holdings.balance,
                amount: rate_percent,
            })?;
        holdings.balance = credit(holdings.balance, interest)?;
        holdings.history.push(Record::interest(interest));
        Ok(Some(interest))
    }

    pub fn balance(&self) -> Decimal {
        self.holdings().balance
    }

    /// Copy of the history as of the moment the lock was taken
    pub fn history(&self) -> Vec<Record> {
        self.holdings().history.clone()
    }

    pub fn snapshot(&self) -> AccountSnapshot {
        let holdings = self.holdings();
        let interest_earned = holdings
            .history
            .iter()
            .filter(|record| record.kind() == RecordKind::Interest)
            .map(Record::amount)
            .sum();

        AccountSnapshot {
            id: self.id(),
            name: self.name().to_string(),
            account_type: self.account_type(),
            balance: holdings.balance,
            interest_earned,
            records: holdings.history.len(),
        }
    }
}
