use super::{
    account::{Account, AccountSnapshot, AccountType},
    transaction::CustomerId,
};
use rust_decimal::prelude::*;
use serde::Deserialize;
use std::collections::{btree_map::Entry, BTreeMap};
use std::io::Read;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Account {0} not found")]
    AccountNotFound(CustomerId),

    #[error("Duplicate customer id {0}")]
    DuplicateId(CustomerId),

    #[error("Invalid record for customer {customer_id}: {reason}")]
    InvalidRecord {
        customer_id: CustomerId,
        reason: String,
    },

    #[error("Malformed customer data - {0}")]
    Csv(#[from] csv::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// One row of customer data, as supplied at load time
#[derive(Deserialize, Debug, Clone)]
pub struct AccountRecord {
    #[serde(rename = "CustomerID")]
    pub customer_id: CustomerId,

    #[serde(rename = "Name")]
    pub name: String,

    /// Kept as text until the ledger validates it
    #[serde(rename = "AccountBalance")]
    pub balance: String,

    /// Customer data carries no type column, so every loaded account is savings
    #[serde(rename = "AccountType", default)]
    pub account_type: AccountType,
}

impl AccountRecord {
    fn parse_balance(&self) -> LedgerResult<Decimal> {
        let invalid = |reason: String| LedgerError::InvalidRecord {
            customer_id: self.customer_id,
            reason,
        };

        let balance = Decimal::from_str(self.balance.trim())
            .map_err(|e| invalid(format!("balance {:?} is not a number ({e})", self.balance)))?;
        if balance.is_sign_negative() && !balance.is_zero() {
            return Err(invalid(format!("balance {balance} is negative")));
        }
        Ok(balance)
    }
}

/// Every customer account, keyed by customer id.
///
/// The key set is fixed once the ledger is built. Accounts lock themselves,
/// so the ledger can be shared behind an `Arc` without a lock of its own.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: BTreeMap<CustomerId, Account>,
}

impl Ledger {
    pub fn from_records<I>(records: I) -> LedgerResult<Self>
    where
        I: IntoIterator<Item = AccountRecord>,
    {
        let mut accounts = BTreeMap::new();

        for record in records {
            let balance = record.parse_balance()?;
            match accounts.entry(record.customer_id) {
                Entry::Occupied(_) => return Err(LedgerError::DuplicateId(record.customer_id)),
                Entry::Vacant(slot) => {
                    slot.insert(Account::new(
                        record.customer_id,
                        record.name,
                        balance,
                        record.account_type,
                    ));
                }
            }
        }

        Ok(Self { accounts })
    }

    /// Build a ledger from `CustomerID,Name,AccountBalance` rows.
    pub fn from_csv<R: Read>(reader: R) -> LedgerResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b',')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let records = rdr
            .deserialize()
            .collect::<Result<Vec<AccountRecord>, csv::Error>>()?;

        Self::from_records(records)
    }

    pub fn lookup(&self, customer_id: CustomerId) -> LedgerResult<&Account> {
        self.accounts
            .get(&customer_id)
            .ok_or(LedgerError::AccountNotFound(customer_id))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts in customer id order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        self.accounts().map(Account::snapshot).collect()
    }
}
