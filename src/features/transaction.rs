use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash)]
#[serde(transparent)]
pub struct CustomerId(u32);

impl CustomerId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Funds credited by the customer
    Deposit,

    /// Funds debited by the customer. Never takes the balance below zero
    Withdrawal,

    /// Periodic credit on savings accounts
    Interest,
}

/// One completed mutation of an account, in the order it was applied
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    amount: Decimal,
    description: String,
}

impl Record {
    pub(crate) fn deposit(amount: Decimal) -> Self {
        Self {
            kind: RecordKind::Deposit,
            amount,
            description: format!("Deposited: Rs{amount}"),
        }
    }

    pub(crate) fn withdrawal(amount: Decimal) -> Self {
        Self {
            kind: RecordKind::Withdrawal,
            amount,
            description: format!("Withdrew: Rs{amount}"),
        }
    }

    /// The description shows two decimals; `amount` keeps full precision.
    pub(crate) fn interest(amount: Decimal) -> Self {
        Self {
            kind: RecordKind::Interest,
            amount,
            description: format!("Interest applied: Rs{:.2}", amount.round_dp(2)),
        }
    }

    /// Get the record's kind.
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Get the record's amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Get the record's description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(Record::deposit(dec!(100)), "Deposited: Rs100" ; "deposit")]
    #[test_case(Record::withdrawal(dec!(49.5)), "Withdrew: Rs49.5" ; "withdrawal")]
    #[test_case(Record::interest(dec!(52.5)), "Interest applied: Rs52.50" ; "interest pads to cents")]
    #[test_case(Record::interest(dec!(0.12345)), "Interest applied: Rs0.12" ; "interest rounds to cents")]
    fn describes_record(record: Record, expected: &str) {
        assert_eq!(record.to_string(), expected);
    }

    #[test]
    fn interest_amount_keeps_precision() {
        let record = Record::interest(dec!(0.12345));
        assert_eq!(record.amount(), dec!(0.12345));
        assert_eq!(record.kind(), RecordKind::Interest);
    }
}
