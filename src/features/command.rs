use super::{
    account::AccountError,
    ledger::{Ledger, LedgerError},
    transaction::{CustomerId, Record},
};
use rust_decimal::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Deposit {
        customer_id: CustomerId,
        amount: Decimal,
    },
    Withdraw {
        customer_id: CustomerId,
        amount: Decimal,
    },
    ViewHistory {
        customer_id: CustomerId,
    },
    ViewBalance {
        customer_id: CustomerId,
    },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// New balance after the deposit
    Deposited(Decimal),
    /// New balance after the withdrawal
    Withdrew(Decimal),
    History(Vec<Record>),
    Balance(Decimal),
    Exit,
}

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Run one command against the ledger. Errors leave every account untouched.
pub fn process(ledger: &Ledger, command: Command) -> CommandResult<Outcome> {
    use Command::*;

    let outcome = match command {
        Deposit {
            customer_id,
            amount,
        } => Outcome::Deposited(ledger.lookup(customer_id)?.deposit(amount)?),
        Withdraw {
            customer_id,
            amount,
        } => Outcome::Withdrew(ledger.lookup(customer_id)?.withdraw(amount)?),
        ViewHistory { customer_id } => Outcome::History(ledger.lookup(customer_id)?.history()),
        ViewBalance { customer_id } => Outcome::Balance(ledger.lookup(customer_id)?.balance()),
        Exit => Outcome::Exit,
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{account::AccountType, ledger::AccountRecord};
    use rust_decimal_macros::dec;

    const ASHA: CustomerId = CustomerId::new(1);
    const NOBODY: CustomerId = CustomerId::new(42);

    fn ledger() -> Ledger {
        Ledger::from_records([AccountRecord {
            customer_id: ASHA,
            name: "Asha".to_string(),
            balance: "200".to_string(),
            account_type: AccountType::Savings,
        }])
        .unwrap()
    }

    #[test]
    fn deposit_then_withdraw() {
        let ledger = ledger();

        let outcome = process(&ledger, Command::Deposit { customer_id: ASHA, amount: dec!(100) });
        assert_eq!(outcome.unwrap(), Outcome::Deposited(dec!(300)));

        let outcome = process(&ledger, Command::Withdraw { customer_id: ASHA, amount: dec!(50) });
        assert_eq!(outcome.unwrap(), Outcome::Withdrew(dec!(250)));

        let outcome = process(&ledger, Command::ViewBalance { customer_id: ASHA });
        assert_eq!(outcome.unwrap(), Outcome::Balance(dec!(250)));

        match process(&ledger, Command::ViewHistory { customer_id: ASHA }).unwrap() {
            Outcome::History(records) => {
                let lines: Vec<_> = records.iter().map(Record::to_string).collect();
                assert_eq!(lines, ["Deposited: Rs100", "Withdrew: Rs50"]);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn unknown_customer_is_reported() {
        let ledger = ledger();

        for command in [
            Command::Deposit { customer_id: NOBODY, amount: dec!(1) },
            Command::Withdraw { customer_id: NOBODY, amount: dec!(1) },
            Command::ViewHistory { customer_id: NOBODY },
            Command::ViewBalance { customer_id: NOBODY },
        ] {
            assert!(matches!(
                process(&ledger, command),
                Err(CommandError::Ledger(LedgerError::AccountNotFound(id))) if id == NOBODY
            ));
        }
    }

    #[test]
    fn failed_withdrawal_keeps_state() {
        let ledger = ledger();

        let err = process(&ledger, Command::Withdraw { customer_id: ASHA, amount: dec!(201) })
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Account(AccountError::InsufficientFunds { .. })
        ));
        assert_eq!(
            err.to_string(),
            "You cannot withdraw 201. It is more than 200 available in your account"
        );

        let err = process(&ledger, Command::Deposit { customer_id: ASHA, amount: dec!(0) })
            .unwrap_err();
        assert!(matches!(err, CommandError::Account(AccountError::InvalidAmount(_))));

        let account = ledger.lookup(ASHA).unwrap();
        assert_eq!(account.balance(), dec!(200));
        assert!(account.history().is_empty());
    }

    #[test]
    fn exit_touches_nothing() {
        let ledger = ledger();
        assert_eq!(process(&ledger, Command::Exit).unwrap(), Outcome::Exit);
    }
}
