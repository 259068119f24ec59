use crate::features::{process, Command, CommandError, CustomerId, Ledger, LedgerError, Outcome};
use rust_decimal::prelude::*;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const MENU: &str = "
--- Banking System ---
1. Deposit
2. Withdraw
3. View Transaction History
4. View Account Balance
5. Exit";

#[derive(Error, Debug)]
enum ConsoleError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("{0:?} is not a valid {1}")]
    Input(String, &'static str),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Amount typed at the prompt. Plain decimals and scientific notation
/// (`1e3`, `2.5E2`) are both accepted.
struct Amount(Decimal);

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map(Amount)
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Interactive menu reading commands from `input` and writing replies to
/// `output`, one command at a time.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Run until the user picks Exit or input runs out.
    pub fn run(&mut self, ledger: &Ledger) -> io::Result<()> {
        loop {
            writeln!(self.output, "{MENU}")?;
            match self.step(ledger) {
                Ok(Flow::Continue) => continue,
                Ok(Flow::Exit) => break,
                Err(ConsoleError::Io(e)) => return Err(e),
                Err(ConsoleError::Command(CommandError::Ledger(LedgerError::AccountNotFound(
                    customer_id,
                )))) => {
                    debug!("Lookup of unknown customer {customer_id}");
                    writeln!(self.output, "Invalid Customer ID.")?;
                }
                Err(e) => writeln!(self.output, "Error: {e}")?,
            }
        }

        writeln!(self.output, "Exiting banking system. Goodbye!")?;
        self.output.flush()
    }

    fn step(&mut self, ledger: &Ledger) -> Result<Flow, ConsoleError> {
        let choice: u8 = match self.prompt("Enter your choice: ", "choice")? {
            Some(choice) => choice,
            None => return Ok(Flow::Exit),
        };
        if choice == 5 {
            return self.dispatch(ledger, Command::Exit);
        }

        let customer_id = match self.prompt("Enter Customer ID: ", "customer id")? {
            Some(id) => CustomerId::new(id),
            None => return Ok(Flow::Exit),
        };
        // Unknown ids are turned away before any amount is asked for
        ledger.lookup(customer_id).map_err(CommandError::from)?;

        let command = match choice {
            1 | 2 => {
                let label = if choice == 1 {
                    "Enter deposit amount: Rs"
                } else {
                    "Enter withdrawal amount: Rs"
                };
                let amount = match self.prompt(label, "amount")? {
                    Some(Amount(amount)) => amount,
                    None => return Ok(Flow::Exit),
                };
                if choice == 1 {
                    Command::Deposit {
                        customer_id,
                        amount,
                    }
                } else {
                    Command::Withdraw {
                        customer_id,
                        amount,
                    }
                }
            }
            3 => Command::ViewHistory { customer_id },
            4 => Command::ViewBalance { customer_id },
            _ => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                return Ok(Flow::Continue);
            }
        };

        self.dispatch(ledger, command)
    }

    fn dispatch(&mut self, ledger: &Ledger, command: Command) -> Result<Flow, ConsoleError> {
        match process(ledger, command)? {
            Outcome::Deposited(balance) => {
                info!("Deposit accepted, balance {balance}");
                writeln!(self.output, "Deposit successful.")?;
            }
            Outcome::Withdrew(balance) => {
                info!("Withdrawal accepted, balance {balance}");
                writeln!(self.output, "Withdrawal successful.")?;
            }
            Outcome::History(records) => {
                writeln!(self.output, "Transaction History:")?;
                for record in records {
                    writeln!(self.output, "{record}")?;
                }
            }
            Outcome::Balance(balance) => {
                writeln!(self.output, "Account Balance: Rs{:.2}", balance.round_dp(2))?;
            }
            Outcome::Exit => return Ok(Flow::Exit),
        }

        Ok(Flow::Continue)
    }

    /// Ask for one value. `None` means the input is exhausted.
    fn prompt<T: FromStr>(
        &mut self,
        label: &str,
        what: &'static str,
    ) -> Result<Option<T>, ConsoleError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        line.parse()
            .map(Some)
            .map_err(|_| ConsoleError::Input(line.to_string(), what))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
CustomerID,Name,AccountBalance
1,Asha,1000
2,Ben,200
";

    fn run(ledger: &Ledger, script: &str) -> String {
        let mut output = Vec::new();
        Console::new(script.as_bytes(), &mut output)
            .run(ledger)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    fn ledger() -> Ledger {
        Ledger::from_csv(DATA.as_bytes()).unwrap()
    }

    #[test]
    fn deposit_withdraw_and_show() {
        let ledger = ledger();
        let output = run(&ledger, "1\n2\n100\n2\n2\n50\n4\n2\n3\n2\n5\n");

        assert!(output.contains("Deposit successful."));
        assert!(output.contains("Withdrawal successful."));
        assert!(output.contains("Account Balance: Rs250.00"));
        assert!(output.contains("Transaction History:\nDeposited: Rs100\nWithdrew: Rs50\n"));
        assert!(output.ends_with("Exiting banking system. Goodbye!\n"));
    }

    #[test]
    fn errors_keep_the_session_alive() {
        let ledger = ledger();
        let output = run(&ledger, "4\n9\n2\n1\n5000\n1\n1\n-5\nabc\n7\n1\n1\n1\nten\n4\n1\n5\n");

        assert!(output.contains("Invalid Customer ID."));
        assert!(output.contains("Error: You cannot withdraw 5000."));
        assert!(output.contains("Error: Amount must be positive, got -5"));
        assert!(output.contains("Error: \"abc\" is not a valid choice"));
        assert!(output.contains("Invalid choice. Please try again."));
        assert!(output.contains("Error: \"ten\" is not a valid amount"));
        assert!(output.contains("Account Balance: Rs1000.00"));

        let account = ledger.lookup(CustomerId::new(1)).unwrap();
        assert!(account.history().is_empty());
    }

    #[test]
    fn customer_id_is_checked_before_anything_else() {
        let ledger = ledger();
        let output = run(&ledger, "1\n42\n7\n42\n7\n2\n5\n");

        assert_eq!(output.matches("Invalid Customer ID.").count(), 2);
        assert!(!output.contains("Enter deposit amount"));
        assert_eq!(output.matches("Invalid choice. Please try again.").count(), 1);
    }

    #[test]
    fn amount_accepts_scientific_notation() {
        let ledger = ledger();
        let output = run(&ledger, "1\n1\n1e3\n2\n1\n2.5E2\n4\n1\n5\n");

        assert!(output.contains("Account Balance: Rs1750.00"));
    }

    #[test]
    fn oversized_deposit_is_reported() {
        let ledger = ledger();
        let output = run(&ledger, "1\n1\n79228162514264337593543950335\n4\n1\n5\n");

        assert!(output.contains("exceeds what the account can hold"));
        assert!(output.contains("Account Balance: Rs1000.00"));
        assert!(ledger.lookup(CustomerId::new(1)).unwrap().history().is_empty());
    }

    #[test]
    fn end_of_input_exits() {
        let ledger = ledger();
        let output = run(&ledger, "1\n1\n");

        assert!(output.ends_with("Exiting banking system. Goodbye!\n"));
        assert_eq!(ledger.lookup(CustomerId::new(1)).unwrap().balance(), Decimal::new(1000, 0));
    }
}
