//! Interactive text front end over a [`Ledger`].
//!
//! Session states: logged out (top menu) -> logged in (session menu) -> back
//! to logged out on log out or account closure, or terminated on exit.

use std::io::{BufRead, Write};

use rand::Rng;

use crate::ledger::{Amount, CardNumber, Error, Ledger, LedgerError};

const MAIN_MENU: &str = "1. Create an account\n2. Log into account\n0. Exit\n";
const SESSION_MENU: &str =
    "1. Balance\n2. Add income\n3. Do transfer\n4. Close account\n5. Log out\n0. Exit\n";

/// What the session menu does after handling one choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Stay,
    LoggedOut,
    Exit,
}

/// Menu-driven session over a ledger.
///
/// Generic over its input, output and random source so it can be driven by
/// in-memory buffers and a seeded generator.
pub struct Atm<R, W, G> {
    ledger: Ledger,
    input: R,
    output: W,
    rng: G,
}

impl<R: BufRead, W: Write, G: Rng> Atm<R, W, G> {
    pub fn new(ledger: Ledger, input: R, output: W, rng: G) -> Self {
        Self {
            ledger,
            input,
            output,
            rng,
        }
    }

    /// Runs the top-level menu until the card holder exits or input ends.
    pub fn run(&mut self) -> Result<(), Error> {
        log::info!("Session started");
        loop {
            let Some(choice) = self.prompt(MAIN_MENU)? else {
                break;
            };
            match choice.as_str() {
                "0" => break,
                "1" => self.create_account()?,
                "2" => {
                    if self.log_in()? == Step::Exit {
                        break;
                    }
                }
                other => log::debug!("Ignoring main menu choice {other:?}"),
            }
        }

        writeln!(self.output, "\nBye!")?;
        self.output.flush()?;
        log::info!("Session ended");
        Ok(())
    }

    /// Gives back the ledger and the output sink
    pub fn into_parts(self) -> (Ledger, W) {
        (self.ledger, self.output)
    }

    fn create_account(&mut self) -> Result<(), Error> {
        match self.ledger.create_account(&mut self.rng) {
            Ok(card) => writeln!(self.output, "\nYour card has been created\n{card}\n")?,
            Err(e) => {
                self.report(e)?;
            }
        }
        Ok(())
    }

    fn log_in(&mut self) -> Result<Step, Error> {
        if self.ledger.account_count()? == 0 {
            writeln!(self.output, "\nNo cards exist!\n")?;
            return Ok(Step::Stay);
        }

        let Some(number) = self.prompt("\nEnter your card number:\n")? else {
            return Ok(Step::Exit);
        };
        let Some(pin) = self.prompt("Enter your PIN:\n")? else {
            return Ok(Step::Exit);
        };

        match self.ledger.login(&number, &pin) {
            Ok(account) => {
                writeln!(self.output, "\nYou have successfully logged in!\n")?;
                self.session(account.number().clone())
            }
            Err(e) => self.report(e),
        }
    }

    /// The logged-in menu. Returns `Step::LoggedOut` or `Step::Exit`.
    fn session(&mut self, number: CardNumber) -> Result<Step, Error> {
        loop {
            let Some(choice) = self.prompt(SESSION_MENU)? else {
                return Ok(Step::Exit);
            };
            let step = match choice.as_str() {
                "1" => self.show_balance(&number)?,
                "2" => self.add_income(&number)?,
                "3" => self.do_transfer(&number)?,
                "4" => self.close_account(&number)?,
                "5" => {
                    writeln!(self.output, "\nYou have successfully logged out!\n")?;
                    log::info!("[logout] number={number}");
                    Step::LoggedOut
                }
                "0" => Step::Exit,
                other => {
                    log::debug!("Ignoring session menu choice {other:?}");
                    Step::Stay
                }
            };
            if step != Step::Stay {
                return Ok(step);
            }
        }
    }

    fn show_balance(&mut self, number: &CardNumber) -> Result<Step, Error> {
        match self.ledger.balance(number) {
            Ok(balance) => {
                writeln!(self.output, "\nBalance : {balance}\n")?;
                Ok(Step::Stay)
            }
            Err(e) => self.report(e),
        }
    }

    fn add_income(&mut self, number: &CardNumber) -> Result<Step, Error> {
        let Some(input) = self.prompt("\nEnter income:\n")? else {
            return Ok(Step::Exit);
        };

        // Parse before touching the store: a rejected amount never mutates the balance
        let result = input
            .parse::<Amount>()
            .and_then(|amount| self.ledger.deposit(number, amount));
        match result {
            Ok(()) => {
                writeln!(self.output, "Income was added!\n")?;
                Ok(Step::Stay)
            }
            Err(e) => self.report(e),
        }
    }

    fn do_transfer(&mut self, sender: &CardNumber) -> Result<Step, Error> {
        let Some(input) = self.prompt("\nTransfer\nEnter card number:\n")? else {
            return Ok(Step::Exit);
        };
        let receiver = match self.ledger.resolve_receiver(&input) {
            Ok(receiver) => receiver,
            Err(e) => return self.report(e),
        };

        let Some(input) = self.prompt("Enter transfer amount:\n")? else {
            return Ok(Step::Exit);
        };
        let result = input
            .parse::<Amount>()
            .and_then(|amount| self.ledger.transfer(sender, &receiver, amount));
        match result {
            Ok(()) => {
                writeln!(self.output, "Success!\n")?;
                Ok(Step::Stay)
            }
            Err(e) => self.report(e),
        }
    }

    fn close_account(&mut self, number: &CardNumber) -> Result<Step, Error> {
        match self.ledger.close_account(number) {
            Ok(()) => {
                writeln!(self.output, "\nYour account has been deleted!\n")?;
                Ok(Step::LoggedOut)
            }
            Err(e) => self.report(e),
        }
    }

    /// Shows a rejected operation to the card holder; the session carries on.
    fn report(&mut self, e: LedgerError) -> Result<Step, Error> {
        log::warn!("Rejected: {e:?}");
        writeln!(self.output, "\n{e}\n")?;
        Ok(Step::Stay)
    }

    /// Writes `text` and reads one trimmed line. `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, Error> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            log::debug!("Input exhausted");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn run(script: &str) -> String {
        let ledger = Ledger::in_memory().unwrap();
        let mut atm = Atm::new(
            ledger,
            Cursor::new(script.to_string()),
            Vec::new(),
            StdRng::seed_from_u64(9),
        );
        atm.run().unwrap();
        let (_, output) = atm.into_parts();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_says_bye() {
        let output = run("0\n");
        assert!(output.starts_with(MAIN_MENU));
        assert!(output.ends_with("\nBye!\n"));
    }

    #[test]
    fn test_end_of_input_exits() {
        assert!(run("").ends_with("\nBye!\n"));
    }

    #[test]
    fn test_login_with_empty_ledger() {
        let output = run("2\n0\n");
        assert!(output.contains("No cards exist!"));
        assert!(!output.contains("Enter your card number:"));
    }

    #[test]
    fn test_unknown_choice_redisplays_menu() {
        let output = run("7\n0\n");
        assert_eq!(output.matches(MAIN_MENU).count(), 2);
    }

    #[test]
    fn test_create_account_prints_credentials() {
        let output = run("1\n0\n");
        assert!(output.contains("Your card has been created\nYour card number:\n400000"));
        assert!(output.contains("Your card PIN:\n"));
    }
}
