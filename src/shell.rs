//! Menu-driven text interface over a [`GroupStore`].
//!
//! Reads from any [`BufRead`] and writes to any [`Write`], so a session can
//! be scripted in tests. End of input ends the session.

use crate::config::Config;
use crate::core::currency::validate_amount;
use crate::core::error::LedgerError;
use crate::core::member::{parse_member_list, MemberId};
use crate::storage::group_store::GroupStore;
use rust_decimal::Decimal;
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

const MENU: &str = "\nWelcome to FairSplit
1. Create a Group
2. Add Expense to Group
3. View Group Balances
4. Settle Debts
5. Record Payment
6. Help
7. Exit";

const HELP: &str = "\nHelp - Description of Each Function:
1. Create a Group:
   - Allows you to create a new group by specifying a group name and adding members.
2. Add Expense to Group:
   - Add a new expense to a group. You specify who paid, the amount, a description, and who was involved in the expense.
3. View Group Balances:
   - Displays the current balances for each member in the specified group.
   - Positive balance means the member is owed money.
   - Negative balance means the member owes money.
4. Settle Debts:
   - Calculates and displays the minimal set of transactions required to settle all debts within the group.
5. Record Payment:
   - Record a payment made from one member to another to settle debts.
   - This updates the balances to reflect the payment.
6. Help:
   - Displays this help message explaining what each function does.
7. Exit:
   - Exits the application.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Interactive session state.
pub struct Shell<R, W> {
    store: GroupStore,
    config: Config,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(store: GroupStore, config: Config, input: R, output: W) -> Self {
        Self {
            store,
            config,
            input,
            output,
        }
    }

    /// Run the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("\nEnter your choice: ")? else {
                break;
            };
            let flow = match choice.as_str() {
                "1" => self.create_group()?,
                "2" => self.add_expense()?,
                "3" => self.view_balances()?,
                "4" => self.settle_debts()?,
                "5" => self.record_payment()?,
                "6" => {
                    self.say(HELP)?;
                    Flow::Continue
                }
                "7" => {
                    self.say("Goodbye!")?;
                    break;
                }
                _ => {
                    self.say("Invalid choice. Please try again.")?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit || self.pause()? == Flow::Exit {
                break;
            }
        }
        self.output.flush()
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn into_parts(self) -> (GroupStore, W) {
        (self.store, self.output)
    }

    fn create_group(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Enter group name: ")? else {
            return Ok(Flow::Exit);
        };
        if name.is_empty() {
            self.say(LedgerError::EmptyGroupName)?;
            return Ok(Flow::Continue);
        }
        let Some(raw) = self.prompt("Enter member names separated by commas: ")? else {
            return Ok(Flow::Exit);
        };
        let members = parse_member_list(&raw);
        let listed = join(&members);

        let message = match self.store.create_group(&name, members) {
            Ok(group) => format!("Group '{}' created with members: {}", group.name(), listed),
            Err(e) => e.to_string(),
        };
        self.say(message)?;
        Ok(Flow::Continue)
    }

    fn add_expense(&mut self) -> io::Result<Flow> {
        let Some(group) = self.prompt("Enter group name: ")? else {
            return Ok(Flow::Exit);
        };
        if let Err(e) = self.store.group(&group).map(|_| ()) {
            self.say(e)?;
            return Ok(Flow::Continue);
        }

        let Some(payer) = self.prompt("Enter the name of the person who paid: ")? else {
            return Ok(Flow::Exit);
        };
        let payer = MemberId::new(payer);
        if let Err(e) = self.check_members(&group, [&payer]) {
            self.say(e)?;
            return Ok(Flow::Continue);
        }

        let amount = match self.read_amount()? {
            Some(Some(amount)) => amount,
            Some(None) => return Ok(Flow::Continue),
            None => return Ok(Flow::Exit),
        };

        let Some(description) = self.prompt("Enter a description: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(raw) = self.prompt(
            "Enter involved members separated by commas (leave blank for all group members): ",
        )?
        else {
            return Ok(Flow::Exit);
        };
        let involved = if raw.is_empty() {
            None
        } else {
            Some(parse_member_list(&raw))
        };

        let message = match self
            .store
            .add_expense(&group, &payer, amount, &description, involved)
        {
            Ok(expense) => format!(
                "Expense '{}' added to group '{}'.",
                expense.description(),
                group
            ),
            Err(e) => e.to_string(),
        };
        self.say(message)?;
        Ok(Flow::Continue)
    }

    fn view_balances(&mut self) -> io::Result<Flow> {
        let Some(group) = self.prompt("Enter group name: ")? else {
            return Ok(Flow::Exit);
        };
        let currency = &self.config.currency;
        let lines: Vec<String> = match self.store.balances(&group) {
            Ok(balances) => std::iter::once(format!("\nBalances for group '{}':", group))
                .chain(
                    balances
                        .iter()
                        .map(|(member, b)| format!("{}: {}", member, currency.format(b))),
                )
                .collect(),
            Err(e) => vec![e.to_string()],
        };
        for line in lines {
            self.say(line)?;
        }
        Ok(Flow::Continue)
    }

    fn settle_debts(&mut self) -> io::Result<Flow> {
        let Some(group) = self.prompt("Enter group name: ")? else {
            return Ok(Flow::Exit);
        };
        let plan = match self.store.settle(&group, &self.config.planner()) {
            Ok(plan) => plan,
            Err(e) => {
                self.say(e)?;
                return Ok(Flow::Continue);
            }
        };

        if plan.is_empty() && plan.is_complete() {
            self.say("Everyone is settled up!")?;
            return Ok(Flow::Continue);
        }
        if !plan.is_empty() {
            self.say(format!("\nSettlements for group '{}':", group))?;
            for settlement in plan.settlements() {
                let line = settlement.render(&self.config.currency);
                self.say(line)?;
            }
        }
        if let Some(violation) = plan.violation() {
            self.say(format!("Warning: {}", violation))?;
        }
        Ok(Flow::Continue)
    }

    fn record_payment(&mut self) -> io::Result<Flow> {
        let Some(group) = self.prompt("Enter group name: ")? else {
            return Ok(Flow::Exit);
        };
        if let Err(e) = self.store.group(&group).map(|_| ()) {
            self.say(e)?;
            return Ok(Flow::Continue);
        }

        let Some(payer) = self.prompt("Enter the name of the person who made the payment: ")?
        else {
            return Ok(Flow::Exit);
        };
        let Some(payee) = self.prompt("Enter the name of the person who received the payment: ")?
        else {
            return Ok(Flow::Exit);
        };
        let (payer, payee) = (MemberId::new(payer), MemberId::new(payee));
        if self.check_members(&group, [&payer, &payee]).is_err() {
            self.say("Both payer and payee must be members of the group.")?;
            return Ok(Flow::Continue);
        }

        let amount = match self.read_amount()? {
            Some(Some(amount)) => amount,
            Some(None) => return Ok(Flow::Continue),
            None => return Ok(Flow::Exit),
        };

        let message = match self.store.record_payment(&group, &payer, &payee, amount) {
            Ok(payment) => format!(
                "Recorded payment of {} from {} to {} in group '{}'.",
                self.config.currency.format(payment.amount()),
                payer,
                payee,
                group
            ),
            Err(e) => e.to_string(),
        };
        self.say(message)?;
        Ok(Flow::Continue)
    }

    fn check_members<'a>(
        &self,
        group: &str,
        members: impl IntoIterator<Item = &'a MemberId>,
    ) -> Result<(), LedgerError> {
        let group = self.store.group(group)?;
        members
            .into_iter()
            .try_for_each(|member| group.require_member(member))
    }

    /// `None` on end of input, `Some(None)` after reporting a bad amount.
    fn read_amount(&mut self) -> io::Result<Option<Option<Decimal>>> {
        let Some(raw) = self.prompt("Enter the amount: ")? else {
            return Ok(None);
        };
        let amount = match Decimal::from_str(&raw) {
            Ok(amount) => amount,
            Err(_) => {
                self.say("Invalid amount.")?;
                return Ok(Some(None));
            }
        };
        if amount <= Decimal::ZERO {
            self.say("Amount must be greater than zero.")?;
            return Ok(Some(None));
        }
        match validate_amount(amount) {
            Ok(amount) => Ok(Some(Some(amount))),
            Err(e) => {
                self.say(e)?;
                Ok(Some(None))
            }
        }
    }

    fn pause(&mut self) -> io::Result<Flow> {
        match self.prompt("\nPress Enter to continue...")? {
            Some(_) => Ok(Flow::Continue),
            None => Ok(Flow::Exit),
        }
    }

    /// Print `text` without a newline and read one trimmed line.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)
    }
}

fn join(members: &[MemberId]) -> String {
    members
        .iter()
        .map(MemberId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
