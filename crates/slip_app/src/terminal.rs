use std::io::{self, Write};

use slip_core::{PaymentRecord, TextField};

use crate::collaborators::{LinkClipboard, SlipRenderer};

/// Prints a plain-text slip to stdout.
#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl SlipRenderer for TerminalRenderer {
    fn render(&self, record: &PaymentRecord) {
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", format_slip(record));
    }
}

/// Prints the link so the terminal's own copy can pick it up.
#[derive(Debug, Default)]
pub struct TerminalClipboard;

impl LinkClipboard for TerminalClipboard {
    fn copy(&self, link: &str) {
        println!("link: {link}");
    }
}

pub fn format_slip(record: &PaymentRecord) -> String {
    let amount = if record.amount.is_empty() {
        "-"
    } else {
        record.amount.as_str()
    };
    format!(
        "+-- payment slip\n\
         | amount:      {amount} EUR\n\
         | receiver:    {}, {}, {}\n\
         | iban:        {}\n\
         | model/ref:   {} {}\n\
         | purpose:     {}\n\
         | description: {}\n\
         +--",
        record.receiver_name,
        record.receiver_street,
        record.receiver_place,
        record.iban,
        record.model,
        record.reference,
        record.purpose,
        record.description,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Amount(String),
    Set { field: TextField, value: String },
    Pay(String),
    Link,
    Copy,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "commands:
  amount <value>        set the amount of your own slip
  set <field> <value>   set a text field (purpose, description, iban, model,
                        reference, receiverName, receiverStreet, receiverPlace)
  pay <value>           adjust the amount of an opened shared slip
  link                  create a short link to your own slip
  copy                  copy the last short link
  show                  print the current state
  quit";

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim_start();
        match word {
            "amount" => Ok(Command::Amount(rest.to_string())),
            "pay" => Ok(Command::Pay(rest.to_string())),
            "set" => {
                let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
                let field =
                    TextField::from_key(key).ok_or_else(|| format!("unknown field {key:?}"))?;
                Ok(Command::Set {
                    field,
                    value: value.to_string(),
                })
            }
            "link" => Ok(Command::Link),
            "copy" => Ok(Command::Copy),
            "show" => Ok(Command::Show),
            "help" | "" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_edits_with_spaces() {
        assert_eq!(
            Command::parse("set receiverName Ana Kovač"),
            Ok(Command::Set {
                field: TextField::ReceiverName,
                value: "Ana Kovač".to_string()
            })
        );
        assert_eq!(
            Command::parse("amount 12,5"),
            Ok(Command::Amount("12,5".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_fields_and_commands() {
        assert!(Command::parse("set amount 5").is_err());
        assert!(Command::parse("launch").is_err());
    }

    #[test]
    fn slip_shows_placeholder_for_empty_amount() {
        let text = format_slip(&PaymentRecord::default());
        assert!(text.contains("amount:      - EUR"));
        assert!(text.contains("HR99"));
    }
}
