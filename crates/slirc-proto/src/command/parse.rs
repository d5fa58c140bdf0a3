//! IRC command parsing implementation.

use super::types::Command;
use crate::error::MessageParseError;

fn require(command: &'static str, args: &[&str], expected: usize) -> Result<(), MessageParseError> {
    if args.len() < expected {
        Err(MessageParseError::NotEnoughArguments {
            command,
            expected,
            got: args.len(),
        })
    } else {
        Ok(())
    }
}

fn owned(arg: Option<&&str>) -> Option<String> {
    arg.map(|s| (*s).to_owned())
}

impl Command {
    /// Parse a command from its name and arguments.
    ///
    /// The name is matched case-insensitively. Numerics and unknown commands
    /// keep all of their arguments.
    #[must_use = "command parsing result should be handled"]
    pub fn new(cmd: &str, args: Vec<&str>) -> Result<Command, MessageParseError> {
        if cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit()) {
            let code = cmd.parse::<u16>().map_err(|_| MessageParseError::InvalidCommand {
                position: 0,
            })?;
            return Ok(Command::Numeric(code, to_owned_vec(&args)));
        }

        let upper = cmd.to_ascii_uppercase();
        let command = match upper.as_str() {
            "NICK" => {
                require("NICK", &args, 1)?;
                Command::NICK(args[0].to_owned())
            }
            "USER" => {
                require("USER", &args, 4)?;
                Command::USER(args[0].to_owned(), args[1].to_owned(), args[3].to_owned())
            }
            "QUIT" => Command::QUIT(owned(args.first())),
            "JOIN" => {
                require("JOIN", &args, 1)?;
                Command::JOIN(args[0].to_owned(), owned(args.get(1)))
            }
            "PART" => {
                require("PART", &args, 1)?;
                Command::PART(args[0].to_owned(), owned(args.get(1)))
            }
            "KICK" => {
                require("KICK", &args, 2)?;
                Command::KICK(args[0].to_owned(), args[1].to_owned(), owned(args.get(2)))
            }
            "NAMES" => Command::NAMES(owned(args.first())),
            "PRIVMSG" => {
                require("PRIVMSG", &args, 2)?;
                Command::PRIVMSG(args[0].to_owned(), args[1].to_owned())
            }
            "NOTICE" => {
                require("NOTICE", &args, 2)?;
                Command::NOTICE(args[0].to_owned(), args[1].to_owned())
            }
            "PING" => {
                require("PING", &args, 1)?;
                Command::PING(args[0].to_owned(), owned(args.get(1)))
            }
            "PONG" => {
                require("PONG", &args, 1)?;
                Command::PONG(args[0].to_owned(), owned(args.get(1)))
            }
            "ERROR" => Command::ERROR(args.first().copied().unwrap_or_default().to_owned()),
            _ => Command::Raw(upper, to_owned_vec(&args)),
        };

        Ok(command)
    }
}

fn to_owned_vec(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| (*s).to_owned()).collect()
}
