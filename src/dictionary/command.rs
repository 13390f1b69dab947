//! Dictionary protocol commands and replies.

use std::str::FromStr;

use crate::dictionary::error::Error;
use crate::dictionary::store::Dictionary;

/// A single protocol command, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(String),
    Set(String, String),
    Delete(String),
    All,
    Quit,
}

fn key_argument(verb: &'static str, rest: &str) -> Result<String, Error> {
    match rest {
        "" => Err(Error::MissingArgument(verb, "key")),
        key if key.contains(char::is_whitespace) => Err(Error::InvalidKey(key.to_string())),
        key => Ok(key.to_string()),
    }
}

fn no_argument(verb: &'static str, command: Command, rest: &str) -> Result<Command, Error> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(Error::UnexpectedArgument(verb))
    }
}

impl FromStr for Command {
    type Err = Error;

    /// Verbs are case-insensitive; keys and values are taken verbatim.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        match verb.to_ascii_uppercase().as_str() {
            "GET" => key_argument("GET", rest).map(Command::Get),
            "DELETE" => key_argument("DELETE", rest).map(Command::Delete),
            "SET" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(Error::MissingArgument("SET", "value"))?;
                let key = key_argument("SET", key)?;
                Ok(Command::Set(key, value.trim().to_string()))
            }
            "ALL" => no_argument("ALL", Command::All, rest),
            "QUIT" => no_argument("QUIT", Command::Quit, rest),
            _ => Err(Error::UnknownCommand(verb.to_string())),
        }
    }
}

/// The server's answer to one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    Ok,
    Entries(Vec<(String, String)>),
    Bye,
    Error(String),
}

impl Reply {
    /// Wire form; every line ends in CRLF.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Reply::Answer(value) => format!("ANSWER {value}\r\n").into_bytes(),
            Reply::Ok => b"OK\r\n".to_vec(),
            Reply::Entries(entries) => {
                let mut bytes = Vec::new();
                for (key, value) in entries {
                    bytes.extend_from_slice(format!("ENTRY {key} {value}\r\n").as_bytes());
                }
                bytes.extend_from_slice(b"END\r\n");
                bytes
            }
            Reply::Bye => b"BYE\r\n".to_vec(),
            Reply::Error(reason) => format!("ERROR {reason}\r\n").into_bytes(),
        }
    }
}

/// Run a command against the store.
pub async fn execute(command: Command, store: &Dictionary) -> Reply {
    match command {
        Command::Get(key) => match store.get(&key).await {
            Some(value) => Reply::Answer(value),
            None => Reply::Error(format!("no entry for {key}")),
        },
        Command::Set(key, value) => {
            store.set(key, value).await;
            Reply::Ok
        }
        Command::Delete(key) => match store.remove(&key).await {
            Some(_) => Reply::Ok,
            None => Reply::Error(format!("no entry for {key}")),
        },
        Command::All => Reply::Entries(store.entries().await),
        Command::Quit => Reply::Bye,
    }
}
