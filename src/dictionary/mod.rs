//! Dictionary server: a line-oriented key/value protocol.
//!
//! ```text
//! GET <key>              ANSWER <value> | ERROR no entry for <key>
//! SET <key> <value...>   OK
//! DELETE <key>           OK | ERROR no entry for <key>
//! ALL                    ENTRY <key> <value> ... END
//! QUIT                   BYE
//! ```

mod command;
mod config;
mod error;
mod server;
mod store;

pub use command::{execute, Command, Reply};
pub use config::DictionaryConfig;
pub use error::Error;
pub use server::{handle_session, DictionaryServer};
pub use store::Dictionary;
