pub mod config;
pub mod error;
pub mod intent;
pub mod matching;
pub mod ticket;

pub use config::Config;
pub use error::*;
pub use intent::*;
pub use matching::*;
pub use ticket::*;
