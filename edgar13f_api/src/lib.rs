mod client;
mod errors;
pub mod types;
pub use self::client::{clean_accession, Client};
pub use self::errors::Error;
