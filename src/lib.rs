pub mod client;
pub mod config;
pub mod errors;
pub mod readers;
pub mod record;

pub use client::{Ares, HttpTransport, Transport};
pub use config::Config;
pub use errors::Error;
pub use record::{BusinessRecord, HouseNumber};
