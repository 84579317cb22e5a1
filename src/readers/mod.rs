pub mod document;
pub mod entity;
pub mod response;

pub use response::parse;
