mod client;
mod error;

pub use client::ContentClient;
pub use error::ContentError;
