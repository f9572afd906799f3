///! Types shared between the refresh pipeline and its readers
mod types;
pub use types::*;
