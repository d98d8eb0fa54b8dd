//! lnboard library exports for testing

pub mod core;
pub mod errors;
pub mod lnd;
pub mod tui;

#[cfg(test)]
pub mod test_support;
