//! # lncli Adapter
//!
//! Everything that knows `lncli` exists lives here:
//!
//! - [`runner`]: spawning processes (real or fake)
//! - [`gateway`]: the single lock every command goes through
//! - [`client`]: typed commands and their arguments
//! - [`types`]: records parsed from the JSON output

pub mod client;
pub mod gateway;
pub mod runner;
pub mod types;

pub use client::LndClient;
pub use gateway::{COMPLETION_TIMEOUT, CommandGateway, InteractiveSession, PROMPT_TIMEOUT};
pub use runner::{CommandRunner, InteractiveProcess, ProcessOutput, ProcessRequest, TokioRunner};
