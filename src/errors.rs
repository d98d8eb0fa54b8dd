use std::time::Duration;

use thiserror::Error;

use crate::core::config::ConfigError;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with status {code}: {stderr}")]
    Exit {
        command: String,
        code: i32,
        stderr: String,
    },
    #[error("timed out after {}s waiting for /{pattern}/", .after.as_secs())]
    Timeout { pattern: String, after: Duration },
    #[error("process ended before /{pattern}/ appeared")]
    Closed { pattern: String, output: String },
    #[error("process io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected `{command}` output: {source}")]
    Json {
        command: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("`{command}` output has no `{attribute}`")]
    MissingAttribute { command: String, attribute: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = ProcessError::Exit {
            command: "listpeers".into(),
            code: 1,
            stderr: "[lncli] rpc error".into(),
        };
        assert_eq!(e.to_string(), "listpeers exited with status 1: [lncli] rpc error");

        let e = ProcessError::Timeout {
            pattern: "/no\\):".into(),
            after: Duration::from_secs(10),
        };
        assert_eq!(e.to_string(), "timed out after 10s waiting for //no\\):/");

        let app: AppError = ParseError::MissingAttribute {
            command: "addinvoice".into(),
            attribute: "pay_req".into(),
        }
        .into();
        assert_eq!(app.to_string(), "`addinvoice` output has no `pay_req`");
    }
}
