use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 传输开始前的错误, 退出码为1
#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing command")]
    MissingCommand,

    #[error("unknown command")]
    UnknownCommand(String),

    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("{0}")]
    InvalidArguments(String),

    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    #[error("{}: {source}", .path.display())]
    LocalPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Local path must be a directory")]
    NotADirectory(PathBuf),

    #[error("Local path must be a file")]
    NotAFile(PathBuf),

    #[error("Only files can be downloaded")]
    RemoteNotAFile(String),

    #[error("{0:#}")]
    Remote(anyhow::Error),
}

impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        CliError::Remote(error)
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
