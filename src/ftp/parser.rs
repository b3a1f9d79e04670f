use crate::ftp::config::downloads_dir;
use crate::ftp::error::CliError;
use clap::{App, AppSettings, Arg};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 要执行的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Download { remote: String, local: PathBuf },
    DownloadDir { remote: String, local: PathBuf },
    Upload { local: PathBuf, remote: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Run(Command),
}

/// 命令行参数, 保存命令名称以及其后的位置参数
pub struct CommandArgument {
    command: Option<String>,
    args: Vec<String>,
    help: bool,
}

impl CommandArgument {
    pub fn new() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            help: false,
        }
    }

    fn app() -> App<'static> {
        App::new("phoneftp")
            .about("list, download and upload files on the phone's FTP server")
            .setting(AppSettings::DisableHelpFlag)
            .arg(
                Arg::new("show-help")
                    .short('h')
                    .long("help")
                    .help("print usage"),
            )
            .arg(
                Arg::new("command")
                    .help("list | download | downloadDir | upload | help")
                    .index(1),
            )
            .arg(
                Arg::new("args")
                    .help("paths passed to the command")
                    .index(2)
                    .multiple_values(true),
            )
    }

    /// 解析进程的命令行参数
    pub fn parse(&mut self) -> Result<(), CliError> {
        self.parse_from(env::args_os())
    }

    pub fn parse_from<I, T>(&mut self, args: I) -> Result<(), CliError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matcher = Self::app().try_get_matches_from(args).map_err(|e| {
            let message = e.to_string();
            let first = message.lines().next().unwrap_or_default();
            CliError::InvalidArguments(first.trim_start_matches("error: ").to_string())
        })?;
        self.help = matcher.is_present("show-help");
        self.command = matcher.value_of("command").map(str::to_string);
        self.args = match matcher.values_of("args") {
            None => Vec::new(),
            Some(values) => values.map(str::to_string).collect(),
        };
        Ok(())
    }

    /// 把解析出的参数转换为具体命令, `downloads`为默认的本地目录
    pub fn invocation(&self, downloads: &Path) -> Result<Invocation, CliError> {
        let command = self.command.as_deref().ok_or(CliError::MissingCommand)?;
        if command == "help" || self.help {
            return Ok(Invocation::Help);
        }
        let local_or_default = |index: usize| {
            self.args
                .get(index)
                .map(PathBuf::from)
                .unwrap_or_else(|| downloads.to_path_buf())
        };
        let command = match command {
            "list" => Command::List,
            "download" => Command::Download {
                remote: self.required(0, "missing path to a file")?,
                local: local_or_default(1),
            },
            "upload" => Command::Upload {
                local: PathBuf::from(self.required(0, "missing path to a file")?),
                remote: self.args.get(1).cloned().unwrap_or_else(|| "/".to_string()),
            },
            "downloadDir" => Command::DownloadDir {
                remote: self.required(0, "missing path to a directory")?,
                local: local_or_default(1),
            },
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(Invocation::Run(command))
    }

    fn required(&self, index: usize, message: &'static str) -> Result<String, CliError> {
        self.args
            .get(index)
            .cloned()
            .ok_or(CliError::MissingArgument(message))
    }
}

/// 解析进程参数并得到要执行的命令
pub fn parse_invocation() -> Result<Invocation, CliError> {
    let mut command = CommandArgument::new();
    command.parse()?;
    command.invocation(&downloads_dir())
}

#[cfg(test)]
mod parse_test {
    use super::*;

    fn invocation(args: &[&str]) -> Result<Invocation, CliError> {
        let mut parser = CommandArgument::new();
        let mut argv = vec!["phoneftp"];
        argv.extend_from_slice(args);
        parser.parse_from(argv)?;
        parser.invocation(Path::new("/home/god/Downloads"))
    }

    #[test]
    fn test_command_parser_unparse() {
        let parser = CommandArgument::new();
        assert_eq!(parser.command, None);
        assert!(parser.args.is_empty());
        assert!(!parser.help);
    }

    #[test]
    fn test_missing_command() {
        let err = invocation(&[]).unwrap_err();
        assert!(matches!(err, CliError::MissingCommand));
        assert_eq!(err.to_string(), "missing command");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_help_variants() {
        assert_eq!(invocation(&["help"]).unwrap(), Invocation::Help);
        assert_eq!(invocation(&["list", "-h"]).unwrap(), Invocation::Help);
        assert_eq!(invocation(&["--help", "upload"]).unwrap(), Invocation::Help);
    }

    #[test]
    fn test_list() {
        assert_eq!(
            invocation(&["list"]).unwrap(),
            Invocation::Run(Command::List)
        );
    }

    #[test]
    fn test_download_defaults_to_downloads_dir() {
        assert_eq!(
            invocation(&["download", "/DCIM/a.jpg"]).unwrap(),
            Invocation::Run(Command::Download {
                remote: "/DCIM/a.jpg".to_string(),
                local: PathBuf::from("/home/god/Downloads"),
            })
        );
        assert_eq!(
            invocation(&["download", "a.jpg", "/tmp"]).unwrap(),
            Invocation::Run(Command::Download {
                remote: "a.jpg".to_string(),
                local: PathBuf::from("/tmp"),
            })
        );
    }

    #[test]
    fn test_download_dir() {
        assert_eq!(
            invocation(&["downloadDir", "DCIM/Camera"]).unwrap(),
            Invocation::Run(Command::DownloadDir {
                remote: "DCIM/Camera".to_string(),
                local: PathBuf::from("/home/god/Downloads"),
            })
        );
    }

    #[test]
    fn test_upload_defaults_to_root() {
        assert_eq!(
            invocation(&["upload", "notes.txt"]).unwrap(),
            Invocation::Run(Command::Upload {
                local: PathBuf::from("notes.txt"),
                remote: "/".to_string(),
            })
        );
        assert_eq!(
            invocation(&["upload", "notes.txt", "/Documents"]).unwrap(),
            Invocation::Run(Command::Upload {
                local: PathBuf::from("notes.txt"),
                remote: "/Documents".to_string(),
            })
        );
    }

    #[test]
    fn test_missing_arguments() {
        let err = invocation(&["download"]).unwrap_err();
        assert_eq!(err.to_string(), "missing path to a file");
        let err = invocation(&["upload"]).unwrap_err();
        assert_eq!(err.to_string(), "missing path to a file");
        let err = invocation(&["downloadDir"]).unwrap_err();
        assert_eq!(err.to_string(), "missing path to a directory");
    }

    #[test]
    fn test_unknown_command() {
        let err = invocation(&["delete", "a.jpg"]).unwrap_err();
        assert!(matches!(err, CliError::UnknownCommand(ref name) if name == "delete"));
        assert_eq!(err.to_string(), "unknown command");
    }

    #[test]
    fn test_unknown_flag() {
        let err = invocation(&["list", "--verbose"]).unwrap_err();
        assert!(matches!(err, CliError::InvalidArguments(_)));
    }
}
