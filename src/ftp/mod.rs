pub mod config;
pub mod error;
pub mod listing;
pub mod myftp;
pub mod parser;
pub mod progress;
pub mod transfer;
pub mod units;

#[cfg(test)]
mod mock;

use colorful::{Color, Colorful};
use config::FtpConfig;
use error::CliError;
use myftp::{FtpClient, FTP};
use parser::{parse_invocation, Command, Invocation};
use transfer::Outcome;

pub const USAGE: &str = "commands:
   - list - list remote
   - download <remote> [local] - download file, default local is ~/Downloads
   - downloadDir <remote> [local] - download directory, default local is ~/Downloads
   - upload <local> [remote] - upload file
  ";

/// 打印帮助信息
pub fn help() {
    println!("{}", USAGE);
}

fn report(error: &CliError) {
    eprintln!("{}", error.to_string().color(Color::Red));
    println!();
}

/// 执行一条命令
pub async fn dispatch<C: FtpClient>(client: &mut C, command: Command) -> Result<Outcome, CliError> {
    debug!("dispatching {:?}", command);
    match command {
        Command::List => {
            listing::list(client).await?;
            Ok(Outcome::Completed)
        }
        Command::Download { remote, local } => transfer::download(client, &remote, &local).await,
        Command::DownloadDir { remote, local } => {
            transfer::download_dir(client, &remote, &local).await
        }
        Command::Upload { local, remote } => transfer::upload(client, &local, &remote).await,
    }
}

/// 执行命令后关闭链接, 返回进程退出码
pub async fn run<C: FtpClient>(client: &mut C, command: Command) -> i32 {
    let result = dispatch(client, command).await;
    client.disconnect().await;
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(error) => {
            report(&error);
            help();
            error.exit_code()
        }
    }
}

/// 解析参数, 连接服务器并执行命令, 返回进程退出码
pub async fn execute() -> i32 {
    //初始化日志
    pretty_env_logger::init_timed();

    let command = match parse_invocation() {
        Ok(Invocation::Run(command)) => command,
        Ok(Invocation::Help) => {
            help();
            return 1;
        }
        Err(error) => {
            report(&error);
            help();
            return error.exit_code();
        }
    };

    let login = match FtpConfig::from_env() {
        Ok(config) => FTP::login(&config).await.map_err(CliError::from),
        Err(error) => Err(error),
    };
    let mut ftp = match login {
        Ok(ftp) => ftp,
        Err(error) => {
            warn!("{}", error);
            eprintln!("{}", "Failed to connect to FTP server".color(Color::Red));
            return 1;
        }
    };
    run(&mut ftp, command).await
}
