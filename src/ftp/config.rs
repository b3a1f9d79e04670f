use crate::ftp::error::CliError;
use std::env;
use std::path::PathBuf;

/// FTP服务端口, 手机上的FTP服务默认监听2221
pub const PORT: u16 = 2221;

pub const HOST_VAR: &str = "PHONE_HOST";
pub const USER_VAR: &str = "PHONE_USER";
pub const PASS_VAR: &str = "PHONE_PASS";

/// 连接FTP服务器需要的参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub secure: bool,
}

impl FtpConfig {
    /// 从环境变量中读取连接参数
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(CliError::MissingEnv(key));
        Ok(Self {
            host: require(HOST_VAR)?,
            port: PORT,
            user: require(USER_VAR)?,
            password: require(PASS_VAR)?,
            secure: false,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 默认的下载目录: 用户主目录下的Downloads
pub fn downloads_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Downloads"),
        // 找不到主目录时只能用当前目录
        None => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
