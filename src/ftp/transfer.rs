use crate::ftp::error::CliError;
use crate::ftp::myftp::FtpClient;
use crate::ftp::progress::ProgressLine;
use colorful::{Color, Colorful};
use std::path::Path;
use tokio::fs;

/// 传输阶段的结果
#[derive(Debug)]
pub enum Outcome {
    Completed,
    TransferFailed(anyhow::Error),
}

impl Outcome {
    /// 传输中出现的错误只打印, 不影响退出码
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed => 0,
            Outcome::TransferFailed(_) => 0,
        }
    }

    fn settle(result: anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Completed,
            Err(e) => {
                eprintln!("{}", format!("{:#}", e).color(Color::Red));
                Outcome::TransferFailed(e)
            }
        }
    }
}

/// 下载单个文件到本地目录`local`
pub async fn download<C: FtpClient>(
    client: &mut C,
    remote: &str,
    local: &Path,
) -> Result<Outcome, CliError> {
    ensure_directory(local).await?;
    let name = basename(remote);
    if name.is_empty() {
        return Err(CliError::RemoteNotAFile(remote.to_string()));
    }
    let target = local.join(name);
    info!("downloading {} to {}", remote, target.display());

    client.track_progress(Some(Box::new(ProgressLine::stdout())));
    let result = client.download_to(&target, remote).await;
    client.track_progress(None);
    Ok(Outcome::settle(result))
}

/// 递归下载远程目录, 保存到`local`下与远程相同的路径中
pub async fn download_dir<C: FtpClient>(
    client: &mut C,
    remote: &str,
    local: &Path,
) -> Result<Outcome, CliError> {
    ensure_directory(local).await?;
    let remote = normalize_remote_dir(remote);
    let target = local.join(remote.trim_start_matches('/'));
    fs::create_dir_all(&target)
        .await
        .map_err(|source| CliError::LocalPath {
            path: target.clone(),
            source,
        })?;
    info!("downloading directory {} to {}", remote, target.display());

    client.track_progress(Some(Box::new(ProgressLine::stdout())));
    let result = client.download_to_dir(&target, &remote).await;
    client.track_progress(None);
    Ok(Outcome::settle(result))
}

/// 上传单个文件到远程目录`remote`
pub async fn upload<C: FtpClient>(
    client: &mut C,
    local: &Path,
    remote: &str,
) -> Result<Outcome, CliError> {
    let metadata = fs::metadata(local)
        .await
        .map_err(|source| CliError::LocalPath {
            path: local.to_path_buf(),
            source,
        })?;
    if metadata.is_dir() {
        return Err(CliError::NotAFile(local.to_path_buf()));
    }
    let name = local
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::NotAFile(local.to_path_buf()))?;
    let target = join_remote(remote, &name);
    info!("uploading {} to {}", local.display(), target);

    client.track_progress(Some(Box::new(ProgressLine::stdout())));
    let result = client.upload_from(local, &target).await;
    client.track_progress(None);
    Ok(Outcome::settle(result))
}

async fn ensure_directory(local: &Path) -> Result<(), CliError> {
    let metadata = fs::metadata(local)
        .await
        .map_err(|source| CliError::LocalPath {
            path: local.to_path_buf(),
            source,
        })?;
    if !metadata.is_dir() {
        return Err(CliError::NotADirectory(local.to_path_buf()));
    }
    Ok(())
}

/// 远程路径最后一段, 以`/`结尾时为空
fn basename(remote: &str) -> &str {
    match remote.rfind('/') {
        Some(index) => &remote[index + 1..],
        None => remote,
    }
}

/// 保证远程目录以`/`开头并以`/`结尾
pub fn normalize_remote_dir(remote: &str) -> String {
    let mut normalized = String::with_capacity(remote.len() + 2);
    if !remote.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(remote);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// 拼接远程目录和文件名
pub fn join_remote(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        return name.to_string();
    }
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
