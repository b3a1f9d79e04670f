use crate::ftp::listing::ListEntry;
use crate::ftp::myftp::FtpClient;
use crate::ftp::progress::ProgressListener;
use anyhow::anyhow;
use std::path::Path;

/// 记录调用的假FTP客户端
#[derive(Default)]
pub struct MockFtp {
    pub calls: Vec<String>,
    pub fail: bool,
    pub tracking: Vec<bool>,
    // 目录下载开始时目标目录是否已经存在
    pub target_existed: Option<bool>,
    pub entries: Vec<ListEntry>,
}

impl MockFtp {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn result(&self) -> anyhow::Result<()> {
        if self.fail {
            Err(anyhow!("connection reset by peer"))
        } else {
            Ok(())
        }
    }
}

impl FtpClient for MockFtp {
    async fn list(&mut self) -> anyhow::Result<Vec<ListEntry>> {
        self.calls.push("list".to_string());
        self.result()?;
        Ok(self.entries.clone())
    }

    async fn download_to(&mut self, local: &Path, remote: &str) -> anyhow::Result<()> {
        self.calls
            .push(format!("download {} -> {}", remote, local.display()));
        self.result()
    }

    async fn download_to_dir(&mut self, local: &Path, remote: &str) -> anyhow::Result<()> {
        self.target_existed = Some(local.is_dir());
        self.calls
            .push(format!("downloadDir {} -> {}", remote, local.display()));
        self.result()
    }

    async fn upload_from(&mut self, local: &Path, remote: &str) -> anyhow::Result<()> {
        self.calls
            .push(format!("upload {} -> {}", local.display(), remote));
        self.result()
    }

    fn track_progress(&mut self, listener: Option<Box<dyn ProgressListener>>) {
        self.tracking.push(listener.is_some());
    }

    async fn disconnect(&mut self) {
        self.calls.push("disconnect".to_string());
    }
}
