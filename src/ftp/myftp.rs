use crate::ftp::config::FtpConfig;
use crate::ftp::listing::{parse_list_line, FileKind, ListEntry};
use crate::ftp::progress::{ProgressInfo, ProgressListener};
use anyhow::{anyhow, Context, Result};
use async_ftp::types::FileType;
use async_ftp::FtpStream;
use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::mem;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use std::time::{Duration, Instant};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, ReadBuf};

// 两次进度回调之间的最小间隔
const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

// 下载时每次读取的大小
const CHUNK_SIZE: usize = 64 * 1024;

/// 命令需要的ftp操作
#[allow(async_fn_in_trait)]
pub trait FtpClient {
    /// 列出当前远程目录
    async fn list(&mut self) -> Result<Vec<ListEntry>>;
    /// 下载单个文件到`local`
    async fn download_to(&mut self, local: &Path, remote: &str) -> Result<()>;
    /// 递归下载远程目录中的全部内容到`local`
    async fn download_to_dir(&mut self, local: &Path, remote: &str) -> Result<()>;
    /// 上传单个文件
    async fn upload_from(&mut self, local: &Path, remote: &str) -> Result<()>;
    /// 设置进度监听, None表示取消监听
    fn track_progress(&mut self, listener: Option<Box<dyn ProgressListener>>);
    /// 断开链接
    async fn disconnect(&mut self);
}

/// 按时间间隔转发进度
#[derive(Default)]
struct Tracker {
    listener: Option<Box<dyn ProgressListener>>,
    // 已经完成的文件的字节数
    completed: u64,
    last_report: Option<Instant>,
}

impl Tracker {
    fn attach(&mut self, listener: Option<Box<dyn ProgressListener>>) {
        self.listener = listener;
        self.completed = 0;
        self.last_report = None;
    }

    fn update(&mut self, name: &str, bytes: u64) {
        let due = self
            .last_report
            .map_or(true, |last| last.elapsed() >= PROGRESS_INTERVAL);
        if due {
            self.emit(name, bytes);
        }
    }

    fn finish(&mut self, name: &str, bytes: u64) {
        self.emit(name, bytes);
        self.completed += bytes;
        self.last_report = None;
    }

    fn emit(&mut self, name: &str, bytes: u64) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_progress(&ProgressInfo {
                name,
                bytes,
                bytes_overall: self.completed + bytes,
            });
            self.last_report = Some(Instant::now());
        }
    }
}

/// 在读取本地文件时汇报上传进度
struct ProgressRead<'a, R> {
    inner: R,
    name: &'a str,
    bytes: u64,
    tracker: &'a mut Tracker,
}

impl<'a, R: AsyncRead + Unpin> AsyncRead for ProgressRead<'a, R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut TaskContext<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let poll = Pin::new(&mut this.inner).poll_read(cx, buf);
        if let Poll::Ready(Ok(())) = poll {
            let read = buf.filled().len() - before;
            if read > 0 {
                this.bytes += read as u64;
                this.tracker.update(this.name, this.bytes);
            }
        }
        poll
    }
}

pub struct FTP {
    ftpstream: FtpStream,
    tracker: Tracker,
}

impl FTP {
    /// 登录ftp服务器并切换到二进制传输模式
    pub async fn login(config: &FtpConfig) -> Result<Self> {
        if config.secure {
            return Err(anyhow!("secure FTP is not supported"));
        }
        let address = config.address();
        let mut ftp_stream = FtpStream::connect(address.as_str())
            .await
            .with_context(|| format!("could not connect to {}", address))?;
        ftp_stream
            .login(&config.user, &config.password)
            .await
            .context("login rejected")?;
        ftp_stream
            .transfer_type(FileType::Binary)
            .await
            .context("could not switch to binary mode")?;
        info!("Logged in to {} as {}", address, config.user);
        Ok(FTP {
            ftpstream: ftp_stream,
            tracker: Tracker::default(),
        })
    }

    async fn list_entries(&mut self) -> Result<Vec<ListEntry>> {
        let lines = self.ftpstream.list(None).await.context("LIST failed")?;
        Ok(lines
            .iter()
            .filter_map(|line| {
                let entry = parse_list_line(line);
                if entry.is_none() {
                    debug!("skipping listing line {:?}", line);
                }
                entry
            })
            .collect())
    }

    async fn download_file(&mut self, local: &Path, remote: &str) -> Result<()> {
        // retr的回调只能是Fn, 下载期间把进度放进RefCell
        let tracker = RefCell::new(mem::take(&mut self.tracker));
        let result = self
            .ftpstream
            .retr(remote, |mut reader| {
                let tracker = &tracker;
                async move {
                    let mut file = File::create(local)
                        .await
                        .with_context(|| format!("could not create {}", local.display()))?;
                    let mut buf = vec![0u8; CHUNK_SIZE];
                    let mut bytes = 0u64;
                    loop {
                        let n = reader.read(&mut buf).await?;
                        if n == 0 {
                            break;
                        }
                        file.write_all(&buf[..n]).await?;
                        bytes += n as u64;
                        tracker.borrow_mut().update(remote, bytes);
                    }
                    file.flush().await?;
                    Ok::<u64, anyhow::Error>(bytes)
                }
            })
            .await;
        self.tracker = tracker.into_inner();
        let bytes = result.with_context(|| format!("could not retrieve {}", remote))?;
        self.tracker.finish(remote, bytes);
        debug!("downloaded {} ({} bytes) to {}", remote, bytes, local.display());
        Ok(())
    }

    /// 下载当前远程目录中的内容, 遇到子目录时进入并递归下载
    fn download_dir_contents<'a>(
        &'a mut self,
        local: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            let entries = self.list_entries().await?;
            for entry in entries {
                let target = local.join(&entry.name);
                match entry.kind {
                    FileKind::Directory => {
                        fs::create_dir_all(&target)
                            .await
                            .with_context(|| format!("could not create {}", target.display()))?;
                        self.ftpstream.cwd(&entry.name).await?;
                        self.download_dir_contents(&target).await?;
                        self.ftpstream.cdup().await?;
                    }
                    FileKind::File => self.download_file(&target, &entry.name).await?,
                    FileKind::Unknown => debug!("skipping {} of unknown type", entry.name),
                }
            }
            Ok(())
        })
    }
}

impl FtpClient for FTP {
    async fn list(&mut self) -> Result<Vec<ListEntry>> {
        self.list_entries().await
    }

    async fn download_to(&mut self, local: &Path, remote: &str) -> Result<()> {
        self.download_file(local, remote).await
    }

    async fn download_to_dir(&mut self, local: &Path, remote: &str) -> Result<()> {
        let origin = self.ftpstream.pwd().await?;
        self.ftpstream
            .cwd(remote)
            .await
            .with_context(|| format!("could not enter {}", remote))?;
        let result = self.download_dir_contents(local).await;
        // 无论下载是否成功都回到原来的目录
        if let Err(e) = self.ftpstream.cwd(&origin).await {
            warn!("could not return to {}: {}", origin, e);
        }
        result
    }

    async fn upload_from(&mut self, local: &Path, remote: &str) -> Result<()> {
        let file = File::open(local)
            .await
            .with_context(|| format!("could not open {}", local.display()))?;
        let mut reader = ProgressRead {
            inner: file,
            name: remote,
            bytes: 0,
            tracker: &mut self.tracker,
        };
        self.ftpstream
            .put(remote, &mut reader)
            .await
            .with_context(|| format!("could not store {}", remote))?;
        let bytes = reader.bytes;
        self.tracker.finish(remote, bytes);
        debug!("uploaded {} ({} bytes) to {}", local.display(), bytes, remote);
        Ok(())
    }

    fn track_progress(&mut self, listener: Option<Box<dyn ProgressListener>>) {
        self.tracker.attach(listener);
    }

    async fn disconnect(&mut self) {
        if let Err(e) = self.ftpstream.quit().await {
            warn!("could not close connection: {}", e);
        }
    }
}
