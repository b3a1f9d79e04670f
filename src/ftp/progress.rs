use crate::ftp::units::format_bytes;
use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stdout, Write};

/// 传输过程中的进度信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressInfo<'a> {
    /// 当前传输的文件
    pub name: &'a str,
    /// 当前文件已传输的字节数
    pub bytes: u64,
    /// 自监听开始以来传输的总字节数
    pub bytes_overall: u64,
}

/// 进度监听
pub trait ProgressListener {
    fn on_progress(&mut self, info: &ProgressInfo<'_>);
}

impl<F: FnMut(&ProgressInfo<'_>)> ProgressListener for F {
    fn on_progress(&mut self, info: &ProgressInfo<'_>) {
        self(info);
    }
}

/// 在同一行刷新显示进度
pub struct ProgressLine<W: Write> {
    out: W,
    count: usize,
}

impl ProgressLine<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressLine<W> {
    pub fn new(out: W) -> Self {
        Self { out, count: 0 }
    }

    fn render(&mut self, info: &ProgressInfo<'_>) -> io::Result<()> {
        if self.count > 0 {
            queue!(self.out, MoveUp(1), Clear(ClearType::FromCursorDown))?;
        }
        writeln!(self.out, "{} - {}", info.name, format_bytes(info.bytes_overall))?;
        self.out.flush()?;
        self.count += 1;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressListener for ProgressLine<W> {
    fn on_progress(&mut self, info: &ProgressInfo<'_>) {
        if let Err(e) = self.render(info) {
            debug!("could not render progress line: {}", e);
        }
    }
}
