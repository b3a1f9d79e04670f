use crate::ftp::error::CliError;
use crate::ftp::myftp::FtpClient;
use crate::ftp::units::format_bytes;
use once_cell::sync::Lazy;
use regex::Regex;

/// unix格式: `drwxr-xr-x 1 owner group 4096 Jan 01 12:00 name`
static UNIX_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<kind>[bcdelfmpSs-])[-rwxsStTL]{9}\S*\s+\d+\s+\S+\s+(?:\S+\s+)?(?P<size>\d+)\s+(?P<date>[A-Za-z]{3}\s+\d{1,2}\s+(?:\d{1,2}:\d{2}|\d{4}))\s+(?P<name>.+)$",
    )
    .expect("valid unix listing regex")
});

/// dos格式: `01-31-21  09:15PM  <DIR>  name`
static DOS_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<date>\d{2}-\d{2}-\d{2,4}\s+\d{2}:\d{2}\s*[AaPp][Mm])\s+(?:(?P<dir><DIR>)|(?P<size>\d+))\s+(?P<name>.+)$",
    )
    .expect("valid dos listing regex")
});

const ICONS: [char; 3] = [
    '\u{eb32}', // question mark
    '\u{f15b}', // file
    '\u{f4d4}', // directory
];

/// 远程文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Unknown = 0,
    File = 1,
    Directory = 2,
}

impl FileKind {
    pub fn icon(self) -> char {
        ICONS[self as usize]
    }
}

/// 目录列表中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub name: String,
    pub kind: FileKind,
    pub size: u64,
    pub raw_modified_at: String,
}

/// 解析LIST命令返回的一行, 无法识别的行返回None
pub fn parse_list_line(line: &str) -> Option<ListEntry> {
    let line = line.trim_end_matches(['\r', '\n']);
    let entry = parse_unix_line(line).or_else(|| parse_dos_line(line))?;
    if entry.name == "." || entry.name == ".." {
        return None;
    }
    Some(entry)
}

fn parse_unix_line(line: &str) -> Option<ListEntry> {
    let caps = UNIX_LINE.captures(line)?;
    let kind = match &caps["kind"] {
        "-" => FileKind::File,
        "d" => FileKind::Directory,
        _ => FileKind::Unknown,
    };
    let mut name = &caps["name"];
    if caps["kind"].eq("l") {
        // 去掉符号链接指向的目标
        if let Some(index) = name.find(" -> ") {
            name = &name[..index];
        }
    }
    Some(ListEntry {
        name: name.to_string(),
        kind,
        size: caps["size"].parse().ok()?,
        raw_modified_at: caps["date"].to_string(),
    })
}

fn parse_dos_line(line: &str) -> Option<ListEntry> {
    let caps = DOS_LINE.captures(line)?;
    let (kind, size) = match caps.name("size") {
        Some(size) => (FileKind::File, size.as_str().parse().ok()?),
        None => (FileKind::Directory, 0),
    };
    Some(ListEntry {
        name: caps["name"].to_string(),
        kind,
        size,
        raw_modified_at: caps["date"].to_string(),
    })
}

/// 列表中每一项的显示格式
pub fn render_entry(entry: &ListEntry) -> String {
    format!(
        "{} {} - {}",
        entry.kind.icon(),
        entry.name,
        format_bytes(entry.size)
    )
}

/// 打印远程当前目录
pub async fn list<C: FtpClient>(client: &mut C) -> Result<(), CliError> {
    let entries = client.list().await?;
    debug!("listed {} entries", entries.len());
    for entry in entries.iter() {
        println!("{}", render_entry(entry));
    }
    Ok(())
}
