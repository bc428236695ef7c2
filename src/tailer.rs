//! 日志尾随模块 - 按字节偏移增量读取不断增长的 Game.log
//!
//! 每次 poll 打开文件读取 offset 之后的新增字节，只消费到最后一个换行符
//! 为止（尾部的半行可能是游戏正在写入的内容，留到下次 poll）。
//! 文件变小视为被截断/替换（新会话），发出一次 reset 信号后从头读取。

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 一次 poll 的结果
#[derive(Debug, Default)]
pub struct TailPoll {
    /// 新增的完整行（已去除首尾空白，空行被丢弃）
    pub lines: Vec<String>,
    /// 本次 poll 是否检测到文件截断（新会话开始）
    pub reset: bool,
}

/// 单个日志文件的尾随状态
#[derive(Debug)]
pub struct LogTailer {
    path: PathBuf,
    /// 已消费的字节偏移，只在文件变小时回退到 0
    offset: u64,
    /// 上次 poll 观察到的文件大小
    last_size: u64,
}

impl LogTailer {
    /// 开始尾随一个日志文件
    ///
    /// `read_existing` 为 true 时从文件头开始处理整个文件，
    /// 否则从当前文件尾开始，只看到之后写入的内容。
    /// 文件不存在时返回错误，由调用方上报，不致命。
    pub fn new(path: impl Into<PathBuf>, read_existing: bool) -> Result<Self> {
        let path = path.into();
        let size = std::fs::metadata(&path)
            .with_context(|| format!("log file not found: {}", path.display()))?
            .len();

        let offset = if read_existing { 0 } else { size };
        info!(path = %path.display(), offset, "Tailing log file");

        Ok(Self {
            path,
            offset,
            last_size: size,
        })
    }

    /// 日志文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 当前字节偏移
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 上次 poll 观察到的文件大小
    pub fn last_known_size(&self) -> u64 {
        self.last_size
    }

    /// 读取自上次 poll 以来新增的完整行
    ///
    /// 若 `current_size < offset`，先置 reset 标志并把 offset 归零，
    /// 然后在同一次调用里从头读取变小后的文件。
    pub fn poll(&mut self) -> Result<TailPoll> {
        let current_size = std::fs::metadata(&self.path)
            .with_context(|| format!("cannot stat log file: {}", self.path.display()))?
            .len();

        let mut outcome = TailPoll::default();

        if current_size < self.offset {
            // 文件被截断或替换：新的游戏会话
            info!(
                path = %self.path.display(),
                old_offset = self.offset,
                current_size,
                "Log file shrank, treating as new session"
            );
            self.offset = 0;
            outcome.reset = true;
        }

        if current_size > self.offset {
            let mut file = File::open(&self.path)
                .with_context(|| format!("cannot open log file: {}", self.path.display()))?;
            file.seek(SeekFrom::Start(self.offset))?;

            let mut buf = Vec::with_capacity((current_size - self.offset) as usize);
            file.take(current_size - self.offset).read_to_end(&mut buf)?;

            // 只消费到最后一个换行符；尾部半行留给下一次 poll
            if let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') {
                let consumed = &buf[..=last_newline];
                // 无效字节做替换解码，解码问题从不中断读取
                let text = String::from_utf8_lossy(consumed);
                outcome.lines = text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect();
                self.offset += consumed.len() as u64;
                debug!(
                    consumed = consumed.len(),
                    lines = outcome.lines.len(),
                    offset = self.offset,
                    "Consumed appended log data"
                );
            }
        }

        self.last_size = current_size;
        Ok(outcome)
    }

    /// 从头重新读取整个文件
    ///
    /// 与真实截断不同，这是显式的全量重读，不发出 reset 信号。
    pub fn reprocess(&mut self) -> Result<Vec<String>> {
        self.offset = 0;
        // offset 为 0 时 poll 不可能触发截断检测
        let outcome = self.poll()?;
        Ok(outcome.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_new_missing_file_is_error() {
        let result = LogTailer::new("/nonexistent/Game.log", true);
        assert!(result.is_err());
    }

    #[test]
    fn test_read_existing_starts_at_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "first line").unwrap();

        let tailer = LogTailer::new(file.path(), true).unwrap();
        assert_eq!(tailer.offset(), 0);

        let tailer = LogTailer::new(file.path(), false).unwrap();
        // 从文件尾开始
        assert_eq!(tailer.offset(), file.path().metadata().unwrap().len());
    }

    #[test]
    fn test_partial_line_retained() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "complete line\npartial").unwrap();
        file.flush().unwrap();

        let mut tailer = LogTailer::new(file.path(), true).unwrap();
        let poll = tailer.poll().unwrap();
        assert_eq!(poll.lines, vec!["complete line".to_string()]);

        // 半行补全后，下一次 poll 才报出来
        write!(file, " now complete\n").unwrap();
        file.flush().unwrap();
        let poll = tailer.poll().unwrap();
        assert_eq!(poll.lines, vec!["partial now complete".to_string()]);
    }

    #[test]
    fn test_invalid_bytes_substituted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"good line\nbad \xff\xfe bytes\n").unwrap();
        file.flush().unwrap();

        let mut tailer = LogTailer::new(file.path(), true).unwrap();
        let poll = tailer.poll().unwrap();
        assert_eq!(poll.lines.len(), 2);
        assert!(poll.lines[1].contains('\u{FFFD}'));
    }
}
