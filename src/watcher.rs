//! 日志监控模块 - 组合尾随器与解析器，对外提供事件流
//!
//! 单一协作循环模型：外部定时器调用 `poll_once`，尾随与解析都在
//! 调用内同步完成，没有后台线程和锁。

use anyhow::Result;
use tracing::{debug, info};

use crate::event::GameEvent;
use crate::parser::EventParser;
use crate::tailer::LogTailer;

/// 一次 poll 的产出
#[derive(Debug, Default)]
pub struct WatchOutcome {
    /// 按日志顺序产出的事件
    pub events: Vec<GameEvent>,
    /// 是否检测到日志截断（新会话）；逻辑上先于 events
    pub reset: bool,
}

/// 日志监控器
///
/// 玩家名不做缓存，每次调用由调用方传入当时的值（运行期可变）。
pub struct LogWatcher {
    tailer: Option<LogTailer>,
    parser: EventParser,
}

impl LogWatcher {
    /// 创建未启动的监控器
    pub fn new() -> Self {
        Self {
            tailer: None,
            parser: EventParser::new(),
        }
    }

    /// 开始监控日志文件
    ///
    /// 这是唯一把错误抛给调用方的操作：文件不存在时监控无法开始，
    /// 由调用方上报并允许重试（例如重新选择路径）。
    pub fn start(&mut self, path: &str, read_existing: bool) -> Result<()> {
        self.stop();
        self.tailer = Some(LogTailer::new(path, read_existing)?);
        info!(path, read_existing, "Log monitoring started");
        Ok(())
    }

    /// 停止监控；幂等，未启动时调用也安全
    pub fn stop(&mut self) {
        if self.tailer.take().is_some() {
            info!("Log monitoring stopped");
        }
    }

    /// 是否正在监控
    pub fn is_running(&self) -> bool {
        self.tailer.is_some()
    }

    /// 执行一次尾随 + 解析
    ///
    /// 未启动时返回空产出。读文件失败向上传播，由调用方决定重试。
    pub fn poll_once(&mut self, player_name: Option<&str>) -> Result<WatchOutcome> {
        let Some(tailer) = self.tailer.as_mut() else {
            return Ok(WatchOutcome::default());
        };

        let poll = tailer.poll()?;
        let events = self.parser.parse_lines(&poll.lines, player_name);
        if !events.is_empty() {
            debug!(lines = poll.lines.len(), events = events.len(), "Poll produced events");
        }

        Ok(WatchOutcome {
            events,
            reset: poll.reset,
        })
    }

    /// 从头重读整个日志并返回全部可分类事件；不发 reset 信号
    pub fn reprocess(&mut self, player_name: Option<&str>) -> Result<Vec<GameEvent>> {
        let Some(tailer) = self.tailer.as_mut() else {
            return Ok(Vec::new());
        };

        let lines = tailer.reprocess()?;
        info!(lines = lines.len(), "Reprocessing whole log file");
        Ok(self.parser.parse_lines(&lines, player_name))
    }

    /// 解析一条外部送入的原始行
    pub fn feed(&self, line: &str, player_name: Option<&str>) -> Option<GameEvent> {
        self.parser.parse_line(line, player_name)
    }
}

impl Default for LogWatcher {
    fn default() -> Self {
        Self::new()
    }
}
