//! 玩家识别模块 - 从日志头部自动提取本地玩家 handle
//!
//! 登录信息通常出现在会话最开始的几千行内，只扫描文件头部即可。

use anyhow::{Context, Result};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// 登录状态行里的角色名字段
static RE_CHARACTER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"m_characterName=(\S+)").expect("invalid character name pattern"));

/// 备用：SetNickname 行
static RE_SET_NICKNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SetNickname\s+(\S+)").expect("invalid nickname pattern"));

/// 扫描的最大行数
const MAX_SCAN_LINES: usize = 5000;

/// 从日志头部提取本地玩家 handle
///
/// 依次尝试 `m_characterName=`（须与 `m_loginId=` 同行）与 `SetNickname`，
/// 都没有命中返回 Ok(None)。文件不可读才返回错误。
pub fn extract_player_name(path: impl AsRef<Path>) -> Result<Option<String>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("cannot open log file: {}", path.display()))?;
    let reader = BufReader::new(file);

    for (index, line) in reader.lines().enumerate() {
        if index > MAX_SCAN_LINES {
            break;
        }
        // 解码失败的行直接跳过，继续向下找
        let Ok(line) = line else { continue };

        if line.contains("m_loginId=") {
            if let Some(caps) = RE_CHARACTER_NAME.captures(&line) {
                let name = caps[1].to_string();
                debug!(name = %name, "Player handle found via login status line");
                return Ok(Some(name));
            }
        }

        if let Some(caps) = RE_SET_NICKNAME.captures(&line) {
            let name = caps[1].to_string();
            debug!(name = %name, "Player handle found via SetNickname");
            return Ok(Some(name));
        }
    }

    Ok(None)
}
