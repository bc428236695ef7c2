//! 游戏事件模型 - Game.log 解析产物的类型定义

use serde::{Deserialize, Serialize};

/// 解析出的游戏事件
///
/// 公共信封（时间戳、原始行、是否涉及本地玩家）+ 按事件种类携带字段的
/// `EventKind`。每条成功分类的日志行恰好产生一个事件。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameEvent {
    /// 本地时钟格式的时间戳（HH:MM:SS）
    pub timestamp: String,
    /// 原始日志行
    pub raw_line: String,
    /// 是否涉及配置的本地玩家
    pub is_player_involved: bool,
    /// 事件种类与附带字段
    #[serde(flatten)]
    pub kind: EventKind,
}

/// 事件种类枚举
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventKind {
    /// 本地玩家击杀了另一名玩家
    PvpKill(CombatDetails),
    /// 击杀 NPC（本地玩家或旁观）
    PveKill(CombatDetails),
    /// 本地玩家死亡
    Death(CombatDetails),
    /// 其他玩家死亡（旁观）
    DeathOther(CombatDetails),
    /// 自杀（killer == victim）
    Suicide(CombatDetails),
    /// 载具/飞船摧毁
    VehicleDestroyed {
        vehicle_name: String,
        destruction_level: DestructionLevel,
    },
    /// 尸体确认
    Corpse { victim: String },
    /// 量子跳跃状态变化
    Jump { jump_state: String },
    /// 网络断线
    Disconnect,
    /// 客户端卡顿
    ActorStall,
}

/// 战斗事件的公共字段
///
/// 补充字段（武器、伤害类型、飞船、区域、方向）各自独立提取，
/// 缺失时保持 None，不影响事件分类。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CombatDetails {
    /// 击杀者
    pub killer: String,
    /// 受害者
    pub victim: String,
    /// 武器
    pub weapon: Option<String>,
    /// 伤害类型
    pub damage_type: Option<String>,
    /// 解析出的飞船名
    pub ship: Option<String>,
    /// 区域（zone 字符串原文）
    pub location: Option<String>,
    /// 伤害方向
    pub direction: Option<String>,
}

/// 载具摧毁等级
///
/// Soft = 失效（level 1），Full = 爆炸（level 2），
/// Unknown = 只匹配到载具 ID、没有 level 信息。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DestructionLevel {
    Soft,
    Full,
    Unknown,
}

impl std::fmt::Display for DestructionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DestructionLevel::Soft => "软死亡",
            DestructionLevel::Full => "完全摧毁",
            DestructionLevel::Unknown => "未知",
        };
        write!(f, "{}", label)
    }
}

/// 格式化事件为单行 feed 文本
pub fn format_event(event: &GameEvent) -> String {
    let body = match &event.kind {
        EventKind::PvpKill(d) => {
            let ship = d
                .ship
                .as_deref()
                .map(|s| format!("（{}）", s))
                .unwrap_or_default();
            format!("PvP 击杀: {} → {}{}", d.killer, d.victim, ship)
        }
        EventKind::PveKill(d) => format!("PvE 击杀: {} → {}", d.killer, d.victim),
        EventKind::Death(d) => {
            let damage = d
                .damage_type
                .as_deref()
                .map(|s| format!("（{}）", s))
                .unwrap_or_default();
            format!("死亡: 被 {} 击杀{}", d.killer, damage)
        }
        EventKind::DeathOther(d) => format!("死亡（旁观）: {} 被 {} 击杀", d.victim, d.killer),
        EventKind::Suicide(d) => format!("自杀: {}", d.victim),
        EventKind::VehicleDestroyed {
            vehicle_name,
            destruction_level,
        } => format!("载具摧毁: {}（{}）", vehicle_name, destruction_level),
        EventKind::Corpse { victim } => format!("尸体确认: {}", victim),
        EventKind::Jump { jump_state } => format!("量子跳跃: {}", jump_state),
        EventKind::Disconnect => "网络断线".to_string(),
        EventKind::ActorStall => "客户端卡顿".to_string(),
    };

    if event.is_player_involved {
        format!("[{}] * {}", event.timestamp, body)
    } else {
        format!("[{}] {}", event.timestamp, body)
    }
}
