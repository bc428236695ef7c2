//! 消费端配置 - 事件显示过滤与监控参数
//!
//! 过滤发生在事件产出之后、展示之前，核心解析不感知这些开关。
//! 配置的持久化归外层负责，这里只有内存结构。

use serde::{Deserialize, Serialize};

use crate::event::EventKind;

/// 事件显示过滤器（八个布尔开关）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventFilter {
    pub show_pvp_kills: bool,
    pub show_pve_kills: bool,
    /// 同时覆盖本地死亡与旁观死亡
    pub show_deaths: bool,
    pub show_vehicle_destroyed: bool,
    pub show_jumps: bool,
    pub show_corpses: bool,
    pub show_disconnects: bool,
    pub show_suicides: bool,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            show_pvp_kills: true,
            show_pve_kills: true,
            show_deaths: true,
            show_vehicle_destroyed: true,
            show_jumps: true,
            // 尸体确认噪音较大，默认关闭
            show_corpses: false,
            show_disconnects: true,
            show_suicides: true,
        }
    }
}

impl EventFilter {
    /// 判断某类事件是否展示
    ///
    /// ActorStall 没有对应开关，恒为展示。
    pub fn allows(&self, kind: &EventKind) -> bool {
        match kind {
            EventKind::PvpKill(_) => self.show_pvp_kills,
            EventKind::PveKill(_) => self.show_pve_kills,
            EventKind::Death(_) | EventKind::DeathOther(_) => self.show_deaths,
            EventKind::Suicide(_) => self.show_suicides,
            EventKind::VehicleDestroyed { .. } => self.show_vehicle_destroyed,
            EventKind::Corpse { .. } => self.show_corpses,
            EventKind::Jump { .. } => self.show_jumps,
            EventKind::Disconnect => self.show_disconnects,
            EventKind::ActorStall => true,
        }
    }
}

/// 监控参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 本地玩家 handle（大小写不敏感），可以不配置
    pub player_name: Option<String>,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 启动时是否处理已有内容
    pub read_existing: bool,
    /// 显示过滤
    pub filter: EventFilter,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            player_name: None,
            poll_interval_ms: 500,
            read_existing: false,
            filter: EventFilter::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CombatDetails;

    #[test]
    fn test_default_filter_hides_corpses_only() {
        let filter = EventFilter::default();
        assert!(!filter.allows(&EventKind::Corpse {
            victim: "Hero123".to_string()
        }));
        assert!(filter.allows(&EventKind::Disconnect));
        assert!(filter.allows(&EventKind::PvpKill(CombatDetails::default())));
    }

    #[test]
    fn test_death_other_follows_deaths_switch() {
        let filter = EventFilter {
            show_deaths: false,
            ..Default::default()
        };
        assert!(!filter.allows(&EventKind::Death(CombatDetails::default())));
        assert!(!filter.allows(&EventKind::DeathOther(CombatDetails::default())));
    }

    #[test]
    fn test_actor_stall_always_shown() {
        let filter = EventFilter {
            show_pvp_kills: false,
            show_pve_kills: false,
            show_deaths: false,
            show_vehicle_destroyed: false,
            show_jumps: false,
            show_corpses: false,
            show_disconnects: false,
            show_suicides: false,
        };
        assert!(filter.allows(&EventKind::ActorStall));
    }
}
