//! 事件解析模块 - 将 Game.log 行分类为结构化游戏事件
//!
//! 按固定优先级依次尝试各类别的模式规则：先用主模式提取字段，
//! 失败时退回同类别的宽松模式（容忍日志版本间的格式漂移）。
//! 无法分类的行不产生事件，也不报错。

use chrono::{DateTime, Local, NaiveDateTime};
use regex::Regex;

use crate::event::{CombatDetails, DestructionLevel, EventKind, GameEvent};
use crate::lookup::{is_npc, resolve_ship_name};

/// 模式类别（枚举顺序即匹配优先级）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleCategory {
    ActorDeath,
    VehicleDestruction,
    Corpse,
    JumpDrive,
    Disconnect,
    ActorStall,
}

/// 单个类别的模式规则
///
/// fallback 只在行内含 tag_marker、而主模式未命中时启用。
struct PatternRule {
    category: RuleCategory,
    tag_marker: &'static str,
    primary: Regex,
    fallback: Option<Regex>,
}

/// Game.log 事件解析器
///
/// 规则表与补充字段正则在构造时编译一次，解析本身无状态。
pub struct EventParser {
    rules: Vec<PatternRule>,
    re_timestamp: Regex,
    re_weapon: Regex,
    re_damage_type: Regex,
    re_damage_type_alt: Regex,
    re_zone: Regex,
    re_direction: Regex,
}

impl EventParser {
    /// 创建解析器，编译全部模式
    pub fn new() -> Self {
        let rules = vec![
            // Actor Death: 击杀/死亡主事件
            PatternRule {
                category: RuleCategory::ActorDeath,
                tag_marker: "<Actor Death>",
                primary: Regex::new(
                    r"(?i)<Actor Death>.*?CActor::Kill:\s*'([^']+)'.*?killed by\s*'([^']+)'",
                )
                .expect("invalid actor death pattern"),
                fallback: Some(
                    Regex::new(r"(?i)<Actor Death>.*?'([^']+)'\s+killed\s+by\s+'([^']+)'")
                        .expect("invalid actor death fallback pattern"),
                ),
            },
            // Vehicle Destruction: 主模式要求 level N to M，兜底只取载具 ID
            PatternRule {
                category: RuleCategory::VehicleDestruction,
                tag_marker: "<Vehicle Destruction>",
                primary: Regex::new(
                    r"(?i)<Vehicle Destruction>.*?'([^']+)'.*?level\s*(\d+)\s*(?:to|->)\s*(\d+)",
                )
                .expect("invalid vehicle destruction pattern"),
                fallback: Some(
                    Regex::new(r"(?i)<Vehicle Destruction>.*?'([^']+)'")
                        .expect("invalid vehicle destruction fallback pattern"),
                ),
            },
            PatternRule {
                category: RuleCategory::Corpse,
                tag_marker: "<Corpse>",
                primary: Regex::new(r"(?i)<Corpse>.*?'([^']+)'").expect("invalid corpse pattern"),
                fallback: None,
            },
            PatternRule {
                category: RuleCategory::JumpDrive,
                tag_marker: "<Jump Drive Changing State>",
                primary: Regex::new(
                    r"(?i)<Jump Drive Changing State>.*?from\s+(\w+)\s+to\s+(\w+)",
                )
                .expect("invalid jump drive pattern"),
                fallback: None,
            },
            PatternRule {
                category: RuleCategory::Disconnect,
                tag_marker: "<Disconnect>",
                primary: Regex::new(r"(?i)<Disconnect>|disconnect|CNetworkError|Server\s+disconnect")
                    .expect("invalid disconnect pattern"),
                fallback: None,
            },
            PatternRule {
                category: RuleCategory::ActorStall,
                tag_marker: "<Actor Stall>",
                primary: Regex::new(r"(?i)<Actor Stall>|ActorStall")
                    .expect("invalid actor stall pattern"),
                fallback: None,
            },
        ];

        Self {
            rules,
            re_timestamp: Regex::new(r"^<(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2})")
                .expect("invalid timestamp pattern"),
            re_weapon: Regex::new(r"(?i)weapon[=:]\s*'?([^'\s,;]+)")
                .expect("invalid weapon pattern"),
            re_damage_type: Regex::new(r"(?i)with\s+damage\s+type\s*'([^']*)'")
                .expect("invalid damage type pattern"),
            re_damage_type_alt: Regex::new(r"(?i)damage[_ ]type[=:]\s*'?([^'\s,]+)")
                .expect("invalid damage type fallback pattern"),
            re_zone: Regex::new(r"(?i)in\s+zone\s*'([^']*)'").expect("invalid zone pattern"),
            re_direction: Regex::new(r"(?i)direction[=:]\s*\(?([^)]+)\)?")
                .expect("invalid direction pattern"),
        }
    }

    /// 解析单行（纯函数版本）
    ///
    /// `now` 只用于时间戳缺失/无法解析时的兜底，显式传入以保证可复现。
    /// 未识别或畸形的行返回 None，绝不报错。
    pub fn parse_line_at(
        &self,
        line: &str,
        player_name: Option<&str>,
        now: DateTime<Local>,
    ) -> Option<GameEvent> {
        let line = line.trim();
        if line.len() < 10 {
            return None;
        }

        let timestamp = self.extract_timestamp(line, now);

        for rule in &self.rules {
            let caps = rule.primary.captures(line).or_else(|| {
                // 行里有类别标记但主模式没提取出字段，退回宽松模式
                rule.fallback
                    .as_ref()
                    .filter(|_| line.contains(rule.tag_marker))
                    .and_then(|re| re.captures(line))
            });
            if let Some(caps) = caps {
                return self.build_event(rule.category, &caps, line, player_name, timestamp);
            }
        }

        None
    }

    /// 解析单行，时间戳兜底取当前墙钟
    pub fn parse_line(&self, line: &str, player_name: Option<&str>) -> Option<GameEvent> {
        self.parse_line_at(line, player_name, Local::now())
    }

    /// 批量解析，丢弃未识别的行
    pub fn parse_lines(&self, lines: &[String], player_name: Option<&str>) -> Vec<GameEvent> {
        lines
            .iter()
            .filter_map(|line| self.parse_line(line, player_name))
            .collect()
    }

    /// 提取行首的 `<YYYY-MM-DDTHH:MM:SS…>` 时间戳并转成本地时钟格式
    fn extract_timestamp(&self, line: &str, now: DateTime<Local>) -> String {
        if let Some(caps) = self.re_timestamp.captures(line) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&caps[1], "%Y-%m-%dT%H:%M:%S") {
                return dt.format("%H:%M:%S").to_string();
            }
        }
        now.format("%H:%M:%S").to_string()
    }

    fn build_event(
        &self,
        category: RuleCategory,
        caps: &regex::Captures<'_>,
        line: &str,
        player_name: Option<&str>,
        timestamp: String,
    ) -> Option<GameEvent> {
        match category {
            RuleCategory::ActorDeath => self.build_death_event(caps, line, player_name, timestamp),
            RuleCategory::VehicleDestruction => {
                let vehicle_id = caps[1].trim();
                // 兜底模式没有 level 分组，摧毁等级未知
                let destruction_level = match caps.get(3) {
                    Some(level_to) => {
                        if level_to.as_str() == "2" {
                            DestructionLevel::Full
                        } else {
                            DestructionLevel::Soft
                        }
                    }
                    None => DestructionLevel::Unknown,
                };
                let vehicle_name =
                    resolve_ship_name(vehicle_id).unwrap_or_else(|| vehicle_id.to_string());

                Some(GameEvent {
                    timestamp,
                    raw_line: line.to_string(),
                    is_player_involved: false,
                    kind: EventKind::VehicleDestroyed {
                        vehicle_name,
                        destruction_level,
                    },
                })
            }
            RuleCategory::Corpse => {
                let victim = caps[1].trim().to_string();
                let is_player_involved = name_matches(&victim, player_name);
                Some(GameEvent {
                    timestamp,
                    raw_line: line.to_string(),
                    is_player_involved,
                    kind: EventKind::Corpse { victim },
                })
            }
            RuleCategory::JumpDrive => {
                let jump_state = format!("{} → {}", &caps[1], &caps[2]);
                Some(GameEvent {
                    timestamp,
                    raw_line: line.to_string(),
                    is_player_involved: false,
                    kind: EventKind::Jump { jump_state },
                })
            }
            RuleCategory::Disconnect => Some(GameEvent {
                timestamp,
                raw_line: line.to_string(),
                is_player_involved: false,
                kind: EventKind::Disconnect,
            }),
            RuleCategory::ActorStall => Some(GameEvent {
                timestamp,
                raw_line: line.to_string(),
                is_player_involved: false,
                kind: EventKind::ActorStall,
            }),
        }
    }

    /// 击杀/死亡分类
    ///
    /// NPC 对 NPC 的噪音（双方都不是本地玩家且都命中 NPC 启发式）被抑制，
    /// 不产生事件。
    fn build_death_event(
        &self,
        caps: &regex::Captures<'_>,
        line: &str,
        player_name: Option<&str>,
        timestamp: String,
    ) -> Option<GameEvent> {
        let victim = caps[1].trim().to_string();
        let killer = caps[2].trim().to_string();

        // 补充字段各自独立提取，缺了不影响分类
        let weapon = self
            .re_weapon
            .captures(line)
            .map(|c| c[1].to_string());
        let damage_type = self
            .re_damage_type
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.re_damage_type_alt
                    .captures(line)
                    .map(|c| c[1].to_string())
            });
        let location = self
            .re_zone
            .captures(line)
            .map(|c| c[1].trim().to_string())
            .filter(|s| !s.is_empty());
        let ship = location.as_deref().and_then(resolve_ship_name);
        let direction = self
            .re_direction
            .captures(line)
            .map(|c| c[1].trim().to_string());

        let details = CombatDetails {
            killer: killer.clone(),
            victim: victim.clone(),
            weapon,
            damage_type,
            ship,
            location,
            direction,
        };

        // 自杀优先判定，不看 NPC 启发式
        if killer.to_lowercase() == victim.to_lowercase() {
            let is_player_involved = name_matches(&killer, player_name);
            return Some(GameEvent {
                timestamp,
                raw_line: line.to_string(),
                is_player_involved,
                kind: EventKind::Suicide(details),
            });
        }

        let killer_is_local = name_matches(&killer, player_name);
        let victim_is_local = name_matches(&victim, player_name);

        let kind = if victim_is_local {
            EventKind::Death(details)
        } else if killer_is_local {
            if is_npc(&victim) {
                EventKind::PveKill(details)
            } else {
                EventKind::PvpKill(details)
            }
        } else if is_npc(&killer) && is_npc(&victim) {
            // 纯 NPC 互杀，抑制
            return None;
        } else if is_npc(&victim) {
            EventKind::PveKill(details)
        } else {
            EventKind::DeathOther(details)
        };

        Some(GameEvent {
            timestamp,
            raw_line: line.to_string(),
            is_player_involved: killer_is_local || victim_is_local,
            kind,
        })
    }
}

impl Default for EventParser {
    fn default() -> Self {
        Self::new()
    }
}

/// 名字与玩家 handle 的大小写不敏感比较；未配置玩家时恒为 false
fn name_matches(name: &str, player_name: Option<&str>) -> bool {
    player_name.map_or(false, |p| name.to_lowercase() == p.to_lowercase())
}
