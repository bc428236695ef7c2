//! SC Log Monitor - 尾随 Star Citizen Game.log 并解析战斗/会话事件

pub mod config;
pub mod event;
pub mod lookup;
pub mod parser;
pub mod player;
pub mod tailer;
pub mod watcher;

pub use config::{EventFilter, MonitorConfig};
pub use event::{format_event, CombatDetails, DestructionLevel, EventKind, GameEvent};
pub use lookup::{is_npc, resolve_ship_name};
pub use parser::EventParser;
pub use player::extract_player_name;
pub use tailer::{LogTailer, TailPoll};
pub use watcher::{LogWatcher, WatchOutcome};
