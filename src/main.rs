//! SC Log Monitor CLI
//!
//! 尾随 Star Citizen Game.log，把战斗/会话事件打到终端

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sc_log_monitor::{
    extract_player_name, format_event, EventFilter, GameEvent, LogWatcher, MonitorConfig,
};
use std::time::Duration;
use tracing::{error, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sclm")]
#[command(about = "SC Log Monitor - 尾随 Game.log 并解析战斗事件")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 持续监控日志文件并输出事件流
    Watch {
        /// Game.log 路径
        log_path: String,
        /// 轮询间隔（毫秒）
        #[arg(long, short, default_value = "500")]
        interval: u64,
        /// 从文件头开始处理已有内容（默认只看新写入）
        #[arg(long)]
        from_start: bool,
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// 一次性解析整个日志文件
    Parse {
        /// Game.log 路径
        log_path: String,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// 从日志头部识别本地玩家 handle
    Player {
        /// Game.log 路径
        log_path: String,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// 本地玩家 handle（大小写不敏感；不指定则尝试从日志自动识别）
    #[arg(long, short)]
    player: Option<String>,
    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,
}

/// 八个显示开关（默认：尸体确认关闭，其余开启）
#[derive(Args)]
struct FilterArgs {
    /// 隐藏 PvP 击杀
    #[arg(long)]
    no_pvp: bool,
    /// 隐藏 PvE 击杀
    #[arg(long)]
    no_pve: bool,
    /// 隐藏死亡（含旁观死亡）
    #[arg(long)]
    no_deaths: bool,
    /// 隐藏载具摧毁
    #[arg(long)]
    no_vehicles: bool,
    /// 隐藏量子跳跃
    #[arg(long)]
    no_jumps: bool,
    /// 显示尸体确认
    #[arg(long)]
    show_corpses: bool,
    /// 隐藏断线
    #[arg(long)]
    no_disconnects: bool,
    /// 隐藏自杀
    #[arg(long)]
    no_suicides: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> EventFilter {
        EventFilter {
            show_pvp_kills: !self.no_pvp,
            show_pve_kills: !self.no_pve,
            show_deaths: !self.no_deaths,
            show_vehicle_destroyed: !self.no_vehicles,
            show_jumps: !self.no_jumps,
            show_corpses: self.show_corpses,
            show_disconnects: !self.no_disconnects,
            show_suicides: !self.no_suicides,
        }
    }
}

/// 玩家名未指定时尝试从日志自动识别
fn resolve_player(log_path: &str, explicit: Option<String>) -> Option<String> {
    if explicit.is_some() {
        return explicit;
    }
    match extract_player_name(log_path) {
        Ok(Some(name)) => {
            println!("已从日志识别玩家: {}", name);
            Some(name)
        }
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "Player handle detection failed");
            None
        }
    }
}

fn print_event(event: &GameEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => error!(error = %e, "Event serialization failed"),
        }
    } else {
        println!("{}", format_event(event));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sc_log_monitor=info,sclm=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            log_path,
            interval,
            from_start,
            common,
            filters,
        } => {
            let config = MonitorConfig {
                player_name: resolve_player(&log_path, common.player),
                poll_interval_ms: interval,
                read_existing: from_start,
                filter: filters.to_filter(),
            };

            let mut watcher = LogWatcher::new();
            if let Err(e) = watcher.start(&log_path, config.read_existing) {
                eprintln!("无法开始监控: {}", e);
                std::process::exit(1);
            }

            println!(
                "开始监控: {} (间隔: {}毫秒, 玩家: {})",
                log_path,
                config.poll_interval_ms,
                config.player_name.as_deref().unwrap_or("未设置")
            );
            println!("按 Ctrl+C 停止\n");

            // 连续错误计数器：偶发 IO 失败重试，连续失败过多才放弃
            let mut consecutive_errors = 0;
            const MAX_CONSECUTIVE_ERRORS: u32 = 10;

            let mut ticker =
                tokio::time::interval(Duration::from_millis(config.poll_interval_ms));
            loop {
                ticker.tick().await;

                let outcome = match watcher.poll_once(config.player_name.as_deref()) {
                    Ok(outcome) => {
                        consecutive_errors = 0;
                        outcome
                    }
                    Err(e) => {
                        consecutive_errors += 1;
                        warn!(
                            error = %e,
                            consecutive = consecutive_errors,
                            max = MAX_CONSECUTIVE_ERRORS,
                            "Poll failed"
                        );
                        if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                            error!("Too many consecutive poll failures, stopping");
                            eprintln!("连续读取失败次数过多，停止监控");
                            watcher.stop();
                            std::process::exit(1);
                        }
                        continue;
                    }
                };

                if outcome.reset {
                    println!("--- 检测到日志重置（新游戏会话）---");
                }
                for event in &outcome.events {
                    if config.filter.allows(&event.kind) {
                        print_event(event, common.json);
                    }
                }
            }
        }
        Commands::Parse { log_path, common } => {
            let player = resolve_player(&log_path, common.player);

            let mut watcher = LogWatcher::new();
            watcher.start(&log_path, true)?;
            let events = watcher.reprocess(player.as_deref())?;
            watcher.stop();

            if common.json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                println!("解析出 {} 个事件:\n", events.len());
                for event in &events {
                    println!("{}", format_event(event));
                }
            }
        }
        Commands::Player { log_path } => match extract_player_name(&log_path)? {
            Some(name) => println!("{}", name),
            None => {
                eprintln!("未能从日志中识别玩家 handle");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
