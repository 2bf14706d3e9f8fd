//! # Arcane
//!
//! 特效引擎的命令行宿主。
//!
//! ## 用法
//!
//! ```bash
//! arcane list
//! arcane spawn fire_burst --x 50% --y 50%
//! arcane spawn earth_shield --element earth_shield --color "#88ff88"
//! arcane play --showcase
//! arcane play sequence.json --x 25% --y 75%
//! arcane animate
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use arcane_host::showcase::{self, CARD_EFFECTS};
use arcane_host::{AppConfig, Driver, PlaybackSummary};
use arcane_runtime::{Coord, Position, Sequence, SpawnOptions};

#[derive(Parser)]
#[command(name = "arcane")]
#[command(about = "粒子特效引擎 - 无界面宿主")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件（默认：arcane.json）
    #[arg(short, long, default_value = "arcane.json", global = true)]
    config: PathBuf,

    /// 输出更详细的日志（可重复）
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出所有已注册的效果
    List,

    /// 生成一个效果并播放到结束
    Spawn {
        /// 效果名
        name: String,

        /// 横坐标（像素或百分比，默认：50%）
        #[arg(long, default_value = "50%")]
        x: String,

        /// 纵坐标（像素或百分比，默认：50%）
        #[arg(long, default_value = "50%")]
        y: String,

        /// 在元素上生成局部效果（元素 ID）
        #[arg(short, long)]
        element: Option<String>,

        /// 覆盖主颜色
        #[arg(long)]
        color: Option<String>,

        /// 粒子尺寸倍率
        #[arg(long)]
        scale: Option<f32>,

        /// 最长模拟时间（毫秒）
        #[arg(long, default_value = "10000")]
        max_ms: u64,
    },

    /// 播放序列文件
    Play {
        /// 序列 JSON 文件
        file: Option<PathBuf>,

        /// 播放内置的完整冲击序列
        #[arg(long)]
        showcase: bool,

        /// 锚点横坐标
        #[arg(long, default_value = "50%")]
        x: String,

        /// 锚点纵坐标
        #[arg(long, default_value = "50%")]
        y: String,
    },

    /// 播放所有卡片的弹出/回弹动画
    Animate,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config);
    config.validate().context("配置校验失败")?;

    match cli.command {
        Commands::List => list_effects(&config),
        Commands::Spawn {
            name,
            x,
            y,
            element,
            color,
            scale,
            max_ms,
        } => {
            let mut options = SpawnOptions::default();
            if let Some(color) = color {
                options = options.with_color(color);
            }
            if let Some(scale) = scale {
                options = options.with_scale(scale);
            }
            spawn_effect(&config, &name, position(&x, &y), element.as_deref(), options, max_ms)
        }
        Commands::Play {
            file,
            showcase: builtin,
            x,
            y,
        } => {
            let sequence = match (file, builtin) {
                (_, true) => showcase::ultimate_sequence()?,
                (Some(path), false) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("无法读取序列文件: {}", path.display()))?;
                    Sequence::from_json(&text)?
                }
                (None, false) => bail!("需要序列文件或 --showcase"),
            };
            play_sequence(&config, sequence, position(&x, &y))
        }
        Commands::Animate => animate_cards(&config),
    }
}

fn position(x: &str, y: &str) -> Position {
    Position::new(Coord::parse_lenient(x), Coord::parse_lenient(y))
}

fn list_effects(config: &AppConfig) -> Result<()> {
    let driver = Driver::new(config);
    let registry = driver.engine().registry();
    println!("📦 已注册 {} 个效果:", registry.len());
    for name in registry.names() {
        let marker = if CARD_EFFECTS.iter().any(|card| *card == name) { "  [卡片]" } else { "" };
        println!("  {}{}", name, marker);
    }
    Ok(())
}

fn spawn_effect(
    config: &AppConfig,
    name: &str,
    at: Position,
    element: Option<&str>,
    options: SpawnOptions,
    max_ms: u64,
) -> Result<()> {
    let mut driver = Driver::new(config);
    if !driver.engine().registry().contains(name) {
        bail!("未知效果: {}", name);
    }

    let spawned = match element {
        Some(element) => driver.spawn_on(name, element, options),
        None => driver.spawn_at(name, at, options),
    };
    let Some(id) = spawned else {
        bail!("效果 {} 未能生成", name);
    };
    println!("✨ {} → {}", name, id);

    let summary = driver.run_until_idle(frames_for(config, max_ms));
    print_summary(&summary);
    Ok(())
}

fn play_sequence(config: &AppConfig, sequence: Sequence, anchor: Position) -> Result<()> {
    let mut driver = Driver::new(config);
    println!(
        "🎬 播放序列: {} 条命令，总延迟 {}ms",
        sequence.len(),
        sequence.total_delay().as_millis()
    );
    let id = driver.run_sequence(sequence, anchor);
    tracing::info!(runner = %id, "序列已启动");

    let summary = driver.run_until_idle(frames_for(config, 60_000));
    let stage = driver.stage();
    println!("🎨 覆盖层变化: {}", stage.overlay_history().join(" → "));
    println!("👥 阴影克隆: {}", stage.stats().shadows_created);
    print_summary(&summary);
    Ok(())
}

fn animate_cards(config: &AppConfig) -> Result<()> {
    let mut driver = Driver::new(config);
    for (index, card) in CARD_EFFECTS.iter().enumerate() {
        let jitter = index as f32 / CARD_EFFECTS.len() as f32;
        driver.animate_then(card, showcase::pop_out(jitter), showcase::settle_back());
    }
    println!("💫 {} 张卡片开始动画", CARD_EFFECTS.len());

    let summary = driver.run_until_idle(frames_for(config, 10_000));
    println!("🖌️ 样式更新: {}", driver.stage().stats().style_updates);
    print_summary(&summary);
    Ok(())
}

fn frames_for(config: &AppConfig, ms: u64) -> u64 {
    (ms as f64 / 1000.0 * config.fps as f64).ceil() as u64
}

fn print_summary(summary: &PlaybackSummary) {
    match serde_json::to_string_pretty(summary) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!(error = %e, "无法序列化播放汇总"),
    }
    if summary.idle {
        println!("✅ 播放完成");
    } else {
        println!("⚠️ 达到时间上限，仍有未完成的工作");
    }
}
