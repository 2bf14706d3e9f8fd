//! # Runner 模块
//!
//! 序列执行器：按顺序派发命令，在命令之间等待。
//!
//! ## 执行模型
//!
//! ```text
//! tick(now) -> (Vec<SequenceAction>, RunnerWait)
//!       │
//!       ├── Idle ──► Running { index: 0, cursor: now }
//!       │
//!       ├── Running
//!       │     ├── 挂起中且 now < until ──► WaitUntil(until)
//!       │     ├── 挂起到期 ──► cursor = now，执行 on_resume
//!       │     └── 派发 commands[index]，可能再次挂起
//!       │
//!       └── 命令耗尽 ──► SetOverlay(transparent) ──► Completed
//! ```
//!
//! 每条命令的 delay 从它实际执行的时刻算起：迟到的帧只会推迟后续命令，
//! 不会让多条到期命令挤在同一帧里执行。序列总耗时不小于所有 delay 之和。

use std::fmt;
use std::time::Duration;

use crate::color::{TRANSPARENT, is_sustained_black};
use crate::coord::Coord;
use crate::effect::SpawnOptions;
use crate::error::FxError;

use super::command::{ScreenEffect, Sequence, SequenceCommand};

/// 执行器 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunnerId(pub u64);

impl RunnerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seq#{}", self.0)
    }
}

/// 执行器产生的动作，由引擎对 Stage 执行
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceAction {
    /// 生成全局效果
    Spawn {
        effect: String,
        x: Coord,
        y: Coord,
        options: SpawnOptions,
    },
    /// 设置覆盖层背景
    SetOverlay(String),
    /// 施加全屏效果，持续 duration_ms 后移除
    ScreenEffect {
        effect: ScreenEffect,
        duration_ms: u64,
    },
    /// 生成阴影克隆，保持 hold_ms 后淡出
    SpawnShadows {
        selector: String,
        color: String,
        hold_ms: u64,
    },
}

/// 执行器等待状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerWait {
    /// 等到指定时刻再 tick
    WaitUntil(Duration),
    /// 已完成
    Completed,
}

impl RunnerWait {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// 挂起：等待截止时间，恢复时先执行 on_resume
#[derive(Debug, Clone, PartialEq)]
pub struct Suspension {
    pub until: Duration,
    pub on_resume: Vec<SequenceAction>,
}

/// 执行器状态
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RunnerState {
    /// 尚未开始
    #[default]
    Idle,
    /// 执行中
    Running {
        /// 下一条要派发的命令
        index: usize,
        /// 当前时间线位置
        cursor: Duration,
        suspended: Option<Suspension>,
    },
    /// 已完成
    Completed,
}

/// 序列执行器
#[derive(Debug, Clone)]
pub struct SequenceRunner {
    id: RunnerId,
    sequence: Sequence,
    /// 序列目标点（视口像素），VFX 未指定坐标时使用
    anchor: (f32, f32),
    state: RunnerState,
}

impl SequenceRunner {
    pub fn new(id: RunnerId, sequence: Sequence, anchor: (f32, f32)) -> Self {
        Self {
            id,
            sequence,
            anchor,
            state: RunnerState::Idle,
        }
    }

    pub fn id(&self) -> RunnerId {
        self.id
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// 下一条要派发的命令索引
    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            RunnerState::Running { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, RunnerState::Completed)
    }

    /// 推进执行器
    ///
    /// 派发所有已到期的命令，返回产生的动作以及下一次需要 tick 的时刻。
    pub fn tick(&mut self, now: Duration) -> (Vec<SequenceAction>, RunnerWait) {
        let mut actions = Vec::new();

        loop {
            match &mut self.state {
                RunnerState::Idle => {
                    tracing::debug!(runner = %self.id, commands = self.sequence.len(), "序列开始");
                    self.state = RunnerState::Running {
                        index: 0,
                        cursor: now,
                        suspended: None,
                    };
                }
                RunnerState::Completed => return (actions, RunnerWait::Completed),
                RunnerState::Running {
                    index,
                    cursor,
                    suspended,
                } => {
                    if let Some(until) = suspended.as_ref().map(|s| s.until) {
                        if now < until {
                            return (actions, RunnerWait::WaitUntil(until));
                        }
                    }
                    if let Some(suspension) = suspended.take() {
                        *cursor = now;
                        actions.extend(suspension.on_resume);
                    }

                    let Some(command) = self.sequence.commands().get(*index) else {
                        actions.push(SequenceAction::SetOverlay(TRANSPARENT.to_string()));
                        tracing::debug!(runner = %self.id, "序列完成");
                        self.state = RunnerState::Completed;
                        continue;
                    };
                    *index += 1;
                    *suspended = dispatch(command, *cursor, self.anchor, &mut actions);
                }
            }
        }
    }
}

/// 派发单条命令，返回需要的挂起
fn dispatch(
    command: &SequenceCommand,
    cursor: Duration,
    anchor: (f32, f32),
    actions: &mut Vec<SequenceAction>,
) -> Option<Suspension> {
    let delay = command.delay();
    let wait = |on_resume: Vec<SequenceAction>| Suspension {
        until: cursor + delay,
        on_resume,
    };

    match command {
        SequenceCommand::Vfx {
            effect,
            x,
            y,
            options,
            ..
        } => {
            actions.push(SequenceAction::Spawn {
                effect: effect.clone(),
                x: x.unwrap_or(Coord::Px(anchor.0)),
                y: y.unwrap_or(Coord::Px(anchor.1)),
                options: options.clone(),
            });
            (!delay.is_zero()).then(|| wait(Vec::new()))
        }
        SequenceCommand::ImpactFrame {
            delay_ms,
            color,
            screen_effect,
        } => {
            if !screen_effect.is_none() {
                actions.push(SequenceAction::ScreenEffect {
                    effect: *screen_effect,
                    duration_ms: *delay_ms,
                });
            }
            actions.push(SequenceAction::SetOverlay(color.clone()));

            // 黑色冲击帧保持到序列结束
            let on_resume = if is_sustained_black(color) {
                Vec::new()
            } else {
                vec![SequenceAction::SetOverlay(TRANSPARENT.to_string())]
            };
            Some(wait(on_resume))
        }
        SequenceCommand::Wait { .. } => Some(wait(Vec::new())),
        SequenceCommand::Shadow {
            delay_ms,
            selector,
            color,
        } => {
            actions.push(SequenceAction::SpawnShadows {
                selector: selector.clone(),
                color: color.clone(),
                hold_ms: *delay_ms,
            });
            (!delay.is_zero()).then(|| wait(Vec::new()))
        }
        SequenceCommand::Unknown { kind, .. } => {
            let err = FxError::UnknownCommand { kind: kind.clone() };
            tracing::warn!(error = %err, "跳过序列命令");
            None
        }
    }
}
