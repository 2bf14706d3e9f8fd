//! # Driver 模块
//!
//! 以配置的帧率推进模拟时钟，驱动 [`Engine`] 的帧循环。
//!
//! ```text
//! Driver::step()
//!   ├─ clock += 1/fps
//!   ├─ engine.frame(clock) → FrameReport
//!   ├─ 统计峰值 / 绘制次数
//!   └─ 动画完成 → 启动已登记的后续动画
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use arcane_runtime::{
    AnimationEvent, AnimationId, EffectId, Engine, FrameReport, HtmlAnimationSpec, Position,
    RunnerId, Sequence, SpawnOptions, SpawnTarget,
};

use crate::config::AppConfig;
use crate::stage::HeadlessStage;

/// 一次播放的汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlaybackSummary {
    pub frames: u64,
    /// 模拟时间（毫秒）
    pub elapsed_ms: u64,
    pub peak_particles: usize,
    pub peak_effects: usize,
    /// 全局画布上的绘制次数
    pub painted: usize,
    pub runners_finished: usize,
    pub idle: bool,
}

/// 帧驱动器
pub struct Driver {
    engine: Engine<HeadlessStage>,
    frame_interval: Duration,
    clock: Duration,
    /// 动画完成后要启动的后续动画
    follow_ups: BTreeMap<AnimationId, (String, HtmlAnimationSpec)>,
    summary: PlaybackSummary,
}

impl Driver {
    pub fn new(config: &AppConfig) -> Self {
        let stage = HeadlessStage::from_config(config);
        let engine = Engine::with_builtin(stage, config.engine.clone());
        Self {
            engine,
            frame_interval: Duration::from_secs_f64(config.frame_interval_secs()),
            clock: Duration::ZERO,
            follow_ups: BTreeMap::new(),
            summary: PlaybackSummary::default(),
        }
    }

    pub fn engine(&self) -> &Engine<HeadlessStage> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<HeadlessStage> {
        &mut self.engine
    }

    pub fn stage(&self) -> &HeadlessStage {
        self.engine.stage()
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn summary(&self) -> PlaybackSummary {
        self.summary
    }

    // ========== 入口 ==========

    pub fn spawn_at(&mut self, name: &str, position: Position, options: SpawnOptions) -> Option<EffectId> {
        self.engine.spawn(name, SpawnTarget::At(position), options)
    }

    pub fn spawn_on(&mut self, name: &str, element: &str, options: SpawnOptions) -> Option<EffectId> {
        self.engine
            .spawn(name, SpawnTarget::Element(element.to_string()), options)
    }

    pub fn run_sequence(&mut self, sequence: Sequence, anchor: Position) -> RunnerId {
        self.engine.run_sequence(sequence, anchor, self.clock)
    }

    pub fn animate(&mut self, element: &str, spec: HtmlAnimationSpec) -> AnimationId {
        self.engine.animate_element(element.to_string(), spec)
    }

    /// 播放动画，完成后接着播放 `then`
    pub fn animate_then(
        &mut self,
        element: &str,
        spec: HtmlAnimationSpec,
        then: HtmlAnimationSpec,
    ) -> AnimationId {
        let id = self.animate(element, spec);
        self.follow_ups.insert(id, (element.to_string(), then));
        id
    }

    // ========== 帧循环 ==========

    /// 推进一帧
    pub fn step(&mut self) -> FrameReport {
        self.clock += self.frame_interval;
        let report = self.engine.frame(self.clock);

        let painted = self.engine.stage_mut().take_global_calls().len();
        self.summary.frames += 1;
        self.summary.elapsed_ms = self.clock.as_millis() as u64;
        self.summary.painted += painted;
        self.summary.peak_particles = self.summary.peak_particles.max(report.particles);
        self.summary.peak_effects = self
            .summary
            .peak_effects
            .max(report.global_effects + report.local_effects);
        self.summary.runners_finished += report.finished_runners.len();

        for event in &report.animation_events {
            match event {
                AnimationEvent::Completed(id) => {
                    if let Some((element, spec)) = self.follow_ups.remove(id) {
                        tracing::debug!(animation = %id, element = %element, "启动后续动画");
                        self.animate(&element, spec);
                    }
                }
                AnimationEvent::Stopped(id) => {
                    self.follow_ups.remove(id);
                }
            }
        }

        self.summary.idle = self.is_idle();
        report
    }

    pub fn is_idle(&self) -> bool {
        self.engine.is_idle() && self.follow_ups.is_empty()
    }

    /// 推进直到空闲，最多 `max_frames` 帧
    pub fn run_until_idle(&mut self, max_frames: u64) -> PlaybackSummary {
        for _ in 0..max_frames {
            if self.is_idle() {
                break;
            }
            self.step();
        }
        self.summary.idle = self.is_idle();
        if !self.summary.idle {
            tracing::warn!(frames = max_frames, "达到最大帧数，仍有未完成的工作");
        }
        self.summary
    }

    /// 推进指定的模拟时长
    pub fn run_for(&mut self, duration: Duration) -> PlaybackSummary {
        let until = self.clock + duration;
        while self.clock < until {
            self.step();
        }
        self.summary.idle = self.is_idle();
        self.summary
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("clock", &self.clock)
            .field("frame_interval", &self.frame_interval)
            .field("active", &self.engine.active_count())
            .field("follow_ups", &self.follow_ups.len())
            .finish()
    }
}
