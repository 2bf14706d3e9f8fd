//! # Engine 模块
//!
//! 帧驱动的效果引擎。
//!
//! ## 每帧顺序
//!
//! ```text
//! frame(now)
//!   │
//!   ├── 1. 触发到期的延迟动作（清除全屏效果、阴影淡出/移除、恢复元素样式）
//!   ├── 2. 推进所有序列执行器，执行它们产生的动作
//!   ├── 3. 全局通道：清屏 → Lighter 混合 → 更新并绘制全局实例 → 恢复 SourceOver
//!   ├── 4. 局部效果：各自清空独占画布 → 更新 → 绘制或卸载
//!   └── 5. 推进元素动画并应用样式
//! ```
//!
//! 引擎单线程运行，所有等待都表示为截止时间，在帧时刻检查。

mod stage;
mod timers;

pub use stage::{ElementBox, Rect, ShadowClone, ShadowId, Stage};
pub use timers::TimerQueue;

use rand::RngCore;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::animation::{AnimationEvent, AnimationId, HtmlAnimationSpec, HtmlAnimator};
use crate::config::EngineConfig;
use crate::coord::{Coord, Position};
use crate::effect::{EffectFrame, EffectId, EffectInstance, EffectRegistry, RenderMode, SpawnOptions, StylePulse};
use crate::random::{FxRng, make_rng};
use crate::sequence::{RunnerId, ScreenEffect, Sequence, SequenceAction, SequenceRunner};
use crate::surface::{BlendMode, Surface};

/// 生成目标
#[derive(Debug, Clone, PartialEq)]
pub enum SpawnTarget<E> {
    /// 元素局部效果
    Element(E),
    /// 视口中的全局效果
    At(Position),
}

impl<E> SpawnTarget<E> {
    pub fn at(x: impl Into<Coord>, y: impl Into<Coord>) -> Self {
        Self::At(Position::new(x, y))
    }

    /// 视口中心
    pub fn center() -> Self {
        Self::At(Position::center())
    }
}

/// 单帧报告
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// 帧序号（从 1 开始）
    pub frame: u64,
    pub global_effects: usize,
    pub local_effects: usize,
    /// 本帧绘制的粒子总数
    pub particles: usize,
    pub runners: usize,
    pub animations: usize,
    /// 本帧结束的序列
    pub finished_runners: Vec<RunnerId>,
    /// 本帧结束的效果
    pub finished_effects: Vec<EffectId>,
    pub animation_events: Vec<AnimationEvent>,
}

impl FrameReport {
    /// 是否还有任何工作
    pub fn is_idle(&self) -> bool {
        self.global_effects == 0 && self.local_effects == 0 && self.runners == 0 && self.animations == 0
    }
}

/// 延迟动作
#[derive(Debug, Clone)]
enum DeferredAction<E> {
    ClearScreenEffect(ScreenEffect),
    FadeShadows(Vec<ShadowId>),
    RemoveShadows(Vec<ShadowId>),
    RestoreStyle { element: E, previous: String },
}

/// 元素局部效果：实例、独占画布和宿主元素
struct LocalEffect<H: Stage> {
    instance: EffectInstance,
    surface: H::Canvas,
    element: H::Element,
}

/// 效果引擎
pub struct Engine<H: Stage> {
    registry: Arc<EffectRegistry>,
    stage: H,
    config: EngineConfig,
    globals: BTreeMap<EffectId, EffectInstance>,
    locals: BTreeMap<EffectId, LocalEffect<H>>,
    runners: Vec<SequenceRunner>,
    animator: HtmlAnimator<H::Element>,
    timers: TimerQueue<DeferredAction<H::Element>>,
    rng: FxRng,
    /// 最近一帧的时刻
    clock: Duration,
    frame_count: u64,
    next_effect_id: u64,
    next_runner_id: u64,
    next_shadow_id: u64,
}

impl<H: Stage> fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("effects", &self.registry.len())
            .field("globals", &self.globals.len())
            .field("locals", &self.locals.len())
            .field("runners", &self.runners.len())
            .field("animator", &self.animator)
            .field("timers", &self.timers.len())
            .field("clock", &self.clock)
            .finish()
    }
}

impl<H: Stage> Engine<H> {
    pub fn new(stage: H, registry: Arc<EffectRegistry>, config: EngineConfig) -> Self {
        let rng = make_rng(config.rng_seed);
        Self {
            registry,
            stage,
            config,
            globals: BTreeMap::new(),
            locals: BTreeMap::new(),
            runners: Vec::new(),
            animator: HtmlAnimator::new(),
            timers: TimerQueue::new(),
            rng,
            clock: Duration::ZERO,
            frame_count: 0,
            next_effect_id: 1,
            next_runner_id: 1,
            next_shadow_id: 1,
        }
    }

    /// 使用内置效果库创建引擎
    pub fn with_builtin(stage: H, config: EngineConfig) -> Self {
        Self::new(stage, Arc::new(EffectRegistry::builtin()), config)
    }

    // ========== 查询 ==========

    pub fn stage(&self) -> &H {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut H {
        &mut self.stage
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 最近一帧的时刻
    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn global_count(&self) -> usize {
        self.globals.len()
    }

    pub fn local_count(&self) -> usize {
        self.locals.len()
    }

    /// 活跃效果总数（全局 + 局部）
    pub fn active_count(&self) -> usize {
        self.globals.len() + self.locals.len()
    }

    pub fn particle_count(&self) -> usize {
        let global: usize = self.globals.values().map(EffectInstance::particle_count).sum();
        let local: usize = self.locals.values().map(|l| l.instance.particle_count()).sum();
        global + local
    }

    pub fn runner_count(&self) -> usize {
        self.runners.len()
    }

    pub fn runner(&self, id: RunnerId) -> Option<&SequenceRunner> {
        self.runners.iter().find(|runner| runner.id() == id)
    }

    pub fn animation_count(&self) -> usize {
        self.animator.active_count()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// 查找效果实例（全局或局部）
    pub fn effect(&self, id: EffectId) -> Option<&EffectInstance> {
        self.globals
            .get(&id)
            .or_else(|| self.locals.get(&id).map(|local| &local.instance))
    }

    /// 局部效果的独占画布
    pub fn local_surface(&self, id: EffectId) -> Option<&H::Canvas> {
        self.locals.get(&id).map(|local| &local.surface)
    }

    /// 是否还有任何工作（效果、序列、动画、延迟动作）
    pub fn is_idle(&self) -> bool {
        self.globals.is_empty()
            && self.locals.is_empty()
            && self.runners.is_empty()
            && self.animator.is_empty()
            && self.timers.is_empty()
    }

    // ========== 生成 ==========

    /// 生成效果
    ///
    /// 全局目标的坐标在此时按视口解析一次；元素目标挂载一块独占画布。
    /// 未注册的效果名记录警告并返回 `None`，引擎状态不变。
    pub fn spawn(&mut self, name: &str, target: SpawnTarget<H::Element>, options: SpawnOptions) -> Option<EffectId> {
        let generator = match self.registry.lookup(name) {
            Ok(generator) => generator,
            Err(err) => {
                tracing::warn!(error = %err, "无法生成效果");
                return None;
            }
        };

        match target {
            SpawnTarget::At(position) => {
                let (cx, cy) = position.resolve(self.stage.viewport());
                let extent = self.config.global_frame;
                let frame = EffectFrame::centered(cx, cy, extent.width, extent.height);
                let mut instance = self.new_instance(RenderMode::Global, frame, options);
                generator(&mut instance);
                let id = instance.id();
                tracing::debug!(effect = %name, id = %id, x = cx, y = cy, "全局效果生成");
                self.globals.insert(id, instance);
                Some(id)
            }
            SpawnTarget::Element(element) => {
                let Some(extent) = self.stage.element_extent(&element) else {
                    tracing::warn!(effect = %name, element = ?element, "目标元素不存在");
                    return None;
                };
                let frame = EffectFrame::new(0.0, 0.0, extent.width, extent.height);
                let mut instance = self.new_instance(RenderMode::Local, frame, options);
                generator(&mut instance);
                let surface = self.stage.attach_local_surface(&element, extent);
                for pulse in instance.take_style_pulses() {
                    self.apply_pulse(&element, pulse);
                }
                let id = instance.id();
                tracing::debug!(effect = %name, id = %id, element = ?element, "局部效果生成");
                self.locals.insert(
                    id,
                    LocalEffect {
                        instance,
                        surface,
                        element,
                    },
                );
                Some(id)
            }
        }
    }

    fn new_instance(&mut self, mode: RenderMode, frame: EffectFrame, options: SpawnOptions) -> EffectInstance {
        let id = EffectId::new(self.next_effect_id);
        self.next_effect_id += 1;
        let rng = make_rng(Some(self.rng.next_u64()));
        EffectInstance::new(id, mode, frame, options, rng)
            .with_life(self.config.instance_life)
            .with_grace_ticks(self.config.local_grace_ticks)
    }

    // ========== 序列 ==========

    /// 启动序列
    ///
    /// 目标点按当前视口解析一次，作为未指定坐标的 VFX 的位置。
    /// `now` 是调用时刻（早于上一帧时按上一帧算），第一条命令的 delay 从这里开始；
    /// 启动时立即推进一次，开头的零延迟命令在本次调用中执行。
    pub fn run_sequence(&mut self, sequence: Sequence, target: Position, now: Duration) -> RunnerId {
        let id = RunnerId::new(self.next_runner_id);
        self.next_runner_id += 1;

        let launched_at = self.clock.max(now);
        let anchor = target.resolve(self.stage.viewport());
        let mut runner = SequenceRunner::new(id, sequence, anchor);
        let (actions, _) = runner.tick(launched_at);
        for action in actions {
            self.execute(action, launched_at);
        }
        self.runners.push(runner);
        id
    }

    fn tick_runners(&mut self) -> Vec<RunnerId> {
        let now = self.clock;
        let mut runners = std::mem::take(&mut self.runners);
        let mut finished = Vec::new();

        for runner in &mut runners {
            let (actions, wait) = runner.tick(now);
            for action in actions {
                self.execute(action, now);
            }
            if wait.is_completed() {
                finished.push(runner.id());
            }
        }

        runners.retain(|runner| !runner.is_completed());
        self.runners = runners;
        finished
    }

    /// 执行序列动作，延迟动作从 `at` 起算
    fn execute(&mut self, action: SequenceAction, at: Duration) {
        match action {
            SequenceAction::Spawn {
                effect,
                x,
                y,
                options,
            } => {
                self.spawn(&effect, SpawnTarget::At(Position { x, y }), options);
            }
            SequenceAction::SetOverlay(color) => self.stage.set_overlay(&color),
            SequenceAction::ScreenEffect { effect, duration_ms } => {
                self.stage.apply_screen_effect(effect);
                self.timers.schedule(
                    at + Duration::from_millis(duration_ms),
                    DeferredAction::ClearScreenEffect(effect),
                );
            }
            SequenceAction::SpawnShadows {
                selector,
                color,
                hold_ms,
            } => {
                let mut ids = Vec::new();
                for element in self.stage.query_elements(&selector) {
                    if element.rect.is_empty() {
                        continue;
                    }
                    let id = ShadowId::new(self.next_shadow_id);
                    self.next_shadow_id += 1;
                    self.stage.create_shadow(id, &ShadowClone::from_box(element, color.as_str()));
                    ids.push(id);
                }
                tracing::debug!(selector = %selector, count = ids.len(), "阴影克隆生成");
                if !ids.is_empty() {
                    self.timers.schedule(
                        at + Duration::from_millis(hold_ms),
                        DeferredAction::FadeShadows(ids),
                    );
                }
            }
        }
    }

    // ========== 元素样式 ==========

    fn apply_pulse(&mut self, element: &H::Element, pulse: StylePulse) {
        let previous = self.stage.pulse_element_style(element, &pulse.css);
        self.timers.schedule(
            self.clock + Duration::from_millis(pulse.duration_ms),
            DeferredAction::RestoreStyle {
                element: element.clone(),
                previous,
            },
        );
    }

    /// 开始元素动画
    pub fn animate_element(&mut self, element: H::Element, spec: HtmlAnimationSpec) -> AnimationId {
        let opacity = self.stage.element_opacity(&element);
        let width = self.stage.viewport().width;
        self.animator.start(element, spec, opacity, width)
    }

    /// 停止元素动画，元素保持当前样式
    pub fn stop_animation(&mut self, id: AnimationId) -> bool {
        self.animator.stop(id)
    }

    // ========== 帧 ==========

    /// 推进一帧
    pub fn frame(&mut self, now: Duration) -> FrameReport {
        let dt = now.saturating_sub(self.clock);
        self.clock = self.clock.max(now);
        self.frame_count += 1;

        self.fire_timers();
        let finished_runners = self.tick_runners();

        let mut finished_effects = self.step_globals();
        finished_effects.extend(self.step_locals());

        let stage = &mut self.stage;
        let animation_events = self
            .animator
            .update(dt.as_secs_f32(), |element, style| stage.apply_element_style(element, style));

        FrameReport {
            frame: self.frame_count,
            global_effects: self.globals.len(),
            local_effects: self.locals.len(),
            particles: self.particle_count(),
            runners: self.runners.len(),
            animations: self.animator.active_count(),
            finished_runners,
            finished_effects,
            animation_events,
        }
    }

    fn fire_timers(&mut self) {
        while let Some((deadline, action)) = self.timers.pop_due(self.clock) {
            match action {
                DeferredAction::ClearScreenEffect(effect) => self.stage.clear_screen_effect(effect),
                DeferredAction::FadeShadows(ids) => {
                    for id in &ids {
                        self.stage.fade_shadow(*id);
                    }
                    self.timers.schedule(
                        deadline + Duration::from_millis(self.config.shadow_fade_ms),
                        DeferredAction::RemoveShadows(ids),
                    );
                }
                DeferredAction::RemoveShadows(ids) => {
                    for id in ids {
                        self.stage.remove_shadow(id);
                    }
                }
                DeferredAction::RestoreStyle { element, previous } => {
                    self.stage.restore_element_style(&element, previous);
                }
            }
        }
    }

    fn step_globals(&mut self) -> Vec<EffectId> {
        let surface = self.stage.global_surface();
        surface.clear();
        surface.set_blend_mode(BlendMode::Lighter);

        let mut finished = Vec::new();
        for (id, instance) in &mut self.globals {
            if instance.update() {
                instance.render(&mut *surface);
            } else {
                finished.push(*id);
            }
        }
        surface.set_blend_mode(BlendMode::SourceOver);

        for id in &finished {
            self.globals.remove(id);
        }
        finished
    }

    fn step_locals(&mut self) -> Vec<EffectId> {
        let mut finished = Vec::new();
        let mut pulses = Vec::new();

        for (id, local) in &mut self.locals {
            local.surface.clear();
            if local.instance.update() {
                local.instance.render(&mut local.surface);
            } else {
                finished.push(*id);
            }
            for pulse in local.instance.take_style_pulses() {
                pulses.push((local.element.clone(), pulse));
            }
        }

        for (element, pulse) in pulses {
            self.apply_pulse(&element, pulse);
        }
        for id in &finished {
            if let Some(local) = self.locals.remove(id) {
                self.stage.detach_local_surface(&local.element, local.surface);
            }
        }
        finished
    }
}
