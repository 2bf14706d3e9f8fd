//! # EffectInstance 模块
//!
//! 效果实例：一组粒子、可选的持续发射器、分段波次和实例寿命。
//!
//! ## 两种渲染模式
//!
//! - `Global`：绘制到引擎共享的全视口表面，由引擎统一合成
//! - `Local`：独占一块覆盖在元素上的表面，每帧清空重绘
//!
//! ## 更新顺序
//!
//! ```text
//! life -= 1
//! life > 0 且有发射器 -> 调用发射器一次
//! 释放到期的波次
//! 所有粒子推进一帧
//! 移除 life <= 0 的粒子
//! 返回 is_active()
//! ```

use rand::RngCore;
use std::fmt;

use super::SpawnOptions;
use crate::particle::{Archetype, Particle, ParticleSpec, ms_to_ticks};
use crate::random::{self, FxRng};
use crate::surface::Surface;

/// 效果实例 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

impl EffectId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fx#{}", self.0)
    }
}

/// 渲染模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// 共享全局表面
    Global,
    /// 元素独占表面
    Local,
}

/// 生成框：实例原点（左上角）和生成器可用的区域尺寸
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl EffectFrame {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 以 `(cx, cy)` 为中心的框
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }
}

/// 元素样式脉冲：临时追加 CSS，到期后恢复
#[derive(Debug, Clone, PartialEq)]
pub struct StylePulse {
    pub css: String,
    pub duration_ms: u64,
}

/// 持续发射器，每帧调用一次
pub type Emitter = Box<dyn FnMut(&mut EffectInstance)>;

/// 分段波次：到达指定帧时一次性生成
#[derive(Debug, Clone)]
struct StagedWave {
    at_tick: u32,
    specs: Vec<ParticleSpec>,
}

/// 效果实例
pub struct EffectInstance {
    id: EffectId,
    mode: RenderMode,
    frame: EffectFrame,
    particles: Vec<Particle>,
    emitter: Option<Emitter>,
    /// 每次安装或清除发射器时递增
    emitter_generation: u32,
    waves: Vec<StagedWave>,
    /// 实例寿命，决定发射器何时停止
    life: i32,
    /// 已经历的帧数（波次计时）
    age: u32,
    /// 局部模式下发射器停止后的保持帧数
    grace_ticks: i32,
    options: SpawnOptions,
    rng: FxRng,
    pulses: Vec<StylePulse>,
}

impl fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectInstance")
            .field("id", &self.id)
            .field("mode", &self.mode)
            .field("particles", &self.particles.len())
            .field("emitter", &self.emitter.is_some())
            .field("waves", &self.waves.len())
            .field("life", &self.life)
            .finish()
    }
}

impl EffectInstance {
    /// 默认实例寿命（帧）
    pub const DEFAULT_LIFE: i32 = 100;
    /// 默认局部保持帧数
    pub const DEFAULT_GRACE_TICKS: i32 = 10;

    pub fn new(id: EffectId, mode: RenderMode, frame: EffectFrame, options: SpawnOptions, rng: FxRng) -> Self {
        Self {
            id,
            mode,
            frame,
            particles: Vec::new(),
            emitter: None,
            emitter_generation: 0,
            waves: Vec::new(),
            life: Self::DEFAULT_LIFE,
            age: 0,
            grace_ticks: Self::DEFAULT_GRACE_TICKS,
            options,
            rng,
            pulses: Vec::new(),
        }
    }

    /// 设置实例寿命
    pub fn with_life(mut self, life: i32) -> Self {
        self.life = life;
        self
    }

    /// 设置局部保持帧数
    pub fn with_grace_ticks(mut self, ticks: i32) -> Self {
        self.grace_ticks = ticks.max(0);
        self
    }

    // ========== 查询 ==========

    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn is_local(&self) -> bool {
        self.mode == RenderMode::Local
    }

    pub fn frame(&self) -> EffectFrame {
        self.frame
    }

    /// 生成框宽度
    pub fn w(&self) -> f32 {
        self.frame.width
    }

    /// 生成框高度
    pub fn h(&self) -> f32 {
        self.frame.height
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn has_emitter(&self) -> bool {
        self.emitter.is_some()
    }

    /// 尚未释放的波次数
    pub fn pending_waves(&self) -> usize {
        self.waves.len()
    }

    pub fn options(&self) -> &SpawnOptions {
        &self.options
    }

    // ========== 生成 ==========

    /// 生成一个粒子，位置相对实例原点
    pub fn spawn(&mut self, mut spec: ParticleSpec) {
        if let Some(color) = &self.options.color {
            spec.color = color.clone();
        }
        if let Some(scale) = self.options.scale {
            spec.size *= scale;
        }
        self.push(spec);
    }

    fn push(&mut self, spec: ParticleSpec) {
        let seed = self.rng.next_u64();
        self.particles
            .push(Particle::new(spec, (self.frame.x, self.frame.y), seed));
    }

    /// 安装发射器（替换已有的）
    pub fn set_emitter(&mut self, emitter: impl FnMut(&mut EffectInstance) + 'static) {
        self.emitter = Some(Box::new(emitter));
        self.emitter_generation = self.emitter_generation.wrapping_add(1);
    }

    pub fn clear_emitter(&mut self) {
        self.emitter = None;
        self.emitter_generation = self.emitter_generation.wrapping_add(1);
    }

    /// 声明一个在第 `at_tick` 帧释放的波次；`at_tick == 0` 立即生成
    pub fn stage_wave(&mut self, at_tick: u32, specs: Vec<ParticleSpec>) {
        if at_tick == 0 {
            for spec in specs {
                self.spawn(spec);
            }
        } else {
            self.waves.push(StagedWave { at_tick, specs });
        }
    }

    /// 临时修改宿主元素样式（仅局部模式生效）
    pub fn pulse_style(&mut self, css: impl Into<String>, duration_ms: u64) {
        if !self.is_local() {
            return;
        }
        self.pulses.push(StylePulse {
            css: css.into(),
            duration_ms,
        });
    }

    /// 元素闪光（仅局部模式生效）
    pub fn flash(&mut self, color: &str, duration_ms: u64) {
        if !self.is_local() {
            return;
        }
        let spec = ParticleSpec::default()
            .with_color(color)
            .with_life(ms_to_ticks(duration_ms as f32))
            .with_archetype(Archetype::Flash);
        self.push(spec);
    }

    /// 取出待执行的样式脉冲
    pub fn take_style_pulses(&mut self) -> Vec<StylePulse> {
        std::mem::take(&mut self.pulses)
    }

    // ========== 随机 ==========

    /// `[lo, hi)` 内的随机数
    pub fn random(&mut self, lo: f32, hi: f32) -> f32 {
        random::range(&mut self.rng, lo, hi)
    }

    pub fn chance(&mut self, p: f32) -> bool {
        random::chance(&mut self.rng, p)
    }

    pub fn pick<'a>(&mut self, palette: &[&'a str]) -> &'a str {
        random::pick(&mut self.rng, palette)
    }

    // ========== 更新与渲染 ==========

    /// 推进一帧，返回是否仍然活跃
    pub fn update(&mut self) -> bool {
        self.life -= 1;
        self.age += 1;

        if self.life > 0 {
            if let Some(mut emitter) = self.emitter.take() {
                let generation = self.emitter_generation;
                emitter(self);
                // 调用期间替换或清除了发射器时不再放回
                if self.emitter_generation == generation {
                    self.emitter = Some(emitter);
                }
            }
        }

        self.release_due_waves();

        for particle in &mut self.particles {
            particle.tick();
        }
        self.particles.retain(Particle::is_alive);

        self.is_active()
    }

    fn release_due_waves(&mut self) {
        let age = self.age;
        let mut due = Vec::new();
        self.waves.retain_mut(|wave| {
            if wave.at_tick <= age {
                due.append(&mut wave.specs);
                false
            } else {
                true
            }
        });
        for spec in due {
            self.spawn(spec);
        }
    }

    /// 活跃判定
    ///
    /// 有存活粒子、有待释放的波次、发射器仍在工作，
    /// 或局部模式下发射器刚停止且仍在保持窗口内。
    pub fn is_active(&self) -> bool {
        if !self.particles.is_empty() || !self.waves.is_empty() {
            return true;
        }
        if self.emitter.is_none() {
            return false;
        }
        self.life > 0 || (self.is_local() && self.life > -self.grace_ticks)
    }

    /// 按列表顺序绘制所有存活粒子
    pub fn render(&self, surface: &mut dyn Surface) {
        for particle in &self.particles {
            particle.render(surface);
        }
    }
}
