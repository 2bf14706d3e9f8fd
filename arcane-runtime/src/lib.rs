//! # Arcane Runtime
//!
//! 粒子特效引擎的核心运行时库。
//!
//! ## 架构概述
//!
//! `arcane-runtime` 是纯逻辑核心，不依赖任何页面、窗口或渲染后端。
//! 页面侧的一切操作都通过 [`Stage`] trait 交给宿主：
//!
//! ```text
//! Host                                   Runtime
//!   │                                       │
//!   │── spawn / run_sequence / animate ───►│
//!   │                                       │
//!   │── frame(now) ───────────────────────►│ timers → runners → global → local → animations
//!   │◄── Stage 调用（画布、覆盖层、阴影、样式） ─│
//!   │◄── FrameReport ───────────────────────│
//! ```
//!
//! ## 核心类型
//!
//! - [`Particle`] / [`ParticleSpec`]：单个粒子及其生成描述
//! - [`EffectInstance`]：一次效果调用拥有的粒子集合
//! - [`EffectRegistry`]：效果名 → 生成器
//! - [`Engine`]：帧循环
//! - [`SequenceRunner`]：编排序列的状态机
//! - [`HtmlAnimator`]：元素属性动画
//!
//! ## 使用示例
//!
//! ```ignore
//! use arcane_runtime::{Engine, EngineConfig, Sequence, SpawnTarget, Position};
//!
//! let mut engine = Engine::with_builtin(stage, EngineConfig::default());
//! engine.spawn("fire_burst", SpawnTarget::at("50%", "50%"), Default::default());
//!
//! let sequence = Sequence::from_json(text)?;
//! engine.run_sequence(sequence, Position::center(), clock.elapsed());
//!
//! loop {
//!     let report = engine.frame(clock.elapsed());
//!     if report.is_idle() {
//!         break;
//!     }
//! }
//! ```
//!
//! ## 模块结构
//!
//! - [`particle`]：粒子模拟与渲染原型
//! - [`effect`]：效果实例、注册表、内置效果库
//! - [`sequence`]：序列命令与执行器
//! - [`animation`]：元素属性动画
//! - [`engine`]：帧循环与 Stage 边界
//! - [`surface`]：2D 绘图表面抽象
//! - [`coord`] / [`color`] / [`random`]：工具
//! - [`config`]：引擎配置
//! - [`error`]：错误类型

pub mod animation;
pub mod color;
pub mod config;
pub mod coord;
pub mod effect;
pub mod engine;
pub mod error;
pub mod particle;
pub mod random;
pub mod sequence;
pub mod surface;

// 重导出核心类型
pub use animation::{
    AnimationEvent, AnimationId, EasingFunction, ElementStyle, HtmlAnimationSpec, HtmlAnimator,
};
pub use config::EngineConfig;
pub use coord::{Coord, Extent, Position};
pub use effect::{EffectFrame, EffectId, EffectInstance, EffectRegistry, Generator, RenderMode, SpawnOptions};
pub use engine::{ElementBox, Engine, FrameReport, Rect, ShadowClone, ShadowId, SpawnTarget, Stage};
pub use error::{FxError, FxResult, SequenceError};
pub use particle::{Archetype, Particle, ParticleSpec};
pub use sequence::{
    RunnerId, RunnerWait, ScreenEffect, Sequence, SequenceAction, SequenceCommand, SequenceRunner,
};
pub use surface::{BlendMode, DrawCall, RecordingSurface, Surface};
