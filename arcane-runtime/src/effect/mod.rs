//! # Effect 模块
//!
//! 效果实例、生成选项、注册表与内置效果库。
//!
//! ```text
//! spawn(name) ──► EffectRegistry::lookup ──► Generator(&mut EffectInstance)
//!                                                  │
//!                          引擎每帧 update() + render() ◄──┘
//! ```

mod instance;
pub mod library;
mod options;
mod registry;

pub use instance::{EffectFrame, EffectId, EffectInstance, Emitter, RenderMode, StylePulse};
pub use options::SpawnOptions;
pub use registry::{EffectRegistry, Generator};
