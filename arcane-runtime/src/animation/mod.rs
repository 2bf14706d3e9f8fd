//! # Animation 模块
//!
//! 页面元素的关键帧属性动画。
//!
//! ## 核心概念
//!
//! - `Animation`: 单条 0→1 进度时间轴
//! - `EasingFunction`: 缓动函数
//! - `HtmlAnimationSpec`: 元素动画描述（位移、缩放、旋转、透明度、模糊、发光、倾斜）
//! - `HtmlAnimator`: 管理器，逐帧合成 `ElementStyle` 并报告结束事件

mod animation;
mod easing;
mod html;
mod system;

pub use animation::{Animation, AnimationId, AnimationState};
pub use easing::EasingFunction;
pub use html::{Axes, ElementStyle, HtmlAnimation, HtmlAnimationSpec};
pub use system::HtmlAnimator;

/// 动画事件
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// 动画播放完毕
    Completed(AnimationId),
    /// 动画被停止
    Stopped(AnimationId),
}
