//! # Animation 模块
//!
//! 单条动画时间轴：在 duration 内把进度从 0 推进到 1，并应用缓动。
//! 进度如何作用到元素由上层决定。

use std::fmt;

use super::EasingFunction;

/// 动画 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anim#{}", self.0)
    }
}

/// 动画状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// 尚未推进
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已完成
    Completed,
    /// 已中止
    Skipped,
}

impl AnimationState {
    /// 是否为活跃状态（需要更新）
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Playing)
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

/// 动画时间轴
#[derive(Debug, Clone)]
pub struct Animation {
    pub id: AnimationId,
    /// 时长（秒）
    pub duration: f32,
    pub easing: EasingFunction,
    pub state: AnimationState,
    /// 当前进度（已应用缓动）
    pub progress: f32,
    elapsed: f32,
}

impl Animation {
    /// 创建动画，时长不大于 0 时直接完成
    pub fn new(id: AnimationId, duration: f32) -> Self {
        let (state, progress) = if duration <= 0.0 {
            (AnimationState::Completed, 1.0)
        } else {
            (AnimationState::Pending, 0.0)
        };

        Self {
            id,
            duration: duration.max(0.0),
            easing: EasingFunction::default(),
            state,
            progress,
            elapsed: 0.0,
        }
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// 推进 dt 秒
    ///
    /// # 返回
    /// - `true`: 仍在进行中
    /// - `false`: 已结束
    pub fn update(&mut self, dt: f32) -> bool {
        match self.state {
            AnimationState::Pending | AnimationState::Playing => {
                self.state = AnimationState::Playing;
                self.elapsed += dt;
                self.advance()
            }
            AnimationState::Completed | AnimationState::Skipped => false,
        }
    }

    fn advance(&mut self) -> bool {
        let raw = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };

        if raw >= 1.0 {
            self.progress = self.easing.apply(1.0);
            self.state = AnimationState::Completed;
            false
        } else {
            self.progress = self.easing.apply(raw);
            true
        }
    }

    /// 中止，进度保持在当前值
    pub fn skip(&mut self) {
        if !self.state.is_finished() {
            self.state = AnimationState::Skipped;
        }
    }

    /// 未缓动的线性进度
    pub fn raw_progress(&self) -> f32 {
        match self.state {
            AnimationState::Completed => 1.0,
            _ if self.duration <= 0.0 => 1.0,
            _ => (self.elapsed / self.duration).clamp(0.0, 1.0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(duration: f32) -> Animation {
        Animation::new(AnimationId::new(1), duration).with_easing(EasingFunction::Linear)
    }

    #[test]
    fn test_animation_update() {
        let mut anim = linear(1.0);
        assert_eq!(anim.state, AnimationState::Pending);

        assert!(anim.update(0.25));
        assert_eq!(anim.state, AnimationState::Playing);
        assert!((anim.progress - 0.25).abs() < 0.001);

        assert!(anim.update(0.5));
        assert!((anim.raw_progress() - 0.75).abs() < 0.001);

        assert!(!anim.update(0.5));
        assert_eq!(anim.state, AnimationState::Completed);
        assert_eq!(anim.progress, 1.0);
        assert!(!anim.update(0.1));
    }

    #[test]
    fn test_skip_keeps_progress() {
        let mut anim = linear(1.0);
        anim.update(0.5);
        anim.skip();
        assert_eq!(anim.state, AnimationState::Skipped);
        assert!((anim.progress - 0.5).abs() < 0.001);
        assert!(!anim.update(0.1));
    }

    #[test]
    fn test_zero_duration() {
        let anim = Animation::new(AnimationId::new(1), 0.0);
        assert_eq!(anim.state, AnimationState::Completed);
        assert_eq!(anim.progress, 1.0);
    }
}
