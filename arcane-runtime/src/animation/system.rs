//! # System 模块
//!
//! 元素动画管理器。
//!
//! 每帧推进所有动画，把合成出的样式交给调用方应用，
//! 并返回结束事件；后续动画由调用方在收到 `Completed` 时发起。

use std::collections::BTreeMap;

use super::html::{ElementStyle, HtmlAnimation, HtmlAnimationSpec};
use super::{Animation, AnimationEvent, AnimationId};

/// 元素动画管理器
pub struct HtmlAnimator<E> {
    animations: BTreeMap<AnimationId, HtmlAnimation<E>>,
    next_id: u64,
    /// 待处理的事件队列
    events: Vec<AnimationEvent>,
}

impl<E> Default for HtmlAnimator<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for HtmlAnimator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlAnimator")
            .field("animations", &self.animations.len())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl<E> HtmlAnimator<E> {
    pub fn new() -> Self {
        Self {
            animations: BTreeMap::new(),
            next_id: 1,
            events: Vec::new(),
        }
    }

    fn next_animation_id(&mut self) -> AnimationId {
        let id = AnimationId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// 开始一个元素动画
    ///
    /// `initial_opacity` 是元素当前透明度；`viewport_width` 用于解析百分比位移。
    pub fn start(
        &mut self,
        element: E,
        spec: HtmlAnimationSpec,
        initial_opacity: f32,
        viewport_width: f32,
    ) -> AnimationId {
        let id = self.next_animation_id();
        let timeline = Animation::new(id, spec.duration_secs()).with_easing(spec.easing);
        let animation = HtmlAnimation::new(element, spec, timeline, initial_opacity, viewport_width);
        tracing::debug!(animation = %id, duration_ms = animation.spec.duration, "元素动画开始");
        self.animations.insert(id, animation);
        id
    }

    /// 停止动画，不应用最终样式
    pub fn stop(&mut self, id: AnimationId) -> bool {
        match self.animations.remove(&id) {
            Some(mut animation) => {
                animation.timeline.skip();
                self.events.push(AnimationEvent::Stopped(id));
                true
            }
            None => false,
        }
    }

    /// 推进所有动画
    ///
    /// 每个动画的当前样式通过 `apply` 交给调用方，本帧结束的动画（包括时长为 0、
    /// 创建即完成的）也会先应用最终样式；返回并清空事件队列。
    pub fn update(
        &mut self,
        dt: f32,
        mut apply: impl FnMut(&E, &ElementStyle),
    ) -> Vec<AnimationEvent> {
        let mut finished = Vec::new();

        for (id, animation) in &mut self.animations {
            animation.timeline.update(dt);
            apply(&animation.element, &animation.current_style());
            if animation.timeline.is_finished() {
                finished.push(*id);
            }
        }

        for id in finished {
            if self.animations.remove(&id).is_some() {
                self.events.push(AnimationEvent::Completed(id));
            }
        }

        std::mem::take(&mut self.events)
    }

    pub fn get(&self, id: AnimationId) -> Option<&HtmlAnimation<E>> {
        self.animations.get(&id)
    }

    pub fn contains(&self, id: AnimationId) -> bool {
        self.animations.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::EasingFunction;

    fn collect(animator: &mut HtmlAnimator<String>, dt: f32) -> (Vec<(String, ElementStyle)>, Vec<AnimationEvent>) {
        let mut styles = Vec::new();
        let events = animator.update(dt, |el, style| styles.push((el.clone(), style.clone())));
        (styles, events)
    }

    #[test]
    fn test_animation_completes_with_final_style() {
        let mut animator = HtmlAnimator::new();
        let id = animator.start(
            "#hero".to_string(),
            HtmlAnimationSpec::new(100)
                .with_easing(EasingFunction::Linear)
                .with_rotate(90.0),
            1.0,
            1920.0,
        );
        assert_eq!(animator.active_count(), 1);

        let (styles, events) = collect(&mut animator, 0.05);
        assert!(events.is_empty());
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].0, "#hero");
        assert_eq!(styles[0].1.transform, "rotate(45deg)");

        let (styles, events) = collect(&mut animator, 0.06);
        assert_eq!(styles[0].1.transform, "rotate(90deg)");
        assert_eq!(events, vec![AnimationEvent::Completed(id)]);
        assert!(animator.is_empty());
    }

    #[test]
    fn test_stop_emits_event_without_style() {
        let mut animator = HtmlAnimator::new();
        let id = animator.start("#a".to_string(), HtmlAnimationSpec::new(500), 1.0, 800.0);

        assert!(animator.stop(id));
        assert!(!animator.stop(id));
        let (styles, events) = collect(&mut animator, 0.1);
        assert!(styles.is_empty());
        assert_eq!(events, vec![AnimationEvent::Stopped(id)]);
    }

    #[test]
    fn test_independent_animations() {
        let mut animator = HtmlAnimator::new();
        let short = animator.start("#a".to_string(), HtmlAnimationSpec::new(100), 1.0, 800.0);
        let long = animator.start("#b".to_string(), HtmlAnimationSpec::new(1000), 1.0, 800.0);

        let (_, events) = collect(&mut animator, 0.2);
        assert_eq!(events, vec![AnimationEvent::Completed(short)]);
        assert!(animator.contains(long));
    }

    #[test]
    fn test_zero_duration_applies_final_style() {
        let mut animator = HtmlAnimator::new();
        let id = animator.start(
            "#a".to_string(),
            HtmlAnimationSpec::new(0).with_opacity(0.2).with_rotate(30.0),
            1.0,
            800.0,
        );

        let (styles, events) = collect(&mut animator, 0.016);
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].0, "#a");
        assert!((styles[0].1.opacity - 0.2).abs() < 1e-6);
        assert_eq!(styles[0].1.transform, "rotate(30deg)");
        assert_eq!(events, vec![AnimationEvent::Completed(id)]);
        assert!(animator.is_empty());
    }
}
