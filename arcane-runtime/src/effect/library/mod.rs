//! # Effect Library
//!
//! 内置效果生成器。
//!
//! - [`elemental`]：元素效果，常用于挂在元素上的局部效果
//! - [`ultimate`]：纯粒子的大招效果
//!
//! 两组生成器遵循同一契约：只通过 [`EffectInstance`] 的公开接口生成粒子、
//! 安装发射器或声明波次，坐标相对生成框左上角。

mod elemental;
mod ultimate;

use std::f32::consts::TAU;

use super::{EffectInstance, EffectRegistry};
use crate::particle::TICKS_PER_SECOND;

/// 注册所有内置效果
pub fn register_all(registry: &mut EffectRegistry) {
    elemental::register(registry);
    ultimate::register(registry);
}

/// 生成框中心
fn center(fx: &EffectInstance) -> (f32, f32) {
    (fx.w() / 2.0, fx.h() / 2.0)
}

/// 随机方向、给定速度区间的速度向量
fn radial(fx: &mut EffectInstance, min_speed: f32, max_speed: f32) -> (f32, f32) {
    let angle = fx.random(0.0, TAU);
    let speed = fx.random(min_speed, max_speed);
    (angle.cos() * speed, angle.sin() * speed)
}

/// 极坐标偏移
fn polar(cx: f32, cy: f32, angle: f32, radius: f32) -> (f32, f32) {
    (cx + angle.cos() * radius, cy + angle.sin() * radius)
}

/// 毫秒偏移换算为波次帧号（0ms 即立即生成）
fn at_ms(ms: f32) -> u32 {
    (ms * TICKS_PER_SECOND / 1000.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectFrame, EffectId, RenderMode, SpawnOptions};
    use crate::random::make_rng;

    fn spawn_all(mode: RenderMode) -> Vec<(String, EffectInstance)> {
        let registry = EffectRegistry::builtin();
        registry
            .names()
            .enumerate()
            .map(|(i, name)| {
                let mut fx = EffectInstance::new(
                    EffectId::new(i as u64),
                    mode,
                    EffectFrame::new(0.0, 0.0, 240.0, 160.0),
                    SpawnOptions::default(),
                    make_rng(Some(i as u64)),
                );
                let generator = registry.lookup(name).unwrap();
                generator(&mut fx);
                (name.to_string(), fx)
            })
            .collect()
    }

    #[test]
    fn test_builtin_count() {
        assert_eq!(EffectRegistry::builtin().len(), 33);
    }

    #[test]
    fn test_every_effect_produces_output() {
        for mode in [RenderMode::Global, RenderMode::Local] {
            for (name, fx) in spawn_all(mode) {
                assert!(
                    fx.particle_count() > 0 || fx.has_emitter() || fx.pending_waves() > 0,
                    "{name} 没有任何产出"
                );
                assert!(fx.is_active(), "{name} 生成后应处于活跃状态");
            }
        }
    }

    #[test]
    fn test_every_effect_eventually_finishes() {
        for (name, mut fx) in spawn_all(RenderMode::Global) {
            let mut ticks = 0;
            while fx.update() {
                ticks += 1;
                assert!(ticks < 2000, "{name} 没有结束");
            }
            assert_eq!(fx.particle_count(), 0);
        }
    }

    #[test]
    fn test_emitter_effects_produce_particles() {
        for (name, mut fx) in spawn_all(RenderMode::Global) {
            if !fx.has_emitter() {
                continue;
            }
            let mut spawned = 0;
            for _ in 0..60 {
                fx.update();
                spawned = spawned.max(fx.particle_count());
            }
            assert!(spawned > 0, "{name} 的发射器没有生成粒子");
        }
    }

    #[test]
    fn test_at_ms() {
        assert_eq!(at_ms(0.0), 0);
        assert_eq!(at_ms(100.0), 6);
        assert_eq!(at_ms(300.0), 18);
    }
}
