//! 元素效果：火、水、风、土，以及动画风格的打击效果。
//!
//! 这些效果通常挂在元素上（局部模式），会配合样式脉冲和元素闪光；
//! 在全局模式下样式脉冲和闪光被忽略，只保留粒子部分。

use std::f32::consts::TAU;

use super::{center, radial};
use crate::effect::{EffectInstance, EffectRegistry};
use crate::particle::{Archetype, ParticleSpec};

pub(super) fn register(registry: &mut EffectRegistry) {
    registry.register("fire_engulf", fire_engulf);
    registry.register("fire_burst", fire_burst);
    registry.register("fire_spiral", fire_spiral);
    registry.register("water_bubble", water_bubble);
    registry.register("water_splash", water_splash);
    registry.register("water_vortex", water_vortex);
    registry.register("wind_gust", wind_gust);
    registry.register("wind_swirl", wind_swirl);
    registry.register("wind_cutter", wind_cutter);
    registry.register("earth_crumble", earth_crumble);
    registry.register("earth_spike", earth_spike);
    registry.register("earth_shield", earth_shield);
    registry.register("anime_cut", anime_cut);
    registry.register("hit_impact", hit_impact);
    registry.register("flash_step", flash_step);
    registry.register("impact_flash_white", impact_flash_white);
}

// ========== 火 ==========

fn fire_engulf(fx: &mut EffectInstance) {
    fx.pulse_style("box-shadow: inset 0 -10px 20px rgba(255, 69, 0, 0.5);", 1000);
    fx.set_emitter(|fx| {
        let x = fx.random(0.0, fx.w());
        let vx = fx.random(-1.0, 1.0);
        let vy = -2.0 - fx.random(0.0, 3.0);
        let size = fx.random(6.0, 14.0);
        let y = fx.h();
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(vx, vy)
                .with_size(size)
                .with_color("#ff4500")
                .with_life(40)
                .with_shrink(),
        );
    });
}

fn fire_burst(fx: &mut EffectInstance) {
    fx.flash("#ffaa00", 50);
    let (cx, cy) = center(fx);
    for _ in 0..40 {
        let (vx, vy) = radial(fx, 2.0, 8.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(vx, vy)
                .with_color("#ffcc00")
                .with_life(30)
                .with_shrink(),
        );
    }
}

fn fire_spiral(fx: &mut EffectInstance) {
    let mut angle = 0.0f32;
    fx.set_emitter(move |fx| {
        angle += 0.4;
        let (cx, cy) = center(fx);
        let radius = fx.w() / 3.0;
        fx.spawn(
            ParticleSpec::at(cx + angle.cos() * radius, cy + angle.sin() * radius)
                .with_velocity(0.0, -1.0)
                .with_size(8.0)
                .with_color("#ff0000")
                .with_life(25)
                .with_shrink(),
        );
    });
}

// ========== 水 ==========

fn water_bubble(fx: &mut EffectInstance) {
    fx.pulse_style(
        "background: linear-gradient(0deg, rgba(0,200,255,0.2) 0%, transparent 100%);",
        1000,
    );
    fx.set_emitter(|fx| {
        if !fx.chance(0.3) {
            return;
        }
        let x = fx.random(0.0, fx.w());
        let vx = fx.random(-0.25, 0.25);
        let vy = -1.0 - fx.random(0.0, 1.0);
        let size = fx.random(3.0, 8.0);
        let y = fx.h();
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(vx, vy)
                .with_size(size)
                .with_color("rgba(100,200,255,0.6)")
                .with_life(100)
                .with_archetype(Archetype::stroke()),
        );
    });
}

fn water_splash(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);
    for _ in 0..25 {
        let vx = fx.random(-5.0, 5.0);
        let vy = -3.0 - fx.random(0.0, 5.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(vx, vy)
                .with_size(4.0)
                .with_color("#00ffff")
                .with_life(50)
                .with_gravity(0.4),
        );
    }
}

fn water_vortex(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);
    for _ in 0..30 {
        let a = fx.random(0.0, TAU);
        let dist = fx.random(0.0, fx.w() / 2.0);
        fx.spawn(
            ParticleSpec::at(cx + a.cos() * dist, cy + a.sin() * dist)
                .with_velocity(-a.sin() * 4.0, a.cos() * 4.0)
                .with_size(3.0)
                .with_color("#0088ff")
                .with_life(40)
                .with_shrink(),
        );
    }
}

// ========== 风 ==========

fn wind_gust(fx: &mut EffectInstance) {
    fx.set_emitter(|fx| {
        let y = fx.random(0.0, fx.h());
        let vx = fx.random(15.0, 25.0);
        fx.spawn(
            ParticleSpec::at(-20.0, y)
                .with_velocity(vx, 0.0)
                .with_size(2.0)
                .with_color("rgba(255,255,255,0.8)")
                .with_life(30)
                .with_archetype(Archetype::line(60.0)),
        );
    });
}

fn wind_swirl(fx: &mut EffectInstance) {
    fx.set_emitter(|fx| {
        let x = fx.random(0.0, fx.w());
        let y = fx.random(0.0, fx.h());
        let (cx, cy) = center(fx);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity((cx - x) * 0.1, (cy - y) * 0.1 - 2.0)
                .with_size(2.0)
                .with_color("#ccffcc")
                .with_life(40),
        );
    });
}

fn wind_cutter(fx: &mut EffectInstance) {
    let (_, cy) = center(fx);
    fx.spawn(
        ParticleSpec::at(0.0, cy)
            .with_velocity(10.0, 0.0)
            .with_size(3.0)
            .with_life(30)
            .with_archetype(Archetype::line(150.0)),
    );
    for i in 0..10 {
        let step = i as f32 / 10.0;
        let x = step * fx.w();
        let y = fx.h() - step * fx.h();
        let vx = fx.random(1.0, 3.0);
        let vy = -1.0 - fx.random(0.0, 1.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(vx, vy)
                .with_size(2.0)
                .with_life(40),
        );
    }
}

// ========== 土 ==========

fn earth_crumble(fx: &mut EffectInstance) {
    fx.set_emitter(|fx| {
        let x = fx.random(0.0, fx.w());
        let vy = fx.random(2.0, 6.0);
        let size = fx.random(5.0, 10.0);
        fx.spawn(
            ParticleSpec::at(x, 0.0)
                .with_velocity(0.0, vy)
                .with_size(size)
                .with_color("#5d4037")
                .with_life(60)
                .with_archetype(Archetype::Square),
        );
    });
}

fn earth_spike(fx: &mut EffectInstance) {
    for i in 0..5 {
        let x = fx.w() * (0.2 + i as f32 * 0.15);
        let y = fx.h();
        let vy = -5.0 - fx.random(0.0, 3.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(0.0, vy)
                .with_size(15.0)
                .with_color("#3e2723")
                .with_life(40)
                .with_gravity(0.1)
                .with_archetype(Archetype::Triangle),
        );
    }
    fx.pulse_style("border-bottom: 5px solid #3e2723;", 320);
}

fn earth_shield(fx: &mut EffectInstance) {
    fx.pulse_style(
        "border: 4px solid #795548; background: #3e2723; transform: scale(1.05); transition: transform 0.1s;",
        1000,
    );
    // 沿边框散落的碎石，保证全局模式下也有可见输出
    let (w, h) = (fx.w(), fx.h());
    for i in 0..12 {
        let t = i as f32 / 12.0;
        let (x, y) = match i % 4 {
            0 => (t * w, 0.0),
            1 => (w, t * h),
            2 => (w - t * w, h),
            _ => (0.0, h - t * h),
        };
        let size = fx.random(3.0, 6.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_size(size)
                .with_color("#795548")
                .with_life(60)
                .with_archetype(Archetype::Square),
        );
    }
}

// ========== 动画打击 ==========

fn anime_cut(fx: &mut EffectInstance) {
    fx.flash("rgba(255,255,255,0.8)", 50);
    let (_, cy) = center(fx);
    let length = fx.w() * 1.5;
    fx.spawn(
        ParticleSpec::at(0.0, cy)
            .with_velocity(25.0, 0.0)
            .with_size(4.0)
            .with_life(10)
            .with_archetype(Archetype::line(length)),
    );
}

fn hit_impact(fx: &mut EffectInstance) {
    fx.pulse_style("filter: invert(1);", 64);
    let (cx, cy) = center(fx);
    for _ in 0..15 {
        let (vx, vy) = radial(fx, 5.0, 15.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(vx, vy)
                .with_size(2.0)
                .with_color("#ffff00")
                .with_life(20)
                .with_archetype(Archetype::line(10.0)),
        );
    }
    fx.spawn(
        ParticleSpec::at(cx, cy)
            .with_life(15)
            .with_growth(10.0)
            .with_archetype(Archetype::stroke()),
    );
}

fn flash_step(fx: &mut EffectInstance) {
    fx.pulse_style("opacity: 0.5; transform: translateX(10px); filter: blur(2px);", 160);
    for _ in 0..10 {
        let x = fx.random(0.0, fx.w());
        let y = fx.random(0.0, fx.h());
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(10.0, 0.0)
                .with_size(1.0)
                .with_life(20)
                .with_archetype(Archetype::line(40.0)),
        );
    }
}

/// 黑屏序列专用的白色冲击
fn impact_flash_white(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);
    for _ in 0..50 {
        let (vx, vy) = radial(fx, 4.0, 12.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(vx, vy)
                .with_size(8.0)
                .with_color("#ffffff")
                .with_life(25)
                .with_shrink(),
        );
    }
    fx.spawn(
        ParticleSpec::at(cx, cy)
            .with_size(10.0)
            .with_color("#ffffff")
            .with_life(15)
            .with_growth(15.0)
            .with_archetype(Archetype::Stroke { line_width: 5.0 }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectFrame, EffectId, RenderMode, SpawnOptions};
    use crate::random::make_rng;

    fn run(generator: fn(&mut EffectInstance), mode: RenderMode) -> EffectInstance {
        let mut fx = EffectInstance::new(
            EffectId::new(1),
            mode,
            EffectFrame::new(0.0, 0.0, 200.0, 100.0),
            SpawnOptions::default(),
            make_rng(Some(11)),
        );
        generator(&mut fx);
        fx
    }

    #[test]
    fn test_burst_counts() {
        assert_eq!(run(fire_burst, RenderMode::Global).particle_count(), 40);
        assert_eq!(run(water_splash, RenderMode::Global).particle_count(), 25);
        assert_eq!(run(water_vortex, RenderMode::Global).particle_count(), 30);
        assert_eq!(run(wind_cutter, RenderMode::Global).particle_count(), 11);
        assert_eq!(run(earth_spike, RenderMode::Global).particle_count(), 5);
        assert_eq!(run(hit_impact, RenderMode::Global).particle_count(), 16);
        assert_eq!(run(impact_flash_white, RenderMode::Global).particle_count(), 51);
    }

    #[test]
    fn test_local_fire_burst_adds_flash() {
        let fx = run(fire_burst, RenderMode::Local);
        assert_eq!(fx.particle_count(), 41);
        assert_eq!(fx.particles()[0].archetype, Archetype::Flash);
    }

    #[test]
    fn test_emitter_effects() {
        for generator in [fire_engulf, fire_spiral, water_bubble, wind_gust, wind_swirl, earth_crumble] {
            let fx = run(generator, RenderMode::Global);
            assert!(fx.has_emitter());
        }
    }

    #[test]
    fn test_fire_spiral_circles_center() {
        let mut fx = run(fire_spiral, RenderMode::Global);
        fx.update();
        let p = &fx.particles()[0];
        // 粒子在以中心为圆心、w/3 为半径的圆上生成，之后上移 1
        let dx = p.x - 100.0;
        let dy = p.y + 1.0 - 50.0;
        assert!(((dx * dx + dy * dy).sqrt() - 200.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_earth_shield_pulses_when_local() {
        let mut fx = run(earth_shield, RenderMode::Local);
        assert_eq!(fx.take_style_pulses().len(), 1);
        assert_eq!(fx.particle_count(), 12);
    }
}
