//! 大招效果：纯粒子构成的爆发、冲击波、召唤阵等。
//!
//! 所有粒子围绕生成框中心布置；寿命按 60 帧/秒从毫秒换算而来。
//! 多段爆发通过分段波次声明，实例销毁时未释放的波次随之丢弃。

use std::f32::consts::{PI, TAU};

use super::{at_ms, center, polar};
use crate::effect::{EffectInstance, EffectRegistry};
use crate::particle::{Archetype, ParticleSpec, ms_to_ticks};

pub(super) fn register(registry: &mut EffectRegistry) {
    registry.register("energyBurst", energy_burst);
    registry.register("impactShockwave", impact_shockwave);
    registry.register("animeExplosion", anime_explosion);
    registry.register("magicSwirl", magic_swirl);
    registry.register("slashTrail", slash_trail);
    registry.register("darkMatterImplosion", dark_matter_implosion);
    registry.register("fireSurge", fire_surge);
    registry.register("iceShards", ice_shards);
    registry.register("lightningFork", lightning_fork);
    registry.register("windSlash", wind_slash);
    registry.register("earthSpikes", earth_spikes);
    registry.register("heatwave", heatwave);
    registry.register("rippleShockwave", ripple_shockwave);
    registry.register("flashWhiteout", flash_whiteout);
    registry.register("portalRings", portal_rings);
    registry.register("starfall", starfall);
    registry.register("cardMaterialization", card_materialization);
}

// ========== 能量 ==========

fn energy_burst(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    // 脉动核心
    for i in 0..12 {
        let rotation = fx.random(0.0, TAU);
        let spin = fx.random(-0.15, 0.15);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(18.0 - i as f32 * 0.5)
                .with_color("#00ffff")
                .with_life(ms_to_ticks(1200.0 - i as f32 * 40.0))
                .with_rotation(rotation, spin),
        );
    }

    for i in 0..45 {
        let angle = TAU * i as f32 / 45.0;
        let speed = fx.random(2.5, 7.5);
        let size = fx.random(2.0, 7.0);
        let color = if fx.chance(0.4) {
            "#00ffff"
        } else if fx.chance(0.5) {
            "#ff00ff"
        } else {
            "#ffff00"
        };
        let life = fx.random(800.0, 1500.0);
        let rotation = fx.random(0.0, TAU);
        let spin = fx.random(-0.1, 0.1);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(size)
                .with_color(color)
                .with_life(ms_to_ticks(life))
                .with_rotation(rotation, spin),
        );
    }

    // 外环
    for i in 0..25 {
        let angle = TAU * i as f32 / 25.0;
        let speed = fx.random(1.5, 5.0);
        let size = fx.random(1.5, 5.5);
        let color = if fx.chance(0.6) {
            "#ffffff"
        } else {
            fx.pick(&["#00ffff", "#ff00ff"])
        };
        let life = fx.random(1000.0, 1500.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(size)
                .with_color(color)
                .with_life(ms_to_ticks(life)),
        );
    }
}

fn impact_shockwave(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for i in 0..15 {
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(20.0 - i as f32)
                .with_color("#ffff00")
                .with_life(ms_to_ticks(300.0 - i as f32 * 10.0)),
        );
    }

    for i in 0..20 {
        let angle = TAU * i as f32 / 20.0;
        let distance = fx.random(30.0, 50.0);
        let (x, y) = polar(cx, cy, angle, distance);
        let size = fx.random(3.0, 5.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_size(size)
                .with_color("#ff4500")
                .with_life(ms_to_ticks(600.0)),
        );
    }

    // 碎石
    for _ in 0..15 {
        let angle = fx.random(0.0, TAU);
        let speed = fx.random(2.0, 7.0);
        let distance = fx.random(0.0, 50.0);
        let (x, y) = polar(cx, cy, angle, distance);
        let size = fx.random(2.0, 5.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(angle.cos() * speed, angle.sin() * speed - 2.0)
                .with_size(size)
                .with_color("#8B4513")
                .with_life(ms_to_ticks(1500.0))
                .with_gravity(0.3)
                .with_archetype(Archetype::Square),
        );
    }
}

fn anime_explosion(fx: &mut EffectInstance) {
    const COLORS: [&str; 5] = ["#ff0000", "#ff4500", "#ffa500", "#ffff00", "#ffffff"];
    let (cx, cy) = center(fx);

    // 三层环，间隔 100ms
    for ring in 0..3 {
        let count = 40 - ring * 10;
        let ring_f = ring as f32;
        let mut specs = Vec::with_capacity(count);
        for i in 0..count {
            let angle = TAU * i as f32 / count as f32;
            let speed = 4.0 - ring_f * 0.5 + fx.random(0.0, 2.0);
            specs.push(
                ParticleSpec::at(cx, cy)
                    .with_velocity(angle.cos() * speed, angle.sin() * speed)
                    .with_size(4.0 - ring_f)
                    .with_color(COLORS[i % COLORS.len()])
                    .with_life(ms_to_ticks(1200.0 - ring_f * 200.0)),
            );
        }
        fx.stage_wave(at_ms(ring_f * 100.0), specs);
    }

    for i in 0..20 {
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(10.0 - i as f32 * 0.3)
                .with_color("#ffffff")
                .with_life(ms_to_ticks(600.0 - i as f32 * 20.0)),
        );
    }

    for _ in 0..30 {
        let angle = fx.random(0.0, TAU);
        let speed = fx.random(1.0, 5.0);
        let size = fx.random(3.0, 8.0);
        let color = fx.pick(&["#ff4500", "#ff0000", "#8B0000"]);
        let life = fx.random(1500.0, 2500.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed - 1.0)
                .with_size(size)
                .with_color(color)
                .with_life(ms_to_ticks(life))
                .with_gravity(-0.1),
        );
    }
}

fn magic_swirl(fx: &mut EffectInstance) {
    const PALETTE: [&str; 4] = ["#00ffff", "#ff00ff", "#ffff00", "#ffffff"];
    let (cx, cy) = center(fx);

    for i in 0..50 {
        let angle = TAU * i as f32 / 50.0;
        let radius = fx.random(15.0, 115.0);
        let speed = fx.random(1.5, 5.5);
        let (x, y) = polar(cx, cy, angle, radius);
        let size = fx.random(2.5, 6.5);
        let life = fx.random(1800.0, 2500.0);
        let rotation = fx.random(0.0, TAU);
        let spin = fx.random(-0.2, 0.2);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(-angle.sin() * speed, angle.cos() * speed)
                .with_size(size)
                .with_color(PALETTE[i % PALETTE.len()])
                .with_life(ms_to_ticks(life))
                .with_rotation(rotation, spin),
        );
    }

    // 漩涡核心
    for i in 0..18 {
        let life = fx.random(1200.0, 1600.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(10.0 - i as f32 * 0.4)
                .with_color("#ffffff")
                .with_life(ms_to_ticks(life)),
        );
    }
}

fn slash_trail(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    // 斩击本体
    fx.spawn(
        ParticleSpec::at(cx, cy)
            .with_size(60.0)
            .with_color("#ffffff")
            .with_life(ms_to_ticks(300.0))
            .with_rotation(-0.2, 0.0)
            .with_archetype(Archetype::Slash {
                curve: 20.0,
                width: 6.0,
            }),
    );

    for i in 0..25 {
        let offset = (i as f32 - 12.0) * 10.0;
        let spread = fx.random(-10.0, 10.0);
        let size = fx.random(2.0, 6.0);
        let life = fx.random(600.0, 800.0);
        fx.spawn(
            ParticleSpec::at(cx + offset, cy + spread)
                .with_size(size)
                .with_color(if i % 3 == 0 { "#ffffff" } else { "#ff00ff" })
                .with_life(ms_to_ticks(life)),
        );
    }

    // 速度线
    for i in 0..15 {
        let offset = (i as f32 - 7.0) * 15.0;
        let spread = fx.random(-15.0, 15.0);
        let vy = fx.random(-1.0, 1.0);
        fx.spawn(
            ParticleSpec::at(cx + offset, cy + spread)
                .with_velocity(10.0, vy)
                .with_size(1.0)
                .with_color("#00ffff")
                .with_life(ms_to_ticks(400.0))
                .with_archetype(Archetype::line(20.0)),
        );
    }
}

fn dark_matter_implosion(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    // 向内坍缩的暗能量
    for i in 0..40 {
        let angle = TAU * i as f32 / 40.0;
        let start_radius = fx.random(100.0, 150.0);
        let size = fx.random(3.0, 5.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(size)
                .with_color("#4B0082")
                .with_life(ms_to_ticks(1400.0))
                .with_archetype(Archetype::InwardSpiral {
                    angle,
                    start_radius,
                    end_radius: 10.0,
                }),
        );
    }

    // 虚空核心
    for i in 0..20 {
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(15.0 - i as f32 * 0.5)
                .with_color("#000000")
                .with_life(ms_to_ticks(1000.0 - i as f32 * 30.0)),
        );
    }

    for i in 0..30 {
        let angle = TAU * i as f32 / 30.0;
        let (x, y) = polar(cx, cy, angle, 60.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_size(2.0)
                .with_color("#8A2BE2")
                .with_life(ms_to_ticks(1200.0)),
        );
    }
}

// ========== 元素 ==========

fn fire_surge(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for _ in 0..35 {
        let offset = fx.random(-20.0, 20.0);
        let vx = fx.random(-1.0, 1.0);
        let vy = -fx.random(3.0, 7.0);
        let size = fx.random(4.0, 10.0);
        let color = fx.pick(&["#ff4500", "#ff0000", "#ffa500", "#ffff00"]);
        let life = fx.random(1500.0, 2000.0);
        fx.spawn(
            ParticleSpec::at(cx + offset, cy)
                .with_velocity(vx, vy)
                .with_size(size)
                .with_color(color)
                .with_life(ms_to_ticks(life))
                .with_gravity(-0.2),
        );
    }

    // 底部火舌
    for _ in 0..15 {
        let angle = PI + fx.random(0.0, PI / 2.0);
        let speed = fx.random(1.0, 4.0);
        let size = fx.random(3.0, 7.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(size)
                .with_color("#ff4500")
                .with_life(ms_to_ticks(800.0))
                .with_gravity(-0.1),
        );
    }
}

fn ice_shards(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for _ in 0..25 {
        let angle = fx.random(0.0, TAU);
        let speed = fx.random(4.0, 7.0);
        let size = fx.random(3.0, 7.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(size)
                .with_color("#00BFFF")
                .with_life(ms_to_ticks(1200.0))
                .with_gravity(0.2)
                // 尖端指向飞行方向
                .with_rotation(angle + PI / 2.0, 0.0)
                .with_archetype(Archetype::Triangle),
        );
    }

    for i in 0..15 {
        let angle = TAU * i as f32 / 15.0;
        let speed = fx.random(2.0, 4.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(2.0)
                .with_color("#E0FFFF")
                .with_life(ms_to_ticks(600.0)),
        );
    }
}

fn lightning_fork(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    // 主闪电（折线向下生成，旋转半周后朝上）
    fx.spawn(
        ParticleSpec::at(cx, cy)
            .with_color("#00FFFF")
            .with_life(ms_to_ticks(400.0))
            .with_rotation(PI, 0.0)
            .with_archetype(Archetype::Lightning {
                segments: 8,
                width: 3.0,
            }),
    );

    for i in 0..8 {
        let offset = i as f32 * 15.0;
        let spread = fx.random(-5.0, 5.0);
        let size = fx.random(2.0, 4.0);
        fx.spawn(
            ParticleSpec::at(cx + spread, cy - offset)
                .with_size(size)
                .with_color("#00FFFF")
                .with_life(ms_to_ticks(400.0 - i as f32 * 30.0)),
        );
    }

    // 分叉
    for _ in 0..3 {
        let branch_start = fx.random(2.0, 6.0);
        let angle = fx.random(-PI / 6.0, PI / 6.0);
        let length = fx.random(3.0, 6.0);
        let mut j = 0.0;
        while j < length {
            let offset = (branch_start + j) * 15.0;
            let spread = angle.sin() * offset;
            let size = fx.random(1.0, 2.0);
            fx.spawn(
                ParticleSpec::at(cx + spread, cy - offset)
                    .with_size(size)
                    .with_color("#00FFFF")
                    .with_life(ms_to_ticks(300.0)),
            );
            j += 1.0;
        }
    }

    // 电火花
    for _ in 0..10 {
        let angle = fx.random(0.0, TAU);
        let distance = fx.random(20.0, 50.0);
        let (x, y) = polar(cx, cy, angle, distance);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_size(1.0)
                .with_color("#FFFFFF")
                .with_life(ms_to_ticks(200.0)),
        );
    }
}

fn wind_slash(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for i in 0..20 {
        let offset = i as f32 * 8.0;
        let spread = fx.random(-7.5, 7.5);
        let vy = fx.random(-1.0, 1.0);
        let size = fx.random(2.0, 4.0);
        fx.spawn(
            ParticleSpec::at(cx - offset, cy + spread)
                .with_velocity(8.0, vy)
                .with_size(size)
                .with_color("#E0FFFF")
                .with_life(ms_to_ticks(600.0)),
        );
    }

    // 气压波
    for _ in 0..15 {
        let angle = fx.random(0.0, TAU);
        let distance = fx.random(0.0, 25.0);
        let (x, y) = polar(cx, cy, angle, distance);
        let size = fx.random(3.0, 5.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_size(size)
                .with_color("#B0E0E6")
                .with_life(ms_to_ticks(800.0)),
        );
    }
}

fn earth_spikes(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for _ in 0..20 {
        let angle = -PI / 2.0 + fx.random(-PI / 6.0, PI / 6.0);
        let speed = fx.random(3.0, 5.0);
        let size = fx.random(4.0, 7.0);
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(size)
                .with_color("#8B4513")
                .with_life(ms_to_ticks(1000.0))
                .with_gravity(0.4)
                .with_archetype(Archetype::Triangle),
        );
    }

    // 扬尘
    for _ in 0..25 {
        let angle = fx.random(0.0, TAU);
        let distance = fx.random(0.0, 30.0);
        let (x, y) = polar(cx, cy, angle, distance);
        let vx = fx.random(-1.0, 1.0);
        let vy = -fx.random(0.0, 2.0);
        let size = fx.random(1.0, 3.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(vx, vy)
                .with_size(size)
                .with_color("#D2B48C")
                .with_life(ms_to_ticks(1200.0))
                .with_gravity(-0.1),
        );
    }
}

// ========== 扭曲 ==========

fn heatwave(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for _ in 0..15 {
        let offset = fx.random(-30.0, 30.0);
        let vy = -fx.random(1.0, 2.0);
        let size = fx.random(8.0, 12.0);
        let amplitude = fx.random(4.0, 8.0);
        let frequency = fx.random(0.05, 0.15);
        fx.spawn(
            ParticleSpec::at(cx + offset, cy)
                .with_velocity(0.0, vy)
                .with_size(size)
                .with_color("rgba(255, 69, 0, 0.3)")
                .with_life(ms_to_ticks(2000.0))
                .with_gravity(-0.1)
                .with_archetype(Archetype::Wave {
                    amplitude,
                    frequency,
                }),
        );
    }
}

fn ripple_shockwave(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    // 四层涟漪，间隔 200ms
    for ring in 0..4 {
        let radius = 20.0 + ring as f32 * 15.0;
        let specs = (0..10)
            .map(|i| {
                let (x, y) = polar(cx, cy, TAU * i as f32 / 10.0, radius);
                ParticleSpec::at(x, y)
                    .with_size(3.0)
                    .with_color("#00BFFF")
                    .with_life(ms_to_ticks(800.0))
            })
            .collect();
        fx.stage_wave(at_ms(ring as f32 * 200.0), specs);
    }
}

fn flash_whiteout(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    fx.spawn(
        ParticleSpec::default()
            .with_color("#FFFFFF")
            .with_life(ms_to_ticks(300.0))
            .with_archetype(Archetype::Flash),
    );

    for i in 0..5 {
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(50.0 - i as f32 * 8.0)
                .with_color("#FFFFFF")
                .with_life(ms_to_ticks(200.0 - i as f32 * 20.0)),
        );
    }
}

// ========== 召唤 ==========

fn portal_rings(fx: &mut EffectInstance) {
    const RING_COLORS: [&str; 3] = ["#00FFFF", "#FF00FF", "#FFFF00"];
    let (cx, cy) = center(fx);

    // 三层传送环，间隔 300ms
    for (ring, color) in RING_COLORS.iter().enumerate() {
        let radius = 30.0 + ring as f32 * 20.0;
        let mut specs = Vec::with_capacity(20);
        for i in 0..20 {
            let (x, y) = polar(cx, cy, TAU * i as f32 / 20.0, radius);
            let size = fx.random(2.0, 4.0);
            specs.push(
                ParticleSpec::at(x, y)
                    .with_size(size)
                    .with_color(*color)
                    .with_life(ms_to_ticks(1200.0)),
            );
        }
        fx.stage_wave(at_ms(ring as f32 * 300.0), specs);
    }

    for i in 0..10 {
        fx.spawn(
            ParticleSpec::at(cx, cy)
                .with_size(8.0 - i as f32 * 0.5)
                .with_color("#FFFFFF")
                .with_life(ms_to_ticks(1500.0)),
        );
    }
}

fn starfall(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    for _ in 0..30 {
        let x = cx + fx.random(-100.0, 100.0);
        let angle = PI / 2.0 + fx.random(-0.1, 0.1);
        let speed = fx.random(5.0, 8.0);
        let size = fx.random(2.0, 5.0);
        fx.spawn(
            ParticleSpec::at(x, cy - 200.0)
                .with_velocity(angle.cos() * speed, angle.sin() * speed)
                .with_size(size)
                .with_color("#FFD700")
                .with_life(ms_to_ticks(3000.0)),
        );
    }
}

fn card_materialization(fx: &mut EffectInstance) {
    let (cx, cy) = center(fx);

    fx.spawn(
        ParticleSpec::at(cx, cy)
            .with_size(30.0)
            .with_color("#FFD700")
            .with_life(ms_to_ticks(1500.0))
            .with_archetype(Archetype::Card { flip_speed: 0.15 }),
    );

    // 卡片轮廓
    for i in 0..20 {
        let (x, y) = polar(cx, cy, TAU * i as f32 / 20.0, 25.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_size(2.0)
                .with_color("#FFD700")
                .with_life(ms_to_ticks(1000.0)),
        );
    }

    for _ in 0..15 {
        let angle = fx.random(0.0, TAU);
        let distance = fx.random(0.0, 20.0);
        let (x, y) = polar(cx, cy, angle, distance);
        let vx = fx.random(-1.0, 1.0);
        let vy = fx.random(-1.0, 1.0);
        let size = fx.random(1.0, 3.0);
        fx.spawn(
            ParticleSpec::at(x, y)
                .with_velocity(vx, vy)
                .with_size(size)
                .with_color("#FFFFFF")
                .with_life(ms_to_ticks(800.0)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectFrame, EffectId, RenderMode, SpawnOptions};
    use crate::random::make_rng;

    fn run(generator: fn(&mut EffectInstance)) -> EffectInstance {
        let mut fx = EffectInstance::new(
            EffectId::new(1),
            RenderMode::Global,
            EffectFrame::centered(500.0, 300.0, 240.0, 240.0),
            SpawnOptions::default(),
            make_rng(Some(3)),
        );
        generator(&mut fx);
        fx
    }

    #[test]
    fn test_anime_explosion_stages_rings() {
        let mut fx = run(anime_explosion);
        // 第一层环立即生成：40 + 核心 20 + 火焰 30
        assert_eq!(fx.particle_count(), 90);
        assert_eq!(fx.pending_waves(), 2);

        for _ in 0..at_ms(100.0) {
            fx.update();
        }
        assert_eq!(fx.pending_waves(), 1);
        for _ in at_ms(100.0)..at_ms(200.0) {
            fx.update();
        }
        assert_eq!(fx.pending_waves(), 0);
    }

    #[test]
    fn test_ripple_shockwave_waves() {
        let fx = run(ripple_shockwave);
        assert_eq!(fx.particle_count(), 10);
        assert_eq!(fx.pending_waves(), 3);
    }

    #[test]
    fn test_dark_matter_uses_inward_spiral() {
        let fx = run(dark_matter_implosion);
        let spiral = fx
            .particles()
            .iter()
            .filter(|p| matches!(p.archetype, Archetype::InwardSpiral { .. }))
            .count();
        assert_eq!(spiral, 40);
        assert_eq!(fx.particle_count(), 90);
    }

    #[test]
    fn test_particles_centered_on_target() {
        let fx = run(impact_shockwave);
        // 核心粒子正好落在目标点
        let core = &fx.particles()[0];
        assert_eq!((core.x, core.y), (500.0, 300.0));
    }

    #[test]
    fn test_flash_whiteout_fills_global_surface() {
        let fx = run(flash_whiteout);
        assert_eq!(fx.particles()[0].archetype, Archetype::Flash);
        assert_eq!(fx.particle_count(), 6);
    }

    #[test]
    fn test_lives_converted_to_ticks() {
        let fx = run(starfall);
        assert!(fx.particles().iter().all(|p| p.max_life == 180));
    }
}
