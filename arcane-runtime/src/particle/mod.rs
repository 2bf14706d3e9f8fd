//! # Particle 模块
//!
//! 单个模拟粒子：位置、速度、重力/阻力/缩放、有限寿命和渲染原型。
//!
//! ## 设计说明
//!
//! 寿命统一以**帧**计数，每次 `tick` 恰好减 1；`life <= 0` 的粒子在同一帧
//! 被所属实例移除，永远不会被渲染。
//!
//! ```text
//! tick:
//!   x += vx; y += vy
//!   vx *= drag; vy *= drag; vy += gravity
//!   size += growth; (shrink) size *= 0.90
//!   rotation += rotation_speed; life -= 1
//!   Wave / InwardSpiral 覆盖位置
//! ```

mod archetype;
mod render;
mod spec;

pub use archetype::Archetype;
pub use spec::ParticleSpec;

/// shrink 粒子每帧的尺寸衰减系数
pub const SHRINK_FACTOR: f32 = 0.90;

/// 寿命低于该帧数时，透明度额外限制为 `life / FADE_TAIL_TICKS`
pub const FADE_TAIL_TICKS: i32 = 10;

/// 模拟帧率
pub const TICKS_PER_SECOND: f32 = 60.0;

/// 毫秒换算为帧数（至少 1 帧）
pub fn ms_to_ticks(ms: f32) -> i32 {
    ((ms * TICKS_PER_SECOND / 1000.0).round() as i32).max(1)
}

/// 粒子
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub drag: f32,
    pub gravity: f32,
    pub size: f32,
    pub growth: f32,
    pub shrink: bool,
    /// 剩余寿命（帧）
    pub life: i32,
    /// 初始寿命（帧）
    pub max_life: i32,
    pub color: String,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub archetype: Archetype,
    /// 生成点（Wave 的摆动中心、InwardSpiral 的收缩目标）
    anchor: (f32, f32),
    /// 闪电抖动种子
    seed: u64,
}

impl Particle {
    /// 在 `origin + spec 偏移` 处创建粒子
    pub fn new(spec: ParticleSpec, origin: (f32, f32), seed: u64) -> Self {
        let anchor = (origin.0 + spec.x, origin.1 + spec.y);
        let life = spec.life.max(1);

        let (x, y) = match spec.archetype {
            Archetype::InwardSpiral {
                angle,
                start_radius,
                ..
            } => (
                anchor.0 + angle.cos() * start_radius,
                anchor.1 + angle.sin() * start_radius,
            ),
            _ => anchor,
        };

        Self {
            x,
            y,
            vx: spec.vx,
            vy: spec.vy,
            drag: spec.drag,
            gravity: spec.gravity,
            size: spec.size,
            growth: spec.growth,
            shrink: spec.shrink,
            life,
            max_life: life,
            color: spec.color,
            rotation: spec.rotation,
            rotation_speed: spec.rotation_speed,
            archetype: spec.archetype,
            anchor,
            seed,
        }
    }

    /// 已经历的帧数
    pub fn age(&self) -> i32 {
        self.max_life - self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    /// 生成点
    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    /// 推进一帧
    pub fn tick(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.vx *= self.drag;
        self.vy *= self.drag;
        self.vy += self.gravity;

        self.size += self.growth;
        if self.shrink {
            self.size *= SHRINK_FACTOR;
        }
        self.rotation += self.rotation_speed;
        self.life -= 1;

        let age = self.age() as f32;
        match self.archetype {
            Archetype::Wave {
                amplitude,
                frequency,
            } => {
                self.x = self.anchor.0 + (age * frequency).sin() * amplitude;
            }
            Archetype::InwardSpiral {
                angle,
                start_radius,
                end_radius,
            } => {
                let t = (age / self.max_life as f32).clamp(0.0, 1.0);
                let radius = start_radius + (end_radius - start_radius) * t;
                self.x = self.anchor.0 + angle.cos() * radius;
                self.y = self.anchor.1 + angle.sin() * radius;
            }
            _ => {}
        }
    }

    /// 当前透明度
    ///
    /// 线性淡出 `life / max_life`；寿命进入尾段后再限制为 `life / 10`。
    pub fn opacity(&self) -> f32 {
        if self.life <= 0 {
            return 0.0;
        }
        let fade = self.life as f32 / self.max_life as f32;
        if self.life < FADE_TAIL_TICKS {
            fade.min(self.life as f32 / FADE_TAIL_TICKS as f32)
        } else {
            fade
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle(spec: ParticleSpec) -> Particle {
        Particle::new(spec, (100.0, 100.0), 1)
    }

    #[test]
    fn test_spawn_relative_to_origin() {
        let p = particle(ParticleSpec::at(5.0, -5.0));
        assert_eq!((p.x, p.y), (105.0, 95.0));
        assert_eq!(p.life, 60);
        assert_eq!(p.max_life, 60);
    }

    #[test]
    fn test_tick_kinematics() {
        let mut p = particle(
            ParticleSpec::at(0.0, 0.0)
                .with_velocity(2.0, 1.0)
                .with_drag(0.5)
                .with_gravity(0.25)
                .with_growth(1.0),
        );
        p.tick();
        assert_eq!((p.x, p.y), (102.0, 101.0));
        assert_eq!(p.vx, 1.0);
        // vy = 1.0 * 0.5 + 0.25
        assert_eq!(p.vy, 0.75);
        assert_eq!(p.size, 6.0);
        assert_eq!(p.life, 59);
    }

    #[test]
    fn test_life_strictly_decreases() {
        let mut p = particle(ParticleSpec::default().with_life(5));
        let mut last = p.life;
        while p.is_alive() {
            p.tick();
            assert_eq!(p.life, last - 1);
            last = p.life;
        }
        assert_eq!(p.life, 0);
    }

    #[test]
    fn test_shrink_decay() {
        let mut p = particle(ParticleSpec::default().with_size(10.0).with_shrink());
        p.tick();
        assert!((p.size - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_wave_ignores_vx() {
        let mut p = particle(
            ParticleSpec::default()
                .with_velocity(50.0, -1.0)
                .with_archetype(Archetype::Wave {
                    amplitude: 10.0,
                    frequency: 0.5,
                }),
        );
        p.tick();
        let expected = 100.0 + (0.5f32).sin() * 10.0;
        assert!((p.x - expected).abs() < 1e-4);
        assert_eq!(p.y, 99.0);
    }

    #[test]
    fn test_inward_spiral_converges() {
        let mut p = particle(ParticleSpec::default().with_life(10).with_archetype(
            Archetype::InwardSpiral {
                angle: 0.0,
                start_radius: 100.0,
                end_radius: 10.0,
            },
        ));
        assert_eq!((p.x, p.y), (200.0, 100.0));
        for _ in 0..10 {
            p.tick();
        }
        assert!((p.x - 110.0).abs() < 1e-3);
        assert!((p.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_opacity_tail_clamp() {
        let mut p = particle(ParticleSpec::default().with_life(100));
        assert_eq!(p.opacity(), 1.0);
        p.life = 50;
        assert_eq!(p.opacity(), 0.5);
        p.life = 5;
        // life/max = 0.05 < life/10 = 0.5
        assert_eq!(p.opacity(), 0.05);
        p.life = 0;
        assert_eq!(p.opacity(), 0.0);
    }

    #[test]
    fn test_short_life_tail_clamp() {
        let mut p = particle(ParticleSpec::default().with_life(8));
        assert_eq!(p.opacity(), 0.8);
        p.tick();
        assert_eq!(p.opacity(), 0.7);
    }

    #[test]
    fn test_zero_life_clamped_to_one_tick() {
        let mut p = particle(ParticleSpec::default().with_life(0));
        assert!(p.is_alive());
        p.tick();
        assert!(!p.is_alive());
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(1000.0), 60);
        assert_eq!(ms_to_ticks(50.0), 3);
        assert_eq!(ms_to_ticks(1.0), 1);
    }
}
