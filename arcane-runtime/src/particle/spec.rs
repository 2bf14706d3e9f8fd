//! # ParticleSpec 模块
//!
//! 生成粒子的结构化描述。所有字段都有默认值，`spawn` 永不失败。

use super::Archetype;

/// 粒子生成描述
///
/// 位置是相对效果实例原点的偏移；寿命以帧为单位。
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSpec {
    /// 相对原点的 x 偏移
    pub x: f32,
    /// 相对原点的 y 偏移
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// 尺寸（半径或边长）
    pub size: f32,
    /// CSS 颜色
    pub color: String,
    /// 寿命（帧）
    pub life: i32,
    /// 每帧加到 vy 上的重力
    pub gravity: f32,
    /// 每帧速度乘数
    pub drag: f32,
    /// 每帧尺寸增量
    pub growth: f32,
    /// 每帧尺寸乘以 0.90
    pub shrink: bool,
    /// 初始旋转（弧度）
    pub rotation: f32,
    /// 每帧旋转增量
    pub rotation_speed: f32,
    pub archetype: Archetype,
}

impl Default for ParticleSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            size: 5.0,
            color: "#fff".to_string(),
            life: 60,
            gravity: 0.0,
            drag: 1.0,
            growth: 0.0,
            shrink: false,
            rotation: 0.0,
            rotation_speed: 0.0,
            archetype: Archetype::Circle,
        }
    }
}

impl ParticleSpec {
    /// 在相对原点 `(x, y)` 处生成
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_life(mut self, life: i32) -> Self {
        self.life = life;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_growth(mut self, growth: f32) -> Self {
        self.growth = growth;
        self
    }

    /// 开启逐帧收缩
    pub fn with_shrink(mut self) -> Self {
        self.shrink = true;
        self
    }

    pub fn with_rotation(mut self, rotation: f32, speed: f32) -> Self {
        self.rotation = rotation;
        self.rotation_speed = speed;
        self
    }

    pub fn with_archetype(mut self, archetype: Archetype) -> Self {
        self.archetype = archetype;
        self
    }
}
