//! 粒子绘制。每个原型对应唯一一段绘制例程，渲染不修改模拟状态。

use rand::SeedableRng;
use std::f32::consts::TAU;

use super::{Archetype, Particle};
use crate::random::{self, FxRng};
use crate::surface::Surface;

/// Wave 原型的烟雾透明度系数
const WAVE_ALPHA: f32 = 0.3;
/// 闪电每段的最大横向抖动
const LIGHTNING_SPREAD: f32 = 50.0;
/// 闪电每段的纵向步长
const LIGHTNING_STEP: f32 = 30.0;
/// 卡片高宽比
const CARD_ASPECT: f32 = 1.4;

impl Particle {
    /// 绘制到表面
    pub fn render(&self, surface: &mut dyn Surface) {
        if !self.is_alive() {
            return;
        }

        let size = self.size.max(0.0);
        let alpha = self.opacity();

        surface.save();
        surface.set_fill_color(&self.color);
        surface.set_stroke_color(&self.color);
        surface.set_global_alpha(alpha);

        match self.archetype {
            Archetype::Circle | Archetype::InwardSpiral { .. } => {
                surface.begin_path();
                surface.arc(self.x, self.y, size, 0.0, TAU);
                surface.fill();
            }
            Archetype::Square => {
                surface.fill_rect(self.x - size / 2.0, self.y - size / 2.0, size, size);
            }
            Archetype::Triangle => {
                surface.translate(self.x, self.y);
                surface.rotate(self.rotation);
                surface.begin_path();
                surface.move_to(0.0, -size);
                surface.line_to(size / 2.0, size / 2.0);
                surface.line_to(-size / 2.0, size / 2.0);
                surface.fill();
            }
            Archetype::Stroke { line_width } => {
                surface.begin_path();
                surface.arc(self.x, self.y, size, 0.0, TAU);
                surface.set_line_width(line_width);
                surface.stroke();
            }
            Archetype::Line { length } => {
                let heading = self.vy.atan2(self.vx);
                surface.begin_path();
                surface.move_to(self.x, self.y);
                surface.line_to(
                    self.x - heading.cos() * length,
                    self.y - heading.sin() * length,
                );
                surface.set_line_width(size);
                surface.stroke();
            }
            Archetype::Wave { .. } => {
                surface.set_global_alpha(alpha * WAVE_ALPHA);
                surface.begin_path();
                surface.arc(self.x, self.y, size, 0.0, TAU);
                surface.fill();
            }
            Archetype::Lightning { segments, width } => {
                // 抖动由粒子种子和年龄决定，同一帧重复渲染结果一致
                let mut jitter = FxRng::seed_from_u64(self.seed().wrapping_add(self.age() as u64));
                surface.translate(self.x, self.y);
                surface.rotate(self.rotation);
                surface.begin_path();
                surface.move_to(0.0, 0.0);
                let (mut cx, mut cy) = (0.0, 0.0);
                for _ in 0..segments {
                    cx += random::range(&mut jitter, -0.5, 0.5) * LIGHTNING_SPREAD;
                    cy += LIGHTNING_STEP;
                    surface.line_to(cx, cy);
                }
                surface.set_line_width(width);
                surface.stroke();
            }
            Archetype::Card { flip_speed } => {
                surface.translate(self.x, self.y);
                surface.scale((self.age() as f32 * flip_speed).cos(), 1.0);
                surface.rotate(self.rotation);
                surface.fill_rect(-size / 2.0, -size / 2.0, size, size * CARD_ASPECT);
            }
            Archetype::Slash { curve, width } => {
                surface.translate(self.x, self.y);
                surface.rotate(self.rotation);
                surface.begin_path();
                surface.move_to(-size, 0.0);
                surface.quadratic_curve_to(0.0, curve, size, 0.0);
                surface.quadratic_curve_to(0.0, curve + width, -size, 0.0);
                surface.fill();
            }
            Archetype::Flash => {
                let (width, height) = surface.size();
                surface.reset_transform();
                surface.set_global_alpha(self.life as f32 / self.max_life as f32);
                surface.fill_rect(0.0, 0.0, width, height);
            }
        }

        surface.restore();
    }
}
