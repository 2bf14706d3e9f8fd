//! # Surface 模块
//!
//! 2D 立即模式绘图表面的能力集合。
//!
//! 核心逻辑只依赖这里列出的操作，不关心具体实现（浏览器 canvas、
//! GPU 纹理、测试用的录制表面均可）。
//!
//! ```text
//! EffectInstance::render ──► &mut dyn Surface ──► 宿主实现
//! ```

mod recording;

pub use recording::{DrawCall, RecordingSurface};

/// 合成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// 普通覆盖
    #[default]
    SourceOver,
    /// 加色混合：重叠的粒子互相提亮
    Lighter,
}

/// 2D 绘图表面
pub trait Surface {
    /// 表面尺寸 `(width, height)`
    fn size(&self) -> (f32, f32);

    /// 清除矩形区域
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// 清除整个表面
    fn clear(&mut self) {
        let (width, height) = self.size();
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn set_blend_mode(&mut self, mode: BlendMode);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f32);

    // ========== 变换 ==========

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// 恢复单位变换
    fn reset_transform(&mut self);

    // ========== 路径 ==========

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start_angle: f32, end_angle: f32);
    fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}
