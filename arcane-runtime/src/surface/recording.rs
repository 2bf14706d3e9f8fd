//! # Recording Surface
//!
//! 把所有绘图调用记录成 [`DrawCall`] 列表的表面实现。
//! 用于测试断言和无窗口（headless）宿主。

use super::{BlendMode, Surface};

/// 一次绘图调用
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    ClearRect { x: f32, y: f32, width: f32, height: f32 },
    BlendMode(BlendMode),
    GlobalAlpha(f32),
    FillColor(String),
    StrokeColor(String),
    LineWidth(f32),
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate(f32),
    Scale { sx: f32, sy: f32 },
    ResetTransform,
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    Arc { x: f32, y: f32, radius: f32, start: f32, end: f32 },
    QuadraticCurveTo { cpx: f32, cpy: f32, x: f32, y: f32 },
    Fill,
    Stroke,
    FillRect { x: f32, y: f32, width: f32, height: f32 },
}

/// 录制表面
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    /// 创建指定尺寸的录制表面
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// 调整尺寸（模拟窗口 resize）
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// 已录制的调用
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// 取出并清空已录制的调用
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    /// 统计满足条件的调用数量
    pub fn count(&self, predicate: impl Fn(&DrawCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    /// 产生像素的调用数量（fill / stroke / fill_rect）
    pub fn paint_count(&self) -> usize {
        self.count(|call| matches!(call, DrawCall::Fill | DrawCall::Stroke | DrawCall::FillRect { .. }))
    }

    fn record(&mut self, call: DrawCall) {
        self.calls.push(call);
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(DrawCall::ClearRect { x, y, width, height });
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.record(DrawCall::BlendMode(mode));
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.record(DrawCall::GlobalAlpha(alpha));
    }

    fn set_fill_color(&mut self, color: &str) {
        self.record(DrawCall::FillColor(color.to_string()));
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.record(DrawCall::StrokeColor(color.to_string()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.record(DrawCall::LineWidth(width));
    }

    fn save(&mut self) {
        self.record(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.record(DrawCall::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.record(DrawCall::Translate { x, y });
    }

    fn rotate(&mut self, angle: f32) {
        self.record(DrawCall::Rotate(angle));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.record(DrawCall::Scale { sx, sy });
    }

    fn reset_transform(&mut self) {
        self.record(DrawCall::ResetTransform);
    }

    fn begin_path(&mut self) {
        self.record(DrawCall::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.record(DrawCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.record(DrawCall::LineTo { x, y });
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        self.record(DrawCall::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn quadratic_curve_to(&mut self, cpx: f32, cpy: f32, x: f32, y: f32) {
        self.record(DrawCall::QuadraticCurveTo { cpx, cpy, x, y });
    }

    fn fill(&mut self) {
        self.record(DrawCall::Fill);
    }

    fn stroke(&mut self) {
        self.record(DrawCall::Stroke);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(DrawCall::FillRect {
            x,
            y,
            width,
            height,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_uses_full_size() {
        let mut surface = RecordingSurface::new(300.0, 200.0);
        surface.clear();
        assert_eq!(
            surface.calls(),
            &[DrawCall::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 300.0,
                height: 200.0
            }]
        );
    }

    #[test]
    fn test_take_calls_empties() {
        let mut surface = RecordingSurface::new(10.0, 10.0);
        surface.begin_path();
        surface.fill();
        assert_eq!(surface.paint_count(), 1);
        assert_eq!(surface.take_calls().len(), 2);
        assert!(surface.calls().is_empty());
    }
}
