//! # Stage 模块
//!
//! 引擎与页面之间的边界。
//!
//! 引擎只做纯逻辑（粒子、序列、动画时间轴），所有页面侧操作都经由
//! [`Stage`] 完成：视口尺寸、全局画布、元素画布的挂载、覆盖层、
//! 全屏效果、阴影克隆、元素样式。宿主实现该 trait。

use std::fmt;

use crate::animation::ElementStyle;
use crate::coord::Extent;
use crate::sequence::ScreenEffect;
use crate::surface::Surface;

/// 阴影克隆 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShadowId(pub u64);

impl ShadowId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ShadowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shadow#{}", self.0)
    }
}

/// 视口坐标系中的矩形
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// 宽或高为 0（不可见或不在屏幕上）
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }
}

/// 选择器匹配到的元素外形
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementBox {
    /// 包围盒
    pub rect: Rect,
    /// 圆角（CSS 值）
    pub border_radius: String,
    /// 变换（CSS 值，无变换时为空）
    pub transform: String,
}

/// 阴影克隆：复制元素外形的纯色块
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowClone {
    pub rect: Rect,
    pub border_radius: String,
    pub transform: String,
    pub color: String,
}

impl ShadowClone {
    pub fn from_box(element: ElementBox, color: impl Into<String>) -> Self {
        Self {
            rect: element.rect,
            border_radius: element.border_radius,
            transform: element.transform,
            color: color.into(),
        }
    }
}

/// 页面侧协作者
pub trait Stage {
    /// 绘制表面类型
    type Canvas: Surface;
    /// 元素句柄
    type Element: Clone + fmt::Debug;

    // ========== 画布 ==========

    /// 当前视口尺寸
    fn viewport(&self) -> Extent;

    /// 覆盖整个视口的共享画布
    fn global_surface(&mut self) -> &mut Self::Canvas;

    /// 元素尺寸，元素不存在时返回 `None`
    fn element_extent(&self, element: &Self::Element) -> Option<Extent>;

    /// 在元素上方挂载一块独占画布
    fn attach_local_surface(&mut self, element: &Self::Element, extent: Extent) -> Self::Canvas;

    /// 卸载元素画布
    fn detach_local_surface(&mut self, element: &Self::Element, surface: Self::Canvas);

    // ========== 全屏 ==========

    /// 设置覆盖层背景色
    fn set_overlay(&mut self, color: &str);

    fn apply_screen_effect(&mut self, effect: ScreenEffect);

    fn clear_screen_effect(&mut self, effect: ScreenEffect);

    // ========== 阴影 ==========

    /// 按选择器查询元素外形
    fn query_elements(&self, selector: &str) -> Vec<ElementBox>;

    fn create_shadow(&mut self, id: ShadowId, shadow: &ShadowClone);

    /// 开始淡出
    fn fade_shadow(&mut self, id: ShadowId);

    fn remove_shadow(&mut self, id: ShadowId);

    // ========== 元素样式 ==========

    /// 追加 CSS，返回追加前的样式文本
    fn pulse_element_style(&mut self, element: &Self::Element, css: &str) -> String;

    /// 恢复为 `pulse_element_style` 返回的样式文本
    fn restore_element_style(&mut self, element: &Self::Element, previous: String);

    fn apply_element_style(&mut self, element: &Self::Element, style: &ElementStyle);

    /// 元素当前透明度
    fn element_opacity(&self, element: &Self::Element) -> f32;
}
