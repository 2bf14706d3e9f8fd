//! # Html 模块
//!
//! 页面元素的属性动画描述与样式合成。
//!
//! ```text
//! HtmlAnimationSpec ──(start: 解析 move 像素、记录初始透明度)──► HtmlAnimation
//!                                                                   │
//!                                 progress (0..1, 已缓动) ──► style_at ──► ElementStyle
//! ```
//!
//! transform 的顺序固定为 translate、scale、rotate、skew，
//! 与描述中字段的书写顺序无关。

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::coord::Coord;

use super::{Animation, EasingFunction};

fn default_duration_ms() -> u64 {
    1000
}

fn default_glow_color() -> String {
    "#ff00ff".to_string()
}

/// 二维分量，任一分量可缺省
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Axes<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<T>,
}

impl<T> Axes<T> {
    pub fn new(x: Option<T>, y: Option<T>) -> Self {
        Self { x, y }
    }

    pub fn both(x: T, y: T) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

/// 元素动画描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlAnimationSpec {
    /// 时长（毫秒）
    #[serde(default = "default_duration_ms")]
    pub duration: u64,

    #[serde(default)]
    pub easing: EasingFunction,

    /// 位移，像素或视口宽度的百分比
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub translate: Option<Axes<Coord>>,

    /// 缩放百分比（`"120%"` 或 `120` 表示 1.2 倍）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Coord>,

    /// 旋转角度（度）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f32>,

    /// 目标透明度，从元素初始透明度插值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,

    /// 模糊半径（像素）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,

    /// 发光半径（像素）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow: Option<f32>,

    /// 发光颜色
    #[serde(default = "default_glow_color")]
    pub color: String,

    /// 倾斜角度（度）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skew: Option<Axes<f32>>,
}

impl Default for HtmlAnimationSpec {
    fn default() -> Self {
        Self::new(default_duration_ms())
    }
}

impl HtmlAnimationSpec {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration: duration_ms,
            easing: EasingFunction::default(),
            translate: None,
            scale: None,
            rotate: None,
            opacity: None,
            blur: None,
            glow: None,
            color: default_glow_color(),
            skew: None,
        }
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_move(mut self, x: impl Into<Coord>, y: impl Into<Coord>) -> Self {
        self.translate = Some(Axes::both(x.into(), y.into()));
        self
    }

    /// 缩放百分比
    pub fn with_scale(mut self, percent: f32) -> Self {
        self.scale = Some(Coord::Percent(percent));
        self
    }

    pub fn with_rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_blur(mut self, px: f32) -> Self {
        self.blur = Some(px);
        self
    }

    pub fn with_glow(mut self, px: f32, color: impl Into<String>) -> Self {
        self.glow = Some(px);
        self.color = color.into();
        self
    }

    pub fn with_skew(mut self, x: f32, y: f32) -> Self {
        self.skew = Some(Axes::both(x, y));
        self
    }

    /// 时长（秒）
    pub fn duration_secs(&self) -> f32 {
        self.duration as f32 / 1000.0
    }

    /// 目标缩放倍数
    pub fn scale_factor(&self) -> Option<f32> {
        match self.scale? {
            Coord::Percent(v) | Coord::Px(v) => Some(v / 100.0),
            Coord::Auto => None,
        }
    }
}

/// 一帧合成出的元素样式
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ElementStyle {
    pub transform: String,
    pub filter: String,
    pub text_shadow: String,
    pub opacity: f32,
}

/// 运行中的元素动画
#[derive(Debug, Clone)]
pub struct HtmlAnimation<E> {
    pub element: E,
    pub spec: HtmlAnimationSpec,
    pub timeline: Animation,
    /// 启动时的元素透明度
    initial_opacity: f32,
    /// 启动时解析的位移（像素）
    offset: Axes<f32>,
}

impl<E> HtmlAnimation<E> {
    /// 在启动时刻解析目标值
    pub fn new(
        element: E,
        spec: HtmlAnimationSpec,
        timeline: Animation,
        initial_opacity: f32,
        viewport_width: f32,
    ) -> Self {
        let offset = spec
            .translate
            .map(|axes| Axes {
                x: axes.x.map(|c| c.to_offset(viewport_width)),
                y: axes.y.map(|c| c.to_offset(viewport_width)),
            })
            .unwrap_or_default();
        let initial_opacity = if initial_opacity.is_finite() {
            initial_opacity
        } else {
            1.0
        };

        Self {
            element,
            spec,
            timeline,
            initial_opacity,
            offset,
        }
    }

    pub fn initial_opacity(&self) -> f32 {
        self.initial_opacity
    }

    /// 当前进度下的样式
    pub fn current_style(&self) -> ElementStyle {
        self.style_at(self.timeline.progress)
    }

    /// 给定（已缓动）进度下的样式
    pub fn style_at(&self, progress: f32) -> ElementStyle {
        let spec = &self.spec;
        let mut transform = Vec::new();

        if let Some(x) = self.offset.x {
            transform.push(format!("translateX({}px)", x * progress));
        }
        if let Some(y) = self.offset.y {
            transform.push(format!("translateY({}px)", y * progress));
        }
        if let Some(target) = spec.scale_factor() {
            let scale = 1.0 + (target - 1.0) * progress;
            transform.push(format!("scaleX({})", scale));
            transform.push(format!("scaleY({})", scale));
        }
        if let Some(rotate) = spec.rotate {
            transform.push(format!("rotate({}deg)", rotate * progress));
        }
        if let Some(skew) = spec.skew {
            if let Some(x) = skew.x {
                transform.push(format!("skewX({}deg)", x * progress));
            }
            if let Some(y) = skew.y {
                transform.push(format!("skewY({}deg)", y * progress));
            }
        }

        let mut filter = String::new();
        if let Some(blur) = spec.blur {
            let _ = write!(filter, "blur({}px)", blur * progress);
        }

        let text_shadow = spec
            .glow
            .map(|glow| format!("0 0 {}px {}", glow * progress, spec.color))
            .unwrap_or_default();

        let opacity = match spec.opacity {
            Some(target) => self.initial_opacity + (target - self.initial_opacity) * progress,
            None => self.initial_opacity,
        };

        ElementStyle {
            transform: transform.join(" "),
            filter,
            text_shadow,
            opacity,
        }
    }
}
