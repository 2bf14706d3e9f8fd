//! # Easing 模块
//!
//! 缓动函数库，用于动画的时间插值。
//!
//! 名称与页面脚本中使用的 camelCase 写法一致（`easeOutCubic` 等），
//! 未知名称回退到 [`EasingFunction::EaseOutCubic`]。

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EasingFunction {
    /// 线性（匀速）
    Linear,
    /// 二次缓入
    EaseInQuad,
    /// 二次缓出
    EaseOutQuad,
    /// 二次缓入缓出
    EaseInOutQuad,
    /// 三次缓入
    EaseInCubic,
    /// 三次缓出
    #[default]
    EaseOutCubic,
    /// 三次缓入缓出
    EaseInOutCubic,
    /// 正弦缓入
    EaseInSine,
    /// 正弦缓出
    EaseOutSine,
    /// 正弦缓入缓出
    EaseInOutSine,
    /// 回弹缓出（会略微越过终点）
    EaseOutBack,
    /// 弹性缓出
    EaseOutElastic,
    /// 弹跳缓出
    EaseOutBounce,
}

impl EasingFunction {
    pub const ALL: [EasingFunction; 13] = [
        Self::Linear,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseOutBack,
        Self::EaseOutElastic,
        Self::EaseOutBounce,
    ];

    /// 从名称解析，未知名称回退到 `EaseOutCubic`
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|easing| easing.name() == name)
            .unwrap_or_else(|| {
                tracing::debug!(name = %name, "未知的缓动函数，使用 easeOutCubic");
                Self::EaseOutCubic
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInSine => "easeInSine",
            Self::EaseOutSine => "easeOutSine",
            Self::EaseInOutSine => "easeInOutSine",
            Self::EaseOutBack => "easeOutBack",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseOutBounce => "easeOutBounce",
        }
    }

    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseOutBack => ease_out_back(t),
            Self::EaseOutElastic => ease_out_elastic(t),
            Self::EaseOutBounce => ease_out_bounce(t),
        }
    }
}

impl From<String> for EasingFunction {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<EasingFunction> for String {
    fn from(easing: EasingFunction) -> Self {
        easing.name().to_string()
    }
}

fn ease_out_back(t: f32) -> f32 {
    let c1 = 1.70158;
    let c3 = c1 + 1.0;
    1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
}

fn ease_out_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in EasingFunction::ALL {
            assert!(easing.apply(0.0).abs() < 0.001, "{}", easing.name());
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{}", easing.name());
        }
    }

    #[test]
    fn test_clamp() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
    }

    #[test]
    fn test_ease_out_back_overshoots() {
        let peak = (1..100)
            .map(|i| EasingFunction::EaseOutBack.apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_ease_in_out_quad_midpoint() {
        assert!((EasingFunction::EaseInOutQuad.apply(0.5) - 0.5).abs() < 0.001);
        assert!((EasingFunction::EaseInOutQuad.apply(0.75) - 0.875).abs() < 0.001);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(EasingFunction::from_name("linear"), EasingFunction::Linear);
        assert_eq!(EasingFunction::from_name("easeOutBack"), EasingFunction::EaseOutBack);
        assert_eq!(EasingFunction::from_name("wobbly"), EasingFunction::EaseOutCubic);
        for easing in EasingFunction::ALL {
            assert_eq!(EasingFunction::from_name(easing.name()), easing);
        }
    }

    #[test]
    fn test_serde_by_name() {
        let easing: EasingFunction = serde_json::from_str("\"easeOutElastic\"").unwrap();
        assert_eq!(easing, EasingFunction::EaseOutElastic);
        assert_eq!(
            serde_json::to_string(&EasingFunction::EaseInQuad).unwrap(),
            "\"easeInQuad\""
        );
    }
}
