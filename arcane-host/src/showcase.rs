//! # Showcase 模块
//!
//! 演示数据：效果卡片列表、完整冲击序列、元素弹出/回弹动画。

use arcane_runtime::{EasingFunction, HtmlAnimationSpec, Sequence, SequenceError};

/// 演示页面上的效果卡片（局部效果）
pub const CARD_EFFECTS: [&str; 15] = [
    "fire_engulf",
    "fire_burst",
    "fire_spiral",
    "water_bubble",
    "water_splash",
    "water_vortex",
    "wind_gust",
    "wind_swirl",
    "wind_cutter",
    "earth_crumble",
    "earth_spike",
    "earth_shield",
    "anime_cut",
    "hit_impact",
    "flash_step",
];

/// 完整冲击序列：持续黑屏、阴影克隆、斩击、抖动与白闪
pub const ULTIMATE_SEQUENCE: &str = r##"[
    ["IMPACT_FRAME", 1, "black", "none"],
    ["WAIT", 100],
    ["SHADOW", 500, ".effect-card, button", "#FF00FF"],
    ["VFX", 100, "anime_cut", "20%", "30%", {}],
    ["VFX", 100, "anime_cut", "80%", "70%", {}],
    ["WAIT", 200],
    ["IMPACT_FRAME", 50, "transparent", "shake"],
    ["VFX", 1, "impact_flash_white", "50%", "50%", {}],
    ["WAIT", 300]
]"##;

/// 解析内置的完整冲击序列
pub fn ultimate_sequence() -> Result<Sequence, SequenceError> {
    Sequence::from_json(ULTIMATE_SEQUENCE)
}

/// 弹出：弹性缓动的位移、旋转、放大与半透明
///
/// `jitter` 取 `[0, 1)`，用于让每个元素的动作略有不同。
pub fn pop_out(jitter: f32) -> HtmlAnimationSpec {
    HtmlAnimationSpec::new(500 + (jitter * 500.0) as u64)
        .with_easing(EasingFunction::EaseOutElastic)
        .with_move((jitter - 0.5) * 50.0, (0.5 - jitter) * 50.0)
        .with_scale(110.0 + jitter * 20.0)
        .with_rotate(720.0 + jitter * 360.0)
        .with_opacity(0.8)
}

/// 回弹：回到原位
pub fn settle_back() -> HtmlAnimationSpec {
    HtmlAnimationSpec::new(500)
        .with_easing(EasingFunction::EaseOutBack)
        .with_move(0.0_f32, 0.0_f32)
        .with_scale(100.0)
        .with_rotate(0.0)
        .with_opacity(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ultimate_sequence_parses() {
        let sequence = ultimate_sequence().unwrap();
        assert_eq!(sequence.len(), 9);
        assert_eq!(sequence.total_delay(), Duration::from_millis(1352));
    }

    #[test]
    fn test_card_effects_are_builtin() {
        let registry = arcane_runtime::EffectRegistry::builtin();
        for name in CARD_EFFECTS {
            assert!(registry.contains(name), "{}", name);
        }
    }

    #[test]
    fn test_pop_out_ranges() {
        let spec = pop_out(0.5);
        assert_eq!(spec.duration, 750);
        assert_eq!(spec.scale_factor(), Some(1.2));
        assert_eq!(spec.rotate, Some(900.0));
    }
}
