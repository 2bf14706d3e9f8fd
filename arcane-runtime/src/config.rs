//! # Config 模块
//!
//! 引擎参数。所有字段都有默认值，宿主可以从配置文件中覆盖任意子集。

use serde::{Deserialize, Serialize};

use crate::coord::Extent;

/// 引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 效果实例的初始寿命（帧），发射器只在寿命大于 0 时工作
    #[serde(default = "default_instance_life")]
    pub instance_life: i32,

    /// 局部效果在发射器停止后额外保持画布的帧数
    #[serde(default = "default_local_grace_ticks")]
    pub local_grace_ticks: i32,

    /// 全局效果的生成框尺寸
    ///
    /// 全局效果以目标点为中心放置一个该尺寸的框，生成器在框内布置粒子，
    /// 因此 `(w / 2, h / 2)` 恰好是目标点。
    #[serde(default = "default_global_frame")]
    pub global_frame: Extent,

    /// 阴影克隆淡出到移除之间的间隔（毫秒）
    #[serde(default = "default_shadow_fade_ms")]
    pub shadow_fade_ms: u64,

    /// 随机种子，`None` 使用系统熵
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instance_life: default_instance_life(),
            local_grace_ticks: default_local_grace_ticks(),
            global_frame: default_global_frame(),
            shadow_fade_ms: default_shadow_fade_ms(),
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// 设置随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

// 默认值函数
fn default_instance_life() -> i32 {
    100
}

fn default_local_grace_ticks() -> i32 {
    10
}

fn default_global_frame() -> Extent {
    Extent::new(240.0, 240.0)
}

fn default_shadow_fade_ms() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.instance_life, 100);
        assert_eq!(config.local_grace_ticks, 10);
        assert_eq!(config.global_frame, Extent::new(240.0, 240.0));
        assert_eq!(config.shadow_fade_ms, 100);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "instance_life": 50 }"#).unwrap();
        assert_eq!(config.instance_life, 50);
        assert_eq!(config.local_grace_ticks, 10);
        assert_eq!(config.shadow_fade_ms, 100);
    }
}
