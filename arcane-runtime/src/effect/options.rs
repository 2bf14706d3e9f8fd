//! 生成选项：调用方对单次生成的整体调整。

use serde::{Deserialize, Serialize};

/// 生成选项
///
/// 作用于该实例生成的每一个粒子（包括发射器和分段波次生成的粒子）。
/// JSON 中未知字段会被忽略，因此序列文件里的任意选项对象都能被接受。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnOptions {
    /// 覆盖生成器指定的颜色
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// 粒子尺寸倍率
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

impl SpawnOptions {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// 是否没有任何调整
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.scale.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_ignored() {
        let opts: SpawnOptions = serde_json::from_str(r#"{ "scale": 2, "intensity": 9 }"#).unwrap();
        assert_eq!(opts.scale, Some(2.0));
        assert_eq!(opts.color, None);
    }

    #[test]
    fn test_empty() {
        assert!(SpawnOptions::default().is_empty());
        assert!(!SpawnOptions::default().with_color("#f00").is_empty());
    }
}
