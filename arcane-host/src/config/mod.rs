//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (arcane.json)
//! 3. 默认值（最低）

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use arcane_runtime::EngineConfig;

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 视口配置
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// 模拟帧率
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// 引擎参数
    #[serde(default)]
    pub engine: EngineConfig,

    /// 无界面舞台上的元素
    #[serde(default = "default_scene")]
    pub scene: Vec<ElementConfig>,
}

/// 视口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: u32,

    #[serde(default = "default_viewport_height")]
    pub height: u32,
}

/// 舞台元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConfig {
    /// 元素 ID（选择器中写作 `#id`）
    pub id: String,

    /// 标签名（选择器中直接匹配，如 `button`）
    #[serde(default = "default_tag")]
    pub tag: String,

    /// class 列表（选择器中写作 `.class`）
    #[serde(default)]
    pub classes: Vec<String>,

    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    #[serde(default = "default_border_radius")]
    pub border_radius: String,

    /// CSS transform，空表示无变换
    #[serde(default)]
    pub transform: String,

    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl ElementConfig {
    pub fn new(id: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            tag: default_tag(),
            classes: Vec::new(),
            x,
            y,
            width,
            height,
            border_radius: default_border_radius(),
            transform: String::new(),
            opacity: default_opacity(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }
}

// 默认值函数
fn default_fps() -> u32 {
    60
}

fn default_viewport_width() -> u32 {
    1920
}

fn default_viewport_height() -> u32 {
    1080
}

fn default_tag() -> String {
    "div".to_string()
}

fn default_border_radius() -> String {
    "0px".to_string()
}

fn default_opacity() -> f32 {
    1.0
}

/// 演示页面：效果卡片网格和两个按钮
fn default_scene() -> Vec<ElementConfig> {
    let mut scene = vec![
        ElementConfig::new("htmlAnimButton", 660.0, 40.0, 280.0, 48.0).with_tag("button"),
        ElementConfig::new("sequenceButton", 960.0, 40.0, 300.0, 48.0).with_tag("button"),
    ];
    for (index, name) in crate::showcase::CARD_EFFECTS.iter().enumerate() {
        let column = (index % 5) as f32;
        let row = (index / 5) as f32;
        let mut card = ElementConfig::new(*name, 260.0 + column * 290.0, 160.0 + row * 290.0, 250.0, 250.0)
            .with_class("effect-card");
        card.border_radius = "12px".to_string();
        scene.push(card);
    }
    scene
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            fps: default_fps(),
            engine: EngineConfig::default(),
            scene: default_scene(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "配置文件加载成功");
                config
            }
            Err(err) => {
                tracing::warn!(error = %err, "配置文件加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载配置文件，失败时返回错误
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Validation("视口尺寸必须大于 0".to_string()));
        }

        if !(1..=240).contains(&self.fps) {
            return Err(ConfigError::Validation(format!(
                "帧率必须在 1 - 240 之间，实际为 {}",
                self.fps
            )));
        }

        if self.engine.local_grace_ticks < 0 {
            return Err(ConfigError::Validation("局部保持帧数不能为负".to_string()));
        }

        if self.engine.global_frame.width <= 0.0 || self.engine.global_frame.height <= 0.0 {
            return Err(ConfigError::Validation("全局生成框尺寸必须大于 0".to_string()));
        }

        let mut seen = BTreeSet::new();
        for element in &self.scene {
            if element.id.is_empty() {
                return Err(ConfigError::Validation("元素 ID 不能为空".to_string()));
            }
            if !seen.insert(element.id.as_str()) {
                return Err(ConfigError::Validation(format!("元素 ID 重复: {}", element.id)));
            }
            if element.width < 0.0 || element.height < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "元素尺寸不能为负: {}",
                    element.id
                )));
            }
        }

        Ok(())
    }

    /// 每帧间隔（秒）
    pub fn frame_interval_secs(&self) -> f64 {
        1.0 / self.fps.max(1) as f64
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}
