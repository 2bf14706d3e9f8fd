//! # Arcane Host
//!
//! 无界面宿主：从配置搭建模拟页面，以固定帧率驱动引擎。
//!
//! - [`config`]：应用配置（视口、帧率、引擎参数、场景元素）
//! - [`stage`]：实现 `Stage` 的内存舞台
//! - [`driver`]：模拟时钟与帧循环
//! - [`showcase`]：演示数据

pub mod config;
pub mod driver;
pub mod showcase;
pub mod stage;

pub use config::{AppConfig, ConfigError, ElementConfig, ViewportConfig};
pub use driver::{Driver, PlaybackSummary};
pub use stage::{HeadlessStage, SceneElement, ShadowState, StageStats};
