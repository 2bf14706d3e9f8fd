//! # Command 模块
//!
//! 序列命令及其交换格式。
//!
//! 交换格式是位置元组的 JSON 数组，字段顺序固定：
//!
//! ```text
//! ["VFX",          delay_ms, effect, x, y, options]
//! ["IMPACT_FRAME", delay_ms, color, screen_effect]
//! ["WAIT",         delay_ms]
//! ["SHADOW",       delay_ms, selector, color]
//! ```
//!
//! 缺失或非数值的 delay 视为 0；未知的命令类型保留为 [`SequenceCommand::Unknown`]，
//! 由执行器记录警告后跳过。

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::color::TRANSPARENT;
use crate::coord::Coord;
use crate::effect::SpawnOptions;
use crate::error::SequenceError;

/// 全屏效果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenEffect {
    /// 无
    #[default]
    None,
    /// 抖动
    Shake,
    /// 模糊
    Blur,
    /// 轻微放大
    Zoom,
}

impl ScreenEffect {
    /// 从名称解析（大小写不敏感），未知名称记录警告并返回 `None`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Self::None,
            "shake" => Self::Shake,
            "blur" => Self::Blur,
            "zoom" => Self::Zoom,
            other => {
                tracing::warn!(name = %other, "未知的全屏效果，忽略");
                Self::None
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Shake => "shake",
            Self::Blur => "blur",
            Self::Zoom => "zoom",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// 序列命令
#[derive(Debug, Clone, PartialEq)]
pub enum SequenceCommand {
    /// 生成全局效果，然后等待 delay
    Vfx {
        delay_ms: u64,
        effect: String,
        /// 缺省时使用序列的目标点
        x: Option<Coord>,
        y: Option<Coord>,
        options: SpawnOptions,
    },
    /// 覆盖层染色（可附带全屏效果），等待 delay 后按需清除
    ImpactFrame {
        delay_ms: u64,
        color: String,
        screen_effect: ScreenEffect,
    },
    /// 纯等待
    Wait { delay_ms: u64 },
    /// 为匹配的元素生成阴影克隆，保持 delay 后淡出
    Shadow {
        delay_ms: u64,
        selector: String,
        color: String,
    },
    /// 未知命令，执行时跳过
    Unknown { kind: String, delay_ms: u64 },
}

impl SequenceCommand {
    pub const VFX: &'static str = "VFX";
    pub const IMPACT_FRAME: &'static str = "IMPACT_FRAME";
    pub const WAIT: &'static str = "WAIT";
    pub const SHADOW: &'static str = "SHADOW";

    /// 在序列目标点生成效果
    pub fn vfx(delay_ms: u64, effect: impl Into<String>) -> Self {
        Self::Vfx {
            delay_ms,
            effect: effect.into(),
            x: None,
            y: None,
            options: SpawnOptions::default(),
        }
    }

    /// 在指定位置生成效果
    pub fn vfx_at(delay_ms: u64, effect: impl Into<String>, x: Coord, y: Coord) -> Self {
        Self::Vfx {
            delay_ms,
            effect: effect.into(),
            x: Some(x),
            y: Some(y),
            options: SpawnOptions::default(),
        }
    }

    pub fn impact_frame(delay_ms: u64, color: impl Into<String>, screen_effect: ScreenEffect) -> Self {
        Self::ImpactFrame {
            delay_ms,
            color: color.into(),
            screen_effect,
        }
    }

    pub fn wait(delay_ms: u64) -> Self {
        Self::Wait { delay_ms }
    }

    pub fn shadow(delay_ms: u64, selector: impl Into<String>, color: impl Into<String>) -> Self {
        Self::Shadow {
            delay_ms,
            selector: selector.into(),
            color: color.into(),
        }
    }

    /// 命令类型名
    pub fn kind(&self) -> &str {
        match self {
            Self::Vfx { .. } => Self::VFX,
            Self::ImpactFrame { .. } => Self::IMPACT_FRAME,
            Self::Wait { .. } => Self::WAIT,
            Self::Shadow { .. } => Self::SHADOW,
            Self::Unknown { kind, .. } => kind,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        match self {
            Self::Vfx { delay_ms, .. }
            | Self::ImpactFrame { delay_ms, .. }
            | Self::Wait { delay_ms }
            | Self::Shadow { delay_ms, .. }
            | Self::Unknown { delay_ms, .. } => *delay_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms())
    }

    /// 从单条 JSON 命令解析
    ///
    /// 格式错误的条目（非数组、空数组、类型不是字符串）不会中断整个序列，
    /// 记录警告后按 [`SequenceCommand::Unknown`] 保留，执行时跳过。
    pub fn from_value(value: &Value) -> Self {
        match value.as_array() {
            Some(values) => Self::from_tuple(values),
            None => {
                tracing::warn!(entry = %value, "序列命令必须是数组，已跳过");
                Self::Unknown {
                    kind: value.to_string(),
                    delay_ms: 0,
                }
            }
        }
    }

    /// 从位置元组解析
    pub fn from_tuple(values: &[Value]) -> Self {
        let delay_ms = values.get(1).map(parse_delay).unwrap_or(0);
        let kind = match values.first() {
            Some(Value::String(kind)) => kind.as_str(),
            Some(other) => {
                tracing::warn!(kind = %other, "序列命令类型必须是字符串，已跳过");
                return Self::Unknown {
                    kind: other.to_string(),
                    delay_ms,
                };
            }
            None => {
                tracing::warn!("空的序列命令，已跳过");
                return Self::Unknown {
                    kind: String::new(),
                    delay_ms,
                };
            }
        };
        let text = |index: usize| values.get(index).and_then(Value::as_str).map(str::to_string);

        match kind {
            Self::VFX => Self::Vfx {
                delay_ms,
                effect: text(2).unwrap_or_default(),
                x: values.get(3).and_then(parse_coord),
                y: values.get(4).and_then(parse_coord),
                options: values.get(5).map(parse_options).unwrap_or_default(),
            },
            Self::IMPACT_FRAME => Self::ImpactFrame {
                delay_ms,
                color: text(2).unwrap_or_else(|| TRANSPARENT.to_string()),
                screen_effect: text(3)
                    .map(|name| ScreenEffect::from_name(&name))
                    .unwrap_or_default(),
            },
            Self::WAIT => Self::Wait { delay_ms },
            Self::SHADOW => Self::Shadow {
                delay_ms,
                selector: text(2).unwrap_or_default(),
                color: text(3).unwrap_or_else(|| "#ffffff".to_string()),
            },
            other => Self::Unknown {
                kind: other.to_string(),
                delay_ms,
            },
        }
    }

    /// 转换为位置元组
    pub fn to_tuple(&self) -> Vec<Value> {
        let mut tuple = vec![Value::from(self.kind()), Value::from(self.delay_ms())];
        match self {
            Self::Vfx {
                effect,
                x,
                y,
                options,
                ..
            } => {
                tuple.push(Value::from(effect.as_str()));
                tuple.push(coord_value(*x));
                tuple.push(coord_value(*y));
                tuple.push(serde_json::to_value(options).unwrap_or(Value::Null));
            }
            Self::ImpactFrame {
                color,
                screen_effect,
                ..
            } => {
                tuple.push(Value::from(color.as_str()));
                tuple.push(Value::from(screen_effect.name()));
            }
            Self::Shadow {
                selector, color, ..
            } => {
                tuple.push(Value::from(selector.as_str()));
                tuple.push(Value::from(color.as_str()));
            }
            Self::Wait { .. } | Self::Unknown { .. } => {}
        }
        tuple
    }
}

fn parse_delay(value: &Value) -> u64 {
    match value.as_f64() {
        Some(ms) if ms.is_finite() && ms > 0.0 => ms.round() as u64,
        _ => 0,
    }
}

fn parse_coord(value: &Value) -> Option<Coord> {
    match value {
        Value::Number(n) => n.as_f64().map(|v| Coord::Px(v as f32)),
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(Coord::parse_lenient(s)),
        Value::Null => None,
        other => {
            tracing::warn!(value = %other, "坐标类型无效，使用序列目标点");
            None
        }
    }
}

fn parse_options(value: &Value) -> SpawnOptions {
    if value.is_null() {
        return SpawnOptions::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "生成选项无效，使用默认值");
        SpawnOptions::default()
    })
}

fn coord_value(coord: Option<Coord>) -> Value {
    coord
        .and_then(|c| serde_json::to_value(c).ok())
        .unwrap_or(Value::Null)
}

impl Serialize for SequenceCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tuple = self.to_tuple();
        let mut seq = serializer.serialize_seq(Some(tuple.len()))?;
        for value in &tuple {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for SequenceCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// 序列：有序且不可变的命令列表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    commands: Vec<SequenceCommand>,
}

impl Sequence {
    pub fn new(commands: Vec<SequenceCommand>) -> Self {
        Self { commands }
    }

    /// 从 JSON 文本解析
    pub fn from_json(text: &str) -> Result<Self, SequenceError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(items) = value else {
            return Err(SequenceError::NotAnArray);
        };

        let commands = items.iter().map(SequenceCommand::from_value).collect();
        Ok(Self { commands })
    }

    /// 序列化为 JSON 文本
    pub fn to_json(&self) -> Result<String, SequenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn commands(&self) -> &[SequenceCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 所有命令 delay 之和
    pub fn total_delay(&self) -> Duration {
        self.commands.iter().map(SequenceCommand::delay).sum()
    }
}

impl FromIterator<SequenceCommand> for Sequence {
    fn from_iter<I: IntoIterator<Item = SequenceCommand>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
