//! # Coord 模块
//!
//! 坐标值：绝对像素、百分比或"自动居中"。
//!
//! 坐标只在生成效果的那一刻解析一次，之后视口尺寸变化不会影响已生成的效果。
//!
//! ```text
//! 120      -> Px(120)
//! "120px"  -> Px(120)
//! "50%"    -> Percent(50)
//! "abc"    -> Auto（记录警告，落在轴中心）
//! ```

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::{FxError, FxResult};

/// 单轴坐标
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Coord {
    /// 绝对像素
    Px(f32),
    /// 相对所在轴长度的百分比（0 - 100）
    Percent(f32),
    /// 轴中心
    #[default]
    Auto,
}

impl Coord {
    /// 视口中心（`"50%"`）
    pub const CENTER: Coord = Coord::Percent(50.0);

    /// 严格解析坐标字符串
    pub fn parse(raw: &str) -> FxResult<Self> {
        let trimmed = raw.trim();
        let malformed = || FxError::MalformedCoordinate {
            raw: raw.to_string(),
        };

        // NaN / inf 同样视为格式错误
        let finite = |text: &str| text.trim().parse::<f32>().ok().filter(|v| v.is_finite());

        if let Some(pct) = trimmed.strip_suffix('%') {
            return finite(pct).map(Coord::Percent).ok_or_else(malformed);
        }

        let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
        finite(number).map(Coord::Px).ok_or_else(malformed)
    }

    /// 宽松解析：格式错误时记录警告并返回 [`Coord::Auto`]
    pub fn parse_lenient(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(coord) => coord,
            Err(err) => {
                tracing::warn!(error = %err, "坐标格式无效，使用轴中心");
                Coord::Auto
            }
        }
    }

    /// 解析为像素位置（`Auto` 取轴中心）
    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Coord::Px(v) => v,
            Coord::Percent(p) => p / 100.0 * extent,
            Coord::Auto => extent / 2.0,
        }
    }

    /// 解析为像素偏移量（`Auto` 取 0）
    pub fn to_offset(self, extent: f32) -> f32 {
        match self {
            Coord::Auto => 0.0,
            other => other.resolve(extent),
        }
    }
}

impl From<f32> for Coord {
    fn from(value: f32) -> Self {
        Coord::Px(value)
    }
}

impl From<&str> for Coord {
    fn from(raw: &str) -> Self {
        Coord::parse_lenient(raw)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Px(v) => write!(f, "{}px", v),
            Coord::Percent(p) => write!(f, "{}%", p),
            Coord::Auto => write!(f, "auto"),
        }
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coord::Px(v) => serializer.serialize_f32(*v),
            Coord::Percent(p) => serializer.serialize_str(&format!("{}%", p)),
            Coord::Auto => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordVisitor;

        impl<'de> Visitor<'de> for CoordVisitor {
            type Value = Coord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a number, a \"px\" string or a percentage string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Coord, E> {
                Ok(Coord::Px(v as f32))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Coord, E> {
                Ok(Coord::Px(v as f32))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Coord, E> {
                Ok(Coord::Px(v as f32))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Coord, E> {
                Ok(Coord::parse_lenient(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Coord, E> {
                Ok(Coord::Auto)
            }

            fn visit_none<E: de::Error>(self) -> Result<Coord, E> {
                Ok(Coord::Auto)
            }
        }

        deserializer.deserialize_any(CoordVisitor)
    }
}

/// 二维坐标
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: Coord,
    pub y: Coord,
}

impl Position {
    pub fn new(x: impl Into<Coord>, y: impl Into<Coord>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }

    /// 视口中心
    pub fn center() -> Self {
        Self {
            x: Coord::CENTER,
            y: Coord::CENTER,
        }
    }

    /// 在给定区域内解析为像素坐标
    pub fn resolve(&self, extent: Extent) -> (f32, f32) {
        (self.x.resolve(extent.width), self.y.resolve(extent.height))
    }
}

/// 矩形区域尺寸
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// 宽或高为 0
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Coord::parse("120").unwrap(), Coord::Px(120.0));
        assert_eq!(Coord::parse("120px").unwrap(), Coord::Px(120.0));
        assert_eq!(Coord::parse(" 50% ").unwrap(), Coord::Percent(50.0));
        assert_eq!(Coord::parse("0").unwrap(), Coord::Px(0.0));
        assert!(Coord::parse("left").is_err());
        assert!(Coord::parse("%").is_err());
    }

    #[test]
    fn test_non_finite_is_malformed() {
        for raw in ["NaN", "inf", "-inf", "infinity", "NaN%", "inf px", "infpx"] {
            assert!(Coord::parse(raw).is_err(), "{}", raw);
            assert_eq!(Coord::parse_lenient(raw), Coord::Auto, "{}", raw);
        }
    }

    #[test]
    fn test_lenient_falls_back_to_center() {
        let coord = Coord::parse_lenient("somewhere");
        assert_eq!(coord, Coord::Auto);
        assert_eq!(coord.resolve(800.0), 400.0);
    }

    #[test]
    fn test_resolve_percent() {
        assert_eq!(Coord::Percent(50.0).resolve(1920.0), 960.0);
        assert_eq!(Coord::Percent(20.0).resolve(1000.0), 200.0);
        assert_eq!(Coord::Px(33.0).resolve(1000.0), 33.0);
    }

    #[test]
    fn test_offset_auto_is_zero() {
        assert_eq!(Coord::Auto.to_offset(500.0), 0.0);
        assert_eq!(Coord::Percent(10.0).to_offset(500.0), 50.0);
    }

    #[test]
    fn test_deserialize_json_values() {
        let coords: Vec<Coord> = serde_json::from_str(r#"[10, 2.5, "30%", "4px", null, "??"]"#).unwrap();
        assert_eq!(
            coords,
            vec![
                Coord::Px(10.0),
                Coord::Px(2.5),
                Coord::Percent(30.0),
                Coord::Px(4.0),
                Coord::Auto,
                Coord::Auto,
            ]
        );
    }

    #[test]
    fn test_serialize_json_values() {
        let json = serde_json::to_string(&vec![Coord::Px(10.0), Coord::Percent(30.0)]).unwrap();
        assert_eq!(json, r#"[10.0,"30%"]"#);
    }

    #[test]
    fn test_position_resolve() {
        let pos = Position::center();
        assert_eq!(pos.resolve(Extent::new(1280.0, 720.0)), (640.0, 360.0));
    }
}
