//! # Error 模块
//!
//! 定义 arcane-runtime 中使用的错误类型。
//!
//! 运行期的异常（未知效果、未知序列命令、坐标格式错误）一律在检测点
//! 记录警告并降级处理，不会向调用方传播；只有加载外部数据（序列 JSON）
//! 的入口返回 `Result`。

use thiserror::Error;

/// 序列解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// JSON 语法错误
    #[error("序列 JSON 解析失败: {message}")]
    Json { message: String },

    /// 顶层不是数组
    #[error("序列必须是 JSON 数组")]
    NotAnArray,
}

impl From<serde_json::Error> for SequenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            message: err.to_string(),
        }
    }
}

/// arcane-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FxError {
    /// 注册表中不存在该效果
    #[error("效果 '{name}' 未注册")]
    UnknownEffect { name: String },

    /// 未知的序列命令
    #[error("未知的序列命令 '{kind}'")]
    UnknownCommand { kind: String },

    /// 坐标既不是数值也不是百分比
    #[error("无效的坐标 '{raw}'")]
    MalformedCoordinate { raw: String },

    /// 序列解析错误
    #[error("序列错误: {0}")]
    Sequence(#[from] SequenceError),
}

/// Result 类型别名
pub type FxResult<T> = Result<T, FxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FxError::UnknownEffect {
            name: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "效果 'nope' 未注册");

        let err: FxError = SequenceError::NotAnArray.into();
        assert_eq!(err.to_string(), "序列错误: 序列必须是 JSON 数组");
    }

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
        let err = SequenceError::from(err);
        assert!(matches!(err, SequenceError::Json { .. }));
    }
}
