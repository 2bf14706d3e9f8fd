//! # Color 模块
//!
//! 颜色字符串辅助函数。颜色始终以 CSS 颜色字符串传递，由渲染表面自行解释。

/// 完全透明（覆盖层的"清除"值）
pub const TRANSPARENT: &str = "transparent";

/// 是否为"持续黑屏"颜色
///
/// `black` 或任意透明度的 `rgba(0,0,0,…)` 会让 IMPACT_FRAME 结束后保留覆盖层，
/// 以便后续命令从黑屏直接切入。比较时忽略大小写与空白。
pub fn is_sustained_black(color: &str) -> bool {
    let compact: String = color
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact == "black" || compact.starts_with("rgba(0,0,0")
}

/// 是否为透明色
pub fn is_transparent(color: &str) -> bool {
    color.trim().eq_ignore_ascii_case(TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sustained_black() {
        assert!(is_sustained_black("black"));
        assert!(is_sustained_black("BLACK"));
        assert!(is_sustained_black("rgba(0,0,0,0.8)"));
        assert!(is_sustained_black("rgba(0, 0, 0, 0.5)"));

        assert!(!is_sustained_black("rgba(10,10,10,0.5)"));
        assert!(!is_sustained_black("rgba(0,0,10,0.5)"));
        assert!(!is_sustained_black("transparent"));
        assert!(!is_sustained_black("#000"));
        assert!(!is_sustained_black("white"));
    }

    #[test]
    fn test_transparent() {
        assert!(is_transparent("transparent"));
        assert!(is_transparent(" Transparent "));
        assert!(!is_transparent("black"));
    }
}
