//! # Random 模块
//!
//! 效果生成使用的随机数工具。
//!
//! 每个效果实例持有自己的 [`FxRng`]，种子取自引擎的根随机源，
//! 固定种子即可复现整个场景。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// 效果随机源
pub type FxRng = StdRng;

/// 根据可选种子创建随机源（`None` 使用系统熵）
pub fn make_rng(seed: Option<u64>) -> FxRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// `[lo, hi)` 内均匀分布的随机数，区间为空时返回 `lo`
pub fn range(rng: &mut FxRng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// 以概率 `p` 返回 true
pub fn chance(rng: &mut FxRng, p: f32) -> bool {
    rng.gen_bool(f64::from(p.clamp(0.0, 1.0)))
}

/// 从调色板中随机取一个颜色
pub fn pick<'a>(rng: &mut FxRng, palette: &[&'a str]) -> &'a str {
    palette.choose(rng).copied().unwrap_or("#fff")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let mut rng = make_rng(Some(7));
        for _ in 0..200 {
            let v = range(&mut rng, 2.0, 5.0);
            assert!((2.0..5.0).contains(&v));
        }
        assert_eq!(range(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(range(&mut rng, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = make_rng(Some(42));
        let mut b = make_rng(Some(42));
        assert_eq!(range(&mut a, 0.0, 1.0), range(&mut b, 0.0, 1.0));
    }

    #[test]
    fn test_pick_and_chance() {
        let mut rng = make_rng(Some(1));
        let palette = ["#f00", "#0f0"];
        assert!(palette.contains(&pick(&mut rng, &palette)));
        assert_eq!(pick(&mut rng, &[]), "#fff");
        assert!(chance(&mut rng, 1.0));
        assert!(!chance(&mut rng, 0.0));
    }
}
