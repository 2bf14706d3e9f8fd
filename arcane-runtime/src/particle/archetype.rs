//! # Archetype 模块
//!
//! 粒子的渲染形状/行为类别。集合是封闭的：沿固定路径运动之类的
//! 特殊行为也表达为带参数的变体，而不是给单个粒子注入更新逻辑。

/// 粒子原型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Archetype {
    /// 实心圆
    #[default]
    Circle,
    /// 以位置为中心的实心方块
    Square,
    /// 尖端朝上的实心三角形（随 rotation 旋转）
    Triangle,
    /// 空心圆环
    Stroke {
        /// 线宽
        line_width: f32,
    },
    /// 沿速度方向反向拖尾的线段，线宽等于 size
    Line {
        /// 拖尾长度
        length: f32,
    },
    /// 水平正弦摆动的烟雾团，x 不再积分速度
    Wave {
        /// 摆幅（像素）
        amplitude: f32,
        /// 每帧相位增量
        frequency: f32,
    },
    /// 随机折线闪电
    Lightning {
        /// 折线段数
        segments: u32,
        /// 线宽
        width: f32,
    },
    /// 用水平缩放模拟翻转的卡片
    Card {
        /// 每帧翻转相位增量
        flip_speed: f32,
    },
    /// 两条二次曲线围成的月牙形斩击
    Slash {
        /// 弧线弯曲程度
        curve: f32,
        /// 月牙厚度
        width: f32,
    },
    /// 覆盖整个表面的闪光
    Flash,
    /// 沿固定角度从外向内收缩到锚点
    InwardSpiral {
        /// 相对锚点的方向（弧度）
        angle: f32,
        /// 初始半径
        start_radius: f32,
        /// 寿命结束时的半径
        end_radius: f32,
    },
}

impl Archetype {
    /// 默认线宽的空心圆环
    pub fn stroke() -> Self {
        Self::Stroke { line_width: 1.0 }
    }

    /// 拖尾线段
    pub fn line(length: f32) -> Self {
        Self::Line { length }
    }

    /// 默认参数的摆动烟雾
    pub fn wave() -> Self {
        Self::Wave {
            amplitude: 5.0,
            frequency: 0.1,
        }
    }

    /// 默认参数的闪电
    pub fn lightning() -> Self {
        Self::Lightning {
            segments: 5,
            width: 2.0,
        }
    }

    /// 默认参数的斩击
    pub fn slash() -> Self {
        Self::Slash {
            curve: 20.0,
            width: 2.0,
        }
    }

    /// 原型名称（日志与调试输出使用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Stroke { .. } => "stroke",
            Self::Line { .. } => "line",
            Self::Wave { .. } => "wave",
            Self::Lightning { .. } => "lightning",
            Self::Card { .. } => "card",
            Self::Slash { .. } => "slash",
            Self::Flash => "flash",
            Self::InwardSpiral { .. } => "inward_spiral",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_circle() {
        assert_eq!(Archetype::default(), Archetype::Circle);
        assert_eq!(Archetype::default().name(), "circle");
    }
}
