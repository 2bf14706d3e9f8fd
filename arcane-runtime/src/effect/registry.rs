//! # Effect Registry
//!
//! 效果名称到生成器的映射。
//!
//! 注册表在启动时构建一次，之后只读，通过 `Arc` 共享给需要查询的组件；
//! 不存在任何全局可变状态。

use std::collections::BTreeMap;
use std::fmt;

use super::EffectInstance;
use super::library;
use crate::error::{FxError, FxResult};

/// 效果生成器
///
/// 向新建的实例填充初始粒子、安装发射器或声明分段波次。
/// 结构（数量、原型）固定，单个粒子的参数在生成器给定的区间内随机。
pub type Generator = fn(&mut EffectInstance);

/// 效果注册表
#[derive(Clone, Default)]
pub struct EffectRegistry {
    generators: BTreeMap<String, Generator>,
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("effects", &self.generators.len())
            .finish()
    }
}

impl EffectRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 包含全部内置效果的注册表
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        library::register_all(&mut registry);
        tracing::debug!(count = registry.len(), "内置效果注册完成");
        registry
    }

    /// 注册生成器，返回被替换的旧生成器
    pub fn register(&mut self, name: impl Into<String>, generator: Generator) -> Option<Generator> {
        self.generators.insert(name.into(), generator)
    }

    /// 链式注册
    pub fn with(mut self, name: impl Into<String>, generator: Generator) -> Self {
        self.register(name, generator);
        self
    }

    pub fn get(&self, name: &str) -> Option<Generator> {
        self.generators.get(name).copied()
    }

    /// 查找生成器，不存在时返回 [`FxError::UnknownEffect`]
    pub fn lookup(&self, name: &str) -> FxResult<Generator> {
        self.get(name).ok_or_else(|| FxError::UnknownEffect {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// 按名称排序的效果列表
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleSpec;

    fn single(fx: &mut EffectInstance) {
        fx.spawn(ParticleSpec::default());
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = EffectRegistry::new().with("single", single);
        assert!(registry.contains("single"));
        assert!(registry.lookup("single").is_ok());
        assert_eq!(
            registry.lookup("missing").unwrap_err(),
            FxError::UnknownEffect {
                name: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = EffectRegistry::new();
        assert!(registry.register("a", single).is_none());
        assert!(registry.register("a", single).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builtin_names_sorted() {
        let registry = EffectRegistry::builtin();
        let names: Vec<&str> = registry.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert!(registry.contains("fire_burst"));
        assert!(registry.contains("animeExplosion"));
    }
}
