//! # Stage 模块
//!
//! 无界面舞台：在内存中模拟页面。
//!
//! 画布使用 [`RecordingSurface`] 录制绘图调用；元素来自配置中的场景，
//! 支持 `#id`、`.class`、标签名以及逗号分隔的选择器列表。

use std::collections::BTreeMap;

use arcane_runtime::color::is_transparent;
use arcane_runtime::{
    DrawCall, ElementBox, ElementStyle, Extent, RecordingSurface, Rect, ScreenEffect, ShadowClone,
    ShadowId, Stage,
};

use crate::config::{AppConfig, ElementConfig};

/// 舞台元素
#[derive(Debug, Clone, PartialEq)]
pub struct SceneElement {
    pub tag: String,
    pub classes: Vec<String>,
    pub rect: Rect,
    pub border_radius: String,
    pub transform: String,
    pub opacity: f32,
    /// 内联样式文本
    pub style: String,
    /// 最近一次由动画写入的样式
    pub animated: Option<ElementStyle>,
}

impl SceneElement {
    fn from_config(config: &ElementConfig) -> Self {
        Self {
            tag: config.tag.clone(),
            classes: config.classes.clone(),
            rect: Rect::new(config.x, config.y, config.width, config.height),
            border_radius: config.border_radius.clone(),
            transform: config.transform.clone(),
            opacity: config.opacity,
            style: String::new(),
            animated: None,
        }
    }

    /// 匹配单个简单选择器
    fn matches(&self, id: &str, selector: &str) -> bool {
        if let Some(wanted) = selector.strip_prefix('#') {
            wanted == id
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            !selector.is_empty() && selector.eq_ignore_ascii_case(&self.tag)
        }
    }
}

/// 阴影克隆状态
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowState {
    pub clone: ShadowClone,
    pub fading: bool,
}

/// 舞台统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StageStats {
    pub overlay_changes: usize,
    pub screen_effects: usize,
    pub shadows_created: usize,
    pub shadows_removed: usize,
    pub style_pulses: usize,
    pub style_updates: usize,
    pub local_surfaces: usize,
}

/// 无界面舞台
#[derive(Debug)]
pub struct HeadlessStage {
    viewport: Extent,
    global: RecordingSurface,
    elements: BTreeMap<String, SceneElement>,
    overlay: String,
    overlay_history: Vec<String>,
    screen_effects: Vec<ScreenEffect>,
    shadows: BTreeMap<ShadowId, ShadowState>,
    /// 挂载了局部画布的元素
    mounted: BTreeMap<String, usize>,
    stats: StageStats,
}

impl HeadlessStage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Extent::new(width, height),
            global: RecordingSurface::new(width, height),
            elements: BTreeMap::new(),
            overlay: "transparent".to_string(),
            overlay_history: Vec::new(),
            screen_effects: Vec::new(),
            shadows: BTreeMap::new(),
            mounted: BTreeMap::new(),
            stats: StageStats::default(),
        }
    }

    /// 从配置创建舞台
    pub fn from_config(config: &AppConfig) -> Self {
        let mut stage = Self::new(config.viewport.width as f32, config.viewport.height as f32);
        for element in &config.scene {
            stage.insert_element(element);
        }
        stage
    }

    pub fn insert_element(&mut self, config: &ElementConfig) {
        self.elements
            .insert(config.id.clone(), SceneElement::from_config(config));
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Extent::new(width, height);
        self.global.resize(width, height);
    }

    // ========== 查询 ==========

    pub fn element(&self, id: &str) -> Option<&SceneElement> {
        self.elements.get(id)
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    /// 按选择器列出匹配的元素 ID
    pub fn select(&self, selector: &str) -> Vec<String> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).collect();
        self.elements
            .iter()
            .filter(|(id, element)| parts.iter().any(|part| element.matches(id, part)))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn overlay(&self) -> &str {
        &self.overlay
    }

    pub fn overlay_history(&self) -> &[String] {
        &self.overlay_history
    }

    pub fn is_overlay_clear(&self) -> bool {
        is_transparent(&self.overlay)
    }

    pub fn active_screen_effects(&self) -> &[ScreenEffect] {
        &self.screen_effects
    }

    pub fn shadows(&self) -> &BTreeMap<ShadowId, ShadowState> {
        &self.shadows
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted.contains_key(id)
    }

    pub fn stats(&self) -> StageStats {
        self.stats
    }

    pub fn global_calls(&self) -> &[DrawCall] {
        self.global.calls()
    }

    /// 取出全局画布录制的调用
    pub fn take_global_calls(&mut self) -> Vec<DrawCall> {
        self.global.take_calls()
    }
}

impl Stage for HeadlessStage {
    type Canvas = RecordingSurface;
    type Element = String;

    fn viewport(&self) -> Extent {
        self.viewport
    }

    fn global_surface(&mut self) -> &mut RecordingSurface {
        &mut self.global
    }

    fn element_extent(&self, element: &String) -> Option<Extent> {
        self.elements.get(element).map(|e| e.rect.extent())
    }

    fn attach_local_surface(&mut self, element: &String, extent: Extent) -> RecordingSurface {
        *self.mounted.entry(element.clone()).or_default() += 1;
        self.stats.local_surfaces += 1;
        tracing::trace!(element = %element, "挂载局部画布");
        RecordingSurface::new(extent.width, extent.height)
    }

    fn detach_local_surface(&mut self, element: &String, surface: RecordingSurface) {
        if let Some(count) = self.mounted.get_mut(element) {
            *count -= 1;
            if *count == 0 {
                self.mounted.remove(element);
            }
        }
        tracing::trace!(element = %element, calls = surface.calls().len(), "卸载局部画布");
    }

    fn set_overlay(&mut self, color: &str) {
        self.overlay = color.to_string();
        self.overlay_history.push(color.to_string());
        self.stats.overlay_changes += 1;
    }

    fn apply_screen_effect(&mut self, effect: ScreenEffect) {
        self.screen_effects.push(effect);
        self.stats.screen_effects += 1;
    }

    fn clear_screen_effect(&mut self, effect: ScreenEffect) {
        if let Some(index) = self.screen_effects.iter().position(|e| *e == effect) {
            self.screen_effects.remove(index);
        }
    }

    fn query_elements(&self, selector: &str) -> Vec<ElementBox> {
        self.select(selector)
            .iter()
            .filter_map(|id| self.elements.get(id))
            .map(|element| ElementBox {
                rect: element.rect,
                border_radius: element.border_radius.clone(),
                transform: element.transform.clone(),
            })
            .collect()
    }

    fn create_shadow(&mut self, id: ShadowId, shadow: &ShadowClone) {
        self.shadows.insert(
            id,
            ShadowState {
                clone: shadow.clone(),
                fading: false,
            },
        );
        self.stats.shadows_created += 1;
    }

    fn fade_shadow(&mut self, id: ShadowId) {
        if let Some(shadow) = self.shadows.get_mut(&id) {
            shadow.fading = true;
        }
    }

    fn remove_shadow(&mut self, id: ShadowId) {
        if self.shadows.remove(&id).is_some() {
            self.stats.shadows_removed += 1;
        }
    }

    fn pulse_element_style(&mut self, element: &String, css: &str) -> String {
        let Some(target) = self.elements.get_mut(element) else {
            return String::new();
        };
        self.stats.style_pulses += 1;
        let previous = target.style.clone();
        target.style.push_str(css);
        previous
    }

    fn restore_element_style(&mut self, element: &String, previous: String) {
        if let Some(target) = self.elements.get_mut(element) {
            target.style = previous;
        }
    }

    fn apply_element_style(&mut self, element: &String, style: &ElementStyle) {
        if let Some(target) = self.elements.get_mut(element) {
            target.opacity = style.opacity;
            target.animated = Some(style.clone());
            self.stats.style_updates += 1;
        }
    }

    fn element_opacity(&self, element: &String) -> f32 {
        self.elements.get(element).map_or(1.0, |e| e.opacity)
    }
}
