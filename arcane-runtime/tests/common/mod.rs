//! 测试用 Stage：记录所有页面侧调用。

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use arcane_runtime::{
    EffectInstance, EffectRegistry, ElementBox, ElementStyle, Extent, ParticleSpec, Rect,
    RecordingSurface, ScreenEffect, ShadowClone, ShadowId, Stage,
};

/// 测试元素
#[derive(Debug, Clone)]
pub struct MockElement {
    pub rect: Rect,
    pub classes: Vec<&'static str>,
    pub opacity: f32,
    pub style: String,
}

#[derive(Debug, Default)]
pub struct MockStage {
    pub viewport: Extent,
    pub global: RecordingSurface,
    pub elements: BTreeMap<&'static str, MockElement>,
    /// 按时间顺序记录的页面事件
    pub log: Vec<String>,
    pub overlay: String,
    pub shadows: BTreeMap<ShadowId, ShadowClone>,
    pub faded: Vec<ShadowId>,
    pub styles: Vec<(String, ElementStyle)>,
    pub attached: usize,
    pub detached: usize,
}

impl MockStage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Extent::new(width, height),
            global: RecordingSurface::new(width, height),
            overlay: "transparent".to_string(),
            ..Default::default()
        }
    }

    pub fn with_element(mut self, id: &'static str, rect: Rect, classes: Vec<&'static str>) -> Self {
        self.elements.insert(
            id,
            MockElement {
                rect,
                classes,
                opacity: 1.0,
                style: String::new(),
            },
        );
        self
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Extent::new(width, height);
        self.global.resize(width, height);
    }

    fn matches(id: &str, element: &MockElement, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            part == id || part.strip_prefix('.').is_some_and(|class| element.classes.contains(&class))
        })
    }
}

impl Stage for MockStage {
    type Canvas = RecordingSurface;
    type Element = &'static str;

    fn viewport(&self) -> Extent {
        self.viewport
    }

    fn global_surface(&mut self) -> &mut RecordingSurface {
        &mut self.global
    }

    fn element_extent(&self, element: &&'static str) -> Option<Extent> {
        self.elements.get(element).map(|e| e.rect.extent())
    }

    fn attach_local_surface(&mut self, element: &&'static str, extent: Extent) -> RecordingSurface {
        self.attached += 1;
        self.log.push(format!("attach:{}", element));
        RecordingSurface::new(extent.width, extent.height)
    }

    fn detach_local_surface(&mut self, element: &&'static str, _surface: RecordingSurface) {
        self.detached += 1;
        self.log.push(format!("detach:{}", element));
    }

    fn set_overlay(&mut self, color: &str) {
        self.overlay = color.to_string();
        self.log.push(format!("overlay:{}", color));
    }

    fn apply_screen_effect(&mut self, effect: ScreenEffect) {
        self.log.push(format!("screen:{}", effect.name()));
    }

    fn clear_screen_effect(&mut self, effect: ScreenEffect) {
        self.log.push(format!("screen-clear:{}", effect.name()));
    }

    fn query_elements(&self, selector: &str) -> Vec<ElementBox> {
        self.elements
            .iter()
            .filter(|(id, element)| Self::matches(id, element, selector))
            .map(|(_, element)| ElementBox {
                rect: element.rect,
                border_radius: "8px".to_string(),
                transform: String::new(),
            })
            .collect()
    }

    fn create_shadow(&mut self, id: ShadowId, shadow: &ShadowClone) {
        self.log.push(format!("shadow:{}", shadow.color));
        self.shadows.insert(id, shadow.clone());
    }

    fn fade_shadow(&mut self, id: ShadowId) {
        self.faded.push(id);
    }

    fn remove_shadow(&mut self, id: ShadowId) {
        self.shadows.remove(&id);
    }

    fn pulse_element_style(&mut self, element: &&'static str, css: &str) -> String {
        self.log.push(format!("pulse:{}", element));
        match self.elements.get_mut(element) {
            Some(e) => {
                let previous = e.style.clone();
                e.style.push_str(css);
                previous
            }
            None => String::new(),
        }
    }

    fn restore_element_style(&mut self, element: &&'static str, previous: String) {
        self.log.push(format!("restore:{}", element));
        if let Some(e) = self.elements.get_mut(element) {
            e.style = previous;
        }
    }

    fn apply_element_style(&mut self, element: &&'static str, style: &ElementStyle) {
        self.styles.push((element.to_string(), style.clone()));
    }

    fn element_opacity(&self, element: &&'static str) -> f32 {
        self.elements.get(element).map_or(1.0, |e| e.opacity)
    }
}

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// 一个长寿命粒子，位于生成框中心
pub fn probe(fx: &mut EffectInstance) {
    let (cx, cy) = (fx.w() / 2.0, fx.h() / 2.0);
    fx.spawn(ParticleSpec::at(cx, cy).with_life(10_000));
}

/// 内置效果库加上 `probe`
pub fn registry_with_probe() -> EffectRegistry {
    EffectRegistry::builtin().with("probe", probe)
}
