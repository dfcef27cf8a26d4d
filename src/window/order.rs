//! Render order resolution
//!
//! Decides the sorting order a window receives when it becomes visible:
//! explicit fixed orders for widgets, a small offset above the parent for
//! parented windows, and otherwise one increment above the highest stacked
//! top-level window so the newest screen renders on top.

use super::registry::WindowRegistry;
use super::{Window, WindowKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderResolver {
    /// Gap between independently stacked top-level windows
    order_increment: i32,
}

impl OrderResolver {
    pub fn new(order_increment: i32) -> Self {
        Self { order_increment }
    }

    pub fn compute(&self, window: &Window, registry: &WindowRegistry) -> i32 {
        if window.kind() == WindowKind::Widget && window.fixed_order() != 0 {
            return window.fixed_order();
        }

        if let Some(parent) = window.parent().and_then(|p| registry.get(p)) {
            return parent.render_order() + window.widget_order_addition();
        }

        // The window itself is registered, so it takes part in the maximum.
        registry
            .windows()
            .filter(|w| w.fixed_order() == 0 && w.parent().is_none())
            .map(Window::render_order)
            .max()
            .map_or(0, |max| max + self.order_increment)
    }
}

impl Default for OrderResolver {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{WindowId, WindowTemplate};
    use proptest::prelude::*;

    fn register(registry: &mut WindowRegistry, name: &str, template: &WindowTemplate) -> WindowId {
        let id = WindowId::new(name);
        registry.register(Window::from_template(id.clone(), template, 5));
        id
    }

    fn show(registry: &mut WindowRegistry, resolver: &OrderResolver, id: &WindowId) -> i32 {
        let order = resolver.compute(registry.get(id).unwrap(), registry);
        registry.get_mut(id).unwrap().set_render_order(order);
        order
    }

    #[test]
    fn test_fixed_order_widget_uses_fixed_value() {
        let mut registry = WindowRegistry::new();
        let id = register(&mut registry, "Toast", &WindowTemplate::widget().with_fixed_order(900));

        assert_eq!(OrderResolver::default().compute(registry.get(&id).unwrap(), &registry), 900);
    }

    #[test]
    fn test_fixed_order_ignored_for_normal_windows() {
        let mut registry = WindowRegistry::new();
        let id = register(&mut registry, "Main", &WindowTemplate::default().with_fixed_order(900));

        // A normal window with a fixed order is excluded from the maximum,
        // so with nothing else registered it lands on the baseline.
        assert_eq!(OrderResolver::default().compute(registry.get(&id).unwrap(), &registry), 0);
    }

    #[test]
    fn test_parented_window_sits_above_parent() {
        let mut registry = WindowRegistry::new();
        let resolver = OrderResolver::default();
        let main = register(&mut registry, "Main", &WindowTemplate::default());
        assert_eq!(show(&mut registry, &resolver, &main), 50);

        let bar = register(&mut registry, "TopBar", &WindowTemplate::widget());
        registry.get_mut(&bar).unwrap().set_parent(Some(main.clone()));

        assert_eq!(show(&mut registry, &resolver, &bar), 55);
    }

    #[test]
    fn test_top_level_windows_stack_by_increment() {
        let mut registry = WindowRegistry::new();
        let resolver = OrderResolver::default();

        let a = register(&mut registry, "A", &WindowTemplate::default());
        assert_eq!(show(&mut registry, &resolver, &a), 50);
        let b = register(&mut registry, "B", &WindowTemplate::default());
        assert_eq!(show(&mut registry, &resolver, &b), 100);
        let c = register(&mut registry, "C", &WindowTemplate::default());
        assert_eq!(show(&mut registry, &resolver, &c), 150);
    }

    #[test]
    fn test_empty_candidate_set_yields_zero() {
        let registry = WindowRegistry::new();
        let orphan = Window::from_template(WindowId::new("Ghost"), &WindowTemplate::default(), 5);

        assert_eq!(OrderResolver::default().compute(&orphan, &registry), 0);
    }

    proptest! {
        #[test]
        fn prop_stacked_orders_strictly_increase(count in 1usize..20, increment in 1i32..200) {
            let mut registry = WindowRegistry::new();
            let resolver = OrderResolver::new(increment);
            let mut last = i32::MIN;
            for i in 0..count {
                let id = register(&mut registry, &format!("W{}", i), &WindowTemplate::default());
                let order = show(&mut registry, &resolver, &id);
                prop_assert!(order > last);
                last = order;
            }
            prop_assert_eq!(last, increment * count as i32);
        }
    }
}
