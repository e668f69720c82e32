//! Drop Target Registry
//!
//! The presentation layer registers each stack's on-screen drop region and
//! refreshes it on layout changes. Hit-testing is pure coordinate
//! containment; no host "elements at point" lookup is involved.

use serde::{Deserialize, Serialize};

use crate::domain::StackId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned screen rectangle (left/top inclusive, right/bottom exclusive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

#[derive(Debug, Clone)]
struct Region {
    stack_id: StackId,
    rect: Rect,
    z_index: i32,
    /// Registration order; later registrations render above earlier ones
    order: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DropTargetRegistry {
    regions: Vec<Region>,
    next_order: u64,
}

impl DropTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the drop region of a stack
    pub fn register(&mut self, stack_id: StackId, rect: Rect, z_index: i32) {
        let order = self.next_order;
        self.next_order += 1;
        self.regions.retain(|r| r.stack_id != stack_id);
        self.regions.push(Region {
            stack_id,
            rect,
            z_index,
            order,
        });
    }

    pub fn unregister(&mut self, stack_id: &StackId) -> bool {
        let before = self.regions.len();
        self.regions.retain(|r| &r.stack_id != stack_id);
        self.regions.len() != before
    }

    /// Drop regions whose stack is no longer present
    pub fn retain_stacks<'a>(&mut self, live: impl IntoIterator<Item = &'a StackId>) {
        let live: std::collections::HashSet<&StackId> = live.into_iter().collect();
        self.regions.retain(|r| live.contains(&r.stack_id));
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn region(&self, stack_id: &StackId) -> Option<Rect> {
        self.regions.iter().find(|r| &r.stack_id == stack_id).map(|r| r.rect)
    }

    /// Topmost stack under `point`, never `origin`
    pub fn resolve(&self, point: Point, origin: Option<&StackId>) -> Option<StackId> {
        self.regions
            .iter()
            .filter(|r| Some(&r.stack_id) != origin && r.rect.contains(point))
            .max_by_key(|r| (r.z_index, r.order))
            .map(|r| r.stack_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DropTargetRegistry {
        let mut reg = DropTargetRegistry::new();
        reg.register(StackId::from("books"), Rect::new(0.0, 0.0, 50.0, 50.0), 0);
        reg.register(StackId::from("tech"), Rect::new(60.0, 0.0, 50.0, 50.0), 0);
        reg
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(29.9, 29.9)));
        assert!(!r.contains(Point::new(30.0, 15.0)));
        assert!(!r.contains(Point::new(9.9, 15.0)));
    }

    #[test]
    fn test_resolve_point_inside_region() {
        let reg = registry();
        assert_eq!(reg.resolve(Point::new(70.0, 10.0), None), Some(StackId::from("tech")));
        assert_eq!(reg.resolve(Point::new(55.0, 10.0), None), None);
    }

    #[test]
    fn test_origin_is_never_a_target() {
        let reg = registry();
        let books = StackId::from("books");
        assert_eq!(reg.resolve(Point::new(10.0, 10.0), Some(&books)), None);
        assert_eq!(reg.resolve(Point::new(70.0, 10.0), Some(&books)), Some(StackId::from("tech")));
    }

    #[test]
    fn test_overlap_resolves_to_topmost() {
        let mut reg = registry();
        reg.register(StackId::from("gifts"), Rect::new(40.0, 0.0, 40.0, 50.0), 0);
        // Same z-index: latest registration is on top
        assert_eq!(reg.resolve(Point::new(45.0, 10.0), None), Some(StackId::from("gifts")));

        reg.register(StackId::from("books"), Rect::new(0.0, 0.0, 50.0, 50.0), 5);
        assert_eq!(reg.resolve(Point::new(45.0, 10.0), None), Some(StackId::from("books")));

        // Origin on top still lets the region below through
        let books = StackId::from("books");
        assert_eq!(reg.resolve(Point::new(45.0, 10.0), Some(&books)), Some(StackId::from("gifts")));
    }

    #[test]
    fn test_reregister_replaces_region() {
        let mut reg = registry();
        reg.register(StackId::from("tech"), Rect::new(200.0, 0.0, 10.0, 10.0), 0);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.resolve(Point::new(70.0, 10.0), None), None);
        assert!(reg.unregister(&StackId::from("tech")));
        assert!(!reg.unregister(&StackId::from("tech")));
    }

    #[test]
    fn test_retain_stacks() {
        let mut reg = registry();
        let live = vec![StackId::from("tech")];
        reg.retain_stacks(&live);
        assert_eq!(reg.len(), 1);
        assert!(reg.region(&StackId::from("books")).is_none());
    }
}
