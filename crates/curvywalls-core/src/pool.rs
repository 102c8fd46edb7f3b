//! Preview object pool and per-render reconciler.
//!
//! Preview walls are expensive to set up on the host, so they are pooled
//! and reconciled against the current polyline instead of being rebuilt
//! every render: occupied slots get a cheap endpoint refresh, freed slots
//! wait in the pool, and new edges reuse a pooled slot before allocating.
//!
//! Slots are arena indices; every index is in exactly one of the free list
//! or the active list at all times.

use crate::scene::{WallSegment, WallStyle};
use kurbo::Point;

/// One reusable preview wall slot.
#[derive(Debug, Clone)]
pub struct PreviewWall {
    segment: WallSegment,
    drawn: bool,
}

impl PreviewWall {
    fn retired() -> Self {
        Self {
            segment: WallSegment::new(Point::ZERO, Point::ZERO, WallStyle::default()),
            drawn: false,
        }
    }

    /// Full first-time setup for a slot coming out of the pool.
    fn draw(&mut self, segment: WallSegment) {
        self.segment = segment;
        self.drawn = true;
    }

    /// Cheap in-place endpoint/style update of an already-drawn slot.
    fn refresh(&mut self, segment: WallSegment) {
        debug_assert!(self.drawn, "refresh of a slot that was never drawn");
        self.segment = segment;
    }

    /// Overwrite stale data before the slot goes back to the pool.
    fn retire(&mut self) {
        self.segment = WallSegment::new(Point::ZERO, Point::ZERO, WallStyle::default());
        self.drawn = false;
    }

    /// The current segment descriptor.
    pub fn segment(&self) -> &WallSegment {
        &self.segment
    }

    /// Whether this slot has had its full setup pass.
    pub fn is_drawn(&self) -> bool {
        self.drawn
    }
}

/// Arena of preview wall slots with free/active bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct WallPreviewPool {
    slots: Vec<PreviewWall>,
    free: Vec<usize>,
    active: Vec<usize>,
}

impl WallPreviewPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the active list in line with the given edges: shrink first,
    /// then refresh occupied slots in place and draw into new ones.
    pub fn reconcile(&mut self, edges: &[(Point, Point)], style: &WallStyle) {
        while self.active.len() > edges.len() {
            if let Some(index) = self.active.pop() {
                self.slots[index].retire();
                self.free.push(index);
            }
        }

        for (i, &(p1, p2)) in edges.iter().enumerate() {
            let segment = WallSegment::new(p1, p2, style.clone());
            if let Some(&index) = self.active.get(i) {
                self.slots[index].refresh(segment);
            } else {
                let index = match self.free.pop() {
                    Some(index) => index,
                    None => {
                        self.slots.push(PreviewWall::retired());
                        log::debug!("preview pool grown to {} slots", self.slots.len());
                        self.slots.len() - 1
                    }
                };
                self.slots[index].draw(segment);
                self.active.push(index);
            }
        }
    }

    /// Return every active slot to the pool.
    pub fn release_all(&mut self) {
        while let Some(index) = self.active.pop() {
            self.slots[index].retire();
            self.free.push(index);
        }
    }

    /// The currently displayed preview walls, in edge order.
    pub fn active_walls(&self) -> impl Iterator<Item = &PreviewWall> {
        self.active.iter().map(|&index| &self.slots[index])
    }

    /// Number of displayed preview walls.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of slots waiting in the pool.
    pub fn pooled_len(&self) -> usize {
        self.free.len()
    }

    /// Total slots ever allocated.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(n: usize) -> Vec<(Point, Point)> {
        (0..n)
            .map(|i| {
                let x = i as f64 * 10.0;
                (Point::new(x, 0.0), Point::new(x + 10.0, 0.0))
            })
            .collect()
    }

    fn check_exclusive_ownership(pool: &WallPreviewPool) {
        let mut seen = vec![false; pool.allocated()];
        for &index in pool.free.iter().chain(pool.active.iter()) {
            assert!(!seen[index], "slot {index} owned twice");
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s), "slot neither free nor active");
    }

    #[test]
    fn test_active_tracks_latest_edge_count() {
        let mut pool = WallPreviewPool::new();
        let style = WallStyle::default();
        let mut max_allocated = 0;
        for n in [4usize, 9, 2, 0, 7, 7, 1] {
            pool.reconcile(&edges(n), &style);
            assert_eq!(pool.active_len(), n);
            assert_eq!(pool.active_len() + pool.pooled_len(), pool.allocated());
            assert!(pool.allocated() >= max_allocated, "pool shrank");
            max_allocated = pool.allocated();
            check_exclusive_ownership(&pool);
        }
        // 9 was the high-water mark; nothing beyond it was allocated
        assert_eq!(pool.allocated(), 9);
    }

    #[test]
    fn test_refresh_keeps_slot_endpoints_current() {
        let mut pool = WallPreviewPool::new();
        let style = WallStyle::default();
        pool.reconcile(&edges(3), &style);

        let moved = vec![
            (Point::new(5.0, 5.0), Point::new(15.0, 5.0)),
            (Point::new(15.0, 5.0), Point::new(25.0, 5.0)),
            (Point::new(25.0, 5.0), Point::new(35.0, 5.0)),
        ];
        pool.reconcile(&moved, &style);

        let walls: Vec<_> = pool.active_walls().collect();
        assert_eq!(walls.len(), 3);
        for (wall, (p1, p2)) in walls.iter().zip(&moved) {
            assert_eq!(wall.segment().p1, *p1);
            assert_eq!(wall.segment().p2, *p2);
            assert!(wall.is_drawn());
        }
    }

    #[test]
    fn test_released_slots_are_scrubbed() {
        let mut pool = WallPreviewPool::new();
        let style = WallStyle::default();
        pool.reconcile(&edges(2), &style);
        pool.release_all();

        assert_eq!(pool.active_len(), 0);
        assert_eq!(pool.pooled_len(), 2);
        for slot in &pool.slots {
            assert!(!slot.is_drawn());
            assert_eq!(slot.segment().p1, Point::ZERO);
            assert_eq!(slot.segment().p2, Point::ZERO);
        }
    }

    #[test]
    fn test_reuse_redraws_before_display() {
        let mut pool = WallPreviewPool::new();
        let style = WallStyle::default();
        pool.reconcile(&edges(2), &style);
        pool.reconcile(&edges(0), &style);
        pool.reconcile(&edges(1), &style);

        let wall = pool.active_walls().next().unwrap();
        assert!(wall.is_drawn());
        assert_eq!(wall.segment().p1, Point::new(0.0, 0.0));
        assert_eq!(wall.segment().p2, Point::new(10.0, 0.0));
        // reused, not reallocated
        assert_eq!(pool.allocated(), 2);
    }
}
