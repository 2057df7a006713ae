use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Capacity of the skid trail. The oldest mark is dropped on overflow.
pub const MAX_SKID_MARKS: usize = 200;

/// Number of frames a fresh mark survives; alpha falls by `1 / FADE_FRAMES`
/// (0.01) on each of them.
pub const FADE_FRAMES: u16 = 100;

/// A fading point left behind the rear of a drifting car.
///
/// Alpha is stored as remaining fade frames so a fresh mark is gone after
/// exactly [`FADE_FRAMES`] decays, without float accumulation error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkidMark {
    pub position: Vec2,
    frames_left: u16,
}

impl SkidMark {
    /// A fresh mark at full opacity.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            frames_left: FADE_FRAMES,
        }
    }

    /// Opacity in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        f32::from(self.frames_left) / f32::from(FADE_FRAMES)
    }

    fn fade(&mut self) {
        self.frames_left = self.frames_left.saturating_sub(1);
    }

    fn is_faded(&self) -> bool {
        self.frames_left == 0
    }
}

/// Bounded oldest-first FIFO of skid marks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SkidTrail {
    marks: VecDeque<SkidMark>,
}

impl SkidTrail {
    pub fn new() -> Self {
        Self {
            marks: VecDeque::with_capacity(MAX_SKID_MARKS + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// Marks oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &SkidMark> {
        self.marks.iter()
    }

    /// Append a fresh mark, evicting the oldest when over capacity.
    pub fn push(&mut self, position: Vec2) {
        self.marks.push_back(SkidMark::new(position));
        if self.marks.len() > MAX_SKID_MARKS {
            self.marks.pop_front();
        }
    }

    /// Fade every mark by one frame and drop the fully faded ones.
    pub fn decay(&mut self) {
        for mark in &mut self.marks {
            mark.fade();
        }
        self.marks.retain(|m| !m.is_faded());
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_mark_is_opaque() {
        let m = SkidMark::new(Vec2::ZERO);
        assert_eq!(m.alpha(), 1.0);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut trail = SkidTrail::new();
        for i in 0..201 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), MAX_SKID_MARKS);
        // Mark from the first push is gone; the second is now the oldest.
        let first = trail.iter().next().unwrap();
        assert_eq!(first.position.x, 1.0);
        assert!(trail.iter().all(|m| m.position.x != 0.0));
        assert_eq!(trail.iter().last().unwrap().position.x, 200.0);
    }

    #[test]
    fn mark_removed_after_exactly_one_hundred_decays() {
        let mut trail = SkidTrail::new();
        trail.push(Vec2::ZERO);
        for _ in 0..99 {
            trail.decay();
        }
        assert_eq!(trail.len(), 1);
        let alpha = trail.iter().next().unwrap().alpha();
        assert!((alpha - 0.01).abs() < 1e-6);
        trail.decay();
        assert!(trail.is_empty());
    }

    #[test]
    fn alpha_never_increases() {
        let mut trail = SkidTrail::new();
        trail.push(Vec2::ZERO);
        let mut last = trail.iter().next().unwrap().alpha();
        loop {
            let Some(m) = trail.iter().next().copied() else {
                break;
            };
            assert!(m.alpha() <= last);
            last = m.alpha();
            trail.decay();
        }
    }

    #[test]
    fn decay_keeps_order() {
        let mut trail = SkidTrail::new();
        trail.push(Vec2::new(1.0, 0.0));
        trail.decay();
        trail.push(Vec2::new(2.0, 0.0));
        trail.decay();
        let xs: Vec<f32> = trail.iter().map(|m| m.position.x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
        let alphas: Vec<f32> = trail.iter().map(|m| m.alpha()).collect();
        assert!(alphas[0] < alphas[1]);
    }

    #[test]
    fn clear_empties() {
        let mut trail = SkidTrail::new();
        trail.push(Vec2::ZERO);
        trail.clear();
        assert!(trail.is_empty());
    }
}
