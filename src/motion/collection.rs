use crate::foundation::core::{Rect, Rgb8};
use crate::motion::point::{MotionLaw, MotionPoint, MotionSpeed};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Unordered set of motion points sharing one random generator.
///
/// Points spawned through the collection draw their initial state from the shared generator, so
/// two collections built from the same seed produce the same points.
#[derive(Clone, Debug)]
pub struct MotionPointCollection {
    rng: StdRng,
    points: Vec<MotionPoint>,
}

impl MotionPointCollection {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            points: Vec::new(),
        }
    }

    /// Construct a point with the shared generator and add it.
    pub fn spawn(
        &mut self,
        origin: Rect,
        law: MotionLaw,
        speed: MotionSpeed,
        color: Rgb8,
    ) -> &mut MotionPoint {
        let p = MotionPoint::new(origin, law, speed, color, &mut self.rng);
        let idx = self.points.len();
        self.points.push(p);
        &mut self.points[idx]
    }

    pub fn push(&mut self, point: MotionPoint) {
        self.points.push(point);
    }

    /// Remove the point at `idx`; order of the remaining points is not kept.
    pub fn remove(&mut self, idx: usize) -> Option<MotionPoint> {
        (idx < self.points.len()).then(|| self.points.swap_remove(idx))
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&MotionPoint> {
        self.points.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut MotionPoint> {
        self.points.get_mut(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionPoint> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, MotionPoint> {
        self.points.iter_mut()
    }

    /// The shared generator.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Points and generator borrowed together, for per-point calls that need randomness.
    pub fn parts_mut(&mut self) -> (&mut [MotionPoint], &mut StdRng) {
        (&mut self.points, &mut self.rng)
    }

    /// Alpha level of the point at `idx`, drawn with the shared generator.
    pub fn alpha_level(&mut self, idx: usize) -> Option<u8> {
        let p = self.points.get(idx)?;
        Some(p.alpha_level(&mut self.rng))
    }

    /// Advance every point one step.
    pub fn step_all(&mut self) {
        for p in &mut self.points {
            p.move_point();
        }
    }

    /// Drop dead or invisible points; returns how many were removed.
    pub fn cull(&mut self) -> usize {
        let before = self.points.len();
        self.points.retain(|p| p.is_alive() && p.is_visible());
        let removed = before - self.points.len();
        if removed > 0 {
            tracing::trace!(removed, remaining = self.points.len(), "culled motion points");
        }
        removed
    }
}

impl<'a> IntoIterator for &'a MotionPointCollection {
    type Item = &'a MotionPoint;
    type IntoIter = std::slice::Iter<'a, MotionPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl Extend<MotionPoint> for MotionPointCollection {
    fn extend<I: IntoIterator<Item = MotionPoint>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/motion/collection.rs"]
mod tests;
