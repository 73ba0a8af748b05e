use std::collections::BTreeSet;

pub type PointerId = u32;

/// On-screen horizontal extent of a slider track, `[left, left + width)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackBounds {
    pub left: f64,
    pub width: f64,
}

impl TrackBounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// A track that has not been laid out yet reports no usable width.
    pub fn is_measured(&self) -> bool {
        self.left.is_finite() && self.width.is_finite() && self.width > 0.0
    }
}

/// What a slider needs from the element hosting its track.
pub trait TrackSurface {
    /// Current bounds, measured on demand. `None` before layout.
    fn track_bounds(&self) -> Option<TrackBounds>;
    fn set_pointer_capture(&mut self, pointer_id: PointerId);
    fn release_pointer_capture(&mut self, pointer_id: PointerId);
    fn has_pointer_capture(&self, pointer_id: PointerId) -> bool;
}

/// In-memory track used for replaying recorded pointer sessions.
#[derive(Debug, Clone, Default)]
pub struct VirtualTrack {
    bounds: Option<TrackBounds>,
    captured: BTreeSet<PointerId>,
}

impl VirtualTrack {
    pub fn new(bounds: TrackBounds) -> Self {
        Self {
            bounds: Some(bounds),
            captured: BTreeSet::new(),
        }
    }

    pub fn unmeasured() -> Self {
        Self::default()
    }

    pub fn set_bounds(&mut self, bounds: Option<TrackBounds>) {
        self.bounds = bounds;
    }

    /// Drops capture the way a platform does when it steals the pointer.
    pub fn lose_capture(&mut self, pointer_id: PointerId) {
        self.captured.remove(&pointer_id);
    }

    pub fn captured_pointers(&self) -> impl Iterator<Item = PointerId> + '_ {
        self.captured.iter().copied()
    }
}

impl TrackSurface for VirtualTrack {
    fn track_bounds(&self) -> Option<TrackBounds> {
        self.bounds
    }

    fn set_pointer_capture(&mut self, pointer_id: PointerId) {
        self.captured.insert(pointer_id);
    }

    fn release_pointer_capture(&mut self, pointer_id: PointerId) {
        self.captured.remove(&pointer_id);
    }

    fn has_pointer_capture(&self, pointer_id: PointerId) -> bool {
        self.captured.contains(&pointer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_tracked_per_pointer() {
        let mut track = VirtualTrack::new(TrackBounds::new(0.0, 100.0));
        track.set_pointer_capture(1);
        track.set_pointer_capture(2);
        track.release_pointer_capture(1);

        assert!(!track.has_pointer_capture(1));
        assert!(track.has_pointer_capture(2));
        assert_eq!(track.captured_pointers().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn zero_or_non_finite_width_is_unmeasured() {
        assert!(TrackBounds::new(10.0, 200.0).is_measured());
        assert!(!TrackBounds::new(10.0, 0.0).is_measured());
        assert!(!TrackBounds::new(10.0, -5.0).is_measured());
        assert!(!TrackBounds::new(f64::NAN, 200.0).is_measured());
        assert!(VirtualTrack::unmeasured().track_bounds().is_none());
    }
}
