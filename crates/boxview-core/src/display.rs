#![forbid(unsafe_code)]

//! Physical display enumeration.
//!
//! The viewer only needs one number from the display subsystem: how many
//! physical displays a workspace currently spans. [`DisplayRegions`] is the
//! seam a platform backend implements; [`FixedDisplays`] is a static list
//! for headless hosts and tests.

use crate::geometry::Rect;

/// Source of physical display working areas.
pub trait DisplayRegions {
    /// Working areas (screen bounds minus task bars and docks) of every
    /// attached display, in desktop coordinates.
    fn working_areas(&self) -> Vec<Rect>;

    /// Number of displays whose working area overlaps `bounds`.
    fn count_intersecting(&self, bounds: &Rect) -> usize {
        self.working_areas()
            .iter()
            .filter(|area| area.intersects(bounds))
            .count()
    }
}

/// A fixed set of display working areas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedDisplays {
    areas: Vec<Rect>,
}

impl FixedDisplays {
    /// Create from explicit working areas.
    #[must_use]
    pub fn new(areas: Vec<Rect>) -> Self {
        Self { areas }
    }

    /// `count` displays of `width`×`height` laid out left to right from the
    /// origin.
    #[must_use]
    pub fn side_by_side(count: usize, width: u32, height: u32) -> Self {
        let areas = (0..count)
            .map(|i| Rect::new((i as i64 * width as i64) as i32, 0, width, height))
            .collect();
        Self { areas }
    }

    /// Replace the working areas, e.g. after a display is unplugged.
    pub fn set_areas(&mut self, areas: Vec<Rect>) {
        self.areas = areas;
    }
}

impl DisplayRegions for FixedDisplays {
    fn working_areas(&self) -> Vec<Rect> {
        self.areas.clone()
    }
}
