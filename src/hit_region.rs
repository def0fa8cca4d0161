//! Declarative pointer hit-testing
//!
//! Each screen owns a table of fractional regions mapped to actions; one
//! shared routine resolves a pointer press against the table. Regions are
//! window-size fractions so the layout scales with the window.

/// A rectangular screen region (window-size fractions) bound to an action.
#[derive(Debug, Clone, Copy)]
pub struct HitRegion<A> {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub action: A,
}

/// Resolves a pointer press to the first matching region's action.
pub fn hit_action<A: Copy>(
    table: &[HitRegion<A>],
    x: i32,
    y: i32,
    width: f32,
    height: f32,
) -> Option<A> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let fx = x as f32 / width;
    let fy = y as f32 / height;
    table
        .iter()
        .find(|r| fx >= r.x0 && fx <= r.x1 && fy >= r.y0 && fy <= r.y1)
        .map(|r| r.action)
}
