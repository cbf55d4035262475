//! Reciprocal highlighting across the three representations.
//!
//! A clock, its path glyph and its amplitude arrow are correlated only by
//! position in their respective collections — no direct references, so any
//! of the three can be torn down and rebuilt independently between
//! tutorial steps. [`GlowManager`] is the single place that correlates
//! them: a hover or tap keyed by [`GlyphIndex`] lights up all three at
//! once.

use log::warn;
use smallvec::SmallVec;

/// Position of one path/clock/arrow within its collection.
///
/// A deliberate arena-style index: holding a `GlyphIndex` never keeps a
/// destroyed clock or path alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphIndex(pub usize);

impl std::fmt::Display for GlyphIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A collection whose glyphs can be highlighted by index.
///
/// Implemented by `LightLayer` (path lines + markers), `[PhaseClock]`
/// (clock dials) and `AmplitudeVectorView` (arrows).
pub trait GlowTarget {
    /// Number of indexable glyphs currently in the collection.
    fn glyph_count(&self) -> usize;

    /// Turn the highlight for one glyph on or off. Out-of-range indices
    /// are ignored.
    fn set_glow(&mut self, index: GlyphIndex, on: bool);

    /// Turn every highlight off.
    fn clear_glow(&mut self) {
        for i in 0..self.glyph_count() {
            self.set_glow(GlyphIndex(i), false);
        }
    }
}

/// Pointer interaction forwarded by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightGesture {
    /// Pointer entered a clock face: transient glow on.
    HoverStart(GlyphIndex),
    /// Pointer left: glow off unless the index is pinned.
    HoverEnd(GlyphIndex),
    /// Tap/click: pin the glow on, or release an existing pin.
    Tap(GlyphIndex),
}

/// Coordinates glow state across index-aligned collections.
///
/// Holds no references to the collections themselves; they are passed in
/// with every call, which makes a stale binding impossible by construction
/// — the bug class the original avoided by detaching DOM listeners before
/// re-attaching.
#[derive(Debug, Default)]
pub struct GlowManager {
    enabled: bool,
    bound: usize,
    hovered: Option<GlyphIndex>,
    pinned: SmallVec<[GlyphIndex; 4]>,
}

impl GlowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebind to a fresh set of collections, clearing all prior highlight
    /// state on them first. Binds to the smallest glyph count; a mismatch
    /// is logged since it usually means a stale diagram. Leaves the
    /// manager disabled until [`enable`](Self::enable).
    pub fn assign(&mut self, targets: &mut [&mut dyn GlowTarget]) {
        for t in targets.iter_mut() {
            t.clear_glow();
        }
        self.hovered = None;
        self.pinned.clear();
        self.enabled = false;

        let counts: SmallVec<[usize; 4]> = targets.iter().map(|t| t.glyph_count()).collect();
        self.bound = counts.iter().copied().min().unwrap_or(0);
        if counts.iter().any(|&c| c != self.bound) {
            warn!(
                "glow collections have mismatched glyph counts {:?}; binding to {}",
                counts, self.bound
            );
        }
    }

    /// Start reacting to gestures. A binding with nothing to highlight
    /// stays disabled.
    pub fn enable(&mut self) {
        self.enabled = self.bound > 0;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of glyphs the manager is currently bound to.
    pub fn bound_count(&self) -> usize {
        self.bound
    }

    pub fn is_pinned(&self, index: GlyphIndex) -> bool {
        self.pinned.contains(&index)
    }

    /// Apply one pointer gesture to every bound collection.
    pub fn gesture(&mut self, g: HighlightGesture, targets: &mut [&mut dyn GlowTarget]) {
        if !self.enabled {
            return;
        }
        let index = match g {
            HighlightGesture::HoverStart(i)
            | HighlightGesture::HoverEnd(i)
            | HighlightGesture::Tap(i) => i,
        };
        if index.0 >= self.bound {
            return;
        }
        match g {
            HighlightGesture::HoverStart(i) => {
                self.hovered = Some(i);
                Self::set_all(i, true, targets);
            }
            HighlightGesture::HoverEnd(i) => {
                if self.hovered == Some(i) {
                    self.hovered = None;
                }
                if !self.is_pinned(i) {
                    Self::set_all(i, false, targets);
                }
            }
            HighlightGesture::Tap(i) => {
                if let Some(pos) = self.pinned.iter().position(|&p| p == i) {
                    self.pinned.remove(pos);
                    if self.hovered != Some(i) {
                        Self::set_all(i, false, targets);
                    }
                } else {
                    self.pinned.push(i);
                    Self::set_all(i, true, targets);
                }
            }
        }
    }

    fn set_all(index: GlyphIndex, on: bool, targets: &mut [&mut dyn GlowTarget]) {
        for t in targets.iter_mut() {
            t.set_glow(index, on);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal target recording its glow flags.
    struct FlagRow(Vec<bool>);

    impl GlowTarget for FlagRow {
        fn glyph_count(&self) -> usize {
            self.0.len()
        }
        fn set_glow(&mut self, index: GlyphIndex, on: bool) {
            if let Some(f) = self.0.get_mut(index.0) {
                *f = on;
            }
        }
    }

    fn rows(n: usize) -> (FlagRow, FlagRow, FlagRow) {
        (
            FlagRow(vec![false; n]),
            FlagRow(vec![false; n]),
            FlagRow(vec![false; n]),
        )
    }

    #[test]
    fn hover_glows_all_three_transiently() {
        let (mut a, mut b, mut c) = rows(3);
        let mut mgr = GlowManager::new();
        mgr.assign(&mut [&mut a, &mut b, &mut c]);
        mgr.enable();

        mgr.gesture(
            HighlightGesture::HoverStart(GlyphIndex(1)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(a.0[1] && b.0[1] && c.0[1]);

        mgr.gesture(
            HighlightGesture::HoverEnd(GlyphIndex(1)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(!a.0[1] && !b.0[1] && !c.0[1]);
    }

    #[test]
    fn tap_pins_through_hover_end() {
        let (mut a, mut b, mut c) = rows(2);
        let mut mgr = GlowManager::new();
        mgr.assign(&mut [&mut a, &mut b, &mut c]);
        mgr.enable();

        mgr.gesture(
            HighlightGesture::Tap(GlyphIndex(0)),
            &mut [&mut a, &mut b, &mut c],
        );
        mgr.gesture(
            HighlightGesture::HoverEnd(GlyphIndex(0)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(a.0[0], "pinned glow must survive hover end");

        // Second tap releases the pin.
        mgr.gesture(
            HighlightGesture::Tap(GlyphIndex(0)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(!a.0[0] && !b.0[0] && !c.0[0]);
    }

    #[test]
    fn reassign_clears_stale_state() {
        let (mut a, mut b, mut c) = rows(2);
        let mut mgr = GlowManager::new();
        mgr.assign(&mut [&mut a, &mut b, &mut c]);
        mgr.enable();
        mgr.gesture(
            HighlightGesture::Tap(GlyphIndex(1)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(mgr.is_pinned(GlyphIndex(1)));

        // Rebind: old pins and glow must be gone, gestures need re-enable.
        mgr.assign(&mut [&mut a, &mut b, &mut c]);
        assert!(!mgr.is_pinned(GlyphIndex(1)));
        assert!(!a.0[1] && !b.0[1] && !c.0[1]);
        assert!(!mgr.is_enabled());
    }

    #[test]
    fn empty_collection_disables() {
        let (mut a, mut c) = (FlagRow(vec![false; 3]), FlagRow(vec![]));
        let mut b = FlagRow(vec![false; 3]);
        let mut mgr = GlowManager::new();
        mgr.assign(&mut [&mut a, &mut b, &mut c]);
        mgr.enable();
        assert!(!mgr.is_enabled(), "empty collection → nothing to highlight");

        mgr.gesture(
            HighlightGesture::HoverStart(GlyphIndex(0)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(!a.0[0]);
    }

    #[test]
    fn mismatched_counts_bind_to_minimum() {
        let mut a = FlagRow(vec![false; 4]);
        let mut b = FlagRow(vec![false; 2]);
        let mut mgr = GlowManager::new();
        mgr.assign(&mut [&mut a, &mut b]);
        mgr.enable();
        assert_eq!(mgr.bound_count(), 2);

        // Index 3 exists in `a` only; must be ignored.
        mgr.gesture(
            HighlightGesture::HoverStart(GlyphIndex(3)),
            &mut [&mut a, &mut b],
        );
        assert!(!a.0[3]);
    }

    #[test]
    fn gestures_ignored_while_disabled() {
        let (mut a, mut b, mut c) = rows(2);
        let mut mgr = GlowManager::new();
        mgr.assign(&mut [&mut a, &mut b, &mut c]);
        // enable() never called
        mgr.gesture(
            HighlightGesture::HoverStart(GlyphIndex(0)),
            &mut [&mut a, &mut b, &mut c],
        );
        assert!(!a.0[0]);
    }
}
