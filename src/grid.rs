//! Grid layout planner – pure placement math for tiling signs onto pages.
//!
//! Pages, slots, and items are all 1-based, matching the artifact names
//! (`sign_0001.svg`, `page_01.svg`). Slots fill left-to-right, top-to-bottom;
//! the coordinate of a slot depends only on its index within a page, never on
//! the page number.

use crate::config::SlotConfig;

/// Placement geometry for one run: slot size and origin in mm, grid repeat
/// counts, and the optional item cap.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub slot_w: f64,
    pub slot_h: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub columns: u32,
    pub rows: u32,
    /// Stop producing items after this many, if set.
    pub max_items: Option<usize>,
}

impl GridSpec {
    pub fn from_slot_config(slot: &SlotConfig) -> Self {
        Self {
            slot_w: slot.w,
            slot_h: slot.h,
            origin_x: slot.x,
            origin_y: slot.y,
            columns: slot.repeat.x,
            rows: slot.repeat.y,
            max_items: slot.repeat.num.map(|n| n as usize),
        }
    }

    /// Slots on one full page. At least 1 by config validation.
    pub fn slots_per_page(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Number of items actually produced from `available` source rows.
    pub fn capped_total(&self, available: usize) -> usize {
        match self.max_items {
            Some(cap) => available.min(cap),
            None => available,
        }
    }

    /// Pages needed for `total_items`; zero items need zero pages.
    pub fn page_count(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.slots_per_page())
    }

    /// Top-left coordinate of the `slot_index`-th slot (1-based) on its page.
    pub fn slot_coordinate(&self, slot_index: usize) -> (f64, f64) {
        debug_assert!(slot_index >= 1 && slot_index <= self.slots_per_page());
        let column = (slot_index - 1) % self.columns as usize;
        let row = (slot_index - 1) / self.columns as usize;
        (
            self.origin_x + column as f64 * self.slot_w,
            self.origin_y + row as f64 * self.slot_h,
        )
    }

    /// Global 1-based item number filling slot `slot_index` of `page_number`.
    pub fn item_number(&self, page_number: usize, slot_index: usize) -> usize {
        self.slots_per_page() * (page_number - 1) + slot_index
    }

    /// The 1-based slot indices occupied on `page_number` given the total
    /// item count. Empty only when the page is past the last item; the last
    /// occupied page is partial rather than padded with blanks.
    pub fn occupied_slots(&self, page_number: usize, total_items: usize) -> Vec<usize> {
        (1..=self.slots_per_page())
            .take_while(|&slot| self.item_number(page_number, slot) <= total_items)
            .collect()
    }
}
