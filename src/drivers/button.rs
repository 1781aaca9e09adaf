//! Liveness input driver.
//!
//! A momentary switch with pull-up, whose port group fires an edge
//! interrupt on any logical level change — rising and falling alike; the
//! hardware does not report direction. Contact bounce is handled one level
//! up by masking the whole port group for the debounce window, so this
//! driver only exposes the mask, the level read, and teardown.

use crate::hal::{DigitalPin, EdgeIrqCtl};

/// The single monitored liveness input.
pub struct LivenessButton<P: DigitalPin, G: EdgeIrqCtl> {
    pin: P,
    group: G,
}

impl<P: DigitalPin, G: EdgeIrqCtl> LivenessButton<P, G> {
    /// Wire the button: input direction, pull-up engaged, edges masked
    /// until [`Self::unmask_edges`].
    pub fn new(mut pin: P, group: G) -> Self {
        pin.set_direction(false);
        pin.set_level(true); // pull-up
        Self { pin, group }
    }

    /// Whether the input currently reads active (pressed).
    ///
    /// Active-low: the pull-up holds the line high until the switch closes.
    pub fn is_pressed(&self) -> bool {
        !self.pin.read_level()
    }

    /// Unmask edge interrupts on the input's port group.
    pub fn unmask_edges(&mut self) {
        self.group.enable_edge_interrupts();
    }

    /// Mask edge interrupts on the input's port group (start of the
    /// debounce window).
    pub fn mask_edges(&mut self) {
        self.group.disable_edge_interrupts();
    }

    /// Whether edges are currently unmasked.
    pub fn edges_unmasked(&self) -> bool {
        self.group.edge_interrupts_enabled()
    }

    /// Full teardown for lockdown: edges masked, pull-up released. The
    /// input can no longer generate interrupts or liveness resets.
    pub fn clear(&mut self) {
        self.group.disable_edge_interrupts();
        self.pin.set_level(false);
    }
}
