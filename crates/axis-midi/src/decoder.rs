use crate::types::{Axis, ComponentByte};

/// Largest 14-bit value.
const MAX_14BIT: f32 = 16383.0;

/// Combine a 7-bit pair into a component in [-1, 1].
///
/// Raw values are not range checked; the link only carries 7-bit data.
pub fn decode_component(msb: u8, lsb: u8) -> f32 {
    let v = ((msb as u32) << 7) | lsb as u32;
    (v as f32 / MAX_14BIT) * 2.0 - 1.0
}

/// Inverse of [`decode_component`], rounding to the nearest 14-bit step.
pub fn encode_component(value: f32) -> (u8, u8) {
    let v = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0 * MAX_14BIT).round() as u16;
    ((v >> 7) as u8, (v & 0x7f) as u8)
}

/// The live quaternion in (x, y, z, w) storage order.
///
/// Components are written one at a time and never renormalized, so
/// intermediate states may be non-unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationState {
    pub quaternion: [f32; 4],
}

impl OrientationState {
    pub const IDENTITY: Self = Self {
        quaternion: [0.0, 0.0, 0.0, 1.0],
    };
}

impl Default for OrientationState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// What a single control change did to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DecodeOutcome {
    /// A most-significant value was stored. No visible change.
    Stored,
    /// A component was rewritten; a redraw is due.
    Changed(Axis),
    /// Least-significant value with no stored most-significant value.
    Dropped,
    /// Controller outside the recognized blocks.
    Ignored,
}

impl DecodeOutcome {
    pub fn changed(self) -> bool {
        matches!(self, DecodeOutcome::Changed(_))
    }
}

/// Rebuilds 14-bit quaternion components from per-axis MSB/LSB pairs.
///
/// A stored most-significant value is kept after use, so a device may send
/// several least-significant updates for one most-significant update.
#[derive(Debug, Clone, Default)]
pub struct ComponentDecoder {
    /// Stored most-significant values, indexed in w, x, y, z order.
    slots: [Option<u8>; 4],
    state: OrientationState,
}

impl ComponentDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a control change by controller number.
    pub fn apply(&mut self, controller: u8, value: u8) -> DecodeOutcome {
        match ComponentByte::from_controller(controller) {
            Some(ComponentByte::MostSignificant(axis)) => self.on_most_significant(axis, value),
            Some(ComponentByte::LeastSignificant(axis)) => self.on_least_significant(axis, value),
            None => DecodeOutcome::Ignored,
        }
    }

    pub fn on_most_significant(&mut self, axis: Axis, value: u8) -> DecodeOutcome {
        self.slots[slot(axis)] = Some(value);
        DecodeOutcome::Stored
    }

    pub fn on_least_significant(&mut self, axis: Axis, value: u8) -> DecodeOutcome {
        let Some(msb) = self.slots[slot(axis)] else {
            return DecodeOutcome::Dropped;
        };

        self.state.quaternion[axis.storage_index()] = decode_component(msb, value);
        DecodeOutcome::Changed(axis)
    }

    /// Forget all stored most-significant values and return to identity.
    pub fn reset(&mut self) {
        self.slots = [None; 4];
        self.state = OrientationState::IDENTITY;
    }

    pub fn most_significant(&self, axis: Axis) -> Option<u8> {
        self.slots[slot(axis)]
    }

    pub fn orientation(&self) -> OrientationState {
        self.state
    }
}

fn slot(axis: Axis) -> usize {
    axis.block_offset() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_extremes() {
        assert_eq!(decode_component(0, 0), -1.0);
        assert!((decode_component(127, 127) - 1.0).abs() < 1e-6);
        // 8192 is one step above the midpoint of 0..=16383.
        assert!((decode_component(64, 0) - (8192.0 / 16383.0 * 2.0 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn decode_matches_formula_for_all_pairs() {
        for msb in 0..=127u8 {
            for lsb in [0u8, 1, 63, 64, 126, 127] {
                let expected = (((msb as u32) << 7 | lsb as u32) as f32 / 16383.0) * 2.0 - 1.0;
                let v = decode_component(msb, lsb);
                assert_eq!(v, expected);
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn encode_inverts_decode() {
        for (msb, lsb) in [(0, 0), (127, 127), (64, 0), (12, 99)] {
            assert_eq!(encode_component(decode_component(msb, lsb)), (msb, lsb));
        }
        assert_eq!(encode_component(2.0), (127, 127));
    }

    #[test]
    fn least_significant_without_most_significant_is_dropped() {
        for axis in Axis::ALL {
            let mut decoder = ComponentDecoder::new();
            assert_eq!(decoder.on_least_significant(axis, 42), DecodeOutcome::Dropped);
            assert_eq!(decoder.orientation(), OrientationState::IDENTITY);
        }
    }

    #[test]
    fn most_significant_alone_changes_nothing() {
        let mut decoder = ComponentDecoder::new();
        assert_eq!(decoder.on_most_significant(Axis::X, 100), DecodeOutcome::Stored);
        assert_eq!(decoder.orientation(), OrientationState::IDENTITY);
        assert_eq!(decoder.most_significant(Axis::X), Some(100));
    }

    #[test]
    fn components_land_in_xyzw_storage() {
        let mut decoder = ComponentDecoder::new();
        for (axis, msb) in [(Axis::W, 0u8), (Axis::X, 32), (Axis::Y, 96), (Axis::Z, 127)] {
            let _ = decoder.on_most_significant(axis, msb);
            assert_eq!(decoder.on_least_significant(axis, 0), DecodeOutcome::Changed(axis));
        }

        let q = decoder.orientation().quaternion;
        assert_eq!(q[0], decode_component(32, 0));
        assert_eq!(q[1], decode_component(96, 0));
        assert_eq!(q[2], decode_component(127, 0));
        assert_eq!(q[3], -1.0);
    }

    #[test]
    fn most_significant_persists_across_updates() {
        let mut decoder = ComponentDecoder::new();
        let _ = decoder.on_most_significant(Axis::Y, 70);

        assert!(decoder.on_least_significant(Axis::Y, 10).changed());
        let first = decoder.orientation().quaternion[1];
        assert!(decoder.on_least_significant(Axis::Y, 90).changed());
        let second = decoder.orientation().quaternion[1];

        assert_ne!(first, second);
        assert_eq!(first, decode_component(70, 10));
        assert_eq!(second, decode_component(70, 90));
        assert_eq!(decoder.most_significant(Axis::Y), Some(70));
    }

    #[test]
    fn most_significant_is_overwritten() {
        let mut decoder = ComponentDecoder::new();
        let _ = decoder.on_most_significant(Axis::Z, 1);
        let _ = decoder.on_most_significant(Axis::Z, 2);
        let _ = decoder.on_least_significant(Axis::Z, 3);
        assert_eq!(decoder.orientation().quaternion[2], decode_component(2, 3));
    }

    #[test]
    fn reset_clears_slots_and_state() {
        let mut decoder = ComponentDecoder::new();
        for axis in Axis::ALL {
            let _ = decoder.on_most_significant(axis, 5);
            let _ = decoder.on_least_significant(axis, 5);
        }
        assert_ne!(decoder.orientation(), OrientationState::IDENTITY);

        decoder.reset();

        for axis in Axis::ALL {
            assert_eq!(decoder.most_significant(axis), None);
        }
        assert_eq!(decoder.orientation().quaternion, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(decoder.on_least_significant(Axis::W, 1), DecodeOutcome::Dropped);
        assert_eq!(decoder.orientation(), OrientationState::IDENTITY);
    }

    #[test]
    fn apply_routes_by_controller() {
        let mut decoder = ComponentDecoder::new();
        assert_eq!(decoder.apply(17, 127), DecodeOutcome::Stored);
        assert_eq!(decoder.apply(49, 127), DecodeOutcome::Changed(Axis::X));
        assert_eq!(decoder.apply(50, 127), DecodeOutcome::Dropped);
        assert_eq!(decoder.apply(7, 127), DecodeOutcome::Ignored);
        assert_eq!(decoder.orientation().quaternion, [1.0, 0.0, 0.0, 1.0]);
    }
}
