use super::{Texture, TextureId};

/// Number of textures a single batch can sample from.
pub const MAX_TEXTURE_SLOTS: usize = 8;

/// Every slot of the current batch is occupied by another texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SlotsExhausted;

/// Result of a successful slot request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SlotAssignment {
    pub index: usize,
    /// `true` when the texture was not in the table yet and must be bound.
    pub newly_bound: bool,
}

/// Fixed-capacity table of the textures bound for the batch being built.
///
/// Slot indices are only meaningful until the next [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct TextureSlots {
    slots: [TextureId; MAX_TEXTURE_SLOTS],
    occupied: usize,
}

impl Default for TextureSlots {
    fn default() -> Self {
        Self {
            slots: [TextureId::INVALID; MAX_TEXTURE_SLOTS],
            occupied: 0,
        }
    }
}

impl TextureSlots {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot holding `texture`, claiming the next free slot if needed.
    ///
    /// A full table is left untouched.
    pub fn assign(&mut self, texture: Texture) -> Result<SlotAssignment, SlotsExhausted> {
        if let Some(index) = self.slots[..self.occupied].iter().position(|&id| id == texture.id) {
            return Ok(SlotAssignment { index, newly_bound: false });
        }

        if self.occupied == MAX_TEXTURE_SLOTS {
            return Err(SlotsExhausted);
        }

        let index = self.occupied;
        self.slots[index] = texture.id;
        self.occupied += 1;
        Ok(SlotAssignment { index, newly_bound: true })
    }

    /// Forgets every binding. Called after each batch submission.
    #[inline]
    pub fn reset(&mut self) {
        self.slots = [TextureId::INVALID; MAX_TEXTURE_SLOTS];
        self.occupied = 0;
    }

    #[inline]
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Textures currently bound, indexed by slot.
    #[inline]
    pub fn bound(&self) -> &[TextureId] {
        &self.slots[..self.occupied]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tex(id: u32) -> Texture {
        Texture::new(TextureId(id), 1, 1)
    }

    #[test]
    fn assigns_sequential_slots() {
        let mut slots = TextureSlots::new();
        assert_eq!(slots.assign(tex(10)), Ok(SlotAssignment { index: 0, newly_bound: true }));
        assert_eq!(slots.assign(tex(20)), Ok(SlotAssignment { index: 1, newly_bound: true }));
        assert_eq!(slots.occupied(), 2);
    }

    #[test]
    fn reuses_slot_for_same_texture() {
        let mut slots = TextureSlots::new();
        slots.assign(tex(10)).unwrap();
        slots.assign(tex(20)).unwrap();
        assert_eq!(slots.assign(tex(10)), Ok(SlotAssignment { index: 0, newly_bound: false }));
        assert_eq!(slots.occupied(), 2);
    }

    #[test]
    fn full_table_reports_exhaustion_without_side_effects() {
        let mut slots = TextureSlots::new();
        for id in 1..=MAX_TEXTURE_SLOTS as u32 {
            slots.assign(tex(id)).unwrap();
        }
        let before: Vec<TextureId> = slots.bound().to_vec();

        assert_eq!(slots.assign(tex(999)), Err(SlotsExhausted));
        assert_eq!(slots.bound(), before.as_slice());

        // Already-bound textures still resolve on a full table.
        assert_eq!(slots.assign(tex(3)).map(|a| a.index), Ok(2));
    }

    #[test]
    fn reset_clears_occupancy() {
        let mut slots = TextureSlots::new();
        for id in 1..=MAX_TEXTURE_SLOTS as u32 {
            slots.assign(tex(id)).unwrap();
        }
        slots.reset();
        assert_eq!(slots.occupied(), 0);
        assert!(slots.bound().is_empty());
        assert_eq!(slots.assign(tex(999)), Ok(SlotAssignment { index: 0, newly_bound: true }));
    }
}
