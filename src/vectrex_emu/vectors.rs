//! Phosphor persistence buffer.
//!
//! Committed segments go into the draw list.  A segment that repeats one
//! already drawn this pass (or carried over from the last pass) only has
//! its intensity refreshed, so a program that redraws the same picture
//! every frame does not grow the list.  At each render pass the draw list
//! becomes the erase list.

use log::warn;

use super::analog::beam::VectorSink;

/// Prime bucket count of the duplicate-detection table.
pub const VECTOR_HASH: usize = 65521;
pub const DEFAULT_MAX_VECTORS: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vector {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
    pub color: u8,
}

impl Vector {
    pub fn same_geometry(&self, other: &Vector) -> bool {
        self.x0 == other.x0 && self.y0 == other.y0 && self.x1 == other.x1 && self.y1 == other.y1
    }

    fn hash_key(&self) -> usize {
        let key = [self.y0, self.x1, self.y1]
            .iter()
            .fold(self.x0 as u64, |acc, &c| acc.wrapping_mul(31).wrapping_add(c as u64));
        (key % VECTOR_HASH as u64) as usize
    }
}

/// What [`VectorBuffer::add_line`] did with a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Already in the draw list; colour updated in place.
    Refreshed,
    /// Appended to the draw list.
    Appended,
    /// Matched the erase list (colour updated there) and appended.
    Carried,
    /// Draw list full.
    Dropped,
}

#[derive(Debug, Clone)]
pub struct VectorBuffer {
    draw: Vec<Vector>,
    erase: Vec<Vector>,
    hash: Box<[Option<u32>]>,
    max_vectors: usize,
    dropped: u64,
}

impl VectorBuffer {
    pub fn new(max_vectors: usize) -> Self {
        Self {
            draw: Vec::with_capacity(max_vectors.min(DEFAULT_MAX_VECTORS)),
            erase: Vec::with_capacity(max_vectors.min(DEFAULT_MAX_VECTORS)),
            hash: vec![None; VECTOR_HASH].into_boxed_slice(),
            max_vectors,
            dropped: 0,
        }
    }

    pub fn reset(&mut self) {
        self.draw.clear();
        self.erase.clear();
        self.hash.fill(None);
        self.dropped = 0;
    }

    pub fn add_line(&mut self, v: Vector) -> Placement {
        let key = v.hash_key();
        let slot = self.hash[key].map(|i| i as usize);

        if let Some(existing) = slot.and_then(|i| self.draw.get_mut(i)) {
            if existing.same_geometry(&v) {
                existing.color = v.color;
                return Placement::Refreshed;
            }
        }

        // A match in the erase list keeps last pass's copy lit at the new
        // intensity; the segment still goes into the draw list.
        let carried = match slot.and_then(|i| self.erase.get_mut(i)) {
            Some(old) if old.same_geometry(&v) => {
                old.color = v.color;
                true
            }
            _ => false,
        };

        if self.draw.len() >= self.max_vectors {
            if self.dropped == 0 {
                warn!("Draw list full at {} vectors, dropping", self.max_vectors);
            }
            self.dropped += 1;
            return Placement::Dropped;
        }

        self.hash[key] = Some(self.draw.len() as u32);
        self.draw.push(v);

        if carried {
            Placement::Carried
        } else {
            Placement::Appended
        }
    }

    /// End of a render pass: what was drawn is now what fades.
    pub fn rotate(&mut self) {
        std::mem::swap(&mut self.draw, &mut self.erase);
        self.draw.clear();
    }

    pub fn draw_list(&self) -> &[Vector] {
        &self.draw
    }

    pub fn erase_list(&self) -> &[Vector] {
        &self.erase
    }

    pub fn draw_count(&self) -> usize {
        self.draw.len()
    }

    pub fn erase_count(&self) -> usize {
        self.erase.len()
    }

    /// Segments refused because the draw list was full, since reset.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn max_vectors(&self) -> usize {
        self.max_vectors
    }
}

impl Default for VectorBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VECTORS)
    }
}

impl VectorSink for VectorBuffer {
    fn commit(&mut self, vector: Vector) {
        self.add_line(vector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x0: i64, y0: i64, x1: i64, y1: i64, color: u8) -> Vector {
        Vector { x0, y0, x1, y1, color }
    }

    #[test]
    fn test_repeat_refreshes_colour() {
        let mut buf = VectorBuffer::default();
        assert_eq!(buf.add_line(line(1, 2, 3, 4, 10)), Placement::Appended);
        assert_eq!(buf.add_line(line(1, 2, 3, 4, 90)), Placement::Refreshed);
        assert_eq!(buf.draw_list(), &[line(1, 2, 3, 4, 90)]);
    }

    #[test]
    fn test_distinct_lines_append() {
        let mut buf = VectorBuffer::default();
        buf.add_line(line(0, 0, 10, 0, 50));
        buf.add_line(line(0, 0, 0, 10, 50));
        buf.add_line(line(10, 0, 0, 0, 50));
        assert_eq!(buf.draw_count(), 3);
    }

    #[test]
    fn test_rotation() {
        let mut buf = VectorBuffer::default();
        buf.add_line(line(5, 5, 6, 6, 20));
        buf.add_line(line(7, 7, 8, 8, 20));
        buf.rotate();
        assert_eq!(buf.draw_count(), 0);
        assert_eq!(buf.erase_count(), 2);

        // after a pass with no output the old picture is gone entirely
        buf.rotate();
        assert_eq!(buf.erase_count(), 0);
    }

    #[test]
    fn test_erase_match_refreshes_and_appends() {
        let mut buf = VectorBuffer::default();
        buf.add_line(line(100, 200, 300, 400, 30));
        buf.rotate();
        assert_eq!(buf.add_line(line(100, 200, 300, 400, 120)), Placement::Carried);
        assert_eq!(buf.erase_list()[0].color, 120);
        assert_eq!(buf.draw_list(), &[line(100, 200, 300, 400, 120)]);
    }

    #[test]
    fn test_stale_slot_from_last_pass_is_not_a_draw_hit() {
        let mut buf = VectorBuffer::default();
        buf.add_line(line(1, 1, 2, 2, 10));
        buf.add_line(line(3, 3, 4, 4, 10));
        buf.rotate();
        // slot for (3,3,4,4) points at index 1, which is beyond the new draw list
        buf.add_line(line(9, 9, 9, 9, 10));
        assert_eq!(buf.add_line(line(3, 3, 4, 4, 60)), Placement::Carried);
        assert_eq!(buf.draw_count(), 2);
    }

    #[test]
    fn test_cap_drops_and_counts() {
        let mut buf = VectorBuffer::new(2);
        buf.add_line(line(0, 0, 1, 1, 1));
        buf.add_line(line(0, 0, 2, 2, 1));
        assert_eq!(buf.add_line(line(0, 0, 3, 3, 1)), Placement::Dropped);
        assert_eq!(buf.draw_count(), 2);
        assert_eq!(buf.dropped(), 1);
        // refreshing an existing entry still works when full
        assert_eq!(buf.add_line(line(0, 0, 1, 1, 7)), Placement::Refreshed);
    }

    #[test]
    fn test_reset_forgets_everything() {
        let mut buf = VectorBuffer::new(1);
        buf.add_line(line(0, 0, 1, 1, 1));
        buf.add_line(line(0, 0, 2, 2, 1));
        buf.rotate();
        buf.reset();
        assert_eq!(buf.draw_count(), 0);
        assert_eq!(buf.erase_count(), 0);
        assert_eq!(buf.dropped(), 0);
        assert_eq!(buf.add_line(line(0, 0, 1, 1, 1)), Placement::Appended);
    }

    #[test]
    fn test_hash_key_matches_reference_values() {
        // ((x0*31 + y0)*31 + x1)*31 + y1 mod 65521
        let v = line(16500, 20500, 16550, 20500, 64);
        let expected = ((((16500u64 * 31) + 20500) * 31 + 16550) * 31 + 20500) % 65521;
        assert_eq!(v.hash_key(), expected as usize);
    }
}
