//! Seeded sampling of draw records.
//!
//! The generator is always an explicit `ChaCha8Rng` owned by the caller; nothing
//! here touches thread-local or global random state.

use rand::Rng;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;

use super::schema::{BASE_OFFSET, DrawRecord, PRIMARY_COUNT, PRIMARY_MAX, SECONDARY_MAX};

/// Create the generator for one batch. ChaCha8 has a stable, documented
/// output stream, so a seed maps to the same draws on every platform.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Draw 6 distinct primaries from [1, 33] (uniform over all subsets), sorted.
pub fn sample_primary<R: Rng + ?Sized>(rng: &mut R) -> [u8; PRIMARY_COUNT] {
    let mut out = [0u8; PRIMARY_COUNT];
    let picked = index::sample(rng, PRIMARY_MAX as usize, PRIMARY_COUNT);
    for (slot, idx) in out.iter_mut().zip(picked.iter()) {
        *slot = idx as u8 + 1;
    }
    out.sort_unstable();
    out
}

pub fn sample_secondary<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=SECONDARY_MAX)
}

/// Sample one record. Primaries are drawn before the secondary, so the order
/// of calls on `rng` is part of the output format.
pub fn draw_record<R: Rng + ?Sized>(rng: &mut R, identifier: u64) -> DrawRecord {
    let primary_numbers = sample_primary(rng);
    let secondary_number = sample_secondary(rng);
    DrawRecord { identifier, primary_numbers, secondary_number }
}

/// Iterator over `count` consecutive draws whose identifiers start right after `last_identifier`.
///
/// Construction returns `None` when the identifiers would run past `u64::MAX`.
pub struct DrawSequence<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    next_identifier: u64,
    remaining: u64,
}

impl<'a, R: Rng + ?Sized> DrawSequence<'a, R> {
    pub fn after(rng: &'a mut R, last_identifier: u64, count: u64) -> Option<Self> {
        last_identifier.checked_add(count)?;
        let next_identifier = last_identifier.checked_add(1)?;
        Some(DrawSequence { rng, next_identifier, remaining: count })
    }

    /// Sequence for a fresh history: identifiers `BASE_OFFSET + 1 ..= BASE_OFFSET + count`.
    pub fn fresh(rng: &'a mut R, count: u64) -> Option<Self> {
        Self::after(rng, BASE_OFFSET, count)
    }
}

impl<R: Rng + ?Sized> Iterator for DrawSequence<'_, R> {
    type Item = DrawRecord;

    fn next(&mut self) -> Option<DrawRecord> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let record = draw_record(&mut *self.rng, self.next_identifier);
        self.next_identifier = self.next_identifier.saturating_add(1);
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, usize::try_from(self.remaining).ok())
    }
}
