//! DrawRecord schema - one simulated draw period per dataset row.

/// Identifiers are `BASE_OFFSET + sequence_number`, so the first row is 2023001.
pub const BASE_OFFSET: u64 = 2_023_000;

/// Number of primary ("red") numbers per draw
pub const PRIMARY_COUNT: usize = 6;

/// Primary numbers are drawn from the closed range [1, PRIMARY_MAX]
pub const PRIMARY_MAX: u8 = 33;

/// Secondary ("blue") number is drawn from the closed range [1, SECONDARY_MAX]
pub const SECONDARY_MAX: u8 = 16;

/// CSV column headers in fixed order: identifier, six primaries, one secondary.
pub const HEADERS: [&str; 8] = ["期号", "红1", "红2", "红3", "红4", "红5", "红6", "蓝"];

/// One generated (or loaded) draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub identifier: u64,
    pub primary_numbers: [u8; PRIMARY_COUNT],
    pub secondary_number: u8,
}

impl DrawRecord {
    /// Check the per-row invariants: primaries in range, strictly ascending
    /// (and therefore distinct), secondary in range.
    pub fn validate(&self) -> Result<(), String> {
        for &n in &self.primary_numbers {
            if !(1..=PRIMARY_MAX).contains(&n) {
                return Err(format!("primary number {n} outside 1..={PRIMARY_MAX}"));
            }
        }
        if let Some(w) = self.primary_numbers.windows(2).find(|w| w[0] >= w[1]) {
            return Err(format!(
                "primary numbers not strictly ascending ({} then {})",
                w[0], w[1]
            ));
        }
        if !(1..=SECONDARY_MAX).contains(&self.secondary_number) {
            return Err(format!(
                "secondary number {} outside 1..={SECONDARY_MAX}",
                self.secondary_number
            ));
        }
        Ok(())
    }

    /// Render as CSV fields in `HEADERS` order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(HEADERS.len());
        row.push(self.identifier.to_string());
        row.extend(self.primary_numbers.iter().map(|n| n.to_string()));
        row.push(self.secondary_number.to_string());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(primary: [u8; 6], secondary: u8) -> DrawRecord {
        DrawRecord { identifier: BASE_OFFSET + 1, primary_numbers: primary, secondary_number: secondary }
    }

    #[test]
    fn test_valid_record() {
        assert!(record([1, 5, 12, 20, 31, 33], 16).validate().is_ok());
    }

    #[test]
    fn test_secondary_may_repeat_a_primary() {
        assert!(record([1, 2, 3, 4, 5, 6], 3).validate().is_ok());
    }

    #[test]
    fn test_rejects_duplicates_and_disorder() {
        assert!(record([1, 5, 5, 20, 31, 33], 1).validate().is_err());
        assert!(record([5, 1, 12, 20, 31, 33], 1).validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(record([0, 5, 12, 20, 31, 33], 1).validate().is_err());
        assert!(record([1, 5, 12, 20, 31, 34], 1).validate().is_err());
        assert!(record([1, 5, 12, 20, 31, 33], 0).validate().is_err());
        assert!(record([1, 5, 12, 20, 31, 33], 17).validate().is_err());
    }

    #[test]
    fn test_to_row_matches_header_width() {
        let row = record([3, 7, 9, 18, 25, 30], 11).to_row();
        assert_eq!(row.len(), HEADERS.len());
        assert_eq!(row, vec!["2023001", "3", "7", "9", "18", "25", "30", "11"]);
    }
}
