//! PoW validation.

use aegis_types::BlockHash;

use crate::WorkError;

/// A SHA-256 digest has 64 hex digits.
pub const MAX_DIFFICULTY: u32 = 64;

/// Whether `hash` starts with at least `difficulty` zero hex digits.
pub fn meets_difficulty(hash: &BlockHash, difficulty: u32) -> bool {
    hash.leading_zero_hex_digits() >= difficulty
}

/// Check a stored block hash against the difficulty target.
pub fn validate_work(hash: &BlockHash, difficulty: u32) -> Result<(), WorkError> {
    let actual = hash.leading_zero_hex_digits();
    if actual < difficulty {
        return Err(WorkError::InsufficientDifficulty {
            actual,
            required: difficulty,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_hex_digits_not_bytes() {
        let mut bytes = [0xFFu8; 32];
        bytes[0] = 0x00;
        bytes[1] = 0x0A;
        let hash = BlockHash::new(bytes);
        assert!(meets_difficulty(&hash, 3));
        assert!(!meets_difficulty(&hash, 4));
        assert!(matches!(
            validate_work(&hash, 4),
            Err(WorkError::InsufficientDifficulty { actual: 3, required: 4 })
        ));
    }

    #[test]
    fn zero_difficulty_always_passes() {
        assert!(validate_work(&BlockHash::new([0xFF; 32]), 0).is_ok());
    }
}
