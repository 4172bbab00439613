//! Luhn (mod 10) checksum used to mint and verify card numbers.

/// Computes the check digit that must be appended to `prefix` so that the
/// whole number passes the Luhn test.
///
/// Digits are walked from the right: offsets 0, 2, 4, ... are doubled (minus 9
/// when the result exceeds 9), odd offsets are taken as-is. The check digit is
/// `(9 * sum) % 10`.
///
/// Returns `None` if `prefix` is empty or contains anything but ASCII digits.
pub fn checksum_digit(prefix: &str) -> Option<u8> {
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(check_digit(prefix.bytes().rev().map(|b| b - b'0')))
}

/// Check digit of a non-negative integer prefix, digits taken in base 10.
pub fn checksum_digit_of(prefix: u64) -> u8 {
    let mut rest = prefix;
    let reversed = std::iter::from_fn(move || {
        if rest == 0 {
            return None;
        }
        // `rest % 10` is always a single digit
        #[allow(clippy::cast_possible_truncation)]
        let digit = (rest % 10) as u8;
        rest /= 10;
        Some(digit)
    });
    check_digit(reversed)
}

/// Core of the checksum over digits given from the rightmost one.
#[allow(clippy::cast_possible_truncation)]
fn check_digit(reversed: impl Iterator<Item = u8>) -> u8 {
    let sum: u32 = reversed
        .enumerate()
        .map(|(offset, digit)| {
            let digit = u32::from(digit);
            if offset % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                digit
            }
        })
        .sum();
    // always a single digit
    (sum * 9 % 10) as u8
}

/// Returns `true` if the last digit of `number` is the Luhn check digit of the
/// digits before it.
pub fn is_valid(number: &str) -> bool {
    if number.len() < 2 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let (prefix, last) = number.split_at(number.len() - 1);
    checksum_digit(prefix) == Some(last.as_bytes()[0] - b'0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Plain Luhn sum over a full number, independent of `checksum_digit`.
    fn full_luhn_sum(number: &str) -> u32 {
        number
            .bytes()
            .rev()
            .enumerate()
            .map(|(i, b)| {
                let d = u32::from(b - b'0');
                if i % 2 == 1 {
                    let doubled = d * 2;
                    doubled / 10 + doubled % 10
                } else {
                    d
                }
            })
            .sum()
    }

    #[test]
    fn test_known_check_digits() {
        assert_eq!(checksum_digit("411111111111111"), Some(1));
        assert_eq!(checksum_digit("400000000012345"), Some(7));
        assert_eq!(checksum_digit("0"), Some(0));
    }

    #[test]
    fn test_integer_prefix_matches_string_prefix() {
        assert_eq!(checksum_digit_of(411_111_111_111_111), 1);
        assert_eq!(checksum_digit_of(400_000_000_012_345), 7);
        assert_eq!(checksum_digit_of(0), 0);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..200 {
            let prefix = 400_000_000_000_000u64 + rng.gen_range(0..1_000_000_000u64);
            assert_eq!(
                Some(checksum_digit_of(prefix)),
                checksum_digit(&prefix.to_string())
            );
        }
    }

    #[test]
    fn test_rejects_non_digit_prefix() {
        assert_eq!(checksum_digit(""), None);
        assert_eq!(checksum_digit("4000a0"), None);
        assert_eq!(checksum_digit("4000 00"), None);
    }

    #[test]
    fn test_validates_known_numbers() {
        assert!(is_valid("4111111111111111"));
        assert!(is_valid("4000000000123457"));
    }

    #[test]
    fn test_detects_single_digit_typo() {
        assert!(!is_valid("4000000000123458"));
        assert!(!is_valid("4000000000133457"));
    }

    #[test]
    fn test_detects_adjacent_transposition() {
        assert!(!is_valid("4000000000213457"));
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        assert!(!is_valid(""));
        assert!(!is_valid("7"));
        assert!(!is_valid("4111-1111-1111-1111"));
    }

    #[test]
    fn test_generated_numbers_sum_to_multiple_of_ten() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let prefix = (400_000_000_000_000u64 + rng.gen_range(0..1_000_000_000u64)).to_string();
            let check = checksum_digit(&prefix).unwrap();
            let number = format!("{prefix}{check}");

            assert_eq!(number.len(), 16);
            assert_eq!(full_luhn_sum(&number) % 10, 0, "{number}");
            assert!(is_valid(&number), "{number}");
        }
    }
}
