//! Constant-time byte comparison.

/// Compare two byte buffers without an early exit
///
/// Every byte pair is XORed and OR-accumulated, so the running time depends
/// only on the length, never on where the buffers first differ. Buffers of
/// different lengths compare unequal (length is not secret here).
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }

    // Keep the optimizer from turning the loop into a short-circuiting memcmp
    std::hint::black_box(acc) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_buffers() {
        assert!(ct_eq(b"same bytes", b"same bytes"));
        assert!(ct_eq(&[], &[]));
    }

    #[test]
    fn test_difference_anywhere() {
        let a = [0u8; 32];
        let mut first = a;
        first[0] = 1;
        let mut last = a;
        last[31] = 0x80;

        assert!(!ct_eq(&a, &first));
        assert!(!ct_eq(&a, &last));
    }

    #[test]
    fn test_length_mismatch() {
        assert!(!ct_eq(b"short", b"shorter"));
    }
}
