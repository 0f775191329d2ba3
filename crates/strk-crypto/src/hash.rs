//! Pedersen hashing

use starknet_crypto::pedersen_hash;
use strk_primitives::Felt;

/// Pedersen hash of two field elements
pub fn pedersen(a: &Felt, b: &Felt) -> Felt {
    pedersen_hash(a, b)
}

/// Pedersen hash of a sequence: `h(h(h(h(0, x1), x2), ...), n)`.
///
/// The trailing length term keeps `[a]` and `[a, 0]` from colliding.
pub fn compute_hash_on_elements(data: &[Felt]) -> Felt {
    let current = data
        .iter()
        .fold(Felt::ZERO, |acc, item| pedersen_hash(&acc, item));
    pedersen_hash(&current, &Felt::from(data.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strk_primitives::parse_felt_hex;

    #[test]
    fn test_pedersen_known_vector() {
        let a = parse_felt_hex("0x03d937c035c878245caf64531a5756109c53068da139362728feb561405371cb")
            .unwrap();
        let b = parse_felt_hex("0x0208a0a10250e382e1e4bbe2880906c2791bf6275695e02fbbc6aeff9cd8b31a")
            .unwrap();
        let expected =
            parse_felt_hex("0x030e480bed5fe53fa909cc0f8c4d99b8f9f2c016be4c41e13a4848797979c662")
                .unwrap();
        assert_eq!(pedersen(&a, &b), expected);
    }

    #[test]
    fn test_hash_on_elements_empty() {
        assert_eq!(
            compute_hash_on_elements(&[]),
            pedersen(&Felt::ZERO, &Felt::ZERO)
        );
    }

    #[test]
    fn test_hash_on_elements_chain() {
        let items = [Felt::from(1u64), Felt::from(2u64)];
        let manual = pedersen(
            &pedersen(&pedersen(&Felt::ZERO, &items[0]), &items[1]),
            &Felt::from(2u64),
        );
        assert_eq!(compute_hash_on_elements(&items), manual);
    }

    #[test]
    fn test_hash_on_elements_length_sensitive() {
        let short = compute_hash_on_elements(&[Felt::from(7u64)]);
        let padded = compute_hash_on_elements(&[Felt::from(7u64), Felt::ZERO]);
        assert_ne!(short, padded);
    }

    #[test]
    fn test_hash_on_elements_order_sensitive() {
        let a = compute_hash_on_elements(&[Felt::from(1u64), Felt::from(2u64)]);
        let b = compute_hash_on_elements(&[Felt::from(2u64), Felt::from(1u64)]);
        assert_ne!(a, b);
    }
}
