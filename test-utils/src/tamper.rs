use rand::Rng;

/// Returns a new String where one character in `s` is replaced by a random
/// lowercase ASCII letter, or a letter is inserted.
pub fn tamper_string(rng: &mut impl Rng, s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    let len = chars.len();

    if s.is_empty() || rng.random() {
        let idx: usize = rng.random_range(0..=len);
        chars.insert(idx, char::from(b'a' + rng.random_range(0..26)));
    } else {
        let idx = rng.random_range(0..len);

        // keep sampling until we get a new char
        let new_c = loop {
            let c = char::from(b'a' + rng.random_range(0..26));
            if c != chars[idx] {
                break c;
            }
        };
        chars[idx] = new_c;
    }

    chars.into_iter().collect()
}

/// Returns a copy of `sig` with exactly one bit flipped at a random
/// position, or, when `maybe_modify_size` is set, possibly with one random
/// byte inserted instead.
pub fn tamper_bytes(rng: &mut impl Rng, sig: &[u8], maybe_modify_size: bool) -> Vec<u8> {
    let mut tampered = sig.to_vec();
    if maybe_modify_size && (sig.is_empty() || rng.random()) {
        let idx: usize = rng.random_range(0..=sig.len());
        tampered.insert(idx, rng.random());
    } else {
        let bit_idx = rng.random_range(0..tampered.len() * 8);
        tampered[bit_idx / 8] ^= 1 << (bit_idx % 8);
    }
    tampered
}
