use rand::Rng;

/// Compare an admin API key against the configured one in constant time
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    let (provided, expected) = (provided.as_bytes(), expected.as_bytes());
    if provided.len() != expected.len() {
        return false;
    }

    let diff = provided
        .iter()
        .zip(expected)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    diff == 0
}

/// Random hex token of `n_bytes` bytes, used for OAuth states and session ids
pub fn random_hex(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    rand::rng().fill(&mut bytes[..]);
    hex::encode(bytes)
}
