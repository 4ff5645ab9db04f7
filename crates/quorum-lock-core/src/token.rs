//! Lock token generation.

use rand::Rng;

/// Generates a fresh lock token: 128 random bits as 32 hex characters.
///
/// Tokens prove ownership of an acquisition; releasing a lock requires
/// presenting the token it was acquired with. They must be unique across
/// all processes that might contend for the same resource, so they come
/// from `ThreadRng` (a CSPRNG) rather than a clock or a counter — a
/// clock-derived id can collide between concurrent processes and silently
/// break mutual exclusion.
pub fn generate() -> String {
    let value: u128 = rand::thread_rng().r#gen();
    format!("{value:032x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn token_is_32_hex_chars() {
        let token = generate();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
