/// Values shorter than this are never partially revealed
const MIN_REVEAL_LEN: usize = 16;

/// Characters revealed on each side of a long value
const REVEAL: usize = 5;

const FULL_MASK: &str = "*****";

/// Mask a credential for diagnostic output.
///
/// Long values keep their first and last five characters so operators can
/// tell which credential was injected; anything shorter is hidden entirely.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < MIN_REVEAL_LEN {
        return FULL_MASK.to_string();
    }

    let prefix: String = chars[..REVEAL].iter().collect();
    let suffix: String = chars[chars.len() - REVEAL..].iter().collect();
    format!("{prefix}...{suffix}")
}
