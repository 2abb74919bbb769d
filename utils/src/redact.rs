//! Redaction of secrets before they reach logs or `Debug` output.

/// Keep the first `prefix` and last `suffix` characters, mask the rest.
///
/// Secrets shorter than `prefix + suffix + 4` are masked entirely.
pub fn redact_with(secret: &str, prefix: usize, suffix: usize) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() < prefix + suffix + 4 {
        return "***".to_string();
    }
    let head: String = chars[..prefix].iter().collect();
    let tail: String = chars[chars.len() - suffix..].iter().collect();
    format!("{head}***{tail}")
}

/// Default redaction for API keys and tokens: `abcd***wxyz`.
pub fn redact(secret: &str) -> String {
    redact_with(secret, 4, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_prefix_and_suffix() {
        assert_eq!(redact("organizations/abc/apiKeys/xyz-1234"), "orga***1234");
    }

    #[test]
    fn short_secrets_fully_masked() {
        assert_eq!(redact("short"), "***");
        assert_eq!(redact(""), "***");
    }

    #[test]
    fn custom_widths() {
        assert_eq!(redact_with("0x0123456789abcdef", 2, 0), "0x***");
    }
}
