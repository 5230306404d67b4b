use colored::Colorize;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Secret Display
// ============================================================================

/// Mask a secret for display, keeping only its first characters
pub fn mask(secret: &str) -> String {
    const VISIBLE: usize = 4;

    if secret.is_empty() {
        return "(not set)".to_string();
    }

    let count = secret.chars().count();
    if count <= VISIBLE {
        return "*".repeat(count);
    }

    let visible: String = secret.chars().take(VISIBLE).collect();
    format!("{}{}", visible, "*".repeat(count - VISIBLE))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_empty() {
        assert_eq!(mask(""), "(not set)");
    }

    #[test]
    fn test_mask_short() {
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("abcd"), "****");
    }

    #[test]
    fn test_mask_long() {
        assert_eq!(mask("abcdefgh"), "abcd****");
    }

    #[test]
    fn test_mask_multibyte() {
        assert_eq!(mask("ééééé"), "éééé*");
    }
}
