//! Pluralization for error messages: singular iff the count is exactly one.

/// `""` when `count == 1`, `"s"` otherwise.
pub fn plural_ending(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// `singular` when `count == 1`, `plural` otherwise.
pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_ending() {
        assert_eq!(plural_ending(0), "s");
        assert_eq!(plural_ending(1), "");
        assert_eq!(plural_ending(2), "s");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "party", "parties"), "parties");
        assert_eq!(pluralize(1, "party", "parties"), "party");
        assert_eq!(pluralize(5, "party", "parties"), "parties");
    }
}
