//! Argument parsing for the `!`-prefixed picture commands.
//!
//! The commands historically accepted their arguments in any order:
//! `!catgirl 3 y` and `!catgirl y 3` mean the same thing.

/// Parsed arguments of a picture command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageArgs {
    /// How many pictures to fetch (clamped to 1..=10).
    pub count: u32,
    pub nsfw: bool,
}

impl Default for ImageArgs {
    fn default() -> Self {
        Self {
            count: 1,
            nsfw: false,
        }
    }
}

/// Parse command arguments, order-insensitive.
///
/// An integer token sets the count, a `y`/`n` token (case-insensitive) sets
/// the NSFW flag. Unrecognized tokens are ignored; later tokens win.
pub fn parse_image_args(tokens: &[&str]) -> ImageArgs {
    let mut args = ImageArgs::default();

    for token in tokens {
        if let Ok(count) = token.parse::<u32>() {
            args.count = count.clamp(1, 10);
        } else {
            match token.to_lowercase().as_str() {
                "y" | "yes" => args.nsfw = true,
                "n" | "no" => args.nsfw = false,
                _ => {}
            }
        }
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_tokens_yields_defaults() {
        assert_eq!(parse_image_args(&[]), ImageArgs::default());
    }

    #[test]
    fn count_and_flag_in_either_order() {
        let a = parse_image_args(&["3", "y"]);
        let b = parse_image_args(&["y", "3"]);
        assert_eq!(a, b);
        assert_eq!(a.count, 3);
        assert!(a.nsfw);
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(parse_image_args(&["0"]).count, 1);
        assert_eq!(parse_image_args(&["99"]).count, 10);
    }

    #[test]
    fn flag_is_case_insensitive() {
        assert!(parse_image_args(&["Y"]).nsfw);
        assert!(parse_image_args(&["YES"]).nsfw);
        assert!(!parse_image_args(&["N"]).nsfw);
    }

    #[test]
    fn garbage_tokens_are_ignored() {
        let args = parse_image_args(&["please", "2", "thanks"]);
        assert_eq!(args.count, 2);
        assert!(!args.nsfw);
    }

    #[test]
    fn later_tokens_win() {
        let args = parse_image_args(&["y", "n"]);
        assert!(!args.nsfw);
        assert_eq!(parse_image_args(&["2", "5"]).count, 5);
    }
}
