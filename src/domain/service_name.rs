use std::fmt::Display;

use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct ServiceName(String);

impl ServiceName {
    /// Accepts names of 2 to 255 graphemes that carry at least one
    /// non-whitespace character.
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let length = s.graphemes(true).count();
        let is_too_short = length < 2;
        let is_too_long = length > 255;

        if is_empty_or_whitespace || is_too_short || is_too_long {
            Err(format!("{} is not a valid service name", s))
        } else {
            Ok(Self(s))
        }
    }

}

impl Display for ServiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
