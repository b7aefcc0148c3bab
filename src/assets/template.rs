use std::path::PathBuf;

use crate::foundation::error::{ReelError, ReelResult};

/// Path pattern with a single printf-style frame placeholder.
///
/// Accepted placeholders are `%d` and `%0Nd`; `%%` is a literal percent sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTemplate {
    prefix: String,
    suffix: String,
    width: usize,
}

impl PathTemplate {
    /// Parse `pattern`, which must contain exactly one frame placeholder.
    pub fn parse(pattern: &str) -> ReelResult<Self> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut width = None;
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            let out = if width.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }

            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            if chars.next() != Some('d') {
                return Err(ReelError::configuration(format!(
                    "path template '{pattern}' has an unsupported placeholder"
                )));
            }
            if width.is_some() {
                return Err(ReelError::configuration(format!(
                    "path template '{pattern}' has more than one frame placeholder"
                )));
            }
            width = Some(if digits.is_empty() {
                0
            } else {
                digits.parse::<usize>().map_err(|e| {
                    ReelError::configuration(format!("path template '{pattern}': {e}"))
                })?
            });
        }

        let width = width.ok_or_else(|| {
            ReelError::configuration(format!(
                "path template '{pattern}' needs a frame placeholder such as %04d"
            ))
        })?;
        Ok(Self {
            prefix,
            suffix,
            width,
        })
    }

    /// Path for frame `n`.
    pub fn render(&self, n: u64) -> PathBuf {
        PathBuf::from(format!(
            "{}{:0width$}{}",
            self.prefix,
            n,
            self.suffix,
            width = self.width
        ))
    }
}

impl std::str::FromStr for PathTemplate {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/template.rs"]
mod tests;
