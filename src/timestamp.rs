//! Date patterns for backup filenames and log lines
//!
//! Settings files written by earlier releases store patterns such as
//! `yyyy-MM-dd_HH-mm-ss` rather than strftime strings, so patterns are compiled
//! from that letter syntax once and rendered with `chrono`.
//!
//! Pattern letters are repeated to choose a width (`dd` → `05`), text inside
//! single quotes is copied verbatim, and `''` yields a single quote. Any other
//! non-letter character is a literal.

use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};

use crate::error::{SaveBackupError, SaveBackupResult};

/// Source of the current instant
pub type Clock = fn() -> DateTime<FixedOffset>;

/// The system clock in the local time zone
pub fn local_now() -> DateTime<FixedOffset> {
    Local::now().into()
}

/// Letters with a defined meaning
const FIELD_LETTERS: &str = "yMdHhkKmsSaEDuZX";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { letter: char, count: usize },
}

/// A compiled date pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    /// Compile a pattern string
    ///
    /// # Errors
    ///
    /// Returns `SaveBackupError::DatePattern` for an unknown pattern letter or
    /// an unterminated quoted literal.
    pub fn compile(pattern: &str) -> SaveBackupResult<Self> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }

                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q != '\'' {
                        literal.push(q);
                    } else if chars.peek() == Some(&'\'') {
                        chars.next();
                        literal.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(SaveBackupError::DatePattern(format!(
                        "unterminated quote in \"{}\"",
                        pattern
                    )));
                }
            } else if c.is_ascii_alphabetic() {
                if !FIELD_LETTERS.contains(c) {
                    return Err(SaveBackupError::DatePattern(format!(
                        "unknown pattern letter '{}' in \"{}\"",
                        c, pattern
                    )));
                }

                let mut count = 1;
                while chars.peek() == Some(&c) {
                    chars.next();
                    count += 1;
                }

                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field { letter: c, count });
            } else {
                literal.push(c);
            }
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: pattern.to_string(),
            tokens,
        })
    }

    /// Compile `pattern`, or `default` when `pattern` is invalid
    pub fn compile_or(pattern: &str, default: &str) -> Self {
        Self::compile(pattern)
            .or_else(|_| Self::compile(default))
            .unwrap_or_else(|_| Self {
                source: default.to_string(),
                tokens: vec![Token::Literal(default.to_string())],
            })
    }

    /// The pattern text this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render an instant with this pattern
    pub fn format(&self, at: &DateTime<FixedOffset>) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field { letter, count } => {
                    out.push_str(&render_field(*letter, *count, at));
                }
            }
        }
        out
    }
}

fn pad(value: impl Into<i64>, width: usize) -> String {
    format!("{:0width$}", value.into(), width = width)
}

fn render_field(letter: char, count: usize, at: &DateTime<FixedOffset>) -> String {
    let hour = at.hour();
    match letter {
        'y' if count == 2 => pad(at.year().rem_euclid(100), 2),
        'y' => pad(at.year(), count),
        'M' => match count {
            1 | 2 => pad(at.month(), count),
            3 => at.format("%b").to_string(),
            _ => at.format("%B").to_string(),
        },
        'd' => pad(at.day(), count),
        'H' => pad(hour, count),
        'k' => pad(if hour == 0 { 24 } else { hour }, count),
        'K' => pad(hour % 12, count),
        'h' => pad(at.hour12().1, count),
        'm' => pad(at.minute(), count),
        's' => pad(at.second(), count),
        'S' => pad((at.nanosecond() / 1_000_000) % 1000, count),
        'a' => (if hour < 12 { "AM" } else { "PM" }).to_string(),
        'E' if count <= 3 => at.format("%a").to_string(),
        'E' => at.format("%A").to_string(),
        'D' => pad(at.ordinal(), count),
        'u' => pad(at.weekday().number_from_monday(), count),
        'Z' => at.format("%z").to_string(),
        'X' => render_iso_offset(at.offset().local_minus_utc(), count),
        _ => String::new(),
    }
}

fn render_iso_offset(offset_secs: i32, count: usize) -> String {
    if offset_secs == 0 {
        return "Z".to_string();
    }

    let sign = if offset_secs < 0 { '-' } else { '+' };
    let minutes = offset_secs.abs() / 60;
    let (hh, mm) = (minutes / 60, minutes % 60);
    match count {
        1 => format!("{}{:02}", sign, hh),
        2 => format!("{}{:02}{:02}", sign, hh, mm),
        _ => format!("{}{:02}:{:02}", sign, hh, mm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn afternoon() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 15, 4, 9)
            .unwrap()
    }

    #[test]
    fn test_backup_filename_pattern() {
        let pattern = DatePattern::compile("yyyy-MM-dd_HH-mm-ss").unwrap();
        assert_eq!(pattern.format(&afternoon()), "2024-01-05_15-04-09");
    }

    #[test]
    fn test_log_line_pattern() {
        let pattern = DatePattern::compile("dd MMM yyyy, h:mm:ss a").unwrap();
        assert_eq!(pattern.format(&afternoon()), "05 Jan 2024, 3:04:09 PM");
    }

    #[test]
    fn test_text_fields() {
        let pattern = DatePattern::compile("EEEE d MMMM yy").unwrap();
        assert_eq!(pattern.format(&afternoon()), "Friday 5 January 24");

        let pattern = DatePattern::compile("EEE u D").unwrap();
        assert_eq!(pattern.format(&afternoon()), "Fri 5 5");
    }

    #[test]
    fn test_hour_variants() {
        let midnight = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 0, 30, 0)
            .unwrap();
        let pattern = DatePattern::compile("H k K hh a").unwrap();
        assert_eq!(pattern.format(&midnight), "0 24 0 12 AM");
    }

    #[test]
    fn test_quoted_literals() {
        let pattern = DatePattern::compile("yyyy'T'HH 'o''clock' ''").unwrap();
        assert_eq!(pattern.format(&afternoon()), "2024T15 o'clock '");
    }

    #[test]
    fn test_offsets() {
        let at = FixedOffset::east_opt(5 * 3600 + 30 * 60)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 15, 4, 9)
            .unwrap();
        let pattern = DatePattern::compile("Z X XX XXX").unwrap();
        assert_eq!(pattern.format(&at), "+0530 +05 +0530 +05:30");

        let pattern = DatePattern::compile("X").unwrap();
        assert_eq!(pattern.format(&afternoon()), "Z");
    }

    #[test]
    fn test_unknown_letter_rejected() {
        let err = DatePattern::compile("yyyy-qq").unwrap_err();
        assert!(matches!(err, SaveBackupError::DatePattern(_)));
    }

    #[test]
    fn test_unterminated_quote_rejected() {
        assert!(DatePattern::compile("yyyy 'open").is_err());
    }

    #[test]
    fn test_compile_or_falls_back() {
        let pattern = DatePattern::compile_or("yyyy-qq", "yyyy");
        assert_eq!(pattern.as_str(), "yyyy");
        assert_eq!(pattern.format(&afternoon()), "2024");
    }

    #[test]
    fn test_as_str_keeps_source() {
        let pattern = DatePattern::compile("yyyy-MM-dd").unwrap();
        assert_eq!(pattern.as_str(), "yyyy-MM-dd");
    }
}
