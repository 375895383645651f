//! Backup destination derivation
//!
//! A backup lands at the backup root with the *whole* source path appended,
//! its extension moved behind a timestamp:
//!
//! ```text
//! /home/u/proj/main.txt  →  /home/u/.SaveBackup/home/u/proj/main-2024-01-05.txt
//! ```
//!
//! The root and the source path are concatenated as strings, not joined as
//! path segments. On POSIX the source keeps its leading `/`; on Windows the
//! drive colon is stripped and one separator is appended to the root instead.
//! Everything here is pure.

use chrono::{DateTime, FixedOffset};

use crate::timestamp::DatePattern;

/// Characters removed from the stem on every platform
pub const ILLEGAL_PATH_CHARS: &[char] = &[':'];

/// Which separator handling the host needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Other,
}

impl HostOs {
    /// The platform this crate was compiled for
    pub fn current() -> Self {
        if cfg!(windows) {
            HostOs::Windows
        } else {
            HostOs::Other
        }
    }

    /// Classify an OS name such as `"Windows 10"` or `"Linux"`
    pub fn from_os_name(name: &str) -> Self {
        if name.starts_with("Windows") {
            HostOs::Windows
        } else {
            HostOs::Other
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostOs::Windows
    }

    pub fn separator(self) -> char {
        match self {
            HostOs::Windows => '\\',
            HostOs::Other => '/',
        }
    }
}

/// How the extension is removed from the source path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StemRule {
    /// Remove the first occurrence of `.ext` anywhere in the path
    ///
    /// Matches backups taken by earlier releases. A directory containing
    /// `.ext` earlier in the path loses it instead of the filename.
    #[default]
    Legacy,
    /// Remove only the trailing `.ext` of the filename
    Structural,
}

/// Extension of the filename component, without the dot
///
/// Empty when the filename has no `.`.
pub fn extension_of(source: &str) -> &str {
    let name_start = source.rfind(&['/', '\\'][..]).map_or(0, |idx| idx + 1);
    let name = &source[name_start..];
    name.rfind('.').map_or("", |idx| &name[idx + 1..])
}

/// Source path with its extension removed
pub fn stem_of(source: &str, extension: &str, rule: StemRule) -> String {
    if extension.is_empty() {
        return source.to_string();
    }

    let suffix = format!(".{}", extension);
    match rule {
        StemRule::Legacy => source.replacen(&suffix, "", 1),
        StemRule::Structural => source
            .strip_suffix(&suffix)
            .unwrap_or(source)
            .to_string(),
    }
}

/// Strip characters that cannot appear in a destination path
pub fn sanitize(stem: &str) -> String {
    stem.chars()
        .filter(|c| !ILLEGAL_PATH_CHARS.contains(c))
        .collect()
}

/// Derive the backup destination for `source` with the legacy stem rule
pub fn derive_destination(
    source: &str,
    dest_root: &str,
    file_date_format: &DatePattern,
    now: &DateTime<FixedOffset>,
    host: HostOs,
) -> String {
    PathDeriver::new(dest_root, file_date_format.clone(), host).derive(source, now)
}

/// Backup destination derivation with fixed settings
#[derive(Debug, Clone)]
pub struct PathDeriver {
    dest_root: String,
    file_date_format: DatePattern,
    host: HostOs,
    stem_rule: StemRule,
}

impl PathDeriver {
    pub fn new(dest_root: impl Into<String>, file_date_format: DatePattern, host: HostOs) -> Self {
        Self {
            dest_root: dest_root.into(),
            file_date_format,
            host,
            stem_rule: StemRule::default(),
        }
    }

    pub fn with_stem_rule(mut self, stem_rule: StemRule) -> Self {
        self.stem_rule = stem_rule;
        self
    }

    pub fn dest_root(&self) -> &str {
        &self.dest_root
    }

    /// Destination for `source` at instant `now`
    ///
    /// Never fails. A source without an extension still gets the trailing
    /// `.` after its timestamp.
    pub fn derive(&self, source: &str, now: &DateTime<FixedOffset>) -> String {
        let extension = extension_of(source);
        let stem = sanitize(&stem_of(source, extension, self.stem_rule));
        let timestamp = self.file_date_format.format(now);

        let mut destination = self.dest_root.clone();
        if self.host.is_windows() {
            destination.push(self.host.separator());
        }
        destination.push_str(&stem);
        destination.push('-');
        destination.push_str(&timestamp);
        destination.push('.');
        destination.push_str(extension);
        destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan_fifth() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 9, 30, 15)
            .unwrap()
    }

    fn day_pattern() -> DatePattern {
        DatePattern::compile("yyyy-MM-dd").unwrap()
    }

    #[test]
    fn test_posix_destination() {
        let destination = derive_destination(
            "/home/u/proj/main.txt",
            "/home/u/.SaveBackup",
            &day_pattern(),
            &jan_fifth(),
            HostOs::Other,
        );
        assert_eq!(
            destination,
            "/home/u/.SaveBackup/home/u/proj/main-2024-01-05.txt"
        );
    }

    #[test]
    fn test_windows_destination() {
        let destination = derive_destination(
            "C:/Users/me/src/Main.java",
            "C:\\Users\\me\\.SaveBackup",
            &DatePattern::compile("yyyy-MM-dd_HH-mm-ss").unwrap(),
            &jan_fifth(),
            HostOs::Windows,
        );
        assert_eq!(
            destination,
            "C:\\Users\\me\\.SaveBackup\\C/Users/me/src/Main-2024-01-05_09-30-15.java"
        );
    }

    #[test]
    fn test_colons_stripped_from_source() {
        let destination = derive_destination(
            "/tmp/a:b/c:d.rs",
            "/b",
            &DatePattern::compile("HH-mm").unwrap(),
            &jan_fifth(),
            HostOs::Other,
        );
        assert_eq!(destination, "/b/tmp/ab/cd-09-30.rs");
    }

    #[test]
    fn test_filename_ends_with_timestamp_and_extension() {
        let pattern = DatePattern::compile("yyyy-MM-dd_HH-mm-ss").unwrap();
        for (source, ext) in [
            ("/a/b.c", "c"),
            ("/a/archive.tar.gz", "gz"),
            ("/a.dir/x.md", "md"),
            ("/x/y/.bashrc", "bashrc"),
        ] {
            let destination =
                derive_destination(source, "/root", &pattern, &jan_fifth(), HostOs::Other);
            assert!(
                destination.ends_with(&format!("-2024-01-05_09-30-15.{}", ext)),
                "{} -> {}",
                source,
                destination
            );
        }
    }

    #[test]
    fn test_no_extension_keeps_trailing_dot() {
        let destination = derive_destination(
            "/src/Makefile",
            "/b",
            &day_pattern(),
            &jan_fifth(),
            HostOs::Other,
        );
        assert_eq!(destination, "/b/src/Makefile-2024-01-05.");
    }

    #[test]
    fn test_extension_only_from_filename() {
        assert_eq!(extension_of("/a.dir/Makefile"), "");
        assert_eq!(extension_of("C:\\a.dir\\notes.txt"), "txt");
        assert_eq!(extension_of("/a/archive.tar.gz"), "gz");
        assert_eq!(extension_of("/a/trailing."), "");
    }

    #[test]
    fn test_legacy_stem_removes_first_occurrence() {
        assert_eq!(
            stem_of("/work/v.txt/notes.txt", "txt", StemRule::Legacy),
            "/work/v/notes.txt"
        );
    }

    #[test]
    fn test_structural_stem_removes_filename_suffix() {
        assert_eq!(
            stem_of("/work/v.txt/notes.txt", "txt", StemRule::Structural),
            "/work/v.txt/notes"
        );

        let deriver = PathDeriver::new("/b", day_pattern(), HostOs::Other)
            .with_stem_rule(StemRule::Structural);
        assert_eq!(
            deriver.derive("/work/v.txt/notes.txt", &jan_fifth()),
            "/b/work/v.txt/notes-2024-01-05.txt"
        );
    }

    #[test]
    fn test_host_os_from_name() {
        assert_eq!(HostOs::from_os_name("Windows 10"), HostOs::Windows);
        assert_eq!(HostOs::from_os_name("Linux"), HostOs::Other);
        assert_eq!(HostOs::from_os_name("Mac OS X"), HostOs::Other);
        assert_eq!(HostOs::Windows.separator(), '\\');
    }
}
