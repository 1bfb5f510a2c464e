use std::fmt;

/// Directory prefix of a section in the man source tree (`man8`).
pub const DIR_PREFIX: &str = "man";

const TITLES: &[(u8, &str)] = &[
    (1, "User Commands"),
    (2, "System Calls"),
    (3, "C Library Functions"),
    (4, "Devices and Special Files"),
    (5, "File Formats and Conventions"),
    (6, "Games"),
    (7, "Miscellaneous"),
    (8, "System Administration Commands"),
];

/// A recognized man page section. Only codes in the static table can be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Section(u8);

impl Section {
    #[cfg(test)]
    pub(crate) fn from_code(code: u8) -> Option<Section> {
        TITLES
            .iter()
            .any(|&(c, _)| c == code)
            .then_some(Section(code))
    }

    /// Parse a section number as it appears in file names (`"8"`).
    pub fn parse(s: &str) -> Option<Section> {
        // exact match: "08" and "+8" are not sections
        TITLES
            .iter()
            .find(|&&(c, _)| c.to_string() == s)
            .map(|&(c, _)| Section(c))
    }

    /// Recognize a source directory name such as `man8`.
    pub fn from_dir_name(name: &str) -> Option<Section> {
        Section::parse(name.strip_prefix(DIR_PREFIX)?)
    }

    #[cfg(test)]
    pub(crate) fn code(self) -> u8 {
        self.0
    }

    pub fn title(self) -> &'static str {
        TITLES
            .iter()
            .find(|&&(c, _)| c == self.0)
            .map(|&(_, t)| t)
            .unwrap_or_default()
    }

    /// `man8`
    pub fn dir_name(self) -> String {
        format!("{}{}", DIR_PREFIX, self.0)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_eight_sections() {
        let codes: Vec<u8> = (0..=9)
            .filter_map(Section::from_code)
            .map(Section::code)
            .collect();
        assert_eq!(codes, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn titles() {
        assert_eq!(Section::parse("1").unwrap().title(), "User Commands");
        assert_eq!(
            Section::parse("8").unwrap().title(),
            "System Administration Commands"
        );
    }

    #[test]
    fn dir_names() {
        assert_eq!(Section::from_dir_name("man8"), Section::from_code(8));
        assert_eq!(Section::from_dir_name("man5").unwrap().dir_name(), "man5");
    }

    #[test]
    fn unrecognized_dirs() {
        for name in ["man9", "man0", "man", "man8x", "cat8", "8", "man+8", "man08", "include"] {
            assert_eq!(Section::from_dir_name(name), None, "{name}");
        }
    }

    #[test]
    fn out_of_table_codes() {
        assert!(Section::from_code(0).is_none());
        assert!(Section::from_code(9).is_none());
        assert!(Section::parse("").is_none());
    }
}
