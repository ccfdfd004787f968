//! Person name (PN) values.
//!
//! A person name holds up to three component groups separated by `=`:
//! alphabetic, ideographic and phonetic.
//! Each group holds up to five components separated by `^`:
//! family name, given name, middle name, prefix and suffix.
use crate::value::PrimitiveValue;
use std::fmt::{Display, Formatter};

/// A borrowed view over a DICOM person name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonName<'a> {
    groups: [&'a str; 3],
}

impl<'a> PersonName<'a> {
    /// Interpret the given text as a person name.
    ///
    /// Trailing padding is ignored, and groups beyond the third are dropped.
    pub fn from_text(text: &'a str) -> Self {
        let text = text.trim_end_matches(|c| c == ' ' || c == '\0');
        let mut groups = [""; 3];
        for (slot, group) in groups.iter_mut().zip(text.splitn(3, '=')) {
            *slot = group;
        }
        PersonName { groups }
    }

    /// The alphabetic component group.
    pub fn alphabetic(&self) -> &'a str {
        self.groups[0]
    }

    /// The ideographic component group.
    pub fn ideographic(&self) -> &'a str {
        self.groups[1]
    }

    /// The phonetic component group.
    pub fn phonetic(&self) -> &'a str {
        self.groups[2]
    }

    fn component(&self, index: usize) -> Option<&'a str> {
        self.groups[0]
            .split('^')
            .nth(index)
            .filter(|c| !c.is_empty())
    }

    /// The family name of the alphabetic group.
    pub fn family(&self) -> Option<&'a str> {
        self.component(0)
    }

    /// The given name of the alphabetic group.
    pub fn given(&self) -> Option<&'a str> {
        self.component(1)
    }

    /// The middle name of the alphabetic group.
    pub fn middle(&self) -> Option<&'a str> {
        self.component(2)
    }

    /// The name prefix of the alphabetic group.
    pub fn prefix(&self) -> Option<&'a str> {
        self.component(3)
    }

    /// The name suffix of the alphabetic group.
    pub fn suffix(&self) -> Option<&'a str> {
        self.component(4)
    }

    /// Whether the name has no content at all.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.trim_matches('^').is_empty())
    }

    /// Encode the name back to its DICOM textual form,
    /// omitting empty trailing groups.
    pub fn to_dicom_string(&self) -> String {
        let used = self
            .groups
            .iter()
            .rposition(|g| !g.is_empty())
            .map_or(0, |i| i + 1);
        self.groups[..used].join("=")
    }

    /// Format the alphabetic group as `Family, Given`.
    pub fn family_comma_given(&self) -> String {
        match (self.family(), self.given()) {
            (Some(family), Some(given)) => format!("{}, {}", family, given),
            (Some(family), None) => family.to_string(),
            (None, Some(given)) => given.to_string(),
            (None, None) => String::new(),
        }
    }
}

impl Display for PersonName<'_> {
    /// Writes the alphabetic group in reading order:
    /// prefix, given, middle, family and suffix.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts = [
            self.prefix(),
            self.given(),
            self.middle(),
            self.family(),
            self.suffix(),
        ];
        let mut first = true;
        for part in parts.iter().flatten() {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

impl From<PersonName<'_>> for PrimitiveValue {
    fn from(p: PersonName<'_>) -> Self {
        PrimitiveValue::from(p.to_dicom_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_name_components() {
        let pn = PersonName::from_text("Adams^John Robert Quincy^^Rev.^B.A. M.Div.");
        assert_eq!(pn.family(), Some("Adams"));
        assert_eq!(pn.given(), Some("John Robert Quincy"));
        assert_eq!(pn.middle(), None);
        assert_eq!(pn.prefix(), Some("Rev."));
        assert_eq!(pn.suffix(), Some("B.A. M.Div."));
        assert_eq!(pn.to_string(), "Rev. John Robert Quincy Adams B.A. M.Div.");
        assert_eq!(pn.family_comma_given(), "Adams, John Robert Quincy");
    }

    #[test]
    fn person_name_groups() {
        let pn = PersonName::from_text("Yamada^Tarou=山田^太郎=やまだ^たろう ");
        assert_eq!(pn.alphabetic(), "Yamada^Tarou");
        assert_eq!(pn.ideographic(), "山田^太郎");
        assert_eq!(pn.phonetic(), "やまだ^たろう");
        assert_eq!(pn.to_dicom_string(), "Yamada^Tarou=山田^太郎=やまだ^たろう");

        let pn = PersonName::from_text("Doe^John");
        assert_eq!(pn.ideographic(), "");
        assert_eq!(pn.to_dicom_string(), "Doe^John");
        assert!(!pn.is_empty());
        assert!(PersonName::from_text("^^").is_empty());
    }
}
