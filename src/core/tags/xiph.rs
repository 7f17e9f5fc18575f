//! core/tags/xiph.rs
//! Xiph (Vorbis) comments: case-insensitive field names, each with a list of values.

use indexmap::IndexMap;

/// Field that carries a base64 FLAC picture block.
pub const BLOCK_PICTURE: &str = "METADATA_BLOCK_PICTURE";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XiphComment {
    pub vendor: String,
    fields: IndexMap<String, Vec<String>>,
}

/// Field names are printable ASCII without `=`.
pub fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| (0x20..=0x7D).contains(&b) && b != b'=')
}

impl XiphComment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.fields
            .get(&name.to_ascii_uppercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_uppercase())
    }

    /// Replace every value of a field, keeping its position. Empty `values` removes it.
    /// Returns false for an invalid field name.
    pub fn set_field(&mut self, name: &str, values: Vec<String>) -> bool {
        if !is_valid_field_name(name) {
            return false;
        }
        let key = name.to_ascii_uppercase();
        if values.is_empty() {
            self.fields.shift_remove(&key);
        } else {
            self.fields.insert(key, values);
        }
        true
    }

    /// Append one value to a field.
    pub fn add_field(&mut self, name: &str, value: &str) -> bool {
        if !is_valid_field_name(name) {
            return false;
        }
        self.fields
            .entry(name.to_ascii_uppercase())
            .or_default()
            .push(value.to_string());
        true
    }

    pub fn remove_field(&mut self, name: &str) -> bool {
        self.fields.shift_remove(&name.to_ascii_uppercase()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let mut c = XiphComment::new();
        assert!(c.add_field("Mood", "calm"));
        assert!(c.add_field("MOOD", "dark"));
        assert_eq!(c.field("mood"), ["calm".to_string(), "dark".to_string()]);
    }

    #[test]
    fn set_field_keeps_position_and_rejects_bad_names() {
        let mut c = XiphComment::new();
        c.add_field("A", "1");
        c.add_field("B", "2");
        c.set_field("A", vec!["3".into()]);
        let names: Vec<&str> = c.fields().map(|(k, _)| k).collect();
        assert_eq!(names, ["A", "B"]);
        assert!(!c.set_field("BAD=NAME", vec!["x".into()]));
    }
}
