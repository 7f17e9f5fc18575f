//! core/tags/png.rs
//! PNG `tEXt`/`iTXt` keyword/value pairs.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PngTag {
    keywords: IndexMap<String, String>,
}

/// 1..=79 Latin-1 characters, no leading/trailing space.
pub fn is_valid_keyword(keyword: &str) -> bool {
    let len = keyword.chars().count();
    (1..=79).contains(&len)
        && keyword.chars().all(|c| matches!(u32::from(c), 0x20..=0x7E | 0xA1..=0xFF))
        && keyword.trim() == keyword
}

impl PngTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.keywords.get(keyword).map(String::as_str)
    }

    pub fn set(&mut self, keyword: &str, value: &str) -> bool {
        if !is_valid_keyword(keyword) {
            return false;
        }
        self.keywords.insert(keyword.to_string(), value.to_string());
        true
    }

    pub fn remove(&mut self, keyword: &str) -> bool {
        self.keywords.shift_remove(keyword).is_some()
    }
}
