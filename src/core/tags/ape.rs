//! core/tags/ape.rs
//! APEv2 items. Keys compare case-insensitively.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApeValue {
    Text(Vec<String>),
    Binary(Vec<u8>),
    Locator(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApeItem {
    pub key: String,
    pub value: ApeValue,
}

impl ApeItem {
    pub fn text(key: &str, value: &str) -> Self {
        ApeItem {
            key: key.to_string(),
            value: ApeValue::Text(vec![value.to_string()]),
        }
    }
}

/// 2..=255 printable ASCII characters, and not one of the reserved words.
pub fn is_valid_key(key: &str) -> bool {
    const RESERVED: [&str; 4] = ["ID3", "TAG", "OGGS", "MP+"];

    (2..=255).contains(&key.len())
        && key.bytes().all(|b| (0x20..=0x7E).contains(&b))
        && !RESERVED.iter().any(|r| r.eq_ignore_ascii_case(key))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApeTag {
    items: Vec<ApeItem>,
}

impl ApeTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ApeItem] {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&ApeItem> {
        self.items.iter().find(|i| i.key.eq_ignore_ascii_case(key))
    }

    /// Replace the item with the same key in place, or append. Invalid keys are refused.
    pub fn set(&mut self, item: ApeItem) -> bool {
        if !is_valid_key(&item.key) {
            return false;
        }
        match self
            .items
            .iter_mut()
            .find(|i| i.key.eq_ignore_ascii_case(&item.key))
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        true
    }

    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.key.eq_ignore_ascii_case(key));
        self.items.len() != before
    }
}
