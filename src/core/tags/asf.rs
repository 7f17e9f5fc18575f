//! core/tags/asf.rs
//! ASF (WMA/WMV) extended content descriptors.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsfValue {
    Unicode(String),
    Bytes(Vec<u8>),
    Bool(bool),
    DWord(u32),
    QWord(u64),
    Word(u16),
}

impl AsfValue {
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            AsfValue::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// String form of a descriptor. Byte descriptors have no text form.
impl fmt::Display for AsfValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsfValue::Unicode(s) => f.write_str(s),
            AsfValue::Bytes(_) => f.write_str(""),
            AsfValue::Bool(b) => write!(f, "{b}"),
            AsfValue::DWord(n) => write!(f, "{n}"),
            AsfValue::QWord(n) => write!(f, "{n}"),
            AsfValue::Word(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsfDescriptor {
    pub name: String,
    pub value: AsfValue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsfTag {
    descriptors: Vec<AsfDescriptor>,
}

impl AsfTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptors(&self) -> &[AsfDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, name: &str) -> Option<&AsfValue> {
        self.descriptors
            .iter()
            .find(|d| d.name == name)
            .map(|d| &d.value)
    }

    /// Replace the first descriptor with this name (dropping duplicates), or append.
    pub fn set(&mut self, name: &str, value: AsfValue) -> bool {
        if name.is_empty() {
            return false;
        }
        match self.descriptors.iter().position(|d| d.name == name) {
            Some(i) => {
                self.descriptors[i].value = value;
                let mut seen = 0usize;
                self.descriptors.retain(|d| {
                    if d.name != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.descriptors.push(AsfDescriptor {
                name: name.to_string(),
                value,
            }),
        }
        true
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.descriptors.len();
        self.descriptors.retain(|d| d.name != name);
        self.descriptors.len() != before
    }
}
