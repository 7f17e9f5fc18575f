//! core/tags/apple.rs
//! MP4 `ilst` atoms.
//!
//! Two shapes:
//! - flat atoms: one four-character box type holding text or binary data
//! - dash-boxes (`----`): mean-string + name + text value

use std::fmt;

/// Four-character atom name. Stored as raw Latin-1 bytes so `©nam` fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoxType(pub [u8; 4]);

pub const DASH_BOX: BoxType = BoxType(*b"----");
pub const MEAN_BOX: BoxType = BoxType(*b"mean");
pub const NAME_BOX: BoxType = BoxType(*b"name");
pub const COVER_ART: BoxType = BoxType(*b"covr");

/// Mean-string written when a dash-box is created without one.
pub const DEFAULT_MEAN: &str = "com.apple.iTunes";

impl BoxType {
    /// Parse a four-character name. Characters above U+00FF are rejected.
    pub fn parse(name: &str) -> Option<Self> {
        let mut out = [0u8; 4];
        let mut len = 0;
        for c in name.chars() {
            let code = u32::from(c);
            if len == 4 || code > 0xFF {
                return None;
            }
            out[len] = code as u8;
            len += 1;
        }
        (len == 4).then_some(BoxType(out))
    }

    pub fn text(&self) -> String {
        self.0.iter().map(|&b| char::from(b)).collect()
    }
}

impl fmt::Display for BoxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppleData {
    Text(Vec<String>),
    /// `class` is the MP4 well-known data type (13 = JPEG, 14 = PNG, 0 = implicit).
    Binary { class: u32, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppleAtom {
    Flat { box_type: BoxType, data: AppleData },
    DashBox { mean: String, name: String, value: String },
}

impl AppleAtom {
    /// Box identifiers along the atom's path: one for flat atoms, three for dash-boxes.
    pub fn box_types(&self) -> Vec<String> {
        match self {
            AppleAtom::Flat { box_type, .. } => vec![box_type.text()],
            AppleAtom::DashBox { .. } => vec![DASH_BOX.text(), MEAN_BOX.text(), NAME_BOX.text()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppleTag {
    atoms: Vec<AppleAtom>,
}

impl AppleTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn atoms(&self) -> &[AppleAtom] {
        &self.atoms
    }

    pub fn flat(&self, box_type: BoxType) -> Option<&AppleData> {
        self.atoms.iter().find_map(|atom| match atom {
            AppleAtom::Flat { box_type: b, data } if *b == box_type => Some(data),
            _ => None,
        })
    }

    /// Replace the atom in place, or append it.
    pub fn set_flat(&mut self, box_type: BoxType, data: AppleData) {
        let slot = self.atoms.iter_mut().find_map(|atom| match atom {
            AppleAtom::Flat { box_type: b, data } if *b == box_type => Some(data),
            _ => None,
        });
        match slot {
            Some(existing) => *existing = data,
            None => self.atoms.push(AppleAtom::Flat { box_type, data }),
        }
    }

    pub fn remove_flat(&mut self, box_type: BoxType) -> bool {
        let before = self.atoms.len();
        self.atoms
            .retain(|atom| !matches!(atom, AppleAtom::Flat { box_type: b, .. } if *b == box_type));
        self.atoms.len() != before
    }

    pub fn dash_box(&self, mean: &str, name: &str) -> Option<&str> {
        self.atoms.iter().find_map(|atom| match atom {
            AppleAtom::DashBox { mean: m, name: n, value } if m == mean && n == name => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    /// Write a dash-box. An empty value clears it instead.
    pub fn set_dash_box(&mut self, mean: &str, name: &str, value: &str) {
        if value.is_empty() {
            self.clear_dash_box(mean, name);
            return;
        }

        let slot = self.atoms.iter_mut().find_map(|atom| match atom {
            AppleAtom::DashBox { mean: m, name: n, value } if m == mean && n == name => Some(value),
            _ => None,
        });
        match slot {
            Some(existing) => *existing = value.to_string(),
            None => self.atoms.push(AppleAtom::DashBox {
                mean: mean.to_string(),
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn clear_dash_box(&mut self, mean: &str, name: &str) -> bool {
        let before = self.atoms.len();
        self.atoms.retain(|atom| match atom {
            AppleAtom::DashBox { mean: m, name: n, .. } => m != mean || n != name,
            AppleAtom::Flat { .. } => true,
        });
        self.atoms.len() != before
    }
}
