//! core/tags/matroska.rs
//! Matroska `SimpleTag` trees.
//!
//! A simple tag is either flat (name -> value) or a parent whose children form
//! a group (parent name -> child name -> value). Setting a child auto-creates an
//! empty parent; removing the last child does NOT remove the parent. Callers
//! that care about empty groups use [`MatroskaTag::live_children`].

use indexmap::IndexMap;

pub type SimpleTags = IndexMap<String, Vec<SimpleTag>>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleTag {
    pub value: Vec<u8>,
    /// `Some` marks a group parent, even when it has no children left.
    pub children: Option<SimpleTags>,
}

impl SimpleTag {
    pub fn text(value: &str) -> Self {
        SimpleTag {
            value: value.as_bytes().to_vec(),
            children: None,
        }
    }

    fn group() -> Self {
        SimpleTag {
            value: Vec::new(),
            children: Some(SimpleTags::new()),
        }
    }

    pub fn value_text(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatroskaTag {
    simple_tags: SimpleTags,
}

impl MatroskaTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simple_tags(&self) -> &SimpleTags {
        &self.simple_tags
    }

    /// `subkey == None` reads a flat tag, otherwise a child of group `key`.
    pub fn get(&self, key: &str, subkey: Option<&str>) -> Option<String> {
        let list = self.simple_tags.get(key)?;
        match subkey {
            None => list.iter().find(|t| !t.is_group()).map(SimpleTag::value_text),
            Some(sub) => list
                .iter()
                .filter_map(|t| t.children.as_ref())
                .find_map(|children| children.get(sub).and_then(|l| l.first()))
                .map(SimpleTag::value_text),
        }
    }

    pub fn set(&mut self, key: &str, subkey: Option<&str>, value: &str) {
        let list = self.simple_tags.entry(key.to_string()).or_default();
        match subkey {
            None => match list.iter_mut().find(|t| !t.is_group()) {
                Some(tag) => tag.value = value.as_bytes().to_vec(),
                None => list.push(SimpleTag::text(value)),
            },
            Some(sub) => {
                let parent = match list.iter().position(SimpleTag::is_group) {
                    Some(i) => i,
                    None => {
                        list.push(SimpleTag::group());
                        list.len() - 1
                    }
                };
                let children = list[parent].children.get_or_insert_with(SimpleTags::new);
                match children.get_mut(sub).and_then(|l| l.first_mut()) {
                    Some(child) => child.value = value.as_bytes().to_vec(),
                    None => {
                        children.insert(sub.to_string(), vec![SimpleTag::text(value)]);
                    }
                }
            }
        }
    }

    /// Append a flat tag even when `key` already has one.
    pub fn push(&mut self, key: &str, value: Vec<u8>) {
        self.simple_tags
            .entry(key.to_string())
            .or_default()
            .push(SimpleTag {
                value,
                children: None,
            });
    }

    /// Remove a flat tag or a group child. Empty parents are left in place.
    pub fn remove(&mut self, key: &str, subkey: Option<&str>) -> bool {
        let Some(list) = self.simple_tags.get_mut(key) else {
            return false;
        };

        let removed = match subkey {
            None => {
                let before = list.len();
                list.retain(SimpleTag::is_group);
                list.len() != before
            }
            Some(sub) => list
                .iter_mut()
                .filter_map(|t| t.children.as_mut())
                .fold(false, |acc, children| children.shift_remove(sub).is_some() || acc),
        };

        if list.is_empty() {
            self.simple_tags.shift_remove(key);
        }
        removed
    }

    /// Drop every group parent under `key` (and the key itself if nothing flat remains).
    pub fn remove_group(&mut self, key: &str) -> bool {
        let Some(list) = self.simple_tags.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|t| !t.is_group());
        let removed = list.len() != before;
        if list.is_empty() {
            self.simple_tags.shift_remove(key);
        }
        removed
    }

    /// Number of non-empty children under group `key`.
    pub fn live_children(&self, key: &str) -> usize {
        self.simple_tags
            .get(key)
            .map(|list| {
                list.iter()
                    .filter_map(|t| t.children.as_ref())
                    .flat_map(|children| children.values().flatten())
                    .filter(|child| !child.value.is_empty())
                    .count()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_a_child_creates_an_empty_parent() {
        let mut tag = MatroskaTag::new();
        tag.set("ORIGINAL", Some("TITLE"), "Oben");

        let parent = &tag.simple_tags()["ORIGINAL"][0];
        assert!(parent.value.is_empty());
        assert!(parent.is_group());
        assert_eq!(tag.get("ORIGINAL", Some("TITLE")).as_deref(), Some("Oben"));
        assert_eq!(tag.live_children("ORIGINAL"), 1);
    }

    #[test]
    fn removing_last_child_keeps_parent() {
        let mut tag = MatroskaTag::new();
        tag.set("ORIGINAL", Some("TITLE"), "Oben");
        assert!(tag.remove("ORIGINAL", Some("TITLE")));

        assert!(tag.simple_tags().contains_key("ORIGINAL"));
        assert_eq!(tag.live_children("ORIGINAL"), 0);
        assert!(tag.remove_group("ORIGINAL"));
        assert!(tag.simple_tags().is_empty());
    }

    #[test]
    fn flat_and_group_share_a_name() {
        let mut tag = MatroskaTag::new();
        tag.set("MOOD", None, "calm");
        tag.set("MOOD", Some("SOURCE"), "listener");
        assert_eq!(tag.get("MOOD", None).as_deref(), Some("calm"));

        tag.remove("MOOD", None);
        assert_eq!(tag.get("MOOD", None), None);
        assert_eq!(tag.get("MOOD", Some("SOURCE")).as_deref(), Some("listener"));
    }
}
