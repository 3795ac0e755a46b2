//! Tamper protection: the locked / unlocked field registry of one form and
//! the token hash emitted when the form closes.
//!
//! Each rendered field is either locked (its name, and for hidden inputs its
//! value, goes into the hash) or unlocked (the client may add, drop or change
//! it). Unlocking always wins: it removes an earlier lock, and a field whose
//! path covers an unlocked path is never locked again.

use crate::form::error::FormResult;
use crate::form::field::FieldPath;
use crate::form::options::Secure;
use log::trace;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

/// Characters kept verbatim when url-encoding token values
const URL_ENCODE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSecurity {
    salt: String,
    locked: Vec<String>,
    valued: BTreeMap<String, String>,
    unlocked: Vec<String>,
}

/// Drop trailing numeric segments: `Post.tags.0.1` -> `Post.tags`
fn normalize(parts: &[String]) -> String {
    let end = parts
        .iter()
        .rposition(|part| !part.chars().all(|c| c.is_ascii_digit()))
        .map_or(0, |i| i + 1);
    parts[..end].join(".")
}

impl FormSecurity {
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            ..Self::default()
        }
    }

    /// Reset the registry for a new form
    pub fn start(&mut self) {
        self.locked.clear();
        self.valued.clear();
        self.unlocked.clear();
    }

    pub fn register(&mut self, path: &FieldPath, secure: Secure, value: Option<&str>) {
        match secure {
            Secure::Skip => {}
            Secure::Lock => self.lock(path, value),
            Secure::Unlock => self.unlock_path(path),
        }
    }

    /// Lock `path`, storing `value` when it is fixed
    pub fn lock(&mut self, path: &FieldPath, value: Option<&str>) {
        if path.is_empty() || self.is_unlocked(path) {
            return;
        }
        let name = normalize(path.parts());
        if name.is_empty() || self.locked.contains(&name) || self.valued.contains_key(&name) {
            return;
        }
        trace!("Locking field {}", name);
        match value {
            Some(value) => {
                self.valued.insert(name, value.to_string());
            }
            None => self.locked.push(name),
        }
    }

    /// Unlock `name`, removing any earlier lock
    pub fn unlock(&mut self, name: &str) {
        if !self.unlocked.iter().any(|u| u == name) {
            trace!("Unlocking field {}", name);
            self.unlocked.push(name.to_string());
        }
        self.locked.retain(|field| field != name);
        self.valued.remove(name);
    }

    /// Unlock a resolved field path, ignoring trailing numeric segments
    pub fn unlock_path(&mut self, path: &FieldPath) {
        let name = normalize(path.parts());
        if !name.is_empty() {
            self.unlock(&name);
        }
    }

    /// True when the segments of some unlocked path occur, in order,
    /// among the segments of `path`
    pub fn is_unlocked(&self, path: &FieldPath) -> bool {
        self.unlocked.iter().any(|unlocked| {
            let wanted: Vec<&str> = unlocked.split('.').collect();
            let shared: Vec<&str> = path
                .parts()
                .iter()
                .map(String::as_str)
                .filter(|part| wanted.contains(part))
                .collect();
            shared == wanted
        })
    }

    pub fn locked_fields(&self) -> &[String] {
        &self.locked
    }

    pub fn valued_fields(&self) -> &BTreeMap<String, String> {
        &self.valued
    }

    pub fn unlocked_fields(&self) -> &[String] {
        &self.unlocked
    }

    fn sorted_unlocked(&self) -> Vec<&str> {
        let mut unlocked: Vec<&str> = self.unlocked.iter().map(String::as_str).collect();
        unlocked.sort_unstable();
        unlocked
    }

    /// Hash of the sorted locked fields, the valued fields and
    /// the unlocked fields, salted
    pub fn hash(&self) -> FormResult<String> {
        let mut locked: Vec<&str> = self.locked.iter().map(String::as_str).collect();
        locked.sort_unstable();
        let serialized = bincode::serialize(&(locked, &self.valued))?;

        let mut hasher = Sha1::new();
        hasher.update(&serialized);
        hasher.update(self.sorted_unlocked().join("|").as_bytes());
        hasher.update(self.salt.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }

    /// Value of `_Token[fields]`: `<hash>:<valued keys joined by |>`, url-encoded
    pub fn fields_token(&self) -> FormResult<String> {
        let keys: Vec<&str> = self.valued.keys().map(String::as_str).collect();
        let token = format!("{}:{}", self.hash()?, keys.join("|"));
        Ok(utf8_percent_encode(&token, URL_ENCODE).to_string())
    }

    /// Value of `_Token[unlocked]`
    pub fn unlocked_token(&self) -> String {
        utf8_percent_encode(&self.sorted_unlocked().join("|"), URL_ENCODE).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &str) -> FieldPath {
        FieldPath::parse(name, Some("Post"))
    }

    #[test]
    fn test_lock_strips_numeric_suffix() {
        let mut security = FormSecurity::new("salt");
        security.lock(&path("Post.tags.0"), None);
        security.lock(&path("Post.tags.1"), None);
        security.lock(&path("title"), None);
        assert_eq!(security.locked_fields(), ["Post.tags", "Post.title"]);
    }

    #[test]
    fn test_unlock_removes_earlier_lock() {
        let mut security = FormSecurity::new("salt");
        security.lock(&path("title"), None);
        security.lock(&path("id"), Some("5"));
        security.unlock("Post.title");
        security.unlock("Post.id");
        assert!(security.locked_fields().is_empty());
        assert!(security.valued_fields().is_empty());

        security.lock(&path("title"), None);
        assert!(security.locked_fields().is_empty());
        assert_eq!(security.unlocked_fields(), ["Post.title", "Post.id"]);
    }

    #[test]
    fn test_unlocked_ancestor_covers_children() {
        let mut security = FormSecurity::new("salt");
        security.unlock("Post.attachment");
        security.lock(&path("attachment.tmp_name"), None);
        security.lock(&path("title"), None);
        assert_eq!(security.locked_fields(), ["Post.title"]);
    }

    #[test]
    fn test_register_modes() {
        let mut security = FormSecurity::new("salt");
        security.register(&path("a"), Secure::Lock, None);
        security.register(&path("b"), Secure::Skip, None);
        security.register(&path("c"), Secure::Unlock, None);
        security.register(&path("d"), Secure::Lock, Some("7"));
        assert_eq!(security.locked_fields(), ["Post.a"]);
        assert_eq!(security.valued_fields().get("Post.d").map(String::as_str), Some("7"));
        assert_eq!(security.unlocked_fields(), ["Post.c"]);
    }

    #[test]
    fn test_hash_ignores_registration_order() {
        let mut first = FormSecurity::new("salt");
        first.start();
        first.lock(&path("title"), None);
        first.lock(&path("body"), None);

        let mut second = FormSecurity::new("salt");
        second.start();
        second.lock(&path("body"), None);
        second.lock(&path("title"), None);

        assert_eq!(first.hash().unwrap(), second.hash().unwrap());
        assert_eq!(first.hash().unwrap().len(), 40);

        let mut salted = FormSecurity::new("pepper");
        salted.start();
        salted.lock(&path("title"), None);
        salted.lock(&path("body"), None);
        assert_ne!(first.hash().unwrap(), salted.hash().unwrap());
    }

    #[test]
    fn test_restarted_form_hashes_the_same() {
        let mut add = FormSecurity::new("salt");
        add.lock(&path("title"), None);
        let mut edit = FormSecurity::new("salt");
        edit.lock(&path("title"), None);
        edit.start();
        edit.lock(&path("title"), None);
        assert_eq!(add.hash().unwrap(), edit.hash().unwrap());
    }

    #[test]
    fn test_unlock_path_strips_indexes() {
        let mut security = FormSecurity::new("salt");
        security.lock(&path("tags.0"), None);
        security.unlock_path(&path("tags.1"));
        assert!(security.locked_fields().is_empty());
        assert_eq!(security.unlocked_fields(), ["Post.tags"]);
    }

    #[test]
    fn test_unlocked_field_never_hashed() {
        let mut relocked = FormSecurity::new("salt");
        relocked.lock(&path("title"), None);
        relocked.lock(&path("body"), None);
        relocked.unlock("Post.body");

        let mut plain = FormSecurity::new("salt");
        plain.lock(&path("title"), None);
        plain.unlock("Post.body");

        assert_eq!(relocked.hash().unwrap(), plain.hash().unwrap());
    }

    #[test]
    fn test_tokens_are_url_encoded() {
        let mut security = FormSecurity::new("salt");
        security.lock(&path("id"), Some("1"));
        security.lock(&path("Comment.post_id"), Some("1"));
        security.unlock("Post.b");
        security.unlock("Post.a");

        let token = security.fields_token().unwrap();
        let (hash, keys) = token.split_once("%3A").unwrap();
        assert_eq!(hash, security.hash().unwrap());
        assert_eq!(keys, "Comment.post_id%7CPost.id");
        assert_eq!(security.unlocked_token(), "Post.a%7CPost.b");
    }
}
