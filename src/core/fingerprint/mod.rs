//! # Fingerprint Module
//!
//! Exact content fingerprints for cropped spreads, and the ordered set of
//! fingerprints seen during a run.
//!
//! Two spreads are the same scan only when every cropped pixel byte matches;
//! there is no similarity threshold. A re-scan with a single changed pixel
//! counts as a new spread.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use xxhash_rust::xxh3::xxh3_128;

/// 128-bit xxh3 digest of raw pixel bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(u128);

impl Fingerprint {
    /// Fingerprint a pixel buffer
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Fingerprint(xxh3_128(bytes))
    }

    /// Lowercase hex, 32 characters
    pub fn to_hex(&self) -> String {
        format!("{:032x}", self.0)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// How a fingerprint relates to what has been seen so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    /// First fingerprint of the run
    First,
    /// New, but not the first
    New,
    /// Already recorded
    Repeat,
}

/// Fingerprints seen in a run, in order of first occurrence
#[derive(Debug, Default)]
pub struct SeenSet {
    members: HashSet<Fingerprint>,
    order: Vec<Fingerprint>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fingerprint and report whether it was new.
    ///
    /// A repeat leaves the set untouched.
    pub fn observe(&mut self, fingerprint: Fingerprint) -> Sighting {
        if !self.members.insert(fingerprint) {
            return Sighting::Repeat;
        }
        self.order.push(fingerprint);
        if self.order.len() == 1 {
            Sighting::First
        } else {
            Sighting::New
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The first fingerprint recorded (the cover)
    pub fn first(&self) -> Option<&Fingerprint> {
        self.order.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_idempotent() {
        let pixels = vec![0u8, 17, 255, 128, 64];
        assert_eq!(Fingerprint::of_bytes(&pixels), Fingerprint::of_bytes(&pixels));
    }

    #[test]
    fn single_byte_change_changes_fingerprint() {
        let a = vec![10u8; 4096];
        let mut b = a.clone();
        b[2048] = 11;
        assert_ne!(Fingerprint::of_bytes(&a), Fingerprint::of_bytes(&b));
    }

    #[test]
    fn hex_is_fixed_width() {
        let hex = Fingerprint(0xab).to_hex();
        assert_eq!(hex.len(), 32);
        assert!(hex.ends_with("ab"));
        assert!(hex.starts_with("000"));
    }

    #[test]
    fn first_sighting_is_reported_once() {
        let mut seen = SeenSet::new();
        let cover = Fingerprint::of_bytes(b"cover");
        let page = Fingerprint::of_bytes(b"page");

        assert_eq!(seen.observe(cover), Sighting::First);
        assert_eq!(seen.observe(cover), Sighting::Repeat);
        assert_eq!(seen.observe(page), Sighting::New);
        assert_eq!(seen.observe(page), Sighting::Repeat);
        assert_eq!(seen.first(), Some(&cover));
    }

    #[test]
    fn repeat_does_not_grow_set() {
        let mut seen = SeenSet::new();
        let fp = Fingerprint::of_bytes(b"spread");
        seen.observe(fp);
        seen.observe(fp);
        seen.observe(fp);

        assert_eq!(seen.len(), 1);
        assert!(!seen.is_empty());
    }

    #[test]
    fn only_the_very_first_new_fingerprint_is_first() {
        let mut seen = SeenSet::new();
        let sightings: Vec<_> = [b"c", b"a", b"c", b"b"]
            .iter()
            .map(|b| seen.observe(Fingerprint::of_bytes(*b)))
            .collect();

        assert_eq!(
            sightings,
            vec![Sighting::First, Sighting::New, Sighting::Repeat, Sighting::New]
        );
        assert_eq!(seen.len(), 3);
    }
}
