//! Zones and regions
//!
//! A zone is fully described by the contours it lies inside of and the
//! contours it lies outside of. A region is a set of zones.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of zones, ordered so that printing and hashing are canonical
pub type Region = BTreeSet<Zone>;

/// A zone of a primary spider diagram
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zone {
    /// Contours this zone lies inside of
    pub in_contours: BTreeSet<String>,

    /// Contours this zone lies outside of
    pub out_contours: BTreeSet<String>,
}

impl Zone {
    /// Create a zone from its in- and out-contours
    pub fn new<I, O, S, T>(in_contours: I, out_contours: O) -> Self
    where
        I: IntoIterator<Item = S>,
        O: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            in_contours: in_contours.into_iter().map(Into::into).collect(),
            out_contours: out_contours.into_iter().map(Into::into).collect(),
        }
    }

    /// All contours mentioned by this zone
    pub fn contours(&self) -> BTreeSet<&str> {
        self.in_contours
            .iter()
            .chain(self.out_contours.iter())
            .map(String::as_str)
            .collect()
    }

    /// Contours that are listed both as in- and out-contours
    pub fn overlapping_contours(&self) -> Vec<&str> {
        self.in_contours
            .intersection(&self.out_contours)
            .map(String::as_str)
            .collect()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        write_string_list(f, self.in_contours.iter())?;
        f.write_str(", ")?;
        write_string_list(f, self.out_contours.iter())?;
        f.write_str(")")
    }
}

/// Writes `["a", "b"]`
pub(crate) fn write_string_list<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: Iterator<Item = &'a String>,
{
    f.write_str("[")?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "\"{}\"", item)?;
    }
    f.write_str("]")
}

/// Writes `[zone, zone]`
pub(crate) fn write_zone_list<'a, I>(f: &mut fmt::Formatter<'_>, zones: I) -> fmt::Result
where
    I: Iterator<Item = &'a Zone>,
{
    f.write_str("[")?;
    for (i, zone) in zones.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", zone)?;
    }
    f.write_str("]")
}
