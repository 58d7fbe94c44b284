use std::{cmp::Ordering, fmt, hash::{Hash, Hasher}, sync::Arc};

/// Parcel identifier.
/// Keeps the text used to query the parcel service alongside the normalized id
/// (hyphens stripped) that keys output rows. Equality, ordering and hashing use the id only.
#[derive(Debug, Clone)]
pub struct Pin {
    raw: Arc<str>,
    id: Arc<str>, // e.g., "0102300004" for "01-02-300-004"
}

impl Pin {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let id: String = raw.chars().filter(|&c| c != '-').collect();
        Self { raw: Arc::from(raw), id: Arc::from(id) }
    }

    /// Text as supplied, used for source queries.
    #[inline] pub fn raw(&self) -> &str { &self.raw }

    /// Normalized identifier.
    #[inline] pub fn id(&self) -> &str { &self.id }
}

impl PartialEq for Pin {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Pin {}

impl Hash for Pin {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl PartialOrd for Pin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Pin {
    fn cmp(&self, other: &Self) -> Ordering { self.id.cmp(&other.id) }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.id) }
}
