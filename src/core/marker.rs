//! Markers: named tags attached to log calls
//!
//! A marker may reference other markers. References are metadata only; they
//! are never followed when deciding whether a call is forced past the level
//! filter.

use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct MarkerInner {
    name: String,
    references: RwLock<Vec<Marker>>,
}

/// Cheap, cloneable handle to a named marker. Equality is by name.
#[derive(Clone)]
pub struct Marker {
    inner: Arc<MarkerInner>,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(MarkerInner {
                name: name.into(),
                references: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Add a reference. Self-references and duplicates are ignored.
    pub fn add(&self, reference: &Marker) -> bool {
        if reference == self {
            return false;
        }
        let mut refs = self.inner.references.write();
        if refs.contains(reference) {
            return false;
        }
        refs.push(reference.clone());
        true
    }

    pub fn remove(&self, reference: &Marker) -> bool {
        let mut refs = self.inner.references.write();
        let before = refs.len();
        refs.retain(|m| m != reference);
        refs.len() != before
    }

    pub fn has_references(&self) -> bool {
        !self.inner.references.read().is_empty()
    }

    pub fn references(&self) -> Vec<Marker> {
        self.inner.references.read().clone()
    }

    /// `true` if `other` is this marker or one of its direct references
    pub fn contains(&self, other: &Marker) -> bool {
        self == other || self.inner.references.read().contains(other)
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.name == other.inner.name
    }
}

impl Eq for Marker {}

impl Hash for Marker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.name.hash(state);
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("name", &self.inner.name)
            .field("references", &self.inner.references.read().len())
            .finish()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

/// Interns markers by name
#[derive(Default)]
pub struct MarkerFactory {
    markers: RwLock<HashMap<String, Marker>>,
}

impl MarkerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the marker for `name`, creating it on first request
    pub fn get(&self, name: &str) -> Marker {
        if let Some(marker) = self.markers.read().get(name) {
            return marker.clone();
        }
        self.markers
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Marker::new(name))
            .clone()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.markers.read().contains_key(name)
    }

    /// Forget a marker; existing handles stay valid
    pub fn detach(&self, name: &str) -> bool {
        self.markers.write().remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.markers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.read().is_empty()
    }
}

/// Concurrency-safe set of marker names exempt from level filtering
#[derive(Debug, Default)]
pub struct ForcedMarkers {
    names: RwLock<HashSet<String>>,
}

impl ForcedMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, marker: &Marker) -> bool {
        self.names.write().insert(marker.name().to_string())
    }

    pub fn remove(&self, marker: &Marker) -> bool {
        self.names.write().remove(marker.name())
    }

    pub fn contains(&self, marker: &Marker) -> bool {
        self.names.read().contains(marker.name())
    }

    /// `true` if any of `markers` is forced
    pub fn any(&self, markers: &[Marker]) -> bool {
        if markers.is_empty() {
            return false;
        }
        let names = self.names.read();
        markers.iter().any(|m| names.contains(m.name()))
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_references() {
        let parent = Marker::new("SECURITY");
        let child = Marker::new("AUDIT");

        assert!(parent.add(&child));
        assert!(!parent.add(&child));
        assert!(!parent.add(&parent));
        assert!(parent.has_references());
        assert!(parent.contains(&child));
        assert!(!child.contains(&parent));

        assert!(parent.remove(&child));
        assert!(!parent.has_references());
    }

    #[test]
    fn test_factory_interns_by_name() {
        let factory = MarkerFactory::new();
        let a = factory.get("AUDIT");
        let b = factory.get("AUDIT");
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
        assert_eq!(factory.len(), 1);

        assert!(factory.detach("AUDIT"));
        assert!(!factory.exists("AUDIT"));
        assert_eq!(a.name(), "AUDIT");
    }

    #[test]
    fn test_forced_markers_any_semantics() {
        let forced = ForcedMarkers::new();
        let audit = Marker::new("AUDIT");
        let noise = Marker::new("NOISE");
        forced.insert(&audit);

        assert!(forced.any(&[noise.clone(), audit.clone()]));
        assert!(!forced.any(&[noise.clone()]));
        assert!(!forced.any(&[]));

        assert!(forced.remove(&audit));
        assert!(forced.is_empty());
    }
}
