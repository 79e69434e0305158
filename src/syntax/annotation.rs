//! Annotations: opaque tags attached to tokens
//!
//! An annotation rides along with the green token it is attached to. Rewrites that do not
//! touch the token share it untouched; rewrites that derive a new token from it through the
//! `Token::with_*` builders copy it. This makes annotations a side channel that survives
//! structurally unrelated rewrites.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ANNOTATION_ID: AtomicU64 = AtomicU64::new(1);

/// A uniquely identified tag with a kind and optional payload
///
/// Two annotations are equal only if they came from the same constructor call (clones
/// included); kind and data are informational.
#[derive(Clone)]
pub struct Annotation {
    id: u64,
    kind: Arc<str>,
    data: Option<Arc<str>>,
}

impl Annotation {
    pub fn new(kind: &str) -> Self {
        Self {
            id: NEXT_ANNOTATION_ID.fetch_add(1, Ordering::Relaxed),
            kind: Arc::from(kind),
            data: None,
        }
    }

    pub fn with_data(kind: &str, data: impl AsRef<str>) -> Self {
        Self {
            data: Some(Arc::from(data.as_ref())),
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Annotation {}

impl std::hash::Hash for Annotation {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{}#{}({:?})", self.kind, self.id, data),
            None => write!(f, "{}#{}", self.kind, self.id),
        }
    }
}
