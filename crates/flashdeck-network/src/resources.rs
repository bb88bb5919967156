//! Loadable page elements
//!
//! Elements already on the page at startup are swept once; every element
//! created afterwards, and every later source assignment, goes through the
//! same interceptor. Nothing can set a source without being rewritten.

use crate::{NetworkError, RequestInterceptor};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Handle to a registered element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kinds of element that load a resource from an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Script,
    Image,
    Embed,
    Object,
    Frame,
    Media,
}

impl ResourceKind {
    /// Name of the attribute holding the address
    pub fn source_attribute(&self) -> &'static str {
        match self {
            ResourceKind::Object => "data",
            _ => "src",
        }
    }

    /// Parse from a tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "script" => Some(ResourceKind::Script),
            "img" => Some(ResourceKind::Image),
            "embed" => Some(ResourceKind::Embed),
            "object" => Some(ResourceKind::Object),
            "iframe" | "frame" => Some(ResourceKind::Frame),
            "audio" | "video" | "source" => Some(ResourceKind::Media),
            _ => None,
        }
    }
}

/// A loadable element and its current source address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceElement {
    pub kind: ResourceKind,
    pub source: Option<String>,
}

impl ResourceElement {
    pub fn new(kind: ResourceKind, source: Option<&str>) -> Self {
        Self {
            kind,
            source: source.map(str::to_string),
        }
    }
}

/// Owns every loadable element the page knows about
pub struct ResourceRegistry {
    interceptor: Arc<dyn RequestInterceptor>,
    elements: BTreeMap<ElementId, ResourceElement>,
    next_id: u64,
}

impl ResourceRegistry {
    pub fn new(interceptor: Arc<dyn RequestInterceptor>) -> Self {
        Self {
            interceptor,
            elements: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// One-time sweep over the elements present at startup.
    ///
    /// Returns their ids in the given order and the number rewritten.
    pub fn adopt_existing(
        &mut self,
        elements: impl IntoIterator<Item = ResourceElement>,
    ) -> (Vec<ElementId>, usize) {
        let mut ids = Vec::new();
        let mut rewritten = 0;

        for element in elements {
            let before = element.source.clone();
            let id = self.create(element.kind, element.source.as_deref());
            if self.elements.get(&id).and_then(|e| e.source.as_ref()) != before.as_ref() {
                rewritten += 1;
            }
            ids.push(id);
        }

        tracing::info!(
            "Swept {} existing elements, rewrote {}",
            ids.len(),
            rewritten
        );
        (ids, rewritten)
    }

    /// Register a newly created element
    pub fn create(&mut self, kind: ResourceKind, source: Option<&str>) -> ElementId {
        self.next_id += 1;
        let id = ElementId(self.next_id);
        let source = source.map(|s| self.interceptor.apply(s));
        self.elements.insert(id, ResourceElement { kind, source });
        id
    }

    /// Assign a new source address to an element
    pub fn assign_source(&mut self, id: ElementId, address: &str) -> Result<&str, NetworkError> {
        let rewritten = self.interceptor.apply(address);
        let element = self
            .elements
            .get_mut(&id)
            .ok_or(NetworkError::ElementNotFound(id))?;
        tracing::trace!(
            "Setting {} on {:?} {}",
            element.kind.source_attribute(),
            element.kind,
            id
        );
        Ok(element.source.insert(rewritten).as_str())
    }

    pub fn get(&self, id: ElementId) -> Option<&ResourceElement> {
        self.elements.get(&id)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<ResourceElement> {
        self.elements.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
