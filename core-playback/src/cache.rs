//! # Synthesized Audio Cache
//!
//! Bounded map from selected text to the audio synthesized for it, so
//! replaying a selection does not hit the speech API again.
//!
//! Eviction is by insertion order: lookups use [`lru::LruCache::peek`] and
//! never refresh recency. Every evicted or cleared entry has its object URL
//! revoked exactly once. Revocation failures are logged and swallowed.

use bridge_traits::ObjectUrlRegistry;
use bytes::Bytes;
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::probe::AudioProbe;

/// A playable clip: encoded audio plus the `blob:` URL exposing it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioResource {
    pub data: Bytes,
    pub mime: String,
    /// Duration declared by the container, when known before decoding.
    pub duration_hint: Option<f64>,
    pub object_url: Option<String>,
}

impl AudioResource {
    pub fn new(data: Bytes, probe: &AudioProbe) -> Self {
        Self {
            data,
            mime: probe.mime.clone(),
            duration_hint: probe.duration_secs,
            object_url: None,
        }
    }

    /// Register a `blob:` URL for the data. A registry failure leaves the
    /// resource without a URL; backends that need one will then fail over.
    pub fn with_object_url(mut self, registry: Option<&dyn ObjectUrlRegistry>) -> Self {
        if let Some(registry) = registry {
            match registry.create_object_url(&self.data, &self.mime) {
                Ok(url) => self.object_url = Some(url),
                Err(err) => warn!(error = %err, "Failed to create object URL for audio"),
            }
        }
        self
    }

    /// Revoke the object URL, logging failures.
    pub(crate) fn release(&self, registry: Option<&dyn ObjectUrlRegistry>) {
        let (Some(url), Some(registry)) = (self.object_url.as_deref(), registry) else {
            return;
        };
        if let Err(err) = registry.revoke_object_url(url) {
            warn!(url, error = %err, "Failed to revoke object URL");
        }
    }
}

/// Insertion-ordered cache of synthesized clips.
pub struct AudioCache {
    entries: Option<LruCache<String, AudioResource>>,
    registry: Option<Arc<dyn ObjectUrlRegistry>>,
    events: Option<EventBus>,
}

impl AudioCache {
    /// Create a cache holding at most `capacity` clips. `0` disables caching.
    pub fn new(capacity: usize, registry: Option<Arc<dyn ObjectUrlRegistry>>) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
            registry,
            events: None,
        }
    }

    /// Report hits, misses and evictions on `bus`.
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    pub fn capacity(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.cap().get())
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries
            .as_ref()
            .is_some_and(|entries| entries.contains(text))
    }

    /// Look up the clip for `text` without affecting eviction order.
    pub fn get(&self, text: &str) -> Option<AudioResource> {
        let hit = self
            .entries
            .as_ref()
            .and_then(|entries| entries.peek(text))
            .cloned();

        let text_chars = text.chars().count();
        if hit.is_some() {
            self.emit(CacheEvent::Hit { text_chars });
        } else {
            self.emit(CacheEvent::Miss { text_chars });
        }
        hit
    }

    /// Insert a clip, evicting the oldest entry when full.
    ///
    /// Returns `false` when caching is disabled and the caller keeps
    /// ownership of the resource's object URL.
    pub fn put(&mut self, text: impl Into<String>, resource: AudioResource) -> bool {
        let Some(entries) = self.entries.as_mut() else {
            return false;
        };
        let text = text.into();

        // `push` hands back either the replaced value for the same key or the
        // evicted oldest entry; both are released.
        if let Some((evicted_key, evicted)) = entries.push(text.clone(), resource) {
            let same_url = evicted_key == text
                && entries.peek(&text).map(|current| &current.object_url)
                    == Some(&evicted.object_url);
            if !same_url {
                evicted.release(self.registry.as_deref());
            }
            if evicted_key != text {
                debug!(cache_len = entries.len(), "Evicted oldest cached clip");
                self.emit(CacheEvent::Evicted { count: 1 });
            }
        }
        true
    }

    /// Shrink or grow the cache. Shrinking evicts the oldest entries.
    /// Resizing to `0` clears and disables the cache.
    pub fn set_capacity(&mut self, capacity: usize) {
        let Some(capacity) = NonZeroUsize::new(capacity) else {
            self.clear();
            self.entries = None;
            return;
        };

        let Some(entries) = self.entries.as_mut() else {
            self.entries = Some(LruCache::new(capacity));
            return;
        };

        let mut evicted = 0;
        while entries.len() > capacity.get() {
            if let Some((_, resource)) = entries.pop_lru() {
                resource.release(self.registry.as_deref());
                evicted += 1;
            }
        }
        entries.resize(capacity);

        if evicted > 0 {
            self.emit(CacheEvent::Evicted { count: evicted });
        }
    }

    /// Release every clip and empty the cache.
    pub fn clear(&mut self) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };

        let mut count = 0;
        while let Some((_, resource)) = entries.pop_lru() {
            resource.release(self.registry.as_deref());
            count += 1;
        }

        if count > 0 {
            debug!(count, "Cleared audio cache");
            self.emit(CacheEvent::Cleared { count });
        }
    }

    /// Cached keys, oldest first.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .as_ref()
            .map(|entries| entries.iter().rev().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default()
    }

    fn emit(&self, event: CacheEvent) {
        if let Some(bus) = &self.events {
            bus.emit(CoreEvent::Cache(event)).ok();
        }
    }
}

impl Drop for AudioCache {
    fn drop(&mut self) {
        self.clear();
    }
}
