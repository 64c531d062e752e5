//! Mark-and-sweep bitmap store.
//!
//! Layout registers every bitmap it produces under a string key; the
//! renderer looks keys up by [`Shelf::get`]. Insertion and [`Shelf::check`]
//! both mark a key referenced. [`Shelf::clean`] runs exactly once per layout
//! pass: it evicts every unmarked entry (reporting each through the unload
//! callback) and resets the marks of the survivors. An entry untouched for
//! two consecutive passes is therefore gone after the second sweep.

use std::collections::{HashMap, HashSet};

use marten_common::Bitmap;

type UnloadCallback = Box<dyn FnMut(&str)>;

/// Bitmap store with pass-scoped liveness tracking.
#[derive(Default)]
pub struct Shelf {
    textures: HashMap<String, Bitmap>,
    referenced: HashSet<String>,
    unload: Option<UnloadCallback>,
}

impl Shelf {
    /// An empty shelf.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a bitmap and mark the key referenced. Returns
    /// the key so callers can feed it straight into a texture list.
    pub fn set(&mut self, key: &str, bitmap: Bitmap) -> String {
        self.textures.insert(key.to_string(), bitmap);
        self.referenced.insert(key.to_string());
        key.to_string()
    }

    /// Borrow a stored bitmap without affecting liveness.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Bitmap> {
        self.textures.get(key)
    }

    /// Lookup-as-keepalive: reports whether the key is stored, and marks it
    /// referenced when it is. Callers skip regeneration on `true`.
    pub fn check(&mut self, key: &str) -> bool {
        if self.textures.contains_key(key) {
            self.referenced.insert(key.to_string());
            true
        } else {
            false
        }
    }

    /// Evict every entry not referenced since the previous sweep, invoking
    /// the unload callback per evicted key, then reset the survivors' marks.
    pub fn clean(&mut self) {
        let referenced = std::mem::take(&mut self.referenced);
        let stale: Vec<String> = self
            .textures
            .keys()
            .filter(|key| !referenced.contains(*key))
            .cloned()
            .collect();
        for key in stale {
            self.textures.remove(&key);
            if let Some(unload) = &mut self.unload {
                unload(&key);
            }
        }
    }

    /// Register a callback invoked with each evicted key, so the renderer
    /// can release GPU-side copies.
    pub fn set_unload_callback(&mut self, callback: UnloadCallback) {
        self.unload = Some(callback);
    }

    /// Number of stored bitmaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Whether the shelf is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
