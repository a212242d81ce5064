//! Content-addressed vertex deduplication tables
//!
//! One append-only table per vertex layout variant. A record is reused only
//! when it is bit-identical to an existing entry; there is no epsilon
//! tolerance, so `-0.0` and `0.0` positions are distinct records while two
//! vertices with the same NaN bit pattern collapse to one. The lookup is a
//! hash index over the record's exact bytes, replacing a linear scan with
//! the same equality key.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use bytemuck::Pod;

use crate::batch::vertex::{
    BasicVertex, NormalTexturedVertex, NormalVertex, TexturedVertex, VertexVariant,
};

/// Hash/equality wrapper over a record's raw bytes.
#[derive(Debug, Clone, Copy)]
struct RecordKey<V: Pod>(V);

impl<V: Pod> Hash for RecordKey<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        bytemuck::bytes_of(&self.0).hash(state);
    }
}

impl<V: Pod> PartialEq for RecordKey<V> {
    fn eq(&self, other: &Self) -> bool {
        bytemuck::bytes_of(&self.0) == bytemuck::bytes_of(&other.0)
    }
}

impl<V: Pod> Eq for RecordKey<V> {}

/// Append-only store of unique vertex records for one layout variant.
#[derive(Debug, Clone)]
pub struct DedupTable<V: Pod> {
    entries: Vec<V>,
    index: HashMap<RecordKey<V>, u16>,
}

impl<V: Pod> Default for DedupTable<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V: Pod> DedupTable<V> {
    /// Return the index of a bit-identical existing record, or append the
    /// record and return its new index.
    pub fn resolve(&mut self, record: V) -> u16 {
        match self.index.entry(RecordKey(record)) {
            std::collections::hash_map::Entry::Occupied(entry) => *entry.get(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let index = self.entries.len() as u16;
                self.entries.push(record);
                entry.insert(index);
                index
            }
        }
    }

    /// Number of unique records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The records in insertion order.
    pub fn records(&self) -> &[V] {
        &self.entries
    }

    /// The records as raw interleaved bytes.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.entries)
    }

    /// Drop all records.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

/// The four per-variant deduplication tables of one build.
#[derive(Debug, Clone, Default)]
pub struct VariantTables {
    pub basic: DedupTable<BasicVertex>,
    pub normal: DedupTable<NormalVertex>,
    pub textured: DedupTable<TexturedVertex>,
    pub normal_textured: DedupTable<NormalTexturedVertex>,
}

impl VariantTables {
    /// Number of unique records in one variant's table.
    pub fn len(&self, variant: VertexVariant) -> usize {
        match variant {
            VertexVariant::Basic => self.basic.len(),
            VertexVariant::Normal => self.normal.len(),
            VertexVariant::Textured => self.textured.len(),
            VertexVariant::NormalTextured => self.normal_textured.len(),
        }
    }

    /// Whether one variant's table holds no records.
    pub fn is_empty(&self, variant: VertexVariant) -> bool {
        self.len(variant) == 0
    }

    /// One variant's records as raw interleaved bytes, ready for upload or
    /// client-pointer setup.
    pub fn bytes(&self, variant: VertexVariant) -> &[u8] {
        match variant {
            VertexVariant::Basic => self.basic.bytes(),
            VertexVariant::Normal => self.normal.bytes(),
            VertexVariant::Textured => self.textured.bytes(),
            VertexVariant::NormalTextured => self.normal_textured.bytes(),
        }
    }

    /// Drop all records from all four tables.
    pub fn clear(&mut self) {
        self.basic.clear();
        self.normal.clear();
        self.textured.clear();
        self.normal_textured.clear();
    }
}
