//! The Quad Store (QS) — spec.md §4.1.
//!
//! An ordered, indexed set of `(subject, predicate, object)` triples with
//! schema-directed (de)hydration of typed records, persisted through an
//! opaque ordered-KV backend ([`kv::KvBackend`]).

pub mod kv;
pub mod quad;
pub mod rocks;
pub mod schema;

pub use kv::{Cf, KvBackend};
pub use quad::Triple;
pub use rocks::RocksBackend;
pub use schema::QuadRecord;

use crate::error::{CoreError, CoreResult};
use kv::BatchOp;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const SEP: u8 = 0;

fn encode(parts: [&str; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len() + 1).sum());
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(SEP);
        }
        out.extend_from_slice(part.as_bytes());
    }
    out
}

fn decode(key: &[u8]) -> CoreResult<[String; 3]> {
    let mut parts = key.splitn(3, |b| *b == SEP);
    let a = parts.next();
    let b = parts.next();
    let c = parts.next();
    match (a, b, c) {
        (Some(a), Some(b), Some(c)) => Ok([
            String::from_utf8_lossy(a).into_owned(),
            String::from_utf8_lossy(b).into_owned(),
            String::from_utf8_lossy(c).into_owned(),
        ]),
        _ => Err(CoreError::StoreUnavailable(
            "malformed quad key in store".to_string(),
        )),
    }
}

fn spo_key(t: &Triple) -> Vec<u8> {
    encode([&t.subject, &t.predicate, &t.object])
}
fn pos_key(t: &Triple) -> Vec<u8> {
    encode([&t.predicate, &t.object, &t.subject])
}
fn osp_key(t: &Triple) -> Vec<u8> {
    encode([&t.object, &t.subject, &t.predicate])
}

fn triple_from_spo(key: &[u8]) -> CoreResult<Triple> {
    let [s, p, o] = decode(key)?;
    Ok(Triple::new(s, p, o))
}
fn triple_from_pos(key: &[u8]) -> CoreResult<Triple> {
    let [p, o, s] = decode(key)?;
    Ok(Triple::new(s, p, o))
}

fn prefix2(a: &str, b: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + b.len() + 2);
    out.extend_from_slice(a.as_bytes());
    out.push(SEP);
    out.extend_from_slice(b.as_bytes());
    out.push(SEP);
    out
}

fn prefix1(a: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len() + 1);
    out.extend_from_slice(a.as_bytes());
    out.push(SEP);
    out
}

/// The persistent quad store.
pub struct QuadStore {
    kv: Arc<dyn KvBackend>,
}

impl QuadStore {
    /// Create or open a persistent store at `path`. `StoreUnavailable` if the
    /// directory cannot be created or the backend refuses to open.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let backend = RocksBackend::open(path)?;
        Ok(QuadStore {
            kv: Arc::new(backend),
        })
    }

    /// Build a store over an arbitrary backend (used by tests and by anyone
    /// swapping the ordered-KV implementation).
    pub fn with_backend(kv: Arc<dyn KvBackend>) -> Self {
        QuadStore { kv }
    }

    /// Flush and release. Idempotent.
    pub fn close(&self) {
        self.kv.close();
    }

    fn put_triple_ops(t: &Triple) -> [BatchOp; 3] {
        [
            BatchOp::Put(Cf::Spo, spo_key(t), Vec::new()),
            BatchOp::Put(Cf::Pos, pos_key(t), Vec::new()),
            BatchOp::Put(Cf::Osp, osp_key(t), Vec::new()),
        ]
    }

    fn delete_triple_ops(t: &Triple) -> [BatchOp; 3] {
        [
            BatchOp::Delete(Cf::Spo, spo_key(t)),
            BatchOp::Delete(Cf::Pos, pos_key(t)),
            BatchOp::Delete(Cf::Osp, osp_key(t)),
        ]
    }

    /// Serialize a typed record into triples with its identity as subject;
    /// overwrites prior values for the same `(subject, predicate)` pair.
    pub fn write_record<T: QuadRecord>(&self, record: &T) -> CoreResult<()> {
        let identity = record.identity();
        let fields = record.to_fields();

        let mut touched_predicates: Vec<&str> = fields.iter().map(|(p, _)| *p).collect();
        touched_predicates.push("type");

        let existing = self.kv.scan_prefix(Cf::Spo, &prefix1(&identity))?;
        let mut ops = Vec::new();
        for (key, _) in &existing {
            let triple = triple_from_spo(key)?;
            if touched_predicates.contains(&triple.predicate.as_str()) {
                ops.extend(Self::delete_triple_ops(&triple));
            }
        }

        for (predicate, value) in &fields {
            let triple = Triple::new(identity.clone(), *predicate, value.clone());
            ops.extend(Self::put_triple_ops(&triple));
        }
        let type_triple = Triple::new(identity.clone(), "type", T::type_name());
        ops.extend(Self::put_triple_ops(&type_triple));

        self.kv.write_batch(ops)
    }

    /// Atomic append of relationship triples. Duplicates are naturally
    /// suppressed (same key written twice is a no-op).
    pub fn write_quads(&self, quads: Vec<Triple>) -> CoreResult<()> {
        let mut ops = Vec::with_capacity(quads.len() * 3);
        for t in &quads {
            ops.extend(Self::put_triple_ops(t));
        }
        self.kv.write_batch(ops)
    }

    /// Atomic add/remove.
    pub fn apply_transaction(&self, add: Vec<Triple>, remove: Vec<Triple>) -> CoreResult<()> {
        let mut ops = Vec::with_capacity((add.len() + remove.len()) * 3);
        for t in &remove {
            ops.extend(Self::delete_triple_ops(t));
        }
        for t in &add {
            ops.extend(Self::put_triple_ops(t));
        }
        self.kv.write_batch(ops)
    }

    /// Load a typed record by identity. `NotFound` if no triples with that
    /// subject and matching type marker exist.
    pub fn load_record<T: QuadRecord>(&self, identity: &str) -> CoreResult<T> {
        let rows = self.kv.scan_prefix(Cf::Spo, &prefix1(identity))?;
        if rows.is_empty() {
            return Err(CoreError::NotFound(identity.to_string()));
        }

        let mut fields = HashMap::new();
        let mut type_ok = false;
        for (key, _) in &rows {
            let triple = triple_from_spo(key)?;
            if triple.predicate == "type" {
                if triple.object == T::type_name() {
                    type_ok = true;
                }
                continue;
            }
            fields.insert(triple.predicate, triple.object);
        }

        if !type_ok {
            return Err(CoreError::NotFound(identity.to_string()));
        }

        T::from_fields(identity, &fields)
    }

    /// All triples whose subject is `identity`.
    pub fn triples_for_subject(&self, identity: &str) -> CoreResult<Vec<Triple>> {
        self.kv
            .scan_prefix(Cf::Spo, &prefix1(identity))?
            .iter()
            .map(|(k, _)| triple_from_spo(k))
            .collect()
    }

    /// All subjects with a given `(predicate, object)` pair — the
    /// predicate-first / object-first access pattern used for type-marker
    /// enumeration, rule→build lookup, and reverse dependencies.
    pub fn subjects_for(&self, predicate: &str, object: &str) -> CoreResult<Vec<String>> {
        self.kv
            .scan_prefix(Cf::Pos, &prefix2(predicate, object))?
            .iter()
            .map(|(k, _)| triple_from_pos(k).map(|t| t.subject))
            .collect()
    }

    /// The complete triple set. Stable but unordered.
    pub fn scan_all(&self) -> CoreResult<Vec<Triple>> {
        self.kv
            .scan_all(Cf::Spo)?
            .iter()
            .map(|(k, _)| triple_from_spo(k))
            .collect()
    }

    pub fn flush(&self) -> CoreResult<()> {
        self.kv.flush()
    }
}
