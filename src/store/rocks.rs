//! RocksDB-backed [`KvBackend`].
//!
//! Grounded on `persistence/storage.rs::PersistentStorage` in the teacher
//! crate: one column family per logical index, tuned with LZ4 compression
//! and a larger write buffer, opened with `create_if_missing` /
//! `create_missing_column_families`.

use crate::error::{CoreError, CoreResult};
use crate::store::kv::{BatchOp, Cf, KvBackend};
use rocksdb::{ColumnFamilyDescriptor, IteratorMode, Options, DB};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

pub struct RocksBackend {
    db: DB,
    closed: AtomicBool,
}

impl RocksBackend {
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path_str = path.as_ref().display().to_string();
        info!("opening quad store at {}", path_str);

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_write_buffer_size(64 * 1024 * 1024);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let cf_opts = || {
            let mut o = Options::default();
            o.set_compression_type(rocksdb::DBCompressionType::Lz4);
            o
        };

        let descriptors: Vec<ColumnFamilyDescriptor> = Cf::ALL
            .iter()
            .map(|cf| ColumnFamilyDescriptor::new(cf.name(), cf_opts()))
            .collect();

        let db = DB::open_cf_descriptors(&opts, &path_str, descriptors)
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;

        info!("quad store opened at {}", path_str);
        Ok(RocksBackend {
            db,
            closed: AtomicBool::new(false),
        })
    }

    fn handle(&self, cf: Cf) -> CoreResult<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(cf.name())
            .ok_or_else(|| CoreError::StoreUnavailable(format!("missing column family `{}`", cf.name())))
    }
}

impl KvBackend for RocksBackend {
    fn write_batch(&self, ops: Vec<BatchOp>) -> CoreResult<()> {
        let mut batch = rocksdb::WriteBatch::default();
        for op in ops {
            match op {
                BatchOp::Put(cf, key, value) => {
                    let handle = self.handle(cf)?;
                    batch.put_cf(handle, key, value);
                }
                BatchOp::Delete(cf, key) => {
                    let handle = self.handle(cf)?;
                    batch.delete_cf(handle, key);
                }
            }
        }
        self.db
            .write(batch)
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;
        Ok(())
    }

    fn scan_prefix(&self, cf: Cf, prefix: &[u8]) -> CoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let handle = self.handle(cf)?;
        let mut out = Vec::new();
        for item in self.db.prefix_iterator_cf(handle, prefix) {
            let (key, value) = item.map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }

    fn scan_all(&self, cf: Cf) -> CoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let handle = self.handle(cf)?;
        let mut out = Vec::new();
        for item in self.db.iterator_cf(handle, IteratorMode::Start) {
            let (key, value) = item.map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }

    fn flush(&self) -> CoreResult<()> {
        self.db
            .flush()
            .map_err(|e| CoreError::StoreUnavailable(e.to_string()))?;
        debug!("flushed quad store to disk");
        Ok(())
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.db.flush();
        info!("quad store closed");
    }
}
