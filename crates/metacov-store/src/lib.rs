//! File-per-key persistence of labeled feature tables.
//!
//! A [`FileStore`] maps an opaque string key to one JSON file under its root
//! directory, optionally gzip-compressed. Compression is a construction
//! toggle, not a format change: `read` accepts either encoding regardless of
//! how the store was opened. Values pass through serde_json's shortest
//! decimal encoding for `f64`, which round-trips finite doubles exactly;
//! non-finite values are rejected at write time because JSON cannot encode
//! them.
//!
//! Distinct keys map to distinct files, so concurrent writers touching
//! different keys never interfere.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use metacov_core::{CovError, Dataset, ErrorInfo};

/// Key-addressed store for `(records, labels)` pairs.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    compress: bool,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// `compress` controls whether new writes are gzip-compressed.
    pub fn open(root: impl Into<PathBuf>, compress: bool) -> Result<Self, CovError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|err| {
            CovError::Store(
                ErrorInfo::new("store-create-root", "failed to create store directory")
                    .with_context("path", root.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Ok(Self { root, compress })
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn plain_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn gz_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json.gz"))
    }

    /// Returns true when the key is present in either encoding.
    pub fn exists(&self, key: &str) -> bool {
        self.gz_path(key).exists() || self.plain_path(key).exists()
    }

    /// Persists the dataset under `key`.
    ///
    /// Fails with a store error when the destination is not writable and with
    /// a serde error when any value is non-finite.
    pub fn write(&self, key: &str, dataset: &Dataset) -> Result<(), CovError> {
        dataset.validate()?;
        for (row, record) in dataset.records.iter().enumerate() {
            for (id, value) in record {
                if !value.is_finite() {
                    return Err(CovError::Serde(
                        ErrorInfo::new("store-nonfinite", "JSON cannot encode non-finite values")
                            .with_context("key", key)
                            .with_context("row", row.to_string())
                            .with_context("id", id.clone()),
                    ));
                }
            }
        }
        let json = serde_json::to_string_pretty(dataset)
            .map_err(|err| CovError::Serde(ErrorInfo::new("store-encode", err.to_string())))?;
        let path = if self.compress {
            self.gz_path(key)
        } else {
            self.plain_path(key)
        };
        let wrap = |err: std::io::Error| {
            CovError::Store(
                ErrorInfo::new("store-write", "failed to write dataset")
                    .with_context("key", key)
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        };
        // Stage into a sibling temp file and rename, so an interrupted write
        // leaves the key absent rather than half-written.
        let mut staging = path.clone();
        staging.as_mut_os_string().push(".tmp");
        if self.compress {
            let file = File::create(&staging).map_err(wrap)?;
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder.write_all(json.as_bytes()).map_err(wrap)?;
            encoder.finish().map_err(wrap)?;
        } else {
            fs::write(&staging, json).map_err(wrap)?;
        }
        fs::rename(&staging, &path).map_err(wrap)?;
        Ok(())
    }

    /// Reads the dataset stored under `key`.
    ///
    /// Fails with a not-found error when the key is absent and a corrupt-data
    /// error when the stored content cannot be parsed into a valid dataset.
    pub fn read(&self, key: &str) -> Result<Dataset, CovError> {
        let gz = self.gz_path(key);
        let plain = self.plain_path(key);
        let json = if gz.exists() {
            let file = File::open(&gz).map_err(|err| read_failed(key, &gz, err))?;
            let mut decoder = GzDecoder::new(file);
            let mut contents = String::new();
            decoder
                .read_to_string(&mut contents)
                .map_err(|err| corrupt(key, &gz, err.to_string()))?;
            contents
        } else if plain.exists() {
            fs::read_to_string(&plain).map_err(|err| read_failed(key, &plain, err))?
        } else {
            return Err(CovError::NotFound(
                ErrorInfo::new("store-missing-key", "no dataset stored under key")
                    .with_context("key", key)
                    .with_context("root", self.root.display().to_string()),
            ));
        };
        let source = if gz.exists() { gz } else { plain };
        let dataset: Dataset = serde_json::from_str(&json)
            .map_err(|err| corrupt(key, &source, err.to_string()))?;
        dataset
            .validate()
            .map_err(|err| corrupt(key, &source, err.to_string()))?;
        Ok(dataset)
    }

    /// Lists every key present in the store, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CovError> {
        let mut keys = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|err| {
            CovError::Store(
                ErrorInfo::new("store-list", "failed to enumerate store directory")
                    .with_context("root", self.root.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        for entry in entries {
            let entry = entry.map_err(|err| {
                CovError::Store(ErrorInfo::new("store-list-entry", err.to_string()))
            })?;
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some(stem) = name
                .strip_suffix(".json.gz")
                .or_else(|| name.strip_suffix(".json"))
            {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

fn read_failed(key: &str, path: &Path, err: std::io::Error) -> CovError {
    CovError::Store(
        ErrorInfo::new("store-read", "failed to read dataset")
            .with_context("key", key)
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

fn corrupt(key: &str, path: &Path, detail: String) -> CovError {
    CovError::Corrupt(
        ErrorInfo::new("store-corrupt", "stored content is not a valid dataset")
            .with_context("key", key)
            .with_context("path", path.display().to_string())
            .with_hint(detail),
    )
}
