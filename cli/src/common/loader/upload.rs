//! # Uploaded Dataset Loader
//!
//! File: cli/src/common/loader/upload.rs
//!
//! ## Overview
//!
//! `ArchiveLoader` holds an uploaded file, name plus raw bytes, in memory and
//! turns it into a `Dataset`. Nothing is written to disk.
//!
//! | Name ends with        | Handling                                   |
//! |-----------------------|--------------------------------------------|
//! | `.csv`                | parsed as-is                               |
//! | `.csv.gz`, `.gz`      | gunzipped, then parsed                     |
//! | `.tar`                | first `.csv` entry parsed                  |
//! | `.tar.gz`, `.tgz`     | gunzipped, then first `.csv` entry parsed  |
//! | anything else         | sniffed: gzip magic, then tar magic        |
//!
//! ```rust
//! let loader = ArchiveLoader::new("population.tgz", body.to_vec());
//! let dataset = loader.load()?;
//! ```
//!
use super::csv_file::parse_records;
use super::{DatasetFormat, DatasetLoader};
use crate::common::archive::{compression, tar, MAX_INFLATED_BYTES};
use crate::core::error::{EvError, Result};
use crate::predictor::Dataset;
use anyhow::Context;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

/// Offset and value of the POSIX/GNU tar magic in the first header block.
const TAR_MAGIC_OFFSET: usize = 257;
const TAR_MAGIC: &[u8] = b"ustar";

/// An uploaded dataset held in memory.
#[derive(Debug, Clone)]
pub struct ArchiveLoader {
    name: String,
    bytes: Vec<u8>,
}

impl ArchiveLoader {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a file from disk into memory and treats it like an upload.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read dataset archive: {}", path.display()))?;
        Ok(Self::new(path.to_string_lossy(), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw CSV bytes inside the upload.
    fn csv_bytes(&self) -> Result<Cow<'_, [u8]>> {
        let format = DatasetFormat::from_name(&self.name);
        debug!("Upload '{}' resolved to format {:?}", self.name, format);
        match format {
            Some(DatasetFormat::Csv) => Ok(Cow::Borrowed(&self.bytes)),
            Some(DatasetFormat::GzipCsv) => {
                let inflated = compression::decompress_gzip(&self.bytes, MAX_INFLATED_BYTES)?;
                Ok(Cow::Owned(inflated))
            }
            Some(DatasetFormat::Tar) => self.csv_from_tar(&self.bytes).map(Cow::Owned),
            Some(DatasetFormat::TarGz) => {
                let inflated = compression::decompress_gzip(&self.bytes, MAX_INFLATED_BYTES)?;
                self.csv_from_tar(&inflated).map(Cow::Owned)
            }
            None => self.sniff_csv_bytes(),
        }
    }

    fn sniff_csv_bytes(&self) -> Result<Cow<'_, [u8]>> {
        if compression::is_gzip(&self.bytes) {
            let inflated = compression::decompress_gzip(&self.bytes, MAX_INFLATED_BYTES)?;
            if looks_like_tar(&inflated) {
                return self.csv_from_tar(&inflated).map(Cow::Owned);
            }
            return Ok(Cow::Owned(inflated));
        }
        if looks_like_tar(&self.bytes) {
            return self.csv_from_tar(&self.bytes).map(Cow::Owned);
        }
        Err(EvError::UnsupportedFormat {
            name: self.name.clone(),
        }
        .into())
    }

    fn csv_from_tar(&self, tar_bytes: &[u8]) -> Result<Vec<u8>> {
        match tar::extract_first_csv(tar_bytes, MAX_INFLATED_BYTES)? {
            Some((entry, contents)) => {
                debug!("Reading '{}' from archive '{}'", entry, self.name);
                Ok(contents)
            }
            None => Err(EvError::NoCsvInArchive {
                name: self.name.clone(),
            }
            .into()),
        }
    }
}

impl DatasetLoader for ArchiveLoader {
    fn describe(&self) -> String {
        format!("{} (upload, {} bytes)", self.name, self.bytes.len())
    }

    fn load(&self) -> Result<Dataset> {
        let csv_bytes = self.csv_bytes()?;
        let records = parse_records(csv_bytes.as_ref())
            .with_context(|| format!("Failed to load uploaded dataset '{}'", self.name))?;
        Ok(Dataset::new(self.name(), records))
    }
}

fn looks_like_tar(data: &[u8]) -> bool {
    data.get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()) == Some(TAR_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    const CSV: &[u8] = b"Make,Model,Electric Vehicle Type,Electric Range\nTESLA,MODEL 3,BEV,272\nKIA,NIRO,PHEV,26\n";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = ::tar::Builder::new(Vec::new());
        for (name, data) in files {
            let mut header = ::tar::Header::new_ustar();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_plain_csv_upload() -> Result<()> {
        let dataset = ArchiveLoader::new("ev.csv", CSV.to_vec()).load()?;
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.source(), "ev.csv");
        Ok(())
    }

    #[test]
    fn test_gzip_csv_upload() -> Result<()> {
        let dataset = ArchiveLoader::new("ev.csv.gz", gzip(CSV)).load()?;
        assert_eq!(dataset.records()[1].lookup_key(), "kia niro");
        Ok(())
    }

    #[test]
    fn test_tar_gz_upload() -> Result<()> {
        let archive = gzip(&tarball(&[("docs/readme.txt", b"hi"), ("data/ev.csv", CSV)]));
        let dataset = ArchiveLoader::new("ev.tgz", archive).load()?;
        assert_eq!(dataset.len(), 2);
        Ok(())
    }

    #[test]
    fn test_plain_tar_upload() -> Result<()> {
        let dataset = ArchiveLoader::new("ev.tar", tarball(&[("ev.csv", CSV)])).load()?;
        assert_eq!(dataset.len(), 2);
        Ok(())
    }

    #[test]
    fn test_unknown_name_is_sniffed() -> Result<()> {
        let gz = ArchiveLoader::new("upload", gzip(CSV)).load()?;
        assert_eq!(gz.len(), 2);

        let tgz = ArchiveLoader::new("upload", gzip(&tarball(&[("ev.csv", CSV)]))).load()?;
        assert_eq!(tgz.len(), 2);

        let tar = ArchiveLoader::new("blob.bin", tarball(&[("ev.csv", CSV)])).load()?;
        assert_eq!(tar.len(), 2);
        Ok(())
    }

    #[test]
    fn test_unknown_plain_bytes_rejected() {
        let err = ArchiveLoader::new("upload", CSV.to_vec()).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvError>(),
            Some(EvError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_archive_without_csv() {
        let archive = tarball(&[("notes.txt", b"nothing")]);
        let err = ArchiveLoader::new("ev.tar", archive).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvError>(),
            Some(EvError::NoCsvInArchive { .. })
        ));
    }

    #[test]
    fn test_describe_mentions_size() {
        let loader = ArchiveLoader::new("ev.csv", CSV.to_vec());
        assert!(loader.describe().starts_with("ev.csv (upload, "));
        assert_eq!(loader.name(), "ev.csv");
    }
}
