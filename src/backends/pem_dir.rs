//! Accessor that scans a directory tree of PEM-encoded certificates.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use x509_parser::pem::Pem;

use crate::backends::accessor::{Accessor, BackendKind};
use crate::backends::certinfo;
use crate::cache::CacheItem;
use crate::errors::{Error, Result};

const CERT_EXTENSIONS: [&str; 3] = ["pem", "crt", "cer"];

/// Enumerates certificate expiry from PEM material on disk.
///
/// Walks the configured root recursively and emits one item per CERTIFICATE
/// block found in `.pem`/`.crt`/`.cer` files. The item path is the file path
/// relative to the root; bundles with more than one certificate get `#n`
/// appended for the n-th block.
#[derive(Debug)]
pub struct PemDirectoryAccessor {
    name: String,
    root: PathBuf,
}

impl PemDirectoryAccessor {
    pub fn new(name: String, root: PathBuf) -> Self {
        Self { name, root }
    }

    fn items_from_file(&self, relative: &str, data: &[u8]) -> Result<Vec<CacheItem>> {
        let mut items = Vec::new();

        for pem in Pem::iter_from_buffer(data) {
            let pem = pem
                .map_err(|err| Error::backend(format!("{}: invalid PEM: {}", relative, err)))?;
            if pem.label != "CERTIFICATE" {
                continue;
            }

            let cert = pem.parse_x509().map_err(|err| {
                Error::backend(format!("{}: invalid certificate: {}", relative, err))
            })?;
            let meta = certinfo::from_cert(&cert)?;

            let path = if items.is_empty() {
                relative.to_string()
            } else {
                format!("{}#{}", relative, items.len())
            };

            items.push(CacheItem {
                backend_name: self.name.clone(),
                path,
                common_name: meta.common_name,
                not_after: meta.not_after,
            });
        }

        Ok(items)
    }
}

#[async_trait]
impl Accessor for PemDirectoryAccessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::PemDirectory
    }

    async fn fetch_all(&self) -> Result<Vec<CacheItem>> {
        let mut items = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|err| Error::backend(format!("{}: {}", dir.display(), err)))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|err| Error::backend(format!("{}: {}", dir.display(), err)))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|err| Error::backend(format!("{}: {}", path.display(), err)))?;

                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                if !has_certificate_extension(&path) {
                    continue;
                }

                let data = tokio::fs::read(&path)
                    .await
                    .map_err(|err| Error::backend(format!("{}: {}", path.display(), err)))?;
                let relative = path
                    .strip_prefix(&self.root)
                    .unwrap_or(path.as_path())
                    .to_string_lossy()
                    .into_owned();

                items.extend(self.items_from_file(&relative, &data)?);
            }
        }

        Ok(items)
    }
}

fn has_certificate_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| CERT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}
