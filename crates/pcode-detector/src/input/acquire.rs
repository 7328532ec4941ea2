//! Resource acquisition: download, archive extraction, and fragment reading.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{DetectorError, Result};

use super::catalog::Resource;
use super::fragment::{FileFormat, RawFragment};
use super::reader::FragmentReader;

/// Fragments read from one resource.
///
/// Holds the temporary working directory (if any) so downloaded and
/// extracted files live exactly as long as the fragments are in use.
#[derive(Debug, Default)]
pub struct Acquired {
    /// Every fragment that could be read.
    pub fragments: Vec<RawFragment>,
    /// Last read failure, if some file could not be parsed.
    pub read_error: Option<String>,
    workdir: Option<TempDir>,
}

impl Acquired {
    /// Fragments with no read failure and no working directory.
    pub fn from_fragments(fragments: Vec<RawFragment>) -> Self {
        Self {
            fragments,
            read_error: None,
            workdir: None,
        }
    }

    /// Attach a read failure.
    pub fn with_read_error(mut self, error: impl Into<String>) -> Self {
        self.read_error = Some(error.into());
        self
    }

    /// Working directory backing the fragments, if any.
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_ref().map(|dir| dir.path())
    }
}

/// Turns a resource descriptor into raw fragments.
pub trait DataAcquirer {
    /// Fetch and read a resource as `format`.
    ///
    /// Returns `Err` when nothing could be downloaded or extracted; partial
    /// read failures are reported through [`Acquired::read_error`].
    fn acquire(&self, resource: &Resource, format: &FileFormat) -> Result<Acquired>;
}

/// Acquires resources from local paths and HTTP(S) URLs.
pub struct FileAcquirer {
    reader: FragmentReader,
    client: reqwest::blocking::Client,
    base_dir: Option<PathBuf>,
}

impl FileAcquirer {
    /// Create an acquirer with the given fragment reader.
    pub fn new(reader: FragmentReader) -> Self {
        Self {
            reader,
            client: reqwest::blocking::Client::new(),
            base_dir: None,
        }
    }

    /// Resolve relative local paths against this directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Use a preconfigured HTTP client (user agent, timeouts).
    pub fn with_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = client;
        self
    }

    fn locate(&self, url: &str, workdir: &mut Option<TempDir>) -> Result<PathBuf> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return self.download(url, workdir);
        }

        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        let path = match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        };
        if !path.exists() {
            return Err(DetectorError::Acquisition(format!(
                "Unable to download file: {} does not exist",
                path.display()
            )));
        }
        Ok(path)
    }

    fn download(&self, url: &str, workdir: &mut Option<TempDir>) -> Result<PathBuf> {
        let dir = ensure_workdir(workdir)?;
        let file_name = url
            .split(['?', '#'])
            .next()
            .and_then(|u| u.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("resource");
        let target = dir.join(file_name);

        let bytes = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.bytes())
            .map_err(|e| DetectorError::Acquisition(format!("Unable to download file: {}", e)))?;

        fs::write(&target, &bytes).map_err(|e| DetectorError::io(&target, e))?;
        debug!(url, path = %target.display(), bytes = bytes.len(), "downloaded resource");
        Ok(target)
    }

    /// Files of the target format inside a downloaded resource.
    fn resource_files(
        &self,
        file: &Path,
        format: &FileFormat,
        workdir: &mut Option<TempDir>,
    ) -> Result<Vec<PathBuf>> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if format.is_spreadsheet() && !name.contains(".zip") {
            return Ok(vec![file.to_path_buf()]);
        }

        if name.contains(".gz") {
            return Ok(vec![gunzip(file, format, workdir)?]);
        }

        if !(name.contains(".zip") || is_zip_file(file)) {
            return Ok(vec![file.to_path_buf()]);
        }

        let extract_dir = ensure_workdir(workdir)?.join("extracted");
        let archive = File::open(file).map_err(|e| DetectorError::io(file, e))?;
        zip::ZipArchive::new(archive)
            .and_then(|mut archive| archive.extract(&extract_dir))
            .map_err(|e| DetectorError::Archive(e.to_string()))?;

        let mut files = Vec::new();
        collect_files(&extract_dir, format.extension(), &mut files)?;
        files.sort();

        if files.is_empty() && matches!(format, FileFormat::Xlsx) {
            files.push(file.to_path_buf());
        }
        Ok(files)
    }
}

impl Default for FileAcquirer {
    fn default() -> Self {
        Self::new(FragmentReader::default())
    }
}

impl DataAcquirer for FileAcquirer {
    fn acquire(&self, resource: &Resource, format: &FileFormat) -> Result<Acquired> {
        let mut workdir = None;
        let file = self.locate(&resource.url, &mut workdir)?;
        let files = self.resource_files(&file, format, &mut workdir)?;

        let mut acquired = Acquired {
            fragments: Vec::new(),
            read_error: None,
            workdir,
        };

        for path in files {
            match self.reader.read_path(&path, format) {
                Ok(fragments) => acquired.fragments.extend(fragments),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read resource file");
                    acquired.read_error = Some(format!("Unable to read resource: {}", e));
                }
            }
        }

        Ok(acquired)
    }
}

fn ensure_workdir(workdir: &mut Option<TempDir>) -> Result<PathBuf> {
    if workdir.is_none() {
        let dir = tempfile::Builder::new()
            .prefix("pcode-detector-")
            .tempdir()
            .map_err(|e| DetectorError::io(std::env::temp_dir(), e))?;
        *workdir = Some(dir);
    }
    workdir
        .as_ref()
        .map(|dir| dir.path().to_path_buf())
        .ok_or_else(|| DetectorError::Acquisition("no working directory".to_string()))
}

/// Decompress a gzipped resource into the working directory.
///
/// The output keeps the archive's name without `.gz`, carrying the target
/// extension so `layer.gz` read as a GeoPackage lands as `layer.gpkg`.
fn gunzip(
    file: &Path,
    format: &FileFormat,
    workdir: &mut Option<TempDir>,
) -> Result<PathBuf> {
    let extract_dir = ensure_workdir(workdir)?.join("extracted");
    fs::create_dir_all(&extract_dir).map_err(|e| DetectorError::io(&extract_dir, e))?;

    let stem = file
        .file_name()
        .map(|n| n.to_string_lossy().replace(".gz", ""))
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "resource".to_string());
    let suffix = format!(".{}", format.extension());
    let target = if stem.to_lowercase().ends_with(&suffix) {
        extract_dir.join(stem)
    } else {
        extract_dir.join(format!("{}{}", stem, suffix))
    };

    let input = File::open(file).map_err(|e| DetectorError::io(file, e))?;
    let mut output = File::create(&target).map_err(|e| DetectorError::io(&target, e))?;
    io::copy(&mut GzDecoder::new(input), &mut output)
        .map_err(|e| DetectorError::Archive(e.to_string()))?;

    debug!(archive = %file.display(), path = %target.display(), "decompressed resource");
    Ok(target)
}

/// Whether a file starts with the zip local-header signature.
fn is_zip_file(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut magic))
        .map(|_| magic == *b"PK\x03\x04")
        .unwrap_or(false)
}

/// Recursively collect files with the given extension.
fn collect_files(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| DetectorError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| DetectorError::io(dir, e))?.path();
        if path.is_dir() {
            collect_files(&path, extension, out)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        {
            out.push(path);
        }
    }
    Ok(())
}
