//! Locating the SPK kernel of a run.
//!
//! A kernel is either a file given by the user, or a NAIF version (`naif:DE440`)
//! looked up in the user cache directory (`<cache>/syzygy_cache/jpl_ephem/`) and,
//! with the `jpl-download` feature, fetched from the NAIF server when missing.

use std::{fmt, fs};

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;

use crate::{jpl_ephem::naif::naif_version::NaifVersion, syzygy_errors::SyzygyError};

#[derive(Debug, Clone, PartialEq)]
pub enum EphemFileSource {
    Path(Utf8PathBuf),
    Naif(NaifVersion),
}

impl TryFrom<&str> for EphemFileSource {
    type Error = SyzygyError;

    /// `naif:<VERSION>` selects a NAIF kernel, anything else is taken as a file path.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SyzygyError::InvalidEphemFileSource(value.to_string()));
        }
        match value.split_once(':') {
            Some((scheme, version)) if scheme.eq_ignore_ascii_case("naif") => {
                Ok(EphemFileSource::Naif(version.parse()?))
            }
            _ => Ok(EphemFileSource::Path(Utf8PathBuf::from(value))),
        }
    }
}

impl fmt::Display for EphemFileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EphemFileSource::Path(path) => write!(f, "{path}"),
            EphemFileSource::Naif(version) => write!(f, "naif:{version}"),
        }
    }
}

/// Directory where NAIF kernels are cached.
pub fn cache_dir() -> Result<Utf8PathBuf, SyzygyError> {
    let base_dir = BaseDirs::new().ok_or_else(|| {
        SyzygyError::JPLFileNotFound("no home directory to hold the kernel cache".into())
    })?;
    let cache_path = Utf8Path::from_path(base_dir.cache_dir()).ok_or_else(|| {
        SyzygyError::JPLFileNotFound(format!(
            "cache directory {} is not valid UTF-8",
            base_dir.cache_dir().display()
        ))
    })?;
    Ok(cache_path.join("syzygy_cache").join("jpl_ephem"))
}

impl EphemFileSource {
    /// Local path of the kernel, downloading it first when needed and allowed.
    ///
    /// Return
    /// ----------
    /// * The path of an existing file, or [`SyzygyError::JPLFileNotFound`] when the file
    ///   is missing and cannot be fetched.
    pub fn resolve_path(&self) -> Result<Utf8PathBuf, SyzygyError> {
        match self {
            EphemFileSource::Path(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(SyzygyError::JPLFileNotFound(path.to_string()))
                }
            }
            EphemFileSource::Naif(version) => {
                let cache_path = cache_dir()?;
                let local_file = cache_path.join(version.get_filename());
                if local_file.is_file() {
                    return Ok(local_file);
                }
                fs::create_dir_all(&cache_path)?;
                fetch_kernel(*version, &local_file)?;
                Ok(local_file)
            }
        }
    }
}

#[cfg(feature = "jpl-download")]
fn fetch_kernel(version: NaifVersion, local_file: &Utf8Path) -> Result<(), SyzygyError> {
    let url = version.url();
    let partial = local_file.with_extension("part");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(download_big_file(&url, &partial))
        .map_err(|e| SyzygyError::DownloadError(format!("{url}: {e}")))?;
    fs::rename(&partial, local_file)?;
    Ok(())
}

#[cfg(not(feature = "jpl-download"))]
fn fetch_kernel(version: NaifVersion, local_file: &Utf8Path) -> Result<(), SyzygyError> {
    Err(SyzygyError::JPLFileNotFound(format!(
        "{local_file} ({version} is not cached and the jpl-download feature is disabled)"
    )))
}

/// Stream `url` to `path` chunk by chunk.
#[cfg(feature = "jpl-download")]
async fn download_big_file(url: &str, path: &Utf8Path) -> Result<(), Box<dyn std::error::Error>> {
    use tokio::{fs::File, io::AsyncWriteExt};
    use tokio_stream::StreamExt;
    use tracing::info;

    info!("downloading {url}");
    let mut file = File::create(path).await?;
    let mut stream = reqwest::get(url).await?.error_for_status()?.bytes_stream();

    let mut written = 0usize;
    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result?;
        file.write_all(&chunk).await?;
        written += chunk.len();
    }
    file.flush().await?;

    info!(bytes = written, "downloaded {url}");
    Ok(())
}

#[cfg(test)]
mod download_jpl_file_test {
    use super::*;

    #[test]
    fn test_parse_file_source() {
        assert_eq!(
            EphemFileSource::try_from("naif:DE440").unwrap(),
            EphemFileSource::Naif(NaifVersion::DE440)
        );
        assert_eq!(
            EphemFileSource::try_from("NAIF:de440s").unwrap(),
            EphemFileSource::Naif(NaifVersion::DE440s)
        );
        assert_eq!(
            EphemFileSource::try_from("kernels/de440.bsp").unwrap(),
            EphemFileSource::Path(Utf8PathBuf::from("kernels/de440.bsp"))
        );
        assert_eq!(
            EphemFileSource::try_from("naif:DE1"),
            Err(SyzygyError::InvalidNaifVersion("DE1".into()))
        );
        assert!(EphemFileSource::try_from("  ").is_err());
    }

    #[test]
    fn test_display_file_source() {
        assert_eq!(
            EphemFileSource::Naif(NaifVersion::DE441p1).to_string(),
            "naif:DE441_part-1"
        );
    }

    #[test]
    fn test_missing_user_file() {
        let source = EphemFileSource::Path("does/not/exist.bsp".into());
        assert_eq!(
            source.resolve_path(),
            Err(SyzygyError::JPLFileNotFound("does/not/exist.bsp".into()))
        );
    }

    #[test]
    fn test_existing_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("kernel.bsp")).unwrap();
        fs::write(&path, b"DAF/SPK").unwrap();
        assert_eq!(
            EphemFileSource::Path(path.clone()).resolve_path().unwrap(),
            path
        );
    }
}
