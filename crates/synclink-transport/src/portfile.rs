use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConnectError;

/// Default file name, resolved relative to the user's home directory.
pub const DEFAULT_PORT_FILE_NAME: &str = ".synclinkd";

/// Environment variable overriding the port file path.
pub const PORT_FILE_ENV: &str = "SYNCLINKD_PORT_FILE";

/// Locator for the daemon's per-user port file.
///
/// The daemon writes its current listening port into this file as a
/// single decimal integer. The file's existence is the only liveness
/// signal available before connecting.
#[derive(Debug, Clone)]
pub struct PortFile {
    path: PathBuf,
}

impl PortFile {
    /// Use an explicit port file path.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve the default location: `$SYNCLINKD_PORT_FILE` if set,
    /// otherwise `<home>/.synclinkd`.
    pub fn default_location() -> Result<Self, ConnectError> {
        if let Some(path) = std::env::var_os(PORT_FILE_ENV) {
            return Ok(Self::at(PathBuf::from(path)));
        }
        let home = dirs::home_dir().ok_or(ConnectError::NoHomeDir)?;
        Ok(Self::at(home.join(DEFAULT_PORT_FILE_NAME)))
    }

    /// The path this locator points at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the daemon's listening port.
    pub fn read_port(&self) -> Result<u16, ConnectError> {
        if !self.path.exists() {
            return Err(ConnectError::PortFileMissing {
                path: self.path.clone(),
            });
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|source| {
            ConnectError::PortFileUnreadable {
                path: self.path.clone(),
                source,
            }
        })?;

        let trimmed = contents.trim();
        let port: u16 = trimmed
            .parse()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| ConnectError::PortFileInvalid {
                path: self.path.clone(),
                contents: preview(trimmed),
            })?;

        debug!(path = ?self.path, port, "resolved daemon port");
        Ok(port)
    }
}

fn preview(contents: &str) -> String {
    const MAX: usize = 32;
    if contents.len() > MAX {
        let cut = contents
            .char_indices()
            .take_while(|(i, _)| *i < MAX)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &contents[..cut])
    } else {
        contents.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "synclink-portfile-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn reads_decimal_port() {
        let dir = unique_temp_dir("ok");
        let path = dir.join("port");
        std::fs::write(&path, "50321").unwrap();

        let port = PortFile::at(&path).read_port().unwrap();
        assert_eq!(port, 50321);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let dir = unique_temp_dir("ws");
        let path = dir.join("port");
        std::fs::write(&path, " 8080\n").unwrap();

        let port = PortFile::at(&path).read_port().unwrap();
        assert_eq!(port, 8080);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_is_distinct_error() {
        let dir = unique_temp_dir("missing");
        let path = dir.join("does-not-exist");

        let err = PortFile::at(&path).read_port().unwrap_err();
        assert!(matches!(err, ConnectError::PortFileMissing { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_non_numeric_contents() {
        let dir = unique_temp_dir("junk");
        let path = dir.join("port");
        std::fs::write(&path, "not-a-port").unwrap();

        let err = PortFile::at(&path).read_port().unwrap_err();
        assert!(matches!(err, ConnectError::PortFileInvalid { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_out_of_range_port() {
        let dir = unique_temp_dir("range");
        let path = dir.join("port");
        std::fs::write(&path, "70000").unwrap();

        let err = PortFile::at(&path).read_port().unwrap_err();
        assert!(matches!(err, ConnectError::PortFileInvalid { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_port_zero() {
        let dir = unique_temp_dir("zero");
        let path = dir.join("port");
        std::fs::write(&path, "0").unwrap();

        let err = PortFile::at(&path).read_port().unwrap_err();
        assert!(matches!(err, ConnectError::PortFileInvalid { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
