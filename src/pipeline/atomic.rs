//! Write-then-rename for worker outputs.
//!
//! The bytes are written to a `.part` temp file in the destination folder and
//! renamed over the final path only after the writer returned `Ok`. The temp
//! file lives in the same folder so the rename never crosses a filesystem.
//! On error the temp file is dropped and removed, and the final path is left
//! untouched. Outputs end up with the same permissions a plain
//! `fs::write` would give them.

use crate::error::{FileError, FileErrorKind};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Run `write` against a fresh temp file next to `output`, then move it into
/// place.
pub fn write_atomically<F>(output: &Path, write: F) -> Result<(), FileError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), FileError>,
{
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".batchconv-").suffix(".part");
    // Temp files default to 0600; outputs get what a plain create would
    // (0666 minus the umask).
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(|e| FileError::io(output, FileErrorKind::Write, e))?;

    write(&mut tmp)?;

    tmp.flush()
        .map_err(|e| FileError::io(output, FileErrorKind::Write, e))?;
    tmp.persist(output)
        .map_err(|e| FileError::io(output, FileErrorKind::Write, e.error))?;

    debug!("Wrote {}", output.display());
    Ok(())
}
