//! yCheck2 archive extraction.
//!
//! A yCheck2 file is a passphrase-protected zip holding a single command
//! file. The passphrase is a product constant (legacy ZipCrypto). The
//! member is read straight into memory; nothing downstream needs it on
//! disk.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Result, YCheckError};

/// Fixed passphrase every yCheck2 archive is encrypted with.
pub const ARCHIVE_PASSPHRASE: &[u8] = b"*6-/&c-qHUp =p*!*4U@8xF=(|:!+f";

/// Extract the first non-directory member of the archive.
///
/// Returns `EmptyArchive` when the archive holds only directories or
/// nothing at all.
pub fn extract_first_member<R: Read + Seek>(reader: R) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(reader)?;
    for index in 0..archive.len() {
        let mut member = archive.by_index_decrypt(index, ARCHIVE_PASSPHRASE)?;
        if member.is_dir() {
            continue;
        }
        debug!("extracting archive member {}", member.name());
        let mut data = Vec::with_capacity(member.size() as usize);
        member.read_to_end(&mut data)?;
        return Ok(data);
    }
    Err(YCheckError::EmptyArchive)
}

/// Open a yCheck2 file and extract its command file.
pub fn extract_command_file(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path)?;
    extract_first_member(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::CompressionMethod;
    use zip::write::SimpleFileOptions;

    fn stored() -> SimpleFileOptions {
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
    }

    #[test]
    fn extracts_first_file_member() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("csv/", stored()).unwrap();
        writer.start_file("csv/commands.csv", stored()).unwrap();
        writer.write_all(b"FontName,Arial\n").unwrap();
        let buffer = writer.finish().unwrap();

        let data = extract_first_member(Cursor::new(buffer.into_inner())).unwrap();
        assert_eq!(data, b"FontName,Arial\n");
    }

    #[test]
    fn directory_only_archive_is_empty() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.add_directory("csv/", stored()).unwrap();
        let buffer = writer.finish().unwrap();

        let err = extract_first_member(Cursor::new(buffer.into_inner())).unwrap_err();
        assert!(matches!(err, YCheckError::EmptyArchive));
    }

    #[test]
    fn garbage_input_is_an_archive_error() {
        let err = extract_first_member(Cursor::new(b"not a zip".to_vec())).unwrap_err();
        assert!(matches!(err, YCheckError::Archive(_)));
    }
}
