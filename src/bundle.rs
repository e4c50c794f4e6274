use std::io::{Cursor, Write};
use zip::write::FileOptions;

use crate::error::EngineError;

/// Pack named byte buffers into one zip archive for batch download.
pub fn bundle(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, EngineError> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, bytes) in entries {
        writer.start_file(name.as_str(), options)?;
        writer
            .write_all(bytes)
            .map_err(|e| EngineError::EncodeFailure(format!("failed to archive {name}: {e}")))?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn archive_round_trips_every_entry() {
        let entries = vec![
            ("one.wav".to_string(), vec![1u8, 2, 3, 4]),
            ("two.wav".to_string(), vec![9u8; 256]),
        ];
        let bytes = bundle(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        for (name, expected) in &entries {
            let mut file = archive.by_name(name).unwrap();
            let mut contents = Vec::new();
            file.read_to_end(&mut contents).unwrap();
            assert_eq!(&contents, expected);
        }
    }

    #[test]
    fn empty_input_yields_an_empty_archive() {
        let bytes = bundle(&[]).unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
