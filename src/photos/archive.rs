use std::io::{Cursor, Write};
use std::path::Path;

use bytes::Bytes;
use tracing::warn;
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

pub struct ArchiveEntry {
    pub name: String,
    pub body: Bytes,
}

/// Build an in-memory ZIP from the given entries. Entries are stored under
/// their base filename, deflate-compressed. An entry that fails to compress
/// is skipped, not fatal. Zero surviving entries means "no archive": the
/// result is `None`, never a zero-byte ZIP.
pub fn build_zip(entries: Vec<ArchiveEntry>) -> anyhow::Result<Option<Vec<u8>>> {
    if entries.is_empty() {
        return Ok(None);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut written = 0usize;

    for entry in entries {
        let base = Path::new(&entry.name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(entry.name.as_str());

        if let Err(e) = zip.start_file(base, options) {
            warn!(name = %entry.name, error = %e, "skipping archive entry");
            continue;
        }
        if let Err(e) = zip.write_all(&entry.body) {
            warn!(name = %entry.name, error = %e, "skipping archive entry");
            let _ = zip.abort_file();
            continue;
        }
        written += 1;
    }

    if written == 0 {
        return Ok(None);
    }
    let cursor = zip.finish()?;
    Ok(Some(cursor.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, body: &'static [u8]) -> ArchiveEntry {
        ArchiveEntry {
            name: name.into(),
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn empty_input_yields_no_archive() {
        assert!(build_zip(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn archive_contains_each_entry_by_base_name() {
        let buf = build_zip(vec![
            entry("aaa.jpg", b"first"),
            entry("bbb.png", b"second"),
            entry("ccc.jpg", b"third"),
        ])
        .unwrap()
        .expect("archive built");

        let mut archive = zip::ZipArchive::new(Cursor::new(buf)).expect("readable zip");
        assert_eq!(archive.len(), 3);
        for (name, body) in [
            ("aaa.jpg", b"first" as &[u8]),
            ("bbb.png", b"second"),
            ("ccc.jpg", b"third"),
        ] {
            let mut file = archive.by_name(name).expect("entry present");
            let mut out = Vec::new();
            std::io::Read::read_to_end(&mut file, &mut out).expect("read entry");
            assert_eq!(out, body);
        }
    }

    #[test]
    fn entry_names_are_reduced_to_base_filenames() {
        let buf = build_zip(vec![entry("some/dir/photo.jpg", b"x")])
            .unwrap()
            .expect("archive built");
        let archive = zip::ZipArchive::new(Cursor::new(buf)).expect("readable zip");
        assert_eq!(archive.file_names().collect::<Vec<_>>(), vec!["photo.jpg"]);
    }
}
