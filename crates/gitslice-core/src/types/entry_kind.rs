//! Archive entry kind classification.

/// Kind of an archive entry, as far as extraction is concerned.
///
/// Only regular files and directories are materialized. Symbolic links,
/// hard links, devices and FIFOs all map to [`EntryKind::Other`]; they count
/// as matches but are discarded without error.
///
/// # Examples
///
/// ```
/// use gitslice_core::EntryKind;
///
/// assert_eq!(EntryKind::from(tar::EntryType::Regular), EntryKind::File);
/// assert_eq!(EntryKind::from(tar::EntryType::Directory), EntryKind::Directory);
/// assert_eq!(EntryKind::from(tar::EntryType::Symlink), EntryKind::Other);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Any other entry (links, devices, FIFOs).
    Other,
}

impl From<tar::EntryType> for EntryKind {
    fn from(entry_type: tar::EntryType) -> Self {
        match entry_type {
            tar::EntryType::Regular | tar::EntryType::Continuous => Self::File,
            tar::EntryType::Directory => Self::Directory,
            _ => Self::Other,
        }
    }
}

/// Returns `true` for tar records that only carry metadata for other
/// entries (pax headers, GNU long names) and never describe content.
///
/// GitHub archives start with a pax global header named
/// `pax_global_header`; it must not be mistaken for the first entry.
#[must_use]
pub fn is_metadata_record(entry_type: tar::EntryType) -> bool {
    entry_type.is_pax_global_extensions()
        || entry_type.is_pax_local_extensions()
        || entry_type.is_gnu_longname()
        || entry_type.is_gnu_longlink()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kinds() {
        assert_eq!(EntryKind::from(tar::EntryType::Regular), EntryKind::File);
        assert_eq!(EntryKind::from(tar::EntryType::Continuous), EntryKind::File);
    }

    #[test]
    fn test_directory_kind() {
        assert_eq!(
            EntryKind::from(tar::EntryType::Directory),
            EntryKind::Directory
        );
    }

    #[test]
    fn test_other_kinds() {
        for entry_type in [
            tar::EntryType::Symlink,
            tar::EntryType::Link,
            tar::EntryType::Char,
            tar::EntryType::Block,
            tar::EntryType::Fifo,
        ] {
            assert_eq!(EntryKind::from(entry_type), EntryKind::Other);
        }
    }

    #[test]
    fn test_metadata_records() {
        assert!(is_metadata_record(tar::EntryType::XGlobalHeader));
        assert!(is_metadata_record(tar::EntryType::XHeader));
        assert!(is_metadata_record(tar::EntryType::GNULongName));
        assert!(is_metadata_record(tar::EntryType::GNULongLink));
        assert!(!is_metadata_record(tar::EntryType::Regular));
        assert!(!is_metadata_record(tar::EntryType::Directory));
        assert!(!is_metadata_record(tar::EntryType::Symlink));
    }
}
