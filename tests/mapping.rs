mod common;

use common::{path_str, pattern, scratch_dir, scratch_file};
use filemap::{Error, MappedFile, get_file_size, truncate};
use rstest::rstest;

#[test]
fn missing_file_fails_to_open() {
    let dir = scratch_dir();
    let path = dir.path().join("this_location_is_definitely_non existent");
    let mut file = MappedFile::new();
    assert!(!file.open(path_str(&path)));
    assert!(!file.is_open());
    assert!(file.as_ptr().is_null());
    file.close();
    assert_eq!(file.size(), 0);
    // open never creates the file
    assert!(!path.exists());
}

#[test]
fn missing_file_reports_open_error() {
    let dir = scratch_dir();
    let path = dir.path().join("missing.bin");
    let mut file = MappedFile::new();
    let err = file.try_open(path_str(&path)).unwrap_err();
    assert!(matches!(err, Error::Open { .. }), "{err}");
    assert_ne!(err.code(), 0);
    assert!(MappedFile::from_path(path_str(&path)).is_err());
}

#[test]
fn nul_in_path_fails_to_open() {
    let mut file = MappedFile::new();
    let err = file.try_open("bad\0path").unwrap_err();
    assert!(matches!(err, Error::Open { .. }), "{err}");
    file.close();
}

#[test]
fn empty_file_cannot_be_mapped() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "empty.bin", &[]);
    let mut file = MappedFile::new();
    let err = file.try_open(path_str(&path)).unwrap_err();
    assert!(
        matches!(err, Error::View { .. } | Error::Mapping { .. }),
        "{err}"
    );
    // partially open: the size step ran, the view was never mapped
    assert!(!file.is_open());
    assert_eq!(file.size(), 0);
    assert!(file.as_slice().is_empty());
    file.close();
    file.close();
}

#[test]
fn empty_file_maps_after_presizing() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "presized.bin", &[]);
    assert_eq!(truncate(path_str(&path), 4096), 0);
    let mut file = MappedFile::new();
    assert!(file.open(path_str(&path)));
    assert_eq!(file.size(), 4096);
    assert!(file.as_slice().iter().all(|&b| b == 0));
    file.close();
}

#[rstest]
#[case(1)]
#[case(100)]
#[case(4096)]
#[case(4097)]
#[case(1 << 20)]
fn written_pattern_round_trips(#[case] len: usize) {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "data.bin", &vec![0u8; len]);
    let expected = pattern(len);

    let mut file = MappedFile::new();
    assert!(file.open(path_str(&path)));
    assert!(file.is_open());
    assert!(!file.as_ptr().is_null());
    assert_eq!(file.size(), len);
    assert_eq!(file.size() as i64, get_file_size(path_str(&path)));
    file.as_mut_slice().copy_from_slice(&expected);
    file.close();

    assert!(!file.is_open());
    assert_eq!(std::fs::read(&path).unwrap(), expected);
}

#[test]
fn mapping_exposes_existing_content() {
    let dir = scratch_dir();
    let expected = pattern(3000);
    let path = scratch_file(&dir, "existing.bin", &expected);
    let file = MappedFile::from_path(path_str(&path)).unwrap();
    assert_eq!(file.as_slice(), &expected[..]);
}

#[test]
fn close_is_idempotent() {
    let mut never_opened = MappedFile::new();
    never_opened.close();
    never_opened.close();
    assert!(!never_opened.is_open());

    let dir = scratch_dir();
    let path = scratch_file(&dir, "data.bin", b"filemap");
    let mut file = MappedFile::default();
    assert!(file.open(path_str(&path)));
    file.close();
    file.close();
    assert!(!file.is_open());
    assert!(file.as_ptr().is_null());
    assert_eq!(file.size(), 0);
    assert!(file.as_mut_slice().is_empty());
    assert!(file.flush().is_ok());
}

#[test]
fn drop_releases_the_mapping() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "data.bin", &[0u8; 16]);
    {
        let mut file = MappedFile::from_path(path_str(&path)).unwrap();
        file.as_mut_slice()[..4].copy_from_slice(b"drop");
    }
    assert_eq!(&std::fs::read(&path).unwrap()[..4], b"drop");
    // the handle was released, so the file can be resized and mapped again
    assert_eq!(truncate(path_str(&path), 8), 0);
    let file = MappedFile::from_path(path_str(&path)).unwrap();
    assert_eq!(file.as_slice(), b"drop\0\0\0\0");
}

#[test]
fn two_mappings_share_writes() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "shared.bin", &[0u8; 8192]);
    let mut writer = MappedFile::new();
    let mut reader = MappedFile::new();
    assert!(writer.open(path_str(&path)));
    assert!(reader.open(path_str(&path)));

    writer.as_mut_slice()[4096..4101].copy_from_slice(b"hello");
    assert_eq!(&reader.as_slice()[4096..4101], b"hello");

    writer.flush().unwrap();
    assert_eq!(&std::fs::read(&path).unwrap()[4096..4101], b"hello");

    writer.close();
    reader.close();
}

#[test]
fn mapping_does_not_follow_file_growth() {
    let dir = scratch_dir();
    let path = scratch_file(&dir, "grow.bin", &[7u8; 100]);
    let mut file = MappedFile::new();
    assert!(file.open(path_str(&path)));
    assert_eq!(truncate(path_str(&path), 10_000), 0);
    assert_eq!(file.size(), 100);
    assert_eq!(file.as_slice().len(), 100);
    file.close();

    assert!(file.open(path_str(&path)));
    assert_eq!(file.size(), 10_000);
}

#[test]
fn reopening_switches_files() {
    let dir = scratch_dir();
    let first = scratch_file(&dir, "first.bin", b"first");
    let second = scratch_file(&dir, "second.bin", b"second file");
    let mut file = MappedFile::new();
    assert!(file.open(path_str(&first)));
    assert!(file.open(path_str(&second)));
    assert_eq!(file.as_slice(), b"second file");

    // a failed reopen leaves nothing mapped
    assert!(!file.open(path_str(&dir.path().join("gone.bin"))));
    assert!(!file.is_open());
    file.close();
}
