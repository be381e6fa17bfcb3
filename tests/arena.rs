mod common;

use common::{path_str, scratch_dir, scratch_file};
use filemap::{Arena, Buffer, Error, MappedFile};

/// Swaps the two halves of an arena, the way a patch moves blocks around.
fn swap_halves<A: Arena>(arena: &mut A) -> filemap::Result<()> {
    let half = arena.size() / 2;
    let front = arena.read(0, half)?.to_vec();
    arena.copy_within(half, 0, half)?;
    arena.write(&front, half)
}

#[test]
fn buffer_reads_and_writes() {
    let mut memory = *b"abcdef";
    let mut buffer = Buffer::new(&mut memory);
    assert!(buffer.is_valid());
    assert_eq!(buffer.size(), 6);
    assert_eq!(buffer.read(2, 3).unwrap(), b"cde");
    buffer.write(b"XY", 4).unwrap();
    assert_eq!(buffer.read(0, 6).unwrap(), b"abcdXY");
    assert_eq!(buffer.read(6, 0).unwrap(), b"");
}

#[test]
fn buffer_rejects_out_of_bounds() {
    let mut memory = [0u8; 8];
    let mut buffer = Buffer::new(&mut memory);
    assert!(matches!(
        buffer.read(4, 5),
        Err(Error::OutOfBounds {
            offset: 4,
            len: 5,
            size: 8
        })
    ));
    assert!(buffer.write(&[1; 9], 0).is_err());
    assert!(buffer.read(u64::MAX, 2).is_err());
    assert!(buffer.copy_within(0, 7, 2).is_err());
    // nothing was written by the failed calls
    assert_eq!(buffer.read(0, 8).unwrap(), &[0u8; 8]);
}

#[test]
fn empty_buffer_is_invalid() {
    let mut memory: [u8; 0] = [];
    let buffer = Buffer::new(&mut memory);
    assert!(!buffer.is_valid());
    assert_eq!(buffer.size(), 0);
}

#[test]
fn copy_within_handles_overlap() {
    let mut memory = *b"0123456789";
    let mut buffer = Buffer::new(&mut memory);
    buffer.copy_within(0, 2, 6).unwrap();
    assert_eq!(buffer.read(0, 10).unwrap(), b"0101234589");
}

#[test]
fn same_routine_patches_buffer_and_file() {
    let mut memory = *b"leftright";
    let mut buffer = Buffer::new(&mut memory[1..]);
    swap_halves(&mut buffer).unwrap();
    assert_eq!(&memory, b"lighteftr");

    let dir = scratch_dir();
    let path = scratch_file(&dir, "arena.bin", b"AAAABBBB");
    let mut file = MappedFile::new();
    assert!(file.open(path_str(&path)));
    assert!(Arena::is_valid(&file));
    assert_eq!(Arena::size(&file), 8);
    assert_eq!(file.size(), 8usize);
    swap_halves(&mut file).unwrap();
    file.close();
    assert_eq!(std::fs::read(&path).unwrap(), b"BBBBAAAA");
}

#[test]
fn closed_file_is_an_empty_arena() {
    let mut file = MappedFile::new();
    assert!(!Arena::is_valid(&file));
    assert_eq!(Arena::size(&file), 0);
    assert_eq!(file.read(0, 0).unwrap(), b"");
    assert!(matches!(
        file.write(b"x", 0),
        Err(Error::OutOfBounds { size: 0, .. })
    ));
}
