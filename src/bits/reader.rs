/*
# Bits Reader Module

 Byte-aligned big-endian read helpers used by the FLV tag parser. The FLV
 tag header mixes 8-bit, 24-bit and 32-bit fields, so the helpers cover
 exactly those widths plus a counting read_exact wrapper that reports how
 many bytes were actually consumed before EOF.
*/

use std::io::{self, Read};

/// Read one byte from a `Read` implementation.
pub fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a 24-bit big endian value from `r`.
pub fn read_u24<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 3];
    r.read_exact(&mut buf)?;
    Ok(((buf[0] as u32) << 16) | ((buf[1] as u32) << 8) | buf[2] as u32)
}

/// Read a 32-bit big endian value from `r`.
pub fn read_u32_be<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

/// Fill `buf` from `r`, returning how many bytes were read.
///
/// Unlike `read_exact` this distinguishes a clean EOF at offset zero
/// (returns `Ok(0)`) from a short read partway through (returns the partial
/// count), which is what truncation detection needs.
pub fn read_full<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::{read_full, read_u24, read_u32_be, read_u8};
    use std::io::Cursor;

    #[test]
    fn test_read_widths() {
        let data = [0x12u8, 0x00, 0x01, 0x02, 0xde, 0xad, 0xbe, 0xef];
        let mut r = Cursor::new(&data);
        assert_eq!(read_u8(&mut r).unwrap(), 0x12);
        assert_eq!(read_u24(&mut r).unwrap(), 0x000102);
        assert_eq!(read_u32_be(&mut r).unwrap(), 0xdeadbeef);
    }

    #[test]
    fn test_read_full_partial() {
        let data = [0xaau8, 0xbb, 0xcc];
        let mut r = Cursor::new(&data);
        let mut buf = [0u8; 8];
        assert_eq!(read_full(&mut r, &mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &data);

        let mut empty = Cursor::new(&[] as &[u8]);
        assert_eq!(read_full(&mut empty, &mut buf).unwrap(), 0);
    }
}
