use std::io::{Read, Write};

/// Unsigned LEB128-style varint: 7 bits of payload per byte, high bit set
/// means "more bytes follow". Values here are always non-negative globalIds
/// or lengths, so this differs from the signed protocol varint a network
/// decoder would use.
pub fn write_varint(mut writer: impl Write, mut value: u32) -> std::io::Result<()> {
    loop {
        let mut byte = value as u8 & 0x7F;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        writer.write_all(&[byte])?;
        if value == 0 {
            break;
        }
    }
    Ok(())
}

/// Reads a varint, returning the decoded value and the number of bytes
/// consumed. Caps at 5 bytes (32 bits of payload), matching the wire
/// format's "max 5 bytes for block/biome ids".
pub fn read_varint_ret_bytes(mut reader: impl Read) -> std::io::Result<(usize, u32)> {
    let mut value: u32 = 0;
    let mut position = 0u32;
    let mut bytes = 0usize;
    loop {
        let mut byte_buf = [0u8; 1];
        reader.read_exact(&mut byte_buf)?;
        let byte = byte_buf[0];
        bytes += 1;
        if bytes > 5 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "varint too long",
            ));
        }
        value |= ((byte & 0x7F) as u32) << position;
        if byte & 0x80 == 0 {
            break;
        }
        position += 7;
    }
    Ok((bytes, value))
}

pub fn read_varint(reader: impl Read) -> std::io::Result<u32> {
    Ok(read_varint_ret_bytes(reader)?.1)
}

#[cfg(test)]
mod test {
    use super::{read_varint, write_varint};

    #[test]
    #[rustfmt::skip]
    fn reader() -> std::io::Result<()> {
        assert_eq!(read_varint(std::io::Cursor::new(&[0x00]))?, 0);
        assert_eq!(read_varint(std::io::Cursor::new(&[0x01]))?, 1);
        assert_eq!(read_varint(std::io::Cursor::new(&[0x7f]))?, 127);
        assert_eq!(read_varint(std::io::Cursor::new(&[0x80, 0x01]))?, 128);
        assert_eq!(read_varint(std::io::Cursor::new(&[0xff, 0x01]))?, 255);
        assert_eq!(read_varint(std::io::Cursor::new(&[0xdd, 0xc7, 0x01]))?, 25565);
        assert_eq!(read_varint(std::io::Cursor::new(&[0xff, 0xff, 0xff, 0xff, 0x0f]))?, u32::MAX);
        Ok(())
    }

    #[test]
    fn too_long() {
        assert!(read_varint(std::io::Cursor::new(&[0xff, 0xff, 0xff, 0xff, 0xff, 0x01])).is_err());
    }

    #[test]
    #[rustfmt::skip]
    fn writer() -> std::io::Result<()> {
        let roundtrip = |value: u32| -> std::io::Result<u32> {
            let mut buf = Vec::new();
            write_varint(&mut buf, value)?;
            read_varint(std::io::Cursor::new(buf))
        };
        for value in [0, 1, 127, 128, 255, 25565, 2097151, u32::MAX] {
            assert_eq!(roundtrip(value)?, value);
        }
        Ok(())
    }
}
