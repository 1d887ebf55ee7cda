use std::io::Read;

use pkmc_util::{read_varint_ret_bytes, PackedArray};

use crate::error::ParseError;

/// A bit-packed array of `globalId`s with a resizable palette, as described
/// for block states (4096 entries) and biomes (64 entries).
///
/// Modeled as a tagged enum rather than dynamic dispatch: transitions
/// between palette modes replace the enum variant wholesale instead of
/// mutating shared state in place.
#[derive(Debug, Clone)]
pub enum PalettedContainer {
    /// `bitsPerEntry == 0`. Every position reads `value`.
    Single { value: i32, size: usize },
    /// Entries pack an index into `palette`; `palette[idx]` is the
    /// globalId.
    Indirect {
        bits_per_entry: u8,
        palette: Vec<i32>,
        data: PackedArray,
        size: usize,
    },
    /// Entries pack the globalId directly; no palette.
    Direct {
        bits_per_entry: u8,
        data: PackedArray,
        size: usize,
    },
}

/// Range/threshold parameters a container is built and grown under.
#[derive(Debug, Clone, Copy)]
pub struct PaletteLimits {
    pub min_indirect_bits: u8,
    pub max_indirect_bits: u8,
    pub direct_width: u8,
}

impl PaletteLimits {
    /// Limits for the MC 1.21.1 default profile's block container.
    pub const BLOCKS: Self = Self {
        min_indirect_bits: 4,
        max_indirect_bits: 8,
        direct_width: 15,
    };
    /// Limits for the MC 1.21.1 default profile's biome container.
    pub const BIOMES: Self = Self {
        min_indirect_bits: 1,
        max_indirect_bits: 3,
        direct_width: 6,
    };

    pub fn for_blocks(profile: &crate::profile::VersionProfile) -> Self {
        Self {
            min_indirect_bits: profile.block_indirect_bits_min,
            max_indirect_bits: profile.block_indirect_bits_max,
            direct_width: profile.block_direct_width,
        }
    }

    pub fn for_biomes(profile: &crate::profile::VersionProfile) -> Self {
        Self {
            min_indirect_bits: profile.biome_indirect_bits_min,
            max_indirect_bits: profile.biome_indirect_bits_max,
            direct_width: profile.biome_direct_width,
        }
    }
}

impl PalettedContainer {
    pub fn single(value: i32, size: usize) -> Self {
        PalettedContainer::Single { value, size }
    }

    pub fn size(&self) -> usize {
        match self {
            PalettedContainer::Single { size, .. } => *size,
            PalettedContainer::Indirect { size, .. } => *size,
            PalettedContainer::Direct { size, .. } => *size,
        }
    }

    pub fn bits_per_entry(&self) -> u8 {
        match self {
            PalettedContainer::Single { .. } => 0,
            PalettedContainer::Indirect { bits_per_entry, .. } => *bits_per_entry,
            PalettedContainer::Direct { bits_per_entry, .. } => *bits_per_entry,
        }
    }

    pub fn get(&self, index: usize) -> i32 {
        match self {
            PalettedContainer::Single { value, .. } => *value,
            PalettedContainer::Indirect { palette, data, .. } => {
                let idx = data.get_unchecked(index) as usize;
                palette[idx]
            }
            PalettedContainer::Direct { data, .. } => data.get_unchecked(index) as i64 as i32,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.size()).map(move |i| self.get(i))
    }

    /// Writes `value` at `index`, returning the previous globalId there,
    /// performing palette/bit-width transitions as needed.
    pub fn set(&mut self, index: usize, value: i32, limits: PaletteLimits) -> i32 {
        match self {
            PalettedContainer::Single { value: single, size } => {
                let previous = *single;
                if value == previous {
                    return previous;
                }
                let size = *size;
                let bits = limits.min_indirect_bits.max(1);
                let mut data = PackedArray::new(bits, size);
                for i in 0..size {
                    data.set_unchecked(i, 0);
                }
                data.set_unchecked(index, 1);
                *self = PalettedContainer::Indirect {
                    bits_per_entry: bits,
                    palette: vec![previous, value],
                    data,
                    size,
                };
                previous
            }
            PalettedContainer::Indirect { .. } => self.set_indirect(index, value, limits),
            PalettedContainer::Direct { data, .. } => {
                let previous = data.get_unchecked(index) as i64 as i32;
                data.set_unchecked(index, value as i64 as u64);
                previous
            }
        }
    }

    fn set_indirect(&mut self, index: usize, value: i32, limits: PaletteLimits) -> i32 {
        let PalettedContainer::Indirect {
            bits_per_entry,
            palette,
            data,
            size,
        } = self
        else {
            unreachable!()
        };

        let previous_idx = data.get_unchecked(index) as usize;
        let previous = palette[previous_idx];

        if let Some(existing) = palette.iter().position(|v| *v == value) {
            data.set_unchecked(index, existing as u64);
            return previous;
        }

        let new_len = palette.len() + 1;
        let needed_bits = PackedArray::bits_per_entry(new_len as u64 - 1).max(limits.min_indirect_bits);

        if needed_bits <= limits.max_indirect_bits {
            if needed_bits > *bits_per_entry {
                grow_indirect(data, *bits_per_entry, needed_bits, *size);
                *bits_per_entry = needed_bits;
            }
            palette.push(value);
            data.set_unchecked(index, (new_len - 1) as u64);
            previous
        } else {
            // Transition to direct: reallocate at direct width and pack
            // globalIds straight through, dropping the palette.
            let size = *size;
            let mut direct = PackedArray::new(limits.direct_width, size);
            for i in 0..size {
                let idx = data.get_unchecked(i) as usize;
                direct.set_unchecked(i, palette[idx] as i64 as u64);
            }
            direct.set_unchecked(index, value as i64 as u64);
            *self = PalettedContainer::Direct {
                bits_per_entry: limits.direct_width,
                data: direct,
                size,
            };
            previous
        }
    }

    /// Decodes one paletted container from `reader`, per the wire format in
    /// spec.md §4.1/§6. `offset` is the running byte offset into the
    /// overall section-array buffer, used to annotate errors.
    pub fn parse(
        mut reader: impl Read,
        size: usize,
        limits: PaletteLimits,
        offset: &mut usize,
    ) -> Result<Self, ParseError> {
        let bpe = read_u8(&mut reader, offset)?;

        if bpe == 0 {
            let value = read_varint(&mut reader, offset)? as i32;
            let data_len = read_varint(&mut reader, offset)? as usize;
            if data_len != 0 {
                return Err(ParseError::UnsupportedBpe { bpe, offset: *offset });
            }
            return Ok(PalettedContainer::Single { value, size });
        }

        if bpe > 32 {
            return Err(ParseError::UnsupportedBpe { bpe, offset: *offset });
        }

        if bpe <= limits.max_indirect_bits {
            let palette_len = read_varint(&mut reader, offset)? as usize;
            // A palette can never usefully hold more distinct values than
            // there are entries to fill; reject before allocating instead
            // of trusting an attacker-controlled varint as a capacity hint
            // (mirrors the teacher's length-before-allocate check in
            // `pkmc-packet`'s connection reader).
            if palette_len > size {
                return Err(ParseError::Truncated { offset: *offset });
            }
            let mut palette = Vec::with_capacity(palette_len);
            for _ in 0..palette_len {
                palette.push(read_varint(&mut reader, offset)? as i32);
            }
            let expected = PackedArray::packed_size(bpe, size);
            let data_len = read_varint(&mut reader, offset)? as usize;
            // The packed-word count is fully determined by `bpe` and
            // `size`; reject a mismatched `dataLen` up front rather than
            // handing it to `read_words` as an allocation size.
            if data_len != expected {
                return Err(ParseError::Truncated { offset: *offset });
            }
            let words = read_words(&mut reader, data_len, offset)?;
            let data = PackedArray::from_inner(words.into_boxed_slice(), bpe, size);
            for i in 0..size {
                let idx = data.get_unchecked(i) as usize;
                if idx >= palette.len() {
                    return Err(ParseError::PaletteIndexOutOfRange {
                        index: idx,
                        palette_len: palette.len(),
                        offset: *offset,
                    });
                }
            }
            Ok(PalettedContainer::Indirect {
                bits_per_entry: bpe,
                palette,
                data,
                size,
            })
        } else {
            let expected = PackedArray::packed_size(bpe, size);
            let data_len = read_varint(&mut reader, offset)? as usize;
            if data_len != expected {
                return Err(ParseError::Truncated { offset: *offset });
            }
            let words = read_words(&mut reader, data_len, offset)?;
            let data = PackedArray::from_inner(words.into_boxed_slice(), bpe, size);
            Ok(PalettedContainer::Direct {
                bits_per_entry: bpe,
                data,
                size,
            })
        }
    }
}

fn grow_indirect(data: &mut PackedArray, old_bits: u8, new_bits: u8, size: usize) {
    let values: Vec<u64> = (0..size).map(|i| data.get_unchecked(i)).collect();
    let _ = old_bits;
    let mut grown = PackedArray::new(new_bits, size);
    for (i, value) in values.into_iter().enumerate() {
        grown.set_unchecked(i, value);
    }
    *data = grown;
}

fn read_u8(reader: &mut impl Read, offset: &mut usize) -> Result<u8, ParseError> {
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(|_| ParseError::Truncated { offset: *offset })?;
    *offset += 1;
    Ok(buf[0])
}

fn read_varint(reader: &mut impl Read, offset: &mut usize) -> Result<u32, ParseError> {
    let (bytes, value) =
        read_varint_ret_bytes(&mut *reader).map_err(|_| ParseError::VarintTooLong { offset: *offset })?;
    *offset += bytes;
    Ok(value)
}

fn read_words(reader: &mut impl Read, count: usize, offset: &mut usize) -> Result<Vec<u64>, ParseError> {
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        let mut buf = [0u8; 8];
        reader
            .read_exact(&mut buf)
            .map_err(|_| ParseError::Truncated { offset: *offset })?;
        *offset += 8;
        words.push(u64::from_be_bytes(buf));
    }
    Ok(words)
}
