use std::io::Read;

use crate::column::Column;
use crate::error::ParseError;
use crate::paletted_container::{PaletteLimits, PalettedContainer};
use crate::profile::VersionProfile;
use crate::section::{Section, BIOMES_PER_SECTION, BLOCKS_PER_SECTION};

/// Decodes the concatenation of `sectionCount` sections (§4.5/§6 of the
/// contract this crate implements) into a `Column`. Sections are parsed
/// strictly in ascending `sy` order; an all-air section (single-value
/// palette, value 0) is materialized as a nil section to save memory,
/// which is read-equivalent to a present all-air section.
pub fn parse_column(cx: i32, cz: i32, profile: &VersionProfile, buffer: &[u8]) -> Result<Column, ParseError> {
    let mut cursor = std::io::Cursor::new(buffer);
    let mut offset = 0usize;
    let mut sections = Vec::with_capacity(profile.section_count);

    for _ in 0..profile.section_count {
        // The wire carries a solidCount, but spec.md §4.2 defines it as a
        // derived quantity ("recomputed on bulk load"), so it's read for
        // offset-tracking only and never trusted over the decoded blocks.
        let mut solid_count_bytes = [0u8; 2];
        cursor
            .read_exact(&mut solid_count_bytes)
            .map_err(|_| ParseError::Truncated { offset })?;
        offset += 2;

        let blocks = PalettedContainer::parse(
            &mut cursor,
            BLOCKS_PER_SECTION,
            PaletteLimits::for_blocks(profile),
            &mut offset,
        )?;
        let biomes = PalettedContainer::parse(
            &mut cursor,
            BIOMES_PER_SECTION,
            PaletteLimits::for_biomes(profile),
            &mut offset,
        )?;

        let is_all_air = matches!(&blocks, PalettedContainer::Single { value: 0, .. });
        if is_all_air {
            sections.push(None);
        } else {
            let mut section = Section::from_parts(blocks, biomes, 0);
            section.recount_solid();
            sections.push(Some(section));
        }
    }

    Ok(Column::from_sections(cx, cz, sections))
}

#[cfg(test)]
mod test {
    use super::*;

    fn single_value_section(value: u8) -> Vec<u8> {
        single_value_section_with_wire_solid_count(value, 0)
    }

    fn single_value_section_with_wire_solid_count(value: u8, wire_solid_count: i16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&wire_solid_count.to_be_bytes());
        buf.push(0); // block bpe = 0
        buf.push(value); // varint value, fits in one byte
        buf.push(0); // block dataLen = 0
        buf.push(0); // biome bpe = 0
        buf.push(value); // varint value
        buf.push(0); // biome dataLen = 0
        buf
    }

    fn indirect_section(ids: &[i32; BLOCKS_PER_SECTION]) -> Vec<u8> {
        use pkmc_util::PackedArray;

        let palette: Vec<i32> = {
            let mut seen = Vec::new();
            for id in ids {
                if !seen.contains(id) {
                    seen.push(*id);
                }
            }
            seen
        };
        let bpe = PackedArray::bits_per_entry(palette.len() as u64 - 1).max(4);
        let mut packed = PackedArray::new(bpe, BLOCKS_PER_SECTION);
        for (i, id) in ids.iter().enumerate() {
            let idx = palette.iter().position(|v| v == id).unwrap();
            packed.set_unchecked(i, idx as u64);
        }
        let words = packed.into_inner();

        let mut buf = Vec::new();
        buf.extend_from_slice(&0i16.to_be_bytes()); // solidCount
        buf.push(bpe);
        pkmc_util::write_varint(&mut buf, palette.len() as u32).unwrap();
        for v in &palette {
            pkmc_util::write_varint(&mut buf, *v as u32).unwrap();
        }
        pkmc_util::write_varint(&mut buf, words.len() as u32).unwrap();
        for w in words.iter() {
            buf.extend_from_slice(&w.to_be_bytes());
        }
        // biomes: single-value 0
        buf.push(0);
        buf.push(0);
        buf.push(0);
        buf
    }

    // Testable property 2: iterating a parsed section's block entries
    // equals the ordered sequence that produced the buffer.
    #[test]
    fn property2_iteration_matches_input_sequence() {
        let profile = VersionProfile::default();
        let mut ids = [0i32; BLOCKS_PER_SECTION];
        for (i, id) in ids.iter_mut().enumerate() {
            *id = (i % 5) as i32;
        }
        let mut buffer = indirect_section(&ids);
        for _ in 1..profile.section_count {
            buffer.extend(single_value_section(0));
        }
        let column = parse_column(0, 0, &profile, &buffer).unwrap();
        let section = column.section(0).unwrap();
        let decoded: Vec<i32> = section.blocks.iter().collect();
        assert_eq!(decoded, ids.to_vec());
    }

    #[test]
    fn s1_single_value_round_trip() {
        let profile = VersionProfile::default();
        let mut buffer = Vec::new();
        for _ in 0..profile.section_count {
            buffer.extend(single_value_section(1));
        }
        let column = parse_column(0, 0, &profile, &buffer).unwrap();
        assert_eq!(column.get_state_id(&profile, 5, 65, 5), 1);
        assert_eq!(column.get_biome_id(&profile, 5, 65, 5), 1);
    }

    #[test]
    fn all_air_sections_materialize_as_nil() {
        let profile = VersionProfile::default();
        let mut buffer = Vec::new();
        for _ in 0..profile.section_count {
            buffer.extend(single_value_section(0));
        }
        let column = parse_column(0, 0, &profile, &buffer).unwrap();
        let sy = profile.section_index(65).unwrap();
        assert!(column.section(sy).is_none());
        assert_eq!(column.get_state_id(&profile, 5, 65, 5), 0);
    }

    #[test]
    fn solid_count_is_recomputed_not_trusted_from_wire() {
        let profile = VersionProfile::default();
        let mut buffer = Vec::new();
        // Wire claims 0 solid blocks, but the section is all non-air (value
        // 7 everywhere), so the real count is 4096. A second section lies
        // the other way: wire claims 4096 while the section is all air.
        buffer.extend(single_value_section_with_wire_solid_count(7, 0));
        buffer.extend(single_value_section_with_wire_solid_count(0, 4096));
        for _ in 2..profile.section_count {
            buffer.extend(single_value_section(0));
        }
        let column = parse_column(0, 0, &profile, &buffer).unwrap();
        let section = column.section(0).unwrap();
        assert_eq!(section.solid_count(), 4096);
        // The second section is all-air and materializes as nil regardless
        // of its lying wire solidCount.
        assert!(column.section(1).is_none());
    }

    #[test]
    fn truncated_buffer_is_parse_error() {
        let profile = VersionProfile::default();
        let buffer = single_value_section(1);
        let err = parse_column(0, 0, &profile, &buffer).unwrap_err();
        assert!(matches!(err, ParseError::Truncated { .. }));
    }

    #[test]
    fn unsupported_bpe_is_parse_error() {
        let profile = VersionProfile::default();
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&0i16.to_be_bytes());
        buffer.push(200); // invalid bpe, > 32
        for _ in 1..profile.section_count {
            buffer.extend(single_value_section(0));
        }
        let err = parse_column(0, 0, &profile, &buffer).unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedBpe { bpe: 200, .. }));
    }
}
