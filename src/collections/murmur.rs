/*
    32-bit MurmurHash3 over a sequence of byte slices.

    Every slice is mixed into the running hash and finalized on its own, so
    a value made of several fields (a variant tag and its symbols, say) hashes
    as one unit without first being copied into a single buffer.
*/

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

fn mix_block(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

fn finalize(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

pub fn murmur3(parts: &[&[u8]]) -> u32 {
    let mut h: u32 = 0;

    for data in parts {
        // Empty parts contribute nothing, not even their length
        if data.is_empty() {
            continue;
        }

        let mut blocks = data.chunks_exact(4);
        for block in &mut blocks {
            let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
            h ^= mix_block(k);
            h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
        }

        let tail = blocks.remainder();
        if !tail.is_empty() {
            let k = tail
                .iter()
                .enumerate()
                .fold(0u32, |k, (i, &byte)| k ^ (u32::from(byte) << (8 * i)));
            h ^= mix_block(k);
        }

        h ^= data.len() as u32;
        h = finalize(h);
    }

    return h;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_vectors() {
        assert_eq!(murmur3(&[b""]), 0);
        assert_eq!(murmur3(&[b"abc"]), 0xb3dd_93fa);
        assert_eq!(
            murmur3(&[b"The quick brown fox jumps over the lazy dog"]),
            0x2e4f_f723
        );
    }

    #[test]
    fn skips_empty_parts() {
        assert_eq!(murmur3(&[]), 0);
        assert_eq!(murmur3(&[b"", b"abc", b""]), murmur3(&[b"abc"]));
    }

    #[test]
    fn length_is_part_of_the_hash() {
        assert_ne!(murmur3(&[b"a"]), murmur3(&[b"a\0"]));
    }
}
