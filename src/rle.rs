//! PackBits-style run-length coding of single 8-bit channel planes.
//!
//! A control byte below 128 introduces a literal run of `control + 1`
//! bytes copied verbatim.  A control byte of 128 or more introduces a repeat
//! run: the following byte is repeated `control - 125` times.

use crate::error::{IcnsError, Result};

/// Shortest run of identical bytes worth storing as a repeat run.
const MIN_REPEAT_RUN: usize = 3;

/// Longest run a single repeat control byte can express.
const MAX_REPEAT_RUN: usize = 130;

/// Longest run a single literal control byte can express.
const MAX_LITERAL_RUN: usize = 128;

/// Encodes one channel plane.  The output is never longer than
/// `plane.len() + plane.len() / 128 + 1` bytes.
pub fn encode(plane: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(plane.len() + plane.len() / MAX_LITERAL_RUN + 1);
    let mut literal_start = 0;
    let mut pos = 0;
    while pos < plane.len() {
        let run = repeat_run_at(plane, pos);
        if run >= MIN_REPEAT_RUN {
            push_literals(&mut output, &plane[literal_start..pos]);
            output.push((run - MIN_REPEAT_RUN + 128) as u8);
            output.push(plane[pos]);
            literal_start = pos + run;
        }
        pos += run;
    }
    push_literals(&mut output, &plane[literal_start..]);
    output
}

/// Decodes a packed stream that must hold exactly one plane of
/// `expected_len` bytes, with nothing left over.
pub fn decode(packed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let (plane, consumed) = decode_prefix(packed, expected_len)?;
    if consumed != packed.len() {
        return Err(rle_error(format!("{} bytes of trailing data after plane",
                                     packed.len() - consumed)));
    }
    Ok(plane)
}

/// Decodes one plane of `expected_len` bytes from the front of `packed`,
/// returning the plane and the number of packed bytes it occupied.  Used to
/// walk several planes stored back to back.
pub fn decode_prefix(packed: &[u8], expected_len: usize) -> Result<(Vec<u8>, usize)> {
    let mut plane = Vec::with_capacity(expected_len);
    let mut pos = 0;
    while plane.len() < expected_len {
        let control = *packed
            .get(pos)
            .ok_or_else(|| rle_error("stream ends before plane is complete"))?;
        pos += 1;
        let count = if control < 128 {
            let count = control as usize + 1;
            let literals = packed
                .get(pos..pos + count)
                .ok_or_else(|| rle_error("stream ends inside a literal run"))?;
            plane.extend_from_slice(literals);
            pos += count;
            count
        } else {
            let count = control as usize - 125;
            let value = *packed
                .get(pos)
                .ok_or_else(|| rle_error("stream ends inside a repeat run"))?;
            plane.resize(plane.len() + count, value);
            pos += 1;
            count
        };
        if plane.len() > expected_len {
            return Err(rle_error(format!("run of {} bytes overruns a plane of {} bytes",
                                         count, expected_len)));
        }
    }
    Ok((plane, pos))
}

/// Length of the run of bytes equal to `plane[pos]`, capped at the longest
/// repeat run.
fn repeat_run_at(plane: &[u8], pos: usize) -> usize {
    let value = plane[pos];
    plane[pos..]
        .iter()
        .take(MAX_REPEAT_RUN)
        .take_while(|&&byte| byte == value)
        .count()
}

fn push_literals(output: &mut Vec<u8>, literals: &[u8]) {
    for chunk in literals.chunks(MAX_LITERAL_RUN) {
        output.push((chunk.len() - 1) as u8);
        output.extend_from_slice(chunk);
    }
}

fn rle_error<S: Into<String>>(message: S) -> IcnsError {
    IcnsError::MalformedEncoding(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic xorshift source, so failures reproduce.
    struct XorShift(u64);

    impl XorShift {
        fn next(&mut self) -> u64 {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            self.0
        }

        /// Bytes drawn from a small alphabet in runs of random length, so
        /// both literal and repeat runs show up.
        fn plane(&mut self, len: usize) -> Vec<u8> {
            let mut plane = Vec::with_capacity(len);
            while plane.len() < len {
                let value = (self.next() % 4) as u8;
                let run = (self.next() % 9) as usize + 1;
                for _ in 0..run.min(len - plane.len()) {
                    plane.push(value);
                }
            }
            plane
        }
    }

    #[test]
    fn encode_empty_plane() {
        assert!(encode(&[]).is_empty());
        assert_eq!(decode(&[], 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn encode_literal_run() {
        assert_eq!(encode(&[1, 2, 3]), vec![2, 1, 2, 3]);
    }

    #[test]
    fn encode_short_repeats_fold_into_literals() {
        assert_eq!(encode(&[7, 7, 1, 1, 2]), vec![4, 7, 7, 1, 1, 2]);
    }

    #[test]
    fn encode_repeat_run() {
        assert_eq!(encode(&[9, 9, 9]), vec![128, 9]);
        assert_eq!(encode(&[1, 9, 9, 9, 9, 2]), vec![0, 1, 129, 9, 0, 2]);
    }

    #[test]
    fn encode_long_repeat_splits_at_130() {
        let plane = vec![255u8; 256];
        assert_eq!(encode(&plane), vec![255, 255, 251, 255]);
        let plane = vec![0u8; 132];
        // 130 repeated, then a 2-byte tail too short to repeat.
        assert_eq!(encode(&plane), vec![255, 0, 1, 0, 0]);
    }

    #[test]
    fn encode_long_literal_splits_at_128() {
        let plane: Vec<u8> = (0..200).map(|i| (i % 2) as u8).collect();
        let packed = encode(&plane);
        assert_eq!(packed[0], 127);
        assert_eq!(packed[129], 71);
        assert_eq!(packed.len(), 202);
    }

    #[test]
    fn decode_rejects_truncated_streams() {
        assert!(matches!(decode(&[2, 1, 2], 3),
                         Err(IcnsError::MalformedEncoding(_))));
        assert!(matches!(decode(&[130], 5),
                         Err(IcnsError::MalformedEncoding(_))));
        assert!(matches!(decode(&[], 1),
                         Err(IcnsError::MalformedEncoding(_))));
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        // Run overshoots the plane.
        assert!(matches!(decode(&[130, 4], 4),
                         Err(IcnsError::MalformedEncoding(_))));
        // Plane complete but bytes remain.
        assert!(matches!(decode(&[128, 4, 0, 1], 3),
                         Err(IcnsError::MalformedEncoding(_))));
    }

    #[test]
    fn decode_prefix_reports_consumed_bytes() {
        let packed = [128, 5, 1, 6, 7, 0xff];
        let (plane, consumed) = decode_prefix(&packed, 3).unwrap();
        assert_eq!(plane, vec![5, 5, 5]);
        assert_eq!(consumed, 2);
        let (plane, consumed) = decode_prefix(&packed[2..], 2).unwrap();
        assert_eq!(plane, vec![6, 7]);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn round_trip_many_lengths() {
        let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
        for len in (0..300).chain((300..10_000).step_by(97)) {
            let plane = rng.plane(len);
            let packed = encode(&plane);
            assert_eq!(decode(&packed, len).unwrap(), plane, "length {}", len);
        }
    }

    #[test]
    fn round_trip_noise_never_more_than_doubles() {
        let mut rng = XorShift(42);
        for len in [1usize, 2, 127, 128, 129, 1000, 10_000].iter().cloned() {
            let plane: Vec<u8> = (0..len).map(|_| rng.next() as u8).collect();
            let packed = encode(&plane);
            assert!(packed.len() <= 2 * len, "length {}", len);
            assert!(packed.len() <= len + len / 128 + 1);
            assert_eq!(decode(&packed, len).unwrap(), plane);
        }
    }
}
