use super::{Strategy, is_space};

/// Byte-at-a-time reference strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

impl Strategy for Scalar {
    fn find_byte(src: &[u8], from: usize, needle: u8) -> Option<usize> {
        let tail = src.get(from..)?;
        tail.iter().position(|&b| b == needle).map(|i| from + i)
    }

    fn find_either(src: &[u8], from: usize, a: u8, b: u8) -> Option<usize> {
        let tail = src.get(from..)?;
        tail.iter().position(|&c| c == a || c == b).map(|i| from + i)
    }

    fn skip_byte_run(src: &[u8], from: usize, byte: u8) -> usize {
        let mut pos = from;
        while src.get(pos) == Some(&byte) {
            pos += 1;
        }
        pos
    }

    fn skip_space(src: &[u8], from: usize) -> usize {
        let mut pos = from;
        while src.get(pos).is_some_and(|&b| is_space(b)) {
            pos += 1;
        }
        pos
    }
}
