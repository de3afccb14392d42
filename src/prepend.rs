/// Prepends `src` in front of the current contents of `dst`.
///
/// Reuses `dst`'s storage when its spare capacity is large enough, shifting
/// the existing bytes rightward in place; otherwise allocates a buffer that
/// exactly fits the concatenation.
pub(crate) fn prepend(mut dst: Vec<u8>, src: &[u8]) -> Vec<u8> {
    let ldst = dst.len();
    let lsrc = src.len();
    let len = ldst + lsrc;
    if len > dst.capacity() {
        let mut out = Vec::with_capacity(len);
        out.extend_from_slice(src);
        out.extend_from_slice(&dst);
        return out;
    }
    dst.resize(len, 0); // make room
    dst.copy_within(..ldst, lsrc);
    dst[..lsrc].copy_from_slice(src);
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_in_front() {
        let dst = b"world".to_vec();
        assert_eq!(prepend(dst, b"hello "), b"hello world");

        assert_eq!(prepend(Vec::new(), b"abc"), b"abc");
        assert_eq!(prepend(b"abc".to_vec(), b""), b"abc");
        assert_eq!(prepend(Vec::new(), b""), b"");
    }

    #[test]
    fn reuses_capacity_when_possible() {
        let mut dst = Vec::with_capacity(16);
        dst.extend_from_slice(b"5678");
        let cap = dst.capacity();

        let dst = prepend(dst, b"1234");
        assert_eq!(dst, b"12345678");
        assert_eq!(dst.capacity(), cap);
    }

    #[test]
    fn grows_to_exact_fit() {
        let dst = prepend(b"5678".to_vec(), b"1234");
        assert_eq!(dst, b"12345678");
        assert_eq!(dst.capacity(), 8);
    }
}
