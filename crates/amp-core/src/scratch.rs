//! Reusable scratch buffers.

/// Returns the first `len` samples of `buf`, growing it if needed.
///
/// Contents are left as they were; callers overwrite before reading.
#[inline]
pub(crate) fn scratch(buf: &mut Vec<f32>, len: usize) -> &mut [f32] {
    if buf.len() < len {
        buf.resize(len, 0.0);
    }
    &mut buf[..len]
}

/// Checks the block shape shared by every buffer-processing node.
#[inline]
pub(crate) fn check_block(len: usize, time_len: usize) {
    assert!(
        time_len == len + 1,
        "time must hold len + 1 entries (len {len}, time {time_len})"
    );
}
