//! String and buffer conversion at the C boundary.

use std::ffi::{c_char, CStr, CString};

use crate::errors::NativeError;

/// Owned C string for an argument.
pub fn to_cstring(value: &str) -> Result<CString, NativeError> {
    Ok(CString::new(value)?)
}

/// Text up to the first NUL of a caller-owned buffer. Invalid UTF-8 is
/// replaced rather than rejected.
pub fn c_buffer_to_string(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

/// Same as [`c_buffer_to_string`] for `c_char` buffers.
pub fn c_chars_to_string(buffer: &[c_char]) -> String {
    let bytes: Vec<u8> = buffer.iter().map(|&c| c as u8).collect();
    c_buffer_to_string(&bytes)
}

/// Copy a library-owned string. `None` for a null pointer.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
pub unsafe fn c_ptr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
}

/// Zeroed scratch buffer of at least `size` bytes, 8-byte aligned.
///
/// The native library writes structs with 8-byte members into it.
pub fn aligned_buffer(size: usize) -> Vec<u64> {
    vec![0u64; size.div_ceil(8).max(1)]
}

/// First `size` bytes of an [`aligned_buffer`].
pub fn aligned_bytes(words: &[u64], size: usize) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| word.to_ne_bytes())
        .take(size)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_stops_at_first_nul() {
        assert_eq!(c_buffer_to_string(b"english\0garbage"), "english");
        assert_eq!(c_buffer_to_string(b"no terminator"), "no terminator");
        assert_eq!(c_buffer_to_string(b"\0"), "");
    }

    #[test]
    fn test_c_chars_to_string() {
        let raw: Vec<c_char> = b"Spacewar\0\0\0".iter().map(|&b| b as c_char).collect();
        assert_eq!(c_chars_to_string(&raw), "Spacewar");
    }

    #[test]
    fn test_null_pointer_is_none() {
        assert_eq!(unsafe { c_ptr_to_string(std::ptr::null()) }, None);

        let owned = CString::new("persona").unwrap();
        assert_eq!(unsafe { c_ptr_to_string(owned.as_ptr()) }.as_deref(), Some("persona"));
    }

    #[test]
    fn test_interior_nul_is_rejected() {
        assert!(matches!(
            to_cstring("a\0b"),
            Err(NativeError::InteriorNul { position: 1 })
        ));
        assert_eq!(to_cstring("ok").unwrap().as_bytes(), b"ok");
    }

    #[test]
    fn test_aligned_buffer_covers_size() {
        assert_eq!(aligned_buffer(0).len(), 1);
        assert_eq!(aligned_buffer(8).len(), 1);
        assert_eq!(aligned_buffer(28).len(), 4);

        let words = [u64::from_ne_bytes([1, 2, 3, 4, 5, 6, 7, 8]), 0];
        assert_eq!(aligned_bytes(&words, 10), vec![1, 2, 3, 4, 5, 6, 7, 8, 0, 0]);
    }
}
