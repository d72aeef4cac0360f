use std::ffi::c_void;
use std::sync::Arc;

use super::{acquire, RawInterface};
use crate::errors::NativeError;
use crate::loader::SteamApi;
use crate::marshal::to_cstring;

/// `ISteamRemoteStorage` (Steam Cloud files).
#[derive(Debug, Clone)]
pub struct RemoteStorage {
    api: Arc<SteamApi>,
    this: RawInterface,
}

impl RemoteStorage {
    pub(crate) fn new(api: Arc<SteamApi>) -> Result<Self, NativeError> {
        let this = acquire(api.steam_remote_storage, "ISteamRemoteStorage")?;
        Ok(Self { api, this })
    }

    /// Write `data` to `file`, replacing any existing content.
    pub fn file_write(&self, file: &str, data: &[u8]) -> Result<bool, NativeError> {
        let file = to_cstring(file)?;
        let len = i32::try_from(data.len()).unwrap_or(i32::MAX);
        // SAFETY: the library reads at most `len` bytes from `data`.
        Ok(unsafe {
            (self.api.remote_storage_file_write)(
                self.this.as_ptr(),
                file.as_ptr(),
                data.as_ptr().cast::<c_void>(),
                len,
            )
        })
    }

    /// Read `file` into `buffer`, returning the number of bytes read.
    pub fn file_read(&self, file: &str, buffer: &mut [u8]) -> Result<usize, NativeError> {
        let file = to_cstring(file)?;
        let len = i32::try_from(buffer.len()).unwrap_or(i32::MAX);
        // SAFETY: the library writes at most `len` bytes into `buffer`.
        let read = unsafe {
            (self.api.remote_storage_file_read)(
                self.this.as_ptr(),
                file.as_ptr(),
                buffer.as_mut_ptr().cast::<c_void>(),
                len,
            )
        };
        Ok(usize::try_from(read).unwrap_or(0))
    }

    /// Read the whole of `file`.
    pub fn read_to_vec(&self, file: &str) -> Result<Vec<u8>, NativeError> {
        let size = self.file_size(file)?;
        let mut buffer = vec![0u8; size];
        if size == 0 {
            return Ok(buffer);
        }
        let read = self.file_read(file, &mut buffer)?;
        buffer.truncate(read);
        Ok(buffer)
    }

    pub fn file_delete(&self, file: &str) -> Result<bool, NativeError> {
        let file = to_cstring(file)?;
        // SAFETY: the string outlives the call.
        Ok(unsafe { (self.api.remote_storage_file_delete)(self.this.as_ptr(), file.as_ptr()) })
    }

    /// Size in bytes, 0 if the file does not exist.
    pub fn file_size(&self, file: &str) -> Result<usize, NativeError> {
        let file = to_cstring(file)?;
        // SAFETY: the string outlives the call.
        let size =
            unsafe { (self.api.remote_storage_get_file_size)(self.this.as_ptr(), file.as_ptr()) };
        Ok(usize::try_from(size).unwrap_or(0))
    }
}
