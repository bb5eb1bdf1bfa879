//! Flash storage boundary.
//!
//! Block storage with explicit erase pages, modeled on a raw NOR device:
//! erase works on whole page-aligned ranges, while write and read take
//! arbitrary byte ranges and report the number of bytes actually
//! transferred — a short count is a partial transfer and zero is outright
//! failure. The trait performs no retries; callers own retry and
//! escalation.
//!
//! [`MemFlash`] is a RAM-backed implementation of the contract for hosted
//! builds and tests.

mod mem;

use thiserror::Error;

pub use mem::MemFlash;

/// Failure taxonomy for [`Flash::init`] and [`Flash::erase_page`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FlashError {
    /// The operation failed in the underlying driver.
    #[error("flash operation failed")]
    Failed,
    /// Address or size is unaligned, zero, or out of range.
    #[error("invalid flash range {address:#010x}+{size:#x}")]
    InvalidArgs {
        /// Requested start address.
        address: u32,
        /// Requested range length in bytes.
        size: u32,
    },
}

/// Block storage with explicit erase pages.
pub trait Flash {
    /// Initializes the driver. Must be called once before any other
    /// operation.
    ///
    /// # Errors
    ///
    /// [`FlashError::Failed`] if the underlying driver cannot be brought up.
    fn init(&mut self) -> Result<(), FlashError>;

    /// Total flash size in bytes.
    fn size(&self) -> u32;

    /// Erases whole pages starting at `address`.
    ///
    /// # Errors
    ///
    /// [`FlashError::InvalidArgs`] if `address` is not page-aligned, `size`
    /// is zero or not a multiple of the page size, or the range extends past
    /// the end of the device. [`FlashError::Failed`] on a driver error.
    fn erase_page(&mut self, address: u32, size: u32) -> Result<(), FlashError>;

    /// Writes `data` starting at `address`.
    ///
    /// Returns the number of bytes actually written: `data.len()` on full
    /// success, less than that on a partial write, 0 on failure.
    fn write(&mut self, address: u32, data: &[u8]) -> usize;

    /// Reads into `buf` starting at `address`.
    ///
    /// Returns the number of bytes actually read: `buf.len()` on full
    /// success, less than that on a partial read, 0 on failure.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> usize;
}
