//! RAM-backed flash for hosted builds and tests.

use crate::flash::{Flash, FlashError};
use crate::trace::debug;

/// In-memory flash with NOR-style write semantics.
///
/// Erase fills pages with `0xFF`; a write can only clear bits until the next
/// erase. Geometry is fixed at construction.
#[derive(Debug, Clone)]
pub struct MemFlash {
    cells: Vec<u8>,
    page_size: u32,
}

impl MemFlash {
    /// Creates a device of `page_count` pages of `page_size` bytes each,
    /// fully erased.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` or `page_count` is zero, or if the device would
    /// exceed the 32-bit address space.
    #[must_use]
    pub fn new(page_size: u32, page_count: u32) -> Self {
        assert!(page_size > 0, "page_size must be > 0");
        assert!(page_count > 0, "page_count must be > 0");
        let total = u64::from(page_size) * u64::from(page_count);
        assert!(
            total <= u64::from(u32::MAX),
            "device exceeds the 32-bit address space"
        );

        Self {
            cells: vec![0xFF; total as usize],
            page_size,
        }
    }

    /// Page size in bytes.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Byte span within the device starting at `address`, clamped to the
    /// device end. `None` when `address` is already past it.
    fn span(&self, address: u32, requested: usize) -> Option<(usize, usize)> {
        let start = address as usize;
        if start >= self.cells.len() {
            return None;
        }
        Some((start, requested.min(self.cells.len() - start)))
    }
}

impl Flash for MemFlash {
    fn init(&mut self) -> Result<(), FlashError> {
        // No hardware to bring up; the array is ready at construction.
        Ok(())
    }

    fn size(&self) -> u32 {
        self.cells.len() as u32
    }

    fn erase_page(&mut self, address: u32, size: u32) -> Result<(), FlashError> {
        let aligned = address % self.page_size == 0;
        let whole_pages = size > 0 && size % self.page_size == 0;
        let in_range = address
            .checked_add(size)
            .is_some_and(|end| end <= self.size());
        if !(aligned && whole_pages && in_range) {
            return Err(FlashError::InvalidArgs { address, size });
        }

        self.cells[address as usize..(address + size) as usize].fill(0xFF);
        debug!(address, size, "pages erased");
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> usize {
        let Some((start, len)) = self.span(address, data.len()) else {
            return 0;
        };
        // NOR semantics: programming clears bits, never sets them.
        for (cell, byte) in self.cells[start..start + len].iter_mut().zip(data) {
            *cell &= byte;
        }
        len
    }

    fn read(&mut self, address: u32, buf: &mut [u8]) -> usize {
        let Some((start, len)) = self.span(address, buf.len()) else {
            return 0;
        };
        buf[..len].copy_from_slice(&self.cells[start..start + len]);
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: u32 = 256;

    fn flash() -> MemFlash {
        let mut flash = MemFlash::new(PAGE, 4);
        flash.init().expect("init succeeds");
        flash
    }

    #[test]
    fn geometry_is_fixed_and_nonzero() {
        let flash = flash();
        assert_eq!(flash.size(), PAGE * 4);
        assert_eq!(flash.page_size(), PAGE);
    }

    #[test]
    fn erase_write_read_roundtrip() {
        let mut flash = flash();
        let data: Vec<u8> = (0..PAGE).map(|i| i as u8).collect();

        flash.erase_page(PAGE, PAGE).expect("aligned erase succeeds");
        assert_eq!(flash.write(PAGE, &data), data.len());

        let mut buf = vec![0u8; PAGE as usize];
        assert_eq!(flash.read(PAGE, &mut buf), buf.len());
        assert_eq!(buf, data);
    }

    #[test]
    fn misaligned_erase_rejected() {
        let mut flash = flash();
        assert_eq!(
            flash.erase_page(PAGE + 1, PAGE),
            Err(FlashError::InvalidArgs {
                address: PAGE + 1,
                size: PAGE,
            })
        );
    }

    #[test]
    fn partial_page_erase_rejected() {
        let mut flash = flash();
        assert!(matches!(
            flash.erase_page(0, PAGE / 2),
            Err(FlashError::InvalidArgs { .. })
        ));
        assert!(matches!(
            flash.erase_page(0, 0),
            Err(FlashError::InvalidArgs { .. })
        ));
    }

    #[test]
    fn erase_past_device_end_rejected() {
        let mut flash = flash();
        assert!(matches!(
            flash.erase_page(PAGE * 4, PAGE),
            Err(FlashError::InvalidArgs { .. })
        ));
        assert!(matches!(
            flash.erase_page(PAGE * 3, PAGE * 2),
            Err(FlashError::InvalidArgs { .. })
        ));
    }

    #[test]
    fn write_clamped_at_device_end_is_partial() {
        let mut flash = flash();
        let data = [0xAB; 64];
        let written = flash.write(flash.size() - 16, &data);
        assert_eq!(written, 16);
    }

    #[test]
    fn write_past_device_end_fails() {
        let mut flash = flash();
        assert_eq!(flash.write(flash.size(), &[1, 2, 3]), 0);
    }

    #[test]
    fn read_clamped_at_device_end_is_partial() {
        let mut flash = flash();
        let mut buf = [0u8; 64];
        assert_eq!(flash.read(flash.size() - 16, &mut buf), 16);
        assert_eq!(flash.read(flash.size(), &mut buf), 0);
    }

    #[test]
    fn programming_only_clears_bits_until_erase() {
        let mut flash = flash();

        assert_eq!(flash.write(0, &[0xF0]), 1);
        assert_eq!(flash.write(0, &[0x0F]), 1);

        let mut buf = [0u8; 1];
        assert_eq!(flash.read(0, &mut buf), 1);
        assert_eq!(buf[0], 0x00, "overlapping writes AND together");

        flash.erase_page(0, PAGE).expect("erase succeeds");
        assert_eq!(flash.read(0, &mut buf), 1);
        assert_eq!(buf[0], 0xFF, "erase restores all bits");
    }
}
