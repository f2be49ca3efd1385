//! Page-growable shared byte buffer
//!
//! The host and decoder exchange bytes through one flat buffer addressed by
//! raw offsets. Every access is bounds-checked here so the rest of the crate
//! only deals in slices.

use crate::HostError;

/// Flat byte buffer grown in whole pages
#[derive(Debug, Clone)]
pub struct SharedMemory {
    bytes: Vec<u8>,
    page_size: usize,
    max_pages: usize,
}

impl SharedMemory {
    /// Allocate `initial_pages` zeroed pages
    pub fn new(page_size: usize, initial_pages: usize, max_pages: usize) -> Result<Self, HostError> {
        if page_size == 0 {
            return Err(HostError::InvalidConfig("page_size must be non-zero".into()));
        }
        if initial_pages > max_pages {
            return Err(HostError::MemoryLimit {
                requested: initial_pages,
                max: max_pages,
            });
        }
        Ok(Self {
            bytes: vec![0; page_size * initial_pages],
            page_size,
            max_pages,
        })
    }

    /// Current size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn pages(&self) -> usize {
        self.bytes.len() / self.page_size
    }

    /// Grow (never shrink) so that at least `min_bytes` are addressable
    pub fn ensure(&mut self, min_bytes: usize) -> Result<(), HostError> {
        if min_bytes <= self.bytes.len() {
            return Ok(());
        }

        let pages = min_bytes.div_ceil(self.page_size);
        if pages > self.max_pages {
            return Err(HostError::MemoryLimit {
                requested: pages,
                max: self.max_pages,
            });
        }

        tracing::debug!(from = self.pages(), to = pages, "Growing shared memory");
        self.bytes.resize(pages * self.page_size, 0);
        Ok(())
    }

    pub fn region(&self, offset: usize, len: usize) -> Result<&[u8], HostError> {
        let range = self.range(offset, len)?;
        Ok(&self.bytes[range])
    }

    pub fn region_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8], HostError> {
        let range = self.range(offset, len)?;
        Ok(&mut self.bytes[range])
    }

    /// Copy `data` into memory at `offset`
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), HostError> {
        self.region_mut(offset, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// Split into a readable input region and a writable output region
    ///
    /// The two regions must not overlap.
    pub fn split_regions(
        &mut self,
        input: (usize, usize),
        output: (usize, usize),
    ) -> Result<(&[u8], &mut [u8]), HostError> {
        let input_range = self.range(input.0, input.1)?;
        let output_range = self.range(output.0, output.1)?;
        if input_range.start < output_range.end && output_range.start < input_range.end {
            return Err(HostError::Overlap {
                input_offset: input.0,
                input_len: input.1,
                output_offset: output.0,
                output_len: output.1,
            });
        }

        if input_range.end <= output_range.start {
            let (head, tail) = self.bytes.split_at_mut(output_range.start);
            Ok((&head[input_range], &mut tail[..output.1]))
        } else {
            let (head, tail) = self.bytes.split_at_mut(input_range.start);
            Ok((&tail[..input.1], &mut head[output_range]))
        }
    }

    fn range(&self, offset: usize, len: usize) -> Result<std::ops::Range<usize>, HostError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(offset..end),
            _ => Err(HostError::OutOfBounds {
                offset,
                len,
                size: self.bytes.len(),
            }),
        }
    }
}
