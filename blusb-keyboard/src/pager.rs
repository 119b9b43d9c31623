//! Multi-page transfer of the layers blob
//!
//! The layers blob is far larger than one feature report, so it is moved as
//! a sequence of pages, each prefixed with a 3-byte header:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |      ID       |  Total pages  | Current page  | Data ...      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! `Current page` is 1-based and increases by one per page; the transfer
//! ends with the page where it equals `Total pages`. The last page is
//! padded with `0xFF`. Sessions are not resumable: any gap aborts.

use blusb_transport::protocol::page;
use tracing::{debug, warn};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::ProtocolError;

/// Page header as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct PageHeader {
    pub feature_id: u8,
    pub total_pages: u8,
    pub current_page: u8,
}

impl PageHeader {
    /// True when this header closes the transfer
    pub fn is_last(&self) -> bool {
        self.total_pages == self.current_page
    }
}

/// Outbound pager: splits a blob into full-size pages
///
/// `total_pages` is computed once from the whole blob and stays constant for
/// the session.
#[derive(Debug)]
pub struct PageWriter<'a> {
    feature_id: u8,
    blob: &'a [u8],
    page_size: usize,
    offset: usize,
    total_pages: u8,
    pages_written: u8,
}

impl<'a> PageWriter<'a> {
    /// Start a session with the wire page size (`page::SIZE`)
    pub fn new(feature_id: u8, blob: &'a [u8]) -> Result<Self, ProtocolError> {
        Self::with_page_size(feature_id, blob, page::SIZE)
    }

    /// Start a session with a custom page size (header included)
    ///
    /// # Panics
    /// If `page_size` leaves no room for data after the header.
    pub fn with_page_size(
        feature_id: u8,
        blob: &'a [u8],
        page_size: usize,
    ) -> Result<Self, ProtocolError> {
        assert!(
            page_size > page::HEADER_SIZE,
            "page size must exceed the {}-byte header",
            page::HEADER_SIZE
        );
        let capacity = page_size - page::HEADER_SIZE;
        let pages = blob.len().div_ceil(capacity);
        let total_pages = u8::try_from(pages)
            .ok()
            .filter(|&p| (p as usize) <= page::MAX_PAGES)
            .ok_or(ProtocolError::TooManyPages {
                len: blob.len(),
                pages,
            })?;

        Ok(Self {
            feature_id,
            blob,
            page_size,
            offset: 0,
            total_pages,
            pages_written: 0,
        })
    }

    /// Pages this session will produce
    pub fn total_pages(&self) -> u8 {
        self.total_pages
    }

    /// Data bytes carried per page
    pub fn capacity(&self) -> usize {
        self.page_size - page::HEADER_SIZE
    }
}

impl Iterator for PageWriter<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.pages_written == self.total_pages {
            return None;
        }
        self.pages_written += 1;

        let header = PageHeader {
            feature_id: self.feature_id,
            total_pages: self.total_pages,
            current_page: self.pages_written,
        };

        let end = (self.offset + self.capacity()).min(self.blob.len());
        let chunk = &self.blob[self.offset..end];
        self.offset = end;

        let mut buf = Vec::with_capacity(self.page_size);
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(chunk);
        buf.resize(self.page_size, page::PAD);

        debug!(
            "Layer page {}/{}: {} data bytes",
            header.current_page,
            header.total_pages,
            chunk.len()
        );
        Some(buf)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total_pages - self.pages_written) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for PageWriter<'_> {}

/// Result of accepting one inbound page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// More pages follow
    More,
    /// Final page received
    Complete,
}

/// Inbound pager: validates and reassembles pages
#[derive(Debug)]
pub struct PageReader {
    feature_id: u8,
    buf: Vec<u8>,
    total_pages: Option<u8>,
    pages_read: u8,
    complete: bool,
}

impl PageReader {
    pub fn new(feature_id: u8) -> Self {
        Self {
            feature_id,
            buf: Vec::new(),
            total_pages: None,
            pages_read: 0,
            complete: false,
        }
    }

    /// Discard accumulated data and start a new session
    pub fn reset(&mut self) {
        self.buf.clear();
        self.total_pages = None;
        self.pages_read = 0;
        self.complete = false;
    }

    /// Validate one page and append its payload
    ///
    /// A rejected page leaves the accumulated data untouched.
    pub fn push(&mut self, page_bytes: &[u8]) -> Result<PageStatus, ProtocolError> {
        let (header, payload) =
            PageHeader::read_from_prefix(page_bytes).map_err(|_| ProtocolError::ShortPage {
                expected: page::HEADER_SIZE,
                got: page_bytes.len(),
            })?;

        // Some firmware revisions send 0 in place of the feature id
        if header.feature_id == 0 {
            warn!("Layer page {} arrived with feature id 0", header.current_page);
        } else if header.feature_id != self.feature_id {
            return Err(ProtocolError::UnexpectedFeature {
                expected: self.feature_id,
                got: header.feature_id,
            });
        }

        let expected = self.pages_read.wrapping_add(1);
        if self.complete || header.current_page != expected {
            return Err(ProtocolError::OutOfSequence {
                expected,
                got: header.current_page,
            });
        }

        match self.total_pages {
            Some(was) if was != header.total_pages => {
                return Err(ProtocolError::TotalPagesChanged {
                    was,
                    now: header.total_pages,
                });
            }
            _ => {}
        }
        if header.current_page > header.total_pages {
            return Err(ProtocolError::PageBeyondTotal {
                page: header.current_page,
                total: header.total_pages,
            });
        }

        if self.total_pages.is_none() {
            self.buf
                .reserve(header.total_pages as usize * payload.len());
            self.total_pages = Some(header.total_pages);
        }
        self.pages_read = header.current_page;
        self.buf.extend_from_slice(payload);

        debug!(
            "Received layer page {}/{} ({} bytes)",
            header.current_page,
            header.total_pages,
            payload.len()
        );

        if header.is_last() {
            self.complete = true;
            Ok(PageStatus::Complete)
        } else {
            Ok(PageStatus::More)
        }
    }

    /// Payload accumulated so far
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn pages_read(&self) -> u8 {
        self.pages_read
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blusb_transport::protocol::feature;

    fn blob(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn test_header_is_three_bytes() {
        assert_eq!(std::mem::size_of::<PageHeader>(), page::HEADER_SIZE);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(PageWriter::new(1, &blob(1)).unwrap().total_pages(), 1);
        assert_eq!(PageWriter::new(1, &blob(256)).unwrap().total_pages(), 1);
        assert_eq!(PageWriter::new(1, &blob(257)).unwrap().total_pages(), 2);
        assert_eq!(PageWriter::new(1, &blob(512)).unwrap().total_pages(), 2);
        assert_eq!(PageWriter::new(1, &blob(0)).unwrap().count(), 0);
    }

    #[test]
    fn test_total_pages_constant_across_session() {
        // A writer that derives the total from the bytes still unsent would
        // announce 3, 2, 1 here.
        let data = blob(700);
        let pages: Vec<Vec<u8>> = PageWriter::new(feature::LAYERS, &data).unwrap().collect();
        assert_eq!(pages.len(), 3);
        for (i, p) in pages.iter().enumerate() {
            assert_eq!(p.len(), page::SIZE);
            assert_eq!(p[0], feature::LAYERS);
            assert_eq!(p[1], 3);
            assert_eq!(p[2] as usize, i + 1);
        }
    }

    #[test]
    fn test_last_page_padded_with_ff() {
        let data = blob(300);
        let pages: Vec<Vec<u8>> = PageWriter::new(feature::LAYERS, &data).unwrap().collect();
        let last = &pages[1];
        let used = 300 - 256;
        assert_eq!(&last[3..3 + used], &data[256..]);
        assert!(last[3 + used..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_too_many_pages() {
        let data = vec![0u8; 256 * 255 + 1];
        assert_eq!(
            PageWriter::new(feature::LAYERS, &data).unwrap_err(),
            ProtocolError::TooManyPages {
                len: data.len(),
                pages: 256
            }
        );
        assert!(PageWriter::new(feature::LAYERS, &data[..256 * 255]).is_ok());
    }

    #[test]
    fn test_reader_reassembles_writer_output() {
        let data = blob(1000);
        let mut reader = PageReader::new(feature::LAYERS);
        let mut statuses = Vec::new();
        for page in PageWriter::with_page_size(feature::LAYERS, &data, 67).unwrap() {
            statuses.push(reader.push(&page).unwrap());
        }
        assert_eq!(statuses.last(), Some(&PageStatus::Complete));
        assert!(statuses[..statuses.len() - 1]
            .iter()
            .all(|s| *s == PageStatus::More));
        assert_eq!(&reader.bytes()[..1000], &data[..]);
        assert!(reader.bytes()[1000..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_reader_accepts_zero_feature_id() {
        let mut reader = PageReader::new(feature::LAYERS);
        let page = [0u8, 1, 1, 0xAA, 0xBB];
        assert_eq!(reader.push(&page).unwrap(), PageStatus::Complete);
        assert_eq!(reader.bytes(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_reader_rejects_foreign_feature_id() {
        let mut reader = PageReader::new(feature::LAYERS);
        assert_eq!(
            reader.push(&[feature::MACROS, 1, 1, 0]).unwrap_err(),
            ProtocolError::UnexpectedFeature {
                expected: feature::LAYERS,
                got: feature::MACROS
            }
        );
    }

    #[test]
    fn test_reader_rejects_skipped_page_and_keeps_data() {
        let mut reader = PageReader::new(feature::LAYERS);
        assert_eq!(reader.push(&[1, 3, 1, 10, 11]).unwrap(), PageStatus::More);
        assert_eq!(
            reader.push(&[1, 3, 3, 30, 31]).unwrap_err(),
            ProtocolError::OutOfSequence {
                expected: 2,
                got: 3
            }
        );
        assert_eq!(reader.bytes(), &[10, 11]);
        assert_eq!(reader.pages_read(), 1);
        // The expected page is still accepted afterwards
        assert_eq!(reader.push(&[1, 3, 2, 20, 21]).unwrap(), PageStatus::More);
        assert_eq!(reader.bytes(), &[10, 11, 20, 21]);
    }

    #[test]
    fn test_reader_rejects_first_page_not_one() {
        let mut reader = PageReader::new(feature::LAYERS);
        assert_eq!(
            reader.push(&[1, 2, 2, 0]).unwrap_err(),
            ProtocolError::OutOfSequence {
                expected: 1,
                got: 2
            }
        );
        assert!(reader.bytes().is_empty());
    }

    #[test]
    fn test_reader_rejects_changing_total() {
        let mut reader = PageReader::new(feature::LAYERS);
        reader.push(&[1, 3, 1, 0]).unwrap();
        assert_eq!(
            reader.push(&[1, 2, 2, 0]).unwrap_err(),
            ProtocolError::TotalPagesChanged { was: 3, now: 2 }
        );
    }

    #[test]
    fn test_reader_rejects_page_beyond_total() {
        let mut reader = PageReader::new(feature::LAYERS);
        assert_eq!(
            reader.push(&[1, 0, 1, 0]).unwrap_err(),
            ProtocolError::PageBeyondTotal { page: 1, total: 0 }
        );
    }

    #[test]
    fn test_reader_rejects_pages_after_completion() {
        let mut reader = PageReader::new(feature::LAYERS);
        reader.push(&[1, 1, 1, 7]).unwrap();
        assert!(reader.is_complete());
        assert!(matches!(
            reader.push(&[1, 1, 2, 8]),
            Err(ProtocolError::OutOfSequence { .. })
        ));
        assert_eq!(reader.bytes(), &[7]);
    }

    #[test]
    fn test_reader_short_page() {
        let mut reader = PageReader::new(feature::LAYERS);
        assert_eq!(
            reader.push(&[1, 1]).unwrap_err(),
            ProtocolError::ShortPage {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut reader = PageReader::new(feature::LAYERS);
        reader.push(&[1, 1, 1, 7]).unwrap();
        reader.reset();
        assert!(reader.bytes().is_empty());
        assert_eq!(reader.push(&[1, 1, 1, 9]).unwrap(), PageStatus::Complete);
        assert_eq!(reader.bytes(), &[9]);
    }
}
