use bytes::Bytes;
use std::io::Cursor;

/// In-memory copy of an upload with its own read cursor.
///
/// The body is buffered once and read twice (classification, then storage),
/// with [`ImageBuffer::rewind`] in between.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    cursor: Cursor<Bytes>,
}

impl ImageBuffer {
    pub fn new(data: Bytes) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Reads everything from the cursor to the end, leaving it exhausted.
    /// The returned bytes share the underlying buffer.
    pub fn read_remaining(&mut self) -> Bytes {
        let data = self.cursor.get_ref();
        let end = data.len();
        let start = (self.cursor.position() as usize).min(end);
        let remaining = data.slice(start..);
        self.cursor.set_position(end as u64);
        remaining
    }

    pub fn rewind(&mut self) {
        self.cursor.set_position(0);
    }
}
