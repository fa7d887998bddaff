use super::{Chunks, ChunksError};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    ChunksError(ChunksError),
    InvalidPayload,
}

/// A type for reading server-sent events from a chunk stream.
///
/// Only the `data` field is delivered. Every other field and comment lines
/// are skipped, and a block without any data is not an event.
pub struct Sse {
    buf: Vec<u8>,
    chunks: Chunks,
    exhausted: bool,
}

impl Sse {
    #[inline]
    pub fn new(chunks: Chunks) -> Self {
        Self {
            buf: Vec::new(),
            chunks,
            exhausted: false,
        }
    }

    pub async fn next_event(&mut self) -> Result<Option<String>, Error> {
        loop {
            // A chunk may carry several events, so drain the buffer before
            // touching the stream again.
            if let Some(event) = self.try_parse_event()? {
                return Ok(Some(event));
            }
            if self.exhausted {
                // Trailing bytes without a blank line are dropped.
                return Ok(None);
            }

            match self.chunks.next_chunk().await.map_err(Error::ChunksError)? {
                // `\r` is stripped so that `\r\n` line endings look like `\n`.
                Some(bytes) => self
                    .buf
                    .extend(bytes.iter().copied().filter(|b| *b != b'\r')),
                None => self.exhausted = true,
            }
        }
    }

    fn try_parse_event(&mut self) -> Result<Option<String>, Error> {
        // event         = *( comment / field ) end-of-line
        // field         = 1*name-char [ colon [ space ] *any-char ] end-of-line
        // end-of-line   = lf (after `\r` has been stripped)
        while let Some(eol_idx) = find_blank_line(&self.buf) {
            let block: Vec<u8> = self.buf.drain(0..eol_idx + 2).collect();
            let block = &block[..eol_idx];

            let mut data: Option<Vec<u8>> = None;
            for line in block.split(|b| *b == b'\n') {
                if line.is_empty() || line[0] == b':' {
                    continue;
                }
                let (name, value) = match line.iter().position(|b| *b == b':')
                {
                    Some(idx) => {
                        let value = &line[idx + 1..];
                        let value = value.strip_prefix(b" ").unwrap_or(value);
                        (&line[..idx], value)
                    }
                    None => (line, &[][..]),
                };
                match name {
                    b"data" => {
                        let data = data.get_or_insert_with(Vec::new);
                        if !data.is_empty() {
                            data.push(b'\n');
                        }
                        data.extend_from_slice(value);
                    }
                    // `event`, `id`, `retry` and unknown fields.
                    _ => {}
                }
            }

            if let Some(data) = data {
                return String::from_utf8(data)
                    .map(Some)
                    .map_err(|_| Error::InvalidPayload);
            }
        }
        Ok(None)
    }
}

#[inline]
fn find_blank_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\n\n")
}
