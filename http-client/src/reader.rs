//! Strategies for deciding when the device has finished sending
//!
//! The device neither closes the connection promptly nor reliably sends a
//! `Content-Length`, so historically a read that comes back shorter than the
//! buffer was taken to mean "no more data". That heuristic is wrong when a
//! response is an exact multiple of the buffer size, but it is what the
//! device has been driven with. It sits behind [`BodyReader`] so an
//! EOF-driven strategy can be swapped in without touching the codec.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Default read buffer size
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Reads one burst of bytes from a connected stream
#[async_trait]
pub trait BodyReader: Send + Sync {
    async fn read_burst(
        &self,
        stream: &mut (dyn AsyncRead + Unpin + Send),
    ) -> std::io::Result<Vec<u8>>;
}

/// Stops at the first read shorter than the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortReadReader {
    chunk_size: usize,
}

impl ShortReadReader {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for ShortReadReader {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[async_trait]
impl BodyReader for ShortReadReader {
    async fn read_burst(
        &self,
        stream: &mut (dyn AsyncRead + Unpin + Send),
    ) -> std::io::Result<Vec<u8>> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut accumulated = Vec::new();

        loop {
            let n = stream.read(&mut buffer).await?;
            accumulated.extend_from_slice(&buffer[..n]);

            if n < buffer.len() {
                break;
            }
        }

        Ok(accumulated)
    }
}

/// Reads until the peer closes the connection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EofReader;

#[async_trait]
impl BodyReader for EofReader {
    async fn read_burst(
        &self,
        stream: &mut (dyn AsyncRead + Unpin + Send),
    ) -> std::io::Result<Vec<u8>> {
        let mut accumulated = Vec::new();
        stream.read_to_end(&mut accumulated).await?;
        Ok(accumulated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_short_read_stops_after_partial_chunk() {
        let mut stream = Builder::new()
            .read(&[1, 2, 3, 4])
            .read(&[5, 6])
            .read(&[7, 8])
            .build();

        let reader = ShortReadReader::new(4);
        let burst = reader.read_burst(&mut stream).await.unwrap();
        assert_eq!(burst, vec![1, 2, 3, 4, 5, 6]);

        // The remaining bytes are left for a second burst
        let rest = reader.read_burst(&mut stream).await.unwrap();
        assert_eq!(rest, vec![7, 8]);
    }

    #[tokio::test]
    async fn test_short_read_on_closed_stream_is_empty() {
        let mut stream = Builder::new().build();
        let burst = ShortReadReader::default().read_burst(&mut stream).await.unwrap();
        assert!(burst.is_empty());
    }

    #[tokio::test]
    async fn test_eof_reader_reads_everything() {
        let mut stream = Builder::new().read(&[1, 2]).read(&[3]).read(&[4, 5]).build();
        let burst = EofReader.read_burst(&mut stream).await.unwrap();
        assert_eq!(burst, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_zero_chunk_size_is_clamped() {
        assert_eq!(ShortReadReader::new(0).chunk_size(), 1);
    }
}
