use anyhow::{anyhow, bail, Result};
use std::io::{ErrorKind, Read};

use super::EXCEPTION_RESPONSE_LEN;

/// Read one RTU response frame of `expected_len` bytes.
///
/// Stops early at five bytes when the function code carries the exception
/// bit (0x80), since exception replies are always that short.
pub fn read_response_frame<R: Read + ?Sized>(reader: &mut R, expected_len: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; expected_len];
    let mut wanted = expected_len;
    let mut total_bytes = 0;

    while total_bytes < wanted {
        match reader.read(&mut buffer[total_bytes..wanted]) {
            Ok(0) => bail!(
                "No response received ({total_bytes} of {wanted} bytes before end of stream)"
            ),
            Ok(bytes_read) => total_bytes += bytes_read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::TimedOut => {
                return Err(anyhow!(
                    "Response timed out ({total_bytes} of {wanted} bytes received)"
                ));
            }
            Err(err) => return Err(anyhow!("Failed to read response: {err}")),
        }

        if total_bytes >= 2 && buffer[1] & 0x80 != 0 {
            wanted = EXCEPTION_RESPONSE_LEN.min(expected_len);
        }
    }

    buffer.truncate(wanted);
    log::trace!(
        "Received Modbus response: {}",
        buffer
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Hands out at most `chunk` bytes per read, like a slow UART.
    struct Trickle {
        data: Cursor<Vec<u8>>,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk);
            let read = self.data.read(&mut buf[..n])?;
            if read == 0 {
                return Err(io::Error::new(ErrorKind::TimedOut, "timeout"));
            }
            Ok(read)
        }
    }

    #[test]
    fn reassembles_fragmented_frame() -> Result<()> {
        let mut reader = Trickle {
            data: Cursor::new(vec![0x01, 0x03, 0x02, 0x00, 0x96, 0xAA, 0xBB, 0xFF]),
            chunk: 3,
        };
        let frame = read_response_frame(&mut reader, 7)?;
        assert_eq!(frame, vec![0x01, 0x03, 0x02, 0x00, 0x96, 0xAA, 0xBB]);
        Ok(())
    }

    #[test]
    fn exception_reply_is_cut_at_five_bytes() -> Result<()> {
        let mut reader = Cursor::new(vec![0x01, 0x86, 0x02, 0xC3, 0xA1, 0x00, 0x00, 0x00]);
        let frame = read_response_frame(&mut reader, 8)?;
        assert_eq!(frame.len(), 5);
        assert_eq!(frame[1], 0x86);
        Ok(())
    }

    #[test]
    fn silent_line_times_out() {
        let mut reader = Trickle {
            data: Cursor::new(vec![0x01, 0x06]),
            chunk: 8,
        };
        let err = read_response_frame(&mut reader, 8).unwrap_err();
        assert!(err.to_string().contains("timed out"), "{err}");
    }
}
