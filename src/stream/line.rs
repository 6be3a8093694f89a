use std::io::{self, BufRead};

/// Reads the next line from `reader` into `buf`, excluding the newline.
///
/// The buffer is cleared first and grown as needed while the line is assembled
/// across as many internal buffer chunks as it spans. A trailing `\r` is
/// stripped so that CRLF input behaves like LF input.
///
/// Returns `Ok(None)` at end of stream when no byte could be read, otherwise the
/// length of the line. A final line without a newline terminator is returned as
/// long as it holds at least one byte.
pub fn read_line<R: BufRead + ?Sized>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<usize>> {
    buf.clear();
    let mut consumed = 0;
    loop {
        let (done, used) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                break;
            }
            match memchr::memchr(b'\n', available) {
                Some(idx) => {
                    buf.extend_from_slice(&available[..idx]);
                    (true, idx + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (false, available.len())
                }
            }
        };
        reader.consume(used);
        consumed += used;
        if done {
            break;
        }
    }

    if consumed == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(buf.len()))
}
