//! Result output

use std::io::{self, Write};

/// Write a decoded value exactly as is, without a trailing newline
pub fn write_result<W: Write>(writer: &mut W, value: &str) -> io::Result<()> {
    writer.write_all(value.as_bytes())?;
    writer.flush()
}

/// Write a decoded value to stdout
pub fn print_result(value: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_result(&mut handle, value)
}
