//! Output artifacts: the loadable image and the octal word dump.

use std::{
    fs::File,
    io::{self, Read, Write},
};

use arch::Word;

use crate::error::Error;

/// Writes `[data length: u64 LE][data][words: u16 LE ...]`.
///
/// The length header is always present, `0` when there is no data.
pub fn write_image<W: Write>(out: &mut W, data: &[u8], words: &[Word]) -> io::Result<()> {
    out.write_all(&(data.len() as u64).to_le_bytes())?;
    out.write_all(data)?;
    for word in words {
        out.write_all(&word.to_le_bytes())?;
    }
    out.flush()
}

/// One zero-padded 7-digit octal word per line.
pub fn write_dump<W: Write>(out: &mut W, words: &[Word]) -> io::Result<()> {
    for word in words {
        writeln!(out, "{:07o}", word)?;
    }
    out.flush()
}

/// Reads a data blob. An empty file is rejected.
pub fn read_data(path: &str) -> Result<Vec<u8>, Error> {
    let mut file = File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    let mut data = vec![];
    file.read_to_end(&mut data)
        .map_err(|e| Error::FileRead(path.to_string(), e))?;
    if data.is_empty() {
        return Err(Error::EmptyDataFile(path.to_string()));
    }
    Ok(data)
}

fn create(path: &str) -> Result<File, Error> {
    File::create(path).map_err(|e| Error::FileCreate(path.to_string(), e))
}

pub fn save_image(path: &str, data: &[u8], words: &[Word]) -> Result<(), Error> {
    let mut file = io::BufWriter::new(create(path)?);
    write_image(&mut file, data, words).map_err(|e| Error::FileWrite(path.to_string(), e))
}

pub fn save_dump(path: &str, words: &[Word]) -> Result<(), Error> {
    let mut file = io::BufWriter::new(create(path)?);
    write_dump(&mut file, words).map_err(|e| Error::FileWrite(path.to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_layout() {
        let mut out = vec![];
        write_image(&mut out, &[0xAA, 0xBB, 0xCC], &[0o000207, 0x1234]).unwrap();
        assert_eq!(
            out,
            vec![3, 0, 0, 0, 0, 0, 0, 0, 0xAA, 0xBB, 0xCC, 0x87, 0x00, 0x34, 0x12]
        );
    }

    #[test]
    fn image_without_data() {
        let mut out = vec![];
        write_image(&mut out, &[], &[1]).unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 0, 0, 0, 0, 1, 0]);
        assert_eq!(out.len(), 8 + 2);
    }

    #[test]
    fn dump_is_octal() {
        let mut out = vec![];
        write_dump(&mut out, &[0o012746, 0, 0o177777]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0012746\n0000000\n0177777\n"
        );
    }

    #[test]
    fn missing_data_file() {
        assert!(matches!(
            read_data("/nonexistent/data.bin").unwrap_err(),
            Error::FileOpen(..)
        ));
    }
}
