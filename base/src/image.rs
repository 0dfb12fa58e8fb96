//! The object image format.
//!
//! An object image is the resolved, address-complete integer program
//! which the simulator loads into memory.  On disk it is a text file
//! holding one decimal integer per line, with a final `-1` line
//! marking the end of the program.  The terminator is not just
//! framing: the loader writes it into the cell after the program, so
//! a program which runs off its own end fetches a value outside the
//! opcode table and halts.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, Write};

use crate::types::{IMAGE_SENTINEL, Word};

/// A problem with an object image file.
#[derive(Debug)]
pub enum ImageError {
    Io(io::Error),
    /// A line which does not parse as a decimal integer.
    BadLine {
        line_number: usize,
        content: String,
    },
    /// The image has no terminating sentinel line.
    MissingSentinel,
}

impl Display for ImageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            ImageError::Io(e) => write!(f, "I/O error reading object image: {e}"),
            ImageError::BadLine {
                line_number,
                content,
            } => {
                write!(
                    f,
                    "line {line_number} of the object image is not an integer: {content:?}"
                )
            }
            ImageError::MissingSentinel => {
                write!(
                    f,
                    "object image does not end with the {IMAGE_SENTINEL} terminator"
                )
            }
        }
    }
}

impl Error for ImageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ImageError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ImageError {
    fn from(e: io::Error) -> ImageError {
        ImageError::Io(e)
    }
}

/// The program cells of an object image, without the terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectImage {
    words: Vec<Word>,
}

impl ObjectImage {
    pub fn new(words: Vec<Word>) -> ObjectImage {
        ObjectImage { words }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Read an image from its one-integer-per-line text form.  The
    /// final line must be the sentinel; it is stripped from the
    /// returned image (the loader re-appends it as the halt cell).
    /// Only the last line is treated as a terminator, so negative
    /// immediates inside the program are unaffected.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<ObjectImage, ImageError> {
        let mut words: Vec<Word> = Vec::new();
        for (line_number, item) in reader.lines().enumerate().map(|(n, sl)| (n + 1, sl)) {
            let line = item?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.parse::<Word>() {
                Ok(w) => words.push(w),
                Err(_) => {
                    return Err(ImageError::BadLine {
                        line_number,
                        content: line,
                    });
                }
            }
        }
        match words.pop() {
            Some(w) if w == IMAGE_SENTINEL => Ok(ObjectImage { words }),
            _ => Err(ImageError::MissingSentinel),
        }
    }

    /// Write the image in its text form, appending the sentinel line.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), io::Error> {
        for w in &self.words {
            writeln!(writer, "{w}")?;
        }
        writeln!(writer, "{IMAGE_SENTINEL}")
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageError, ObjectImage};
    use std::io::Cursor;

    #[test]
    fn round_trip() {
        let image = ObjectImage::new(vec![24, 0, 5, 24, 1, -3, 0, 0, 1]);
        let mut text: Vec<u8> = Vec::new();
        image
            .write_to(&mut text)
            .expect("write to a Vec should not fail");
        let read_back =
            ObjectImage::from_reader(Cursor::new(text)).expect("image should read back");
        assert_eq!(read_back, image);
    }

    #[test]
    fn interior_negative_one_is_not_a_terminator() {
        // ldi R0, -1 encodes an interior -1 cell.
        let text = "24\n0\n-1\n-1\n";
        let image = ObjectImage::from_reader(Cursor::new(text)).expect("valid image");
        assert_eq!(image.words(), &[24, 0, -1]);
    }

    #[test]
    fn missing_sentinel_is_rejected() {
        let err = ObjectImage::from_reader(Cursor::new("24\n0\n5\n")).unwrap_err();
        assert!(matches!(err, ImageError::MissingSentinel));
        let err = ObjectImage::from_reader(Cursor::new("")).unwrap_err();
        assert!(matches!(err, ImageError::MissingSentinel));
    }

    #[test]
    fn non_integer_line_is_rejected() {
        let err = ObjectImage::from_reader(Cursor::new("24\nbogus\n-1\n")).unwrap_err();
        match err {
            ImageError::BadLine {
                line_number,
                content,
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(content, "bogus");
            }
            other => panic!("expected BadLine, got {other:?}"),
        }
    }
}
