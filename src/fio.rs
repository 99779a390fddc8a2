//! # Wire Document IO
//!
//! Writing the problem document ([`timetable`]) and reading solved documents
//! back ([`solution`]). The writer emits exactly what the encoder assembled;
//! all structural guarantees live in [`crate::encode`].

use std::io;

use thiserror::Error;

use crate::types::Solution;

pub mod solution;
pub mod timetable;

/// Combined IO and decoding errors
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Solution decoding error
    #[error("{0}")]
    Solution(#[from] solution::Error),
}

/// Reads a solved document from a reader and decodes it
///
/// # Errors
///
/// [`Error::Io`] when reading fails, [`Error::Solution`] when the document
/// does not decode.
pub fn read_solution<R: io::Read>(mut reader: R) -> Result<Solution, Error> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(solution::parse_solution(&buf)?)
}
