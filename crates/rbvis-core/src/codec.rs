//! Binary numeric codec for model resources.
//!
//! Model data is stored as plain binary arrays of `i32`, `i16`, `f32` or `f64`
//! values in either big- or little-endian order. The byte order is declared
//! per model, since older models were produced on a different architecture.
//!
//! Two access patterns exist:
//! - **Self-describing** arrays start with an `i32` element count. The free
//!   functions [`read_f32_vector`], [`read_i16_vector`], etc. take the stream
//!   by value and drop (close) it once the array has been read.
//! - **Fixed-length** arrays have no prefix; the caller supplies the count to
//!   the methods on [`NumericReader`], which borrows the stream so that
//!   further reads can be chained.
//!
//! Matrices are stored as `i32` rows, `i32` columns, then row-major `f64`s.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::{RbvisError, Result};

/// Upper bound for speculative preallocation from untrusted length prefixes.
const MAX_PREALLOC: usize = 1 << 20;

/// Byte order of a model's binary resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ByteOrder {
    /// Most significant byte first (the historical default).
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

impl ByteOrder {
    /// Interprets the `machformat` model attribute.
    ///
    /// `"le"` selects little endian; anything else, including a missing
    /// attribute, selects big endian.
    pub fn from_machine_format(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("le") => Self::LittleEndian,
            _ => Self::BigEndian,
        }
    }
}

/// A dense row-major `f64` matrix as read from a model resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a matrix from row-major data.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(RbvisError::SizeMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i`, or `None` past the last row.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.rows {
            return None;
        }
        self.data.get(i * self.cols..(i + 1) * self.cols)
    }

    /// Iterates over all rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.rows).filter_map(move |i| self.row(i))
    }

    /// Returns the row-major data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Reads scalars and fixed-length arrays from a byte stream.
pub struct NumericReader<R> {
    inner: R,
    order: ByteOrder,
}

impl<R: Read> NumericReader<R> {
    /// Wraps a stream with the given byte order.
    pub fn new(inner: R, order: ByteOrder) -> Self {
        Self { inner, order }
    }

    /// Returns the byte order used for decoding.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a 32-bit signed integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let buf = self.read_bytes::<4>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => i32::from_be_bytes(buf),
            ByteOrder::LittleEndian => i32::from_le_bytes(buf),
        })
    }

    /// Reads a 16-bit signed integer.
    pub fn read_i16(&mut self) -> Result<i16> {
        let buf = self.read_bytes::<2>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => i16::from_be_bytes(buf),
            ByteOrder::LittleEndian => i16::from_le_bytes(buf),
        })
    }

    /// Reads an IEEE-754 single precision float.
    pub fn read_f32(&mut self) -> Result<f32> {
        let buf = self.read_bytes::<4>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => f32::from_be_bytes(buf),
            ByteOrder::LittleEndian => f32::from_le_bytes(buf),
        })
    }

    /// Reads an IEEE-754 double precision float.
    pub fn read_f64(&mut self) -> Result<f64> {
        let buf = self.read_bytes::<8>()?;
        Ok(match self.order {
            ByteOrder::BigEndian => f64::from_be_bytes(buf),
            ByteOrder::LittleEndian => f64::from_le_bytes(buf),
        })
    }

    /// Reads an `i32` length/dimension, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| RbvisError::NegativeLength(len))
    }

    fn read_array<T>(&mut self, len: usize, mut f: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut out = Vec::with_capacity(len.min(MAX_PREALLOC));
        for _ in 0..len {
            out.push(f(self)?);
        }
        Ok(out)
    }

    /// Reads `len` floats without a length prefix.
    pub fn read_f32_array(&mut self, len: usize) -> Result<Vec<f32>> {
        self.read_array(len, Self::read_f32)
    }

    /// Reads `len` doubles without a length prefix.
    pub fn read_f64_array(&mut self, len: usize) -> Result<Vec<f64>> {
        self.read_array(len, Self::read_f64)
    }

    /// Reads `len` 16-bit integers without a length prefix.
    pub fn read_i16_array(&mut self, len: usize) -> Result<Vec<i16>> {
        self.read_array(len, Self::read_i16)
    }

    /// Reads `len` 32-bit integers without a length prefix.
    pub fn read_i32_array(&mut self, len: usize) -> Result<Vec<i32>> {
        self.read_array(len, Self::read_i32)
    }

    /// Reads a `rows x cols` row-major matrix without dimension header.
    pub fn read_f64_matrix_fixed(&mut self, rows: usize, cols: usize) -> Result<Matrix> {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| RbvisError::Format(format!("matrix of {rows}x{cols} is too large")))?;
        let data = self.read_f64_array(len)?;
        Matrix::new(rows, cols, data)
    }
}

/// Reads a length-prefixed `f32` vector and closes the stream.
pub fn read_f32_vector<R: Read>(stream: R, order: ByteOrder) -> Result<Vec<f32>> {
    let mut reader = NumericReader::new(stream, order);
    let len = reader.read_len()?;
    reader.read_f32_array(len)
}

/// Reads a length-prefixed `f64` vector and closes the stream.
pub fn read_f64_vector<R: Read>(stream: R, order: ByteOrder) -> Result<Vec<f64>> {
    let mut reader = NumericReader::new(stream, order);
    let len = reader.read_len()?;
    reader.read_f64_array(len)
}

/// Reads a length-prefixed `i16` vector and closes the stream.
pub fn read_i16_vector<R: Read>(stream: R, order: ByteOrder) -> Result<Vec<i16>> {
    let mut reader = NumericReader::new(stream, order);
    let len = reader.read_len()?;
    reader.read_i16_array(len)
}

/// Reads a length-prefixed `i32` vector and closes the stream.
pub fn read_i32_vector<R: Read>(stream: R, order: ByteOrder) -> Result<Vec<i32>> {
    let mut reader = NumericReader::new(stream, order);
    let len = reader.read_len()?;
    reader.read_i32_array(len)
}

/// Reads a matrix with its `rows`/`cols` header and closes the stream.
pub fn read_f64_matrix<R: Read>(stream: R, order: ByteOrder) -> Result<Matrix> {
    let mut reader = NumericReader::new(stream, order);
    let rows = reader.read_len()?;
    let cols = reader.read_len()?;
    reader.read_f64_matrix_fixed(rows, cols)
}

/// Writes values in the layout understood by [`NumericReader`].
pub struct NumericWriter<W> {
    inner: W,
    order: ByteOrder,
}

impl<W: Write> NumericWriter<W> {
    /// Wraps a sink with the given byte order.
    pub fn new(inner: W, order: ByteOrder) -> Self {
        Self { inner, order }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Writes a 16-bit signed integer.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Writes a single precision float.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    /// Writes a double precision float.
    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.inner.write_all(&bytes)?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| RbvisError::Format(format!("array length {len} exceeds i32 range")))?;
        self.write_i32(len)
    }

    /// Writes a length-prefixed `f32` vector.
    pub fn write_f32_vector(&mut self, values: &[f32]) -> Result<()> {
        self.write_len(values.len())?;
        values.iter().try_for_each(|&v| self.write_f32(v))
    }

    /// Writes a length-prefixed `f64` vector.
    pub fn write_f64_vector(&mut self, values: &[f64]) -> Result<()> {
        self.write_len(values.len())?;
        values.iter().try_for_each(|&v| self.write_f64(v))
    }

    /// Writes a length-prefixed `i16` vector.
    pub fn write_i16_vector(&mut self, values: &[i16]) -> Result<()> {
        self.write_len(values.len())?;
        values.iter().try_for_each(|&v| self.write_i16(v))
    }

    /// Writes a length-prefixed `i32` vector.
    pub fn write_i32_vector(&mut self, values: &[i32]) -> Result<()> {
        self.write_len(values.len())?;
        values.iter().try_for_each(|&v| self.write_i32(v))
    }

    /// Writes a matrix with its dimension header.
    pub fn write_f64_matrix(&mut self, matrix: &Matrix) -> Result<()> {
        self.write_len(matrix.rows())?;
        self.write_len(matrix.cols())?;
        matrix.as_slice().iter().try_for_each(|&v| self.write_f64(v))
    }
}

/// Encodes a length-prefixed `f32` vector into a byte buffer.
pub fn encode_f32_vector(values: &[f32], order: ByteOrder) -> Result<Vec<u8>> {
    let mut writer = NumericWriter::new(Vec::new(), order);
    writer.write_f32_vector(values)?;
    Ok(writer.into_inner())
}

/// Encodes a length-prefixed `i16` vector into a byte buffer.
pub fn encode_i16_vector(values: &[i16], order: ByteOrder) -> Result<Vec<u8>> {
    let mut writer = NumericWriter::new(Vec::new(), order);
    writer.write_i16_vector(values)?;
    Ok(writer.into_inner())
}

/// Encodes a matrix with its dimension header into a byte buffer.
pub fn encode_f64_matrix(matrix: &Matrix, order: ByteOrder) -> Result<Vec<u8>> {
    let mut writer = NumericWriter::new(Vec::new(), order);
    writer.write_f64_matrix(matrix)?;
    Ok(writer.into_inner())
}
