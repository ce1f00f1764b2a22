//! Binary encoding and decoding traits for deterministic serialization.
//!
//! Everything that gets hashed in this crate (events, receipts) goes through
//! these traits so the byte layout is fixed and platform independent.
//!
//! # Binary Format
//!
//! - Integers: little-endian, fixed-width
//! - `usize`: encoded as `u64` for portability
//! - `bool`: single byte (0 = false, 1 = true)
//! - `Vec<T>`/`String`: 8-byte length prefix followed by elements
//! - `Option<T>`: 1-byte tag (0 = None, 1 = Some) followed by value if present
//! - Arrays `[T; N]`: elements serialized sequentially without length prefix

/// Sink for writing encoded bytes.
///
/// Implemented by byte buffers and hashers so encodable types can be hashed
/// directly without an intermediate allocation.
pub trait EncodeSink {
    /// Writes the given bytes to the sink.
    fn write(&mut self, bytes: &[u8]);
}

/// Counter for computing encoded size without allocating memory.
///
/// Used by `Encode::to_bytes` to pre-allocate exact capacity before encoding.
pub struct SizeCounter {
    len: usize,
}

impl SizeCounter {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self { len: 0 }
    }

    /// Returns the total number of bytes counted.
    pub fn len(&self) -> usize {
        self.len
    }
}

impl Default for SizeCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncodeSink for SizeCounter {
    fn write(&mut self, bytes: &[u8]) {
        self.len += bytes.len();
    }
}

impl EncodeSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Trait for types that can be serialized to binary format.
pub trait Encode {
    /// Writes the binary representation to the given sink.
    fn encode<S: EncodeSink>(&self, out: &mut S);

    /// Serializes to a new byte buffer with exact capacity.
    ///
    /// Performs two passes: first to count bytes, then to encode.
    fn to_bytes(&self) -> Vec<u8> {
        let mut counter = SizeCounter::new();
        self.encode(&mut counter);

        let mut out = Vec::with_capacity(counter.len());
        self.encode(&mut out);
        out
    }
}

/// Errors that can occur during decoding.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// Input ended before expected data was read.
    UnexpectedEof,
    /// Data does not represent a valid value for the target type.
    InvalidValue,
    /// Length prefix exceeds maximum allowed size.
    LengthOverflow,
}

/// Trait for types that can be deserialized from binary format.
pub trait Decode: Sized {
    /// Reads and decodes a value from the input buffer.
    ///
    /// Advances the input slice past the consumed bytes.
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError>;

    /// Decodes a value from a byte slice, requiring all bytes to be consumed.
    ///
    /// Returns `InvalidValue` if trailing bytes remain after decoding.
    fn from_bytes(data: &[u8]) -> Result<Self, DecodeError> {
        let mut input = data;
        let value = Self::decode(&mut input)?;

        if !input.is_empty() {
            return Err(DecodeError::InvalidValue);
        }

        Ok(value)
    }
}

/// Reads exactly `n` bytes from the input, advancing the slice.
fn read_bytes<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], DecodeError> {
    if input.len() < n {
        return Err(DecodeError::UnexpectedEof);
    }
    let (bytes, rest) = input.split_at(n);
    *input = rest;
    Ok(bytes)
}

impl Encode for u8 {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&[*self]);
    }
}

impl Decode for u8 {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = read_bytes(input, 1)?;
        Ok(bytes[0])
    }
}

// Macro for fixed-size integer types
macro_rules! impl_int {
    ($($t:ty),*) => {
        $(
            impl Encode for $t {
                fn encode<S: EncodeSink>(&self, out: &mut S) {
                    out.write(&self.to_le_bytes());
                }
            }

            impl Decode for $t {
                fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
                    let bytes = read_bytes(input, std::mem::size_of::<$t>())?;
                    Ok(<$t>::from_le_bytes(bytes.try_into().unwrap()))
                }
            }
        )*
    };
}

impl_int!(u16, u32, u64, u128, i64);

// usize as u64
impl Encode for usize {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        (*self as u64).encode(out);
    }
}

impl Decode for usize {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let v = u64::decode(input)?;
        usize::try_from(v).map_err(|_| DecodeError::LengthOverflow)
    }
}

impl Encode for bool {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        out.write(&[*self as u8]);
    }
}

impl Decode for bool {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        match u8::decode(input)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(DecodeError::InvalidValue),
        }
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.len().encode(out);
        for item in self {
            item.encode(out);
        }
    }
}

/// Maximum allowed length for decoded vectors to prevent memory exhaustion.
const MAX_VEC_LEN: usize = 1_000_000;

impl<T: Decode> Decode for Vec<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let len = usize::decode(input)?;
        if len > MAX_VEC_LEN {
            return Err(DecodeError::LengthOverflow);
        }

        let mut vec = Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(T::decode(input)?);
        }
        Ok(vec)
    }
}

impl Encode for String {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        self.len().encode(out);
        out.write(self.as_bytes());
    }
}

impl Decode for String {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let bytes = Vec::<u8>::decode(input)?;
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidValue)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        match self {
            None => 0u8.encode(out),
            Some(v) => {
                1u8.encode(out);
                v.encode(out);
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        match u8::decode(input)? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(input)?)),
            _ => Err(DecodeError::InvalidValue),
        }
    }
}

// Fixed-size arrays [T; N]
impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode<S: EncodeSink>(&self, out: &mut S) {
        for item in self {
            item.encode(out);
        }
    }
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode(input: &mut &[u8]) -> Result<Self, DecodeError> {
        let mut vec = Vec::with_capacity(N);
        for _ in 0..N {
            vec.push(T::decode(input)?);
        }
        vec.try_into().map_err(|_| DecodeError::InvalidValue)
    }
}
