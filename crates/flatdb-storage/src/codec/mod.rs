//! Value and TLV codecs.
//!
//! [`value`] converts a single scalar to and from its raw little-endian
//! bytes; [`tlv`] wraps those bytes in a self-describing tag and length.

pub mod tlv;
pub mod value;

pub use tlv::{
    decode_tlv, encode_str_tlv, encode_tlv, encode_u32_tlv, tlv_bytes, TlvHeader, TlvItem,
};
pub use value::{decode_value, encode_value, marshal, unmarshal};
