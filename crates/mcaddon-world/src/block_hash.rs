//! FNV-1a 32-bit block state hash computation.
//!
//! Runtime IDs in sub-chunk palettes are FNV-1a hashes of the block state
//! serialized as network NBT, the same scheme Bedrock uses when
//! `block_network_ids_are_hashes` is enabled.

use bytes::{BufMut, BytesMut};

use crate::block::{BlockProperty, BlockState, GameVersion};

/// FNV-1a 32-bit offset basis.
const FNV1_32_INIT: u32 = 0x811c_9dc5;
/// FNV-1a 32-bit prime.
const FNV1_32_PRIME: u32 = 0x0100_0193;

const TAG_END: u8 = 0x00;
const TAG_BYTE: u8 = 0x01;
const TAG_INT: u8 = 0x03;
const TAG_STRING: u8 = 0x08;
const TAG_COMPOUND: u8 = 0x0A;

/// Compute FNV-1a 32-bit hash of a byte slice.
pub fn fnv1a_32(data: &[u8]) -> u32 {
    data.iter().fold(FNV1_32_INIT, |hash, &byte| {
        (hash ^ byte as u32).wrapping_mul(FNV1_32_PRIME)
    })
}

/// Runtime ID of `block` for the given game version.
pub fn runtime_id(block: &BlockState, version: &GameVersion) -> u32 {
    fnv1a_32(&serialize_block_state_nbt(block, version.block_state_version()))
}

/// Serialize a block state to network NBT bytes.
///
/// Key order is fixed: "name", "states" (properties sorted by key), "version".
fn serialize_block_state_nbt(block: &BlockState, block_state_version: i32) -> Vec<u8> {
    let mut buf = BytesMut::new();

    buf.put_u8(TAG_COMPOUND);
    write_string(&mut buf, "");

    buf.put_u8(TAG_STRING);
    write_string(&mut buf, "name");
    write_string(&mut buf, &block.identifier());

    buf.put_u8(TAG_COMPOUND);
    write_string(&mut buf, "states");
    for (key, value) in &block.properties {
        match value {
            BlockProperty::String(s) => {
                buf.put_u8(TAG_STRING);
                write_string(&mut buf, key);
                write_string(&mut buf, s);
            }
            BlockProperty::Int(i) => {
                buf.put_u8(TAG_INT);
                write_string(&mut buf, key);
                write_zigzag_varint(&mut buf, *i);
            }
            BlockProperty::Byte(b) => {
                buf.put_u8(TAG_BYTE);
                write_string(&mut buf, key);
                buf.put_i8(*b);
            }
        }
    }
    buf.put_u8(TAG_END);

    buf.put_u8(TAG_INT);
    write_string(&mut buf, "version");
    write_zigzag_varint(&mut buf, block_state_version);

    buf.put_u8(TAG_END);
    buf.to_vec()
}

/// Network NBT string: VarUInt32 length + UTF-8 bytes.
fn write_string(buf: &mut BytesMut, s: &str) {
    write_varuint32(buf, s.len() as u32);
    buf.put_slice(s.as_bytes());
}

/// Unsigned VarInt (LEB128).
fn write_varuint32(buf: &mut BytesMut, mut value: u32) {
    while value & !0x7F != 0 {
        buf.put_u8((value & 0x7F | 0x80) as u8);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

/// Signed VarInt (ZigZag + LEB128).
fn write_zigzag_varint(buf: &mut BytesMut, value: i32) {
    write_varuint32(buf, ((value << 1) ^ (value >> 31)) as u32);
}
