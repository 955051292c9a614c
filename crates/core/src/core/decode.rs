//! Physical-address decoder (spec §4.1).
//!
//! A 33-bit physical address is split, low bits first, into: byte-select,
//! column-low, channel, bank-group, bank, column-high, row. Field widths
//! come from [`DimmGeometry`] so a different DIMM geometry is a config
//! change, not a code change. Every `u64` decodes; bits above the
//! configured address width are simply ignored, since masking the trace's
//! input address to 33 bits is the trace parser's job, not the decoder's.

use crate::config::DimmGeometry;

/// The fields extracted from a physical address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub byte_select: u32,
    pub column_low: u32,
    pub channel: usize,
    pub bank_group: usize,
    pub bank: usize,
    pub column_high: u32,
    pub row: u32,
}

fn extract(addr: u64, shift: u32, width: u32) -> u32 {
    if width == 0 {
        return 0;
    }
    let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
    ((addr >> shift) & mask) as u32
}

/// Splits `addr` into its constituent fields per `geometry`.
#[must_use]
pub fn decode(addr: u64, geometry: &DimmGeometry) -> DecodedAddress {
    let mut shift = 0u32;

    let byte_select = extract(addr, shift, geometry.byte_select_bits);
    shift += geometry.byte_select_bits;

    let column_low = extract(addr, shift, geometry.column_low_bits);
    shift += geometry.column_low_bits;

    let channel = extract(addr, shift, geometry.channel_bits) as usize;
    shift += geometry.channel_bits;

    let bank_group = extract(addr, shift, geometry.bank_group_bits) as usize;
    shift += geometry.bank_group_bits;

    let bank = extract(addr, shift, geometry.bank_bits) as usize;
    shift += geometry.bank_bits;

    let column_high = extract(addr, shift, geometry.column_high_bits);
    shift += geometry.column_high_bits;

    let row = extract(addr, shift, geometry.row_bits);

    DecodedAddress {
        byte_select,
        column_low,
        channel,
        bank_group,
        bank,
        column_high,
        row,
    }
}
