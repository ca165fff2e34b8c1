//! Bytecode scanner
//!
//! Substring search over normalised hex. Over-approximate on purpose: a selector
//! found anywhere in the code counts, whether or not it sits in the dispatcher.
//! Renamed functions keep their selector, so this still catches relabelled code.

use crate::models::types::Bytecode;
use crate::utils::constants::{SignatureEntry, EIP1967_IMPLEMENTATION_SLOT_PREFIX};

/// Table entries whose marker occurs in the bytecode, in table order.
/// Absent bytecode yields no matches.
pub fn detect_markers(
    bytecode: Option<&Bytecode>,
    table: &'static [SignatureEntry],
) -> Vec<&'static SignatureEntry> {
    let Some(code) = bytecode else {
        return Vec::new();
    };

    table
        .iter()
        .filter(|entry| code.contains_hex(&entry.marker.to_hex()))
        .collect()
}

/// Known 4-byte selectors present in the bytecode
#[inline]
pub fn detect_selectors(
    bytecode: Option<&Bytecode>,
    table: &'static [SignatureEntry],
) -> Vec<&'static SignatureEntry> {
    detect_markers(bytecode, table)
}

/// Known single-byte opcodes present in the bytecode.
///
/// Matches at any nibble offset, so push data and constants produce hits too.
#[inline]
pub fn detect_opcodes(
    bytecode: Option<&Bytecode>,
    table: &'static [SignatureEntry],
) -> Vec<&'static SignatureEntry> {
    detect_markers(bytecode, table)
}

/// Whether the EIP-1967 implementation slot constant is embedded in the code
pub fn detect_eip1967_slot(bytecode: Option<&Bytecode>) -> bool {
    bytecode.is_some_and(|code| code.contains_hex(EIP1967_IMPLEMENTATION_SLOT_PREFIX))
}

/// Evidence record for a matched table entry
pub fn marker_evidence(entry: &SignatureEntry) -> serde_json::Value {
    serde_json::json!({
        "marker": format!("0x{}", entry.marker.to_hex()),
        "name": entry.name,
        "tier": entry.tier,
        "description": entry.description,
    })
}
