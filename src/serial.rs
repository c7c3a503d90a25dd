//! Binary persistence of rule trees.
//!
//! A [`Metadata`] tree is data only, so it can be cached and later lowered to
//! script or rendered as a report without rebuilding the rule in code. The
//! evaluable closures of a [`Rule`](crate::Rule) are not persisted.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RCFT"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The format version must match exactly; the engine version is informational.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Element, Literal, Metadata, Operator, TemporalUnit};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"RCFT";
const FORMAT_VERSION: u16 = 2;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when encoding a rule tree.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode rule tree: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("rule tree payload of {0} bytes exceeds the 4 GiB format limit")]
    TooLarge(usize),
}

/// Errors that can occur when decoding a rule tree.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a rulecraft binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedTree {
    node_count: usize,
    root: SerializedNode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedNode {
    Leaf(Vec<SerializedElement>),
    Unary {
        op: String,
        child: Box<SerializedNode>,
    },
    Binary {
        op: String,
        left: Box<SerializedNode>,
        right: Box<SerializedNode>,
    },
    Nary {
        op: String,
        children: Vec<SerializedNode>,
    },
    When(Box<SerializedNode>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SerializedElement {
    Operator(String),
    Field { label: String, iterable: bool },
    Value(SerializedLiteral),
    Text(String),
    Unit(String),
    ParenthesisLeft,
    ParenthesisRight,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SerializedLiteral {
    Bare(String),
    Quoted(String),
    Many(Vec<SerializedLiteral>),
}

// ---------------------------------------------------------------------------
// Metadata -> SerializedNode
// ---------------------------------------------------------------------------

fn serialize_literal(literal: &Literal) -> SerializedLiteral {
    match literal {
        Literal::Single(text) => SerializedLiteral::Bare(text.clone()),
        Literal::Text(text) => SerializedLiteral::Quoted(text.clone()),
        Literal::Many(items) => {
            SerializedLiteral::Many(items.iter().map(serialize_literal).collect())
        }
    }
}

fn serialize_element(element: &Element) -> SerializedElement {
    match element {
        Element::Operator(op) => SerializedElement::Operator(op.name().to_owned()),
        Element::Field { label, iterable } => SerializedElement::Field {
            label: label.clone(),
            iterable: *iterable,
        },
        Element::Value(literal) => SerializedElement::Value(serialize_literal(literal)),
        Element::StringValue(text) => SerializedElement::Text(text.clone()),
        Element::TemporalUnit(unit) => SerializedElement::Unit(unit.name().to_owned()),
        Element::ParenthesisLeft => SerializedElement::ParenthesisLeft,
        Element::ParenthesisRight => SerializedElement::ParenthesisRight,
        Element::Unknown(text) => SerializedElement::Unknown(text.clone()),
    }
}

fn serialize_node(metadata: &Metadata) -> SerializedNode {
    match metadata {
        Metadata::Leaf(elements) => {
            SerializedNode::Leaf(elements.iter().map(serialize_element).collect())
        }
        Metadata::Unary { op, child } => SerializedNode::Unary {
            op: op.name().to_owned(),
            child: Box::new(serialize_node(child)),
        },
        Metadata::Binary { op, left, right } => SerializedNode::Binary {
            op: op.name().to_owned(),
            left: Box::new(serialize_node(left)),
            right: Box::new(serialize_node(right)),
        },
        Metadata::Nary { op, children } => SerializedNode::Nary {
            op: op.name().to_owned(),
            children: children.iter().map(|c| serialize_node(c)).collect(),
        },
        Metadata::When(child) => SerializedNode::When(Box::new(serialize_node(child))),
    }
}

// ---------------------------------------------------------------------------
// SerializedNode -> Metadata
// ---------------------------------------------------------------------------

fn operator(name: &str) -> Result<Operator, DeserializeError> {
    Operator::from_name(name)
        .ok_or_else(|| DeserializeError::Validation(format!("unknown operator '{name}'")))
}

fn deserialize_literal(literal: SerializedLiteral) -> Literal {
    match literal {
        SerializedLiteral::Bare(text) => Literal::Single(text),
        SerializedLiteral::Quoted(text) => Literal::Text(text),
        SerializedLiteral::Many(items) => {
            Literal::Many(items.into_iter().map(deserialize_literal).collect())
        }
    }
}

fn deserialize_element(element: SerializedElement) -> Result<Element, DeserializeError> {
    Ok(match element {
        SerializedElement::Operator(name) => Element::Operator(operator(&name)?),
        SerializedElement::Field { label, iterable } => Element::Field { label, iterable },
        SerializedElement::Value(literal) => Element::Value(deserialize_literal(literal)),
        SerializedElement::Text(text) => Element::StringValue(text),
        SerializedElement::Unit(name) => {
            let unit = TemporalUnit::from_name(&name).ok_or_else(|| {
                DeserializeError::Validation(format!("unknown temporal unit '{name}'"))
            })?;
            Element::TemporalUnit(unit)
        }
        SerializedElement::ParenthesisLeft => Element::ParenthesisLeft,
        SerializedElement::ParenthesisRight => Element::ParenthesisRight,
        SerializedElement::Unknown(text) => Element::Unknown(text),
    })
}

fn deserialize_node(node: SerializedNode) -> Result<Arc<Metadata>, DeserializeError> {
    match node {
        SerializedNode::Leaf(elements) => {
            let elements = elements
                .into_iter()
                .map(deserialize_element)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Metadata::leaf(elements))
        }
        SerializedNode::Unary { op, child } => {
            Ok(Metadata::unary(operator(&op)?, deserialize_node(*child)?))
        }
        SerializedNode::Binary { op, left, right } => Ok(Metadata::binary(
            operator(&op)?,
            deserialize_node(*left)?,
            deserialize_node(*right)?,
        )),
        SerializedNode::Nary { op, children } => {
            let op = operator(&op)?;
            let children = children
                .into_iter()
                .map(deserialize_node)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Metadata::nary(op, children))
        }
        SerializedNode::When(child) => Ok(Metadata::when(deserialize_node(*child)?)),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn count_nodes(node: &SerializedNode) -> usize {
    1 + match node {
        SerializedNode::Leaf(_) => 0,
        SerializedNode::Unary { child, .. } | SerializedNode::When(child) => count_nodes(child),
        SerializedNode::Binary { left, right, .. } => count_nodes(left) + count_nodes(right),
        SerializedNode::Nary { children, .. } => children.iter().map(count_nodes).sum(),
    }
}

fn validate_node(node: &SerializedNode) -> Result<(), DeserializeError> {
    match node {
        SerializedNode::Leaf(_) => Ok(()),
        SerializedNode::Unary { child, .. } | SerializedNode::When(child) => validate_node(child),
        SerializedNode::Binary { left, right, .. } => {
            validate_node(left)?;
            validate_node(right)
        }
        SerializedNode::Nary { op, children } => {
            if children.is_empty() {
                return Err(DeserializeError::Validation(format!(
                    "empty n-ary '{op}' expression"
                )));
            }
            children.iter().try_for_each(validate_node)
        }
    }
}

fn validate(tree: &SerializedTree) -> Result<(), DeserializeError> {
    let actual = count_nodes(&tree.root);
    if tree.node_count != actual {
        return Err(DeserializeError::Validation(format!(
            "header says {} nodes but payload has {actual}",
            tree.node_count
        )));
    }
    validate_node(&tree.root)
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8], payload_len: u32) {
    let hash = blake3::hash(payload);

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash.as_bytes()[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

/// Encode a rule tree into a self-checking binary blob.
///
/// # Errors
///
/// Returns [`SerializeError`] if bincode fails or the payload is too large.
pub fn encode(metadata: &Metadata) -> Result<Vec<u8>, SerializeError> {
    let tree = SerializedTree {
        node_count: metadata.node_count(),
        root: serialize_node(metadata),
    };
    let payload = bincode::serde::encode_to_vec(&tree, bincode::config::standard())?;
    let payload_len =
        u32::try_from(payload.len()).map_err(|_| SerializeError::TooLarge(payload.len()))?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload, payload_len);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decode a blob produced by [`encode`].
///
/// # Errors
///
/// Returns [`DeserializeError`] on a bad header, a checksum or length
/// mismatch, or a payload that does not describe a well-formed tree.
pub fn decode(bytes: &[u8]) -> Result<Arc<Metadata>, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    if blake3::hash(payload).as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (tree, _): (SerializedTree, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    validate(&tree)?;
    deserialize_node(tree.root)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
