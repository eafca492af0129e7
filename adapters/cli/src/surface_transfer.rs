use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use breach_planner_system_threat_map::{SurfaceEntry, SurfaceSnapshot};
use serde::{Deserialize, Serialize};

const TRANSFER_DOMAIN: &str = "threat";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded surface payload.
pub(crate) const TRANSFER_HEADER: &str = "threat:v1";
/// Delimiter used to separate the prefix, cell count and payload.
const FIELD_DELIMITER: char = ':';

#[derive(Serialize, Deserialize)]
struct SerializableSurface {
    entries: Vec<SurfaceEntry>,
}

/// Encodes a surface snapshot into a single-line transfer string.
pub(crate) fn encode(snapshot: &SurfaceSnapshot) -> Result<String, SurfaceTransferError> {
    let payload = SerializableSurface {
        entries: snapshot.entries.clone(),
    };
    let json = serde_json::to_vec(&payload).map_err(SurfaceTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{TRANSFER_HEADER}:{}:{encoded}",
        snapshot.entries.len()
    ))
}

/// Decodes a surface snapshot from its transfer string.
pub(crate) fn decode(value: &str) -> Result<SurfaceSnapshot, SurfaceTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SurfaceTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(SurfaceTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(SurfaceTransferError::MissingVersion)?;
    let count = parts.next().ok_or(SurfaceTransferError::MissingCount)?;
    let payload = parts.next().ok_or(SurfaceTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(SurfaceTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(SurfaceTransferError::UnsupportedVersion(version.to_owned()));
    }

    let expected = count
        .trim()
        .parse::<usize>()
        .map_err(|_| SurfaceTransferError::InvalidCount(count.to_owned()))?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(SurfaceTransferError::InvalidEncoding)?;
    let decoded: SerializableSurface =
        serde_json::from_slice(&bytes).map_err(SurfaceTransferError::InvalidPayload)?;

    if decoded.entries.len() != expected {
        return Err(SurfaceTransferError::CountMismatch {
            expected,
            found: decoded.entries.len(),
        });
    }

    Ok(SurfaceSnapshot {
        entries: decoded.entries,
    })
}

/// Errors that can occur while encoding or decoding surface transfer strings.
#[derive(Debug)]
pub(crate) enum SurfaceTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The cell count segment was missing.
    MissingCount,
    /// The payload segment was missing.
    MissingPayload,
    /// The string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The cell count could not be parsed.
    InvalidCount(String),
    /// The payload held a different number of cells than announced.
    CountMismatch {
        /// Cell count announced by the header.
        expected: usize,
        /// Cell count found in the payload.
        found: usize,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for SurfaceTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "surface string was empty"),
            Self::MissingPrefix => write!(f, "surface string is missing the prefix"),
            Self::MissingVersion => write!(f, "surface string is missing the version"),
            Self::MissingCount => write!(f, "surface string is missing the cell count"),
            Self::MissingPayload => write!(f, "surface string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "surface prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "surface version '{version}' is not supported")
            }
            Self::InvalidCount(count) => write!(f, "could not parse cell count '{count}'"),
            Self::CountMismatch { expected, found } => {
                write!(f, "surface announced {expected} cells but holds {found}")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode surface payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process surface payload: {error}")
            }
        }
    }
}

impl Error for SurfaceTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
