// ─────────────────────────────────────────────────────────────────────
// SCPN Lattice Flow — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Numerical failure at step {step}: {message}")]
    Numerical { step: usize, message: String },

    #[error("Grid shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Snapshot container error: {0}")]
    Container(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LatticeResult<T> = Result<T, LatticeError>;
