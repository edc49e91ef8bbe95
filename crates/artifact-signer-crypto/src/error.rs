//! Error types for artifact-signer-crypto

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting keys or verifying artifacts
#[derive(Error, Debug)]
pub enum Error {
    /// Certificate is not a well-formed PEM X.509 certificate
    #[error("Certificate error: {0}")]
    InvalidCertificate(String),

    /// Public key is not a well-formed PEM SubjectPublicKeyInfo
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Base64 decoding error
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The artifact path does not resolve to a file
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Signature did not verify against the key and artifact
    #[error("Verification error: {0}")]
    Verification(String),

    /// Key algorithm or curve cannot be used with ECDSA-SHA256
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// DER encoding/decoding error
    #[error("DER error: {0}")]
    Der(String),
}

/// Result type for artifact-signer-crypto operations
pub type Result<T> = std::result::Result<T, Error>;
