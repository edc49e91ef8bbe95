//! Artifact signing verification helpers
//!
//! This crate extracts public keys from X.509 certificates, verifies
//! ECDSA-SHA256 signatures over artifact files, and decodes the base64
//! transport encoding these inputs usually arrive in, using aws-lc-rs as
//! the cryptographic backend.
//!
//! A typical caller chains the three operations:
//!
//! ```no_run
//! use artifact_signer_crypto::{decode_base64, extract_public_key, verify_artifact_signature};
//!
//! # fn run(cert_b64: &str, sig_b64: &str) -> artifact_signer_crypto::Result<()> {
//! let certificate = decode_base64(cert_b64)?;
//! let public_key = extract_public_key(&certificate)?;
//! let signature = decode_base64(sig_b64)?;
//!
//! let outcome = verify_artifact_signature(&signature, &public_key, "release.tar.gz")?;
//! if let Some(notice) = outcome.notice() {
//!     eprintln!("{notice}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod encoding;
pub mod error;
pub mod hash;
pub mod verification;
pub mod x509;

pub use encoding::{decode_base64, encode_base64, CertificateDer, PublicKeyPem, PublicKeySpki};
pub use error::{Error, Result};
pub use hash::sha256_hex;
pub use verification::{
    verify_artifact_signature, ArtifactVerifier, NoticeMode, SigningScheme, VerificationKey,
    VerificationOutcome, VerifyOptions, FILE_NOT_FOUND_NOTICE, SIGNATURE_INVALID_NOTICE,
};
pub use x509::{extract_public_key, extract_public_key_spki, parse_certificate};
