//! Artifact signature verification using aws-lc-rs
//!
//! Signatures are ASN.1 DER `ECDSA-Sig-Value`s over the SHA-256 digest of
//! the artifact bytes. The curve is taken from the public key.

use crate::encoding::PublicKeySpki;
use crate::error::{Error, Result};
use crate::hash::sha256_hex;
use crate::x509::extract_public_key_spki;
use aws_lc_rs::signature::{
    EcdsaVerificationAlgorithm, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA256_ASN1,
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use std::path::{Path, PathBuf};

/// Notice emitted for a signature that does not verify
pub const SIGNATURE_INVALID_NOTICE: &str = "Signature is invalid";

/// Notice emitted for an artifact that could not be read
pub const FILE_NOT_FOUND_NOTICE: &str = "File not found";

/// Supported signing schemes
///
/// The digest is always SHA-256; only the curve varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-256
    EcdsaP384Sha256,
}

impl SigningScheme {
    /// Get the name of this scheme
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP384Sha256 => "ECDSA_P384_SHA256",
        }
    }

    /// Determine the scheme from a SubjectPublicKeyInfo
    pub fn from_spki(spki: &PublicKeySpki) -> Result<Self> {
        let alg_oid = spki.algorithm_oid()?;
        if alg_oid != ID_EC_PUBLIC_KEY {
            return Err(Error::UnsupportedAlgorithm(format!(
                "ECDSA-SHA256 requires an EC public key, got algorithm {}",
                alg_oid
            )));
        }

        match spki.parameters_oid()? {
            Some(curve) if curve == SECP_256_R_1 => Ok(SigningScheme::EcdsaP256Sha256),
            Some(curve) if curve == SECP_384_R_1 => Ok(SigningScheme::EcdsaP384Sha256),
            Some(curve) => Err(Error::UnsupportedAlgorithm(format!(
                "unsupported EC curve {}",
                curve
            ))),
            None => Err(Error::InvalidKey(
                "EC key is missing named curve parameters".to_string(),
            )),
        }
    }

    fn algorithm(&self) -> &'static EcdsaVerificationAlgorithm {
        match self {
            SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
            SigningScheme::EcdsaP384Sha256 => &ECDSA_P384_SHA256_ASN1,
        }
    }
}

/// A public key for verification
#[derive(Debug, Clone)]
pub struct VerificationKey {
    spki: PublicKeySpki,
    scheme: SigningScheme,
}

impl VerificationKey {
    /// Create a verification key from DER SubjectPublicKeyInfo
    pub fn from_spki(spki: PublicKeySpki) -> Result<Self> {
        let scheme = SigningScheme::from_spki(&spki)?;
        tracing::debug!(scheme = scheme.name(), "loaded verification key");
        Ok(Self { spki, scheme })
    }

    /// Create a verification key from a PEM `PUBLIC KEY` block
    pub fn from_pem(public_key_pem: impl AsRef<[u8]>) -> Result<Self> {
        Self::from_spki(PublicKeySpki::from_pem(public_key_pem)?)
    }

    /// The scheme this key verifies with
    pub fn scheme(&self) -> SigningScheme {
        self.scheme
    }

    /// Verify a signature over data
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let key = UnparsedPublicKey::new(self.scheme.algorithm(), self.spki.as_bytes());
        key.verify(data, signature).map_err(|_| {
            Error::Verification(format!("{} signature invalid", self.scheme.name()))
        })
    }
}

/// Result of checking one artifact against one signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The signature matches the artifact and key
    Valid,
    /// The signature does not match
    Invalid {
        /// Backend description of the failure
        reason: String,
    },
    /// The artifact path does not resolve to a readable file
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },
}

impl VerificationOutcome {
    /// Whether the signature verified
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Valid)
    }

    /// Human-readable notice for a failed outcome
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            VerificationOutcome::Valid => None,
            VerificationOutcome::Invalid { .. } => Some(SIGNATURE_INVALID_NOTICE),
            VerificationOutcome::NotFound { .. } => Some(FILE_NOT_FOUND_NOTICE),
        }
    }

    /// Convert into a `Result`, turning failed outcomes into errors
    pub fn into_result(self) -> Result<()> {
        match self {
            VerificationOutcome::Valid => Ok(()),
            VerificationOutcome::Invalid { reason } => Err(Error::Verification(reason)),
            VerificationOutcome::NotFound { path } => Err(Error::ArtifactNotFound(path)),
        }
    }
}

/// How failed outcomes are surfaced besides the return value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoticeMode {
    /// Return the outcome only
    #[default]
    Silent,
    /// Also emit the notice text as a `warn` event
    Log,
}

/// Options for artifact verification
#[derive(Debug, Clone, Default)]
pub struct VerifyOptions {
    /// Notice reporting mode
    pub notices: NoticeMode,
}

impl VerifyOptions {
    /// Emit notices for failed outcomes through `tracing`
    pub fn log_notices(mut self) -> Self {
        self.notices = NoticeMode::Log;
        self
    }
}

/// Verifies artifacts against a single parsed public key
///
/// Parsing happens once at construction; each `verify_*` call is an
/// independent single attempt and the verifier can be shared across threads.
#[derive(Debug, Clone)]
pub struct ArtifactVerifier {
    key: VerificationKey,
    options: VerifyOptions,
}

impl ArtifactVerifier {
    /// Create a verifier for an already parsed key
    pub fn new(key: VerificationKey) -> Self {
        Self {
            key,
            options: VerifyOptions::default(),
        }
    }

    /// Create a verifier from a PEM `PUBLIC KEY` block
    pub fn from_public_key_pem(public_key_pem: impl AsRef<[u8]>) -> Result<Self> {
        Ok(Self::new(VerificationKey::from_pem(public_key_pem)?))
    }

    /// Create a verifier from the key embedded in a PEM certificate
    pub fn from_certificate_pem(certificate_pem: impl AsRef<[u8]>) -> Result<Self> {
        let spki = extract_public_key_spki(certificate_pem)?;
        Ok(Self::new(VerificationKey::from_spki(spki)?))
    }

    /// Replace the verification options
    pub fn with_options(mut self, options: VerifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Verify a signature over in-memory artifact bytes
    pub fn verify_bytes(&self, signature: &[u8], data: &[u8]) -> VerificationOutcome {
        tracing::debug!(
            len = data.len(),
            sha256 = %sha256_hex(data),
            scheme = self.key.scheme().name(),
            "verifying artifact signature"
        );

        let outcome = match self.key.verify(data, signature) {
            Ok(()) => VerificationOutcome::Valid,
            Err(e) => VerificationOutcome::Invalid {
                reason: e.to_string(),
            },
        };
        self.report(outcome)
    }

    /// Read the artifact at `path` in full and verify a signature over it
    ///
    /// Any failure to read the artifact (missing, a directory, no
    /// permission) yields `VerificationOutcome::NotFound`.
    pub fn verify_file(&self, signature: &[u8], path: impl AsRef<Path>) -> VerificationOutcome {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "failed to read artifact");
                return self.report(VerificationOutcome::NotFound {
                    path: path.to_path_buf(),
                });
            }
        };

        tracing::debug!(path = %path.display(), "read artifact");
        self.verify_bytes(signature, &data)
    }

    fn report(&self, outcome: VerificationOutcome) -> VerificationOutcome {
        if self.options.notices == NoticeMode::Log {
            match &outcome {
                VerificationOutcome::Valid => {}
                VerificationOutcome::Invalid { reason } => {
                    tracing::warn!(%reason, "{}", SIGNATURE_INVALID_NOTICE);
                }
                VerificationOutcome::NotFound { path } => {
                    tracing::warn!(path = %path.display(), "{}", FILE_NOT_FOUND_NOTICE);
                }
            }
        }
        outcome
    }
}

/// Verify an ECDSA-SHA256 signature over the file at `artifact_path`
///
/// The public key is parsed before the artifact is read, so a malformed key
/// is reported as `Error::InvalidKey` even when the path is missing.
pub fn verify_artifact_signature(
    signature: impl AsRef<[u8]>,
    public_key_pem: impl AsRef<[u8]>,
    artifact_path: impl AsRef<Path>,
) -> Result<VerificationOutcome> {
    let verifier = ArtifactVerifier::from_public_key_pem(public_key_pem)?;
    Ok(verifier.verify_file(signature.as_ref(), artifact_path))
}
