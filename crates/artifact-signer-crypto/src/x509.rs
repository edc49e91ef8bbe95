//! X.509 certificate utilities
//!
//! This module parses PEM certificates and pulls out the embedded
//! SubjectPublicKeyInfo, whatever key algorithm the certificate declares.

use crate::encoding::{CertificateDer, PublicKeyPem, PublicKeySpki};
use crate::error::{Error, Result};
use x509_cert::der::{Decode, Encode};
use x509_cert::Certificate;

/// Parse a PEM-encoded X.509 certificate
pub fn parse_certificate(certificate_pem: impl AsRef<[u8]>) -> Result<Certificate> {
    let der = CertificateDer::from_pem(certificate_pem)?;
    Certificate::from_der(der.as_bytes())
        .map_err(|e| Error::InvalidCertificate(format!("failed to parse certificate: {}", e)))
}

/// Extract the public key of a PEM certificate as DER SubjectPublicKeyInfo
pub fn extract_public_key_spki(certificate_pem: impl AsRef<[u8]>) -> Result<PublicKeySpki> {
    let cert = parse_certificate(certificate_pem)?;
    let public_key_info = &cert.tbs_certificate.subject_public_key_info;

    tracing::debug!(
        subject = %cert.tbs_certificate.subject,
        algorithm = %public_key_info.algorithm.oid,
        "extracted public key from certificate"
    );

    let der = public_key_info
        .to_der()
        .map_err(|e| Error::Der(format!("failed to encode SPKI: {}", e)))?;
    PublicKeySpki::from_der(der)
}

/// Extract the public key of a PEM certificate, re-encoded as a PEM
/// `PUBLIC KEY` (SubjectPublicKeyInfo) block
pub fn extract_public_key(certificate_pem: impl AsRef<[u8]>) -> Result<PublicKeyPem> {
    Ok(extract_public_key_spki(certificate_pem)?.to_pem())
}
