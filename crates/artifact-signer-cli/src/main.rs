//! Artifact signer command-line client
//!
//! Thin front-end over `artifact-signer-crypto`:
//!
//! ```sh
//! artifact-signer extract-key cert.pem
//! artifact-signer verify --certificate cert.pem --signature artifact.sig artifact.tar.gz
//! artifact-signer verify --public-key key.pem --signature-base64 MEUCIQ... artifact.tar.gz
//! artifact-signer decode-base64 aGVsbG8=
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use artifact_signer_crypto::{
    decode_base64, extract_public_key, ArtifactVerifier, VerificationOutcome,
};
use tracing_subscriber::EnvFilter;

use std::env;
use std::fs;
use std::io::Write;
use std::process;

const EXIT_VALID: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;
const EXIT_ERROR: i32 = 3;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("artifact-signer");

    if args.len() < 2 {
        print_usage(program);
        process::exit(EXIT_ERROR);
    }

    let command = &args[1];
    let result = match command.as_str() {
        "extract-key" => extract_key(&args[2..]).map(|()| EXIT_VALID),
        "verify" => verify(&args[2..]),
        "decode-base64" => decode(&args[2..]).map(|()| EXIT_VALID),
        "-h" | "--help" | "help" => {
            print_usage(program);
            Ok(EXIT_VALID)
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage(program);
            process::exit(EXIT_ERROR);
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Operation failed:\n{}", e);
            process::exit(EXIT_ERROR);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {} extract-key CERTIFICATE", program);
    eprintln!("  {} verify (--public-key FILE | --certificate FILE) (--signature FILE | --signature-base64 STRING) ARTIFACT", program);
    eprintln!("  {} decode-base64 STRING", program);
}

fn extract_key(args: &[String]) -> CliResult<()> {
    let [cert_path] = args else {
        return Err("extract-key expects exactly one CERTIFICATE argument".into());
    };
    let cert = fs::read(cert_path).map_err(|e| format!("Failed to read {}: {}", cert_path, e))?;
    let public_key = extract_public_key(&cert)?;
    print!("{}", public_key);
    Ok(())
}

fn decode(args: &[String]) -> CliResult<()> {
    let [input] = args else {
        return Err("decode-base64 expects exactly one STRING argument".into());
    };
    let bytes = decode_base64(input)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

fn verify(args: &[String]) -> CliResult<i32> {
    let args = VerifyArgs::parse(args)?;
    tracing::debug!(?args, "parsed verify arguments");

    let verifier = match &args.key {
        KeySource::PublicKey(path) => {
            let pem = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
            ArtifactVerifier::from_public_key_pem(pem)?
        }
        KeySource::Certificate(path) => {
            let pem = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
            ArtifactVerifier::from_certificate_pem(pem)?
        }
    };

    let signature = match &args.signature {
        SignatureSource::File(path) => {
            fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?
        }
        SignatureSource::Base64(encoded) => decode_base64(encoded)?,
    };

    let outcome = verifier.verify_file(&signature, &args.artifact);
    println!("{}", outcome.notice().unwrap_or("Signature is valid"));

    Ok(match outcome {
        VerificationOutcome::Valid => EXIT_VALID,
        VerificationOutcome::Invalid { .. } => EXIT_INVALID,
        VerificationOutcome::NotFound { .. } => EXIT_NOT_FOUND,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum KeySource {
    PublicKey(String),
    Certificate(String),
}

#[derive(Debug, PartialEq, Eq)]
enum SignatureSource {
    File(String),
    Base64(String),
}

#[derive(Debug, PartialEq, Eq)]
struct VerifyArgs {
    key: KeySource,
    signature: SignatureSource,
    artifact: String,
}

impl VerifyArgs {
    fn parse(args: &[String]) -> CliResult<Self> {
        let mut key: Option<KeySource> = None;
        let mut signature: Option<SignatureSource> = None;
        let mut artifact: Option<String> = None;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                flag @ ("--public-key" | "--certificate") => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| format!("Missing value for {}", flag))?
                        .clone();
                    if key.is_some() {
                        return Err("Only one of --public-key or --certificate may be given".into());
                    }
                    key = Some(if flag == "--public-key" {
                        KeySource::PublicKey(value)
                    } else {
                        KeySource::Certificate(value)
                    });
                }
                flag @ ("--signature" | "--signature-base64") => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or_else(|| format!("Missing value for {}", flag))?
                        .clone();
                    if signature.is_some() {
                        return Err(
                            "Only one of --signature or --signature-base64 may be given".into()
                        );
                    }
                    signature = Some(if flag == "--signature" {
                        SignatureSource::File(value)
                    } else {
                        SignatureSource::Base64(value)
                    });
                }
                arg if !arg.starts_with("--") => {
                    if artifact.is_some() {
                        return Err(format!("Unexpected argument: {}", arg).into());
                    }
                    artifact = Some(arg.to_string());
                }
                unknown => {
                    return Err(format!("Unknown option: {}", unknown).into());
                }
            }
            i += 1;
        }

        Ok(Self {
            key: key.ok_or("Missing required --public-key or --certificate")?,
            signature: signature.ok_or("Missing required --signature or --signature-base64")?,
            artifact: artifact.ok_or("Missing artifact path")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_verify_with_certificate() {
        let parsed = VerifyArgs::parse(&args(&[
            "--certificate",
            "cert.pem",
            "--signature",
            "a.sig",
            "a.bin",
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            VerifyArgs {
                key: KeySource::Certificate("cert.pem".to_string()),
                signature: SignatureSource::File("a.sig".to_string()),
                artifact: "a.bin".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_verify_artifact_first() {
        let parsed = VerifyArgs::parse(&args(&[
            "a.bin",
            "--signature-base64",
            "MEUC",
            "--public-key",
            "key.pem",
        ]))
        .unwrap();
        assert_eq!(parsed.key, KeySource::PublicKey("key.pem".to_string()));
        assert_eq!(parsed.signature, SignatureSource::Base64("MEUC".to_string()));
        assert_eq!(parsed.artifact, "a.bin");
    }

    #[test]
    fn test_parse_verify_missing_value() {
        let err = VerifyArgs::parse(&args(&["a.bin", "--signature"])).unwrap_err();
        assert_eq!(err.to_string(), "Missing value for --signature");
    }

    #[test]
    fn test_parse_verify_conflicting_keys() {
        let result = VerifyArgs::parse(&args(&[
            "--public-key",
            "k.pem",
            "--certificate",
            "c.pem",
            "--signature",
            "a.sig",
            "a.bin",
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_verify_missing_artifact() {
        let err = VerifyArgs::parse(&args(&["--public-key", "k.pem", "--signature", "a.sig"]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing artifact path");
    }

    #[test]
    fn test_parse_verify_unknown_option() {
        assert!(VerifyArgs::parse(&args(&["--staging"])).is_err());
    }

    #[test]
    fn test_verify_exit_codes() {
        let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/../artifact-signer-crypto/tests/fixtures");
        let base = args(&[
            "--certificate",
            &format!("{}/p256-cert.pem", fixtures),
            "--signature",
            &format!("{}/p256-artifact.sig", fixtures),
        ]);

        let mut valid = base.clone();
        valid.push(format!("{}/artifact.txt", fixtures));
        assert_eq!(verify(&valid).unwrap(), EXIT_VALID);

        let tampered = tempfile::NamedTempFile::new().unwrap();
        fs::write(tampered.path(), b"something else entirely\n").unwrap();
        let mut invalid = base.clone();
        invalid.push(tampered.path().display().to_string());
        assert_eq!(verify(&invalid).unwrap(), EXIT_INVALID);

        let mut missing = base;
        missing.push("/tmp/does-not-exist.bin".to_string());
        assert_eq!(verify(&missing).unwrap(), EXIT_NOT_FOUND);
    }
}
