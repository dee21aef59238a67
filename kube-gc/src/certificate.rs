//! Finds certificates whose issuance failed by correlating them with the secrets they should have produced.

use std::{collections::HashMap, fmt};

use base64::Engine;
use log::warn;
use time::{Duration, OffsetDateTime};

use crate::{
    cluster::{ClusterApi, QueryError},
    kubectl::{Certificate, Secret},
    resource::{DeletionCandidate, ResourceKind, ResourceRef},
};

mod openssl;
pub use openssl::*;

/// Certificates younger than this may still be in the middle of being issued.
pub const ISSUANCE_GRACE_PERIOD: Duration = Duration::HOUR;

/// Extracts the expiry date from a PEM encoded X.509 certificate.
pub trait CertificateDecoder {
    fn not_after(&self, pem: &[u8]) -> Result<OffsetDateTime, Box<dyn std::error::Error + Send + Sync>>;
}

/// All secrets of one audit, keyed by `namespace/name`.
pub struct SecretIndex<'a> {
    secrets: HashMap<String, &'a Secret>,
}

impl<'a> SecretIndex<'a> {
    /// Later secrets replace earlier ones with the same key.
    pub fn build(secrets: &'a [Secret]) -> Self {
        Self {
            secrets: secrets
                .iter()
                .map(|secret| {
                    (
                        Self::key(&secret.metadata.namespace, &secret.metadata.name),
                        secret,
                    )
                })
                .collect(),
        }
    }

    fn key(namespace: &str, name: &str) -> String {
        format!("{namespace}/{name}")
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&'a Secret> {
        self.secrets.get(&Self::key(namespace, name)).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceMethod {
    Http01,
    Dns01,
    Unknown,
}

impl IssuanceMethod {
    pub fn of(certificate: &Certificate) -> Self {
        match certificate.acme_config() {
            Some(config) if config.http01.is_some() => IssuanceMethod::Http01,
            Some(config) if config.dns01.is_some() => IssuanceMethod::Dns01,
            _ => IssuanceMethod::Unknown,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            IssuanceMethod::Http01 => "http",
            IssuanceMethod::Dns01 => "dns",
            IssuanceMethod::Unknown => "unknown",
        }
    }
}

impl fmt::Display for IssuanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backing secret exists but its certificate could not be read. Reported, never acted upon.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationAmbiguity {
    #[error("secret has no `tls.crt` entry")]
    MissingCertificate,

    #[error("`tls.crt` is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("`tls.crt` is not a readable certificate: {0}")]
    UnreadableCertificate(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug)]
pub enum Expiry {
    /// There is no backing secret.
    NotIssued,
    Valid(OffsetDateTime),
    Expired(OffsetDateTime),
    Unreadable(ClassificationAmbiguity),
}

impl Expiry {
    fn of(secret: &Secret, decoder: &impl CertificateDecoder, now: OffsetDateTime) -> Self {
        match read_not_after(secret, decoder) {
            Ok(not_after) if not_after < now => Expiry::Expired(not_after),
            Ok(not_after) => Expiry::Valid(not_after),
            Err(ambiguity) => Expiry::Unreadable(ambiguity),
        }
    }
}

fn read_not_after(
    secret: &Secret,
    decoder: &impl CertificateDecoder,
) -> Result<OffsetDateTime, ClassificationAmbiguity> {
    let encoded = secret
        .tls_certificate()
        .ok_or(ClassificationAmbiguity::MissingCertificate)?;
    let pem = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    decoder
        .not_after(&pem)
        .map_err(ClassificationAmbiguity::UnreadableCertificate)
}

#[derive(Debug)]
pub struct CertificateRecord {
    pub name: String,
    pub namespace: String,
    pub domains: Vec<String>,
    pub secret_name: Option<String>,
    pub issuance_method: IssuanceMethod,
    pub created_at: Option<OffsetDateTime>,
    pub exists: bool,
    pub expiry: Expiry,
}

impl CertificateRecord {
    pub fn new(
        certificate: &Certificate,
        secrets: &SecretIndex<'_>,
        decoder: &impl CertificateDecoder,
        now: OffsetDateTime,
    ) -> Self {
        let metadata = &certificate.metadata;
        let secret = certificate
            .spec
            .secret_name
            .as_deref()
            .and_then(|secret_name| secrets.get(&metadata.namespace, secret_name));

        let expiry = match secret {
            Some(secret) => Expiry::of(secret, decoder, now),
            None => Expiry::NotIssued,
        };

        if let Expiry::Unreadable(ambiguity) = &expiry {
            warn!(
                "certificate {}/{}: {ambiguity}",
                metadata.namespace, metadata.name
            );
        }

        let domains = match certificate.acme_config() {
            Some(config) if !config.domains.is_empty() => config.domains.clone(),
            _ => certificate.spec.dns_names.clone(),
        };

        Self {
            name: metadata.name.clone(),
            namespace: metadata.namespace.clone(),
            domains,
            secret_name: certificate.spec.secret_name.clone(),
            issuance_method: IssuanceMethod::of(certificate),
            created_at: metadata.creation_timestamp,
            exists: secret.is_some(),
            expiry,
        }
    }

    /// Whether issuance failed: no secret was produced even though the grace period has passed. A missing creation
    /// timestamp never counts as old.
    pub fn is_failed(&self, now: OffsetDateTime) -> bool {
        !self.exists
            && self
                .created_at
                .is_some_and(|created_at| created_at <= now - ISSUANCE_GRACE_PERIOD)
    }

    fn resource(&self) -> ResourceRef {
        ResourceRef {
            kind: ResourceKind::Certificate,
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
            annotations: HashMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct Audit {
    /// One record per certificate, in snapshot order.
    pub records: Vec<CertificateRecord>,
    pub candidates: Vec<DeletionCandidate>,
}

impl Audit {
    pub fn ambiguities(&self) -> impl Iterator<Item = (&CertificateRecord, &ClassificationAmbiguity)> {
        self.records.iter().filter_map(|record| match &record.expiry {
            Expiry::Unreadable(ambiguity) => Some((record, ambiguity)),
            _ => None,
        })
    }
}

/// Classifies `certificates` against `secrets`.
pub fn audit(
    secrets: &[Secret],
    certificates: &[Certificate],
    decoder: &impl CertificateDecoder,
    now: OffsetDateTime,
) -> Audit {
    let index = SecretIndex::build(secrets);

    let records = certificates
        .iter()
        .map(|certificate| CertificateRecord::new(certificate, &index, decoder, now))
        .collect::<Vec<_>>();

    let candidates = records
        .iter()
        .filter(|record| record.is_failed(now))
        .map(|record| DeletionCandidate::new(record.resource(), "certificate was never issued", now))
        .collect();

    Audit {
        records,
        candidates,
    }
}

/// Takes a cluster wide snapshot of secrets and certificates and audits it.
pub fn audit_cluster(
    cluster: &impl ClusterApi,
    decoder: &impl CertificateDecoder,
    now: OffsetDateTime,
) -> Result<Audit, QueryError> {
    let secrets = cluster.secrets()?;
    let certificates = cluster.certificates()?;
    Ok(audit(&secrets, &certificates, decoder, now))
}
