use std::collections::HashMap;

use serde::Deserialize;

use super::ResourceMetadata;

/// Partially implements the cert-manager
/// [Certificate](https://cert-manager.io/docs/reference/api-docs/#cert-manager.io/v1.Certificate). Both the
/// `certmanager.k8s.io/v1alpha1` ACME layout (`spec.acme.config`) and the `cert-manager.io/v1` layout
/// (`spec.dnsNames`) are read.
#[derive(Debug, Clone, Deserialize)]
pub struct Certificate {
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub spec: CertificateSpec,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSpec {
    /// Name of the secret the issued key pair is stored in.
    #[serde(default)]
    pub secret_name: Option<String>,

    #[serde(default)]
    pub dns_names: Vec<String>,

    #[serde(default)]
    pub acme: Option<AcmeCertificateConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcmeCertificateConfig {
    #[serde(default)]
    pub config: Vec<AcmeDomainConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcmeDomainConfig {
    #[serde(default)]
    pub domains: Vec<String>,

    /// Present (usually as an empty object) when the domains are solved through the HTTP-01 challenge.
    #[serde(default)]
    pub http01: Option<serde_json::Value>,

    /// Present when the domains are solved through the DNS-01 challenge.
    #[serde(default)]
    pub dns01: Option<serde_json::Value>,
}

impl Certificate {
    /// The first ACME domain configuration, which is the only one considered.
    pub fn acme_config(&self) -> Option<&AcmeDomainConfig> {
        self.spec
            .acme
            .as_ref()
            .and_then(|acme| acme.config.first())
    }
}

/// [Secret](https://kubernetes.io/docs/reference/kubernetes-api/config-and-storage-resources/secret-v1/). Values in
/// `data` are base64 encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret {
    pub metadata: ResourceMetadata,
    #[serde(default)]
    pub data: Option<HashMap<String, String>>,
}

pub const TLS_CERT_KEY: &str = "tls.crt";

impl Secret {
    /// The base64 encoded PEM certificate chain stored under `tls.crt`.
    pub fn tls_certificate(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.get(TLS_CERT_KEY))
            .map(String::as_str)
    }
}
