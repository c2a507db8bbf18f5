use serde::{Deserialize, Serialize};

use crate::{
    output::Output,
    resources::{ProjectId, PropertyValue, ResourceSpec},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum PublicKeyType {
    #[serde(rename = "TYPE_X509_PEM_FILE")]
    X509PemFile,
    #[serde(rename = "TYPE_RAW_PUBLIC_KEY")]
    RawPublicKey,
}

impl PublicKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicKeyType::X509PemFile => "TYPE_X509_PEM_FILE",
            PublicKeyType::RawPublicKey => "TYPE_RAW_PUBLIC_KEY",
        }
    }
}

/// A long-lived key for a service account. The private half only exists in
/// the engine's (encrypted) state after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Fully qualified name of the owning account.
    pub service_account_id: Output,
    pub public_key_type: PublicKeyType,
}

impl ResourceSpec for Key {
    fn type_token(&self) -> &'static str {
        "gcp:serviceaccount:Key"
    }

    fn project(&self) -> Option<&ProjectId> {
        None
    }

    fn properties(&self) -> Vec<(&'static str, PropertyValue)> {
        vec![
            ("serviceAccountId", self.service_account_id.clone().into()),
            (
                "publicKeyType",
                Output::known(self.public_key_type.as_str()).into(),
            ),
        ]
    }

    fn output_names(&self) -> &'static [&'static str] {
        &["name", "privateKey", "publicKey", "validAfter", "validBefore"]
    }

    fn secret_outputs(&self) -> &'static [&'static str] {
        &["privateKey"]
    }
}
