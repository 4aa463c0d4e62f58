use std::fmt;
use std::sync::Arc;

use crate::DiscoveryError;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;

/// The fully-qualified question a service resolves through:
/// `<service>.service.<datacenter>.<domain>.`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceQuery {
    service: Arc<str>,
    name: Arc<str>,
}

impl ServiceQuery {
    pub fn new(service: &str, datacenter: &str, domain: &str) -> Result<Self, DiscoveryError> {
        let domain = domain.strip_suffix('.').unwrap_or(domain);

        for (part, value) in [
            ("service", service),
            ("datacenter", datacenter),
            ("domain", domain),
        ] {
            if value.is_empty() {
                return Err(DiscoveryError::InvalidServiceName(format!(
                    "{} cannot be empty",
                    part
                )));
            }
        }

        let name = format!("{}.service.{}.{}.", service, datacenter, domain);
        validate_name(&name)?;

        Ok(Self {
            service: Arc::from(service),
            name: Arc::from(name),
        })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Canonical, dot-terminated query name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ServiceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn validate_name(name: &str) -> Result<(), DiscoveryError> {
    if name.len() > MAX_NAME_LEN {
        return Err(DiscoveryError::InvalidServiceName(format!(
            "'{}' exceeds {} bytes",
            name, MAX_NAME_LEN
        )));
    }

    let trimmed = name.strip_suffix('.').unwrap_or(name);
    for label in trimmed.split('.') {
        if label.is_empty() {
            return Err(DiscoveryError::InvalidServiceName(format!(
                "'{}' contains an empty label",
                name
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DiscoveryError::InvalidServiceName(format!(
                "label '{}' exceeds {} bytes",
                label, MAX_LABEL_LEN
            )));
        }
        if label.bytes().any(|b| b.is_ascii_whitespace() || !b.is_ascii()) {
            return Err(DiscoveryError::InvalidServiceName(format!(
                "label '{}' contains whitespace or non-ASCII characters",
                label
            )));
        }
    }

    Ok(())
}
