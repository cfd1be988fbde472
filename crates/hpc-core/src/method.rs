//! Method resolution: `/<service>/<method>` → `Service.Method`.

use std::fmt;

use percent_encoding::percent_decode_str;

use crate::error::CodecError;
use crate::naming::snake_to_pascal;

/// A `"<Service>.<Method>"` lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedMethod {
    service: String,
    method: String,
}

impl QualifiedMethod {
    /// Build a key from already PascalCased names.
    pub fn new(service: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
        }
    }

    /// Parse the service and method names from a request path.
    ///
    /// The segment before the leading `/` is ignored, the next one names the
    /// service and the one after that the method. Anything past the method
    /// segment is ignored. Each segment is percent-decoded before casing
    /// conversion; one that is not UTF-8 once decoded, or is empty after
    /// conversion, counts as missing.
    pub fn from_path(path: &str) -> Result<Self, CodecError> {
        let mut segments = path.split('/').skip(1);

        let service = segments
            .next()
            .and_then(decode_segment)
            .ok_or(CodecError::ServiceMissing)?;

        let method = segments
            .next()
            .and_then(decode_segment)
            .ok_or(CodecError::MethodMissing)?;

        Ok(Self { service, method })
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

fn decode_segment(raw: &str) -> Option<String> {
    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let name = snake_to_pascal(&decoded);
    (!name.is_empty()).then_some(name)
}

impl fmt::Display for QualifiedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}
