//! Diagnostic module identity attached to invocation spans.

use std::fmt;

/// Identity of the module hosting the adaptor, used only for tracing.
///
/// The identity is supplied once when the [`Dispatcher`] is constructed and
/// recorded on every invocation span, so concurrent handler invocations can
/// be attributed to the adaptor instance that scheduled them. It carries no
/// behavior.
///
/// [`Dispatcher`]: crate::Dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleIdentity {
    organization: String,
    name: String,
    version: String,
}

impl ModuleIdentity {
    /// Creates a module identity.
    #[must_use]
    pub fn new(
        organization: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Publishing organization.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Module version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ModuleIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.organization, self.name, self.version)
    }
}
