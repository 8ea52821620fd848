//! Token request options and builder.

use serde::{Deserialize, Serialize};

use crate::error::SaslError;

/// Scope requested when no options are supplied.
pub const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Options passed to the token provider for every exchange.
///
/// Use [`TokenRequestOptions::builder`] to create custom instances; the
/// [`Default`] requests [`DEFAULT_SCOPE`] with continuous access evaluation
/// disabled.
///
/// Options can also be loaded from configuration, missing keys take the
/// default values:
///
/// ```rust
/// use sasl_oauthbearer::TokenRequestOptions;
///
/// let options: TokenRequestOptions = serde_json::from_str(
///     r#"{ "scopes": ["api://kafka/.default"], "enableCae": true }"#,
/// )?;
/// assert!(options.enable_cae());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenRequestOptions {
    scopes: Vec<String>,
    enable_cae: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    claims: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
}

impl Default for TokenRequestOptions {
    fn default() -> Self {
        Self {
            scopes: vec![DEFAULT_SCOPE.to_string()],
            enable_cae: false,
            claims: None,
            tenant_id: None,
        }
    }
}

impl TokenRequestOptions {
    /// Creates an empty builder.
    pub fn builder() -> TokenRequestOptionsBuilder {
        TokenRequestOptionsBuilder::default()
    }

    /// Returns the requested scopes.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns `true` if continuous access evaluation is requested.
    pub fn enable_cae(&self) -> bool {
        self.enable_cae
    }

    /// Returns the additional claims challenge, if any.
    pub fn claims(&self) -> Option<&str> {
        self.claims.as_deref()
    }

    /// Returns the tenant override, if any.
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// Checks that at least one non-blank scope is requested.
    ///
    /// # Errors
    ///
    /// Returns [`SaslError::InvalidConfiguration`] otherwise.
    pub fn validate(&self) -> Result<(), SaslError> {
        if self.scopes.is_empty() {
            return Err(SaslError::configuration(
                "at least one scope is required",
            ));
        }
        if self.scopes.iter().any(|scope| scope.trim().is_empty()) {
            return Err(SaslError::configuration("scopes must not be blank"));
        }
        Ok(())
    }
}

/// Builder for [`TokenRequestOptions`].
#[derive(Debug, Clone, Default)]
pub struct TokenRequestOptionsBuilder {
    scopes: Vec<String>,
    enable_cae: bool,
    claims: Option<String>,
    tenant_id: Option<String>,
}

impl TokenRequestOptionsBuilder {
    /// Adds a scope.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds multiple scopes.
    #[must_use]
    pub fn add_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Enables or disables continuous access evaluation.
    #[must_use]
    pub fn with_cae(mut self, enable_cae: bool) -> Self {
        self.enable_cae = enable_cae;
        self
    }

    /// Sets the additional claims challenge.
    #[must_use]
    pub fn with_claims(mut self, claims: impl Into<String>) -> Self {
        self.claims = Some(claims.into());
        self
    }

    /// Sets the tenant override.
    #[must_use]
    pub fn with_tenant_id(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Builds the options.
    ///
    /// # Errors
    ///
    /// Returns [`SaslError::InvalidConfiguration`] if no scope was added or a
    /// scope is blank.
    pub fn build(self) -> Result<TokenRequestOptions, SaslError> {
        let options = TokenRequestOptions {
            scopes: self.scopes,
            enable_cae: self.enable_cae,
            claims: self.claims,
            tenant_id: self.tenant_id,
        };
        options.validate()?;
        Ok(options)
    }
}
