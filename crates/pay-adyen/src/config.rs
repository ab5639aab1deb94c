//! # Adyen Configuration
//!
//! Configuration management for the Adyen integration.
//! All secrets are loaded from environment variables.

use pay_core::PaymentError;
use std::env;
use std::fmt;

const CHECKOUT_API_VERSION: &str = "v71";
const BALANCE_PLATFORM_API_VERSION: &str = "v2";
const LEGAL_ENTITY_API_VERSION: &str = "v3";

/// Adyen environment the keys belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Test,
    Live,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Test => "test",
            Environment::Live => "live",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "live" => Ok(Environment::Live),
            other => Err(PaymentError::Configuration(format!(
                "ADYEN_ENVIRONMENT must be 'test' or 'live', got '{}'",
                other
            ))),
        }
    }
}

/// Adyen API configuration
#[derive(Clone)]
pub struct AdyenConfig {
    /// API key of the web service user
    pub api_key: String,

    /// Merchant account payments are booked on
    pub merchant_account: String,

    /// Client key for the frontend components (test_... or live_...)
    pub client_key: String,

    /// Hex-encoded HMAC key for notification signatures
    pub hmac_key: String,

    /// API key for the balance platform (defaults to `api_key`)
    pub balance_platform_api_key: String,

    /// API key for legal entity management (defaults to `api_key`)
    pub legal_entity_api_key: String,

    pub environment: Environment,

    /// Checkout API base URL, including the version
    pub checkout_base_url: String,

    /// Balance platform (configuration) API base URL
    pub balance_platform_base_url: String,

    /// Legal entity management API base URL
    pub legal_entity_base_url: String,
}

impl AdyenConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `ADYEN_API_KEY`
    /// - `ADYEN_MERCHANT_ACCOUNT`
    /// - `ADYEN_CLIENT_KEY`
    /// - `ADYEN_HMAC_KEY`
    ///
    /// Optional: `ADYEN_ENVIRONMENT` (`test` by default),
    /// `ADYEN_LIVE_URL_PREFIX` (required for live), `ADYEN_BCL_API_KEY`,
    /// `ADYEN_LEM_API_KEY`.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`AdyenConfig::from_env`], reading values through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
        };

        let api_key = required("ADYEN_API_KEY")?;
        let merchant_account = required("ADYEN_MERCHANT_ACCOUNT")?;
        let client_key = required("ADYEN_CLIENT_KEY")?;
        let hmac_key = required("ADYEN_HMAC_KEY")?;

        let environment: Environment = lookup("ADYEN_ENVIRONMENT")
            .unwrap_or_else(|| "test".to_string())
            .trim()
            .parse()?;

        let prefix = format!("{}_", environment.as_str());
        if !client_key.starts_with(&prefix) {
            return Err(PaymentError::Configuration(format!(
                "ADYEN_CLIENT_KEY must start with {} in the {} environment",
                prefix,
                environment.as_str()
            )));
        }

        if hex::decode(&hmac_key).is_err() {
            return Err(PaymentError::Configuration(
                "ADYEN_HMAC_KEY must be hex encoded".to_string(),
            ));
        }

        let mut config = Self::new(api_key, merchant_account, client_key, hmac_key);

        if let Ok(key) = required("ADYEN_BCL_API_KEY") {
            config.balance_platform_api_key = key;
        }
        if let Ok(key) = required("ADYEN_LEM_API_KEY") {
            config.legal_entity_api_key = key;
        }

        if environment == Environment::Live {
            let live_prefix = required("ADYEN_LIVE_URL_PREFIX")?;
            config = config.live(&live_prefix);
        }

        Ok(config)
    }

    /// Create a test-environment config with explicit values
    pub fn new(
        api_key: impl Into<String>,
        merchant_account: impl Into<String>,
        client_key: impl Into<String>,
        hmac_key: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        Self {
            balance_platform_api_key: api_key.clone(),
            legal_entity_api_key: api_key.clone(),
            api_key,
            merchant_account: merchant_account.into(),
            client_key: client_key.into(),
            hmac_key: hmac_key.into(),
            environment: Environment::Test,
            checkout_base_url: format!(
                "https://checkout-test.adyen.com/{}",
                CHECKOUT_API_VERSION
            ),
            balance_platform_base_url: format!(
                "https://balanceplatform-api-test.adyen.com/bcl/{}",
                BALANCE_PLATFORM_API_VERSION
            ),
            legal_entity_base_url: format!(
                "https://kyc-test.adyen.com/lem/{}",
                LEGAL_ENTITY_API_VERSION
            ),
        }
    }

    /// Switch to live endpoints using the merchant-specific URL prefix
    pub fn live(mut self, url_prefix: &str) -> Self {
        self.environment = Environment::Live;
        self.checkout_base_url = format!(
            "https://{}-checkout-live.adyenpayments.com/checkout/{}",
            url_prefix, CHECKOUT_API_VERSION
        );
        self.balance_platform_base_url = format!(
            "https://balanceplatform-api-live.adyen.com/bcl/{}",
            BALANCE_PLATFORM_API_VERSION
        );
        self.legal_entity_base_url = format!(
            "https://kyc-live.adyen.com/lem/{}",
            LEGAL_ENTITY_API_VERSION
        );
        self
    }

    pub fn is_test_mode(&self) -> bool {
        self.environment == Environment::Test
    }

    /// Builder: point every API at one base URL (for testing/mocking)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.checkout_base_url = url.clone();
        self.balance_platform_base_url = url.clone();
        self.legal_entity_base_url = url;
        self
    }
}

impl fmt::Debug for AdyenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdyenConfig")
            .field("merchant_account", &self.merchant_account)
            .field("client_key", &self.client_key)
            .field("environment", &self.environment)
            .field("checkout_base_url", &self.checkout_base_url)
            .field("api_key", &"<redacted>")
            .field("hmac_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::HmacValidator;
    use std::collections::HashMap;

    fn config() -> AdyenConfig {
        AdyenConfig::new("AQE_key", "TestMerchant", "test_CLIENT", "44782DEF")
    }

    #[test]
    fn test_default_endpoints() {
        let config = config();
        assert!(config.is_test_mode());
        assert_eq!(config.checkout_base_url, "https://checkout-test.adyen.com/v71");
        assert_eq!(config.balance_platform_api_key, "AQE_key");
        assert_eq!(config.legal_entity_api_key, "AQE_key");
    }

    #[test]
    fn test_live_endpoints() {
        let config = config().live("1797a841fbb37ca7-AdyenDemo");
        assert_eq!(config.environment, Environment::Live);
        assert_eq!(
            config.checkout_base_url,
            "https://1797a841fbb37ca7-AdyenDemo-checkout-live.adyenpayments.com/checkout/v71"
        );
        assert!(config.legal_entity_base_url.starts_with("https://kyc-live"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let out = format!("{:?}", config());
        assert!(!out.contains("AQE_key"));
        assert!(!out.contains("44782DEF"));
        assert!(out.contains("TestMerchant"));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("live".parse::<Environment>().unwrap(), Environment::Live);
        assert!("staging".parse::<Environment>().is_err());
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    const VARS: &[(&str, &str)] = &[
        ("ADYEN_API_KEY", "AQE_key"),
        ("ADYEN_MERCHANT_ACCOUNT", "TestMerchant"),
        ("ADYEN_CLIENT_KEY", "test_CLIENT"),
        ("ADYEN_HMAC_KEY", "44782DEF"),
    ];

    #[test]
    fn test_from_lookup() {
        let config = AdyenConfig::from_lookup(lookup(VARS)).unwrap();
        assert!(config.is_test_mode());
        assert_eq!(config.merchant_account, "TestMerchant");
        assert_eq!(config.balance_platform_api_key, "AQE_key");
    }

    #[test]
    fn test_missing_key() {
        let err = AdyenConfig::from_lookup(lookup(&VARS[1..])).unwrap_err();
        assert!(err.to_string().contains("ADYEN_API_KEY"));
    }

    #[test]
    fn test_hmac_key_is_trimmed() {
        let mut vars = VARS.to_vec();
        vars[3] = ("ADYEN_HMAC_KEY", "  44782DEF\n");

        let config = AdyenConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.hmac_key, "44782DEF");
        assert!(HmacValidator::new(&config.hmac_key).is_ok());

        vars[3] = ("ADYEN_HMAC_KEY", "not-hex");
        assert!(AdyenConfig::from_lookup(lookup(&vars)).is_err());
    }

    #[test]
    fn test_client_key_must_match_environment() {
        let mut vars = VARS.to_vec();
        vars[2] = ("ADYEN_CLIENT_KEY", "live_CLIENT");
        assert!(AdyenConfig::from_lookup(lookup(&vars)).is_err());

        vars.push(("ADYEN_ENVIRONMENT", "live"));
        let err = AdyenConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("ADYEN_LIVE_URL_PREFIX"));

        vars.push(("ADYEN_LIVE_URL_PREFIX", "1797a841fbb37ca7-AdyenDemo"));
        let config = AdyenConfig::from_lookup(lookup(&vars)).unwrap();
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_platform_keys_override() {
        let mut vars = VARS.to_vec();
        vars.push(("ADYEN_BCL_API_KEY", "AQE_bcl"));
        vars.push(("ADYEN_LEM_API_KEY", ""));

        let config = AdyenConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config.balance_platform_api_key, "AQE_bcl");
        assert_eq!(config.legal_entity_api_key, "AQE_key");
    }
}
