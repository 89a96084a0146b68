use std::{env, sync::LazyLock};

/// Origin the relying party expects client data to carry.
pub static ORIGIN: LazyLock<String> =
    LazyLock::new(|| env::var("ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string()));

/// Origin a platform implementation should stamp into client data for the
/// mock relying party to accept it.
pub fn expected_origin() -> &'static str {
    &ORIGIN
}

pub static PASSKEY_RP_ID: LazyLock<String> = LazyLock::new(|| {
    ORIGIN
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .split(':')
        .next()
        .map(|s| s.to_string())
        .expect("Could not extract RP ID from ORIGIN")
});

pub static PASSKEY_RP_NAME: LazyLock<String> =
    LazyLock::new(|| env::var("PASSKEY_RP_NAME").ok().unwrap_or(ORIGIN.clone()));

/// Platform prompt timeout in seconds; sent on the wire in milliseconds.
pub static PASSKEY_TIMEOUT: LazyLock<u32> = LazyLock::new(|| {
    env::var("PASSKEY_TIMEOUT")
        .map(|v| v.parse::<u32>().unwrap_or(60))
        .unwrap_or(60)
});

/// Challenge validity window in seconds.
pub static PASSKEY_CHALLENGE_TIMEOUT: LazyLock<u32> = LazyLock::new(|| {
    env::var("PASSKEY_CHALLENGE_TIMEOUT")
        .map(|v| v.parse::<u32>().unwrap_or(300))
        .unwrap_or(300)
});

pub static PASSKEY_ATTESTATION: LazyLock<String> =
    LazyLock::new(|| match env::var("PASSKEY_ATTESTATION").ok() {
        None => "none".to_string(),
        Some(v) => match v.to_lowercase().as_str() {
            "none" => "none".to_string(),
            "direct" => "direct".to_string(),
            "indirect" => "indirect".to_string(),
            "enterprise" => "enterprise".to_string(),
            invalid => {
                tracing::warn!("Invalid attestation: {}. Using default 'none'", invalid);
                "none".to_string()
            }
        },
    });

pub static PASSKEY_AUTHENTICATOR_ATTACHMENT: LazyLock<String> = LazyLock::new(|| {
    match env::var("PASSKEY_AUTHENTICATOR_ATTACHMENT").ok() {
        None => "platform".to_string(),
        Some(v) => match v.to_lowercase().as_str() {
            "platform" => "platform".to_string(),
            "cross-platform" => "cross-platform".to_string(),
            invalid => {
                tracing::warn!(
                    "Invalid authenticator attachment: {}. Using default 'platform'",
                    invalid
                );
                "platform".to_string()
            }
        },
    }
});

pub static PASSKEY_RESIDENT_KEY: LazyLock<String> = LazyLock::new(|| {
    env::var("PASSKEY_RESIDENT_KEY").map_or("required".to_string(), |v| {
        match v.to_lowercase().as_str() {
            "required" => "required".to_string(),
            "preferred" => "preferred".to_string(),
            "discouraged" => "discouraged".to_string(),
            invalid => {
                tracing::warn!("Invalid resident key: {}. Using default 'required'", invalid);
                "required".to_string()
            }
        }
    })
});

pub static PASSKEY_REQUIRE_RESIDENT_KEY: LazyLock<bool> = LazyLock::new(|| {
    env::var("PASSKEY_REQUIRE_RESIDENT_KEY").map_or(true, |v| {
        match v.to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            invalid => {
                tracing::warn!(
                    "Invalid require_resident_key: {}. Using default 'true'",
                    invalid
                );
                true
            }
        }
    })
});

pub static PASSKEY_USER_VERIFICATION: LazyLock<String> = LazyLock::new(|| {
    env::var("PASSKEY_USER_VERIFICATION").map_or("preferred".to_string(), |v| {
        match v.to_lowercase().as_str() {
            "required" => "required".to_string(),
            "preferred" => "preferred".to_string(),
            "discouraged" => "discouraged".to_string(),
            invalid => {
                tracing::warn!(
                    "Invalid user verification: {}. Using default 'preferred'",
                    invalid
                );
                "preferred".to_string()
            }
        }
    })
});

/// Backend selection read by the ceremony facade.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
    pub use_mock_server: bool,
    pub timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3000".to_string(),
            use_mock_server: true,
            timeout_ms: 30_000,
        }
    }
}

/// Source of facade settings. The facade re-reads this on every call, so a
/// provider may change its answer between calls.
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> Settings;
}

/// Settings read from the process environment on each call.
pub struct EnvSettings;

impl SettingsProvider for EnvSettings {
    fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            server_url: env::var("PASSKEY_SERVER_URL").unwrap_or(defaults.server_url),
            use_mock_server: env::var("PASSKEY_USE_MOCK_SERVER")
                .map(|v| v.to_lowercase() != "false")
                .unwrap_or(defaults.use_mock_server),
            timeout_ms: env::var("PASSKEY_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.timeout_ms),
        }
    }
}

/// Fixed settings that can be swapped at runtime; used by tests and by
/// embedders that manage configuration themselves.
pub struct FixedSettings {
    inner: std::sync::Mutex<Settings>,
}

impl FixedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: std::sync::Mutex::new(settings),
        }
    }

    pub fn set(&self, settings: Settings) {
        *self.inner.lock().expect("settings lock poisoned") = settings;
    }
}

impl SettingsProvider for FixedSettings {
    fn settings(&self) -> Settings {
        self.inner.lock().expect("settings lock poisoned").clone()
    }
}
