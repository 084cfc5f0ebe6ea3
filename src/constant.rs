// Constants for the Health Chains dashboard client

// Gateway defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

// Gateway endpoints
pub const PATIENTS_PATH: &str = "/patients";
pub const CONSENTS_PATH: &str = "/consents";
pub const TRANSACTIONS_PATH: &str = "/transactions";
pub const STATS_PATH: &str = "/stats";

// List defaults
pub const DEFAULT_PATIENTS_PAGE: u32 = 1;
pub const DEFAULT_PATIENTS_LIMIT: u32 = 10;
pub const DEFAULT_TRANSACTIONS_LIMIT: u32 = 20;
pub const DEFAULT_CURRENCY: &str = "ETH";

// Consent signing; the backend checks signatures against this exact text
pub const CONSENT_MESSAGE_PREFIX: &str = "I consent to: ";
pub const CONSENT_MESSAGE_PATIENT: &str = " for patient: ";

// Identifier rendering
pub const DEFAULT_MIN_VISIBLE_CHARS: usize = 10;
pub const MEASURE_SAMPLE: &str = "0x00000000";
pub const ELLIPSIS: &str = "...";
pub const ELLIPSIS_CHARS: usize = 3;
pub const PREFIX_SHARE: f64 = 0.6;
pub const MIN_PREFIX_CHARS: usize = 4;
pub const MIN_SUFFIX_CHARS: usize = 2;
pub const DEFAULT_COPIED_FEEDBACK_MS: u64 = 2000;

// Placeholder for absent timestamps
pub const NOT_AVAILABLE: &str = "N/A";
