/// Error code registry for the toolkit
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors (block definitions, settings)
/// - 3000-3999: Storage errors
/// - 6000-6999: Event bus errors
/// - 7000-7999: Validation errors
/// - 9000-9999: Other errors
#[allow(dead_code)]
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_YAML: u16 = 1002;
    pub const CONFIG_INVALID_TOML: u16 = 1003;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;
    pub const CONFIG_PATH_ERROR: u16 = 1006;

    // Storage errors (3000-3999)
    pub const STORAGE_GENERIC: u16 = 3000;
    pub const STORAGE_IO_ERROR: u16 = 3001;
    pub const STORAGE_NOT_FOUND: u16 = 3004;
    pub const STORAGE_SERIALIZATION_ERROR: u16 = 3011;

    // Event bus errors (6000-6999)
    pub const EVENT_SUBSCRIBER_FAILED: u16 = 6001;
    pub const EVENT_NO_RUNTIME: u16 = 6002;

    // Validation errors (7000-7999)
    pub const VALIDATION_GENERIC: u16 = 7000;
    pub const VALIDATION_INVALID_TYPE: u16 = 7002;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid YAML in block definition",
        1003 => "Invalid TOML in settings file",
        1004 => "Required configuration field is missing",
        1005 => "Invalid value in configuration",
        1006 => "Configuration path error",

        3000 => "Generic storage error",
        3001 => "Storage I/O error",
        3004 => "Storage item not found",
        3011 => "Storage serialization error",

        6001 => "Event subscriber failed",
        6002 => "No async runtime available for event handling",

        7000 => "Generic validation error",
        7002 => "Invalid data type",

        9000 => "Generic error",

        _ => "Unknown error code",
    }
}
