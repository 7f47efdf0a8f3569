/// Error code registry for the payroll report service
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Organization source errors (data store unavailable)
/// - 3000-3999: Enrichment fetch errors
/// - 4000-4999: Validation errors
/// - 9000-9999: Internal errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_TOML: u16 = 1002;
    pub const CONFIG_MISSING_REQUIRED: u16 = 1003;
    pub const CONFIG_INVALID_VALUE: u16 = 1004;

    // Organization source errors (2000-2999)
    pub const SOURCE_UNAVAILABLE: u16 = 2000;
    pub const SOURCE_CONNECTION_FAILED: u16 = 2001;
    pub const SOURCE_QUERY_FAILED: u16 = 2002;

    // Enrichment fetch errors (3000-3999)
    pub const FETCH_GENERIC: u16 = 3000;
    pub const FETCH_HTTP_STATUS: u16 = 3001;
    pub const FETCH_TRANSPORT: u16 = 3002;
    pub const FETCH_TIMEOUT: u16 = 3003;
    pub const FETCH_UNPARSEABLE: u16 = 3004;

    // Validation errors (4000-4999)
    pub const VALIDATION_GENERIC: u16 = 4000;
    pub const VALIDATION_REQUIRED_FIELD: u16 = 4001;
    pub const VALIDATION_OUT_OF_RANGE: u16 = 4002;
    pub const VALIDATION_NEGATIVE_AMOUNT: u16 = 4003;
    pub const VALIDATION_INVALID_FORMAT: u16 = 4004;

    // Internal errors (9000-9999)
    pub const INTERNAL_GENERIC: u16 = 9000;
    pub const INTERNAL_TASK_PANICKED: u16 = 9001;
    pub const INTERNAL_IO: u16 = 9002;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid TOML syntax in configuration",
        1003 => "Required configuration field is missing",
        1004 => "Invalid value in configuration",

        2000 => "Organization data source unavailable",
        2001 => "Failed to connect to organization data source",
        2002 => "Organization data query failed",

        3000 => "Generic enrichment fetch error",
        3001 => "External service returned an error status",
        3002 => "External service transport failure",
        3003 => "External service request timed out",
        3004 => "External service response could not be parsed",

        4000 => "Generic validation error",
        4001 => "Required field is missing",
        4002 => "Value out of allowed range",
        4003 => "Amount must not be negative",
        4004 => "Invalid format",

        9000 => "Internal error",
        9001 => "Background task panicked",
        9002 => "Internal I/O error",

        _ => "Unknown error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_ranges() {
        assert!(ErrorCode::CONFIG_GENERIC >= 1000 && ErrorCode::CONFIG_GENERIC < 2000);
        assert!(ErrorCode::SOURCE_UNAVAILABLE >= 2000 && ErrorCode::SOURCE_UNAVAILABLE < 3000);
        assert!(ErrorCode::FETCH_GENERIC >= 3000 && ErrorCode::FETCH_GENERIC < 4000);
        assert!(ErrorCode::VALIDATION_GENERIC >= 4000 && ErrorCode::VALIDATION_GENERIC < 5000);
        assert!(ErrorCode::INTERNAL_GENERIC >= 9000 && ErrorCode::INTERNAL_GENERIC < 10000);
    }

    #[test]
    fn test_error_code_descriptions() {
        assert_eq!(describe_error_code(1001), "Configuration file not found");
        assert_eq!(describe_error_code(4003), "Amount must not be negative");
        assert_eq!(describe_error_code(65535), "Unknown error code");
    }
}
