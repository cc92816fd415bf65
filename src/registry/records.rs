// Tenant record types
// Field names are part of the wire format and must stay snake_case

use serde::{Deserialize, Serialize};

/// Per-tenant presentation configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigRecord {
    pub tenant_id: String,
    pub theme: String,
    pub template: String,
    pub description: String,
}

/// Per-tenant test payload
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct TestDataRecord {
    pub tenant_id: String,
    pub data: String,
}

/// Which registry mapping a lookup targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Config,
    TestData,
}

impl RecordKind {
    /// Short name used in log lines
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::TestData => "test_data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_record_field_names() {
        let record = ConfigRecord {
            tenant_id: "tenant1".to_string(),
            theme: "dark".to_string(),
            template: "template_1".to_string(),
            description: "Configuration for Tenant 1".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"tenant_id":"tenant1","theme":"dark","template":"template_1","description":"Configuration for Tenant 1"}"#
        );
    }

    #[test]
    fn test_test_data_record_field_names() {
        let record = TestDataRecord {
            tenant_id: "tenant2".to_string(),
            data: "This is test data for Tenant 2".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"tenant_id":"tenant2","data":"This is test data for Tenant 2"}"#
        );
    }
}
