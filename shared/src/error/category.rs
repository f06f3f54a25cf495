//! Coarse grouping of error codes, used as a log field

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Which part of the system an error code belongs to
///
/// Derived purely from the numeric range; unassigned ranges read as `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx
    General,
    /// 1xxx
    Auth,
    /// 2xxx
    Permission,
    /// 6000-6499: product data, images, variants, sizes
    Catalog,
    /// 65xx: picked files
    Upload,
    /// 66xx: edit session state
    Session,
    /// 9xxx
    System,
}

impl ErrorCategory {
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            6000..6500 => Self::Catalog,
            6500..6600 => Self::Upload,
            6600..6700 => Self::Session,
            9000.. => Self::System,
            _ => Self::General,
        }
    }

    /// Name as it appears in logs and JSON
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Catalog => "catalog",
            Self::Upload => "upload",
            Self::Session => "session",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_map_to_categories() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(6304), ErrorCategory::Catalog);
        assert_eq!(ErrorCategory::from_code(6501), ErrorCategory::Upload);
        assert_eq!(ErrorCategory::from_code(6603), ErrorCategory::Session);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
        // Unassigned ranges fall back to general
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::General);
    }

    #[test]
    fn every_group_has_a_representative_code() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(
            ErrorCode::PermissionDenied.category(),
            ErrorCategory::Permission
        );
        assert_eq!(ErrorCode::VariantRequired.category(), ErrorCategory::Catalog);
        assert_eq!(ErrorCode::FileTooLarge.category(), ErrorCategory::Upload);
        assert_eq!(ErrorCode::SaveInProgress.category(), ErrorCategory::Session);
        assert_eq!(ErrorCode::NetworkError.category(), ErrorCategory::System);
    }

    #[test]
    fn category_name_matches_json() {
        let json = serde_json::to_string(&ErrorCategory::Upload).unwrap();
        assert_eq!(json, "\"upload\"");

        let category: ErrorCategory = serde_json::from_str("\"session\"").unwrap();
        assert_eq!(category, ErrorCategory::Session);
        assert_eq!(category.name(), "session");
    }
}
