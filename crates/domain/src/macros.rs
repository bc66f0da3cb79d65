//! Macro for implementing Display and FromStr for status enums
//!
//! # Example
//!
//! ```rust
//! use namewizard_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum UploadStatus {
//!     Queued,
//!     Renaming,
//!     Done,
//! }
//!
//! impl_domain_status_conversions!(UploadStatus {
//!     Queued => "queued",
//!     Renaming => "renaming",
//!     Done => "done",
//! });
//!
//! assert_eq!(UploadStatus::Renaming.to_string(), "renaming");
//! assert_eq!("DONE".parse::<UploadStatus>().unwrap(), UploadStatus::Done);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Display writes the mapped string; FromStr parses it case-insensitively
/// and names the enum in its error message.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
