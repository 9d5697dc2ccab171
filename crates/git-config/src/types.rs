//! Typed value conversion (bool, int, path, color).

use bstr::{BStr, ByteSlice};
use crate::error::ConfigError;

/// Parse a boolean config value.
///
/// Rules matching C git:
/// - None (key with no = sign) → true
/// - "" (empty string) → false
/// - "true", "yes", "on" (case-insensitive) → true
/// - "false", "no", "off" (case-insensitive) → false
/// - "1" → true
/// - "0" → false
pub fn parse_bool(value: Option<&BStr>) -> Result<bool, ConfigError> {
    match value {
        None => Ok(true), // key with no value
        Some(v) => {
            let s = v.to_str_lossy();
            let s = s.trim();
            if s.is_empty() {
                return Ok(false);
            }
            match s.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => Ok(true),
                "false" | "no" | "off" => Ok(false),
                _ => {
                    // Try parsing as integer
                    if let Ok(n) = s.parse::<i64>() {
                        match n {
                            0 => Ok(false),
                            _ => Ok(true),
                        }
                    } else {
                        Err(ConfigError::InvalidBool(s.to_string()))
                    }
                }
            }
        }
    }
}

/// Parse an integer config value with optional k/m/g suffix.
///
/// Suffix multipliers (case-insensitive):
/// - k/K: ×1024
/// - m/M: ×1048576 (1024²)
/// - g/G: ×1073741824 (1024³)
pub fn parse_int(value: &BStr) -> Result<i64, ConfigError> {
    let s = value.to_str_lossy();
    let s = s.trim();
    if s.is_empty() {
        return Err(ConfigError::InvalidInt("empty value".into()));
    }

    let (num_str, multiplier): (&str, i64) = if s.len() > 1 {
        match s.as_bytes().last() {
            Some(b'k') | Some(b'K') => (&s[..s.len() - 1], 1024),
            Some(b'm') | Some(b'M') => (&s[..s.len() - 1], 1024 * 1024),
            Some(b'g') | Some(b'G') => (&s[..s.len() - 1], 1024 * 1024 * 1024),
            _ => (s, 1),
        }
    } else {
        (s, 1)
    };

    let base: i64 = num_str
        .parse()
        .map_err(|_| ConfigError::InvalidInt(s.to_string()))?;

    base.checked_mul(multiplier)
        .ok_or_else(|| ConfigError::InvalidInt(format!("overflow: {}", s)))
}

/// Parse a path config value, expanding `~/` to the home directory.
pub fn parse_path(value: &BStr) -> Result<std::path::PathBuf, ConfigError> {
    let s = value.to_str_lossy();
    let s = s.trim();

    if s.starts_with("~/") || s == "~" {
        if let Some(home) = home_dir() {
            if s == "~" {
                Ok(home)
            } else {
                Ok(home.join(&s[2..]))
            }
        } else {
            // Can't expand ~, return as-is
            Ok(std::path::PathBuf::from(s.to_string()))
        }
    } else {
        Ok(std::path::PathBuf::from(s.to_string()))
    }
}

/// Get the user's home directory.
fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- parse_bool tests ---

    #[test]
    fn bool_none_is_true() {
        assert_eq!(parse_bool(None).unwrap(), true);
    }

    #[test]
    fn bool_empty_is_false() {
        assert_eq!(parse_bool(Some(BStr::new(""))).unwrap(), false);
    }

    #[test]
    fn bool_true_variants() {
        for v in &["true", "yes", "on", "True", "YES", "On", "1"] {
            assert_eq!(parse_bool(Some(BStr::new(v))).unwrap(), true, "failed for {}", v);
        }
    }

    #[test]
    fn bool_false_variants() {
        for v in &["false", "no", "off", "False", "NO", "Off", "0"] {
            assert_eq!(parse_bool(Some(BStr::new(v))).unwrap(), false, "failed for {}", v);
        }
    }

    #[test]
    fn bool_invalid() {
        assert!(parse_bool(Some(BStr::new("maybe"))).is_err());
    }

    // --- parse_int tests ---

    #[test]
    fn int_plain() {
        assert_eq!(parse_int(BStr::new("42")).unwrap(), 42);
    }

    #[test]
    fn int_negative() {
        assert_eq!(parse_int(BStr::new("-5")).unwrap(), -5);
    }

    #[test]
    fn int_k_suffix() {
        assert_eq!(parse_int(BStr::new("10k")).unwrap(), 10240);
        assert_eq!(parse_int(BStr::new("10K")).unwrap(), 10240);
    }

    #[test]
    fn int_m_suffix() {
        assert_eq!(parse_int(BStr::new("10m")).unwrap(), 10485760);
        assert_eq!(parse_int(BStr::new("10M")).unwrap(), 10485760);
    }

    #[test]
    fn int_g_suffix() {
        assert_eq!(parse_int(BStr::new("1g")).unwrap(), 1073741824);
        assert_eq!(parse_int(BStr::new("1G")).unwrap(), 1073741824);
    }

    #[test]
    fn int_empty_fails() {
        assert!(parse_int(BStr::new("")).is_err());
    }

    #[test]
    fn int_invalid_fails() {
        assert!(parse_int(BStr::new("abc")).is_err());
    }

    // --- parse_path tests ---

    #[test]
    fn path_tilde_expansion() {
        let result = parse_path(BStr::new("~/foo/bar")).unwrap();
        if let Some(home) = home_dir() {
            assert_eq!(result, home.join("foo/bar"));
        }
    }

    #[test]
    fn path_absolute() {
        let result = parse_path(BStr::new("/absolute/path")).unwrap();
        assert_eq!(result, std::path::PathBuf::from("/absolute/path"));
    }

    #[test]
    fn path_relative() {
        let result = parse_path(BStr::new("relative/path")).unwrap();
        assert_eq!(result, std::path::PathBuf::from("relative/path"));
    }
}
