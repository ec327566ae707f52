//! Account roles.
//!
//! Role codes are the strings the web client keeps in its session
//! (`vaiTros`) and the values stored in `user_roles.role`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Registrar / system administrator
    #[serde(rename = "ADMIN")]
    Admin,
    /// Giảng viên
    #[serde(rename = "GIANGVIEN")]
    Lecturer,
    /// Sinh viên
    #[serde(rename = "SINHVIEN")]
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Lecturer, Role::Student];

    pub fn as_code(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Lecturer => "GIANGVIEN",
            Role::Student => "SINHVIEN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "GIANGVIEN" => Ok(Role::Lecturer),
            "SINHVIEN" => Ok(Role::Student),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_code().parse::<Role>().unwrap(), role);
        }
        assert_eq!("sinhvien".parse::<Role>().unwrap(), Role::Student);
        assert!("teacher".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&vec![Role::Admin, Role::Lecturer]).unwrap();
        assert_eq!(json, r#"["ADMIN","GIANGVIEN"]"#);
        let role: Role = serde_json::from_str(r#""SINHVIEN""#).unwrap();
        assert_eq!(role, Role::Student);
    }
}
