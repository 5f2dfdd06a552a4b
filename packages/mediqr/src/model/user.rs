use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The front-desk operator of the current session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Receptionist,
}

impl User {
    /// Each role logs in as a fixed identity.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Doctor => User {
                id: "doc01".to_string(),
                name: "Dr. Smith".to_string(),
                role,
            },
            Role::Receptionist => User {
                id: "rec01".to_string(),
                name: "Receptionist".to_string(),
                role,
            },
        }
    }

    /// Only doctors may create, edit or delete patients and records
    pub fn can_write(&self) -> bool {
        self.role == Role::Doctor
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Doctor => "doctor",
            Role::Receptionist => "receptionist",
        };
        f.pad(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_identities() {
        let doctor = User::for_role(Role::Doctor);
        assert_eq!(doctor.id, "doc01");
        assert_eq!(doctor.name, "Dr. Smith");
        assert!(doctor.can_write());

        let receptionist = User::for_role(Role::Receptionist);
        assert_eq!(receptionist.id, "rec01");
        assert!(!receptionist.can_write());
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&User::for_role(Role::Receptionist)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"rec01","name":"Receptionist","role":"receptionist"}"#
        );
    }
}
