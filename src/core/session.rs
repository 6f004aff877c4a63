//! Session store - authenticated identity and credential
//!
//! The session is persisted as a small JSON file under the state dir and
//! restored on startup. A corrupt or partial file clears the session rather
//! than leaving half a login behind. The credential is never installed as a
//! process-wide default: callers take it from here and hand it to the gateway
//! on every call.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

use crate::remote::envelope::decode_item;
use crate::remote::{ApiError, Credential, Gateway};

/// Staff roles known to the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Sales,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Sales => write!(f, "sales"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "sales" => Ok(Role::Sales),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// The authenticated user as reported by the remote system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    pub email: String,

    pub role: Role,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub onboarding_completed: bool,
}

impl UserIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A restored or freshly created login
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: UserIdentity,
    pub credential: Credential,
}

/// On-disk shape of the session file
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    identity: UserIdentity,
    token: String,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to write session state: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize session state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence for the session file
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Restore the session. A missing file is simply "not logged in"; a file
    /// that fails to parse is removed so no partial state survives.
    pub fn load(&self) -> Option<Session> {
        let contents = fs::read_to_string(&self.path).ok()?;

        match serde_json::from_str::<SessionFile>(&contents) {
            Ok(file) if !file.token.is_empty() => Some(Session {
                identity: file.identity,
                credential: Credential(file.token),
            }),
            _ => {
                self.clear();
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = SessionFile {
            identity: session.identity.clone(),
            token: session.credential.0.clone(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Drop all session state. Removing an already-absent file is fine.
    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// What the login endpoint hands back
#[derive(Debug, Deserialize)]
struct LoginPayload {
    token: String,
    user: UserIdentity,
}

/// Authenticate against the remote system and build a session.
///
/// A rejection from the remote (wrong password, unknown role) comes back as
/// [`ApiError::Auth`] carrying the server's message for inline display.
pub fn login(
    gateway: &dyn Gateway,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Session, ApiError> {
    let body = json!({
        "email": email,
        "password": password,
        "role": role,
    });

    let payload = match gateway.post("auth/login", &body, None) {
        Ok(payload) => payload,
        Err(ApiError::Rejected(msg)) => return Err(ApiError::Auth(msg)),
        Err(ApiError::Unauthorized) => {
            return Err(ApiError::Auth("invalid email or password".to_string()))
        }
        Err(other) => return Err(other),
    };

    let login: LoginPayload = decode_item(payload, "login")?;
    Ok(Session {
        identity: login.user,
        credential: Credential(login.token),
    })
}

/// Re-fetch the identity without touching the credential
pub fn refresh(gateway: &dyn Gateway, session: &Session) -> Result<Session, ApiError> {
    let payload = gateway.get("auth/me", Some(&session.credential))?;
    let identity: UserIdentity = decode_item(payload, "identity")?;
    Ok(Session {
        identity,
        credential: session.credential.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: "u1".into(),
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            role: Role::Admin,
            email_verified: true,
            onboarding_completed: false,
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::at(tmp.path().join("session.json"));

        let session = Session {
            identity: identity(),
            credential: Credential("tok-123".into()),
        };
        store.save(&session).unwrap();

        let restored = store.load().unwrap();
        assert_eq!(restored.identity.email, "asha@example.com");
        assert_eq!(restored.credential, Credential("tok-123".into()));
        assert!(restored.identity.is_admin());
    }

    #[test]
    fn test_corrupt_file_clears_instead_of_partial_restore() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::at(path.clone());
        assert!(store.load().is_none());
        assert!(!path.exists(), "corrupt session file should be removed");
    }

    #[test]
    fn test_empty_token_treated_as_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("session.json");
        let file = SessionFile {
            identity: identity(),
            token: String::new(),
        };
        fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let store = SessionStore::at(path.clone());
        assert!(store.load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::at(tmp.path().join("session.json"));
        assert!(store.load().is_none());
    }
}
