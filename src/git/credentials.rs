//! Transport credentials supplied to libgit2's credential callback.

use crate::config::Credentials;
use git2::{Cred, CredentialType};

/// Capability invoked synchronously by the transport on each authenticated operation
pub trait CredentialsProvider: Send + Sync {
    /// Produce credentials for `url` among the `allowed` types
    fn credentials(
        &self,
        url: &str,
        username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error>;
}

/// Static SSH key pair unlocked by the startup passphrase
#[derive(Debug, Clone)]
pub struct KeyPairCredentials {
    credentials: Credentials,
}

impl KeyPairCredentials {
    /// Wrap loaded credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for KeyPairCredentials {
    fn credentials(
        &self,
        _url: &str,
        username_from_url: Option<&str>,
        allowed: CredentialType,
    ) -> Result<Cred, git2::Error> {
        let username = username_from_url.unwrap_or("git");

        if allowed.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key(
                username,
                Some(self.credentials.public_key()),
                self.credentials.private_key(),
                Some(self.credentials.passphrase()),
            );
        }

        // SSH asks for the username first when the URL carries none
        if allowed.contains(CredentialType::USERNAME) {
            return Cred::username(username);
        }

        Err(git2::Error::from_str(&format!(
            "key-pair credentials cannot satisfy requested types {allowed:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppPaths;

    fn provider() -> KeyPairCredentials {
        let paths = AppPaths::new("/srv/bot");
        KeyPairCredentials::new(Credentials::new(Some("pw".to_string()), &paths, "deploy").unwrap())
    }

    #[test]
    fn username_requests_default_to_git() {
        let cred = provider()
            .credentials("ssh://github.com/acme/widget", None, CredentialType::USERNAME)
            .unwrap();
        assert!(cred.has_username());
    }

    #[test]
    fn plaintext_only_requests_are_refused() {
        let result = provider().credentials(
            "https://github.com/acme/widget",
            None,
            CredentialType::USER_PASS_PLAINTEXT,
        );
        assert!(result.is_err());
    }
}
