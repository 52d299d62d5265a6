use clap::ValueEnum;
use eyre::{Context, Result};
use std::str::FromStr;

pub enum Auth {
    /// Use an OAuth2 access token supplied by the environment
    AccessToken(String),
    /// Resolve a token by running `gcloud auth print-access-token`
    Gcloud,
    /// Don't use any authentication (emulators)
    None,
}

impl Auth {
    pub fn new(r#type: &AuthType, token: Option<String>) -> Self {
        match (r#type, token) {
            (AuthType::Token, Some(token)) => Self::AccessToken(token),
            (AuthType::Gcloud, _) => Self::Gcloud,
            (AuthType::None, _) | _ => Self::None,
        }
    }

    /// Resolve the bearer token for this auth mode, if any
    ///
    /// For [`Auth::Gcloud`] this shells out to the gcloud CLI once; the token
    /// is then baked into the client's default headers.
    pub fn bearer_token(&self) -> Result<Option<String>> {
        match self {
            Self::AccessToken(token) => Ok(Some(token.clone())),
            Self::Gcloud => {
                let output = std::process::Command::new("gcloud")
                    .args(["auth", "print-access-token"])
                    .output()
                    .context("Failed to run gcloud auth print-access-token")?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    eyre::bail!("gcloud auth print-access-token failed: {}", stderr.trim());
                }

                let stdout =
                    String::from_utf8(output.stdout).context("gcloud returned a non-UTF-8 token")?;
                let token = stdout.trim().to_string();

                if token.is_empty() {
                    eyre::bail!("gcloud auth print-access-token returned an empty token");
                }

                Ok(Some(token))
            }
            Self::None => Ok(None),
        }
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccessToken(_) => write!(f, "AccessToken"),
            Self::Gcloud => write!(f, "Gcloud"),
            Self::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum AuthType {
    Token,
    Gcloud,
    None,
}

impl FromStr for AuthType {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "gcloud" => Ok(Self::Gcloud),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_new_token() {
        let auth = Auth::new(&AuthType::Token, Some("ya29.token".to_string()));
        assert!(matches!(auth, Auth::AccessToken(_)));
    }

    #[test]
    fn test_auth_new_token_without_value_falls_back_to_none() {
        let auth = Auth::new(&AuthType::Token, None);
        assert!(matches!(auth, Auth::None));
    }

    #[test]
    fn test_auth_new_gcloud() {
        let auth = Auth::new(&AuthType::Gcloud, None);
        assert!(matches!(auth, Auth::Gcloud));
    }

    #[test]
    fn test_display_hides_secrets() {
        let auth = Auth::new(&AuthType::Token, Some("ya29.secret".to_string()));
        assert_eq!(auth.to_string(), "AccessToken");
        assert_eq!(Auth::None.to_string(), "None");
    }

    #[test]
    fn test_bearer_token_access_token() {
        let auth = Auth::AccessToken("ya29.token".to_string());
        assert_eq!(auth.bearer_token().unwrap().as_deref(), Some("ya29.token"));
    }

    #[test]
    fn test_bearer_token_none() {
        assert!(Auth::None.bearer_token().unwrap().is_none());
    }

    #[test]
    fn test_auth_type_from_str() {
        assert!(matches!("token".parse::<AuthType>(), Ok(AuthType::Token)));
        assert!(matches!("GCLOUD".parse::<AuthType>(), Ok(AuthType::Gcloud)));
        assert!(matches!("none".parse::<AuthType>(), Ok(AuthType::None)));
        assert!("bearer".parse::<AuthType>().is_err());
    }
}
