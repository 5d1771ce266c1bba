use reqwest::header::{AUTHORIZATION, HeaderValue};

pub enum Auth {
    /// Personal access token sent as a bearer token
    Bearer(String),
    /// Don't use any authentication
    None,
}

impl Auth {
    /// Bearer auth from a personal access token; blank tokens mean no auth
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self::Bearer(token),
            _ => Self::None,
        }
    }

    /// The `Authorization` header for this auth method, if any
    pub fn header(&self) -> eyre::Result<Option<(reqwest::header::HeaderName, HeaderValue)>> {
        match self {
            Self::Bearer(token) => {
                let mut value: HeaderValue = format!("Bearer {}", token).parse()?;
                value.set_sensitive(true);
                Ok(Some((AUTHORIZATION, value)))
            }
            Self::None => Ok(None),
        }
    }
}

impl std::fmt::Display for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => write!(f, "Bearer"),
            Self::None => write!(f, "None"),
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token itself
        write!(f, "Auth({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let auth = Auth::from_token(Some("secret-pat".to_string()));
        let (name, value) = auth.header().unwrap().unwrap();
        assert_eq!(name, AUTHORIZATION);
        assert_eq!(value.to_str().unwrap(), "Bearer secret-pat");
        assert!(value.is_sensitive());
    }

    #[test]
    fn test_blank_token_is_none() {
        assert!(matches!(Auth::from_token(Some("  ".to_string())), Auth::None));
        assert!(matches!(Auth::from_token(None), Auth::None));
        assert!(Auth::None.header().unwrap().is_none());
    }

    #[test]
    fn test_debug_hides_token() {
        let auth = Auth::Bearer("secret-pat".to_string());
        assert_eq!(format!("{:?}", auth), "Auth(Bearer)");
    }
}
