use std::fmt::{self, Debug, Formatter};

/// A password that never shows up in logs or debug output
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Password(Option<String>);

impl Password {
    /// the password, empty strings count as no password
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref().filter(|p| !p.is_empty())
    }

    pub fn is_set(&self) -> bool {
        self.as_str().is_some()
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "Password(***)")
        } else {
            write!(f, "Password(None)")
        }
    }
}

impl From<Option<String>> for Password {
    fn from(password: Option<String>) -> Self {
        Self(password)
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self(Some(password.to_string()))
    }
}

impl AsRef<Option<String>> for Password {
    fn as_ref(&self) -> &Option<String> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_and_as_ref() {
        let password: Password = None.into();
        assert_eq!(password.as_ref(), &None);

        let password: Password = "password".into();
        assert_eq!(password.as_ref(), &Some("password".to_string()));
    }

    #[test]
    fn test_debug() {
        let password: Password = None.into();
        assert_eq!(format!("{:?}", password), "Password(None)");

        let password: Password = "password".into();
        assert_eq!(format!("{:?}", password), "Password(***)");
    }

    #[test]
    fn test_debug_hides_the_length() {
        let short: Password = "ab".into();
        let long: Password = "a much longer passphrase".into();

        assert_eq!(format!("{short:?}"), format!("{long:?}"));
    }

    #[test]
    fn test_empty_password_is_not_set() {
        let password: Password = "".into();
        assert!(!password.is_set());
        assert_eq!(password.as_str(), None);
    }
}
