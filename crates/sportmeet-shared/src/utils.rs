//! Utility functions

/// Mask the local part of an email so it can be logged.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let keep = if local.chars().count() <= 2 { 1 } else { 2 };
            let visible: String = local.chars().take(keep).collect();
            format!("{}***@{}", visible, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("pantus@oleg.com"), "pa***@oleg.com");
        assert_eq!(mask_email("ab@x.io"), "a***@x.io");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
