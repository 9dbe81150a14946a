use url::Url;

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`, followed by `:`.
pub(crate) fn has_scheme(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolves a URI reference found in a playlist against the playlist location.
///
/// References with a scheme are returned untouched, as are all references when
/// the playlist location is unknown.
pub fn resolve(base: Option<&Url>, reference: &str) -> String {
    if reference.is_empty() || has_scheme(reference) {
        return reference.to_string();
    }

    let Some(base) = base else {
        return reference.to_string();
    };

    match base.join(reference) {
        Ok(url) => url.to_string(),
        Err(error) => {
            log::warn!("Failed to resolve {reference} against {base}: {error}");
            reference.to_string()
        }
    }
}
