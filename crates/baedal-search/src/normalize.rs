//! Keyword and region normalization.
//!
//! The `(user, keyword, region)` triple is a uniqueness key, so the textual
//! parts must be normalized before keying. The policy is fixed: trim,
//! collapse internal whitespace runs to a single space, lowercase. Queries
//! normalize their region argument the same way, so "Seoul" and " seoul "
//! address the same records.

/// Normalizes a keyword or region for use in the uniqueness key.
///
/// Returns `None` if nothing remains after trimming.
pub fn normalize(raw: &str) -> Option<String> {
	let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
	if collapsed.is_empty() {
		None
	} else {
		Some(collapsed.to_lowercase())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trims_collapses_and_lowercases() {
		assert_eq!(normalize(" Fried  Chicken "), Some("fried chicken".into()));
		assert_eq!(normalize("SEOUL"), Some("seoul".into()));
		assert_eq!(normalize("tteokbokki"), Some("tteokbokki".into()));
	}

	#[test]
	fn empty_and_whitespace_only_are_rejected() {
		assert_eq!(normalize(""), None);
		assert_eq!(normalize("   \t "), None);
	}

	#[test]
	fn normalization_is_idempotent() {
		let once = normalize(" Gangnam  Station ").unwrap();
		assert_eq!(normalize(&once), Some(once.clone()));
	}
}
