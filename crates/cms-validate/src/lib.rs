//! Metadata validation for the CMS publish pipeline.
//!
//! Every content type carries a fixed [`FieldSchema`]: the attribute names a
//! submission must supply and whether an accompanying file is mandatory.
//! [`validate`] checks a full submission before any write is attempted;
//! [`validate_patch`] checks an edit to an existing record.
//!
//! Validation is a pure check — no I/O, no side effects — so the orchestrator
//! can run it first and guarantee that a rejected submission touched neither
//! the blob store nor the index.

pub mod error;
pub mod schema;

pub use error::{FieldError, ValidationError};
pub use schema::{schema_for, FieldSchema};

use cms_types::{ContentType, FieldMap};

/// Validate a full submission for `content_type`.
///
/// Collects every problem rather than stopping at the first, so the caller
/// can surface the complete list of missing/invalid fields in one round.
pub fn validate(
    content_type: ContentType,
    fields: &FieldMap,
    has_file: bool,
) -> Result<(), ValidationError> {
    let schema = schema_for(content_type);
    let mut errors = Vec::new();

    for required in schema.required {
        match fields.get(*required) {
            None => errors.push(FieldError::Missing(required.to_string())),
            Some(value) if value.is_empty() => {
                errors.push(FieldError::Empty(required.to_string()))
            }
            Some(_) => {}
        }
    }

    for name in fields.keys() {
        if !schema.knows(name) {
            errors.push(FieldError::Unknown(name.clone()));
        }
    }

    if schema.requires_file && !has_file {
        errors.push(FieldError::MissingFile);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            content_type,
            errors,
        })
    }
}

/// Validate a patch against an existing record's content type.
///
/// A patch need not cover every required field (it is merged into a record
/// that already satisfied the schema), but every patched attribute must be
/// one the schema knows and must carry a non-empty value.
pub fn validate_patch(
    content_type: ContentType,
    patch: &FieldMap,
) -> Result<(), ValidationError> {
    let schema = schema_for(content_type);
    let mut errors = Vec::new();

    if patch.is_empty() {
        errors.push(FieldError::EmptyPatch);
    }

    for (name, value) in patch {
        if !schema.knows(name) {
            errors.push(FieldError::Unknown(name.clone()));
        } else if value.is_empty() {
            errors.push(FieldError::Empty(name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            content_type,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_types::field_map;

    #[test]
    fn valid_gallery_submission_passes() {
        let fields = field_map([
            ("title", "Freshers Day"),
            ("description", "Welcome batch of 2026"),
        ]);
        assert!(validate(ContentType::Gallery, &fields, true).is_ok());
    }

    #[test]
    fn gallery_without_file_is_rejected() {
        let fields = field_map([("title", "t"), ("description", "d")]);
        let err = validate(ContentType::Gallery, &fields, false).unwrap_err();
        assert_eq!(err.errors, vec![FieldError::MissingFile]);
    }

    #[test]
    fn placement_missing_fields_are_all_reported() {
        // Only `company` supplied; position, package, year must all be named.
        let fields = field_map([("company", "Acme")]);
        let err = validate(ContentType::Placement, &fields, false).unwrap_err();
        assert_eq!(
            err.missing_fields(),
            vec!["package", "position", "year"],
        );
    }

    #[test]
    fn whitespace_only_value_counts_as_empty() {
        let fields = field_map([("title", "   "), ("description", "d")]);
        let err = validate(ContentType::Gallery, &fields, true).unwrap_err();
        assert!(err
            .errors
            .contains(&FieldError::Empty("title".to_string())));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let fields = field_map([
            ("title", "t"),
            ("description", "d"),
            ("tagline", "not in the schema"),
        ]);
        let err = validate(ContentType::Gallery, &fields, true).unwrap_err();
        assert!(err
            .errors
            .contains(&FieldError::Unknown("tagline".to_string())));
    }

    #[test]
    fn event_requires_date_time_venue() {
        let fields = field_map([("title", "Tech talk"), ("description", "LLMs")]);
        let err = validate(ContentType::Event, &fields, false).unwrap_err();
        assert_eq!(err.missing_fields(), vec!["date", "time", "venue"]);
    }

    #[test]
    fn patch_with_known_fields_passes() {
        let patch = field_map([("venue", "Auditorium")]);
        assert!(validate_patch(ContentType::Event, &patch).is_ok());
    }

    #[test]
    fn patch_with_unknown_field_fails() {
        let patch = field_map([("salary", "10")]);
        let err = validate_patch(ContentType::Faculty, &patch).unwrap_err();
        assert_eq!(err.errors, vec![FieldError::Unknown("salary".to_string())]);
    }

    #[test]
    fn empty_patch_fails() {
        let patch = FieldMap::new();
        let err = validate_patch(ContentType::Gallery, &patch).unwrap_err();
        assert_eq!(err.errors, vec![FieldError::EmptyPatch]);
    }

    #[test]
    fn patch_need_not_cover_required_set() {
        // Faculty requires four fields; patching just one is fine.
        let patch = field_map([("designation", "Professor")]);
        assert!(validate_patch(ContentType::Faculty, &patch).is_ok());
    }
}

#[cfg(test)]
mod properties {
    use super::*;
    use cms_types::FieldValue;
    use proptest::prelude::*;

    fn arb_content_type() -> impl Strategy<Value = ContentType> {
        prop::sample::select(ContentType::ALL.to_vec())
    }

    fn arb_fields() -> impl Strategy<Value = cms_types::FieldMap> {
        prop::collection::btree_map(
            "[a-z]{1,12}",
            "[ -~]{0,16}".prop_map(FieldValue::Text),
            0..6,
        )
    }

    proptest! {
        // Validation is a pure function: the same input always yields the
        // same verdict and the same error list.
        #[test]
        fn validate_is_deterministic(
            ct in arb_content_type(),
            fields in arb_fields(),
            has_file in any::<bool>(),
        ) {
            let first = validate(ct, &fields, has_file);
            let second = validate(ct, &fields, has_file);
            match (first, second) {
                (Ok(()), Ok(())) => {}
                (Err(a), Err(b)) => prop_assert_eq!(a.errors, b.errors),
                _ => prop_assert!(false, "verdict changed between calls"),
            }
        }

        // A submission carrying every required field, non-empty, with a file
        // attached and nothing extra, always passes.
        #[test]
        fn complete_submission_passes(ct in arb_content_type()) {
            let schema = schema_for(ct);
            let fields: cms_types::FieldMap = schema
                .required
                .iter()
                .map(|name| (name.to_string(), FieldValue::from("value")))
                .collect();
            prop_assert!(validate(ct, &fields, true).is_ok());
        }
    }
}
