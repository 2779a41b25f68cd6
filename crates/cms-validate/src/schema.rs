use cms_types::ContentType;

/// Static attribute schema for one content type.
#[derive(Clone, Copy, Debug)]
pub struct FieldSchema {
    /// Attribute names a submission must supply, in canonical order.
    pub required: &'static [&'static str],
    /// Attribute names accepted but not required.
    pub optional: &'static [&'static str],
    /// Whether the type must carry an uploaded file.
    pub requires_file: bool,
}

impl FieldSchema {
    /// Returns `true` if `name` is an attribute this schema recognizes.
    pub fn knows(&self, name: &str) -> bool {
        self.required.contains(&name) || self.optional.contains(&name)
    }
}

const GALLERY: FieldSchema = FieldSchema {
    required: &["description", "title"],
    optional: &[],
    requires_file: true,
};

const EVENT: FieldSchema = FieldSchema {
    required: &["date", "description", "time", "title", "venue"],
    optional: &["organizer", "registration_link"],
    requires_file: false,
};

const FACULTY: FieldSchema = FieldSchema {
    required: &["contact", "designation", "name", "qualification"],
    optional: &["specialization"],
    requires_file: true,
};

const PLACEMENT: FieldSchema = FieldSchema {
    required: &["company", "package", "position", "year"],
    optional: &["student"],
    requires_file: false,
};

const ACHIEVEMENT: FieldSchema = FieldSchema {
    required: &["description", "title", "year"],
    optional: &["awarded_by"],
    requires_file: false,
};

/// The schema for `content_type`.
pub fn schema_for(content_type: ContentType) -> &'static FieldSchema {
    match content_type {
        ContentType::Gallery => &GALLERY,
        ContentType::Event => &EVENT,
        ContentType::Faculty => &FACULTY,
        ContentType::Placement => &PLACEMENT,
        ContentType::Achievement => &ACHIEVEMENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_required_fields() {
        for ct in ContentType::ALL {
            assert!(
                !schema_for(ct).required.is_empty(),
                "{ct} has no required fields"
            );
        }
    }

    #[test]
    fn required_lists_are_sorted() {
        // Canonical order keeps error lists stable for assertions and UI.
        for ct in ContentType::ALL {
            let req = schema_for(ct).required;
            assert!(req.windows(2).all(|w| w[0] < w[1]), "{ct} not sorted");
        }
    }

    #[test]
    fn photo_centric_types_require_a_file() {
        assert!(schema_for(ContentType::Gallery).requires_file);
        assert!(schema_for(ContentType::Faculty).requires_file);
        assert!(!schema_for(ContentType::Placement).requires_file);
    }

    #[test]
    fn knows_covers_optional_fields() {
        let schema = schema_for(ContentType::Event);
        assert!(schema.knows("venue"));
        assert!(schema.knows("organizer"));
        assert!(!schema.knows("budget"));
    }
}
