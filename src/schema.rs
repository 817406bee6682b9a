//! Avro schema loading.
//!
//! The output container is self-describing: the schema selected here is
//! embedded in the file header and governs how every record is encoded.
//! By default the compiled-in schema is used; an external `.avsc` file may
//! be supplied for deployments whose warehouse expects a different shape.

use apache_avro::Schema;
use snafu::prelude::*;

use crate::config::SchemaSource;
use crate::error::{ParseSnafu, ReadFileSnafu, SchemaError};

/// The compiled-in record schema.
pub const EMBEDDED_SCHEMA: &str = include_str!("schemas/object_metadata.avsc");

/// Load and parse the schema for the output container.
pub fn load(source: &SchemaSource) -> Result<Schema, SchemaError> {
    match source {
        SchemaSource::Embedded => {
            tracing::info!("Using embedded Avro schema");
            Schema::parse_str(EMBEDDED_SCHEMA).context(ParseSnafu)
        }
        SchemaSource::File(path) => {
            tracing::info!("Using Avro schema from {}", path.display());
            let definition = std::fs::read_to_string(path).context(ReadFileSnafu {
                path: path.display().to_string(),
            })?;
            Schema::parse_str(&definition).context(ParseSnafu)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_schema_parses() {
        let schema = load(&SchemaSource::Embedded).unwrap();
        match schema {
            Schema::Record(record) => {
                assert_eq!(record.name.name, "object_metadata");
                assert_eq!(record.fields.len(), 26);
            }
            other => panic!("Expected record schema, got {:?}", other),
        }
    }

    #[test]
    fn test_schema_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EMBEDDED_SCHEMA.as_bytes()).unwrap();

        let schema = load(&SchemaSource::File(file.path().to_path_buf())).unwrap();
        assert!(matches!(schema, Schema::Record(_)));
    }

    #[test]
    fn test_missing_schema_file() {
        let result = load(&SchemaSource::File("/nonexistent/schema.avsc".into()));
        assert!(matches!(result, Err(SchemaError::ReadFile { .. })));
    }

    #[test]
    fn test_invalid_schema_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not avro }").unwrap();

        let result = load(&SchemaSource::File(file.path().to_path_buf()));
        assert!(matches!(result, Err(SchemaError::Parse { .. })));
    }
}
