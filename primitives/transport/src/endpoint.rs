//! Registry endpoint path templating.
//!
//! Subject names are percent-encoded as a single path segment, so subjects
//! containing `/`, spaces or other reserved characters address the right
//! resource.

use std::fmt;

use types::{SchemaId, VersionSelector};

/// Every registry endpoint the schema cache calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /schemas/ids/{id}`
    SchemaById(SchemaId),
    /// `GET /schemas/ids/{id}/versions`
    SubjectVersionsById(SchemaId),
    /// `GET /schemas/types`
    SchemaTypes,
    /// `GET /subjects`
    Subjects,
    /// `GET /subjects/{subject}/versions`
    Versions(String),
    /// `GET /subjects/{subject}/versions/{version}`
    SchemaBySubjectVersion(String, i32),
    /// `GET /subjects/{subject}/versions/latest`
    LatestSchema(String),
    /// `GET /subjects/{subject}/versions/{version|latest}/referencedby`
    ReferencedBy(String, VersionSelector),
    /// `DELETE /subjects/{subject}?permanent={bool}`
    DeleteSubject {
        /// Subject to delete
        subject: String,
        /// Hard delete instead of the registry's soft delete
        permanent: bool,
    },
}

impl Endpoint {
    /// Path relative to the registry base URL, starting with `/`.
    pub fn path(&self) -> String {
        match self {
            Endpoint::SchemaById(id) => format!("/schemas/ids/{}", id),
            Endpoint::SubjectVersionsById(id) => format!("/schemas/ids/{}/versions", id),
            Endpoint::SchemaTypes => "/schemas/types".to_string(),
            Endpoint::Subjects => "/subjects".to_string(),
            Endpoint::Versions(subject) => format!("/subjects/{}/versions", encode(subject)),
            Endpoint::SchemaBySubjectVersion(subject, version) => {
                format!("/subjects/{}/versions/{}", encode(subject), version)
            }
            Endpoint::LatestSchema(subject) => {
                format!("/subjects/{}/versions/latest", encode(subject))
            }
            Endpoint::ReferencedBy(subject, selector) => {
                format!("/subjects/{}/versions/{}/referencedby", encode(subject), selector)
            }
            Endpoint::DeleteSubject { subject, permanent } => {
                format!("/subjects/{}?permanent={}", encode(subject), permanent)
            }
        }
    }

    /// Short operation name used in logs and error context.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::SchemaById(_) => "schema_by_id",
            Endpoint::SubjectVersionsById(_) => "subject_versions_by_id",
            Endpoint::SchemaTypes => "schema_types",
            Endpoint::Subjects => "subjects",
            Endpoint::Versions(_) => "versions",
            Endpoint::SchemaBySubjectVersion(..) => "schema_by_subject_version",
            Endpoint::LatestSchema(_) => "latest_schema",
            Endpoint::ReferencedBy(..) => "referenced_by",
            Endpoint::DeleteSubject { .. } => "delete_subject",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.path()) }
}

fn encode(subject: &str) -> String { urlencoding::encode(subject).into_owned() }
