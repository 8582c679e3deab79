//! Tagged records: the field tables the assigner walks.
//!
//! `#[derive(Record)]` implements [`Record`] with a `OnceLock`-cached
//! [`RecordDescriptor`]. Records can also be written by hand:
//!
//! ```
//! use std::sync::OnceLock;
//! use wirecall_core::{FieldDescriptor, FieldTags, FieldValue, Record, RecordDescriptor};
//!
//! struct Paging {
//!     page: u32,
//! }
//!
//! impl Record for Paging {
//!     fn descriptor(&self) -> &'static RecordDescriptor {
//!         static DESCRIPTOR: OnceLock<RecordDescriptor> = OnceLock::new();
//!         DESCRIPTOR.get_or_init(|| {
//!             RecordDescriptor::new(
//!                 "Paging",
//!                 &[FieldDescriptor::new("page", "u32", FieldTags::new().request("query"))],
//!             )
//!         })
//!     }
//!
//!     fn field_values(&self) -> Vec<FieldValue<'_>> {
//!         vec![FieldValue::Scalar(&self.page)]
//!     }
//! }
//! ```

use crate::tag::{FieldTags, Placement, resolve};
use crate::{JsonBody, ToWireValue};

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier.
    pub ident: &'static str,
    /// Field type, for diagnostics.
    pub type_name: &'static str,
    /// Raw tags.
    pub tags: FieldTags,
    /// Whether the field holds an embedded record.
    pub nested: bool,
}

impl FieldDescriptor {
    /// A plain field.
    #[must_use]
    pub const fn new(ident: &'static str, type_name: &'static str, tags: FieldTags) -> Self {
        Self {
            ident,
            type_name,
            tags,
            nested: false,
        }
    }

    /// A field holding an embedded record.
    #[must_use]
    pub const fn nested(ident: &'static str, type_name: &'static str, tags: FieldTags) -> Self {
        Self {
            ident,
            type_name,
            tags,
            nested: true,
        }
    }
}

/// A field together with its resolved placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedField {
    /// Static description.
    pub field: FieldDescriptor,
    /// Placement, resolved from the tags.
    pub placement: Placement,
}

/// Placement table of a record type, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: Vec<ResolvedField>,
}

impl RecordDescriptor {
    /// Resolve the placement of every field, in declaration order.
    #[must_use]
    pub fn new(name: &'static str, fields: &[FieldDescriptor]) -> Self {
        let fields = fields
            .iter()
            .map(|field| ResolvedField {
                field: *field,
                placement: resolve(field.ident, &field.tags, field.nested),
            })
            .collect();
        Self { name, fields }
    }

    /// Record type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }
}

/// A field value handed to the assigner.
pub enum FieldValue<'a> {
    /// Not written anywhere.
    Skipped,
    /// A value rendered by the converter.
    Scalar(&'a dyn ToWireValue),
    /// A value rendered as JSON: `json` fields and `form` bodies.
    Json(&'a dyn JsonBody),
    /// An embedded record, `None` when absent.
    Nested(Option<&'a dyn Record>),
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped => f.write_str("Skipped"),
            Self::Scalar(value) => f.debug_tuple("Scalar").field(&value.to_wire_value()).finish(),
            Self::Json(_) => f.write_str("Json(..)"),
            Self::Nested(record) => f
                .debug_tuple("Nested")
                .field(&record.map(|record| record.descriptor().name()))
                .finish(),
        }
    }
}

/// A struct whose fields carry placement tags.
pub trait Record {
    /// Cached placement table of this record type.
    fn descriptor(&self) -> &'static RecordDescriptor;

    /// Field values, aligned with [`RecordDescriptor::fields`].
    fn field_values(&self) -> Vec<FieldValue<'_>>;
}

/// Access to an embedded record through wrappers such as `Option` and `Box`.
pub trait NestedRecord {
    /// The embedded record, `None` when absent.
    fn as_record(&self) -> Option<&dyn Record>;
}

impl<T: NestedRecord> NestedRecord for Option<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        self.as_ref().and_then(NestedRecord::as_record)
    }
}

impl<T: NestedRecord + ?Sized> NestedRecord for Box<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        (**self).as_record()
    }
}

impl<T: NestedRecord + ?Sized> NestedRecord for std::sync::Arc<T> {
    fn as_record(&self) -> Option<&dyn Record> {
        (**self).as_record()
    }
}
