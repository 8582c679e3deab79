//! Field tag reading and placement resolution.
//!
//! Each record field carries a small set of tags ([`FieldTags`]), normally
//! emitted by `#[derive(Record)]` from `#[request(...)]`, `#[schema(...)]`
//! and `#[serde(...)]` attributes. [`read_tags`] applies the precedence rules
//! and [`resolve`] turns the result into a [`Placement`].

use std::fmt;

use derive_more::Display;

/// HTTP part a field can be written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Part {
    /// `Cookie` header entry.
    #[display("cookie")]
    Cookie,
    /// Header value.
    #[display("header")]
    Header,
    /// Query parameter.
    #[display("query")]
    Query,
    /// `{name}` placeholder in the URL path.
    #[display("path")]
    Path,
    /// Whole request body, as JSON.
    #[display("form")]
    Form,
}

impl Part {
    /// Parse a placement tag; the trailing `!` marks the field required.
    ///
    /// Returns `None` for unknown tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<(Self, bool)> {
        let (name, required) = match tag.strip_suffix('!') {
            Some(name) => (name, true),
            None => (tag, false),
        };
        let part = match name {
            "cookie" => Self::Cookie,
            "header" => Self::Header,
            "query" => Self::Query,
            "path" => Self::Path,
            "form" if !required => Self::Form,
            _ => return None,
        };
        Some((part, required))
    }

    /// Human-readable name, used in error messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Header => "header",
            Self::Query => "query parameter",
            Self::Path => "path variable",
            Self::Form => "body",
        }
    }

    /// The placement tag for this part.
    #[must_use]
    pub const fn tag(self, required: bool) -> &'static str {
        match (self, required) {
            (Self::Cookie, false) => "cookie",
            (Self::Cookie, true) => "cookie!",
            (Self::Header, false) => "header",
            (Self::Header, true) => "header!",
            (Self::Query, false) => "query",
            (Self::Query, true) => "query!",
            (Self::Path, false) => "path",
            (Self::Path, true) => "path!",
            (Self::Form, _) => "form",
        }
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Structured schema tag: a location, a name and an explicit `required` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaTag {
    /// Where the field goes.
    pub location: Part,
    /// Wire name.
    pub name: &'static str,
    /// Whether the field must be set.
    pub required: bool,
}

/// Raw tags attached to one field.
///
/// Built with `const` methods so hand-written records can keep their tag
/// tables in `static`s:
///
/// ```
/// use wirecall_core::FieldTags;
///
/// const ID: FieldTags = FieldTags::new().request("path!").alias("id");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldTags {
    /// `request` tag: the placement (`header`, `query!`, `form`, ...).
    pub request: Option<&'static str>,
    /// `alias` tag: explicit wire name.
    pub alias: Option<&'static str>,
    /// Serialization tag (`serde` rename), comma-delimited.
    pub serialization: Option<&'static str>,
    /// `url_encode` tag, a boolean string.
    pub url_encode: Option<&'static str>,
    /// Structured schema tag, takes precedence over `request` and `alias`.
    pub schema: Option<SchemaTag>,
}

impl FieldTags {
    /// No tags.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request: None,
            alias: None,
            serialization: None,
            url_encode: None,
            schema: None,
        }
    }

    /// Set the `request` tag.
    #[must_use]
    pub const fn request(mut self, tag: &'static str) -> Self {
        self.request = Some(tag);
        self
    }

    /// Set the `alias` tag.
    #[must_use]
    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Set the serialization tag.
    #[must_use]
    pub const fn serialization(mut self, tag: &'static str) -> Self {
        self.serialization = Some(tag);
        self
    }

    /// Set the `url_encode` tag.
    #[must_use]
    pub const fn url_encode(mut self, flag: &'static str) -> Self {
        self.url_encode = Some(flag);
        self
    }

    /// Set the structured schema tag.
    #[must_use]
    pub const fn schema(mut self, location: Part, name: &'static str, required: bool) -> Self {
        self.schema = Some(SchemaTag {
            location,
            name,
            required,
        });
        self
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Tags after precedence rules, still as strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawPlacement {
    /// Placement tag; empty when the field has none.
    pub part: &'static str,
    /// Explicit wire name; empty when absent.
    pub alias: &'static str,
    /// Serialization alias; empty when absent or suppressed.
    pub serialization_alias: &'static str,
    /// Whether the value must be query-escaped.
    pub url_encode: bool,
}

/// Read a field's tags.
///
/// A schema tag short-circuits: its location is the part and its name the
/// alias. The serialization tag contributes only its first comma-delimited
/// segment, and `-` (or `-,`) means no serialization alias.
#[must_use]
pub fn read_tags(tags: &FieldTags) -> RawPlacement {
    let url_encode = tags.url_encode.is_some_and(parse_bool);

    if let Some(schema) = tags.schema {
        return RawPlacement {
            part: schema.location.tag(schema.required),
            alias: schema.name,
            serialization_alias: "",
            url_encode,
        };
    }

    RawPlacement {
        part: tags.request.unwrap_or_default(),
        alias: tags.alias.unwrap_or_default(),
        serialization_alias: tags.serialization.map_or("", serialization_alias),
        url_encode,
    }
}

fn serialization_alias(tag: &'static str) -> &'static str {
    let first = tag.split(',').next().unwrap_or_default();
    if first == "-" { "" } else { first }
}

/// Lenient boolean flag parsing: `1 t T TRUE true True` are true.
#[must_use]
pub fn parse_bool(flag: &str) -> bool {
    matches!(flag, "1" | "t" | "T" | "TRUE" | "true" | "True")
}

// ============================================================================
// Placement
// ============================================================================

/// What the field assigner does with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Write to an HTTP part.
    Part(Part),
    /// Walk into the nested record.
    Nested,
    /// Ignore the field.
    Skip,
    /// Placement tag not recognized, reported when the field is assigned.
    Unknown(&'static str),
}

/// Resolved placement of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Destination.
    pub target: Target,
    /// Wire name: alias, else serialization alias, else field identifier.
    pub wire_name: &'static str,
    /// Absent or empty values are an error.
    pub required: bool,
    /// Whether the value must be query-escaped.
    pub url_encode: bool,
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Part(part) => write!(f, "{} {}", part.tag(self.required), self.wire_name),
            Target::Nested => write!(f, "nested {}", self.wire_name),
            Target::Skip => write!(f, "skip {}", self.wire_name),
            Target::Unknown(tag) => write!(f, "unknown({tag}) {}", self.wire_name),
        }
    }
}

/// Resolve a field's placement.
///
/// `ident` is the field identifier; `nested` tells whether the field holds an
/// embedded record, walked when no placement tag is present.
#[must_use]
pub fn resolve(ident: &'static str, tags: &FieldTags, nested: bool) -> Placement {
    let raw = read_tags(tags);

    let wire_name = if !raw.alias.is_empty() {
        raw.alias
    } else if !raw.serialization_alias.is_empty() {
        raw.serialization_alias
    } else {
        ident
    };

    let (target, required) = match raw.part {
        "" if nested => (Target::Nested, false),
        "" => (Target::Skip, false),
        tag => Part::parse(tag).map_or((Target::Unknown(tag), false), |(part, required)| {
            (Target::Part(part), required)
        }),
    };

    Placement {
        target,
        wire_name,
        required,
        url_encode: raw.url_encode,
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn part_parse() {
        check!(Part::parse("header") == Some((Part::Header, false)));
        check!(Part::parse("query!") == Some((Part::Query, true)));
        check!(Part::parse("form") == Some((Part::Form, false)));
        check!(Part::parse("form!") == None);
        check!(Part::parse("body") == None);
        check!(Part::parse("!") == None);
    }

    #[test]
    fn lenient_bool() {
        for flag in ["1", "t", "T", "TRUE", "true", "True"] {
            check!(parse_bool(flag), "{flag}");
        }
        for flag in ["", "0", "yes", "tRuE", "false"] {
            check!(!parse_bool(flag), "{flag}");
        }
    }

    #[test]
    fn read_request_alias_and_serialization() {
        let tags = FieldTags::new()
            .request("header!")
            .alias("X-Id")
            .serialization("id,omitempty")
            .url_encode("true");

        check!(
            read_tags(&tags)
                == RawPlacement {
                    part: "header!",
                    alias: "X-Id",
                    serialization_alias: "id",
                    url_encode: true,
                }
        );
    }

    #[test]
    fn serialization_dash_means_none() {
        let raw = read_tags(&FieldTags::new().serialization("-"));
        check!(raw.serialization_alias == "");
        let raw = read_tags(&FieldTags::new().serialization("-,"));
        check!(raw.serialization_alias == "");
    }

    #[test]
    fn schema_tag_short_circuits() {
        let tags = FieldTags::new()
            .request("header")
            .alias("ignored")
            .schema(Part::Query, "page", true)
            .url_encode("1");

        check!(
            read_tags(&tags)
                == RawPlacement {
                    part: "query!",
                    alias: "page",
                    serialization_alias: "",
                    url_encode: true,
                }
        );
    }

    #[test]
    fn wire_name_priority() {
        let both = FieldTags::new().request("query").alias("a").serialization("s");
        check!(resolve("field", &both, false).wire_name == "a");

        let serialization_only = FieldTags::new().request("query").serialization("s");
        check!(resolve("field", &serialization_only, false).wire_name == "s");

        let none = FieldTags::new().request("query");
        check!(resolve("field", &none, false).wire_name == "field");
    }

    #[test]
    fn untagged_fields_skip_or_recurse() {
        check!(resolve("inner", &FieldTags::new(), true).target == Target::Nested);
        check!(resolve("note", &FieldTags::new(), false).target == Target::Skip);
    }

    #[test]
    fn required_marker() {
        let placement = resolve("id", &FieldTags::new().request("path!"), false);
        check!(placement.target == Target::Part(Part::Path));
        check!(placement.required);
        check!(placement.to_string() == "path! id");
    }

    #[test]
    fn unknown_tag_is_kept_for_assignment() {
        let placement = resolve("x", &FieldTags::new().request("body"), false);
        check!(placement.target == Target::Unknown("body"));
    }
}
