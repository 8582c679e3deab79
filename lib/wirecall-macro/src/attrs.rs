//! Attribute parsing for wirecall derive macros.

use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Field, LitStr};

use crate::rename::RenameRule;

/// HTTP method of a request record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    /// Variant name of `wirecall::Method`, for code generation.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
            Self::Patch => "Patch",
            Self::Head => "Head",
            Self::Options => "Options",
            Self::Trace => "Trace",
            Self::Connect => "Connect",
        }
    }

    /// Parse an HTTP method from a string (case-insensitive).
    #[must_use]
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            "PATCH" => Some(Self::Patch),
            "HEAD" => Some(Self::Head),
            "OPTIONS" => Some(Self::Options),
            "TRACE" => Some(Self::Trace),
            "CONNECT" => Some(Self::Connect),
            _ => None,
        }
    }
}

/// Location of a `#[schema(...)]` tag, named after `wirecall::Part` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    Cookie,
    Header,
    Query,
    Path,
    Form,
}

impl Location {
    fn from_ident(name: &str) -> Option<Self> {
        match name {
            "cookie" => Some(Self::Cookie),
            "header" => Some(Self::Header),
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            "form" => Some(Self::Form),
            _ => None,
        }
    }

    /// Variant name of `wirecall::Part`.
    pub(crate) const fn variant(self) -> &'static str {
        match self {
            Self::Cookie => "Cookie",
            Self::Header => "Header",
            Self::Query => "Query",
            Self::Path => "Path",
            Self::Form => "Form",
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Header => "header",
            Self::Query => "query",
            Self::Path => "path",
            Self::Form => "form",
        }
    }
}

// ============================================================================
// Record-level attributes
// ============================================================================

/// Options from `#[request(...)]` and `#[serde(...)]` on the record itself.
#[derive(Debug, Default)]
pub(crate) struct RecordOptions {
    /// Diagnostic name, defaults to the type name.
    pub(crate) name: Option<String>,
    /// HTTP method, required by `#[derive(HttpRequest)]`.
    pub(crate) method: Option<HttpMethod>,
    /// Path template, required by `#[derive(HttpRequest)]`.
    pub(crate) path: Option<String>,
    /// Serialize the whole record as the JSON body.
    pub(crate) json_body: bool,
    /// The record implements `Validate`.
    pub(crate) validate: bool,
    /// Bypass client-side validation.
    pub(crate) skip_client_validation: bool,
    /// The record implements `BuildRequest`.
    pub(crate) build_request: bool,
    /// `#[serde(rename_all = "...")]`
    pub(crate) rename_all: Option<RenameRule>,
}

/// Parse record-level options.
pub(crate) fn parse_record_options(attrs: &[Attribute]) -> syn::Result<RecordOptions> {
    let mut options = RecordOptions::default();

    for attr in attrs {
        if attr.path().is_ident("request") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    options.name = Some(string_value(&meta)?.value());
                } else if meta.path.is_ident("method") {
                    let value = string_value(&meta)?;
                    let method = HttpMethod::parse(&value.value()).ok_or_else(|| {
                        syn::Error::new_spanned(
                            &value,
                            format!(
                                "unsupported HTTP method: \"{}\". Expected one of: \
                                 GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS, TRACE, CONNECT",
                                value.value()
                            ),
                        )
                    })?;
                    options.method = Some(method);
                } else if meta.path.is_ident("path") {
                    options.path = Some(string_value(&meta)?.value());
                } else if meta.path.is_ident("json_body") {
                    options.json_body = true;
                } else if meta.path.is_ident("validate") {
                    options.validate = true;
                } else if meta.path.is_ident("skip_client_validation") {
                    options.skip_client_validation = true;
                } else if meta.path.is_ident("build_request") {
                    options.build_request = true;
                } else {
                    return Err(meta.error("unknown record option"));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    let Some(value) = serialize_name(&meta)? else {
                        return Ok(());
                    };
                    let rule = RenameRule::parse(&value.value()).ok_or_else(|| {
                        syn::Error::new_spanned(
                            &value,
                            format!(
                                "unknown rename_all value: \"{}\". Expected one of: \
                                 lowercase, UPPERCASE, camelCase, PascalCase, \
                                 snake_case, SCREAMING_SNAKE_CASE, kebab-case, SCREAMING-KEBAB-CASE",
                                value.value()
                            ),
                        )
                    })?;
                    options.rename_all = Some(rule);
                    Ok(())
                } else {
                    skip_meta(&meta)
                }
            })?;
        }
    }

    Ok(options)
}

// ============================================================================
// Field-level attributes
// ============================================================================

/// Schema tag parsed from `#[schema(query = "name", required)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemaOptions {
    pub(crate) location: Location,
    pub(crate) name: String,
    pub(crate) required: bool,
}

/// Options from the `#[request(...)]`, `#[schema(...)]` and `#[serde(...)]`
/// attributes of one field.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct FieldOptions {
    /// Placement tag, e.g. `header!`.
    pub(crate) part: Option<String>,
    /// Explicit wire name.
    pub(crate) alias: Option<String>,
    /// `url_encode` flag, as written.
    pub(crate) url_encode: Option<String>,
    /// Convert the value as a JSON record.
    pub(crate) json: bool,
    /// The field holds an embedded record.
    pub(crate) nested: bool,
    /// Structured schema tag.
    pub(crate) schema: Option<SchemaOptions>,
    /// `#[serde(rename = "...")]`
    pub(crate) serde_rename: Option<String>,
    /// `#[serde(skip)]` or `#[serde(skip_serializing)]`
    pub(crate) serde_skip: bool,
}

impl FieldOptions {
    /// Whether a placement tag (request or schema) is present.
    pub(crate) const fn is_tagged(&self) -> bool {
        self.part.is_some() || self.schema.is_some()
    }

    /// Whether the field value must go through JSON serialization.
    pub(crate) fn is_json(&self) -> bool {
        if self.json {
            return true;
        }
        if let Some(schema) = &self.schema {
            return schema.location == Location::Form;
        }
        self.part.as_deref().is_some_and(|part| part.starts_with("form"))
    }

    /// Serialization alias tag, as `serde` would name the field.
    pub(crate) fn serialization(
        &self,
        ident: &str,
        rename_all: Option<RenameRule>,
    ) -> Option<String> {
        if self.serde_skip {
            return Some("-".to_string());
        }
        if let Some(rename) = &self.serde_rename {
            return Some(rename.clone());
        }
        rename_all.map(|rule| rule.apply(ident))
    }
}

/// Parse the options of one field.
pub(crate) fn parse_field_options(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();

    for attr in &field.attrs {
        if attr.path().is_ident("request") {
            parse_request_field(attr, &mut options)?;
        } else if attr.path().is_ident("schema") {
            options.schema = Some(parse_schema(attr)?);
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    options.serde_rename = serialize_name(&meta)?.map(|lit| lit.value());
                    Ok(())
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    options.serde_skip = true;
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    options.nested = true;
                    Ok(())
                } else {
                    skip_meta(&meta)
                }
            })?;
        }
    }

    Ok(options)
}

/// `#[request(header, required, alias = "X-Id")]` or `#[request(part = "header!")]`.
fn parse_request_field(attr: &Attribute, options: &mut FieldOptions) -> syn::Result<()> {
    let mut shorthand: Option<(Location, proc_macro2::Span)> = None;
    let mut required = false;

    attr.parse_nested_meta(|meta| {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("expected an identifier"));
        };
        let key = ident.unraw().to_string();

        if let Some(location) = Location::from_ident(&key) {
            if shorthand.is_some() || options.part.is_some() {
                return Err(meta.error("a field has a single placement"));
            }
            shorthand = Some((location, ident.span()));
            return Ok(());
        }

        match key.as_str() {
            "part" => {
                if shorthand.is_some() {
                    return Err(meta.error("a field has a single placement"));
                }
                options.part = Some(string_value(&meta)?.value());
            }
            "required" => required = true,
            "alias" => options.alias = Some(string_value(&meta)?.value()),
            "url_encode" => {
                let flag = if meta.input.peek(syn::Token![=]) {
                    string_value(&meta)?.value()
                } else {
                    "true".to_string()
                };
                options.url_encode = Some(flag);
            }
            "json" => options.json = true,
            "nested" => options.nested = true,
            _ => return Err(meta.error(format!("unknown field option `{key}`"))),
        }
        Ok(())
    })?;

    match shorthand {
        Some((Location::Form, span)) if required => Err(syn::Error::new(
            span,
            "a form body cannot be marked required",
        )),
        Some((location, _)) => {
            let suffix = if required { "!" } else { "" };
            options.part = Some(format!("{}{suffix}", location.tag()));
            Ok(())
        }
        None if required => match options.part.as_mut() {
            Some(part) if !part.ends_with('!') => {
                part.push('!');
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(syn::Error::new_spanned(
                attr,
                "`required` needs a placement, e.g. `#[request(header, required)]`",
            )),
        },
        None => Ok(()),
    }
}

/// `#[schema(query = "page", required)]`
fn parse_schema(attr: &Attribute) -> syn::Result<SchemaOptions> {
    let mut location = None;
    let mut required = false;

    attr.parse_nested_meta(|meta| {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("expected an identifier"));
        };
        let key = ident.unraw().to_string();
        if key == "required" {
            required = true;
        } else if let Some(loc) = Location::from_ident(&key) {
            if location.is_some() {
                return Err(meta.error("a schema tag has a single location"));
            }
            location = Some((loc, string_value(&meta)?.value()));
        } else {
            return Err(meta.error(format!("unknown schema option `{key}`")));
        }
        Ok(())
    })?;

    let Some((location, name)) = location else {
        return Err(syn::Error::new_spanned(
            attr,
            "schema tag needs a location, e.g. `#[schema(query = \"page\")]`",
        ));
    };
    Ok(SchemaOptions {
        location,
        name,
        required,
    })
}

// ============================================================================
// Response-target attributes
// ============================================================================

/// Capabilities carried by a field of a response target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResponseField {
    /// `#[response(status)]`
    pub(crate) status: bool,
    /// `#[response(error)]`
    pub(crate) error: bool,
}

impl ResponseField {
    pub(crate) const fn is_capability(self) -> bool {
        self.status || self.error
    }
}

/// Options from `#[response(...)]` on the target itself.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ResponseOptions {
    /// The target implements `CaptureBody`.
    pub(crate) capture: bool,
    /// The target implements `UnmarshalBody`.
    pub(crate) unmarshal: bool,
}

/// Parse `#[response(capture)]` / `#[response(unmarshal)]`.
pub(crate) fn parse_response_options(attrs: &[Attribute]) -> syn::Result<ResponseOptions> {
    let mut options = ResponseOptions::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("response")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("capture") {
                options.capture = true;
            } else if meta.path.is_ident("unmarshal") {
                options.unmarshal = true;
            } else {
                return Err(meta.error("expected `capture` or `unmarshal`"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

/// Parse `#[response(status)]` / `#[response(error)]` on a field.
///
/// An embedded `ErrorResponse` takes both: `#[response(status, error)]`.
pub(crate) fn parse_response_field(field: &Field) -> syn::Result<ResponseField> {
    let mut kind = ResponseField::default();
    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("response")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("status") {
                kind.status = true;
            } else if meta.path.is_ident("error") {
                kind.error = true;
            } else {
                return Err(meta.error("expected `status` or `error`"));
            }
            Ok(())
        })?;
    }
    Ok(kind)
}

// ============================================================================
// Helpers
// ============================================================================

fn string_value(meta: &ParseNestedMeta<'_>) -> syn::Result<LitStr> {
    meta.value()?.parse()
}

/// Name from `rename = "x"` or `rename(serialize = "x", ...)`.
fn serialize_name(meta: &ParseNestedMeta<'_>) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(syn::Token![=]) {
        return string_value(meta).map(Some);
    }
    let mut name = None;
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("serialize") {
            name = Some(string_value(&inner)?);
        } else {
            skip_meta(&inner)?;
        }
        Ok(())
    })?;
    Ok(name)
}

/// Consume a `serde` option we do not read.
fn skip_meta(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta(&inner))?;
    }
    Ok(())
}

/// Readable type name, without the token spacing of `quote`.
pub(crate) fn type_name(ty: &syn::Type) -> String {
    quote::quote!(#ty)
        .to_string()
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
        .replace(" :: ", "::")
}
