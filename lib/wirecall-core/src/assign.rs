//! Field assignment: writing a record's fields into a request.
//!
//! [`assign`] walks the fields of a [`Record`] in declaration order and
//! dispatches each one on its [`Placement`](crate::Placement):
//!
//! - `cookie`, `header`, `query`, `path` go through the part writers,
//! - `form` replaces the request body with the field's JSON,
//! - untagged embedded records are walked with the same request,
//! - everything else is skipped.
//!
//! The first failure aborts the walk; whatever was written before it stays in
//! the request.

use percent_encoding::{
    AsciiSet, CONTROLS, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode,
};
use tracing::trace;

use crate::record::{FieldValue, Record, ResolvedField};
use crate::tag::{Part, Target};
use crate::{Error, JsonBody, Request, Result, ToWireValue, WireValue, convert};

/// Characters kept as is when substituting a path placeholder.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b'/')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Characters the URL parser escapes in a path, braces included.
const URL_PATH_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Write every tagged field of `record` into `request`.
///
/// # Errors
///
/// Fails on the first field that cannot be written: unknown placement tag,
/// required value missing, path placeholder missing, body serialization or
/// absent embedded record.
pub fn assign<B>(request: &mut Request<B>, record: &dyn Record) -> Result<()>
where
    B: From<bytes::Bytes>,
{
    let descriptor = record.descriptor();
    for (field, value) in descriptor.fields().iter().zip(record.field_values()) {
        assign_field(request, field, value)?;
    }
    Ok(())
}

/// Walk an embedded record under the same request.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] naming `type_name` when the record is
/// absent, otherwise whatever [`assign`] returns.
pub fn assign_nested<B>(
    request: &mut Request<B>,
    type_name: &str,
    record: Option<&dyn Record>,
) -> Result<()>
where
    B: From<bytes::Bytes>,
{
    let record = record.ok_or_else(|| Error::unsupported_type(type_name))?;
    assign(request, record)
}

fn assign_field<B>(
    request: &mut Request<B>,
    field: &ResolvedField,
    value: FieldValue<'_>,
) -> Result<()>
where
    B: From<bytes::Bytes>,
{
    let placement = field.placement;
    trace!(field = field.field.ident, %placement, "assigning field");

    match (placement.target, value) {
        (Target::Unknown(tag), _) => Err(Error::unknown_placement(tag)),
        (Target::Skip, _) | (_, FieldValue::Skipped) => Ok(()),
        (Target::Nested, FieldValue::Nested(record)) => {
            assign_nested(request, field.field.type_name, record)
        }
        (Target::Nested, _) => Ok(()),
        (Target::Part(Part::Form), FieldValue::Json(body)) => {
            write_body(request, placement.wire_name, body)
        }
        (Target::Part(Part::Form), _) => Err(Error::invalid_request(format!(
            "client generation failed, unable to get body of client field {}",
            placement.wire_name
        ))),
        (Target::Part(_), FieldValue::Nested(_)) => {
            Err(Error::unsupported_type(field.field.type_name))
        }
        (Target::Part(part), FieldValue::Scalar(scalar)) => write_part(
            request,
            part,
            placement.wire_name,
            &scalar.to_wire_value(),
            placement.required,
            placement.url_encode,
        ),
        (Target::Part(part), FieldValue::Json(json)) => write_part(
            request,
            part,
            placement.wire_name,
            &WireValue::record(json),
            placement.required,
            placement.url_encode,
        ),
    }
}

// ============================================================================
// Part Writers
// ============================================================================

/// Write one value to a cookie, header, query parameter or path placeholder.
///
/// # Errors
///
/// Returns [`Error::RequiredNotSet`] when `required` and the value is absent
/// or empty; path writes also fail when the placeholder is missing.
pub fn write_part<B>(
    request: &mut Request<B>,
    part: Part,
    name: &str,
    value: &WireValue<'_>,
    required: bool,
    url_encode: bool,
) -> Result<()> {
    match part {
        Part::Cookie => write_cookie(request, name, value, required, url_encode),
        Part::Header => write_header(request, name, value, required, url_encode),
        Part::Query => write_query(request, name, value, required),
        Part::Path => write_path(request, name, value, required, url_encode),
        Part::Form => Err(Error::invalid_request(format!(
            "client generation failed, unable to get body of client field {name}"
        ))),
    }
}

fn converted(
    part: Part,
    name: &str,
    value: &WireValue<'_>,
    required: bool,
    url_encode: bool,
) -> Result<Option<String>> {
    let converted = convert(value, url_encode);
    if required && converted.as_deref().is_none_or(str::is_empty) {
        return Err(Error::required_not_set(part, name));
    }
    Ok(converted)
}

/// Add `name=value` to the `Cookie` header; an absent value is sent empty.
fn write_cookie<B>(
    request: &mut Request<B>,
    name: &str,
    value: &WireValue<'_>,
    required: bool,
    url_encode: bool,
) -> Result<()> {
    let value = converted(Part::Cookie, name, value, required, url_encode)?;
    request.add_cookie(name, value.as_deref().unwrap_or_default())
}

/// Append a header value; an absent value is sent empty.
fn write_header<B>(
    request: &mut Request<B>,
    name: &str,
    value: &WireValue<'_>,
    required: bool,
    url_encode: bool,
) -> Result<()> {
    let value = converted(Part::Header, name, value, required, url_encode)?;
    request.append_header(name, value.as_deref().unwrap_or_default())
}

/// Append a query pair. The URL encoder escapes the value, so the field's
/// `url_encode` flag does not apply here.
fn write_query<B>(
    request: &mut Request<B>,
    name: &str,
    value: &WireValue<'_>,
    required: bool,
) -> Result<()> {
    let value = converted(Part::Query, name, value, required, false)?;
    request
        .url_mut()
        .query_pairs_mut()
        .append_pair(name, value.as_deref().unwrap_or_default());
    Ok(())
}

/// Replace every `{name}` in the URL path with the value.
fn write_path<B>(
    request: &mut Request<B>,
    name: &str,
    value: &WireValue<'_>,
    required: bool,
    url_encode: bool,
) -> Result<()> {
    let value = converted(Part::Path, name, value, required, url_encode)?;

    // The URL keeps its path percent-encoded, braces and name included
    let placeholder = format!("%7B{}%7D", utf8_percent_encode(name, URL_PATH_ENCODE_SET));
    let path = request.url().path();
    if !path.contains(&placeholder) {
        return Err(Error::PathVariableNotFound {
            name: name.to_string(),
            path: percent_decode_str(path).decode_utf8_lossy().into_owned(),
            wanted: format!("{{{name}}}"),
        });
    }

    let replacement =
        utf8_percent_encode(value.as_deref().unwrap_or_default(), PATH_SEGMENT_ENCODE_SET)
            .to_string();
    let path = path.replace(&placeholder, &replacement);

    // A parsed URL collapses `.` and `..` segments, even percent-encoded ones
    if path.split('/').any(is_dot_segment) {
        return Err(Error::invalid_request(format!(
            "path variable {name} would produce a dot segment in path [{}]",
            percent_decode_str(&path).decode_utf8_lossy()
        )));
    }
    request.url_mut().set_path(&path);
    Ok(())
}

fn is_dot_segment(segment: &str) -> bool {
    let segment = segment.to_ascii_lowercase().replace("%2e", ".");
    segment == "." || segment == ".."
}

/// Replace the request body with the JSON of a field and set the JSON content type.
fn write_body<B>(request: &mut Request<B>, name: &str, body: &dyn JsonBody) -> Result<()>
where
    B: From<bytes::Bytes>,
{
    let bytes = body.to_json_bytes().map_err(|err| {
        Error::invalid_request(format!(
            "client generation failed, {err}, of client field {name}"
        ))
    })?;
    request.set_json_body(bytes);
    Ok(())
}
