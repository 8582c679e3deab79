//! `serde`-style case conversion, used to compute serialization aliases.

/// Case conversion rules for `rename_all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub(crate) enum RenameRule {
    /// `lowercase`
    LowerCase,
    /// `UPPERCASE`
    UpperCase,
    /// `camelCase`
    CamelCase,
    /// `PascalCase`
    PascalCase,
    /// `snake_case`
    SnakeCase,
    /// `SCREAMING_SNAKE_CASE`
    ScreamingSnakeCase,
    /// `kebab-case`
    KebabCase,
    /// `SCREAMING-KEBAB-CASE`
    ScreamingKebabCase,
}

impl RenameRule {
    /// Parse a rename rule from its `serde` spelling.
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s {
            "lowercase" => Some(Self::LowerCase),
            "UPPERCASE" => Some(Self::UpperCase),
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnakeCase),
            "kebab-case" => Some(Self::KebabCase),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebabCase),
            _ => None,
        }
    }

    /// Apply the rule to a `snake_case` field name.
    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::LowerCase | Self::SnakeCase => name.to_string(),
            Self::UpperCase | Self::ScreamingSnakeCase => name.to_uppercase(),
            Self::CamelCase => to_camel_case(name),
            Self::PascalCase => to_pascal_case(name),
            Self::KebabCase => name.replace('_', "-"),
            Self::ScreamingKebabCase => name.to_uppercase().replace('_', "-"),
        }
    }
}

fn to_camel_case(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn parse_known_rules() {
        check!(RenameRule::parse("camelCase") == Some(RenameRule::CamelCase));
        check!(RenameRule::parse("SCREAMING-KEBAB-CASE") == Some(RenameRule::ScreamingKebabCase));
        check!(RenameRule::parse("Title Case").is_none());
    }

    #[test]
    fn apply_to_field_names() {
        let name = "page_size";
        check!(RenameRule::LowerCase.apply(name) == "page_size");
        check!(RenameRule::UpperCase.apply(name) == "PAGE_SIZE");
        check!(RenameRule::CamelCase.apply(name) == "pageSize");
        check!(RenameRule::PascalCase.apply(name) == "PageSize");
        check!(RenameRule::SnakeCase.apply(name) == "page_size");
        check!(RenameRule::ScreamingSnakeCase.apply(name) == "PAGE_SIZE");
        check!(RenameRule::KebabCase.apply(name) == "page-size");
        check!(RenameRule::ScreamingKebabCase.apply(name) == "PAGE-SIZE");
    }

    #[test]
    fn single_word() {
        check!(RenameRule::PascalCase.apply("id") == "Id");
        check!(RenameRule::CamelCase.apply("id") == "id");
    }
}
