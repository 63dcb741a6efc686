//! Ordered lookups over element attributes and child text.

use crate::tree::XmlNode;

/// Read access to the values an element carries.
pub(crate) trait NodeAccess {
    fn attribute(&self, name: &str) -> Option<&str>;
    fn child_value(&self, tag: &str) -> Option<&str>;
}

impl NodeAccess for XmlNode {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attr(name)
    }

    fn child_value(&self, tag: &str) -> Option<&str> {
        self.child_text(tag)
    }
}

/// Where a value may live on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accessor {
    Attr(&'static str),
    Child(&'static str),
}

impl Accessor {
    fn read<N: NodeAccess + ?Sized>(self, node: &N) -> Option<&str> {
        match self {
            Self::Attr(name) => node.attribute(name),
            Self::Child(tag) => node.child_value(tag),
        }
    }
}

/// First non-blank value found by trying `accessors` in order.
pub(crate) fn first_value<'n, N: NodeAccess + ?Sized>(
    node: &'n N,
    accessors: &[Accessor],
) -> Option<&'n str> {
    accessors
        .iter()
        .filter_map(|accessor| accessor.read(node))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Attribute then child lookups for a lower-case and a capitalized key.
pub(crate) fn field_accessors(lower: &'static str, capitalized: &'static str) -> [Accessor; 4] {
    [
        Accessor::Attr(lower),
        Accessor::Attr(capitalized),
        Accessor::Child(lower),
        Accessor::Child(capitalized),
    ]
}

/// Value of a `Parameter` element with `EnumList` resolution.
///
/// `<Value>ID_1</Value>` with `<EnumValue EnumId="ID_1">On</EnumValue>` resolves to
/// `On`; an id with no matching entry is returned unchanged.
pub(crate) fn parameter_value(parameter: &XmlNode) -> String {
    let Some(raw) = parameter.child_text("Value") else {
        return String::new();
    };
    parameter
        .child("EnumList")
        .and_then(|list| {
            list.children
                .iter()
                .filter(|entry| entry.tag == "EnumValue")
                .find(|entry| entry.attr("EnumId") == Some(raw))
        })
        .map(|entry| entry.text.as_str())
        .filter(|text| !text.is_empty())
        .unwrap_or(raw)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::XmlDocument;

    fn node(xml: &str) -> XmlNode {
        XmlDocument::parse(xml).expect("parse").root
    }

    #[test]
    fn blank_values_fall_through() {
        let el = node(r#"<Channel ShortName=" " name="IL1"><Name>ignored</Name></Channel>"#);
        let accessors = [
            Accessor::Attr("ShortName"),
            Accessor::Attr("name"),
            Accessor::Child("Name"),
        ];
        assert_eq!(first_value(&el, &accessors), Some("IL1"));
    }

    #[test]
    fn child_lookup_after_attributes() {
        let el = node("<Channel><Primary>400</Primary></Channel>");
        assert_eq!(
            first_value(&el, &field_accessors("primary", "Primary")),
            Some("400")
        );
        assert_eq!(first_value(&el, &field_accessors("offset", "Offset")), None);
    }

    #[test]
    fn enum_values_resolve() {
        let el = node(
            r#"<Parameter><Name>Operation01</Name><Value>ID_1</Value>
               <EnumList><EnumValue EnumId="ID_0">Off</EnumValue><EnumValue EnumId="ID_1">On</EnumValue></EnumList>
               </Parameter>"#,
        );
        assert_eq!(parameter_value(&el), "On");

        let unresolved = node(
            r#"<Parameter><Value>ID_7</Value><EnumList><EnumValue EnumId="ID_0">Off</EnumValue></EnumList></Parameter>"#,
        );
        assert_eq!(parameter_value(&unresolved), "ID_7");
        assert_eq!(parameter_value(&node("<Parameter/>")), "");
    }
}
