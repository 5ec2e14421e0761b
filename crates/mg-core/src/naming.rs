//! Name derivation shared by the dependency builder and the emitters.

/// Canonical notify-name of a backing field: strip one leading `_` or a leading `s_`, then
/// upper-case the first remaining character. A name that would strip to nothing keeps its
/// prefix.
pub fn canonical_notify_name(name: &str) -> String {
    let stripped = name
        .strip_prefix('_')
        .or_else(|| name.strip_prefix("s_"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name);
    upper_first(stripped)
}

pub fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cached delegate field for a property-changed handler: `_isOpenChangedHandler`.
pub fn changed_handler_field(property: &str) -> String {
    format!("_{}ChangedHandler", lower_first(property))
}

/// Cached delegate field for a collection-changed handler.
pub fn collection_handler_field(property: &str) -> String {
    format!("_{}CollectionChangedHandler", lower_first(property))
}

pub fn command_class_name(method: &str) -> String {
    format!("{}CommandClass", method)
}

pub fn command_property_name(method: &str) -> String {
    format!("{}Command", method)
}

pub fn command_field_name(method: &str) -> String {
    format!("_{}Command", lower_first(method))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_single_underscore_and_static_prefix() {
        assert_eq!(canonical_notify_name("_firstName"), "FirstName");
        assert_eq!(canonical_notify_name("s_instance"), "Instance");
        assert_eq!(canonical_notify_name("isOpen"), "IsOpen");
        assert_eq!(canonical_notify_name("__x"), "_x");
    }

    #[test]
    fn degenerate_names_keep_their_prefix() {
        assert_eq!(canonical_notify_name("_"), "_");
        assert_eq!(canonical_notify_name("s_"), "S_");
        assert_eq!(canonical_notify_name(""), "");
    }

    #[test]
    fn canonical_form_is_stable_without_prefixes() {
        for name in ["_x", "s_x", "value", "Value", "_lastName", "sName"] {
            let once = canonical_notify_name(name);
            assert_eq!(canonical_notify_name(&once), once, "{name}");
        }
    }

    #[test]
    fn derived_member_names() {
        assert_eq!(changed_handler_field("IsOpen"), "_isOpenChangedHandler");
        assert_eq!(collection_handler_field("Items"), "_itemsCollectionChangedHandler");
        assert_eq!(command_class_name("Close"), "CloseCommandClass");
        assert_eq!(command_property_name("Close"), "CloseCommand");
        assert_eq!(command_field_name("Close"), "_closeCommand");
    }
}
