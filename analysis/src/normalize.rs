pub const CREATE_CART: &str = "CREATE_CART";
pub const ADD_ITEMS: &str = "ADD_ITEMS";
pub const GET_CART: &str = "GET_CART";

const READ_ALIASES: [&str; 3] = ["get", "retrieve", "read"];

/// Map the labels used by the different benchmark clients onto one canonical set.
///
/// Matching is a case-insensitive substring check in the order create, add, get/retrieve/read.
/// Anything else is passed through upper-cased.
pub fn normalize_operation_name(operation: &str) -> String {
    let lower = operation.to_lowercase();

    if lower.contains("create") {
        CREATE_CART.to_string()
    } else if lower.contains("add") {
        ADD_ITEMS.to_string()
    } else if READ_ALIASES.iter().any(|alias| lower.contains(alias)) {
        GET_CART.to_string()
    } else {
        operation.to_uppercase()
    }
}
