//! # Naming Utilities
//!
//! Derives endpoint aliases from the HTTP method and URL path when
//! `operationId` is missing.

use crate::oas::models::HttpMethod;
use heck::ToUpperCamelCase;

/// Derives a camelCase alias from the method and path.
///
/// e.g. `GET /users/{id}` -> `getUsersId`
pub fn derive_alias(method: HttpMethod, path: &str) -> String {
    format!("{}{}", method.as_str(), path.to_upper_camel_case())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_alias() {
        assert_eq!(derive_alias(HttpMethod::Get, "/users"), "getUsers");
        assert_eq!(derive_alias(HttpMethod::Get, "/users/{id}"), "getUsersId");
        assert_eq!(
            derive_alias(HttpMethod::Post, "/pet-store/v1/{petId}/activate"),
            "postPetStoreV1PetIdActivate"
        );
        assert_eq!(derive_alias(HttpMethod::Delete, "/"), "delete");
    }
}
