//! Profile, admin user and address conversions.

use serde::Deserialize;
use shopfront_core::{AddressId, UserId, UserRole};

use super::loose::{Flag, Text, Timestamp};
use crate::types::{Address, AdminUser, UserProfile};

/// Profile as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireUserProfile {
    id: UserId,
    #[serde(default)]
    name: Text,
    #[serde(default)]
    email: Text,
    #[serde(default)]
    role: Text,
    #[serde(default)]
    avatar: Text,
    #[serde(default)]
    phone: Text,
}

/// Admin user listing entry as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireAdminUser {
    id: UserId,
    #[serde(default)]
    name: Text,
    #[serde(default)]
    email: Text,
    #[serde(default)]
    role: Text,
    #[serde(default)]
    avatar: Text,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Timestamp,
    #[serde(default)]
    created_at: Timestamp,
}

/// Saved address as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireAddress {
    id: AddressId,
    #[serde(default)]
    first_name: Text,
    #[serde(default)]
    last_name: Text,
    #[serde(default)]
    flat_house_no: Text,
    #[serde(default)]
    address_line1: Text,
    #[serde(default)]
    area_street: Text,
    #[serde(default)]
    address_line2: Text,
    #[serde(default)]
    landmark: Text,
    #[serde(default)]
    pincode: Text,
    #[serde(default)]
    city: Text,
    #[serde(default)]
    state: Text,
    #[serde(default)]
    country: Text,
    #[serde(default)]
    phone: Text,
    #[serde(default)]
    is_default: Flag,
}

fn role(raw: Text) -> UserRole {
    raw.0.and_then(|r| r.parse().ok()).unwrap_or_default()
}

pub fn convert_user_profile(user: WireUserProfile) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name.0.unwrap_or_default(),
        email: user.email.0.unwrap_or_default(),
        role: role(user.role),
        avatar: user.avatar.0,
        phone: user.phone.0,
    }
}

pub fn convert_admin_user(user: WireAdminUser) -> AdminUser {
    AdminUser {
        id: user.id,
        name: user.name.0.unwrap_or_default(),
        email: user.email.0.unwrap_or_default(),
        role: role(user.role),
        avatar: user.avatar.0,
        created_at: user.created_at_camel.or(user.created_at).0,
    }
}

pub fn convert_address(addr: WireAddress) -> Address {
    Address {
        id: addr.id,
        first_name: addr.first_name.0.unwrap_or_default(),
        last_name: addr.last_name.0.unwrap_or_default(),
        flat_house_no: addr.flat_house_no.or(addr.address_line1).0.unwrap_or_default(),
        area_street: addr.area_street.or(addr.address_line2).0.unwrap_or_default(),
        landmark: addr.landmark.0,
        pincode: addr.pincode.0.unwrap_or_default(),
        city: addr.city.0.unwrap_or_default(),
        state: addr.state.0.unwrap_or_default(),
        country: addr.country.0.unwrap_or_else(|| "India".to_string()),
        phone: addr.phone.0.unwrap_or_default(),
        is_default: addr.is_default.0.unwrap_or(false),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_profile_role_is_lenient() {
        let profile = convert_user_profile(
            serde_json::from_value(json!({"id": 1, "name": "Asha", "email": "a@b.in", "role": "ADMIN"}))
                .unwrap(),
        );
        assert!(profile.role.is_admin());

        let profile =
            convert_user_profile(serde_json::from_value(json!({"id": 2, "role": null})).unwrap());
        assert_eq!(profile.role, UserRole::Customer);
    }

    #[test]
    fn test_address_numeric_pincode_and_line_fallbacks() {
        let addr = convert_address(
            serde_json::from_value(json!({
                "id": 4,
                "first_name": "Asha",
                "last_name": "Rao",
                "address_line1": "12 MG Road",
                "pincode": 411_001,
                "is_default": "true"
            }))
            .unwrap(),
        );
        assert_eq!(addr.full_name(), "Asha Rao");
        assert_eq!(addr.flat_house_no, "12 MG Road");
        assert_eq!(addr.pincode, "411001");
        assert_eq!(addr.country, "India");
        assert!(addr.is_default);
    }

    #[test]
    fn test_admin_user_created_at() {
        let user = convert_admin_user(
            serde_json::from_value(json!({"id": "u", "created_at": "2024-01-02T03:04:05Z"}))
                .unwrap(),
        );
        assert!(user.created_at.is_some());
    }
}
