//! Customers

use serde::{Deserialize, Serialize};

/// A customer record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub user_id: String,
    pub name: String,
    pub phone_number: String,
    pub instagram: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Validated customer ready for insertion
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub user_id: String,
    pub name: String,
    pub phone_number: String,
    pub instagram: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl NewCustomer {
    pub fn into_customer(self) -> Customer {
        Customer {
            user_id: self.user_id,
            name: self.name,
            phone_number: self.phone_number,
            instagram: self.instagram,
            street_address: self.street_address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
        }
    }
}

/// Validated partial update
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub instagram: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl CustomerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone_number.is_none()
            && self.instagram.is_none()
            && self.street_address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zip_code.is_none()
    }

    pub fn apply(&self, customer: &mut Customer) {
        let fields = [
            (&self.name, &mut customer.name),
            (&self.phone_number, &mut customer.phone_number),
            (&self.instagram, &mut customer.instagram),
            (&self.street_address, &mut customer.street_address),
            (&self.city, &mut customer.city),
            (&self.state, &mut customer.state),
            (&self.zip_code, &mut customer.zip_code),
        ];
        for (change, target) in fields {
            if let Some(value) = change {
                *target = value.clone();
            }
        }
    }
}
