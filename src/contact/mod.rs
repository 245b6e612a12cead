//! Contacts: the records, the forms that edit them, and the pages that show them.

use serde::{Deserialize, Serialize};
use std::fmt;

mod store;
pub use store::{ContactStore, MemoryContacts, MongoContacts};

pub mod validation;

pub mod import;

#[cfg(feature = "webserver")]
pub mod routes;


/// The store-generated identifier of a contact, as it appears in forms: 24 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub String);

impl ContactId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<bson::oid::ObjectId> for ContactId {
    fn from(oid: bson::oid::ObjectId) -> Self {
        ContactId(oid.to_hex())
    }
}

/// A stored contact.
///
/// Field names on the wire are the ones the forms and templates use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub id: ContactId,
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "nohp")]
    pub phone: String,
}

/// Everything about a contact except its identifier; what gets inserted, and what an update sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    #[serde(rename = "nohp")]
    pub phone: String,
}

/// The fields of the add form, exactly as submitted.
///
/// Missing fields come through empty so that validation, not the form decoder, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub nama: String,
    pub email: String,
    pub nohp: String,
}

impl From<ContactForm> for NewContact {
    fn from(ContactForm { nama, email, nohp }: ContactForm) -> Self {
        NewContact {
            name: nama,
            email,
            phone: nohp,
        }
    }
}

/// The edit form: the contact's fields, plus the hidden identifier and the name it had
/// when the form was rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditContactForm {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "oldNama")]
    pub old_nama: String,
    pub nama: String,
    pub email: String,
    pub nohp: String,
}

impl EditContactForm {
    /// An edit form filled in from what's in the store.
    pub fn from_contact(c: &Contact) -> Self {
        EditContactForm {
            id: c.id.to_string(),
            old_nama: c.name.clone(),
            nama: c.name.clone(),
            email: c.email.clone(),
            nohp: c.phone.clone(),
        }
    }

    pub fn fields(&self) -> ContactForm {
        ContactForm {
            nama: self.nama.clone(),
            email: self.email.clone(),
            nohp: self.nohp.clone(),
        }
    }
}

/// The delete button's form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub nama: String,
}
