use super::{Contact, ContactId, NewContact};
use crate::ServiceError;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use log::*;
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Typed access to the contact collection.
///
/// Nothing here checks that names are unique; that's done by validation before
/// anything is written.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Every contact, in store order.
    async fn find_all(&self) -> Result<Vec<Contact>, ServiceError>;

    /// The first contact called `name`, if there is one.
    async fn find_by_name(&self, name: &str) -> Result<Option<Contact>, ServiceError>;

    /// Stores each contact as a new record, returning their fresh identifiers in order.
    async fn insert_many(&self, contacts: Vec<NewContact>) -> Result<Vec<ContactId>, ServiceError>;

    /// Overwrites the name, email and phone of the contact with this id.
    /// Returns whether such a contact existed.
    async fn update_by_id(&self, id: &ContactId, fields: NewContact) -> Result<bool, ServiceError>;

    /// Removes at most one contact called `name`, returning how many were removed.
    async fn delete_by_name(&self, name: &str) -> Result<u64, ServiceError>;
}

/// How a contact is laid out in mongo.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContactDoc {
    #[serde(rename = "_id")]
    id: ObjectId,
    nama: String,
    email: String,
    nohp: String,
}

impl From<ContactDoc> for Contact {
    fn from(d: ContactDoc) -> Self {
        Contact {
            id: d.id.into(),
            name: d.nama,
            email: d.email,
            phone: d.nohp,
        }
    }
}

/// Contacts kept in the `contacts` collection of a mongo database.
#[derive(Clone)]
pub struct MongoContacts {
    contacts: Collection<ContactDoc>,
}

impl MongoContacts {
    pub fn new(db: &Database) -> Self {
        Self {
            contacts: db.collection("contacts"),
        }
    }
}

#[async_trait]
impl ContactStore for MongoContacts {
    async fn find_all(&self) -> Result<Vec<Contact>, ServiceError> {
        let docs: Vec<ContactDoc> = self.contacts.find(None, None).await?.try_collect().await?;
        trace!("found {} contacts", docs.len());

        Ok(docs.into_iter().map(Contact::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Contact>, ServiceError> {
        Ok(self
            .contacts
            .find_one(doc! { "nama": name }, None)
            .await?
            .map(Contact::from))
    }

    async fn insert_many(&self, contacts: Vec<NewContact>) -> Result<Vec<ContactId>, ServiceError> {
        if contacts.is_empty() {
            return Ok(vec![]);
        }

        let docs: Vec<ContactDoc> = contacts
            .into_iter()
            .map(|c| ContactDoc {
                id: ObjectId::new(),
                nama: c.name,
                email: c.email,
                nohp: c.phone,
            })
            .collect();
        let ids = docs.iter().map(|d| d.id.into()).collect();

        let res = self.contacts.insert_many(docs, None).await?;
        debug!("inserted {} contacts", res.inserted_ids.len());

        Ok(ids)
    }

    async fn update_by_id(&self, id: &ContactId, fields: NewContact) -> Result<bool, ServiceError> {
        let oid = ObjectId::parse_str(id.as_str())?;
        let res = self
            .contacts
            .update_one(
                doc! { "_id": oid },
                doc! {
                    "$set": {
                        "nama": fields.name,
                        "nohp": fields.phone,
                        "email": fields.email,
                    }
                },
                None,
            )
            .await?;

        Ok(res.matched_count > 0)
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, ServiceError> {
        let res = self.contacts.delete_one(doc! { "nama": name }, None).await?;

        Ok(res.deleted_count)
    }
}

/// Contacts kept in this process only.
#[derive(Default)]
pub struct MemoryContacts {
    contacts: RwLock<Vec<Contact>>,
}

#[async_trait]
impl ContactStore for MemoryContacts {
    async fn find_all(&self) -> Result<Vec<Contact>, ServiceError> {
        Ok(self.contacts.read().await.clone())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Contact>, ServiceError> {
        Ok(self
            .contacts
            .read()
            .await
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn insert_many(&self, contacts: Vec<NewContact>) -> Result<Vec<ContactId>, ServiceError> {
        let mut stored = self.contacts.write().await;

        Ok(contacts
            .into_iter()
            .map(|c| {
                let id = ContactId::from(ObjectId::new());
                stored.push(Contact {
                    id: id.clone(),
                    name: c.name,
                    email: c.email,
                    phone: c.phone,
                });
                id
            })
            .collect())
    }

    async fn update_by_id(&self, id: &ContactId, fields: NewContact) -> Result<bool, ServiceError> {
        // same rule mongo applies, so both stores reject the same ids
        ObjectId::parse_str(id.as_str())?;

        let mut stored = self.contacts.write().await;
        Ok(match stored.iter_mut().find(|c| &c.id == id) {
            Some(c) => {
                c.name = fields.name;
                c.email = fields.email;
                c.phone = fields.phone;
                true
            }
            None => false,
        })
    }

    async fn delete_by_name(&self, name: &str) -> Result<u64, ServiceError> {
        let mut stored = self.contacts.write().await;
        Ok(match stored.iter().position(|c| c.name == name) {
            Some(i) => {
                stored.remove(i);
                1
            }
            None => 0,
        })
    }
}
