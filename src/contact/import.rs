//! Bulk loading, for the `from_csv` tool.
//!
//! Rows get the same checks as the add form. On top of that a name may only appear once per
//! import, since none of the rows are in the store yet when the next one is checked.

use super::{
    validation::{self, NameCheck},
    ContactForm, ContactStore, NewContact,
};
use crate::ServiceError;
use log::*;
use std::{collections::HashSet, fmt};

/// How an import went.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Validates every row and inserts the ones that pass in a single batch.
///
/// A row that couldn't be parsed comes in as an `Err` and is skipped, like a row that fails
/// validation. Only store errors abort the import, and then nothing is inserted.
pub async fn import_rows<I, E>(rows: I, contacts: &dyn ContactStore) -> Result<ImportSummary, ServiceError>
where
    I: IntoIterator<Item = Result<ContactForm, E>>,
    E: fmt::Display,
{
    let mut accepted: Vec<NewContact> = vec![];
    let mut names_seen = HashSet::new();
    let mut skipped = 0;

    for (i, row) in rows.into_iter().enumerate() {
        let n = i + 1;
        let form = match row {
            Ok(form) => form,
            Err(e) => {
                warn!("row {}: unreadable: {}", n, e);
                skipped += 1;
                continue;
            }
        };

        let report = validation::validate(&form, NameCheck::Unique, contacts).await?;
        if !report.is_empty() {
            let msgs: Vec<&str> = report.errors().iter().map(|e| e.msg).collect();
            warn!("row {}: skipping {:?}: {}", n, form.nama, msgs.join(", "));
            skipped += 1;
            continue;
        }
        if !names_seen.insert(form.nama.clone()) {
            warn!("row {}: skipping {:?}: name already used earlier in the import", n, form.nama);
            skipped += 1;
            continue;
        }

        debug!("row {}: accepted {:?}", n, form.nama);
        accepted.push(form.into());
    }

    let inserted = contacts.insert_many(accepted).await?.len();
    Ok(ImportSummary { inserted, skipped })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::contact::MemoryContacts;

    fn row(nama: &str, email: &str) -> Result<ContactForm, String> {
        Ok(ContactForm {
            nama: nama.to_string(),
            email: email.to_string(),
            nohp: "081234567890".to_string(),
        })
    }

    #[tokio::test]
    async fn names_repeated_in_one_import_are_skipped() -> Result<(), ServiceError> {
        let store = MemoryContacts::default();

        let summary = import_rows(
            vec![
                row("Ana", "ana@x.com"),
                row("Budi", "budi@x.com"),
                row("Ana", "another.ana@x.com"),
            ],
            &store,
        )
        .await?;
        assert_eq!(summary, ImportSummary { inserted: 2, skipped: 1 });

        let all = store.find_all().await?;
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Budi"]);
        assert_eq!(all[0].email, "ana@x.com", "the first Ana wins");

        Ok(())
    }

    #[tokio::test]
    async fn bad_rows_are_skipped_and_the_rest_go_in() -> Result<(), ServiceError> {
        let store = MemoryContacts::default();
        store
            .insert_many(vec![NewContact {
                name: "Citra".to_string(),
                email: "citra@x.com".to_string(),
                phone: "081234567890".to_string(),
            }])
            .await?;

        let summary = import_rows(
            vec![
                Err("CSV deserialize error: record 1 (line: 2): missing field `nohp`".to_string()),
                row("Dewi", "not-an-email"),
                row("Citra", "citra2@x.com"),
                row("", "nobody@x.com"),
                row("Eka", "eka@x.com"),
            ],
            &store,
        )
        .await?;
        assert_eq!(summary, ImportSummary { inserted: 1, skipped: 4 });

        let names: Vec<String> = store.find_all().await?.into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Citra", "Eka"]);

        Ok(())
    }

    #[tokio::test]
    async fn nothing_to_import() -> Result<(), ServiceError> {
        let store = MemoryContacts::default();
        let summary = import_rows(Vec::<Result<ContactForm, String>>::new(), &store).await?;
        assert_eq!(summary, ImportSummary::default());
        assert!(store.find_all().await?.is_empty());

        Ok(())
    }
}
