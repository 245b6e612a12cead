//! Checks a submitted contact form before anything is written.
//!
//! Each field has a list of pure checks, and the name additionally has to be free in the
//! store. Every failure is collected into a [`Report`]; validating never fails the request
//! unless the store itself does.

use super::{ContactForm, ContactStore};
use crate::ServiceError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

pub const NAME_REQUIRED: &str = "Nama contact wajib diisi!";
pub const NAME_TAKEN: &str = "Nama contact sudah digunakan!";
pub const EMAIL_INVALID: &str = "Email tidak valid!";
pub const PHONE_INVALID: &str = "No HP tidak valid";

lazy_static! {
    /// Indonesian mobile numbers: a `0`, `62` or `+62` prefix, then a known operator prefix.
    static ref ID_MOBILE: Regex = Regex::new(
        r"^(\+?62|0)8(1[123456789]|2[1238]|3[1238]|5[12356789]|7[78]|9[56789]|8[123456789])([\s?|\d]{5,11})$"
    )
    .unwrap();
    // non-ASCII letters are allowed in both halves of an address, outside these gaps
    static ref EMAIL_LOCAL: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]+)*$"
    )
    .unwrap();
    static ref DOMAIN_LABEL: Regex = Regex::new(
        r"^[A-Za-z0-9\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]([A-Za-z0-9\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}-]*[A-Za-z0-9\x{A1}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}])?$"
    )
    .unwrap();
    /// Two or more letters, or a punycode `xn--` label.
    static ref TOP_LEVEL_LABEL: Regex = Regex::new(
        r"^([A-Za-z\x{A1}-\x{A8}\x{AA}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFEF}]{2,63}|(?i:xn)[A-Za-z0-9-]{2,59})$"
    )
    .unwrap();
}

/// The form fields that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl Field {
    /// The field's name in the form.
    pub fn param(self) -> &'static str {
        match self {
            Field::Name => "nama",
            Field::Email => "email",
            Field::Phone => "nohp",
        }
    }

    fn value(self, form: &ContactForm) -> &str {
        match self {
            Field::Name => &form.nama,
            Field::Email => &form.email,
            Field::Phone => &form.nohp,
        }
    }
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub param: &'static str,
    pub value: String,
    pub msg: &'static str,
}

/// Everything wrong with a submission, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report(Vec<FieldError>);

impl Report {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// The messages reported against `field`.
    pub fn messages_for(&self, field: Field) -> Vec<&'static str> {
        self.0
            .iter()
            .filter(|e| e.param == field.param())
            .map(|e| e.msg)
            .collect()
    }

    fn push(&mut self, field: Field, form: &ContactForm, msg: &'static str) {
        self.0.push(FieldError {
            param: field.param(),
            value: field.value(form).to_string(),
            msg,
        });
    }
}

struct Rule {
    field: Field,
    check: fn(&str) -> bool,
    msg: &'static str,
}

/// Checks that need nothing but the submitted value, in report order.
const RULES: &[Rule] = &[
    Rule {
        field: Field::Name,
        check: is_present,
        msg: NAME_REQUIRED,
    },
    Rule {
        field: Field::Email,
        check: is_email,
        msg: EMAIL_INVALID,
    },
    Rule {
        field: Field::Phone,
        check: is_id_mobile_phone,
        msg: PHONE_INVALID,
    },
];

/// How strictly to check that the submitted name is free.
#[derive(Debug, Clone, Copy)]
pub enum NameCheck<'a> {
    /// No other contact may have it; for new contacts.
    Unique,
    /// Keeping `previous` is fine, anything else must be free; for edits.
    UniqueUnlessUnchanged { previous: &'a str },
}

/// Runs every check against `form`.
pub async fn validate(
    form: &ContactForm,
    name_check: NameCheck<'_>,
    contacts: &dyn ContactStore,
) -> Result<Report, ServiceError> {
    let mut report = Report::default();

    // name checks come first so the report stays in field order
    let unchanged = match name_check {
        NameCheck::Unique => false,
        NameCheck::UniqueUnlessUnchanged { previous } => form.nama == previous,
    };
    if is_present(&form.nama) && !unchanged && contacts.find_by_name(&form.nama).await?.is_some() {
        report.push(Field::Name, form, NAME_TAKEN);
    }

    for rule in RULES {
        if !(rule.check)(rule.field.value(form)) {
            report.push(rule.field, form, rule.msg);
        }
    }

    Ok(report)
}

pub fn is_present(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Whether `s` is an Indonesian mobile number, e.g. `081234567890` or `+6281234567890`.
pub fn is_id_mobile_phone(s: &str) -> bool {
    ID_MOBILE.is_match(s)
}

/// Whether `s` looks like a deliverable email address, e.g. `ana@example.co.id` or `josé@münchen.de`.
pub fn is_email(s: &str) -> bool {
    if s.len() > 254 {
        return false;
    }
    let (local, domain) = match s.rsplit_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if local.is_empty() || local.len() > 64 || !EMAIL_LOCAL.is_match(local) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    match labels.split_last() {
        Some((tld, rest)) if !rest.is_empty() => {
            TOP_LEVEL_LABEL.is_match(tld)
                && rest
                    .iter()
                    .all(|l| l.len() <= 63 && DOMAIN_LABEL.is_match(l))
        }
        _ => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::contact::{MemoryContacts, NewContact};

    fn form(nama: &str, email: &str, nohp: &str) -> ContactForm {
        ContactForm {
            nama: nama.to_string(),
            email: email.to_string(),
            nohp: nohp.to_string(),
        }
    }

    async fn store_with(names: &[&str]) -> MemoryContacts {
        let store = MemoryContacts::default();
        store
            .insert_many(
                names
                    .iter()
                    .map(|n| NewContact {
                        name: n.to_string(),
                        email: "x@example.com".to_string(),
                        phone: "081234567890".to_string(),
                    })
                    .collect(),
            )
            .await
            .expect("memory insert");
        store
    }

    #[test]
    fn emails() {
        for good in &[
            "ana@x.com",
            "wisnuar@gmail.com",
            "first.last+tag@mail.example.co.id",
            "o'brien@example.org",
            "josé@example.com",
            "ana@münchen.de",
            "ana@example.xn--p1ai",
            "ana@contoh.香港",
        ] {
            assert!(is_email(good), "{} should be a valid email", good);
        }
        for bad in &[
            "not-an-email",
            "",
            "@example.com",
            "ana@",
            "ana@localhost",
            "ana@example.c",
            "ana@-example.com",
            "ana@example-.com",
            ".ana@example.com",
            "ana.@example.com",
            "an..a@example.com",
            "ana @example.com",
            "ana@exa mple.com",
            "ana@example.123",
        ] {
            assert!(!is_email(bad), "{:?} should not be a valid email", bad);
        }
        let long_local = format!("{}@example.com", "a".repeat(65));
        assert!(!is_email(&long_local));

        // 254 bytes is the most an address may have
        let local = "a".repeat(64);
        let at_limit = format!("{}@{}.{}.{}.com", local, "b".repeat(63), "c".repeat(63), "d".repeat(57));
        assert_eq!(at_limit.len(), 254);
        assert!(is_email(&at_limit), "{} should be a valid email", at_limit);
        let over_limit = format!("{}@{}.{}.{}.com", local, "b".repeat(63), "c".repeat(63), "d".repeat(58));
        assert_eq!(over_limit.len(), 255);
        assert!(!is_email(&over_limit));
    }

    #[test]
    fn indonesian_mobile_numbers() {
        for good in &[
            "081234567890",
            "+6281234567890",
            "6285712345678",
            "0878123456",
            "08991234567",
        ] {
            assert!(is_id_mobile_phone(good), "{} should be a valid number", good);
        }
        for bad in &[
            "",
            "12345",
            "021234567890",
            "0801234567890",
            "+1-555-1234",
            "081234",
            "08123456789012345",
            "081234abcd",
        ] {
            assert!(!is_id_mobile_phone(bad), "{:?} should not be a valid number", bad);
        }
    }

    #[actix_rt::test]
    async fn clean_submission_passes() -> Result<(), ServiceError> {
        let store = store_with(&["Budi"]).await;
        let report = validate(
            &form("Ana", "ana@x.com", "081234567890"),
            NameCheck::Unique,
            &store,
        )
        .await?;
        assert!(report.is_empty(), "unexpected errors: {:?}", report);

        Ok(())
    }

    #[actix_rt::test]
    async fn everything_wrong_is_reported_in_field_order() -> Result<(), ServiceError> {
        let store = store_with(&["Ana"]).await;
        let report = validate(&form("Ana", "not-an-email", "12345"), NameCheck::Unique, &store).await?;

        let params: Vec<&str> = report.errors().iter().map(|e| e.param).collect();
        assert_eq!(params, vec!["nama", "email", "nohp"]);
        assert_eq!(report.messages_for(Field::Name), vec![NAME_TAKEN]);
        assert_eq!(report.messages_for(Field::Email), vec![EMAIL_INVALID]);
        assert_eq!(report.messages_for(Field::Phone), vec![PHONE_INVALID]);
        assert_eq!(report.errors()[1].value, "not-an-email");

        Ok(())
    }

    #[actix_rt::test]
    async fn empty_name_is_required_not_taken() -> Result<(), ServiceError> {
        let store = store_with(&[]).await;
        let report = validate(&form("  ", "ana@x.com", "081234567890"), NameCheck::Unique, &store).await?;
        assert_eq!(report.messages_for(Field::Name), vec![NAME_REQUIRED]);
        assert_eq!(report.errors().len(), 1);

        Ok(())
    }

    #[actix_rt::test]
    async fn keeping_your_own_name_is_fine() -> Result<(), ServiceError> {
        let store = store_with(&["Ana", "Budi"]).await;
        let unchanged = NameCheck::UniqueUnlessUnchanged { previous: "Ana" };

        let report = validate(&form("Ana", "ana@x.com", "081234567890"), unchanged, &store).await?;
        assert!(report.is_empty(), "unexpected errors: {:?}", report);

        let report = validate(&form("Budi", "ana@x.com", "081234567890"), unchanged, &store).await?;
        assert_eq!(report.messages_for(Field::Name), vec![NAME_TAKEN]);

        let report = validate(&form("Citra", "ana@x.com", "081234567890"), unchanged, &store).await?;
        assert!(report.is_empty(), "unexpected errors: {:?}", report);

        Ok(())
    }
}
