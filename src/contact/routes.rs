use super::{
    validation::{self, NameCheck, Report},
    Contact, ContactForm, ContactId, ContactStore, DeleteForm, EditContactForm, NewContact,
};
use crate::{views::Views, ServiceError, Session};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse};
use log::*;
use serde::Serialize;

pub const ADDED: &str = "Data contact berhasil ditambahkan";
pub const REMOVED: &str = "Data contact berhasil dihapus";
pub const CHANGED: &str = "Data contact berhasil diubah";

fn back_to_list() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/contact"))
        .finish()
}

#[derive(Serialize)]
struct ListPage {
    title: &'static str,
    contacts: Vec<Contact>,
    msg: Vec<String>,
}

#[get("/contact")]
/// Every contact, along with whatever flash messages are waiting.
pub async fn contact_list(
    contacts: web::Data<dyn ContactStore>,
    views: web::Data<Views>,
    session: Session,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing contact_list request");

    let page = ListPage {
        title: "Halaman Contact",
        contacts: contacts.find_all().await?,
        msg: session.take_flash().await?,
    };

    views.page("contact.html", &page)
}

#[derive(Serialize)]
struct AddPage<'a> {
    title: &'static str,
    contact: &'a ContactForm,
    errors: &'a Report,
}

impl<'a> AddPage<'a> {
    fn new(contact: &'a ContactForm, errors: &'a Report) -> Self {
        Self {
            title: "Form Tambah Data Contact",
            contact,
            errors,
        }
    }
}

#[get("/contact/add")]
pub async fn contact_add_form(views: web::Data<Views>) -> Result<HttpResponse, ServiceError> {
    views.page(
        "add-contact.html",
        &AddPage::new(&ContactForm::default(), &Report::default()),
    )
}

#[post("/contact")]
pub async fn contact_add(
    form: web::Form<ContactForm>,
    contacts: web::Data<dyn ContactStore>,
    views: web::Data<Views>,
    session: Session,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing contact_add request");
    let form = form.into_inner();

    let report = validation::validate(&form, NameCheck::Unique, &**contacts).await?;
    if !report.is_empty() {
        debug!("rejecting new contact: {:?}", report);
        return views.page("add-contact.html", &AddPage::new(&form, &report));
    }

    let name = form.nama.clone();
    contacts.insert_many(vec![NewContact::from(form)]).await?;
    info!("added contact {:?}", name);

    session.flash(ADDED).await?;
    Ok(back_to_list())
}

#[delete("/contact")]
/// Deletes by name. A name nobody has is quietly ignored.
pub async fn contact_delete(
    form: web::Form<DeleteForm>,
    contacts: web::Data<dyn ContactStore>,
    session: Session,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing contact_delete request");

    match contacts.delete_by_name(&form.nama).await? {
        0 => warn!("asked to delete {:?}, but there's no such contact", form.nama),
        _ => info!("deleted contact {:?}", form.nama),
    }

    session.flash(REMOVED).await?;
    Ok(back_to_list())
}

#[derive(Serialize)]
struct EditPage<'a> {
    title: &'static str,
    contact: &'a EditContactForm,
    errors: &'a Report,
}

impl<'a> EditPage<'a> {
    fn new(contact: &'a EditContactForm, errors: &'a Report) -> Self {
        Self {
            title: "Form Ubah Data Contact",
            contact,
            errors,
        }
    }
}

#[get("/contact/edit/{nama}")]
pub async fn contact_edit_form(
    nama: web::Path<String>,
    contacts: web::Data<dyn ContactStore>,
    views: web::Data<Views>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing contact_edit_form request");

    let contact = contacts
        .find_by_name(&nama)
        .await?
        .ok_or(ServiceError::NoData)?;

    views.page(
        "edit-contact.html",
        &EditPage::new(&EditContactForm::from_contact(&contact), &Report::default()),
    )
}

#[put("/contact")]
pub async fn contact_edit(
    form: web::Form<EditContactForm>,
    contacts: web::Data<dyn ContactStore>,
    views: web::Data<Views>,
    session: Session,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing contact_edit request");
    let form = form.into_inner();

    let name_check = NameCheck::UniqueUnlessUnchanged {
        previous: &form.old_nama,
    };
    let report = validation::validate(&form.fields(), name_check, &**contacts).await?;
    if !report.is_empty() {
        debug!("rejecting contact edit: {:?}", report);
        return views.page("edit-contact.html", &EditPage::new(&form, &report));
    }

    let id = ContactId(form.id.clone());
    if contacts.update_by_id(&id, form.fields().into()).await? {
        info!("updated contact {} ({:?} -> {:?})", id, form.old_nama, form.nama);
    } else {
        warn!("asked to update contact {}, but there's no such contact", id);
    }

    session.flash(CHANGED).await?;
    Ok(back_to_list())
}

#[derive(Serialize)]
struct DetailPage {
    title: &'static str,
    contact: Contact,
}

#[get("/contact/{nama}")]
pub async fn contact_detail(
    nama: web::Path<String>,
    contacts: web::Data<dyn ContactStore>,
    views: web::Data<Views>,
) -> Result<HttpResponse, ServiceError> {
    debug!("servicing contact_detail request");

    let contact = contacts
        .find_by_name(&nama)
        .await?
        .ok_or(ServiceError::NoData)?;

    views.page(
        "detail.html",
        &DetailPage {
            title: "Halaman Detail Contact",
            contact,
        },
    )
}
