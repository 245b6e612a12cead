//! Pages that don't touch the store.

use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::{views::Views, ServiceError};

#[derive(Serialize)]
struct Student {
    nama: &'static str,
    email: &'static str,
}

#[derive(Serialize)]
struct HomePage {
    title: &'static str,
    nama: &'static str,
    mahasiswa: &'static [Student],
}

const STUDENTS: &[Student] = &[
    Student {
        nama: "Wisnu Arizky",
        email: "wisnuar@gmail.com",
    },
    Student {
        nama: "Yoga Fadila",
        email: "yogfad@gmail.com",
    },
    Student {
        nama: "Ivan Julian",
        email: "ivanjul@gmail.com",
    },
];

#[get("/")]
pub async fn home(views: web::Data<Views>) -> Result<HttpResponse, ServiceError> {
    views.page(
        "index.html",
        &HomePage {
            title: "Halaman Home",
            nama: "Wisnu Arizky Kurniawan",
            mahasiswa: STUDENTS,
        },
    )
}

#[derive(Serialize)]
struct AboutPage {
    title: &'static str,
}

#[get("/about")]
pub async fn about(views: web::Data<Views>) -> Result<HttpResponse, ServiceError> {
    views.page(
        "about.html",
        &AboutPage {
            title: "Halaman About",
        },
    )
}

/// Anything we don't have a route for.
pub async fn not_found() -> Result<HttpResponse, ServiceError> {
    Err(ServiceError::NoData)
}
