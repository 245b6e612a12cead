//! HTML pages. Templates are compiled into the binary, so the server can run from anywhere.

use actix_web::{http::header::ContentType, HttpResponse};
use serde::Serialize;
use tera::{Context, Tera};

use crate::ServiceError;

const TEMPLATES: &[(&str, &str)] = &[
    (
        "layouts/main-layout.html",
        include_str!("../templates/layouts/main-layout.html"),
    ),
    ("index.html", include_str!("../templates/index.html")),
    ("about.html", include_str!("../templates/about.html")),
    ("contact.html", include_str!("../templates/contact.html")),
    ("add-contact.html", include_str!("../templates/add-contact.html")),
    ("edit-contact.html", include_str!("../templates/edit-contact.html")),
    ("detail.html", include_str!("../templates/detail.html")),
];

pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;

        Ok(Self { tera })
    }

    /// Renders template `name` with `page`'s fields as its variables.
    pub fn render<P: Serialize>(&self, name: &str, page: &P) -> Result<String, ServiceError> {
        let context = Context::from_serialize(page)?;

        Ok(self.tera.render(name, &context)?)
    }

    /// [`Views::render`], wrapped in a `200 OK`.
    pub fn page<P: Serialize>(&self, name: &str, page: &P) -> Result<HttpResponse, ServiceError> {
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(self.render(name, page)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Serialize)]
    struct About {
        title: &'static str,
    }

    #[test]
    fn templates_parse() {
        Views::new().expect("templates should all parse");
    }

    #[test]
    fn layout_wraps_pages() {
        let views = Views::new().expect("templates");
        let html = views
            .render("about.html", &About { title: "Halaman About" })
            .expect("about renders");
        assert!(html.contains("<title>Halaman About</title>"), "{}", html);
        assert!(html.contains("<nav"), "layout navigation missing: {}", html);
    }

    #[test]
    fn values_are_escaped() {
        #[derive(Serialize)]
        struct Detail {
            title: &'static str,
            contact: crate::Contact,
        }

        let views = Views::new().expect("templates");
        let html = views
            .render(
                "detail.html",
                &Detail {
                    title: "Halaman Detail Contact",
                    contact: crate::Contact {
                        id: crate::ContactId("5f1d7f3e9b1e8a3c4c8b4567".to_string()),
                        name: "<script>alert(1)</script>".to_string(),
                        email: "ana@x.com".to_string(),
                        phone: "081234567890".to_string(),
                    },
                },
            )
            .expect("detail renders");
        assert!(!html.contains("<script>alert"), "{}", html);
        assert!(html.contains("&lt;script&gt;"), "{}", html);
    }
}
