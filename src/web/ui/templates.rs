use askama::Template;
use askama_web::WebTemplate;

use crate::presentation::ListView;

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub notice: Option<String>,
    pub source: String,
    pub updated: String,
    pub search: String,
    pub bands: String,
    pub markers: usize,
    pub view: ListView,
}
