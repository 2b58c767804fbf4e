use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct ProductDoc {
    pub id: i32,
    pub title: String,
    pub name: String,
    pub price: f64,
    pub link: String,
    pub year: Option<String>,
    pub gama_de_produse: Option<String>,
    pub volume: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(utoipa::ToSchema)]
pub struct CreateProductInputDoc {
    pub title: String,
    pub name: String,
    pub price: f64,
    pub link: String,
    pub year: Option<String>,
    pub gama_de_produse: Option<String>,
    pub volume: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateProductInputDoc {
    pub title: Option<String>,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub year: Option<String>,
    pub gama_de_produse: Option<String>,
    pub volume: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct UploadResponseDoc {
    pub message: String,
    pub products_added: usize,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::list,
        crate::routes::products::create,
        crate::routes::products::get,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::upload::upload,
    ),
    components(
        schemas(
            HealthResponse,
            ProductDoc,
            CreateProductInputDoc,
            UpdateProductInputDoc,
            UploadResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "upload")
    )
)]
pub struct ApiDoc;
