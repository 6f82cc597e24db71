pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_service::OrderService;
use domain::ports::{SecretHasher, TokenIssuer};
use handlers::{catalog, geography, identity, orders};
use infrastructure::credentials::{BcryptSecretHasher, JwtTokenIssuer};
use infrastructure::order_repo::DieselOrderStore;

pub use config::Config;
pub use db::{create_pool, DbPool};

pub type AppOrderService = OrderService<DieselOrderStore>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::list_customer_orders,
        catalog::create_product,
        catalog::list_products,
        catalog::get_product,
        catalog::update_product,
        catalog::delete_product,
        catalog::add_image,
        catalog::list_images,
        catalog::delete_image,
        catalog::add_review,
        catalog::list_reviews,
        geography::create_province,
        geography::list_provinces,
        geography::get_province,
        geography::create_district,
        geography::list_districts,
        geography::get_district,
        geography::create_city,
        geography::list_cities,
        geography::get_city,
        geography::create_location,
        geography::list_locations,
        geography::get_location,
        identity::signup,
        identity::login,
        identity::get_user,
        identity::create_admin,
        identity::get_admin,
        identity::create_role,
        identity::list_roles,
        identity::create_employee,
        identity::list_employees,
        identity::get_employee,
    ),
    tags(
        (name = "orders", description = "Order placement and history"),
        (name = "catalog", description = "Products, images and reviews"),
        (name = "geography", description = "Provinces, districts, cities and locations"),
        (name = "identity", description = "Users, admins and employees"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Build and return an actix-web `Server` bound to `config.host:config.port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &Config) -> std::io::Result<actix_web::dev::Server> {
    let order_service = web::Data::new(OrderService::new(DieselOrderStore::new(pool.clone())));
    let hasher: Arc<dyn SecretHasher> = Arc::new(BcryptSecretHasher::default());
    let issuer: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
        config.auth_secret.as_bytes(),
        chrono::Duration::seconds(config.token_ttl_secs),
    ));
    let hasher = web::Data::from(hasher);
    let issuer = web::Data::from(issuer);
    let pool = web::Data::new(pool);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(order_service.clone())
            .app_data(hasher.clone())
            .app_data(issuer.clone())
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run())
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("", web::get().to(orders::list_orders))
            .route("/customer/{email}", web::get().to(orders::list_customer_orders))
            .route("/{id}", web::get().to(orders::get_order)),
    )
    .service(
        web::scope("/products")
            .route("", web::post().to(catalog::create_product))
            .route("", web::get().to(catalog::list_products))
            .route("/{id}", web::get().to(catalog::get_product))
            .route("/{id}", web::put().to(catalog::update_product))
            .route("/{id}", web::delete().to(catalog::delete_product))
            .route("/{id}/images", web::post().to(catalog::add_image))
            .route("/{id}/images", web::get().to(catalog::list_images))
            .route("/{id}/reviews", web::post().to(catalog::add_review))
            .route("/{id}/reviews", web::get().to(catalog::list_reviews)),
    )
    .route("/product-images/{id}", web::delete().to(catalog::delete_image))
    .service(
        web::scope("/provinces")
            .route("", web::post().to(geography::create_province))
            .route("", web::get().to(geography::list_provinces))
            .route("/{id}", web::get().to(geography::get_province)),
    )
    .service(
        web::scope("/districts")
            .route("", web::post().to(geography::create_district))
            .route("", web::get().to(geography::list_districts))
            .route("/{id}", web::get().to(geography::get_district)),
    )
    .service(
        web::scope("/cities")
            .route("", web::post().to(geography::create_city))
            .route("", web::get().to(geography::list_cities))
            .route("/{id}", web::get().to(geography::get_city)),
    )
    .service(
        web::scope("/locations")
            .route("", web::post().to(geography::create_location))
            .route("", web::get().to(geography::list_locations))
            .route("/{id}", web::get().to(geography::get_location)),
    )
    .service(
        web::scope("/users")
            .route("/signup", web::post().to(identity::signup))
            .route("/login", web::post().to(identity::login))
            .route("/{email}", web::get().to(identity::get_user)),
    )
    .service(
        web::scope("/admins")
            .route("", web::post().to(identity::create_admin))
            .route("/{email}", web::get().to(identity::get_admin)),
    )
    .service(
        web::scope("/employee-roles")
            .route("", web::post().to(identity::create_role))
            .route("", web::get().to(identity::list_roles)),
    )
    .service(
        web::scope("/employees")
            .route("", web::post().to(identity::create_employee))
            .route("", web::get().to(identity::list_employees))
            .route("/{id}", web::get().to(identity::get_employee)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_every_resource() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/orders",
            "/orders/{id}",
            "/orders/customer/{email}",
            "/products/{id}/reviews",
            "/product-images/{id}",
            "/locations/{id}",
            "/users/login",
            "/employees/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {} in {:?}",
                expected,
                paths
            );
        }
    }

    #[test]
    fn every_list_endpoint_takes_skip_and_limit() {
        let doc = ApiDoc::openapi();

        for path in ["/orders", "/products", "/provinces", "/employees", "/employee-roles"] {
            let list = doc.paths.paths[path].get.as_ref().expect("GET documented");
            let names: Vec<&str> = list
                .parameters
                .iter()
                .flatten()
                .map(|p| p.name.as_str())
                .collect();
            assert!(names.contains(&"skip") && names.contains(&"limit"), "{path}: {names:?}");
        }
    }
}
