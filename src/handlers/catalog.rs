use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::handlers::orders::money;
use crate::handlers::{require, require_email, with_conn, Pagination};
use crate::models::catalog::{
    CustomerReview, NewCustomerReview, NewProduct, Product, ProductChanges, ProductImage,
};
use crate::schema::{customer_reviews, product_images, products};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "3.50"
    pub price: String,
    pub category: String,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub is_available: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: money(&p.price),
            category: p.category,
            is_available: p.is_available,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageRequest {
    pub image_url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
}

impl From<ProductImage> for ImageResponse {
    fn from(i: ProductImage) -> Self {
        Self {
            id: i.id,
            product_id: i.product_id,
            image_url: i.image_url,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub user_email: String,
    pub message: String,
    /// Whole stars from 1 to 5
    pub rating: i16,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_email: String,
    pub message: String,
    pub rating: i16,
    pub created_at: String,
}

impl From<CustomerReview> for ReviewResponse {
    fn from(r: CustomerReview) -> Self {
        Self {
            id: r.id,
            product_id: r.product_id,
            user_email: r.user_email,
            message: r.message,
            rating: r.rating,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Parses a catalog price: non-negative with at most two fractional digits.
pub(crate) fn parse_price(raw: &str) -> Result<BigDecimal, DomainError> {
    let price = BigDecimal::from_str(raw.trim())
        .map_err(|e| DomainError::InvalidInput(format!("Invalid price '{}': {}", raw, e)))?;
    if price < BigDecimal::zero() {
        return Err(DomainError::InvalidInput(format!(
            "price must not be negative, got {}",
            raw
        )));
    }
    if price.with_scale(2) != price {
        return Err(DomainError::InvalidInput(format!(
            "price must have at most two decimal places, got {}",
            raw
        )));
    }
    Ok(price)
}

impl ProductRequest {
    fn validated(self) -> Result<ProductChanges, DomainError> {
        require("name", &self.name)?;
        require("category", &self.category)?;
        Ok(ProductChanges {
            price: parse_price(&self.price)?,
            name: self.name,
            description: self.description,
            category: self.category,
            is_available: self.is_available,
            updated_at: Utc::now(),
        })
    }
}

fn find_product(conn: &mut PgConnection, id: Uuid) -> Result<Product, DomainError> {
    products::table
        .filter(products::id.eq(id))
        .select(Product::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| DomainError::NotFound("Product".to_string()))
}

// ── Products ─────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product"),
    ),
    tag = "catalog"
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let fields = body.into_inner().validated()?;

    let product = with_conn(pool, move |conn| {
        Ok(diesel::insert_into(products::table)
            .values(&NewProduct {
                id: Uuid::new_v4(),
                name: fields.name,
                description: fields.description,
                price: fields.price,
                category: fields.category,
                is_available: fields.is_available,
            })
            .returning(Product::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

#[utoipa::path(
    get,
    path = "/products",
    params(Pagination),
    responses((status = 200, description = "Page of products", body = [ProductResponse])),
    tag = "catalog"
)]
pub async fn list_products(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.bounds();

    let rows = with_conn(pool, move |conn| {
        Ok(products::table
            .select(Product::as_select())
            .order(products::created_at.asc())
            .limit(limit)
            .offset(skip)
            .load(conn)?)
    })
    .await?;

    let body: Vec<ProductResponse> = rows.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = with_conn(pool, move |conn| find_product(conn, id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PUT /products/{id}
///
/// Replaces every editable field. Orders already placed keep the price they
/// captured.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid product"),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let changes = body.into_inner().validated()?;

    let product = with_conn(pool, move |conn| {
        diesel::update(products::table.filter(products::id.eq(id)))
            .set(&changes)
            .returning(Product::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| DomainError::NotFound("Product".to_string()))
    })
    .await?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product is referenced by orders"),
    ),
    tag = "catalog"
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    with_conn(pool, move |conn| {
        let deleted = diesel::delete(products::table.filter(products::id.eq(id))).execute(conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound("Product".to_string()));
        }
        Ok(())
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// ── Images ───────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/products/{id}/images",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ImageRequest,
    responses(
        (status = 201, description = "Image added", body = ImageResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn add_image(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ImageRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let body = body.into_inner();
    require("image_url", &body.image_url)?;

    let image = with_conn(pool, move |conn| {
        find_product(conn, product_id)?;
        Ok(diesel::insert_into(product_images::table)
            .values(&ProductImage {
                id: Uuid::new_v4(),
                product_id,
                image_url: body.image_url,
            })
            .returning(ProductImage::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(ImageResponse::from(image)))
}

#[utoipa::path(
    get,
    path = "/products/{id}/images",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Images of the product", body = [ImageResponse]),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn list_images(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    let images = with_conn(pool, move |conn| {
        let product = find_product(conn, product_id)?;
        Ok(ProductImage::belonging_to(&product)
            .select(ProductImage::as_select())
            .load(conn)?)
    })
    .await?;

    let body: Vec<ImageResponse> = images.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    delete,
    path = "/product-images/{id}",
    params(("id" = Uuid, Path, description = "Image UUID")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found"),
    ),
    tag = "catalog"
)]
pub async fn delete_image(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    with_conn(pool, move |conn| {
        let deleted =
            diesel::delete(product_images::table.filter(product_images::id.eq(id))).execute(conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound("Product image".to_string()));
        }
        Ok(())
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// ── Reviews ──────────────────────────────────────────────────────────────────

#[utoipa::path(
    post,
    path = "/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review added", body = ReviewResponse),
        (status = 400, description = "Invalid review"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Unknown user"),
    ),
    tag = "catalog"
)]
pub async fn add_review(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ReviewRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let body = body.into_inner();
    require_email("user_email", &body.user_email)?;
    require("message", &body.message)?;
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::BadRequest(format!(
            "rating must be between 1 and 5, got {}",
            body.rating
        )));
    }

    let review = with_conn(pool, move |conn| {
        find_product(conn, product_id)?;
        Ok(diesel::insert_into(customer_reviews::table)
            .values(&NewCustomerReview {
                id: Uuid::new_v4(),
                product_id,
                user_email: body.user_email,
                message: body.message,
                rating: body.rating,
            })
            .returning(CustomerReview::as_returning())
            .get_result(conn)?)
    })
    .await?;

    Ok(HttpResponse::Created().json(ReviewResponse::from(review)))
}

#[utoipa::path(
    get,
    path = "/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Reviews of the product, newest first", body = [ReviewResponse]),
        (status = 404, description = "Product not found"),
    ),
    tag = "catalog"
)]
pub async fn list_reviews(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();

    let reviews = with_conn(pool, move |conn| {
        let product = find_product(conn, product_id)?;
        Ok(CustomerReview::belonging_to(&product)
            .select(CustomerReview::as_select())
            .order(customer_reviews::created_at.desc())
            .load(conn)?)
    })
    .await?;

    let body: Vec<ReviewResponse> = reviews.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dec;

    #[test]
    fn parses_two_decimal_prices() {
        assert_eq!(parse_price("3.50").expect("valid"), dec("3.5"));
        assert_eq!(parse_price(" 4 ").expect("valid"), dec("4"));
        assert_eq!(parse_price("0").expect("valid"), dec("0"));
    }

    #[test]
    fn rejects_bad_prices() {
        for raw in ["-1.00", "1.999", "abc", ""] {
            assert!(
                matches!(parse_price(raw), Err(DomainError::InvalidInput(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn product_request_requires_name_and_category() {
        let request = ProductRequest {
            name: "".to_string(),
            description: String::new(),
            price: "2.00".to_string(),
            category: "coffee".to_string(),
            is_available: true,
        };
        assert!(request.validated().is_err());

        let request = ProductRequest {
            name: "Cortado".to_string(),
            description: String::new(),
            price: "2.00".to_string(),
            category: " ".to_string(),
            is_available: true,
        };
        assert!(request.validated().is_err());
    }

    #[test]
    fn product_request_defaults_availability() {
        let request: ProductRequest = serde_json::from_str(
            r#"{"name":"Cortado","price":"2.80","category":"coffee"}"#,
        )
        .expect("valid json");
        let changes = request.validated().expect("valid product");

        assert!(changes.is_available);
        assert_eq!(changes.price, dec("2.80"));
        assert_eq!(changes.description, "");
    }
}
